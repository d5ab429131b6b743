use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub providers: Providers,
	pub storage: Storage,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub answer: Answer,
	#[serde(default)]
	pub features: Features,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub completion: CompletionProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Retrieval {
	/// Candidate pool size fetched from the vector store before re-ranking.
	/// Clamped to [12, 60].
	pub candidates_k: u32,
	/// Final result count of the vector path. Clamped to [3, 12].
	pub top_k: u32,
	pub max_per_doc: u32,
	/// Optional floor on blended cosine similarity. Candidates below it are
	/// dropped unless their lexical hit rate reaches `lexical_keep_floor`.
	pub min_similarity: Option<f32>,
	pub lexical_keep_floor: f32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self {
			candidates_k: 24,
			top_k: 8,
			max_per_doc: 3,
			min_similarity: None,
			lexical_keep_floor: 0.2,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Answer {
	pub max_citations: u32,
	pub max_links: u32,
	/// Per-source character clamp when serializing chunks for the model.
	pub source_clamp_chars: u32,
	/// Delta size when a templated answer is sliced into a stream.
	pub stream_slice_chars: u32,
}
impl Default for Answer {
	fn default() -> Self {
		Self { max_citations: 6, max_links: 4, source_clamp_chars: 1_200, stream_slice_chars: 48 }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Features {
	pub vector_enabled: bool,
	pub llm_enabled: bool,
}

pub const CANDIDATES_K_RANGE: (u32, u32) = (12, 60);
pub const TOP_K_RANGE: (u32, u32) = (3, 12);
