mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Answer, CANDIDATES_K_RANGE, CompletionProviderConfig, Config, EmbeddingProviderConfig,
	Features, Providers, Qdrant, Retrieval, Storage, TOP_K_RANGE,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Toml { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.completion.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.completion.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.completion.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.completion.max_tokens must be greater than zero.".to_string(),
		});
	}
	if !cfg.providers.completion.temperature.is_finite()
		|| !(0.0..=2.0).contains(&cfg.providers.completion.temperature)
	{
		return Err(Error::Validation {
			message: "providers.completion.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.features.vector_enabled {
		if cfg.storage.qdrant.url.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.qdrant.url must be non-empty when features.vector_enabled."
					.to_string(),
			});
		}
		if cfg.storage.qdrant.collection.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.qdrant.collection must be non-empty when features.vector_enabled."
					.to_string(),
			});
		}
		if cfg.providers.embedding.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: "providers.embedding.api_key must be non-empty when features.vector_enabled."
					.to_string(),
			});
		}
	}
	if cfg.features.llm_enabled && cfg.providers.completion.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.completion.api_key must be non-empty when features.llm_enabled."
				.to_string(),
		});
	}
	if let Some(min) = cfg.retrieval.min_similarity {
		if !min.is_finite() || !(-1.0..=1.0).contains(&min) {
			return Err(Error::Validation {
				message: "retrieval.min_similarity must be in the range -1.0-1.0.".to_string(),
			});
		}
	}
	if !cfg.retrieval.lexical_keep_floor.is_finite()
		|| !(0.0..=1.0).contains(&cfg.retrieval.lexical_keep_floor)
	{
		return Err(Error::Validation {
			message: "retrieval.lexical_keep_floor must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.retrieval.max_per_doc == 0 {
		return Err(Error::Validation {
			message: "retrieval.max_per_doc must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.max_citations == 0 {
		return Err(Error::Validation {
			message: "answer.max_citations must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.max_links == 0 {
		return Err(Error::Validation {
			message: "answer.max_links must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.source_clamp_chars == 0 {
		return Err(Error::Validation {
			message: "answer.source_clamp_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.answer.stream_slice_chars == 0 {
		return Err(Error::Validation {
			message: "answer.stream_slice_chars must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let (candidates_lo, candidates_hi) = CANDIDATES_K_RANGE;
	let (top_lo, top_hi) = TOP_K_RANGE;

	cfg.retrieval.candidates_k = cfg.retrieval.candidates_k.clamp(candidates_lo, candidates_hi);
	cfg.retrieval.top_k = cfg.retrieval.top_k.clamp(top_lo, top_hi);

	for key in [&mut cfg.providers.embedding.api_key, &mut cfg.providers.completion.api_key] {
		let trimmed = key.trim();

		if trimmed.len() != key.len() {
			*key = trimmed.to_string();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> &'static str {
		r#"
[providers.embedding]
provider_id = "openai"
api_base = "https://api.openai.com"
api_key = "sk-test"
path = "/v1/embeddings"
model = "text-embedding-3-small"
dimensions = 1536
timeout_ms = 10000

[providers.completion]
provider_id = "openai"
api_base = "https://api.openai.com"
api_key = "sk-test"
path = "/v1/chat/completions"
model = "gpt-4o-mini"
temperature = 0.2
max_tokens = 700
timeout_ms = 30000

[storage.qdrant]
url = "http://localhost:6334"
collection = "folio_chunks_v1"
vector_dim = 1536

[retrieval]
candidates_k = 100
top_k = 1

[features]
vector_enabled = true
llm_enabled = true
"#
	}

	#[test]
	fn clamps_retrieval_knobs() {
		let mut cfg: Config = toml::from_str(sample()).unwrap();

		normalize(&mut cfg);

		assert_eq!(cfg.retrieval.candidates_k, 60);
		assert_eq!(cfg.retrieval.top_k, 3);
		assert!(validate(&cfg).is_ok());
	}

	#[test]
	fn rejects_dimension_mismatch() {
		let mut cfg: Config = toml::from_str(sample()).unwrap();

		cfg.storage.qdrant.vector_dim = 768;

		assert!(validate(&cfg).is_err());
	}

	#[test]
	fn defaults_cover_optional_sections() {
		let cfg: Config = toml::from_str(sample()).unwrap();

		assert_eq!(cfg.retrieval.max_per_doc, 3);
		assert_eq!(cfg.answer.max_citations, 6);
		assert_eq!(cfg.answer.max_links, 4);
	}
}
