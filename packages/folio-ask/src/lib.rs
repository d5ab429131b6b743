//! The ask core: given a free-text visitor question, select the most relevant
//! chunks of the portfolio corpus, assemble a grounded answer with citations,
//! and degrade across three tiers (vector retrieval, LLM over the lexical
//! ranking, templated local answer) depending on configured infrastructure.

pub mod answer;
pub mod diversify;
mod error;
pub mod rank;
mod retrieve;
pub mod stream;
mod tiers;

pub use answer::{AskResponse, Citation, SuggestedLink};
pub use error::{Error, Result};
pub use rank::RankedChunk;
pub use stream::AskEvent;
pub use tiers::Tier;

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::sync::mpsc;

use folio_config::{CompletionProviderConfig, Config, EmbeddingProviderConfig};
use folio_content::ContentSnapshot;
use folio_domain::{Lang, Visibility};
use folio_providers::{completion, embedding};
use folio_storage::{QdrantStore, VectorHit};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of the current published content snapshot. The corpus is rebuilt
/// from it on every lexical-path request; nothing here is cached or mutated.
pub trait ContentSource
where
	Self: Send + Sync,
{
	fn snapshot<'a>(&'a self) -> BoxFuture<'a, folio_content::Result<ContentSnapshot>>;
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<Vec<f32>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<String>>;

	fn complete_stream<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		system: &'a str,
		user: &'a str,
		tx: mpsc::Sender<String>,
	) -> BoxFuture<'a, folio_providers::Result<()>>;
}

/// Similarity-search seam over the vector store, injectable for tests.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		lang: Lang,
		limit: u32,
		visibilities: &'a [Visibility],
	) -> BoxFuture<'a, folio_storage::Result<Vec<VectorHit>>>;
}

impl VectorIndex for QdrantStore {
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		lang: Lang,
		limit: u32,
		visibilities: &'a [Visibility],
	) -> BoxFuture<'a, folio_storage::Result<Vec<VectorHit>>> {
		Box::pin(QdrantStore::search(self, vector, lang, limit, visibilities))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, completion: Arc<dyn CompletionProvider>) -> Self {
		Self { embedding, completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		system: &'a str,
		user: &'a str,
	) -> BoxFuture<'a, folio_providers::Result<String>> {
		Box::pin(completion::complete(cfg, system, user))
	}

	fn complete_stream<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		system: &'a str,
		user: &'a str,
		tx: mpsc::Sender<String>,
	) -> BoxFuture<'a, folio_providers::Result<()>> {
		Box::pin(completion::complete_stream(cfg, system, user, tx))
	}
}

pub struct AskService {
	pub cfg: Config,
	pub content: Arc<dyn ContentSource>,
	pub vector: Option<Arc<dyn VectorIndex>>,
	pub providers: Providers,
}
impl AskService {
	pub fn new(cfg: Config, content: Arc<dyn ContentSource>) -> Self {
		Self { cfg, content, vector: None, providers: Providers::default() }
	}

	pub fn with_vector(mut self, vector: Arc<dyn VectorIndex>) -> Self {
		self.vector = Some(vector);

		self
	}

	pub fn with_providers(mut self, providers: Providers) -> Self {
		self.providers = providers;

		self
	}
}
