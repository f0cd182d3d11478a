pub mod delete;
pub mod fetch;
pub mod list;
pub mod query;
pub mod time_serde;
pub mod upload;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use dossier_config::{Config, EmbeddingProviderConfig, GenerationProviderConfig};
use dossier_storage::{db::Db, qdrant::QdrantStore};

pub use query::{QueryData, QueryRequest, RetrievalChunk};
pub use upload::{DocumentData, UploadRequest};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, dossier_providers::Result<Vec<Vec<f32>>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	fn answer<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		question: &'a str,
		context_chunks: &'a [String],
	) -> BoxFuture<'a, dossier_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}
impl Providers {
	/// Providers backed by the HTTP endpoints from the configuration.
	pub fn http() -> Self {
		Self { embedding: Arc::new(HttpEmbedding), generation: Arc::new(HttpGeneration) }
	}
}

struct HttpEmbedding;
impl EmbeddingProvider for HttpEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, dossier_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(dossier_providers::embedding::embed(cfg, texts))
	}
}

struct HttpGeneration;
impl GenerationProvider for HttpGeneration {
	fn answer<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		question: &'a str,
		context_chunks: &'a [String],
	) -> BoxFuture<'a, dossier_providers::Result<String>> {
		Box::pin(dossier_providers::generation::answer(cfg, question, context_chunks))
	}
}

pub struct DossierService {
	pub cfg: Config,
	pub db: Db,
	pub qdrant: QdrantStore,
	pub providers: Providers,
}
impl DossierService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore, providers: Providers) -> Self {
		Self { cfg, db, qdrant, providers }
	}
}
