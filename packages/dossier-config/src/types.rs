use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub chunking: Chunking,
	pub query: Query,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Origins allowed by the CORS layer. `["*"]` allows any origin.
	pub cors_allowed_origins: Vec<String>,
	#[serde(default = "default_correlation_header")]
	pub correlation_header: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub vector: Vector,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default)]
	pub pool_min_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
	/// Connections older than this are recycled. `None` keeps them forever.
	pub max_lifetime_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Vector {
	/// Backend selector. Only `qdrant` is supported.
	pub backend: String,
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub generation: GenerationProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
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
pub struct GenerationProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Chunking {
	pub max_chars: u32,
	pub overlap_chars: u32,
}

#[derive(Debug, Deserialize)]
pub struct Query {
	pub top_k: u32,
}

fn default_correlation_header() -> String {
	"X-Correlation-ID".to_string()
}

fn default_acquire_timeout_ms() -> u64 {
	30_000
}
