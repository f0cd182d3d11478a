mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Chunking, Config, EmbeddingProviderConfig, GenerationProviderConfig, Postgres, Providers,
	Query, Service, Storage, Vector,
};

use std::{fs, path::Path};

pub const VECTOR_BACKEND_QDRANT: &str = "qdrant";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.correlation_header.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.correlation_header must be non-empty.".to_string(),
		});
	}
	if cfg.service.cors_allowed_origins.iter().any(|origin| origin.trim().is_empty()) {
		return Err(Error::Validation {
			message: "service.cors_allowed_origins entries must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_min_conns > cfg.storage.postgres.pool_max_conns {
		return Err(Error::Validation {
			message: "storage.postgres.pool_min_conns must not exceed pool_max_conns.".to_string(),
		});
	}
	if cfg.storage.vector.backend != VECTOR_BACKEND_QDRANT {
		return Err(Error::Validation {
			message: "storage.vector.backend must be qdrant.".to_string(),
		});
	}
	if cfg.storage.vector.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.vector.collection must be non-empty.".to_string(),
		});
	}
	if cfg.storage.vector.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.vector.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.vector.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.vector.vector_dim."
				.to_string(),
		});
	}
	if cfg.chunking.max_chars == 0 {
		return Err(Error::Validation {
			message: "chunking.max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.chunking.overlap_chars >= cfg.chunking.max_chars {
		return Err(Error::Validation {
			message: "chunking.overlap_chars must be less than chunking.max_chars.".to_string(),
		});
	}
	if cfg.query.top_k == 0 {
		return Err(Error::Validation {
			message: "query.top_k must be greater than zero.".to_string(),
		});
	}

	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("generation", &cfg.providers.generation.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.correlation_header = cfg.service.correlation_header.trim().to_string();
	cfg.service
		.cors_allowed_origins
		.iter_mut()
		.for_each(|origin| *origin = origin.trim().to_string());
}
