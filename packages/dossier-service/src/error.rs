use std::collections::BTreeMap;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("The request contains invalid fields.")]
	Validation { errors: BTreeMap<String, String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Vector store error: {message}")]
	VectorStore { message: String },
}
impl Error {
	pub(crate) fn field(name: &str, reason: &str) -> Self {
		Self::Validation { errors: BTreeMap::from([(name.to_string(), reason.to_string())]) }
	}
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<dossier_storage::Error> for Error {
	fn from(err: dossier_storage::Error) -> Self {
		match err {
			dossier_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			dossier_storage::Error::InvalidArgument(message) => Self::Storage { message },
			dossier_storage::Error::NotFound(message) => Self::NotFound { message },
			dossier_storage::Error::Qdrant(inner) =>
				Self::VectorStore { message: inner.to_string() },
		}
	}
}
impl From<dossier_providers::Error> for Error {
	fn from(err: dossier_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
