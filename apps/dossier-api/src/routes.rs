use std::collections::BTreeMap;

use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde_json::{Value, json};
use uuid::Uuid;

use dossier_observe::SERVICE_NAME;
use dossier_service::{Error as ServiceError, QueryRequest, UploadRequest};

use crate::{envelope, state::AppState};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(health))
		.route("/api/v1/documents", post(upload).get(list))
		.route("/api/v1/documents/{doc_id}", get(fetch).delete(remove))
		.route("/api/v1/query", post(query))
		.with_state(state)
}

async fn health() -> Json<Value> {
	Json(json!({ "status": "healthy", "app_name": SERVICE_NAME }))
}

async fn upload(
	State(state): State<AppState>,
	Json(payload): Json<UploadRequest>,
) -> Result<Response, ApiError> {
	let data = state.service.upload(payload).await?;

	Ok(envelope::success(
		StatusCode::CREATED,
		"Document uploaded successfully",
		Some(to_value(&data)?),
	)
	.into_response())
}

async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
	let data = state.service.list().await?;

	Ok(envelope::success(
		StatusCode::OK,
		"Documents retrieved successfully",
		Some(json!({ "documents": to_value(&data)? })),
	)
	.into_response())
}

async fn fetch(
	State(state): State<AppState>,
	Path(doc_id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let data = state.service.fetch(doc_id).await?;

	Ok(envelope::success(
		StatusCode::OK,
		"Document retrieved successfully",
		Some(to_value(&data)?),
	)
	.into_response())
}

async fn remove(
	State(state): State<AppState>,
	Path(doc_id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete(doc_id).await?;

	Ok(envelope::success(StatusCode::OK, "Document deleted successfully", None).into_response())
}

async fn query(
	State(state): State<AppState>,
	Json(payload): Json<QueryRequest>,
) -> Result<Response, ApiError> {
	let data = state.service.query(payload).await?;

	Ok(envelope::success(StatusCode::OK, "Query processed successfully", Some(to_value(&data)?))
		.into_response())
}

fn to_value<T>(data: &T) -> Result<Value, ApiError>
where
	T: serde::Serialize,
{
	serde_json::to_value(data).map_err(|err| {
		tracing::error!(error = %err, "Failed to serialize response data.");

		ApiError::Failure {
			status: StatusCode::INTERNAL_SERVER_ERROR,
			message: "Internal server error".to_string(),
		}
	})
}

#[derive(Debug)]
pub enum ApiError {
	Validation { errors: BTreeMap<String, String> },
	Failure { status: StatusCode, message: String },
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::Validation { errors } => Self::Validation { errors },
			ServiceError::NotFound { message } =>
				Self::Failure { status: StatusCode::NOT_FOUND, message },
			ServiceError::Provider { message } => {
				tracing::error!(error = %message, "Provider call failed.");

				Self::Failure {
					status: StatusCode::BAD_GATEWAY,
					message: "Upstream provider error".to_string(),
				}
			},
			ServiceError::Storage { message } | ServiceError::VectorStore { message } => {
				tracing::error!(error = %message, "Storage operation failed.");

				Self::Failure {
					status: StatusCode::INTERNAL_SERVER_ERROR,
					message: "Internal server error".to_string(),
				}
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		match self {
			Self::Validation { errors } => envelope::validation_failure(errors).into_response(),
			Self::Failure { status, message } =>
				envelope::failure(status, message, None).into_response(),
		}
	}
}
