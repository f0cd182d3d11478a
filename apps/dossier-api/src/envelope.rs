use std::collections::BTreeMap;

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";
pub const VALIDATION_ERROR_MESSAGE: &str = "The request contains invalid fields";

/// Every handler response is one of these three shapes; clients discriminate
/// success from failure by the `status` field alone. All constructors are
/// pure; the `IntoResponse` impls are the only place HTTP types appear.
#[derive(Debug, Serialize)]
pub struct SuccessEnvelope {
	pub status: &'static str,
	pub status_code: u16,
	pub message: String,
	pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct FailureEnvelope {
	pub status: &'static str,
	pub status_code: u16,
	pub message: String,
	pub error: Value,
}

#[derive(Debug, Serialize)]
pub struct ValidationEnvelope {
	pub error: &'static str,
	pub message: &'static str,
	pub status_code: u16,
	pub errors: BTreeMap<String, String>,
}

pub fn success(
	status_code: StatusCode,
	message: impl Into<String>,
	data: Option<Value>,
) -> SuccessEnvelope {
	SuccessEnvelope {
		status: "success",
		status_code: status_code.as_u16(),
		message: message.into(),
		data: data.unwrap_or_else(empty_object),
	}
}

pub fn failure(
	status_code: StatusCode,
	message: impl Into<String>,
	context: Option<Value>,
) -> FailureEnvelope {
	FailureEnvelope {
		status: "failure",
		status_code: status_code.as_u16(),
		message: message.into(),
		error: context.unwrap_or_else(empty_object),
	}
}

pub fn validation_failure(errors: BTreeMap<String, String>) -> ValidationEnvelope {
	ValidationEnvelope {
		error: VALIDATION_ERROR_CODE,
		message: VALIDATION_ERROR_MESSAGE,
		status_code: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
		errors,
	}
}

fn empty_object() -> Value {
	Value::Object(Map::new())
}

impl IntoResponse for SuccessEnvelope {
	fn into_response(self) -> Response {
		let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);

		(status, Json(self)).into_response()
	}
}
impl IntoResponse for FailureEnvelope {
	fn into_response(self) -> Response {
		let status =
			StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self)).into_response()
	}
}
impl IntoResponse for ValidationEnvelope {
	fn into_response(self) -> Response {
		(StatusCode::UNPROCESSABLE_ENTITY, Json(self)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn success_defaults_data_to_an_empty_object() {
		let body = serde_json::to_value(success(StatusCode::OK, "ok", None))
			.expect("Envelope must serialize.");

		assert_eq!(
			body,
			json!({ "status": "success", "status_code": 200, "message": "ok", "data": {} })
		);
	}

	#[test]
	fn success_carries_data_verbatim() {
		let data = json!({ "id": "doc-1", "chunk_count": 3 });
		let body = serde_json::to_value(success(StatusCode::CREATED, "created", Some(data.clone())))
			.expect("Envelope must serialize.");

		assert_eq!(body["status_code"], 201);
		assert_eq!(body["data"], data);
	}

	#[test]
	fn failure_defaults_error_to_an_empty_object() {
		let body = serde_json::to_value(failure(StatusCode::NOT_FOUND, "not found", None))
			.expect("Envelope must serialize.");

		assert_eq!(
			body,
			json!({
				"status": "failure",
				"status_code": 404,
				"message": "not found",
				"error": {}
			})
		);
	}

	#[test]
	fn validation_failure_is_fixed_shape() {
		let errors = BTreeMap::from([("field".to_string(), "required".to_string())]);
		let body = serde_json::to_value(validation_failure(errors))
			.expect("Envelope must serialize.");

		assert_eq!(
			body,
			json!({
				"error": "VALIDATION_ERROR",
				"message": "The request contains invalid fields",
				"status_code": 422,
				"errors": { "field": "required" }
			})
		);
	}
}
