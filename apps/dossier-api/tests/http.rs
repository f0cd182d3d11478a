use axum::{
	Router,
	body::{self, Body},
	http::{HeaderName, Request, StatusCode},
	routing::get,
};
use tower::util::ServiceExt;
use uuid::Uuid;

use dossier_api::{middleware, routes, state::AppState};
use dossier_config::{
	Chunking, Config, EmbeddingProviderConfig, GenerationProviderConfig, Postgres,
	Providers as ProviderSettings, Query, Service, Storage, Vector,
};
use dossier_observe::context;
use dossier_testkit::TestDatabase;

const HEADER: &str = "X-Correlation-ID";

fn test_router() -> Router {
	let header = HeaderName::from_bytes(HEADER.as_bytes()).expect("Valid header name.");

	Router::new()
		.route("/ok", get(|| async { "ok" }))
		.route(
			"/current",
			get(|| async {
				context::current()
					.map(|id| id.as_str().to_owned())
					.unwrap_or_else(|| "absent".to_string())
			}),
		)
		.route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
		.layer(axum::middleware::from_fn_with_state(header, middleware::correlation))
}

async fn body_string(response: axum::response::Response) -> String {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");

	String::from_utf8(bytes.to_vec()).expect("Response body is not UTF-8.")
}

#[tokio::test]
async fn echoes_inbound_correlation_header_verbatim() {
	let response = test_router()
		.oneshot(
			Request::builder()
				.uri("/current")
				.header(HEADER, "client-supplied-123")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /current.");

	assert_eq!(
		response.headers().get(HEADER).and_then(|value| value.to_str().ok()),
		Some("client-supplied-123")
	);
	// the same identifier was bound to the handler's flow
	assert_eq!(body_string(response).await, "client-supplied-123");
}

#[tokio::test]
async fn header_casing_is_irrelevant() {
	let response = test_router()
		.oneshot(
			Request::builder()
				.uri("/ok")
				.header("x-correlation-id", "lowercase-cased")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /ok.");

	assert_eq!(
		response.headers().get(HEADER).and_then(|value| value.to_str().ok()),
		Some("lowercase-cased")
	);
}

#[tokio::test]
async fn empty_header_value_gets_a_generated_identifier() {
	let response = test_router()
		.oneshot(
			Request::builder()
				.uri("/ok")
				.header(HEADER, "")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /ok.");
	let value = response
		.headers()
		.get(HEADER)
		.and_then(|value| value.to_str().ok())
		.expect("Header must be set.");

	assert!(!value.is_empty());
}

#[tokio::test]
async fn generates_distinct_identifiers_when_absent() {
	let router = test_router();
	let mut seen = Vec::new();

	for _ in 0..2 {
		let response = router
			.clone()
			.oneshot(
				Request::builder()
					.uri("/ok")
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /ok.");
		let value = response
			.headers()
			.get(HEADER)
			.and_then(|value| value.to_str().ok())
			.expect("Header must be set.")
			.to_owned();

		assert!(!value.is_empty());

		seen.push(value);
	}

	assert_ne!(seen[0], seen[1]);
}

#[tokio::test]
async fn server_error_response_passes_through_decorated() {
	let response = test_router()
		.oneshot(
			Request::builder()
				.uri("/boom")
				.header(HEADER, "failing-request")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /boom.");

	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(
		response.headers().get(HEADER).and_then(|value| value.to_str().ok()),
		Some("failing-request")
	);
}

#[tokio::test]
async fn context_is_absent_outside_a_request_flow() {
	let router = test_router();

	let _ = router
		.oneshot(
			Request::builder()
				.uri("/current")
				.header(HEADER, "short-lived")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /current.");

	assert!(context::current().is_none());
}

const VECTOR_DIM: u32 = 8;

fn test_config(dsn: String, qdrant_url: String, collection: String) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
			cors_allowed_origins: vec!["*".to_string()],
			correlation_header: HEADER.to_string(),
		},
		storage: Storage {
			postgres: Postgres {
				dsn,
				pool_max_conns: 2,
				pool_min_conns: 0,
				acquire_timeout_ms: 30_000,
				max_lifetime_secs: None,
			},
			vector: Vector {
				backend: "qdrant".to_string(),
				url: qdrant_url,
				collection,
				vector_dim: VECTOR_DIM,
			},
		},
		providers: ProviderSettings {
			embedding: EmbeddingProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test".to_string(),
				dimensions: VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			generation: GenerationProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test".to_string(),
				temperature: 0.1,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		chunking: Chunking { max_chars: 120, overlap_chars: 20 },
		query: Query { top_k: 3 },
	}
}

async fn test_env() -> Option<(TestDatabase, String, String)> {
	let Some(base_dsn) = dossier_testkit::env_dsn() else {
		eprintln!("Skipping HTTP tests; set DOSSIER_PG_DSN to run.");

		return None;
	};
	let Some(qdrant_url) = dossier_testkit::env_qdrant_url() else {
		eprintln!("Skipping HTTP tests; set DOSSIER_QDRANT_URL to run.");

		return None;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let collection = test_db.collection_name("dossier_http");

	Some((test_db, qdrant_url, collection))
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set DOSSIER_PG_DSN and DOSSIER_QDRANT_URL to run."]
async fn health_ok() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder().uri("/").body(Body::empty()).expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);

	let json: serde_json::Value = serde_json::from_str(&body_string(response).await)
		.expect("Failed to parse health response.");

	assert_eq!(json["status"], "healthy");
	assert_eq!(json["app_name"], "dossier");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set DOSSIER_PG_DSN and DOSSIER_QDRANT_URL to run."]
async fn upload_with_blank_fields_is_a_validation_failure() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let payload = serde_json::json!({ "filename": "", "content_type": "", "content": "" });
	let response = app
		.oneshot(
			Request::builder()
				.method("POST")
				.uri("/api/v1/documents")
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call upload.");

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

	let json: serde_json::Value = serde_json::from_str(&body_string(response).await)
		.expect("Failed to parse response.");

	assert_eq!(json["error"], "VALIDATION_ERROR");
	assert_eq!(json["message"], "The request contains invalid fields");
	assert_eq!(json["status_code"], 422);
	assert_eq!(json["errors"]["filename"], "required");
	assert_eq!(json["errors"]["content"], "required");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set DOSSIER_PG_DSN and DOSSIER_QDRANT_URL to run."]
async fn fetch_unknown_document_is_a_failure_envelope() {
	let Some((test_db, qdrant_url, collection)) = test_env().await else {
		return;
	};
	let config = test_config(test_db.dsn().to_string(), qdrant_url, collection);
	let state = AppState::new(config).await.expect("Failed to initialize app state.");
	let app = routes::router(state);
	let response = app
		.oneshot(
			Request::builder()
				.uri(format!("/api/v1/documents/{}", Uuid::new_v4()))
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call fetch.");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let json: serde_json::Value = serde_json::from_str(&body_string(response).await)
		.expect("Failed to parse response.");

	assert_eq!(json["status"], "failure");
	assert_eq!(json["status_code"], 404);
	assert_eq!(json["error"], serde_json::json!({}));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
