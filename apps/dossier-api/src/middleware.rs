use std::net::SocketAddr;

use axum::{
	extract::{ConnectInfo, Request, State},
	http::{HeaderName, HeaderValue},
	middleware::Next,
	response::Response,
};

use dossier_observe::{CorrelationId, context};

/// Resolves or generates the correlation identifier for each request, binds
/// it to the task-local context for the duration of the delegated call, and
/// decorates the response with it.
///
/// A non-empty inbound header value is used verbatim (header-name matching
/// is case-insensitive by construction); otherwise a fresh identifier is
/// generated. The context binding is released on every exit path when the
/// scope ends, including cancellation.
pub async fn correlation(
	State(header): State<HeaderName>,
	request: Request,
	next: Next,
) -> Response {
	let correlation_id = request
		.headers()
		.get(&header)
		.and_then(|value| value.to_str().ok())
		.filter(|value| !value.is_empty())
		.map(CorrelationId::new)
		.unwrap_or_else(CorrelationId::generate);
	let method = request.method().clone();
	let path = request.uri().path().to_owned();
	let client = request
		.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|info| info.0.to_string())
		.unwrap_or_else(|| "unknown".to_string());

	context::scope(correlation_id.clone(), async move {
		tracing::info!(method = %method, path = %path, client = %client, "Incoming request.");

		let mut response = next.run(request).await;

		match HeaderValue::from_str(correlation_id.as_str()) {
			Ok(value) => {
				response.headers_mut().insert(header, value);
			},
			// the identifier still reached the context and the logs; it just
			// cannot round-trip into a response header
			Err(_) => tracing::warn!("Correlation identifier is not a valid header value."),
		}

		let status = response.status();

		if status.is_server_error() {
			tracing::error!(method = %method, path = %path, status = %status, "Request failed.");
		} else {
			tracing::info!(
				method = %method,
				path = %path,
				status = %status,
				"Completed request."
			);
		}

		response
	})
	.await
}
