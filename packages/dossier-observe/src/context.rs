use std::{fmt, future::Future};

use uuid::Uuid;

tokio::task_local! {
	static CORRELATION_ID: CorrelationId;
}

/// Opaque token tying together all log lines and the response belonging to
/// one inbound request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(String);
impl CorrelationId {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn generate() -> Self {
		Self(Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for CorrelationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Runs `fut` with `id` bound as the calling task's correlation identifier.
///
/// The binding is visible to every read made below this frame, invisible to
/// other tasks, and released when the returned future completes or is
/// dropped. Nested scopes shadow the outer binding.
pub async fn scope<F>(id: CorrelationId, fut: F) -> F::Output
where
	F: Future,
{
	CORRELATION_ID.scope(id, fut).await
}

/// Returns the correlation identifier bound to the calling task, or `None`
/// outside any request flow.
pub fn current() -> Option<CorrelationId> {
	CORRELATION_ID.try_with(|id| id.clone()).ok()
}
