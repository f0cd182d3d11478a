use std::{
	fmt::{self, Write as _},
	str::FromStr,
	sync::OnceLock,
};

use serde_json::json;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{
	Event, Level, Subscriber,
	field::{Field, Visit},
};
use tracing_subscriber::{
	fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
	registry::LookupSpan,
};

use crate::context;

/// Service name stamped on every log line.
pub const SERVICE_NAME: &str = "dossier";

const ABSENT_CORRELATION_ID: &str = "N/A";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the process-wide logging sink.
///
/// The first call attaches a single stdout writer emitting one JSON object
/// per line and returns `true`. Every later call leaves the installed sink
/// untouched and returns `false`, so a supervisor that re-runs startup can
/// never attach a duplicate writer. Unrecognized level names fall back to
/// `info`.
pub fn init(level: &str) -> bool {
	let mut first = false;

	INSTALLED.get_or_init(|| {
		let _ = tracing_subscriber::fmt()
			.event_format(JsonFormat)
			.with_max_level(resolve_level(level))
			.try_init();

		first = true;
	});

	first
}

/// Resolves a level name case-insensitively, falling back to `info`.
pub fn resolve_level(level: &str) -> Level {
	Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

/// One-line JSON event format:
/// `{timestamp, level, correlation_id, service, message, module, function}`.
///
/// The correlation identifier is read from the task-local context at
/// emission time, so every record carries whatever binding is current in
/// its emitting flow. `function` carries the emitting source location
/// (`file:line`), the closest stable analogue Rust offers to a function
/// identifier.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormat;
impl<S, N> FormatEvent<S, N> for JsonFormat
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
{
	fn format_event(
		&self,
		_ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &Event<'_>,
	) -> fmt::Result {
		let meta = event.metadata();
		let mut visitor = MessageVisitor::default();

		event.record(&mut visitor);

		let timestamp = OffsetDateTime::now_utc().format(&Rfc3339).map_err(|_| fmt::Error)?;
		let correlation_id = context::current()
			.map(|id| id.as_str().to_owned())
			.unwrap_or_else(|| ABSENT_CORRELATION_ID.to_owned());
		let line = json!({
			"timestamp": timestamp,
			"level": meta.level().as_str(),
			"correlation_id": correlation_id,
			"service": SERVICE_NAME,
			"message": visitor.render(),
			"module": meta.module_path().unwrap_or("unknown"),
			"function": source_location(meta.file(), meta.line()),
		});

		writeln!(writer, "{line}")
	}
}

fn source_location(file: Option<&str>, line: Option<u32>) -> String {
	match (file, line) {
		(Some(file), Some(line)) => format!("{file}:{line}"),
		(Some(file), None) => file.to_owned(),
		_ => "unknown".to_owned(),
	}
}

#[derive(Default)]
struct MessageVisitor {
	message: String,
	fields: Vec<String>,
}
impl MessageVisitor {
	fn render(self) -> String {
		let mut out = self.message;

		for field in self.fields {
			if !out.is_empty() {
				out.push(' ');
			}

			out.push_str(&field);
		}

		out
	}
}
impl Visit for MessageVisitor {
	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message = value.to_owned();
		} else {
			self.fields.push(format!("{}={value}", field.name()));
		}
	}

	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			self.message = format!("{value:?}");
		} else {
			self.fields.push(format!("{}={value:?}", field.name()));
		}
	}
}
