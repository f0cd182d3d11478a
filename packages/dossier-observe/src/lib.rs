pub mod context;
pub mod logging;

pub use context::CorrelationId;
pub use logging::{JsonFormat, SERVICE_NAME};
