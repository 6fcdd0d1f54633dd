pub mod callsite;
pub mod context;
pub mod error;
pub mod init;
pub mod layer;
pub mod record;
pub mod render;
pub mod style;

pub use context::TraceId;
pub use error::{FormatError, InitError};
pub use init::{build_subscriber, init, init_with_options, HandlerOptions};
pub use layer::PrettyLayer;
pub use record::{FieldValue, LogRecord};
