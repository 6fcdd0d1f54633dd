use chrono::{DateTime, Local};
use serde::Serialize;
use std::error::Error;
use tracing::Level;

use crate::callsite::CallSite;
use crate::error::FormatError;

/// Value of a single attribute attached to a [`LogRecord`].
///
/// Values that expose an error description are tagged when the attribute is
/// built, so the renderer never has to guess at the concrete type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(serde_json::Value),
    Error {
        /// `Display` output of the error.
        description: String,
        /// `Debug` output of the error, its raw structural form.
        debug: String,
    },
    /// NaN or an infinity, which JSON cannot represent. Rendering a record
    /// holding one fails with [`FormatError::Serialize`].
    NonFinite(f64),
}

impl FieldValue {
    pub fn error<E: Error + ?Sized>(err: &E) -> Self {
        FieldValue::Error {
            description: err.to_string(),
            debug: format!("{:?}", err),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Json(serde_json::Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Json(serde_json::Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Json(serde_json::Value::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Json(serde_json::Value::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => FieldValue::Json(serde_json::Value::Number(number)),
            None => FieldValue::NonFinite(value),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Json(serde_json::Value::from(value))
    }
}

/// One log event as seen by the renderer.
///
/// Built by [`crate::layer::PrettyLayer`] from a `tracing` event, or by hand
/// through the `with_*` builders.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    /// Attributes in the order they were recorded. Duplicate keys are
    /// allowed; the last one wins when rendered.
    pub fields: Vec<(String, FieldValue)>,
    pub call_site: CallSite,
}

impl LogRecord {
    /// Create a record stamped with the current local time and no
    /// attributes or call-site.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogRecord {
            timestamp: Local::now(),
            level,
            message: message.into(),
            fields: Vec::new(),
            call_site: CallSite::default(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_site = call_site;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn with_error<E: Error + ?Sized>(self, key: impl Into<String>, err: &E) -> Self {
        self.with_field(key, FieldValue::error(err))
    }

    /// Attach any serializable value as an attribute.
    ///
    /// **Returns**
    /// - `Err(FormatError::Serialize)` if the value has no JSON
    ///   representation (for example a map keyed by tuples).
    pub fn with_serialized<T: Serialize + ?Sized>(
        self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, FormatError> {
        let value = serde_json::to_value(value)?;
        Ok(self.with_field(key, value))
    }
}
