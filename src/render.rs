//! Turns a [`LogRecord`] into a single colorized line:
//!
//! ```text
//! <timestamp> | <level> | <message> | <function> | <file>:<line> <fields as indented JSON>
//! ```

use serde::ser::Error as _;
use serde_json::{Map, Value};

use crate::context::{TraceId, TRACE_ID_KEY};
use crate::error::FormatError;
use crate::record::{FieldValue, LogRecord};
use crate::style;

/// Key whose error values are replaced by their description.
pub const ERR_KEY: &str = "err";

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Collect record attributes into a JSON object.
///
/// An error under [`ERR_KEY`] is rendered through its `Display` impl; under
/// any other key it keeps its `Debug` form. Later duplicates overwrite
/// earlier ones.
///
/// **Returns**
/// - `Err(FormatError::Serialize)` if a field holds a non-finite float.
pub fn collect_fields(fields: &[(String, FieldValue)]) -> Result<Map<String, Value>, FormatError> {
    let mut map = Map::new();
    for (key, value) in fields {
        let value = match value {
            FieldValue::NonFinite(value) => {
                return Err(FormatError::Serialize(serde_json::Error::custom(format!(
                    "field `{}` holds {}, which has no JSON representation",
                    key, value
                ))));
            }
            FieldValue::Json(value) => value.clone(),
            FieldValue::Error { description, .. } if key == ERR_KEY => {
                Value::String(description.clone())
            }
            FieldValue::Error { debug, .. } => Value::String(debug.clone()),
        };
        map.insert(key.clone(), value);
    }
    Ok(map)
}

/// Render `record` into one line, trailing newline included.
///
/// `trace_id`, when present, is added to the attributes under
/// [`TRACE_ID_KEY`] and overrides an attribute of the same name.
pub fn render(record: &LogRecord, trace_id: Option<TraceId>) -> Result<String, FormatError> {
    let mut fields = collect_fields(&record.fields)?;
    if let Some(id) = trace_id {
        fields.insert(TRACE_ID_KEY.to_string(), Value::String(id.to_string()));
    }
    let blob = serde_json::to_string_pretty(&fields)?;

    let timestamp = record.timestamp.format(TIMESTAMP_FORMAT).to_string();

    Ok(format!(
        "{} | {} | {} | {} | {}:{} {}\n",
        style::timestamp(&timestamp),
        style::level_label(&record.level),
        record.message,
        style::function(&record.call_site.function),
        record.call_site.file,
        record.call_site.line,
        blob,
    ))
}
