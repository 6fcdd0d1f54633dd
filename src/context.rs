//! Request correlation through the ambient span context.
//!
//! A span declares a correlation id with a field named `trace-id` (or
//! `trace_id`). [`crate::layer::PrettyLayer`] parses it when the span is
//! created or recorded and stores a [`TraceId`] in the span's extensions;
//! [`trace_id`] later finds it from any event emitted inside that span.

use std::fmt;
use std::str::FromStr;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use uuid::Uuid;

/// Attribute key the correlation id is rendered under.
pub const TRACE_ID_KEY: &str = "trace-id";

/// Correlation identifier of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn new_v4() -> Self {
        TraceId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for TraceId {
    fn from(value: Uuid) -> Self {
        TraceId(value)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(TraceId)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Find the correlation id for `event`, searching its span scope from the
/// innermost span outward. Spans without a well-formed id are skipped.
pub fn trace_id<S>(event: &Event<'_>, ctx: &Context<'_, S>) -> Option<TraceId>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    for span in ctx.event_scope(event)? {
        let extensions = span.extensions();
        if let Some(id) = extensions.get::<TraceId>() {
            return Some(*id);
        }
    }
    None
}

fn is_trace_id_field(name: &str) -> bool {
    name == TRACE_ID_KEY || name == "trace_id"
}

/// Picks a [`TraceId`] out of span fields. Values that do not parse as a
/// UUID are ignored.
#[derive(Default)]
pub(crate) struct TraceIdVisitor {
    pub(crate) found: Option<TraceId>,
}

impl Visit for TraceIdVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if is_trace_id_field(field.name()) {
            if let Ok(id) = value.parse() {
                self.found = Some(id);
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if is_trace_id_field(field.name()) {
            if let Ok(id) = format!("{:?}", value).parse() {
                self.found = Some(id);
            }
        }
    }
}
