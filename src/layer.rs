use crate::callsite::{self, CallSite};
use crate::context::{self, TraceId, TraceIdVisitor};
use crate::error::FormatError;
use crate::init::HandlerOptions;
use crate::record::{FieldValue, LogRecord};
use crate::render::render;
use chrono::Local;
use std::error::Error;
use std::io::{self, Write};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that renders every event it sees as one
/// colorized line and writes it to the configured sink.
///
/// The layer does no level filtering of its own; wrap it with the
/// threshold from [`HandlerOptions`] (see [`crate::init::build_subscriber`])
/// so disabled events never reach it.
pub struct PrettyLayer<W = fn() -> io::Stdout> {
    make_writer: W,
    options: HandlerOptions,
}

impl PrettyLayer {
    /// Layer writing to standard output.
    pub fn stdout(options: HandlerOptions) -> Self {
        PrettyLayer::new(io::stdout as fn() -> io::Stdout, options)
    }
}

impl<W> PrettyLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    /// **Parameters**
    /// - `make_writer`: sink for rendered lines. Each line is written with a
    ///   single `write_all` on a fresh writer; wrap non-thread-safe writers
    ///   in a `Mutex` to keep concurrent lines from interleaving.
    /// - `options`: [`HandlerOptions`] captured for the layer's lifetime.
    pub fn new(make_writer: W, options: HandlerOptions) -> Self {
        PrettyLayer { make_writer, options }
    }

    pub fn options(&self) -> &HandlerOptions {
        &self.options
    }

    /// Render `record` and write it to the sink.
    ///
    /// **Returns**
    /// - `Err(FormatError::Serialize)` if the fields could not be
    ///   serialized. Nothing is written in that case.
    /// - `Err(FormatError::Write)` if the sink rejected the line.
    pub fn handle(&self, record: &LogRecord, trace_id: Option<TraceId>) -> Result<(), FormatError> {
        let line = render(record, trace_id)?;
        let mut writer = self.make_writer.make_writer();
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn call_site<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> CallSite
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        if !self.options.add_source {
            return CallSite::default();
        }
        let span_name = ctx
            .event_scope(event)
            .and_then(|mut scope| scope.next())
            .map(|span| span.name());
        callsite::resolve(event.metadata(), span_name, self.options.source_depth)
    }
}

impl<S, W> Layer<S> for PrettyLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = TraceIdVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(trace_id), Some(span)) = (visitor.found, ctx.span(id)) {
            span.extensions_mut().replace(trace_id);
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let mut visitor = TraceIdVisitor::default();
        values.record(&mut visitor);
        if let (Some(trace_id), Some(span)) = (visitor.found, ctx.span(id)) {
            span.extensions_mut().replace(trace_id);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let record = LogRecord {
            timestamp: Local::now(),
            level: *event.metadata().level(),
            message: message.unwrap_or_default(),
            fields,
            call_site: self.call_site(event, &ctx),
        };

        if let Err(e) = self.handle(&record, context::trace_id(event, &ctx)) {
            eprintln!("error writing log record: {}", e);
        }
    }
}

/// Collects event fields into [`FieldValue`]s, pulling out `message`.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut Vec<(String, FieldValue)>,
    pub message: &'a mut Option<String>,
}

impl<'a> FieldVisitor<'a> {
    fn push(&mut self, field: &Field, value: impl Into<FieldValue>) {
        self.fields.push((field.name().to_string(), value.into()));
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.push(field, value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.push(field, FieldValue::error(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, format!("{:?}", value));
        }
    }
}
