mod common;

use chrono::NaiveDateTime;
use common::{fields, Capture};
use serde_json::json;
use std::io;
use tracing::dispatcher::{self, Dispatch};
use tracing::{debug, error, info, info_span, instrument, trace, warn};
use tracing_pretty_sink::render::TIMESTAMP_FORMAT;
use tracing_pretty_sink::{build_subscriber, HandlerOptions, TraceId};

fn capture_with(options: HandlerOptions, f: impl FnOnce()) -> Capture {
    colored::control::set_override(true);
    let capture = Capture::default();
    tracing::subscriber::with_default(build_subscriber(capture.clone(), options), f);
    capture
}

fn capture(f: impl FnOnce()) -> Capture {
    capture_with(HandlerOptions::default(), f)
}

#[instrument]
fn do_work() -> u32 {
    let line = line!() + 1;
    info!(step = 1, "working");
    line
}

#[test]
fn info_line_has_every_segment_in_order() {
    let out = capture(|| info!(port = 8080, "started")).contents();

    assert!(out.starts_with("\u{1b}[32m"));
    let stamp = &out[5..24];
    assert!(NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok(), "{stamp}");

    let level = out.find("\u{1b}[34mINFO \u{1b}[0m").unwrap();
    let message = out.find(" | started | ").unwrap();
    let function = out.find("\u{1b}[36mpretty\u{1b}[0m").unwrap();
    let file = out.find(" | pretty.rs:").unwrap();
    let block = out.find("\"port\": 8080").unwrap();
    assert!(level < message && message < function && function < file && file < block);

    assert_eq!(fields(&out), json!({"port": 8080}));
    assert!(out.ends_with("}\n"));
}

#[test]
fn one_write_per_event() {
    let capture = capture(|| {
        info!("first");
        warn!(attempt = 2, "second");
    });
    assert_eq!(capture.writes(), 2);
}

#[test]
fn instrumented_function_name_and_line() {
    let mut line = 0;
    let out = capture(|| line = do_work()).contents();

    assert!(out.contains(&format!("\u{1b}[36mdo_work\u{1b}[0m | pretty.rs:{line} ")));
    assert_eq!(fields(&out), json!({"step": 1}));
}

#[test]
fn each_level_has_a_distinct_color() {
    let out = capture(|| {
        trace!("filtered by the default threshold");
        debug!("d");
        info!("i");
        warn!("w");
        error!("e");
    })
    .contents();

    assert!(out.contains("\u{1b}[35mDEBUG\u{1b}[0m | d |"));
    assert!(out.contains("\u{1b}[34mINFO \u{1b}[0m | i |"));
    assert!(out.contains("\u{1b}[33mWARN \u{1b}[0m | w |"));
    assert!(out.contains("\u{1b}[31mERROR\u{1b}[0m | e |"));
    assert!(!out.contains("TRACE"));
}

#[test]
fn events_below_threshold_are_not_rendered() {
    let capture = capture_with(HandlerOptions::default().with_level(tracing::Level::WARN), || {
        debug!("quiet");
        info!("quiet");
        warn!("loud");
    });

    assert_eq!(capture.writes(), 1);
    assert!(capture.contents().contains("| loud |"));
}

#[test]
fn fields_round_trip() {
    let out = capture(|| {
        info!(port = 8080, host = "localhost", tls = true, ratio = 0.5, "configured");
    })
    .contents();

    assert_eq!(
        fields(&out),
        json!({"port": 8080, "host": "localhost", "tls": true, "ratio": 0.5})
    );
}

#[test]
fn non_finite_floats_are_not_written() {
    let capture = capture(|| {
        info!(ratio = f64::NAN, limit = f64::INFINITY, "measured");
        info!(ratio = 0.25, "measured again");
    });

    assert_eq!(capture.writes(), 1);
    let out = capture.contents();
    assert!(!out.contains("| measured |"));
    assert_eq!(fields(&out), json!({"ratio": 0.25}));
}

#[test]
fn err_field_renders_error_description() {
    let failure = io::Error::new(io::ErrorKind::Other, "boom");
    let out = capture(|| {
        error!(err = &failure as &(dyn std::error::Error + 'static), "request failed");
    })
    .contents();

    assert_eq!(fields(&out)["err"], json!("boom"));
    assert!(!out.contains("Custom"));
}

#[test]
fn trace_id_from_enclosing_span() {
    let id = TraceId::new_v4();
    let out = capture(|| {
        let request = info_span!("request", "trace-id" = %id);
        let _request = request.enter();
        let inner = info_span!("db");
        let _inner = inner.enter();
        info!(rows = 3, "queried");
    })
    .contents();

    assert_eq!(fields(&out), json!({"rows": 3, "trace-id": id.to_string()}));
}

#[test]
fn trace_id_recorded_after_span_creation() {
    let id = TraceId::new_v4();
    let out = capture(|| {
        let request = info_span!("request", trace_id = tracing::field::Empty);
        request.record("trace_id", tracing::field::display(id));
        let _request = request.enter();
        info!("handled");
    })
    .contents();

    assert_eq!(fields(&out)["trace-id"], json!(id.to_string()));
}

#[test]
fn missing_or_malformed_trace_id_is_omitted() {
    let out = capture(|| {
        info!("outside any span");
        let request = info_span!("request", trace_id = 42, "trace-id" = "req-7");
        let _request = request.enter();
        info!("inside span without a uuid");
    })
    .contents();

    assert!(!out.contains("\"trace-id\""));
}

#[test]
fn source_capture_can_be_disabled() {
    let out = capture_with(HandlerOptions::default().with_source(false), || info!("plain")).contents();

    assert!(out.contains(" | :0 {}"));
    assert!(!out.contains("pretty.rs"));
}

#[test]
fn deeper_source_paths() {
    let out = capture_with(HandlerOptions::default().with_source_depth(2), || info!("nested")).contents();
    assert!(out.contains(" | tests/pretty.rs:"));
}

#[test]
fn concurrent_events_do_not_interleave() {
    colored::control::set_override(true);
    let capture = Capture::default();
    let dispatch = Dispatch::new(build_subscriber(capture.clone(), HandlerOptions::default()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let dispatch = dispatch.clone();
            std::thread::spawn(move || {
                dispatcher::with_default(&dispatch, || {
                    for n in 0..50 {
                        info!(worker, n, "tick");
                    }
                })
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let out = capture.contents();
    assert_eq!(capture.writes(), 400);
    let records: Vec<&str> = out.split_inclusive("}\n").collect();
    assert_eq!(records.len(), 400);
    for record in records {
        assert!(record.contains(" | tick | "));
        let parsed = fields(record);
        assert!(parsed["worker"].is_u64() && parsed["n"].is_u64());
    }
}
