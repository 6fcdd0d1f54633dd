use crate::error::InitError;
use crate::layer::PrettyLayer;
use std::io;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, Registry};

/// Options for [`PrettyLayer`].
///
/// **Fields**
/// - `level`: minimum severity. Applied as a filter in front of the layer,
///   so events below it are never rendered.
/// - `add_source`: when `false` the function, file and line columns are
///   left empty.
/// - `source_depth`: number of trailing path components shown for the
///   source file. `1` shows the base name only.
#[derive(Clone, Debug)]
pub struct HandlerOptions {
    pub level: LevelFilter,
    pub add_source: bool,
    pub source_depth: usize,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            level: LevelFilter::DEBUG,
            add_source: true,
            source_depth: 1,
        }
    }
}

impl HandlerOptions {
    pub fn with_level(mut self, level: impl Into<LevelFilter>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    pub fn with_source_depth(mut self, depth: usize) -> Self {
        self.source_depth = depth.max(1);
        self
    }
}

/// Build a subscriber that renders through a [`PrettyLayer`] writing to
/// `make_writer`, without installing it.
///
/// Useful with `tracing::subscriber::with_default` to get an isolated
/// instance, e.g. in tests.
pub fn build_subscriber<W>(
    make_writer: W,
    options: HandlerOptions,
) -> impl Subscriber + for<'span> LookupSpan<'span> + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = options.level;
    Registry::default().with(PrettyLayer::new(make_writer, options).with_filter(level))
}

static GLOBAL: OnceLock<Option<HandlerOptions>> = OnceLock::new();

/// Install the pretty layer, writing to stdout, as the global default
/// subscriber.
///
/// Installation happens at most once per process. Later calls do nothing
/// and return the options the first call installed.
///
/// **Returns**
/// - `Err(InitError::ForeignSubscriber)` if another global subscriber was
///   already in place when the first call ran.
pub fn init_with_options(options: HandlerOptions) -> Result<&'static HandlerOptions, InitError> {
    GLOBAL
        .get_or_init(|| {
            let subscriber = build_subscriber(io::stdout, options.clone());
            match tracing::subscriber::set_global_default(subscriber) {
                Ok(()) => Some(options),
                Err(e) => {
                    eprintln!("failed to install pretty log subscriber: {}", e);
                    None
                }
            }
        })
        .as_ref()
        .ok_or(InitError::ForeignSubscriber)
}

/// Initialize logging with defaults: everything from `DEBUG` up, call-site
/// capture on.
///
/// Equivalent to calling [`init_with_options`] with
/// [`HandlerOptions::default`].
pub fn init() -> Result<&'static HandlerOptions, InitError> {
    init_with_options(HandlerOptions::default())
}

/// Options of the globally installed layer, if [`init`] succeeded.
pub fn global_options() -> Option<&'static HandlerOptions> {
    GLOBAL.get().and_then(Option::as_ref)
}
