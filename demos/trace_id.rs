use tracing::{info, info_span, warn};
use tracing_pretty_sink::{HandlerOptions, PrettyLayer, TraceId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Builds the subscriber by hand instead of going through `init`, showing
/// how the layer composes with other `tracing_subscriber` layers.
fn main() {
    let options = HandlerOptions::default()
        .with_level(tracing::Level::INFO)
        .with_source_depth(2);
    let level = options.level;
    let subscriber = Registry::default().with(PrettyLayer::stdout(options).with_filter(level));
    tracing::subscriber::set_global_default(subscriber).expect("set global subscriber");

    for user in ["alice", "bob"] {
        let request = info_span!("request", "trace-id" = %TraceId::new_v4());
        let _guard = request.enter();

        info!(user, "handling request");
        if user == "bob" {
            warn!(user, retries = 3, "upstream slow");
        }
    }

    info!("no request in scope, no trace-id");
}
