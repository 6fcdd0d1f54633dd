use std::io;
use tracing::{debug, error, info, instrument, warn};
use tracing_pretty_sink::init::init;

#[instrument]
fn open_listener(port: u16) -> Result<(), io::Error> {
    info!(port, "binding listener");
    Err(io::Error::new(io::ErrorKind::AddrInUse, "address already in use"))
}

fn main() {
    if let Err(e) = init() {
        eprintln!("logging not initialized: {}", e);
        return;
    }

    debug!(config = "default.toml", "loading configuration");
    info!(port = 8080, "started");
    warn!(free_mb = 512, "disk space low");

    if let Err(err) = open_listener(8080) {
        error!(err = &err as &(dyn std::error::Error + 'static), "failed to open listener");
    }
}
