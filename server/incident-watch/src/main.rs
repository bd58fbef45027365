//! Binary entrypoint: poll the platform regions until interrupted.
//!
//! Configuration comes from the environment (see `Config::from_env`); logs go to
//! stderr, filtered by `RUST_LOG` (default `info`).

use std::sync::Arc;

use incident_watch::{notify, Config, HttpStatusSource, RegionRegistry, Watcher};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let config = match Config::from_env() {
    Ok(c) => c,
    Err(e) => {
      error!(error = %e, "incident-watch: invalid configuration");
      std::process::exit(2);
    }
  };

  let registry = RegionRegistry::platform_defaults();
  let source = Arc::new(HttpStatusSource::new(&config));
  let sink = notify::sink_from_config(&config);
  let mut watcher = Watcher::new(config, registry, source, sink);

  tokio::select! {
    _ = watcher.run() => {}
    _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
  }

  info!(cycle = watcher.tracker().cycle(), "incident-watch stopped");
}
