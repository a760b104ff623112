//! USGS Exporter - Main Process
//!
//! Serves Prometheus metrics for one USGS monitoring site. Every scrape of
//! `/metrics` fetches the latest instantaneous values from the NWIS IV API
//! and updates the gauges before responding.
//!
//! Usage:
//!   cargo run --release
//!
//! Environment:
//!   SITE_ID              - USGS site code (default 04199500)
//!   PARAMS               - comma-separated parameter codes (default 00060)
//!   PORT / LISTEN_ADDR   - listen port or full address (default 0.0.0.0:5050)
//!   USGS_EXPORTER_CONFIG - optional TOML config file
//!   RUST_LOG             - log filter (default info)

use prometheus::Registry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use usgs_exporter::config;
use usgs_exporter::endpoint;
use usgs_exporter::exporter::Exporter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    info!(
        site = %config.site_id,
        params = ?config.params,
        upstream = %config.base_url,
        "starting USGS exporter"
    );

    let listen_addr = config.listen_addr.clone();
    let registry = Registry::new();
    let exporter = match Exporter::new(config, &registry) {
        Ok(exporter) => exporter,
        Err(e) => {
            error!(error = %e, "failed to initialize exporter");
            std::process::exit(1);
        }
    };

    let server = match endpoint::bind(&listen_addr) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "failed to start HTTP endpoint");
            std::process::exit(1);
        }
    };

    endpoint::serve(server, exporter);
}
