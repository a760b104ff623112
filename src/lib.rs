/// usgs_exporter: Prometheus exporter for USGS NWIS instantaneous values.
///
/// # Module structure
///
/// ```text
/// usgs_exporter
/// ├── model       — shared data types (Observation, ParameterSpec, errors, …)
/// ├── config      — defaults + usgs_exporter.toml + environment overrides
/// ├── parameters  — USGS parameter code → metric name registry
/// ├── ingest
/// │   ├── usgs    — USGS NWIS IV API: URL construction, fetch, JSON parsing
/// │   └── fixtures (test only) — representative API response payloads
/// ├── metrics     — gauge registration and text exposition
/// ├── exporter    — per-scrape fetch → parse → publish cycle
/// └── endpoint    — tiny_http server for / and /metrics
/// ```

/// Public modules
pub mod config;
pub mod endpoint;
pub mod exporter;
pub mod ingest;
pub mod metrics;
pub mod model;
pub mod parameters;
