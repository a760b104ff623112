/// Scrape pipeline for one monitored site.
///
/// Each call to `refresh` runs one synchronous cycle:
/// 1. Build the IV request for the trailing lookback window
/// 2. Fetch it (bounded by the configured timeout)
/// 3. Parse the latest valid sample per series
/// 4. Publish samples for configured parameters into the registry
///
/// Nothing in a cycle is fatal. Failures are logged and counted, and the
/// gauges keep whatever values they last held.

use chrono::Utc;
use prometheus::Registry;
use tracing::{debug, error, info, warn};

use crate::config::ExporterConfig;
use crate::ingest::usgs::{self, IvSnapshot, SkipReason};
use crate::metrics::{ScrapeErrorKind, SiteMetrics};
use crate::model::{ExporterError, NwisError};
use crate::parameters;

/// Outcome of one cycle, mostly for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    /// Gauges updated this cycle.
    pub published: usize,
    /// Series that yielded no usable sample.
    pub skipped: usize,
}

/// Owns every piece of mutable exporter state: the metric registry and the
/// site name learned from upstream.
pub struct Exporter {
    config: ExporterConfig,
    client: reqwest::blocking::Client,
    metrics: SiteMetrics,
    /// Set from the first response that reports one, then never changed.
    site_name: Option<String>,
}

impl Exporter {
    /// Registers one gauge per configured parameter on `registry` and
    /// builds the HTTP client.
    pub fn new(config: ExporterConfig, registry: &Registry) -> Result<Self, ExporterError> {
        let specs: Vec<_> = config.params.iter().map(|p| parameters::spec_for(p)).collect();
        let metrics = SiteMetrics::new(registry, &config.site_id, &specs)?;
        let client = usgs::build_client(config.http_timeout())?;

        for spec in &specs {
            debug!(code = %spec.code, metric = %spec.metric_name, "registered gauge");
        }

        Ok(Self {
            config,
            client,
            metrics,
            site_name: None,
        })
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    pub fn site_name(&self) -> Option<&str> {
        self.site_name.as_deref()
    }

    /// IV request URL for a window ending now.
    pub fn request_url(&self) -> String {
        let (start, end) = usgs::request_window(Utc::now(), self.config.lookback());
        let params: Vec<&str> = self.config.params.iter().map(String::as_str).collect();
        usgs::build_iv_url(&self.config.base_url, &self.config.site_id, &params, start, end)
    }

    /// Runs one fetch, parse, publish cycle. Errors are logged, never
    /// returned.
    pub fn refresh(&mut self) -> ScrapeSummary {
        let url = self.request_url();
        info!(
            site = %self.config.site_id,
            params = ?self.config.params,
            "fetching USGS data"
        );

        let body = match usgs::fetch_iv(&self.client, &url) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "error fetching USGS data");
                self.metrics.record_error(ScrapeErrorKind::Fetch);
                self.metrics.record_scrape(false);
                return ScrapeSummary::default();
            }
        };

        match self.apply_response(&body) {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "error parsing USGS data");
                ScrapeSummary::default()
            }
        }
    }

    /// Parses an IV response body and publishes its samples.
    ///
    /// # Errors
    /// `NwisError::ParseError` when the body is not a usable envelope; no
    /// gauge is touched in that case.
    pub fn apply_response(&mut self, body: &str) -> Result<ScrapeSummary, NwisError> {
        let snapshot = match usgs::parse_latest(body) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.metrics.record_error(ScrapeErrorKind::Decode);
                self.metrics.record_scrape(false);
                return Err(e);
            }
        };
        self.metrics.record_scrape(true);
        Ok(self.publish(snapshot))
    }

    /// Serializes the registry for `/metrics`.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        self.metrics.render()
    }

    fn publish(&mut self, snapshot: IvSnapshot) -> ScrapeSummary {
        if self.site_name.is_none() {
            if let Some(name) = snapshot.site_name {
                info!(site = %self.config.site_id, site_name = %name, "learned site name");
                self.site_name = Some(name);
            }
        }

        for skipped in &snapshot.skipped {
            let kind = match skipped.reason {
                SkipReason::Malformed(_) => ScrapeErrorKind::Series,
                _ => ScrapeErrorKind::Value,
            };
            self.metrics.record_error(kind);
        }

        // No gauge is set until a site name is known.
        let Some(site_name) = self.site_name.as_deref() else {
            if !snapshot.observations.is_empty() {
                warn!(
                    site = %self.config.site_id,
                    "no site name reported yet, holding samples until one is"
                );
            }
            return ScrapeSummary {
                published: 0,
                skipped: snapshot.skipped.len(),
            };
        };

        let mut published = 0;
        for obs in &snapshot.observations {
            if self.metrics.publish(obs, site_name) {
                info!(
                    parameter = %obs.parameter_code,
                    value = obs.value,
                    site = %self.config.site_id,
                    site_name = %site_name,
                    "set gauge"
                );
                published += 1;
            } else {
                debug!(parameter = %obs.parameter_code, "ignoring unconfigured parameter");
            }
        }

        for code in &self.config.params {
            if !snapshot.observations.iter().any(|o| &o.parameter_code == code) {
                debug!(parameter = %code, "no usable sample this cycle");
            }
        }

        ScrapeSummary {
            published,
            skipped: snapshot.skipped.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
