/// Prometheus publishing for one monitored site.
///
/// All gauges are created and registered once, up front, and are only ever
/// overwritten afterwards. A failed scrape leaves the previous values in
/// place.

use std::collections::HashMap;

use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

use crate::model::{Observation, ParameterSpec};

const LABEL_SITE: &str = "site";
const LABEL_SITE_NAME: &str = "site_name";
const LABEL_PARAMETER: &str = "parameter";
const LABEL_KIND: &str = "kind";

/// Categories for `usgs_exporter_scrape_errors_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeErrorKind {
    /// Connection, timeout, or non-2xx response.
    Fetch,
    /// Body was not a usable IV envelope.
    Decode,
    /// A single timeSeries entry was malformed.
    Series,
    /// A latest value was missing, the sentinel, or non-numeric.
    Value,
}

impl ScrapeErrorKind {
    const ALL: [ScrapeErrorKind; 4] = [Self::Fetch, Self::Decode, Self::Series, Self::Value];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Decode => "decode",
            Self::Series => "series",
            Self::Value => "value",
        }
    }
}

/// Holder for every metric the exporter publishes.
///
/// One gauge family per configured parameter, each labelled with the site
/// code and the learned site name, plus a few exporter health metrics.
pub struct SiteMetrics {
    registry: Registry,
    site: String,
    gauges: HashMap<String, GaugeVec>,
    observed_at: GaugeVec,
    scrape_success: Gauge,
    scrape_errors: IntCounterVec,
}

impl SiteMetrics {
    /// Creates a gauge for each parameter and registers everything with the
    /// provided `Registry`.
    ///
    /// # Errors
    /// Returns the underlying error if a metric name is invalid or already
    /// registered.
    pub fn new(
        registry: &Registry,
        site: &str,
        params: &[ParameterSpec],
    ) -> Result<Self, prometheus::Error> {
        let mut gauges = HashMap::with_capacity(params.len());
        for spec in params {
            let gauge = GaugeVec::new(
                Opts::new(spec.metric_name.as_str(), spec.help.as_str()),
                &[LABEL_SITE, LABEL_SITE_NAME],
            )?;
            registry.register(Box::new(gauge.clone()))?;
            gauges.insert(spec.code.clone(), gauge);
        }

        let observed_at = GaugeVec::new(
            Opts::new(
                "usgs_observation_timestamp_seconds",
                "Unix time of the latest published sample",
            ),
            &[LABEL_SITE, LABEL_SITE_NAME, LABEL_PARAMETER],
        )?;
        let scrape_success = Gauge::with_opts(Opts::new(
            "usgs_exporter_scrape_success",
            "Whether the last upstream fetch and decode succeeded (1) or not (0)",
        ))?;
        let scrape_errors = IntCounterVec::new(
            Opts::new(
                "usgs_exporter_scrape_errors_total",
                "Upstream problems encountered while scraping, by kind",
            ),
            &[LABEL_KIND],
        )?;

        registry.register(Box::new(observed_at.clone()))?;
        registry.register(Box::new(scrape_success.clone()))?;
        registry.register(Box::new(scrape_errors.clone()))?;

        for kind in ScrapeErrorKind::ALL {
            scrape_errors.with_label_values(&[kind.as_str()]);
        }

        Ok(Self {
            registry: registry.clone(),
            site: site.to_string(),
            gauges,
            observed_at,
            scrape_success,
            scrape_errors,
        })
    }

    /// Sets the gauge for the observation's parameter.
    ///
    /// Returns `false` without touching anything when the parameter was not
    /// configured.
    pub fn publish(&self, obs: &Observation, site_name: &str) -> bool {
        let Some(gauge) = self.gauges.get(&obs.parameter_code) else {
            return false;
        };

        gauge
            .with_label_values(&[self.site.as_str(), site_name])
            .set(obs.value);

        if let Some(ts) = obs.timestamp_secs() {
            self.observed_at
                .with_label_values(&[self.site.as_str(), site_name, obs.parameter_code.as_str()])
                .set(ts);
        }
        true
    }

    pub fn record_scrape(&self, success: bool) {
        self.scrape_success.set(if success { 1.0 } else { 0.0 });
    }

    pub fn record_error(&self, kind: ScrapeErrorKind) {
        self.scrape_errors.with_label_values(&[kind.as_str()]).inc();
    }

    /// Serializes every metric in the registry to the text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    /// Content type matching `render()` output.
    pub fn content_type() -> String {
        TextEncoder::new().format_type().to_string()
    }
}
