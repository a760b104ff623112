/// USGS parameter code registry.
///
/// Maps the parameter codes this exporter knows about to Prometheus metric
/// names and help text. Codes outside the registry still get a metric; its
/// name is generated from the code by `spec_for`.

use crate::model::{ParameterSpec, PARAM_DISCHARGE, PARAM_STAGE, PARAM_TURBIDITY, PARAM_WATER_TEMP};

/// Metric identity for a well-known parameter code.
pub struct KnownParameter {
    /// 5-digit USGS parameter code.
    pub code: &'static str,
    pub metric_name: &'static str,
    pub help: &'static str,
}

/// Parameter codes with curated metric names.
///
/// Source: USGS NWIS parameter code dictionary (help.waterdata.usgs.gov/codes-and-parameters).
pub static PARAMETER_REGISTRY: &[KnownParameter] = &[
    KnownParameter {
        code: PARAM_DISCHARGE,
        metric_name: "usgs_discharge_cfs",
        help: "Streamflow in cubic feet per second",
    },
    KnownParameter {
        code: PARAM_WATER_TEMP,
        metric_name: "usgs_temp_celsius",
        help: "Water temperature in Celsius",
    },
    KnownParameter {
        code: PARAM_STAGE,
        metric_name: "usgs_gage_height_ft",
        help: "Gage height in feet",
    },
    KnownParameter {
        code: PARAM_TURBIDITY,
        metric_name: "usgs_turbidity_ntu",
        help: "Turbidity in NTU",
    },
];

/// Looks up a registry entry by code. Returns `None` if not found.
pub fn find_parameter(code: &str) -> Option<&'static KnownParameter> {
    PARAMETER_REGISTRY.iter().find(|p| p.code == code)
}

/// Resolves the metric identity for any parameter code, falling back to
/// `usgs_param_<code>` for codes outside the registry.
pub fn spec_for(code: &str) -> ParameterSpec {
    find_parameter(code)
        .map(|p| ParameterSpec {
            code: code.to_string(),
            metric_name: p.metric_name.to_string(),
            help: p.help.to_string(),
        })
        .unwrap_or_else(|| ParameterSpec {
            code: code.to_string(),
            metric_name: format!("usgs_param_{}", code),
            help: format!("USGS parameter {}", code),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
