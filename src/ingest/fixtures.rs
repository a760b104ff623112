/// Test fixtures: representative JSON payloads from the USGS IV API.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parser. They reflect the WaterML-as-JSON
/// envelope returned by:
///   https://waterservices.usgs.gov/nwis/iv/?format=json&...
///
/// USGS IV response shape:
///   response.value.timeSeries[]
///     .sourceInfo.siteName
///     .sourceInfo.siteCode[0].value  — site number (string)
///     .variable.variableCode[0].value — parameter code (string)
///     .variable.noDataValue          — sentinel for missing data (-999999)
///     .values[].value[]               — one block per method/sensor
///       .value     — the measurement as a STRING (not a number)
///       .dateTime  — ISO 8601 with offset
///
/// Value lists are in chronological order, so the last entry is the latest.

/// Vermilion River (04199500) with discharge and gage height. Discharge
/// has three samples; only the last ("123.4") should be published.
#[cfg(test)]
pub(crate) fn fixture_vermilion_json() -> &'static str {
    r#"{
      "name": "ns1:timeSeriesResponseType",
      "value": {
        "queryInfo": { "queryURL": "http://waterservices.usgs.gov/nwis/iv/format=json&sites=04199500" },
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS", "vocabulary": "NWIS:UnitValues" }],
              "variableName": "Streamflow, ft&#179;/s",
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "118.0", "qualifiers": ["P"], "dateTime": "2024-05-01T11:30:00.000-04:00" },
                { "value": "120.9", "qualifiers": ["P"], "dateTime": "2024-05-01T11:45:00.000-04:00" },
                { "value": "123.4", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": [{ "qualifierCode": "P", "qualifierDescription": "Provisional data subject to revision." }]
            }],
            "name": "USGS:04199500:00060:00000"
          },
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS", "vocabulary": "NWIS:UnitValues" }],
              "variableName": "Gage height, ft",
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.19", "qualifiers": ["P"], "dateTime": "2024-05-01T11:45:00.000-04:00" },
                { "value": "3.21", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }],
            "name": "USGS:04199500:00065:00000"
          }
        ]
      }
    }"#
}

/// Discharge whose latest sample is the USGS sentinel -999999: a timestamp
/// is present but the measurement is explicitly missing.
#[cfg(test)]
pub(crate) fn fixture_sentinel_no_data_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "unit": { "unitCode": "ft3/s" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "130.2", "qualifiers": ["P"], "dateTime": "2024-05-01T11:45:00.000-04:00" },
                { "value": "-999999", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}

/// Two `values[]` blocks for one parameter (e.g. two sensors). The blocks
/// are concatenated, so the latest sample comes from the second block.
#[cfg(test)]
pub(crate) fn fixture_multiple_value_blocks_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00010", "network": "NWIS" }],
              "unit": { "unitCode": "deg C" },
              "noDataValue": -999999.0
            },
            "values": [
              {
                "value": [
                  { "value": "14.1", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
                ],
                "method": [{ "methodDescription": "[Upper sensor]" }]
              },
              {
                "value": [
                  { "value": "12.6", "qualifiers": ["P"], "dateTime": "2024-05-01T11:45:00.000-04:00" },
                  { "value": "12.8", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
                ],
                "method": [{ "methodDescription": "[Lower sensor]" }]
              }
            ]
          }
        ]
      }
    }"#
}

/// One malformed series (no `variable`), one with a non-numeric value, one
/// valid temperature series. Only the temperature should survive.
#[cfg(test)]
pub(crate) fn fixture_mixed_bad_series_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "values": [{ "value": [{ "value": "1.0", "dateTime": "2024-05-01T12:00:00.000-04:00" }] }]
          },
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "Ice", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ]
            }]
          },
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00010", "network": "NWIS" }],
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "11.5", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ]
            }]
          }
        ]
      }
    }"#
}

/// Discharge series with an empty value array (sensor outage, or a gap in
/// the requested window).
#[cfg(test)]
pub(crate) fn fixture_empty_value_array_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00060", "network": "NWIS" }],
              "noDataValue": -999999.0
            },
            "values": [{ "value": [], "qualifier": [] }]
          }
        ]
      }
    }"#
}

/// Latest entry carries a timestamp but no `value` key at all.
#[cfg(test)]
pub(crate) fn fixture_missing_value_field_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.10", "dateTime": "2024-05-01T11:45:00.000-04:00" },
                { "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ]
            }]
          }
        ]
      }
    }"#
}

/// Gage height whose latest value is the sentinel written with a decimal
/// part. Only the numeric `noDataValue` comparison catches it.
#[cfg(test)]
pub(crate) fn fixture_decimal_sentinel_json() -> &'static str {
    r#"{
      "value": {
        "timeSeries": [
          {
            "sourceInfo": {
              "siteName": "VERMILION RIVER NEAR VERMILION OH",
              "siteCode": [{ "value": "04199500", "network": "NWIS", "agencyCode": "USGS" }]
            },
            "variable": {
              "variableCode": [{ "value": "00065", "network": "NWIS" }],
              "unit": { "unitCode": "ft" },
              "noDataValue": -999999.0
            },
            "values": [{
              "value": [
                { "value": "3.18", "qualifiers": ["P"], "dateTime": "2024-05-01T11:45:00.000-04:00" },
                { "value": "-999999.00", "qualifiers": ["P"], "dateTime": "2024-05-01T12:00:00.000-04:00" }
              ],
              "qualifier": []
            }]
          }
        ]
      }
    }"#
}
