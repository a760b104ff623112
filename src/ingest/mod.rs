/// Upstream data sources.
///
/// - `usgs` — USGS NWIS IV API: URL construction, fetch, JSON parsing.
/// - `fixtures` (test only) — representative API response payloads.

pub mod usgs;

#[cfg(test)]
pub(crate) mod fixtures;
