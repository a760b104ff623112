/// HTTP endpoint for Prometheus scrapes
///
/// Endpoints:
/// - GET /        - Plain text status line naming the configured site
/// - GET /metrics - Runs one scrape cycle, then returns the exposition text
///
/// Requests are served one at a time on the calling thread, so the
/// exporter never has more than one writer.

use std::io::Cursor;

use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{error, info, warn};

use crate::exporter::Exporter;
use crate::metrics::SiteMetrics;
use crate::model::ExporterError;

type Reply = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Binds the listening socket. Failure here is a startup error.
pub fn bind(addr: &str) -> Result<Server, ExporterError> {
    Server::http(addr).map_err(|e| ExporterError::Bind {
        addr: addr.to_string(),
        reason: e.to_string(),
    })
}

/// Serves requests until the server is unblocked or dropped.
pub fn serve(server: Server, mut exporter: Exporter) {
    match server.server_addr().to_ip() {
        Some(addr) => info!(%addr, site = %exporter.config().site_id, "HTTP endpoint listening"),
        None => info!(site = %exporter.config().site_id, "HTTP endpoint listening"),
    }

    for request in server.incoming_requests() {
        let response = route(request.method(), request.url(), &mut exporter);
        if let Err(e) = request.respond(response) {
            warn!(error = %e, "failed to send response");
        }
    }
}

/// Dispatches a single request.
pub fn route(method: &Method, url: &str, exporter: &mut Exporter) -> Reply {
    // Scrapers sometimes append query strings; routing ignores them.
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (Method::Get, "/") => handle_home(exporter),
        (Method::Get, "/metrics") => handle_metrics(exporter),
        (Method::Get, _) => text_response(404, "text/plain; charset=utf-8", "Not found\n".to_string()),
        _ => text_response(
            405,
            "text/plain; charset=utf-8",
            "Method not allowed\n".to_string(),
        ),
    }
}

/// Handle / endpoint
fn handle_home(exporter: &Exporter) -> Reply {
    text_response(
        200,
        "text/plain; charset=utf-8",
        format!(
            "USGS Exporter is running for site {}. Visit /metrics for Prometheus data.",
            exporter.config().site_id
        ),
    )
}

/// Handle /metrics endpoint. Always 200: upstream trouble only means stale
/// or missing gauges.
fn handle_metrics(exporter: &mut Exporter) -> Reply {
    exporter.refresh();

    let body = match exporter.render() {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            String::new()
        }
    };
    text_response(200, &SiteMetrics::content_type(), body)
}

fn text_response(status_code: u16, content_type: &str, body: String) -> Reply {
    let response = Response::from_data(body.into_bytes()).with_status_code(StatusCode(status_code));
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
