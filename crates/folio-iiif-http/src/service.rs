//! The main IIIF HTTP service implementing hyper's `Service` trait.
//!
//! [`IiifHttpService`] ties together routing, dispatch, and response
//! serialization into a single hyper-compatible service. It handles:
//!
//! 1. Health check interception (`GET /_health`)
//! 2. CORS preflight requests (`OPTIONS`)
//! 3. IIIF request routing via [`IiifRouter`]
//! 4. Request dispatch to the [`IiifHandler`]
//! 5. Common response headers (`x-request-id`, `Server`, CORS)
//! 6. Error response formatting

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, info, warn};
use uuid::Uuid;

use folio_iiif_model::Format;

use crate::body::IiifResponseBody;
use crate::dispatch::{IiifHandler, dispatch_request};
use crate::response::error_to_response;
use crate::router::IiifRouter;

/// The IIIF HTTP service that implements hyper's `Service` trait.
///
/// This service processes incoming HTTP requests through the full IIIF
/// request lifecycle: routing, dispatch to the handler, and response
/// formatting.
///
/// # Type Parameters
///
/// - `H`: The engine provider implementing [`IiifHandler`].
#[derive(Debug)]
pub struct IiifHttpService<H: IiifHandler> {
    handler: Arc<H>,
    router: IiifRouter,
}

impl<H: IiifHandler> IiifHttpService<H> {
    /// Create a new IIIF HTTP service with the given handler.
    #[must_use]
    pub fn new(handler: H, default_format: Format) -> Self {
        Self {
            handler: Arc::new(handler),
            router: IiifRouter::new(default_format),
        }
    }

    /// Create a new IIIF HTTP service from an `Arc<H>` handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, default_format: Format) -> Self {
        Self {
            handler,
            router: IiifRouter::new(default_format),
        }
    }
}

impl<H: IiifHandler> Clone for IiifHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router.clone(),
        }
    }
}

impl<H: IiifHandler> Service<http::Request<Incoming>> for IiifHttpService<H> {
    type Response = http::Response<IiifResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let router = self.router.clone();

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();

            let is_head = req.method() == http::Method::HEAD;
            let response = process_request(req, handler.as_ref(), &router, &request_id).await;
            let response = add_common_headers(response, &request_id);

            // HEAD responses carry the headers of the equivalent GET without
            // the body.
            let response = if is_head {
                response.map(|_| IiifResponseBody::empty())
            } else {
                response
            };

            Ok(response)
        })
    }
}

/// Process an incoming HTTP request through the IIIF pipeline.
async fn process_request<H: IiifHandler>(
    req: http::Request<Incoming>,
    handler: &H,
    router: &IiifRouter,
    request_id: &str,
) -> http::Response<IiifResponseBody> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing IIIF request");

    // 1. Health check interception.
    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    // 2. CORS preflight.
    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    // 3. Route the request.
    let routed = match router.resolve(&req) {
        Ok(routed) => routed,
        Err(err) => {
            warn!(
                %method, %uri, error = %err, request_id,
                "failed to route IIIF request"
            );
            return error_to_response(&err, request_id);
        }
    };

    info!(%method, path = %uri.path(), request_id, "routed IIIF request");

    // 4. Dispatch to the handler.
    match dispatch_request(handler, routed).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "IIIF request returned error");
            error_to_response(&err, request_id)
        }
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

/// Produce a health check response.
fn health_check_response() -> http::Response<IiifResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(IiifResponseBody::from_string(
            r#"{"status":"running","service":"iiif"}"#,
        ))
        .expect("static health response should be valid")
}

/// Produce a CORS preflight response.
fn cors_preflight_response() -> http::Response<IiifResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Max-Age", "86400")
        .body(IiifResponseBody::empty())
        .expect("static CORS response should be valid")
}

/// Add common response headers to every IIIF response.
fn add_common_headers(
    mut response: http::Response<IiifResponseBody>,
    request_id: &str,
) -> http::Response<IiifResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }

    headers.insert("Server", http::header::HeaderValue::from_static("FolioIIIF"));

    // Image viewers are expected to embed from foreign origins.
    headers.insert(
        "Access-Control-Allow-Origin",
        http::header::HeaderValue::from_static("*"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_detect_health_check_paths() {
        assert!(is_health_check(&http::Method::GET, "/_health"));
        assert!(is_health_check(&http::Method::GET, "/health"));
        assert!(!is_health_check(&http::Method::POST, "/_health"));
        assert!(!is_health_check(&http::Method::GET, "/some-image"));
    }

    #[test]
    fn test_should_produce_health_check_response() {
        let resp = health_check_response();
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("Content-Type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
    }

    #[test]
    fn test_should_add_common_headers() {
        let resp = http::Response::builder()
            .status(http::StatusCode::OK)
            .body(IiifResponseBody::empty())
            .expect("valid response");
        let resp = add_common_headers(resp, "req-1");
        assert_eq!(
            resp.headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-1"),
        );
        assert_eq!(
            resp.headers()
                .get("Access-Control-Allow-Origin")
                .and_then(|v| v.to_str().ok()),
            Some("*"),
        );
    }
}
