//! IIIF request routing: classifying and fully parsing an inbound request.
//!
//! The [`IiifRouter`] maps an HTTP request onto the engine's two operations
//! by examining the method and the URI path:
//!
//! - `GET /{identifier}/info.json` is a capability request
//! - `GET /{identifier}` and the five-segment operation form are image
//!   requests
//! - anything else is rejected with a typed error
//!
//! Classification itself never fails; only the full parse of a plausible
//! path produces `MalformedRequest`.

use folio_iiif_model::{
    Format, IiifError, ImageRequest, InfoRequest, RequestType, classify, parse_image_request,
    parse_info_request,
};
use http::Method;

/// Configuration for IIIF request routing.
#[derive(Debug, Clone)]
pub struct IiifRouter {
    /// Output format implied by a bare-identifier request.
    pub default_format: Format,
}

/// The result of routing an HTTP request to an engine operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutedRequest {
    /// A capability (`info.json`) request.
    Info(InfoRequest),
    /// A fully parsed image request.
    Image(ImageRequest),
}

impl IiifRouter {
    /// Create a router with the given default format.
    #[must_use]
    pub fn new(default_format: Format) -> Self {
        Self { default_format }
    }

    /// Resolve an HTTP request to an engine operation.
    ///
    /// # Errors
    ///
    /// `MethodNotAllowed` for anything but GET/HEAD, `MalformedRequest` if
    /// the path does not satisfy the IIIF grammar.
    pub fn resolve<B>(&self, req: &http::Request<B>) -> Result<RoutedRequest, IiifError> {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return Err(IiifError::method_not_allowed(req.method().as_str()));
        }

        self.resolve_path(req.uri().path())
    }

    /// Resolve a raw path to an engine operation.
    ///
    /// # Errors
    ///
    /// `MalformedRequest` if the path does not satisfy the IIIF grammar.
    pub fn resolve_path(&self, path: &str) -> Result<RoutedRequest, IiifError> {
        match classify(path) {
            RequestType::Info => Ok(RoutedRequest::Info(parse_info_request(path)?)),
            RequestType::Image | RequestType::Operation => Ok(RoutedRequest::Image(
                parse_image_request(path, self.default_format)?,
            )),
            RequestType::Invalid => Err(IiifError::malformed(format!(
                "path does not match the IIIF image URL grammar: {path:?}"
            ))
            .with_resource(path)),
        }
    }
}
