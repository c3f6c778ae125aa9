//! IIIF request dispatch: routes a resolved request to the handler.
//!
//! This module provides the [`dispatch_request`] function that bridges the
//! routing layer with the engine. Given a [`RoutedRequest`], it calls the
//! appropriate method on the [`IiifHandler`] trait and returns the handler's
//! fully formed HTTP response.

use std::future::Future;
use std::pin::Pin;

use folio_iiif_model::IiifError;

use crate::body::IiifResponseBody;
use crate::router::RoutedRequest;

/// Trait that the engine provider must implement.
///
/// This is the boundary between the HTTP layer and the IIIF engine.
///
/// # Object Safety
///
/// This trait uses `async-trait`-style boxing because it needs to be used
/// with `Arc<dyn IiifHandler>` for dynamic dispatch in the service layer.
pub trait IiifHandler: Send + Sync + 'static {
    /// Handle a routed IIIF request and produce an HTTP response.
    fn handle_request(
        &self,
        routed: RoutedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<IiifResponseBody>, IiifError>> + Send>>;
}

/// Dispatch a routed IIIF request to the handler.
///
/// Called by [`IiifHttpService`](crate::service::IiifHttpService) after
/// routing. It delegates to the [`IiifHandler`] implementation.
///
/// # Errors
///
/// Propagates the handler's error unchanged.
pub async fn dispatch_request<H: IiifHandler>(
    handler: &H,
    routed: RoutedRequest,
) -> Result<http::Response<IiifResponseBody>, IiifError> {
    match &routed {
        RoutedRequest::Info(request) => {
            tracing::debug!(identifier = %request.identifier, "dispatching info request");
        }
        RoutedRequest::Image(request) => {
            tracing::debug!(
                identifier = %request.identifier,
                quality = %request.quality,
                format = %request.format,
                "dispatching image request"
            );
        }
    }
    handler.handle_request(routed).await
}

/// A handler implementation that fails every request as unavailable.
///
/// Useful for testing the HTTP routing layer in isolation.
#[derive(Debug, Clone, Default)]
pub struct UnavailableHandler;

impl IiifHandler for UnavailableHandler {
    fn handle_request(
        &self,
        _routed: RoutedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<IiifResponseBody>, IiifError>> + Send>>
    {
        Box::pin(async move { Err(IiifError::backend_unavailable("no backend configured")) })
    }
}
