//! Bridges the HTTP dispatch trait to the [`FolioIiif`] engine provider.

use std::future::Future;
use std::pin::Pin;

use folio_iiif_core::FolioIiif;
use folio_iiif_http::{IiifHandler, IiifResponseBody, RoutedRequest, image_response, info_response};
use folio_iiif_model::IiifError;

/// Newtype wrapper implementing [`IiifHandler`] for the engine provider.
#[derive(Debug, Clone)]
pub struct FolioHandler(pub FolioIiif);

impl IiifHandler for FolioHandler {
    fn handle_request(
        &self,
        routed: RoutedRequest,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<IiifResponseBody>, IiifError>> + Send>>
    {
        let provider = self.0.clone();
        Box::pin(async move {
            match routed {
                RoutedRequest::Info(request) => {
                    let info = provider.info(&request).await?;
                    info_response(&info)
                }
                RoutedRequest::Image(request) => {
                    let bytes = provider.image(&request).await?;
                    Ok(image_response(request.format, bytes))
                }
            }
        })
    }
}
