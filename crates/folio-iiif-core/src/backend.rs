//! The render-backend collaborator: a black box that performs the actual
//! pixel decode/crop/scale/rotate, reached over HTTP by the adapter crate.

use async_trait::async_trait;
use bytes::Bytes;
use folio_iiif_model::{IiifResult, ImageRequest};

use crate::geometry::ResolvedGeometry;

/// Renders an image request whose geometry has already been resolved.
///
/// The engine never inspects the returned bytes; they are streamed back to
/// the client unmodified with the content type implied by the request
/// format.
#[async_trait]
pub trait RenderBackend: Send + Sync + 'static {
    /// Fetch the rendered image bytes for a resolved request.
    ///
    /// # Errors
    ///
    /// `NotFound` if the backend does not know the identifier,
    /// `BackendUnavailable` on timeout or a non-2xx backend status.
    async fn render(&self, request: &ImageRequest, geometry: &ResolvedGeometry)
    -> IiifResult<Bytes>;
}
