//! The request provider: ties archive dimensions, geometry resolution, the
//! capability serializer, and the render backend into the two operations
//! the HTTP layer dispatches.

use std::sync::Arc;

use bytes::Bytes;
use folio_iiif_model::{IiifResult, ImageRequest, InfoRequest};
use tracing::debug;

use crate::archive::ArchiveStore;
use crate::backend::RenderBackend;
use crate::config::ServiceConfig;
use crate::geometry;
use crate::info::ImageInfo;

/// The Folio IIIF engine provider.
///
/// Holds no per-request state; one instance serves all requests
/// concurrently.
#[derive(Clone)]
pub struct FolioIiif {
    config: Arc<ServiceConfig>,
    archive: Arc<dyn ArchiveStore>,
    backend: Arc<dyn RenderBackend>,
}

impl std::fmt::Debug for FolioIiif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolioIiif")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FolioIiif {
    /// Create a provider over the given collaborators.
    #[must_use]
    pub fn new(
        config: ServiceConfig,
        archive: Arc<dyn ArchiveStore>,
        backend: Arc<dyn RenderBackend>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            archive,
            backend,
        }
    }

    /// The service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Serve an image request: resolve geometry against the archive's
    /// dimensions and fetch the rendered bytes from the backend.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown identifiers, `UnsatisfiableRequest` for
    /// impossible geometry, and backend errors pass through.
    pub async fn image(&self, request: &ImageRequest) -> IiifResult<Bytes> {
        let (source_width, source_height) =
            self.archive.dimensions_of(&request.identifier).await?;

        let geometry = geometry::resolve(request, source_width, source_height)?;
        debug!(
            identifier = %request.identifier,
            crop_x = geometry.crop.x,
            crop_y = geometry.crop.y,
            crop_width = geometry.crop.width,
            crop_height = geometry.crop.height,
            output_width = geometry.width,
            output_height = geometry.height,
            "resolved image geometry"
        );

        self.backend.render(request, &geometry).await
    }

    /// Serve an info request: build the capability document from the
    /// archive's dimensions and the configured compliance level.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown identifiers; backend errors pass through.
    pub async fn info(&self, request: &InfoRequest) -> IiifResult<ImageInfo> {
        let (width, height) = self.archive.dimensions_of(&request.identifier).await?;

        Ok(ImageInfo::new(
            &self.config.public_base_url,
            &request.identifier,
            width,
            height,
            self.config.compliance_level,
        ))
    }
}
