//! The FSI-style render-backend adapter.
//!
//! This is the only code aware of the renderer's query dialect: a crop is
//! expressed as `rect=x,y,w,h`, the output scale as `width=`/`height=`, and
//! rotation/mirror/quality/format as renderer tokens. Everything else in the
//! engine treats the backend as a black box behind the [`ArchiveStore`] and
//! [`RenderBackend`] traits.
//!
//! One blocking-equivalent HTTP fetch per request, bounded by the client
//! timeout. No retries here; short-window duplicate fetches are expected to
//! be deduplicated by a caching layer outside this engine.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use folio_iiif_core::{ArchiveStore, RenderBackend, ResolvedGeometry};
use folio_iiif_model::{IiifError, IiifResult, ImageRequest, Quality};
use tracing::{debug, warn};

use crate::metadata::parse_render_info;

/// A render backend speaking the FSI server query dialect.
#[derive(Debug, Clone)]
pub struct FsiBackend {
    base_url: String,
    client: reqwest::Client,
}

impl FsiBackend {
    /// Create an adapter for the renderer at `base_url` with a fixed
    /// per-fetch timeout.
    ///
    /// # Errors
    ///
    /// Returns an `InternalError` if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> IiifResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                IiifError::internal_error("failed to build backend HTTP client").with_source(e)
            })?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    async fn fetch(&self, url: &str, identifier: &str) -> IiifResult<Bytes> {
        debug!(%url, "fetching from render backend");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_transport_error(&e, identifier).with_source(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(IiifError::not_found(identifier));
        }
        if !status.is_success() {
            warn!(%status, identifier, "render backend answered with an error status");
            return Err(IiifError::backend_unavailable(format!(
                "backend answered {status}"
            ))
            .with_resource(identifier));
        }

        response
            .bytes()
            .await
            .map_err(|e| map_transport_error(&e, identifier).with_source(e))
    }
}

/// Map a reqwest transport failure onto the engine taxonomy.
///
/// Timeouts and connection failures are `BackendUnavailable`; the caller
/// attaches the source error separately.
fn map_transport_error(error: &reqwest::Error, identifier: &str) -> IiifError {
    let detail = if error.is_timeout() {
        "backend fetch timed out"
    } else if error.is_connect() {
        "cannot connect to backend"
    } else {
        "backend fetch failed"
    };
    IiifError::backend_unavailable(detail).with_resource(identifier)
}

/// Build the fetch URL for a resolved image request.
///
/// Rotation is reduced modulo 360 here; the request model stores the value
/// exactly as the client sent it, but the renderer only accepts `[0, 360)`.
#[must_use]
pub fn render_url(base_url: &str, request: &ImageRequest, geometry: &ResolvedGeometry) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("type", "image");
    query.append_pair("source", &request.identifier);
    query.append_pair(
        "rect",
        &format!(
            "{},{},{},{}",
            geometry.crop.x, geometry.crop.y, geometry.crop.width, geometry.crop.height
        ),
    );
    query.append_pair("width", &geometry.width.to_string());
    query.append_pair("height", &geometry.height.to_string());

    let degrees = request.rotation.normalized_degrees();
    if degrees != 0.0 {
        query.append_pair("rotation", &format!("{degrees}"));
    }
    if request.rotation.mirror {
        query.append_pair("mirror", "horizontal");
    }

    match request.quality {
        Quality::Default | Quality::Color => {}
        Quality::Gray => {
            query.append_pair("effects", "grayscale");
        }
        Quality::Bitonal => {
            query.append_pair("effects", "bitonal");
        }
    }

    query.append_pair("format", request.format.as_str());

    format!("{base_url}?{}", query.finish())
}

/// Build the metadata-fetch URL for an identifier.
#[must_use]
pub fn info_url(base_url: &str, identifier: &str) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("type", "info");
    query.append_pair("source", identifier);
    query.append_pair("tpl", "info");
    format!("{base_url}?{}", query.finish())
}

#[async_trait]
impl RenderBackend for FsiBackend {
    async fn render(
        &self,
        request: &ImageRequest,
        geometry: &ResolvedGeometry,
    ) -> IiifResult<Bytes> {
        let url = render_url(&self.base_url, request, geometry);
        self.fetch(&url, &request.identifier).await
    }
}

#[async_trait]
impl ArchiveStore for FsiBackend {
    async fn dimensions_of(&self, identifier: &str) -> IiifResult<(u32, u32)> {
        let url = info_url(&self.base_url, identifier);
        let body = self.fetch(&url, identifier).await?;

        parse_render_info(&body).map_err(|e| {
            IiifError::backend_parse(format!("unparsable metadata for {identifier}"))
                .with_resource(identifier)
                .with_source(e)
        })
    }
}
