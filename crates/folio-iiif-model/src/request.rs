//! Composite request types: image requests, info requests, and the
//! pre-parse classification of a raw path.

use crate::types::{Format, Quality, Region, Rotation, Size};

/// Classification of a raw path, ahead of full parsing.
///
/// `Operation` denotes a syntactically plausible image-operation path that
/// has not yet been fully validated; full validation happens in
/// [`parse_image_request`](crate::parse::parse_image_request).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// A capability (`info.json`) request.
    Info,
    /// A bare-identifier request (implicit `full/full/0/default`).
    Image,
    /// A five-segment image-operation path.
    Operation,
    /// Anything else, including empty or garbage input.
    Invalid,
}

/// A fully parsed and validated IIIF image request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    /// The decoded image identifier.
    pub identifier: String,
    /// The selected source region.
    pub region: Region,
    /// The requested output size.
    pub size: Size,
    /// The requested rotation.
    pub rotation: Rotation,
    /// The requested quality.
    pub quality: Quality,
    /// The requested output format.
    pub format: Format,
}

impl ImageRequest {
    /// The implicit request for a bare identifier path:
    /// `full/full/0/default` in the deployment's default format.
    #[must_use]
    pub fn bare(identifier: impl Into<String>, format: Format) -> Self {
        Self {
            identifier: identifier.into(),
            region: Region::Full,
            size: Size::Full,
            rotation: Rotation::none(),
            quality: Quality::Default,
            format,
        }
    }
}

/// The format of a capability document.
///
/// Only JSON is served today; the field exists so an XML info document can
/// be added without reshaping the request model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InfoFormat {
    /// `info.json`.
    #[default]
    Json,
}

impl InfoFormat {
    /// Returns the file-extension token for this info format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
        }
    }
}

/// A parsed capability (`info.json`) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRequest {
    /// The decoded image identifier.
    pub identifier: String,
    /// The requested info-document format.
    pub format: InfoFormat,
}

impl InfoRequest {
    /// Create an info request for the given identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            format: InfoFormat::Json,
        }
    }
}
