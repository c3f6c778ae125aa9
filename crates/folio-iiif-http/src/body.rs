//! Response body type for the IIIF HTTP surface.
//!
//! Two modes cover everything the engine writes:
//!
//! - **Buffered**: rendered image bytes, `info.json` documents, and error
//!   bodies. A response is only built once its content is complete, so a
//!   failure never produces partial output.
//! - **Empty**: HEAD responses and health checks without content.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// IIIF response body supporting buffered and empty modes.
///
/// Implements [`http_body::Body`] so it can be used directly with hyper.
#[derive(Debug, Default)]
pub enum IiifResponseBody {
    /// Buffered body: image bytes, JSON documents, error envelopes.
    Buffered(Full<Bytes>),
    /// Empty body for HEAD responses.
    #[default]
    Empty,
}

impl IiifResponseBody {
    /// Create a buffered body from bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create a buffered body from a UTF-8 string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self::Buffered(Full::new(Bytes::from(s.into())))
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }
}

impl http_body::Body for IiifResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body::Body;

    use super::*;

    #[test]
    fn test_should_report_empty_body_as_end_of_stream() {
        let body = IiifResponseBody::empty();
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }

    #[test]
    fn test_should_size_buffered_body() {
        let body = IiifResponseBody::from_bytes(&b"image-bytes"[..]);
        assert_eq!(body.size_hint().exact(), Some(11));
        assert!(!body.is_end_stream());
    }
}
