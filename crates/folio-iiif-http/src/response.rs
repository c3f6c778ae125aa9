//! Response construction for the IIIF HTTP surface.
//!
//! Three response shapes exist: rendered image bytes with the format's
//! media type, a JSON capability document, and a JSON error envelope with
//! the error code's HTTP status. A body is attached only once its content
//! is complete; a detected failure never produces partial output.

use bytes::Bytes;
use folio_iiif_core::ImageInfo;
use folio_iiif_model::{Format, IiifError};

use crate::body::IiifResponseBody;

/// Build a response streaming rendered image bytes back unmodified.
#[must_use]
pub fn image_response(format: Format, bytes: Bytes) -> http::Response<IiifResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, format.media_type())
        .body(IiifResponseBody::from_bytes(bytes))
        .expect("static image response parts should be valid")
}

/// Build an `info.json` response from a capability document.
///
/// # Errors
///
/// `InternalError` if the document fails to serialize, which would indicate
/// a malformed capability document.
pub fn info_response(info: &ImageInfo) -> Result<http::Response<IiifResponseBody>, IiifError> {
    let body = serde_json::to_vec(info).map_err(|e| {
        IiifError::internal_error("failed to serialize info document").with_source(e)
    })?;

    Ok(http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(IiifResponseBody::from_bytes(body))
        .expect("static info response parts should be valid"))
}

/// Convert an engine error into a JSON error response.
#[must_use]
pub fn error_to_response(err: &IiifError, request_id: &str) -> http::Response<IiifResponseBody> {
    let mut envelope = serde_json::json!({
        "error": err.code.as_str(),
        "message": err.message,
        "requestId": request_id,
    });
    if let Some(resource) = &err.resource {
        envelope["resource"] = serde_json::Value::String(resource.clone());
    }

    http::Response::builder()
        .status(err.status_code)
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(IiifResponseBody::from_string(envelope.to_string()))
        .expect("static error response parts should be valid")
}

#[cfg(test)]
mod tests {
    use folio_iiif_model::ComplianceLevel;

    use super::*;

    #[test]
    fn test_should_set_media_type_on_image_response() {
        let resp = image_response(Format::Png, Bytes::from_static(b"png-bytes"));
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("image/png"),
        );
    }

    #[test]
    fn test_should_build_info_response() {
        let info = ImageInfo::new("http://localhost/iiif", "id", 10, 20, ComplianceLevel::Level2);
        let resp = info_response(&info).expect("should build response");
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json"),
        );
    }

    #[test]
    fn test_should_map_error_code_to_status() {
        let err = IiifError::not_found("missing-id");
        let resp = error_to_response(&err, "req-2");
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);

        let err = IiifError::malformed("bad segment");
        let resp = error_to_response(&err, "req-3");
        assert_eq!(resp.status(), http::StatusCode::BAD_REQUEST);

        let err = IiifError::backend_unavailable("timed out");
        let resp = error_to_response(&err, "req-4");
        assert_eq!(resp.status(), http::StatusCode::BAD_GATEWAY);
    }
}
