//! Error taxonomy for the IIIF image engine.
//!
//! Every failure the engine can surface is one of a small closed set of
//! codes, each with a default HTTP status and message. Classification of raw
//! paths never fails; only the explicit `parse_*` entry points, the geometry
//! resolver, and the backend adapter produce these errors.

use std::fmt;

/// Well-known error codes for the IIIF engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum IiifErrorCode {
    /// The request path does not match the IIIF URL grammar.
    #[default]
    MalformedRequest,
    /// The request is syntactically valid but geometrically impossible
    /// (e.g. a zero-size crop).
    UnsatisfiableRequest,
    /// The identifier is unknown to the archive or the backend.
    NotFound,
    /// The backend renderer timed out or answered with a non-2xx status.
    BackendUnavailable,
    /// The backend renderer returned an unparsable metadata body.
    BackendParse,
    /// The HTTP method is not supported by the engine.
    MethodNotAllowed,
    /// An internal error.
    InternalError,
}

impl IiifErrorCode {
    /// Returns the error code as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "MalformedRequest",
            Self::UnsatisfiableRequest => "UnsatisfiableRequest",
            Self::NotFound => "NotFound",
            Self::BackendUnavailable => "BackendUnavailable",
            Self::BackendParse => "BackendParse",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::MalformedRequest | Self::UnsatisfiableRequest => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::BackendUnavailable | Self::BackendParse => http::StatusCode::BAD_GATEWAY,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::MalformedRequest => "The request path does not match the IIIF image URL grammar",
            Self::UnsatisfiableRequest => {
                "The requested region or size resolves to an empty image"
            }
            Self::NotFound => "The requested image identifier does not exist",
            Self::BackendUnavailable => "The image rendering backend is unavailable",
            Self::BackendParse => "The image rendering backend returned an unparsable response",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for IiifErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An IIIF engine error carrying a code, message, and the offending resource.
#[derive(Debug)]
pub struct IiifError {
    /// The error code.
    pub code: IiifErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The offending path, segment, or identifier, for logging.
    pub resource: Option<String>,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for IiifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IiifError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for IiifError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IiifError {
    /// Create a new error from a code, with its default message and status.
    #[must_use]
    pub fn new(code: IiifErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.default_message().to_owned(),
            code,
            resource: None,
            source: None,
        }
    }

    /// Create a new error with a custom message.
    #[must_use]
    pub fn with_message(code: IiifErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            resource: None,
            source: None,
        }
    }

    /// Set the resource (path, segment, identifier) that caused this error.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attach the underlying source error.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// A `MalformedRequest` error naming the offending segment.
    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::with_message(IiifErrorCode::MalformedRequest, detail)
    }

    /// An `UnsatisfiableRequest` error with a detail message.
    #[must_use]
    pub fn unsatisfiable(detail: impl Into<String>) -> Self {
        Self::with_message(IiifErrorCode::UnsatisfiableRequest, detail)
    }

    /// A `NotFound` error naming the missing identifier.
    #[must_use]
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::new(IiifErrorCode::NotFound).with_resource(identifier)
    }

    /// A `BackendUnavailable` error with a detail message.
    #[must_use]
    pub fn backend_unavailable(detail: impl Into<String>) -> Self {
        Self::with_message(IiifErrorCode::BackendUnavailable, detail)
    }

    /// A `BackendParse` error with a detail message.
    #[must_use]
    pub fn backend_parse(detail: impl Into<String>) -> Self {
        Self::with_message(IiifErrorCode::BackendParse, detail)
    }

    /// An `InternalError` with a detail message.
    #[must_use]
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::with_message(IiifErrorCode::InternalError, detail)
    }

    /// A `MethodNotAllowed` error naming the method.
    #[must_use]
    pub fn method_not_allowed(method: &str) -> Self {
        Self::with_message(
            IiifErrorCode::MethodNotAllowed,
            format!("method {method} is not allowed"),
        )
    }
}

/// Convenience result type for IIIF engine operations.
pub type IiifResult<T> = Result<T, IiifError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_map_codes_to_status() {
        assert_eq!(
            IiifErrorCode::MalformedRequest.default_status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            IiifErrorCode::NotFound.default_status_code(),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            IiifErrorCode::BackendUnavailable.default_status_code(),
            http::StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            IiifErrorCode::BackendParse.default_status_code(),
            http::StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_should_carry_resource_on_not_found() {
        let err = IiifError::not_found("MissingManuscript.001r");
        assert_eq!(err.code, IiifErrorCode::NotFound);
        assert_eq!(err.resource.as_deref(), Some("MissingManuscript.001r"));
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_should_display_code_and_message() {
        let err = IiifError::malformed("bad region segment: [frob]");
        let rendered = err.to_string();
        assert!(rendered.contains("MalformedRequest"));
        assert!(rendered.contains("[frob]"));
    }
}
