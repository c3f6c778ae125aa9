//! IIIF Image API request model and URL grammar for the Folio platform.
//!
//! This crate is pure: value types, the path parsing grammar, the canonical
//! formatting inverse, and the identifier segment codec. It performs no IO
//! and holds no state, so every function here is safe to call concurrently.
//!
//! # Layers
//!
//! ```text
//! raw path --classify--> RequestType
//!          --parse_*--> ImageRequest / InfoRequest
//! ImageRequest --canonical_path--> canonical path (parse's right inverse)
//! ```

pub mod canonical;
pub mod error;
pub mod parse;
pub mod request;
pub mod segment;
pub mod types;

pub use canonical::{canonical_info_path, canonical_path};
pub use error::{IiifError, IiifErrorCode, IiifResult};
pub use parse::{classify, parse_image_request, parse_info_request};
pub use request::{ImageRequest, InfoFormat, InfoRequest, RequestType};
pub use segment::{decode_segment, encode_segment};
pub use types::{ComplianceLevel, Format, Quality, Region, Rotation, Size};
