//! Capability (`info.json`) document serialization.
//!
//! The document advertises the source dimensions, the canonical identifier
//! URL, and the deployment's declared compliance level with its supported
//! qualities and formats. The level is configuration passed in explicitly so
//! different deployments (and tests) can serve different levels
//! concurrently.

use folio_iiif_model::{ComplianceLevel, encode_segment};
use serde::Serialize;

/// The IIIF Image API context URI.
pub const IMAGE_CONTEXT: &str = "http://iiif.io/api/image/2/context.json";

/// The IIIF Image API protocol URI.
pub const PROTOCOL: &str = "http://iiif.io/api/image";

/// An IIIF Image API 2.0 `info.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    /// The `@context` of the document.
    #[serde(rename = "@context")]
    pub context: &'static str,
    /// The canonical URL of the image service for this identifier.
    #[serde(rename = "@id")]
    pub id: String,
    /// The IIIF protocol URI.
    pub protocol: &'static str,
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// The compliance profile: the level URI followed by the supported
    /// formats and qualities.
    pub profile: Vec<ProfileEntry>,
}

/// One entry of the `profile` array: either the compliance-level URI or the
/// capability detail object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileEntry {
    /// The compliance-level URI.
    Level(&'static str),
    /// Supported formats and qualities.
    Detail(ProfileDetail),
}

/// The supported formats and qualities advertised alongside the level URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileDetail {
    /// Supported output-format extension tokens.
    pub formats: Vec<&'static str>,
    /// Supported quality tokens.
    pub qualities: Vec<&'static str>,
}

impl ImageInfo {
    /// Build the capability document for one identifier.
    ///
    /// `base_url` is the public root of the image service (no trailing
    /// slash); the identifier is re-encoded through the segment codec when
    /// deriving the canonical URL.
    #[must_use]
    pub fn new(
        base_url: &str,
        identifier: &str,
        width: u32,
        height: u32,
        level: ComplianceLevel,
    ) -> Self {
        let detail = ProfileDetail {
            formats: level
                .supported_formats()
                .iter()
                .map(|f| f.as_str())
                .collect(),
            qualities: level
                .supported_qualities()
                .iter()
                .map(|q| q.as_str())
                .collect(),
        };

        Self {
            context: IMAGE_CONTEXT,
            id: format!("{base_url}/{}", encode_segment(identifier)),
            protocol: PROTOCOL,
            width,
            height,
            profile: vec![
                ProfileEntry::Level(level.uri()),
                ProfileEntry::Detail(detail),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_info_document() {
        let info = ImageInfo::new(
            "https://images.library.example.org/iiif",
            "Walters.W102.003r",
            3732,
            5742,
            ComplianceLevel::Level2,
        );
        assert_eq!(
            info.id,
            "https://images.library.example.org/iiif/Walters.W102.003r"
        );
        assert_eq!(info.width, 3732);
        assert_eq!(info.height, 5742);
        assert_eq!(
            info.profile[0],
            ProfileEntry::Level("http://iiif.io/api/image/2/level2.json")
        );
    }

    #[test]
    fn test_should_serialize_profile_as_mixed_array() {
        let info = ImageInfo::new("http://localhost/iiif", "id", 10, 20, ComplianceLevel::Level1);
        let json = serde_json::to_value(&info).expect("should serialize");

        assert_eq!(json["@context"], IMAGE_CONTEXT);
        assert_eq!(json["protocol"], PROTOCOL);
        assert_eq!(json["profile"][0], "http://iiif.io/api/image/2/level1.json");
        assert_eq!(json["profile"][1]["formats"][0], "jpg");
        assert_eq!(json["profile"][1]["qualities"][0], "default");
    }

    #[test]
    fn test_should_encode_identifier_in_canonical_url() {
        let info = ImageInfo::new("http://localhost/iiif", "a/b", 1, 1, ComplianceLevel::Level0);
        assert_eq!(info.id, "http://localhost/iiif/a%2Fb");
    }

    #[test]
    fn test_should_restrict_level0_capabilities() {
        let info = ImageInfo::new("http://localhost/iiif", "id", 1, 1, ComplianceLevel::Level0);
        let ProfileEntry::Detail(detail) = &info.profile[1] else {
            panic!("second profile entry should be the detail object");
        };
        assert_eq!(detail.formats, vec!["jpg"]);
        assert_eq!(detail.qualities, vec!["default"]);
    }
}
