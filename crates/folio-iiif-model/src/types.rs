//! Value types for the IIIF Image API request grammar.
//!
//! These are the leaf components of an image request: the source region,
//! output size, rotation, quality, and format. Each is a closed sum type so
//! the geometry resolver and the canonical formatter can match exhaustively.
//! All types are immutable, structurally comparable, and constructed fresh
//! per request.

use serde::{Deserialize, Serialize};

/// The source-image sub-rectangle selected for output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// The whole source image.
    Full,
    /// An absolute pixel rectangle in source coordinates.
    Absolute {
        /// Left edge, in source pixels.
        x: u32,
        /// Top edge, in source pixels.
        y: u32,
        /// Rectangle width, in source pixels.
        width: u32,
        /// Rectangle height, in source pixels.
        height: u32,
    },
    /// A rectangle expressed as percentages of the source dimensions.
    ///
    /// Each component is a real number in `[0, 100]`.
    Percentage {
        /// Left edge, as a percentage of the source width.
        x: f64,
        /// Top edge, as a percentage of the source height.
        y: f64,
        /// Rectangle width, as a percentage of the source width.
        width: f64,
        /// Rectangle height, as a percentage of the source height.
        height: f64,
    },
}

/// The target output scale applied after region selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    /// Keep the crop dimensions unchanged.
    Full,
    /// Exact output dimensions; aspect ratio may be distorted.
    Exact {
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
    },
    /// Exact output width; height derived preserving the crop aspect ratio.
    ExactWidth(u32),
    /// Exact output height; width derived preserving the crop aspect ratio.
    ExactHeight(u32),
    /// A percentage scale factor applied to both crop dimensions.
    ///
    /// Carries the percentage as given in the request: `pct:50` stores `50.0`.
    Percentage(f64),
    /// A bounding box the crop is scaled into, preserving aspect ratio
    /// without exceeding either bound.
    BestFit {
        /// Bounding-box width in pixels.
        width: u32,
        /// Bounding-box height in pixels.
        height: u32,
    },
}

/// Rotation applied to the scaled output.
///
/// The degree value is accepted un-normalized at parse time: a request for
/// `360` is stored as `360.0`, not range-reduced. The backend adapter reduces
/// modulo 360 when emitting a fetch URL. When `mirror` is set, the image is
/// mirrored before rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Rotation in degrees, non-negative, not range-reduced.
    pub degrees: f64,
    /// Whether the image is mirrored before rotating.
    pub mirror: bool,
}

impl Rotation {
    /// A zero rotation without mirroring.
    #[must_use]
    pub fn none() -> Self {
        Self {
            degrees: 0.0,
            mirror: false,
        }
    }

    /// The rotation reduced into `[0, 360)`, as the backend consumes it.
    #[must_use]
    pub fn normalized_degrees(&self) -> f64 {
        self.degrees % 360.0
    }
}

/// Output quality of the rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Quality {
    /// The server's default rendering.
    #[default]
    #[serde(rename = "default")]
    Default,
    /// Full color.
    #[serde(rename = "color")]
    Color,
    /// Grayscale.
    #[serde(rename = "gray")]
    Gray,
    /// Bitonal (black and white).
    #[serde(rename = "bitonal")]
    Bitonal,
}

impl Quality {
    /// Returns the canonical URL token for this quality.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Color => "color",
            Self::Gray => "gray",
            Self::Bitonal => "bitonal",
        }
    }

    /// Parse a quality token; `None` for unknown tokens.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "default" => Some(Self::Default),
            "color" => Some(Self::Color),
            "gray" => Some(Self::Gray),
            "bitonal" => Some(Self::Bitonal),
            _ => None,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format of the rendered image or document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Format {
    /// JPEG.
    #[default]
    #[serde(rename = "jpg")]
    Jpg,
    /// PNG.
    #[serde(rename = "png")]
    Png,
    /// TIFF.
    #[serde(rename = "tif")]
    Tif,
    /// JPEG 2000.
    #[serde(rename = "jp2")]
    Jp2,
    /// PDF.
    #[serde(rename = "pdf")]
    Pdf,
}

impl Format {
    /// Returns the canonical file-extension token for this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Tif => "tif",
            Self::Jp2 => "jp2",
            Self::Pdf => "pdf",
        }
    }

    /// Returns the media type used on image responses.
    #[must_use]
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tif => "image/tiff",
            Self::Jp2 => "image/jp2",
            Self::Pdf => "application/pdf",
        }
    }

    /// Parse a file-extension token; `None` for unknown tokens.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "jpg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "tif" => Some(Self::Tif),
            "jp2" => Some(Self::Jp2),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared IIIF Image API compliance level.
///
/// Each level is a strict superset of the capabilities of the lower one.
/// The level is static deployment configuration passed explicitly into the
/// capability serializer; it is never computed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComplianceLevel {
    /// Level 0: fixed sizes only.
    #[serde(rename = "level0")]
    Level0,
    /// Level 1: regions and simple scaling.
    #[serde(rename = "level1")]
    Level1,
    /// Level 2: arbitrary regions, scaling, rotation, and formats.
    #[default]
    #[serde(rename = "level2")]
    Level2,
}

impl ComplianceLevel {
    /// The compliance-level URI advertised in `info.json`.
    #[must_use]
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Level0 => "http://iiif.io/api/image/2/level0.json",
            Self::Level1 => "http://iiif.io/api/image/2/level1.json",
            Self::Level2 => "http://iiif.io/api/image/2/level2.json",
        }
    }

    /// Output formats supported at this level.
    #[must_use]
    pub fn supported_formats(&self) -> &'static [Format] {
        match self {
            Self::Level0 => &[Format::Jpg],
            Self::Level1 => &[Format::Jpg, Format::Png],
            Self::Level2 => &[Format::Jpg, Format::Png, Format::Tif, Format::Pdf],
        }
    }

    /// Qualities supported at this level.
    #[must_use]
    pub fn supported_qualities(&self) -> &'static [Quality] {
        match self {
            Self::Level0 => &[Quality::Default],
            Self::Level1 => &[Quality::Default, Quality::Color, Quality::Gray],
            Self::Level2 => &[
                Quality::Default,
                Quality::Color,
                Quality::Gray,
                Quality::Bitonal,
            ],
        }
    }

    /// Parse a level token (`level0` / `level1` / `level2`).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "level0" | "0" => Some(Self::Level0),
            "level1" | "1" => Some(Self::Level1),
            "level2" | "2" => Some(Self::Level2),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_round_trip_quality_tokens() {
        for quality in [
            Quality::Default,
            Quality::Color,
            Quality::Gray,
            Quality::Bitonal,
        ] {
            assert_eq!(Quality::from_token(quality.as_str()), Some(quality));
        }
        assert_eq!(Quality::from_token("sepia"), None);
    }

    #[test]
    fn test_should_round_trip_format_tokens() {
        for format in [
            Format::Jpg,
            Format::Png,
            Format::Tif,
            Format::Jp2,
            Format::Pdf,
        ] {
            assert_eq!(Format::from_token(format.as_str()), Some(format));
        }
        assert_eq!(Format::from_token("bmp"), None);
    }

    #[test]
    fn test_should_map_formats_to_media_types() {
        assert_eq!(Format::Jpg.media_type(), "image/jpeg");
        assert_eq!(Format::Pdf.media_type(), "application/pdf");
    }

    #[test]
    fn test_should_keep_levels_as_strict_supersets() {
        let levels = [
            ComplianceLevel::Level0,
            ComplianceLevel::Level1,
            ComplianceLevel::Level2,
        ];
        for pair in levels.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            for format in lower.supported_formats() {
                assert!(higher.supported_formats().contains(format));
            }
            for quality in lower.supported_qualities() {
                assert!(higher.supported_qualities().contains(quality));
            }
            assert!(higher.supported_formats().len() > lower.supported_formats().len());
        }
    }

    #[test]
    fn test_should_parse_compliance_level_tokens() {
        assert_eq!(
            ComplianceLevel::from_token("level1"),
            Some(ComplianceLevel::Level1)
        );
        assert_eq!(ComplianceLevel::from_token("2"), Some(ComplianceLevel::Level2));
        assert_eq!(ComplianceLevel::from_token("level9"), None);
    }

    #[test]
    fn test_should_normalize_rotation_modulo_360() {
        let rotation = Rotation {
            degrees: 450.0,
            mirror: false,
        };
        assert!((rotation.normalized_degrees() - 90.0).abs() < f64::EPSILON);

        let full_turn = Rotation {
            degrees: 360.0,
            mirror: false,
        };
        assert!(full_turn.normalized_degrees().abs() < f64::EPSILON);
    }
}
