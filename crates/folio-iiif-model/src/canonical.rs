//! Canonical path formatting: the parser's right inverse.
//!
//! `parse(canonical_path(r)) == r` holds for every request the parser can
//! produce. The canonical forms here are externally observable in generated
//! links, so the rotation rendering rules are exact: integral degrees render
//! without a decimal point, fractional degrees with the minimal decimal
//! representation (no trailing zeros, a leading `0` before values below 1),
//! and a mirror flag as a leading `!`.

use crate::request::{ImageRequest, InfoRequest};
use crate::segment::encode_segment;
use crate::types::{Region, Rotation, Size};

/// Render an image request in canonical five-segment form.
#[must_use]
pub fn canonical_path(request: &ImageRequest) -> String {
    format!(
        "/{}/{}/{}/{}/{}.{}",
        encode_segment(&request.identifier),
        format_region(&request.region),
        format_size(&request.size),
        format_rotation(&request.rotation),
        request.quality.as_str(),
        request.format.as_str(),
    )
}

/// Render an info request in canonical form.
#[must_use]
pub fn canonical_info_path(request: &InfoRequest) -> String {
    format!(
        "/{}/info.{}",
        encode_segment(&request.identifier),
        request.format.as_str(),
    )
}

fn format_region(region: &Region) -> String {
    match region {
        Region::Full => "full".to_owned(),
        Region::Absolute {
            x,
            y,
            width,
            height,
        } => format!("{x},{y},{width},{height}"),
        Region::Percentage {
            x,
            y,
            width,
            height,
        } => format!(
            "pct:{},{},{},{}",
            format_degrees(*x),
            format_degrees(*y),
            format_degrees(*width),
            format_degrees(*height)
        ),
    }
}

fn format_size(size: &Size) -> String {
    match size {
        Size::Full => "full".to_owned(),
        Size::Exact { width, height } => format!("{width},{height}"),
        Size::ExactWidth(width) => format!("{width},"),
        Size::ExactHeight(height) => format!(",{height}"),
        Size::Percentage(scale) => format!("pct:{}", format_degrees(*scale)),
        Size::BestFit { width, height } => format!("!{width},{height}"),
    }
}

fn format_rotation(rotation: &Rotation) -> String {
    let degrees = format_degrees(rotation.degrees);
    if rotation.mirror {
        format!("!{degrees}")
    } else {
        degrees
    }
}

/// Render a real number in minimal decimal form.
///
/// `f64`'s `Display` is the shortest representation that round-trips, which
/// is exactly the canonical rule: `90.0` renders as `90`, `120.5` as
/// `120.5`, `0.05` as `0.05` (leading zero included, no trailing zeros).
fn format_degrees(value: f64) -> String {
    format!("{value}")
}
