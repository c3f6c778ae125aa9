//! The IIIF image URL parser.
//!
//! Two layers: [`classify`] is a total, never-failing triage of a raw path
//! into a [`RequestType`], safe to probe with arbitrary strings; the
//! `parse_*` entry points perform the full grammar validation and are the
//! only functions here that produce errors.
//!
//! The operation grammar is
//! `/{identifier}/{region}/{size}/{rotation}/{quality}.{format}`; a bare
//! `/{identifier}` is the implicit `full/full/0/default` request.

use crate::error::{IiifError, IiifResult};
use crate::request::{ImageRequest, InfoRequest, RequestType};
use crate::segment::decode_segment;
use crate::types::{Format, Quality, Region, Rotation, Size};

/// Validate and decode an identifier token.
///
/// The token must consist of URI path-segment characters (`pchar`):
/// unreserved characters, sub-delims, `:`, `@`, or percent-escapes.
/// Brackets, spaces, backslashes, and other bytes a URI segment cannot
/// carry fail as `MalformedRequest`.
fn decode_identifier(token: &str) -> IiifResult<String> {
    let valid = token.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || matches!(
                c,
                '-' | '.' | '_' | '~' | '%' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+'
                    | ',' | ';' | '=' | ':' | '@'
            )
    });
    if !valid {
        return Err(
            IiifError::malformed(format!("bad identifier segment: {token:?}")).with_resource(token),
        );
    }
    Ok(decode_segment(token))
}

/// The path suffix identifying a capability request.
const INFO_SUFFIX: &str = "/info.json";

/// Split a path into its slash-delimited segments, ignoring a leading `/`.
fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

/// Classify a raw path ahead of full parsing.
///
/// This is total: empty input, garbage, and partial paths all return a calm
/// classification, never an error. Callers probe arbitrary strings here.
#[must_use]
pub fn classify(path: &str) -> RequestType {
    if path.ends_with(INFO_SUFFIX) {
        return RequestType::Info;
    }

    let segs = segments(path);
    match segs.len() {
        1 if !segs[0].is_empty() => RequestType::Image,
        5 if segs.iter().all(|s| !s.is_empty()) => RequestType::Operation,
        _ => RequestType::Invalid,
    }
}

/// Parse a path into a validated [`ImageRequest`].
///
/// Accepts both the five-segment operation form and the bare-identifier
/// form; the latter becomes `full/full/0/default` in `default_format`.
///
/// # Errors
///
/// Returns a `MalformedRequest` error naming the offending segment if the
/// path does not satisfy the grammar.
pub fn parse_image_request(path: &str, default_format: Format) -> IiifResult<ImageRequest> {
    match classify(path) {
        RequestType::Image => {
            let segs = segments(path);
            Ok(ImageRequest::bare(decode_identifier(segs[0])?, default_format))
        }
        RequestType::Operation => {
            let segs = segments(path);
            let (quality, format) = parse_quality_format(segs[4])?;
            Ok(ImageRequest {
                identifier: decode_identifier(segs[0])?,
                region: parse_region(segs[1])?,
                size: parse_size(segs[2])?,
                rotation: parse_rotation(segs[3])?,
                quality,
                format,
            })
        }
        RequestType::Info | RequestType::Invalid => {
            Err(IiifError::malformed(format!("not an image request path: {path:?}")).with_resource(path))
        }
    }
}

/// Parse a path into a validated [`InfoRequest`].
///
/// # Errors
///
/// Returns a `MalformedRequest` error if the path is not
/// `/{identifier}/info.json` with a non-empty identifier.
pub fn parse_info_request(path: &str) -> IiifResult<InfoRequest> {
    if classify(path) != RequestType::Info {
        return Err(
            IiifError::malformed(format!("not an info request path: {path:?}")).with_resource(path),
        );
    }

    let segs = segments(path);
    if segs.len() != 2 || segs[0].is_empty() {
        return Err(
            IiifError::malformed(format!("info path needs an identifier: {path:?}"))
                .with_resource(path),
        );
    }

    Ok(InfoRequest::new(decode_identifier(segs[0])?))
}

/// Parse a region segment: `full`, `pct:x,y,w,h`, or `x,y,w,h`.
fn parse_region(segment: &str) -> IiifResult<Region> {
    if segment == "full" {
        return Ok(Region::Full);
    }

    if let Some(rest) = segment.strip_prefix("pct:") {
        let [x, y, width, height] = parse_reals(rest, segment)?;
        for value in [x, y, width, height] {
            if !(0.0..=100.0).contains(&value) {
                return Err(region_error(segment));
            }
        }
        return Ok(Region::Percentage {
            x,
            y,
            width,
            height,
        });
    }

    let parts: Vec<&str> = segment.split(',').collect();
    if parts.len() != 4 {
        return Err(region_error(segment));
    }
    let mut values = [0u32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| region_error(segment))?;
    }
    let [x, y, width, height] = values;
    Ok(Region::Absolute {
        x,
        y,
        width,
        height,
    })
}

fn region_error(segment: &str) -> IiifError {
    IiifError::malformed(format!("bad region segment: {segment:?}")).with_resource(segment)
}

/// Parse four comma-separated finite reals.
fn parse_reals(list: &str, segment: &str) -> IiifResult<[f64; 4]> {
    let parts: Vec<&str> = list.split(',').collect();
    if parts.len() != 4 {
        return Err(region_error(segment));
    }
    let mut values = [0.0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let parsed: f64 = part.parse().map_err(|_| region_error(segment))?;
        if !parsed.is_finite() {
            return Err(region_error(segment));
        }
        *slot = parsed;
    }
    Ok(values)
}

/// Parse a size segment: `full`, `!w,h`, `w,h`, `w,`, `,h`, or `pct:n`.
fn parse_size(segment: &str) -> IiifResult<Size> {
    let err = || IiifError::malformed(format!("bad size segment: {segment:?}")).with_resource(segment);

    if segment == "full" {
        return Ok(Size::Full);
    }

    if let Some(rest) = segment.strip_prefix("pct:") {
        let scale: f64 = rest.parse().map_err(|_| err())?;
        if !scale.is_finite() || scale < 0.0 {
            return Err(err());
        }
        return Ok(Size::Percentage(scale));
    }

    if let Some(rest) = segment.strip_prefix('!') {
        let Some((w, h)) = rest.split_once(',') else {
            return Err(err());
        };
        let width = w.parse().map_err(|_| err())?;
        let height = h.parse().map_err(|_| err())?;
        return Ok(Size::BestFit { width, height });
    }

    let Some((w, h)) = segment.split_once(',') else {
        return Err(err());
    };
    match (w, h) {
        ("", "") => Err(err()),
        (w, "") => Ok(Size::ExactWidth(w.parse().map_err(|_| err())?)),
        ("", h) => Ok(Size::ExactHeight(h.parse().map_err(|_| err())?)),
        (w, h) => Ok(Size::Exact {
            width: w.parse().map_err(|_| err())?,
            height: h.parse().map_err(|_| err())?,
        }),
    }
}

/// Parse a rotation segment: an optional leading `!` (mirror) followed by a
/// non-negative real. Values are not range-reduced here; `300` stays `300`.
fn parse_rotation(segment: &str) -> IiifResult<Rotation> {
    let err =
        || IiifError::malformed(format!("bad rotation segment: {segment:?}")).with_resource(segment);

    let (mirror, rest) = match segment.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, segment),
    };

    if rest.is_empty() {
        return Err(err());
    }
    let degrees: f64 = rest.parse().map_err(|_| err())?;
    if !degrees.is_finite() || degrees < 0.0 {
        return Err(err());
    }

    Ok(Rotation { degrees, mirror })
}

/// Parse the final `quality.format` segment, split on the last `.`.
fn parse_quality_format(segment: &str) -> IiifResult<(Quality, Format)> {
    let err = || {
        IiifError::malformed(format!("bad quality/format segment: {segment:?}"))
            .with_resource(segment)
    };

    let Some((quality_token, format_token)) = segment.rsplit_once('.') else {
        return Err(err());
    };
    let quality = Quality::from_token(quality_token).ok_or_else(err)?;
    let format = Format::from_token(format_token).ok_or_else(err)?;
    Ok((quality, format))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_without_failing_on_garbage() {
        assert_eq!(classify(""), RequestType::Invalid);
        assert_eq!(classify("/"), RequestType::Invalid);
        assert_eq!(classify("\\aA'"), RequestType::Image);
        assert_eq!(classify("/iiif"), RequestType::Image);
        assert_eq!(classify("//"), RequestType::Invalid);
        assert_eq!(classify("/a/b/c"), RequestType::Invalid);
    }

    #[test]
    fn test_should_classify_info_paths() {
        assert_eq!(classify("/Walters.W102.003r/info.json"), RequestType::Info);
        assert_eq!(classify("/id/info.json"), RequestType::Info);
    }

    #[test]
    fn test_should_classify_operation_paths() {
        assert_eq!(
            classify("/id1/0,10,100,200/pct:50/90/default.png"),
            RequestType::Operation
        );
        assert_eq!(
            classify("/id1/0,10,100,200//90/default.png"),
            RequestType::Invalid
        );
    }

    #[test]
    fn test_should_parse_bare_identifier_with_defaults() {
        let request = parse_image_request("/Walters.W102.003r", Format::Jpg).expect("should parse");
        assert_eq!(request, ImageRequest::bare("Walters.W102.003r", Format::Jpg));
    }

    #[test]
    fn test_should_parse_absolute_region_and_percent_size() {
        let request =
            parse_image_request("/id1/0,10,100,200/pct:50/90/default.png", Format::Jpg)
                .expect("should parse");
        assert_eq!(
            request.region,
            Region::Absolute {
                x: 0,
                y: 10,
                width: 100,
                height: 200
            }
        );
        assert_eq!(request.size, Size::Percentage(50.0));
        assert_eq!(
            request.rotation,
            Rotation {
                degrees: 90.0,
                mirror: false
            }
        );
        assert_eq!(request.quality, Quality::Default);
        assert_eq!(request.format, Format::Png);
    }

    #[test]
    fn test_should_parse_best_fit_size() {
        let request =
            parse_image_request("/moo/full/!100,200/90.0/color.tif", Format::Jpg)
                .expect("should parse");
        assert_eq!(
            request.size,
            Size::BestFit {
                width: 100,
                height: 200
            }
        );
        assert_eq!(request.quality, Quality::Color);
        assert_eq!(request.format, Format::Tif);
    }

    #[test]
    fn test_should_parse_percentage_region() {
        let request =
            parse_image_request("/id/pct:5,5,90,90/full/0/default.jpg", Format::Jpg)
                .expect("should parse");
        assert_eq!(
            request.region,
            Region::Percentage {
                x: 5.0,
                y: 5.0,
                width: 90.0,
                height: 90.0
            }
        );
    }

    #[test]
    fn test_should_reject_percentage_region_out_of_range() {
        let err = parse_image_request("/id/pct:0,0,120,50/full/0/default.jpg", Format::Jpg)
            .expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
    }

    #[test]
    fn test_should_parse_single_dimension_sizes() {
        let request = parse_image_request("/id/full/150,/0/default.jpg", Format::Jpg)
            .expect("should parse");
        assert_eq!(request.size, Size::ExactWidth(150));

        let request = parse_image_request("/id/full/,220/0/default.jpg", Format::Jpg)
            .expect("should parse");
        assert_eq!(request.size, Size::ExactHeight(220));

        let request = parse_image_request("/id/full/150,220/0/default.jpg", Format::Jpg)
            .expect("should parse");
        assert_eq!(
            request.size,
            Size::Exact {
                width: 150,
                height: 220
            }
        );
    }

    #[test]
    fn test_should_preserve_unreduced_rotation() {
        let request =
            parse_image_request("/id/full/full/360/default.jpg", Format::Jpg).expect("should parse");
        assert!((request.rotation.degrees - 360.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_should_parse_mirrored_rotation() {
        let request = parse_image_request("/id/full/full/!300/default.jpg", Format::Jpg)
            .expect("should parse");
        assert!(request.rotation.mirror);
        assert!((request.rotation.degrees - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_should_reject_bracketed_identifier() {
        let err = parse_image_request("/[frob]/full/full/0/default.jpg", Format::Jpg)
            .expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
        assert_eq!(err.resource.as_deref(), Some("[frob]"));
    }

    #[test]
    fn test_should_reject_brackets_in_region() {
        let err = parse_image_request("/id/[frob]/full/0/default.jpg", Format::Jpg)
            .expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
        assert_eq!(err.resource.as_deref(), Some("[frob]"));
    }

    #[test]
    fn test_should_reject_unknown_quality_and_format() {
        let err = parse_image_request("/id/full/full/0/shiny.jpg", Format::Jpg)
            .expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);

        let err = parse_image_request("/id/full/full/0/default.bmp", Format::Jpg)
            .expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
    }

    #[test]
    fn test_should_reject_negative_rotation() {
        let err = parse_image_request("/id/full/full/-90/default.jpg", Format::Jpg)
            .expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
    }

    #[test]
    fn test_should_decode_identifier_one_layer() {
        let request = parse_image_request(
            "/f23dc590%252D0a80/full/full/0/default.jpg",
            Format::Jpg,
        )
        .expect("should parse");
        assert_eq!(request.identifier, "f23dc590%2D0a80");
    }

    #[test]
    fn test_should_parse_info_request() {
        let request = parse_info_request("/Walters.W102.003r/info.json").expect("should parse");
        assert_eq!(request.identifier, "Walters.W102.003r");
        assert_eq!(request.format.as_str(), "json");
    }

    #[test]
    fn test_should_reject_info_request_without_identifier() {
        let err = parse_info_request("/info.json").expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
    }

    #[test]
    fn test_should_reject_image_parse_of_info_path() {
        let err =
            parse_image_request("/id/info.json", Format::Jpg).expect_err("should fail");
        assert_eq!(err.code, crate::error::IiifErrorCode::MalformedRequest);
    }
}
