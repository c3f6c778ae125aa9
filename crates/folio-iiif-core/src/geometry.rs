//! Geometry resolution: from a validated request and known source
//! dimensions to the concrete crop rectangle and output size the backend
//! renderer must apply.
//!
//! All pixel rounding here is round-half-up on the real-valued computation.
//! Out-of-range absolute regions are clipped to the source bounds rather
//! than rejected; this mirrors common IIIF server behavior and is a
//! deliberate compatibility decision. A request that resolves to a zero-area
//! crop or output fails with `UnsatisfiableRequest`.

use folio_iiif_model::{IiifError, IiifResult, ImageRequest, Region, Size};

/// A crop rectangle in source-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Crop width in source pixels.
    pub width: u32,
    /// Crop height in source pixels.
    pub height: u32,
}

/// The resolved pixel geometry of an image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedGeometry {
    /// The source crop rectangle.
    pub crop: CropRect,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

/// Round-half-up to the nearest pixel. Inputs are non-negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_half_up(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}

/// Resolve a request against known source dimensions.
///
/// # Errors
///
/// Returns `UnsatisfiableRequest` if the region or size resolves to zero
/// pixels in either dimension.
pub fn resolve(
    request: &ImageRequest,
    source_width: u32,
    source_height: u32,
) -> IiifResult<ResolvedGeometry> {
    if source_width == 0 || source_height == 0 {
        return Err(IiifError::unsatisfiable(format!(
            "source image has no pixels: {source_width}x{source_height}"
        )));
    }

    let crop = resolve_region(&request.region, source_width, source_height)?;
    let (width, height) = resolve_size(&request.size, crop.width, crop.height)?;

    Ok(ResolvedGeometry {
        crop,
        width,
        height,
    })
}

/// Resolve a region to a crop rectangle clamped to the source bounds.
fn resolve_region(region: &Region, source_width: u32, source_height: u32) -> IiifResult<CropRect> {
    let (x, y, width, height) = match *region {
        Region::Full => (0, 0, source_width, source_height),
        Region::Absolute {
            x,
            y,
            width,
            height,
        } => (x, y, width, height),
        Region::Percentage {
            x,
            y,
            width,
            height,
        } => (
            round_half_up(x * f64::from(source_width) / 100.0),
            round_half_up(y * f64::from(source_height) / 100.0),
            round_half_up(width * f64::from(source_width) / 100.0),
            round_half_up(height * f64::from(source_height) / 100.0),
        ),
    };

    if x >= source_width || y >= source_height {
        return Err(
            IiifError::unsatisfiable(format!("region origin ({x},{y}) is outside the source"))
                .with_resource(format!("{x},{y},{width},{height}")),
        );
    }

    // Clip, don't reject: regions running past the edge are reduced to the
    // intersection with the source rectangle.
    let width = width.min(source_width - x);
    let height = height.min(source_height - y);

    if width == 0 || height == 0 {
        return Err(
            IiifError::unsatisfiable("region resolves to an empty rectangle")
                .with_resource(format!("{x},{y},{width},{height}")),
        );
    }

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

/// Resolve a size against the just-computed crop dimensions.
fn resolve_size(size: &Size, crop_width: u32, crop_height: u32) -> IiifResult<(u32, u32)> {
    let (width, height) = match *size {
        Size::Full => (crop_width, crop_height),
        Size::Exact { width, height } => (width, height),
        Size::ExactWidth(width) => {
            let height =
                round_half_up(f64::from(width) * f64::from(crop_height) / f64::from(crop_width));
            (width, height)
        }
        Size::ExactHeight(height) => {
            let width =
                round_half_up(f64::from(height) * f64::from(crop_width) / f64::from(crop_height));
            (width, height)
        }
        Size::Percentage(scale) => (
            round_half_up(f64::from(crop_width) * scale / 100.0),
            round_half_up(f64::from(crop_height) * scale / 100.0),
        ),
        Size::BestFit {
            width: bound_width,
            height: bound_height,
        } => {
            let scale_x = f64::from(bound_width) / f64::from(crop_width);
            let scale_y = f64::from(bound_height) / f64::from(crop_height);
            let scale = scale_x.min(scale_y).min(1.0);
            (
                round_half_up(f64::from(crop_width) * scale),
                round_half_up(f64::from(crop_height) * scale),
            )
        }
    };

    if width == 0 || height == 0 {
        return Err(IiifError::unsatisfiable(format!(
            "size resolves to {width}x{height}"
        )));
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use folio_iiif_model::{Format, ImageRequest, Quality, Rotation};

    use super::*;

    fn request(region: Region, size: Size) -> ImageRequest {
        ImageRequest {
            identifier: "id".to_owned(),
            region,
            size,
            rotation: Rotation::none(),
            quality: Quality::Default,
            format: Format::Jpg,
        }
    }

    #[test]
    fn test_should_resolve_full_full_to_source() {
        let geometry =
            resolve(&request(Region::Full, Size::Full), 3732, 5742).expect("should resolve");
        assert_eq!(
            geometry.crop,
            CropRect {
                x: 0,
                y: 0,
                width: 3732,
                height: 5742
            }
        );
        assert_eq!((geometry.width, geometry.height), (3732, 5742));
    }

    #[test]
    fn test_should_derive_height_for_exact_width() {
        let geometry = resolve(&request(Region::Full, Size::ExactWidth(200)), 3732, 5742)
            .expect("should resolve");
        // round(200 * 5742 / 3732) = round(307.72...) = 308
        assert_eq!((geometry.width, geometry.height), (200, 308));
    }

    #[test]
    fn test_should_derive_width_for_exact_height() {
        let geometry = resolve(&request(Region::Full, Size::ExactHeight(308)), 3732, 5742)
            .expect("should resolve");
        // round(308 * 3732 / 5742) = round(200.18...) = 200
        assert_eq!((geometry.width, geometry.height), (200, 308));
    }

    #[test]
    fn test_should_scale_percentage_of_crop() {
        let region = Region::Absolute {
            x: 0,
            y: 10,
            width: 100,
            height: 201,
        };
        let geometry =
            resolve(&request(region, Size::Percentage(50.0)), 3732, 5742).expect("should resolve");
        assert_eq!(geometry.crop.width, 100);
        assert_eq!(geometry.crop.height, 201);
        // Half-up: 201 * 0.5 = 100.5 rounds to 101.
        assert_eq!((geometry.width, geometry.height), (50, 101));
    }

    #[test]
    fn test_should_fit_inside_best_fit_bounds() {
        let geometry = resolve(
            &request(
                Region::Full,
                Size::BestFit {
                    width: 100,
                    height: 200,
                },
            ),
            1000,
            1000,
        )
        .expect("should resolve");
        // Uniform scale 0.1 from the width bound.
        assert_eq!((geometry.width, geometry.height), (100, 100));
        assert!(geometry.width <= 100 && geometry.height <= 200);
    }

    #[test]
    fn test_should_not_upscale_for_best_fit() {
        let geometry = resolve(
            &request(
                Region::Full,
                Size::BestFit {
                    width: 5000,
                    height: 5000,
                },
            ),
            1000,
            800,
        )
        .expect("should resolve");
        // Scale capped at 1.0: never larger than the crop.
        assert_eq!((geometry.width, geometry.height), (1000, 800));
    }

    #[test]
    fn test_should_clip_overrunning_absolute_region() {
        let region = Region::Absolute {
            x: 3000,
            y: 5000,
            width: 2000,
            height: 2000,
        };
        let geometry = resolve(&request(region, Size::Full), 3732, 5742).expect("should resolve");
        assert_eq!(
            geometry.crop,
            CropRect {
                x: 3000,
                y: 5000,
                width: 732,
                height: 742
            }
        );
    }

    #[test]
    fn test_should_reject_region_starting_outside_source() {
        let region = Region::Absolute {
            x: 4000,
            y: 0,
            width: 100,
            height: 100,
        };
        let err = resolve(&request(region, Size::Full), 3732, 5742).expect_err("should fail");
        assert_eq!(
            err.code,
            folio_iiif_model::IiifErrorCode::UnsatisfiableRequest
        );
    }

    #[test]
    fn test_should_reject_zero_size_crop() {
        let region = Region::Absolute {
            x: 0,
            y: 0,
            width: 0,
            height: 100,
        };
        let err = resolve(&request(region, Size::Full), 3732, 5742).expect_err("should fail");
        assert_eq!(
            err.code,
            folio_iiif_model::IiifErrorCode::UnsatisfiableRequest
        );
    }

    #[test]
    fn test_should_reject_zero_output_size() {
        let err = resolve(
            &request(Region::Full, Size::Percentage(0.0)),
            3732,
            5742,
        )
        .expect_err("should fail");
        assert_eq!(
            err.code,
            folio_iiif_model::IiifErrorCode::UnsatisfiableRequest
        );
    }

    #[test]
    fn test_should_resolve_percentage_region_with_rounding() {
        let region = Region::Percentage {
            x: 10.0,
            y: 10.0,
            width: 50.0,
            height: 50.0,
        };
        let geometry = resolve(&request(region, Size::Full), 1001, 1001).expect("should resolve");
        // 10% of 1001 = 100.1 -> 100; 50% of 1001 = 500.5 -> 501 (half-up).
        assert_eq!(
            geometry.crop,
            CropRect {
                x: 100,
                y: 100,
                width: 501,
                height: 501
            }
        );
    }

    #[test]
    fn test_should_allow_distorting_exact_size() {
        let geometry = resolve(
            &request(
                Region::Full,
                Size::Exact {
                    width: 10,
                    height: 500,
                },
            ),
            1000,
            1000,
        )
        .expect("should resolve");
        assert_eq!((geometry.width, geometry.height), (10, 500));
    }
}
