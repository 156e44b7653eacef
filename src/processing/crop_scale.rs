//! # Crop-Scale Pipeline
//!
//! Deterministic, network-free resizing on top of `resize_scale`:
//!
//! - [`resize`]: cover. Take the largest centered rect of the target aspect and
//!   resample it to exactly the target size.
//! - [`scale_to`]: stretch. Resample the whole raster into the target bounds,
//!   used as the final step of the outpaint pipeline.
//!
//! Identical input and target always produce identical pixels.
//!
//! ## Output Format
//!
//! The returned raster keeps the format it was decoded from. When encoding, the
//! request layer keeps JPEG as JPEG and writes everything else as PNG, so a
//! WEBP (or GIF, BMP, ...) source comes back as PNG rather than in its own format.

use fast_image_resize::Resizer;
use image::RgbaImage;
use log::debug;
use resize_scale::cpu::{rgba_len, scale_rgba_cpu};
use resize_scale::geometry::{FitMode, build_plan};
use resize_scale::Dimensions;

use crate::error::{ResizeError, ResizeResult};
use crate::processing::raster::RasterImage;

/// Cover-resize `image` to exactly `target`, cropping the overflowing axis.
pub fn resize(image: &RasterImage, target: Dimensions, max_side: u32) -> ResizeResult<RasterImage> {
    render(image, target, max_side, FitMode::Cover, "crop_scale")
}

/// Stretch all of `image` into exactly `target`.
pub fn scale_to(image: &RasterImage, target: Dimensions, max_side: u32) -> ResizeResult<RasterImage> {
    render(image, target, max_side, FitMode::Stretch, "scale_to")
}

fn render(
    image: &RasterImage,
    target: Dimensions,
    max_side: u32,
    mode: FitMode,
    operation: &str,
) -> ResizeResult<RasterImage> {
    if !target.is_valid() {
        return Err(ResizeError::invalid_dimensions(target));
    }
    check_output_limits(target, max_side).map_err(|e| e.with_operation(operation))?;

    let input = image.dimensions();
    let plan = build_plan(input, target, mode);
    debug!(
        "{}: {} -> {} crop=({:.2},{:.2} {:.2}x{:.2})",
        operation, input, target, plan.crop.x, plan.crop.y, plan.crop.width, plan.crop.height
    );

    let mut out = vec![0u8; plan.out_len()];
    let mut resizer = Resizer::new();
    scale_rgba_cpu(&mut resizer, image.pixels.as_raw(), &plan, &mut out)
        .map_err(|e| ResizeError::from(e).with_operation(operation))?;

    let pixels = RgbaImage::from_raw(target.width, target.height, out).ok_or_else(|| {
        ResizeError::render(operation, "output buffer does not match target size")
    })?;
    Ok(RasterImage {
        pixels,
        format: image.format,
    })
}

/// Reject targets that exceed `max_side` or whose buffer size overflows.
pub fn check_output_limits(target: Dimensions, max_side: u32) -> ResizeResult<()> {
    if target.width > max_side || target.height > max_side {
        return Err(ResizeError::render(
            "allocate",
            format!("target {} exceeds the maximum side of {} px", target, max_side),
        )
        .with_recovery_suggestion("Choose a smaller output size."));
    }
    if rgba_len(target).is_none() {
        return Err(ResizeError::render(
            "allocate",
            format!("target {} is too large to allocate", target),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const MAX: u32 = 16_384;

    /// Left half red, right half blue.
    fn split(width: u32, height: u32) -> RasterImage {
        RasterImage::new(RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        }))
    }

    #[test]
    fn resize_produces_exact_target() {
        let out = resize(&split(800, 600), Dimensions::new(192, 108), MAX).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(192, 108));
    }

    #[test]
    fn resize_crops_instead_of_squashing() {
        // 400x100 -> 100x100 keeps only the centered square, which straddles the split.
        let out = resize(&split(400, 100), Dimensions::new(100, 100), MAX).unwrap();
        let left = out.pixels.get_pixel(0, 50);
        let right = out.pixels.get_pixel(99, 50);
        assert!(left[0] > 200 && left[2] < 50, "{:?}", left);
        assert!(right[2] > 200 && right[0] < 50, "{:?}", right);
    }

    #[test]
    fn scale_to_keeps_whole_source() {
        // Stretching keeps both halves at their relative position.
        let out = scale_to(&split(400, 100), Dimensions::new(40, 40), MAX).unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(40, 40));
        assert!(out.pixels.get_pixel(2, 20)[0] > 200);
        assert!(out.pixels.get_pixel(37, 20)[2] > 200);
    }

    #[test]
    fn zero_target_is_invalid() {
        let err = resize(&split(10, 10), Dimensions::new(0, 500), MAX).unwrap_err();
        assert_eq!(err.category(), "invalid_dimensions");
    }

    #[test]
    fn oversized_target_is_render_error() {
        let err = scale_to(&split(10, 10), Dimensions::new(MAX + 1, 10), MAX).unwrap_err();
        assert_eq!(err.category(), "render");
        assert_eq!(err.context().operation.as_deref(), Some("scale_to"));
    }
}
