// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGBA8 in → RGBA8 out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x4;
use fir::{FilterType, ResizeAlg, ResizeOptions, Resizer};

use crate::geometry::{Dimensions, ScalePlan};

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall { needed: usize, got: usize },
    EmptyImage,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall { needed, got } => {
                write!(f, "Output buffer too small ({} bytes, need {})", got, needed)
            }
            ScaleError::EmptyImage => write!(f, "Image has a zero-length side"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Resample `plan.crop` of a tightly packed RGBA8 source into `dst`.
/// `dst` must hold at least `plan.out_len()` bytes.
pub fn scale_rgba_cpu(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    if !plan.input.is_valid() || !plan.out.is_valid() {
        return Err(ScaleError::EmptyImage);
    }
    let dst_len = plan.out_len();
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall { needed: dst_len, got: dst.len() });
    }

    let src_view = TypedImageRef::<U8x4>::from_buffer(plan.input.width, plan.input.height, src_rgba)?;
    let mut dst_image = TypedImage::<U8x4>::from_buffer(plan.out.width, plan.out.height, &mut dst[..dst_len])?;

    // Alpha is real transparency here (padded canvases, generated images), so
    // colors must be premultiplied while filtering.
    let crop = plan.crop;
    let opts = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3))
        .crop(crop.x, crop.y, crop.width, crop.height)
        .use_alpha(true);

    resizer.resize_typed::<U8x4>(&src_view, &mut dst_image, &opts)?;
    Ok(())
}

/// Allocate the output buffer and run [`scale_rgba_cpu`].
pub fn scale_rgba_to_vec(
    resizer: &mut Resizer,
    src_rgba: &[u8],
    plan: &ScalePlan,
) -> Result<Vec<u8>, ScaleError> {
    let mut out = vec![0u8; plan.out_len()];
    scale_rgba_cpu(resizer, src_rgba, plan, &mut out)?;
    Ok(out)
}

/// Byte length of a tightly packed RGBA8 image, `None` on overflow.
pub fn rgba_len(dims: Dimensions) -> Option<usize> {
    (dims.width as usize)
        .checked_mul(dims.height as usize)
        .and_then(|px| px.checked_mul(4))
}
