// SPDX-License-Identifier: MIT
//! # Rect and Aspect Geometry
//!
//! Pure, side-effect-free layout math shared by the crop and outpaint paths.
//!
//! ## Cover vs. Contain
//!
//! Two complementary fits are computed from a source size and a target size:
//! 1. **Cover** ([`fit_crop_rect`]): the largest centered sub-rectangle of the source that has
//!    the target aspect ratio. Scaling it to the target leaves no empty border.
//! 2. **Contain** ([`fit_pad_canvas`]): the smallest canvas with the target aspect ratio that
//!    holds the whole source at its original resolution, with the source centered.
//!
//! Aspect ratios closer than [`ASPECT_EPSILON`] are treated as identical, in which case both
//! fits return the source unchanged.
//!
//! ## Precision
//!
//! Crop rectangles stay in `f64` source coordinates: the scaling kernel samples fractional crop
//! boxes directly, so no rounding is introduced before resampling. Pad canvases are whole
//! pixels because they are allocated as real rasters.

/// Aspect ratios differing by less than this are considered equal.
pub const ASPECT_EPSILON: f64 = 0.01;

/// Pixel dimensions of an image or a requested output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height. Callers must have checked [`is_valid`](Self::is_valid).
    pub fn aspect(&self) -> f64 {
        aspect_ratio(self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Rectangle in source pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Rect covering a whole `w`×`h` image.
    pub fn full(w: u32, h: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: f64::from(w),
            height: f64::from(h),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// True when the rect lies entirely inside a `w`×`h` image.
    pub fn is_within(&self, w: u32, h: u32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= f64::from(w)
            && self.y + self.height <= f64::from(h)
    }
}

/// Canvas that contains a source image at its original resolution.
///
/// `draw_x`/`draw_y` is the top-left corner where the source is placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadCanvas {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub draw_x: u32,
    pub draw_y: u32,
}

impl PadCanvas {
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.canvas_width, self.canvas_height)
    }

    /// True when the canvas adds no border at all.
    pub fn is_identity(&self, source_w: u32, source_h: u32) -> bool {
        self.canvas_width == source_w && self.canvas_height == source_h
    }
}

/// Width divided by height.
///
/// # Panics
/// A zero height is a caller bug and panics in debug builds.
pub fn aspect_ratio(w: u32, h: u32) -> f64 {
    debug_assert!(h != 0, "aspect_ratio called with zero height");
    f64::from(w) / f64::from(h)
}

/// `|a - b| < ASPECT_EPSILON`.
pub fn aspects_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < ASPECT_EPSILON
}

/// Largest centered rect of the source with the target's aspect ratio ("cover").
///
/// Scenario: 800×600 into 1920×1080 crops the height to 450 rows starting at `y = 75`.
pub fn fit_crop_rect(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> Rect {
    let aspect_src = aspect_ratio(source_w, source_h);
    let aspect_tgt = aspect_ratio(target_w, target_h);
    let (sw, sh) = (f64::from(source_w), f64::from(source_h));
    let (tw, th) = (f64::from(target_w), f64::from(target_h));

    if aspects_equal(aspect_src, aspect_tgt) {
        return Rect::full(source_w, source_h);
    }

    // `sh * tw / th` is `sh * aspect_tgt` without the rounding of the intermediate ratio.
    if aspect_src > aspect_tgt {
        // Source is wider: trim left and right.
        let crop_w = (sh * tw / th).min(sw);
        Rect {
            x: (sw - crop_w) / 2.0,
            y: 0.0,
            width: crop_w,
            height: sh,
        }
    } else {
        // Source is taller: trim top and bottom.
        let crop_h = (sw * th / tw).min(sh);
        Rect {
            x: 0.0,
            y: (sh - crop_h) / 2.0,
            width: sw,
            height: crop_h,
        }
    }
}

/// Smallest target-aspect canvas holding the whole source, centered ("contain").
///
/// The grown side is rounded to the nearest pixel and never falls below the source side.
/// Scenario: 1000×1000 into 1080×1350 gives a 1000×1250 canvas drawn at `y = 125`.
pub fn fit_pad_canvas(source_w: u32, source_h: u32, target_w: u32, target_h: u32) -> PadCanvas {
    let aspect_src = aspect_ratio(source_w, source_h);
    let aspect_tgt = aspect_ratio(target_w, target_h);
    let (sw, sh) = (f64::from(source_w), f64::from(source_h));
    let (tw, th) = (f64::from(target_w), f64::from(target_h));

    if aspects_equal(aspect_src, aspect_tgt) {
        return PadCanvas {
            canvas_width: source_w,
            canvas_height: source_h,
            draw_x: 0,
            draw_y: 0,
        };
    }

    if aspect_src > aspect_tgt {
        // Source is wider: add rows above and below.
        let canvas_h = grow_side(sw * th / tw, source_h);
        PadCanvas {
            canvas_width: source_w,
            canvas_height: canvas_h,
            draw_x: 0,
            draw_y: (canvas_h - source_h) / 2,
        }
    } else {
        // Source is taller: add columns left and right.
        let canvas_w = grow_side(sh * tw / th, source_w);
        PadCanvas {
            canvas_width: canvas_w,
            canvas_height: source_h,
            draw_x: (canvas_w - source_w) / 2,
            draw_y: 0,
        }
    }
}

/// How a source is mapped onto an exact output size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitMode {
    /// Center-crop to the output aspect, then scale. No distortion, no border.
    Cover,
    /// Scale the whole source into the output bounds, distorting if aspects differ.
    Stretch,
}

/// Everything the scaler needs: which part of the source goes to which output size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePlan {
    pub input: Dimensions,
    pub mode: FitMode,
    /// Source region that is resampled.
    pub crop: Rect,
    pub out: Dimensions,
}

impl ScalePlan {
    /// Output buffer length for RGBA8.
    pub fn out_len(&self) -> usize {
        self.out.width as usize * self.out.height as usize * 4
    }
}

/// Compute a plan mapping `input` onto exactly `out`.
pub fn build_plan(input: Dimensions, out: Dimensions, mode: FitMode) -> ScalePlan {
    let crop = match mode {
        FitMode::Cover => fit_crop_rect(input.width, input.height, out.width, out.height),
        FitMode::Stretch => Rect::full(input.width, input.height),
    };
    ScalePlan {
        input,
        mode,
        crop,
        out,
    }
}

fn grow_side(exact: f64, min: u32) -> u32 {
    let rounded = exact.round();
    if rounded >= f64::from(u32::MAX) {
        return u32::MAX;
    }
    (rounded as u32).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_scenario_wide_target() {
        let rect = fit_crop_rect(800, 600, 1920, 1080);
        assert_eq!(
            rect,
            Rect {
                x: 0.0,
                y: 75.0,
                width: 800.0,
                height: 450.0
            }
        );
    }

    #[test]
    fn crop_trims_width_of_wide_source() {
        let rect = fit_crop_rect(2000, 1000, 1000, 1000);
        assert_eq!(rect.x, 500.0);
        assert_eq!(rect.width, 1000.0);
        assert_eq!(rect.height, 1000.0);
    }

    #[test]
    fn crop_near_equal_aspect_keeps_full_source() {
        // 1.3333 vs 1.3400: inside the 1% window.
        let rect = fit_crop_rect(1024, 768, 1340, 1000);
        assert_eq!(rect, Rect::full(1024, 768));
    }

    #[test]
    fn pad_scenario_portrait_target() {
        let canvas = fit_pad_canvas(1000, 1000, 1080, 1350);
        assert_eq!(
            canvas,
            PadCanvas {
                canvas_width: 1000,
                canvas_height: 1250,
                draw_x: 0,
                draw_y: 125
            }
        );
    }

    #[test]
    fn pad_grows_width_of_tall_source() {
        let canvas = fit_pad_canvas(600, 800, 1920, 1080);
        assert_eq!(canvas.canvas_height, 800);
        assert_eq!(canvas.canvas_width, 1422);
        assert_eq!(canvas.draw_x, 411);
    }

    #[test]
    fn pad_equal_aspect_is_identity() {
        let canvas = fit_pad_canvas(1920, 1080, 1280, 720);
        assert!(canvas.is_identity(1920, 1080));
        assert_eq!((canvas.draw_x, canvas.draw_y), (0, 0));
    }

    #[test]
    fn stretch_plan_uses_whole_source() {
        let plan = build_plan(
            Dimensions::new(300, 100),
            Dimensions::new(100, 100),
            FitMode::Stretch,
        );
        assert_eq!(plan.crop, Rect::full(300, 100));
        assert_eq!(plan.out_len(), 100 * 100 * 4);

        let cover = build_plan(
            Dimensions::new(300, 100),
            Dimensions::new(100, 100),
            FitMode::Cover,
        );
        assert_eq!(cover.crop.x, 100.0);
        assert_eq!(cover.crop.width, 100.0);
    }

    #[test]
    fn epsilon_boundary() {
        assert!(aspects_equal(1.5, 1.5));
        assert!(aspects_equal(1.0, 1.0099));
        assert!(!aspects_equal(1.0, 1.01));
        assert!(!aspects_equal(1.0, 0.98));
    }

    #[test]
    fn dimensions_validity() {
        assert!(Dimensions::new(1, 1).is_valid());
        assert!(!Dimensions::new(0, 500).is_valid());
        assert!(!Dimensions::new(500, 0).is_valid());
        assert_eq!(Dimensions::new(1920, 1080).to_string(), "1920x1080");
    }
}
