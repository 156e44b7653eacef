// SPDX-License-Identifier: MIT
//! # resize-scale: Aspect-Aware Geometry and Scaling
//!
//! Geometry and pixel kernels behind the crop and outpaint resize paths.
//!
//! ## Key Components
//!
//! - [`geometry`]: aspect comparison, cover crop rects, contain pad canvases, scale plans
//! - [`presets`]: standard social/video output sizes and `WIDTHxHEIGHT` parsing
//! - [`cpu`]: SIMD-accelerated RGBA8 resampling via fast_image_resize
//!
//! ## Usage Example
//!
//! ```rust
//! use resize_scale::cpu::scale_rgba_to_vec;
//! use resize_scale::geometry::{build_plan, Dimensions, FitMode};
//!
//! let input = Dimensions::new(800, 600);
//! let plan = build_plan(input, Dimensions::new(1920, 1080), FitMode::Cover);
//! assert_eq!(plan.crop.y, 75.0);
//!
//! let rgba = vec![255u8; 800 * 600 * 4];
//! let mut resizer = fast_image_resize::Resizer::new();
//! let out = scale_rgba_to_vec(&mut resizer, &rgba, &plan).unwrap();
//! assert_eq!(out.len(), 1920 * 1080 * 4);
//! ```

pub mod cpu;
pub mod geometry;
pub mod presets;

pub use geometry::{Dimensions, FitMode, PadCanvas, Rect, ScalePlan};
