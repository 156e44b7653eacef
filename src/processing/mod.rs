//! # Processing Module
//!
//! This module contains the resize pipelines: crop-scale, outpaint and the raster types they share.

pub mod crop_scale;
pub mod outpaint;
pub mod processor;
pub mod raster;

// Re-export commonly used types for convenience
pub use outpaint::{DEFAULT_PROMPT, OutpaintState, Outpainted};
pub use processor::{CropScaleProcessor, OutpaintProcessor, ResizeProcessor};
pub use raster::{EncodedImage, RasterImage};
