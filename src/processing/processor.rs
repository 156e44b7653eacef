//! Resize processors behind a common async interface.
//!
//! Each processor turns one decoded raster into one raster of exactly the
//! requested size. The request layer picks a processor from
//! [`ResizeMethod`](crate::ResizeMethod) and never branches on it again.

use std::sync::Arc;

use async_trait::async_trait;
use resize_scale::Dimensions;

use crate::error::ResizeResult;
use crate::processing::crop_scale;
use crate::processing::outpaint;
use crate::processing::raster::RasterImage;
use crate::remote::GenerationClient;

/// Abstract resize interface.
#[async_trait]
pub trait ResizeProcessor: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Resize `image` to exactly `target`.
    async fn process(&self, image: &RasterImage, target: Dimensions) -> ResizeResult<RasterImage>;
}

/// Center-crop and scale, no network.
#[derive(Debug, Clone, Copy)]
pub struct CropScaleProcessor {
    max_side: u32,
}

impl CropScaleProcessor {
    pub fn new(max_side: u32) -> Self {
        Self { max_side }
    }
}

#[async_trait]
impl ResizeProcessor for CropScaleProcessor {
    fn name(&self) -> &'static str {
        "crop"
    }

    async fn process(&self, image: &RasterImage, target: Dimensions) -> ResizeResult<RasterImage> {
        crop_scale::resize(image, target, self.max_side)
    }
}

/// Pad, generate and rescale through a [`GenerationClient`].
pub struct OutpaintProcessor {
    client: Arc<dyn GenerationClient>,
    prompt: Option<String>,
    max_side: u32,
}

impl OutpaintProcessor {
    pub fn new(client: Arc<dyn GenerationClient>, prompt: Option<String>, max_side: u32) -> Self {
        Self {
            client,
            prompt,
            max_side,
        }
    }
}

#[async_trait]
impl ResizeProcessor for OutpaintProcessor {
    fn name(&self) -> &'static str {
        "outpaint"
    }

    async fn process(&self, image: &RasterImage, target: Dimensions) -> ResizeResult<RasterImage> {
        outpaint::outpaint(
            self.client.as_ref(),
            image,
            target,
            self.prompt.as_deref(),
            self.max_side,
        )
        .await
    }
}
