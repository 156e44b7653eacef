//! # Smart Resize Library
//!
//! Resize an image to exact pixel dimensions without distorting it, either by
//! center-cropping or by asking a generative model to extend the scene.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `processing`: crop-scale and outpaint pipelines behind the [`ResizeProcessor`] trait
//! - `remote`: generative service contracts and the Gemini client
//! - `config`: request configuration and service settings
//! - `error`: the [`ResizeError`] taxonomy
//!
//! Geometry (cover crop rects, contain pad canvases, aspect comparison) and the
//! SIMD scaling kernel live in the `resize-scale` crate.
//!
//! ## Request Flow
//!
//! 1. Validate the target size (`InvalidDimensions` before any decode or network)
//! 2. Check the credential when the method needs the remote service
//! 3. Decode the input bytes
//! 4. Run the selected processor
//! 5. Encode: crop output of a JPEG source stays JPEG; everything else, WEBP included, is PNG
//!
//! ## Example
//!
//! ```rust,no_run
//! use smart_resize::{ResizeMethod, ResizeOptions, resize_bytes};
//! use smart_resize::config::GeminiConfig;
//! use resize_scale::Dimensions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = std::fs::read("photo.jpg")?;
//! let options = ResizeOptions {
//!     target: Dimensions::new(1920, 1080),
//!     method: ResizeMethod::Crop,
//!     prompt: None,
//!     api_key: None,
//! };
//!
//! let output = resize_bytes(&input, &options, &GeminiConfig::default()).await?;
//! std::fs::write("photo-hd.jpg", &output.bytes)?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use image::ImageFormat;
use log::info;
use resize_scale::Dimensions;

pub mod config;
pub mod error;
pub mod processing;
pub mod remote;

/// Re-export error types for convenience
pub use error::{
    FailureReason, HasRecoverySuggestion, HasSeverity, ResizeError, ResizeResult, Retryable,
};
pub use processing::{EncodedImage, RasterImage, ResizeProcessor};

use config::{GeminiConfig, ResizeConfig};
use processing::{CropScaleProcessor, OutpaintProcessor};
use remote::{AnalysisClient, GeminiClient, GenerationClient};

/// How the target aspect is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResizeMethod {
    /// Center-crop the overflowing axis, then scale. Local and deterministic.
    Crop,
    /// Pad to the target aspect and let the generative model fill the margins.
    #[default]
    Outpaint,
}

impl ResizeMethod {
    pub fn needs_credential(self) -> bool {
        matches!(self, ResizeMethod::Outpaint)
    }
}

impl fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeMethod::Crop => f.write_str("crop"),
            ResizeMethod::Outpaint => f.write_str("outpaint"),
        }
    }
}

/// Per-request options.
#[derive(Debug, Clone)]
pub struct ResizeOptions {
    /// Exact output size in pixels.
    pub target: Dimensions,
    pub method: ResizeMethod,
    /// Outpaint instruction; blank or absent uses the built-in prompt.
    pub prompt: Option<String>,
    /// Required for outpaint, ignored by crop.
    pub api_key: Option<String>,
}

/// Resize encoded image bytes, building a Gemini client when the method needs one.
pub async fn resize_bytes(
    input: &[u8],
    options: &ResizeOptions,
    config: &GeminiConfig,
) -> ResizeResult<EncodedImage> {
    validate_target(options.target)?;
    let processor: Box<dyn ResizeProcessor> = match options.method {
        ResizeMethod::Crop => Box::new(CropScaleProcessor::new(config.max_target_side)),
        ResizeMethod::Outpaint => {
            let key = options.api_key.as_deref().unwrap_or_default();
            let client = GeminiClient::new(key, config).map_err(|e| e.with_operation("outpaint"))?;
            Box::new(OutpaintProcessor::new(
                Arc::new(client),
                options.prompt.clone(),
                config.max_target_side,
            ))
        }
    };
    resize_with_processor(processor.as_ref(), input, options.target).await
}

/// Like [`resize_bytes`] with a caller-supplied generation client.
///
/// The credential is the client's concern here; `options.api_key` is ignored.
pub async fn resize_with_client(
    input: &[u8],
    options: &ResizeOptions,
    client: Arc<dyn GenerationClient>,
    max_side: u32,
) -> ResizeResult<EncodedImage> {
    validate_target(options.target)?;
    let processor: Box<dyn ResizeProcessor> = match options.method {
        ResizeMethod::Crop => Box::new(CropScaleProcessor::new(max_side)),
        ResizeMethod::Outpaint => Box::new(OutpaintProcessor::new(
            client,
            options.prompt.clone(),
            max_side,
        )),
    };
    resize_with_processor(processor.as_ref(), input, options.target).await
}

/// Decode, run `processor`, encode.
pub async fn resize_with_processor(
    processor: &dyn ResizeProcessor,
    input: &[u8],
    target: Dimensions,
) -> ResizeResult<EncodedImage> {
    validate_target(target)?;
    let image = RasterImage::decode(input, "input")?;
    info!(
        "Resizing {} -> {} with {}",
        image.dimensions(),
        target,
        processor.name()
    );
    let resized = processor.process(&image, target).await?;
    resized.encode(output_format(resized.format))
}

/// Read the source image named by `config.input`.
pub fn read_input(config: &ResizeConfig) -> ResizeResult<Vec<u8>> {
    std::fs::read(&config.input)
        .map_err(|e| ResizeError::io("read input", Some(config.input.clone()), e))
}

/// Write `output` to the configured path, or `resized-<W>x<H>.<ext>` when none
/// is set. Returns the path written.
pub fn write_output(config: &ResizeConfig, output: &EncodedImage) -> ResizeResult<String> {
    let path = config.output_path(output.extension());
    std::fs::write(&path, &output.bytes)
        .map_err(|e| ResizeError::io("write output", Some(path.clone()), e))?;
    info!("Wrote {} bytes to {}", output.bytes.len(), path);
    Ok(path)
}

/// Composition description for encoded image bytes. Never fails.
pub async fn analyze_bytes(input: &[u8], api_key: Option<&str>, config: &GeminiConfig) -> String {
    let mime_type = image::guess_format(input)
        .map(|f| f.to_mime_type())
        .unwrap_or("image/png");
    let client = api_key.and_then(|key| GeminiClient::new(key, config).ok());
    remote::describe_composition(
        client.as_ref().map(|c| c as &dyn AnalysisClient),
        input,
        mime_type,
    )
    .await
}

fn validate_target(target: Dimensions) -> ResizeResult<()> {
    if target.is_valid() {
        Ok(())
    } else {
        Err(ResizeError::invalid_dimensions(target))
    }
}

/// JPEG stays JPEG; PNG, WEBP and in-memory rasters become PNG.
fn output_format(source: Option<ImageFormat>) -> ImageFormat {
    match source {
        Some(ImageFormat::Jpeg) => ImageFormat::Jpeg,
        _ => ImageFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_rules() {
        assert_eq!(output_format(Some(ImageFormat::Jpeg)), ImageFormat::Jpeg);
        assert_eq!(output_format(Some(ImageFormat::Png)), ImageFormat::Png);
        assert_eq!(output_format(Some(ImageFormat::WebP)), ImageFormat::Png);
        assert_eq!(output_format(None), ImageFormat::Png);
    }

    #[test]
    fn only_outpaint_needs_credential() {
        assert!(ResizeMethod::Outpaint.needs_credential());
        assert!(!ResizeMethod::Crop.needs_credential());
        assert_eq!(ResizeMethod::default(), ResizeMethod::Outpaint);
    }

    #[tokio::test]
    async fn outpaint_without_key_fails_before_decode() {
        let options = ResizeOptions {
            target: Dimensions::new(100, 100),
            method: ResizeMethod::Outpaint,
            prompt: None,
            api_key: None,
        };
        let err = resize_bytes(b"not an image", &options, &GeminiConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "missing_credential");
    }

    #[tokio::test]
    async fn analysis_without_key_reports_configuration() {
        let text = analyze_bytes(b"img", None, &GeminiConfig::default()).await;
        assert_eq!(text, remote::ANALYSIS_NO_KEY_MESSAGE);
    }
}
