//! # Outpaint Pipeline
//!
//! Pad the source to the target aspect, let a generative model fill the
//! transparent margins, then force the result to the exact target size.
//!
//! ## State Machine
//!
//! ```text
//! Start → AspectCheck ─┬─ ShortCircuit ──────────────────────────────┐
//!                      └─ Padding → Generating → Validating ─┬─ Success → Rescaling → Done
//!                                                            └─ Failed
//! ```
//!
//! When the aspects already match, the original raster is carried forward and
//! the remote client is never called. Every other path makes exactly one remote
//! call; failures are returned as-is, without retry or partial output.

use base64::{Engine as _, engine::general_purpose};
use image::{Rgba, RgbaImage, imageops};
use log::{debug, info, warn};
use resize_scale::Dimensions;
use resize_scale::geometry::{aspect_ratio, aspects_equal, fit_pad_canvas};

use crate::error::{FailureReason, ResizeError, ResizeResult};
use crate::processing::crop_scale::{check_output_limits, scale_to};
use crate::processing::raster::RasterImage;
use crate::remote::{GenerateContentResponse, GenerationClient, GenerationRequest};

/// Used when no prompt, or only whitespace, is supplied.
pub const DEFAULT_PROMPT: &str = "You are a professional photo editor. Your task is to seamlessly \
fill in the transparent areas of this image to extend the scene. Match the existing style, \
lighting, and content. Do not alter the original, non-transparent parts of the image.";

/// Probabilities that do not make a safety category worth reporting.
const BENIGN_PROBABILITIES: [&str; 2] = ["NEGLIGIBLE", "LOW"];

/// Per-invocation pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutpaintState {
    Start,
    AspectCheck,
    ShortCircuit,
    Padding,
    Generating,
    Validating,
    Success,
    Failed,
    Rescaling,
    Done,
}

/// Image payload extracted from a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Outpaint result plus the states it went through.
#[derive(Debug, Clone)]
pub struct Outpainted {
    pub image: RasterImage,
    pub path: Vec<OutpaintState>,
}

impl Outpainted {
    /// True when aspects matched and no remote call was made.
    pub fn short_circuited(&self) -> bool {
        self.path.contains(&OutpaintState::ShortCircuit)
    }
}

struct Transitions {
    path: Vec<OutpaintState>,
}

impl Transitions {
    fn new() -> Self {
        Self {
            path: vec![OutpaintState::Start],
        }
    }

    fn enter(&mut self, state: OutpaintState) {
        debug!("outpaint: {:?} -> {:?}", self.current(), state);
        self.path.push(state);
    }

    fn current(&self) -> OutpaintState {
        self.path.last().copied().unwrap_or(OutpaintState::Start)
    }
}

/// Outpaint `image` to exactly `target`.
pub async fn outpaint(
    client: &dyn GenerationClient,
    image: &RasterImage,
    target: Dimensions,
    prompt: Option<&str>,
    max_side: u32,
) -> ResizeResult<RasterImage> {
    run(client, image, target, prompt, max_side)
        .await
        .map(|done| done.image)
}

/// Outpaint and report the visited states.
pub async fn run(
    client: &dyn GenerationClient,
    image: &RasterImage,
    target: Dimensions,
    prompt: Option<&str>,
    max_side: u32,
) -> ResizeResult<Outpainted> {
    if !target.is_valid() {
        return Err(ResizeError::invalid_dimensions(target));
    }
    check_output_limits(target, max_side).map_err(|e| e.with_operation("outpaint"))?;

    let mut states = Transitions::new();
    let source = image.dimensions();

    states.enter(OutpaintState::AspectCheck);
    let generated = if aspects_equal(source.aspect(), aspect_ratio(target.width, target.height)) {
        states.enter(OutpaintState::ShortCircuit);
        info!("Aspect of {} already matches {}, skipping generation", source, target);
        None
    } else {
        states.enter(OutpaintState::Padding);
        let padded = pad_to_aspect(image, target, max_side)?;
        let encoded = padded.encode_png()?;

        states.enter(OutpaintState::Generating);
        let request = GenerationRequest {
            image: encoded.bytes,
            mime_type: encoded.mime_type,
            prompt: effective_prompt(prompt).to_string(),
        };
        let response = client.generate(&request).await?;

        states.enter(OutpaintState::Validating);
        match classify_response(&response) {
            Ok(payload) => {
                states.enter(OutpaintState::Success);
                Some(RasterImage::decode(&payload.bytes, "generated")?)
            }
            Err(e) => {
                states.enter(OutpaintState::Failed);
                warn!("outpaint generation failed: {}", e);
                return Err(e);
            }
        }
    };

    states.enter(OutpaintState::Rescaling);
    let scaled = scale_to(generated.as_ref().unwrap_or(image), target, max_side)?;
    states.enter(OutpaintState::Done);

    Ok(Outpainted {
        image: RasterImage {
            pixels: scaled.pixels,
            format: None,
        },
        path: states.path,
    })
}

/// The prompt to send: `prompt` unless it is absent or blank.
pub fn effective_prompt(prompt: Option<&str>) -> &str {
    match prompt {
        Some(p) if !p.trim().is_empty() => p,
        _ => DEFAULT_PROMPT,
    }
}

/// Draw `image` centered on a transparent canvas of the target aspect.
pub fn pad_to_aspect(image: &RasterImage, target: Dimensions, max_side: u32) -> ResizeResult<RasterImage> {
    let source = image.dimensions();
    let canvas = fit_pad_canvas(source.width, source.height, target.width, target.height);
    check_output_limits(canvas.size(), max_side).map_err(|e| e.with_operation("pad"))?;
    debug!(
        "pad: {} onto {} at ({}, {})",
        source,
        canvas.size(),
        canvas.draw_x,
        canvas.draw_y
    );

    let mut pixels = RgbaImage::from_pixel(canvas.canvas_width, canvas.canvas_height, Rgba([0, 0, 0, 0]));
    imageops::overlay(
        &mut pixels,
        &image.pixels,
        i64::from(canvas.draw_x),
        i64::from(canvas.draw_y),
    );
    Ok(RasterImage::new(pixels))
}

/// Extract image bytes from a response or explain why there are none.
pub fn classify_response(response: &GenerateContentResponse) -> ResizeResult<GeneratedImage> {
    let Some(candidate) = response.candidates.first() else {
        let feedback = response.prompt_feedback.as_ref();
        return Err(match feedback.and_then(|f| f.block_reason.as_deref()) {
            Some(reason) => {
                let flagged: Vec<&str> = feedback
                    .map(|f| f.safety_ratings.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .filter(|r| !BENIGN_PROBABILITIES.contains(&r.probability.as_str()))
                    .map(|r| r.category.as_str())
                    .collect();
                let detail = if flagged.is_empty() {
                    reason.to_string()
                } else {
                    format!("{}: {}", reason, flagged.join(", "))
                };
                ResizeError::generation_failed(FailureReason::Blocked, Some(detail))
            }
            None => ResizeError::generation_failed(FailureReason::EmptyResponse, None),
        });
    };

    let parts = candidate
        .content
        .as_ref()
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();
    if parts.is_empty() {
        return Err(ResizeError::generation_failed(
            FailureReason::NoContent,
            candidate.finish_reason.clone(),
        ));
    }

    let Some(inline) = parts.iter().find_map(|p| p.inline_data.as_ref()) else {
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        let detail = Some(text.trim().to_string()).filter(|t| !t.is_empty());
        return Err(ResizeError::generation_failed(FailureReason::TextOnly, detail));
    };

    let bytes = general_purpose::STANDARD
        .decode(inline.data.trim())
        .map_err(|e| ResizeError::decode("generated", format!("invalid base64 payload: {}", e)))?;
    if bytes.is_empty() {
        return Err(ResizeError::decode("generated", "empty image payload"));
    }
    Ok(GeneratedImage {
        bytes,
        mime_type: inline.mime_type.clone(),
    })
}
