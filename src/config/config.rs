//! # Configuration Module
//!
//! This module provides configuration structures and validation for resize operations.
//! It serves as the common interface between the CLI and the core resize library.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `input` | `String` | Readable file | Source image (PNG, JPEG, WEBP) |
//! | `output` | `Option<String>` | Any valid path | Output file, defaults to `resized-WxH.png` (`.jpg` for JPEG crops) |
//! | `target` | `Dimensions` | 1..=`max_target_side` | Exact output size in pixels |
//! | `method` | `ResizeMethod` | crop/outpaint | Crop-scale or generative fill |
//! | `prompt` | `Option<String>` | Any text | Outpaint instruction override |
//! | `api_key` | `Option<String>` | Non-empty | Required for outpaint and analysis |
//! | `analyze` | `bool` | true/false | Print a composition description |
//!
//! ## Examples
//!
//! ```rust
//! use smart_resize::config::ResizeConfig;
//! use smart_resize::ResizeMethod;
//! use resize_scale::Dimensions;
//!
//! let config = ResizeConfig::new(
//!     "photo.jpg".to_string(),
//!     None,
//!     Dimensions::new(1080, 1080),
//!     ResizeMethod::Crop,
//!     None,
//!     None,
//!     false,
//! );
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.output_path("png"), "resized-1080x1080.png");
//! ```

use std::time::Duration;

use resize_scale::Dimensions;
use resize_scale::presets::DEFAULT_TARGET;

use crate::{ResizeMethod, ResizeOptions};

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Configuration for one resize request.
///
/// Holds everything the CLI collects, validates it, and converts into the
/// library's [`ResizeOptions`].
#[derive(Debug, Clone)]
pub struct ResizeConfig {
    /// Path of the source image.
    pub input: String,

    /// Output file path. `None` derives `resized-<W>x<H>.<ext>` from the target.
    pub output: Option<String>,

    /// Exact output size in pixels.
    pub target: Dimensions,

    /// Crop-scale or outpaint.
    pub method: ResizeMethod,

    /// Custom outpaint prompt. Blank prompts fall back to the built-in one.
    pub prompt: Option<String>,

    /// API key for the generative service.
    ///
    /// Only outpaint and analysis need it. Resolved from the CLI flag first,
    /// then from [`API_KEY_ENV_VARS`].
    pub api_key: Option<String>,

    /// Whether to print a composition analysis of the source image.
    pub analyze: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: None,
            target: DEFAULT_TARGET,
            method: ResizeMethod::Outpaint,
            prompt: None,
            api_key: None,
            analyze: false,
        }
    }
}

impl ResizeConfig {
    pub fn new(
        input: String,
        output: Option<String>,
        target: Dimensions,
        method: ResizeMethod,
        prompt: Option<String>,
        api_key: Option<String>,
        analyze: bool,
    ) -> Self {
        Self {
            input,
            output,
            target,
            method,
            prompt,
            api_key,
            analyze,
        }
    }

    /// Validate the configuration parameters.
    ///
    /// Dimension errors are reported again by the library as `InvalidDimensions`;
    /// checking here lets the CLI fail before touching the input file.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.trim().is_empty() {
            return Err("Input image path must not be empty".to_string());
        }
        if !self.target.is_valid() {
            return Err(format!(
                "Target size {} is invalid: width and height must be greater than 0",
                self.target
            ));
        }
        if let Some(output) = &self.output {
            if output.trim().is_empty() {
                return Err("Output path must not be empty".to_string());
            }
        }
        if self.method == ResizeMethod::Outpaint && !has_text(self.api_key.as_deref()) {
            return Err(format!(
                "Outpaint needs an API key: pass --api-key or set {}",
                API_KEY_ENV_VARS.join(" / ")
            ));
        }
        Ok(())
    }

    /// Output path. When not given, `resized-<W>x<H>.<extension>` with the
    /// extension of the encoded output.
    pub fn output_path(&self, extension: &str) -> String {
        match &self.output {
            Some(path) => path.clone(),
            None => format!("resized-{}x{}.{}", self.target.width, self.target.height, extension),
        }
    }

    /// Convert to the library's per-request options.
    pub fn to_resize_options(&self) -> ResizeOptions {
        ResizeOptions {
            target: self.target,
            method: self.method,
            prompt: self.prompt.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

/// Resolve the API key: explicit value first, then the environment.
pub fn resolve_api_key(explicit: Option<String>) -> Option<String> {
    explicit.filter(|key| has_text(Some(key))).or_else(|| {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| has_text(Some(key)))
    })
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Settings for the Gemini generative API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL up to and including the API version.
    pub api_base: String,
    /// Model used for outpainting; must support image output.
    pub generation_model: String,
    /// Text model used for composition analysis.
    pub analysis_model: String,
    /// Whole-request timeout owned by the HTTP client.
    pub timeout: Duration,
    /// Largest accepted target side; larger targets fail before allocation.
    pub max_target_side: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            generation_model: "gemini-2.5-flash-image-preview".to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(120),
            max_target_side: 16_384,
        }
    }
}

impl GeminiConfig {
    /// Defaults, with `GEMINI_API_BASE` overriding the endpoint.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base) = std::env::var("GEMINI_API_BASE") {
            if !base.trim().is_empty() {
                config.api_base = base.trim().trim_end_matches('/').to_string();
            }
        }
        config
    }

    /// Same settings against another endpoint, e.g. a local mock server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}
