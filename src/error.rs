//! # Resize Error Handling
//!
//! A single error type for every way a resize request can fail, carrying enough context
//! for a caller to render a useful message and decide whether to resubmit.
//!
//! ## Architecture
//!
//! - **Error type**: [`ResizeError`], one variant per failure class, each with an [`ErrorContext`]
//! - **Classification traits**: [`Retryable`], [`HasSeverity`], [`HasRecoverySuggestion`]
//! - **Failure reasons**: [`FailureReason`] distinguishes why the generative model produced no image
//!
//! The core never retries on its own. Every error is one failed outcome for the request and
//! no partial output is emitted; the traits only tell the caller what is worth trying next.
//!
//! ## Usage
//!
//! ```rust
//! use smart_resize::error::{FailureReason, HasRecoverySuggestion, ResizeError};
//!
//! let error = ResizeError::generation_failed(FailureReason::Blocked, Some("SAFETY".into()));
//! assert_eq!(error.category(), "generation_failed");
//! assert!(error.recovery_suggestion().unwrap().contains("prompt"));
//! ```

use std::{error::Error as StdError, fmt, time::SystemTime};

use resize_scale::Dimensions;

const API_KEY_HINT: &str = "Please also check that your API key is valid and has no domain \
restrictions (like HTTP referrers) that would block requests from this application.";
const BLOCKED_HINT: &str = "Try modifying your prompt or using a different image.";

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The request failed but the process is healthy
    Error,
    /// Errors that need the user to change something before resubmitting
    Critical,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action, overriding the per-variant default
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: std::collections::HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: std::collections::HashMap::new(),
        }
    }
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Why the generative model did not yield an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// No candidates and the prompt was blocked (usually by a safety filter)
    Blocked,
    /// No candidates and no block reason
    EmptyResponse,
    /// A candidate without any content parts
    NoContent,
    /// Content parts, but only text
    TextOnly,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Blocked => "BLOCKED",
            FailureReason::EmptyResponse => "EMPTY_RESPONSE",
            FailureReason::NoContent => "NO_CONTENT",
            FailureReason::TextOnly => "TEXT_ONLY",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            FailureReason::Blocked => "the request was blocked",
            FailureReason::EmptyResponse => "the model returned an empty response",
            FailureReason::NoContent => "the model returned a candidate without content",
            FailureReason::TextOnly => "the model answered with text but no image",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base error type for resize requests
#[derive(Debug)]
pub enum ResizeError {
    /// Target width/height not strictly positive
    InvalidDimensions {
        width: u32,
        height: u32,
        context: ErrorContext,
    },
    /// Input bytes are not a decodable image
    Decode {
        source_hint: String,
        reason: String,
        context: ErrorContext,
    },
    /// The output raster could not be allocated, drawn or encoded
    Render {
        operation: String,
        reason: String,
        context: ErrorContext,
    },
    /// No API key for an operation that needs remote access
    MissingCredential {
        operation: String,
        context: ErrorContext,
    },
    /// The generative model did not yield usable image data
    GenerationFailed {
        reason: FailureReason,
        detail: Option<String>,
        context: ErrorContext,
    },
    /// Network/transport failure, timeout, or error status from a remote service
    Transport {
        operation: String,
        status: Option<u16>,
        message: String,
        source: Option<Box<dyn StdError + Send + Sync>>,
        context: ErrorContext,
    },
    /// Local file access
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
}

/// Result type alias using our custom error type
pub type ResizeResult<T> = Result<T, ResizeError>;

impl ResizeError {
    /// Create an invalid-dimensions error
    pub fn invalid_dimensions(target: Dimensions) -> Self {
        Self::InvalidDimensions {
            width: target.width,
            height: target.height,
            context: ErrorContext::new().with_severity(ErrorSeverity::Critical),
        }
    }

    /// Create a decode error; `source_hint` names where the bytes came from
    pub fn decode(source_hint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            source_hint: source_hint.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a render error
    pub fn render(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            operation: operation.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    /// Create a missing-credential error
    pub fn missing_credential(operation: impl Into<String>) -> Self {
        Self::MissingCredential {
            operation: operation.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Critical),
        }
    }

    /// Create a generation failure
    pub fn generation_failed(reason: FailureReason, detail: Option<String>) -> Self {
        let severity = match reason {
            FailureReason::Blocked => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        };
        Self::GenerationFailed {
            reason,
            detail,
            context: ErrorContext::new().with_severity(severity),
        }
    }

    /// Create a transport error
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            status: None,
            message: message.into(),
            source: None,
            context: ErrorContext::new(),
        }
    }

    /// Create a transport error for an HTTP error status
    pub fn http_status(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        let severity = if matches!(status, 400 | 401 | 403) {
            ErrorSeverity::Critical
        } else {
            ErrorSeverity::Error
        };
        Self::Transport {
            operation: operation.into(),
            status: Some(status),
            message: message.into(),
            source: None,
            context: ErrorContext::new().with_severity(severity),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: Option<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Override the default recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidDimensions { context, .. } => context,
            Self::Decode { context, .. } => context,
            Self::Render { context, .. } => context,
            Self::MissingCredential { context, .. } => context,
            Self::GenerationFailed { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::Io { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::InvalidDimensions { context, .. } => context,
            Self::Decode { context, .. } => context,
            Self::Render { context, .. } => context,
            Self::MissingCredential { context, .. } => context,
            Self::GenerationFailed { context, .. } => context,
            Self::Transport { context, .. } => context,
            Self::Io { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDimensions { .. } => "invalid_dimensions",
            Self::Decode { .. } => "decode",
            Self::Render { .. } => "render",
            Self::MissingCredential { .. } => "missing_credential",
            Self::GenerationFailed { .. } => "generation_failed",
            Self::Transport { .. } => "transport",
            Self::Io { .. } => "io",
        }
    }

    /// Failure reason for `GenerationFailed`, `None` otherwise.
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::GenerationFailed { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// True when the message or status points at the API key.
    fn mentions_api_key(&self) -> bool {
        match self {
            Self::MissingCredential { .. } => true,
            Self::Transport { status, message, .. } => {
                matches!(status, Some(401 | 403)) || message.to_lowercase().contains("api key")
            }
            _ => false,
        }
    }

    /// Message plus recovery hint, ready to show to an end user.
    pub fn user_message(&self) -> String {
        match self.recovery_suggestion() {
            Some(hint) => format!("{} {}", self, hint),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeError::InvalidDimensions { width, height, .. } => write!(
                f,
                "Invalid target size {}x{}: width and height must be greater than zero",
                width, height
            ),
            ResizeError::Decode {
                source_hint, reason, ..
            } => write!(f, "Failed to decode {} image: {}", source_hint, reason),
            ResizeError::Render {
                operation, reason, ..
            } => write!(f, "Failed to render image during {}: {}", operation, reason),
            ResizeError::MissingCredential { operation, .. } => {
                write!(f, "API key is required for {}", operation)
            }
            ResizeError::GenerationFailed { reason, detail, .. } => {
                if let Some(detail) = detail {
                    write!(
                        f,
                        "Image generation failed ({}): {} ({})",
                        reason,
                        reason.describe(),
                        detail
                    )
                } else {
                    write!(f, "Image generation failed ({}): {}", reason, reason.describe())
                }
            }
            ResizeError::Transport {
                operation,
                status,
                message,
                ..
            } => {
                if let Some(status) = status {
                    write!(f, "{} failed with HTTP {}: {}", operation, status, message)
                } else {
                    write!(f, "{} failed: {}", operation, message)
                }
            }
            ResizeError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(f, "I/O error during {} on '{}': {}", operation, path, source)
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
        }
    }
}

impl StdError for ResizeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Transport {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Trait for errors worth resubmitting unchanged
pub trait Retryable {
    /// Check if resubmitting the same request may succeed
    fn is_retryable(&self) -> bool;

    /// Recommended wait before resubmitting, in milliseconds
    fn retry_delay_ms(&self) -> Option<u64> {
        None
    }
}

impl Retryable for ResizeError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { status, .. } => {
                !matches!(status, Some(s) if (400..500).contains(s) && *s != 408 && *s != 429)
            }
            Self::GenerationFailed { reason, .. } => {
                matches!(reason, FailureReason::EmptyResponse | FailureReason::NoContent)
            }
            _ => false,
        }
    }

    fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            Self::Transport {
                status: Some(429), ..
            } => Some(5000),
            Self::Transport { .. } => Some(2000),
            Self::GenerationFailed { .. } if self.is_retryable() => Some(0),
            _ => None,
        }
    }
}

/// Trait for errors with severity levels
pub trait HasSeverity {
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for ResizeError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for ResizeError {
    fn recovery_suggestion(&self) -> Option<&str> {
        if let Some(custom) = self.context().recovery_suggestion.as_deref() {
            return Some(custom);
        }
        if self.mentions_api_key() {
            return Some(API_KEY_HINT);
        }
        match self {
            Self::GenerationFailed {
                reason: FailureReason::Blocked | FailureReason::TextOnly,
                ..
            } => Some(BLOCKED_HINT),
            Self::InvalidDimensions { .. } => {
                Some("Please enter valid width and height greater than zero.")
            }
            _ => None,
        }
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Errors caused by the request itself, detectable before any work starts
    pub fn is_caller_error(error: &ResizeError) -> bool {
        matches!(
            error,
            ResizeError::InvalidDimensions { .. } | ResizeError::MissingCredential { .. }
        )
    }

    /// Errors that need the user to change input, prompt or credentials
    pub fn requires_user_intervention(error: &ResizeError) -> bool {
        error.severity() >= ErrorSeverity::Critical
    }
}

/// Error conversion implementations
impl From<std::io::Error> for ResizeError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", None, error)
    }
}

impl From<serde_json::Error> for ResizeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Transport {
            operation: "parse response".to_string(),
            status: None,
            message: error.to_string(),
            source: Some(Box::new(error)),
            context: ErrorContext::new(),
        }
    }
}

impl From<reqwest::Error> for ResizeError {
    fn from(error: reqwest::Error) -> Self {
        let operation = if error.is_timeout() {
            "request (timed out)"
        } else if error.is_connect() {
            "connect"
        } else if error.is_decode() {
            "parse response"
        } else {
            "request"
        };
        Self::Transport {
            operation: operation.to_string(),
            status: error.status().map(|s| s.as_u16()),
            message: error.to_string(),
            source: Some(Box::new(error)),
            context: ErrorContext::new(),
        }
    }
}

impl From<resize_scale::cpu::ScaleError> for ResizeError {
    fn from(error: resize_scale::cpu::ScaleError) -> Self {
        Self::render("resample", error.to_string())
    }
}
