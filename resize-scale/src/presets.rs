// SPDX-License-Identifier: MIT
//! # Standard Output Sizes
//!
//! Named target sizes for the common social and video formats, plus parsing of
//! free-form `WIDTHxHEIGHT` strings.
//!
//! | Preset | Size | Ratio |
//! |--------|------|-------|
//! | `hd` | 1920×1080 | 16:9 HD video |
//! | `standard` | 1024×768 | 4:3 |
//! | `square` | 1080×1080 | 1:1 |
//! | `portrait` | 1080×1350 | 4:5 |
//! | `story` | 1080×1920 | 9:16 |

use crate::geometry::Dimensions;

/// Target size used when none is given.
pub const DEFAULT_TARGET: Dimensions = Dimensions::new(1024, 768);

/// Named output sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SizePreset {
    /// 1920×1080, 16:9 HD video
    #[clap(name = "hd")]
    HdVideo,
    /// 1024×768, 4:3 standard
    #[clap(name = "standard")]
    Standard,
    /// 1080×1080, 1:1 square
    #[clap(name = "square")]
    Square,
    /// 1080×1350, 4:5 portrait
    #[clap(name = "portrait")]
    Portrait,
    /// 1080×1920, 9:16 story
    #[clap(name = "story")]
    Story,
}

impl SizePreset {
    pub const ALL: [SizePreset; 5] = [
        SizePreset::HdVideo,
        SizePreset::Standard,
        SizePreset::Square,
        SizePreset::Portrait,
        SizePreset::Story,
    ];

    pub fn dimensions(self) -> Dimensions {
        match self {
            SizePreset::HdVideo => Dimensions::new(1920, 1080),
            SizePreset::Standard => Dimensions::new(1024, 768),
            SizePreset::Square => Dimensions::new(1080, 1080),
            SizePreset::Portrait => Dimensions::new(1080, 1350),
            SizePreset::Story => Dimensions::new(1080, 1920),
        }
    }

    /// Human-readable label, e.g. `16:9 (HD Video)`.
    pub fn label(self) -> &'static str {
        match self {
            SizePreset::HdVideo => "16:9 (HD Video)",
            SizePreset::Standard => "4:3 (Standard)",
            SizePreset::Square => "1:1 (Square)",
            SizePreset::Portrait => "4:5 (Portrait)",
            SizePreset::Story => "9:16 (Story)",
        }
    }

    /// Preset whose size is exactly `dims`, if any.
    pub fn matching(dims: Dimensions) -> Option<SizePreset> {
        Self::ALL.into_iter().find(|p| p.dimensions() == dims)
    }
}

/// Failure to parse a `WIDTHxHEIGHT` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDimensionsError {
    MissingSeparator(String),
    InvalidNumber(String),
}

impl std::fmt::Display for ParseDimensionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseDimensionsError::MissingSeparator(s) => {
                write!(f, "Expected WIDTHxHEIGHT (e.g. 1920x1080), got '{}'", s)
            }
            ParseDimensionsError::InvalidNumber(s) => write!(f, "Invalid pixel count: '{}'", s),
        }
    }
}

impl std::error::Error for ParseDimensionsError {}

/// Parse `1920x1080` (also accepts `X` and `×`).
///
/// Zero sides parse successfully; rejecting them is the pipelines' job so the
/// error carries the dimension-specific message.
pub fn parse_dimensions(input: &str) -> Result<Dimensions, ParseDimensionsError> {
    let trimmed = input.trim();
    let (w, h) = trimmed
        .split_once(|c: char| matches!(c, 'x' | 'X' | '×'))
        .ok_or_else(|| ParseDimensionsError::MissingSeparator(trimmed.to_string()))?;
    let width = parse_side(w)?;
    let height = parse_side(h)?;
    Ok(Dimensions::new(width, height))
}

fn parse_side(s: &str) -> Result<u32, ParseDimensionsError> {
    s.trim()
        .parse::<u32>()
        .map_err(|_| ParseDimensionsError::InvalidNumber(s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_map_to_sizes() {
        assert_eq!(SizePreset::HdVideo.dimensions(), Dimensions::new(1920, 1080));
        assert_eq!(SizePreset::Portrait.dimensions(), Dimensions::new(1080, 1350));
        assert_eq!(SizePreset::Story.label(), "9:16 (Story)");
    }

    #[test]
    fn matching_finds_preset() {
        assert_eq!(
            SizePreset::matching(Dimensions::new(1080, 1080)),
            Some(SizePreset::Square)
        );
        assert_eq!(SizePreset::matching(Dimensions::new(1000, 1000)), None);
        assert_eq!(SizePreset::matching(DEFAULT_TARGET), Some(SizePreset::Standard));
    }

    #[test]
    fn parses_dimension_strings() {
        assert_eq!(parse_dimensions("1920x1080"), Ok(Dimensions::new(1920, 1080)));
        assert_eq!(parse_dimensions(" 640 X 480 "), Ok(Dimensions::new(640, 480)));
        assert_eq!(parse_dimensions("0x500"), Ok(Dimensions::new(0, 500)));
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(matches!(
            parse_dimensions("1920"),
            Err(ParseDimensionsError::MissingSeparator(_))
        ));
        assert!(matches!(
            parse_dimensions("axb"),
            Err(ParseDimensionsError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_dimensions("-5x10"),
            Err(ParseDimensionsError::InvalidNumber(_))
        ));
    }
}
