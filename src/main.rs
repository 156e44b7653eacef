use anyhow::{Context, Result};
use clap::Parser;
use resize_scale::Dimensions;
use resize_scale::presets::{SizePreset, parse_dimensions};
use smart_resize::config::config::resolve_api_key;
use smart_resize::config::{GeminiConfig, ResizeConfig};
use smart_resize::ResizeMethod;

/// Resize images to exact dimensions without distortion:
/// - crop: center-crop the overflowing axis, then scale (local)
/// - outpaint: let a generative model extend the scene to the new aspect
#[derive(Parser, Debug)]
#[command(name = "smart-resize")]
#[command(about = "🖼️ Resize images to exact dimensions by cropping or AI outpainting")]
#[command(long_about = "Resize an image to exact pixel dimensions without stretching it.
Crop mode keeps the centered part that fits the new aspect ratio. Outpaint mode pads the image
and asks a generative model to fill the new margins, then scales to the exact size.")]
struct Args {
    /// Source image
    #[arg(help = "Input image (PNG, JPEG or WEBP)")]
    input: String,

    /// Output path
    #[arg(short, long, help = "Output file (default: resized-<W>x<H>.png, .jpg for JPEG crop output)")]
    output: Option<String>,

    /// Target size as WIDTHxHEIGHT
    #[arg(short, long, conflicts_with_all = ["preset", "width", "height"],
          help = "Target size, e.g. 1920x1080")]
    size: Option<String>,

    /// Standard size preset
    #[arg(short, long, value_enum, conflicts_with_all = ["width", "height"],
          help = "Standard size: hd (1920x1080), standard (1024x768), square (1080x1080), portrait (1080x1350), story (1080x1920)")]
    preset: Option<SizePreset>,

    /// Target width
    #[arg(short = 'W', long, requires = "height", help = "Target width in pixels")]
    width: Option<u32>,

    /// Target height
    #[arg(short = 'H', long, requires = "width", help = "Target height in pixels")]
    height: Option<u32>,

    /// Resize method
    #[arg(short, long, value_enum, default_value_t = ResizeMethod::Outpaint,
          help = "crop (local, center-crop) or outpaint (AI smart fill)")]
    method: ResizeMethod,

    /// Custom outpaint prompt
    #[arg(long, help = "Instruction for the generative fill (default: extend the scene seamlessly)")]
    prompt: Option<String>,

    /// API key (falls back to GEMINI_API_KEY / GOOGLE_API_KEY)
    #[arg(long, help = "Gemini API key; defaults to GEMINI_API_KEY or GOOGLE_API_KEY")]
    api_key: Option<String>,

    /// Print a composition analysis of the input
    #[arg(long, help = "Describe the composition of the input image before resizing")]
    analyze: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let target = parse_target(&args)?;
    let config = ResizeConfig::new(
        args.input,
        args.output,
        target,
        args.method,
        args.prompt,
        resolve_api_key(args.api_key),
        args.analyze,
    );
    config.validate().map_err(anyhow::Error::msg)?;

    let gemini = GeminiConfig::from_env();
    let input = smart_resize::read_input(&config)?;

    println!("Input: {}", config.input);
    println!("Target: {} ({})", config.target, preset_label(config.target));
    println!("Method: {}", config.method);

    if config.analyze {
        let analysis =
            smart_resize::analyze_bytes(&input, config.api_key.as_deref(), &gemini).await;
        println!("\nComposition:\n{}\n", analysis);
    }

    let options = config.to_resize_options();
    let output = smart_resize::resize_bytes(&input, &options, &gemini)
        .await
        .map_err(|e| anyhow::anyhow!("✗ {}", e.user_message()))?;

    let path = smart_resize::write_output(&config, &output)?;
    println!("✓ Saved {} ({} bytes, {})", path, output.bytes.len(), output.mime_type);
    Ok(())
}

/// Target from --size, --preset or -W/-H, else the default.
fn parse_target(args: &Args) -> Result<Dimensions> {
    if let Some(size) = &args.size {
        return parse_dimensions(size).with_context(|| format!("Invalid --size '{}'", size));
    }
    if let Some(preset) = args.preset {
        return Ok(preset.dimensions());
    }
    match (args.width, args.height) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width, height)),
        _ => Ok(ResizeConfig::default().target),
    }
}

fn preset_label(target: Dimensions) -> &'static str {
    SizePreset::matching(target)
        .map(SizePreset::label)
        .unwrap_or("custom")
}
