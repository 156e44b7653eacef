//! Crop-scale pipeline through the public request API.

mod common;

use std::sync::Arc;

use common::fixtures;
use common::mock_client::MockGenerationClient;
use common::responses;
use resize_scale::Dimensions;
use smart_resize::config::GeminiConfig;
use smart_resize::{ResizeMethod, ResizeOptions, resize_bytes, resize_with_client};

fn crop(width: u32, height: u32) -> ResizeOptions {
    ResizeOptions {
        target: Dimensions::new(width, height),
        method: ResizeMethod::Crop,
        prompt: None,
        api_key: None,
    }
}

#[tokio::test]
async fn output_has_exact_target_dimensions() {
    let config = GeminiConfig::default();
    for (target_w, target_h) in [(1920, 1080), (1080, 1350), (1, 1), (640, 480)] {
        let output = resize_bytes(&fixtures::png(800, 600), &crop(target_w, target_h), &config)
            .await
            .unwrap();
        let decoded = fixtures::decode(&output.bytes);
        assert_eq!(decoded.dimensions(), Dimensions::new(target_w, target_h));
    }
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let input = fixtures::png(800, 600);
    let config = GeminiConfig::default();
    let first = resize_bytes(&input, &crop(300, 300), &config).await.unwrap();
    let second = resize_bytes(&input, &crop(300, 300), &config).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn keeps_jpeg_and_png_formats() {
    let config = GeminiConfig::default();
    let jpeg = resize_bytes(&fixtures::jpeg(200, 100), &crop(50, 50), &config)
        .await
        .unwrap();
    assert_eq!(jpeg.mime_type, "image/jpeg");

    let png = resize_bytes(&fixtures::png(200, 100), &crop(50, 50), &config)
        .await
        .unwrap();
    assert_eq!(png.mime_type, "image/png");
}

#[tokio::test]
async fn webp_source_is_written_as_png() {
    let output = resize_bytes(&fixtures::webp(200, 100), &crop(60, 40), &GeminiConfig::default())
        .await
        .unwrap();
    assert_eq!(output.mime_type, "image/png");
    assert_eq!(output.extension(), "png");
    assert_eq!(fixtures::decode(&output.bytes).dimensions(), Dimensions::new(60, 40));
}

#[tokio::test]
async fn zero_dimension_fails_before_decode_or_network() {
    // Undecodable input and a client that would be called: neither is reached.
    let client = Arc::new(MockGenerationClient::responding(responses::text_only("unused")));
    let mut options = crop(0, 500);
    options.method = ResizeMethod::Outpaint;

    let err = resize_with_client(b"not an image", &options, client.clone(), 16_384)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "invalid_dimensions");
    assert_eq!(client.calls(), 0);

    let err = resize_bytes(b"not an image", &crop(0, 500), &GeminiConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "invalid_dimensions");
}

#[tokio::test]
async fn undecodable_input_is_decode_error() {
    let err = resize_bytes(b"GIF89a but not really", &crop(10, 10), &GeminiConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "decode");
}

#[tokio::test]
async fn oversized_target_is_render_error() {
    let mut config = GeminiConfig::default();
    config.max_target_side = 512;
    let err = resize_bytes(&fixtures::png(10, 10), &crop(513, 100), &config)
        .await
        .unwrap_err();
    assert_eq!(err.category(), "render");
}
