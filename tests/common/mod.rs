//! Common test utilities and helpers for the smart_resize tests
//!
//! Fixture images, canned generation responses and a mock generation client.

#![allow(dead_code)]

pub mod fixtures {
    use image::{ImageFormat, Rgba, RgbaImage};
    use smart_resize::RasterImage;

    /// Opaque image with a horizontal gradient so crops are distinguishable.
    pub fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            Rgba([r, g, 128, 255])
        })
    }

    pub fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
        RasterImage::new(image.clone())
            .encode(format)
            .expect("fixture encodes")
            .bytes
    }

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        encode(&gradient(width, height), ImageFormat::Png)
    }

    pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
        encode(&gradient(width, height), ImageFormat::Jpeg)
    }

    pub fn webp(width: u32, height: u32) -> Vec<u8> {
        encode(&gradient(width, height), ImageFormat::WebP)
    }

    pub fn decode(bytes: &[u8]) -> RasterImage {
        RasterImage::decode(bytes, "test output").expect("output decodes")
    }
}

pub mod responses {
    use base64::{Engine as _, engine::general_purpose};
    use smart_resize::remote::{
        Candidate, Content, GenerateContentResponse, InlineData, Part, PromptFeedback,
        SafetyRating,
    };

    pub fn image(bytes: &[u8]) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: "image/png".to_string(),
                            data: general_purpose::STANDARD.encode(bytes),
                        }),
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    pub fn blocked(reason: &str, ratings: &[(&str, &str)]) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![],
            prompt_feedback: Some(PromptFeedback {
                block_reason: Some(reason.to_string()),
                safety_ratings: ratings
                    .iter()
                    .map(|(category, probability)| SafetyRating {
                        category: category.to_string(),
                        probability: probability.to_string(),
                    })
                    .collect(),
            }),
        }
    }

    pub fn text_only(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    parts: vec![Part {
                        text: Some(text.to_string()),
                        inline_data: None,
                    }],
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            prompt_feedback: None,
        }
    }

    pub fn no_content(finish_reason: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content { parts: vec![] }),
                finish_reason: Some(finish_reason.to_string()),
            }],
            prompt_feedback: None,
        }
    }
}

pub mod mock_client {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use smart_resize::remote::{GenerateContentResponse, GenerationClient, GenerationRequest};
    use smart_resize::{ResizeError, ResizeResult};

    /// Generation client that replays a canned outcome and records requests.
    pub struct MockGenerationClient {
        outcome: Box<dyn Fn() -> ResizeResult<GenerateContentResponse> + Send + Sync>,
        calls: AtomicUsize,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockGenerationClient {
        pub fn responding(response: GenerateContentResponse) -> Self {
            Self::with(move || Ok(response.clone()))
        }

        pub fn failing_transport(message: &'static str) -> Self {
            Self::with(move || Err(ResizeError::http_status("generate", 503, message)))
        }

        fn with(
            outcome: impl Fn() -> ResizeResult<GenerateContentResponse> + Send + Sync + 'static,
        ) -> Self {
            Self {
                outcome: Box::new(outcome),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<GenerationRequest> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GenerationClient for MockGenerationClient {
        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> ResizeResult<GenerateContentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            (self.outcome)()
        }
    }
}
