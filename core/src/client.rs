use async_trait::async_trait;
use slidegen_common::{PresentationConfig, PresentationData, SlideContent};
use slidegen_gemini::{GeminiClient, GenerateRequest};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::content::{build_prompt, parse_presentation, presentation_schema, SYSTEM_INSTRUCTION};
use crate::error::{ConfigError, GenerationError, Result};

/// Produces deck content for a configuration.
#[async_trait]
pub trait ContentClient {
    async fn generate(&self, config: &PresentationConfig) -> Result<PresentationData>;

    /// Short name for logs and the status bar.
    fn name(&self) -> &str;
}

/// Deck generation backed by Gemini structured output.
pub struct GeminiContentClient {
    inner: GeminiClient,
    temperature: f32,
}

impl GeminiContentClient {
    pub fn new(inner: GeminiClient, temperature: f32) -> Self {
        Self { inner, temperature }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        let inner = GeminiClient::new_with_model(api_key, config.settings.model.clone())
            .with_base_url(config.settings.api_base_url.clone())
            .with_timeout(config.request_timeout())
            .map_err(GenerationError::from)?;
        Ok(Self::new(inner, config.settings.temperature))
    }

    pub fn request_for(&self, config: &PresentationConfig) -> GenerateRequest {
        GenerateRequest {
            prompt: build_prompt(config),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            response_schema: Some(presentation_schema()),
            temperature: Some(self.temperature),
        }
    }
}

#[async_trait]
impl ContentClient for GeminiContentClient {
    async fn generate(&self, config: &PresentationConfig) -> Result<PresentationData> {
        config
            .validate()
            .map_err(|reason| GenerationError::InvalidRequest { reason })?;

        info!(
            "requesting {} slides on '{}' from {}",
            config.slide_count, config.topic, self.inner.model
        );
        let request = self.request_for(config);
        let text = self
            .inner
            .generate_content(&request)
            .await
            .map_err(GenerationError::from)?;
        let data = parse_presentation(&text)?;
        info!("received deck '{}' with {} slides", data.title, data.slides.len());
        Ok(data)
    }

    fn name(&self) -> &str {
        &self.inner.model
    }
}

/// Deterministic offline deck, used by `--offline` and tests.
pub struct StubClient;

#[async_trait]
impl ContentClient for StubClient {
    async fn generate(&self, config: &PresentationConfig) -> Result<PresentationData> {
        config
            .validate()
            .map_err(|reason| GenerationError::InvalidRequest { reason })?;
        Ok(stub_deck(config))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

/// Used by the interactive UI when no API key is configured, so the form
/// still opens and each submission reports the missing key.
pub struct UnconfiguredClient;

#[async_trait]
impl ContentClient for UnconfiguredClient {
    async fn generate(&self, _config: &PresentationConfig) -> Result<PresentationData> {
        Err(ConfigError::MissingApiKey.into())
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}

fn stub_deck(config: &PresentationConfig) -> PresentationData {
    let topic = config.topic.trim();
    let count = config.slide_count.max(1);

    let slides = (0..count)
        .map(|i| {
            let (title, bullets, image) = if i == 0 {
                (
                    format!("Introduction to {topic}"),
                    vec![
                        format!("What {topic} is"),
                        "Why it matters now".to_string(),
                        "What we will cover".to_string(),
                    ],
                    format!("wide establishing photo representing {topic}, natural light"),
                )
            } else if i + 1 == count {
                (
                    "Conclusion".to_string(),
                    vec![
                        "Key takeaways".to_string(),
                        format!("Next steps for {topic}"),
                        "Questions and discussion".to_string(),
                    ],
                    "audience applauding in a bright conference hall".to_string(),
                )
            } else {
                (
                    format!("Key Point {i}"),
                    vec![
                        format!("Aspect {i} of {topic}"),
                        "Supporting evidence".to_string(),
                        "Practical example".to_string(),
                    ],
                    format!("close-up photo illustrating aspect {i} of {topic}"),
                )
            };
            SlideContent {
                speaker_notes: format!("Talk the {} through slide {}: {title}.", config.audience, i + 1),
                citations: config
                    .include_citations
                    .then(|| vec![format!("{topic} Overview {}", 2020 + i % 5)]),
                title,
                bullet_points: bullets,
                image_description: image,
            }
        })
        .collect();

    PresentationData {
        title: topic.to_string(),
        subtitle: format!("A {} briefing for {}", config.tone, config.audience),
        slides,
    }
}

/// Gemini when online, otherwise the offline stub.
pub fn client_from_config(config: &Config) -> Result<Arc<dyn ContentClient + Send + Sync>> {
    if config.offline {
        info!("offline mode, using built-in deck generator");
        return Ok(Arc::new(StubClient));
    }
    Ok(Arc::new(GeminiContentClient::from_config(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlideError;
    use slidegen_common::Tone;

    #[tokio::test]
    async fn test_stub_honours_options() {
        let mut config = PresentationConfig::new("Urban Gardening");
        config.slide_count = 5;
        config.include_citations = true;
        config.tone = Tone::Creative;

        let data = StubClient.generate(&config).await.unwrap();
        assert_eq!(data.title, "Urban Gardening");
        assert_eq!(data.slides.len(), 5);
        assert_eq!(data.slides[0].title, "Introduction to Urban Gardening");
        assert_eq!(data.slides[4].title, "Conclusion");
        assert!(data.slides.iter().all(|s| s.citations.is_some()));
        assert!(data.subtitle.contains("Creative"));
    }

    #[tokio::test]
    async fn test_stub_without_citations() {
        let data = StubClient
            .generate(&PresentationConfig::new("Bees"))
            .await
            .unwrap();
        assert_eq!(data.slides.len(), 8);
        assert!(data.slides.iter().all(|s| s.citations.is_none()));
    }

    #[tokio::test]
    async fn test_stub_rejects_blank_topic() {
        let err = StubClient
            .generate(&PresentationConfig::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, SlideError::Generation(GenerationError::InvalidRequest { .. })));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let config = Config::default();
        let err = client_from_config(&config).err().unwrap();
        assert!(matches!(err, SlideError::Config(ConfigError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_unconfigured_client_reports_missing_key() {
        let err = UnconfiguredClient
            .generate(&PresentationConfig::new("Tides"))
            .await
            .unwrap_err();
        assert!(matches!(err, SlideError::Config(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_offline_selects_stub() {
        let config = Config {
            offline: true,
            ..Config::default()
        };
        assert_eq!(client_from_config(&config).unwrap().name(), "offline");
    }

    #[test]
    fn test_request_shape() {
        let mut config = Config::default();
        config.settings.api_key = Some("k".to_string());
        config.settings.temperature = 0.4;
        let client = GeminiContentClient::from_config(&config).unwrap();
        let request = client.request_for(&PresentationConfig::new("Tides"));
        assert_eq!(request.temperature, Some(0.4));
        assert_eq!(request.system_instruction.as_deref(), Some(SYSTEM_INSTRUCTION));
        assert!(request.prompt.contains("Topic: Tides"));
        assert!(request.response_schema.is_some());
        assert_eq!(client.name(), "gemini-3-flash-preview");
    }

    async fn gemini_against(status: &'static str, body: serde_json::Value) -> GeminiContentClient {
        let base = crate::test_http::serve_once(status, "application/json", body.to_string().into_bytes()).await;
        let mut config = Config::default();
        config.settings.api_key = Some("test-key".to_string());
        config.settings.api_base_url = base;
        config.settings.request_timeout_secs = 5;
        GeminiContentClient::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_candidate_less_response_is_empty_response() {
        let client = gemini_against("200 OK", serde_json::json!({"candidates": []})).await;
        let err = client.generate(&PresentationConfig::new("Tides")).await.unwrap_err();
        assert!(matches!(err, SlideError::Generation(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_response() {
        let body = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let client = gemini_against("200 OK", body).await;
        let err = client.generate(&PresentationConfig::new("Tides")).await.unwrap_err();
        assert!(matches!(err, SlideError::Generation(GenerationError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_http_failure_is_service_error() {
        let body = serde_json::json!({"error": {"code": 503, "message": "model overloaded"}});
        let client = gemini_against("503 Service Unavailable", body).await;
        let err = client.generate(&PresentationConfig::new("Tides")).await.unwrap_err();
        match err {
            SlideError::Generation(GenerationError::Service { message }) => {
                assert!(message.contains("model overloaded"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_structured_text_becomes_deck() {
        let deck = serde_json::json!({
            "title": "Tides",
            "subtitle": "Moon and sea",
            "slides": [{
                "title": "Gravity",
                "bulletPoints": ["The moon pulls"],
                "speakerNotes": "Explain pull",
                "imageDescription": "moon over ocean"
            }]
        });
        let body = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": deck.to_string()}]}, "finishReason": "STOP"}]
        });
        let client = gemini_against("200 OK", body).await;
        let data = client.generate(&PresentationConfig::new("Tides")).await.unwrap();
        assert_eq!(data.title, "Tides");
        assert_eq!(data.slides[0].bullet_points, vec!["The moon pulls".to_string()]);
    }
}
