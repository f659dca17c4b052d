//! Prompt, response schema and response parsing for deck generation.

use crate::error::GenerationError;
use serde_json::{json, Value};
use slidegen_common::{PresentationConfig, PresentationData};
use tracing::{debug, warn};

pub const SYSTEM_INSTRUCTION: &str = "You are an expert presentation designer and public speaking coach. \
You create professional, structured, and engaging presentations.";

/// Outline request sent as the user turn.
pub fn build_prompt(config: &PresentationConfig) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str("Create a detailed PowerPoint presentation outline.\n\n");
    prompt.push_str(&format!("Topic: {}\n", config.topic.trim()));
    prompt.push_str(&format!("Target Audience: {}\n", config.audience));
    prompt.push_str(&format!("Tone: {}\n", config.tone));
    prompt.push_str(&format!("Approximate Slide Count: {}\n", config.slide_count));
    prompt.push_str(&format!(
        "Include Citations: {}\n\n",
        if config.include_citations { "Yes" } else { "No" }
    ));
    prompt.push_str("Requirements:\n");
    prompt.push_str("1. Structure the content logically (Introduction -> Main Points -> Conclusion).\n");
    prompt.push_str("2. Ensure bullet points are concise and scannable.\n");
    prompt.push_str("3. Speaker notes should be conversational and add depth to the slide content.\n");
    prompt.push_str(
        "4. Image descriptions MUST be visually descriptive for an AI image generator. \
Avoid abstract concepts; describe physical scenes, objects, or people.\n",
    );
    prompt.push_str("5. The content must be high quality and factual.\n");
    if config.include_citations {
        prompt.push_str("6. Provide real or plausible citations for factual claims in the citations field.\n");
    }
    prompt
}

/// Response schema in the OpenAPI subset `generateContent` accepts.
pub fn presentation_schema() -> Value {
    let slide = json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "The headline title of the slide."
            },
            "bulletPoints": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3-5 concise bullet points summarizing the slide content. Do not use full sentences."
            },
            "speakerNotes": {
                "type": "STRING",
                "description": "Detailed script for the presenter to say while showing this slide."
            },
            "imageDescription": {
                "type": "STRING",
                "description": "A detailed visual description for an AI image generator to create a relevant image (e.g., 'photorealistic wide shot of a futuristic eco-friendly city, sunny day')."
            },
            "citations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "1-2 brief source citations or references if applicable (e.g. 'Source: World Energy Report 2024')."
            }
        },
        "required": ["title", "bulletPoints", "speakerNotes", "imageDescription"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "The main title of the presentation."
            },
            "subtitle": {
                "type": "STRING",
                "description": "A catchy subtitle or tagline."
            },
            "slides": {
                "type": "ARRAY",
                "items": slide,
                "description": "The list of slides for the presentation."
            }
        },
        "required": ["title", "subtitle", "slides"]
    })
}

/// Decode the model's JSON text and clip the deck to the slide limit.
pub fn parse_presentation(text: &str) -> Result<PresentationData, GenerationError> {
    let text = strip_code_fence(text.trim());
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let mut data: PresentationData =
        serde_json::from_str(text).map_err(|e| GenerationError::InvalidResponse { reason: e.to_string() })?;

    if data.slides.is_empty() {
        return Err(GenerationError::NoSlides);
    }

    let dropped = data.clip_slides();
    if dropped > 0 {
        warn!("model returned {dropped} slides over the limit, clipped");
    }
    debug!("parsed deck '{}' with {} slides", data.title, data.slides.len());
    Ok(data)
}

/// Some models wrap JSON mode output in a markdown fence anyway.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidegen_common::{Audience, Tone, MAX_SLIDES};

    fn deck_json(slides: usize) -> String {
        let slides: Vec<Value> = (0..slides)
            .map(|i| {
                json!({
                    "title": format!("Slide {i}"),
                    "bulletPoints": ["a", "b", "c"],
                    "speakerNotes": "Say this.",
                    "imageDescription": "a red barn at dawn"
                })
            })
            .collect();
        json!({ "title": "Deck", "subtitle": "Sub", "slides": slides }).to_string()
    }

    #[test]
    fn test_prompt_fields() {
        let mut config = PresentationConfig::new("  Renewable energy  ");
        config.audience = Audience::GeneralPublic;
        config.tone = Tone::Persuasive;
        config.slide_count = 12;
        let prompt = build_prompt(&config);
        assert!(prompt.contains("Topic: Renewable energy\n"));
        assert!(prompt.contains("Target Audience: General Public"));
        assert!(prompt.contains("Tone: Persuasive"));
        assert!(prompt.contains("Approximate Slide Count: 12"));
        assert!(prompt.contains("Include Citations: No"));
        assert!(prompt.contains("5. The content must be high quality and factual."));
        assert!(!prompt.contains("6. "));
    }

    #[test]
    fn test_prompt_with_citations() {
        let mut config = PresentationConfig::new("Oceans");
        config.include_citations = true;
        let prompt = build_prompt(&config);
        assert!(prompt.contains("Include Citations: Yes"));
        assert!(prompt.contains("6. Provide real or plausible citations"));
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = presentation_schema();
        assert_eq!(schema["required"], json!(["title", "subtitle", "slides"]));
        let slide = &schema["properties"]["slides"]["items"];
        assert_eq!(
            slide["required"],
            json!(["title", "bulletPoints", "speakerNotes", "imageDescription"])
        );
        assert!(slide["properties"]["citations"].is_object());
    }

    #[test]
    fn test_parse_clips_to_limit() {
        let data = parse_presentation(&deck_json(25)).unwrap();
        assert_eq!(data.slides.len(), MAX_SLIDES);
        assert_eq!(data.slides[19].title, "Slide 19");
    }

    #[test]
    fn test_parse_keeps_short_decks() {
        let data = parse_presentation(&deck_json(4)).unwrap();
        assert_eq!(data.slides.len(), 4);
        assert_eq!(data.subtitle, "Sub");
        assert_eq!(data.slides[0].bullet_points.len(), 3);
        assert_eq!(data.slides[0].citations, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_presentation("   "), Err(GenerationError::EmptyResponse)));
        assert!(matches!(
            parse_presentation("not json"),
            Err(GenerationError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_presentation(r#"{"title":"T","subtitle":"S","slides":[]}"#),
            Err(GenerationError::NoSlides)
        ));
    }

    #[test]
    fn test_parse_fenced() {
        let fenced = format!("```json\n{}\n```", deck_json(3));
        assert_eq!(parse_presentation(&fenced).unwrap().slides.len(), 3);
    }
}
