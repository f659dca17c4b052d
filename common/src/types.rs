use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fewest slides the form lets a user ask for.
pub const MIN_SLIDES: usize = 3;
/// Most slides a deck may hold, both at request time and after generation.
pub const MAX_SLIDES: usize = 20;
pub const DEFAULT_SLIDES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    Professional,
    Academic,
    Creative,
    Persuasive,
    Simple,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Academic,
        Tone::Creative,
        Tone::Persuasive,
        Tone::Simple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Academic => "Academic",
            Tone::Creative => "Creative",
            Tone::Persuasive => "Persuasive",
            Tone::Simple => "Simple",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("Invalid tone '{s}'. Use: professional, academic, creative, persuasive, simple")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Audience {
    #[default]
    Professionals,
    Students,
    #[serde(rename = "General Public")]
    GeneralPublic,
    Investors,
    Children,
}

impl Audience {
    pub const ALL: [Audience; 5] = [
        Audience::Professionals,
        Audience::Students,
        Audience::GeneralPublic,
        Audience::Investors,
        Audience::Children,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Professionals => "Professionals",
            Audience::Students => "Students",
            Audience::GeneralPublic => "General Public",
            Audience::Investors => "Investors",
            Audience::Children => "Children",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        Audience::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| {
                format!(
                    "Invalid audience '{s}'. Use: professionals, students, general-public, investors, children"
                )
            })
    }
}

/// Everything the user chose before asking for a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationConfig {
    pub topic: String,
    pub audience: Audience,
    pub tone: Tone,
    pub slide_count: usize,
    pub include_images: bool,
    pub include_speaker_notes: bool,
    pub include_citations: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            audience: Audience::default(),
            tone: Tone::default(),
            slide_count: DEFAULT_SLIDES,
            include_images: true,
            include_speaker_notes: true,
            include_citations: false,
        }
    }
}

impl PresentationConfig {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("Topic must not be empty".to_string());
        }
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.slide_count) {
            return Err(format!(
                "Slide count must be between {MIN_SLIDES} and {MAX_SLIDES}, got {}",
                self.slide_count
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideContent {
    pub title: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub speaker_notes: String,
    #[serde(default)]
    pub image_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

impl SlideContent {
    /// Citations joined the way both the preview and the export show them.
    pub fn citation_line(&self) -> Option<String> {
        match self.citations.as_deref() {
            Some(list) if !list.is_empty() => Some(format!("Source: {}", list.join("; "))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationData {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub slides: Vec<SlideContent>,
}

impl PresentationData {
    /// Drops slides past [`MAX_SLIDES`]. Returns how many were removed.
    pub fn clip_slides(&mut self) -> usize {
        let excess = self.slides.len().saturating_sub(MAX_SLIDES);
        self.slides.truncate(MAX_SLIDES);
        excess
    }
}

/// A generated deck together with the options that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedDeck {
    pub config: PresentationConfig,
    pub data: PresentationData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(title: &str) -> SlideContent {
        SlideContent {
            title: title.to_string(),
            bullet_points: vec!["a".into()],
            speaker_notes: String::new(),
            image_description: String::new(),
            citations: None,
        }
    }

    #[test]
    fn test_tone_parse() {
        assert_eq!("creative".parse::<Tone>(), Ok(Tone::Creative));
        assert_eq!(" ACADEMIC ".parse::<Tone>(), Ok(Tone::Academic));
        assert!("loud".parse::<Tone>().is_err());
    }

    #[test]
    fn test_audience_parse() {
        assert_eq!("general-public".parse::<Audience>(), Ok(Audience::GeneralPublic));
        assert_eq!("General Public".parse::<Audience>(), Ok(Audience::GeneralPublic));
        assert_eq!("investors".parse::<Audience>(), Ok(Audience::Investors));
        assert!("aliens".parse::<Audience>().is_err());
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = PresentationConfig::new("Solar power");
        assert_eq!(config.slide_count, 8);
        assert!(config.include_images);
        assert!(config.include_speaker_notes);
        assert!(!config.include_citations);
        assert!(config.validate().is_ok());

        assert!(PresentationConfig::new("   ").validate().is_err());
        let mut too_many = PresentationConfig::new("x");
        too_many.slide_count = 21;
        assert!(too_many.validate().is_err());
        too_many.slide_count = 2;
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_clip_slides() {
        let mut data = PresentationData {
            title: "T".into(),
            subtitle: "S".into(),
            slides: (0..25).map(|i| slide(&i.to_string())).collect(),
        };
        assert_eq!(data.clip_slides(), 5);
        assert_eq!(data.slides.len(), MAX_SLIDES);
        assert_eq!(data.slides[19].title, "19");
        assert_eq!(data.clip_slides(), 0);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = r#"{
            "title": "Deck",
            "subtitle": "Sub",
            "slides": [{
                "title": "One",
                "bulletPoints": ["x", "y"],
                "speakerNotes": "say this",
                "imageDescription": "a city",
                "citations": ["Report 2024"]
            }]
        }"#;
        let data: PresentationData = serde_json::from_str(json).unwrap();
        assert_eq!(data.slides[0].bullet_points, vec!["x", "y"]);
        assert_eq!(data.slides[0].speaker_notes, "say this");
        assert_eq!(
            data.slides[0].citation_line().as_deref(),
            Some("Source: Report 2024")
        );

        let config = PresentationConfig::new("t");
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["slideCount"], 8);
        assert_eq!(value["audience"], "Professionals");
    }

    #[test]
    fn test_citation_line_empty() {
        let mut s = slide("a");
        assert_eq!(s.citation_line(), None);
        s.citations = Some(vec![]);
        assert_eq!(s.citation_line(), None);
        s.citations = Some(vec!["A".into(), "B".into()]);
        assert_eq!(s.citation_line().as_deref(), Some("Source: A; B"));
    }
}
