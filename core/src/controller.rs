use slidegen_common::{PresentationConfig, PresentationData};
use std::path::PathBuf;

pub const DEFAULT_GENERATION_ERROR: &str =
    "Something went wrong generating the presentation. Please try again.";
pub const EXPORT_ERROR_PREFIX: &str = "Failed to create PPTX file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Input,
    Preview,
}

/// Outcome of the most recent export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Failed(String),
}

/// Which screen is shown and what it shows.
///
/// At most one generation is outstanding: `begin_generation` refuses while
/// `is_generating` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub step: Step,
    pub is_generating: bool,
    pub data: Option<PresentationData>,
    pub config: Option<PresentationConfig>,
    pub error: Option<String>,
    pub last_export: Option<ExportStatus>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a preview of an existing deck, skipping generation.
    pub fn with_deck(config: PresentationConfig, data: PresentationData) -> Self {
        Self {
            step: Step::Preview,
            data: Some(data),
            config: Some(config),
            ..Self::default()
        }
    }

    /// Returns false, changing nothing, when a generation is already running.
    pub fn begin_generation(&mut self, config: PresentationConfig) -> bool {
        if self.is_generating {
            return false;
        }
        self.is_generating = true;
        self.error = None;
        self.config = Some(config);
        true
    }

    pub fn finish_generation(&mut self, result: Result<PresentationData, String>) {
        self.is_generating = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.step = Step::Preview;
                self.last_export = None;
            }
            Err(message) => {
                let message = message.trim();
                self.error = Some(if message.is_empty() {
                    DEFAULT_GENERATION_ERROR.to_string()
                } else {
                    message.to_string()
                });
                self.step = Step::Input;
            }
        }
    }

    pub fn reset(&mut self) {
        self.step = Step::Input;
        self.data = None;
        self.error = None;
        self.last_export = None;
    }

    /// The preview stays visible whether or not the export worked.
    pub fn record_export(&mut self, result: Result<PathBuf, String>) {
        self.last_export = Some(match result {
            Ok(path) => ExportStatus::Saved(path),
            Err(cause) if cause.trim().is_empty() => ExportStatus::Failed(EXPORT_ERROR_PREFIX.to_string()),
            Err(cause) => ExportStatus::Failed(format!("{EXPORT_ERROR_PREFIX} {cause}")),
        });
    }

    /// Deck and options ready for preview or export.
    pub fn deck(&self) -> Option<(&PresentationConfig, &PresentationData)> {
        match (&self.config, &self.data) {
            (Some(config), Some(data)) => Some((config, data)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> PresentationData {
        PresentationData {
            title: "T".into(),
            subtitle: "S".into(),
            slides: vec![],
        }
    }

    #[test]
    fn test_generation_success_moves_to_preview() {
        let mut state = AppState::new();
        state.error = Some("old".into());
        assert!(state.begin_generation(PresentationConfig::new("Topic")));
        assert!(state.is_generating);
        assert_eq!(state.error, None);

        state.finish_generation(Ok(data()));
        assert!(!state.is_generating);
        assert_eq!(state.step, Step::Preview);
        assert!(state.deck().is_some());
    }

    #[test]
    fn test_single_generation_in_flight() {
        let mut state = AppState::new();
        assert!(state.begin_generation(PresentationConfig::new("First")));
        assert!(!state.begin_generation(PresentationConfig::new("Second")));
        assert_eq!(state.config.as_ref().unwrap().topic, "First");
    }

    #[test]
    fn test_generation_failure_stays_on_input() {
        let mut state = AppState::new();
        state.begin_generation(PresentationConfig::new("Topic"));
        state.finish_generation(Err("quota exceeded".into()));
        assert_eq!(state.step, Step::Input);
        assert!(!state.is_generating);
        assert_eq!(state.error.as_deref(), Some("quota exceeded"));

        state.begin_generation(PresentationConfig::new("Topic"));
        state.finish_generation(Err(String::new()));
        assert_eq!(state.error.as_deref(), Some(DEFAULT_GENERATION_ERROR));
    }

    #[test]
    fn test_reset_discards_deck() {
        let mut state = AppState::with_deck(PresentationConfig::new("x"), data());
        assert_eq!(state.step, Step::Preview);
        state.reset();
        assert_eq!(state.step, Step::Input);
        assert!(state.data.is_none());
        assert!(state.deck().is_none());
    }

    #[test]
    fn test_export_failure_keeps_preview() {
        let mut state = AppState::with_deck(PresentationConfig::new("x"), data());
        state.record_export(Err("disk full".into()));
        assert_eq!(state.step, Step::Preview);
        assert_eq!(
            state.last_export,
            Some(ExportStatus::Failed("Failed to create PPTX file. disk full".into()))
        );
        state.record_export(Ok(PathBuf::from("x.pptx")));
        assert_eq!(state.last_export, Some(ExportStatus::Saved(PathBuf::from("x.pptx"))));
    }
}
