use std::fmt;
use thiserror::Error;

/// Core error types for deck generation and export
#[derive(Error, Debug)]
pub enum SlideError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content generation errors
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error: {0}")]
    Generic(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API Key is missing. Please check your environment configuration.")]
    MissingApiKey,

    #[error("Invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration file invalid: {path}: {reason}")]
    InvalidFile { path: String, reason: String },
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("No response generated from AI.")]
    EmptyResponse,

    #[error("AI response is not valid presentation JSON: {reason}")]
    InvalidResponse { reason: String },

    #[error("AI response contained no slides")]
    NoSlides,

    #[error("Content service error: {message}")]
    Service { message: String },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Presentation has no slides to export")]
    NoSlides,

    #[error("Could not write package: {0}")]
    Package(#[from] slidegen_pptx::PptxError),

    #[error("Export task failed: {reason}")]
    TaskFailed { reason: String },
}

impl From<slidegen_gemini::GeminiError> for GenerationError {
    fn from(err: slidegen_gemini::GeminiError) -> Self {
        if err.is_empty_response() {
            GenerationError::EmptyResponse
        } else {
            GenerationError::Service {
                message: err.to_string(),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SlideError>;

/// Error reporting utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Format error for user display
    pub fn format_user_error(error: &SlideError) -> String {
        match error {
            SlideError::Config(config_err) => Self::format_config_error(config_err),
            SlideError::Generation(gen_err) => Self::format_generation_error(gen_err),
            SlideError::Export(export_err) => format!("❌ Failed to create PPTX file. {export_err}"),
            SlideError::Io(io_err) => format!("📁 File operation failed: {io_err}"),
            SlideError::Json(json_err) => format!("📝 Data format error: {json_err}"),
            SlideError::Generic(err) => format!("❌ Unexpected error: {err}"),
        }
    }

    fn format_config_error(error: &ConfigError) -> String {
        match error {
            ConfigError::MissingApiKey => format!(
                "🔑 {error}\n💡 Set GEMINI_API_KEY, add api_key to the config file, or run with --offline"
            ),
            ConfigError::InvalidFile { .. } => {
                format!("📄 {error}\n💡 Fix the file or remove it to fall back to defaults")
            }
            _ => format!("⚙️  {error}"),
        }
    }

    fn format_generation_error(error: &GenerationError) -> String {
        match error {
            GenerationError::EmptyResponse | GenerationError::NoSlides => {
                format!("🤖 {error}\n💡 Try again, or rephrase the topic")
            }
            GenerationError::Service { message } => {
                format!("🌐 Content service error: {message}\n💡 Check your API key, model name and network")
            }
            _ => format!("🤖 {error}"),
        }
    }

    /// Get error severity level
    pub fn get_severity(error: &SlideError) -> ErrorSeverity {
        match error {
            SlideError::Config(ConfigError::MissingApiKey) => ErrorSeverity::Critical,
            SlideError::Generation(GenerationError::EmptyResponse) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "ℹ️  INFO"),
            ErrorSeverity::Warning => write!(f, "⚠️  WARNING"),
            ErrorSeverity::Error => write!(f, "❌ ERROR"),
            ErrorSeverity::Critical => write!(f, "🚨 CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = SlideError::from(ConfigError::MissingApiKey);
        let msg = ErrorReporter::format_user_error(&err);
        assert!(msg.contains("API Key is missing"));
        assert!(msg.contains("--offline"));
        assert_eq!(ErrorReporter::get_severity(&err), ErrorSeverity::Critical);
    }

    #[test]
    fn test_empty_response_message() {
        let err = SlideError::from(GenerationError::EmptyResponse);
        assert_eq!(err.to_string(), "Generation failed: No response generated from AI.");
        assert_eq!(ErrorReporter::get_severity(&err), ErrorSeverity::Warning);
    }

    #[test]
    fn test_gemini_errors_map_to_generation_errors() {
        use slidegen_gemini::GeminiError;

        let no_text = GenerationError::from(GeminiError::NoText {
            reason: "no candidates".into(),
        });
        assert!(matches!(no_text, GenerationError::EmptyResponse));

        let blocked = GenerationError::from(GeminiError::Blocked {
            reason: "SAFETY".into(),
        });
        assert!(matches!(blocked, GenerationError::EmptyResponse));

        let http = GenerationError::from(GeminiError::Http {
            status: 503,
            message: "overloaded".into(),
        });
        assert!(matches!(&http, GenerationError::Service { message } if message.contains("503")));
    }

    #[test]
    fn test_invalid_value_message() {
        let err = SlideError::from(ConfigError::InvalidValue {
            field: "temperature".into(),
            value: "3.5".into(),
        });
        assert_eq!(ErrorReporter::get_severity(&err), ErrorSeverity::Error);
        assert!(ErrorReporter::format_user_error(&err).contains("temperature = 3.5"));
    }

    #[test]
    fn test_export_message_prefix() {
        let err = SlideError::from(ExportError::NoSlides);
        assert!(ErrorReporter::format_user_error(&err).contains("Failed to create PPTX file."));
    }
}
