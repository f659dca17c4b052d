use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeminiError>;

#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("failed to build http client: {0}")]
    ClientBuild(String),

    #[error("gemini request failed: {0}")]
    Request(String),

    #[error("gemini http {status}: {message}")]
    Http { status: u16, message: String },

    #[error("gemini response was not valid JSON: {0}")]
    InvalidJson(String),

    #[error("gemini blocked the prompt: {reason}")]
    Blocked { reason: String },

    /// A well-formed response whose first candidate carries no text.
    #[error("gemini returned no text ({reason})")]
    NoText { reason: String },
}

impl GeminiError {
    /// True when the service answered but produced nothing usable.
    pub fn is_empty_response(&self) -> bool {
        matches!(self, GeminiError::Blocked { .. } | GeminiError::NoText { .. })
    }
}
