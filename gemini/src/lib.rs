pub mod client;
pub mod error;

pub use client::{GeminiClient, GenerateContentResponse, GenerateRequest};
pub use error::{GeminiError, Result};
