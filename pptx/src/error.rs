use thiserror::Error;

#[derive(Error, Debug)]
pub enum PptxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML generation error: {0}")]
    Xml(String),

    #[error("Unsupported image data: {reason}")]
    UnsupportedImage { reason: String },
}

impl From<std::fmt::Error> for PptxError {
    fn from(e: std::fmt::Error) -> Self {
        PptxError::Xml(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PptxError>;
