//! Deck generation, export and the session that drives them.

pub mod client;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod export;
pub mod image;
pub mod session;

#[cfg(test)]
mod test_http;

pub use client::{client_from_config, ContentClient, GeminiContentClient, StubClient, UnconfiguredClient};
pub use config::{Config, ConfigOverrides};
pub use controller::{AppState, ExportStatus, Step};
pub use error::{ErrorReporter, Result, SlideError};
pub use export::Exporter;
pub use image::{HttpImageSource, ImageSource, NoImageSource};
pub use session::{Event, EventMsg, Op, Session, Submission};

use std::sync::Arc;

/// Image source for a resolved config: none offline, HTTP otherwise.
pub fn image_source_from_config(config: &Config) -> Result<Arc<dyn ImageSource + Send + Sync>> {
    if config.offline {
        return Ok(Arc::new(NoImageSource));
    }
    Ok(Arc::new(HttpImageSource::new(
        config.settings.image_base_url.clone(),
        config.request_timeout(),
    )?))
}

/// Exporter writing into the configured output directory.
pub fn exporter_from_config(config: &Config) -> Result<Exporter> {
    Ok(Exporter::new(
        config.settings.output_dir.clone(),
        image_source_from_config(config)?,
    ))
}
