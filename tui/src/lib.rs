//! Terminal front end: the input form, the slide preview and the loop tying
//! them to a background [`Session`].

pub mod app;
pub mod form;
pub mod preview;
pub mod theme;
pub mod widgets;

use anyhow::Result;
use slidegen_common::SavedDeck;
use slidegen_core::{
    client_from_config, exporter_from_config, Config, ContentClient, Session, UnconfiguredClient,
};
use std::sync::Arc;
use tracing::warn;

pub use app::{run_app, App};
pub use form::{FormAction, InputForm};
pub use preview::{PreviewAction, SlidePreview};
pub use widgets::status_bar::ServiceStatus;

pub fn service_status(config: &Config) -> ServiceStatus {
    if config.offline {
        ServiceStatus::Offline
    } else if config.has_api_key() {
        ServiceStatus::Ready
    } else {
        ServiceStatus::MissingKey
    }
}

/// Without a key the form still opens; submitting reports the missing key.
fn spawn_session(config: &Config) -> Result<Session> {
    let client: Arc<dyn ContentClient + Send + Sync> = match client_from_config(config) {
        Ok(client) => client,
        Err(e) => {
            warn!("content service unavailable: {e}");
            Arc::new(UnconfiguredClient)
        }
    };
    let exporter = Arc::new(exporter_from_config(config)?);
    Ok(Session::spawn(client, exporter))
}

/// Form, generation and preview in one terminal session.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let session = spawn_session(config)?;
    let app = App::new(service_status(config), config.settings.image_base_url.clone());
    run_app(app, session).await
}

/// Preview (and optionally re-export) a deck saved as JSON.
pub async fn run_preview(config: &Config, deck: SavedDeck) -> Result<()> {
    let session = spawn_session(config)?;
    let app = App::with_deck(
        service_status(config),
        config.settings.image_base_url.clone(),
        deck.config,
        deck.data,
    );
    run_app(app, session).await
}
