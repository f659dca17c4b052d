use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use uuid::Uuid;

use slidegen_common::{PresentationConfig, PresentationData};

use crate::client::ContentClient;
use crate::error::{ErrorReporter, SlideError};
use crate::export::Exporter;

#[derive(Debug, Clone)]
pub enum Op {
    Generate { config: PresentationConfig },
    Export { data: PresentationData, config: PresentationConfig },
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub op: Op,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventMsg {
    GenerationStarted,
    PresentationReady { data: PresentationData },
    GenerationFailed { message: String },
    ExportFinished { path: PathBuf },
    ExportFailed { message: String },
    ShutdownComplete,
}

/// An event tagged with the id of the submission that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: String,
    pub msg: EventMsg,
}

/// Background worker owning the content client and the exporter.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    tx_submit: mpsc::Sender<Submission>,
    rx_event: Mutex<mpsc::Receiver<Event>>,
}

impl Session {
    pub fn spawn(client: Arc<dyn ContentClient + Send + Sync>, exporter: Arc<Exporter>) -> Self {
        let (tx_submit, mut rx_submit) = mpsc::channel::<Submission>(64);
        let (tx_event, rx_event) = mpsc::channel::<Event>(256);

        tokio::spawn(async move {
            while let Some(Submission { id, op }) = rx_submit.recv().await {
                debug!(%id, "session op: {op:?}");
                match op {
                    Op::Generate { config } => {
                        let client = Arc::clone(&client);
                        let tx_event = tx_event.clone();
                        tokio::spawn(async move {
                            let _ = tx_event
                                .send(Event {
                                    id: id.clone(),
                                    msg: EventMsg::GenerationStarted,
                                })
                                .await;
                            let msg = match client.generate(&config).await {
                                Ok(data) => EventMsg::PresentationReady { data },
                                Err(e) => {
                                    error!("generation failed: {e}");
                                    EventMsg::GenerationFailed {
                                        message: ErrorReporter::format_user_error(&e),
                                    }
                                }
                            };
                            let _ = tx_event.send(Event { id, msg }).await;
                        });
                    }
                    Op::Export { data, config } => {
                        let exporter = Arc::clone(&exporter);
                        let tx_event = tx_event.clone();
                        tokio::spawn(async move {
                            let msg = match exporter.export(&data, &config).await {
                                Ok(path) => EventMsg::ExportFinished { path },
                                Err(e) => {
                                    error!("export failed: {e}");
                                    EventMsg::ExportFailed {
                                        message: export_cause(&e),
                                    }
                                }
                            };
                            let _ = tx_event.send(Event { id, msg }).await;
                        });
                    }
                    Op::Shutdown => {
                        info!("session shutting down");
                        let _ = tx_event
                            .send(Event {
                                id,
                                msg: EventMsg::ShutdownComplete,
                            })
                            .await;
                        break;
                    }
                }
            }
        });

        let inner = Arc::new(Inner {
            tx_submit,
            rx_event: Mutex::new(rx_event),
        });
        Session { inner }
    }

    /// Queue an op; returns the id its events will carry.
    pub async fn submit(&self, op: Op) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.inner
            .tx_submit
            .send(Submission { id: id.clone(), op })
            .await
            .map_err(|e| anyhow::anyhow!("session closed: {e}"))?;
        Ok(id)
    }

    pub async fn next_event(&self) -> Option<Event> {
        let mut rx = self.inner.rx_event.lock().await;
        rx.recv().await
    }
}

/// The cause without the "Export failed" wrapper; callers add their own prefix.
fn export_cause(err: &SlideError) -> String {
    match err {
        SlideError::Export(inner) => inner.to_string(),
        other => other.to_string(),
    }
}
