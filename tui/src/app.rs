use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};
use slidegen_common::{PresentationConfig, PresentationData};
use slidegen_core::{AppState, Event as SessionEvent, EventMsg, ExportStatus, Op, Session, Step};
use std::io;
use tokio::time::{interval, Duration};
use tracing::{debug, warn};

use crate::form::{FormAction, InputForm};
use crate::preview::{PreviewAction, SlidePreview};
use crate::widgets::status_bar::{ServiceStatus, StatusBar};

const INPUT_HINTS: &str = "Tab next field • ←/→ change • Ctrl+G generate • Esc quit";
const PREVIEW_HINTS: &str = "←/→ navigate • d download • r start over • q quit";

pub struct App {
    state: AppState,
    form: InputForm,
    preview: Option<SlidePreview>,
    status: ServiceStatus,
    image_base_url: String,
    exporting: bool,
    /// Submission id of the export this preview is waiting on.
    pending_export: Option<String>,
    exported_at: Option<DateTime<Local>>,
    should_quit: bool,
}

impl App {
    pub fn new(status: ServiceStatus, image_base_url: impl Into<String>) -> Self {
        Self {
            state: AppState::new(),
            form: InputForm::new(),
            preview: None,
            status,
            image_base_url: image_base_url.into(),
            exporting: false,
            pending_export: None,
            exported_at: None,
            should_quit: false,
        }
    }

    /// Opens straight into the preview of an existing deck.
    pub fn with_deck(
        status: ServiceStatus,
        image_base_url: impl Into<String>,
        config: PresentationConfig,
        data: PresentationData,
    ) -> Self {
        let mut app = Self::new(status, image_base_url);
        app.form = InputForm::from_config(&config);
        app.state = AppState::with_deck(config, data);
        app.sync_preview();
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn preview(&self) -> Option<&SlidePreview> {
        self.preview.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Applies a key press and returns the op to submit, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Op> {
        match self.state.step {
            Step::Input => match self.form.handle_key(key, self.state.is_generating) {
                FormAction::Submit(config) => {
                    if self.state.begin_generation(config.clone()) {
                        Some(Op::Generate { config })
                    } else {
                        None
                    }
                }
                FormAction::Quit => {
                    self.should_quit = true;
                    None
                }
                FormAction::None => None,
            },
            Step::Preview => {
                let action = match self.preview.as_mut() {
                    Some(preview) => preview.handle_key(key),
                    None => PreviewAction::None,
                };
                match action {
                    PreviewAction::Download => self.export_op(),
                    PreviewAction::StartOver => {
                        self.state.reset();
                        self.preview = None;
                        self.exporting = false;
                        self.pending_export = None;
                        self.exported_at = None;
                        None
                    }
                    PreviewAction::Quit => {
                        self.should_quit = true;
                        None
                    }
                    PreviewAction::None => None,
                }
            }
        }
    }

    fn export_op(&mut self) -> Option<Op> {
        if self.exporting {
            return None;
        }
        let (config, data) = self.state.deck()?;
        let op = Op::Export {
            data: data.clone(),
            config: config.clone(),
        };
        self.exporting = true;
        Some(op)
    }

    /// Records the session id of an export op returned by `handle_key`.
    pub fn export_submitted(&mut self, id: String) {
        if self.exporting {
            self.pending_export = Some(id);
        }
    }

    /// Export results only count for the export this preview started.
    fn take_export(&mut self, id: &str) -> bool {
        if self.pending_export.as_deref() != Some(id) {
            debug!(id, "ignoring result of an abandoned export");
            return false;
        }
        self.pending_export = None;
        self.exporting = false;
        self.exported_at = Some(Local::now());
        true
    }

    pub fn handle_session_event(&mut self, event: SessionEvent) {
        let SessionEvent { id, msg } = event;
        match msg {
            EventMsg::GenerationStarted => debug!("generation started"),
            EventMsg::PresentationReady { data } => {
                self.state.finish_generation(Ok(data));
                self.sync_preview();
            }
            EventMsg::GenerationFailed { message } => {
                self.state.finish_generation(Err(message));
                self.preview = None;
            }
            EventMsg::ExportFinished { path } => {
                if self.take_export(&id) {
                    self.state.record_export(Ok(path));
                }
            }
            EventMsg::ExportFailed { message } => {
                if self.take_export(&id) {
                    self.state.record_export(Err(message));
                }
            }
            EventMsg::ShutdownComplete => self.should_quit = true,
        }
    }

    fn sync_preview(&mut self) {
        self.preview = self
            .state
            .deck()
            .map(|(config, data)| SlidePreview::new(data.clone(), config.clone(), self.image_base_url.clone()));
    }

    pub fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(1)])
            .split(frame.area());

        let (mode, hints) = match self.state.step {
            Step::Input => ("SlideGen AI", INPUT_HINTS),
            Step::Preview => ("Preview", PREVIEW_HINTS),
        };
        frame.render_widget(StatusBar::new(mode, self.status, hints), rows[0]);

        match (self.state.step, &self.preview) {
            (Step::Preview, Some(preview)) => preview.render(frame, rows[1]),
            _ => self
                .form
                .render(frame, rows[1], self.state.error.as_deref(), self.state.is_generating),
        }

        frame.render_widget(Paragraph::new(self.export_line()).wrap(Wrap { trim: true }), rows[2]);
    }

    fn export_line(&self) -> Line<'static> {
        if self.exporting {
            return Line::from(Span::styled(" Exporting PPTX...", Style::default().fg(Color::Yellow)));
        }
        let at = self
            .exported_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        match &self.state.last_export {
            Some(ExportStatus::Saved(path)) => Line::from(Span::styled(
                format!(" {at} Saved {}", path.display()),
                Style::default().fg(Color::Green),
            )),
            Some(ExportStatus::Failed(message)) => Line::from(Span::styled(
                format!(" {at} ❌ {message}"),
                Style::default().fg(Color::Red),
            )),
            None => Line::default(),
        }
    }
}

/// Drives the app until the user quits, restoring the terminal afterwards.
pub async fn run_app(mut app: App, session: Session) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &session).await;

    if let Err(e) = session.submit(Op::Shutdown).await {
        warn!("session already closed: {e}");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, session: &Session) -> Result<()> {
    let mut tick_interval = interval(Duration::from_millis(250));

    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            _ = tick_interval.tick() => {}
            maybe_event = session.next_event() => {
                match maybe_event {
                    Some(ev) => {
                        debug!(id = %ev.id, "session event: {:?}", ev.msg);
                        app.handle_session_event(ev);
                    }
                    None => {
                        warn!("session event channel closed");
                        break;
                    }
                }
            }
            polled = tokio::task::spawn_blocking(|| event::poll(Duration::from_millis(50))) => {
                if let Ok(Ok(true)) = polled {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            if let Some(op) = app.handle_key(key) {
                                let is_export = matches!(op, Op::Export { .. });
                                let id = session.submit(op).await?;
                                if is_export {
                                    app.export_submitted(id);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
