use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use slidegen_common::{Audience, PresentationConfig, Tone, MAX_SLIDES, MIN_SLIDES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Topic,
    Audience,
    Tone,
    SlideCount,
    Images,
    SpeakerNotes,
    Citations,
    Submit,
}

impl Field {
    const ORDER: [Field; 8] = [
        Field::Topic,
        Field::Audience,
        Field::Tone,
        Field::SlideCount,
        Field::Images,
        Field::SpeakerNotes,
        Field::Citations,
        Field::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Field {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Field {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit(PresentationConfig),
    Quit,
}

/// The deck options form.
#[derive(Debug, Clone)]
pub struct InputForm {
    pub topic: String,
    pub audience: Audience,
    pub tone: Tone,
    pub slide_count: usize,
    pub include_images: bool,
    pub include_speaker_notes: bool,
    pub include_citations: bool,
    pub focus: Field,
}

impl Default for InputForm {
    fn default() -> Self {
        Self::from_config(&PresentationConfig::default())
    }
}

impl InputForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from earlier options, e.g. after "start over".
    pub fn from_config(config: &PresentationConfig) -> Self {
        Self {
            topic: config.topic.clone(),
            audience: config.audience,
            tone: config.tone,
            slide_count: config.slide_count.clamp(MIN_SLIDES, MAX_SLIDES),
            include_images: config.include_images,
            include_speaker_notes: config.include_speaker_notes,
            include_citations: config.include_citations,
            focus: Field::Topic,
        }
    }

    pub fn to_config(&self) -> PresentationConfig {
        PresentationConfig {
            topic: self.topic.trim().to_string(),
            audience: self.audience,
            tone: self.tone,
            slide_count: self.slide_count,
            include_images: self.include_images,
            include_speaker_notes: self.include_speaker_notes,
            include_citations: self.include_citations,
        }
    }

    pub fn can_submit(&self, is_generating: bool) -> bool {
        !is_generating && !self.topic.trim().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent, is_generating: bool) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('g') if ctrl => return self.submit(is_generating),
            KeyCode::Char('c') if ctrl => return FormAction::Quit,
            KeyCode::Esc => return FormAction::Quit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                return FormAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                return FormAction::None;
            }
            _ => {}
        }

        match self.focus {
            Field::Topic => match key.code {
                KeyCode::Char(c) if !ctrl => self.topic.push(c),
                KeyCode::Backspace => {
                    self.topic.pop();
                }
                KeyCode::Enter => self.focus = self.focus.next(),
                _ => {}
            },
            Field::Audience => match key.code {
                KeyCode::Left => self.audience = cycle(&Audience::ALL, self.audience, -1),
                KeyCode::Right | KeyCode::Char(' ') => self.audience = cycle(&Audience::ALL, self.audience, 1),
                _ => {}
            },
            Field::Tone => match key.code {
                KeyCode::Left => self.tone = cycle(&Tone::ALL, self.tone, -1),
                KeyCode::Right | KeyCode::Char(' ') => self.tone = cycle(&Tone::ALL, self.tone, 1),
                _ => {}
            },
            Field::SlideCount => match key.code {
                KeyCode::Left | KeyCode::Char('-') => {
                    self.slide_count = self.slide_count.saturating_sub(1).max(MIN_SLIDES);
                }
                KeyCode::Right | KeyCode::Char('+') => {
                    self.slide_count = (self.slide_count + 1).min(MAX_SLIDES);
                }
                _ => {}
            },
            Field::Images => {
                if toggles(key.code) {
                    self.include_images = !self.include_images;
                }
            }
            Field::SpeakerNotes => {
                if toggles(key.code) {
                    self.include_speaker_notes = !self.include_speaker_notes;
                }
            }
            Field::Citations => {
                if toggles(key.code) {
                    self.include_citations = !self.include_citations;
                }
            }
            Field::Submit => {
                if key.code == KeyCode::Enter {
                    return self.submit(is_generating);
                }
            }
        }
        FormAction::None
    }

    fn submit(&self, is_generating: bool) -> FormAction {
        if self.can_submit(is_generating) {
            FormAction::Submit(self.to_config())
        } else {
            FormAction::None
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, error: Option<&str>, is_generating: bool) {
        let block = Block::default()
            .title(" Create Your Presentation ")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let error_height = if error.is_some() { 4 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(error_height),
                Constraint::Min(0),
            ])
            .split(inner);

        let topic_style = self.field_style(Field::Topic);
        let topic_text = if self.topic.is_empty() && self.focus != Field::Topic {
            Span::styled(
                "e.g. The Future of Renewable Energy",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            let cursor = if self.focus == Field::Topic { "▏" } else { "" };
            Span::raw(format!("{}{cursor}", self.topic))
        };
        frame.render_widget(
            Paragraph::new(Line::from(topic_text))
                .block(Block::default().title(" Topic ").borders(Borders::ALL).border_style(topic_style)),
            rows[0],
        );

        frame.render_widget(
            self.choice_line(Field::Audience, "Audience", self.audience.as_str()),
            rows[2],
        );
        frame.render_widget(self.choice_line(Field::Tone, "Tone", self.tone.as_str()), rows[3]);
        frame.render_widget(
            self.choice_line(Field::SlideCount, "Slides", &self.slide_count.to_string()),
            rows[4],
        );
        frame.render_widget(self.toggle_line(Field::Images, "Generate images", self.include_images), rows[6]);
        frame.render_widget(
            self.toggle_line(Field::SpeakerNotes, "Speaker notes", self.include_speaker_notes),
            rows[7],
        );
        frame.render_widget(
            self.toggle_line(Field::Citations, "Citations", self.include_citations),
            rows[8],
        );

        let label = if is_generating {
            " Generating Presentation... "
        } else {
            " Generate Presentation "
        };
        let mut button_style = self.field_style(Field::Submit);
        if !self.can_submit(is_generating) {
            button_style = button_style.fg(Color::DarkGray);
        }
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(label, button_style)))
                .block(Block::default().borders(Borders::ALL).border_style(button_style))
                .alignment(ratatui::layout::Alignment::Center),
            rows[9],
        );

        if let Some(message) = error {
            frame.render_widget(
                Paragraph::new(message.to_string())
                    .style(Style::default().fg(Color::Red))
                    .block(Block::default().title(" Error ").borders(Borders::ALL))
                    .wrap(Wrap { trim: true }),
                rows[10],
            );
        }
    }

    fn field_style(&self, field: Field) -> Style {
        if self.focus == field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    fn choice_line(&self, field: Field, label: &str, value: &str) -> Paragraph<'static> {
        let style = self.field_style(field);
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {label:<16}"), style),
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            Span::styled(value.to_string(), style),
            Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        ]))
    }

    fn toggle_line(&self, field: Field, label: &str, on: bool) -> Paragraph<'static> {
        let style = self.field_style(field);
        let mark = if on { "[x]" } else { "[ ]" };
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {mark} "), style),
            Span::styled(label.to_string(), style),
        ]))
    }
}

fn toggles(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right)
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, step: isize) -> T {
    let len = all.len() as isize;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[((idx + step).rem_euclid(len)) as usize]
}
