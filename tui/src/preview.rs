use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use slidegen_common::{image_url, PresentationConfig, PresentationData, SlideContent, Theme, PREVIEW_IMAGE_SIZE};
use unicode_width::UnicodeWidthStr;

use crate::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewAction {
    None,
    Download,
    StartOver,
    Quit,
}

/// One-slide-at-a-time view of a generated deck.
#[derive(Debug, Clone)]
pub struct SlidePreview {
    data: PresentationData,
    config: PresentationConfig,
    current_slide: usize,
    image_base_url: String,
}

impl SlidePreview {
    pub fn new(data: PresentationData, config: PresentationConfig, image_base_url: impl Into<String>) -> Self {
        Self {
            data,
            config,
            current_slide: 0,
            image_base_url: image_base_url.into(),
        }
    }

    pub fn current(&self) -> usize {
        self.current_slide
    }

    pub fn len(&self) -> usize {
        self.data.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.slides.is_empty()
    }

    pub fn data(&self) -> &PresentationData {
        &self.data
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn current_content(&self) -> Option<&SlideContent> {
        self.data.slides.get(self.current_slide)
    }

    pub fn next_slide(&mut self) {
        if self.current_slide + 1 < self.data.slides.len() {
            self.current_slide += 1;
        }
    }

    pub fn previous_slide(&mut self) {
        if self.current_slide > 0 {
            self.current_slide -= 1;
        }
    }

    pub fn first_slide(&mut self) {
        self.current_slide = 0;
    }

    pub fn last_slide(&mut self) {
        self.current_slide = self.data.slides.len().saturating_sub(1);
    }

    /// Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) {
        if index < self.data.slides.len() {
            self.current_slide = index;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PreviewAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => PreviewAction::Quit,
                KeyCode::Char('d') => PreviewAction::Download,
                _ => PreviewAction::None,
            };
        }
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') | KeyCode::PageDown => self.next_slide(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => self.previous_slide(),
            KeyCode::Home | KeyCode::Char('g') => self.first_slide(),
            KeyCode::End | KeyCode::Char('G') => self.last_slide(),
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(n) = c.to_digit(10) {
                    self.jump_to(n as usize - 1);
                }
            }
            KeyCode::Char('d') => return PreviewAction::Download,
            KeyCode::Char('r') => return PreviewAction::StartOver,
            KeyCode::Char('q') | KeyCode::Esc => return PreviewAction::Quit,
            _ => {}
        }
        PreviewAction::None
    }

    /// Header line under the deck title.
    pub fn summary(&self) -> String {
        format!(
            "{} Slides • {} Tone • {}",
            self.data.slides.len(),
            self.config.tone,
            self.config.audience
        )
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let palette = Palette::for_tone(self.config.tone);
        let notes_height = if self.config.include_speaker_notes { 6 } else { 0 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(notes_height),
            ])
            .split(area);

        self.render_header(frame, rows[0]);
        self.render_slide(frame, rows[1], &palette);
        self.render_dots(frame, rows[2], &palette);
        if self.config.include_speaker_notes {
            self.render_notes(frame, rows[3]);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let max = area.width.saturating_sub(4) as usize;
        let title = truncate(&self.data.title, max);
        let lines = vec![
            Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(self.summary(), Style::default().fg(Color::Gray))),
        ];
        frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM)), area);
    }

    fn render_slide(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let Some(slide) = self.current_content() else {
            frame.render_widget(
                Paragraph::new("No slide content").block(Block::default().borders(Borders::ALL)),
                area,
            );
            return;
        };

        let card = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.chrome)
            .style(Style::default().bg(palette.background));
        let inner = card.inner(area);
        frame.render_widget(card, area);

        let theme = Theme::for_tone(self.config.tone);
        let header_bar = u16::from(theme.header_bar.is_some());
        let citation = if self.config.include_citations {
            slide.citation_line()
        } else {
            None
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header_bar),
                Constraint::Length(2),
                Constraint::Length(u16::from(theme.title_rule)),
                Constraint::Min(3),
                Constraint::Length(u16::from(citation.is_some()) * 2),
                Constraint::Length(1),
            ])
            .split(inner);

        if let Some(bar) = theme.header_bar {
            let fill = "▀".repeat(rows[0].width as usize);
            frame.render_widget(
                Paragraph::new(fill).style(Style::default().fg(crate::theme::color(bar.color)).bg(palette.background)),
                rows[0],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {}", slide.title), palette.title)))
                .style(Style::default().bg(palette.background))
                .wrap(Wrap { trim: false }),
            rows[1],
        );

        if theme.title_rule {
            let rule_width = (rows[2].width.saturating_sub(2) as usize).min(40);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(format!(" {}", "━".repeat(rule_width)), palette.accent))),
                rows[2],
            );
        }

        let body = if self.config.include_images {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
                .split(rows[3]);
            self.render_image_panel(frame, cols[1], slide, palette);
            cols[0]
        } else {
            rows[3]
        };

        let bullets: Vec<Line> = slide
            .bullet_points
            .iter()
            .map(|point| {
                Line::from(vec![
                    Span::styled("  • ", palette.accent),
                    Span::styled(point.clone(), palette.body),
                ])
            })
            .collect();
        frame.render_widget(
            Paragraph::new(bullets)
                .style(Style::default().bg(palette.background))
                .wrap(Wrap { trim: false }),
            body,
        );

        if let Some(line) = citation {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" {line}"),
                    palette.footer.add_modifier(Modifier::ITALIC),
                )))
                .wrap(Wrap { trim: true }),
                rows[4],
            );
        }

        let counter = format!("{} / {} ", self.current_slide + 1, self.data.slides.len());
        let footer = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(counter.width() as u16)])
            .split(rows[5]);
        frame.render_widget(
            Paragraph::new(Span::styled(" SlideGen AI", palette.footer.add_modifier(Modifier::BOLD))),
            footer[0],
        );
        frame.render_widget(
            Paragraph::new(Span::styled(counter, palette.footer)).alignment(Alignment::Right),
            footer[1],
        );
    }

    fn render_image_panel(&self, frame: &mut Frame, area: Rect, slide: &SlideContent, palette: &Palette) {
        let url = image_url(&self.image_base_url, &slide.image_description, PREVIEW_IMAGE_SIZE);
        let lines = vec![
            Line::from(Span::styled("Image", palette.accent.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(slide.image_description.clone(), palette.body)),
            Line::from(""),
            Line::from(Span::styled(url, palette.footer)),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).border_style(palette.chrome))
                .style(Style::default().bg(palette.background))
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_dots(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let spans: Vec<Span> = (0..self.data.slides.len())
            .map(|i| {
                if i == self.current_slide {
                    Span::styled("● ", Style::default().fg(palette.accent.fg.unwrap_or(Color::Cyan)))
                } else {
                    Span::styled("○ ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
    }

    fn render_notes(&self, frame: &mut Frame, area: Rect) {
        let notes = self
            .current_content()
            .map(|s| s.speaker_notes.as_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("No notes for this slide.");
        frame.render_widget(
            Paragraph::new(notes.to_string())
                .block(Block::default().title(" Speaker Notes ").borders(Borders::ALL))
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}
