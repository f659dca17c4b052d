use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Readiness of the content service, shown on the right of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Ready,
    Offline,
    MissingKey,
}

impl ServiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Ready => "System Ready",
            ServiceStatus::Offline => "Offline Mode",
            ServiceStatus::MissingKey => "API Key Missing",
        }
    }

    fn color(&self) -> Color {
        match self {
            ServiceStatus::Ready => Color::Green,
            ServiceStatus::Offline => Color::Yellow,
            ServiceStatus::MissingKey => Color::Red,
        }
    }
}

pub struct StatusBar<'a> {
    mode: &'a str,
    status: ServiceStatus,
    hints: &'a str,
}

impl<'a> StatusBar<'a> {
    pub fn new(mode: &'a str, status: ServiceStatus, hints: &'a str) -> Self {
        Self { mode, status, hints }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.mode),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("● {}", self.status.label()),
                Style::default().fg(self.status.color()),
            ),
            Span::raw("  |  "),
            Span::styled(self.hints, Style::default().fg(Color::Gray)),
        ]);
        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_mode_status_and_hints() {
        let area = Rect::new(0, 0, 70, 3);
        let mut buf = Buffer::empty(area);
        StatusBar::new("SlideGen AI", ServiceStatus::MissingKey, "Ctrl+G generate").render(area, &mut buf);
        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains(" SlideGen AI "));
        assert!(row.contains("API Key Missing"));
        assert!(row.contains("Ctrl+G generate"));
    }
}
