use ratatui::style::{Color, Modifier, Style};
use slidegen_common::{Rgb, Theme, Tone};

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Terminal styles derived from a deck theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub title: Style,
    pub subtitle: Style,
    pub body: Style,
    pub accent: Style,
    pub footer: Style,
    /// Border and dot color that stays visible on the slide background.
    pub chrome: Style,
}

impl Palette {
    pub fn for_tone(tone: Tone) -> Self {
        Self::from_theme(Theme::for_tone(tone))
    }

    pub fn from_theme(theme: &Theme) -> Self {
        let background = color(theme.background);
        let base = Style::default().bg(background);

        // terminals have no serif face; italics stand in for it
        let title_modifier = if theme.is_serif() {
            Modifier::BOLD | Modifier::ITALIC
        } else {
            Modifier::BOLD
        };
        let chrome = if theme.is_dark() {
            Color::Rgb(0x37, 0x41, 0x51)
        } else {
            Color::Rgb(0xE5, 0xE7, 0xEB)
        };

        Self {
            background,
            title: base.fg(color(theme.title_color)).add_modifier(title_modifier),
            subtitle: base.fg(color(theme.subtitle_color)),
            body: base.fg(color(theme.body_color)),
            accent: base.fg(color(theme.accent_color)),
            footer: base.fg(color(theme.footer_color)),
            chrome: base.fg(chrome),
        }
    }
}
