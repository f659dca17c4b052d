//! Tone → visual style table shared by the preview and the exporter.

use crate::types::Tone;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_u32(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Uppercase `RRGGBB`, the form `a:srgbClr` expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in 0..=1, good enough to tell light from dark.
    pub fn luminance(&self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

/// Full-width bar drawn across the top of every content slide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderBar {
    /// Height in inches.
    pub height: f64,
    pub color: Rgb,
}

/// Decoration on the title slide only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleDecoration {
    None,
    /// Accent panel over the left 40% of the slide, mostly transparent.
    SidePanel { transparency: u8 },
    /// Solid accent band along the bottom edge.
    BottomBand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub tone: Tone,
    pub background: Rgb,
    pub title_color: Rgb,
    pub subtitle_color: Rgb,
    pub accent_color: Rgb,
    pub body_color: Rgb,
    pub footer_color: Rgb,
    pub font_face: &'static str,
    pub header_bar: Option<HeaderBar>,
    pub title_decoration: TitleDecoration,
    /// Accent rule under each content slide title.
    pub title_rule: bool,
}

static PROFESSIONAL: Theme = Theme {
    tone: Tone::Professional,
    background: Rgb::from_u32(0xF8FAFC),
    title_color: Rgb::from_u32(0x0F172A),
    subtitle_color: Rgb::from_u32(0x475569),
    accent_color: Rgb::from_u32(0x2563EB),
    body_color: Rgb::from_u32(0x334155),
    footer_color: Rgb::from_u32(0x94A3B8),
    font_face: "Arial",
    header_bar: None,
    title_decoration: TitleDecoration::BottomBand,
    title_rule: true,
};

static ACADEMIC: Theme = Theme {
    tone: Tone::Academic,
    background: Rgb::from_u32(0xFFFFFF),
    title_color: Rgb::from_u32(0x000000),
    subtitle_color: Rgb::from_u32(0x333333),
    accent_color: Rgb::from_u32(0x991B1B),
    body_color: Rgb::from_u32(0x1F2937),
    footer_color: Rgb::from_u32(0x6B7280),
    font_face: "Times New Roman",
    header_bar: Some(HeaderBar {
        height: 0.15,
        color: Rgb::from_u32(0x991B1B),
    }),
    title_decoration: TitleDecoration::None,
    title_rule: false,
};

static CREATIVE: Theme = Theme {
    tone: Tone::Creative,
    background: Rgb::from_u32(0x111827),
    title_color: Rgb::from_u32(0xF9FAFB),
    subtitle_color: Rgb::from_u32(0xD1D5DB),
    accent_color: Rgb::from_u32(0x8B5CF6),
    body_color: Rgb::from_u32(0xE5E7EB),
    footer_color: Rgb::from_u32(0x6B7280),
    font_face: "Verdana",
    header_bar: None,
    title_decoration: TitleDecoration::SidePanel { transparency: 80 },
    title_rule: true,
};

static PERSUASIVE: Theme = Theme {
    tone: Tone::Persuasive,
    background: Rgb::from_u32(0xFFFFFF),
    title_color: Rgb::from_u32(0x111827),
    subtitle_color: Rgb::from_u32(0x374151),
    accent_color: Rgb::from_u32(0xDC2626),
    body_color: Rgb::from_u32(0x000000),
    footer_color: Rgb::from_u32(0x9CA3AF),
    font_face: "Impact",
    header_bar: None,
    title_decoration: TitleDecoration::None,
    title_rule: true,
};

static SIMPLE: Theme = Theme {
    tone: Tone::Simple,
    background: Rgb::from_u32(0xFFFFFF),
    title_color: Rgb::from_u32(0x171717),
    subtitle_color: Rgb::from_u32(0x525252),
    accent_color: Rgb::from_u32(0x171717),
    body_color: Rgb::from_u32(0x262626),
    footer_color: Rgb::from_u32(0xA3A3A3),
    font_face: "Helvetica",
    header_bar: None,
    title_decoration: TitleDecoration::None,
    title_rule: true,
};

impl Theme {
    pub fn for_tone(tone: Tone) -> &'static Theme {
        match tone {
            Tone::Professional => &PROFESSIONAL,
            Tone::Academic => &ACADEMIC,
            Tone::Creative => &CREATIVE,
            Tone::Persuasive => &PERSUASIVE,
            Tone::Simple => &SIMPLE,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.background.luminance() < 0.5
    }

    pub fn is_serif(&self) -> bool {
        self.font_face == "Times New Roman"
    }
}
