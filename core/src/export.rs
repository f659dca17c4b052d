//! Deck to `.pptx` export.
//!
//! Coordinates are inches on a 10 x 5.625 (16:9) slide. The content area
//! stops above the citation line (y 4.8) and the footer (y 5.2).

use futures::future::join_all;
use slidegen_common::{pptx_filename, PresentationConfig, PresentationData, SlideContent, Theme, TitleDecoration};
use slidegen_pptx::{Align, Frame, Presentation, Slide, TextStyle, VerticalAlign};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ExportError, Result};
use crate::image::ImageSource;

const SLIDE_W: f64 = 10.0;
const SLIDE_H: f64 = 5.625;

const CONTENT_TOP: f64 = 1.5;
const CONTENT_H: f64 = 3.2;
const TEXT_W_FULL: f64 = 9.0;
const TEXT_W_WITH_IMAGE: f64 = 5.5;
const IMAGE_X: f64 = 6.2;
const IMAGE_W: f64 = 3.3;

pub const DEFAULT_TITLE_NOTES: &str = "Welcome to the presentation.";

pub struct Exporter {
    output_dir: PathBuf,
    images: Arc<dyn ImageSource + Send + Sync>,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>, images: Arc<dyn ImageSource + Send + Sync>) -> Self {
        Self {
            output_dir: output_dir.into(),
            images,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where `export` will write a deck with this title.
    pub fn target_path(&self, data: &PresentationData) -> PathBuf {
        self.output_dir.join(pptx_filename(&data.title))
    }

    /// Build and write the deck, returning the written path.
    pub async fn export(&self, data: &PresentationData, config: &PresentationConfig) -> Result<PathBuf> {
        let pres = self.build(data, config).await?;
        let path = self.target_path(data);

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let target = path.clone();
        tokio::task::spawn_blocking(move || pres.save(&target))
            .await
            .map_err(|e| ExportError::TaskFailed { reason: e.to_string() })?
            .map_err(ExportError::from)?;

        info!("exported {} slides to {}", data.slides.len() + 1, path.display());
        Ok(path)
    }

    /// Lay the deck out without touching the filesystem.
    pub async fn build(&self, data: &PresentationData, config: &PresentationConfig) -> Result<Presentation> {
        if data.slides.is_empty() {
            return Err(ExportError::NoSlides.into());
        }
        let theme = Theme::for_tone(config.tone);

        let mut pres = Presentation::new();
        pres.set_title(&data.title)
            .set_subject(&config.topic)
            .set_theme(theme.font_face, &theme.accent_color.hex());

        add_title_slide(pres.add_slide(), data, theme);

        // downloads overlap; slides still come out in deck order
        let pictures = if config.include_images {
            join_all(
                data.slides
                    .iter()
                    .map(|content| self.fetch_image(&content.image_description)),
            )
            .await
        } else {
            vec![None; data.slides.len()]
        };

        for ((index, content), picture) in data.slides.iter().enumerate().zip(pictures) {
            add_content_slide(
                pres.add_slide(),
                index + 1,
                content,
                &data.title,
                config,
                theme,
                picture,
            );
        }
        Ok(pres)
    }

    async fn fetch_image(&self, description: &str) -> Option<Vec<u8>> {
        if description.trim().is_empty() {
            return None;
        }
        match self.images.fetch(description).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("image for '{description}' unavailable, using placeholder: {e}");
                None
            }
        }
    }
}

fn add_title_slide(slide: &mut Slide, data: &PresentationData, theme: &Theme) {
    slide.set_background(&theme.background.hex());

    match theme.title_decoration {
        TitleDecoration::SidePanel { transparency } => {
            slide.add_rectangle(
                Frame::inches(0.0, 0.0, SLIDE_W * 0.4, SLIDE_H),
                &theme.accent_color.hex(),
                transparency,
            );
        }
        TitleDecoration::BottomBand => {
            slide.add_rectangle(
                Frame::inches(0.0, SLIDE_H - 0.5, SLIDE_W, 0.5),
                &theme.accent_color.hex(),
                0,
            );
        }
        TitleDecoration::None => {}
    }

    slide.add_text(
        &data.title,
        Frame::inches(0.5, 2.0, 9.0, 1.5),
        TextStyle::new(48.0)
            .bold()
            .font(theme.font_face)
            .color(&theme.title_color.hex())
            .align(Align::Center),
    );
    slide.add_text(
        &data.subtitle,
        Frame::inches(1.0, 3.5, 8.0, 1.0),
        TextStyle::new(24.0)
            .font(theme.font_face)
            .color(&theme.subtitle_color.hex())
            .align(Align::Center),
    );

    let notes = data
        .slides
        .first()
        .map(|s| s.speaker_notes.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_TITLE_NOTES);
    slide.set_notes(notes);
}

fn add_content_slide(
    slide: &mut Slide,
    number: usize,
    content: &SlideContent,
    deck_title: &str,
    config: &PresentationConfig,
    theme: &Theme,
    picture: Option<Vec<u8>>,
) {
    slide.set_background(&theme.background.hex());

    if let Some(bar) = theme.header_bar {
        slide.add_rectangle(Frame::inches(0.0, 0.0, SLIDE_W, bar.height), &bar.color.hex(), 0);
    }

    slide.add_text(
        &content.title,
        Frame::inches(0.5, 0.4, 9.0, 0.8),
        TextStyle::new(32.0)
            .bold()
            .font(theme.font_face)
            .color(&theme.title_color.hex()),
    );

    if theme.title_rule {
        slide.add_line(Frame::inches(0.5, 1.3, 9.0, 0.0), &theme.accent_color.hex(), 2.0);
    }

    let text_w = if config.include_images {
        let frame = Frame::inches(IMAGE_X, CONTENT_TOP, IMAGE_W, CONTENT_H);
        let placed = match picture {
            Some(bytes) => slide
                .add_picture_contain(bytes, frame, &content.image_description)
                .is_some(),
            None => false,
        };
        if !placed {
            add_image_placeholder(slide, frame, &content.image_description, theme);
        }
        TEXT_W_WITH_IMAGE
    } else {
        TEXT_W_FULL
    };

    slide.add_paragraphs(
        content.bullet_points.clone(),
        Frame::inches(0.5, CONTENT_TOP, text_w, CONTENT_H),
        TextStyle::new(18.0)
            .font(theme.font_face)
            .color(&theme.body_color.hex())
            .bullets(&theme.accent_color.hex())
            .line_spacing(32.0)
            .vertical_align(VerticalAlign::Top),
    );

    if config.include_citations {
        if let Some(line) = content.citation_line() {
            slide.add_text(
                &line,
                Frame::inches(0.5, 4.8, 9.0, 0.4),
                TextStyle::new(10.0)
                    .italic()
                    .font(theme.font_face)
                    .color(&theme.footer_color.hex()),
            );
        }
    }

    if config.include_speaker_notes && !content.speaker_notes.trim().is_empty() {
        slide.set_notes(&content.speaker_notes);
    }

    slide.add_text(
        &format!("{number} | {deck_title}"),
        Frame::inches(0.5, 5.2, 9.0, 0.3),
        TextStyle::new(10.0)
            .font(theme.font_face)
            .color(&theme.footer_color.hex())
            .align(Align::Right),
    );
}

fn add_image_placeholder(slide: &mut Slide, frame: Frame, description: &str, theme: &Theme) {
    slide.add_rectangle(frame, &theme.accent_color.hex(), 85);
    slide.add_text(
        description,
        frame,
        TextStyle::new(12.0)
            .italic()
            .font(theme.font_face)
            .color(&theme.body_color.hex())
            .align(Align::Center)
            .vertical_align(VerticalAlign::Middle),
    );
}
