use crate::error::Result;
use crate::package::*;
use crate::slide::Slide;
use crate::template;
use crate::units::{SLIDE_HEIGHT_16X9, SLIDE_WIDTH_16X9};
use crate::xml::{escape_xml, pml_namespaces, XML_DECL};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tracing::debug;

const FIRST_SLIDE_ID: u32 = 256;
const MASTER_ID: u32 = 2_147_483_648;
/// Fixed presentation-level relationships take rId1..rId6; slides follow.
const FIRST_SLIDE_REL: usize = 7;
const CREATOR: &str = "SlideGen";

/// An in-memory 16:9 presentation that can be written as `.pptx`.
#[derive(Debug, Clone)]
pub struct Presentation {
    title: String,
    subject: Option<String>,
    theme_font: String,
    theme_accent: String,
    slide_width: i64,
    slide_height: i64,
    slides: Vec<Slide>,
    created: DateTime<Utc>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Presentation {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            subject: None,
            theme_font: "Arial".to_string(),
            theme_accent: "4472C4".to_string(),
            slide_width: SLIDE_WIDTH_16X9,
            slide_height: SLIDE_HEIGHT_16X9,
            slides: Vec::new(),
            created: Utc::now(),
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_subject(&mut self, subject: &str) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Font and accent (`RRGGBB`) baked into the package theme.
    pub fn set_theme(&mut self, font: &str, accent: &str) -> &mut Self {
        self.theme_font = font.to_string();
        self.theme_accent = accent.to_string();
        self
    }

    pub fn add_slide(&mut self) -> &mut Slide {
        self.slides.push(Slide::new());
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = self.write_to(BufWriter::new(file))?;
        writer.flush()?;
        debug!("wrote {} slides to {}", self.slides.len(), path.display());
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut pkg = PackageWriter::new(writer);

        pkg.add_rels(
            "_rels/.rels",
            &[
                Relationship::new("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
                Relationship::new("rId2", REL_CORE_PROPS, "docProps/core.xml"),
                Relationship::new("rId3", REL_EXTENDED_PROPS, "docProps/app.xml"),
            ],
        )?;
        pkg.add_part("docProps/core.xml", CT_CORE_PROPS, self.core_props_xml().as_bytes())?;
        pkg.add_part("docProps/app.xml", CT_EXTENDED_PROPS, self.app_props_xml().as_bytes())?;

        pkg.add_part("ppt/presentation.xml", CT_PRESENTATION, self.presentation_xml()?.as_bytes())?;
        pkg.add_rels("ppt/_rels/presentation.xml.rels", &self.presentation_rels())?;

        pkg.add_part(
            "ppt/slideMasters/slideMaster1.xml",
            CT_SLIDE_MASTER,
            template::slide_master_xml().as_bytes(),
        )?;
        pkg.add_rels(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &[
                Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                Relationship::new("rId2", REL_THEME, "../theme/theme1.xml"),
            ],
        )?;
        pkg.add_part(
            "ppt/slideLayouts/slideLayout1.xml",
            CT_SLIDE_LAYOUT,
            template::blank_layout_xml().as_bytes(),
        )?;
        pkg.add_rels(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &[Relationship::new("rId1", REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml")],
        )?;
        pkg.add_part(
            "ppt/notesMasters/notesMaster1.xml",
            CT_NOTES_MASTER,
            template::notes_master_xml().as_bytes(),
        )?;
        pkg.add_rels(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &[Relationship::new("rId1", REL_THEME, "../theme/theme2.xml")],
        )?;

        let theme = template::theme_xml(&self.title_or_default(), &self.theme_font, &self.theme_accent);
        pkg.add_part("ppt/theme/theme1.xml", CT_THEME, theme.as_bytes())?;
        let notes_theme = template::theme_xml("Notes", &self.theme_font, &self.theme_accent);
        pkg.add_part("ppt/theme/theme2.xml", CT_THEME, notes_theme.as_bytes())?;

        pkg.add_part("ppt/presProps.xml", CT_PRES_PROPS, template::pres_props_xml().as_bytes())?;
        pkg.add_part("ppt/viewProps.xml", CT_VIEW_PROPS, template::view_props_xml().as_bytes())?;
        pkg.add_part(
            "ppt/tableStyles.xml",
            CT_TABLE_STYLES,
            template::table_styles_xml().as_bytes(),
        )?;

        let mut media_index = 0usize;
        for (idx, slide) in self.slides.iter().enumerate() {
            let number = idx + 1;
            let mut rels = vec![Relationship::new(
                "rId1",
                REL_SLIDE_LAYOUT,
                "../slideLayouts/slideLayout1.xml",
            )];

            let mut image_rel_ids = Vec::new();
            for (data, format) in slide.images() {
                media_index += 1;
                let name = format!("image{media_index}.{}", format.extension());
                pkg.add_default(format.extension(), format.content_type());
                pkg.add_file(&format!("ppt/media/{name}"), data)?;

                let rel_id = format!("rId{}", rels.len() + 1);
                rels.push(Relationship::new(rel_id.clone(), REL_IMAGE, format!("../media/{name}")));
                image_rel_ids.push(rel_id);
            }

            if let Some(notes) = slide.notes_xml() {
                let notes = notes?;
                let notes_path = format!("ppt/notesSlides/notesSlide{number}.xml");
                pkg.add_part(&notes_path, CT_NOTES_SLIDE, notes.as_bytes())?;
                pkg.add_rels(
                    &format!("ppt/notesSlides/_rels/notesSlide{number}.xml.rels"),
                    &[
                        Relationship::new("rId1", REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
                        Relationship::new("rId2", REL_SLIDE, format!("../slides/slide{number}.xml")),
                    ],
                )?;
                let rel_id = format!("rId{}", rels.len() + 1);
                rels.push(Relationship::new(
                    rel_id,
                    REL_NOTES_SLIDE,
                    format!("../notesSlides/notesSlide{number}.xml"),
                ));
            }

            let xml = slide.to_xml(&image_rel_ids)?;
            pkg.add_part(&format!("ppt/slides/slide{number}.xml"), CT_SLIDE, xml.as_bytes())?;
            pkg.add_rels(&format!("ppt/slides/_rels/slide{number}.xml.rels"), &rels)?;
        }

        pkg.finish()
    }

    fn title_or_default(&self) -> String {
        if self.title.trim().is_empty() {
            "Presentation".to_string()
        } else {
            self.title.clone()
        }
    }

    fn presentation_rels(&self) -> Vec<Relationship> {
        let mut rels = vec![
            Relationship::new("rId1", REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            Relationship::new("rId2", REL_NOTES_MASTER, "notesMasters/notesMaster1.xml"),
            Relationship::new("rId3", REL_THEME, "theme/theme1.xml"),
            Relationship::new("rId4", REL_PRES_PROPS, "presProps.xml"),
            Relationship::new("rId5", REL_VIEW_PROPS, "viewProps.xml"),
            Relationship::new("rId6", REL_TABLE_STYLES, "tableStyles.xml"),
        ];
        for idx in 0..self.slides.len() {
            rels.push(Relationship::new(
                format!("rId{}", FIRST_SLIDE_REL + idx),
                REL_SLIDE,
                format!("slides/slide{}.xml", idx + 1),
            ));
        }
        rels
    }

    fn presentation_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.slides.len() * 64);
        xml.push_str(XML_DECL);
        write!(xml, r#"<p:presentation {} saveSubsetFonts="1">"#, pml_namespaces())?;
        write!(
            xml,
            r#"<p:sldMasterIdLst><p:sldMasterId id="{MASTER_ID}" r:id="rId1"/></p:sldMasterIdLst>"#
        )?;
        xml.push_str(r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId2"/></p:notesMasterIdLst>"#);
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for idx in 0..self.slides.len() {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                    FIRST_SLIDE_ID + idx as u32,
                    FIRST_SLIDE_REL + idx
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }
        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str("<p:defaultTextStyle/>");
        xml.push_str("</p:presentation>");
        Ok(xml)
    }

    fn core_props_xml(&self) -> String {
        let created = self.created.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECL);
        xml.push_str(concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ));
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(&self.title)));
        if let Some(ref subject) = self.subject {
            xml.push_str(&format!("<dc:subject>{}</dc:subject>", escape_xml(subject)));
        }
        xml.push_str(&format!("<dc:creator>{CREATOR}</dc:creator>"));
        xml.push_str(&format!(
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{created}</dcterms:created>"#
        ));
        xml.push_str(&format!(
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{created}</dcterms:modified>"#
        ));
        xml.push_str("</cp:coreProperties>");
        xml
    }

    fn app_props_xml(&self) -> String {
        format!(
            concat!(
                "{}",
                r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
                r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
                "<Application>SlideGen</Application><Slides>{}</Slides><Notes>{}</Notes>",
                "<PresentationFormat>On-screen Show (16:9)</PresentationFormat>",
                "</Properties>"
            ),
            XML_DECL,
            self.slides.len(),
            self.slides.iter().filter(|s| s.notes().is_some()).count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tests::tiny_png;
    use crate::shape::TextStyle;
    use crate::units::Frame;
    use std::io::Read;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
        out
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_empty_presentation_is_valid_package() {
        let pres = Presentation::new();
        let bytes = pres.to_bytes().unwrap();
        let names = part_names(&bytes);
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
        ] {
            assert!(names.iter().any(|n| n == required), "missing {required}");
        }
        let xml = read_part(&bytes, "ppt/presentation.xml");
        assert!(!xml.contains("<p:sldIdLst>"));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
    }

    #[test]
    fn test_slides_notes_and_media() {
        let mut pres = Presentation::new();
        pres.set_title("Solar & Wind").set_theme("Georgia", "B91C1C");
        pres.add_slide()
            .set_background("FFFFFF")
            .add_text("Solar & Wind", Frame::inches(0.5, 2.0, 9.0, 1.5), TextStyle::new(44.0))
            .set_notes("Welcome");
        let second = pres.add_slide();
        second.add_text("Body", Frame::inches(0.5, 0.5, 9.0, 1.0), TextStyle::new(32.0));
        second.add_picture_contain(tiny_png(), Frame::inches(5.5, 1.5, 4.0, 3.0), "panels");

        let bytes = pres.to_bytes().unwrap();

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId7"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId8"/>"#));

        let rels = read_part(&bytes, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId8""#));
        assert!(rels.contains(r#"Target="slides/slide2.xml""#));

        let slide1_rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(slide1_rels.contains("../notesSlides/notesSlide1.xml"));
        let notes = read_part(&bytes, "ppt/notesSlides/notesSlide1.xml");
        assert!(notes.contains("<a:t>Welcome</a:t>"));

        let slide2_rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(slide2_rels.contains(r#"Id="rId2""#));
        assert!(slide2_rels.contains("../media/image1.png"));
        assert!(!slide2_rels.contains("notesSlide"));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(types.contains(r#"PartName="/ppt/notesSlides/notesSlide1.xml""#));
        assert!(!types.contains("notesSlide2"));

        let theme = read_part(&bytes, "ppt/theme/theme1.xml");
        assert!(theme.contains(r#"typeface="Georgia""#));
        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Solar &amp; Wind</dc:title>"));
    }

    #[test]
    fn test_control_chars_never_reach_slide_xml() {
        let mut pres = Presentation::new();
        pres.add_slide()
            .add_text("Bad\u{0B}tab\u{1}", Frame::inches(0.5, 0.5, 9.0, 1.0), TextStyle::new(24.0))
            .set_notes("say\u{7} this");
        let bytes = pres.to_bytes().unwrap();

        for part in ["ppt/slides/slide1.xml", "ppt/notesSlides/notesSlide1.xml"] {
            let xml = read_part(&bytes, part);
            let illegal = xml
                .chars()
                .filter(|c| *c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r'))
                .count();
            assert_eq!(illegal, 0, "{part} carries control characters");
        }
        assert!(read_part(&bytes, "ppt/slides/slide1.xml").contains("Badtab"));
        assert!(read_part(&bytes, "ppt/notesSlides/notesSlide1.xml").contains("say this"));
    }

    #[test]
    fn test_save_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let mut pres = Presentation::new();
        pres.add_slide().add_text("Hi", Frame::inches(1.0, 1.0, 2.0, 1.0), TextStyle::new(20.0));
        pres.save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(part_names(&bytes).iter().any(|n| n == "ppt/slides/slide1.xml"));
    }
}
