//! OPC package writing: ZIP parts plus `[Content_Types].xml`.

use crate::error::Result;
use crate::xml::{escape_xml, XML_DECL};
use std::io::{Seek, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

pub(crate) const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
pub(crate) const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
pub(crate) const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
pub(crate) const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
pub(crate) const CT_NOTES_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
pub(crate) const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
pub(crate) const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
pub(crate) const CT_PRES_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
pub(crate) const CT_VIEW_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
pub(crate) const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
pub(crate) const CT_CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
pub(crate) const CT_EXTENDED_PROPS: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_EXTENDED_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(crate) const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(crate) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub(crate) const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
pub(crate) const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
pub(crate) const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const REL_PRES_PROPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
pub(crate) const REL_VIEW_PROPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
pub(crate) const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
pub(crate) const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// One entry of a `.rels` part.
#[derive(Debug, Clone)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

impl Relationship {
    pub fn new(id: impl Into<String>, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
        }
    }
}

pub(crate) fn relationships_xml(rels: &[Relationship]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_PKG_RELS}">"#));
    for rel in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape_xml(&rel.id),
            rel.rel_type,
            escape_xml(&rel.target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Streams parts into a ZIP archive and records content type overrides
/// so `[Content_Types].xml` can be written last.
pub(crate) struct PackageWriter<W: Write + Seek> {
    zip_writer: ZipWriter<W>,
    defaults: Vec<(&'static str, &'static str)>,
    overrides: Vec<(String, &'static str)>,
}

impl<W: Write + Seek> PackageWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip_writer: ZipWriter::new(writer),
            defaults: vec![("rels", CT_RELS), ("xml", "application/xml")],
            overrides: Vec::new(),
        }
    }

    /// Register a default content type for an extension, once.
    pub fn add_default(&mut self, extension: &'static str, content_type: &'static str) {
        if !self.defaults.iter().any(|(ext, _)| *ext == extension) {
            self.defaults.push((extension, content_type));
        }
    }

    /// Write a part whose content type is covered by an extension default.
    pub fn add_file(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.zip_writer.start_file(path, options)?;
        self.zip_writer.write_all(content)?;
        Ok(())
    }

    /// Write a part and register an override for it.
    pub fn add_part(&mut self, path: &str, content_type: &'static str, content: &[u8]) -> Result<()> {
        self.overrides.push((format!("/{path}"), content_type));
        self.add_file(path, content)
    }

    pub fn add_rels(&mut self, path: &str, rels: &[Relationship]) -> Result<()> {
        self.add_file(path, relationships_xml(rels).as_bytes())
    }

    fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.overrides.len() * 160);
        xml.push_str(XML_DECL);
        xml.push_str(&format!(r#"<Types xmlns="{NS_CONTENT_TYPES}">"#));
        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(r#"<Default Extension="{ext}" ContentType="{ct}"/>"#));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{ct}"/>"#,
                escape_xml(part)
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Write `[Content_Types].xml` and close the archive.
    pub fn finish(mut self) -> Result<W> {
        let content_types = self.content_types_xml();
        self.add_file("[Content_Types].xml", content_types.as_bytes())?;
        Ok(self.zip_writer.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn test_content_types_written_last() {
        let mut writer = PackageWriter::new(Cursor::new(Vec::new()));
        writer.add_default("png", "image/png");
        writer.add_default("png", "image/png");
        writer
            .add_part("ppt/presentation.xml", CT_PRESENTATION, b"<p:presentation/>")
            .unwrap();
        let cursor = writer.finish().unwrap();

        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        let mut types = String::new();
        archive
            .by_name("[Content_Types].xml")
            .unwrap()
            .read_to_string(&mut types)
            .unwrap();
        assert_eq!(types.matches(r#"Extension="png""#).count(), 1);
        assert!(types.contains(r#"<Override PartName="/ppt/presentation.xml""#));
    }

    #[test]
    fn test_relationships_xml() {
        let xml = relationships_xml(&[Relationship::new("rId1", REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")]);
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains(r#"Target="../slideLayouts/slideLayout1.xml""#));
    }
}
