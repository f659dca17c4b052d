use crate::error::Result;
use crate::media::{image_dimensions, ImageFormat};
use crate::shape::{Shape, TextStyle};
use crate::units::Frame;
use crate::xml::{escape_xml, pml_namespaces, SP_TREE_HEADER, XML_DECL};
use std::fmt::Write as FmtWrite;

/// A slide being assembled. Shapes are drawn in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    background: Option<String>,
    shapes: Vec<Shape>,
    notes: Option<String>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid background color, `RRGGBB`.
    pub fn set_background(&mut self, color: &str) -> &mut Self {
        self.background = Some(color.to_string());
        self
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn set_notes(&mut self, notes: &str) -> &mut Self {
        self.notes = Some(notes.to_string());
        self
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn add_text(&mut self, text: &str, frame: Frame, style: TextStyle) -> &mut Self {
        self.add_paragraphs(vec![text.to_string()], frame, style)
    }

    pub fn add_paragraphs(&mut self, paragraphs: Vec<String>, frame: Frame, style: TextStyle) -> &mut Self {
        self.shapes.push(Shape::Text {
            frame,
            paragraphs,
            style,
        });
        self
    }

    pub fn add_rectangle(&mut self, frame: Frame, fill: &str, transparency: u8) -> &mut Self {
        self.shapes.push(Shape::Rectangle {
            frame,
            fill: fill.to_string(),
            transparency,
        });
        self
    }

    pub fn add_line(&mut self, frame: Frame, color: &str, width: f64) -> &mut Self {
        self.shapes.push(Shape::Line {
            frame,
            color: color.to_string(),
            width,
        });
        self
    }

    /// Add a picture scaled to fit inside `frame` keeping its aspect ratio.
    ///
    /// Returns `None` when the bytes are not a PNG, JPEG or GIF image.
    pub fn add_picture_contain(&mut self, data: Vec<u8>, frame: Frame, description: &str) -> Option<&mut Self> {
        let format = ImageFormat::detect(&data)?;
        let frame = match image_dimensions(&data) {
            Some((w, h)) => frame.fit_contain(w, h),
            None => frame,
        };
        self.shapes.push(Shape::Picture {
            frame,
            data,
            format,
            description: description.to_string(),
        });
        Some(self)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub(crate) fn images(&self) -> impl Iterator<Item = (&[u8], ImageFormat)> + '_ {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Picture { data, format, .. } => Some((data.as_slice(), *format)),
            _ => None,
        })
    }

    /// Slide XML. `image_rel_ids` holds one id per picture, in shape order.
    pub(crate) fn to_xml(&self, image_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECL);
        write!(xml, "<p:sld {}>", pml_namespaces())?;
        xml.push_str("<p:cSld>");

        // p:bg must precede p:spTree
        if let Some(ref color) = self.background {
            write!(
                xml,
                r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
                escape_xml(color)
            )?;
        }

        xml.push_str("<p:spTree>");
        xml.push_str(SP_TREE_HEADER);

        let mut pictures = image_rel_ids.iter();
        for (idx, shape) in self.shapes.iter().enumerate() {
            let rel_id = match shape {
                Shape::Picture { .. } => pictures.next().map(String::as_str),
                _ => None,
            };
            shape.to_xml(&mut xml, idx as u32 + 2, rel_id)?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }

    /// Notes slide XML, `None` when the slide has no notes.
    pub(crate) fn notes_xml(&self) -> Option<Result<String>> {
        let notes = self.notes.as_deref()?;
        Some(build_notes_xml(notes))
    }
}

fn build_notes_xml(notes: &str) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    write!(xml, "<p:notes {}>", pml_namespaces())?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(SP_TREE_HEADER);

    xml.push_str("<p:sp><p:nvSpPr>");
    xml.push_str(r#"<p:cNvPr id="2" name="Notes Placeholder 1"/>"#);
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    xml.push_str(r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr>"#);
    xml.push_str("</p:nvSpPr><p:spPr/>");
    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/>");
    for line in notes.lines() {
        write!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            escape_xml(line)
        )?;
    }
    if notes.lines().next().is_none() {
        xml.push_str("<a:p><a:endParaRPr lang=\"en-US\" dirty=\"0\"/></a:p>");
    }
    xml.push_str("</p:txBody></p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::tests::tiny_png;

    #[test]
    fn test_background_precedes_shapes() {
        let mut slide = Slide::new();
        slide
            .set_background("111827")
            .add_text("Hello", Frame::new(0, 0, 10, 10), TextStyle::new(32.0));
        let xml = slide.to_xml(&[]).unwrap();
        let bg = xml.find("<p:bg>").unwrap();
        let tree = xml.find("<p:spTree>").unwrap();
        assert!(bg < tree);
        assert!(xml.contains(r#"<a:srgbClr val="111827"/>"#));
        // group shape is id 1, first shape id 2
        assert!(xml.contains(r#"<p:cNvPr id="2" name="Text 2"/>"#));
    }

    #[test]
    fn test_pictures_take_rel_ids_in_order() {
        let mut slide = Slide::new();
        slide.add_rectangle(Frame::new(0, 0, 1, 1), "FFFFFF", 0);
        assert!(slide
            .add_picture_contain(tiny_png(), Frame::new(0, 0, 200, 200), "one")
            .is_some());
        assert!(slide
            .add_picture_contain(tiny_png(), Frame::new(0, 0, 200, 200), "two")
            .is_some());
        let xml = slide
            .to_xml(&["rId2".to_string(), "rId3".to_string()])
            .unwrap();
        let one = xml.find(r#"r:embed="rId2""#).unwrap();
        let two = xml.find(r#"r:embed="rId3""#).unwrap();
        assert!(one < two);
        assert_eq!(slide.images().count(), 2);
    }

    #[test]
    fn test_picture_is_fitted() {
        let mut slide = Slide::new();
        slide.add_picture_contain(tiny_png(), Frame::new(0, 0, 200, 200), "wide");
        // 2x1 image into a square: full width, half height, vertically centred
        assert_eq!(slide.shapes()[0].frame(), Frame::new(0, 50, 200, 100));
    }

    #[test]
    fn test_rejects_unknown_image_bytes() {
        let mut slide = Slide::new();
        assert!(slide
            .add_picture_contain(b"<html>nope</html>".to_vec(), Frame::new(0, 0, 1, 1), "x")
            .is_none());
        assert_eq!(slide.shape_count(), 0);
    }

    #[test]
    fn test_notes_xml() {
        let mut slide = Slide::new();
        assert!(slide.notes_xml().is_none());
        slide.set_notes("Line one\nLine <two>");
        let xml = slide.notes_xml().unwrap().unwrap();
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
        assert!(xml.contains("<a:t>Line one</a:t>"));
        assert!(xml.contains("<a:t>Line &lt;two&gt;</a:t>"));
    }
}
