//! Shapes placed on a slide and their DrawingML serialisation.

use crate::error::Result;
use crate::media::ImageFormat;
use crate::units::{points, Frame};
use crate::xml::escape_xml;
use std::fmt::Write as FmtWrite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(&self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlign {
    fn as_attr(&self) -> &'static str {
        match self {
            VerticalAlign::Top => "t",
            VerticalAlign::Middle => "ctr",
            VerticalAlign::Bottom => "b",
        }
    }
}

/// Run and paragraph formatting applied to every paragraph of a text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_face: Option<String>,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    /// `RRGGBB`
    pub color: Option<String>,
    pub align: Align,
    pub vertical_align: VerticalAlign,
    /// Bullet glyph color; `None` means no bullets.
    pub bullet_color: Option<String>,
    /// Exact line spacing in points.
    pub line_spacing: Option<f64>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_face: None,
            size: 18.0,
            bold: false,
            italic: false,
            color: None,
            align: Align::Left,
            vertical_align: VerticalAlign::Top,
            bullet_color: None,
            line_spacing: None,
        }
    }
}

impl TextStyle {
    pub fn new(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn font(mut self, font: &str) -> Self {
        self.font_face = Some(font.to_string());
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn vertical_align(mut self, vertical_align: VerticalAlign) -> Self {
        self.vertical_align = vertical_align;
        self
    }

    pub fn bullets(mut self, color: &str) -> Self {
        self.bullet_color = Some(color.to_string());
        self
    }

    pub fn line_spacing(mut self, pts: f64) -> Self {
        self.line_spacing = Some(pts);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text {
        frame: Frame,
        paragraphs: Vec<String>,
        style: TextStyle,
    },
    Rectangle {
        frame: Frame,
        fill: String,
        /// 0 (opaque) to 100 (invisible).
        transparency: u8,
    },
    Line {
        frame: Frame,
        color: String,
        width: f64,
    },
    Picture {
        frame: Frame,
        data: Vec<u8>,
        format: ImageFormat,
        description: String,
    },
}

impl Shape {
    pub fn frame(&self) -> Frame {
        match self {
            Shape::Text { frame, .. }
            | Shape::Rectangle { frame, .. }
            | Shape::Line { frame, .. }
            | Shape::Picture { frame, .. } => *frame,
        }
    }

    /// Write this shape's XML. `image_rel_id` is required for pictures.
    pub(crate) fn to_xml(&self, xml: &mut String, shape_id: u32, image_rel_id: Option<&str>) -> Result<()> {
        match self {
            Shape::Text {
                frame,
                paragraphs,
                style,
            } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{shape_id}" name="Text {shape_id}"/>"#)?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);
                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                write!(
                    xml,
                    r#"<a:bodyPr wrap="square" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr>"#,
                    style.vertical_align.as_attr()
                )?;
                xml.push_str("<a:lstStyle/>");
                if paragraphs.is_empty() {
                    xml.push_str("<a:p><a:endParaRPr lang=\"en-US\" dirty=\"0\"/></a:p>");
                }
                for text in paragraphs {
                    write_paragraph(xml, text, style)?;
                }
                xml.push_str("</p:txBody></p:sp>");
            }
            Shape::Rectangle {
                frame,
                fill,
                transparency,
            } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(xml, r#"<p:cNvPr id="{shape_id}" name="Rectangle {shape_id}"/>"#)?;
                xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");
                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:solidFill>");
                if *transparency > 0 {
                    let alpha = (100 - (*transparency).min(100) as u32) * 1000;
                    write!(
                        xml,
                        r#"<a:srgbClr val="{}"><a:alpha val="{alpha}"/></a:srgbClr>"#,
                        escape_xml(fill)
                    )?;
                } else {
                    write!(xml, r#"<a:srgbClr val="{}"/>"#, escape_xml(fill))?;
                }
                xml.push_str("</a:solidFill><a:ln><a:noFill/></a:ln>");
                xml.push_str("</p:spPr></p:sp>");
            }
            Shape::Line { frame, color, width } => {
                xml.push_str("<p:cxnSp><p:nvCxnSpPr>");
                write!(xml, r#"<p:cNvPr id="{shape_id}" name="Line {shape_id}"/>"#)?;
                xml.push_str("<p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>");
                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="line"><a:avLst/></a:prstGeom>"#);
                write!(
                    xml,
                    r#"<a:ln w="{}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:ln>"#,
                    points(*width),
                    escape_xml(color)
                )?;
                xml.push_str("</p:spPr></p:cxnSp>");
            }
            Shape::Picture {
                frame, description, ..
            } => {
                xml.push_str("<p:pic><p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{shape_id}" name="Picture {shape_id}" descr="{}"/>"#,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
                xml.push_str("<p:blipFill>");
                let rid = image_rel_id.unwrap_or("rIdImagePlaceholder");
                write!(xml, r#"<a:blip r:embed="{rid}"/>"#)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");
                xml.push_str("<p:spPr>");
                write_xfrm(xml, frame)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr></p:pic>");
            }
        }
        Ok(())
    }
}

fn write_xfrm(xml: &mut String, frame: &Frame) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.width, frame.height
    )?;
    Ok(())
}

fn write_paragraph(xml: &mut String, text: &str, style: &TextStyle) -> Result<()> {
    xml.push_str("<a:p>");
    if style.bullet_color.is_some() {
        write!(
            xml,
            r#"<a:pPr marL="285750" indent="-285750" algn="{}">"#,
            style.align.as_attr()
        )?;
    } else {
        write!(xml, r#"<a:pPr algn="{}">"#, style.align.as_attr())?;
    }
    if let Some(spacing) = style.line_spacing {
        write!(
            xml,
            r#"<a:lnSpc><a:spcPts val="{}"/></a:lnSpc>"#,
            (spacing * 100.0).round() as i64
        )?;
    }
    match &style.bullet_color {
        Some(color) => {
            write!(
                xml,
                r#"<a:buClr><a:srgbClr val="{}"/></a:buClr><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
                escape_xml(color)
            )?;
        }
        None => xml.push_str("<a:buNone/>"),
    }
    xml.push_str("</a:pPr>");

    xml.push_str("<a:r>");
    write!(
        xml,
        r#"<a:rPr lang="en-US" sz="{}""#,
        (style.size * 100.0).round() as i64
    )?;
    if style.bold {
        xml.push_str(r#" b="1""#);
    }
    if style.italic {
        xml.push_str(r#" i="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    if let Some(ref color) = style.color {
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            escape_xml(color)
        )?;
    }
    if let Some(ref font) = style.font_face {
        let font = escape_xml(font);
        write!(xml, r#"<a:latin typeface="{font}"/><a:cs typeface="{font}"/>"#)?;
    }
    xml.push_str("</a:rPr>");
    write!(xml, "<a:t>{}</a:t>", escape_xml(text))?;
    xml.push_str("</a:r></a:p>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(shape: &Shape, rid: Option<&str>) -> String {
        let mut xml = String::new();
        shape.to_xml(&mut xml, 7, rid).unwrap();
        xml
    }

    #[test]
    fn test_text_box_with_bullets() {
        let shape = Shape::Text {
            frame: Frame::new(1, 2, 3, 4),
            paragraphs: vec!["First & best".into(), "Second".into()],
            style: TextStyle::new(18.0)
                .font("Verdana")
                .color("E5E7EB")
                .bullets("8B5CF6")
                .line_spacing(32.0),
        };
        let xml = render(&shape, None);
        assert!(xml.contains(r#"<p:cNvPr id="7" name="Text 7"/>"#));
        assert!(xml.contains(r#"<a:off x="1" y="2"/><a:ext cx="3" cy="4"/>"#));
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains("First &amp; best"));
        assert!(xml.contains(r#"<a:buClr><a:srgbClr val="8B5CF6"/></a:buClr>"#));
        assert!(xml.contains(r#"<a:spcPts val="3200"/>"#));
        assert!(xml.contains(r#"sz="1800""#));
        assert!(xml.contains(r#"<a:latin typeface="Verdana"/>"#));
        assert!(xml.contains(r#"anchor="t""#));
    }

    #[test]
    fn test_plain_text_has_no_bullets() {
        let shape = Shape::Text {
            frame: Frame::new(0, 0, 1, 1),
            paragraphs: vec!["Title".into()],
            style: TextStyle::new(48.0).bold().italic().align(Align::Center),
        };
        let xml = render(&shape, None);
        assert!(xml.contains("<a:buNone/>"));
        assert!(xml.contains(r#"algn="ctr""#));
        assert!(xml.contains(r#" b="1""#));
        assert!(xml.contains(r#" i="1""#));
        assert!(!xml.contains("buChar"));
    }

    #[test]
    fn test_transparent_rectangle() {
        let shape = Shape::Rectangle {
            frame: Frame::new(0, 0, 10, 10),
            fill: "8B5CF6".into(),
            transparency: 80,
        };
        let xml = render(&shape, None);
        assert!(xml.contains(r#"<a:srgbClr val="8B5CF6"><a:alpha val="20000"/></a:srgbClr>"#));

        let opaque = Shape::Rectangle {
            frame: Frame::new(0, 0, 10, 10),
            fill: "2563EB".into(),
            transparency: 0,
        };
        assert!(render(&opaque, None).contains(r#"<a:srgbClr val="2563EB"/>"#));
    }

    #[test]
    fn test_line_width_in_emu() {
        let shape = Shape::Line {
            frame: Frame::new(0, 0, 100, 0),
            color: "2563EB".into(),
            width: 2.0,
        };
        let xml = render(&shape, None);
        assert!(xml.starts_with("<p:cxnSp>"));
        assert!(xml.contains(r#"<a:ln w="25400">"#));
    }

    #[test]
    fn test_picture_uses_relationship() {
        let shape = Shape::Picture {
            frame: Frame::new(0, 0, 10, 10),
            data: vec![],
            format: ImageFormat::Png,
            description: "a \"quoted\" city".into(),
        };
        let xml = render(&shape, Some("rId3"));
        assert!(xml.contains(r#"r:embed="rId3""#));
        assert!(xml.contains("descr=\"a &quot;quoted&quot; city\""));
    }
}
