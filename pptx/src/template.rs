//! Fixed package parts: master, layout, notes master, theme and properties.

use crate::xml::{escape_xml, pml_namespaces, NS_A, SP_TREE_HEADER, XML_DECL};

const CLR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

pub fn slide_master_xml() -> String {
    format!(
        concat!(
            "{decl}<p:sldMaster {ns}>",
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
            "<p:spTree>{tree}</p:spTree></p:cSld>",
            "<p:clrMap {clr}/>",
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "</p:sldMaster>"
        ),
        decl = XML_DECL,
        ns = pml_namespaces(),
        tree = SP_TREE_HEADER,
        clr = CLR_MAP,
    )
}

pub fn blank_layout_xml() -> String {
    format!(
        concat!(
            r#"{decl}<p:sldLayout {ns} type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{tree}</p:spTree></p:cSld>"#,
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>",
            "</p:sldLayout>"
        ),
        decl = XML_DECL,
        ns = pml_namespaces(),
        tree = SP_TREE_HEADER,
    )
}

pub fn notes_master_xml() -> String {
    format!(
        concat!(
            "{decl}<p:notesMaster {ns}>",
            "<p:cSld><p:spTree>{tree}",
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes Placeholder 1"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="685800" y="4400550"/><a:ext cx="5486400" cy="3600450"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
            r#"<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:endParaRPr lang="en-US"/></a:p></p:txBody></p:sp>"#,
            "</p:spTree></p:cSld>",
            "<p:clrMap {clr}/>",
            "</p:notesMaster>"
        ),
        decl = XML_DECL,
        ns = pml_namespaces(),
        tree = SP_TREE_HEADER,
        clr = CLR_MAP,
    )
}

/// Office theme whose major/minor fonts are `font` and whose first accent
/// is `accent` (`RRGGBB`).
pub fn theme_xml(name: &str, font: &str, accent: &str) -> String {
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    let name = escape_xml(name);
    let font = escape_xml(font);
    let accent = escape_xml(accent);

    let mut xml = String::with_capacity(3072);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<a:theme xmlns:a="{NS_A}" name="{name}">"#));
    xml.push_str("<a:themeElements>");
    xml.push_str(&format!(r#"<a:clrScheme name="{name}">"#));
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    xml.push_str(r#"<a:dk2><a:srgbClr val="44546A"/></a:dk2>"#);
    xml.push_str(r#"<a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>"#);
    xml.push_str(&format!(r#"<a:accent1><a:srgbClr val="{accent}"/></a:accent1>"#));
    xml.push_str(r#"<a:accent2><a:srgbClr val="ED7D31"/></a:accent2>"#);
    xml.push_str(r#"<a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>"#);
    xml.push_str(r#"<a:accent4><a:srgbClr val="FFC000"/></a:accent4>"#);
    xml.push_str(r#"<a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>"#);
    xml.push_str(r#"<a:accent6><a:srgbClr val="70AD47"/></a:accent6>"#);
    xml.push_str(r#"<a:hlink><a:srgbClr val="0563C1"/></a:hlink>"#);
    xml.push_str(r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#);
    xml.push_str("</a:clrScheme>");
    xml.push_str(&format!(r#"<a:fontScheme name="{name}">"#));
    for tag in ["majorFont", "minorFont"] {
        xml.push_str(&format!(
            r#"<a:{tag}><a:latin typeface="{font}"/><a:ea typeface=""/><a:cs typeface=""/></a:{tag}>"#
        ));
    }
    xml.push_str("</a:fontScheme>");
    xml.push_str(&format!(r#"<a:fmtScheme name="{name}">"#));
    xml.push_str(&format!("<a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst>"));
    xml.push_str(&format!("<a:lnStyleLst>{line}{line}{line}</a:lnStyleLst>"));
    xml.push_str(&format!("<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>"));
    xml.push_str(&format!("<a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst>"));
    xml.push_str("</a:fmtScheme>");
    xml.push_str("</a:themeElements>");
    xml.push_str("</a:theme>");
    xml
}

pub fn pres_props_xml() -> String {
    format!("{XML_DECL}<p:presentationPr {}/>", pml_namespaces())
}

pub fn view_props_xml() -> String {
    format!(
        r#"{XML_DECL}<p:viewPr {}><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#,
        pml_namespaces()
    )
}

pub fn table_styles_xml() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_carries_font_and_accent() {
        let xml = theme_xml("Creative", "Verdana", "8B5CF6");
        assert!(xml.contains(r#"<a:majorFont><a:latin typeface="Verdana"/>"#));
        assert!(xml.contains(r#"<a:minorFont><a:latin typeface="Verdana"/>"#));
        assert!(xml.contains(r#"<a:accent1><a:srgbClr val="8B5CF6"/></a:accent1>"#));
        assert_eq!(xml.matches("<a:effectStyle>").count(), 3);
    }

    #[test]
    fn test_master_references_layout() {
        let xml = slide_master_xml();
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#));
        assert!(xml.contains("<p:clrMap bg1=\"lt1\""));
    }

    #[test]
    fn test_table_styles_braces() {
        assert!(table_styles_xml().contains(r#"def="{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}""#));
    }
}
