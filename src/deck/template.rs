//! PresentationML part templates.
//!
//! Static parts (theme, master, blank layout, property stubs) live under
//! `resources/` and are embedded at compile time. Parts that depend on the
//! deck (slide list, canvas size, per-slide picture) are generated here.

use crate::deck::builder::DeckProperties;
use quick_xml::escape::escape;
use std::fmt::Write as _;

pub const THEME_XML: &str = include_str!("../../resources/theme1.xml");
pub const SLIDE_MASTER_XML: &str = include_str!("../../resources/slideMaster1.xml");
pub const SLIDE_LAYOUT_XML: &str = include_str!("../../resources/slideLayout1.xml");
pub const PRES_PROPS_XML: &str = include_str!("../../resources/presProps.xml");
pub const VIEW_PROPS_XML: &str = include_str!("../../resources/viewProps.xml");
pub const TABLE_STYLES_XML: &str = include_str!("../../resources/tableStyles.xml");

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_PML: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// First relationship ID used for slides in `presentation.xml.rels`;
/// rId1–rId5 are the master and the presentation-level property parts.
const FIRST_SLIDE_REL: usize = 6;

/// First `p:sldId` value; PowerPoint requires ids ≥ 256.
const FIRST_SLIDE_ID: usize = 256;

/// Relationship ID of the `n`-th slide (1-based) in `presentation.xml.rels`.
pub fn slide_rel_id(n: usize) -> String {
    format!("rId{}", FIRST_SLIDE_REL + n - 1)
}

fn relationships(rels: &[(String, &str, String)]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, rel_type, target) in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
        );
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn content_types_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(2048 + slide_count * 160);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);

    let overrides = [
        ("/ppt/presentation.xml", "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"),
        ("/ppt/slideMasters/slideMaster1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"),
        ("/ppt/slideLayouts/slideLayout1.xml", "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml"),
        ("/ppt/presProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"),
        ("/ppt/viewProps.xml", "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"),
        ("/ppt/tableStyles.xml", "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml"),
        ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml"),
    ];
    for (part, content_type) in overrides {
        let _ = write!(
            xml,
            r#"<Override PartName="{part}" ContentType="{content_type}"/>"#
        );
    }
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

pub fn root_rels_xml() -> String {
    relationships(&[
        ("rId1".into(), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".into()),
        ("rId2".into(), REL_CORE_PROPS, "docProps/core.xml".into()),
        ("rId3".into(), REL_EXTENDED_PROPS, "docProps/app.xml".into()),
    ])
}

pub fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = vec![
        ("rId1".to_string(), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string()),
        ("rId2".to_string(), REL_PRES_PROPS, "presProps.xml".to_string()),
        ("rId3".to_string(), REL_VIEW_PROPS, "viewProps.xml".to_string()),
        ("rId4".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
        ("rId5".to_string(), REL_TABLE_STYLES, "tableStyles.xml".to_string()),
    ];
    for n in 1..=slide_count {
        rels.push((slide_rel_id(n), REL_SLIDE, format!("slides/slide{n}.xml")));
    }
    relationships(&rels)
}

/// `presentation.xml`: slide list plus the deck-wide slide size.
pub fn presentation_xml(slide_count: usize, width_emu: i64, height_emu: i64) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<p:presentation {NS_PML} saveSubsetFonts="1">"#);
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 1..=slide_count {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                FIRST_SLIDE_ID + n - 1,
                slide_rel_id(n)
            );
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(xml, r#"<p:sldSz cx="{width_emu}" cy="{height_emu}"/>"#);
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

pub fn slide_master_rels_xml() -> String {
    relationships(&[
        ("rId1".into(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".into()),
        ("rId2".into(), REL_THEME, "../theme/theme1.xml".into()),
    ])
}

pub fn slide_layout_rels_xml() -> String {
    relationships(&[(
        "rId1".into(),
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml".into(),
    )])
}

pub fn slide_rels_xml(n: usize) -> String {
    relationships(&[
        ("rId1".into(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".into()),
        ("rId2".into(), REL_IMAGE, format!("../media/image{n}.png")),
    ])
}

/// One full-bleed picture, stretched to fill its extent.
pub fn slide_xml(n: usize, x_emu: i64, y_emu: i64, cx_emu: i64, cy_emu: i64) -> String {
    let mut xml = String::with_capacity(1536);
    xml.push_str(XML_DECL);
    let _ = write!(xml, "<p:sld {NS_PML}>");
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    xml.push_str("<p:pic>");
    xml.push_str("<p:nvPicPr>");
    let _ = write!(xml, r#"<p:cNvPr id="2" name="Page {n}" descr="Page {n}"/>"#);
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    xml.push_str(r#"<a:blip r:embed="rId2"/>"#);
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    let _ = write!(xml, r#"<a:off x="{x_emu}" y="{y_emu}"/>"#);
    let _ = write!(xml, r#"<a:ext cx="{cx_emu}" cy="{cy_emu}"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// Drop characters XML 1.0 cannot carry (C0 controls other than tab, LF
/// and CR; U+FFFE and U+FFFF), then escape markup.
fn xml_text(raw: &str) -> String {
    let legal: String = raw
        .chars()
        .filter(|&ch| match ch {
            '\t' | '\n' | '\r' => true,
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => false,
            _ => true,
        })
        .collect();
    escape(legal.as_str()).into_owned()
}

pub fn core_props_xml(props: &DeckProperties) -> String {
    let mut xml = String::with_capacity(768);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    if let Some(ref title) = props.title {
        let _ = write!(xml, "<dc:title>{}</dc:title>", xml_text(title));
    }
    if let Some(ref subject) = props.subject {
        let _ = write!(xml, "<dc:subject>{}</dc:subject>", xml_text(subject));
    }
    if let Some(ref author) = props.author {
        let author = xml_text(author);
        let _ = write!(xml, "<dc:creator>{author}</dc:creator>");
        let _ = write!(xml, "<cp:lastModifiedBy>{author}</cp:lastModifiedBy>");
    }
    xml.push_str("<cp:revision>1</cp:revision>");
    xml.push_str("</cp:coreProperties>");
    xml
}

pub fn app_props_xml(slide_count: usize) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    let _ = write!(
        xml,
        "<Application>{}</Application>",
        escape(crate::APPLICATION_NAME)
    );
    xml.push_str("<PresentationFormat>Custom</PresentationFormat>");
    let _ = write!(xml, "<Slides>{slide_count}</Slides>");
    xml.push_str("</Properties>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_rel_ids_follow_fixed_parts() {
        assert_eq!(slide_rel_id(1), "rId6");
        assert_eq!(slide_rel_id(3), "rId8");
    }

    #[test]
    fn presentation_lists_slides_in_order() {
        let xml = presentation_xml(3, 7_772_400, 10_058_400);
        let a = xml.find(r#"id="256" r:id="rId6""#).unwrap();
        let b = xml.find(r#"id="257" r:id="rId7""#).unwrap();
        let c = xml.find(r#"id="258" r:id="rId8""#).unwrap();
        assert!(a < b && b < c);
        assert!(xml.contains(r#"<p:sldSz cx="7772400" cy="10058400"/>"#));
    }

    #[test]
    fn empty_presentation_has_no_slide_list() {
        let xml = presentation_xml(0, 914_400, 914_400);
        assert!(!xml.contains("<p:sldIdLst>"));
    }

    #[test]
    fn slide_places_picture_at_origin() {
        let xml = slide_xml(2, 0, 0, 7_772_400, 10_058_400);
        assert!(xml.contains(r#"<a:off x="0" y="0"/><a:ext cx="7772400" cy="10058400"/>"#));
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains("<a:stretch><a:fillRect/></a:stretch>"));
        assert!(xml.contains(r#"name="Page 2""#));
    }

    #[test]
    fn core_props_escape_text() {
        let props = DeckProperties {
            title: Some("Q&A <draft>".into()),
            author: Some("O'Neil".into()),
            subject: None,
        };
        let xml = core_props_xml(&props);
        assert!(xml.contains("<dc:title>Q&amp;A &lt;draft&gt;</dc:title>"));
        assert!(xml.contains("<dc:creator>O&apos;Neil</dc:creator>"));
        assert!(!xml.contains("<dc:subject>"));
    }

    #[test]
    fn core_props_drop_xml_illegal_characters() {
        let props = DeckProperties {
            title: Some("Deck\u{1}\u{0}".into()),
            author: Some("Line one\nLine\ttwo".into()),
            subject: Some("\u{1B}[0mplain\u{FFFE}".into()),
        };
        let xml = core_props_xml(&props);
        assert!(xml.contains("<dc:title>Deck</dc:title>"));
        assert!(xml.contains("<dc:creator>Line one\nLine\ttwo</dc:creator>"));
        assert!(xml.contains("<dc:subject>[0mplain</dc:subject>"));
    }

    #[test]
    fn content_types_cover_every_slide() {
        let xml = content_types_xml(2);
        assert!(xml.contains("/ppt/slides/slide1.xml"));
        assert!(xml.contains("/ppt/slides/slide2.xml"));
        assert!(!xml.contains("/ppt/slides/slide3.xml"));
        assert!(xml.contains(r#"Extension="png""#));
    }

    #[test]
    fn static_parts_are_embedded() {
        assert!(THEME_XML.contains("<a:theme"));
        assert!(SLIDE_MASTER_XML.contains("<p:sldLayoutId"));
        assert!(SLIDE_LAYOUT_XML.contains(r#"type="blank""#));
    }
}
