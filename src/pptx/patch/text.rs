//! Text body construction for table cells.
//!
//! Cell content arrives either as a plain string or as a structured
//! paragraph list; both map onto the same `a:txBody` shape PowerPoint
//! expects, one run per paragraph.
use crate::xml::XmlElement;
use serde::{Deserialize, Serialize};

/// Content for a table cell: a plain string or structured paragraphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellContent {
    Plain(String),
    Rich(Vec<ParagraphSpec>),
}

impl From<&str> for CellContent {
    fn from(text: &str) -> Self {
        CellContent::Plain(text.to_string())
    }
}

/// One paragraph of rich cell content, rendered as a single run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParagraphSpec {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// RRGGBB hex color, no leading `#`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Paragraph alignment: `l`, `ctr`, `r`, or `just`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
}

/// Build an `a:txBody` subtree for the given cell content.
pub fn build_text_body(content: &CellContent) -> XmlElement {
    let mut body = XmlElement::new("a:txBody")
        .with_child(XmlElement::new("a:bodyPr"))
        .with_child(XmlElement::new("a:lstStyle"));

    match content {
        CellContent::Plain(text) => {
            body = body.with_child(paragraph(&ParagraphSpec {
                text: text.clone(),
                ..Default::default()
            }));
        },
        CellContent::Rich(paragraphs) => {
            for spec in paragraphs {
                body = body.with_child(paragraph(spec));
            }
        },
    }
    body
}

/// An empty text body, used for padding cells.
pub fn empty_text_body() -> XmlElement {
    XmlElement::new("a:txBody")
        .with_child(XmlElement::new("a:bodyPr"))
        .with_child(XmlElement::new("a:lstStyle"))
        .with_child(XmlElement::new("a:p").with_child(XmlElement::new("a:endParaRPr")))
}

fn paragraph(spec: &ParagraphSpec) -> XmlElement {
    let mut p = XmlElement::new("a:p");
    if let Some(alignment) = &spec.alignment {
        p = p.with_child(XmlElement::new("a:pPr").with_attr("algn", alignment.clone()));
    }

    let run = XmlElement::new("a:r")
        .with_child(run_properties(spec))
        .with_child(XmlElement::new("a:t").with_text(spec.text.clone()));
    p.with_child(run)
}

fn run_properties(spec: &ParagraphSpec) -> XmlElement {
    let mut r_pr = XmlElement::new("a:rPr").with_attr("lang", "en-US");
    if spec.bold == Some(true) {
        r_pr = r_pr.with_attr("b", "1");
    }
    if spec.italic == Some(true) {
        r_pr = r_pr.with_attr("i", "1");
    }
    if let Some(size) = spec.font_size {
        // Run sizes are in hundredths of a point.
        r_pr = r_pr.with_attr("sz", ((size * 100.0).round() as i64).to_string());
    }
    if let Some(color) = &spec.color {
        r_pr = r_pr.with_child(
            XmlElement::new("a:solidFill")
                .with_child(XmlElement::new("a:srgbClr").with_attr("val", color.clone())),
        );
    }
    if let Some(family) = &spec.font_family {
        r_pr = r_pr.with_child(XmlElement::new("a:latin").with_attr("typeface", family.clone()));
    }
    r_pr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_content_builds_single_run() {
        let body = build_text_body(&CellContent::Plain("Revenue".into()));
        let xml = body.to_xml_string();
        assert!(xml.starts_with("<a:txBody><a:bodyPr/><a:lstStyle/>"));
        assert!(xml.contains("<a:t>Revenue</a:t>"));
        assert_eq!(body.children_named("a:p").count(), 1);
    }

    #[test]
    fn test_rich_content_maps_run_properties() {
        let body = build_text_body(&CellContent::Rich(vec![
            ParagraphSpec {
                text: "Total".into(),
                bold: Some(true),
                font_size: Some(18.0),
                color: Some("FF0000".into()),
                alignment: Some("ctr".into()),
                ..Default::default()
            },
            ParagraphSpec { text: "(net)".into(), italic: Some(true), ..Default::default() },
        ]));
        let xml = body.to_xml_string();

        assert_eq!(body.children_named("a:p").count(), 2);
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
        assert!(xml.contains(r#"b="1""#));
        assert!(xml.contains(r#"sz="1800""#));
        assert!(xml.contains(r#"<a:srgbClr val="FF0000"/>"#));
        assert!(xml.contains(r#"i="1""#));
    }

    #[test]
    fn test_font_family_maps_to_latin_typeface() {
        let body = build_text_body(&CellContent::Rich(vec![ParagraphSpec {
            text: "x".into(),
            font_family: Some("Consolas".into()),
            ..Default::default()
        }]));
        assert!(body.to_xml_string().contains(r#"<a:latin typeface="Consolas"/>"#));
    }

    #[test]
    fn test_cell_content_json_union() {
        let plain: CellContent = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(plain, CellContent::Plain("hello".into()));

        let rich: CellContent =
            serde_json::from_str(r#"[{"text": "a", "bold": true}]"#).unwrap();
        let CellContent::Rich(paragraphs) = rich else {
            panic!("expected rich content");
        };
        assert_eq!(paragraphs[0].bold, Some(true));
    }
}
