//! Document content (word/document.xml)
//!
//! [`Document`] owns the parsed main part and hands out typed views over
//! it. Views borrow the underlying [`Element`] mutably, so a pass can walk
//! paragraphs or tables in document order and edit their property trees in
//! place without ever rebuilding the part.
//!
//! Two projections of the body exist side by side:
//!
//! - the paragraph view: direct `w:p` children of `w:body`, numbered in
//!   document order (this is what role classification sees);
//! - [`BodyChild`]: the interleaved order of direct paragraphs and tables,
//!   which is the only way to tell which paragraphs sit right before a table.

use crate::error::{OoxmlError, Result};
use crate::styles::StyleSheet;
use crate::xml::{Element, XmlDocument};

/// WordprocessingML main namespace
pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office document relationships namespace
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Schema order of `w:pPr` children
pub(crate) const PPR_ORDER: &[&str] = &[
    "pStyle", "keepNext", "keepLines", "pageBreakBefore", "framePr", "widowControl", "numPr",
    "suppressLineNumbers", "pBdr", "shd", "tabs", "suppressAutoHyphens", "kinsoku", "wordWrap",
    "overflowPunct", "topLinePunct", "autoSpaceDE", "autoSpaceDN", "bidi", "adjustRightInd",
    "snapToGrid", "spacing", "ind", "contextualSpacing", "mirrorIndents", "suppressOverlap", "jc",
    "textDirection", "textAlignment", "textboxTightWrap", "outlineLvl", "divId", "cnfStyle", "rPr",
    "sectPr", "pPrChange",
];

/// Schema order of `w:rPr` children
pub(crate) const RPR_ORDER: &[&str] = &[
    "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps", "smallCaps", "strike", "dstrike",
    "outline", "shadow", "emboss", "imprint", "noProof", "snapToGrid", "vanish", "webHidden",
    "color", "spacing", "w", "kern", "position", "sz", "szCs", "highlight", "u", "effect", "bdr",
    "shd", "fitText", "vertAlign", "rtl", "cs", "em", "lang", "eastAsianLayout", "specVanish",
    "oMath",
];

/// Schema order of `w:tblPr` children
pub(crate) const TBLPR_ORDER: &[&str] = &[
    "tblStyle", "tblpPr", "tblOverlap", "bidiVisual", "tblStyleRowBandSize",
    "tblStyleColBandSize", "tblW", "jc", "tblCellSpacing", "tblInd", "tblBorders", "shd",
    "tblLayout", "tblCellMar", "tblLook", "tblCaption", "tblDescription",
];

/// Schema order of `w:tcPr` children
pub(crate) const TCPR_ORDER: &[&str] = &[
    "cnfStyle", "tcW", "gridSpan", "hMerge", "vMerge", "tcBorders", "shd", "noWrap", "tcMar",
    "textDirection", "tcFitText", "vAlign", "hideMark",
];

/// Schema order of `w:sectPr` children
pub(crate) const SECTPR_ORDER: &[&str] = &[
    "headerReference", "footerReference", "footnotePr", "endnotePr", "type", "pgSz", "pgMar",
    "paperSrc", "pgBorders", "lnNumType", "pgNumType", "cols", "formProt", "vAlign", "noEndnote",
    "titlePg", "textDirection", "bidi", "rtlGutter", "docGrid", "printerSettings", "sectPrChange",
];

/// Elements that can wrap runs inside a paragraph
const RUN_CONTAINERS: &[&str] = &["hyperlink", "smartTag", "ins", "fldSimple", "customXml"];

/// A direct child of the document body, in true body order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyChild {
    /// The n-th body paragraph
    Paragraph(usize),
    /// The n-th body table
    Table(usize),
}

/// Read-only snapshot of a body paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphInfo {
    /// Position among body paragraphs
    pub index: usize,
    /// Resolved style display name (e.g. "Heading 1", "Normal")
    pub style_name: String,
    /// Plain text of the paragraph
    pub text: String,
}

/// The main document part
#[derive(Debug, Clone)]
pub struct Document {
    xml: XmlDocument,
}

impl Document {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let xml = XmlDocument::parse(xml)?;
        if !xml.root.is("document") {
            return Err(OoxmlError::InvalidStructure(format!(
                "expected <w:document> root, found <{}>",
                xml.root.name
            )));
        }
        if !xml.root.has_child("body") {
            return Err(OoxmlError::InvalidStructure(
                "document has no <w:body>".to_string(),
            ));
        }
        Ok(Self { xml })
    }

    /// Serialize back to XML bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.xml.to_bytes()
    }

    /// The root `w:document` element
    pub fn root(&self) -> &Element {
        &self.xml.root
    }

    /// Ensure the root declares `xmlns:<prefix>`
    pub(crate) fn ensure_namespace(&mut self, prefix: &str, uri: &str) {
        let key = format!("xmlns:{}", prefix);
        if self.xml.root.attr_exact(&key).is_none() {
            self.xml.root.set_attr(key, uri);
        }
    }

    fn body(&self) -> Option<&Element> {
        self.xml.root.child("body")
    }

    fn body_mut(&mut self) -> Option<&mut Element> {
        self.xml.root.child_mut("body")
    }

    /// Number of body paragraphs
    pub fn paragraph_count(&self) -> usize {
        self.body()
            .map(|b| b.elements().filter(|e| e.is("p")).count())
            .unwrap_or(0)
    }

    /// Number of body tables
    pub fn table_count(&self) -> usize {
        self.body()
            .map(|b| b.elements().filter(|e| e.is("tbl")).count())
            .unwrap_or(0)
    }

    /// Snapshot every body paragraph with its resolved style name
    pub fn paragraph_infos(&self, styles: &StyleSheet) -> Vec<ParagraphInfo> {
        self.body()
            .into_iter()
            .flat_map(|b| b.elements())
            .filter(|e| e.is("p"))
            .enumerate()
            .map(|(index, p)| ParagraphInfo {
                index,
                style_name: styles.display_name(paragraph_style_id(p)),
                text: paragraph_text(p),
            })
            .collect()
    }

    /// The body's direct children as paragraph/table references, in order.
    ///
    /// Anything that is neither (section properties, bookmarks, content
    /// controls) is skipped.
    pub fn body_children(&self) -> Vec<BodyChild> {
        let mut paragraphs = 0;
        let mut tables = 0;
        let mut children = Vec::new();
        for el in self.body().into_iter().flat_map(|b| b.elements()) {
            if el.is("p") {
                children.push(BodyChild::Paragraph(paragraphs));
                paragraphs += 1;
            } else if el.is("tbl") {
                children.push(BodyChild::Table(tables));
                tables += 1;
            }
        }
        children
    }

    /// Mutable view of the n-th body paragraph
    pub fn paragraph_mut(&mut self, index: usize) -> Option<Paragraph<'_>> {
        self.body_mut()?
            .elements_mut()
            .filter(|e| e.is("p"))
            .nth(index)
            .map(Paragraph::new)
    }

    /// Mutable views of all body paragraphs, in document order
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = Paragraph<'_>> {
        self.body_mut()
            .into_iter()
            .flat_map(|b| b.elements_mut())
            .filter(|e| e.is("p"))
            .map(Paragraph::new)
    }

    /// Mutable views of all body tables, in document order
    pub fn tables_mut(&mut self) -> impl Iterator<Item = Table<'_>> {
        self.body_mut()
            .into_iter()
            .flat_map(|b| b.elements_mut())
            .filter(|e| e.is("tbl"))
            .map(Table::new)
    }

    /// Every section in document order: paragraph-level `w:sectPr` first,
    /// the body's final `w:sectPr` last.
    pub fn sections_mut(&mut self) -> Vec<Section<'_>> {
        let mut sections = Vec::new();
        for el in self.body_mut().into_iter().flat_map(|b| b.elements_mut()) {
            if el.is("sectPr") {
                sections.push(Section::new(el));
            } else if el.is("p") {
                if let Some(sect) = el.child_mut("pPr").and_then(|ppr| ppr.child_mut("sectPr")) {
                    sections.push(Section::new(sect));
                }
            }
        }
        sections
    }

    /// The body's final section, created when the document has none
    pub fn body_section_mut(&mut self) -> Result<Section<'_>> {
        let body = self
            .body_mut()
            .ok_or_else(|| OoxmlError::InvalidStructure("document has no <w:body>".to_string()))?;
        // sectPr is always the last element of the body
        Ok(Section::new(body.child_or_insert("w:sectPr", &[])))
    }

    /// The first section in document order: the earliest paragraph-level
    /// `w:sectPr`, or the body's final one when there is none
    pub fn first_section_mut(&mut self) -> Result<Section<'_>> {
        let has_inner = self
            .body()
            .into_iter()
            .flat_map(|b| b.elements())
            .any(|el| el.is("p") && paragraph_section(el).is_some());
        if !has_inner {
            return self.body_section_mut();
        }
        self.body_mut()
            .into_iter()
            .flat_map(|b| b.elements_mut())
            .filter(|el| el.is("p"))
            .find_map(|p| p.child_mut("pPr").and_then(|ppr| ppr.child_mut("sectPr")))
            .map(Section::new)
            .ok_or_else(|| OoxmlError::InvalidStructure("section properties vanished".to_string()))
    }

    /// Remove every element with the given local name anywhere in the body
    pub fn remove_from_body(&mut self, local: &str) -> usize {
        self.body_mut()
            .map(|b| b.remove_descendants(local))
            .unwrap_or(0)
    }
}

fn paragraph_section(p: &Element) -> Option<&Element> {
    p.child("pPr").and_then(|ppr| ppr.child("sectPr"))
}

/// Style ID referenced by a paragraph's `w:pPr/w:pStyle`
pub fn paragraph_style_id(p: &Element) -> Option<&str> {
    p.child("pPr")
        .and_then(|ppr| ppr.child("pStyle"))
        .and_then(|s| s.attr("val"))
}

/// Plain text of a paragraph: `w:t` content with tabs and breaks spelled out.
///
/// Property trees, deleted text, field instructions and nested text boxes
/// do not contribute.
pub fn paragraph_text(p: &Element) -> String {
    let mut text = String::new();
    collect_text(p, &mut text);
    text
}

fn collect_text(el: &Element, out: &mut String) {
    for child in el.elements() {
        match child.local_name() {
            "t" => out.push_str(&child.own_text()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            "pPr" | "rPr" | "txbxContent" | "del" | "instrText" => {}
            _ => collect_text(child, out),
        }
    }
}

/// Whether `el` stops the run of plain text runs at the start of a paragraph
fn ends_plain_lead(el: &Element) -> bool {
    if el.is("r") {
        el.elements().any(|c| !c.is("rPr") && !c.is("t"))
    } else {
        RUN_CONTAINERS.contains(&el.local_name())
    }
}

fn collect_runs<'a>(el: &'a mut Element, out: &mut Vec<Run<'a>>) {
    for child in el.elements_mut() {
        let is_run = child.is("r");
        let is_container = RUN_CONTAINERS.contains(&child.local_name());
        if is_run {
            out.push(Run::new(child));
        } else if is_container {
            collect_runs(child, out);
        }
    }
}

/// Mutable view of a `w:p` element
#[derive(Debug)]
pub struct Paragraph<'a> {
    el: &'a mut Element,
}

impl<'a> Paragraph<'a> {
    /// Wrap a `w:p` element
    pub fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.el
    }

    /// Style ID from `w:pStyle`
    pub fn style_id(&self) -> Option<&str> {
        paragraph_style_id(self.el)
    }

    /// Plain text
    pub fn text(&self) -> String {
        paragraph_text(self.el)
    }

    /// The paragraph property tree (`w:pPr`), created if absent
    pub fn properties(&mut self) -> &mut Element {
        self.el.child_or_insert("w:pPr", &["pPr"])
    }

    /// The paragraph property tree, if present
    pub fn existing_properties(&mut self) -> Option<&mut Element> {
        self.el.child_mut("pPr")
    }

    /// Mutable views of the paragraph's runs, including runs nested in
    /// hyperlinks and similar wrappers
    pub fn runs(&mut self) -> Vec<Run<'_>> {
        let mut runs = Vec::new();
        collect_runs(self.el, &mut runs);
        runs
    }

    /// Remove every run (and run wrapper) from the paragraph
    pub fn remove_runs(&mut self) -> usize {
        let mut removed = self.el.remove_children("r");
        for container in RUN_CONTAINERS {
            removed += self.el.remove_children(container);
        }
        removed
    }

    /// Text of the plain runs that lead the paragraph.
    ///
    /// The lead ends at the first hyperlink, tracked change, field or other
    /// run wrapper, or at the first run holding more than text.
    pub fn leading_text(&self) -> String {
        self.el
            .elements()
            .take_while(|e| !ends_plain_lead(e))
            .filter(|e| e.is("r"))
            .flat_map(|r| r.elements().filter(|t| t.is("t")))
            .map(|t| t.own_text())
            .collect()
    }

    /// Replace the leading plain runs with one run per text segment.
    ///
    /// New runs copy the first replaced run's properties and take its place.
    /// Run wrappers and whatever follows them are left as they are.
    pub fn split_into_runs(&mut self, segments: &[&str]) {
        let lead = self
            .el
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(ends_plain_lead))
            .unwrap_or(self.el.children.len());
        let plain: Vec<usize> = self.el.children[..lead]
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_element().is_some_and(|e| e.is("r")))
            .map(|(i, _)| i)
            .collect();
        let at = plain.first().copied().unwrap_or(lead);
        let template = plain
            .first()
            .and_then(|&i| self.el.children[i].as_element())
            .and_then(|r| r.child("rPr").cloned());

        for &i in plain.iter().rev() {
            self.el.children.remove(i);
        }
        for (offset, segment) in segments.iter().enumerate() {
            let mut run = Element::new("w:r");
            if let Some(props) = &template {
                run.push(props.clone());
            }
            run.push(
                Element::new("w:t")
                    .with_attr("xml:space", "preserve")
                    .with_text(*segment),
            );
            self.el.children.insert(at + offset, crate::xml::Node::Element(run));
        }
    }

    /// Append a new run and return a view of it
    pub fn push_run(&mut self, run: Element) -> Run<'_> {
        self.el.push(run);
        let last = self
            .el
            .elements_mut()
            .last()
            .filter(|e| e.is("r"));
        match last {
            Some(el) => Run::new(el),
            None => unreachable!("a run was just appended"),
        }
    }
}

/// Mutable view of a `w:r` element
#[derive(Debug)]
pub struct Run<'a> {
    el: &'a mut Element,
}

impl<'a> Run<'a> {
    /// Wrap a `w:r` element
    pub fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.el
    }

    /// Text of the run
    pub fn text(&self) -> String {
        paragraph_text(self.el)
    }

    /// The run property tree (`w:rPr`), created if absent
    pub fn properties(&mut self) -> &mut Element {
        self.el.child_or_insert("w:rPr", &["rPr"])
    }

    /// The run property tree, if present
    pub fn existing_properties(&mut self) -> Option<&mut Element> {
        self.el.child_mut("rPr")
    }
}

/// Mutable view of a `w:tbl` element
#[derive(Debug)]
pub struct Table<'a> {
    el: &'a mut Element,
}

impl<'a> Table<'a> {
    /// Wrap a `w:tbl` element
    pub fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.el
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.el.elements().filter(|e| e.is("tr")).count()
    }

    /// The table property tree (`w:tblPr`), created if absent
    pub fn properties(&mut self) -> &mut Element {
        self.el.child_or_insert("w:tblPr", &["tblPr", "tblGrid", "tr"])
    }

    /// Mutable views of the rows
    pub fn rows(&mut self) -> Vec<TableRow<'_>> {
        self.el
            .elements_mut()
            .filter(|e| e.is("tr"))
            .map(TableRow::new)
            .collect()
    }
}

/// Mutable view of a `w:tr` element
#[derive(Debug)]
pub struct TableRow<'a> {
    el: &'a mut Element,
}

impl<'a> TableRow<'a> {
    /// Wrap a `w:tr` element
    pub fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// Mutable views of the cells
    pub fn cells(&mut self) -> Vec<TableCell<'_>> {
        self.el
            .elements_mut()
            .filter(|e| e.is("tc"))
            .map(TableCell::new)
            .collect()
    }
}

/// Mutable view of a `w:tc` element
#[derive(Debug)]
pub struct TableCell<'a> {
    el: &'a mut Element,
}

impl<'a> TableCell<'a> {
    /// Wrap a `w:tc` element
    pub fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.el
    }

    /// The cell property tree (`w:tcPr`), created if absent
    pub fn properties(&mut self) -> &mut Element {
        self.el.child_or_insert("w:tcPr", &["tcPr"])
    }

    /// The cell property tree, if present
    pub fn existing_properties(&mut self) -> Option<&mut Element> {
        self.el.child_mut("tcPr")
    }

    /// Mutable views of the cell's paragraphs
    pub fn paragraphs(&mut self) -> Vec<Paragraph<'_>> {
        self.el
            .elements_mut()
            .filter(|e| e.is("p"))
            .map(Paragraph::new)
            .collect()
    }
}

/// Mutable view of a `w:sectPr` element
#[derive(Debug)]
pub struct Section<'a> {
    el: &'a mut Element,
}

impl<'a> Section<'a> {
    /// Wrap a `w:sectPr` element
    pub fn new(el: &'a mut Element) -> Self {
        Self { el }
    }

    /// The underlying element
    pub fn element(&self) -> &Element {
        self.el
    }

    /// Set all four page margins, keeping header/footer/gutter distances
    pub fn set_margins(&mut self, twips: i32) {
        let margin = self.el.child_or_insert("w:pgMar", SECTPR_ORDER);
        let value = twips.to_string();
        for side in ["top", "right", "bottom", "left"] {
            margin.set_attr(format!("w:{}", side), value.as_str());
        }
        for (side, default) in [("header", "720"), ("footer", "720"), ("gutter", "0")] {
            if margin.attr(side).is_none() {
                margin.set_attr(format!("w:{}", side), default);
            }
        }
    }

    /// Relationship ID of the header reference of the given type
    /// (`default`, `first`, `even`)
    pub fn header_reference(&self, kind: &str) -> Option<&str> {
        self.el
            .elements()
            .filter(|e| e.is("headerReference"))
            .find(|e| e.attr("type") == Some(kind))
            .and_then(|e| e.attr("id"))
    }

    /// Point the header reference of the given type at `rel_id`
    pub fn set_header_reference(&mut self, kind: &str, rel_id: &str) {
        let existing = self
            .el
            .elements_mut()
            .filter(|e| e.is("headerReference"))
            .find(|e| e.attr("type") == Some(kind));
        match existing {
            Some(reference) => reference.set_attr("r:id", rel_id),
            None => {
                let reference = Element::new("w:headerReference")
                    .with_attr("w:type", kind)
                    .with_attr("r:id", rel_id);
                // Header references lead the section; keep their relative order
                let at = self
                    .el
                    .children
                    .iter()
                    .position(|n| {
                        n.as_element()
                            .map(|e| !e.is("headerReference"))
                            .unwrap_or(false)
                    })
                    .unwrap_or(self.el.children.len());
                self.el
                    .children
                    .insert(at, crate::xml::Node::Element(reference));
            }
        }
    }

    /// Drop the distinct first-page header/footer flag
    pub fn clear_title_page(&mut self) -> bool {
        self.el.remove_children("titlePg") > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}"><w:body>{}</w:body></w:document>"#,
            W_NS, body
        );
        Document::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_rejects_non_document_root() {
        assert!(Document::parse(b"<w:hdr xmlns:w=\"x\"><w:p/></w:hdr>").is_err());
        assert!(Document::parse(b"<w:document xmlns:w=\"x\"/>").is_err());
    }

    #[test]
    fn test_body_children_interleave() {
        let d = doc(concat!(
            "<w:p/><w:bookmarkStart w:id=\"0\"/><w:p/>",
            "<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>",
            "<w:p/><w:tbl/><w:sectPr/>"
        ));
        assert_eq!(
            d.body_children(),
            vec![
                BodyChild::Paragraph(0),
                BodyChild::Paragraph(1),
                BodyChild::Table(0),
                BodyChild::Paragraph(2),
                BodyChild::Table(1),
            ]
        );
        assert_eq!(d.paragraph_count(), 3);
        assert_eq!(d.table_count(), 2);
    }

    #[test]
    fn test_paragraph_infos_resolve_text_and_style() {
        let d = doc(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Method</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t xml:space="preserve">A </w:t></w:r>"#,
            r#"<w:hyperlink><w:r><w:t>link</w:t></w:r></w:hyperlink>"#,
            r#"<w:r><w:tab/><w:instrText> PAGE </w:instrText><w:t>b</w:t></w:r></w:p>"#
        ));
        let infos = d.paragraph_infos(&StyleSheet::default());
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].style_name, "Heading1");
        assert_eq!(infos[0].text, "Method");
        assert_eq!(infos[1].index, 1);
        assert_eq!(infos[1].style_name, "Normal");
        assert_eq!(infos[1].text, "A link\tb");
    }

    #[test]
    fn test_runs_include_hyperlinks() {
        let mut d = doc(concat!(
            r#"<w:p><w:r><w:t>a</w:t></w:r><w:hyperlink><w:r><w:t>b</w:t></w:r></w:hyperlink>"#,
            r#"<w:bookmarkEnd w:id="0"/></w:p>"#
        ));
        let mut p = d.paragraph_mut(0).unwrap();
        let texts: Vec<_> = p.runs().iter().map(|r| r.text()).collect();
        assert_eq!(texts, vec!["a", "b"]);

        assert_eq!(p.remove_runs(), 2);
        assert!(p.runs().is_empty());
        assert!(p.element().has_child("bookmarkEnd"));
    }

    #[test]
    fn test_properties_inserted_first() {
        let mut d = doc(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        let mut p = d.paragraph_mut(0).unwrap();
        p.properties();
        let names: Vec<_> = p.element().elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["pPr", "r"]);
    }

    #[test]
    fn test_table_views() {
        let mut d = doc(concat!(
            "<w:tbl><w:tblGrid/>",
            "<w:tr><w:tc><w:p/></w:tc><w:tc><w:p/><w:p/></w:tc></w:tr>",
            "<w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr>",
            "</w:tbl>"
        ));
        let mut tables: Vec<_> = d.tables_mut().collect();
        let table = &mut tables[0];
        assert_eq!(table.row_count(), 2);
        table.properties();
        let names: Vec<_> = table.element().elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["tblPr", "tblGrid", "tr", "tr"]);

        let mut rows = table.rows();
        let mut cells = rows[0].cells();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].paragraphs().len(), 2);
    }

    #[test]
    fn test_sections_and_margins() {
        let mut d = doc(concat!(
            r#"<w:p><w:pPr><w:sectPr><w:pgMar w:top="720" w:header="500"/></w:sectPr></w:pPr></w:p>"#,
            r#"<w:sectPr><w:pgSz w:w="12240"/><w:titlePg/></w:sectPr>"#
        ));
        let mut sections = d.sections_mut();
        assert_eq!(sections.len(), 2);
        for section in sections.iter_mut() {
            section.set_margins(1440);
        }

        let first = sections[0].element().child("pgMar").unwrap();
        assert_eq!(first.attr("top"), Some("1440"));
        assert_eq!(first.attr("header"), Some("500"));

        let last = sections[1].element();
        let names: Vec<_> = last.elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["pgSz", "pgMar", "titlePg"]);
        assert_eq!(last.child("pgMar").unwrap().attr("gutter"), Some("0"));
        assert!(sections[1].clear_title_page());
    }

    #[test]
    fn test_header_reference_roundtrip() {
        let mut d = doc(r#"<w:sectPr><w:pgSz w:w="12240"/></w:sectPr>"#);
        let mut section = d.body_section_mut().unwrap();
        assert_eq!(section.header_reference("default"), None);

        section.set_header_reference("default", "rId7");
        section.set_header_reference("default", "rId8");
        assert_eq!(section.header_reference("default"), Some("rId8"));
        let names: Vec<_> = section.element().elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["headerReference", "pgSz"]);
    }

    #[test]
    fn test_body_section_created_when_missing() {
        let mut d = doc("<w:p/>");
        d.body_section_mut().unwrap().set_margins(1440);
        assert_eq!(d.sections_mut().len(), 1);
    }

    #[test]
    fn test_remove_from_body() {
        let mut d = doc(concat!(
            r#"<w:bookmarkStart w:id="1"/>"#,
            r#"<w:p><w:bookmarkStart w:id="0" w:name="method"/><w:r><w:t>x</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
            r#"<w:bookmarkEnd w:id="1"/>"#
        ));
        assert_eq!(d.remove_from_body("bookmarkStart"), 2);
        assert_eq!(d.remove_from_body("bookmarkEnd"), 2);
        assert_eq!(d.remove_from_body("bookmarkEnd"), 0);
        assert_eq!(d.body_children(), vec![BodyChild::Paragraph(0)]);
    }
}
