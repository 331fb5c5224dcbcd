//! Page layout and cleanup passes
//!
//! These run independently of paragraph roles: margins on every section,
//! removal of generator bookmarks, and the optional page number field in
//! the running header.

use apa7_ooxml::{Document, Justification, LineSpacing, WordPackage};
use tracing::debug;

use crate::error::Result;

/// Set all four page margins of every section; returns the section count
pub fn set_page_margins(document: &mut Document, twips: i32) -> usize {
    let mut sections = document.sections_mut();
    for section in sections.iter_mut() {
        section.set_margins(twips);
    }
    debug!(sections = sections.len(), twips, "page margins");
    sections.len()
}

/// Remove every bookmarkStart/bookmarkEnd in the body
pub fn strip_bookmarks(document: &mut Document) -> usize {
    let removed = document.remove_from_body("bookmarkStart") + document.remove_from_body("bookmarkEnd");
    debug!(removed, "bookmarks stripped");
    removed
}

/// Put a right-aligned PAGE field into the default header.
///
/// The header's first paragraph is emptied first, so running this again
/// leaves exactly one field. A distinct first-page header is switched off
/// so the number also shows on the title page.
pub fn insert_page_number(package: &mut WordPackage, font: &str, size_pt: f32) -> Result<()> {
    let mut header = package.default_header()?;
    {
        let mut paragraph = header.first_paragraph_mut();
        paragraph.remove_runs();
        paragraph.set_default_font(font, size_pt);
        paragraph.set_spacing(LineSpacing::Single, 0.0, 0.0);
        paragraph.clear_indent();
        paragraph.set_alignment(Justification::Right);
        paragraph.insert_page_number_field();
    }
    package.store_header(&header)?;

    for mut section in package.document.sections_mut() {
        section.clear_title_page();
    }
    debug!(path = %header.path, "page number field inserted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apa7_ooxml::test_utils::{docx_with_body, docx_with_header, extract_part};

    #[test]
    fn test_margins_on_every_section() {
        let bytes = docx_with_body(concat!(
            r#"<w:p><w:pPr><w:sectPr><w:pgMar w:top="500" w:left="500"/></w:sectPr></w:pPr></w:p>"#,
            r#"<w:p/><w:sectPr/>"#
        ));
        let mut package = WordPackage::from_bytes(&bytes).unwrap();
        assert_eq!(set_page_margins(&mut package.document, 1440), 2);

        for section in package.document.sections_mut() {
            let mar = section.element().child("pgMar").unwrap();
            for side in ["top", "bottom", "left", "right"] {
                assert_eq!(mar.attr(side), Some("1440"));
            }
        }
    }

    #[test]
    fn test_strip_bookmarks_everywhere() {
        let bytes = docx_with_body(concat!(
            r#"<w:p><w:bookmarkStart w:id="0" w:name="method"/><w:r><w:t>Method</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
            r#"<w:tbl><w:tr><w:tc><w:p><w:bookmarkStart w:id="1"/><w:bookmarkEnd w:id="1"/></w:p></w:tc></w:tr></w:tbl>"#
        ));
        let mut package = WordPackage::from_bytes(&bytes).unwrap();
        assert_eq!(strip_bookmarks(&mut package.document), 4);
        assert_eq!(strip_bookmarks(&mut package.document), 0);
        assert_eq!(package.document.paragraph_infos(&package.styles)[0].text, "Method");
    }

    #[test]
    fn test_page_number_in_new_header() {
        let bytes = docx_with_body("<w:p/><w:sectPr><w:titlePg/></w:sectPr>");
        let mut package = WordPackage::from_bytes(&bytes).unwrap();
        insert_page_number(&mut package, "Times New Roman", 12.0).unwrap();
        let saved = package.to_bytes().unwrap();

        let header = extract_part(&saved, "word/header1.xml").unwrap();
        assert_eq!(header.matches("w:fldCharType=\"begin\"").count(), 1);
        assert!(header.contains("> PAGE <"));
        assert!(header.contains(r#"<w:jc w:val="right"/>"#));

        let doc = extract_part(&saved, "word/document.xml").unwrap();
        assert!(!doc.contains("titlePg"));
        assert!(doc.contains("w:headerReference"));
    }

    #[test]
    fn test_page_number_rerun_keeps_one_field() {
        let bytes = docx_with_header("<w:p><w:r><w:t>RUNNING HEAD</w:t></w:r></w:p>");
        let mut package = WordPackage::from_bytes(&bytes).unwrap();
        insert_page_number(&mut package, "Times New Roman", 12.0).unwrap();
        insert_page_number(&mut package, "Times New Roman", 12.0).unwrap();
        let saved = package.to_bytes().unwrap();

        let header = extract_part(&saved, "word/header1.xml").unwrap();
        assert_eq!(header.matches("w:fldCharType=\"begin\"").count(), 1);
        assert!(!header.contains("RUNNING HEAD"));
        assert!(extract_part(&saved, "word/header2.xml").is_none());
    }
}
