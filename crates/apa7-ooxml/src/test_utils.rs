//! Shared test utilities for apa7-ooxml
//!
//! In-memory DOCX fixtures used by this crate's tests and by the engine and
//! CLI integration tests.

use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;
use zip::ZipWriter;

use crate::document::{R_NS, W_NS};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const STYLES_REL: &str = r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#;

const HEADER_REL: &str = r#"<Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>"#;

/// Style definitions resembling what Pandoc emits
pub const PANDOC_STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="BodyText"><w:name w:val="Body Text"/><w:basedOn w:val="Normal"/></w:style>
  <w:style w:type="paragraph" w:styleId="FirstParagraph"><w:name w:val="First Paragraph"/><w:basedOn w:val="BodyText"/></w:style>
  <w:style w:type="paragraph" w:styleId="Compact"><w:name w:val="Compact"/><w:basedOn w:val="BodyText"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:pPr><w:outlineLvl w:val="0"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:pPr><w:outlineLvl w:val="1"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:pPr><w:outlineLvl w:val="2"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:pPr><w:outlineLvl w:val="3"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="Heading5"><w:name w:val="heading 5"/><w:pPr><w:outlineLvl w:val="4"/></w:pPr></w:style>
  <w:style w:type="paragraph" w:styleId="SourceCode"><w:name w:val="Source Code"/></w:style>
  <w:style w:type="paragraph" w:styleId="Bibliography"><w:name w:val="Bibliography"/></w:style>
  <w:style w:type="character" w:styleId="VerbatimChar"><w:name w:val="Verbatim Char"/></w:style>
  <w:style w:type="table" w:styleId="Table"><w:name w:val="Table"/></w:style>
</w:styles>"#;

/// Wrap body content in a `w:document` part
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{}" xmlns:r="{}"><w:body>{}</w:body></w:document>"#,
        W_NS, R_NS, body
    )
}

/// Build a ZIP package from `(path, contents)` pairs, in order
pub fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    let mut zip = ZipWriter::new(&mut buffer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (path, contents) in parts {
        zip.start_file(*path, options).unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buffer.into_inner()
}

fn document_rels(entries: &[&str]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        entries.concat()
    )
}

/// A minimal DOCX (no styles.xml) whose body is `body`
pub fn docx_with_body(body: &str) -> Vec<u8> {
    build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/_rels/document.xml.rels", document_rels(&[]).as_str()),
        ("word/document.xml", document_xml(body).as_str()),
    ])
}

/// A DOCX with [`PANDOC_STYLES`] whose body is `body`
pub fn styled_docx(body: &str) -> Vec<u8> {
    build_docx(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/_rels/document.xml.rels", document_rels(&[STYLES_REL]).as_str()),
        ("word/document.xml", document_xml(body).as_str()),
        ("word/styles.xml", PANDOC_STYLES),
    ])
}

/// A styled DOCX whose final section references `word/header1.xml` as its
/// default header; `header_body` is the header's content
pub fn docx_with_header(header_body: &str) -> Vec<u8> {
    let body = concat!(
        r#"<w:p><w:r><w:t>Text</w:t></w:r></w:p>"#,
        r#"<w:sectPr><w:headerReference w:type="default" r:id="rId9"/><w:pgMar w:top="720"/><w:titlePg/></w:sectPr>"#
    );
    docx_with_header_part(body, header_body)
}

/// A styled DOCX that ships `word/header1.xml` under relationship `rId9`.
///
/// `body` decides which sections reference it.
pub fn docx_with_header_part(body: &str, header_body: &str) -> Vec<u8> {
    let content_types = CONTENT_TYPES.replace(
        "</Types>",
        r#"<Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/></Types>"#,
    );
    let header = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="{}" xmlns:r="{}">{}</w:hdr>"#,
        W_NS, R_NS, header_body
    );
    build_docx(&[
        ("[Content_Types].xml", content_types.as_str()),
        ("_rels/.rels", PACKAGE_RELS),
        (
            "word/_rels/document.xml.rels",
            document_rels(&[STYLES_REL, HEADER_REL]).as_str(),
        ),
        ("word/document.xml", document_xml(body).as_str()),
        ("word/styles.xml", PANDOC_STYLES),
        ("word/header1.xml", header.as_str()),
    ])
}

/// Read one part of a DOCX as a string
pub fn extract_part(docx: &[u8], path: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).ok()?;
    let mut file = archive.by_name(path).ok()?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    Some(contents)
}

/// Read word/document.xml from a DOCX
pub fn extract_document_xml(docx: &[u8]) -> String {
    extract_part(docx, "word/document.xml").unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::OoxmlArchive;

    #[test]
    fn test_fixtures_are_valid_archives() {
        for docx in [
            docx_with_body("<w:p/>"),
            styled_docx("<w:p/>"),
            docx_with_header("<w:p/>"),
        ] {
            let archive = OoxmlArchive::from_reader(Cursor::new(docx)).unwrap();
            assert!(archive.document_xml().is_ok());
        }
    }

    #[test]
    fn test_extract_part() {
        let docx = styled_docx("<w:p/>");
        assert!(extract_document_xml(&docx).contains("<w:body><w:p/></w:body>"));
        assert!(extract_part(&docx, "word/styles.xml").is_some());
        assert!(extract_part(&docx, "word/missing.xml").is_none());
    }
}
