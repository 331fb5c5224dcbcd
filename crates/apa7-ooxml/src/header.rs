//! Header parts (word/headerN.xml)

use crate::document::{Paragraph, R_NS, W_NS};
use crate::error::{OoxmlError, Result};
use crate::xml::{Element, XmlDocument};

/// Content type of a header part
pub const HEADER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";

/// A parsed header part
#[derive(Debug, Clone)]
pub struct HeaderPart {
    /// Package path (e.g. `word/header1.xml`)
    pub path: String,
    xml: XmlDocument,
}

impl HeaderPart {
    /// Parse a header part
    pub fn parse(path: impl Into<String>, xml: &[u8]) -> Result<Self> {
        let xml = XmlDocument::parse(xml)?;
        if !xml.root.is("hdr") {
            return Err(OoxmlError::InvalidStructure(format!(
                "expected <w:hdr> root, found <{}>",
                xml.root.name
            )));
        }
        Ok(Self {
            path: path.into(),
            xml,
        })
    }

    /// A header with a single empty paragraph
    pub fn empty(path: impl Into<String>) -> Self {
        let root = Element::new("w:hdr")
            .with_attr("xmlns:w", W_NS)
            .with_attr("xmlns:r", R_NS)
            .with_child(Element::new("w:p"));
        Self {
            path: path.into(),
            xml: XmlDocument::new(root),
        }
    }

    /// The first paragraph, created if the header has none
    pub fn first_paragraph_mut(&mut self) -> Paragraph<'_> {
        let root = &mut self.xml.root;
        if !root.has_child("p") {
            root.push(Element::new("w:p"));
        }
        Paragraph::new(root.child_or_insert("w:p", &[]))
    }

    /// Serialize back to XML bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.xml.to_bytes()
    }
}

/// Package path for a relationship target relative to `word/`
pub fn resolve_part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("word/{}", target),
    }
}
