//! Part relationships (`_rels/*.rels`)
//!
//! A relationship maps an ID such as `rId7` to a target part. The formatter
//! reads them to find the default header and appends one when it has to
//! create a header. The file is kept as an element tree, so relationships
//! that are not touched are written back as they were read.

use crate::error::{OoxmlError, Result};
use crate::xml::{Element, XmlDocument};

/// OOXML namespace for relationships
pub const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Common relationship type URIs
impl Relationships {
    /// Header part relationship type
    pub const TYPE_HEADER: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    /// Styles relationship type
    pub const TYPE_STYLES: &'static str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
}

/// The relationships of one part
#[derive(Debug, Clone)]
pub struct Relationships {
    xml: XmlDocument,
}

impl Default for Relationships {
    fn default() -> Self {
        Self {
            xml: XmlDocument::new(Element::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS)),
        }
    }
}

impl Relationships {
    /// Create an empty relationships part
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a .rels part
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let xml = XmlDocument::parse(xml)?;
        if !xml.root.is("Relationships") {
            return Err(OoxmlError::InvalidStructure(format!(
                "expected <Relationships>, found <{}>",
                xml.root.name
            )));
        }
        Ok(Self { xml })
    }

    fn entries(&self) -> impl Iterator<Item = &Element> {
        self.xml.root.elements().filter(|e| e.is("Relationship"))
    }

    /// Target of a relationship ID
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries()
            .find(|e| e.attr("Id") == Some(id))
            .and_then(|e| e.attr("Target"))
    }

    /// Type URI of a relationship ID
    pub fn rel_type(&self, id: &str) -> Option<&str> {
        self.entries()
            .find(|e| e.attr("Id") == Some(id))
            .and_then(|e| e.attr("Type"))
    }

    /// Whether any relationship already points at `target`
    pub fn has_target(&self, target: &str) -> bool {
        self.entries().any(|e| e.attr("Target") == Some(target))
    }

    /// Append an internal relationship; returns its new ID.
    ///
    /// IDs continue after the highest numeric `rIdN` present.
    pub fn add(&mut self, target: &str, rel_type: &str) -> String {
        let mut n = self
            .entries()
            .filter_map(|e| e.attr("Id"))
            .filter_map(|id| id.strip_prefix("rId"))
            .filter_map(|num| num.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        while self.get(&format!("rId{}", n)).is_some() {
            n += 1;
        }
        let id = format!("rId{}", n);
        self.xml.root.push(
            Element::new("Relationship")
                .with_attr("Id", id.as_str())
                .with_attr("Type", rel_type)
                .with_attr("Target", target),
        );
        id
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Whether there are no relationships
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the part
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.xml.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/>
  <Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
  <Relationship Id="customXml" Type="urn:custom" Target="rId12.xml"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships() {
        let rels = Relationships::parse(RELS).unwrap();
        assert_eq!(rels.len(), 4);
        assert_eq!(rels.get("rId4"), Some("header1.xml"));
        assert_eq!(rels.rel_type("rId4"), Some(Relationships::TYPE_HEADER));
        assert_eq!(rels.get("rId9"), Some("https://example.com/?a=1&b=2"));
        assert!(rels.has_target("styles.xml"));
        assert_eq!(rels.get("rId2"), None);
    }

    #[test]
    fn test_add_continues_from_highest_id() {
        let mut rels = Relationships::parse(RELS).unwrap();
        let id = rels.add("header2.xml", Relationships::TYPE_HEADER);
        assert_eq!(id, "rId10");
        assert_eq!(rels.get(&id), Some("header2.xml"));
        assert_eq!(rels.len(), 5);
    }

    #[test]
    fn test_empty_relationships() {
        let mut rels = Relationships::new();
        assert!(rels.is_empty());
        assert_eq!(rels.add("styles.xml", Relationships::TYPE_STYLES), "rId1");
        assert_eq!(rels.add("header1.xml", Relationships::TYPE_HEADER), "rId2");
    }

    #[test]
    fn test_serialize_keeps_existing_entries() {
        let mut rels = Relationships::parse(RELS).unwrap();
        rels.add("header2.xml", Relationships::TYPE_HEADER);
        let xml = String::from_utf8(rels.to_bytes().unwrap()).unwrap();
        assert!(xml.contains("a=1&amp;b=2"));
        assert!(xml.contains(r#"TargetMode="External""#));

        let again = Relationships::parse(xml.as_bytes()).unwrap();
        assert_eq!(again.len(), 5);
        assert_eq!(again.get("rId10"), Some("header2.xml"));
        assert_eq!(again.get("customXml"), Some("rId12.xml"));
    }

    #[test]
    fn test_wrong_root_rejected() {
        assert!(matches!(
            Relationships::parse(b"<Types/>"),
            Err(OoxmlError::InvalidStructure(_))
        ));
    }
}
