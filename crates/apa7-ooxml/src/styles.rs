//! Style definitions parsing (word/styles.xml)
//!
//! Paragraphs reference styles by ID (`w:pStyle w:val="Heading1"`) while
//! formatting rules are written against display names ("Heading 1",
//! "Source Code"). [`StyleSheet`] bridges the two.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Collection of styles from a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Style type
    pub style_type: StyleType,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current_style: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    match name.as_ref() {
                        b"style" => {
                            let mut builder = StyleBuilder::default();

                            if let Some(t) = get_attr(e, b"w:type") {
                                builder.style_type = Some(match t.as_str() {
                                    "character" => StyleType::Character,
                                    "table" => StyleType::Table,
                                    "numbering" => StyleType::Numbering,
                                    _ => StyleType::Paragraph,
                                });
                            }
                            builder.id = get_attr(e, b"w:styleId");
                            builder.is_default = matches!(
                                get_attr(e, b"w:default").as_deref(),
                                Some("1") | Some("true")
                            );

                            current_style = Some(builder);
                        }
                        b"name" => {
                            if let Some(style) = current_style.as_mut() {
                                style.name = get_attr(e, b"w:val");
                            }
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(builder) = current_style.take() {
                            let is_default = builder.is_default;
                            if let Some(style) = builder.build() {
                                if is_default && style.style_type == StyleType::Paragraph {
                                    stylesheet.default_paragraph = Some(style.id.clone());
                                }
                                stylesheet.styles.insert(style.id.clone(), style);
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(stylesheet)
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Number of known styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether the sheet has no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Display name for a paragraph's style reference.
    ///
    /// `None` means the paragraph has no `w:pStyle` and takes the default
    /// paragraph style ("Normal" when styles.xml does not say otherwise).
    /// Unknown IDs resolve to themselves.
    pub fn display_name(&self, style_id: Option<&str>) -> String {
        let id = match style_id.or(self.default_paragraph.as_deref()) {
            Some(id) => id,
            None => return "Normal".to_string(),
        };
        self.get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: Option<StyleType>,
    is_default: bool,
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            id: id.clone(),
            name: self.name.unwrap_or(id),
            style_type: self.style_type.unwrap_or(StyleType::Paragraph),
        })
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}

/// Heading level encoded in a style name.
///
/// Case and whitespace are ignored, so the built-in "heading 1", the UI
/// spelling "Heading 1" and the bare style ID "Heading1" all yield `Some(1)`.
pub fn heading_level_from_name(name: &str) -> Option<u8> {
    let normalized: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let digits = normalized.strip_prefix("heading")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u8>().ok().filter(|level| *level > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:outlineLvl w:val="0"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="SourceCode">
    <w:name w:val="Source Code"/>
    <w:basedOn w:val="Normal"/>
  </w:style>
  <w:style w:type="character" w:styleId="VerbatimChar">
    <w:name w:val="Verbatim Char"/>
  </w:style>
</w:styles>"#;

    #[test]
    fn test_parse_heading_style() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.default_paragraph.as_deref(), Some("Normal"));

        let h1 = sheet.get("Heading1").unwrap();
        assert_eq!(h1.name, "heading 1");
        assert_eq!(sheet.get("VerbatimChar").unwrap().style_type, StyleType::Character);
    }

    #[test]
    fn test_display_name_resolution() {
        let sheet = StyleSheet::parse(STYLES).unwrap();
        assert_eq!(sheet.display_name(Some("SourceCode")), "Source Code");
        assert_eq!(sheet.display_name(None), "Normal");
        assert_eq!(sheet.display_name(Some("FirstParagraph")), "FirstParagraph");

        let empty = StyleSheet::default();
        assert_eq!(empty.display_name(None), "Normal");
        assert_eq!(empty.display_name(Some("Heading2")), "Heading2");
    }

    #[test]
    fn test_heading_level_from_name() {
        assert_eq!(heading_level_from_name("heading 1"), Some(1));
        assert_eq!(heading_level_from_name("Heading 3"), Some(3));
        assert_eq!(heading_level_from_name("Heading4"), Some(4));
        assert_eq!(heading_level_from_name("Heading 0"), None);
        assert_eq!(heading_level_from_name("Heading"), None);
        assert_eq!(heading_level_from_name("Heading 1 Char"), None);
        assert_eq!(heading_level_from_name("Normal"), None);
    }
}
