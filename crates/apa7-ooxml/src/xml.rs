//! Lossless mutable XML tree for OOXML parts
//!
//! The typed readers elsewhere in the ecosystem stream events into builders
//! and throw away what they do not understand. Formatting a document in
//! place needs the opposite: every element, attribute and text node must
//! survive a parse/serialize round trip so that only the touched property
//! nodes change. This module keeps the whole part as a tree of [`Element`]s.
//!
//! Names are stored qualified (`w:p`) exactly as they appear in the part.
//! Lookups go by local name, so a document that binds the WordprocessingML
//! namespace to an unusual prefix still matches.

use std::borrow::Cow;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{OoxmlError, Result};

/// A node in the element tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A child element
    Element(Element),
    /// Character data (stored unescaped)
    Text(String),
    /// A CDATA section
    CData(String),
    /// A comment (stored as written)
    Comment(String),
}

impl Node {
    /// Borrow the element, if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrow the element, if this node is one
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    /// Qualified name (e.g. `w:p`)
    pub name: String,
    /// Attributes in document order, qualified keys, unescaped values
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<Node>,
}

/// Strip the namespace prefix from a qualified name
pub fn local_part(name: &str) -> &str {
    match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child appender
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text appender
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Local name without namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Check the local name
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Get an attribute value by local name (namespace declarations excluded)
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| !is_namespace_decl(k) && local_part(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Get an attribute value by its exact qualified key
    pub fn attr_exact(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any attribute with the same local name
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let local = local_part(&key).to_string();
        let existing = if is_namespace_decl(&key) {
            self.attributes.iter_mut().find(|(k, _)| *k == key)
        } else {
            self.attributes
                .iter_mut()
                .find(|(k, _)| !is_namespace_decl(k) && local_part(k) == local)
        };
        match existing {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Remove every attribute except namespace declarations
    pub fn clear_attrs(&mut self) {
        self.attributes.retain(|(k, _)| is_namespace_decl(k));
    }

    /// Iterate child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate child elements mutably
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First child element with the given local name
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(local))
    }

    /// First child element with the given local name, mutably
    pub fn child_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.elements_mut().find(|el| el.is(local))
    }

    /// Whether a child element with the given local name exists
    pub fn has_child(&self, local: &str) -> bool {
        self.child(local).is_some()
    }

    /// Get the child with the qualified `name`, inserting an empty one if absent.
    ///
    /// New children are placed according to `order`, a schema sequence of
    /// local names: the child goes before the first existing sibling that
    /// appears later in the sequence. Names missing from `order` sort last.
    pub fn child_or_insert(&mut self, name: &str, order: &[&str]) -> &mut Element {
        let local = local_part(name);
        let idx = match self.child_index(local) {
            Some(idx) => idx,
            None => {
                let at = self.insertion_index(local, order);
                self.children.insert(at, Node::Element(Element::new(name)));
                at
            }
        };
        match &mut self.children[idx] {
            Node::Element(el) => el,
            _ => unreachable!("child index always addresses an element"),
        }
    }

    /// Insert `child`, replacing any existing child with the same local name.
    ///
    /// Placement follows the same schema `order` rule as
    /// [`child_or_insert`](Self::child_or_insert).
    pub fn replace_child(&mut self, child: Element, order: &[&str]) {
        let local = child.local_name().to_string();
        self.remove_children(&local);
        let at = self.insertion_index(&local, order);
        self.children.insert(at, Node::Element(child));
    }

    /// Append a child element
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Remove direct children with the given local name, returning how many went
    pub fn remove_children(&mut self, local: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(el) if el.is(local)));
        before - self.children.len()
    }

    /// Remove every descendant with the given local name, at any depth
    pub fn remove_descendants(&mut self, local: &str) -> usize {
        let mut removed = self.remove_children(local);
        for child in self.elements_mut() {
            removed += child.remove_descendants(local);
        }
        removed
    }

    /// Count descendants with the given local name
    pub fn count_descendants(&self, local: &str) -> usize {
        self.elements()
            .map(|el| usize::from(el.is(local)) + el.count_descendants(local))
            .sum()
    }

    /// Concatenated character data of this element's own text nodes
    pub fn own_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn child_index(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, Node::Element(el) if el.is(local)))
    }

    fn insertion_index(&self, local: &str, order: &[&str]) -> usize {
        let rank = |name: &str| order.iter().position(|o| *o == name).unwrap_or(order.len());
        let wanted = rank(local);
        self.children
            .iter()
            .position(|node| match node {
                Node::Element(el) => rank(el.local_name()) > wanted,
                _ => false,
            })
            .unwrap_or(self.children.len())
    }
}

fn is_namespace_decl(key: &str) -> bool {
    key == "xmlns" || key.starts_with("xmlns:")
}

/// A parsed XML part: optional declaration plus a single root element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Whether the part carried an XML declaration
    pub has_declaration: bool,
    /// `standalone` value of the declaration, if any
    pub standalone: Option<String>,
    /// Comments that precede the root element
    pub prolog: Vec<Node>,
    /// The root element
    pub root: Element,
}

impl XmlDocument {
    /// Wrap a root element with a standard `standalone="yes"` declaration
    pub fn new(root: Element) -> Self {
        Self {
            has_declaration: true,
            standalone: Some("yes".to_string()),
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse a part from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Whitespace inside w:t is content
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut prolog = Vec::new();
        let mut has_declaration = false;
        let mut standalone = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Decl(ref decl)) => {
                    has_declaration = true;
                    standalone = decl
                        .standalone()
                        .and_then(|s| s.ok())
                        .map(|s| String::from_utf8_lossy(&s).into_owned());
                }
                Ok(Event::Start(ref e)) => {
                    stack.push(element_from_start(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    let el = element_from_start(e)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::End(_)) => {
                    let el = stack.pop().ok_or_else(|| {
                        OoxmlError::InvalidStructure("unbalanced end tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e.unescape().map_err(quick_xml::Error::from)?;
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e).into_owned();
                        parent.children.push(Node::CData(text));
                    }
                }
                Ok(Event::Comment(ref e)) => {
                    let text = String::from_utf8_lossy(e).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Comment(text)),
                        None if root.is_none() => prolog.push(Node::Comment(text)),
                        None => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                // Processing instructions and doctypes carry nothing for WordprocessingML parts
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(OoxmlError::InvalidStructure(format!(
                "unclosed element <{}>",
                stack.last().map(|el| el.name.as_str()).unwrap_or_default()
            )));
        }
        let root = root
            .ok_or_else(|| OoxmlError::InvalidStructure("part has no root element".to_string()))?;

        Ok(Self {
            has_declaration,
            standalone,
            prolog,
            root,
        })
    }

    /// Serialize back to XML bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        if self.has_declaration {
            writer.write_event(Event::Decl(BytesDecl::new(
                "1.0",
                Some("UTF-8"),
                self.standalone.as_deref(),
            )))?;
            writer.get_mut().extend_from_slice(b"\r\n");
        }
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => {
            return Err(OoxmlError::InvalidStructure(format!(
                "second root element <{}>",
                el.name
            )))
        }
    }
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    match node {
        Node::Element(el) => write_element(writer, el)?,
        Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        Node::CData(text) => {
            writer.write_event(Event::CData(BytesCData::new(Cow::Borrowed(text.as_str()))))?
        }
        Node::Comment(text) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, el: &Element) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if el.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    for child in &el.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t xml:space="preserve"> A &amp; B </w:t></w:r></w:p><!-- keep --></w:body></w:document>"#;

    #[test]
    fn test_parse_keeps_structure() {
        let doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        assert!(doc.has_declaration);
        assert_eq!(doc.standalone.as_deref(), Some("yes"));
        assert_eq!(doc.root.name, "w:document");

        let body = doc.root.child("body").unwrap();
        let t = body
            .child("p")
            .and_then(|p| p.child("r"))
            .and_then(|r| r.child("t"))
            .unwrap();
        assert_eq!(t.own_text(), " A & B ");
        assert_eq!(t.attr("space"), Some("preserve"));
        assert!(matches!(body.children.last(), Some(Node::Comment(c)) if c == " keep "));
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let doc = XmlDocument::parse(SAMPLE.as_bytes()).unwrap();
        let first = doc.to_bytes().unwrap();
        let again = XmlDocument::parse(&first).unwrap();
        assert_eq!(doc, again);
        assert_eq!(first, again.to_bytes().unwrap());

        let text = String::from_utf8(first).unwrap();
        assert!(text.contains("A &amp; B"));
        assert!(text.contains("<!-- keep -->"));
    }

    #[test]
    fn test_attribute_lookup_ignores_prefix_and_namespaces() {
        let mut el = Element::new("w:spacing")
            .with_attr("xmlns:w", "urn:test")
            .with_attr("w:line", "240");
        assert_eq!(el.attr("line"), Some("240"));
        assert_eq!(el.attr("w"), None);

        el.set_attr("w:line", "480");
        assert_eq!(el.attr("line"), Some("480"));
        assert_eq!(el.attributes.len(), 2);

        el.clear_attrs();
        assert_eq!(el.attributes, vec![("xmlns:w".to_string(), "urn:test".to_string())]);
    }

    #[test]
    fn test_child_or_insert_respects_schema_order() {
        const ORDER: &[&str] = &["pStyle", "spacing", "ind", "jc", "rPr"];
        let mut ppr = Element::new("w:pPr")
            .with_child(Element::new("w:pStyle"))
            .with_child(Element::new("w:rPr"));

        ppr.child_or_insert("w:jc", ORDER).set_attr("w:val", "center");
        ppr.child_or_insert("w:spacing", ORDER);
        ppr.child_or_insert("w:jc", ORDER).set_attr("w:val", "left");

        let names: Vec<_> = ppr.elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["pStyle", "spacing", "jc", "rPr"]);
        assert_eq!(ppr.child("jc").unwrap().attr("val"), Some("left"));
    }

    #[test]
    fn test_remove_descendants() {
        let doc = XmlDocument::parse(
            br#"<r><bookmarkStart/><p><bookmarkStart/><x><bookmarkEnd/></x></p></r>"#,
        )
        .unwrap();
        let mut root = doc.root;
        assert_eq!(root.count_descendants("bookmarkStart"), 2);
        assert_eq!(root.remove_descendants("bookmarkStart"), 2);
        assert_eq!(root.remove_descendants("bookmarkEnd"), 1);
        assert_eq!(root.count_descendants("bookmarkStart"), 0);
        assert!(root.child("p").unwrap().child("x").unwrap().children.is_empty());
    }

    #[test]
    fn test_parse_rejects_unclosed() {
        assert!(XmlDocument::parse(b"<a><b></b>").is_err());
        assert!(XmlDocument::parse(b"").is_err());
    }
}
