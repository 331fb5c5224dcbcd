//! Paragraph role classification
//!
//! A single forward pass over the body paragraphs. Each paragraph's role is
//! a function of its own style and text plus a small [`ClassificationState`]
//! carried over from the paragraphs before it; nothing after the paragraph
//! is ever consulted.
//!
//! Text patterns are shallow heuristics. A body paragraph that merely starts
//! with "Table 5 was used..." is taken for a table label.

use std::fmt;
use std::sync::OnceLock;

use apa7_ooxml::{heading_level_from_name, ParagraphInfo};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::{FormatConfig, HeadingScheme};

/// Major part of the paper a paragraph belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Abstract,
    #[default]
    Body,
    References,
}

/// Semantic category of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// APA heading level (1-based)
    Heading { level: u8 },
    /// Running text in the abstract
    AbstractBody,
    /// Body paragraph with a 0.5in first-line indent
    BodyIndented,
    /// Body paragraph flush left (after a heading, labels, notes)
    BodyNoIndent,
    /// Reference list entry (hanging indent)
    ReferenceEntry,
    /// "Keywords:" line with split emphasis
    Keywords,
    /// Code or verbatim block, never touched
    CodeBlock,
    /// Blank paragraph, never touched
    Empty,
}

impl Role {
    /// Whether any formatting is applied for this role
    pub fn is_formatted(self) -> bool {
        !matches!(self, Role::CodeBlock | Role::Empty)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Heading { level } => write!(f, "heading-{}", level),
            Role::AbstractBody => write!(f, "abstract-body"),
            Role::BodyIndented => write!(f, "body-indented"),
            Role::BodyNoIndent => write!(f, "body-no-indent"),
            Role::ReferenceEntry => write!(f, "reference-entry"),
            Role::Keywords => write!(f, "keywords"),
            Role::CodeBlock => write!(f, "code-block"),
            Role::Empty => write!(f, "empty"),
        }
    }
}

/// State threaded through the forward pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassificationState {
    pub section: SectionKind,
    pub previous_was_heading: bool,
    pub previous_was_table_label: bool,
}

/// Classification result for one paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    /// Position among body paragraphs
    pub index: usize,
    pub role: Role,
    /// Section the paragraph was classified in
    pub section: SectionKind,
}

fn table_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Table|Figure)\s+\d+").unwrap())
}

fn label_like_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Table|Figure)\s+\d+|^Note\.|^Keywords?:").unwrap())
}

fn keywords_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*Keywords?:").unwrap())
}

/// "Table N" / "Figure N" label line
pub fn is_table_label(text: &str) -> bool {
    table_label_re().is_match(text.trim())
}

/// Lines that never get a first-line indent: labels, notes, keywords
pub fn is_label_like(text: &str) -> bool {
    label_like_re().is_match(text.trim())
}

/// Byte offset just past the leading "Keywords:" token, if the line has one
pub fn keywords_split(text: &str) -> Option<usize> {
    keywords_re().find(text).map(|m| m.end())
}

/// The forward-pass classifier
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    code_keywords: Vec<String>,
    heading_scheme: HeadingScheme,
    max_heading_level: u8,
}

impl RoleClassifier {
    /// Build a classifier from the formatting configuration
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            code_keywords: config
                .code_style_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            heading_scheme: config.heading_scheme,
            max_heading_level: config.max_heading_level,
        }
    }

    /// Whether a style name marks code or verbatim text
    pub fn is_code_style(&self, style_name: &str) -> bool {
        let lower = style_name.to_lowercase();
        self.code_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// APA heading level for a style name, after the heading scheme and
    /// clamping to the deepest supported level
    pub fn heading_level(&self, style_name: &str) -> Option<u8> {
        let style_level = heading_level_from_name(style_name)?;
        let level = match self.heading_scheme {
            HeadingScheme::Direct => style_level,
            // Heading 1 is the paper title, laid out like level 1
            HeadingScheme::TitleOffset => style_level.saturating_sub(1).max(1),
        };
        Some(level.min(self.max_heading_level))
    }

    /// Classify one paragraph given the state left by its predecessors
    pub fn step(
        &self,
        state: ClassificationState,
        paragraph: &ParagraphInfo,
    ) -> (Role, ClassificationState) {
        let text = paragraph.text.trim();

        if self.is_code_style(&paragraph.style_name) {
            let next = ClassificationState {
                previous_was_heading: false,
                previous_was_table_label: false,
                ..state
            };
            return (Role::CodeBlock, next);
        }

        if let Some(level) = self.heading_level(&paragraph.style_name) {
            let section = match text.to_lowercase().as_str() {
                "abstract" => SectionKind::Abstract,
                "references" => SectionKind::References,
                _ => SectionKind::Body,
            };
            let next = ClassificationState {
                section,
                previous_was_heading: true,
                previous_was_table_label: false,
            };
            return (Role::Heading { level }, next);
        }

        if text.is_empty() {
            let next = ClassificationState {
                previous_was_heading: false,
                previous_was_table_label: false,
                ..state
            };
            return (Role::Empty, next);
        }

        let mut next = ClassificationState {
            previous_was_heading: false,
            ..state
        };
        let role = match state.section {
            SectionKind::References => Role::ReferenceEntry,
            SectionKind::Abstract => Role::AbstractBody,
            SectionKind::Body => {
                next.previous_was_table_label = is_table_label(text);
                if state.previous_was_heading
                    || state.previous_was_table_label
                    || is_label_like(text)
                {
                    Role::BodyNoIndent
                } else {
                    Role::BodyIndented
                }
            }
        };
        (role, next)
    }

    /// Classify every paragraph, in order, starting from the default state
    pub fn classify(&self, paragraphs: &[ParagraphInfo]) -> Vec<Classified> {
        paragraphs
            .iter()
            .scan(ClassificationState::default(), |state, paragraph| {
                let (role, next) = self.step(*state, paragraph);
                *state = next;
                debug!(
                    index = paragraph.index,
                    style = %paragraph.style_name,
                    %role,
                    "classified paragraph"
                );
                Some(Classified {
                    index: paragraph.index,
                    role,
                    section: next.section,
                })
            })
            .collect()
    }
}
