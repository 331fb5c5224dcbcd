//! Role to formatting action mapping
//!
//! [`RuleTable::action`] is a pure lookup. [`RuleTable::apply`] writes an
//! action into a paragraph through the property primitives in
//! `apa7_ooxml::properties`; every step replaces what it owns, so applying
//! an action twice is the same as applying it once.

use apa7_ooxml::{Justification, LineSpacing, Paragraph, ParagraphInfo, HALF_INCH};
use tracing::debug;

use crate::classify::{keywords_split, Classified, Role};
use crate::config::FormatConfig;

/// First-line treatment of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSpec {
    /// No indent node at all
    None,
    /// 0.5in first-line indent
    FirstLine,
    /// 0.5in left indent with a 0.5in hanging first line
    Hanging,
}

/// Run-level emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Leave bold/italic as authored
    Unchanged,
    /// Force both toggles on every run
    Set { bold: bool, italic: bool },
    /// "Keywords:" run bold italic, remainder italic only
    KeywordsSplit,
}

/// Everything a role dictates about a paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct FormattingAction {
    pub font: String,
    pub size_pt: f32,
    pub alignment: Justification,
    pub spacing: LineSpacing,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    pub indent: IndentSpec,
    pub emphasis: Emphasis,
    /// Headings drop any inherited underline
    pub clear_underline: bool,
}

/// Role to action lookup
#[derive(Debug, Clone)]
pub struct RuleTable {
    font: String,
    size_pt: f32,
}

impl RuleTable {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            font: config.body_font.clone(),
            size_pt: config.body_size_pt,
        }
    }

    /// The action for a role; `None` for roles that are never touched
    pub fn action(&self, role: Role) -> Option<FormattingAction> {
        let (alignment, indent, emphasis) = match role {
            Role::Heading { level: 1 } => (
                Justification::Center,
                IndentSpec::None,
                Emphasis::Set { bold: true, italic: false },
            ),
            Role::Heading { level: 2 } => (
                Justification::Left,
                IndentSpec::None,
                Emphasis::Set { bold: true, italic: false },
            ),
            Role::Heading { level: 3 } => (
                Justification::Left,
                IndentSpec::None,
                Emphasis::Set { bold: true, italic: true },
            ),
            Role::Heading { .. } => (
                Justification::Left,
                IndentSpec::FirstLine,
                Emphasis::Set { bold: false, italic: true },
            ),
            Role::AbstractBody | Role::BodyNoIndent => {
                (Justification::Left, IndentSpec::None, Emphasis::Unchanged)
            }
            Role::BodyIndented => (Justification::Left, IndentSpec::FirstLine, Emphasis::Unchanged),
            Role::ReferenceEntry => (Justification::Left, IndentSpec::Hanging, Emphasis::Unchanged),
            Role::Keywords => (Justification::Left, IndentSpec::None, Emphasis::KeywordsSplit),
            Role::CodeBlock | Role::Empty => return None,
        };
        Some(FormattingAction {
            font: self.font.clone(),
            size_pt: self.size_pt,
            alignment,
            spacing: LineSpacing::Double,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            indent,
            emphasis,
            clear_underline: matches!(role, Role::Heading { .. }),
        })
    }

    /// Write the role's action into a paragraph; returns whether anything
    /// was applied
    pub fn apply(&self, paragraph: &mut Paragraph<'_>, role: Role) -> bool {
        match self.action(role) {
            Some(action) => {
                apply_action(paragraph, &action);
                true
            }
            None => false,
        }
    }
}

/// Turn running-text lines that start with "Keywords:" into [`Role::Keywords`]
pub fn refine(classified: &[Classified], paragraphs: &[ParagraphInfo]) -> Vec<Classified> {
    classified
        .iter()
        .zip(paragraphs)
        .map(|(c, p)| {
            let running_text = matches!(
                c.role,
                Role::AbstractBody | Role::BodyIndented | Role::BodyNoIndent | Role::ReferenceEntry
            );
            if running_text && keywords_split(&p.text).is_some() {
                debug!(index = c.index, "keywords line");
                Classified {
                    role: Role::Keywords,
                    ..*c
                }
            } else {
                *c
            }
        })
        .collect()
}

fn apply_action(paragraph: &mut Paragraph<'_>, action: &FormattingAction) {
    if action.emphasis == Emphasis::KeywordsSplit {
        split_keywords(paragraph);
    }

    paragraph.set_default_font(&action.font, action.size_pt);
    paragraph.set_spacing(action.spacing, action.space_before_pt, action.space_after_pt);
    match action.indent {
        IndentSpec::None => paragraph.clear_indent(),
        IndentSpec::FirstLine => paragraph.set_indent(HALF_INCH, 0),
        IndentSpec::Hanging => paragraph.set_indent(-HALF_INCH, HALF_INCH),
    }
    paragraph.set_alignment(action.alignment);

    match action.emphasis {
        Emphasis::Unchanged => {}
        Emphasis::Set { bold, italic } => paragraph.set_emphasis(Some(bold), Some(italic)),
        Emphasis::KeywordsSplit => {
            for (i, mut run) in paragraph.runs().into_iter().enumerate() {
                run.set_bold(i == 0);
                run.set_italic(true);
            }
        }
    }
    if action.clear_underline {
        for mut run in paragraph.runs() {
            run.clear_underline();
        }
    }
    paragraph.clear_shading();
}

/// Split the label off the plain runs that open the line. Hyperlinks and
/// tracked changes further along are kept whole.
fn split_keywords(paragraph: &mut Paragraph<'_>) {
    let text = paragraph.leading_text();
    let Some(at) = keywords_split(&text) else {
        return;
    };
    let (label, rest) = text.split_at(at);
    if rest.is_empty() {
        paragraph.split_into_runs(&[label]);
    } else {
        paragraph.split_into_runs(&[label, rest]);
    }
}
