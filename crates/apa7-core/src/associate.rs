//! Table label/title association
//!
//! Tables are free-floating in the body; the lines that name them are plain
//! paragraphs. Only the interleaved body order tells which paragraphs sit
//! right before a table, so this pass works on [`BodyChild`] and never on
//! the paragraph list alone. It runs after the paragraph pass and its
//! emphasis wins over whatever the role rules wrote.

use apa7_ooxml::{BodyChild, Document, ParagraphInfo};
use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::{is_table_label, Classified, Role};

/// What a paragraph preceding a table turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    /// "Table N": bold, upright, flush left
    Label,
    /// Descriptive title under the label: italic, not bold, flush left
    Title,
}

impl OverrideKind {
    /// (bold, italic) forced on every run
    pub fn emphasis(self) -> (bool, bool) {
        match self {
            OverrideKind::Label => (true, false),
            OverrideKind::Title => (false, true),
        }
    }
}

/// One label/title decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableOverride {
    /// Table position among body tables
    pub table: usize,
    /// Paragraph position among body paragraphs
    pub paragraph: usize,
    pub kind: OverrideKind,
}

/// For every table, the index of the last body paragraph before it
pub fn preceding_paragraphs(children: &[BodyChild]) -> Vec<Option<usize>> {
    let mut last_paragraph = None;
    let mut preceding = Vec::new();
    for child in children {
        match *child {
            BodyChild::Paragraph(index) => last_paragraph = Some(index),
            BodyChild::Table(_) => preceding.push(last_paragraph),
        }
    }
    preceding
}

/// Decide the label/title paragraphs of every table
pub fn associate(children: &[BodyChild], paragraphs: &[ParagraphInfo]) -> Vec<TableOverride> {
    let mut overrides = Vec::new();
    for (table, preceding) in preceding_paragraphs(children).into_iter().enumerate() {
        let Some(p) = preceding else {
            debug!(table, "table has no preceding paragraph");
            continue;
        };
        let Some(info) = paragraphs.get(p) else {
            warn!(table, paragraph = p, "preceding paragraph out of range");
            continue;
        };

        if is_table_label(&info.text) {
            overrides.push(TableOverride {
                table,
                paragraph: p,
                kind: OverrideKind::Label,
            });
        } else if p >= 1 && paragraphs.get(p - 1).is_some_and(|prev| is_table_label(&prev.text)) {
            overrides.push(TableOverride {
                table,
                paragraph: p - 1,
                kind: OverrideKind::Label,
            });
            overrides.push(TableOverride {
                table,
                paragraph: p,
                kind: OverrideKind::Title,
            });
        }
    }
    overrides
}

/// Write the overrides into the document; code blocks are left alone.
///
/// Returns how many paragraphs were changed.
pub fn apply_overrides(
    document: &mut Document,
    overrides: &[TableOverride],
    classified: &[Classified],
) -> usize {
    let mut applied = 0;
    for o in overrides {
        let protected = classified
            .get(o.paragraph)
            .is_some_and(|c| c.role == Role::CodeBlock);
        if protected {
            debug!(paragraph = o.paragraph, "skipping code block next to table");
            continue;
        }
        let Some(mut paragraph) = document.paragraph_mut(o.paragraph) else {
            warn!(paragraph = o.paragraph, "override target missing");
            continue;
        };
        let (bold, italic) = o.kind.emphasis();
        paragraph.set_emphasis(Some(bold), Some(italic));
        paragraph.clear_indent();
        debug!(table = o.table, paragraph = o.paragraph, kind = ?o.kind, "table caption override");
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SectionKind;
    use apa7_ooxml::BodyChild::{Paragraph as P, Table as T};

    fn infos(texts: &[&str]) -> Vec<ParagraphInfo> {
        texts
            .iter()
            .enumerate()
            .map(|(index, text)| ParagraphInfo {
                index,
                style_name: "Normal".to_string(),
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_preceding_paragraphs() {
        assert_eq!(
            preceding_paragraphs(&[T(0), P(0), P(1), T(1), T(2), P(2)]),
            vec![None, Some(1), Some(1)]
        );
        assert!(preceding_paragraphs(&[P(0)]).is_empty());
    }

    #[test]
    fn test_label_and_title() {
        let paragraphs = infos(&["Intro", "Table 1", "Descriptive caption text"]);
        let overrides = associate(&[P(0), P(1), P(2), T(0)], &paragraphs);
        assert_eq!(
            overrides,
            vec![
                TableOverride { table: 0, paragraph: 1, kind: OverrideKind::Label },
                TableOverride { table: 0, paragraph: 2, kind: OverrideKind::Title },
            ]
        );
    }

    #[test]
    fn test_label_directly_before_table() {
        let paragraphs = infos(&["Table 2", "figure 3"]);
        let overrides = associate(&[P(0), P(1), T(0)], &paragraphs);
        assert_eq!(
            overrides,
            vec![TableOverride { table: 0, paragraph: 1, kind: OverrideKind::Label }]
        );
    }

    #[test]
    fn test_no_label_no_override() {
        let paragraphs = infos(&["Some text", "More text"]);
        assert!(associate(&[P(0), P(1), T(0)], &paragraphs).is_empty());
        assert!(associate(&[T(0), P(0)], &paragraphs).is_empty());
        // Paragraph index beyond the snapshot
        assert!(associate(&[P(5), T(0)], &paragraphs).is_empty());
    }

    #[test]
    fn test_apply_overrides_skips_code_blocks() {
        let xml = format!(
            r#"<w:document xmlns:w="{}"><w:body>
<w:p><w:pPr><w:ind w:firstLine="720"/></w:pPr><w:r><w:rPr><w:i/></w:rPr><w:t>Table 1</w:t></w:r></w:p>
<w:p><w:r><w:t>Caption</w:t></w:r></w:p>
<w:tbl/></w:body></w:document>"#,
            apa7_ooxml::document::W_NS
        );
        let mut document = Document::parse(xml.as_bytes()).unwrap();
        let overrides = vec![
            TableOverride { table: 0, paragraph: 0, kind: OverrideKind::Label },
            TableOverride { table: 0, paragraph: 1, kind: OverrideKind::Title },
        ];
        let classified = vec![
            Classified { index: 0, role: Role::BodyNoIndent, section: SectionKind::Body },
            Classified { index: 1, role: Role::CodeBlock, section: SectionKind::Body },
        ];
        assert_eq!(apply_overrides(&mut document, &overrides, &classified), 1);

        let mut label = document.paragraph_mut(0).unwrap();
        assert!(!label.element().child("pPr").unwrap().has_child("ind"));
        let runs = label.runs();
        assert_eq!(runs[0].bold(), Some(true));
        assert_eq!(runs[0].italic(), Some(false));
        drop(runs);

        let title = document.paragraph_mut(1).unwrap();
        assert!(!title.element().has_child("pPr"));
    }
}
