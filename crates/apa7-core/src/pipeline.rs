//! The formatting pipeline
//!
//! Passes run in a fixed order over one [`WordPackage`]:
//!
//! 1. page margins on every section
//! 2. classification, keywords refinement and role rules over all paragraphs
//! 3. table label/title overrides (last write wins over pass 2)
//! 4. table borders and cell text
//! 5. bookmark cleanup
//! 6. the page number field, when enabled
//!
//! Saving is left to the caller of [`Formatter::format_package`]; the file
//! and byte entry points save after the last pass. An input that fails to
//! load is rejected before anything is written.

use std::path::Path;

use apa7_ooxml::{inches_to_twips, WordPackage};
use serde::Serialize;
use tracing::info;

use crate::associate::{apply_overrides, associate, TableOverride};
use crate::classify::{Role, RoleClassifier, SectionKind};
use crate::config::FormatConfig;
use crate::error::Result;
use crate::layout;
use crate::rules::{refine, RuleTable};
use crate::tables::TableFormatter;

const PREVIEW_CHARS: usize = 40;

/// Role decision for one paragraph, as reported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphReport {
    pub index: usize,
    pub role: String,
    pub section: SectionKind,
    /// Leading characters of the paragraph text
    pub preview: String,
}

/// What a pipeline run did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormatReport {
    pub paragraphs: Vec<ParagraphReport>,
    /// Paragraphs that received a formatting action
    pub paragraphs_formatted: usize,
    pub tables_formatted: usize,
    /// Label/title decisions, including any skipped for code blocks
    pub overrides: Vec<TableOverride>,
    pub overrides_applied: usize,
    pub sections_updated: usize,
    pub bookmarks_removed: usize,
    pub page_number_inserted: bool,
    /// Things the tool cannot do and the author still has to
    pub manual_steps: Vec<String>,
}

impl FormatReport {
    /// Number of paragraphs classified with `role`
    pub fn count_role(&self, role: Role) -> usize {
        let name = role.to_string();
        self.paragraphs.iter().filter(|p| p.role == name).count()
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs every pass with one configuration
#[derive(Debug, Clone)]
pub struct Formatter {
    config: FormatConfig,
    classifier: RoleClassifier,
    rules: RuleTable,
    tables: TableFormatter,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(FormatConfig::default())
    }
}

impl Formatter {
    pub fn new(config: FormatConfig) -> Self {
        Self {
            classifier: RoleClassifier::new(&config),
            rules: RuleTable::new(&config),
            tables: TableFormatter::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Run every pass over an open package, in place
    pub fn format_package(&self, package: &mut WordPackage) -> Result<FormatReport> {
        let mut report = FormatReport::default();

        // 1. margins
        let margin = inches_to_twips(self.config.margin_in);
        report.sections_updated = layout::set_page_margins(&mut package.document, margin);
        info!(sections = report.sections_updated, margin, "margins set");

        // 2. paragraph roles
        let infos = package.document.paragraph_infos(&package.styles);
        let classified = refine(&self.classifier.classify(&infos), &infos);
        for (mut paragraph, c) in package.document.paragraphs_mut().zip(&classified) {
            if self.rules.apply(&mut paragraph, c.role) {
                report.paragraphs_formatted += 1;
            }
        }
        report.paragraphs = classified
            .iter()
            .zip(&infos)
            .map(|(c, p)| ParagraphReport {
                index: c.index,
                role: c.role.to_string(),
                section: c.section,
                preview: p.text.trim().chars().take(PREVIEW_CHARS).collect(),
            })
            .collect();
        info!(
            paragraphs = infos.len(),
            formatted = report.paragraphs_formatted,
            "paragraph pass done"
        );

        // 3. table captions
        let children = package.document.body_children();
        report.overrides = associate(&children, &infos);
        report.overrides_applied =
            apply_overrides(&mut package.document, &report.overrides, &classified);
        info!(applied = report.overrides_applied, "table caption overrides");

        // 4. tables
        for mut table in package.document.tables_mut() {
            self.tables.format(&mut table);
            report.tables_formatted += 1;
        }
        info!(tables = report.tables_formatted, "tables formatted");

        // 5. cleanup
        if self.config.strip_bookmarks {
            report.bookmarks_removed = layout::strip_bookmarks(&mut package.document);
            info!(removed = report.bookmarks_removed, "bookmarks stripped");
        }

        // 6. page numbers
        if self.config.page_numbers {
            layout::insert_page_number(package, &self.config.body_font, self.config.body_size_pt)?;
            report.page_number_inserted = true;
            info!("page number field inserted");
        }

        report.manual_steps = manual_steps(&report);
        Ok(report)
    }

    /// Format DOCX bytes, returning the new bytes
    pub fn format_bytes(&self, bytes: &[u8]) -> Result<(Vec<u8>, FormatReport)> {
        let mut package = WordPackage::from_bytes(bytes)?;
        let report = self.format_package(&mut package)?;
        Ok((package.to_bytes()?, report))
    }

    /// Format `input` and save the result to `output`
    pub fn format_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<FormatReport> {
        let mut package = WordPackage::open(input)?;
        let report = self.format_package(&mut package)?;
        package.save(output)?;
        Ok(report)
    }
}

fn manual_steps(report: &FormatReport) -> Vec<String> {
    let mut steps = vec![
        "Add the title page: title, author, affiliation, course, instructor, due date".to_string(),
        "Check figure labels (bold \"Figure N\") and titles (italic) above each figure".to_string(),
        "Check that table and figure notes start with an italic \"Note.\"".to_string(),
    ];
    if !report.page_number_inserted {
        steps.push(
            "Insert page numbers in the top right corner of every page (or rerun with --page-numbers)"
                .to_string(),
        );
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use apa7_ooxml::test_utils::{extract_document_xml, styled_docx};

    #[test]
    fn test_report_roles_and_counts() {
        let bytes = styled_docx(concat!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Method</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>First paragraph of the method section, long enough to preview.</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="SourceCode"/></w:pPr><w:r><w:t>let x = 1;</w:t></w:r></w:p>"#,
            r#"<w:sectPr/>"#
        ));
        let (_, report) = Formatter::default().format_bytes(&bytes).unwrap();

        let roles: Vec<_> = report.paragraphs.iter().map(|p| p.role.as_str()).collect();
        assert_eq!(roles, ["heading-1", "body-no-indent", "empty", "code-block"]);
        assert_eq!(report.paragraphs_formatted, 2);
        assert_eq!(report.sections_updated, 1);
        assert_eq!(report.count_role(Role::Empty), 1);
        assert_eq!(report.paragraphs[1].preview.chars().count(), PREVIEW_CHARS);
        assert!(!report.page_number_inserted);
        assert_eq!(report.manual_steps.len(), 4);
    }

    #[test]
    fn test_report_json() {
        let (_, report) = Formatter::default()
            .format_bytes(&styled_docx("<w:p><w:r><w:t>Text</w:t></w:r></w:p>"))
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["paragraphs"][0]["role"], "body-indented");
        assert_eq!(json["paragraphs"][0]["section"], "body");
        assert_eq!(json["page_number_inserted"], false);
    }

    #[test]
    fn test_format_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("paper.docx");
        let output = dir.path().join("paper-apa.docx");
        std::fs::write(&input, styled_docx("<w:p><w:r><w:t>Text</w:t></w:r></w:p>")).unwrap();

        let report = Formatter::default().format_file(&input, &output).unwrap();
        assert_eq!(report.paragraphs_formatted, 1);
        let xml = extract_document_xml(&std::fs::read(&output).unwrap());
        assert!(xml.contains(r#"w:line="480""#));

        let missing = Formatter::default().format_file(dir.path().join("nope.docx"), &output);
        assert!(missing.is_err());
    }

    #[test]
    fn test_disabled_passes_leave_content_alone() {
        let config = FormatConfig {
            strip_bookmarks: false,
            ..FormatConfig::default()
        };
        let bytes = styled_docx(
            r#"<w:p><w:bookmarkStart w:id="0" w:name="x"/><w:r><w:t>Text</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
        );
        let (out, report) = Formatter::new(config).format_bytes(&bytes).unwrap();
        assert_eq!(report.bookmarks_removed, 0);
        assert!(extract_document_xml(&out).contains("w:bookmarkStart"));
    }
}
