//! apa7-core - APA 7 formatting for generated Word documents
//!
//! Takes a DOCX produced by a converter (Pandoc, typically) and rewrites its
//! paragraph and table formatting to the APA 7 student-paper layout.
//!
//! Each body paragraph gets a [`Role`] from a single forward pass
//! ([`RoleClassifier`]); each role maps to a fixed formatting action
//! ([`RuleTable`]). Lines introducing a table are then re-emphasised as
//! label and title, and every table is reduced to three horizontal rules.
//!
//! # Example
//!
//! ```
//! use apa7_core::{Formatter, Role};
//! use apa7_ooxml::test_utils::styled_docx;
//!
//! let input = styled_docx(concat!(
//!     r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Method</w:t></w:r></w:p>"#,
//!     r#"<w:p><w:r><w:t>We asked participants to wait.</w:t></w:r></w:p>"#,
//! ));
//!
//! let (output, report) = Formatter::default().format_bytes(&input)?;
//! assert_eq!(report.count_role(Role::Heading { level: 1 }), 1);
//! assert!(!output.is_empty());
//! # Ok::<(), apa7_core::FormatError>(())
//! ```

pub mod associate;
pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod rules;
pub mod tables;

// Re-export main types and functions
pub use associate::{associate, OverrideKind, TableOverride};
pub use classify::{ClassificationState, Classified, Role, RoleClassifier, SectionKind};
pub use config::{FormatConfig, HeadingScheme, TableConfig};
pub use error::{FormatError, Result};
pub use pipeline::{FormatReport, Formatter, ParagraphReport};
pub use rules::{FormattingAction, RuleTable};
pub use tables::TableFormatter;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.3.0");
    }
}
