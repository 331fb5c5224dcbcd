//! # apa7-ooxml
//!
//! Lossless WordprocessingML access for apa7.
//!
//! This crate provides functionality to:
//! - Unpack and repack DOCX files without disturbing parts it does not touch
//! - Resolve paragraph style IDs to display names
//! - Walk the body as paragraphs, tables and sections, in true body order
//! - Write low-level formatting primitives (spacing, indents, fonts, borders,
//!   field codes) straight into the property trees
//!
//! ## Example: Double-spacing every paragraph
//!
//! ```no_run
//! use apa7_ooxml::{LineSpacing, WordPackage};
//!
//! let mut package = WordPackage::open("paper.docx")?;
//! for mut paragraph in package.document.paragraphs_mut() {
//!     paragraph.set_spacing(LineSpacing::Double, 0.0, 0.0);
//! }
//! package.save("paper-formatted.docx")?;
//! # Ok::<(), apa7_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod document;
pub mod error;
pub mod header;
pub mod package;
pub mod properties;
pub mod relationships;
pub mod styles;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod xml;

pub use archive::OoxmlArchive;
pub use document::{
    BodyChild, Document, Paragraph, ParagraphInfo, Run, Section, Table, TableCell, TableRow,
};
pub use error::{OoxmlError, Result};
pub use header::HeaderPart;
pub use package::WordPackage;
pub use properties::{
    inches_to_twips, points_to_twips, Border, BorderSide, BorderStyle, Justification,
    LineSpacing, HALF_INCH, TWIPS_PER_INCH,
};
pub use relationships::Relationships;
pub use styles::{heading_level_from_name, Style, StyleSheet, StyleType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
