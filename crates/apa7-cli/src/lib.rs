//! apa7 CLI - Command-line interface library
//!
//! Formats one DOCX file into another:
//!
//! ```bash
//! # Defaults: Times New Roman 12pt, 1in margins, four heading levels
//! apa7 paper.docx paper-apa.docx
//!
//! # Page numbers, Heading 1 used for the paper title, JSON report
//! apa7 paper.docx paper-apa.docx --page-numbers --heading-scheme title-offset --report
//! ```
//!
//! # Library Usage
//!
//! ```ignore
//! use apa7_cli::format_command;
//! use apa7_core::FormatConfig;
//!
//! let report = format_command(&input, &output, FormatConfig::default())?;
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{format_command, run, run_cli, Cli, USAGE};
