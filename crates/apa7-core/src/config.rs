//! Formatting configuration
//!
//! Every knob has an APA 7 default, so an empty TOML file (or no file at
//! all) yields the standard layout: Times New Roman 12pt, 1in margins,
//! four heading levels mapped directly from Word's heading styles.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, Result};

/// How Word heading styles map onto APA heading levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingScheme {
    /// Style "Heading N" is APA level N
    #[default]
    Direct,
    /// Style "Heading 1" is the paper title; "Heading N+1" is APA level N
    TitleOffset,
}

impl FromStr for HeadingScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(HeadingScheme::Direct),
            "title-offset" | "title_offset" => Ok(HeadingScheme::TitleOffset),
            other => Err(format!(
                "unknown heading scheme '{}' (expected 'direct' or 'title-offset')",
                other
            )),
        }
    }
}

impl fmt::Display for HeadingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingScheme::Direct => write!(f, "direct"),
            HeadingScheme::TitleOffset => write!(f, "title-offset"),
        }
    }
}

/// Top-level formatting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Font applied to every formatted paragraph and table cell
    pub body_font: String,
    /// Font size in points
    pub body_size_pt: f32,
    /// Page margin on all four sides, in inches
    pub margin_in: f32,
    /// Heading style to APA level mapping
    pub heading_scheme: HeadingScheme,
    /// Deepest APA heading level; deeper headings are clamped to it
    pub max_heading_level: u8,
    /// Case-insensitive style name substrings that mark code blocks
    pub code_style_keywords: Vec<String>,
    /// Insert a PAGE field in the default header
    pub page_numbers: bool,
    /// Remove bookmarkStart/bookmarkEnd from the body
    pub strip_bookmarks: bool,
    /// Table layout
    pub table: TableConfig,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            body_font: "Times New Roman".to_string(),
            body_size_pt: 12.0,
            margin_in: 1.0,
            heading_scheme: HeadingScheme::Direct,
            max_heading_level: 4,
            code_style_keywords: vec![
                "code".to_string(),
                "verbatim".to_string(),
                "source".to_string(),
            ],
            page_numbers: false,
            strip_bookmarks: true,
            table: TableConfig::default(),
        }
    }
}

/// Table rule and cell settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rule weight in eighths of a point (8 = 1pt)
    pub border_weight_eighths: u32,
    /// Rule colour as RRGGBB
    pub border_color: String,
    /// Space before and after each cell paragraph, in points
    pub cell_spacing_pt: f32,
    /// Default top/bottom cell margin, in points
    pub cell_margin_vertical_pt: f32,
    /// Default left/right cell margin, in points
    pub cell_margin_horizontal_pt: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            border_weight_eighths: 8,
            border_color: "000000".to_string(),
            cell_spacing_pt: 2.0,
            cell_margin_vertical_pt: 2.0,
            cell_margin_horizontal_pt: 3.0,
        }
    }
}

impl FormatConfig {
    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values that cannot produce a sensible document
    pub fn validate(&self) -> Result<()> {
        if self.body_font.trim().is_empty() {
            return Err(FormatError::ConfigValue("body_font must not be empty".into()));
        }
        if !(self.body_size_pt > 0.0 && self.body_size_pt <= 1638.0) {
            return Err(FormatError::ConfigValue(format!(
                "body_size_pt {} is out of range",
                self.body_size_pt
            )));
        }
        if !(0.0..=10.0).contains(&self.margin_in) {
            return Err(FormatError::ConfigValue(format!(
                "margin_in {} is out of range",
                self.margin_in
            )));
        }
        if !(1..=4).contains(&self.max_heading_level) {
            return Err(FormatError::ConfigValue(format!(
                "max_heading_level must be between 1 and 4, got {}",
                self.max_heading_level
            )));
        }
        let color = &self.table.border_color;
        if !(color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())) {
            return Err(FormatError::ConfigValue(format!(
                "table.border_color '{}' is not an RRGGBB value",
                color
            )));
        }
        if self.table.cell_spacing_pt < 0.0
            || self.table.cell_margin_vertical_pt < 0.0
            || self.table.cell_margin_horizontal_pt < 0.0
        {
            return Err(FormatError::ConfigValue(
                "table spacing and margins must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_apa_default() {
        let config = FormatConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormatConfig::default());
        assert_eq!(config.body_font, "Times New Roman");
        assert_eq!(config.max_heading_level, 4);
        assert!(config.strip_bookmarks);
        assert!(!config.page_numbers);
        assert_eq!(config.table.border_weight_eighths, 8);
    }

    #[test]
    fn test_partial_config() {
        let config = FormatConfig::from_toml_str(
            r#"
body_font = "Arial"
heading_scheme = "title-offset"
max_heading_level = 3

[table]
border_color = "333333"
"#,
        )
        .unwrap();
        assert_eq!(config.body_font, "Arial");
        assert_eq!(config.body_size_pt, 12.0);
        assert_eq!(config.heading_scheme, HeadingScheme::TitleOffset);
        assert_eq!(config.max_heading_level, 3);
        assert_eq!(config.table.border_color, "333333");
        assert_eq!(config.table.cell_spacing_pt, 2.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for toml in [
            "body_font = ''",
            "body_size_pt = 0",
            "margin_in = -1",
            "max_heading_level = 7",
            "[table]\nborder_color = 'black'",
            "[table]\ncell_spacing_pt = -2",
        ] {
            assert!(
                matches!(FormatConfig::from_toml_str(toml), Err(FormatError::ConfigValue(_))),
                "{} should be rejected",
                toml
            );
        }
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            FormatConfig::from_toml_str("body_font = "),
            Err(FormatError::Config(_))
        ));
        assert!(matches!(
            FormatConfig::from_toml_str("heading_scheme = \"sideways\""),
            Err(FormatError::Config(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apa7.toml");
        std::fs::write(&path, "page_numbers = true\n").unwrap();
        assert!(FormatConfig::from_file(&path).unwrap().page_numbers);
        assert!(matches!(
            FormatConfig::from_file(dir.path().join("missing.toml")),
            Err(FormatError::Io(_))
        ));
    }

    #[test]
    fn test_heading_scheme_parse() {
        assert_eq!("direct".parse::<HeadingScheme>(), Ok(HeadingScheme::Direct));
        assert_eq!(
            "Title-Offset".parse::<HeadingScheme>(),
            Ok(HeadingScheme::TitleOffset)
        );
        assert!("other".parse::<HeadingScheme>().is_err());
        assert_eq!(HeadingScheme::TitleOffset.to_string(), "title-offset");
    }
}
