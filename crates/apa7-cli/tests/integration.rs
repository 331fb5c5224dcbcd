//! Integration tests for the apa7 binary
//!
//! Fixtures are written to a temporary directory and the real binary is
//! run against them.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use apa7_ooxml::test_utils::{extract_part, styled_docx};
use tempfile::TempDir;

const BODY: &str = concat!(
    r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Method</w:t></w:r></w:p>"#,
    r#"<w:p><w:pPr><w:pStyle w:val="FirstParagraph"/></w:pPr><w:r><w:t>We asked.</w:t></w:r></w:p>"#,
    r#"<w:p><w:pPr><w:pStyle w:val="BodyText"/></w:pPr><w:r><w:t>Table 1</w:t></w:r></w:p>"#,
    r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Head</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
    r#"<w:sectPr><w:pgMar w:top="720" w:bottom="720" w:left="720" w:right="720"/></w:sectPr>"#
);

fn apa7(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_apa7"))
        .args(args)
        .output()
        .expect("failed to run apa7")
}

fn fixture() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("paper.docx");
    let output = dir.path().join("paper-apa.docx");
    fs::write(&input, styled_docx(BODY)).unwrap();
    (dir, input, output)
}

#[test]
fn test_formats_file() {
    let (_dir, input, output) = fixture();
    let result = apa7(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("3 paragraphs (3 formatted), 1 tables, 1 table captions"));
    assert!(stdout.contains("Still to do by hand:"));
    assert!(stdout.contains("--page-numbers"));

    let bytes = fs::read(&output).unwrap();
    let document = extract_part(&bytes, "word/document.xml").unwrap();
    assert!(document.contains(r#"w:top="1440""#));
    assert!(document.contains(r#"<w:jc w:val="center"/>"#));
    // Input is left as it was
    let original = extract_part(&fs::read(&input).unwrap(), "word/document.xml").unwrap();
    assert!(original.contains(r#"w:top="720""#));
}

#[test]
fn test_wrong_arity_prints_usage() {
    for args in [&[][..], &["only.docx"][..], &["a.docx", "b.docx", "c.docx"][..]] {
        let result = apa7(args);
        assert_eq!(result.status.code(), Some(1), "args {:?}", args);
        let stderr = String::from_utf8_lossy(&result.stderr);
        assert!(stderr.contains("Usage: apa7 <INPUT> <OUTPUT>"), "{}", stderr);
    }
}

#[test]
fn test_missing_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.docx");
    let result = apa7(&["/nonexistent/paper.docx", output.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Input file not found"));
    assert!(!output.exists());
}

#[test]
fn test_corrupt_input_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.docx");
    let output = dir.path().join("out.docx");
    fs::write(&input, b"this is not a zip file").unwrap();

    let result = apa7(&[input.to_str().unwrap(), output.to_str().unwrap()]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Failed to open DOCX file"));
    assert!(!output.exists());
}

#[test]
fn test_report_and_page_numbers() {
    let (_dir, input, output) = fixture();
    let result = apa7(&[
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--page-numbers",
        "--report",
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let report: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["page_number_inserted"], true);
    assert_eq!(report["paragraphs"][0]["role"], "heading-1");
    assert_eq!(report["overrides"][0]["kind"], "label");

    let bytes = fs::read(&output).unwrap();
    let header = extract_part(&bytes, "word/header1.xml").unwrap();
    assert!(header.contains(" PAGE "));
}

#[test]
fn test_config_file() {
    let (dir, input, output) = fixture();
    let config = dir.path().join("apa7.toml");
    fs::write(&config, "body_font = \"Arial\"\nmargin_in = 1.5\n").unwrap();

    let result = apa7(&[
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));

    let document = extract_part(&fs::read(&output).unwrap(), "word/document.xml").unwrap();
    assert!(document.contains(r#"w:ascii="Arial""#));
    assert!(document.contains(r#"w:left="2160""#));
}

#[test]
fn test_invalid_config_rejected() {
    let (dir, input, output) = fixture();
    let config = dir.path().join("apa7.toml");
    fs::write(&config, "max_heading_level = 9\n").unwrap();

    let result = apa7(&[
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Failed to load config file"));
    assert!(!output.exists());
}
