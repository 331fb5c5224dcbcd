//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use apa7_core::{FormatConfig, FormatReport, Formatter, HeadingScheme};
use apa7_ooxml::WordPackage;

/// Printed on stderr whenever the positional arguments are wrong
pub const USAGE: &str = "Usage: apa7 <INPUT> <OUTPUT>";

#[derive(Parser, Debug)]
#[command(name = "apa7")]
#[command(author, version, about = "APA 7 formatting for generated DOCX papers", long_about = None)]
pub struct Cli {
    /// Input DOCX file
    pub input: PathBuf,

    /// Output DOCX file
    pub output: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Insert a page number field in the top-right header
    #[arg(long)]
    pub page_numbers: bool,

    /// How Word heading styles map to APA levels (direct or title-offset)
    #[arg(long)]
    pub heading_scheme: Option<HeadingScheme>,

    /// Print the JSON format report instead of the summary
    #[arg(long)]
    pub report: bool,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Run the CLI application
///
/// Wrong arguments print the usage line and exit with status 1; `--help`
/// and `--version` behave as usual.
pub fn run_cli() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument => {
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
            _ => {
                eprint!("{}", e.render());
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        },
    };

    init_tracing(cli.verbose);
    run(&cli)
}

/// Execute a parsed command line
pub fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let report = format_command(&cli.input, &cli.output, config)?;

    if cli.report {
        println!("{}", report.to_json()?);
    } else {
        print_summary(&report, &cli.output);
    }
    Ok(())
}

/// Format `input` into `output`
pub fn format_command(input: &Path, output: &Path, config: FormatConfig) -> Result<FormatReport> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let mut package = WordPackage::open(input)
        .with_context(|| format!("Failed to open DOCX file: {}", input.display()))?;

    let report = Formatter::new(config)
        .format_package(&mut package)
        .with_context(|| format!("Failed to format document: {}", input.display()))?;

    package
        .save(output)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    Ok(report)
}

/// The configuration file (or the defaults) with flag overrides applied
fn load_config(cli: &Cli) -> Result<FormatConfig> {
    let mut config = match &cli.config {
        Some(path) => FormatConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => FormatConfig::default(),
    };
    if cli.page_numbers {
        config.page_numbers = true;
    }
    if let Some(scheme) = cli.heading_scheme {
        config.heading_scheme = scheme;
    }
    Ok(config)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    // A second subscriber (tests calling run_cli twice) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_summary(report: &FormatReport, output: &Path) {
    println!("apa7 v{}", apa7_core::VERSION);
    println!("Formatted: {}", output.display());
    println!(
        "  {} paragraphs ({} formatted), {} tables, {} table captions",
        report.paragraphs.len(),
        report.paragraphs_formatted,
        report.tables_formatted,
        report.overrides_applied
    );
    println!("  Margins set on {} section(s)", report.sections_updated);
    if report.bookmarks_removed > 0 {
        println!("  Removed {} bookmark markers", report.bookmarks_removed);
    }
    if report.page_number_inserted {
        println!("  Page numbers added to the header");
    }

    println!();
    println!("Still to do by hand:");
    for step in &report.manual_steps {
        println!("  - {}", step);
    }
}
