//! cmdcat - Report the commands registered by installed extensions.
//!
//! # Usage
//!
//! ```bash
//! cmdcat extensions/                       # aligned text tables
//! cmdcat extensions/ -f csv                # one CSV stream
//! cmdcat extensions/ -f json               # sections plus warnings
//! cmdcat extensions/ -f html -o report.html
//! cmdcat extensions/ -e backup -e deploy   # only the named extensions
//! ```

use crate::render;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cmdcat_core::{build_catalog, Catalog, ProviderRegistry};
use cmdcat_loader::{discover_file_providers, scan_extensions};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Output format for the catalog.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Width-aligned text tables, one per extension (default)
    #[default]
    Text,
    /// One CSV stream with an extension column
    Csv,
    /// Pretty-printed JSON including warnings
    Json,
    /// An HTML fragment, one section per extension
    Html,
}

/// Report the command-line commands registered by installed extensions.
#[derive(Parser, Debug)]
#[command(name = "cmdcat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the installed extensions
    #[arg(value_name = "EXTENSIONS_DIR")]
    pub dir: PathBuf,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report only the named extension (can be specified multiple times)
    #[arg(long = "extension", short = 'e', value_name = "ID")]
    pub extensions: Vec<String>,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn run(args: &Args) -> Result<()> {
    let mut extensions = scan_extensions(&args.dir)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;

    if !args.extensions.is_empty() {
        extensions.retain(|e| args.extensions.iter().any(|id| *id == e.id));
    }

    debug!(count = extensions.len(), "scanned extensions");

    let mut providers = ProviderRegistry::new();
    discover_file_providers(&mut providers, &args.dir, &extensions);

    if args.verbose {
        eprintln!(
            "Scanned {} extension(s), {} with command registrations",
            extensions.len(),
            providers.len()
        );
    }

    let catalog = build_catalog(&extensions, &providers);

    // Warnings are data, not failures; JSON carries them in-band.
    if !args.quiet && !matches!(args.format, OutputFormat::Json) {
        for warning in &catalog.warnings {
            eprintln!("warning: {warning}");
        }
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_catalog(&catalog, args.format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_catalog(&catalog, args.format, &mut stdout)?;
        }
    }

    Ok(())
}

fn write_catalog<W: Write>(catalog: &Catalog, format: OutputFormat, writer: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => render::write_text(catalog, writer),
        OutputFormat::Csv => render::write_csv(catalog, writer),
        OutputFormat::Json => render::write_json(catalog, writer),
        OutputFormat::Html => render::write_html(catalog, writer),
    }
}

/// Main entry point for the catalog command.
pub fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
