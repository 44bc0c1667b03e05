//! PDF Fonts CLI tool
//!
//! A command-line tool for listing the fonts used by the pages of PDF files.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use glob::glob;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use pdf_font_inventory::{
    FontDocument, FontRecord, InventoryConfig, InventoryEvent, InventoryRequest, InventoryWorker,
    PageFontCatalog,
};

/// PDF Fonts - List the fonts referenced by PDF pages
#[derive(Parser)]
#[command(name = "pdf-fonts")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # List every font of a document
    pdf-fonts list report.pdf

    # Only pages 1 to 3 and 8, names of fonts that are not embedded
    pdf-fonts list report.pdf --pages \"1-3, 8\" --not-embedded --names-only

    # Chinese font names stored in GBK
    pdf-fonts list \"scans/*.pdf\" --encoding gbk --json")]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the fonts used by the selected pages
    List {
        /// Input PDF files. Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Pages to scan, e.g. "1-3, 8, 10-" (default: all pages)
        #[arg(short, long)]
        pages: Option<String>,

        /// Encoding of font names (e.g. "utf-8", "gbk", "shift_jis")
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,

        /// Print the catalog as JSON
        #[arg(long, conflicts_with = "names_only")]
        json: bool,

        /// Print only font names, one per line (input for font substitution)
        #[arg(long)]
        names_only: bool,

        /// Only fonts whose program is embedded
        #[arg(long, conflicts_with = "not_embedded")]
        embedded: bool,

        /// Only fonts whose program is not embedded
        #[arg(long)]
        not_embedded: bool,

        /// Do not print fonts or progress while scanning
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,

        /// Encoding of font names
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,
    },
}

/// Which fonts to print
#[derive(Clone, Copy)]
enum Filter {
    All,
    Embedded,
    NotEmbedded,
}

impl Filter {
    fn keep(self, font: &FontRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Embedded => font.embedded,
            Filter::NotEmbedded => !font.embedded,
        }
    }
}

/// How to print the final catalog
#[derive(Clone, Copy, PartialEq)]
enum Output {
    Table,
    Names,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::List {
            inputs,
            pages,
            encoding,
            json,
            names_only,
            embedded,
            not_embedded,
            quiet,
        } => {
            let filter = if embedded {
                Filter::Embedded
            } else if not_embedded {
                Filter::NotEmbedded
            } else {
                Filter::All
            };
            let output = if json {
                Output::Json
            } else if names_only {
                Output::Names
            } else {
                Output::Table
            };
            cmd_list(inputs, pages, &encoding, filter, output, quiet)
        }
        Commands::Info { input, encoding } => cmd_info(input, &encoding),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
///
/// Inputs are reported in the order they were given on the command line;
/// the matches of a single pattern are sorted.
fn expand_globs(patterns: Vec<String>) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let mut matches = Vec::new();
            for entry in glob(&pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))? {
                match entry {
                    Ok(path) => matches.push(path),
                    Err(e) => log::warn!("glob error for {}: {}", pattern, e),
                }
            }
            if matches.is_empty() {
                bail!("No files matched pattern: {}", pattern);
            }
            matches.sort();
            paths.append(&mut matches);
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    Ok(paths)
}

/// List the fonts of each input file
fn cmd_list(
    inputs: Vec<String>,
    pages: Option<String>,
    encoding: &str,
    filter: Filter,
    output: Output,
    quiet: bool,
) -> anyhow::Result<()> {
    let config = InventoryConfig::with_encoding_label(encoding)?;
    let inputs = expand_globs(inputs)?;
    let live = !quiet && output != Output::Json;
    let mut worker = InventoryWorker::new();
    let mut catalogs = Vec::new();

    for input in inputs {
        if live {
            eprintln!("Scanning {}...", input.display());
        }

        let events = worker.start(InventoryRequest {
            input_path: input.clone(),
            page_range: pages.clone(),
            config,
        })?;
        let catalog = collect_events(events, filter, live)
            .with_context(|| format!("Failed to list fonts of {}", input.display()))?;
        worker.wait();

        catalogs.push((input, catalog));
    }

    match output {
        Output::Json => print_json(&catalogs, filter)?,
        Output::Names => {
            for (_, catalog) in &catalogs {
                for font in catalog.iter().filter(|font| filter.keep(font)) {
                    println!("{}", font.name);
                }
            }
        }
        Output::Table => {
            for (input, catalog) in &catalogs {
                print_table(input, catalog, filter);
            }
        }
    }

    Ok(())
}

/// Drain the worker's events, streaming discoveries to stderr
fn collect_events(
    events: std::sync::mpsc::Receiver<InventoryEvent>,
    filter: Filter,
    live: bool,
) -> anyhow::Result<PageFontCatalog> {
    let mut total = 0;

    for event in events {
        match event {
            InventoryEvent::Started { total: pages } => total = pages,
            InventoryEvent::Progress { position, .. } => {
                if live {
                    eprint!("\r  {}/{} pages", position, total);
                    let _ = std::io::stderr().flush();
                }
            }
            InventoryEvent::Discovered(font) => {
                if live && filter.keep(&font) {
                    eprintln!("\r  found {} (page {})", font.name, font.first_page);
                }
            }
            InventoryEvent::Completed(catalog) => {
                if live {
                    eprintln!();
                }
                return Ok(catalog);
            }
            InventoryEvent::Cancelled(catalog) => {
                if live {
                    eprintln!("\n  cancelled");
                }
                return Ok(catalog);
            }
            InventoryEvent::Failed(e) => return Err(e.into()),
        }
    }

    bail!("Font inventory stopped without a result")
}

fn print_table(input: &Path, catalog: &PageFontCatalog, filter: Filter) {
    println!("File: {}", input.display());

    let fonts: Vec<&FontRecord> = catalog.iter().filter(|font| filter.keep(font)).collect();
    if fonts.is_empty() {
        println!("  No fonts found.");
        return;
    }

    let width = fonts.iter().map(|font| font.name.chars().count()).max().unwrap_or(4).max(4);
    println!("  {:<width$}  {:>10}  {:>8}  {:>10}", "Font", "First page", "Embedded", "References");
    for font in fonts {
        println!(
            "  {:<width$}  {:>10}  {:>8}  {:>10}",
            font.name,
            font.first_page,
            if font.embedded { "yes" } else { "no" },
            font.reference_count,
        );
    }
}

fn print_json(catalogs: &[(PathBuf, PageFontCatalog)], filter: Filter) -> anyhow::Result<()> {
    let files: Vec<serde_json::Value> = catalogs
        .iter()
        .map(|(input, catalog)| {
            let fonts: Vec<&FontRecord> = catalog.iter().filter(|font| filter.keep(font)).collect();
            serde_json::json!({
                "file": input.display().to_string(),
                "fonts": fonts,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf, encoding: &str) -> anyhow::Result<()> {
    let config = InventoryConfig::with_encoding_label(encoding)?;
    let document = FontDocument::open(&input, &config)
        .with_context(|| format!("Failed to open {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", document.page_count());
    println!("Font name encoding: {}", config.font_name_encoding.name());

    Ok(())
}
