//! CLI binary for mdrelink.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RelinkConfig`, expands directory arguments into Markdown files, and
//! prints results.

use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mdrelink::{relink_batch, BatchOutcome, RelinkConfig, RelinkProgressCallback};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar, re-armed for each document in the
/// batch, advanced as links are relocated. Skips and description renames
/// are printed above the bar so they survive after it clears.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:40.green/238}] {pos:>3}/{len} links  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RelinkProgressCallback for CliProgressCallback {
    fn on_document_start(&self, total_links: usize) {
        self.bar.set_length(total_links as u64);
        self.bar.set_position(0);
        self.bar.set_message(String::new());
    }

    fn on_link_relocated(&self, completed: usize, _total: usize) {
        self.bar.set_position(completed as u64);
    }

    fn on_link_skipped(&self, link_path: &str, reason: &str) {
        self.bar
            .println(format!("{} {} — {}", yellow("⚠"), link_path, dim(reason)));
    }

    fn on_description_renamed(&self, original: &str, assigned: &str) {
        self.bar.println(format!(
            "{} duplicate description '{}' saved as '{}'",
            dim("·"),
            original,
            assigned
        ));
    }

    fn on_document_complete(&self, total_links: usize, _relocated: usize) {
        self.bar.set_position(total_links as u64);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One document, default ./img directory
  mdrelink notes.md

  # A whole vault (walked recursively for .md files)
  mdrelink ~/vault

  # Custom image directory name
  mdrelink --image-dir assets notes.md

  # Legacy-encoded documents (default fallback is gbk)
  mdrelink --fallback-encoding big5 old-notes.md

  # Machine-readable report
  mdrelink --json ~/vault > report.json

WHAT IT DOES:
  For every image link ![description](path) whose file exists, the image is
  copied (never moved) into ./<image-dir>/ next to the document, renamed to
  the description (illegal filename characters replaced by '_', extension
  kept), and the link is rewritten. Duplicate descriptions get _1, _2, …
  suffixes. Links to missing files are left untouched. Documents are saved
  back as UTF-8, and only when something actually changed.
"#;

/// Rename Markdown images after their alt text and gather them into one directory.
#[derive(Parser, Debug)]
#[command(
    name = "mdrelink",
    version,
    about = "Rename Markdown images after their alt text and gather them into one directory",
    long_about = "Scan Markdown documents for image links, copy each referenced image into a \
single image directory next to the document under a filename derived from its alt text, and \
rewrite the links. Duplicate alt texts are disambiguated, equivalent path spellings are \
recognised as one file, and already-correct links are left alone.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown files and/or directories (directories are walked recursively
    /// for .md files).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Name of the image directory created next to each document.
    #[arg(short = 'd', long, env = "MDRELINK_IMAGE_DIR", default_value = "img")]
    image_dir: String,

    /// Encoding tried when a document is not valid UTF-8 (WHATWG label).
    #[arg(long, env = "MDRELINK_FALLBACK_ENCODING", default_value = "gbk")]
    fallback_encoding: String,

    /// Output a structured JSON report instead of the human summary.
    #[arg(long, env = "MDRELINK_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "MDRELINK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDRELINK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDRELINK_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar and its printed lines carry the same information.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Config ───────────────────────────────────────────────────────────
    let Some(fallback) =
        encoding_rs::Encoding::for_label(cli.fallback_encoding.as_bytes())
    else {
        bail!("unknown encoding label '{}'", cli.fallback_encoding);
    };

    let progress = show_progress.then(CliProgressCallback::new);

    let mut builder = RelinkConfig::builder()
        .image_dir(&cli.image_dir)
        .fallback_encoding(fallback);
    if let Some(ref cb) = progress {
        builder = builder.progress_callback(cb.clone());
    }
    let config = builder.build()?;

    // ── Collect documents ────────────────────────────────────────────────
    let documents = collect_documents(&cli.inputs);
    if documents.is_empty() {
        bail!("no Markdown files found under the given inputs");
    }

    // ── Run ──────────────────────────────────────────────────────────────
    let outcome = relink_batch(&documents, &config);
    if let Some(cb) = progress {
        cb.finish();
    }

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        print_json(&outcome)?;
    } else if !cli.quiet {
        print_summary(&outcome);
    }

    if !outcome.failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

/// Expand files-or-directories into a sorted list of Markdown documents.
fn collect_documents(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| {
                    path.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("md"))
                })
                .collect();
            found.sort();
            documents.extend(found);
        } else {
            // Explicit files are passed through as-is; a missing one is
            // reported as a per-document failure by the batch run.
            documents.push(input.clone());
        }
    }
    documents
}

fn print_summary(outcome: &BatchOutcome) {
    for report in &outcome.reports {
        let name = report.document.display();
        if report.relocated > 0 {
            println!(
                "{} {} — {} relocated",
                green("✓"),
                name,
                bold(&report.relocated.to_string())
            );
        } else {
            println!("{} {} — nothing to do", dim("·"), dim(&name.to_string()));
        }
        for renamed in report.renamed_descriptions() {
            println!(
                "    {}",
                dim(&format!(
                    "'{}' saved as '{}'",
                    renamed.description, renamed.assigned_description
                ))
            );
        }
        for failure in report.failures() {
            if let Some(ref error) = failure.error {
                println!("    {} {}", yellow("⚠"), error);
            }
        }
    }

    for failure in &outcome.failures {
        println!(
            "{} {} — {}",
            red("✗"),
            failure.document.display(),
            red(&failure.error.to_string())
        );
    }

    let relocated = outcome.total_relocated();
    if relocated > 0 {
        println!(
            "\n{}",
            bold(&format!(
                "Relocated {} image{} across {} document{}.",
                relocated,
                if relocated == 1 { "" } else { "s" },
                outcome.reports.len(),
                if outcome.reports.len() == 1 { "" } else { "s" },
            ))
        );
    } else {
        println!("\n{}", bold("No images needed relocating."));
    }
    if !outcome.failures.is_empty() {
        println!(
            "{}",
            red(&format!(
                "{} document(s) could not be processed.",
                outcome.failures.len()
            ))
        );
    }
}

fn print_json(outcome: &BatchOutcome) -> Result<()> {
    let value = serde_json::json!({
        "documents": outcome.reports,
        "failures": outcome
            .failures
            .iter()
            .map(|f| {
                serde_json::json!({
                    "document": f.document,
                    "error": f.error.to_string(),
                })
            })
            .collect::<Vec<_>>(),
        "total_documents": outcome.total_documents(),
        "total_relocated": outcome.total_relocated(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
