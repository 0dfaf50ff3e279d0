//! # mdrelink
//!
//! Rename the images referenced by a Markdown document after their alt
//! text, gather them into one image directory, and rewrite the links.
//!
//! ## Why this crate?
//!
//! Pasting screenshots into a Markdown editor leaves a trail of files named
//! `Pasted image 20230417.png` scattered wherever the editor dropped them.
//! The document already contains the one piece of information that would
//! make those files findable — the alt text the author wrote. This crate
//! turns `![order flow diagram](./Pasted image 20230417.png)` into
//! `![order flow diagram](./img/order flow diagram.png)`, copying the file
//! accordingly, for every image link in the document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document.md
//!  │
//!  ├─ 1. Decode   UTF-8, falling back to a legacy encoding (GBK)
//!  ├─ 2. Scan     locate every ![description](path) occurrence
//!  ├─ 3. Group    normalise paths; same file = one rename unit
//!  ├─ 4. Name     unique description per unit (_1/_2 on duplicates),
//!  │              sanitised for the filesystem, extension preserved
//!  ├─ 5. Copy     into ./<image-dir>/, overwriting, source kept
//!  ├─ 6. Rewrite  every spelling of every handled link
//!  └─ 7. Save     UTF-8, only when the text actually changed
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdrelink::{relink, RelinkConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelinkConfig::default(); // image dir: "img"
//!     let report = relink("notes/meeting.md", &config)?;
//!     println!("{} images relocated", report.relocated);
//!     for skipped in report.failures() {
//!         if let Some(err) = &skipped.error {
//!             eprintln!("skipped: {err}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Failures are contained at two levels: one bad image never aborts its
//! document (see [`error::LinkError`]), and in [`relink_batch`] one bad
//! document never aborts the batch (see [`output::BatchOutcome`]).
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdrelink` binary (clap + anyhow + walkdir + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! mdrelink = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod process;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RelinkConfig, RelinkConfigBuilder, DEFAULT_IMAGE_DIR};
pub use error::{LinkError, RelinkError};
pub use output::{BatchOutcome, DocumentFailure, ImageResult, RelinkReport, RelinkStats};
pub use process::{relink, relink_batch};
pub use progress::{NoopProgressCallback, ProgressCallback, RelinkProgressCallback};
