//! Document-level entry points.
//!
//! [`relink`] runs the whole engine over one document: ensure the image
//! directory, decode, scan, copy, rewrite, save. [`relink_batch`] runs it
//! over many documents sequentially, containing every failure at the
//! document boundary.
//!
//! ## Why copy before rewrite, and never roll back?
//!
//! The engine mutates the filesystem as it goes: each image is copied the
//! moment its new name is known, and the document is saved once at the end.
//! If the save fails, copied images stay where they are — they are valid
//! files under meaningful names, and a later re-run converges on the same
//! result (the run is idempotent). A transactional design would buy little
//! here and cost a staging area.

use crate::config::RelinkConfig;
use crate::engine::naming::{self, DescriptionSet};
use crate::engine::relocate;
use crate::engine::scan::{self, ImageLink};
use crate::engine::textio;
use crate::error::{LinkError, RelinkError};
use crate::output::{BatchOutcome, DocumentFailure, ImageResult, RelinkReport, RelinkStats};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// One rename unit: every link whose path normalises to the same file.
struct RenameUnit<'a> {
    /// Normalised path, the unit's identity.
    key: String,
    /// 0-based index of the unit's first link among all scanned links.
    first_index: usize,
    links: Vec<&'a ImageLink>,
}

/// Relink one Markdown document in place.
///
/// Copies every referenced image into `<parent>/<config.image_dir>/` under
/// a filename derived from its alt text, rewrites the links, and saves the
/// document (UTF-8) if anything changed.
///
/// # Returns
/// `Ok(RelinkReport)` on success, even if some images were skipped
/// (check [`RelinkReport::failures`]). `report.relocated` is the number of
/// images actually copied and rewritten; 0 means nothing needed changing.
///
/// # Errors
/// Returns `Err(RelinkError)` only for document-fatal conditions: the file
/// cannot be read or decoded, the image directory cannot be created, or
/// the final save fails.
pub fn relink(
    document: impl AsRef<Path>,
    config: &RelinkConfig,
) -> Result<RelinkReport, RelinkError> {
    let started = Instant::now();
    let doc_path = document.as_ref();
    info!("Relinking: {}", doc_path.display());

    // ── Step 1: Ensure the image directory ───────────────────────────────
    let base_dir = base_dir_of(doc_path);
    let image_dir = base_dir.join(&config.image_dir);
    fs::create_dir_all(&image_dir).map_err(|e| RelinkError::ImageDirCreateFailed {
        path: image_dir.clone(),
        source: e,
    })?;

    // ── Step 2: Read and decode the document ─────────────────────────────
    let original_text = textio::read_text(doc_path, config.fallback_encoding)?;

    // ── Step 3: Scan for image links ─────────────────────────────────────
    let links = scan::scan_links(&original_text);
    let total_links = links.len();
    debug!("{} image links found", total_links);
    if let Some(cb) = &config.progress_callback {
        cb.on_document_start(total_links);
    }

    // ── Step 4: Group links into rename units ────────────────────────────
    // Two spellings of the same file are one unit: one copy, every
    // occurrence rewritten.
    let units = group_into_units(&links);
    debug!("{} distinct images", units.len());

    // ── Step 5: Process each unit in first-appearance order ──────────────
    let mut descriptions = DescriptionSet::new();
    let mut new_text = original_text.clone();
    let mut images: Vec<ImageResult> = Vec::with_capacity(units.len());
    let mut stats = RelinkStats {
        total_links,
        distinct_images: units.len(),
        ..RelinkStats::default()
    };

    for unit in &units {
        let first = unit.links[0];
        let resolved = relocate::resolve_link(&base_dir, &unit.key);
        let source_spellings = distinct_spellings(unit);

        // 5a. Missing sources are skipped without reserving a description.
        if !resolved.is_file() {
            warn!("image not found: {} (skipping)", resolved.display());
            if let Some(cb) = &config.progress_callback {
                cb.on_link_skipped(&first.path, "source file not found");
            }
            stats.missing_sources += 1;
            images.push(ImageResult {
                description: first.description.clone(),
                assigned_description: first.description.clone(),
                source_spellings,
                resolved_path: resolved.clone(),
                new_link: None,
                copied: false,
                error: Some(LinkError::SourceMissing { path: resolved }),
            });
            continue;
        }

        // 5b. Unique description, suffixing duplicates in scan order.
        let assigned = descriptions.assign(&first.description);
        if assigned != first.description {
            info!(
                "duplicate description '{}', using '{}'",
                first.description, assigned
            );
            if let Some(cb) = &config.progress_callback {
                cb.on_description_renamed(&first.description, &assigned);
            }
        }

        // 5c/5d. Sanitised filename, extension preserved, forward slashes.
        let filename = format!(
            "{}{}",
            naming::sanitize_filename(&assigned),
            naming::extension_of(&resolved)
        );
        let new_link = format!("./{}/{}", config.image_dir, filename);
        let target = image_dir.join(&filename);

        // 5e. Already named and placed correctly: handled, nothing to do.
        if relocate::same_location(&resolved, &target) {
            debug!("already in place: {}", filename);
            stats.already_in_place += 1;
            images.push(ImageResult {
                description: first.description.clone(),
                assigned_description: assigned,
                source_spellings,
                resolved_path: resolved,
                new_link: Some(new_link),
                copied: false,
                error: None,
            });
            continue;
        }

        // 5f. Copy (overwrite); a refused copy skips the unit, leaving its
        // link text untouched.
        if let Err(e) = relocate::copy_image(&resolved, &target) {
            warn!("{e}");
            if let Some(cb) = &config.progress_callback {
                cb.on_link_skipped(&first.path, &e.to_string());
            }
            stats.copy_failures += 1;
            images.push(ImageResult {
                description: first.description.clone(),
                assigned_description: assigned,
                source_spellings,
                resolved_path: resolved,
                new_link: None,
                copied: false,
                error: Some(e),
            });
            continue;
        }

        // 5g. Rewrite every occurrence of each distinct literal spelling.
        let mut seen_literals = HashSet::new();
        for link in &unit.links {
            let old = link.literal();
            if !seen_literals.insert(old.clone()) {
                continue;
            }
            let new = link.literal_with_path(&new_link);
            if old != new {
                new_text = new_text.replace(&old, &new);
            }
        }

        info!(
            "relocated: {} -> {}",
            first.path.trim(),
            new_link
        );
        stats.relocated += 1;
        images.push(ImageResult {
            description: first.description.clone(),
            assigned_description: assigned,
            source_spellings,
            resolved_path: resolved,
            new_link: Some(new_link),
            copied: true,
            error: None,
        });

        // 5h. Progress: position of this unit's first link, 1-based.
        if let Some(cb) = &config.progress_callback {
            cb.on_link_relocated(unit.first_index + 1, total_links);
        }
    }

    // ── Step 6: Save, only if the text changed ───────────────────────────
    // An untouched document stays byte-for-byte identical — important both
    // for the zero-link case and to avoid silently transcoding a
    // fallback-encoded file nothing was done to.
    let document_rewritten = new_text != original_text;
    if document_rewritten {
        textio::write_text(doc_path, &new_text)?;
    }

    stats.duration_ms = started.elapsed().as_millis() as u64;
    if let Some(cb) = &config.progress_callback {
        cb.on_document_complete(total_links, stats.relocated);
    }
    info!(
        "done: {}/{} images relocated in {}ms",
        stats.relocated, stats.distinct_images, stats.duration_ms
    );

    Ok(RelinkReport {
        document: doc_path.to_path_buf(),
        relocated: stats.relocated,
        images,
        stats,
        document_rewritten,
    })
}

/// Relink several documents sequentially.
///
/// Never fails: a document that errors is recorded in
/// [`BatchOutcome::failures`] and processing continues with the next one.
/// The caller-facing aggregate count is [`BatchOutcome::total_relocated`].
pub fn relink_batch<P: AsRef<Path>>(
    documents: impl IntoIterator<Item = P>,
    config: &RelinkConfig,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for document in documents {
        let path = document.as_ref();
        match relink(path, config) {
            Ok(report) => outcome.reports.push(report),
            Err(error) => {
                warn!("skipping '{}': {}", path.display(), error);
                outcome.failures.push(DocumentFailure {
                    document: path.to_path_buf(),
                    error,
                });
            }
        }
    }
    outcome
}

/// Parent directory of the document; the current directory for bare
/// filenames.
fn base_dir_of(doc_path: &Path) -> PathBuf {
    match doc_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Group scanned links by normalised path, preserving first-appearance
/// order of both the units and the links inside each unit.
fn group_into_units(links: &[ImageLink]) -> Vec<RenameUnit<'_>> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut units: Vec<RenameUnit<'_>> = Vec::new();

    for (i, link) in links.iter().enumerate() {
        let key = relocate::normalize_link_path(&link.path);
        match index_by_key.get(&key) {
            Some(&idx) => units[idx].links.push(link),
            None => {
                index_by_key.insert(key.clone(), units.len());
                units.push(RenameUnit {
                    key,
                    first_index: i,
                    links: vec![link],
                });
            }
        }
    }
    units
}

/// Distinct path spellings within a unit, in first-appearance order.
fn distinct_spellings(unit: &RenameUnit<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    unit.links
        .iter()
        .filter(|l| seen.insert(l.path.clone()))
        .map(|l| l.path.clone())
        .collect()
}
