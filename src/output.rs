//! Report types produced by a relink run.
//!
//! [`crate::relink`] returns a [`RelinkReport`] rather than a bare count so
//! callers can see exactly what happened to every image: which were copied,
//! which were already in place, which were skipped and why. The headline
//! "number of images relocated" is [`RelinkReport::relocated`].
//!
//! All types serialise with serde so a front-end can persist or transmit a
//! run's outcome verbatim (the CLI's `--json` mode does exactly that).

use crate::error::LinkError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome for one rename unit — one distinct image file, however many
/// links pointed at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResult {
    /// Description as written in the unit's first link.
    pub description: String,

    /// Description actually used for the filename — differs from
    /// `description` only when a duplicate forced a `_1`/`_2`/… suffix.
    pub assigned_description: String,

    /// Every distinct spelling of this image's path found in the document,
    /// in first-appearance order.
    pub source_spellings: Vec<String>,

    /// Absolute path the link resolved to.
    pub resolved_path: PathBuf,

    /// The rewritten relative link (`./img/name.ext`). `None` when the
    /// unit was skipped (missing source, failed copy).
    pub new_link: Option<String>,

    /// True when the file was actually copied into the image directory.
    /// False for already-in-place and failed units.
    pub copied: bool,

    /// The failure, if this unit was skipped.
    pub error: Option<LinkError>,
}

impl ImageResult {
    /// True when this unit counts toward [`RelinkReport::relocated`]:
    /// a copy happened and every link for it was rewritten.
    pub fn is_relocated(&self) -> bool {
        self.copied && self.error.is_none()
    }

    /// True when the image already had the right name and place.
    pub fn is_already_in_place(&self) -> bool {
        !self.copied && self.error.is_none() && self.new_link.is_some()
    }

    /// True when a duplicate description forced a suffix.
    pub fn was_renamed(&self) -> bool {
        self.description != self.assigned_description
    }
}

/// Aggregate statistics for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelinkStats {
    /// Image links found in the document, duplicates included.
    pub total_links: usize,
    /// Distinct image files after path normalisation.
    pub distinct_images: usize,
    /// Units copied and rewritten.
    pub relocated: usize,
    /// Units whose file already had the target name and place.
    pub already_in_place: usize,
    /// Units skipped because the source file does not exist.
    pub missing_sources: usize,
    /// Units skipped because the copy failed.
    pub copy_failures: usize,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// Full outcome of relinking one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelinkReport {
    /// The document that was processed.
    pub document: PathBuf,
    /// Images actually copied and rewritten. 0 means nothing needed
    /// changing.
    pub relocated: usize,
    /// Per-unit outcomes, in first-appearance order.
    pub images: Vec<ImageResult>,
    /// Aggregate statistics.
    pub stats: RelinkStats,
    /// True when the document text was modified and written back.
    pub document_rewritten: bool,
}

impl RelinkReport {
    /// Units that were skipped, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = &ImageResult> {
        self.images.iter().filter(|r| r.error.is_some())
    }

    /// Units whose description was suffixed to stay unique.
    pub fn renamed_descriptions(&self) -> impl Iterator<Item = &ImageResult> {
        self.images.iter().filter(|r| r.was_renamed())
    }
}

/// One failed document in a batch run.
#[derive(Debug)]
pub struct DocumentFailure {
    pub document: PathBuf,
    pub error: crate::error::RelinkError,
}

/// Outcome of a batch run over several documents.
///
/// A batch never aborts: documents that fail land in `failures`, the rest
/// in `reports`, and the caller-facing aggregate is [`Self::total_relocated`].
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Reports for documents processed to completion (including ones where
    /// zero images needed relocating).
    pub reports: Vec<RelinkReport>,
    /// Documents that could not be processed at all.
    pub failures: Vec<DocumentFailure>,
}

impl BatchOutcome {
    /// Sum of relocated images across all processed documents.
    pub fn total_relocated(&self) -> usize {
        self.reports.iter().map(|r| r.relocated).sum()
    }

    /// Total documents attempted.
    pub fn total_documents(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}
