//! Error types for the mdrelink library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RelinkError`] — **Fatal for one document**: the document cannot be
//!   processed at all (unreadable file, undecodable text, image directory
//!   cannot be created, final save failed). Returned as `Err(RelinkError)`
//!   from [`crate::relink`].
//!
//! * [`LinkError`] — **Non-fatal**: a single image failed (source file
//!   missing, copy refused by the filesystem) but every other image in the
//!   document is fine. Stored inside [`crate::output::ImageResult`] so
//!   callers can inspect partial success rather than losing the whole
//!   document to one bad link.
//!
//! Batch processing never lets either kind cross a document boundary:
//! [`crate::relink_batch`] catches `RelinkError` per document and carries
//! on with the rest.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal per-document errors returned by the mdrelink library.
///
/// Image-level failures use [`LinkError`] and are stored in
/// [`crate::output::ImageResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum RelinkError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Document was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    DocumentNotFound { path: PathBuf },

    /// Process does not have read permission on the document.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Reading the document bytes failed for some other reason.
    #[error("Failed to read '{path}': {source}")]
    DocumentReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document text is neither valid UTF-8 nor valid under the
    /// configured fallback encoding.
    #[error(
        "Cannot decode '{path}' as UTF-8 or {fallback}.\n\
         Convert the file to UTF-8 (e.g. iconv -t utf-8) and retry."
    )]
    DecodeFailed { path: PathBuf, fallback: String },

    // ── Filesystem errors ─────────────────────────────────────────────────
    /// The target image directory could not be created. Fatal before any
    /// link is scanned: with no directory, nothing can be relocated.
    #[error("Failed to create image directory '{path}': {source}")]
    ImageDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the rewritten document back failed. Images already copied
    /// stay on disk; there is no rollback.
    #[error("Failed to write document '{path}': {source}")]
    DocumentWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single image rename unit.
///
/// Stored in [`crate::output::ImageResult`] when one image fails.
/// The rest of the document is still processed.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum LinkError {
    /// The link's resolved path does not exist on disk. The link text is
    /// left exactly as written.
    #[error("Image not found: '{path}' (link skipped)")]
    SourceMissing { path: PathBuf },

    /// The filesystem refused the copy (permissions, disk full, path too
    /// long). The link text is left exactly as written.
    #[error("Failed to copy '{from}' to '{to}': {detail}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failed_display_names_both_encodings() {
        let e = RelinkError::DecodeFailed {
            path: PathBuf::from("notes.md"),
            fallback: "GBK".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("UTF-8"), "got: {msg}");
        assert!(msg.contains("GBK"), "got: {msg}");
    }

    #[test]
    fn image_dir_create_failed_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e = RelinkError::ImageDirCreateFailed {
            path: PathBuf::from("doc/img"),
            source: io,
        };
        assert!(e.to_string().contains("doc/img"));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn source_missing_display() {
        let e = LinkError::SourceMissing {
            path: PathBuf::from("assets/cat.png"),
        };
        assert!(e.to_string().contains("assets/cat.png"));
        assert!(e.to_string().contains("skipped"));
    }

    #[test]
    fn copy_failed_display_has_both_paths() {
        let e = LinkError::CopyFailed {
            from: PathBuf::from("a.png"),
            to: PathBuf::from("img/b.png"),
            detail: "disk full".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("a.png"));
        assert!(msg.contains("img/b.png"));
        assert!(msg.contains("disk full"));
    }
}
