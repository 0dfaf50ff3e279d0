//! Progress-callback trait for per-link relink events.
//!
//! Inject an [`Arc<dyn RelinkProgressCallback>`] via
//! [`crate::config::RelinkConfigBuilder::progress_callback`] to receive
//! events as the engine works through a document's image links.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a GUI progress widget, or a log
//! sink — without the library knowing anything about how the host application
//! communicates. The engine is single-threaded and synchronous, so every
//! method is invoked from the calling thread, in document order; the trait is
//! still `Send + Sync` so one callback can be shared across a batch run from
//! any thread the caller chooses.
//!
//! # Example
//!
//! ```rust
//! use mdrelink::{RelinkConfig, RelinkProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     relocated: AtomicUsize,
//! }
//!
//! impl RelinkProgressCallback for CountingCallback {
//!     fn on_link_relocated(&self, completed: usize, total: usize) {
//!         self.relocated.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("link {}/{} relocated", completed, total);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { relocated: AtomicUsize::new(0) });
//!
//! let config = RelinkConfig::builder()
//!     .progress_callback(counter as Arc<dyn RelinkProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the engine as it works through one document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait RelinkProgressCallback: Send + Sync {
    /// Called once per document, after scanning, before any copy.
    ///
    /// # Arguments
    /// * `total_links` — number of image links found in the document
    ///   (duplicates included); 0 means nothing else will fire
    fn on_document_start(&self, total_links: usize) {
        let _ = total_links;
    }

    /// Called after an image was copied and its links rewritten.
    ///
    /// # Arguments
    /// * `completed` — 1-based position of this image's first link among
    ///   all scanned links
    /// * `total`     — total scanned links in the document
    fn on_link_relocated(&self, completed: usize, total: usize) {
        let _ = (completed, total);
    }

    /// Called when a link is skipped (source missing, copy failed).
    ///
    /// # Arguments
    /// * `link_path` — the path exactly as written in the document
    /// * `reason`    — human-readable skip reason
    fn on_link_skipped(&self, link_path: &str, reason: &str) {
        let _ = (link_path, reason);
    }

    /// Called when a duplicate description was disambiguated.
    ///
    /// # Arguments
    /// * `original` — the description as written
    /// * `assigned` — the suffixed description used for the filename
    fn on_description_renamed(&self, original: &str, assigned: &str) {
        let _ = (original, assigned);
    }

    /// Called once per document after the rewritten text is saved.
    ///
    /// # Arguments
    /// * `total_links` — total scanned links (same value as `on_document_start`)
    /// * `relocated`   — images actually copied and rewritten
    fn on_document_complete(&self, total_links: usize, relocated: usize) {
        let _ = (total_links, relocated);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl RelinkProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RelinkConfig`].
pub type ProgressCallback = Arc<dyn RelinkProgressCallback>;
