//! Configuration types for the relink engine.
//!
//! All engine behaviour is controlled through [`RelinkConfig`], built via
//! its [`RelinkConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share one config across a whole batch run and to see at a
//! glance how two runs differed.
//!
//! # Design choice: builder over constructor
//! The config is small today, but the builder keeps call sites stable as
//! fields are added, and gives each field one place to normalise its input
//! (the image-directory name is trimmed here, once, rather than in every
//! code path that touches it).

use crate::error::RelinkError;
use crate::progress::ProgressCallback;
use encoding_rs::Encoding;
use std::fmt;

/// Directory name used when the caller passes a blank one.
pub const DEFAULT_IMAGE_DIR: &str = "img";

/// Configuration for a relink run.
///
/// Built via [`RelinkConfig::builder()`] or [`RelinkConfig::default()`].
///
/// # Example
/// ```rust
/// use mdrelink::RelinkConfig;
///
/// let config = RelinkConfig::builder()
///     .image_dir("assets")
///     .build()
///     .unwrap();
/// assert_eq!(config.image_dir, "assets");
/// ```
#[derive(Clone)]
pub struct RelinkConfig {
    /// Name of the image directory created next to each document.
    /// Default: `"img"`.
    ///
    /// Leading/trailing whitespace is trimmed by the builder; a blank name
    /// falls back to the default. This is the only validation the name
    /// gets — it is a directory name chosen by the user, not a path, and
    /// the engine joins it under the document's parent directory as-is.
    pub image_dir: String,

    /// Legacy encoding tried when a document is not valid UTF-8.
    /// Default: GBK.
    ///
    /// Documents produced by older Windows editors are the common case
    /// here. Output is always written back as UTF-8 regardless of what the
    /// input decoded as.
    pub fallback_encoding: &'static Encoding,

    /// Optional progress callback, shared across all documents of a batch.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RelinkConfig {
    fn default() -> Self {
        Self {
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            fallback_encoding: encoding_rs::GBK,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RelinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelinkConfig")
            .field("image_dir", &self.image_dir)
            .field("fallback_encoding", &self.fallback_encoding.name())
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RelinkProgressCallback>"),
            )
            .finish()
    }
}

impl RelinkConfig {
    /// Create a new builder for `RelinkConfig`.
    pub fn builder() -> RelinkConfigBuilder {
        RelinkConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RelinkConfig`].
#[derive(Debug)]
pub struct RelinkConfigBuilder {
    config: RelinkConfig,
}

impl RelinkConfigBuilder {
    /// Set the image directory name. Trimmed; blank input keeps the
    /// default `"img"`.
    pub fn image_dir(mut self, name: impl AsRef<str>) -> Self {
        let trimmed = name.as_ref().trim();
        if !trimmed.is_empty() {
            self.config.image_dir = trimmed.to_string();
        }
        self
    }

    /// Set the legacy encoding tried when UTF-8 decoding fails.
    pub fn fallback_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.config.fallback_encoding = encoding;
        self
    }

    /// Install a progress callback.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Remove any configured progress callback.
    pub fn no_progress(mut self) -> Self {
        self.config.progress_callback = None;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RelinkConfig, RelinkError> {
        let c = &self.config;
        if c.image_dir.trim().is_empty() {
            return Err(RelinkError::InvalidConfig(
                "image directory name must not be blank".into(),
            ));
        }
        Ok(self.config)
    }
}

impl RelinkConfig {
    /// Convenience constructor for the common case: everything default
    /// except the image directory name.
    pub fn with_image_dir(name: impl AsRef<str>) -> Self {
        RelinkConfig::builder()
            .image_dir(name)
            .build()
            .unwrap_or_default()
    }
}
