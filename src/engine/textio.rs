//! Document text I/O: decode on the way in, UTF-8 on the way out.
//!
//! ## Why a fallback encoding?
//!
//! Markdown written with older Windows editors frequently arrives as GBK
//! (or another locale code page) rather than UTF-8. Refusing those files
//! outright would make the tool useless on exactly the vaults it was built
//! for, so decoding tries UTF-8 first and falls back to one configured
//! legacy encoding. Output is always written back as UTF-8 — the rewrite
//! normalises the file's encoding as a side effect, which is the behaviour
//! users of the original tool rely on.

use crate::error::RelinkError;
use encoding_rs::Encoding;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read and decode the document at `path`.
///
/// Tries strict UTF-8 first; on failure decodes with `fallback`. A file
/// that fails both is a [`RelinkError::DecodeFailed`].
pub fn read_text(path: &Path, fallback: &'static Encoding) -> Result<String, RelinkError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RelinkError::DocumentNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => RelinkError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => RelinkError::DocumentReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            debug!(
                "'{}' is not UTF-8, retrying with {}",
                path.display(),
                fallback.name()
            );
            let bytes = e.into_bytes();
            let (text, _, had_errors) = fallback.decode(&bytes);
            if had_errors {
                Err(RelinkError::DecodeFailed {
                    path: path.to_path_buf(),
                    fallback: fallback.name().to_string(),
                })
            } else {
                Ok(text.into_owned())
            }
        }
    }
}

/// Write `text` to `path` as UTF-8, overwriting the existing file.
pub fn write_text(path: &Path, text: &str) -> Result<(), RelinkError> {
    fs::write(path, text.as_bytes()).map_err(|e| RelinkError::DocumentWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
