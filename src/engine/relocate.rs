//! Path resolution and file relocation.
//!
//! Link paths arrive in whatever spelling the document's author (or their
//! editor) produced: forward or back slashes, `./` prefixes, `..` hops.
//! Everything here reduces those spellings to a single canonical form so
//! that two differently-written links to the same file are recognised as
//! one rename unit.
//!
//! Normalisation is purely lexical — no `fs::canonicalize`, which would
//! fail on the missing files the engine must detect and report, and would
//! resolve symlinks the user wrote deliberately.

use crate::error::LinkError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Canonicalise a link path as written in the document: backslashes become
/// forward slashes, `.` segments drop, `..` segments fold where they can.
///
/// The result is the rename-unit key: two spellings that normalise equal
/// are the same image.
pub fn normalize_link_path(link: &str) -> String {
    let unified = link.trim().replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut stack: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if absolute => {}
                _ => stack.push(".."),
            },
            s => stack.push(s),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Fold `.` and `..` components out of an already-absolute path.
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Resolve a normalised link path against the document's base directory
/// into an absolute, lexically clean path.
pub fn resolve_link(base_dir: &Path, normalized_link: &str) -> PathBuf {
    let link = Path::new(normalized_link);
    if link.is_absolute() {
        lexical_normalize(link)
    } else {
        lexical_normalize(&base_dir.join(link))
    }
}

/// Case-fold a path for equality comparison the way the platform's
/// filesystem does: Windows paths compare case-insensitively, everything
/// else exactly.
fn normcase(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if cfg!(windows) {
        s.to_lowercase()
    } else {
        s
    }
}

/// True when `a` and `b` name the same filesystem location.
pub fn same_location(a: &Path, b: &Path) -> bool {
    normcase(&lexical_normalize(a)) == normcase(&lexical_normalize(b))
}

/// Copy `src` to `dest`, overwriting any existing file there.
///
/// `fs::copy` carries permission bits with the data; richer metadata
/// (timestamps, xattrs) is platform-dependent and its loss is not an
/// error. Copy — never move — so the source keeps working for anything
/// else that references it.
pub fn copy_image(src: &Path, dest: &Path) -> Result<(), LinkError> {
    fs::copy(src, dest).map_err(|e| LinkError::CopyFailed {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        detail: e.to_string(),
    })?;
    debug!("copied '{}' -> '{}'", src.display(), dest.display());
    Ok(())
}
