//! Engine stages for Markdown image relinking.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! change one concern (say, the filename-sanitisation rules) without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! textio ──▶ scan ──▶ relocate ──▶ naming ──▶ relocate ──▶ textio
//! (decode)   (regex)  (resolve)    (unique     (copy)       (save)
//!                                  filename)
//! ```
//!
//! 1. [`textio`]   — decode the document (UTF-8, legacy fallback) and save
//!    it back as UTF-8
//! 2. [`scan`]     — locate every `![description](path)` occurrence
//! 3. [`naming`]   — assign a unique, filesystem-safe filename per image
//! 4. [`relocate`] — normalise and resolve link paths, copy image files
//!    into the target directory

pub mod naming;
pub mod relocate;
pub mod scan;
pub mod textio;
