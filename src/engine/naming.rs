//! Filename assignment: unique descriptions, filesystem-safe names.
//!
//! Two concerns live here, applied in this order:
//!
//! 1. **Uniqueness** — descriptions name files, so two images sharing a
//!    description within one document would collide. The second (third, …)
//!    gets a `_1` (`_2`, …) suffix, assigned in first-appearance order.
//! 2. **Sanitisation** — the characters `\ / : * ? " < > |` are illegal in
//!    filenames on at least one supported platform; each becomes `_`.
//!
//! Uniqueness is tracked on the *description*, before sanitisation, so the
//! feedback shown to users ("'x' renamed to 'x_1'") talks about the text
//! they actually wrote.

use std::collections::HashSet;
use std::path::Path;

/// Characters that are illegal in filenames on Windows (a superset of the
/// Unix set). Replaced with `_`.
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace filesystem-illegal characters in `name` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if ILLEGAL_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// The file extension of `path` including the leading dot, case preserved,
/// or an empty string when there is none. `a.PNG` → `.PNG`.
pub fn extension_of(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(".{ext}"),
        None => String::new(),
    }
}

/// Tracks descriptions already assigned within one document run and
/// disambiguates new ones.
#[derive(Debug, Default)]
pub struct DescriptionSet {
    used: HashSet<String>,
}

impl DescriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `description` unchanged if unused, otherwise the first free
    /// `description_1`, `description_2`, … The returned value is reserved.
    pub fn assign(&mut self, description: &str) -> String {
        let mut assigned = description.to_string();
        let mut counter = 1;
        while self.used.contains(&assigned) {
            assigned = format!("{description}_{counter}");
            counter += 1;
        }
        self.used.insert(assigned.clone());
        assigned
    }
}
