//! Link scanning: locate every image reference in a document.
//!
//! This is deliberately *not* a Markdown parser. The engine only needs to
//! find `![description](path)` occurrences, and a regex does that without
//! caring about surrounding block structure, exactly the way the original
//! documents use the syntax. Code fences are not special-cased: an image
//! link inside a fence is rare enough, and rewriting it is harmless
//! compared to the complexity of tracking fence state.

use once_cell::sync::Lazy;
use regex::Regex;

/// One `![description](path)` occurrence, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    /// The alt text between `![` and `]`. Never empty.
    pub description: String,
    /// The path between `(` and `)`, as spelled in the document —
    /// possibly relative, possibly with backslashes.
    pub path: String,
    /// Byte offset of the `!` in the document text.
    pub offset: usize,
}

impl ImageLink {
    /// The exact substring this link occupies in the document,
    /// reconstructed for literal text replacement.
    pub fn literal(&self) -> String {
        format!("![{}]({})", self.description, self.path)
    }

    /// The literal this link becomes once its path is rewritten.
    pub fn literal_with_path(&self, new_path: &str) -> String {
        format!("![{}]({})", self.description, new_path)
    }
}

/// `![description](path)` — description is a run of non-`]` characters,
/// path a run of non-`)` characters. Both one-plus: a link with no alt
/// text cannot name a file and is left alone.
static RE_IMAGE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Scan `text` for image links, in order of appearance, duplicates kept.
pub fn scan_links(text: &str) -> Vec<ImageLink> {
    RE_IMAGE_LINK
        .captures_iter(text)
        .map(|caps| ImageLink {
            description: caps[1].to_string(),
            path: caps[2].to_string(),
            offset: caps.get(0).map(|m| m.start()).unwrap_or(0),
        })
        .collect()
}
