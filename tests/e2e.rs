//! End-to-end integration tests for mdrelink.
//!
//! Every test builds a throwaway document tree in a `TempDir`, runs the
//! public API against it, and asserts on both the rewritten text and the
//! resulting filesystem layout. No network, no fixtures on disk.

use mdrelink::{relink, relink_batch, LinkError, RelinkConfig, RelinkProgressCallback};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Write a document under the temp root and return its path.
fn write_doc(root: &Path, name: &str, content: &str) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Create a fake image file (parents included) with distinctive bytes.
fn write_image(root: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

fn read_to_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ── Core behaviour ───────────────────────────────────────────────────────────

#[test]
fn zero_links_leaves_document_byte_identical() {
    let root = TempDir::new().unwrap();
    let content = "# Notes\n\nNo images here, just [a plain link](a.png).\n";
    let doc = write_doc(root.path(), "notes.md", content);
    let before = fs::read(&doc).unwrap();

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 0);
    assert!(!report.document_rewritten);
    assert_eq!(fs::read(&doc).unwrap(), before);
}

#[test]
fn relocates_one_image_and_rewrites_the_link() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "assets/a.PNG", b"png-bytes");
    let doc = write_doc(root.path(), "notes.md", "intro ![cat photo](./assets/a.PNG) outro\n");

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 1);
    assert!(report.document_rewritten);
    assert_eq!(
        read_to_string(&doc),
        "intro ![cat photo](./img/cat photo.PNG) outro\n"
    );
    assert_eq!(
        fs::read(root.path().join("img/cat photo.PNG")).unwrap(),
        b"png-bytes"
    );
    // Copy, not move.
    assert!(root.path().join("assets/a.PNG").exists());
}

#[test]
fn worked_example_from_the_docs() {
    // ![cat photo](./assets/a.PNG) and ![cat photo](./img/b.png), both
    // files present: first becomes cat photo.PNG, second cat photo_1.png,
    // two relocations.
    let root = TempDir::new().unwrap();
    write_image(root.path(), "assets/a.PNG", b"first");
    write_image(root.path(), "img/b.png", b"second");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "![cat photo](./assets/a.PNG)\n![cat photo](./img/b.png)\n",
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 2);
    assert_eq!(
        read_to_string(&doc),
        "![cat photo](./img/cat photo.PNG)\n![cat photo](./img/cat photo_1.png)\n"
    );
    assert_eq!(
        fs::read(root.path().join("img/cat photo.PNG")).unwrap(),
        b"first"
    );
    assert_eq!(
        fs::read(root.path().join("img/cat photo_1.png")).unwrap(),
        b"second"
    );
}

#[test]
fn second_run_is_a_noop() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "assets/a.png", b"bytes");
    write_image(root.path(), "b.jpeg", b"more");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "![one](./assets/a.png) ![two](b.jpeg)\n",
    );
    let config = RelinkConfig::default();

    let first = relink(&doc, &config).unwrap();
    assert_eq!(first.relocated, 2);

    let text_after_first = read_to_string(&doc);
    let second = relink(&doc, &config).unwrap();

    assert_eq!(second.relocated, 0, "second run must be a no-op");
    assert!(!second.document_rewritten);
    assert_eq!(second.stats.already_in_place, 2);
    assert_eq!(read_to_string(&doc), text_after_first);
}

#[test]
fn duplicate_descriptions_suffix_in_appearance_order() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "1.png", b"1");
    write_image(root.path(), "2.png", b"2");
    write_image(root.path(), "3.png", b"3");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "![shot](1.png)\n![shot](2.png)\n![shot](3.png)\n",
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 3);
    assert_eq!(
        read_to_string(&doc),
        "![shot](./img/shot.png)\n![shot](./img/shot_1.png)\n![shot](./img/shot_2.png)\n"
    );
    let assigned: Vec<&str> = report
        .images
        .iter()
        .map(|r| r.assigned_description.as_str())
        .collect();
    assert_eq!(assigned, ["shot", "shot_1", "shot_2"]);
}

#[test]
fn illegal_characters_are_sanitized_extension_kept() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "raw.JPG", b"jpg");
    let doc = write_doc(
        root.path(),
        "notes.md",
        r#"![a\b/c:d*e?f"g<h>i|j](raw.JPG)"#,
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 1);
    assert!(root.path().join("img/a_b_c_d_e_f_g_h_i_j.JPG").exists());
    // The alt text in the document keeps its original characters; only the
    // path changes.
    assert_eq!(
        read_to_string(&doc),
        r#"![a\b/c:d*e?f"g<h>i|j](./img/a_b_c_d_e_f_g_h_i_j.JPG)"#
    );
}

#[test]
fn missing_source_is_left_untouched_and_uncounted() {
    let root = TempDir::new().unwrap();
    let content = "![ghost](./nowhere/ghost.png)\n";
    let doc = write_doc(root.path(), "notes.md", content);

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 0);
    assert_eq!(report.stats.missing_sources, 1);
    assert!(!report.document_rewritten);
    assert_eq!(read_to_string(&doc), content);
    assert!(matches!(
        report.images[0].error,
        Some(LinkError::SourceMissing { .. })
    ));
}

#[test]
fn equivalent_spellings_are_one_unit() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "pics/one.png", b"one");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "a ![fig](./pics/one.png)\nb ![fig](pics/one.png)\nc ![fig](./pics/one.png)\n",
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    // One copy, no _1 suffix, every occurrence rewritten.
    assert_eq!(report.relocated, 1);
    assert_eq!(report.stats.distinct_images, 1);
    assert_eq!(
        read_to_string(&doc),
        "a ![fig](./img/fig.png)\nb ![fig](./img/fig.png)\nc ![fig](./img/fig.png)\n"
    );
    assert_eq!(
        report.images[0].source_spellings,
        vec!["./pics/one.png".to_string(), "pics/one.png".to_string()]
    );
    assert!(root.path().join("img/fig.png").exists());
}

#[test]
fn backslash_spelling_joins_the_same_unit() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "pics/one.png", b"one");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "a ![fig](./pics/one.png)\nb ![fig](.\\pics\\one.png)\n",
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 1);
    assert_eq!(
        read_to_string(&doc),
        "a ![fig](./img/fig.png)\nb ![fig](./img/fig.png)\n"
    );
}

#[test]
fn already_in_place_is_handled_but_not_counted() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "img/cat.png", b"cat");
    write_image(root.path(), "other/c2.png", b"cat2");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "![cat](./img/cat.png)\n![cat](./other/c2.png)\n",
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    // First unit already correct; its description stays reserved, so the
    // second image lands on cat_1.
    assert_eq!(report.relocated, 1);
    assert_eq!(report.stats.already_in_place, 1);
    assert!(report.images[0].is_already_in_place());
    assert_eq!(
        read_to_string(&doc),
        "![cat](./img/cat.png)\n![cat](./img/cat_1.png)\n"
    );
    assert!(root.path().join("img/cat_1.png").exists());
}

#[test]
fn copy_overwrites_stale_target() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "assets/cat.png", b"fresh");
    write_image(root.path(), "img/cat.png", b"stale");
    let doc = write_doc(root.path(), "notes.md", "![cat](./assets/cat.png)\n");

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 1);
    assert_eq!(fs::read(root.path().join("img/cat.png")).unwrap(), b"fresh");
}

// ── Configuration ────────────────────────────────────────────────────────────

#[test]
fn custom_image_dir_name() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "a.png", b"a");
    let doc = write_doc(root.path(), "notes.md", "![pic](a.png)\n");
    let config = RelinkConfig::builder().image_dir("my assets").build().unwrap();

    let report = relink(&doc, &config).unwrap();

    assert_eq!(report.relocated, 1);
    assert_eq!(read_to_string(&doc), "![pic](./my assets/pic.png)\n");
    assert!(root.path().join("my assets/pic.png").exists());
}

#[test]
fn blank_image_dir_falls_back_to_img() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "a.png", b"a");
    let doc = write_doc(root.path(), "notes.md", "![pic](a.png)\n");
    let config = RelinkConfig::builder().image_dir("  ").build().unwrap();

    relink(&doc, &config).unwrap();

    assert!(root.path().join("img/pic.png").exists());
}

#[test]
fn nested_image_dir_creates_parents() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "a.png", b"a");
    let doc = write_doc(root.path(), "notes.md", "![pic](a.png)\n");
    let config = RelinkConfig::builder()
        .image_dir("media/img")
        .build()
        .unwrap();

    let report = relink(&doc, &config).unwrap();

    assert_eq!(report.relocated, 1);
    assert_eq!(read_to_string(&doc), "![pic](./media/img/pic.png)\n");
    assert!(root.path().join("media/img/pic.png").exists());
}

// ── Encoding ─────────────────────────────────────────────────────────────────

#[test]
fn gbk_document_is_decoded_and_saved_as_utf8() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "shot.png", b"shot");
    let doc = root.path().join("notes.md");
    let (encoded, _, _) = encoding_rs::GBK.encode("# 笔记\n\n![屏幕截图](shot.png)\n");
    fs::write(&doc, &encoded).unwrap();

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 1);
    // Saved back as valid UTF-8 with the link rewritten.
    assert_eq!(
        read_to_string(&doc),
        "# 笔记\n\n![屏幕截图](./img/屏幕截图.png)\n"
    );
    assert!(root.path().join("img/屏幕截图.png").exists());
}

// ── Batch ────────────────────────────────────────────────────────────────────

#[test]
fn batch_continues_past_a_broken_document() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "a.png", b"a");
    let good = write_doc(root.path(), "good.md", "![pic](a.png)\n");
    let missing = root.path().join("absent.md");

    let outcome = relink_batch([&missing, &good], &RelinkConfig::default());

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.total_relocated(), 1);
    assert_eq!(outcome.total_documents(), 2);
    // The good document was still processed.
    assert_eq!(read_to_string(&good), "![pic](./img/pic.png)\n");
}

// ── Progress reporting ───────────────────────────────────────────────────────

struct RecordingCallback {
    started: Mutex<Vec<usize>>,
    relocated: Mutex<Vec<(usize, usize)>>,
    skipped: Mutex<Vec<String>>,
    renamed: Mutex<Vec<(String, String)>>,
    completed: Mutex<Vec<(usize, usize)>>,
}

impl RecordingCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Mutex::new(Vec::new()),
            relocated: Mutex::new(Vec::new()),
            skipped: Mutex::new(Vec::new()),
            renamed: Mutex::new(Vec::new()),
            completed: Mutex::new(Vec::new()),
        })
    }
}

impl RelinkProgressCallback for RecordingCallback {
    fn on_document_start(&self, total_links: usize) {
        self.started.lock().unwrap().push(total_links);
    }
    fn on_link_relocated(&self, completed: usize, total: usize) {
        self.relocated.lock().unwrap().push((completed, total));
    }
    fn on_link_skipped(&self, link_path: &str, _reason: &str) {
        self.skipped.lock().unwrap().push(link_path.to_string());
    }
    fn on_description_renamed(&self, original: &str, assigned: &str) {
        self.renamed
            .lock()
            .unwrap()
            .push((original.to_string(), assigned.to_string()));
    }
    fn on_document_complete(&self, total_links: usize, relocated: usize) {
        self.completed.lock().unwrap().push((total_links, relocated));
    }
}

#[test]
fn progress_callback_sees_every_event() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "a.png", b"a");
    write_image(root.path(), "b.png", b"b");
    let doc = write_doc(
        root.path(),
        "notes.md",
        "![x](a.png)\n![gone](missing.png)\n![x](b.png)\n",
    );

    let callback = RecordingCallback::new();
    let config = RelinkConfig::builder()
        .progress_callback(callback.clone())
        .build()
        .unwrap();

    let report = relink(&doc, &config).unwrap();
    assert_eq!(report.relocated, 2);

    assert_eq!(callback.started.lock().unwrap().as_slice(), &[3]);
    // Completed positions are the 1-based indices of each unit's first
    // link among all scanned links: 1 and 3 (the missing one fires no
    // relocation event).
    assert_eq!(
        callback.relocated.lock().unwrap().as_slice(),
        &[(1, 3), (3, 3)]
    );
    assert_eq!(callback.skipped.lock().unwrap().as_slice(), &["missing.png"]);
    assert_eq!(
        callback.renamed.lock().unwrap().as_slice(),
        &[("x".to_string(), "x_1".to_string())]
    );
    assert_eq!(callback.completed.lock().unwrap().as_slice(), &[(3, 2)]);
}

// ── Relative path resolution ─────────────────────────────────────────────────

#[test]
fn dot_dot_paths_resolve_against_the_document_dir() {
    let root = TempDir::new().unwrap();
    write_image(root.path(), "shared/logo.png", b"logo");
    let doc = write_doc(
        root.path(),
        "sub/notes.md",
        "![logo](../shared/logo.png)\n",
    );

    let report = relink(&doc, &RelinkConfig::default()).unwrap();

    assert_eq!(report.relocated, 1);
    assert_eq!(read_to_string(&doc), "![logo](./img/logo.png)\n");
    // The image directory lives next to the document, not the vault root.
    assert!(root.path().join("sub/img/logo.png").exists());
}
