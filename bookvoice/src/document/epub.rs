//! EPUB loading: metadata, resolved TOC entries, and resolved spine content.
//!
//! All archive access happens here. TOC entries and spine items are resolved
//! to their HTML content eagerly; entries that cannot be resolved keep a
//! `None` body and are reported with a warning, never as a hard failure.

use crate::error::{Error, Result};
use epub::doc::EpubDoc;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// A table-of-contents entry with its resolved content document.
#[derive(Debug, Clone)]
pub struct TocEntry {
    pub label: String,
    /// Raw HTML of the referenced content document, `None` if the
    /// reference could not be resolved.
    pub html: Option<String>,
}

/// A spine item with its resolved content document.
#[derive(Debug, Clone)]
pub struct SpineItem {
    /// File stem of the content document (e.g. "ch02" for "ch02.xhtml").
    pub file_stem: Option<String>,
    pub html: Option<String>,
}

/// Parsed EPUB: book metadata plus TOC and spine in reading order.
#[derive(Debug)]
pub struct EpubDocument {
    pub title: Option<String>,
    pub author: Option<String>,
    pub toc: Vec<TocEntry>,
    pub spine: Vec<SpineItem>,
}

/// Load an EPUB file, resolving TOC and spine references to HTML content.
pub fn load_epub(path: &Path) -> Result<EpubDocument> {
    let mut doc = EpubDoc::new(path)
        .map_err(|e| Error::DocumentParse(format!("failed to open EPUB: {}", e)))?;

    let title = doc.mdata("title").map(|m| m.value.clone());
    let author = doc.mdata("creator").map(|m| m.value.clone());

    // Flatten the nav tree in reading order; nested entries become
    // sibling chapters.
    let toc_points = doc.toc.clone();
    let nav_points = flatten_nav(&toc_points);
    let nav_files = dedupe_nav_files(nav_points);
    let mut toc = Vec::with_capacity(nav_files.len());
    for (label, file_path) in nav_files {
        let html = doc.get_resource_str_by_path(&file_path);
        if html.is_none() {
            warn!(
                "could not resolve TOC entry '{}' -> {}",
                label,
                file_path.display()
            );
        }
        toc.push(TocEntry { label, html });
    }

    let spine_ids: Vec<String> = doc.spine.iter().map(|item| item.idref.clone()).collect();
    let mut spine = Vec::with_capacity(spine_ids.len());
    for idref in spine_ids {
        let file_stem = doc
            .resources
            .get(&idref)
            .and_then(|item| item.path.file_stem())
            .map(|stem| stem.to_string_lossy().to_string());

        let html = match doc.get_resource(&idref) {
            Some((bytes, _mime)) => Some(String::from_utf8_lossy(&bytes).to_string()),
            None => {
                warn!("could not resolve spine item '{}'", idref);
                None
            }
        };
        spine.push(SpineItem { file_stem, html });
    }

    debug!(
        "loaded EPUB: {} TOC entries, {} spine items",
        toc.len(),
        spine.len()
    );

    Ok(EpubDocument {
        title,
        author,
        toc,
        spine,
    })
}

/// Flatten the nav-point tree into (label, content path) pairs in reading
/// order: each entry first, then its children.
fn flatten_nav(points: &[epub::doc::NavPoint]) -> Vec<(String, PathBuf)> {
    let mut flat = Vec::new();
    for point in points {
        flat.push((point.label.clone(), point.content.clone()));
        flat.extend(flatten_nav(&point.children));
    }
    flat
}

/// Resolve nav targets to files and collapse consecutive entries that live
/// in the same content document.
///
/// Nav targets may carry a fragment ("ch01.xhtml#s2"), but content is only
/// resolvable at file granularity, so a chapter entry followed by its
/// section anchors would repeat the whole file once per anchor. The first
/// entry for a file keeps its label; the rest are dropped. Non-consecutive
/// repeats are kept as-is.
fn dedupe_nav_files(points: Vec<(String, PathBuf)>) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = Vec::with_capacity(points.len());
    for (label, content) in points {
        let file = strip_fragment(&content);
        if files.last().is_some_and(|(_, prev)| *prev == file) {
            continue;
        }
        files.push((label, file));
    }
    files
}

/// Drop a trailing `#fragment` from a content path.
fn strip_fragment(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match raw.split_once('#') {
        Some((file, _fragment)) => PathBuf::from(file),
        None => path.to_path_buf(),
    }
}
