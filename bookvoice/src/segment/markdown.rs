//! Markdown segmentation: ATX headings, with a "Chapter N" line fallback.

use super::RawChapter;
use crate::document::markdown::MarkdownDocument;
use regex::Regex;
use std::sync::OnceLock;

/// Standalone chapter lines like "Chapter 7" or "chapter one".
static CHAPTER_LINE: OnceLock<Regex> = OnceLock::new();

fn chapter_line_pattern() -> &'static Regex {
    CHAPTER_LINE.get_or_init(|| {
        Regex::new(r"(?i)^\s*chapter\s+(\d+|[a-z]+)\s*$").expect("chapter pattern is valid")
    })
}

/// Split Markdown text into chapter candidates.
///
/// `#` and `##` headings start chapters. The "Chapter N" pattern is only
/// consulted when the heading scan finds no boundary anywhere in the
/// document. With no boundaries at all, the whole text is one chapter.
pub(crate) fn segment_markdown(doc: &MarkdownDocument) -> Vec<RawChapter> {
    let chapters = split_on_boundaries(&doc.text, heading_title);
    if !chapters.is_empty() {
        return chapters;
    }

    let chapters = split_on_boundaries(&doc.text, |line| {
        chapter_line_pattern()
            .is_match(line)
            .then(|| line.trim().to_string())
    });
    if !chapters.is_empty() {
        return chapters;
    }

    vec![RawChapter {
        title: String::new(),
        text: doc.text.clone(),
    }]
}

/// Title of a level-1 or level-2 ATX heading line, marker stripped.
fn heading_title(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix("##")
        .or_else(|| trimmed.strip_prefix('#'))?;
    if rest.starts_with('#') {
        // ### or deeper does not start a chapter
        return None;
    }
    if !rest.is_empty() && !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some(rest.trim().trim_end_matches('#').trim_end().to_string())
}

/// Walk lines splitting at boundaries; returns an empty vec when no
/// boundary line matched at all, so the caller can try the next strategy.
fn split_on_boundaries<F>(text: &str, boundary: F) -> Vec<RawChapter>
where
    F: Fn(&str) -> Option<String>,
{
    let mut chapters: Vec<RawChapter> = Vec::new();
    let mut leading_text = String::new();
    let mut current: Option<RawChapter> = None;
    let mut found_boundary = false;

    for line in text.lines() {
        if let Some(title) = boundary(line) {
            found_boundary = true;
            if let Some(finished) = current.take() {
                chapters.push(finished);
            }
            current = Some(RawChapter {
                title,
                text: String::new(),
            });
        } else {
            let target = match current.as_mut() {
                Some(chapter) => &mut chapter.text,
                None => &mut leading_text,
            };
            target.push_str(line);
            target.push('\n');
        }
    }
    if let Some(finished) = current.take() {
        chapters.push(finished);
    }

    if !found_boundary {
        return Vec::new();
    }

    if !leading_text.trim().is_empty() {
        chapters.insert(0, RawChapter {
            title: "Introduction".to_string(),
            text: leading_text,
        });
    }

    chapters
}
