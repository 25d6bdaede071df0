//! Chapter segmentation: one strategy per document format.
//!
//! Each format submodule turns the loader's intermediate representation into
//! an ordered list of chapter candidates. This module then applies the
//! invariants shared by every format: chapter text is cleaned and must be
//! non-empty, titles are never empty, and indices are gap-free from 0.

mod docx;
mod epub;
mod markdown;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::text::cleaner::clean_text;

/// A titled, contiguous unit of narrative text, synthesized as one logical
/// audio unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Position in reading order, 0-based and gap-free.
    pub index: usize,
    /// Never empty; "Chapter N" is synthesized when nothing better exists.
    pub title: String,
    /// Cleaned chapter body, non-empty after trimming.
    pub text: String,
}

/// A chapter candidate before empty-filtering and numbering. An empty title
/// means "synthesize one from the emitted position".
pub(crate) struct RawChapter {
    pub title: String,
    pub text: String,
}

/// Segment a loaded document into chapters.
///
/// Fails with [`Error::DocumentParse`] when no chapter with text content can
/// be produced.
pub fn segment(document: &Document) -> Result<Vec<Chapter>> {
    let candidates = match document {
        Document::Docx(doc) => docx::segment_docx(doc),
        Document::Epub(doc) => epub::segment_epub(doc),
        Document::Markdown(doc) => markdown::segment_markdown(doc),
    };

    let chapters = number_chapters(candidates);
    if chapters.is_empty() {
        return Err(Error::DocumentParse(
            "no chapters with text content found".to_string(),
        ));
    }
    Ok(chapters)
}

/// Clean candidate text, drop empty candidates, assign titles and indices.
fn number_chapters(candidates: Vec<RawChapter>) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();

    for candidate in candidates {
        let text = clean_text(&candidate.text);
        if text.is_empty() {
            // A would-be chapter with no content is dropped, not emitted
            // as zero-length audio.
            continue;
        }

        let title = candidate.title.trim().to_string();
        let title = if title.is_empty() {
            format!("Chapter {}", chapters.len() + 1)
        } else {
            title
        };

        chapters.push(Chapter {
            index: chapters.len(),
            title,
            text,
        });
    }

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, text: &str) -> RawChapter {
        RawChapter {
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_number_chapters_drops_empty_text() {
        let chapters = number_chapters(vec![
            candidate("One", "content"),
            candidate("Empty", "   \n\n  "),
            candidate("Two", "more content"),
        ]);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "One");
        assert_eq!(chapters[1].title, "Two");
    }

    #[test]
    fn test_number_chapters_indices_are_gap_free() {
        let chapters = number_chapters(vec![
            candidate("A", "x"),
            candidate("skip", ""),
            candidate("B", "y"),
            candidate("C", "z"),
        ]);

        let indices: Vec<usize> = chapters.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_number_chapters_synthesizes_titles() {
        let chapters = number_chapters(vec![
            candidate("", "first"),
            candidate("  ", "second"),
            candidate("Named", "third"),
        ]);

        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[2].title, "Named");
    }

    #[test]
    fn test_segment_empty_markdown_is_parse_error() {
        let doc = Document::Markdown(crate::document::markdown::MarkdownDocument {
            text: "   \n\n  ".to_string(),
        });
        assert!(matches!(segment(&doc), Err(Error::DocumentParse(_))));
    }

    #[test]
    fn test_segment_is_idempotent() {
        let doc = Document::Markdown(crate::document::markdown::MarkdownDocument {
            text: "# One\n\nalpha\n\n# Two\n\nbeta\n".to_string(),
        });
        let first = segment(&doc).unwrap();
        let second = segment(&doc).unwrap();
        assert_eq!(first, second);
    }
}
