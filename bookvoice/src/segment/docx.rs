//! DOCX segmentation: Heading 1/2 styled paragraphs delimit chapters.

use super::RawChapter;
use crate::document::docx::DocxDocument;

/// Split a DOCX document into chapter candidates.
///
/// A Heading 1 or Heading 2 paragraph starts a new chapter with the heading
/// text as title. Every other paragraph accumulates into the current
/// chapter, joined by newline. Text before the first heading becomes an
/// implicit "Introduction" chapter; a document with no headings yields a
/// single untitled candidate holding the whole body.
pub(crate) fn segment_docx(doc: &DocxDocument) -> Vec<RawChapter> {
    let mut chapters: Vec<RawChapter> = Vec::new();
    let mut leading_text = String::new();
    let mut current: Option<RawChapter> = None;

    for paragraph in &doc.paragraphs {
        match paragraph.heading_level() {
            Some(level) if level <= 2 => {
                if let Some(finished) = current.take() {
                    chapters.push(finished);
                }
                current = Some(RawChapter {
                    title: paragraph.text.trim().to_string(),
                    text: String::new(),
                });
            }
            _ => {
                let target = match current.as_mut() {
                    Some(chapter) => &mut chapter.text,
                    None => &mut leading_text,
                };
                if !target.is_empty() {
                    target.push('\n');
                }
                target.push_str(&paragraph.text);
            }
        }
    }
    if let Some(finished) = current.take() {
        chapters.push(finished);
    }

    if !leading_text.trim().is_empty() {
        let title = if chapters.is_empty() {
            // No headings at all: the body is the only chapter, and the
            // shared numbering pass will title it.
            String::new()
        } else {
            "Introduction".to_string()
        };
        chapters.insert(0, RawChapter {
            title,
            text: leading_text,
        });
    }

    chapters
}
