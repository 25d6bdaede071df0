//! EPUB segmentation: TOC-driven with a spine-order fallback.
//!
//! Known limitation, preserved on purpose: in the fallback path a single
//! logical chapter spanning multiple spine files becomes one chapter per
//! file. No cross-file merging is attempted.

use super::RawChapter;
use crate::document::epub::EpubDocument;
use log::debug;

/// Split an EPUB into chapter candidates.
///
/// Primary path: one chapter per resolved TOC entry, labelled by the entry.
/// Fallback (TOC missing, empty, or nothing resolved): one chapter per
/// spine document, titled by the first h1-h3 heading, then the cleaned
/// file stem, then a synthesized "Chapter N".
pub(crate) fn segment_epub(doc: &EpubDocument) -> Vec<RawChapter> {
    let from_toc: Vec<RawChapter> = doc
        .toc
        .iter()
        .filter_map(|entry| {
            let html = entry.html.as_ref()?;
            Some(RawChapter {
                title: entry.label.trim().to_string(),
                text: html_to_text(html),
            })
        })
        .collect();

    if !from_toc.is_empty() {
        debug!("segmented via table of contents: {} entries", from_toc.len());
        return from_toc;
    }

    debug!("no usable TOC, falling back to spine order");
    let mut chapters = Vec::new();
    for item in &doc.spine {
        let Some(html) = item.html.as_ref() else {
            // Unresolved spine items were already warned about by the loader.
            continue;
        };
        let title = extract_heading(html)
            .or_else(|| item.file_stem.as_deref().map(clean_file_stem))
            .unwrap_or_default();
        chapters.push(RawChapter {
            title,
            text: html_to_text(html),
        });
    }
    chapters
}

/// Convert a content document to plain text with paragraph breaks kept.
///
/// html2text renders block-level boundaries as blank lines and drops
/// script/style content; we then re-flow its wrapped lines so each
/// paragraph is a single line separated by blank lines.
fn html_to_text(html: &str) -> String {
    let rendered = html2text::from_read(html.as_bytes(), 1000);

    let mut result = String::new();
    let mut prev_was_break = false;
    for line in rendered.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_was_break && !result.is_empty() {
                result.push_str("\n\n");
                prev_was_break = true;
            }
            continue;
        }
        prev_was_break = false;
        if !result.is_empty() && !result.ends_with('\n') {
            result.push(' ');
        }
        // html2text marks headings with "#" prefixes; drop them so they
        // are not read aloud.
        let stripped = trimmed.trim_start_matches('#');
        if stripped.len() < trimmed.len() {
            result.push_str(stripped.trim_start());
        } else {
            result.push_str(trimmed);
        }
    }

    result.trim().to_string()
}

/// First h1/h2/h3 heading text in document order, if any.
fn extract_heading(html: &str) -> Option<String> {
    let html_lower = html.to_lowercase();

    let mut earliest: Option<(usize, String)> = None;
    for tag in ["h1", "h2", "h3"] {
        let open = format!("<{}", tag);
        let close = format!("</{}>", tag);

        let Some(start) = html_lower.find(&open) else {
            continue;
        };
        let Some(tag_end) = html_lower[start..].find('>') else {
            continue;
        };
        let content_start = start + tag_end + 1;
        let Some(end) = html_lower[content_start..].find(&close) else {
            continue;
        };

        let heading = strip_html_tags(&html[content_start..content_start + end]);
        let heading = heading.trim();
        if heading.is_empty() {
            continue;
        }
        if earliest.as_ref().is_none_or(|(pos, _)| start < *pos) {
            earliest = Some((start, heading.to_string()));
        }
    }

    earliest.map(|(_, heading)| heading)
}

/// Strip markup from a fragment, keeping only text content.
fn strip_html_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}

/// Turn a content file stem into a readable title: separators become
/// spaces and each word is capitalized ("ch02" -> "Ch02").
fn clean_file_stem(stem: &str) -> String {
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::epub::{SpineItem, TocEntry};

    fn spine_item(file_stem: Option<&str>, html: Option<&str>) -> SpineItem {
        SpineItem {
            file_stem: file_stem.map(|s| s.to_string()),
            html: html.map(|s| s.to_string()),
        }
    }

    fn epub(toc: Vec<TocEntry>, spine: Vec<SpineItem>) -> EpubDocument {
        EpubDocument {
            title: None,
            author: None,
            toc,
            spine,
        }
    }

    #[test]
    fn test_toc_path_uses_labels() {
        let doc = epub(
            vec![
                TocEntry {
                    label: "Prologue".to_string(),
                    html: Some("<p>It begins.</p>".to_string()),
                },
                TocEntry {
                    label: "The Road".to_string(),
                    html: Some("<p>It continues.</p>".to_string()),
                },
            ],
            vec![spine_item(Some("ignored"), Some("<p>spine text</p>"))],
        );

        let chapters = segment_epub(&doc);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Prologue");
        assert_eq!(chapters[0].text, "It begins.");
        assert_eq!(chapters[1].title, "The Road");
    }

    #[test]
    fn test_unresolved_toc_entries_are_skipped() {
        let doc = epub(
            vec![
                TocEntry {
                    label: "Lost".to_string(),
                    html: None,
                },
                TocEntry {
                    label: "Found".to_string(),
                    html: Some("<p>Here.</p>".to_string()),
                },
            ],
            vec![],
        );

        let chapters = segment_epub(&doc);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Found");
    }

    #[test]
    fn test_spine_fallback_title_chain() {
        // Empty TOC; first item has a heading, second only a file name.
        let doc = epub(
            vec![],
            vec![
                spine_item(
                    Some("ch01"),
                    Some("<h2>Arrival</h2><p>Text of the first chapter.</p>"),
                ),
                spine_item(Some("ch02"), Some("<p>No heading here.</p>")),
            ],
        );

        let chapters = segment_epub(&doc);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Arrival");
        assert_eq!(chapters[1].title, "Ch02");
    }

    #[test]
    fn test_spine_fallback_without_stem_leaves_title_empty() {
        let doc = epub(vec![], vec![spine_item(None, Some("<p>Body.</p>"))]);

        let chapters = segment_epub(&doc);
        assert_eq!(chapters.len(), 1);
        // The shared numbering pass synthesizes "Chapter N" for this.
        assert_eq!(chapters[0].title, "");
    }

    #[test]
    fn test_whitespace_only_spine_item_yields_empty_candidate() {
        let doc = epub(vec![], vec![spine_item(Some("blank"), Some("<p>   </p>"))]);

        let chapters = segment_epub(&doc);
        assert_eq!(chapters.len(), 1);
        assert!(chapters[0].text.trim().is_empty());
    }

    #[test]
    fn test_extract_heading_prefers_document_order() {
        let html = "<h2>First</h2><h1>Second</h1>";
        assert_eq!(extract_heading(html), Some("First".to_string()));
    }

    #[test]
    fn test_extract_heading_skips_empty() {
        let html = "<h1> </h1><h2>Real Title</h2>";
        assert_eq!(extract_heading(html), Some("Real Title".to_string()));
    }

    #[test]
    fn test_extract_heading_none() {
        assert_eq!(extract_heading("<p>Just a paragraph.</p>"), None);
    }

    #[test]
    fn test_clean_file_stem() {
        assert_eq!(clean_file_stem("ch02"), "Ch02");
        assert_eq!(clean_file_stem("the_long_road"), "The Long Road");
        assert_eq!(clean_file_stem("part-one"), "Part One");
    }

    #[test]
    fn test_html_to_text_preserves_paragraph_breaks() {
        let text = html_to_text("<p>First paragraph.</p><p>Second paragraph.</p>");
        assert_eq!(text, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html_tags("<em>Hello</em> world"), "Hello world");
    }
}
