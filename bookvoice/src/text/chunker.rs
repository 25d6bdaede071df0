//! Chapter text chunking for the synthesis API's input limit.
//!
//! Greedy accumulation: paragraphs first, sentences when a paragraph alone
//! is too big, and a hard character split as the last resort so no text is
//! ever dropped. The same input and limit always produce the same chunks.

use super::TextChunk;
use seams::sentence_detector::dialog_detector::SentenceDetectorDialog;
use std::sync::OnceLock;

/// Default maximum characters per chunk (the OpenAI speech input limit).
pub const DEFAULT_MAX_CHARS: usize = 4096;

/// Global detector instance (lazy initialization).
static DETECTOR: OnceLock<SentenceDetectorDialog> = OnceLock::new();

fn sentence_detector() -> &'static SentenceDetectorDialog {
    DETECTOR.get_or_init(|| {
        SentenceDetectorDialog::new().expect("seams sentence detector should initialize")
    })
}

/// Split text into sentences using the seams library (dialog-aware).
fn split_into_sentences(text: &str) -> Vec<String> {
    let sentences = sentence_detector()
        .detect_sentences_borrowed(text)
        .expect("seams sentence detection should succeed");

    sentences
        .iter()
        .map(|s| s.normalize())
        .filter(|s| !s.is_empty())
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Push the accumulated chunk, if non-empty, and reset it.
fn flush(chunks: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
}

/// Split a chapter's text into chunks of at most `max_chars` characters.
///
/// Paragraphs (blank-line-delimited) are packed greedily, rejoined with a
/// paragraph break. An oversized paragraph is packed sentence by sentence;
/// an oversized sentence is hard-split at the character limit.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n") {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            continue;
        }

        if char_len(paragraph) > max_chars {
            flush(&mut chunks, &mut current);
            split_oversized_paragraph(paragraph, max_chars, &mut chunks);
            continue;
        }

        if current.is_empty() {
            current.push_str(paragraph);
        } else if char_len(&current) + 2 + char_len(paragraph) <= max_chars {
            current.push_str("\n\n");
            current.push_str(paragraph);
        } else {
            flush(&mut chunks, &mut current);
            current.push_str(paragraph);
        }
    }
    flush(&mut chunks, &mut current);

    chunks
}

/// Pack a paragraph that exceeds the limit sentence by sentence.
fn split_oversized_paragraph(paragraph: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let sentences = split_into_sentences(paragraph);
    if sentences.is_empty() {
        chunks.extend(hard_split(paragraph, max_chars));
        return;
    }

    let mut current = String::new();
    for sentence in sentences {
        if char_len(&sentence) > max_chars {
            flush(chunks, &mut current);
            chunks.extend(hard_split(&sentence, max_chars));
            continue;
        }

        if current.is_empty() {
            current = sentence;
        } else if char_len(&current) + 1 + char_len(&sentence) <= max_chars {
            current.push(' ');
            current.push_str(&sentence);
        } else {
            flush(chunks, &mut current);
            current = sentence;
        }
    }
    flush(chunks, &mut current);
}

/// Split text at exact character positions (last resort, never drops text).
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + max_chars).min(chars.len());
        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim().to_string();
        if !piece.is_empty() {
            pieces.push(piece);
        }
        start = end;
    }

    pieces
}

/// Chunk one chapter's text into ordered [`TextChunk`] records.
pub fn chunk_chapter(chapter_index: usize, text: &str, max_chars: usize) -> Vec<TextChunk> {
    let pieces = chunk_text(text, max_chars);
    let count = pieces.len();

    pieces
        .into_iter()
        .enumerate()
        .map(|(sequence, text)| TextChunk {
            chapter_index,
            sequence,
            text,
            is_last_in_chapter: sequence + 1 == count,
        })
        .collect()
}
