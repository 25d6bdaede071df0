//! Text processing for TTS: cleaning and chunking.

pub mod chunker;
pub mod cleaner;

/// A bounded-length slice of a chapter's text, sized to fit one call to the
/// synthesis API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// Index of the chapter this chunk belongs to
    pub chapter_index: usize,
    /// Position within the chapter, 0-based and gap-free
    pub sequence: usize,
    /// The text content, never empty
    pub text: String,
    /// True for the final chunk of a chapter, so the caller knows where a
    /// chapter boundary falls in the audio stream
    pub is_last_in_chapter: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_chunk_fields() {
        let chunk = TextChunk {
            chapter_index: 2,
            sequence: 0,
            text: "Hello world".to_string(),
            is_last_in_chapter: true,
        };
        assert_eq!(chunk.chapter_index, 2);
        assert_eq!(chunk.sequence, 0);
        assert!(chunk.is_last_in_chapter);
    }
}
