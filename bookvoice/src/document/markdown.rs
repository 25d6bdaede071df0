//! Markdown loading: the raw text is the intermediate representation.

use crate::error::Result;
use std::path::Path;

/// Raw Markdown source.
#[derive(Debug)]
pub struct MarkdownDocument {
    pub text: String,
}

/// Read a Markdown file as UTF-8 text.
pub fn load_markdown(path: &Path) -> Result<MarkdownDocument> {
    let text = std::fs::read_to_string(path)?;
    Ok(MarkdownDocument { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Title\n\nBody text.\n").unwrap();

        let doc = load_markdown(&path).unwrap();
        assert_eq!(doc.text, "# Title\n\nBody text.\n");
    }

    #[test]
    fn test_load_markdown_missing_file() {
        assert!(load_markdown(Path::new("/nonexistent/notes.md")).is_err());
    }
}
