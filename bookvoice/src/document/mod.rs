//! Document loading: format detection and per-format intermediate
//! representations.
//!
//! Loaders perform all file and archive I/O up front and hand the segmenters
//! a plain in-memory representation, so segmentation itself stays pure.

pub mod docx;
pub mod epub;
pub mod markdown;

use crate::error::{Error, Result};
use std::path::Path;

/// Supported input formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Docx,
    Epub,
    Markdown,
}

impl DocumentFormat {
    /// Detect the format from a file path, if it is one we support.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "docx" => Some(Self::Docx),
            "epub" => Some(Self::Epub),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// A loaded document, tagged by format.
#[derive(Debug)]
pub enum Document {
    Docx(docx::DocxDocument),
    Epub(epub::EpubDocument),
    Markdown(markdown::MarkdownDocument),
}

impl Document {
    /// "Title by Author" line from document metadata, for formats that
    /// carry any.
    pub fn metadata_summary(&self) -> Option<String> {
        match self {
            Document::Epub(doc) => match (&doc.title, &doc.author) {
                (Some(title), Some(author)) => Some(format!("{} by {}", title, author)),
                (Some(title), None) => Some(title.clone()),
                (None, Some(author)) => Some(format!("by {}", author)),
                (None, None) => None,
            },
            Document::Docx(_) | Document::Markdown(_) => None,
        }
    }
}

/// Load a document from disk, dispatching on the detected format.
pub fn load(path: &Path) -> Result<Document> {
    match DocumentFormat::from_path(path) {
        Some(DocumentFormat::Docx) => Ok(Document::Docx(docx::load_docx(path)?)),
        Some(DocumentFormat::Epub) => Ok(Document::Epub(epub::load_epub(path)?)),
        Some(DocumentFormat::Markdown) => {
            Ok(Document::Markdown(markdown::load_markdown(path)?))
        }
        None => Err(Error::UnsupportedFormat(format!(
            "{} (expected .docx, .epub, .md, or .markdown)",
            path.display()
        ))),
    }
}
