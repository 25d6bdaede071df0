//! Error types for document loading and chapter segmentation.

use thiserror::Error;

/// Errors that can occur while loading or segmenting a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document cannot yield any chapter: corrupt, unreadable, or
    /// structurally empty. Fatal for the conversion of that document.
    #[error("Failed to parse document: {0}")]
    DocumentParse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
