//! DOCX loading: ordered paragraphs with their style names.
//!
//! A DOCX file is a ZIP container; the document body lives in
//! `word/document.xml`. We only need paragraph boundaries, paragraph style
//! ids (for heading detection), and run text.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// A single paragraph from the document body.
#[derive(Debug, Clone)]
pub struct DocxParagraph {
    /// Style id from `w:pStyle` (e.g. "Heading1", "Normal"), if present.
    pub style: Option<String>,
    /// Concatenated run text.
    pub text: String,
}

impl DocxParagraph {
    /// Heading level if this paragraph uses a heading style.
    ///
    /// Word style ids are usually "Heading1".."Heading9", but "Heading 1"
    /// variants show up in converted documents.
    pub fn heading_level(&self) -> Option<u8> {
        let style = self.style.as_deref()?;
        let rest = style
            .strip_prefix("Heading")
            .or_else(|| style.strip_prefix("heading"))?;
        rest.trim_start_matches([' ', '_']).parse().ok()
    }
}

/// Parsed DOCX body: paragraphs in document order.
#[derive(Debug)]
pub struct DocxDocument {
    pub paragraphs: Vec<DocxParagraph>,
}

/// Load a DOCX file and extract its paragraphs.
pub fn load_docx(path: &Path) -> Result<DocxDocument> {
    let file = std::fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| Error::DocumentParse("missing word/document.xml".to_string()))?
        .read_to_string(&mut xml)?;

    parse_document_xml(&xml)
}

/// Parse the body XML into paragraphs.
fn parse_document_xml(xml: &str) -> Result<DocxDocument> {
    // Run text inside w:t is significant, so text trimming stays off.
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut in_paragraph = false;
    let mut in_text_run = false;
    let mut style: Option<String> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    style = None;
                    text.clear();
                }
                b"w:t" => in_text_run = in_paragraph,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:pStyle" if in_paragraph => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"w:val" {
                            style = Some(String::from_utf8(attr.value.to_vec())?);
                        }
                    }
                }
                b"w:br" if in_paragraph => text.push('\n'),
                b"w:tab" if in_paragraph => text.push(' '),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_run {
                    text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                // Entity references like &amp; inside run text
                if in_text_run {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    let resolved = match entity.as_ref() {
                        "apos" => "'",
                        "quot" => "\"",
                        "lt" => "<",
                        "gt" => ">",
                        "amp" => "&",
                        _ => "",
                    };
                    text.push_str(resolved);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    in_paragraph = false;
                    paragraphs.push(DocxParagraph {
                        style: style.take(),
                        text: std::mem::take(&mut text),
                    });
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Ok(DocxDocument { paragraphs })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(style: Option<&str>, text: &str) -> DocxParagraph {
        DocxParagraph {
            style: style.map(|s| s.to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(paragraph(Some("Heading1"), "Intro").heading_level(), Some(1));
        assert_eq!(paragraph(Some("Heading 2"), "Body").heading_level(), Some(2));
        assert_eq!(paragraph(Some("heading 3"), "Sub").heading_level(), Some(3));
        assert_eq!(paragraph(Some("Normal"), "Text").heading_level(), None);
        assert_eq!(paragraph(Some("Title"), "Text").heading_level(), None);
        assert_eq!(paragraph(None, "Text").heading_level(), None);
    }

    #[test]
    fn test_parse_paragraphs_with_styles() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:pPr><w:pStyle w:val="Heading1"/></w:pPr>
      <w:r><w:t>Chapter One</w:t></w:r>
    </w:p>
    <w:p>
      <w:r><w:t>First </w:t></w:r>
      <w:r><w:t>paragraph.</w:t></w:r>
    </w:p>
  </w:body>
</w:document>"#;

        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.paragraphs.len(), 2);
        assert_eq!(doc.paragraphs[0].style.as_deref(), Some("Heading1"));
        assert_eq!(doc.paragraphs[0].text, "Chapter One");
        assert_eq!(doc.paragraphs[1].style, None);
        assert_eq!(doc.paragraphs[1].text, "First paragraph.");
    }

    #[test]
    fn test_parse_preserves_breaks_and_tabs() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>one</w:t><w:br/><w:t>two</w:t><w:tab/><w:t>three</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.paragraphs[0].text, "one\ntwo three");
    }

    #[test]
    fn test_parse_ignores_text_outside_runs() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>kept</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let doc = parse_document_xml(xml).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.paragraphs[0].text, "kept");
    }

    #[test]
    fn test_load_docx_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        assert!(load_docx(&path).is_err());
    }
}
