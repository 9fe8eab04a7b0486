use std::path::Path;

use lopdf::Document as PdfDocument;
use tracing::debug;

use super::{Extractor, FileKind};
use crate::config::ExtractConfig;
use crate::error::{Error, Result};

/// Built-in extractor for PDF text layers, DOCX and plain text.
///
/// Images, and PDFs when `use_ocr` is set, are recognized with Tesseract
/// in builds with the `ocr` feature; other builds fail them with
/// [`Error::OcrUnavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub const fn new() -> Self {
        Self
    }

    /// Page texts in page order, each followed by one newline
    fn extract_pdf(path: &Path) -> Result<String> {
        let doc = PdfDocument::load(path).map_err(|e| Error::Extraction {
            kind: FileKind::Pdf,
            reason: e.to_string(),
        })?;

        let pages = doc.get_pages();
        debug!("Extracting text from {} PDF page(s)", pages.len());

        let mut text = String::new();
        for page_num in pages.keys() {
            let page_text = doc.extract_text(&[*page_num]).map_err(|e| Error::Extraction {
                kind: FileKind::Pdf,
                reason: format!("page {page_num}: {e}"),
            })?;
            text.push_str(page_text.trim_end_matches('\n'));
            text.push('\n');
        }
        Ok(text)
    }

    fn extract_docx(path: &Path) -> Result<String> {
        docx_lite::extract_text(path).map_err(|e| Error::Extraction {
            kind: FileKind::Docx,
            reason: e.to_string(),
        })
    }

    fn extract_txt(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| Error::Extraction {
            kind: FileKind::Text,
            reason: e.to_string(),
        })
    }

    #[cfg(feature = "ocr")]
    fn recognize(path: &Path, kind: FileKind, options: &ExtractConfig) -> Result<String> {
        debug!("Running OCR ({}) on {}", options.ocr_lang, path.display());
        super::ocr::recognize(path, kind, &options.ocr_lang)
    }

    #[cfg(not(feature = "ocr"))]
    #[allow(clippy::unnecessary_wraps)]
    fn recognize(_path: &Path, kind: FileKind, _options: &ExtractConfig) -> Result<String> {
        Err(Error::OcrUnavailable { kind })
    }
}

impl Extractor for DocumentExtractor {
    fn extract(&self, path: &Path, kind: FileKind, options: &ExtractConfig) -> Result<String> {
        debug!("Extracting {} text from {}", kind, path.display());
        match kind {
            FileKind::Pdf if options.use_ocr => Self::recognize(path, kind, options),
            FileKind::Pdf => Self::extract_pdf(path),
            FileKind::Docx => Self::extract_docx(path),
            FileKind::Text => Self::extract_txt(path),
            FileKind::Image => Self::recognize(path, kind, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use std::io::Write;

    /// Write a PDF with one line of Courier text per page
    fn write_pdf(pages: &[&str]) -> tempfile::NamedTempFile {
        let mut doc = PdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let stream = Stream::new(dictionary! {}, content.encode().unwrap());
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        doc.save(file.path()).unwrap();
        file
    }

    #[test]
    fn test_extract_txt() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Hello world\nSecond line").unwrap();

        let text = DocumentExtractor::new()
            .extract(file.path(), FileKind::Text, &ExtractConfig::default())
            .unwrap();
        assert_eq!(text, "Hello world\nSecond line");
    }

    #[test]
    fn test_extract_txt_invalid_utf8() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        let err = DocumentExtractor::new()
            .extract(file.path(), FileKind::Text, &ExtractConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { kind: FileKind::Text, .. }));
    }

    #[test]
    fn test_extract_pdf_pages_in_order() {
        let file = write_pdf(&["page1", "page2"]);

        let text = DocumentExtractor::new()
            .extract(file.path(), FileKind::Pdf, &ExtractConfig::default())
            .unwrap();
        assert_eq!(text, "page1\npage2\n");
    }

    #[test]
    fn test_extract_docx_paragraphs() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("two_paragraphs.docx");

        let text = DocumentExtractor::new()
            .extract(&path, FileKind::Docx, &ExtractConfig::default())
            .unwrap();
        assert_eq!(text, "Hello world.\nSecond paragraph.\n");
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn test_image_needs_ocr() {
        let err = DocumentExtractor::new()
            .extract(Path::new("scan.png"), FileKind::Image, &ExtractConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::OcrUnavailable { kind: FileKind::Image }));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn test_pdf_ocr_mode_needs_ocr() {
        let options = ExtractConfig {
            use_ocr: true,
            ..Default::default()
        };
        let err = DocumentExtractor::new()
            .extract(Path::new("scan.pdf"), FileKind::Pdf, &options)
            .unwrap_err();
        assert!(matches!(err, Error::OcrUnavailable { kind: FileKind::Pdf }));
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn test_ocr_pdf_without_scanned_pages() {
        let file = write_pdf(&["text layer only"]);
        let options = ExtractConfig {
            use_ocr: true,
            ..Default::default()
        };

        let err = DocumentExtractor::new()
            .extract(file.path(), FileKind::Pdf, &options)
            .unwrap_err();
        let Error::Extraction { kind, reason } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(kind, FileKind::Pdf);
        assert!(reason.contains("no scanned page images"), "{reason}");
    }

    #[test]
    fn test_invalid_pdf() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"not a pdf").unwrap();

        let err = DocumentExtractor::new()
            .extract(file.path(), FileKind::Pdf, &ExtractConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { kind: FileKind::Pdf, .. }));
    }

    #[test]
    fn test_invalid_docx() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"PK not really a zip").unwrap();

        let err = DocumentExtractor::new()
            .extract(file.path(), FileKind::Docx, &ExtractConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Extraction { kind: FileKind::Docx, .. }));
    }
}
