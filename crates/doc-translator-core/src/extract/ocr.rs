//! OCR through Tesseract, for images and scanned PDFs.

use std::fmt::Display;
use std::path::Path;

use lopdf::Document as PdfDocument;
use lopdf::xobject::PdfImage;
use tesseract::Tesseract;
use tracing::debug;

use super::FileKind;
use crate::error::{Error, Result};

/// Stream filters whose data is a complete image file Leptonica can decode
const ENCODED_IMAGE_FILTERS: &[&str] = &["DCTDecode", "JPXDecode"];

fn ocr_error(kind: FileKind, stage: &str, e: impl Display) -> Error {
    Error::Extraction {
        kind,
        reason: format!("OCR {stage} failed: {e}"),
    }
}

/// Recognize the text of `path`, an image file or a scanned PDF
pub fn recognize(path: &Path, kind: FileKind, lang: &str) -> Result<String> {
    match kind {
        FileKind::Pdf => recognize_pdf(path, lang),
        _ => recognize_image_file(path, kind, lang),
    }
}

fn recognize_image_file(path: &Path, kind: FileKind, lang: &str) -> Result<String> {
    let path_str = path.to_str().ok_or_else(|| Error::Extraction {
        kind,
        reason: format!("path is not valid UTF-8: {}", path.display()),
    })?;

    Tesseract::new(None, Some(lang))
        .map_err(|e| ocr_error(kind, "init", e))?
        .set_image(path_str)
        .map_err(|e| ocr_error(kind, "image load", e))?
        .recognize()
        .map_err(|e| ocr_error(kind, "recognition", e))?
        .get_text()
        .map_err(|e| ocr_error(kind, "text output", e))
}

fn recognize_encoded_image(data: &[u8], lang: &str) -> Result<String> {
    let kind = FileKind::Pdf;
    Tesseract::new(None, Some(lang))
        .map_err(|e| ocr_error(kind, "init", e))?
        .set_image_from_mem(data)
        .map_err(|e| ocr_error(kind, "image load", e))?
        .recognize()
        .map_err(|e| ocr_error(kind, "recognition", e))?
        .get_text()
        .map_err(|e| ocr_error(kind, "text output", e))
}

fn is_encoded_image(image: &PdfImage<'_>) -> bool {
    matches!(
        image.filters.as_deref(),
        Some([filter]) if ENCODED_IMAGE_FILTERS.contains(&filter.as_str())
    )
}

/// OCR of the page images of a scanned PDF, one newline-terminated block
/// per image, in page order
fn recognize_pdf(path: &Path, lang: &str) -> Result<String> {
    let doc = PdfDocument::load(path).map_err(|e| Error::Extraction {
        kind: FileKind::Pdf,
        reason: e.to_string(),
    })?;

    let mut text = String::new();
    let mut recognized = 0usize;
    for (page_num, page_id) in doc.get_pages() {
        // Pages without an XObject dictionary have no images
        let images = doc.get_page_images(page_id).unwrap_or_default();
        let scans: Vec<_> = images.iter().filter(|img| is_encoded_image(img)).collect();
        debug!("Page {}: {} scanned image(s)", page_num, scans.len());

        for image in scans {
            let page_text = recognize_encoded_image(image.content, lang)?;
            text.push_str(page_text.trim_end_matches('\n'));
            text.push('\n');
            recognized += 1;
        }
    }

    if recognized == 0 {
        return Err(Error::Extraction {
            kind: FileKind::Pdf,
            reason: "no scanned page images found for OCR".to_string(),
        });
    }
    Ok(text)
}
