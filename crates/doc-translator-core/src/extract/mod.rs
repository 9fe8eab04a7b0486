//! Text extraction from uploaded documents.
//!
//! The document kind is decided from the file extension; an [`Extractor`]
//! turns a file of that kind into plain text.

mod document;
#[cfg(feature = "ocr")]
mod ocr;

pub use document::DocumentExtractor;

use std::fmt;
use std::path::Path;

use crate::config::ExtractConfig;
use crate::error::{Error, Result};

/// Kinds of documents the translator accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Pdf,
    Docx,
    Text,
    Image,
}

impl FileKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Text),
            "jpg" | "jpeg" | "png" | "bmp" | "tiff" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        Self::from_extension(ext).ok_or_else(|| {
            Error::UnsupportedFormat(if ext.is_empty() {
                String::new()
            } else {
                format!(".{ext}")
            })
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Text => "TXT",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns a document into plain text
pub trait Extractor: Send + Sync {
    fn extract(&self, path: &Path, kind: FileKind, options: &ExtractConfig) -> Result<String>;
}
