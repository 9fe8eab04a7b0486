//! Document Translator Core Library
//!
//! This library provides the core functionality for translating documents:
//! - Text extraction from PDF, DOCX and TXT files, with optional OCR
//!   (`ocr` feature) for images and scanned PDFs
//! - Chunking of long text under a translation service's length limit
//! - Translation via Google Translate or OpenAI-compatible APIs
//! - Reassembly of translated segments into a single text

pub mod chunker;
pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod reassemble;
pub mod translator;
pub mod util;

pub use chunker::{Chunker, Chunks, Segment};
pub use config::{
    AppConfig, ExtractConfig, JoinSeparator, Lang, LanguageOption, PipelineConfig,
    TranslatorBackend, TranslatorConfig, supported_languages,
    DEFAULT_MAX_CHUNK_LENGTH, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG,
};
pub use error::{Error, ErrorKind, Result};
pub use extract::{DocumentExtractor, Extractor, FileKind};
pub use pipeline::{PipelineOutput, ProgressFn, SegmentTranslator, TranslationPipeline};
pub use reassemble::{reassemble, TranslatedSegment};
pub use translator::{create_translator, GoogleTranslator, OpenAiTranslator, Translator};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// High-level document translator: extraction followed by the chunked
/// translation pipeline
pub struct DocumentTranslator {
    extractor: Arc<dyn Extractor>,
    pipeline: TranslationPipeline,
    config: AppConfig,
}

/// Result of translating a document or a pasted text
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    /// Kind of the source file, `None` for pasted text
    pub kind: Option<FileKind>,
    pub source_text: String,
    pub translated_text: String,
    pub segment_count: usize,
    pub skipped_segments: usize,
}

impl TranslatedDocument {
    /// Write the translation as a UTF-8 text file
    pub fn write_txt(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.translated_text.as_bytes())?;
        Ok(())
    }
}

impl DocumentTranslator {
    /// Create a document translator with the configured backend
    pub fn new(config: AppConfig) -> Result<Self> {
        let translator = create_translator(&config.translator)?;
        Self::with_translator(translator, config)
    }

    /// Create with a custom translator
    pub fn with_translator(translator: Arc<dyn Translator>, config: AppConfig) -> Result<Self> {
        Self::with_parts(Arc::new(DocumentExtractor::new()), translator, config)
    }

    /// Create with a custom extractor and translator
    pub fn with_parts(
        extractor: Arc<dyn Extractor>,
        translator: Arc<dyn Translator>,
        config: AppConfig,
    ) -> Result<Self> {
        config.validate()?;
        let pipeline = TranslationPipeline::new(translator, config.pipeline.clone())?;

        Ok(Self {
            extractor,
            pipeline,
            config,
        })
    }

    /// Extract text from `path` without translating it
    pub async fn extract_file(&self, path: &Path) -> Result<String> {
        let kind = FileKind::from_path(path)?;
        let extractor = Arc::clone(&self.extractor);
        let options = self.config.extract.clone();
        let owned_path: PathBuf = path.to_path_buf();

        // Parsing documents is blocking work
        tokio::task::spawn_blocking(move || extractor.extract(&owned_path, kind, &options))
            .await
            .map_err(|e| {
                error!("Extraction task panicked: {}", e);
                Error::Extraction {
                    kind,
                    reason: "extraction task failed".to_string(),
                }
            })?
    }

    /// Extract and translate a document
    pub async fn translate_file(
        &self,
        path: &Path,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<TranslatedDocument> {
        let kind = FileKind::from_path(path)?;
        info!("Translating {} file {}", kind, path.display());

        let extracted = self.extract_file(path).await;
        let source_text = extracted.as_ref().cloned().unwrap_or_default();
        let output = self.pipeline.translate_extracted(extracted, progress).await?;

        Ok(TranslatedDocument {
            kind: Some(kind),
            source_text,
            translated_text: output.text,
            segment_count: output.segment_count,
            skipped_segments: output.skipped_count,
        })
    }

    /// Translate pasted text
    pub async fn translate_text(
        &self,
        text: &str,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<TranslatedDocument> {
        let output = self.pipeline.translate_with_progress(text, progress).await?;

        Ok(TranslatedDocument {
            kind: None,
            source_text: text.to_string(),
            translated_text: output.text,
            segment_count: output.segment_count,
            skipped_segments: output.skipped_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.source_lang.as_str(), "en");
        assert_eq!(config.pipeline.target_lang.as_str(), "si");
        assert_eq!(config.translator.backend, TranslatorBackend::Google);
    }
}
