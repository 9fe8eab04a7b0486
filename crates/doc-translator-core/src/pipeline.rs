//! Chunked translation pipeline.
//!
//! `text -> Chunker -> segments -> SegmentTranslator -> reassemble -> text`
//!
//! Every call is independent: the pipeline holds only its configuration and
//! the injected translator client. The first failing segment aborts the run
//! and nothing translated so far is returned.

use std::pin::pin;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::chunker::{Chunker, Segment};
use crate::config::{Lang, PipelineConfig};
use crate::error::{Error, Result};
use crate::reassemble::{reassemble, TranslatedSegment};
use crate::translator::Translator;

/// Called with `(processed, total)` after each segment is handled
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Sync);

/// Translates one segment at a time through the external service
pub struct SegmentTranslator {
    translator: Arc<dyn Translator>,
    source: Lang,
    target: Lang,
}

impl SegmentTranslator {
    pub fn new(translator: Arc<dyn Translator>, source: Lang, target: Lang) -> Self {
        Self {
            translator,
            source,
            target,
        }
    }

    /// Translate `segment`, one of `total`.
    ///
    /// Blank segments are not sent and yield `None`; their whitespace does
    /// not appear in the output.
    pub async fn translate(
        &self,
        segment: Segment<'_>,
        total: usize,
    ) -> Result<Option<TranslatedSegment>> {
        if segment.is_blank() {
            debug!("Skipping blank segment {}/{}", segment.index + 1, total);
            return Ok(None);
        }

        debug!(
            "Translating segment {}/{} ({} chars) with {}",
            segment.index + 1,
            total,
            segment.char_len(),
            self.translator.name()
        );

        match self
            .translator
            .translate(segment.text, &self.source, &self.target)
            .await
        {
            Ok(text) => Ok(Some(TranslatedSegment {
                index: segment.index,
                text,
            })),
            Err(e) => {
                warn!("Segment {}/{} failed: {}", segment.index + 1, total, e);
                Err(Error::SegmentTranslation {
                    index: segment.index,
                    total,
                    source: Box::new(e),
                })
            }
        }
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub text: String,
    /// Segments the input was split into
    pub segment_count: usize,
    /// Segments sent to the translator
    pub translated_count: usize,
    /// Blank segments left out
    pub skipped_count: usize,
}

/// Chunk, translate and reassemble text with an injected translator
pub struct TranslationPipeline {
    segments: SegmentTranslator,
    chunker: Chunker,
    config: PipelineConfig,
}

impl TranslationPipeline {
    pub fn new(translator: Arc<dyn Translator>, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        if config.source_lang.is_auto() && !translator.info().supports_auto_detect {
            return Err(Error::ConfigInvalid {
                field: "source_lang".to_string(),
                reason: format!("{} cannot detect the source language", translator.name()),
            });
        }
        let chunker = Chunker::new(config.max_chunk_length)?;
        let segments = SegmentTranslator::new(
            translator,
            config.source_lang.clone(),
            config.target_lang.clone(),
        );

        Ok(Self {
            segments,
            chunker,
            config,
        })
    }

    /// Translate `text` and return the joined output
    pub async fn translate(&self, text: &str) -> Result<String> {
        self.translate_with_progress(text, None)
            .await
            .map(|output| output.text)
    }

    /// Translate text handed over by an extractor.
    ///
    /// An extraction failure is returned as-is; the translator is never
    /// called with an error message.
    pub async fn translate_extracted(
        &self,
        extracted: Result<String>,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<PipelineOutput> {
        let text = extracted?;
        self.translate_with_progress(&text, progress).await
    }

    pub async fn translate_with_progress(
        &self,
        text: &str,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<PipelineOutput> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let chunks = self.chunker.chunks(text);
        let total = chunks.len();
        info!(
            "Translating {} chars in {} segment(s), {} -> {}",
            text.chars().count(),
            total,
            self.config.source_lang,
            self.config.target_lang
        );

        // buffered() keeps results in input order; with a limit of 1 only
        // one request is ever in flight.
        let mut results = pin!(
            stream::iter(chunks)
                .map(|segment| self.segments.translate(segment, total))
                .buffered(self.config.max_concurrent_requests)
        );

        let mut translated = Vec::with_capacity(total);
        let mut skipped = 0;
        let mut processed = 0;
        while let Some(result) = results.next().await {
            match result? {
                Some(segment) => translated.push(segment),
                None => skipped += 1,
            }
            processed += 1;
            if let Some(callback) = progress {
                callback(processed, total);
            }
        }

        let translated_count = translated.len();
        let text = reassemble(translated, self.config.join_separator);
        info!(
            "Translated {} segment(s), skipped {} blank",
            translated_count, skipped
        );

        Ok(PipelineOutput {
            text,
            segment_count: total,
            translated_count,
            skipped_count: skipped,
        })
    }
}
