use async_trait::async_trait;

use crate::config::Lang;
use crate::error::Result;

/// What the pipeline needs to know about a backend before using it
#[derive(Debug, Clone, Copy)]
pub struct TranslatorInfo {
    /// Shown in logs and error messages
    pub name: &'static str,
    /// Whether the backend accepts `auto` as the source language
    pub supports_auto_detect: bool,
}

/// A length-limited external translation service.
///
/// One call translates one segment. Implementations are built once and
/// shared by every pipeline run; they must not keep state between calls.
/// Failures are reported with the `Translation*` variants of
/// [`crate::Error`] so the pipeline can tell transient ones apart.
#[async_trait]
pub trait Translator: Send + Sync {
    fn info(&self) -> TranslatorInfo;

    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate `text` from `source` into `target`
    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String>;
}
