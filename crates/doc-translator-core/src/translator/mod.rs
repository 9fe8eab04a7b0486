mod google;
mod openai;
mod retry;
mod traits;

pub use google::GoogleTranslator;
pub use openai::OpenAiTranslator;
pub use retry::RetryPolicy;
pub use traits::{Translator, TranslatorInfo};

use crate::config::{TranslatorBackend, TranslatorConfig};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

/// Create a translator from configuration
pub fn create_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
    let retry = RetryPolicy::with_retries(config.retry_count, config.retry_delay_ms);
    let timeout = Duration::from_secs(config.timeout_secs);
    let api_base = config.api_base().to_string();

    let translator: Arc<dyn Translator> = match config.backend {
        TranslatorBackend::Google => Arc::new(GoogleTranslator::new(api_base, retry, timeout)?),
        TranslatorBackend::OpenAi => Arc::new(OpenAiTranslator::new(
            api_base,
            config.api_key.clone(),
            config.model.clone(),
            retry,
            timeout,
        )?),
    };

    Ok(translator)
}
