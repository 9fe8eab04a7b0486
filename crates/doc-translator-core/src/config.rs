use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Language codes following ISO 639-1 with regional variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the translation service should detect the source language
    pub fn is_auto(&self) -> bool {
        self.0 == "auto"
    }
}

// Serde default functions for the English -> Sinhala pair
fn default_source_lang() -> Lang {
    Lang::new(DEFAULT_SOURCE_LANG)
}

fn default_target_lang() -> Lang {
    Lang::new(DEFAULT_TARGET_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Separator placed between translated segments when they are joined.
///
/// Documents are joined line by line, short pasted text with single spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinSeparator {
    #[default]
    Newline,
    Space,
}

impl JoinSeparator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newline => "\n",
            Self::Space => " ",
        }
    }
}

/// Which translation service backs the [`crate::Translator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorBackend {
    /// Google Translate public web endpoint
    #[default]
    Google,
    /// Any OpenAI-compatible chat completions API (llama.cpp, Ollama, ...)
    OpenAi,
}

/// Translator backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub backend: TranslatorBackend,
    /// Base URL; defaults depend on the backend
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    /// Model identifier (OpenAI-compatible backend only)
    #[serde(default = "default_model")]
    pub model: String,
    /// Repeats after a failed request; 0 sends each request once
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl TranslatorConfig {
    /// Create a config for the Google backend with default endpoint
    pub fn google() -> Self {
        Self::default()
    }

    /// Create a config for an OpenAI-compatible backend
    pub fn openai(
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            backend: TranslatorBackend::OpenAi,
            api_base: Some(api_base.into()),
            api_key,
            model: model.into(),
            ..Self::default()
        }
    }

    /// The configured base URL, or the backend's default one
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(match self.backend {
            TranslatorBackend::Google => DEFAULT_GOOGLE_API_BASE,
            TranslatorBackend::OpenAi => DEFAULT_OPENAI_API_BASE,
        })
    }
}

fn default_model() -> String {
    "default_model".to_string()
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            backend: TranslatorBackend::default(),
            api_base: None,
            api_key: None,
            model: default_model(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings of the chunked translation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_source_lang")]
    pub source_lang: Lang,

    #[serde(default = "default_target_lang")]
    pub target_lang: Lang,

    /// Maximum segment length in characters
    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: usize,

    #[serde(default)]
    pub join_separator: JoinSeparator,

    /// Number of segment requests allowed in flight at once (1 = sequential)
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
}

const fn default_max_chunk_length() -> usize {
    DEFAULT_MAX_CHUNK_LENGTH
}

const fn default_max_concurrent_requests() -> usize {
    1
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            max_chunk_length: default_max_chunk_length(),
            join_separator: JoinSeparator::default(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_length == 0 {
            return Err(Error::ConfigInvalid {
                field: "max_chunk_length".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.max_concurrent_requests == 0 {
            return Err(Error::ConfigInvalid {
                field: "max_concurrent_requests".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.target_lang.is_auto() {
            return Err(Error::ConfigInvalid {
                field: "target_lang".to_string(),
                reason: "target language cannot be 'auto'".to_string(),
            });
        }
        Ok(())
    }
}

/// Extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Run OCR on PDFs instead of reading their text layer
    #[serde(default)]
    pub use_ocr: bool,

    /// Tesseract language code(s) for OCR, e.g. "eng" or "eng+sin"
    #[serde(default = "default_ocr_lang")]
    pub ocr_lang: String,
}

fn default_ocr_lang() -> String {
    DEFAULT_OCR_LANG.to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            use_ocr: false,
            ocr_lang: default_ocr_lang(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub translator: TranslatorConfig,

    #[serde(default)]
    pub extract: ExtractConfig,
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/doc-translator/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("doc-translator").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        if self.translator.timeout_secs == 0 {
            return Err(Error::ConfigInvalid {
                field: "translator.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// A language option for pickers
#[derive(Debug, Clone)]
pub struct LanguageOption {
    /// ISO language code (e.g., "en", "si")
    pub code: &'static str,
    /// Display name (e.g., "English", "Sinhala")
    pub name: &'static str,
}

/// Languages the translator offers in either direction.
pub fn supported_languages() -> Vec<LanguageOption> {
    vec![
        LanguageOption { code: "en", name: "English" },
        LanguageOption { code: "si", name: "Sinhala" },
        LanguageOption { code: "ta", name: "Tamil" },
        LanguageOption { code: "auto", name: "Auto" },
    ]
}

/// Human-readable name for a language code, if known.
pub fn language_name(code: &str) -> Option<&'static str> {
    supported_languages()
        .into_iter()
        .find(|lang| lang.code == code)
        .map(|lang| lang.name)
}

/// Default source language code
pub const DEFAULT_SOURCE_LANG: &str = "en";
/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "si";
/// Longest segment sent to the translation service in one request
pub const DEFAULT_MAX_CHUNK_LENGTH: usize = 4500;
/// Tesseract language used when none is configured
pub const DEFAULT_OCR_LANG: &str = "eng";
/// Google Translate web endpoint
pub const DEFAULT_GOOGLE_API_BASE: &str = "https://translate.googleapis.com";
/// Local OpenAI-compatible server
pub const DEFAULT_OPENAI_API_BASE: &str = "http://localhost:8080/v1";
