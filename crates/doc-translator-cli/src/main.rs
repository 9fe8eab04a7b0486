//! Document Translator CLI - Command line tool for translating documents
//! between English and Sinhala.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use doc_translator_core::{
    AppConfig, DocumentTranslator, JoinSeparator, Lang, TranslatedDocument, TranslatorBackend,
    util::default_output_path,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeparatorOption {
    /// One translated segment per line (documents)
    Newline,
    /// Segments joined with spaces (short text)
    Space,
}

impl From<SeparatorOption> for JoinSeparator {
    fn from(opt: SeparatorOption) -> Self {
        match opt {
            SeparatorOption::Newline => Self::Newline,
            SeparatorOption::Space => Self::Space,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendOption {
    Google,
    Openai,
}

impl From<BackendOption> for TranslatorBackend {
    fn from(opt: BackendOption) -> Self {
        match opt {
            BackendOption::Google => Self::Google,
            BackendOption::Openai => Self::OpenAi,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "doc-translate")]
#[command(author, version, about = "Translate PDF, DOCX, TXT documents or pasted text", long_about = None)]
struct Args {
    /// Input document (.pdf, .docx, .txt, .jpg, .jpeg, .png, .bmp, .tiff)
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Translate this text instead of a file ("-" reads stdin)
    #[arg(long)]
    text: Option<String>,

    /// Output TXT file (default: <input>-<target>.txt, stdout for --text)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Source language code
    #[arg(short = 's', long)]
    source: Option<String>,

    /// Target language code
    #[arg(short = 't', long)]
    target: Option<String>,

    /// Maximum characters per translation request
    #[arg(long)]
    max_chunk_length: Option<usize>,

    /// How translated segments are joined (default: newline for files, space for --text)
    #[arg(long, value_enum)]
    separator: Option<SeparatorOption>,

    /// Translation requests allowed in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Use OCR for scanned PDFs (images always go through OCR)
    #[arg(long)]
    ocr: bool,

    /// Tesseract language for OCR, e.g. "eng" or "eng+sin"
    #[arg(long)]
    ocr_lang: Option<String>,

    /// Translation backend
    #[arg(long, value_enum)]
    backend: Option<BackendOption>,

    /// Translation API base URL
    #[arg(long, env = "TRANSLATOR_API_BASE")]
    api_base: Option<String>,

    /// API key (OpenAI-compatible backend)
    #[arg(long, env = "OPENAI_API_KEY")]
    api_key: Option<String>,

    /// Model name for OpenAI-compatible API
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Apply command line overrides on top of the loaded config
    fn apply(&self, config: &mut AppConfig) {
        if let Some(ref source) = self.source {
            config.pipeline.source_lang = Lang::new(source);
        }
        if let Some(ref target) = self.target {
            config.pipeline.target_lang = Lang::new(target);
        }
        if let Some(len) = self.max_chunk_length {
            config.pipeline.max_chunk_length = len;
        }
        if let Some(n) = self.concurrency {
            config.pipeline.max_concurrent_requests = n;
        }
        if let Some(separator) = self.separator {
            config.pipeline.join_separator = separator.into();
        } else if self.text.is_some() {
            config.pipeline.join_separator = JoinSeparator::Space;
        }
        if self.ocr {
            config.extract.use_ocr = true;
        }
        if let Some(ref lang) = self.ocr_lang {
            config.extract.ocr_lang.clone_from(lang);
        }
        if let Some(backend) = self.backend {
            config.translator.backend = backend.into();
        }
        if self.api_base.is_some() {
            config.translator.api_base.clone_from(&self.api_base);
        }
        if self.api_key.is_some() {
            config.translator.api_key.clone_from(&self.api_key);
        }
        if let Some(ref model) = self.model {
            config.translator.model.clone_from(model);
        }
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({eta})",
            )
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn read_text_arg(text: &str) -> Result<String> {
    if text != "-" {
        return Ok(text.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read text from stdin")?;
    Ok(buf)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };
    args.apply(&mut config);

    let translator = DocumentTranslator::new(config.clone())
        .context("Failed to initialize translator")?;

    let pb = progress_bar();
    let on_progress = |done: usize, total: usize| {
        pb.set_length(u64::try_from(total).unwrap_or(u64::MAX));
        pb.set_position(u64::try_from(done).unwrap_or(u64::MAX));
    };

    let result: TranslatedDocument = if let Some(ref text) = args.text {
        let text = read_text_arg(text)?;
        translator
            .translate_text(&text, Some(&on_progress))
            .await
            .context("Translation failed")?
    } else {
        let input = args
            .input
            .as_deref()
            .context("An input file or --text is required")?;
        info!("Translating {}", input.display());
        translator
            .translate_file(input, Some(&on_progress))
            .await
            .context(format!("Failed to translate {}", input.display()))?
    };
    pb.finish_and_clear();

    info!(
        "{} segment(s), {} blank skipped",
        result.segment_count, result.skipped_segments
    );

    let output_path = args.output.clone().or_else(|| {
        args.input
            .as_deref()
            .map(|input| default_output_path(input, config.pipeline.target_lang.as_str()))
    });

    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        if let Some(path) = output_path {
            result
                .write_txt(&path)
                .context(format!("Failed to write output: {}", path.display()))?;
            println!("Translated text saved to: {}", path.display());
        } else {
            println!("{}", result.translated_text);
        }
    }

    Ok(())
}
