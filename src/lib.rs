//! Single-document text profiling: language detection, tokenization, word
//! frequencies and sentiment for English and Chinese text, plus the chart and
//! report artifacts built from the result.
//!
//! The entry point is [`Analyzer`]. [`run`] wires the analyzer to the chart
//! renderer and the report exporter the way the command-line tool does.

pub mod chart;
pub mod diagnostics;
pub mod error;
pub mod language;
pub mod report;
pub mod sentiment;
pub mod stats;
pub mod tokenize;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize, Serializer};

pub use chart::{ChartArtifact, ChartData, generate_chart};
pub use diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use error::{AnalysisError, Result, SentimentModelFailure};
pub use language::{Language, detect_language};
pub use report::{ExportFormat, csv_safe_cell, export_report};
pub use sentiment::{
    ChineseStrategy, DEFAULT_SENTIMENT_PROFILE, EnglishStrategy, Intensity, Keyword, Polarity,
    SentimentEngine, SentimentProfile, SentimentStrategy,
};
pub use stats::{LexicalStats, aggregate, count_lines, count_words, top_words};
pub use tokenize::{AlphabeticTokenizer, LogographicTokenizer, Segment, Tokenizer, Tokenizers};

/// Default bound on one sentiment model call.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything known about one analyzed document. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub file_name: String,
    pub file_size_bytes: u64,
    pub char_count: usize,
    pub line_count: usize,
    pub language: Language,
    pub tokens: Vec<String>,
    pub token_count: usize,
    #[serde(serialize_with = "sorted_frequency")]
    pub frequency: HashMap<String, u32>,
    pub sentiment: SentimentProfile,
}

fn sorted_frequency<S: Serializer>(
    frequency: &HashMap<String, u32>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let ordered: BTreeMap<&String, &u32> = frequency.iter().collect();
    ordered.serialize(serializer)
}

impl AnalysisResult {
    /// The `n` most frequent tokens; ties keep document order.
    pub fn top_words(&self, n: usize) -> Vec<(String, u32)> {
        top_words(&self.tokens, &self.frequency, n)
    }

    /// Console banner with the headline numbers.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:=^40}", " Analysis result ")?;
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(f, "Language: {}", self.language.label())?;
        writeln!(
            f,
            "Sentiment: {} ({:.2})",
            self.sentiment.polarity, self.sentiment.score
        )?;
        writeln!(
            f,
            "Size: {} bytes, {} characters, {} lines, {} words",
            self.file_size_bytes, self.char_count, self.line_count, self.token_count
        )?;
        let top: Vec<String> = self
            .top_words(chart::TOP_N)
            .into_iter()
            .map(|(word, count)| format!("{word} ({count})"))
            .collect();
        if !top.is_empty() {
            writeln!(f, "Top words: {}", top.join(", "))?;
        }
        if !self.sentiment.keywords.is_empty() {
            let words: Vec<&str> = self
                .sentiment
                .keywords
                .iter()
                .map(|k| k.word.as_str())
                .collect();
            writeln!(f, "Keywords: {}", words.join(", "))?;
        }
        Ok(())
    }
}

/// A text file read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub text: String,
    pub size_bytes: u64,
}

impl Document {
    ///Reads `path` as UTF-8. Missing or unreadable files fail with
    ///[`AnalysisError::Io`], other encodings with [`AnalysisError::Decode`].
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let size_bytes = bytes.len() as u64;
        let text = String::from_utf8(bytes).map_err(|_| AnalysisError::Decode {
            path: path.to_path_buf(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            file_name,
            text,
            size_bytes,
        })
    }
}

/// Caller-chosen settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Bound on each sentiment model call; `None` waits indefinitely.
    pub model_timeout: Option<Duration>,
    pub export_format: ExportFormat,
    /// Directory receiving the chart and report files.
    pub out_dir: PathBuf,
    pub chart: bool,
    /// Append `_YYYYMMDD_HHMMSS` to report file names.
    pub timestamped: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            model_timeout: Some(DEFAULT_MODEL_TIMEOUT),
            export_format: ExportFormat::None,
            out_dir: PathBuf::from("."),
            chart: true,
            timestamped: false,
        }
    }
}

/// Runs detection, tokenization, statistics and sentiment on one document.
#[derive(Debug, Clone)]
pub struct Analyzer {
    tokenizers: Tokenizers,
    engine: SentimentEngine,
}

impl Analyzer {
    pub fn new(tokenizers: Tokenizers, engine: SentimentEngine) -> Self {
        Self { tokenizers, engine }
    }

    /// Built-in tokenizers and models. The Chinese segmenter is loaded once
    /// and shared with the Chinese sentiment strategy.
    pub fn builtin(options: &AnalysisOptions) -> Result<Self> {
        let tokenizers = Tokenizers::builtin().map_err(|message| AnalysisError::Init { message })?;
        let chinese = ChineseStrategy::with_segmenter(tokenizers.logographic.clone());
        let engine = SentimentEngine::new(chinese, EnglishStrategy::default())
            .with_timeout(options.model_timeout);
        Ok(Self::new(tokenizers, engine))
    }

    ///Reads the file at `path` and analyzes it. Missing or unreadable files and
    ///content that is not UTF-8 fail with an IO-class [`AnalysisError`]; a
    ///failing sentiment model does not fail the call but is reported to `sink`.
    pub fn analyze_file(&self, path: &Path, sink: &mut dyn DiagnosticSink) -> Result<AnalysisResult> {
        let document = Document::read(path)?;
        Ok(self.analyze_document(&document, sink))
    }

    pub fn analyze_document(&self, document: &Document, sink: &mut dyn DiagnosticSink) -> AnalysisResult {
        self.analyze_text(document.file_name.as_str(), &document.text, document.size_bytes, sink)
    }

    /// Analyzes text that is already in memory.
    pub fn analyze_text(
        &self,
        file_name: impl Into<String>,
        text: &str,
        file_size_bytes: u64,
        sink: &mut dyn DiagnosticSink,
    ) -> AnalysisResult {
        let language = detect_language(text);
        let tokens = self.tokenizers.for_language(language).tokenize(text);
        debug!("Detected {language}, {} tokens", tokens.len());

        let (stats, sentiment) = rayon::join(
            || aggregate(text, file_size_bytes, &tokens),
            || self.engine.score(text, language),
        );
        let sentiment = sentiment.unwrap_or_else(|failure| {
            sink.report(Diagnostic::SentimentFallback { language, failure });
            DEFAULT_SENTIMENT_PROFILE
        });

        AnalysisResult {
            file_name: file_name.into(),
            file_size_bytes: stats.file_size_bytes,
            char_count: stats.char_count,
            line_count: stats.line_count,
            language,
            token_count: stats.token_count,
            frequency: stats.frequency,
            tokens,
            sentiment,
        }
    }
}

///Analyzes one file with the built-in models and default options, sending
///diagnostics to the log.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<AnalysisResult> {
    let document = Document::read(path.as_ref())?;
    Ok(Analyzer::builtin(&AnalysisOptions::default())?.analyze_document(&document, &mut LogSink))
}

/// Outcome of [`run`]: the analysis and the artifacts written for it.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: AnalysisResult,
    pub chart: Option<ChartArtifact>,
    pub report: Option<PathBuf>,
}

///Analyzes `path` with the built-in models, then renders the chart and
///exports the report into `options.out_dir`. Nothing is written when the
///analysis fails. A PDF report always renders the chart first, even with
///`options.chart` unset.
pub fn run(path: &Path, options: &AnalysisOptions, sink: &mut dyn DiagnosticSink) -> Result<RunReport> {
    run_with(path, options, sink, Analyzer::builtin)
}

/// Like [`run`], with the analyzer built by `build` once the file is read.
pub fn run_with<F>(
    path: &Path,
    options: &AnalysisOptions,
    sink: &mut dyn DiagnosticSink,
    build: F,
) -> Result<RunReport>
where
    F: FnOnce(&AnalysisOptions) -> Result<Analyzer>,
{
    let document = Document::read(path)?;
    let analyzer = build(options)?;
    let result = analyzer.analyze_document(&document, sink);
    info!("Analyzed {}", path.display());

    let wants_chart = options.chart || options.export_format.is_paginated();
    let writes_anything = wants_chart || options.export_format != ExportFormat::None;
    if writes_anything {
        fs::create_dir_all(&options.out_dir)
            .map_err(|e| AnalysisError::export(&options.out_dir, e))?;
    }

    let chart = if wants_chart {
        generate_chart(&result, &options.out_dir)?
    } else {
        None
    };
    let report = export_report(
        &result,
        options.export_format,
        chart.as_ref(),
        &options.out_dir,
        options.timestamped,
    )?;
    Ok(RunReport {
        result,
        chart,
        report,
    })
}
