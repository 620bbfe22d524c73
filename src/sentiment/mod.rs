//! Sentiment engine: per-language scoring strategies, polarity
//! classification, keyword extraction and the bounded model call.

pub mod chinese;
pub mod english;

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SentimentModelFailure;
use crate::language::Language;
use crate::tokenize::{Segment, Tokenizer};

use self::chinese::{BayesSentimentModel, ChineseTagger};
use self::english::{AdjectiveTagger, PatternPolarityModel, ValenceModel, tagging_words};

/// Scores above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.6;
/// Scores below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = 0.4;

/// Categorical sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Neutral,
    Negative,
}

impl Polarity {
    ///Maps a score onto a label: `> 0.6` positive, `< 0.4` negative, neutral
    ///otherwise (both bounds included on the neutral side).
    /// # Example
    /// ```
    /// use text_profile::Polarity;
    /// assert_eq!(Polarity::from_score(0.61), Polarity::Positive);
    /// assert_eq!(Polarity::from_score(0.6), Polarity::Neutral);
    /// assert_eq!(Polarity::from_score(0.4), Polarity::Neutral);
    /// assert_eq!(Polarity::from_score(-0.2), Polarity::Negative);
    /// ```
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            Polarity::Positive
        } else if score < NEGATIVE_THRESHOLD {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Neutral => "neutral",
            Polarity::Negative => "negative",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Share of positive, negative and neutral signal in the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intensity {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl Intensity {
    pub const ZERO: Intensity = Intensity {
        positive: 0.0,
        negative: 0.0,
        neutral: 0.0,
    };
}

/// A word together with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    pub tag: String,
}

impl Keyword {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Sentiment of one document.
///
/// On the Chinese path `score` is a probability in `[0, 1]`. On the English
/// path it is the average of two `[-1, 1]` scores and may be negative; the
/// same 0.4/0.6 thresholds apply to both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentProfile {
    pub score: f64,
    pub polarity: Polarity,
    pub intensity: Intensity,
    pub keywords: Vec<Keyword>,
}

/// Profile used before any model ran, and whenever a model call fails.
pub const DEFAULT_SENTIMENT_PROFILE: SentimentProfile = SentimentProfile {
    score: 0.5,
    polarity: Polarity::Neutral,
    intensity: Intensity::ZERO,
    keywords: Vec::new(),
};

impl SentimentProfile {
    /// Builds a profile whose polarity is derived from `score`.
    pub fn new(score: f64, intensity: Intensity, keywords: Vec<Keyword>) -> Self {
        Self {
            score,
            polarity: Polarity::from_score(score),
            intensity,
            keywords,
        }
    }
}

impl Default for SentimentProfile {
    fn default() -> Self {
        DEFAULT_SENTIMENT_PROFILE
    }
}

/// Lexicon/rule-based polarity in `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn polarity(&self, text: &str) -> Result<f64, SentimentModelFailure>;
}

/// Output of a valence-aware scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValenceScores {
    /// Normalized sum of valences, in `[-1, 1]`.
    pub compound: f64,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Valence-aware scorer: compound score plus proportions.
pub trait ValenceScorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn scores(&self, text: &str) -> Result<ValenceScores, SentimentModelFailure>;
}

/// Probability that a segmented text is positive.
pub trait ProbabilityClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn positive_probability(&self, words: &[String]) -> Result<f64, SentimentModelFailure>;
}

/// Part-of-speech tagger that also knows which of its tags mark opinion words.
pub trait Tagger: Send + Sync {
    fn name(&self) -> &'static str;

    fn tag(&self, words: &[String]) -> Result<Vec<Keyword>, SentimentModelFailure>;

    /// Tags segments that may already carry a dictionary tag. The default
    /// ignores those tags and tags the surfaces.
    fn tag_segments(&self, segments: &[Segment]) -> Result<Vec<Keyword>, SentimentModelFailure> {
        let words: Vec<String> = segments.iter().map(|s| s.surface.clone()).collect();
        self.tag(&words)
    }

    fn is_opinion_tag(&self, tag: &str) -> bool;
}

fn opinion_keywords(tagger: &dyn Tagger, tagged: Vec<Keyword>) -> Vec<Keyword> {
    tagged
        .into_iter()
        .filter(|k| tagger.is_opinion_tag(&k.tag))
        .collect()
}

/// Chinese path: segment, classify, tag.
#[derive(Clone)]
pub struct ChineseStrategy {
    pub segmenter: Arc<dyn Tokenizer>,
    pub classifier: Arc<dyn ProbabilityClassifier>,
    pub tagger: Arc<dyn Tagger>,
}

impl ChineseStrategy {
    /// Built-in classifier and tagger over the given segmenter.
    pub fn with_segmenter(segmenter: Arc<dyn Tokenizer>) -> Self {
        Self {
            segmenter,
            classifier: Arc::new(BayesSentimentModel::default()),
            tagger: Arc::new(ChineseTagger::default()),
        }
    }

    pub fn evaluate(&self, text: &str) -> Result<SentimentProfile, SentimentModelFailure> {
        let segments = self.segmenter.segment(text);
        let words: Vec<String> = segments.iter().map(|s| s.surface.clone()).collect();
        let score = self.classifier.positive_probability(&words)?;
        if !score.is_finite() {
            return Err(SentimentModelFailure::Model {
                model: self.classifier.name(),
                message: format!("non-finite probability {score}"),
            });
        }
        let keywords = opinion_keywords(self.tagger.as_ref(), self.tagger.tag_segments(&segments)?);
        // no intensity breakdown on this path
        Ok(SentimentProfile::new(score, Intensity::ZERO, keywords))
    }
}

impl fmt::Debug for ChineseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChineseStrategy")
            .field("segmenter", &self.segmenter.name())
            .field("classifier", &self.classifier.name())
            .field("tagger", &self.tagger.name())
            .finish()
    }
}

/// English path: blend of polarity and valence compound, valence proportions
/// as intensity, `JJ*` words as keywords.
#[derive(Clone)]
pub struct EnglishStrategy {
    pub polarity: Arc<dyn PolarityScorer>,
    pub valence: Arc<dyn ValenceScorer>,
    pub tagger: Arc<dyn Tagger>,
}

impl Default for EnglishStrategy {
    fn default() -> Self {
        Self {
            polarity: Arc::new(PatternPolarityModel::default()),
            valence: Arc::new(ValenceModel::default()),
            tagger: Arc::new(AdjectiveTagger::default()),
        }
    }
}

impl EnglishStrategy {
    pub fn evaluate(&self, text: &str) -> Result<SentimentProfile, SentimentModelFailure> {
        let polarity = self.polarity.polarity(text)?;
        let valence = self.valence.scores(text)?;
        // natural range of the blend is [-1, 1]; kept as is
        let score = (polarity + valence.compound) / 2.0;
        if !score.is_finite() {
            return Err(SentimentModelFailure::Model {
                model: self.valence.name(),
                message: format!("non-finite blended score {score}"),
            });
        }
        let intensity = Intensity {
            positive: valence.positive,
            negative: valence.negative,
            neutral: valence.neutral,
        };
        let keywords = opinion_keywords(self.tagger.as_ref(), self.tagger.tag(&tagging_words(text))?);
        Ok(SentimentProfile::new(score, intensity, keywords))
    }
}

impl fmt::Debug for EnglishStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnglishStrategy")
            .field("polarity", &self.polarity.name())
            .field("valence", &self.valence.name())
            .field("tagger", &self.tagger.name())
            .finish()
    }
}

/// Scoring strategy picked once per document from its language.
#[derive(Debug, Clone)]
pub enum SentimentStrategy {
    Chinese(ChineseStrategy),
    English(EnglishStrategy),
}

impl SentimentStrategy {
    pub fn evaluate(&self, text: &str) -> Result<SentimentProfile, SentimentModelFailure> {
        match self {
            SentimentStrategy::Chinese(s) => s.evaluate(text),
            SentimentStrategy::English(s) => s.evaluate(text),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SentimentStrategy::Chinese(_) => "chinese",
            SentimentStrategy::English(_) => "english",
        }
    }
}

/// Runs the strategy for a language, optionally under a deadline.
#[derive(Debug, Clone)]
pub struct SentimentEngine {
    chinese: ChineseStrategy,
    english: EnglishStrategy,
    timeout: Option<Duration>,
}

impl SentimentEngine {
    pub fn new(chinese: ChineseStrategy, english: EnglishStrategy) -> Self {
        Self {
            chinese,
            english,
            timeout: None,
        }
    }

    /// Treat a model call that takes longer than `timeout` as failed.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn strategy(&self, language: Language) -> SentimentStrategy {
        match language {
            Language::Zh => SentimentStrategy::Chinese(self.chinese.clone()),
            Language::En => SentimentStrategy::English(self.english.clone()),
        }
    }

    /// Scores `text`. A panicking model or one that misses the deadline is
    /// reported as a failure instead of unwinding into the caller.
    pub fn score(&self, text: &str, language: Language) -> Result<SentimentProfile, SentimentModelFailure> {
        let strategy = self.strategy(language);
        debug!("Scoring sentiment with {} strategy", strategy.name());
        match self.timeout {
            None => run_guarded(&strategy, text),
            Some(after) => run_with_deadline(strategy, text.to_owned(), after),
        }
    }
}

fn run_guarded(strategy: &SentimentStrategy, text: &str) -> Result<SentimentProfile, SentimentModelFailure> {
    catch_unwind(AssertUnwindSafe(|| strategy.evaluate(text))).unwrap_or_else(|_| {
        Err(SentimentModelFailure::Panicked {
            model: strategy.name(),
        })
    })
}

fn run_with_deadline(
    strategy: SentimentStrategy,
    text: String,
    after: Duration,
) -> Result<SentimentProfile, SentimentModelFailure> {
    let name = strategy.name();
    let (tx, rx) = mpsc::sync_channel(1);
    // the worker is detached; on timeout its late answer is dropped
    let spawned = thread::Builder::new()
        .name("sentiment-model".into())
        .spawn(move || {
            let _ = tx.send(run_guarded(&strategy, &text));
        });
    if let Err(e) = spawned {
        return Err(SentimentModelFailure::Model {
            model: name,
            message: format!("cannot start model thread: {e}"),
        });
    }
    match rx.recv_timeout(after) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(SentimentModelFailure::Timeout { after }),
        Err(RecvTimeoutError::Disconnected) => Err(SentimentModelFailure::Panicked { model: name }),
    }
}
