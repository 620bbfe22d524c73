//! Word-level tokenization for both language families.
//!
//! English text is lower-cased and reduced to maximal runs of ASCII letters.
//! Chinese text has no whitespace word boundaries, so it goes through a
//! dictionary-driven segmenter (lindera with the embedded jieba dictionary).
//! Every segment is kept, punctuation and whitespace included, and carries
//! the part-of-speech tag the dictionary assigns to it.

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use log::warn;
use regex::Regex;

use crate::language::Language;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("word pattern compiles"));

const JIEBA_URI: &str = "embedded://jieba";

/// Detail value lindera reports for a field the dictionary leaves blank.
const UNSET_DETAIL: &str = "*";

/// One token plus the part-of-speech tag its dictionary gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub surface: String,
    pub pos: Option<String>,
}

impl Segment {
    pub fn untagged(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            pos: None,
        }
    }

    pub fn tagged(surface: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            pos: Some(pos.into()),
        }
    }
}

/// Splits raw text into word tokens. Implementations are total: any input,
/// including the empty string, yields a (possibly empty) token list.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Same tokens as [`Tokenizer::tokenize`], with dictionary tags where the
    /// backend has them.
    fn segment(&self, text: &str) -> Vec<Segment> {
        self.tokenize(text).into_iter().map(Segment::untagged).collect()
    }

    fn name(&self) -> &'static str;
}

impl fmt::Debug for dyn Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tokenizer({})", self.name())
    }
}

///Lower-cases the text and extracts runs of ASCII letters bounded by word boundaries.
///Digits, punctuation and mixed alphanumerics like `mp3` produce no token.
/// # Example
/// ```
/// use text_profile::{AlphabeticTokenizer, Tokenizer};
/// let words = AlphabeticTokenizer.tokenize("Hello, World! mp3 42");
/// assert_eq!(words, vec!["hello".to_string(), "world".to_string()]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabeticTokenizer;

impl Tokenizer for AlphabeticTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn name(&self) -> &'static str {
        "alphabetic"
    }
}

/// Dictionary-based segmenter for logographic text.
pub struct LogographicTokenizer {
    inner: Segmenter,
}

impl LogographicTokenizer {
    /// Segmenter backed by the jieba dictionary compiled into the binary.
    pub fn new() -> Result<Self, String> {
        Self::with_dictionary(JIEBA_URI)
    }

    /// Segmenter backed by any lindera dictionary URI (`embedded://…` or a path).
    pub fn with_dictionary(dict_uri: &str) -> Result<Self, String> {
        let dict = load_dictionary(dict_uri)
            .map_err(|e| format!("Failed to load dictionary '{dict_uri}': {e}"))?;
        let inner = Segmenter::new(Mode::Normal, dict, None).keep_whitespace(true);
        Ok(Self { inner })
    }
}

impl Tokenizer for LogographicTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.segment(text).into_iter().map(|s| s.surface).collect()
    }

    fn segment(&self, text: &str) -> Vec<Segment> {
        if text.is_empty() {
            return Vec::new();
        }
        match self.inner.segment(Cow::Borrowed(text)) {
            Ok(tokens) => tokens
                .into_iter()
                .map(|mut token| {
                    let surface = token.surface.to_string();
                    let pos = token
                        .get("part_of_speech")
                        .filter(|tag| !tag.is_empty() && *tag != UNSET_DETAIL)
                        .map(str::to_string);
                    Segment { surface, pos }
                })
                .collect(),
            Err(e) => {
                // keep tokenization total: one segment per character
                warn!("Segmentation failed, falling back to characters: {e}");
                text.chars().map(Segment::untagged).collect()
            }
        }
    }

    fn name(&self) -> &'static str {
        "lindera-jieba"
    }
}

/// Tokenizers for both families, selected per document by [`Language`].
#[derive(Debug, Clone)]
pub struct Tokenizers {
    pub alphabetic: Arc<dyn Tokenizer>,
    pub logographic: Arc<dyn Tokenizer>,
}

impl Tokenizers {
    /// The built-in regex and lindera tokenizers.
    pub fn builtin() -> Result<Self, String> {
        Ok(Self {
            alphabetic: Arc::new(AlphabeticTokenizer),
            logographic: Arc::new(LogographicTokenizer::new()?),
        })
    }

    pub fn for_language(&self, language: Language) -> &Arc<dyn Tokenizer> {
        match language {
            Language::Zh => &self.logographic,
            Language::En => &self.alphabetic,
        }
    }
}
