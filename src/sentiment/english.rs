//! Sentiment backends for the alphabetic family.
//!
//! Two independent scorers are blended by the engine:
//! - [`PatternPolarityModel`]: averages lexicon polarities of opinion words,
//!   scaled by preceding intensifiers and flipped/dampened by negation.
//!   Range `[-1, 1]`.
//! - [`ValenceModel`]: valence-aware rule set (boosters, negation, caps
//!   emphasis, "but" shifts, `!`/`?` amplification) producing a normalized
//!   compound score in `[-1, 1]` and positive/negative/neutral proportions.
//!
//! [`AdjectiveTagger`] assigns Penn-style tags; every `JJ*` token is an
//! opinion keyword candidate.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::{Keyword, PolarityScorer, Tagger, ValenceScorer, ValenceScores};
use crate::error::SentimentModelFailure;

static PATTERN_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?|[.!?;:,]").expect("pattern token regex compiles")
});

static TAG_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").expect("tag token regex compiles"));

/// Opinion word polarities in `[-1, 1]`.
const POLARITY_LEXICON: &[(&str, f64)] = &[
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("like", 0.0),
    ("wonderful", 1.0),
    ("great", 0.8),
    ("good", 0.7),
    ("better", 0.5),
    ("best", 1.0),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("happy", 0.8),
    ("glad", 0.5),
    ("nice", 0.6),
    ("beautiful", 0.85),
    ("perfect", 1.0),
    ("fantastic", 0.4),
    ("brilliant", 0.9),
    ("delightful", 1.0),
    ("pleasant", 0.73),
    ("enjoyable", 0.4),
    ("fun", 0.3),
    ("cool", 0.35),
    ("fine", 0.42),
    ("superb", 1.0),
    ("outstanding", 0.5),
    ("impressive", 1.0),
    ("helpful", 0.2),
    ("useful", 0.3),
    ("easy", 0.43),
    ("fast", 0.2),
    ("clean", 0.37),
    ("fresh", 0.3),
    ("friendly", 0.38),
    ("kind", 0.6),
    ("positive", 0.23),
    ("favorite", 0.5),
    ("recommended", 0.5),
    ("satisfied", 0.5),
    ("successful", 0.75),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("poor", -0.4),
    ("sad", -0.5),
    ("unhappy", -0.6),
    ("hate", -0.8),
    ("hated", -0.9),
    ("ugly", -0.7),
    ("boring", -1.0),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("angry", -0.5),
    ("wrong", -0.5),
    ("broken", -0.4),
    ("useless", -0.5),
    ("stupid", -0.8),
    ("annoying", -0.8),
    ("slow", -0.3),
    ("dirty", -0.6),
    ("expensive", -0.5),
    ("difficult", -0.5),
    ("hard", -0.29),
    ("painful", -0.7),
    ("negative", -0.3),
    ("dull", -0.3),
    ("mediocre", -0.5),
    ("unpleasant", -0.73),
    ("rude", -0.6),
    ("scary", -0.5),
    ("weak", -0.38),
];

/// Intensifiers and downtoners that scale the next opinion word.
const PATTERN_MODIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("so", 1.2),
    ("too", 1.2),
    ("most", 1.2),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("totally", 1.3),
    ("absolutely", 1.3),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("little", 0.6),
    ("rather", 0.9),
];

const PATTERN_NEGATIONS: &[&str] = &["no", "not", "never", "n't", "cannot"];

/// Valences in `[-4, 4]` for the valence-aware scorer.
const VALENCE_LEXICON: &[(&str, f64)] = &[
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("like", 2.0),
    ("liked", 1.8),
    ("wonderful", 2.7),
    ("great", 3.1),
    ("good", 1.9),
    ("better", 1.9),
    ("best", 3.2),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("happy", 2.7),
    ("glad", 2.0),
    ("nice", 1.8),
    ("beautiful", 2.9),
    ("perfect", 2.7),
    ("fantastic", 2.6),
    ("brilliant", 2.8),
    ("delightful", 2.9),
    ("pleasant", 2.3),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("fun", 2.3),
    ("cool", 1.3),
    ("fine", 0.8),
    ("superb", 3.1),
    ("impressive", 2.3),
    ("helpful", 1.8),
    ("useful", 1.9),
    ("easy", 1.9),
    ("friendly", 2.2),
    ("kind", 2.4),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("win", 2.8),
    ("success", 2.7),
    ("successful", 2.8),
    ("hope", 1.9),
    ("recommend", 1.5),
    ("satisfied", 1.8),
    ("favorite", 2.0),
    ("smile", 1.5),
    ("laugh", 2.6),
    ("yes", 1.7),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("poor", -2.1),
    ("sad", -2.1),
    ("unhappy", -1.8),
    ("hate", -2.7),
    ("hated", -3.2),
    ("ugly", -2.3),
    ("boring", -1.3),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("angry", -2.3),
    ("wrong", -2.1),
    ("broken", -1.9),
    ("useless", -1.8),
    ("stupid", -2.4),
    ("annoying", -1.7),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("problem", -1.7),
    ("hurt", -2.4),
    ("pain", -2.3),
    ("painful", -2.4),
    ("waste", -1.8),
    ("sucks", -1.5),
    ("cry", -2.1),
    ("fear", -2.2),
    ("sick", -2.3),
    ("dead", -3.3),
    ("kill", -3.7),
    ("lost", -1.3),
    ("rude", -2.0),
    ("dirty", -1.9),
    ("expensive", -0.9),
    ("difficult", -1.5),
    ("weak", -1.9),
    ("no", -1.2),
];

const BOOSTER_INCREMENT: f64 = 0.293;
const BOOSTER_DECREMENT: f64 = -0.293;
const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const COMPOUND_ALPHA: f64 = 15.0;

const BOOSTERS_UP: &[&str] = &[
    "absolutely",
    "amazingly",
    "awfully",
    "completely",
    "considerably",
    "decidedly",
    "deeply",
    "enormously",
    "entirely",
    "especially",
    "exceptionally",
    "extremely",
    "fabulously",
    "fully",
    "greatly",
    "highly",
    "hugely",
    "incredibly",
    "intensely",
    "majorly",
    "more",
    "most",
    "particularly",
    "purely",
    "quite",
    "really",
    "remarkably",
    "so",
    "substantially",
    "thoroughly",
    "totally",
    "tremendously",
    "unbelievably",
    "unusually",
    "utterly",
    "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "kinda",
    "less",
    "little",
    "marginally",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
    "sorta",
];

const VALENCE_NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none",
    "nope", "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "wasnt",
    "werent", "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

/// Adjectives that carry no polarity but are still tagged `JJ`.
const PLAIN_ADJECTIVES: &[&str] = &[
    "big", "small", "large", "little", "new", "old", "young", "long", "short", "high", "low",
    "early", "late", "real", "main", "full", "whole", "simple", "clear", "strong", "free",
    "important", "different", "same", "other", "many", "few", "several", "certain", "sure",
    "possible", "open", "close", "quiet", "loud", "dark", "bright", "red", "green", "blue",
    "white", "black", "warm", "cold", "hot", "cheap", "rich", "busy", "ready", "able",
    "special", "local", "public", "private", "recent", "final", "general", "human", "natural",
];

/// Closed-class words with fixed tags.
const CLOSED_CLASS: &[(&str, &str)] = &[
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("me", "PRP"),
    ("him", "PRP"),
    ("her", "PRP$"),
    ("us", "PRP"),
    ("them", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    ("the", "DT"),
    ("a", "DT"),
    ("an", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("every", "DT"),
    ("each", "DT"),
    ("some", "DT"),
    ("any", "DT"),
    ("no", "DT"),
    ("all", "DT"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("yet", "CC"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("of", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("from", "IN"),
    ("by", "IN"),
    ("about", "IN"),
    ("into", "IN"),
    ("over", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("because", "IN"),
    ("if", "IN"),
    ("than", "IN"),
    ("to", "TO"),
    ("is", "VBZ"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("are", "VBP"),
    ("am", "VBP"),
    ("be", "VB"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("has", "VBZ"),
    ("have", "VBP"),
    ("had", "VBD"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("love", "VBP"),
    ("like", "IN"),
    ("hate", "VBP"),
    ("enjoy", "VBP"),
    ("think", "VBP"),
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("would", "MD"),
    ("shall", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("not", "RB"),
    ("never", "RB"),
    ("very", "RB"),
    ("really", "RB"),
    ("so", "RB"),
    ("too", "RB"),
    ("quite", "RB"),
    ("also", "RB"),
    ("just", "RB"),
    ("there", "EX"),
    ("what", "WP"),
    ("who", "WP"),
    ("which", "WDT"),
    ("when", "WRB"),
    ("where", "WRB"),
    ("why", "WRB"),
    ("how", "WRB"),
];

const IRREGULAR_COMPARATIVES: &[(&str, &str)] = &[
    ("better", "JJR"),
    ("worse", "JJR"),
    ("less", "JJR"),
    ("more", "JJR"),
    ("best", "JJS"),
    ("worst", "JJS"),
    ("least", "JJS"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish", "ical"];

fn is_upper(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn sign(x: f64) -> f64 {
    if x < 0.0 { -1.0 } else { 1.0 }
}

fn round_to(x: f64, places: i32) -> f64 {
    let f = 10_f64.powi(places);
    (x * f).round() / f
}

/// Lexicon/rule-based polarity scorer in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct PatternPolarityModel {
    lexicon: HashMap<&'static str, f64>,
    modifiers: HashMap<&'static str, f64>,
}

impl Default for PatternPolarityModel {
    fn default() -> Self {
        Self {
            lexicon: POLARITY_LEXICON.iter().copied().collect(),
            modifiers: PATTERN_MODIFIERS.iter().copied().collect(),
        }
    }
}

impl PatternPolarityModel {
    /// Average polarity of the opinion words in `text`, 0 when there are none.
    pub fn polarity_of(&self, text: &str) -> f64 {
        let mut assessments: Vec<f64> = Vec::new();
        let mut modifier = 1.0;
        let mut negated = false;

        for m in PATTERN_TOKEN_RE.find_iter(text) {
            let word = m.as_str().to_lowercase();
            if PATTERN_NEGATIONS.contains(&word.as_str()) || word.ends_with("n't") {
                negated = true;
                continue;
            }
            if let Some(scale) = self.modifiers.get(word.as_str()) {
                modifier *= scale;
                continue;
            }
            match self.lexicon.get(word.as_str()) {
                Some(&p) if p != 0.0 => {
                    let mut value = p * modifier;
                    if negated {
                        value *= -0.5;
                    }
                    assessments.push(value.clamp(-1.0, 1.0));
                    modifier = 1.0;
                    negated = false;
                }
                _ => {
                    modifier = 1.0;
                    // a clause boundary ends the reach of a negation
                    if word.chars().all(|c| !c.is_alphabetic()) {
                        negated = false;
                    }
                }
            }
        }

        if assessments.is_empty() {
            return 0.0;
        }
        let mean = assessments.iter().sum::<f64>() / assessments.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl PolarityScorer for PatternPolarityModel {
    fn name(&self) -> &'static str {
        "pattern-polarity"
    }

    fn polarity(&self, text: &str) -> Result<f64, SentimentModelFailure> {
        Ok(self.polarity_of(text))
    }
}

/// Valence-aware rule-based scorer.
#[derive(Debug, Clone)]
pub struct ValenceModel {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for ValenceModel {
    fn default() -> Self {
        let boosters = BOOSTERS_UP
            .iter()
            .map(|w| (*w, BOOSTER_INCREMENT))
            .chain(BOOSTERS_DOWN.iter().map(|w| (*w, BOOSTER_DECREMENT)))
            .collect();
        Self {
            lexicon: VALENCE_LEXICON.iter().copied().collect(),
            boosters,
            negations: VALENCE_NEGATIONS.iter().copied().collect(),
        }
    }
}

impl ValenceModel {
    /// Whitespace tokens with surrounding punctuation stripped, unless the
    /// stripped form would be two characters or shorter (keeps emoticons).
    fn words(text: &str) -> Vec<&str> {
        text.split_whitespace()
            .map(|token| {
                let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
                if stripped.chars().count() <= 2 { token } else { stripped }
            })
            .collect()
    }

    fn is_negated(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        let plain: String = lower.chars().filter(|c| *c != '\'').collect();
        self.negations.contains(plain.as_str()) || lower.contains("n't")
    }

    fn booster_scalar(&self, word: &str, valence: f64, cap_diff: bool) -> f64 {
        let Some(&base) = self.boosters.get(word.to_lowercase().as_str()) else {
            return 0.0;
        };
        let mut scalar = if valence < 0.0 { -base } else { base };
        if cap_diff && is_upper(word) {
            scalar += sign(valence) * CAPS_INCREMENT;
        }
        scalar
    }

    fn word_valence(&self, words: &[&str], i: usize, cap_diff: bool) -> f64 {
        let item = words[i];
        let Some(&base) = self.lexicon.get(item.to_lowercase().as_str()) else {
            return 0.0;
        };
        let mut valence = base;
        if cap_diff && is_upper(item) {
            valence += sign(valence) * CAPS_INCREMENT;
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = words[i - (start + 1)];
            if self.lexicon.contains_key(prev.to_lowercase().as_str()) {
                continue;
            }
            let mut scalar = self.booster_scalar(prev, valence, cap_diff);
            if start == 1 {
                scalar *= 0.95;
            } else if start == 2 {
                scalar *= 0.9;
            }
            valence += scalar;
            if self.is_negated(prev) {
                valence *= NEGATION_SCALAR;
            }
        }
        valence
    }

    fn punctuation_emphasis(text: &str) -> f64 {
        let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
        let questions = match text.matches('?').count() {
            0 | 1 => 0.0,
            n @ 2..=3 => n as f64 * 0.18,
            _ => 0.96,
        };
        exclamations + questions
    }

    /// Compound score and proportions for `text`.
    pub fn scores_of(&self, text: &str) -> ValenceScores {
        let words = Self::words(text);
        let caps = words.iter().filter(|w| is_upper(w)).count();
        let cap_diff = caps > 0 && caps < words.len();

        let mut sentiments: Vec<f64> = words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                if self.boosters.contains_key(w.to_lowercase().as_str()) {
                    0.0
                } else {
                    self.word_valence(&words, i, cap_diff)
                }
            })
            .collect();

        // contrast: "but" shifts weight to the clause after it
        if let Some(bi) = words.iter().position(|w| w.eq_ignore_ascii_case("but")) {
            for (si, s) in sentiments.iter_mut().enumerate() {
                if si < bi {
                    *s *= 0.5;
                } else if si > bi {
                    *s *= 1.5;
                }
            }
        }

        if sentiments.is_empty() {
            return ValenceScores::default();
        }

        let emphasis = Self::punctuation_emphasis(text);
        let mut sum: f64 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }
        let compound = (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0);

        let (mut pos, mut neg, mut neu) = (0.0, 0.0, 0.0);
        for s in &sentiments {
            if *s > 0.0 {
                pos += s + 1.0;
            } else if *s < 0.0 {
                neg += s - 1.0;
            } else {
                neu += 1.0;
            }
        }
        if pos > neg.abs() {
            pos += emphasis;
        } else if pos < neg.abs() {
            neg -= emphasis;
        }
        let total = pos + neg.abs() + neu;

        ValenceScores {
            compound: round_to(compound, 4),
            positive: round_to((pos / total).abs(), 3),
            negative: round_to((neg / total).abs(), 3),
            neutral: round_to((neu / total).abs(), 3),
        }
    }
}

impl ValenceScorer for ValenceModel {
    fn name(&self) -> &'static str {
        "valence"
    }

    fn scores(&self, text: &str) -> Result<ValenceScores, SentimentModelFailure> {
        Ok(self.scores_of(text))
    }
}

/// Lexicon and suffix driven part-of-speech tagger with Penn tags.
#[derive(Debug, Clone)]
pub struct AdjectiveTagger {
    closed: HashMap<&'static str, &'static str>,
    adjectives: HashSet<&'static str>,
}

impl Default for AdjectiveTagger {
    fn default() -> Self {
        let adjectives = POLARITY_LEXICON
            .iter()
            .map(|(w, _)| *w)
            .filter(|w| !matches!(*w, "love" | "like" | "hate" | "hated" | "loved"))
            .chain(PLAIN_ADJECTIVES.iter().copied())
            .collect();
        Self {
            closed: CLOSED_CLASS.iter().copied().collect(),
            adjectives,
        }
    }
}

impl AdjectiveTagger {
    pub fn tag_word(&self, word: &str) -> &'static str {
        let lower = word.to_lowercase();
        let w = lower.as_str();
        if let Some(tag) = self.closed.get(w) {
            return *tag;
        }
        if let Some((_, tag)) = IRREGULAR_COMPARATIVES.iter().find(|(c, _)| *c == w) {
            return *tag;
        }
        if self.adjectives.contains(w) {
            return "JJ";
        }
        if let Some(stem) = w.strip_suffix("est") {
            if self.is_adjective_stem(stem) {
                return "JJS";
            }
        }
        if let Some(stem) = w.strip_suffix("er") {
            if self.is_adjective_stem(stem) {
                return "JJR";
            }
        }
        if w.ends_with("ly") && w.len() > 4 {
            return "RB";
        }
        if w.ends_with("ing") && w.len() > 4 {
            return "VBG";
        }
        if w.ends_with("ed") && w.len() > 3 {
            return "VBN";
        }
        if ADJECTIVE_SUFFIXES
            .iter()
            .any(|s| w.len() > s.len() + 2 && w.ends_with(s))
        {
            return "JJ";
        }
        if word.starts_with(char::is_uppercase) {
            return "NNP";
        }
        if w.ends_with('s') && w.len() > 3 {
            return "NNS";
        }
        "NN"
    }

    /// Stem of a comparative/superlative: "great"-er, "nic"-er (nice), "bigg"-er (big).
    fn is_adjective_stem(&self, stem: &str) -> bool {
        if stem.is_empty() {
            return false;
        }
        if self.adjectives.contains(stem) {
            return true;
        }
        let with_e = format!("{stem}e");
        if self.adjectives.contains(with_e.as_str()) {
            return true;
        }
        if let Some(base) = stem.strip_suffix('i') {
            if self.adjectives.contains(format!("{base}y").as_str()) {
                return true;
            }
        }
        // doubled final consonant
        let mut chars = stem.char_indices().rev();
        match (chars.next(), chars.next()) {
            (Some((last, a)), Some((_, b))) if a == b => self.adjectives.contains(&stem[..last]),
            _ => false,
        }
    }
}

/// Words as the tagger sees them: original case, contractions kept whole.
pub fn tagging_words(text: &str) -> Vec<String> {
    TAG_TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

impl Tagger for AdjectiveTagger {
    fn name(&self) -> &'static str {
        "penn-adjective"
    }

    fn tag(&self, words: &[String]) -> Result<Vec<Keyword>, SentimentModelFailure> {
        Ok(words
            .iter()
            .map(|w| Keyword::new(w, self.tag_word(w)))
            .collect())
    }

    fn is_opinion_tag(&self, tag: &str) -> bool {
        tag.starts_with("JJ")
    }
}
