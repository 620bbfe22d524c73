//! Sentiment backends for the logographic family.
//!
//! [`BayesSentimentModel`] is a two-class naive Bayes classifier over
//! segmented words. Each lexicon entry stores the log-likelihood ratio
//! `ln P(w|pos) - ln P(w|neg)` in a curated lexicon of common review
//! vocabulary; words outside the lexicon are uninformative. With equal class priors the
//! positive probability is the logistic of the summed ratios, so text
//! without any known word scores exactly 0.5.
//!
//! [`ChineseTagger`] keeps the ICTCLAS-style tag the jieba dictionary gives a
//! segment and falls back to a curated table for segments the dictionary
//! leaves untagged. Only the adjective classes `a`, `ad`, `ag` and `an`
//! count as opinion keywords.

use std::collections::HashMap;

use super::{Keyword, ProbabilityClassifier, Tagger};
use crate::error::SentimentModelFailure;
use crate::language::is_cjk_ideograph;
use crate::tokenize::Segment;

const LOG_RATIOS: &[(&str, f64)] = &[
    ("爱", 1.6),
    ("喜欢", 1.5),
    ("好", 0.8),
    ("很好", 1.3),
    ("不错", 1.4),
    ("优秀", 1.6),
    ("满意", 1.8),
    ("漂亮", 1.4),
    ("美丽", 1.4),
    ("美", 1.0),
    ("开心", 1.6),
    ("高兴", 1.5),
    ("快乐", 1.5),
    ("幸福", 1.5),
    ("棒", 1.5),
    ("精彩", 1.4),
    ("完美", 1.7),
    ("推荐", 1.2),
    ("值得", 1.0),
    ("舒服", 1.2),
    ("方便", 1.0),
    ("实惠", 1.3),
    ("划算", 1.4),
    ("便宜", 0.9),
    ("赞", 1.4),
    ("感谢", 1.2),
    ("谢谢", 1.1),
    ("成功", 1.1),
    ("好评", 2.0),
    ("出色", 1.5),
    ("可爱", 1.3),
    ("温暖", 1.1),
    ("支持", 0.8),
    ("清晰", 0.9),
    ("流畅", 1.1),
    ("新鲜", 1.0),
    ("好吃", 1.5),
    ("精美", 1.3),
    ("干净", 1.0),
    ("热情", 1.1),
    ("耐心", 1.0),
    ("及时", 0.9),
    ("健康", 0.8),
    ("安全", 0.6),
    ("快", 0.5),
    ("差", -1.6),
    ("不好", -1.4),
    ("讨厌", -1.7),
    ("失望", -1.9),
    ("糟糕", -1.8),
    ("难过", -1.4),
    ("伤心", -1.5),
    ("生气", -1.4),
    ("愤怒", -1.6),
    ("垃圾", -2.0),
    ("差评", -2.2),
    ("退货", -1.5),
    ("坏", -1.3),
    ("问题", -0.7),
    ("慢", -0.8),
    ("贵", -0.7),
    ("难看", -1.4),
    ("难吃", -1.7),
    ("痛苦", -1.6),
    ("害怕", -1.2),
    ("恶心", -1.9),
    ("骗", -1.8),
    ("假", -1.1),
    ("破", -1.0),
    ("烂", -1.6),
    ("后悔", -1.7),
    ("麻烦", -1.0),
    ("无聊", -1.2),
    ("困难", -0.8),
    ("失败", -1.3),
    ("不满", -1.6),
    ("投诉", -1.5),
    ("劣质", -2.0),
    ("危险", -1.0),
    ("不", -0.4),
    ("没有", -0.3),
    ("没", -0.3),
];

/// Adjective-class tags.
const ADJECTIVE_TAGS: &[&str] = &["a", "ad", "ag", "an"];

const TAG_LEXICON: &[(&str, &str)] = &[
    // a: adjective
    ("好", "a"),
    ("很好", "a"),
    ("不错", "a"),
    ("优秀", "a"),
    ("满意", "a"),
    ("漂亮", "a"),
    ("美丽", "a"),
    ("开心", "a"),
    ("高兴", "a"),
    ("快乐", "a"),
    ("棒", "a"),
    ("精彩", "a"),
    ("完美", "a"),
    ("舒服", "a"),
    ("方便", "a"),
    ("实惠", "a"),
    ("划算", "a"),
    ("便宜", "a"),
    ("出色", "a"),
    ("可爱", "a"),
    ("温暖", "a"),
    ("清晰", "a"),
    ("流畅", "a"),
    ("新鲜", "a"),
    ("好吃", "a"),
    ("精美", "a"),
    ("干净", "a"),
    ("热情", "a"),
    ("差", "a"),
    ("坏", "a"),
    ("糟糕", "a"),
    ("难过", "a"),
    ("伤心", "a"),
    ("慢", "a"),
    ("快", "a"),
    ("贵", "a"),
    ("难看", "a"),
    ("难吃", "a"),
    ("恶心", "a"),
    ("烂", "a"),
    ("麻烦", "a"),
    ("无聊", "a"),
    ("劣质", "a"),
    ("大", "a"),
    ("小", "a"),
    ("高", "a"),
    ("低", "a"),
    ("长", "a"),
    ("短", "a"),
    ("多", "a"),
    ("少", "a"),
    ("新", "a"),
    ("旧", "a"),
    ("重要", "a"),
    ("简单", "a"),
    ("容易", "a"),
    ("安静", "a"),
    // ad: adjective used adverbially
    ("认真", "ad"),
    ("努力", "ad"),
    ("积极", "ad"),
    ("仔细", "ad"),
    ("迅速", "ad"),
    ("快速", "ad"),
    ("彻底", "ad"),
    ("充分", "ad"),
    ("热烈", "ad"),
    ("耐心", "ad"),
    ("详细", "ad"),
    ("及时", "ad"),
    ("顺利", "ad"),
    ("轻松", "ad"),
    // ag: adjective morpheme
    ("美", "ag"),
    ("佳", "ag"),
    ("优", "ag"),
    ("劣", "ag"),
    ("良", "ag"),
    ("妙", "ag"),
    // an: adjective with nominal function
    ("幸福", "an"),
    ("困难", "an"),
    ("安全", "an"),
    ("健康", "an"),
    ("和平", "an"),
    ("痛苦", "an"),
    ("自由", "an"),
    ("危险", "an"),
    ("公平", "an"),
    // closed classes
    ("我", "r"),
    ("你", "r"),
    ("他", "r"),
    ("她", "r"),
    ("它", "r"),
    ("我们", "r"),
    ("你们", "r"),
    ("他们", "r"),
    ("这", "r"),
    ("那", "r"),
    ("这个", "r"),
    ("那个", "r"),
    ("不", "d"),
    ("没", "d"),
    ("很", "d"),
    ("非常", "d"),
    ("太", "d"),
    ("也", "d"),
    ("都", "d"),
    ("就", "d"),
    ("还", "d"),
    ("的", "uj"),
    ("了", "ul"),
    ("着", "uz"),
    ("过", "ug"),
    ("地", "uv"),
    ("得", "ud"),
    ("吗", "y"),
    ("呢", "y"),
    ("吧", "y"),
    ("啊", "y"),
    ("和", "c"),
    ("但是", "c"),
    ("因为", "c"),
    ("所以", "c"),
    ("在", "p"),
    ("从", "p"),
    ("对", "p"),
    ("是", "v"),
    ("有", "v"),
    ("没有", "v"),
    ("爱", "v"),
    ("喜欢", "v"),
    ("讨厌", "v"),
    ("推荐", "v"),
    ("支持", "v"),
    ("感谢", "v"),
    ("谢谢", "v"),
    ("退货", "v"),
    ("失望", "v"),
    ("生气", "v"),
    ("后悔", "v"),
    ("害怕", "v"),
    ("投诉", "v"),
    ("值得", "v"),
];

/// Naive Bayes positive-probability classifier.
#[derive(Debug, Clone)]
pub struct BayesSentimentModel {
    log_ratios: HashMap<&'static str, f64>,
}

impl Default for BayesSentimentModel {
    fn default() -> Self {
        Self {
            log_ratios: LOG_RATIOS.iter().copied().collect(),
        }
    }
}

impl BayesSentimentModel {
    /// Classifier over a custom table of `ln P(w|pos) - ln P(w|neg)` ratios.
    pub fn with_log_ratios<I>(ratios: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        Self {
            log_ratios: ratios.into_iter().collect(),
        }
    }

    /// Probability in `[0, 1]` that the words come from a positive text.
    pub fn probability_of(&self, words: &[String]) -> f64 {
        let evidence: f64 = words
            .iter()
            .filter_map(|w| self.log_ratios.get(w.as_str()))
            .sum();
        // logistic form of P(pos) / (P(pos) + P(neg)); stable for large |evidence|
        if evidence >= 0.0 {
            1.0 / (1.0 + (-evidence).exp())
        } else {
            let e = evidence.exp();
            e / (1.0 + e)
        }
    }
}

impl ProbabilityClassifier for BayesSentimentModel {
    fn name(&self) -> &'static str {
        "bayes-zh"
    }

    fn positive_probability(&self, words: &[String]) -> Result<f64, SentimentModelFailure> {
        Ok(self.probability_of(words))
    }
}

/// Part-of-speech tagger for segmented Chinese text. Dictionary tags win;
/// the lexicon covers untagged segments.
#[derive(Debug, Clone)]
pub struct ChineseTagger {
    tags: HashMap<&'static str, &'static str>,
}

impl Default for ChineseTagger {
    fn default() -> Self {
        Self {
            tags: TAG_LEXICON.iter().copied().collect(),
        }
    }
}

impl ChineseTagger {
    /// Tag from the curated table and character-class rules alone.
    pub fn tag_word(&self, word: &str) -> &'static str {
        if let Some(tag) = self.tags.get(word) {
            return *tag;
        }
        if word.is_empty() || word.chars().all(|c| c.is_whitespace() || !c.is_alphanumeric()) {
            return "x";
        }
        if word.chars().all(|c| c.is_numeric()) {
            return "m";
        }
        if word.chars().all(|c| c.is_ascii_alphabetic()) {
            return "eng";
        }
        if word.chars().any(is_cjk_ideograph) {
            return "n";
        }
        "x"
    }
}

impl Tagger for ChineseTagger {
    fn name(&self) -> &'static str {
        "ictclas-lexicon"
    }

    fn tag(&self, words: &[String]) -> Result<Vec<Keyword>, SentimentModelFailure> {
        Ok(words
            .iter()
            .map(|w| Keyword::new(w, self.tag_word(w)))
            .collect())
    }

    fn tag_segments(&self, segments: &[Segment]) -> Result<Vec<Keyword>, SentimentModelFailure> {
        Ok(segments
            .iter()
            .map(|s| match &s.pos {
                Some(pos) => Keyword::new(&s.surface, pos.as_str()),
                None => Keyword::new(&s.surface, self.tag_word(&s.surface)),
            })
            .collect())
    }

    fn is_opinion_tag(&self, tag: &str) -> bool {
        ADJECTIVE_TAGS.contains(&tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unknown_words_are_neutral() {
        let model = BayesSentimentModel::default();
        assert_eq!(model.probability_of(&[]), 0.5);
        assert_eq!(model.probability_of(&words(&["桌子", "。"])), 0.5);
    }

    #[test]
    fn positive_and_negative_evidence() {
        let model = BayesSentimentModel::default();
        let pos = model.probability_of(&words(&["我", "爱", "这个", "产品"]));
        let neg = model.probability_of(&words(&["质量", "太", "差", "了", "，", "失望"]));
        assert!(pos > 0.8, "got {pos}");
        assert!(neg < 0.1, "got {neg}");
        assert!((0.0..=1.0).contains(&pos) && (0.0..=1.0).contains(&neg));
    }

    #[test]
    fn probability_saturates_without_overflow() {
        let model = BayesSentimentModel::with_log_ratios([("好", 400.0), ("坏", -400.0)]);
        assert_eq!(model.probability_of(&words(&["好", "好"])), 1.0);
        assert_eq!(model.probability_of(&words(&["坏", "坏"])), 0.0);
    }

    #[test]
    fn tagger_labels_adjective_classes() {
        let tagger = ChineseTagger::default();
        assert_eq!(tagger.tag_word("漂亮"), "a");
        assert_eq!(tagger.tag_word("认真"), "ad");
        assert_eq!(tagger.tag_word("佳"), "ag");
        assert_eq!(tagger.tag_word("幸福"), "an");
        assert_eq!(tagger.tag_word("产品"), "n");
        assert_eq!(tagger.tag_word("。"), "x");
        assert_eq!(tagger.tag_word(" "), "x");
        assert_eq!(tagger.tag_word("2024"), "m");
        assert_eq!(tagger.tag_word("iPhone"), "eng");
    }

    #[test]
    fn only_adjective_tags_are_opinions() {
        let tagger = ChineseTagger::default();
        let tagged = tagger.tag(&words(&["这个", "产品", "很", "漂亮", "，", "服务", "热情"])).unwrap();
        let opinions: Vec<&str> = tagged
            .iter()
            .filter(|k| tagger.is_opinion_tag(&k.tag))
            .map(|k| k.word.as_str())
            .collect();
        assert_eq!(opinions, vec!["漂亮", "热情"]);
        assert!(!tagger.is_opinion_tag("v"));
    }

    #[test]
    fn dictionary_tags_take_precedence() {
        let tagger = ChineseTagger::default();
        let tagged = tagger
            .tag_segments(&[
                Segment::tagged("漂亮", "v"),
                Segment::tagged("帅气", "a"),
                Segment::untagged("满意"),
                Segment::untagged("㐀"),
            ])
            .unwrap();
        assert_eq!(
            tagged,
            vec![
                Keyword::new("漂亮", "v"),
                Keyword::new("帅气", "a"),
                Keyword::new("满意", "a"),
                Keyword::new("㐀", "x"),
            ]
        );
    }
}
