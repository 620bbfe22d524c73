use serde::{Deserialize, Serialize};

/// The two supported language families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Logographic family (CJK script).
    Zh,
    /// Alphabetic family (Latin script).
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Human-readable name for console output.
    pub fn label(self) -> &'static str {
        match self {
            Language::Zh => "Chinese",
            Language::En => "English",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// CJK Unified Ideographs block as matched by the classic `[一-龥]` class.
pub(crate) fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

///Classifies text as Chinese as soon as one CJK ideograph appears, English otherwise.
/// # Example
/// ```
/// use text_profile::{detect_language, Language};
/// assert_eq!(detect_language("plain words"), Language::En);
/// assert_eq!(detect_language("mostly English, 一 char"), Language::Zh);
/// assert_eq!(detect_language(""), Language::En);
/// ```
pub fn detect_language(text: &str) -> Language {
    if text.chars().any(is_cjk_ideograph) {
        Language::Zh
    } else {
        Language::En
    }
}
