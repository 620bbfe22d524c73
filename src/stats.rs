use std::collections::{HashMap, HashSet};

/// Document metrics and the token frequency distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalStats {
    pub file_size_bytes: u64,
    pub char_count: usize,
    pub line_count: usize,
    pub token_count: usize,
    pub frequency: HashMap<String, u32>,
}

///Takes the raw text, its on-disk size and the token list and computes the lexical statistics.
///`char_count` counts Unicode scalar values, not bytes.
/// # Example
/// ```
/// use text_profile::aggregate;
/// let tokens = vec!["a".to_string(), "b".to_string(), "a".to_string()];
/// let stats = aggregate("a b\na", 5, &tokens);
/// assert_eq!(stats.line_count, 2);
/// assert_eq!(stats.token_count, 3);
/// assert_eq!(stats.frequency["a"], 2);
/// ```
pub fn aggregate(text: &str, file_size_bytes: u64, tokens: &[String]) -> LexicalStats {
    LexicalStats {
        file_size_bytes,
        char_count: text.chars().count(),
        line_count: count_lines(text),
        token_count: tokens.len(),
        frequency: count_words(tokens),
    }
}

///Counts line-separated segments, splitting on `\n`, `\r\n` and a lone `\r`.
///A trailing terminator does not open another line; empty text has none.
pub fn count_lines(text: &str) -> usize {
    let mut lines = 0;
    let mut open = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => {
                lines += 1;
                open = false;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines += 1;
                open = false;
            }
            _ => open = true,
        }
    }
    if open { lines + 1 } else { lines }
}

///Takes &[String] and counts the quantity of each word. Returns HashMap<String,u32>, with String being the word and u32 the quantity
/// # Example
/// ```
/// use text_profile::count_words;
/// let words = vec!["two".to_string(), "one".to_string(), "two".to_string()];
/// let counted = count_words(&words);
/// assert_eq!(counted["two"], 2);
/// assert_eq!(counted["one"], 1);
/// ```
pub fn count_words(words: &[String]) -> HashMap<String, u32> {
    let mut frequency: HashMap<String, u32> = HashMap::new();
    for word in words {
        *frequency.entry(word.to_owned()).or_insert(0) += 1;
    }
    frequency
}

///Returns the `n` most frequent tokens, count descending. Ties keep the order
///in which the tokens first appear in `tokens`.
/// # Example
/// ```
/// use text_profile::{count_words, top_words};
/// let words: Vec<String> = "b a b c a".split(' ').map(String::from).collect();
/// let top = top_words(&words, &count_words(&words), 2);
/// assert_eq!(top, vec![("b".to_string(), 2), ("a".to_string(), 2)]);
/// ```
pub fn top_words(tokens: &[String], frequency: &HashMap<String, u32>, n: usize) -> Vec<(String, u32)> {
    let mut first_seen: Vec<&String> = Vec::with_capacity(frequency.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(frequency.len());
    for token in tokens {
        if seen.insert(token.as_str()) {
            first_seen.push(token);
        }
    }

    let mut vec_sorted: Vec<(String, u32)> = first_seen
        .into_iter()
        .map(|word| (word.clone(), frequency.get(word).copied().unwrap_or(0)))
        .collect();
    // stable sort keeps first-occurrence order among equal counts
    vec_sorted.sort_by(|a, b| b.1.cmp(&a.1));
    vec_sorted.truncate(n);
    vec_sorted
}
