//! Tokenization of item text for vocabulary and keyword signals.
//!
//! Text is lowercased and split on every run of non-alphanumeric characters, so
//! `"wallet,"` and `"wallet"` are the same token and `"black/white"` yields both
//! colors.
//! Vocabulary terms match whole tokens only: `"hp"` does not fire on `"php"`.

use std::collections::HashSet;

/// Minimum length (exclusive) of a word to count as a shared keyword
const MIN_KEYWORD_LEN: usize = 2;

/// Split text into lowercase tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Tokens of one item's text, with a set for membership checks
#[derive(Debug, Clone, Default)]
pub struct ItemText {
    tokens: Vec<String>,
    set: HashSet<String>,
}

impl ItemText {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        let set = tokens.iter().cloned().collect();
        Self { tokens, set }
    }

    /// True if the single word appears as a whole token
    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.set.contains(term)
    }

    /// True if the phrase appears as a contiguous run of tokens
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        match words.len() {
            0 => false,
            1 => self.contains_term(words[0]),
            n => self
                .tokens
                .windows(n)
                .any(|window| window.iter().zip(&words).all(|(a, b)| a == b)),
        }
    }

    /// Term or phrase, whichever the entry is
    #[inline]
    pub fn contains(&self, entry: &str) -> bool {
        if entry.contains(' ') {
            self.contains_phrase(entry)
        } else {
            self.contains_term(entry)
        }
    }

    /// Distinct tokens long enough to count as keywords, in first-seen order
    pub fn keywords(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        for token in &self.tokens {
            if token.chars().count() > MIN_KEYWORD_LEN && seen.insert(token.as_str()) {
                keywords.push(token.as_str());
            }
        }
        keywords
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
