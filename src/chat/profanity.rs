//! Profanity filtering for chat messages.

use std::collections::HashSet;

/// Built-in list of blocked words.
const DEFAULT_WORDS: &[&str] = &[
    "arse", "arsehole", "asshole", "bastard", "bitch", "bollocks", "bullshit", "crap", "cunt",
    "damn", "dick", "dickhead", "fuck", "fucked", "fucker", "fucking", "goddamn", "hell",
    "motherfucker", "piss", "pissed", "prick", "shit", "shitty", "slut", "twat", "wanker",
    "whore",
];

/// Decides whether a piece of text must be rejected.
pub trait ProfanityFilter: Send + Sync {
    /// Whether the text contains blocked content.
    fn is_profane(&self, text: &str) -> bool;
}

/// Whole-word, case-insensitive matcher over a word list.
#[derive(Debug, Clone)]
pub struct WordListFilter {
    words: HashSet<String>,
}

impl WordListFilter {
    /// Create a filter with the built-in word list.
    pub fn new() -> Self {
        Self::from_words(DEFAULT_WORDS.iter().copied())
    }

    /// Create a filter that blocks exactly the given words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self {
            words: HashSet::new(),
        };
        filter.add_words(words);
        filter
    }

    /// Block additional words.
    pub fn add_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                self.words.insert(word);
            }
        }
    }

    /// Stop blocking the given words.
    pub fn remove_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            self.words.remove(&word.as_ref().trim().to_lowercase());
        }
    }

    /// Number of blocked words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether nothing is blocked.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordListFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfanityFilter for WordListFilter {
    fn is_profane(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| self.words.contains(&w.to_lowercase()))
    }
}
