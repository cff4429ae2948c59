//! Text processing and normalization

use crate::processing::lemmatizer::Lemmatizer;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Standard English function words
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just",
    "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn", "doesn't", "hadn",
    "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma", "mightn",
    "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't", "shouldn",
    "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Contraction suffixes once split off their host word
const CLITICS: &[&str] = &["n't", "'s", "'re", "'ll", "'ve", "'d", "'m"];

/// Posting boilerplate that says nothing about the role itself
const RECRUITING_FILLER: &[&str] = &[
    "looking", "seeking", "candidate", "candidates", "ideal", "etc", "plus", "must",
    "including", "preferred", "required", "requirements", "responsibilities", "responsible",
    "ability", "able", "strong", "excellent", "well", "join",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ENGLISH_STOP_WORDS
        .iter()
        .chain(CLITICS)
        .chain(RECRUITING_FILLER)
        .copied()
        .collect()
});

/// Normalizes free text into a sequence of lowercase lemmas
#[derive(Clone, Copy)]
pub struct TextProcessor {
    stop_words: &'static HashSet<&'static str>,
    lemmatizer: &'static Lemmatizer,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        Self {
            stop_words: &STOP_WORDS,
            lemmatizer: Lemmatizer::shared(),
        }
    }

    /// Lowercase, tokenize, drop stop words and punctuation, lemmatize, and
    /// join the result with single spaces. Applying it twice changes nothing.
    pub fn preprocess(&self, text: &str) -> String {
        self.analyze(text).join(" ")
    }

    /// Token sequence behind `preprocess`
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|token| !self.is_stop_word(token))
            .map(|token| self.lemmatizer.lemmatize(&token))
            .filter(|lemma| !self.is_stop_word(lemma))
            .collect()
    }

    /// Split lowercased text on Unicode word boundaries. Contractions are
    /// broken into host and clitics (`don't` -> `do`, `n't`) and tokens made
    /// only of punctuation are dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();

        for segment in lowered.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            let segment = segment.replace('\u{2019}', "'");

            // Stacked contractions (`i'd've`) shed their clitics right to left
            let mut host = segment.as_str();
            let mut clitics = Vec::new();
            while let (rest, Some(clitic)) = split_clitic(host) {
                clitics.push(clitic);
                host = rest;
            }

            for token in std::iter::once(host).chain(clitics.into_iter().rev()) {
                if token.chars().any(|c| c.is_alphanumeric()) {
                    tokens.push(token.to_string());
                }
            }
        }

        tokens
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }
}

fn split_clitic(word: &str) -> (&str, Option<&str>) {
    for clitic in CLITICS {
        if let Some(host) = word.strip_suffix(clitic) {
            if host.is_empty() {
                break;
            }
            let host = match (host, *clitic) {
                ("ca", "n't") => "can",
                ("wo", "n't") => "will",
                ("sha", "n't") => "shall",
                _ => host,
            };
            return (host, Some(*clitic));
        }
    }
    (word, None)
}
