//! Content analyzers: turn raw text into ordered checkpoint sequences.
//!
//! Each variant is a (tokenizer, normalization) pairing. The set is closed;
//! adding a strategy means adding a variant here and rebuilding indexes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Window width for the n-gram analyzer.
const NGRAM_WORDS: usize = 5;

/// Sorted; looked up with binary search.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as",
    "at", "be", "been", "but", "by", "can", "could", "do", "for", "from",
    "had", "has", "have", "he", "her", "his", "if", "in", "into", "is",
    "it", "its", "my", "no", "not", "of", "on", "or", "our", "she", "so",
    "some", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "to", "up", "was", "we", "were", "when",
    "which", "who", "will", "with", "would", "you", "your",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentAnalyzerKind {
    /// Sentence split, lowercased, punctuation stripped.
    Simple,
    /// Like `Simple`, but words within a sentence are sorted, so word
    /// order does not affect the checkpoint.
    BagOfWords,
    /// Like `Simple`, with common English stopwords removed.
    StopwordFiltered,
    /// Sliding five-word windows over the whole paragraph.
    WordNgram,
}

impl ContentAnalyzerKind {
    pub const ALL: [ContentAnalyzerKind; 4] = [
        ContentAnalyzerKind::Simple,
        ContentAnalyzerKind::BagOfWords,
        ContentAnalyzerKind::StopwordFiltered,
        ContentAnalyzerKind::WordNgram,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ContentAnalyzerKind::Simple => "simple",
            ContentAnalyzerKind::BagOfWords => "bag_of_words",
            ContentAnalyzerKind::StopwordFiltered => "stopword_filtered",
            ContentAnalyzerKind::WordNgram => "word_ngram",
        }
    }

    /// Extracts this strategy's checkpoints from `text`. Pure; empty or
    /// whitespace-only input yields an empty sequence.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        match self {
            ContentAnalyzerKind::Simple => sentences(text)
                .map(|words| words.join(" "))
                .collect(),
            ContentAnalyzerKind::BagOfWords => sentences(text)
                .map(|mut words| {
                    words.sort_unstable();
                    words.join(" ")
                })
                .collect(),
            ContentAnalyzerKind::StopwordFiltered => sentences(text)
                .filter_map(|words| {
                    let kept: Vec<String> = words
                        .into_iter()
                        .filter(|w| !is_stopword(w))
                        .collect();
                    if kept.is_empty() {
                        None
                    } else {
                        Some(kept.join(" "))
                    }
                })
                .collect(),
            ContentAnalyzerKind::WordNgram => ngrams(text),
        }
    }
}

impl fmt::Display for ContentAnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentAnalyzerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown content analyzer: {s}"))
    }
}

/// Normalized words of each non-empty sentence, in order.
fn sentences(text: &str) -> impl Iterator<Item = Vec<String>> + '_ {
    text.split(['.', '!', '?'])
        .map(normalize_words)
        .filter(|words| !words.is_empty())
}

fn normalize_words(sentence: &str) -> Vec<String> {
    sentence
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(|c| c.to_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

fn ngrams(text: &str) -> Vec<String> {
    let words = normalize_words(&text.replace(['.', '!', '?'], " "));
    if words.is_empty() {
        return Vec::new();
    }
    if words.len() <= NGRAM_WORDS {
        return vec![words.join(" ")];
    }
    words
        .windows(NGRAM_WORDS)
        .map(|window| window.join(" "))
        .collect()
}
