//! Answer and token normalization
//!
//! Typed answers, accepted answers and sentence tokens are all compared
//! through [`normalize`], which is the only equality test the engine uses
//! for text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters removed from answers before comparison
pub const STRIPPED_PUNCTUATION: &[char] = &[
    '¿', '?', '¡', '!', '.', ',', ';', ':', '(', ')', '"', '\'', '`', '-',
];

/// Punctuation removed from a sentence before it is split into tokens
pub const SENTENCE_PUNCTUATION: &[char] = &['¿', '?', '¡', '!', '.', ',', ';'];

/// Separator between alternative accepted answers
pub const ANSWER_SEPARATOR: char = ';';

/// Lowercases, strips punctuation and diacritics, and collapses whitespace.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !STRIPPED_PUNCTUATION.contains(c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a `;`-separated answer list into its non-empty normalized forms
pub fn accepted_answers(accepted: &str) -> Vec<String> {
    accepted
        .split(ANSWER_SEPARATOR)
        .map(normalize)
        .filter(|alt| !alt.is_empty())
        .collect()
}

/// True when `typed` matches one of the `;`-separated alternatives
pub fn matches_answer(typed: &str, accepted: &str) -> bool {
    let typed = normalize(typed);
    if typed.is_empty() {
        return false;
    }
    accepted_answers(accepted).iter().any(|alt| *alt == typed)
}

/// Whitespace-delimited words of a sentence with sentence punctuation removed
pub fn sentence_tokens(sentence: &str) -> Vec<String> {
    sentence
        .chars()
        .filter(|c| !SENTENCE_PUNCTUATION.contains(c))
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
