//! Neutral substitutes for words that trip content filters.

use regex::Regex;
use std::sync::OnceLock;
use storyboard_core::WordReplacement;
use tracing::debug;

/// Words that commonly trigger safety filters, with neutral equivalents.
const UNSAFE_WORDS: &[(&str, &str)] = &[
    // Roles
    ("공범", "협력자"),
    ("범죄자", "인물"),
    ("악역", "상대역"),
    ("악인", "인물"),
    ("범인", "인물"),
    ("살인자", "인물"),
    ("도둑", "인물"),
    ("강도", "인물"),
    // Intensity
    ("위험한", "신중한"),
    ("무서운", "진지한"),
    ("위협적인", "당당한"),
    ("잔인한", "엄격한"),
    ("포악한", "강인한"),
    // Darkness and mood
    ("어둠", "진한 색"),
    ("어두운", "진한 색의"),
    ("검은", "어두운 색의"),
    ("미스터리한", "신비로운"),
    ("수상한", "독특한"),
    ("의심스러운", "신중한"),
    // Character traits
    ("사악한", "카리스마 있는"),
    ("음험한", "신중한"),
    ("교활한", "영리한"),
    ("불길한", "신비로운"),
];

fn pattern() -> &'static Option<Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut words: Vec<&str> = UNSAFE_WORDS.iter().map(|(word, _)| *word).collect();
        // Longest first so "범죄자" wins over any shorter overlap.
        words.sort_by_key(|word| std::cmp::Reverse(word.chars().count()));
        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).ok()
    })
}

fn replacement_for(word: &str) -> Option<&'static str> {
    UNSAFE_WORDS
        .iter()
        .find(|(unsafe_word, _)| *unsafe_word == word)
        .map(|(_, replacement)| *replacement)
}

/// Replace filter-tripping words in one pass.
///
/// Substituted text is never scanned again, so a replacement that contains
/// another listed word stays as written. Each distinct word is reported once,
/// in order of first appearance.
///
/// # Examples
///
/// ```
/// use storyboard_pipeline::replace_unsafe_words;
///
/// let (text, replacements) = replace_unsafe_words("검은 코트를 입은 범인");
/// assert_eq!(text, "어두운 색의 코트를 입은 인물");
/// assert_eq!(replacements.len(), 2);
///
/// let (text, replacements) = replace_unsafe_words("a sunny picnic");
/// assert_eq!(text, "a sunny picnic");
/// assert!(replacements.is_empty());
/// ```
pub fn replace_unsafe_words(text: &str) -> (String, Vec<WordReplacement>) {
    let Some(pattern) = pattern() else {
        return (text.to_string(), Vec::new());
    };

    let mut replacements: Vec<WordReplacement> = Vec::new();
    let replaced = pattern.replace_all(text, |caps: &regex::Captures<'_>| {
        let word = &caps[0];
        let replacement = replacement_for(word).unwrap_or(word);
        if !replacements.iter().any(|r| r.original == word) {
            replacements.push(WordReplacement {
                original: word.to_string(),
                replacement: replacement.to_string(),
            });
        }
        replacement.to_string()
    });

    if !replacements.is_empty() {
        debug!(
            count = replacements.len(),
            words = %replacements
                .iter()
                .map(|r| format!("{} -> {}", r.original, r.replacement))
                .collect::<Vec<_>>()
                .join(", "),
            "Replaced filter-sensitive words"
        );
    }

    (replaced.into_owned(), replacements)
}
