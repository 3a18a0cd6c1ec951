//! Shared text helpers: bullets, tokens, windows

use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Glyphs that mark a bulleted line.
pub const BULLET_GLYPHS: [char; 3] = ['•', '-', '*'];

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    token_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let token_regex = Regex::new(r"\b[a-z][a-z0-9]+\b").expect("Invalid token regex");

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            token_regex,
        }
    }

    /// Lowercased letter/digit runs of at least two characters, in text order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Most frequent non-stop-word tokens longer than two characters.
    ///
    /// Ties keep first-seen order.
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let mut first_seen: Vec<String> = Vec::new();
        let mut word_freq: HashMap<String, usize> = HashMap::new();

        for token in self.tokenize(text) {
            if self.is_stop_word(&token) || token.chars().count() <= 2 {
                continue;
            }
            let count = word_freq.entry(token.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(token);
            }
            *count += 1;
        }

        let mut keywords: Vec<(String, usize)> = first_seen
            .into_iter()
            .map(|word| {
                let count = word_freq[&word];
                (word, count)
            })
            .collect();
        // sort_by is stable
        keywords.sort_by(|a, b| b.1.cmp(&a.1));

        keywords
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word)
            .collect()
    }
}

/// Strip a bullet glyph from a line, if it carries one.
pub fn bullet_text(line: &str) -> Option<String> {
    let stripped = line.trim();
    if !stripped.starts_with(BULLET_GLYPHS) {
        return None;
    }
    let text = stripped.trim_start_matches(|c: char| BULLET_GLYPHS.contains(&c) || c == ' ');
    Some(text.trim().to_string())
}

/// Every bulleted line of `text`, glyphs removed.
pub fn extract_bullets(text: &str) -> Vec<String> {
    text.lines().filter_map(bullet_text).collect()
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let pattern = format!("(?i){}", regex::escape(needle));
    Regex::new(&pattern).ok()?.find(haystack).map(|m| m.start())
}

/// Up to `max_chars` characters of `text` starting at byte offset `start`.
pub fn char_window(text: &str, start: usize, max_chars: usize) -> &str {
    let tail = &text[start..];
    match tail.char_indices().nth(max_chars) {
        Some((end, _)) => &tail[..end],
        None => tail,
    }
}

const STOP_WORDS: [&str; 44] = [
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
    "of", "with", "by", "from", "as", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "may", "might", "must", "can", "this",
    "that", "these", "those", "their", "our", "your",
];
