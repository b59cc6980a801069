use std::collections::HashMap;

use storage::models::{AlignmentStatus, CharInterval, Extraction};

/// Minimum share of extraction tokens that must appear in a source window
/// for a fuzzy match.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.75;

#[derive(Debug)]
struct Token {
    start: usize,
    end: usize,
    norm: String,
}

/// Grounds extractions to byte spans of the text they came from.
#[derive(Debug, Clone)]
pub struct Aligner {
    fuzzy_threshold: f64,
}

impl Aligner {
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self { fuzzy_threshold }
    }

    /// Locates every extraction inside `source` and records spans shifted by
    /// `offset`. Extractions that cannot be located keep `char_interval: None`.
    pub fn align(&self, extractions: &mut [Extraction], source: &str, offset: usize) {
        let source_tokens = tokenize(source);
        let mut cursor = 0;

        for extraction in extractions.iter_mut() {
            match self.locate(&extraction.extraction_text, source, &source_tokens, cursor) {
                Some((interval, status)) => {
                    if status == AlignmentStatus::MatchExact {
                        cursor = interval.end_pos;
                    }
                    extraction.char_interval = Some(interval.shifted(offset));
                    extraction.alignment_status = Some(status);
                }
                None => {
                    extraction.char_interval = None;
                    extraction.alignment_status = None;
                }
            }
        }
    }

    fn locate(
        &self,
        needle: &str,
        source: &str,
        source_tokens: &[Token],
        cursor: usize,
    ) -> Option<(CharInterval, AlignmentStatus)> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }

        let exact = source
            .get(cursor..)
            .and_then(|rest| rest.find(needle))
            .map(|pos| pos + cursor)
            .or_else(|| source.find(needle));
        if let Some(start) = exact {
            return Some((
                CharInterval::new(start, start + needle.len()),
                AlignmentStatus::MatchExact,
            ));
        }

        if let Some(start) = find_ignore_ascii_case(source, needle) {
            return Some((
                CharInterval::new(start, start + needle.len()),
                AlignmentStatus::MatchCaseInsensitive,
            ));
        }

        self.fuzzy_match(needle, source_tokens)
            .map(|interval| (interval, AlignmentStatus::MatchFuzzy))
    }

    /// Finds the source window of the same token length with the largest
    /// token overlap, then trims window edges that do not occur in the needle.
    fn fuzzy_match(&self, needle: &str, source_tokens: &[Token]) -> Option<CharInterval> {
        let needle_tokens = tokenize(needle);
        if needle_tokens.is_empty() || source_tokens.is_empty() {
            return None;
        }

        let mut wanted: HashMap<&str, usize> = HashMap::new();
        for token in &needle_tokens {
            *wanted.entry(token.norm.as_str()).or_default() += 1;
        }

        let window = needle_tokens.len().min(source_tokens.len());
        let mut best: Option<(usize, usize)> = None;

        for start in 0..=source_tokens.len() - window {
            let mut remaining = wanted.clone();
            let mut matched = 0;
            for token in &source_tokens[start..start + window] {
                if let Some(count) = remaining.get_mut(token.norm.as_str()) {
                    if *count > 0 {
                        *count -= 1;
                        matched += 1;
                    }
                }
            }
            if best.is_none_or(|(_, best_matched)| matched > best_matched) {
                best = Some((start, matched));
            }
        }

        let (start, matched) = best?;
        let score = matched as f64 / needle_tokens.len() as f64;
        if score < self.fuzzy_threshold {
            return None;
        }

        let span = &source_tokens[start..start + window];
        let first = span
            .iter()
            .position(|t| wanted.contains_key(t.norm.as_str()))?;
        let last = span
            .iter()
            .rposition(|t| wanted.contains_key(t.norm.as_str()))?;

        Some(CharInterval::new(span[first].start, span[last].end))
    }
}

impl Default for Aligner {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD)
    }
}

/// Runs of alphanumeric characters with their byte spans.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (pos, c) in text.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(pos),
            (false, Some(s)) => {
                tokens.push(make_token(text, s, pos));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(make_token(text, s, text.len()));
    }
    tokens
}

fn make_token(text: &str, start: usize, end: usize) -> Token {
    Token {
        start,
        end,
        norm: text[start..end].to_lowercase(),
    }
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() || n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len())
        .filter(|&i| haystack.is_char_boundary(i))
        .find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
