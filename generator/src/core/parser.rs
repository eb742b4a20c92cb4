//! Normalisation of raw model output into discrete pieces of content
//!
//! Models do not reliably honour the requested delimiter, so variation
//! parsing degrades through several tiers and never fails outright.

use std::ops::RangeInclusive;

use regex::Regex;
use shared::GeneratedContent;
use tracing::debug;

use crate::core::prompt::{POST_SEPARATOR, VARIATION_COUNT};
use crate::types::OutputFormat;

/// Separators tried in order; the first yielding two or more parts wins
pub const KNOWN_SEPARATORS: [&str; 6] = [
    POST_SEPARATOR,
    "---SEPARATOR---",
    "---VARIATION---",
    "***",
    "---",
    "===",
];

/// Character-length window for a plausible post title
pub const TITLE_LENGTH: RangeInclusive<usize> = 10..=120;

/// Parsing tier that produced a set of variations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTier {
    Separator(&'static str),
    NumberedList,
    Paragraphs,
}

/// Regex-based response parser
pub struct ResponseParser {
    numbered_item: Regex,
    variation_label: Regex,
    list_marker: Regex,
    blank_line: Regex,
}

impl ResponseParser {
    /// Create new response parser
    pub fn new() -> Self {
        Self {
            numbered_item: Regex::new(r"(?m)^[ \t]*\d{1,2}[.)][ \t]+").expect("numbered item pattern"),
            variation_label: Regex::new(
                r"(?i)^(?:\*\*|#+\s*)?(?:variation|option|version)\s*\d+\s*[:.)-](?:\*\*)?\s*",
            )
            .expect("variation label pattern"),
            list_marker: Regex::new(r"^(?:\d{1,2}[.)]|[-*•])\s*").expect("list marker pattern"),
            blank_line: Regex::new(r"\n[ \t]*\n").expect("blank line pattern"),
        }
    }

    /// Parse raw text according to the output format requested in the prompt
    pub fn parse(&self, output: OutputFormat, raw: &str) -> GeneratedContent {
        match output {
            OutputFormat::Variations => GeneratedContent::Variations(self.parse_variations(raw)),
            OutputFormat::JsonList => GeneratedContent::Variations(self.parse_topics(raw)),
            OutputFormat::Single => GeneratedContent::Single(raw.trim().to_string()),
        }
    }

    /// Split free-form output into variations
    pub fn parse_variations(&self, raw: &str) -> Vec<String> {
        let (tier, parts) = self.split_variations(raw);
        debug!("Parsed {} variations via {:?}", parts.len(), tier);
        parts
    }

    fn split_variations(&self, raw: &str) -> (ParseTier, Vec<String>) {
        for separator in KNOWN_SEPARATORS {
            let parts = self.strip_labels(split_on_separator(raw, separator));
            if parts.len() >= 2 {
                return (ParseTier::Separator(separator), parts);
            }
        }

        let numbered = self.strip_labels(self.split_numbered(raw));
        if numbered.len() >= 2 {
            return (ParseTier::NumberedList, numbered);
        }

        (ParseTier::Paragraphs, self.split_paragraphs(raw))
    }

    /// Drop "Variation N:" style labels, then any segment left empty
    fn strip_labels(&self, parts: Vec<String>) -> Vec<String> {
        parts
            .into_iter()
            .map(|part| self.variation_label.replace(&part, "").trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    }

    /// Segments following each line-leading `N.` / `N)` marker; preamble dropped
    fn split_numbered(&self, raw: &str) -> Vec<String> {
        let markers: Vec<_> = self.numbered_item.find_iter(raw).collect();
        if markers.len() < 2 {
            return Vec::new();
        }

        let segments = markers.iter().enumerate().map(|(index, marker)| {
            let end = markers
                .get(index + 1)
                .map(|next| next.start())
                .unwrap_or(raw.len());
            &raw[marker.end()..end]
        });
        non_empty_parts(segments)
    }

    /// Blank-line paragraphs, truncated or cycled to exactly six entries
    fn split_paragraphs(&self, raw: &str) -> Vec<String> {
        let text = without_tokens(raw);
        let paragraphs = self.strip_labels(non_empty_parts(self.blank_line.split(&text)));
        if paragraphs.is_empty() {
            return Vec::new();
        }

        (0..VARIATION_COUNT)
            .map(|index| paragraphs[index % paragraphs.len()].clone())
            .collect()
    }

    /// Extract topic titles from a JSON array, or line by line when that fails
    pub fn parse_topics(&self, raw: &str) -> Vec<String> {
        if let Some(titles) = parse_json_titles(raw) {
            return titles;
        }

        debug!("Topic response was not a JSON array, extracting titles line by line");

        let titles: Vec<String> = raw
            .lines()
            .map(|line| self.clean_title_line(line))
            .filter(|title| TITLE_LENGTH.contains(&title.chars().count()))
            .collect();

        if titles.is_empty() {
            return non_empty_parts(std::iter::once(raw));
        }
        titles
    }

    fn clean_title_line(&self, line: &str) -> String {
        let stripped = self.list_marker.replace(line.trim(), "");
        stripped
            .trim()
            .trim_end_matches(',')
            .trim_matches(|c| matches!(c, '"' | '\'' | '“' | '”' | '[' | ']'))
            .trim()
            .to_string()
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_json_titles(raw: &str) -> Option<Vec<String>> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end <= start {
        return None;
    }

    let titles: Vec<String> = serde_json::from_str(&raw[start..=end]).ok()?;
    let titles = non_empty_parts(titles.iter().map(String::as_str));
    (!titles.is_empty()).then_some(titles)
}

/// Word-like tokens always match inline
fn is_token(separator: &str) -> bool {
    separator.chars().any(char::is_alphabetic)
}

/// Whole-line rules are preferred; an inline split is used when they yield
/// fewer than two parts
fn split_on_separator(raw: &str, separator: &str) -> Vec<String> {
    if is_token(separator) {
        return non_empty_parts(raw.split(separator));
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    for line in raw.lines() {
        if line.trim() == separator {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    parts.push(current);

    let whole_line = non_empty_parts(parts.iter().map(String::as_str));
    if whole_line.len() >= 2 {
        return whole_line;
    }

    // Leftover token separators must not be mistaken for a `---` rule
    non_empty_parts(without_tokens(raw).split(separator))
}

/// Replace word-like separators with blank lines
fn without_tokens(raw: &str) -> String {
    KNOWN_SEPARATORS
        .into_iter()
        .filter(|separator| is_token(separator))
        .fold(raw.to_string(), |text, separator| text.replace(separator, "\n\n"))
}

fn non_empty_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}
