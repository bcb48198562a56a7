//! Case-insensitive match spans for rendering search hits
//!
//! Offsets are character (not byte) positions into the original text, and
//! ranges are half-open, so `text.chars().skip(start).take(end - start)`
//! reproduces `matched_text` exactly.
//!
//! Case folding pairs one character with one character. A character whose
//! lowercase form is several characters, such as `'İ'` (lowercase `"i\u{307}"`),
//! only matches itself or an uppercase-equal character, never its expanded
//! lowercase spelling. The text filter uses the same comparison, so every
//! filtered match still has a span.

use crate::models::Todo;
use serde::{Deserialize, Serialize};

/// Field a highlight span points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightField {
    Title,
    Description,
}

/// One match occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub field: HighlightField,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
}

impl Highlight {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn overlaps(&self, other: &Highlight) -> bool {
        self.field == other.field && self.start < other.end && other.start < self.end
    }
}

fn chars_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn window_matches(window: &[char], needle: &[char]) -> bool {
    window.iter().zip(needle).all(|(a, b)| chars_eq(*a, *b))
}

/// All non-overlapping case-insensitive occurrences of `query` in `text`,
/// scanning left to right. Blank queries match nothing.
pub fn find_matches(text: &str, query: &str) -> Vec<(usize, usize)> {
    let needle: Vec<char> = query.chars().collect();
    if query.trim().is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut i = 0;

    while i + needle.len() <= haystack.len() {
        if window_matches(&haystack[i..i + needle.len()], &needle) {
            spans.push((i, i + needle.len()));
            i += needle.len();
        } else {
            i += 1;
        }
    }

    spans
}

/// Whether `query` occurs in `text`, under the same comparison the
/// highlighter uses. Blank queries match everything.
pub fn contains_ignore_case(text: &str, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }

    let needle: Vec<char> = query.chars().collect();
    let haystack: Vec<char> = text.chars().collect();

    haystack
        .windows(needle.len())
        .any(|window| window_matches(window, &needle))
}

/// Highlight spans for one field
pub fn highlight_field(field: HighlightField, text: &str, query: &str) -> Vec<Highlight> {
    let spans = find_matches(text, query);
    if spans.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    spans
        .into_iter()
        .map(|(start, end)| Highlight {
            field,
            start,
            end,
            matched_text: chars[start..end].iter().collect(),
        })
        .collect()
}

/// Highlight spans for several terms in one field, merged first-wins
pub fn highlight_terms(field: HighlightField, text: &str, terms: &[&str]) -> Vec<Highlight> {
    let spans = terms
        .iter()
        .flat_map(|term| highlight_field(field, text, term))
        .collect();

    merge_overlapping(spans)
}

/// Resolve overlapping spans with the first-wins rule: spans are ordered by
/// field, then start, then longest first, and a span overlapping one already
/// kept in the same field is dropped. Spans are never merged into new text.
pub fn merge_overlapping(mut spans: Vec<Highlight>) -> Vec<Highlight> {
    spans.sort_by(|a, b| {
        a.field
            .cmp(&b.field)
            .then(a.start.cmp(&b.start))
            .then(b.len().cmp(&a.len()))
    });

    let mut kept: Vec<Highlight> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().is_some_and(|last| last.overlaps(&span)) {
            continue;
        }
        kept.push(span);
    }
    kept
}

/// Title spans, followed by description spans when `include_description` is set
pub fn highlight_todo(todo: &Todo, query: &str, include_description: bool) -> Vec<Highlight> {
    let mut highlights = highlight_field(HighlightField::Title, &todo.title, query);

    if include_description {
        if let Some(ref description) = todo.description {
            highlights.extend(highlight_field(HighlightField::Description, description, query));
        }
    }

    highlights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(text: &str, start: usize, end: usize) -> String {
        text.chars().skip(start).take(end - start).collect()
    }

    #[test]
    fn test_multibyte_title() {
        let title = "Ruby on Rails学習";
        let highlights = highlight_field(HighlightField::Title, title, "rails");

        assert_eq!(highlights.len(), 1);
        let h = &highlights[0];
        assert_eq!(h.matched_text, "Rails");
        assert_eq!((h.start, h.end), (8, 13));
        assert_eq!(slice(title, h.start, h.end), h.matched_text);
    }

    #[test]
    fn test_offsets_after_multibyte_prefix() {
        let title = "学習メモ: Rust入門とrust応用";
        let highlights = highlight_field(HighlightField::Title, title, "RUST");

        assert_eq!(highlights.len(), 2);
        for h in &highlights {
            assert_eq!(slice(title, h.start, h.end), h.matched_text);
        }
        assert_eq!(highlights[0].matched_text, "Rust");
        assert_eq!(highlights[1].matched_text, "rust");
    }

    #[test]
    fn test_non_overlapping_scan() {
        assert_eq!(find_matches("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert_eq!(find_matches("aaa", "aa"), vec![(0, 2)]);
    }

    #[test]
    fn test_blank_query() {
        assert!(find_matches("anything", "").is_empty());
        assert!(find_matches("anything", "   ").is_empty());
        assert!(contains_ignore_case("anything", ""));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Quarterly REPORT", "report"));
        assert!(!contains_ignore_case("Quarterly", "report"));
        assert!(!contains_ignore_case("ab", "abc"));
    }

    #[test]
    fn test_folding_is_char_for_char() {
        assert_eq!(find_matches("İstanbul", "İSTANBUL"), vec![(0, 8)]);
        assert!(find_matches("İstanbul", "i\u{307}stanbul").is_empty());
        assert!(!contains_ignore_case("İstanbul", "i\u{307}stanbul"));
        assert!(!contains_ignore_case("İstanbul", "istanbul"));
    }

    #[test]
    fn test_merge_first_wins() {
        let spans = highlight_terms(HighlightField::Title, "database backup", &["base", "database", "back"]);

        let texts: Vec<&str> = spans.iter().map(|h| h.matched_text.as_str()).collect();
        assert_eq!(texts, vec!["database", "back"]);
    }

    #[test]
    fn test_merge_keeps_fields_apart() {
        let spans = vec![
            Highlight { field: HighlightField::Description, start: 0, end: 4, matched_text: "plan".into() },
            Highlight { field: HighlightField::Title, start: 0, end: 4, matched_text: "Plan".into() },
        ];

        let merged = merge_overlapping(spans);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].field, HighlightField::Title);
    }

    #[test]
    fn test_highlight_todo_fields() {
        let todo = Todo::new(1, 1, "Plan trip").with_description("plan the route, then plan meals");

        assert_eq!(highlight_todo(&todo, "plan", false).len(), 1);

        let all = highlight_todo(&todo, "plan", true);
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].field, HighlightField::Description);
        assert_eq!(all[2].start, 21);
    }
}
