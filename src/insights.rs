//! Keyword-driven feedback snippets.
//!
//! Each pattern is wrapped so a match covers the whole sentence around the
//! keyword, ending at `.`, `!` or `?`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{InsightSet, Polarity};

/// Snippets kept per polarity for an agent or a team.
pub const MAX_INSIGHTS: usize = 3;
/// Matches taken from a single pattern within one text.
const MATCHES_PER_PATTERN: usize = 2;
const MIN_TEXT_CHARS: usize = 10;
const MIN_SNIPPET_CHARS: usize = 20;
const MAX_SNIPPET_CHARS: usize = 200;

const POSITIVE_PATTERNS: &[&str] = &[
    r"excellent|strong|clear|professional|effective",
    r"accurate|helpful|empathetic|warm|supportive",
    r"well[\s-]structured|easy to follow|friendly|polite",
    r"proactive|comprehensive|thorough|responsive",
];

const IMPROVEMENT_PATTERNS: &[&str] = &[
    r"could.*improve|should.*focus|needs? to",
    r"lacking|missing|insufficient|unclear",
    r"enhance|develop|work on|pay.*attention|consider",
];

static POSITIVE: Lazy<Vec<Regex>> = Lazy::new(|| compile(POSITIVE_PATTERNS));
static IMPROVEMENT: Lazy<Vec<Regex>> = Lazy::new(|| compile(IMPROVEMENT_PATTERNS));

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!(r"(?i)[^.!?]*(?:{pattern})[^.!?]*[.!?]"))
                .expect("insight patterns are valid regexes")
        })
        .collect()
}

fn patterns(polarity: Polarity) -> &'static [Regex] {
    match polarity {
        Polarity::Positive => &POSITIVE,
        Polarity::Improvement => &IMPROVEMENT,
    }
}

/// Distinct qualifying snippets of one text for one polarity, first-seen order.
pub fn extract_polarity(text: &str, polarity: Polarity) -> Vec<String> {
    let mut snippets = Vec::new();
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return snippets;
    }

    for regex in patterns(polarity) {
        for found in regex.find_iter(text).take(MATCHES_PER_PATTERN) {
            let cleaned = found.as_str().trim();
            let len = cleaned.chars().count();
            if (MIN_SNIPPET_CHARS..=MAX_SNIPPET_CHARS).contains(&len)
                && !snippets.iter().any(|s: &String| s == cleaned)
            {
                snippets.push(cleaned.to_string());
            }
        }
    }
    snippets
}

/// Positive and needs-improvement snippets of a single text.
pub fn extract(text: &str) -> InsightSet {
    InsightSet {
        positive: extract_polarity(text, Polarity::Positive),
        improvement: extract_polarity(text, Polarity::Improvement),
    }
}

/// Union of [`extract`] over `texts`, capped at `limit` snippets per polarity.
pub fn extract_all<'a, I>(texts: I, limit: usize) -> InsightSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut merged = InsightSet::default();
    for text in texts {
        if merged.positive.len() >= limit && merged.improvement.len() >= limit {
            break;
        }
        let found = extract(text);
        merge_into(&mut merged.positive, found.positive, limit);
        merge_into(&mut merged.improvement, found.improvement, limit);
    }
    merged
}

fn merge_into(target: &mut Vec<String>, found: Vec<String>, limit: usize) {
    for snippet in found {
        if target.len() >= limit {
            return;
        }
        if !target.contains(&snippet) {
            target.push(snippet);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEEDBACK: &str = "The agent gave a clear and professional answer. \
        Tone was warm and supportive throughout! \
        The agent needs to confirm the order number first. \
        Some steps were missing from the troubleshooting flow?";

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   ").is_empty());
        assert!(extract("Great job").is_empty());
    }

    #[test]
    fn splits_by_polarity() {
        let insights = extract(FEEDBACK);
        assert_eq!(
            insights.positive,
            vec![
                "The agent gave a clear and professional answer.",
                "Tone was warm and supportive throughout!",
            ]
        );
        assert_eq!(
            insights.improvement,
            vec![
                "The agent needs to confirm the order number first.",
                "Some steps were missing from the troubleshooting flow?",
            ]
        );
    }

    #[test]
    fn matching_ignores_case() {
        let insights = extract("EXCELLENT handling of a tricky refund request.");
        assert_eq!(insights.positive.len(), 1);
    }

    #[test]
    fn drops_snippets_outside_length_window() {
        let long = format!("Clear {}.", "very ".repeat(60));
        let insights = extract(&format!("Be clear now. {long}"));
        assert!(insights.positive.is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        assert_eq!(extract(FEEDBACK), extract(FEEDBACK));
        let texts = [FEEDBACK, "Responses were thorough and well-structured."];
        assert_eq!(extract_all(texts, MAX_INSIGHTS), extract_all(texts, MAX_INSIGHTS));
    }

    #[test]
    fn union_is_capped_and_deduplicated() {
        let texts = [
            FEEDBACK,
            FEEDBACK,
            "Responses were thorough and well-structured. Very friendly greeting as usual.",
        ];
        let insights = extract_all(texts, MAX_INSIGHTS);
        assert_eq!(insights.positive.len(), MAX_INSIGHTS);
        assert_eq!(insights.positive[0], "The agent gave a clear and professional answer.");
        assert_eq!(insights.improvement.len(), 2);
    }

    #[test]
    fn per_pattern_matches_are_limited() {
        let text = "Clear opening for the customer. Clear middle part of the reply. \
            Clear closing part of the reply.";
        assert_eq!(extract_polarity(text, Polarity::Positive).len(), 2);
    }
}
