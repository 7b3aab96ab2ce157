//! Flash-card extraction from generated text.
//!
//! # Format
//! ```text
//! Q: What is the powerhouse of the cell?
//! A: The mitochondria.
//!
//! Q: What carries genetic information?
//! A: DNA.
//! ```
//!
//! The marker letters follow [`Prefixes::for_language`]. When no marked pair
//! is found the response is run through the remaining [`CardStrategy`]
//! values in order and the first one that applies wins.

use super::prompt::Prefixes;
use crate::types::FlashCard;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

const MISSING_QUESTION: &str = "Missing question";
const MISSING_ANSWER: &str = "Missing answer";
const NO_ANSWER: &str = "No answer provided";

/// One way of turning a response into cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStrategy {
    /// Question and answer lines carrying the language's markers.
    Prefixed,
    /// The whole response is JSON. Anything but an array yields no cards.
    WholeJson,
    /// The first `[{ ... }]` span that parses as JSON.
    BracketedArray,
    /// A bracketed list of flat objects.
    InlineObjects,
    /// A line containing `?` followed by its answer line.
    QuestionLines,
    /// Two fixed cards asking the user to retry.
    Placeholder,
}

impl CardStrategy {
    pub const ORDER: [CardStrategy; 6] = [
        Self::Prefixed,
        Self::WholeJson,
        Self::BracketedArray,
        Self::InlineObjects,
        Self::QuestionLines,
        Self::Placeholder,
    ];

    pub fn applies(&self, text: &str, prefixes: Prefixes) -> bool {
        self.attempt(text, prefixes).is_some()
    }

    /// Cards produced by this strategy, empty when it does not apply.
    pub fn extract(&self, text: &str, prefixes: Prefixes) -> Vec<FlashCard> {
        self.attempt(text, prefixes).unwrap_or_default()
    }

    fn attempt(&self, text: &str, prefixes: Prefixes) -> Option<Vec<FlashCard>> {
        match self {
            Self::Prefixed => non_empty(prefixed_cards(text, prefixes)),
            Self::WholeJson => serde_json::from_str::<Value>(text)
                .ok()
                .map(|value| cards_from_json(&value)),
            Self::BracketedArray => {
                let found = bracketed_array()?.find(text)?;
                let value = serde_json::from_str::<Value>(found.as_str()).ok()?;
                Some(cards_from_json(&value))
            }
            Self::InlineObjects => {
                let caps = inline_objects()?.captures(text)?;
                let inner = caps.get(1)?.as_str();
                let value = serde_json::from_str::<Value>(&format!("[{inner}]")).ok()?;
                Some(cards_from_json(&value))
            }
            Self::QuestionLines if text.contains('?') => non_empty(question_line_cards(text)),
            Self::QuestionLines => None,
            Self::Placeholder => Some(vec![
                FlashCard::new(
                    1,
                    "The AI couldn't generate proper flash cards",
                    "Please try again with more detailed content in your note",
                ),
                FlashCard::new(
                    2,
                    "How to get better flash cards?",
                    "Add more detailed information to your note and try again",
                ),
            ]),
        }
    }
}

/// Cards parsed from a response, with the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCards {
    pub strategy: CardStrategy,
    pub cards: Vec<FlashCard>,
}

/// Run the strategies in order. The result can still hold no cards when the
/// response is JSON that is not an array of cards.
pub fn parse_flash_cards(text: &str, prefixes: Prefixes) -> ParsedCards {
    for strategy in CardStrategy::ORDER {
        if let Some(cards) = strategy.attempt(text, prefixes) {
            return ParsedCards { strategy, cards };
        }
    }
    ParsedCards {
        strategy: CardStrategy::Placeholder,
        cards: CardStrategy::Placeholder.extract(text, prefixes),
    }
}

fn non_empty(cards: Vec<FlashCard>) -> Option<Vec<FlashCard>> {
    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}

enum LineType<'a> {
    Question(&'a str),
    Answer(&'a str),
    Other,
}

fn classify(line: &str, prefixes: Prefixes) -> LineType<'_> {
    let line = line
        .trim()
        .trim_start_matches(|c: char| {
            matches!(c, '*' | '_' | '#' | '>' | '-') || c.is_whitespace()
        });

    if let Some(rest) = strip_marker(line, prefixes.question) {
        LineType::Question(rest)
    } else if let Some(rest) = strip_marker(line, prefixes.answer) {
        LineType::Answer(rest)
    } else {
        LineType::Other
    }
}

/// Text after `marker:` (case-insensitive marker, any spacing around the
/// colon, full-width colon accepted). Empty remainders do not count.
fn strip_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let mut chars = line.char_indices();
    for expected in marker.chars() {
        let (_, c) = chars.next()?;
        if !c.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let rest = match chars.next() {
        Some((idx, _)) => &line[idx..],
        None => return None,
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('：'))?;
    let rest = rest.trim_matches(|c: char| c == '*' || c.is_whitespace());
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn prefixed_cards(text: &str, prefixes: Prefixes) -> Vec<FlashCard> {
    let mut cards = Vec::new();
    let mut pending: Option<&str> = None;

    for line in text.lines() {
        match classify(line, prefixes) {
            LineType::Question(question) => pending = Some(question),
            LineType::Answer(answer) => {
                if let Some(question) = pending.take() {
                    cards.push(FlashCard::new(cards.len() as u32 + 1, question, answer));
                }
            }
            LineType::Other => {}
        }
    }
    cards
}

fn cards_from_json(value: &Value) -> Vec<FlashCard> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let front = field_text(item, "front")
                .or_else(|| field_text(item, "question"))
                .unwrap_or_else(|| MISSING_QUESTION.to_string());
            let back = field_text(item, "back")
                .or_else(|| field_text(item, "answer"))
                .unwrap_or_else(|| MISSING_ANSWER.to_string());
            FlashCard::new(idx as u32 + 1, front, back)
        })
        .collect()
}

/// A field's text, treating null, false, zero and "" as absent.
fn field_text(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn question_line_cards(text: &str) -> Vec<FlashCard> {
    let lines: Vec<&str> = split_lines().map_or_else(
        || text.lines().filter(|l| !l.is_empty()).collect(),
        |re| re.split(text).collect(),
    );

    let mut cards = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();
        if line.contains('?') {
            let back = lines
                .get(i + 1)
                .map(|next| next.trim())
                .filter(|next| !next.is_empty())
                .unwrap_or(NO_ANSWER);
            cards.push(FlashCard::new(cards.len() as u32 + 1, line, back));
            i += 1;
        }
        i += 1;
    }
    cards
}

fn bracketed_array() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\s*\{[\s\S]*?\}\s*\]").ok())
        .as_ref()
}

fn inline_objects() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\s*(\{[^{}]*\}(?:\s*,\s*\{[^{}]*\})*)\s*\]").ok())
        .as_ref()
}

fn split_lines() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").ok()).as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::Language;
    use pretty_assertions::assert_eq;

    fn english() -> Prefixes {
        Prefixes::for_language(Language::English)
    }

    fn fronts(cards: &[FlashCard]) -> Vec<&str> {
        cards.iter().map(|c| c.front.as_str()).collect()
    }

    #[test]
    fn parses_marked_pairs() {
        let text = "Q: What is DNA?\nA: Genetic material\n\nQ: What is RNA?\nA: A messenger";
        let parsed = parse_flash_cards(text, english());
        assert_eq!(parsed.strategy, CardStrategy::Prefixed);
        assert_eq!(
            parsed.cards,
            vec![
                FlashCard::new(1, "What is DNA?", "Genetic material"),
                FlashCard::new(2, "What is RNA?", "A messenger"),
            ]
        );
    }

    #[test]
    fn answer_without_question_is_ignored() {
        let text = "A: orphan\nQ: first?\nnoise\nA: yes\nA: extra";
        let cards = parse_flash_cards(text, english()).cards;
        assert_eq!(cards, vec![FlashCard::new(1, "first?", "yes")]);
    }

    #[test]
    fn later_question_replaces_pending_one() {
        let text = "Q: dropped\nQ: kept\nA: answer";
        let cards = parse_flash_cards(text, english()).cards;
        assert_eq!(fronts(&cards), vec!["kept"]);
    }

    #[test]
    fn markers_tolerate_markdown_and_case() {
        let text = "**Q:** Bold question\n**a :** bold answer\n- q：full width\n> A: quoted";
        let cards = parse_flash_cards(text, english()).cards;
        assert_eq!(
            cards,
            vec![
                FlashCard::new(1, "Bold question", "bold answer"),
                FlashCard::new(2, "full width", "quoted"),
            ]
        );
    }

    #[test]
    fn language_markers_are_used() {
        let text = "K: Mis on rakk?\nV: Elu ühik";
        let prefixes = Prefixes::for_language(Language::Estonian);
        let cards = parse_flash_cards(text, prefixes).cards;
        assert_eq!(cards, vec![FlashCard::new(1, "Mis on rakk?", "Elu ühik")]);

        let russian = "В: Что такое клетка?\nО: Единица жизни";
        let cards = parse_flash_cards(russian, Prefixes::for_language(Language::Russian)).cards;
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn word_starting_with_marker_letter_is_not_a_marker() {
        let text = "Question one\nAnswer one";
        assert!(!CardStrategy::Prefixed.applies(text, english()));
    }

    #[test]
    fn whole_json_array_maps_fields() {
        let text = r#"[{"front":"F1","back":"B1"},{"question":"Q2","answer":"A2"},{"front":""}]"#;
        let parsed = parse_flash_cards(text, english());
        assert_eq!(parsed.strategy, CardStrategy::WholeJson);
        assert_eq!(
            parsed.cards,
            vec![
                FlashCard::new(1, "F1", "B1"),
                FlashCard::new(2, "Q2", "A2"),
                FlashCard::new(3, MISSING_QUESTION, MISSING_ANSWER),
            ]
        );
    }

    #[test]
    fn whole_json_non_array_yields_nothing() {
        let parsed = parse_flash_cards(r#"{"cards": 3}"#, english());
        assert_eq!(parsed.strategy, CardStrategy::WholeJson);
        assert!(parsed.cards.is_empty());
    }

    #[test]
    fn bracketed_array_inside_prose() {
        let text = "Here you go:\n```json\n[{\"front\":\"a\",\"back\":\"b\"}]\n```\nEnjoy";
        let parsed = parse_flash_cards(text, english());
        assert_eq!(parsed.strategy, CardStrategy::BracketedArray);
        assert_eq!(parsed.cards, vec![FlashCard::new(1, "a", "b")]);
    }

    #[test]
    fn inline_objects_when_lazy_match_is_not_json() {
        // The first bracketed span is not valid JSON.
        let text = r#"x [{"a": {"b": 1}} }] then [{"front":"f"}, {"back":"b"}]"#;
        assert!(!CardStrategy::BracketedArray.applies(text, english()));
        let parsed = parse_flash_cards(text, english());
        assert_eq!(parsed.strategy, CardStrategy::InlineObjects);
        assert_eq!(
            parsed.cards,
            vec![
                FlashCard::new(1, "f", MISSING_ANSWER),
                FlashCard::new(2, MISSING_QUESTION, "b"),
            ]
        );
    }

    #[test]
    fn question_lines_pair_with_next_line() {
        let text = "Intro\nWhat is a cell?\nThe unit of life\n\n\nWhy study it?";
        let parsed = parse_flash_cards(text, english());
        assert_eq!(parsed.strategy, CardStrategy::QuestionLines);
        assert_eq!(
            parsed.cards,
            vec![
                FlashCard::new(1, "What is a cell?", "The unit of life"),
                FlashCard::new(2, "Why study it?", NO_ANSWER),
            ]
        );
    }

    #[test]
    fn placeholder_is_last_resort() {
        let parsed = parse_flash_cards("nothing useful here", english());
        assert_eq!(parsed.strategy, CardStrategy::Placeholder);
        assert_eq!(parsed.cards.len(), 2);
        assert_eq!(parsed.cards[1].front, "How to get better flash cards?");
    }

    #[test]
    fn placeholder_always_applies() {
        assert!(CardStrategy::Placeholder.applies("", english()));
        assert!(CardStrategy::QuestionLines.extract("no question", english()).is_empty());
    }
}
