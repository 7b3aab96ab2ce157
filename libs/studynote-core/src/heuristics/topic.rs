//! Keyword scoring topic guess.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Subject area of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    #[serde(rename = "Computer Science")]
    ComputerScience,
    History,
    Literature,
    Philosophy,
    Psychology,
    Economics,
    Art,
    Music,
    General,
}

impl Default for Topic {
    fn default() -> Self {
        Self::General
    }
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mathematics => "Mathematics",
            Self::Physics => "Physics",
            Self::Chemistry => "Chemistry",
            Self::Biology => "Biology",
            Self::ComputerScience => "Computer Science",
            Self::History => "History",
            Self::Literature => "Literature",
            Self::Philosophy => "Philosophy",
            Self::Psychology => "Psychology",
            Self::Economics => "Economics",
            Self::Art => "Art",
            Self::Music => "Music",
            Self::General => "General",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum keyword hits before a topic is reported instead of `General`.
const MIN_SCORE: usize = 2;

const KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Mathematics,
        &[
            "math", "equation", "calculus", "algebra", "geometry", "theorem", "formula", "number",
            "function", "variable",
        ],
    ),
    (
        Topic::Physics,
        &[
            "physics", "force", "energy", "motion", "gravity", "quantum", "relativity", "particle",
            "wave", "velocity",
        ],
    ),
    (
        Topic::Chemistry,
        &[
            "chemistry", "element", "compound", "reaction", "molecule", "atom", "bond", "acid",
            "base", "solution",
        ],
    ),
    (
        Topic::Biology,
        &[
            "biology", "cell", "organism", "gene", "protein", "evolution", "species", "ecosystem",
            "tissue", "dna",
        ],
    ),
    (
        Topic::ComputerScience,
        &[
            "algorithm", "programming", "code", "software", "database", "network", "computer",
            "data structure", "function", "variable",
        ],
    ),
    (
        Topic::History,
        &[
            "history", "century", "war", "revolution", "empire", "civilization", "king", "queen",
            "president", "ancient",
        ],
    ),
    (
        Topic::Literature,
        &[
            "literature", "novel", "poem", "author", "character", "plot", "theme", "metaphor",
            "narrative", "fiction",
        ],
    ),
    (
        Topic::Philosophy,
        &[
            "philosophy", "ethics", "logic", "metaphysics", "epistemology", "existence",
            "consciousness", "morality", "knowledge", "reality",
        ],
    ),
    (
        Topic::Psychology,
        &[
            "psychology", "behavior", "cognition", "emotion", "perception", "memory",
            "personality", "disorder", "therapy", "mental",
        ],
    ),
    (
        Topic::Economics,
        &[
            "economics", "market", "supply", "demand", "inflation", "gdp", "economy", "price",
            "cost", "investment",
        ],
    ),
    (
        Topic::Art,
        &[
            "art", "painting", "sculpture", "artist", "canvas", "color", "composition", "gallery",
            "museum", "aesthetic",
        ],
    ),
    (
        Topic::Music,
        &[
            "music", "rhythm", "melody", "harmony", "note", "chord", "scale", "composer",
            "instrument", "song",
        ],
    ),
];

fn matchers() -> &'static [(Topic, Vec<Regex>)] {
    static MATCHERS: OnceLock<Vec<(Topic, Vec<Regex>)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        KEYWORDS
            .iter()
            .map(|(topic, words)| {
                let patterns = words
                    .iter()
                    .filter_map(|word| {
                        let word = regex::escape(word);
                        Regex::new(&format!(r"(?i)(?-u:\b){word}(?-u:\b)")).ok()
                    })
                    .collect();
                (*topic, patterns)
            })
            .collect()
    })
}

/// Guess the subject of `text` by counting whole-word keyword hits.
///
/// Word boundaries are ASCII-only: an accented letter next to a keyword
/// ends the word, so "artículo" counts as a hit for "art".
///
/// Ties go to the topic listed first. Fewer than two hits for the best
/// topic yields [`Topic::General`].
pub fn detect_topic(text: &str) -> Topic {
    let mut best = Topic::General;
    let mut best_score = 0;

    for (topic, patterns) in matchers() {
        let score: usize = patterns.iter().map(|re| re.find_iter(text).count()).sum();
        if score > best_score {
            best = *topic;
            best_score = score;
        }
    }

    if best_score >= MIN_SCORE {
        best
    } else {
        Topic::General
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biology_sentence() {
        let text = "The mitochondria is the powerhouse of the cell, and DNA carries genes";
        assert_eq!(detect_topic(text), Topic::Biology);
    }

    #[test]
    fn single_hit_is_general() {
        assert_eq!(detect_topic("A short poem"), Topic::General);
        assert_eq!(detect_topic(""), Topic::General);
    }

    #[test]
    fn matches_whole_words_only() {
        // "cellar" and "genes" are not keywords.
        assert_eq!(detect_topic("cellar cellar genes genes"), Topic::General);
    }

    #[test]
    fn accented_letters_end_a_keyword() {
        assert_eq!(detect_topic("artículo artístico"), Topic::Art);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(detect_topic("QUANTUM Gravity"), Topic::Physics);
    }

    #[test]
    fn tie_goes_to_first_listed_topic() {
        // Shared keywords score equally for Mathematics and Computer Science.
        assert_eq!(detect_topic("function variable"), Topic::Mathematics);
    }

    #[test]
    fn multi_word_keyword_counts() {
        let text = "A data structure and an algorithm";
        assert_eq!(detect_topic(text), Topic::ComputerScience);
    }

    #[test]
    fn repeated_keyword_counts_each_time() {
        assert_eq!(detect_topic("war and war"), Topic::History);
    }

    #[test]
    fn label_for_computer_science_has_space() {
        assert_eq!(Topic::ComputerScience.to_string(), "Computer Science");
        assert_eq!(
            serde_json::to_string(&Topic::ComputerScience).unwrap(),
            "\"Computer Science\""
        );
    }
}
