//! Script and diacritic based language guess.
//!
//! Non-Latin scripts are checked first, in a fixed order, and the first hit
//! wins. Japanese is tested before Chinese over a range that includes the
//! CJK ideographs, so Han-only text reports Japanese. Latin text is then
//! classified by accented letters; a language whose only evidence is a
//! letter it shares with a later candidate gives way when that later
//! candidate has a letter of its own (`é` alone reads as Spanish, `é` with
//! `à` reads as French).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Japanese,
    Korean,
    Chinese,
    Russian,
    Arabic,
    Hebrew,
    Hindi,
    Estonian,
    Spanish,
    French,
    German,
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::Chinese => "Chinese",
            Self::Russian => "Russian",
            Self::Arabic => "Arabic",
            Self::Hebrew => "Hebrew",
            Self::Hindi => "Hindi",
            Self::Estonian => "Estonian",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SCRIPTS: &[(Language, &[RangeInclusive<char>])] = &[
    (
        Language::Japanese,
        &[
            '\u{3040}'..='\u{30ff}',
            '\u{3400}'..='\u{4dbf}',
            '\u{4e00}'..='\u{9fff}',
            '\u{f900}'..='\u{faff}',
            '\u{ff66}'..='\u{ff9f}',
        ],
    ),
    (Language::Korean, &['\u{ac00}'..='\u{d7af}', '\u{1100}'..='\u{11ff}']),
    (Language::Chinese, &['\u{4e00}'..='\u{9fff}']),
    (Language::Russian, &['\u{0400}'..='\u{04ff}']),
    (Language::Arabic, &['\u{0600}'..='\u{06ff}']),
    (Language::Hebrew, &['\u{0590}'..='\u{05ff}']),
    (Language::Hindi, &['\u{0900}'..='\u{097f}']),
];

const LATIN: &[(Language, &str)] = &[
    (Language::Estonian, "äöüõ"),
    (Language::Spanish, "áéíóúüñ¿¡"),
    (Language::French, "àâçéèêëîïôùûüÿœæ"),
    (Language::German, "äöüß"),
];

/// Guess the language of `text`. Defaults to English.
pub fn detect_language(text: &str) -> Language {
    for (language, ranges) in SCRIPTS {
        if text.chars().any(|c| ranges.iter().any(|r| r.contains(&c))) {
            return *language;
        }
    }
    detect_latin(text).unwrap_or_default()
}

fn detect_latin(text: &str) -> Option<Language> {
    let present: HashSet<char> = text.chars().flat_map(char::to_lowercase).collect();

    let candidates: Vec<usize> = (0..LATIN.len())
        .filter(|&i| LATIN[i].1.chars().any(|c| present.contains(&c)))
        .collect();

    let has_own_letter = |i: usize| {
        LATIN[i].1.chars().any(|c| {
            present.contains(&c)
                && LATIN
                    .iter()
                    .enumerate()
                    .all(|(j, (_, letters))| j == i || !letters.contains(c))
        })
    };

    for (pos, &i) in candidates.iter().enumerate() {
        let later_has_own = candidates[pos + 1..].iter().any(|&j| has_own_letter(j));
        if has_own_letter(i) || !later_has_own {
            return Some(LATIN[i].0);
        }
    }
    None
}
