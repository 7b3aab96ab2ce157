//! Multiple-choice question extraction from generated text.
//!
//! # Format
//! ```text
//! Q: What is 2+2?
//! A: 3
//! B: 4
//! C: 5
//! D: 6
//! Correct: B
//! ```
//!
//! Blocks are separated by blank lines. A block that does not yield a
//! question, four options and a correct letter is skipped.

use crate::types::TestQuestion;
use regex::Regex;
use std::sync::OnceLock;

const LETTERS: &str = "ABCD";
const CORRECT_MARKER: &str = "Correct:";
/// Question line, four option lines, correct line.
const MIN_BLOCK_LINES: usize = 6;

/// Parse every well-formed question block, numbering them from 1.
pub fn parse_test_questions(text: &str) -> Vec<TestQuestion> {
    let mut questions = Vec::new();
    for block in split_blocks(text) {
        if let Some((question, options, correct_answer)) = parse_block(block) {
            questions.push(TestQuestion {
                id: questions.len() as u32 + 1,
                question,
                options,
                correct_answer,
            });
        }
    }
    questions
}

fn split_blocks(text: &str) -> Vec<&str> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    match RE.get_or_init(|| Regex::new(r"\n\s*\n").ok()) {
        Some(re) => re.split(text).collect(),
        None => vec![text],
    }
}

fn parse_block(block: &str) -> Option<(String, Vec<String>, usize)> {
    let lines: Vec<&str> = block
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < MIN_BLOCK_LINES {
        return None;
    }

    let question = strip_label(lines[0], "Q:")?;

    let declared = lines
        .iter()
        .find(|line| line.starts_with(CORRECT_MARKER))
        .and_then(|line| correct_letter(line));

    let mut options = Vec::new();
    let mut correct = None;
    for (idx, line) in lines.iter().enumerate().take(5).skip(1) {
        let Some((letter, text)) = parse_option(line) else {
            continue;
        };
        options.push(text.to_string());
        if declared == Some(letter) {
            correct = Some(idx - 1);
        }
    }

    if correct.is_none() {
        correct = lines
            .iter()
            .filter(|line| line.contains(CORRECT_MARKER))
            .filter_map(|line| correct_letter(line))
            .filter_map(|letter| LETTERS.find(letter))
            .last();
    }

    if options.len() != 4 {
        return None;
    }
    Some((question.to_string(), options, correct?))
}

/// Non-empty text after `label`.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(label)?.trim_start();
    (!rest.is_empty()).then_some(rest)
}

/// `B: text` gives `('B', "text")`.
fn parse_option(line: &str) -> Option<(char, &str)> {
    let letter = line.chars().next().filter(|c| LETTERS.contains(*c))?;
    let text = strip_label(&line[letter.len_utf8()..], ":")?;
    Some((letter, text))
}

/// Letter following the first `Correct:` marker that has one.
fn correct_letter(line: &str) -> Option<char> {
    line.match_indices(CORRECT_MARKER).find_map(|(idx, marker)| {
        line[idx + marker.len()..]
            .trim_start()
            .chars()
            .next()
            .filter(|c| LETTERS.contains(*c))
    })
}
