//! Plain-text previews of note content for list views.

use crate::codec::decode_str;

/// Default preview length in characters.
pub const DEFAULT_SNIPPET_LEN: usize = 100;

const ELLIPSIS: &str = "...";

/// Build a preview of stored note content.
///
/// Run texts are joined with single spaces in document order, and collection
/// stops once the joined text exceeds `max_len`. Longer text is cut to
/// `max_len` characters followed by `...`. Content that is not a stored
/// document is previewed as raw text.
pub fn snippet(content: &str, max_len: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let doc = decode_str(content);
    let mut parts: Vec<&str> = Vec::new();
    let mut joined_len = 0;

    for block in doc.blocks() {
        for runs in block.text_nodes() {
            for run in runs {
                if !parts.is_empty() {
                    joined_len += 1;
                }
                joined_len += run.len();
                parts.push(&run.text);
            }
        }
        if joined_len > max_len {
            break;
        }
    }

    truncate(&parts.join(" "), max_len)
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let mut cut: String = text.chars().take(max_len).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::document::{Block, Document, ListKind, TextRun};

    #[test]
    fn empty_content_gives_empty_snippet() {
        assert_eq!(snippet("", DEFAULT_SNIPPET_LEN), "");
    }

    #[test]
    fn short_text_is_returned_untouched() {
        let content = encode(&Document::from_text("Short note"));
        assert_eq!(snippet(&content, DEFAULT_SNIPPET_LEN), "Short note");
    }

    #[test]
    fn runs_and_blocks_are_joined_with_spaces() {
        let doc = Document::new(vec![
            Block::Paragraph(vec![TextRun::plain("one"), TextRun::plain("two")]),
            Block::list(ListKind::Bulleted, ["three"]),
        ]);
        assert_eq!(snippet(&encode(&doc), DEFAULT_SNIPPET_LEN), "one two three");
    }

    #[test]
    fn long_text_is_cut_with_ellipsis() {
        let long = "a".repeat(150);
        let content = encode(&Document::from_text(long));
        let out = snippet(&content, 100);
        assert_eq!(out.chars().count(), 103);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn exactly_max_len_has_no_ellipsis() {
        let text = "b".repeat(10);
        assert_eq!(snippet(&text, 10), text);
    }

    #[test]
    fn raw_text_falls_back_to_truncation() {
        let raw = "not a document but a long plain string";
        assert_eq!(snippet(raw, 10), "not a docu...");
    }

    #[test]
    fn never_longer_than_max_plus_ellipsis() {
        let doc = Document::new(
            (0..50)
                .map(|i| Block::paragraph(format!("paragraph number {i}")))
                .collect(),
        );
        let content = encode(&doc);
        for max_len in [0, 1, 5, 37, 100] {
            assert!(snippet(&content, max_len).chars().count() <= max_len + 3);
        }
    }

    #[test]
    fn null_marks_still_preview_text() {
        let raw = r#"[{"type":"paragraph","children":[{"text":"Cells","italic":null},{"text":"divide"}]}]"#;
        assert_eq!(snippet(raw, DEFAULT_SNIPPET_LEN), "Cells divide");
    }

    #[test]
    fn multibyte_text_is_cut_on_characters() {
        assert_eq!(snippet("ääääää", 3), "äää...");
    }
}
