//! Rich-text document model backing notes.
//!
//! A document is a non-empty sequence of top-level [`Block`]s. Paragraphs,
//! headings and list items own [`TextRun`] leaves; lists own list items and
//! nothing else. The storage form lives in [`crate::codec`].

use serde::{Deserialize, Deserializer, Serialize};

/// Highlight colors offered by the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    Yellow,
    Red,
    Purple,
    Green,
}

/// Independent boolean marks on a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

/// A contiguous span of text sharing one set of marks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_bool")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_bool")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_bool")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false", deserialize_with = "lenient_bool")]
    pub strikethrough: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_highlight"
    )]
    pub highlight: Option<HighlightColor>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Anything but `true` (null, numbers, strings) reads as an unset mark.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(matches!(value, Some(serde_json::Value::Bool(true))))
}

/// Unknown highlight colors are dropped rather than rejecting the document.
fn lenient_highlight<'de, D>(deserializer: D) -> Result<Option<HighlightColor>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl TextRun {
    /// Unmarked run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.set_mark(mark, true);
        self
    }

    pub fn with_highlight(mut self, color: HighlightColor) -> Self {
        self.highlight = Some(color);
        self
    }

    pub fn has_mark(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Underline => self.underline,
            Mark::Strikethrough => self.strikethrough,
        }
    }

    pub fn set_mark(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Underline => self.underline = on,
            Mark::Strikethrough => self.strikethrough = on,
        }
    }

    /// True when both runs carry exactly the same marks and highlight.
    pub fn same_marks(&self, other: &TextRun) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.highlight == other.highlight
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    One,
    Two,
    Three,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

/// A single entry of a bulleted or numbered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub runs: Vec<TextRun>,
}

impl ListItem {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }
}

/// Top-level block node.
///
/// List items only ever appear inside [`Block::List`], so a stray item at
/// the top level cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<TextRun>),
    Heading(HeadingLevel, Vec<TextRun>),
    List(ListKind, Vec<ListItem>),
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph(vec![TextRun::plain(text)])
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading(level, vec![TextRun::plain(text)])
    }

    pub fn list<I, S>(kind: ListKind, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(
            kind,
            items
                .into_iter()
                .map(|text| ListItem::new(vec![TextRun::plain(text)]))
                .collect(),
        )
    }

    /// Runs of every text-bearing node in this block, in order.
    pub fn text_nodes(&self) -> Vec<&[TextRun]> {
        match self {
            Self::Paragraph(runs) | Self::Heading(_, runs) => vec![runs.as_slice()],
            Self::List(_, items) => items.iter().map(|item| item.runs.as_slice()).collect(),
        }
    }
}

/// An ordered, never-empty sequence of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// The canonical empty document: one paragraph holding one empty run.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::Paragraph(vec![TextRun::default()])],
        }
    }

    /// Build a document, substituting the empty document for no blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            Self::empty()
        } else {
            Self { blocks }
        }
    }

    /// Single paragraph with one unmarked run.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![Block::paragraph(text)],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Every text-bearing node (paragraph, heading, list item) in order.
    pub fn text_nodes(&self) -> impl Iterator<Item = &[TextRun]> + '_ {
        self.blocks.iter().flat_map(Block::text_nodes)
    }
}
