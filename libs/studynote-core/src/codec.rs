//! Storage codec for documents.
//!
//! # Format
//! ```json
//! [
//!   {"type": "heading-one", "children": [{"text": "Cells"}]},
//!   {"type": "bulleted-list", "children": [
//!     {"type": "list-item", "children": [{"text": "nucleus", "bold": true}]}
//!   ]},
//!   {"type": "paragraph", "children": [{"text": "see ", "highlight": "yellow"}]}
//! ]
//! ```
//!
//! Decoding is total: anything that is not a non-empty array of recognised
//! block nodes is kept as the literal text of a single paragraph.

use crate::document::{Block, Document, HeadingLevel, ListItem, ListKind, TextRun};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum WireNode {
    Paragraph { children: Vec<TextRun> },
    HeadingOne { children: Vec<TextRun> },
    HeadingTwo { children: Vec<TextRun> },
    HeadingThree { children: Vec<TextRun> },
    BulletedList { children: Vec<WireNode> },
    NumberedList { children: Vec<WireNode> },
    ListItem { children: Vec<TextRun> },
}

impl WireNode {
    /// Convert a top-level node. A stray top-level list item becomes a
    /// paragraph; a list holding anything but list items is rejected.
    fn into_block(self) -> Option<Block> {
        match self {
            Self::Paragraph { children } | Self::ListItem { children } => {
                Some(Block::Paragraph(children))
            }
            Self::HeadingOne { children } => Some(Block::Heading(HeadingLevel::One, children)),
            Self::HeadingTwo { children } => Some(Block::Heading(HeadingLevel::Two, children)),
            Self::HeadingThree { children } => {
                Some(Block::Heading(HeadingLevel::Three, children))
            }
            Self::BulletedList { children } => list(ListKind::Bulleted, children),
            Self::NumberedList { children } => list(ListKind::Numbered, children),
        }
    }

    fn from_block(block: &Block) -> Self {
        match block {
            Block::Paragraph(runs) => Self::Paragraph {
                children: runs.clone(),
            },
            Block::Heading(HeadingLevel::One, runs) => Self::HeadingOne {
                children: runs.clone(),
            },
            Block::Heading(HeadingLevel::Two, runs) => Self::HeadingTwo {
                children: runs.clone(),
            },
            Block::Heading(HeadingLevel::Three, runs) => Self::HeadingThree {
                children: runs.clone(),
            },
            Block::List(kind, items) => {
                let children = items
                    .iter()
                    .map(|item| Self::ListItem {
                        children: item.runs.clone(),
                    })
                    .collect();
                match kind {
                    ListKind::Bulleted => Self::BulletedList { children },
                    ListKind::Numbered => Self::NumberedList { children },
                }
            }
        }
    }
}

fn list(kind: ListKind, children: Vec<WireNode>) -> Option<Block> {
    let items = children
        .into_iter()
        .map(|child| match child {
            WireNode::ListItem { children } => Some(ListItem::new(children)),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Block::List(kind, items))
}

/// Decode stored content into a document. Never fails.
///
/// `None` and the empty string yield [`Document::empty`].
pub fn decode(raw: Option<&str>) -> Document {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Document::empty(),
    };

    let blocks = serde_json::from_str::<Vec<WireNode>>(raw)
        .ok()
        .filter(|nodes| !nodes.is_empty())
        .and_then(|nodes| {
            nodes
                .into_iter()
                .map(WireNode::into_block)
                .collect::<Option<Vec<_>>>()
        });

    match blocks {
        Some(blocks) => Document::new(blocks),
        None => Document::from_text(raw),
    }
}

/// Shorthand for [`decode`] on a present string.
pub fn decode_str(raw: &str) -> Document {
    decode(Some(raw))
}

/// Encode a document into its storage form.
pub fn encode(doc: &Document) -> String {
    let nodes: Vec<WireNode> = doc.blocks().iter().map(WireNode::from_block).collect();
    // Plain structs with string keys always serialise.
    serde_json::to_string(&nodes).unwrap_or_default()
}
