//! Toolbar formatting over a selection.
//!
//! Every operation is a pure function from `(Document, Selection, format)`
//! to a new [`Document`]; nothing is mutated in place.
//!
//! Marks are independent of each other and combine freely. Block formats
//! are mutually exclusive: a text node is a paragraph, a heading or a list
//! item, never two at once.

use crate::document::{
    Block, Document, HeadingLevel, HighlightColor, ListItem, ListKind, Mark, TextRun,
};
use crate::error::{CoreError, Result};

/// A character position inside one text node.
///
/// `block` indexes the top-level blocks; `item` is set only when the block
/// is a list and selects the list item; `offset` counts characters across
/// all runs of the node, so it stays valid when runs are split or merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub block: usize,
    pub item: Option<usize>,
    pub offset: usize,
}

impl Point {
    pub fn new(block: usize, offset: usize) -> Self {
        Self {
            block,
            item: None,
            offset,
        }
    }

    pub fn in_item(block: usize, item: usize, offset: usize) -> Self {
        Self {
            block,
            item: Some(item),
            offset,
        }
    }

    fn node(&self) -> NodeAddr {
        NodeAddr {
            block: self.block,
            item: self.item,
        }
    }
}

/// Anchor/focus pair. Backwards selections are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self::new(point, point)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// (start, end) in document order.
    pub fn edges(&self) -> (Point, Point) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }
}

/// Mark buttons on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Highlight(HighlightColor),
}

impl MarkFormat {
    fn is_on(self, run: &TextRun) -> bool {
        match self {
            Self::Bold => run.has_mark(Mark::Bold),
            Self::Italic => run.has_mark(Mark::Italic),
            Self::Underline => run.has_mark(Mark::Underline),
            Self::Strikethrough => run.has_mark(Mark::Strikethrough),
            Self::Highlight(color) => run.highlight == Some(color),
        }
    }

    fn apply(self, run: &mut TextRun, on: bool) {
        match self {
            Self::Bold => run.set_mark(Mark::Bold, on),
            Self::Italic => run.set_mark(Mark::Italic, on),
            Self::Underline => run.set_mark(Mark::Underline, on),
            Self::Strikethrough => run.set_mark(Mark::Strikethrough, on),
            // Setting a color replaces whichever color was there.
            Self::Highlight(color) => run.highlight = on.then_some(color),
        }
    }
}

/// Block buttons on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFormat {
    HeadingOne,
    HeadingTwo,
    HeadingThree,
    BulletedList,
    NumberedList,
}

impl BlockFormat {
    fn list_kind(self) -> Option<ListKind> {
        match self {
            Self::BulletedList => Some(ListKind::Bulleted),
            Self::NumberedList => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn heading_level(self) -> Option<HeadingLevel> {
        match self {
            Self::HeadingOne => Some(HeadingLevel::One),
            Self::HeadingTwo => Some(HeadingLevel::Two),
            Self::HeadingThree => Some(HeadingLevel::Three),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct NodeAddr {
    block: usize,
    item: Option<usize>,
}

/// Addresses of every text node, in document order.
fn node_addrs(doc: &Document) -> Vec<NodeAddr> {
    let mut addrs = Vec::new();
    for (block, node) in doc.blocks().iter().enumerate() {
        match node {
            Block::Paragraph(_) | Block::Heading(..) => addrs.push(NodeAddr { block, item: None }),
            Block::List(_, items) => addrs.extend((0..items.len()).map(|item| NodeAddr {
                block,
                item: Some(item),
            })),
        }
    }
    addrs
}

fn runs_at(blocks: &[Block], addr: NodeAddr) -> Option<&Vec<TextRun>> {
    match (blocks.get(addr.block)?, addr.item) {
        (Block::Paragraph(runs) | Block::Heading(_, runs), None) => Some(runs),
        (Block::List(_, items), Some(item)) => items.get(item).map(|i| &i.runs),
        _ => None,
    }
}

fn runs_at_mut(blocks: &mut [Block], addr: NodeAddr) -> Option<&mut Vec<TextRun>> {
    match (blocks.get_mut(addr.block)?, addr.item) {
        (Block::Paragraph(runs) | Block::Heading(_, runs), None) => Some(runs),
        (Block::List(_, items), Some(item)) => items.get_mut(item).map(|i| &mut i.runs),
        _ => None,
    }
}

fn node_len(runs: &[TextRun]) -> usize {
    runs.iter().map(TextRun::len).sum()
}

fn check_point(doc: &Document, point: Point) -> Result<()> {
    let runs = runs_at(doc.blocks(), point.node()).ok_or(CoreError::InvalidSelection {
        block: point.block,
        item: point.item,
    })?;
    if point.offset > node_len(runs) {
        return Err(CoreError::InvalidOffset {
            block: point.block,
            item: point.item,
            offset: point.offset,
        });
    }
    Ok(())
}

/// Validate the selection and return the selected node addresses with the
/// character range selected in each.
fn selected_spans(doc: &Document, selection: &Selection) -> Result<Vec<(NodeAddr, usize, usize)>> {
    check_point(doc, selection.anchor)?;
    check_point(doc, selection.focus)?;
    let (start, end) = selection.edges();

    let spans = node_addrs(doc)
        .into_iter()
        .filter(|addr| *addr >= start.node() && *addr <= end.node())
        .filter_map(|addr| {
            let len = node_len(runs_at(doc.blocks(), addr)?);
            let lo = if addr == start.node() { start.offset } else { 0 };
            let hi = if addr == end.node() { end.offset } else { len };
            Some((addr, lo, hi))
        })
        .collect();
    Ok(spans)
}

fn char_slice(text: &str, from: usize, to: usize) -> String {
    text.chars().skip(from).take(to.saturating_sub(from)).collect()
}

/// Split runs so that `[lo, hi)` falls on run boundaries. Returns the new
/// runs with a flag telling whether each lies inside the range.
fn split_runs(runs: &[TextRun], lo: usize, hi: usize) -> Vec<(TextRun, bool)> {
    let mut out = Vec::with_capacity(runs.len() + 2);
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        if len == 0 {
            out.push((run.clone(), false));
            continue;
        }
        let cut_lo = lo.clamp(pos, pos + len) - pos;
        let cut_hi = hi.clamp(pos, pos + len) - pos;
        let pieces = [(0, cut_lo, false), (cut_lo, cut_hi, true), (cut_hi, len, false)];
        for (from, to, inside) in pieces {
            if from < to {
                let piece = TextRun {
                    text: char_slice(&run.text, from, to),
                    ..run.clone()
                };
                out.push((piece, inside));
            }
        }
        pos += len;
    }
    out
}

/// Merge neighbours with identical marks and drop empty runs, keeping at
/// least one run in the node.
fn normalize_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut out: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs.into_iter().filter(|r| !r.is_empty()) {
        match out.last_mut() {
            Some(prev) if prev.same_marks(&run) => prev.text.push_str(&run.text),
            _ => out.push(run),
        }
    }
    if out.is_empty() {
        out.push(TextRun::default());
    }
    out
}

/// Runs carrying at least one selected character.
fn touched_runs<'a>(doc: &'a Document, spans: &[(NodeAddr, usize, usize)]) -> Vec<&'a TextRun> {
    let mut touched = Vec::new();
    for &(addr, lo, hi) in spans {
        let Some(runs) = runs_at(doc.blocks(), addr) else {
            continue;
        };
        let mut pos = 0;
        for run in runs {
            let len = run.len();
            if len > 0 && pos < hi && pos + len > lo {
                touched.push(run);
            }
            pos += len;
        }
    }
    touched
}

/// Run under a collapsed cursor: the one ending at or spanning the offset,
/// or the first run at offset zero.
fn run_at_cursor(doc: &Document, point: Point) -> Option<&TextRun> {
    let runs = runs_at(doc.blocks(), point.node())?;
    let mut pos = 0;
    for run in runs {
        let len = run.len();
        if point.offset == 0 || (point.offset > pos && point.offset <= pos + len) {
            return Some(run);
        }
        pos += len;
    }
    runs.first()
}

/// Whether the mark is active for the selection.
///
/// For an expanded selection every touched run must carry it; for a
/// collapsed one the run under the cursor decides.
pub fn is_mark_active(doc: &Document, selection: &Selection, format: MarkFormat) -> Result<bool> {
    let spans = selected_spans(doc, selection)?;
    if selection.is_collapsed() {
        return Ok(run_at_cursor(doc, selection.anchor).is_some_and(|run| format.is_on(run)));
    }
    let touched = touched_runs(doc, &spans);
    Ok(!touched.is_empty() && touched.iter().all(|run| format.is_on(run)))
}

/// Toggle a mark over the selection.
///
/// If every touched run already carries the mark it is removed from all of
/// them, otherwise it is added to all of them. A collapsed selection leaves
/// the document unchanged.
pub fn toggle_mark(doc: &Document, selection: &Selection, format: MarkFormat) -> Result<Document> {
    let spans = selected_spans(doc, selection)?;
    if selection.is_collapsed() {
        return Ok(doc.clone());
    }

    let touched = touched_runs(doc, &spans);
    if touched.is_empty() {
        return Ok(doc.clone());
    }
    let turn_on = !touched.iter().all(|run| format.is_on(run));

    let mut blocks = doc.clone().into_blocks();
    for (addr, lo, hi) in spans {
        let Some(runs) = runs_at_mut(&mut blocks, addr) else {
            continue;
        };
        let pieces = split_runs(runs, lo, hi)
            .into_iter()
            .map(|(mut run, inside)| {
                if inside {
                    format.apply(&mut run, turn_on);
                }
                run
            })
            .collect();
        *runs = normalize_runs(pieces);
    }
    Ok(Document::new(blocks))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Paragraph,
    Heading(HeadingLevel),
    Item,
}

/// Which list a flattened line belongs to while rebuilding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Existing { block: usize, kind: ListKind },
    Wrapped(ListKind),
}

impl Container {
    fn kind(self) -> ListKind {
        match self {
            Self::Existing { kind, .. } | Self::Wrapped(kind) => kind,
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    addr: NodeAddr,
    kind: LineKind,
    runs: Vec<TextRun>,
    container: Option<Container>,
}

fn flatten(doc: &Document) -> Vec<Line> {
    let mut lines = Vec::new();
    for (block, node) in doc.blocks().iter().enumerate() {
        let addr = NodeAddr { block, item: None };
        match node {
            Block::Paragraph(runs) => lines.push(Line {
                addr,
                kind: LineKind::Paragraph,
                runs: runs.clone(),
                container: None,
            }),
            Block::Heading(level, runs) => lines.push(Line {
                addr,
                kind: LineKind::Heading(*level),
                runs: runs.clone(),
                container: None,
            }),
            Block::List(kind, items) => {
                for (item, entry) in items.iter().enumerate() {
                    lines.push(Line {
                        addr: NodeAddr {
                            block,
                            item: Some(item),
                        },
                        kind: LineKind::Item,
                        runs: entry.runs.clone(),
                        container: Some(Container::Existing { block, kind: *kind }),
                    });
                }
            }
        }
    }
    lines
}

/// Regroup consecutive lines sharing a container into list blocks.
fn rebuild(lines: Vec<Line>) -> Document {
    let mut blocks = Vec::new();
    let mut open: Option<(Container, Vec<ListItem>)> = None;

    for line in lines {
        match line.container {
            Some(container) => match open.as_mut() {
                Some((current, items)) if *current == container => {
                    items.push(ListItem::new(line.runs));
                }
                _ => {
                    if let Some((done, items)) = open.take() {
                        blocks.push(Block::List(done.kind(), items));
                    }
                    open = Some((container, vec![ListItem::new(line.runs)]));
                }
            },
            None => {
                if let Some((done, items)) = open.take() {
                    blocks.push(Block::List(done.kind(), items));
                }
                blocks.push(match line.kind {
                    LineKind::Heading(level) => Block::Heading(level, line.runs),
                    LineKind::Paragraph | LineKind::Item => Block::Paragraph(line.runs),
                });
            }
        }
    }
    if let Some((done, items)) = open.take() {
        blocks.push(Block::List(done.kind(), items));
    }
    Document::new(blocks)
}

fn line_matches(line: &Line, format: BlockFormat) -> bool {
    match (format.heading_level(), format.list_kind()) {
        (Some(level), _) => line.kind == LineKind::Heading(level),
        (_, Some(kind)) => line.container.is_some_and(|c| c.kind() == kind),
        _ => false,
    }
}

fn is_selected(line: &Line, start: Point, end: Point) -> bool {
    line.addr >= start.node() && line.addr <= end.node()
}

/// Whether any selected node (or its enclosing list) has the format.
pub fn is_block_active(doc: &Document, selection: &Selection, format: BlockFormat) -> Result<bool> {
    selected_spans(doc, selection)?;
    let (start, end) = selection.edges();
    Ok(flatten(doc)
        .iter()
        .filter(|line| is_selected(line, start, end))
        .any(|line| line_matches(line, format)))
}

/// Toggle a block format over the selection.
///
/// Runs in three steps: selected list items are lifted out of their lists
/// (the untouched items before and after stay behind as separate lists),
/// then every selected node gets its new type (paragraph when the format was
/// already active), then for list formats the selected nodes are wrapped in
/// one new list.
pub fn toggle_block(
    doc: &Document,
    selection: &Selection,
    format: BlockFormat,
) -> Result<Document> {
    selected_spans(doc, selection)?;
    let (start, end) = selection.edges();
    let mut lines = flatten(doc);

    let active = lines
        .iter()
        .filter(|line| is_selected(line, start, end))
        .any(|line| line_matches(line, format));

    for line in lines.iter_mut().filter(|line| is_selected(line, start, end)) {
        // Unwrap from any enclosing list.
        line.container = None;

        line.kind = match (active, format.heading_level()) {
            (true, _) => LineKind::Paragraph,
            (false, Some(level)) => LineKind::Heading(level),
            (false, None) => LineKind::Item,
        };

        if !active {
            line.container = format.list_kind().map(Container::Wrapped);
        }
    }

    Ok(rebuild(lines))
}
