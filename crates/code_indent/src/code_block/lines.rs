use std::vec;

use crate::code_block::text::{SegmentKind, Segments, offset_of_point};
use crate::core::{Document, ElementNode, Point, Selection, element_ref};
use crate::ops::Path;
use crate::plugin::{PluginRegistry, text_blocks_in_order};

/// One line of a block, as flattened offsets into its inline content.
///
/// `start` is the block start or the slot right after a line break, `end` is
/// the block end or the slot of the next line break.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpan<'a> {
    pub block_path: Path,
    pub block: &'a ElementNode,
    pub start: usize,
    pub end: usize,
}

impl<'a> LineSpan<'a> {
    /// The line of `block` containing the flattened `offset`.
    pub fn containing(block_path: &[usize], block: &'a ElementNode, offset: usize) -> Self {
        let mut last = (0, 0);
        for (start, end) in LineRanges::new(block) {
            last = (start, end);
            if offset <= end {
                break;
            }
        }
        Self {
            block_path: block_path.to_vec(),
            block,
            start: last.0,
            end: last.1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// `(start, end)` of every line in a block, in order. A block always has at
/// least one line.
pub(crate) struct LineRanges<'a> {
    segments: Segments<'a>,
    line_start: usize,
    done: bool,
}

impl<'a> LineRanges<'a> {
    pub(crate) fn new(block: &'a ElementNode) -> Self {
        Self {
            segments: Segments::new(&block.children),
            line_start: 0,
            done: false,
        }
    }
}

impl Iterator for LineRanges<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        if self.done {
            return None;
        }
        for segment in self.segments.by_ref() {
            if segment.kind == SegmentKind::LineBreak {
                let line = (self.line_start, segment.start);
                self.line_start = segment.end();
                return Some(line);
            }
        }
        self.done = true;
        Some((self.line_start, self.segments.offset()))
    }
}

struct BlockRange<'a> {
    path: Path,
    el: &'a ElementNode,
    from: usize,
    to: usize,
}

/// Lines touched by a selection, in document order, restricted to
/// qualifying blocks.
///
/// A collapsed selection touches exactly the caret's line. An expanded one
/// touches every line it intersects, including lines it only meets at an
/// endpoint. Blocks failing the predicate are skipped.
pub struct LineLocator<'a> {
    blocks: vec::IntoIter<BlockRange<'a>>,
    current: Option<(BlockRange<'a>, LineRanges<'a>)>,
}

impl<'a> LineLocator<'a> {
    pub fn new(
        doc: &'a Document,
        registry: &PluginRegistry,
        selection: &Selection,
        is_qualifying: impl Fn(&ElementNode) -> bool,
    ) -> Self {
        let (start, end) = selection.edges();
        let blocks = if selection.is_collapsed() {
            collapsed_block(doc, start, &is_qualifying)
                .into_iter()
                .collect()
        } else {
            selected_blocks(doc, registry, start, end, &is_qualifying)
        };
        Self {
            blocks: blocks.into_iter(),
            current: None,
        }
    }
}

fn collapsed_block<'a>(
    doc: &'a Document,
    caret: &Point,
    is_qualifying: &impl Fn(&ElementNode) -> bool,
) -> Option<BlockRange<'a>> {
    let (&leaf_ix, block_path) = caret.path.split_last()?;
    let el = element_ref(doc, block_path)?;
    if !is_qualifying(el) {
        return None;
    }
    let at = offset_of_point(&el.children, leaf_ix, caret.offset);
    Some(BlockRange {
        path: block_path.to_vec(),
        el,
        from: at,
        to: at,
    })
}

fn selected_blocks<'a>(
    doc: &'a Document,
    registry: &PluginRegistry,
    start: &Point,
    end: &Point,
    is_qualifying: &impl Fn(&ElementNode) -> bool,
) -> Vec<BlockRange<'a>> {
    let blocks = text_blocks_in_order(doc, registry);
    let start_block = start.block_path();
    let end_block = end.block_path();
    let (Some(first), Some(last)) = (
        blocks.iter().position(|b| b.path == start_block),
        blocks.iter().position(|b| b.path == end_block),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (ix, block) in blocks.into_iter().enumerate().take(last + 1).skip(first) {
        if !is_qualifying(block.el) {
            continue;
        }
        let from = if ix == first {
            point_offset(block.el, start)
        } else {
            0
        };
        let to = if ix == last {
            point_offset(block.el, end)
        } else {
            usize::MAX
        };
        out.push(BlockRange {
            path: block.path,
            el: block.el,
            from,
            to,
        });
    }
    out
}

fn point_offset(el: &ElementNode, point: &Point) -> usize {
    let leaf_ix = point.path.last().copied().unwrap_or(0);
    offset_of_point(&el.children, leaf_ix, point.offset)
}

impl<'a> Iterator for LineLocator<'a> {
    type Item = LineSpan<'a>;

    fn next(&mut self) -> Option<LineSpan<'a>> {
        loop {
            if let Some((block, lines)) = &mut self.current {
                for (start, end) in lines.by_ref() {
                    if start > block.to {
                        break;
                    }
                    if end >= block.from {
                        return Some(LineSpan {
                            block_path: block.path.clone(),
                            block: block.el,
                            start,
                            end,
                        });
                    }
                }
            }
            let block = self.blocks.next()?;
            let lines = LineRanges::new(block.el);
            self.current = Some((block, lines));
        }
    }
}
