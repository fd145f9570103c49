//! Flattened offsets over a block's inline children.
//!
//! Text leaves contribute their UTF-8 length. Every other child, whether an
//! inline void (line breaks included) or a nested inline element, is an atom
//! and contributes one slot.

use std::iter::Enumerate;
use std::ops::Range;
use std::slice;

use crate::core::{Node, clamp_to_char_boundary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SegmentKind<'a> {
    Text(&'a str),
    LineBreak,
    Atom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    pub(crate) child_ix: usize,
    pub(crate) start: usize,
    pub(crate) kind: SegmentKind<'a>,
}

impl Segment<'_> {
    pub(crate) fn len(&self) -> usize {
        match self.kind {
            SegmentKind::Text(text) => text.len(),
            SegmentKind::LineBreak | SegmentKind::Atom => 1,
        }
    }

    pub(crate) fn end(&self) -> usize {
        self.start + self.len()
    }
}

pub(crate) struct Segments<'a> {
    children: Enumerate<slice::Iter<'a, Node>>,
    offset: usize,
}

impl<'a> Segments<'a> {
    pub(crate) fn new(children: &'a [Node]) -> Self {
        Self {
            children: children.iter().enumerate(),
            offset: 0,
        }
    }

    /// Offset just past the last segment yielded so far.
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        let (child_ix, node) = self.children.next()?;
        let kind = match node {
            Node::Text(t) => SegmentKind::Text(&t.text),
            Node::Void(v) if v.is_line_break() => SegmentKind::LineBreak,
            Node::Void(_) | Node::Element(_) => SegmentKind::Atom,
        };
        let segment = Segment {
            child_ix,
            start: self.offset,
            kind,
        };
        self.offset = segment.end();
        Some(segment)
    }
}

/// Flattened offset of `offset` inside child `child_ix`.
pub(crate) fn offset_of_point(children: &[Node], child_ix: usize, offset: usize) -> usize {
    let mut segments = Segments::new(children);
    for segment in segments.by_ref() {
        if segment.child_ix < child_ix {
            continue;
        }
        if segment.child_ix > child_ix {
            return segment.start;
        }
        return match segment.kind {
            SegmentKind::Text(text) => segment.start + clamp_to_char_boundary(text, offset),
            SegmentKind::LineBreak | SegmentKind::Atom => segment.start + offset.min(1),
        };
    }
    segments.offset()
}

/// Where text has to go so it lands at a flattened offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextSlot {
    /// Inside an existing text leaf.
    Leaf { child_ix: usize, offset: usize },
    /// No text leaf touches the offset; a new one goes before `child_ix`.
    NewLeaf { child_ix: usize },
}

/// Prefers the leaf that ends at `at` over the one starting there, so the
/// inserted text joins the whitespace run before it.
pub(crate) fn text_slot(children: &[Node], at: usize) -> TextSlot {
    let mut following: Option<TextSlot> = None;
    let mut next_child: Option<usize> = None;

    for segment in Segments::new(children) {
        if let SegmentKind::Text(_) = segment.kind {
            if segment.start < at && at <= segment.end() {
                return TextSlot::Leaf {
                    child_ix: segment.child_ix,
                    offset: at - segment.start,
                };
            }
            if segment.start == at && following.is_none() {
                following = Some(TextSlot::Leaf {
                    child_ix: segment.child_ix,
                    offset: 0,
                });
            }
        } else if segment.start >= at && next_child.is_none() {
            next_child = Some(segment.child_ix);
        }
        if segment.start > at {
            break;
        }
    }

    following.unwrap_or(TextSlot::NewLeaf {
        child_ix: next_child.unwrap_or(children.len()),
    })
}

/// The part of one text leaf covered by a flattened range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextPiece<'a> {
    pub(crate) child_ix: usize,
    pub(crate) local: Range<usize>,
    pub(crate) text: &'a str,
}

/// Text covered by `range`, leaf by leaf. Voids inside the range are skipped.
pub(crate) fn text_pieces(
    children: &[Node],
    range: Range<usize>,
) -> impl Iterator<Item = TextPiece<'_>> {
    let range_end = range.end;
    Segments::new(children)
        .take_while(move |segment| segment.start < range_end)
        .filter_map(move |segment| {
            let SegmentKind::Text(text) = segment.kind else {
                return None;
            };
            let start = range.start.max(segment.start);
            let end = range.end.min(segment.end());
            if start >= end {
                return None;
            }
            let local = start - segment.start..end - segment.start;
            Some(TextPiece {
                child_ix: segment.child_ix,
                text: text.get(local.clone())?,
                local,
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VoidNode;

    fn atom() -> Node {
        Node::Void(VoidNode {
            kind: "mention".to_string(),
            attrs: Default::default(),
        })
    }

    #[test]
    fn segments_give_voids_one_slot() {
        let children = vec![Node::text("ab"), Node::line_break(), Node::text("c"), atom()];
        let starts: Vec<(usize, usize)> = Segments::new(&children)
            .map(|s| (s.start, s.end()))
            .collect();
        assert_eq!(starts, vec![(0, 2), (2, 3), (3, 4), (4, 5)]);
    }

    #[test]
    fn nested_elements_are_atoms() {
        let link = Node::element("link", vec![Node::text("xyz")]);
        let children = vec![Node::text("  "), link, Node::text(" y")];
        let segments: Vec<(usize, usize, bool)> = Segments::new(&children)
            .map(|s| (s.start, s.end(), s.kind == SegmentKind::Atom))
            .collect();
        assert_eq!(segments, vec![(0, 2, false), (2, 3, true), (3, 5, false)]);
        assert_eq!(offset_of_point(&children, 2, 1), 4);
    }

    #[test]
    fn offsets_of_points() {
        let children = vec![Node::text("ab"), Node::line_break(), Node::text("cd")];
        assert_eq!(offset_of_point(&children, 0, 1), 1);
        assert_eq!(offset_of_point(&children, 2, 0), 3);
        assert_eq!(offset_of_point(&children, 2, 9), 5);
        assert_eq!(offset_of_point(&children, 7, 0), 5);
    }

    #[test]
    fn slot_prefers_the_preceding_leaf() {
        let children = vec![Node::text("  "), Node::text("x")];
        assert_eq!(
            text_slot(&children, 2),
            TextSlot::Leaf {
                child_ix: 0,
                offset: 2
            }
        );
        assert_eq!(
            text_slot(&children, 0),
            TextSlot::Leaf {
                child_ix: 0,
                offset: 0
            }
        );
    }

    #[test]
    fn slot_after_a_line_break_uses_the_next_leaf() {
        let children = vec![Node::text("a"), Node::line_break(), Node::text("b")];
        assert_eq!(
            text_slot(&children, 2),
            TextSlot::Leaf {
                child_ix: 2,
                offset: 0
            }
        );
    }

    #[test]
    fn slot_without_a_leaf_creates_one() {
        let children = vec![Node::text("a"), Node::line_break(), Node::line_break()];
        assert_eq!(text_slot(&children, 2), TextSlot::NewLeaf { child_ix: 2 });
        let children = vec![Node::text("a"), Node::line_break()];
        assert_eq!(text_slot(&children, 2), TextSlot::NewLeaf { child_ix: 2 });
        let children = vec![atom()];
        assert_eq!(text_slot(&children, 0), TextSlot::NewLeaf { child_ix: 0 });
    }

    #[test]
    fn pieces_span_several_leaves() {
        let children = vec![Node::text(" \t"), Node::text("  x")];
        let pieces: Vec<(usize, &str)> = text_pieces(&children, 1..4)
            .map(|p| (p.child_ix, p.text))
            .collect();
        assert_eq!(pieces, vec![(0, "\t"), (1, "  ")]);
    }
}
