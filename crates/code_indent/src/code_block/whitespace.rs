use crate::code_block::lines::LineSpan;
use crate::code_block::text::{SegmentKind, Segments};

/// Characters that make up leading whitespace and indent sequences.
pub fn is_indent_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t')
}

/// Offset where the line's leading whitespace run ends.
///
/// This is where indentation is inserted and where outdent looks for the
/// sequence to remove. The run may cover several text leaves; any other child,
/// an inline void or a nested inline element, ends it. An empty or
/// all-whitespace line resolves to its end.
pub fn leading_whitespace_end(line: &LineSpan<'_>) -> usize {
    let mut boundary = line.start;
    for segment in Segments::new(&line.block.children) {
        if segment.start < line.start {
            continue;
        }
        let SegmentKind::Text(text) = segment.kind else {
            break;
        };
        let rest = text.trim_start_matches(is_indent_whitespace);
        boundary = segment.start + (text.len() - rest.len());
        if !rest.is_empty() {
            break;
        }
    }
    boundary.min(line.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ElementNode, Node, VoidNode};

    fn block(children: Vec<Node>) -> ElementNode {
        ElementNode {
            kind: "code_block".to_string(),
            attrs: Default::default(),
            children,
        }
    }

    fn boundary_of(el: &ElementNode, offset: usize) -> usize {
        leading_whitespace_end(&LineSpan::containing(&[0], el, offset))
    }

    #[test]
    fn stops_at_first_non_whitespace() {
        let el = block(vec![Node::text("  \tfoo")]);
        assert_eq!(boundary_of(&el, 0), 3);
    }

    #[test]
    fn empty_and_blank_lines_end_at_line_end() {
        let el = block(vec![
            Node::text("x"),
            Node::line_break(),
            Node::text(""),
            Node::line_break(),
            Node::text("   "),
        ]);
        assert_eq!(boundary_of(&el, 2), 2);
        assert_eq!(boundary_of(&el, 4), 6);
    }

    #[test]
    fn run_continues_across_leaves() {
        let el = block(vec![Node::text("  "), Node::text("\t"), Node::text(" bar")]);
        assert_eq!(boundary_of(&el, 0), 4);
    }

    #[test]
    fn inline_void_ends_the_run() {
        let atom = Node::Void(VoidNode {
            kind: "mention".to_string(),
            attrs: Default::default(),
        });
        let el = block(vec![Node::text(" "), atom, Node::text(" x")]);
        assert_eq!(boundary_of(&el, 0), 1);
    }

    #[test]
    fn nested_inline_element_ends_the_run() {
        let link = Node::element("link", vec![Node::text("x")]);
        let el = block(vec![Node::text("  "), link, Node::text(" y")]);
        assert_eq!(boundary_of(&el, 0), 2);

        let empty = Node::element("link", Vec::new());
        let el = block(vec![empty, Node::text("  y")]);
        assert_eq!(boundary_of(&el, 0), 0);
    }

    #[test]
    fn resolves_per_line() {
        let el = block(vec![Node::text("\tfoo"), Node::line_break(), Node::text("    bar")]);
        assert_eq!(boundary_of(&el, 2), 1);
        assert_eq!(boundary_of(&el, 8), 9);
    }

    #[test]
    fn only_spaces_and_tabs_count() {
        assert!(is_indent_whitespace(' '));
        assert!(is_indent_whitespace('\t'));
        assert!(!is_indent_whitespace('\n'));
        assert!(!is_indent_whitespace('\u{a0}'));
    }
}
