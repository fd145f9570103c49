#![allow(dead_code)]

use std::fmt::Write as _;

use plate_code_indent::{
    CODE_BLOCK_KIND, Document, Editor, EditorConfig, IndentSequence, Node, PluginRegistry, Point,
    Selection,
};

/// Builds an editor from `(kind, text)` blocks. `\n` is a line break, `[` and
/// `]` mark the selection start and end (`[]` for a caret).
pub fn editor(blocks: &[(&str, &str)]) -> Editor {
    editor_with_config(blocks, EditorConfig::default())
}

pub fn editor_with_sequence(blocks: &[(&str, &str)], sequence: IndentSequence) -> Editor {
    editor_with_config(blocks, EditorConfig::default().with_indent_sequence(sequence))
}

pub fn editor_with_config(blocks: &[(&str, &str)], config: EditorConfig) -> Editor {
    let mut children = Vec::new();
    let mut start = None;
    let mut end = None;

    for (block_ix, (kind, source)) in blocks.iter().enumerate() {
        let mut clean = String::new();
        let mut line_ix = 0;
        let mut line_start = 0;
        for ch in source.chars() {
            match ch {
                '[' | ']' => {
                    let point = Point::new(vec![block_ix, line_ix * 2], clean.len() - line_start);
                    if ch == '[' {
                        start = Some(point);
                    } else {
                        end = Some(point);
                    }
                }
                '\n' => {
                    clean.push('\n');
                    line_ix += 1;
                    line_start = clean.len();
                }
                _ => clean.push(ch),
            }
        }
        children.push(block(kind, &clean));
    }

    let start = start.expect("missing `[` marker");
    let end = end.unwrap_or_else(|| start.clone());
    Editor::with_config(
        Document { children },
        Selection::new(start, end),
        PluginRegistry::richtext(),
        config,
    )
}

/// A block of `kind` with one text leaf per `\n`-separated line.
pub fn block(kind: &str, text: &str) -> Node {
    let Node::Element(mut el) = Node::code_block(text) else {
        unreachable!("code_block builds an element");
    };
    if kind != CODE_BLOCK_KIND {
        el.kind = kind.to_string();
        el.attrs.clear();
    }
    Node::Element(el)
}

/// Renders the document in the notation accepted by [`editor`], with every
/// element wrapped in `<kind>...</kind>`.
pub fn render(editor: &Editor) -> String {
    let (start, end) = editor.selection().edges();
    let mut out = String::new();
    render_nodes(&editor.doc().children, &mut Vec::new(), start, end, &mut out);
    out
}

fn render_nodes(nodes: &[Node], path: &mut Vec<usize>, start: &Point, end: &Point, out: &mut String) {
    for (ix, node) in nodes.iter().enumerate() {
        path.push(ix);
        match node {
            Node::Element(el) => {
                let _ = write!(out, "<{}>", el.kind);
                render_nodes(&el.children, path, start, end, out);
                let _ = write!(out, "</{}>", el.kind);
            }
            Node::Void(_) if node.is_line_break() => out.push('\n'),
            Node::Void(v) => {
                let _ = write!(out, "<{}/>", v.kind);
            }
            Node::Text(t) => {
                let markers = |at: usize, out: &mut String| {
                    if start.path == *path && start.offset == at {
                        out.push('[');
                    }
                    if end.path == *path && end.offset == at {
                        out.push(']');
                    }
                };
                for (at, ch) in t.text.char_indices() {
                    markers(at, out);
                    out.push(ch);
                }
                markers(t.text.len(), out);
            }
        }
        path.pop();
    }
}

pub fn code(text: &str) -> String {
    format!("<code_block>{text}</code_block>")
}

pub fn paragraph(text: &str) -> String {
    format!("<paragraph>{text}</paragraph>")
}
