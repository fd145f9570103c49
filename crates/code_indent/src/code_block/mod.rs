//! Code blocks and the line indentation engine behind `code_block.indent`
//! and `code_block.outdent`.

mod command;
mod lines;
mod policy;
mod text;
mod whitespace;

use serde_json::Value;

pub use command::{IndentCodeBlockCommand, IndentDirection};
pub use lines::{LineLocator, LineSpan};
pub use policy::{IndentEdit, can_indent, can_outdent, indent_edit, outdent_edit};
pub use whitespace::{is_indent_whitespace, leading_whitespace_end};

use crate::core::{
    CODE_BLOCK_KIND, DEFAULT_CODE_LANGUAGE, Editor, ElementNode, Node, PARAGRAPH_KIND, Point,
    Selection, TextNode, clamp_to_char_boundary, element_ref,
};
use crate::ops::{Op, Transaction};
use crate::plugin::{
    ChildConstraint, CommandError, CommandSpec, NodeRole, NodeSpec, PlatePlugin, QuerySpec,
    element_is_text_block,
};

pub(crate) struct CodeBlockPlugin;

impl PlatePlugin for CodeBlockPlugin {
    fn id(&self) -> &'static str {
        "code_block"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: CODE_BLOCK_KIND.to_string(),
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
            line_indent: true,
        }]
    }

    fn commands(&self) -> Vec<CommandSpec> {
        const INDENT: IndentCodeBlockCommand = IndentCodeBlockCommand::forward();
        const OUTDENT: IndentCodeBlockCommand = IndentCodeBlockCommand::backward();

        vec![
            CommandSpec::new("code_block.indent", "Indent code lines", |editor, _args| {
                INDENT.execute(editor)
            })
            .enabled_when(|editor| INDENT.is_enabled(editor))
            .description("Add one indent sequence after the leading whitespace of each selected code line.")
            .keywords(["indent", "tab", "code"]),
            CommandSpec::new("code_block.outdent", "Outdent code lines", |editor, _args| {
                OUTDENT.execute(editor)
            })
            .enabled_when(|editor| OUTDENT.is_enabled(editor))
            .description("Remove one indent sequence from the leading whitespace of each selected code line.")
            .keywords(["outdent", "dedent", "shift tab", "code"]),
            CommandSpec::new("code_block.toggle", "Toggle code block", |editor, _args| {
                toggle_code_block(editor)
                    .map_err(CommandError::new)
                    .and_then(|tx| {
                        editor.apply(tx).map_err(|e| {
                            CommandError::new(format!("Failed to toggle code block: {e}"))
                        })
                    })
            })
            .description("Toggle code block for the active text block.")
            .keywords(["code block", "code", "pre", "monospace"]),
            CommandSpec::new(
                "code_block.insert_line_break",
                "Insert line break",
                |editor, _args| {
                    insert_line_break(editor)
                        .map_err(CommandError::new)
                        .and_then(|tx| {
                            editor.apply(tx).map_err(|e| {
                                CommandError::new(format!("Failed to insert line break: {e}"))
                            })
                        })
                },
            )
            .description("Break the line at the caret, keeping the indentation inside code blocks.")
            .keywords(["line break", "soft break", "newline"]),
        ]
    }

    fn queries(&self) -> Vec<QuerySpec> {
        vec![
            QuerySpec::new("code_block.is_active", |editor, _args| {
                Ok(Value::Bool(focus_block(editor).is_some_and(|el| el.kind == CODE_BLOCK_KIND)))
            }),
            QuerySpec::new("code_block.can_indent", |editor, _args| {
                Ok(Value::Bool(IndentCodeBlockCommand::forward().is_enabled(editor)))
            }),
            QuerySpec::new("code_block.can_outdent", |editor, _args| {
                Ok(Value::Bool(IndentCodeBlockCommand::backward().is_enabled(editor)))
            }),
            QuerySpec::new("code_block.language", |editor, _args| {
                Ok(focus_block(editor)
                    .filter(|el| el.kind == CODE_BLOCK_KIND)
                    .and_then(|el| el.language())
                    .map_or(Value::Null, |language| Value::String(language.to_string())))
            }),
        ]
    }
}

fn focus_block(editor: &Editor) -> Option<&ElementNode> {
    element_ref(editor.doc(), editor.selection().focus.block_path())
}

fn toggle_code_block(editor: &Editor) -> Result<Transaction, String> {
    let block_path = editor.selection().focus.block_path();
    if block_path.is_empty() {
        return Err("No active block".into());
    }
    let Some(el) = element_ref(editor.doc(), block_path) else {
        return Err("No active block".into());
    };
    if !element_is_text_block(el, editor.registry()) {
        return Err("Active block is not a text block".into());
    }

    let mut attrs = el.attrs.clone();
    let next_kind = if el.kind == CODE_BLOCK_KIND {
        attrs.remove("language");
        PARAGRAPH_KIND
    } else {
        attrs
            .entry("language".to_string())
            .or_insert_with(|| Value::String(DEFAULT_CODE_LANGUAGE.to_string()));
        CODE_BLOCK_KIND
    };

    let next = Node::Element(ElementNode {
        kind: next_kind.to_string(),
        attrs,
        children: el.children.clone(),
    });

    Ok(Transaction::new(vec![
        Op::RemoveNode {
            path: block_path.to_vec(),
        },
        Op::InsertNode {
            path: block_path.to_vec(),
            node: next,
        },
    ])
    .selection_after(editor.selection().clone())
    .source("command:code_block.toggle"))
}

/// Splits the caret's text leaf around a new line break. In line-indentable
/// blocks the new line repeats the leading whitespace found before the caret.
fn insert_line_break(editor: &Editor) -> Result<Transaction, String> {
    let selection = editor.selection();
    if !selection.is_collapsed() {
        return Err("Line breaks need a collapsed selection".into());
    }
    let caret = &selection.focus;
    let Some((&leaf_ix, block_path)) = caret.path.split_last() else {
        return Err("No active block".into());
    };
    let Some(block) = element_ref(editor.doc(), block_path) else {
        return Err("No active block".into());
    };
    let Some(Node::Text(leaf)) = block.children.get(leaf_ix) else {
        return Err("Selection is not in a text leaf".into());
    };

    let offset = clamp_to_char_boundary(&leaf.text, caret.offset);
    let indent = if editor.registry().is_line_indentable(&block.kind) {
        let at = text::offset_of_point(&block.children, leaf_ix, offset);
        let line = LineSpan::containing(block_path, block, at);
        let end = leading_whitespace_end(&line).min(at);
        text::text_pieces(&block.children, line.start..end)
            .map(|piece| piece.text)
            .collect::<String>()
    } else {
        String::new()
    };

    let child_path = |child_ix: usize| {
        let mut path = block_path.to_vec();
        path.push(child_ix);
        path
    };

    let mut ops = Vec::new();
    let tail = &leaf.text[offset..];
    if !tail.is_empty() {
        ops.push(Op::RemoveText {
            path: caret.path.clone(),
            range: offset..leaf.text.len(),
        });
    }
    ops.push(Op::InsertNode {
        path: child_path(leaf_ix + 1),
        node: Node::line_break(),
    });
    ops.push(Op::InsertNode {
        path: child_path(leaf_ix + 2),
        node: Node::Text(TextNode {
            text: format!("{indent}{tail}"),
            marks: leaf.marks.clone(),
        }),
    });

    Ok(Transaction::new(ops)
        .selection_after(Selection::collapsed(Point::new(
            child_path(leaf_ix + 2),
            indent.len(),
        )))
        .source("command:code_block.insert_line_break"))
}
