use serde::{Deserialize, Serialize};

use crate::code_block::lines::{LineLocator, LineSpan};
use crate::code_block::policy::{IndentEdit, can_indent, can_outdent, indent_edit, outdent_edit};
use crate::code_block::text::{TextSlot, text_pieces, text_slot};
use crate::config::IndentSequence;
use crate::core::{Editor, Node, element_ref};
use crate::ops::{Op, Transaction};
use crate::plugin::CommandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentDirection {
    Forward,
    Backward,
}

impl IndentDirection {
    fn edit(self, line: &LineSpan<'_>, sequence: &IndentSequence) -> Option<IndentEdit> {
        match self {
            IndentDirection::Forward => indent_edit(line, sequence),
            IndentDirection::Backward => outdent_edit(line, sequence),
        }
    }

    fn source(self) -> &'static str {
        match self {
            IndentDirection::Forward => "command:code_block.indent",
            IndentDirection::Backward => "command:code_block.outdent",
        }
    }
}

/// Indents or outdents every code line touched by the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentCodeBlockCommand {
    direction: IndentDirection,
}

impl IndentCodeBlockCommand {
    pub const fn new(direction: IndentDirection) -> Self {
        Self { direction }
    }

    pub const fn forward() -> Self {
        Self::new(IndentDirection::Forward)
    }

    pub const fn backward() -> Self {
        Self::new(IndentDirection::Backward)
    }

    /// Forward: the block holding the selection start is line-indentable.
    /// Backward: some touched line ends its leading whitespace with the
    /// sequence. Both are off while the sequence is disabled.
    pub fn is_enabled(&self, editor: &Editor) -> bool {
        let sequence = &editor.config().indent_sequence;
        match self.direction {
            IndentDirection::Forward => can_indent(sequence) && first_block_qualifies(editor),
            IndentDirection::Backward => {
                !sequence.is_disabled() && lines(editor).any(|line| can_outdent(&line, sequence))
            }
        }
    }

    /// Ops for every touched line, last line first so earlier offsets stay
    /// valid while the batch is applied.
    pub fn transaction(&self, editor: &Editor) -> Transaction {
        let sequence = &editor.config().indent_sequence;
        let mut touched = 0usize;
        let mut edits: Vec<(LineSpan<'_>, IndentEdit)> = Vec::new();

        for line in lines(editor) {
            touched += 1;
            if let Some(edit) = self.direction.edit(&line, sequence) {
                tracing::trace!(
                    block = ?line.block_path,
                    start = line.start,
                    end = line.end,
                    ?edit,
                    "code line edit"
                );
                edits.push((line, edit));
            }
        }

        tracing::debug!(
            direction = ?self.direction,
            lines = touched,
            edits = edits.len(),
            "computed code block indentation"
        );

        let mut tx = Transaction::default().source(self.direction.source());
        for (line, edit) in edits.iter().rev() {
            push_edit_ops(&mut tx, line, edit);
        }
        tx
    }

    /// No-op while disabled. Host failures are returned as errors.
    pub fn execute(&self, editor: &mut Editor) -> Result<(), CommandError> {
        if !self.is_enabled(editor) {
            tracing::debug!(direction = ?self.direction, "code block indentation disabled, skipping");
            return Ok(());
        }

        let tx = self.transaction(editor);
        if tx.is_empty() {
            return Ok(());
        }
        self.commit(editor, tx)
    }

    fn commit(&self, editor: &mut Editor, tx: Transaction) -> Result<(), CommandError> {
        editor.apply(tx).map_err(|err| {
            tracing::warn!(direction = ?self.direction, %err, "code block indentation rejected");
            CommandError::new(format!("Failed to change code line indentation: {err}"))
        })
    }
}

fn lines(editor: &Editor) -> LineLocator<'_> {
    let registry = editor.registry();
    LineLocator::new(editor.doc(), registry, editor.selection(), |el| {
        registry.is_line_indentable(&el.kind)
    })
}

fn first_block_qualifies(editor: &Editor) -> bool {
    let (start, _) = editor.selection().edges();
    element_ref(editor.doc(), start.block_path())
        .is_some_and(|el| editor.registry().is_line_indentable(&el.kind))
}

fn push_edit_ops(tx: &mut Transaction, line: &LineSpan<'_>, edit: &IndentEdit) {
    let children = &line.block.children;
    let child_path = |child_ix: usize| {
        let mut path = line.block_path.clone();
        path.push(child_ix);
        path
    };

    match edit {
        IndentEdit::Insert { at, text } => match text_slot(children, *at) {
            TextSlot::Leaf { child_ix, offset } => tx.push(Op::InsertText {
                path: child_path(child_ix),
                offset,
                text: text.clone(),
            }),
            TextSlot::NewLeaf { child_ix } => tx.push(Op::InsertNode {
                path: child_path(child_ix),
                node: Node::text(text.clone()),
            }),
        },
        IndentEdit::Remove { range } => {
            let pieces: Vec<_> = text_pieces(children, range.clone()).collect();
            for piece in pieces.into_iter().rev() {
                tx.push(Op::RemoveText {
                    path: child_path(piece.child_ix),
                    range: piece.local,
                });
            }
        }
    }
}
