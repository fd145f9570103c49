use std::ops::Range;

use crate::code_block::lines::LineSpan;
use crate::code_block::text::text_pieces;
use crate::code_block::whitespace::leading_whitespace_end;
use crate::config::IndentSequence;

/// A single-line change in flattened block offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentEdit {
    Insert { at: usize, text: String },
    Remove { range: Range<usize> },
}

pub fn can_indent(sequence: &IndentSequence) -> bool {
    !sequence.is_disabled()
}

/// One copy of the sequence, appended after the existing leading whitespace.
pub fn indent_edit(line: &LineSpan<'_>, sequence: &IndentSequence) -> Option<IndentEdit> {
    let text = sequence.as_str()?;
    Some(IndentEdit::Insert {
        at: leading_whitespace_end(line),
        text: text.to_string(),
    })
}

pub fn can_outdent(line: &LineSpan<'_>, sequence: &IndentSequence) -> bool {
    outdent_range(line, sequence).is_some()
}

/// Removes the sequence when it is exactly the tail of the leading
/// whitespace. Only one level goes per call.
pub fn outdent_edit(line: &LineSpan<'_>, sequence: &IndentSequence) -> Option<IndentEdit> {
    outdent_range(line, sequence).map(|range| IndentEdit::Remove { range })
}

fn outdent_range(line: &LineSpan<'_>, sequence: &IndentSequence) -> Option<Range<usize>> {
    let sequence = sequence.as_str()?;
    let boundary = leading_whitespace_end(line);
    let start = boundary
        .checked_sub(sequence.len())
        .filter(|start| *start >= line.start)?;

    let tail = text_pieces(&line.block.children, start..boundary).flat_map(|p| p.text.bytes());
    tail.eq(sequence.bytes()).then_some(start..boundary)
}
