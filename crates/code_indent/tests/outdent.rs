mod common;

use common::{code, editor, editor_with_sequence, render};
use plate_code_indent::{
    Document, Editor, IndentCodeBlockCommand, IndentSequence, Marks, Node, Op, PluginRegistry,
    Point, Selection, TextNode,
};
use pretty_assertions::assert_eq;

fn outdent(editor: &mut Editor) {
    editor.run_command("code_block.outdent", None).unwrap();
}

fn can_outdent(blocks: &[(&str, &str)]) -> bool {
    editor(blocks).is_command_enabled("code_block.outdent")
}

#[test]
fn enabled_when_the_line_ends_its_indentation_with_the_sequence() {
    assert!(can_outdent(&[("code_block", "\tf[]oo")]));
    assert!(can_outdent(&[("code_block", "  \tf[]oo")]));
}

#[test]
fn enabled_when_any_selected_line_can_be_outdented() {
    assert!(can_outdent(&[("code_block", "\tf[oo"), ("paragraph", "ba]r")]));
    assert!(can_outdent(&[("code_block", "f[oo"), ("code_block", "\tba]r")]));
    assert!(can_outdent(&[("paragraph", "f[oo"), ("code_block", "\tba]r")]));
    assert!(can_outdent(&[("code_block", "f[oo\nbar\n\tba]z")]));
}

#[test]
fn disabled_when_the_sequence_is_in_another_element() {
    assert!(!can_outdent(&[("paragraph", "\tfoo[]")]));
}

#[test]
fn disabled_without_the_sequence_in_the_line() {
    assert!(!can_outdent(&[("code_block", "f[]oo")]));
    assert!(!can_outdent(&[("code_block", "[]")]));
    assert!(!can_outdent(&[("code_block", "foo[]")]));
    assert!(!can_outdent(&[("code_block", "\tfoo\nba[]r")]));
}

#[test]
fn disabled_when_the_indentation_does_not_end_with_the_sequence() {
    assert!(!can_outdent(&[("code_block", "    foo[]")]));
    assert!(!can_outdent(&[("code_block", "    \t    foo[]")]));
}

#[test]
fn disabled_when_the_sequence_is_not_leading() {
    assert!(!can_outdent(&[("code_block", "bar\tfoo[]")]));
}

#[test]
fn respects_the_configured_sequence() {
    let editor = editor_with_sequence(&[("code_block", "    foo[]")], IndentSequence::spaces(2));
    assert!(editor.is_command_enabled("code_block.outdent"));
    assert!(editor.run_query::<bool>("code_block.can_outdent", None).unwrap());

    let editor = editor_with_sequence(&[("code_block", " foo[]")], IndentSequence::spaces(2));
    assert!(!editor.is_command_enabled("code_block.outdent"));

    let editor = editor_with_sequence(&[("code_block", "\tfoo[]")], IndentSequence::Disabled);
    assert!(!editor.is_command_enabled("code_block.outdent"));
}

#[test]
fn outdents_a_single_line() {
    let mut editor = editor(&[("code_block", "\tf[]oo")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("f[]oo"));
}

#[test]
fn outdents_only_one_level() {
    let mut editor = editor(&[("code_block", "\t\tf[]oo")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("\tf[]oo"));
}

#[test]
fn outdents_multiple_lines() {
    let mut editor = editor(&[("code_block", "\tf[oo\n\tba]r")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("f[oo\nba]r"));
}

#[test]
fn outdents_one_level_across_lines() {
    let mut editor = editor(&[("code_block", "\tf[oo\n\t\tba]r")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("f[oo\n\tba]r"));
}

#[test]
fn outdents_only_eligible_lines() {
    let mut editor = editor(&[("code_block", "f[oo\n\tba]r")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("f[oo\nba]r"));

    let mut editor = common::editor(&[("code_block", "  f[oo\n\tba]r")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("  f[oo\nba]r"));
}

#[test]
fn outdents_with_the_configured_sequence() {
    let mut editor = editor_with_sequence(&[("code_block", "  f[]oo")], IndentSequence::spaces(2));
    outdent(&mut editor);
    assert_eq!(render(&editor), code("f[]oo"));

    let mut editor =
        editor_with_sequence(&[("code_block", "   f[]oo")], IndentSequence::spaces(2));
    outdent(&mut editor);
    assert_eq!(render(&editor), code(" f[]oo"));
}

#[test]
fn caret_inside_removed_whitespace_moves_to_its_start() {
    let mut editor = editor(&[("code_block", "  \t[]foo")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("  []foo"));

    let mut editor = common::editor(&[("code_block", "[]\tfoo")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("[]foo"));
}

#[test]
fn removes_a_sequence_split_across_text_leaves() {
    let bold = Marks {
        bold: true,
        ..Marks::default()
    };
    let doc = Document {
        children: vec![Node::element(
            "code_block",
            vec![
                Node::text("  "),
                Node::Text(TextNode {
                    text: "  foo".to_string(),
                    marks: bold.clone(),
                }),
            ],
        )],
    };
    let mut editor = Editor::new(
        doc,
        Selection::collapsed(Point::new(vec![0, 1], 4)),
        PluginRegistry::richtext(),
    );
    editor.set_config(
        editor
            .config()
            .clone()
            .with_indent_sequence(IndentSequence::spaces(3)),
    );

    let tx = IndentCodeBlockCommand::backward().transaction(&editor);
    assert_eq!(
        tx.ops,
        vec![
            Op::RemoveText {
                path: vec![0, 1],
                range: 0..2,
            },
            Op::RemoveText {
                path: vec![0, 0],
                range: 1..2,
            },
        ]
    );

    outdent(&mut editor);
    let Node::Element(el) = &editor.doc().children[0] else {
        panic!("expected element block");
    };
    assert_eq!(el.inline_text(), " foo");
    assert_eq!(editor.selection().focus, Point::new(vec![0, 1], 2));
}

#[test]
fn disabled_outdent_is_a_no_op() {
    let mut editor = editor(&[("code_block", "f[]oo")]);
    outdent(&mut editor);
    assert_eq!(render(&editor), code("f[]oo"));
}
