use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::ops::{Op, Path, Transaction};
use crate::plugin::{CommandError, CommandSpec, NodeSpec, PluginRegistry, QueryError};

pub type Attrs = BTreeMap<String, serde_json::Value>;
pub type ElementKind = String;

pub const PARAGRAPH_KIND: &str = "paragraph";
pub const CODE_BLOCK_KIND: &str = "code_block";
pub const LINE_BREAK_KIND: &str = "line_break";
pub const DEFAULT_CODE_LANGUAGE: &str = "plaintext";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Document {
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Void(VoidNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode {
            text: text.into(),
            marks: Marks::default(),
        })
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Node::Element(ElementNode {
            kind: PARAGRAPH_KIND.to_string(),
            attrs: Attrs::default(),
            children: vec![Node::text(text)],
        })
    }

    /// Builds a `code_block` whose lines are the `\n`-separated parts of
    /// `text`. Every line gets its own text leaf, even when empty.
    pub fn code_block(text: &str) -> Self {
        let mut attrs = Attrs::default();
        attrs.insert(
            "language".to_string(),
            Value::String(DEFAULT_CODE_LANGUAGE.to_string()),
        );
        Node::Element(ElementNode {
            kind: CODE_BLOCK_KIND.to_string(),
            attrs,
            children: inline_lines(text),
        })
    }

    pub fn element(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(ElementNode {
            kind: kind.into(),
            attrs: Attrs::default(),
            children,
        })
    }

    pub fn line_break() -> Self {
        Node::Void(VoidNode {
            kind: LINE_BREAK_KIND.to_string(),
            attrs: Attrs::default(),
        })
    }

    pub fn is_line_break(&self) -> bool {
        matches!(self, Node::Void(v) if v.is_line_break())
    }
}

fn inline_lines(text: &str) -> Vec<Node> {
    let mut children = Vec::new();
    for (ix, line) in text.split('\n').enumerate() {
        if ix > 0 {
            children.push(Node::line_break());
        }
        children.push(Node::text(line));
    }
    children
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    pub kind: ElementKind,
    #[serde(default)]
    pub attrs: Attrs,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Plain text of the inline children, with line breaks rendered as `\n`.
    pub fn inline_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => out.push_str(&t.text),
                Node::Void(v) if v.is_line_break() => out.push('\n'),
                Node::Void(v) => out.push_str(v.inline_text()),
                Node::Element(_) => {}
            }
        }
        out
    }

    pub fn language(&self) -> Option<&str> {
        self.attrs.get("language").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoidNode {
    pub kind: ElementKind,
    #[serde(default)]
    pub attrs: Attrs,
}

impl VoidNode {
    pub fn is_line_break(&self) -> bool {
        self.kind == LINE_BREAK_KIND
    }

    pub fn inline_text(&self) -> &'static str {
        if self.is_line_break() { "\n" } else { "\u{fffc}" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub text: String,
    #[serde(default)]
    pub marks: Marks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Marks {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Path of the element owning the text leaf this point sits in.
    pub fn block_path(&self) -> &[usize] {
        self.path.split_last().map(|(_, p)| p).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_backward(&self) -> bool {
        self.focus < self.anchor
    }

    /// Start and end of the selection in document order.
    pub fn edges(&self) -> (&Point, &Point) {
        if self.is_backward() {
            (&self.focus, &self.anchor)
        } else {
            (&self.anchor, &self.focus)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionPreview {
    pub doc: Document,
    pub selection: Selection,
}

pub struct Editor {
    doc: Document,
    selection: Selection,
    registry: PluginRegistry,
    config: EditorConfig,
}

impl Editor {
    pub fn new(doc: Document, selection: Selection, registry: PluginRegistry) -> Self {
        Self::with_config(doc, selection, registry, EditorConfig::default())
    }

    pub fn with_config(
        doc: Document,
        selection: Selection,
        registry: PluginRegistry,
        config: EditorConfig,
    ) -> Self {
        Self {
            doc,
            selection,
            registry,
            config,
        }
    }

    pub fn with_core_plugins() -> Self {
        Self::new(
            Self::empty_document(),
            Selection::collapsed(Point::new(vec![0, 0], 0)),
            PluginRegistry::core(),
        )
    }

    pub fn with_richtext_plugins() -> Self {
        Self::new(
            Self::empty_document(),
            Selection::collapsed(Point::new(vec![0, 0], 0)),
            PluginRegistry::richtext(),
        )
    }

    fn empty_document() -> Document {
        Document {
            children: vec![Node::paragraph("")],
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    /// Applies every op of `tx` or none of them.
    pub fn apply(&mut self, tx: Transaction) -> Result<(), ApplyError> {
        let TransactionPreview { doc, selection } = self.preview_transaction(&tx)?;
        tracing::trace!(
            source = tx.meta.source.as_deref().unwrap_or("unknown"),
            ops = tx.ops.len(),
            "applied transaction"
        );
        self.doc = doc;
        self.selection = selection;
        Ok(())
    }

    pub fn preview_transaction(&self, tx: &Transaction) -> Result<TransactionPreview, ApplyError> {
        let mut doc = self.doc.clone();
        let mut selection = self.selection.clone();

        for op in tx.ops.iter().cloned() {
            apply_op_to(&mut doc, &mut selection, op)?;
        }

        if let Some(sel) = &tx.selection_after {
            selection = sel.clone();
        }

        Ok(TransactionPreview { doc, selection })
    }

    pub fn run_command(
        &mut self,
        id: &str,
        args: Option<serde_json::Value>,
    ) -> Result<(), CommandError> {
        let Some(command) = self.registry.command(id) else {
            return Err(CommandError::new(format!("Unknown command: {id}")));
        };
        (command.handler)(self, args)
    }

    pub fn is_command_enabled(&self, id: &str) -> bool {
        self.registry
            .command(id)
            .is_some_and(|command| command.is_enabled(self))
    }

    pub fn run_query_json(&self, id: &str, args: Option<Value>) -> Result<Value, QueryError> {
        let Some(query) = self.registry.query(id) else {
            return Err(QueryError::new(format!("Unknown query: {id}")));
        };
        (query.handler)(self, args)
    }

    pub fn run_query<T>(&self, id: &str, args: Option<Value>) -> Result<T, QueryError>
    where
        T: DeserializeOwned,
    {
        let value = self.run_query_json(id, args)?;
        serde_json::from_value(value)
            .map_err(|err| QueryError::new(format!("Failed to decode query result: {err}")))
    }

    pub fn core_specs(&self) -> &HashMap<String, NodeSpec> {
        self.registry.node_specs()
    }

    pub fn core_commands(&self) -> &HashMap<String, CommandSpec> {
        self.registry.commands()
    }
}

fn apply_op_to(doc: &mut Document, selection: &mut Selection, op: Op) -> Result<(), ApplyError> {
    match op {
        Op::InsertText { path, offset, text } => {
            let text_node = node_text_mut(doc, &path)?;
            let offset = clamp_to_char_boundary(&text_node.text, offset);
            text_node.text.insert_str(offset, &text);
            transform_selection_insert_text(selection, &path, offset, text.len());
        }
        Op::RemoveText { path, range } => {
            let text_node = node_text_mut(doc, &path)?;
            let start =
                clamp_to_char_boundary(&text_node.text, range.start.min(text_node.text.len()));
            let end = clamp_to_char_boundary(&text_node.text, range.end.min(text_node.text.len()));
            if start < end {
                text_node.text.replace_range(start..end, "");
                transform_selection_remove_text(selection, &path, start..end);
            }
        }
        Op::InsertNode { path, node } => {
            insert_node(doc, &path, node)?;
            transform_selection_insert_node(selection, &path);
        }
        Op::RemoveNode { path } => {
            remove_node(doc, &path)?;
            transform_selection_remove_node(selection, &path);
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PathError(pub String);

pub(crate) fn clamp_to_char_boundary(s: &str, mut ix: usize) -> usize {
    ix = ix.min(s.len());
    while ix > 0 && !s.is_char_boundary(ix) {
        ix -= 1;
    }
    ix
}

fn transform_selection_insert_text(
    selection: &mut Selection,
    path: &[usize],
    offset: usize,
    len: usize,
) {
    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path == path && point.offset >= offset {
            point.offset = point.offset.saturating_add(len);
        }
    }
}

fn transform_selection_remove_text(
    selection: &mut Selection,
    path: &[usize],
    range: std::ops::Range<usize>,
) {
    let removed_len = range.end.saturating_sub(range.start);
    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path != path || point.offset <= range.start {
            continue;
        }
        if point.offset >= range.end {
            point.offset = point.offset.saturating_sub(removed_len);
        } else {
            point.offset = range.start;
        }
    }
}

fn transform_selection_insert_node(selection: &mut Selection, path: &[usize]) {
    let Some((&index, parent_path)) = path.split_last() else {
        return;
    };

    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path.len() <= parent_path.len() || !point.path.starts_with(parent_path) {
            continue;
        }
        let depth = parent_path.len();
        if point.path[depth] >= index {
            point.path[depth] += 1;
        }
    }
}

fn transform_selection_remove_node(selection: &mut Selection, path: &[usize]) {
    let Some((&index, parent_path)) = path.split_last() else {
        return;
    };

    for point in [&mut selection.anchor, &mut selection.focus] {
        if point.path.len() <= parent_path.len() || !point.path.starts_with(parent_path) {
            continue;
        }
        let depth = parent_path.len();
        let ix = point.path[depth];
        if ix > index {
            point.path[depth] = ix - 1;
        } else if ix == index {
            // Point was inside the removed subtree.
            point.path.truncate(depth + 1);
            point.path[depth] = index.saturating_sub(1);
            point.offset = 0;
        }
    }
}

pub(crate) fn node_ref<'a>(doc: &'a Document, path: &[usize]) -> Option<&'a Node> {
    let (&first, rest) = path.split_first()?;
    let mut node = doc.children.get(first)?;
    for &ix in rest {
        node = match node {
            Node::Element(el) => el.children.get(ix)?,
            Node::Void(_) | Node::Text(_) => return None,
        };
    }
    Some(node)
}

pub(crate) fn element_ref<'a>(doc: &'a Document, path: &[usize]) -> Option<&'a ElementNode> {
    match node_ref(doc, path)? {
        Node::Element(el) => Some(el),
        Node::Void(_) | Node::Text(_) => None,
    }
}

fn children_mut<'a>(
    doc: &'a mut Document,
    parent_path: &[usize],
) -> Result<&'a mut Vec<Node>, PathError> {
    let mut children = &mut doc.children;
    for (depth, &ix) in parent_path.iter().enumerate() {
        let len = children.len();
        children = match children.get_mut(ix) {
            Some(Node::Element(el)) => &mut el.children,
            Some(Node::Void(_) | Node::Text(_)) => {
                return Err(PathError(format!("Non-container node at depth {depth}")));
            }
            None => {
                return Err(PathError(format!(
                    "Path out of bounds at depth {depth}: {ix} >= {len}"
                )));
            }
        };
    }
    Ok(children)
}

fn node_text_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Result<&'a mut TextNode, PathError> {
    let Some((&index, parent_path)) = path.split_last() else {
        return Err(PathError("Empty path".into()));
    };
    let children = children_mut(doc, parent_path)?;
    let len = children.len();
    match children.get_mut(index) {
        Some(Node::Text(t)) => Ok(t),
        Some(_) => Err(PathError("Expected Text node".into())),
        None => Err(PathError(format!(
            "Path out of bounds at depth {}: {index} >= {len}",
            parent_path.len()
        ))),
    }
}

fn insert_node(doc: &mut Document, path: &[usize], node: Node) -> Result<(), PathError> {
    let Some((&index, parent_path)) = path.split_last() else {
        return Err(PathError("Empty insert path".into()));
    };
    let children = children_mut(doc, parent_path)?;
    if index > children.len() {
        return Err(PathError(format!(
            "Insert index out of bounds: {index} > {}",
            children.len()
        )));
    }
    children.insert(index, node);
    Ok(())
}

fn remove_node(doc: &mut Document, path: &[usize]) -> Result<Node, PathError> {
    let Some((&index, parent_path)) = path.split_last() else {
        return Err(PathError("Empty remove path".into()));
    };
    let children = children_mut(doc, parent_path)?;
    if index >= children.len() {
        return Err(PathError(format!(
            "Remove index out of bounds: {index} >= {}",
            children.len()
        )));
    }
    Ok(children.remove(index))
}
