use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code_block::CodeBlockPlugin;
use crate::core::{Document, Editor, ElementNode, LINE_BREAK_KIND, Node, PARAGRAPH_KIND};
use crate::ops::Path;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct QueryError {
    message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type CommandHandler =
    Arc<dyn Fn(&mut Editor, Option<serde_json::Value>) -> Result<(), CommandError> + Send + Sync>;
pub type EnabledPredicate = Arc<dyn Fn(&Editor) -> bool + Send + Sync>;
pub type QueryHandler = Arc<
    dyn Fn(&Editor, Option<serde_json::Value>) -> Result<serde_json::Value, QueryError>
        + Send
        + Sync,
>;

#[derive(Clone)]
pub struct CommandSpec {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub hidden: bool,
    pub handler: CommandHandler,
    pub enabled: Option<EnabledPredicate>,
}

impl CommandSpec {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        handler: impl Fn(&mut Editor, Option<serde_json::Value>) -> Result<(), CommandError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            keywords: Vec::new(),
            hidden: false,
            handler: Arc::new(handler),
            enabled: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Commands without a predicate are always enabled.
    pub fn enabled_when(mut self, enabled: impl Fn(&Editor) -> bool + Send + Sync + 'static) -> Self {
        self.enabled = Some(Arc::new(enabled));
        self
    }

    pub fn is_enabled(&self, editor: &Editor) -> bool {
        self.enabled.as_ref().is_none_or(|enabled| enabled(editor))
    }
}

#[derive(Clone)]
pub struct QuerySpec {
    pub id: String,
    pub handler: QueryHandler,
}

impl QuerySpec {
    pub fn new(
        id: impl Into<String>,
        handler: impl Fn(&Editor, Option<serde_json::Value>) -> Result<serde_json::Value, QueryError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            handler: Arc::new(handler),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    Block,
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildConstraint {
    None,
    BlockOnly,
    InlineOnly,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    pub role: NodeRole,
    pub is_void: bool,
    pub children: ChildConstraint,
    /// Lines inside this block can be indented with the configured sequence.
    #[serde(default)]
    pub line_indent: bool,
}

pub trait PlatePlugin: Send + Sync {
    fn id(&self) -> &'static str;
    fn node_specs(&self) -> Vec<NodeSpec> {
        Vec::new()
    }
    fn commands(&self) -> Vec<CommandSpec> {
        Vec::new()
    }
    fn queries(&self) -> Vec<QuerySpec> {
        Vec::new()
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate node spec kind: {0}")]
    DuplicateKind(String),
    #[error("Duplicate command id: {0}")]
    DuplicateCommand(String),
    #[error("Duplicate query id: {0}")]
    DuplicateQuery(String),
}

#[derive(Default)]
pub struct PluginRegistry {
    node_specs: HashMap<String, NodeSpec>,
    commands: HashMap<String, CommandSpec>,
    queries: HashMap<String, QuerySpec>,
}

impl PluginRegistry {
    pub fn new(
        plugins: impl IntoIterator<Item = Box<dyn PlatePlugin>>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for plugin in plugins {
            registry.register_plugin(plugin)?;
        }
        Ok(registry)
    }

    pub fn core() -> Self {
        let plugins: Vec<Box<dyn PlatePlugin>> = vec![
            Box::new(CoreParagraphPlugin),
            Box::new(CoreLineBreakPlugin),
            Box::new(BlockquotePlugin),
        ];
        Self::new(plugins).expect("core registry must be valid")
    }

    pub fn richtext() -> Self {
        let plugins: Vec<Box<dyn PlatePlugin>> = vec![
            Box::new(CoreParagraphPlugin),
            Box::new(CoreLineBreakPlugin),
            Box::new(BlockquotePlugin),
            Box::new(CodeBlockPlugin),
        ];
        Self::new(plugins).expect("richtext registry must be valid")
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn PlatePlugin>) -> Result<(), RegistryError> {
        for spec in plugin.node_specs() {
            if self.node_specs.contains_key(&spec.kind) {
                return Err(RegistryError::DuplicateKind(spec.kind));
            }
            self.node_specs.insert(spec.kind.clone(), spec);
        }

        for cmd in plugin.commands() {
            if self.commands.contains_key(&cmd.id) {
                return Err(RegistryError::DuplicateCommand(cmd.id));
            }
            self.commands.insert(cmd.id.clone(), cmd);
        }

        for query in plugin.queries() {
            if self.queries.contains_key(&query.id) {
                return Err(RegistryError::DuplicateQuery(query.id));
            }
            self.queries.insert(query.id.clone(), query);
        }

        tracing::debug!(plugin = plugin.id(), "registered plugin");
        Ok(())
    }

    pub fn node_specs(&self) -> &HashMap<String, NodeSpec> {
        &self.node_specs
    }

    pub fn commands(&self) -> &HashMap<String, CommandSpec> {
        &self.commands
    }

    pub fn command(&self, id: &str) -> Option<CommandSpec> {
        self.commands.get(id).cloned()
    }

    pub fn queries(&self) -> &HashMap<String, QuerySpec> {
        &self.queries
    }

    pub fn query(&self, id: &str) -> Option<QuerySpec> {
        self.queries.get(id).cloned()
    }

    pub fn is_known_kind(&self, kind: &str) -> bool {
        self.node_specs.contains_key(kind)
    }

    pub fn is_line_indentable(&self, kind: &str) -> bool {
        self.node_specs.get(kind).is_some_and(|spec| spec.line_indent)
    }
}

struct CoreParagraphPlugin;

impl PlatePlugin for CoreParagraphPlugin {
    fn id(&self) -> &'static str {
        "core.paragraph"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: PARAGRAPH_KIND.to_string(),
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::InlineOnly,
            line_indent: false,
        }]
    }
}

struct CoreLineBreakPlugin;

impl PlatePlugin for CoreLineBreakPlugin {
    fn id(&self) -> &'static str {
        "core.line_break"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: LINE_BREAK_KIND.to_string(),
            role: NodeRole::Inline,
            is_void: true,
            children: ChildConstraint::None,
            line_indent: false,
        }]
    }
}

struct BlockquotePlugin;

impl PlatePlugin for BlockquotePlugin {
    fn id(&self) -> &'static str {
        "blockquote"
    }

    fn node_specs(&self) -> Vec<NodeSpec> {
        vec![NodeSpec {
            kind: "blockquote".to_string(),
            role: NodeRole::Block,
            is_void: false,
            children: ChildConstraint::BlockOnly,
            line_indent: false,
        }]
    }
}

pub(crate) struct TextBlock<'a> {
    pub(crate) path: Path,
    pub(crate) el: &'a ElementNode,
}

pub(crate) fn element_is_text_block(el: &ElementNode, registry: &PluginRegistry) -> bool {
    match registry
        .node_specs
        .get(&el.kind)
        .map(|s| s.children.clone())
    {
        Some(ChildConstraint::InlineOnly) => true,
        Some(_) => false,
        None => el
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(_) | Node::Void(_))),
    }
}

/// Every element holding inline content, in document order. Containers are
/// descended into rather than reported.
pub(crate) fn text_blocks_in_order<'a>(
    doc: &'a Document,
    registry: &PluginRegistry,
) -> Vec<TextBlock<'a>> {
    fn walk<'a>(
        nodes: &'a [Node],
        path: &mut Vec<usize>,
        registry: &PluginRegistry,
        out: &mut Vec<TextBlock<'a>>,
    ) {
        for (ix, node) in nodes.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };

            path.push(ix);

            if element_is_text_block(el, registry) {
                out.push(TextBlock {
                    path: path.clone(),
                    el,
                });
            } else {
                walk(&el.children, path, registry, out);
            }

            path.pop();
        }
    }

    let mut out = Vec::new();
    walk(&doc.children, &mut Vec::new(), registry, &mut out);
    out
}
