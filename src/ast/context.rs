//! Node identity and the upward links between nodes.
//!
//! The tree owns its children directly. Parent references are not back
//! pointers into the tree: every node holds an `Arc<NodeContext>` describing
//! its parent (kind, name, partial flag) and, through that context, the whole
//! ancestor chain. Contexts are rebuilt top-down by [`Link::link`] after
//! parsing and after any structural edit.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::walk::Walk;
use crate::ast::IterableKind;

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Interface,
    InterfaceMixin,
    CallbackInterface,
    Namespace,
    Dictionary,
    Typedef,
    Callback,
    Enum,
    EnumValue,
    Includes,
    Attribute,
    Operation,
    Constant,
    Constructor,
    IterableLike(IterableKind),
    Field,
    Argument,
    Type,
    ExtendedAttribute,
    Wrapped,
    Eof,
    /// Node produced by an extension production.
    Custom(&'static str),
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Interface => "interface",
            NodeKind::InterfaceMixin => "interface mixin",
            NodeKind::CallbackInterface => "callback interface",
            NodeKind::Namespace => "namespace",
            NodeKind::Dictionary => "dictionary",
            NodeKind::Typedef => "typedef",
            NodeKind::Callback => "callback",
            NodeKind::Enum => "enum",
            NodeKind::EnumValue => "enum-value",
            NodeKind::Includes => "includes",
            NodeKind::Attribute => "attribute",
            NodeKind::Operation => "operation",
            NodeKind::Constant => "const",
            NodeKind::Constructor => "constructor",
            NodeKind::IterableLike(kind) => kind.as_str(),
            NodeKind::Field => "field",
            NodeKind::Argument => "argument",
            NodeKind::Type => "type",
            NodeKind::ExtendedAttribute => "extended-attribute",
            NodeKind::Wrapped => "wrapped-token",
            NodeKind::Eof => "eof",
            NodeKind::Custom(kind) => kind,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node's identity plus the chain of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeContext {
    pub kind: NodeKind,
    /// Unescaped name, when the node has one.
    pub name: Option<String>,
    pub partial: bool,
    pub parent: Option<Arc<NodeContext>>,
}

impl NodeContext {
    pub fn new(kind: NodeKind, name: Option<String>, partial: bool) -> Self {
        Self {
            kind,
            name,
            partial,
            parent: None,
        }
    }

    /// Iterates from this context up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &NodeContext> {
        std::iter::successors(Some(self), |context| context.parent.as_deref())
    }

    /// `interface A -> operation f`, root first.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .ancestors()
            .map(|context| match &context.name {
                Some(name) => format!("{} {}", context.kind, name),
                None => context.kind.to_string(),
            })
            .collect();
        parts.reverse();
        parts.join(" -> ")
    }
}

/// Shared behaviour of every tree node.
pub trait Node: Walk {
    fn kind(&self) -> NodeKind;

    fn name(&self) -> Option<&str> {
        None
    }

    fn is_partial(&self) -> bool {
        false
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>>;

    /// The enclosing node, `None` for top-level definitions.
    fn parent(&self) -> Option<&NodeContext> {
        self.parent_link().map(|parent| &**parent)
    }

    /// This node's own context, linked to its ancestors.
    fn context(&self) -> NodeContext {
        NodeContext {
            kind: self.kind(),
            name: self.name().map(str::to_owned),
            partial: self.is_partial(),
            parent: self.parent_link().cloned(),
        }
    }
}

/// Rebuilds parent contexts for a subtree.
pub(crate) trait Link {
    fn link(&mut self, parent: Option<Arc<NodeContext>>);
}

impl<T: Link> Link for Vec<T> {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        for item in self {
            item.link(parent.clone());
        }
    }
}

impl<T: Link> Link for Option<T> {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        if let Some(item) = self {
            item.link(parent);
        }
    }
}
