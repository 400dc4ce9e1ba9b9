//! Members of interfaces, mixins, namespaces, callback interfaces and
//! dictionaries.

use serde::Serialize;
use std::sync::Arc;

use super::argument::{Argument, ConstValue, DefaultValue};
use super::context::{Link, Node, NodeContext, NodeKind};
use super::extended_attributes::ExtendedAttributes;
use super::types::IdlType;
use super::walk::{visit, visit_opt, Role, Visitor, Walk};
use crate::token::Token;

fn special_of(token: &Option<Token>) -> &str {
    token.as_ref().map_or("", |t| t.value.as_str())
}

// ============================================================================
// ATTRIBUTE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeTokens {
    /// `static`, `stringifier` or `inherit`.
    pub special: Option<Token>,
    pub readonly: Option<Token>,
    pub base: Token,
    pub name: Token,
    pub termination: Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub tokens: AttributeTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: IdlType,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Attribute {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }

    pub fn special(&self) -> &str {
        special_of(&self.tokens.special)
    }

    pub fn readonly(&self) -> bool {
        self.tokens.readonly.is_some()
    }
}

impl Node for Attribute {
    fn kind(&self) -> NodeKind {
        NodeKind::Attribute
    }

    fn name(&self) -> Option<&str> {
        Some(Attribute::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Attribute {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Attribute, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit_opt(visitor, &self.tokens.special, Role::Syntax);
        visit_opt(visitor, &self.tokens.readonly, Role::Syntax);
        visit(visitor, &self.tokens.base, Role::Syntax);
        self.idl_type.walk(visitor);
        visit(visitor, &self.tokens.name, Role::Name);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Attribute, Some(self.name()));
    }
}

impl Link for Attribute {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me);
    }
}

// ============================================================================
// OPERATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationTokens {
    /// `static`, `stringifier`, `getter`, `setter` or `deleter`.
    pub special: Option<Token>,
    pub name: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub termination: Token,
}

/// An operation. `stringifier;` has neither return type nor argument list.
#[derive(Debug, Clone, Serialize)]
pub struct Operation {
    pub tokens: OperationTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: Option<IdlType>,
    pub arguments: Vec<Argument>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Operation {
    /// `""` for anonymous operations.
    pub fn name(&self) -> &str {
        self.tokens.name.as_ref().map_or("", Token::unescaped)
    }

    pub fn special(&self) -> &str {
        special_of(&self.tokens.special)
    }

    pub fn is_static(&self) -> bool {
        self.special() == "static"
    }
}

impl Node for Operation {
    fn kind(&self) -> NodeKind {
        NodeKind::Operation
    }

    fn name(&self) -> Option<&str> {
        self.tokens.name.as_ref().map(Token::unescaped)
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Operation {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        let name = Node::name(self);
        visitor.enter(NodeKind::Operation, name);
        self.ext_attrs.walk(visitor);
        visit_opt(visitor, &self.tokens.special, Role::Syntax);
        self.idl_type.walk(visitor);
        visit_opt(visitor, &self.tokens.name, Role::Name);
        visit_opt(visitor, &self.tokens.open, Role::Syntax);
        self.arguments.walk(visitor);
        visit_opt(visitor, &self.tokens.close, Role::Syntax);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Operation, name);
    }
}

impl Link for Operation {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me.clone());
        self.arguments.link(me);
    }
}

// ============================================================================
// CONSTANT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantTokens {
    pub base: Token,
    pub name: Token,
    pub assign: Token,
    pub value: Token,
    pub termination: Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct Constant {
    pub tokens: ConstantTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: IdlType,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Constant {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }

    pub fn value(&self) -> ConstValue {
        ConstValue::from_token(&self.tokens.value)
    }
}

impl Node for Constant {
    fn kind(&self) -> NodeKind {
        NodeKind::Constant
    }

    fn name(&self) -> Option<&str> {
        Some(Constant::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Constant {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Constant, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit(visitor, &self.tokens.base, Role::Syntax);
        self.idl_type.walk(visitor);
        visit(visitor, &self.tokens.name, Role::Name);
        visit(visitor, &self.tokens.assign, Role::Syntax);
        visit(visitor, &self.tokens.value, Role::Value);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Constant, Some(self.name()));
    }
}

impl Link for Constant {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me);
    }
}

// ============================================================================
// CONSTRUCTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructorTokens {
    pub base: Token,
    pub open: Token,
    pub close: Token,
    pub termination: Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct Constructor {
    pub tokens: ConstructorTokens,
    pub ext_attrs: ExtendedAttributes,
    pub arguments: Vec<Argument>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Node for Constructor {
    fn kind(&self) -> NodeKind {
        NodeKind::Constructor
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Constructor {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Constructor, None);
        self.ext_attrs.walk(visitor);
        visit(visitor, &self.tokens.base, Role::Syntax);
        visit(visitor, &self.tokens.open, Role::Syntax);
        self.arguments.walk(visitor);
        visit(visitor, &self.tokens.close, Role::Syntax);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Constructor, None);
    }
}

impl Link for Constructor {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.arguments.link(me);
    }
}

// ============================================================================
// ITERABLE-LIKE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IterableKind {
    Iterable,
    /// The `async_iterable` keyword. `async iterable` is an `Iterable` with
    /// the `async` token set.
    AsyncIterable,
    LegacyIterable,
    Maplike,
    Setlike,
}

impl IterableKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "iterable" => Some(IterableKind::Iterable),
            "async_iterable" => Some(IterableKind::AsyncIterable),
            "legacyiterable" => Some(IterableKind::LegacyIterable),
            "maplike" => Some(IterableKind::Maplike),
            "setlike" => Some(IterableKind::Setlike),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IterableKind::Iterable => "iterable",
            IterableKind::AsyncIterable => "async_iterable",
            IterableKind::LegacyIterable => "legacyiterable",
            IterableKind::Maplike => "maplike",
            IterableKind::Setlike => "setlike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterableLikeTokens {
    pub readonly: Option<Token>,
    #[serde(rename = "async")]
    pub async_: Option<Token>,
    pub base: Token,
    pub open: Token,
    pub close: Token,
    /// Argument list of `async iterable<T>(...)`.
    pub args_open: Option<Token>,
    pub args_close: Option<Token>,
    pub termination: Token,
}

/// `iterable<...>`, `maplike<...>`, `setlike<...>` and their variants.
#[derive(Debug, Clone, Serialize)]
pub struct IterableLike {
    pub kind: IterableKind,
    pub tokens: IterableLikeTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_types: Vec<IdlType>,
    pub arguments: Vec<Argument>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl IterableLike {
    pub fn is_async(&self) -> bool {
        self.tokens.async_.is_some() || self.kind == IterableKind::AsyncIterable
    }

    pub fn readonly(&self) -> bool {
        self.tokens.readonly.is_some()
    }
}

impl Node for IterableLike {
    fn kind(&self) -> NodeKind {
        NodeKind::IterableLike(self.kind)
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for IterableLike {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(Node::kind(self), None);
        self.ext_attrs.walk(visitor);
        visit_opt(visitor, &self.tokens.readonly, Role::Syntax);
        visit_opt(visitor, &self.tokens.async_, Role::Syntax);
        visit(visitor, &self.tokens.base, Role::Syntax);
        visit(visitor, &self.tokens.open, Role::Syntax);
        self.idl_types.walk(visitor);
        visit(visitor, &self.tokens.close, Role::Syntax);
        visit_opt(visitor, &self.tokens.args_open, Role::Syntax);
        self.arguments.walk(visitor);
        visit_opt(visitor, &self.tokens.args_close, Role::Syntax);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(Node::kind(self), None);
    }
}

impl Link for IterableLike {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_types.link(me.clone());
        self.arguments.link(me);
    }
}

// ============================================================================
// FIELD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldTokens {
    pub required: Option<Token>,
    pub name: Token,
    pub termination: Token,
}

/// A dictionary member.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub tokens: FieldTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: IdlType,
    pub default: Option<DefaultValue>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Field {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }

    pub fn required(&self) -> bool {
        self.tokens.required.is_some()
    }
}

impl Node for Field {
    fn kind(&self) -> NodeKind {
        NodeKind::Field
    }

    fn name(&self) -> Option<&str> {
        Some(Field::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Field {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Field, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit_opt(visitor, &self.tokens.required, Role::Syntax);
        self.idl_type.walk(visitor);
        visit(visitor, &self.tokens.name, Role::Name);
        self.default.walk(visitor);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Field, Some(self.name()));
    }
}

impl Link for Field {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me);
    }
}
