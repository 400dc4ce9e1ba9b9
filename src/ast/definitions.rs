//! Top-level definitions and the small nodes they are built from.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::argument::{unquote, Argument};
use super::context::{Link, Node, NodeContext, NodeKind};
use super::extended_attributes::ExtendedAttributes;
use super::types::IdlType;
use super::walk::{visit, visit_opt, Role, Visitor, Walk};
use super::Member;
use crate::token::Token;

// ============================================================================
// CONTAINER
// ============================================================================

/// The five brace-delimited definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    Interface,
    Mixin,
    Namespace,
    Dictionary,
    CallbackInterface,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 5] = [
        ContainerKind::Interface,
        ContainerKind::Mixin,
        ContainerKind::Namespace,
        ContainerKind::Dictionary,
        ContainerKind::CallbackInterface,
    ];

    pub fn node_kind(self) -> NodeKind {
        match self {
            ContainerKind::Interface => NodeKind::Interface,
            ContainerKind::Mixin => NodeKind::InterfaceMixin,
            ContainerKind::Namespace => NodeKind::Namespace,
            ContainerKind::Dictionary => NodeKind::Dictionary,
            ContainerKind::CallbackInterface => NodeKind::CallbackInterface,
        }
    }

    /// Whether a non-partial definition of this kind may name a parent.
    pub fn is_inheritable(self) -> bool {
        matches!(self, ContainerKind::Interface | ContainerKind::Dictionary)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.node_kind().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerTokens {
    pub callback: Option<Token>,
    pub partial: Option<Token>,
    /// `interface`, `namespace` or `dictionary`.
    pub base: Token,
    pub mixin: Option<Token>,
    pub name: Token,
    pub colon: Option<Token>,
    pub inheritance: Option<Token>,
    pub open: Token,
    pub close: Token,
    pub termination: Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct Container {
    pub kind: ContainerKind,
    pub tokens: ContainerTokens,
    pub ext_attrs: ExtendedAttributes,
    pub members: Vec<Member>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Container {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }

    pub fn partial(&self) -> bool {
        self.tokens.partial.is_some()
    }

    pub fn inheritance(&self) -> Option<&str> {
        self.tokens.inheritance.as_ref().map(Token::unescaped)
    }

    /// First token after the extended attributes.
    pub fn leading_token_mut(&mut self) -> &mut Token {
        let tokens = &mut self.tokens;
        tokens
            .callback
            .as_mut()
            .or(tokens.partial.as_mut())
            .unwrap_or(&mut tokens.base)
    }
}

impl Node for Container {
    fn kind(&self) -> NodeKind {
        self.kind.node_kind()
    }

    fn name(&self) -> Option<&str> {
        Some(Container::name(self))
    }

    fn is_partial(&self) -> bool {
        self.partial()
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Container {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        let kind = self.kind.node_kind();
        visitor.enter(kind, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit_opt(visitor, &self.tokens.callback, Role::Syntax);
        visit_opt(visitor, &self.tokens.partial, Role::Syntax);
        visit(visitor, &self.tokens.base, Role::Syntax);
        visit_opt(visitor, &self.tokens.mixin, Role::Syntax);
        visit(visitor, &self.tokens.name, Role::Name);
        visit_opt(visitor, &self.tokens.colon, Role::Syntax);
        visit_opt(visitor, &self.tokens.inheritance, Role::Inheritance);
        visit(visitor, &self.tokens.open, Role::Syntax);
        self.members.walk(visitor);
        visit(visitor, &self.tokens.close, Role::Syntax);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(kind, Some(self.name()));
    }
}

impl Link for Container {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.members.link(me);
    }
}

// ============================================================================
// TYPEDEF
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedefTokens {
    pub base: Token,
    pub name: Token,
    pub termination: Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct Typedef {
    pub tokens: TypedefTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: IdlType,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Typedef {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }
}

impl Node for Typedef {
    fn kind(&self) -> NodeKind {
        NodeKind::Typedef
    }

    fn name(&self) -> Option<&str> {
        Some(Typedef::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Typedef {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Typedef, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit(visitor, &self.tokens.base, Role::Syntax);
        self.idl_type.walk(visitor);
        visit(visitor, &self.tokens.name, Role::Name);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Typedef, Some(self.name()));
    }
}

impl Link for Typedef {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me);
    }
}

// ============================================================================
// CALLBACK FUNCTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallbackTokens {
    pub base: Token,
    pub name: Token,
    pub assign: Token,
    pub open: Token,
    pub close: Token,
    pub termination: Token,
}

/// `callback Name = ReturnType (arguments);`
#[derive(Debug, Clone, Serialize)]
pub struct CallbackFunction {
    pub tokens: CallbackTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: IdlType,
    pub arguments: Vec<Argument>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl CallbackFunction {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }
}

impl Node for CallbackFunction {
    fn kind(&self) -> NodeKind {
        NodeKind::Callback
    }

    fn name(&self) -> Option<&str> {
        Some(CallbackFunction::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for CallbackFunction {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Callback, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit(visitor, &self.tokens.base, Role::Syntax);
        visit(visitor, &self.tokens.name, Role::Name);
        visit(visitor, &self.tokens.assign, Role::Syntax);
        self.idl_type.walk(visitor);
        visit(visitor, &self.tokens.open, Role::Syntax);
        self.arguments.walk(visitor);
        visit(visitor, &self.tokens.close, Role::Syntax);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Callback, Some(self.name()));
    }
}

impl Link for CallbackFunction {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me.clone());
        self.arguments.link(me);
    }
}

// ============================================================================
// ENUM
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumTokens {
    pub base: Token,
    pub name: Token,
    pub open: Token,
    pub close: Token,
    pub termination: Token,
}

#[derive(Debug, Clone, Serialize)]
pub struct Enum {
    pub tokens: EnumTokens,
    pub ext_attrs: ExtendedAttributes,
    pub values: Vec<EnumValue>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Enum {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }
}

impl Node for Enum {
    fn kind(&self) -> NodeKind {
        NodeKind::Enum
    }

    fn name(&self) -> Option<&str> {
        Some(Enum::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Enum {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Enum, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit(visitor, &self.tokens.base, Role::Syntax);
        visit(visitor, &self.tokens.name, Role::Name);
        visit(visitor, &self.tokens.open, Role::Syntax);
        self.values.walk(visitor);
        visit(visitor, &self.tokens.close, Role::Syntax);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Enum, Some(self.name()));
    }
}

impl Link for Enum {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.values.link(me);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValueTokens {
    pub value: Token,
    pub separator: Option<Token>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumValue {
    pub tokens: EnumValueTokens,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl EnumValue {
    /// The string without its quotes.
    pub fn value(&self) -> &str {
        unquote(&self.tokens.value.value)
    }
}

impl Node for EnumValue {
    fn kind(&self) -> NodeKind {
        NodeKind::EnumValue
    }

    fn name(&self) -> Option<&str> {
        Some(self.value())
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for EnumValue {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::EnumValue, Some(self.value()));
        visit(visitor, &self.tokens.value, Role::Value);
        visit_opt(visitor, &self.tokens.separator, Role::Syntax);
        visitor.leave(NodeKind::EnumValue, Some(self.value()));
    }
}

impl Link for EnumValue {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
    }
}

// ============================================================================
// INCLUDES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludesTokens {
    pub target: Token,
    pub includes: Token,
    pub mixin: Token,
    pub termination: Token,
}

/// `Target includes Mixin;`
#[derive(Debug, Clone, Serialize)]
pub struct Includes {
    pub tokens: IncludesTokens,
    pub ext_attrs: ExtendedAttributes,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Includes {
    pub fn target(&self) -> &str {
        self.tokens.target.unescaped()
    }

    pub fn mixin(&self) -> &str {
        self.tokens.mixin.unescaped()
    }
}

impl Node for Includes {
    fn kind(&self) -> NodeKind {
        NodeKind::Includes
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Includes {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Includes, None);
        self.ext_attrs.walk(visitor);
        visit(visitor, &self.tokens.target, Role::Reference);
        visit(visitor, &self.tokens.includes, Role::Syntax);
        visit(visitor, &self.tokens.mixin, Role::Reference);
        visit(visitor, &self.tokens.termination, Role::Syntax);
        visitor.leave(NodeKind::Includes, None);
    }
}

impl Link for Includes {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me);
    }
}

// ============================================================================
// END OF INPUT
// ============================================================================

/// Holds the trailing trivia when parsing in concrete mode.
#[derive(Debug, Clone, Serialize)]
pub struct Eof {
    pub value: Token,
}

impl Node for Eof {
    fn kind(&self) -> NodeKind {
        NodeKind::Eof
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        None
    }
}

impl Walk for Eof {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visit(visitor, &self.value, Role::Syntax);
    }
}

// ============================================================================
// WRAPPED TOKEN
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedTokenTokens {
    pub value: Token,
    pub separator: Option<Token>,
}

/// A single token in a comma separated list, such as `(Window, Worker)`.
#[derive(Debug, Clone, Serialize)]
pub struct WrappedToken {
    pub tokens: WrappedTokenTokens,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl WrappedToken {
    pub fn new(value: Token) -> Self {
        Self {
            tokens: WrappedTokenTokens { value, separator: None },
            parent: None,
        }
    }

    pub fn value(&self) -> &str {
        self.tokens.value.unescaped()
    }
}

impl Node for WrappedToken {
    fn kind(&self) -> NodeKind {
        NodeKind::Wrapped
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for WrappedToken {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visit(visitor, &self.tokens.value, Role::Reference);
        visit_opt(visitor, &self.tokens.separator, Role::Syntax);
    }
}

impl Link for WrappedToken {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
    }
}

// ============================================================================
// CUSTOM
// ============================================================================

/// Node produced by an extension production.
///
/// Tokens are stored in source order, each tagged with a role name. The
/// token tagged `"name"`, if any, names the node.
#[derive(Debug, Clone, Serialize)]
pub struct CustomNode {
    pub kind: &'static str,
    pub tokens: Vec<(&'static str, Token)>,
    pub ext_attrs: ExtendedAttributes,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl CustomNode {
    pub fn new(kind: &'static str, tokens: Vec<(&'static str, Token)>) -> Self {
        Self {
            kind,
            tokens,
            ext_attrs: ExtendedAttributes::default(),
            parent: None,
        }
    }

    pub fn token(&self, role: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|(tag, _)| *tag == role)
            .map(|(_, token)| token)
    }
}

impl Node for CustomNode {
    fn kind(&self) -> NodeKind {
        NodeKind::Custom(self.kind)
    }

    fn name(&self) -> Option<&str> {
        self.token("name").map(Token::unescaped)
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for CustomNode {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        let kind = NodeKind::Custom(self.kind);
        visitor.enter(kind, Node::name(self));
        self.ext_attrs.walk(visitor);
        for (tag, token) in &self.tokens {
            let role = if *tag == "name" { Role::Name } else { Role::Syntax };
            visit(visitor, token, role);
        }
        visitor.leave(kind, Node::name(self));
    }
}

impl Link for CustomNode {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me);
    }
}
