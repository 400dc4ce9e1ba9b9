use serde::Serialize;
use std::sync::Arc;

use super::context::{Link, Node, NodeContext, NodeKind};
use super::extended_attributes::ExtendedAttributes;
use super::types::IdlType;
use super::walk::{visit, visit_opt, Role, Visitor, Walk};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentTokens {
    pub optional: Option<Token>,
    pub variadic: Option<Token>,
    pub name: Token,
    pub separator: Option<Token>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Argument {
    pub tokens: ArgumentTokens,
    pub ext_attrs: ExtendedAttributes,
    pub idl_type: IdlType,
    pub default: Option<DefaultValue>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl Argument {
    pub fn name(&self) -> &str {
        self.tokens.name.unescaped()
    }

    pub fn optional(&self) -> bool {
        self.tokens.optional.is_some()
    }

    pub fn variadic(&self) -> bool {
        self.tokens.variadic.is_some()
    }
}

impl Node for Argument {
    fn kind(&self) -> NodeKind {
        NodeKind::Argument
    }

    fn name(&self) -> Option<&str> {
        Some(Argument::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for Argument {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Argument, Some(self.name()));
        self.ext_attrs.walk(visitor);
        visit_opt(visitor, &self.tokens.optional, Role::Syntax);
        self.idl_type.walk(visitor);
        visit_opt(visitor, &self.tokens.variadic, Role::Syntax);
        visit(visitor, &self.tokens.name, Role::Name);
        self.default.walk(visitor);
        visit_opt(visitor, &self.tokens.separator, Role::Syntax);
        visitor.leave(NodeKind::Argument, Some(self.name()));
    }
}

impl Link for Argument {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.idl_type.link(me);
    }
}

/// `= value` after an optional argument or a dictionary member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultValue {
    pub assign: Token,
    /// One token, or two for `[]` and `{}`.
    pub expression: Vec<Token>,
}

impl DefaultValue {
    pub fn value(&self) -> ConstValue {
        self.expression
            .first()
            .map_or(ConstValue::Null, ConstValue::from_token)
    }
}

impl Walk for DefaultValue {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visit(visitor, &self.assign, Role::Syntax);
        for token in &self.expression {
            visit(visitor, token, Role::Value);
        }
    }
}

/// Interpreted literal of a constant or default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum ConstValue {
    /// Kept as written so no precision is lost.
    Number(String),
    /// Contents without the quotes.
    String(String),
    Boolean(bool),
    Null,
    Infinity { negative: bool },
    NaN,
    /// `[]`
    Sequence,
    /// `{}`
    Dictionary,
}

impl ConstValue {
    pub fn from_token(token: &Token) -> Self {
        match (token.kind, token.value.as_str()) {
            (TokenKind::Float | TokenKind::Integer, value) => ConstValue::Number(value.to_owned()),
            (TokenKind::String, value) => ConstValue::String(unquote(value).to_owned()),
            (_, "true") => ConstValue::Boolean(true),
            (_, "false") => ConstValue::Boolean(false),
            (_, "Infinity") => ConstValue::Infinity { negative: false },
            (_, "-Infinity") => ConstValue::Infinity { negative: true },
            (_, "NaN") => ConstValue::NaN,
            (_, "[") => ConstValue::Sequence,
            (_, "{") => ConstValue::Dictionary,
            _ => ConstValue::Null,
        }
    }
}

/// Strips the surrounding double quotes of a string token.
pub fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}
