//! Ordered traversal of the tokens owned by a subtree.
//!
//! Every node visits its tokens in source order and brackets them with
//! `enter`/`leave`, so the writer, the validator's position lookups and the
//! round-trip checks all share one traversal.

use crate::token::Token;

use super::context::NodeKind;

/// What a token means to the node that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Keywords and punctuation.
    Syntax,
    /// The identifier that names the node.
    Name,
    /// A name referring to another definition.
    Reference,
    /// The keyword of a generic type (`sequence`, `record`, ...).
    Generic,
    /// The parent named after `:`.
    Inheritance,
    /// Name of an extended attribute.
    ExtendedAttributeName,
    /// A literal value.
    Value,
}

pub trait Visitor<'a> {
    fn token(&mut self, token: &'a Token, role: Role);

    fn enter(&mut self, _kind: NodeKind, _name: Option<&str>) {}

    fn leave(&mut self, _kind: NodeKind, _name: Option<&str>) {}
}

/// Source-order traversal of a node's tokens.
pub trait Walk {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>);

    /// All tokens of the subtree, in source order.
    fn tokens(&self) -> Vec<&Token> {
        let mut collector = TokenCollector::default();
        self.walk(&mut collector);
        collector.tokens
    }

    /// Exact source text of the subtree, trivia included.
    fn source_text(&self) -> String {
        self.tokens().into_iter().map(Token::source_text).collect()
    }
}

impl<T: Walk> Walk for Vec<T> {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        for item in self {
            item.walk(visitor);
        }
    }
}

impl<T: Walk> Walk for Option<T> {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        if let Some(item) = self {
            item.walk(visitor);
        }
    }
}

#[derive(Debug, Default)]
pub struct TokenCollector<'a> {
    pub tokens: Vec<&'a Token>,
}

impl<'a> Visitor<'a> for TokenCollector<'a> {
    fn token(&mut self, token: &'a Token, _role: Role) {
        self.tokens.push(token);
    }
}

pub(crate) fn visit<'a>(visitor: &mut dyn Visitor<'a>, token: &'a Token, role: Role) {
    visitor.token(token, role);
}

pub(crate) fn visit_opt<'a>(visitor: &mut dyn Visitor<'a>, token: &'a Option<Token>, role: Role) {
    if let Some(token) = token {
        visitor.token(token, role);
    }
}
