use serde::Serialize;
use std::sync::Arc;

use super::argument::Argument;
use super::context::{Link, Node, NodeContext, NodeKind};
use super::definitions::WrappedToken;
use super::walk::{visit, visit_opt, Role, Visitor, Walk};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtendedAttributesTokens {
    pub open: Option<Token>,
    pub close: Option<Token>,
}

/// A bracketed `[...]` list. Empty lists own no tokens.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtendedAttributes {
    pub tokens: ExtendedAttributesTokens,
    pub items: Vec<ExtendedAttribute>,
}

impl ExtendedAttributes {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtendedAttribute> {
        self.items.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ExtendedAttribute> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name() == name)
    }

    /// Inserts `item` in front of the existing items, keeping the list
    /// separators and spacing well formed. The list must already have brackets.
    pub fn prepend(&mut self, mut item: ExtendedAttribute) {
        if let Some(first) = self.items.first_mut() {
            if !first.tokens.name.trivia.starts_with(char::is_whitespace) {
                first.tokens.name.trivia.insert(0, ' ');
            }
            item.tokens.separator = Some(Token::synthetic(TokenKind::Punctuation, ",", ""));
        }
        self.items.insert(0, item);
    }

    /// Removes the item at `index`, dropping the brackets once nothing is left.
    pub fn remove(&mut self, index: usize) -> ExtendedAttribute {
        let removed = self.items.remove(index);
        if self.items.is_empty() {
            self.tokens = ExtendedAttributesTokens::default();
        } else if index == self.items.len() {
            self.items[index - 1].tokens.separator = None;
        } else if self.items[index].tokens.name.trivia.trim().is_empty() {
            self.items[index].tokens.name.trivia = removed.tokens.name.trivia.clone();
        }
        removed
    }
}

impl Walk for ExtendedAttributes {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visit_opt(visitor, &self.tokens.open, Role::Syntax);
        self.items.walk(visitor);
        visit_opt(visitor, &self.tokens.close, Role::Syntax);
    }
}

impl Link for ExtendedAttributes {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.items.link(parent);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedAttributeTokens {
    pub name: Token,
    pub separator: Option<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterTokens {
    pub assign: Option<Token>,
    pub asterisk: Option<Token>,
    pub secondary_name: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
}

/// Everything after an extended attribute's name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtendedAttributeParameters {
    pub tokens: ParameterTokens,
    /// `[X=(a,b)]`: identifiers, strings or numbers.
    pub list: Vec<WrappedToken>,
    /// `[X(long a)]` or `[X=Y(long a)]`.
    pub arguments: Vec<Argument>,
}

impl ExtendedAttributeParameters {
    /// True for the `[X=(a,b)]` shape.
    pub fn rhs_is_list(&self) -> bool {
        self.tokens.assign.is_some()
            && self.tokens.asterisk.is_none()
            && self.tokens.secondary_name.is_none()
    }
}

/// Right-hand side of `[Name=...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Rhs {
    Wildcard,
    Single(TokenKind, String),
    List(TokenKind, Vec<String>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtendedAttribute {
    pub tokens: ExtendedAttributeTokens,
    pub params: ExtendedAttributeParameters,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl ExtendedAttribute {
    /// Extended attribute names are compared verbatim, without unescaping.
    pub fn name(&self) -> &str {
        &self.tokens.name.value
    }

    pub fn rhs(&self) -> Option<Rhs> {
        let tokens = &self.params.tokens;
        tokens.assign.as_ref()?;
        if tokens.asterisk.is_some() {
            return Some(Rhs::Wildcard);
        }
        if let Some(secondary) = &tokens.secondary_name {
            return Some(Rhs::Single(secondary.kind, rhs_value(secondary)));
        }
        let kind = self
            .params
            .list
            .first()
            .map_or(TokenKind::Identifier, |item| item.tokens.value.kind);
        Some(Rhs::List(
            kind,
            self.params.list.iter().map(|item| rhs_value(&item.tokens.value)).collect(),
        ))
    }

    /// Arguments of `[X(...)]`; empty for the list form.
    pub fn arguments(&self) -> &[Argument] {
        if self.params.rhs_is_list() {
            &[]
        } else {
            &self.params.arguments
        }
    }

    /// Global names of an `[Exposed]` value, `*` for the wildcard form.
    pub fn exposure(&self) -> Option<Vec<String>> {
        match self.rhs()? {
            Rhs::Wildcard => Some(vec!["*".to_owned()]),
            Rhs::Single(TokenKind::Identifier, name) => Some(vec![name]),
            Rhs::List(TokenKind::Identifier, names) => Some(names),
            _ => None,
        }
    }
}

fn rhs_value(token: &Token) -> String {
    if token.kind == TokenKind::Identifier {
        token.unescaped().to_owned()
    } else {
        token.value.clone()
    }
}

impl Node for ExtendedAttribute {
    fn kind(&self) -> NodeKind {
        NodeKind::ExtendedAttribute
    }

    fn name(&self) -> Option<&str> {
        Some(ExtendedAttribute::name(self))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for ExtendedAttribute {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::ExtendedAttribute, Some(self.name()));
        visit(visitor, &self.tokens.name, Role::ExtendedAttributeName);
        let params = &self.params.tokens;
        visit_opt(visitor, &params.assign, Role::Syntax);
        visit_opt(visitor, &params.asterisk, Role::Syntax);
        let secondary_role = match &params.secondary_name {
            Some(token) if token.kind == TokenKind::Identifier => Role::Reference,
            _ => Role::Value,
        };
        visit_opt(visitor, &params.secondary_name, secondary_role);
        visit_opt(visitor, &params.open, Role::Syntax);
        self.params.list.walk(visitor);
        self.params.arguments.walk(visitor);
        visit_opt(visitor, &params.close, Role::Syntax);
        visit_opt(visitor, &self.tokens.separator, Role::Syntax);
        visitor.leave(NodeKind::ExtendedAttribute, Some(self.name()));
    }
}

impl Link for ExtendedAttribute {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.params.list.link(me.clone());
        self.params.arguments.link(me);
    }
}
