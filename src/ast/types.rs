use serde::Serialize;
use std::sync::Arc;

use super::context::{Link, Node, NodeContext, NodeKind};
use super::extended_attributes::ExtendedAttributes;
use super::walk::{visit_opt, Role, Visitor, Walk};
use crate::token::Token;

/// Where a type appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeContext {
    ReturnType,
    ArgumentType,
    AttributeType,
    ConstType,
    TypedefType,
    DictionaryType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeTokens {
    /// `unsigned` or `unrestricted`.
    pub prefix: Option<Token>,
    /// Type name or generic keyword. Absent for unions.
    pub base: Option<Token>,
    /// Second `long` of `long long`.
    pub postfix: Option<Token>,
    pub open: Option<Token>,
    pub close: Option<Token>,
    pub nullable: Option<Token>,
    /// `,` after a record key or `or` between union members.
    pub separator: Option<Token>,
}

/// A type: named, generic or union.
#[derive(Debug, Clone, Serialize)]
pub struct IdlType {
    pub tokens: TypeTokens,
    pub ext_attrs: ExtendedAttributes,
    pub subtypes: Vec<IdlType>,
    pub context: Option<TypeContext>,
    #[serde(skip)]
    pub(crate) parent: Option<Arc<NodeContext>>,
}

impl IdlType {
    pub fn new(tokens: TypeTokens) -> Self {
        Self {
            tokens,
            ext_attrs: ExtendedAttributes::default(),
            subtypes: Vec::new(),
            context: None,
            parent: None,
        }
    }

    pub fn is_union(&self) -> bool {
        self.tokens.base.is_none() && !self.subtypes.is_empty()
    }

    /// The generic keyword, or `""` for named types and unions.
    pub fn generic(&self) -> &str {
        match &self.tokens.base {
            Some(base) if !self.subtypes.is_empty() => &base.value,
            _ => "",
        }
    }

    pub fn nullable(&self) -> bool {
        self.tokens.nullable.is_some()
    }

    /// Unescaped type name (`unsigned long long`, `DOMString`, `Foo`).
    /// `None` for generics and unions, whose meaning lives in `subtypes`.
    pub fn name(&self) -> Option<String> {
        if !self.subtypes.is_empty() {
            return None;
        }
        let words: Vec<&str> = [&self.tokens.prefix, &self.tokens.base, &self.tokens.postfix]
            .into_iter()
            .flatten()
            .map(Token::unescaped)
            .collect();
        (!words.is_empty()).then(|| words.join(" "))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name().as_deref() == Some(name)
    }

    /// First token of the type itself, extended attributes included.
    pub fn first_token_mut(&mut self) -> Option<&mut Token> {
        if self.ext_attrs.tokens.open.is_some() {
            return self.ext_attrs.tokens.open.as_mut();
        }
        if self.tokens.prefix.is_some() {
            return self.tokens.prefix.as_mut();
        }
        if self.tokens.base.is_some() {
            return self.tokens.base.as_mut();
        }
        self.tokens.open.as_mut()
    }
}

impl Node for IdlType {
    fn kind(&self) -> NodeKind {
        NodeKind::Type
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        self.parent.as_ref()
    }
}

impl Walk for IdlType {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.enter(NodeKind::Type, None);
        self.ext_attrs.walk(visitor);
        let base_role = if self.subtypes.is_empty() {
            Role::Reference
        } else {
            Role::Generic
        };
        visit_opt(visitor, &self.tokens.prefix, Role::Syntax);
        visit_opt(visitor, &self.tokens.base, base_role);
        visit_opt(visitor, &self.tokens.postfix, Role::Syntax);
        visit_opt(visitor, &self.tokens.open, Role::Syntax);
        self.subtypes.walk(visitor);
        visit_opt(visitor, &self.tokens.close, Role::Syntax);
        visit_opt(visitor, &self.tokens.nullable, Role::Syntax);
        visit_opt(visitor, &self.tokens.separator, Role::Syntax);
        visitor.leave(NodeKind::Type, None);
    }
}

impl Link for IdlType {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        self.parent = parent;
        let me = Some(Arc::new(self.context()));
        self.ext_attrs.link(me.clone());
        self.subtypes.link(me);
    }
}
