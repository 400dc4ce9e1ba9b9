//! The concrete syntax tree.
//!
//! Every node owns the exact tokens it was parsed from, trivia included, so
//! walking a tree reproduces its source text. Nodes also expose derived
//! semantic views (unescaped names, flags, interpreted literals) that are
//! computed from those tokens on demand.
//!
//! Nodes carry no validation methods. Semantic checks live in
//! [`crate::validation`], one rule function per node family: definitions,
//! containers, members, attributes, extended attribute lists, types and
//! argument lists. [`crate::validate`] walks the tree and dispatches each
//! node to its function with the node's [`NodeContext`] for messages.

mod argument;
mod context;
mod definitions;
mod extended_attributes;
mod members;
mod types;
mod walk;

pub use argument::{unquote, Argument, ArgumentTokens, ConstValue, DefaultValue};
pub(crate) use context::Link;
pub use context::{Node, NodeContext, NodeKind};
pub use definitions::{
    CallbackFunction, CallbackTokens, Container, ContainerKind, ContainerTokens, CustomNode, Enum,
    EnumTokens, EnumValue, EnumValueTokens, Eof, Includes, IncludesTokens, Typedef, TypedefTokens,
    WrappedToken, WrappedTokenTokens,
};
pub use extended_attributes::{
    ExtendedAttribute, ExtendedAttributeParameters, ExtendedAttributeTokens, ExtendedAttributes,
    ExtendedAttributesTokens, ParameterTokens, Rhs,
};
pub use members::{
    Attribute, AttributeTokens, Constant, ConstantTokens, Constructor, ConstructorTokens, Field,
    FieldTokens, IterableKind, IterableLike, IterableLikeTokens, Operation, OperationTokens,
};
pub use types::{IdlType, TypeContext, TypeTokens};
pub use walk::{Role, TokenCollector, Visitor, Walk};

use serde::Serialize;
use std::sync::Arc;

use crate::token::Token;

// ============================================================================
// DEFINITION
// ============================================================================

/// A top-level definition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Definition {
    Container(Container),
    Typedef(Typedef),
    Callback(CallbackFunction),
    Enum(Enum),
    Includes(Includes),
    Custom(CustomNode),
    /// Only present when parsing in concrete mode.
    Eof(Eof),
}

macro_rules! each_definition {
    ($value:expr, $node:ident => $body:expr) => {
        match $value {
            Definition::Container($node) => $body,
            Definition::Typedef($node) => $body,
            Definition::Callback($node) => $body,
            Definition::Enum($node) => $body,
            Definition::Includes($node) => $body,
            Definition::Custom($node) => $body,
            Definition::Eof($node) => $body,
        }
    };
}

impl Definition {
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Definition::Container(container) => Some(container),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Definition::Container(container) => Some(container),
            _ => None,
        }
    }

    /// The container if it is of `kind`.
    pub fn container_of(&self, kind: ContainerKind) -> Option<&Container> {
        self.as_container().filter(|container| container.kind == kind)
    }

    pub fn name_token(&self) -> Option<&Token> {
        match self {
            Definition::Container(node) => Some(&node.tokens.name),
            Definition::Typedef(node) => Some(&node.tokens.name),
            Definition::Callback(node) => Some(&node.tokens.name),
            Definition::Enum(node) => Some(&node.tokens.name),
            Definition::Custom(node) => node.token("name"),
            Definition::Includes(_) | Definition::Eof(_) => None,
        }
    }

    pub fn ext_attrs(&self) -> Option<&ExtendedAttributes> {
        match self {
            Definition::Container(node) => Some(&node.ext_attrs),
            Definition::Typedef(node) => Some(&node.ext_attrs),
            Definition::Callback(node) => Some(&node.ext_attrs),
            Definition::Enum(node) => Some(&node.ext_attrs),
            Definition::Includes(node) => Some(&node.ext_attrs),
            Definition::Custom(node) => Some(&node.ext_attrs),
            Definition::Eof(_) => None,
        }
    }

    pub fn ext_attrs_mut(&mut self) -> Option<&mut ExtendedAttributes> {
        match self {
            Definition::Container(node) => Some(&mut node.ext_attrs),
            Definition::Typedef(node) => Some(&mut node.ext_attrs),
            Definition::Callback(node) => Some(&mut node.ext_attrs),
            Definition::Enum(node) => Some(&mut node.ext_attrs),
            Definition::Includes(node) => Some(&mut node.ext_attrs),
            Definition::Custom(node) => Some(&mut node.ext_attrs),
            Definition::Eof(_) => None,
        }
    }

    /// Rebuilds every parent context below this definition.
    pub fn relink(&mut self) {
        self.link(None);
    }
}

impl Node for Definition {
    fn kind(&self) -> NodeKind {
        each_definition!(self, node => node.kind())
    }

    fn name(&self) -> Option<&str> {
        each_definition!(self, node => Node::name(node))
    }

    fn is_partial(&self) -> bool {
        each_definition!(self, node => node.is_partial())
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        None
    }
}

impl Walk for Definition {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        each_definition!(self, node => node.walk(visitor))
    }
}

impl Link for Definition {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        match self {
            Definition::Container(node) => node.link(parent),
            Definition::Typedef(node) => node.link(parent),
            Definition::Callback(node) => node.link(parent),
            Definition::Enum(node) => node.link(parent),
            Definition::Includes(node) => node.link(parent),
            Definition::Custom(node) => node.link(parent),
            Definition::Eof(_) => {}
        }
    }
}

// ============================================================================
// MEMBER
// ============================================================================

/// A member of a container.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Member {
    Attribute(Attribute),
    Operation(Operation),
    Constant(Constant),
    Constructor(Constructor),
    IterableLike(IterableLike),
    Field(Field),
    /// Only accepted when nested typedefs are enabled.
    Typedef(Typedef),
    Custom(CustomNode),
}

macro_rules! each_member {
    ($value:expr, $node:ident => $body:expr) => {
        match $value {
            Member::Attribute($node) => $body,
            Member::Operation($node) => $body,
            Member::Constant($node) => $body,
            Member::Constructor($node) => $body,
            Member::IterableLike($node) => $body,
            Member::Field($node) => $body,
            Member::Typedef($node) => $body,
            Member::Custom($node) => $body,
        }
    };
}

impl Member {
    pub fn ext_attrs(&self) -> &ExtendedAttributes {
        each_member!(self, node => &node.ext_attrs)
    }

    pub fn ext_attrs_mut(&mut self) -> &mut ExtendedAttributes {
        each_member!(self, node => &mut node.ext_attrs)
    }

    pub fn as_operation(&self) -> Option<&Operation> {
        match self {
            Member::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Member::Field(field) => Some(field),
            _ => None,
        }
    }

    /// First token after the extended attributes.
    pub fn leading_token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Member::Attribute(node) => {
                let tokens = &mut node.tokens;
                Some(
                    tokens
                        .special
                        .as_mut()
                        .or(tokens.readonly.as_mut())
                        .unwrap_or(&mut tokens.base),
                )
            }
            Member::Operation(node) => {
                if node.tokens.special.is_some() {
                    node.tokens.special.as_mut()
                } else if node.idl_type.is_some() {
                    node.idl_type.as_mut().and_then(IdlType::first_token_mut)
                } else {
                    Some(&mut node.tokens.termination)
                }
            }
            Member::Constant(node) => Some(&mut node.tokens.base),
            Member::Constructor(node) => Some(&mut node.tokens.base),
            Member::IterableLike(node) => {
                let tokens = &mut node.tokens;
                Some(
                    tokens
                        .readonly
                        .as_mut()
                        .or(tokens.async_.as_mut())
                        .unwrap_or(&mut tokens.base),
                )
            }
            Member::Field(node) => {
                if node.tokens.required.is_some() {
                    node.tokens.required.as_mut()
                } else {
                    node.idl_type.first_token_mut()
                }
            }
            Member::Typedef(node) => Some(&mut node.tokens.base),
            Member::Custom(node) => node.tokens.first_mut().map(|(_, token)| token),
        }
    }
}

impl Node for Member {
    fn kind(&self) -> NodeKind {
        each_member!(self, node => node.kind())
    }

    fn name(&self) -> Option<&str> {
        each_member!(self, node => Node::name(node))
    }

    fn parent_link(&self) -> Option<&Arc<NodeContext>> {
        each_member!(self, node => node.parent_link())
    }
}

impl Walk for Member {
    fn walk<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        each_member!(self, node => node.walk(visitor))
    }
}

impl Link for Member {
    fn link(&mut self, parent: Option<Arc<NodeContext>>) {
        each_member!(self, node => node.link(parent))
    }
}
