//! Extension productions and the dispatch tables the parser runs.
//!
//! Callers may register additional definition productions and per-container
//! member productions. Each one is tried either before or after the built-in
//! productions at the same point. Tables are resolved once per parse call and
//! never change while it runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ast::{ContainerKind, Definition, Member};
use crate::cursor::{Cursor, ParseResult};
use crate::options::ParseOptions;

/// A production for a top-level definition. Returns `Ok(None)` without
/// consuming anything when it does not apply.
pub type DefinitionProduction = Arc<dyn Fn(&mut Cursor) -> ParseResult<Option<Definition>> + Send + Sync>;

/// A production for a container member, with the same contract.
pub type MemberProduction = Arc<dyn Fn(&mut Cursor) -> ParseResult<Option<Member>> + Send + Sync>;

/// Where an extension runs relative to the built-in productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    BeforeBuiltins,
    /// Only reached when every built-in declined. Inside interfaces, mixins,
    /// namespaces and callback interfaces a member that starts with an
    /// identifier is read as an operation's return type, and that commits,
    /// so such members must be registered with `BeforeBuiltins`.
    AfterBuiltins,
}

/// Extension productions registered by the caller.
#[derive(Clone, Default)]
pub struct Extensions {
    definitions: Vec<(Priority, DefinitionProduction)>,
    members: Vec<(ContainerKind, Priority, MemberProduction)>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level production.
    pub fn definition<F>(mut self, priority: Priority, production: F) -> Self
    where
        F: Fn(&mut Cursor) -> ParseResult<Option<Definition>> + Send + Sync + 'static,
    {
        let production: DefinitionProduction = Arc::new(production);
        self.definitions.push((priority, production));
        self
    }

    /// Registers a member production for one container kind.
    pub fn member<F>(mut self, container: ContainerKind, priority: Priority, production: F) -> Self
    where
        F: Fn(&mut Cursor) -> ParseResult<Option<Member>> + Send + Sync + 'static,
    {
        let production: MemberProduction = Arc::new(production);
        self.members.push((container, priority, production));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.members.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("definitions", &self.definitions.len())
            .field("members", &self.members.len())
            .finish()
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Container-specific limits on [`grammar::members::attribute`](crate::grammar::members::attribute).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeRules {
    /// Rejects `inherit` (mixins).
    pub no_inherit: bool,
    /// Requires `readonly` (namespaces).
    pub readonly: bool,
}

/// One entry of a container's member table.
#[derive(Clone)]
pub(crate) enum MemberParser {
    Constant,
    Constructor,
    Static,
    Stringifier,
    IterableLike,
    Attribute(AttributeRules),
    /// `regular` forbids getter, setter and deleter.
    Operation { regular: bool },
    Field,
    Typedef,
    Extension(MemberProduction),
}

impl MemberParser {
    pub fn label(&self) -> &'static str {
        match self {
            MemberParser::Constant => "const",
            MemberParser::Constructor => "constructor",
            MemberParser::Static => "static",
            MemberParser::Stringifier => "stringifier",
            MemberParser::IterableLike => "iterable-like",
            MemberParser::Attribute(_) => "attribute",
            MemberParser::Operation { .. } => "operation",
            MemberParser::Field => "field",
            MemberParser::Typedef => "typedef",
            MemberParser::Extension(_) => "extension",
        }
    }
}

fn builtin_members(kind: ContainerKind) -> Vec<MemberParser> {
    match kind {
        ContainerKind::Interface => vec![
            MemberParser::Constant,
            MemberParser::Constructor,
            MemberParser::Static,
            MemberParser::Stringifier,
            MemberParser::IterableLike,
            MemberParser::Attribute(AttributeRules::default()),
            MemberParser::Operation { regular: false },
        ],
        ContainerKind::Mixin => vec![
            MemberParser::Constant,
            MemberParser::Stringifier,
            MemberParser::Attribute(AttributeRules {
                no_inherit: true,
                readonly: false,
            }),
            MemberParser::Operation { regular: true },
        ],
        ContainerKind::Namespace => vec![
            MemberParser::Attribute(AttributeRules {
                no_inherit: true,
                readonly: true,
            }),
            MemberParser::Constant,
            MemberParser::Operation { regular: true },
        ],
        ContainerKind::CallbackInterface => vec![
            MemberParser::Constant,
            MemberParser::Operation { regular: true },
        ],
        ContainerKind::Dictionary => vec![MemberParser::Field],
    }
}

fn member_extensions(extensions: &Extensions, kind: ContainerKind, priority: Priority) -> Vec<MemberParser> {
    extensions
        .members
        .iter()
        .filter(|(container, p, _)| *container == kind && *p == priority)
        .map(|(_, _, production)| MemberParser::Extension(Arc::clone(production)))
        .collect()
}

/// Production tables for one parse call.
pub(crate) struct Dispatch {
    pub before: Vec<DefinitionProduction>,
    pub after: Vec<DefinitionProduction>,
    members: HashMap<ContainerKind, Vec<MemberParser>>,
}

impl Dispatch {
    pub fn resolve(options: &ParseOptions) -> Self {
        let extensions = &options.extensions;
        let by_priority = |priority: Priority| -> Vec<DefinitionProduction> {
            extensions
                .definitions
                .iter()
                .filter(|(p, _)| *p == priority)
                .map(|(_, production)| Arc::clone(production))
                .collect()
        };

        let mut members = HashMap::new();
        for kind in ContainerKind::ALL {
            let mut table = member_extensions(extensions, kind, Priority::BeforeBuiltins);
            if options.allow_nested_typedefs && kind != ContainerKind::Dictionary {
                table.push(MemberParser::Typedef);
            }
            table.extend(builtin_members(kind));
            table.extend(member_extensions(extensions, kind, Priority::AfterBuiltins));
            members.insert(kind, table);
        }

        Self {
            before: by_priority(Priority::BeforeBuiltins),
            after: by_priority(Priority::AfterBuiltins),
            members,
        }
    }

    pub fn members(&self, kind: ContainerKind) -> &[MemberParser] {
        self.members.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }
}
