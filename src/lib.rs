//! Format-preserving parser for Web IDL.
//!
//! [`parse`] turns source text into a concrete syntax tree whose nodes keep
//! every token they were built from, including whitespace and comments, so
//! [`write`] reproduces the input exactly. On top of the tree sit a semantic
//! [`validate`] pass with automatic fixes, a [`merge`] pass that folds
//! partials and mixins into their targets, and the `webidl` command line tool.

pub use crate::ast::{Definition, Member, Node, Walk};
pub use crate::cursor::{Checkpoint, Cursor, ParseResult};
pub use crate::errors::{ErrorReport, Level, SyntaxError, ValidationError};
pub use crate::extensions::{AttributeRules, DefinitionProduction, Extensions, MemberProduction, Priority};
pub use crate::grammar::parse;
pub use crate::merge::merge;
pub use crate::options::ParseOptions;
pub use crate::token::{Token, TokenKind};
pub use crate::tokeniser::tokenise;
pub use crate::validation::{autofix_all, validate, validate_with_source, Autofix};
pub use crate::writer::{write, write_with, Templates};

pub mod ast;
pub mod cli;
pub mod cursor;
pub mod errors;
pub mod extensions;
pub mod grammar;
pub mod merge;
pub mod options;
pub mod token;
pub mod tokeniser;
pub mod validation;
pub mod writer;
