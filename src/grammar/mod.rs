//! Recursive-descent productions over a [`Cursor`].
//!
//! Every production follows the same contract: on success it returns
//! `Ok(Some(node))`; when the next tokens cannot start it, it returns
//! `Ok(None)` with the cursor where it started; once it has committed it
//! fails with a [`SyntaxError`] instead.

pub mod definitions;
pub mod extended_attributes;
pub mod helpers;
pub mod members;
pub mod types;

use log::debug;

use crate::ast::{Definition, Link};
use crate::cursor::{Cursor, ParseResult};
use crate::errors::SyntaxError;
use crate::extensions::Dispatch;
use crate::options::ParseOptions;

/// Parses a whole document.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Vec<Definition>, SyntaxError> {
    let mut cursor = Cursor::new(source, options.source_name.as_deref())?;
    let dispatch = Dispatch::resolve(options);
    let mut definitions = definitions::definitions(&mut cursor, &dispatch, options.concrete)?;
    for definition in &mut definitions {
        definition.link(None);
    }
    debug!(
        "parsed {} definitions from {}",
        definitions.len(),
        options.source_name.as_deref().unwrap_or("<input>")
    );
    Ok(definitions)
}

/// Runs `production` on `text` alone and requires it to consume everything.
/// Used to build tree fragments from source snippets.
pub(crate) fn parse_fragment<T>(
    text: &str,
    production: impl FnOnce(&mut Cursor) -> ParseResult<Option<T>>,
) -> Option<T> {
    let mut cursor = Cursor::new(text, None).ok()?;
    let node = production(&mut cursor).ok()??;
    cursor
        .probe_kind(crate::token::TokenKind::Eof)
        .then_some(node)
}
