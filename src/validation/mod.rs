//! Semantic validation of parsed definitions.
//!
//! Validation never fails: it collects [`ValidationError`]s, each naming the
//! rule that produced it and, where a mechanical repair exists, carrying an
//! [`Autofix`]. Diagnostics are located against the text reconstructed from
//! the tree, so they stay accurate after the tree was edited.

mod autofix;
mod index;
mod rules;

pub use autofix::{ArgumentPath, Autofix, ExtAttrTarget};
pub use index::DefinitionIndex;

use log::{debug, info};
use miette::SourceSpan;
use std::collections::HashMap;

use crate::ast::{Definition, NodeContext, TokenCollector, Walk};
use crate::errors::{Level, ReportKind, ReportRequest, SourceInfo, ValidationError};
use crate::token::Token;

/// Validates `definitions`, returning every diagnostic in document order.
pub fn validate(definitions: &[Definition]) -> Vec<ValidationError> {
    validate_with_source(definitions, None)
}

/// [`validate`], labelling diagnostics with `source_name`.
pub fn validate_with_source(definitions: &[Definition], source_name: Option<&str>) -> Vec<ValidationError> {
    let mut checker = Checker::new(definitions, source_name);
    rules::check_duplicated_names(&mut checker);
    for (index, definition) in definitions.iter().enumerate() {
        rules::check_definition(&mut checker, definition, index);
    }
    let errors = checker.finish();
    debug!("validation produced {} diagnostics", errors.len());
    errors
}

/// Applies automatic fixes until none of the remaining diagnostics can be
/// fixed. Returns how many fixes were applied.
pub fn autofix_all(definitions: &mut [Definition]) -> usize {
    let budget = validate(definitions)
        .iter()
        .filter(|error| error.autofix().is_some())
        .count();
    let mut applied = 0;
    for _ in 0..budget {
        let fixes: Vec<Autofix> = validate(definitions)
            .iter()
            .filter_map(|error| error.autofix().cloned())
            .collect();
        if !fixes.iter().any(|fix| fix.apply(definitions)) {
            break;
        }
        applied += 1;
    }
    info!("applied {applied} automatic fixes");
    applied
}

/// Accumulates diagnostics for one validation run.
pub(crate) struct Checker<'a> {
    pub index: DefinitionIndex<'a>,
    tokens: Vec<&'a Token>,
    offsets: Vec<usize>,
    positions: HashMap<*const Token, usize>,
    source: SourceInfo,
    errors: Vec<ValidationError>,
}

impl<'a> Checker<'a> {
    fn new(definitions: &'a [Definition], source_name: Option<&str>) -> Self {
        let mut collector = TokenCollector::default();
        for definition in definitions {
            definition.walk(&mut collector);
        }
        let tokens = collector.tokens;

        let mut text = String::new();
        let mut offsets = Vec::with_capacity(tokens.len());
        let mut positions = HashMap::with_capacity(tokens.len());
        for (position, token) in tokens.iter().enumerate() {
            text.push_str(&token.trivia);
            offsets.push(text.len());
            text.push_str(&token.value);
            positions.insert(*token as *const Token, position);
        }

        Self {
            index: DefinitionIndex::new(definitions),
            tokens,
            offsets,
            positions,
            source: SourceInfo::new(source_name, &text),
            errors: Vec::new(),
        }
    }

    pub fn error(
        &mut self,
        token: &Token,
        context: &NodeContext,
        rule: &'static str,
        message: impl Into<String>,
        autofix: Option<Autofix>,
    ) {
        self.push(token, context, rule, message.into(), Level::Error, autofix);
    }

    pub fn warning(&mut self, token: &Token, context: &NodeContext, rule: &'static str, message: impl Into<String>) {
        self.push(token, context, rule, message.into(), Level::Warning, None);
    }

    fn push(
        &mut self,
        token: &Token,
        context: &NodeContext,
        rule: &'static str,
        message: String,
        level: Level,
        autofix: Option<Autofix>,
    ) {
        let position = self
            .positions
            .get(&(token as *const Token))
            .copied()
            .unwrap_or(self.tokens.len());
        let span: SourceSpan = match self.offsets.get(position) {
            Some(&offset) => (offset, token.value.len()).into(),
            None => (self.source.len(), 0).into(),
        };
        let request = ReportRequest {
            kind: ReportKind::Validation,
            current: Some(context),
            message: &message,
            level,
            rule_name: Some(rule),
            source_name: self.source.name(),
        };
        let error = ValidationError::new(&self.tokens, position, span, request, autofix, &self.source);
        self.errors.push(error);
    }

    fn finish(self) -> Vec<ValidationError> {
        self.errors
    }
}
