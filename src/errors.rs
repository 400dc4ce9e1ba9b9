//! Diagnostics produced while parsing and validating.
//!
//! Both error types share one report layout: a context header naming the
//! line, the source and the innermost enclosing definition, up to five tokens
//! of surrounding source, and a caret under the offending token. The same
//! report is exposed as plain data ([`ErrorReport`]) and through
//! [`miette::Diagnostic`] for rich rendering.

use miette::{Diagnostic, LabeledSpan, NamedSource, Severity, SourceCode, SourceSpan};
use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::ast::NodeContext;
use crate::token::{Token, TokenKind};
use crate::validation::Autofix;

/// Number of tokens shown on each side of the error position.
const MAX_CONTEXT_TOKENS: usize = 5;

// ============================================================================
// SOURCE INFO
// ============================================================================

/// Label and text of one input, shared by every diagnostic raised against it.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    name: Option<String>,
    code: Arc<NamedSource<String>>,
    length: usize,
}

impl SourceInfo {
    pub fn new(name: Option<&str>, text: &str) -> Self {
        let label = name.unwrap_or("<input>");
        Self {
            name: name.map(str::to_owned),
            code: Arc::new(NamedSource::new(label, text.to_owned())),
            length: text.len(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// Severity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReportKind {
    Syntax,
    Validation,
}

impl ReportKind {
    fn label(self) -> &'static str {
        match self {
            ReportKind::Syntax => "Syntax",
            ReportKind::Validation => "Validation",
        }
    }

    fn preposition(self) -> &'static str {
        match self {
            ReportKind::Syntax => "since",
            ReportKind::Validation => "inside",
        }
    }
}

/// Everything a diagnostic knows about itself, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// `context` followed by a space and `bare_message`.
    pub message: String,
    pub bare_message: String,
    /// Header line plus the source excerpt and caret.
    pub context: String,
    pub line: usize,
    pub source_name: Option<String>,
    pub level: Level,
    /// Set for validation diagnostics only.
    pub rule_name: Option<String>,
    /// Source text from the error position onwards, bounded to a few tokens.
    pub input: String,
    pub tokens: Vec<Token>,
}

fn join<T: Borrow<Token>>(tokens: &[T]) -> String {
    tokens.iter().map(|t| t.borrow().source_text()).collect()
}

pub(crate) struct ReportRequest<'r> {
    pub kind: ReportKind,
    pub current: Option<&'r NodeContext>,
    pub message: &'r str,
    pub level: Level,
    pub rule_name: Option<&'r str>,
    pub source_name: Option<&'r str>,
}

/// Renders the report for an error located at `position` in `tokens`.
pub(crate) fn build_report<T: Borrow<Token>>(tokens: &[T], position: usize, request: ReportRequest<'_>) -> ErrorReport {
    let next = tokens.get(position).map(Borrow::borrow);
    let next_is_eof = next.map_or(true, |t| t.kind == TokenKind::Eof);

    let line = match next {
        Some(token) if token.kind != TokenKind::Eof => token.line,
        _ => position
            .checked_sub(1)
            .and_then(|previous| tokens.get(previous))
            .map_or(1, |t| t.borrow().line),
    };

    let end = position.min(tokens.len());
    let start = end.saturating_sub(MAX_CONTEXT_TOKENS);
    let mut preceding = join(&tokens[start..end]);
    if let Some(token) = next.filter(|_| !next_is_eof) {
        preceding.push_str(&token.trivia);
    }

    let subsequent_tokens = &tokens[end..(end + MAX_CONTEXT_TOKENS).min(tokens.len())];
    let mut subsequent = join(subsequent_tokens);
    if let Some(token) = next.filter(|_| !next_is_eof) {
        subsequent = subsequent[token.trivia.len()..].to_owned();
    }

    let preceding_last_line = preceding.rsplit('\n').next().unwrap_or_default();
    let subsequent_first_line = subsequent.split('\n').next().unwrap_or_default();
    let caret = format!("{}^", " ".repeat(preceding_last_line.width()));
    let excerpt = format!("{preceding_last_line}{subsequent_first_line}\n{caret}");

    let in_source = request
        .source_name
        .map(|name| format!(" in {name}"))
        .unwrap_or_default();
    let grammatical = request
        .current
        .filter(|context| context.name.is_some())
        .map(|context| {
            format!(
                ", {} `{}{}`",
                request.kind.preposition(),
                if context.partial { "partial " } else { "" },
                context.describe()
            )
        })
        .unwrap_or_default();
    let context = format!(
        "{} error at line {}{}{}:\n{}",
        request.kind.label(),
        line,
        in_source,
        grammatical,
        excerpt
    );

    ErrorReport {
        message: format!("{context} {}", request.message),
        bare_message: request.message.to_owned(),
        context,
        line,
        source_name: request.source_name.map(str::to_owned),
        level: request.level,
        rule_name: request.rule_name.map(str::to_owned),
        input: subsequent,
        tokens: subsequent_tokens.iter().map(|t| t.borrow().clone()).collect(),
    }
}

fn span_of<T: Borrow<Token>>(tokens: &[T], position: usize, info: &SourceInfo) -> SourceSpan {
    match tokens.get(position).map(Borrow::borrow) {
        Some(token) => (token.offset.min(info.len()), token.value.len()).into(),
        None => (info.len(), 0).into(),
    }
}

// ============================================================================
// SYNTAX ERROR
// ============================================================================

/// The first grammar violation found in an input. Parsing stops at it.
#[derive(Debug, Clone, Error)]
#[error("{}", report.message)]
pub struct SyntaxError {
    report: ErrorReport,
    code: Arc<NamedSource<String>>,
    span: SourceSpan,
}

impl SyntaxError {
    pub(crate) fn new<T: Borrow<Token>>(
        tokens: &[T],
        position: usize,
        current: Option<&NodeContext>,
        message: &str,
        info: &SourceInfo,
    ) -> Self {
        let report = build_report(
            tokens,
            position,
            ReportRequest {
                kind: ReportKind::Syntax,
                current,
                message,
                level: Level::Error,
                rule_name: None,
                source_name: info.name(),
            },
        );
        Self {
            report,
            code: Arc::clone(&info.code),
            span: span_of(tokens, position, info),
        }
    }

    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    pub fn message(&self) -> &str {
        &self.report.message
    }

    pub fn bare_message(&self) -> &str {
        &self.report.bare_message
    }

    pub fn context(&self) -> &str {
        &self.report.context
    }

    pub fn line(&self) -> usize {
        self.report.line
    }

    pub fn source_name(&self) -> Option<&str> {
        self.report.source_name.as_deref()
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("webidl::syntax"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&*self.code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.report.bare_message.clone()),
            self.span,
        ))))
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A semantic problem found in a successfully parsed tree.
#[derive(Debug, Clone, Error)]
#[error("{}", report.message)]
pub struct ValidationError {
    report: ErrorReport,
    autofix: Option<Autofix>,
    code: Arc<NamedSource<String>>,
    span: SourceSpan,
}

impl ValidationError {
    pub(crate) fn new<T: Borrow<Token>>(
        tokens: &[T],
        position: usize,
        span: SourceSpan,
        request: ReportRequest<'_>,
        autofix: Option<Autofix>,
        info: &SourceInfo,
    ) -> Self {
        Self {
            report: build_report(tokens, position, request),
            autofix,
            code: Arc::clone(&info.code),
            span,
        }
    }

    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    pub fn message(&self) -> &str {
        &self.report.message
    }

    pub fn bare_message(&self) -> &str {
        &self.report.bare_message
    }

    pub fn rule_name(&self) -> &str {
        self.report.rule_name.as_deref().unwrap_or_default()
    }

    pub fn level(&self) -> Level {
        self.report.level
    }

    pub fn line(&self) -> usize {
        self.report.line
    }

    pub fn is_warning(&self) -> bool {
        self.report.level == Level::Warning
    }

    /// The mechanical repair for this diagnostic, when one exists.
    pub fn autofix(&self) -> Option<&Autofix> {
        self.autofix.as_ref()
    }
}

impl Diagnostic for ValidationError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("webidl::validation::{}", self.rule_name())))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.report.level {
            Level::Error => Severity::Error,
            Level::Warning => Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.autofix.is_some() {
            Some(Box::new("run `webidl validate --fix` to apply the automatic fix"))
        } else {
            None
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&*self.code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.report.bare_message.clone()),
            self.span,
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use crate::tokeniser::tokenise;

    fn request<'r>(current: Option<&'r NodeContext>, message: &'r str) -> ReportRequest<'r> {
        ReportRequest {
            kind: ReportKind::Syntax,
            current,
            message,
            level: Level::Error,
            rule_name: None,
            source_name: None,
        }
    }

    #[test]
    fn caret_points_at_the_offending_token() {
        let tokens = tokenise("interface A { undefined f(long a,); };").unwrap();
        let position = tokens.iter().position(|t| t.value == ")").unwrap();
        let report = build_report(&tokens, position, request(None, "Trailing comma in arguments list"));
        assert_eq!(report.line, 1);
        assert_eq!(
            report.context,
            "Syntax error at line 1:\n f(long a,); };\n          ^"
        );
        assert!(report.message.ends_with(" Trailing comma in arguments list"));
        assert_eq!(report.input, "); };");
    }

    #[test]
    fn context_names_the_enclosing_definition() {
        let tokens = tokenise("interface A {\n  attribute long;\n};").unwrap();
        let position = tokens.iter().position(|t| t.value == ";").unwrap();
        let current = NodeContext::new(NodeKind::Interface, Some("A".into()), true);
        let report = build_report(&tokens, position, request(Some(&current), "Attribute lacks a name"));
        assert!(report
            .context
            .starts_with("Syntax error at line 2, since `partial interface A`:\n"));
    }

    #[test]
    fn eof_uses_the_previous_line() {
        let tokens = tokenise("interface A {\n").unwrap();
        let report = build_report(&tokens, tokens.len() - 1, request(None, "Unknown member"));
        assert_eq!(report.line, 1);
    }

    #[test]
    fn report_tolerates_positions_past_the_end() {
        let tokens = tokenise("a").unwrap();
        let report = build_report(&tokens, tokens.len(), request(None, "oops"));
        assert_eq!(report.line, 1);
        assert!(report.context.ends_with('^'));
    }
}
