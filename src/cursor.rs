//! Token cursor with backtracking and error reporting.
//!
//! Productions only ever move forward through [`Cursor::consume`] and friends,
//! and the only way back is [`Cursor::rewind`] to a [`Checkpoint`] taken
//! earlier. A production that returns `Ok(None)` must leave the position where
//! it found it.

use crate::ast::NodeContext;
use crate::errors::{SourceInfo, SyntaxError};
use crate::token::{Token, TokenKind};
use crate::tokeniser::tokenise_with;

/// Result of a production.
pub type ParseResult<T> = Result<T, SyntaxError>;

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

/// Read position over a token stream, plus the innermost definition seen so
/// far for error context.
#[derive(Debug)]
pub struct Cursor {
    tokens: Vec<Token>,
    position: usize,
    source: SourceInfo,
    current: Option<NodeContext>,
}

impl Cursor {
    /// Tokenises `source` and positions the cursor on the first token.
    pub fn new(source: &str, source_name: Option<&str>) -> ParseResult<Self> {
        let info = SourceInfo::new(source_name, source);
        let tokens = tokenise_with(source, &info)?;
        Ok(Self {
            tokens,
            position: 0,
            source: info,
            current: None,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The next unconsumed token.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// True once the end-of-input token has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub fn probe_kind(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |token| token.kind == kind)
    }

    /// True if the next token is the inline token `value`.
    pub fn probe(&self, value: &str) -> bool {
        self.peek()
            .map_or(false, |token| token.kind.is_inline() && token.value == value)
    }

    /// Consumes the next token if its kind is one of `kinds`.
    pub fn consume_kind(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        let token = self.peek().filter(|token| kinds.contains(&token.kind))?.clone();
        self.position += 1;
        Some(token)
    }

    /// Consumes the next token if it is an inline token spelled as one of
    /// `values`.
    pub fn consume(&mut self, values: &[&str]) -> Option<Token> {
        let token = self
            .peek()
            .filter(|token| token.kind.is_inline() && values.contains(&token.value.as_str()))?
            .clone();
        self.position += 1;
        Some(token)
    }

    /// Consumes the next token if it is the identifier `value`.
    pub fn consume_identifier(&mut self, value: &str) -> Option<Token> {
        let token = self
            .peek()
            .filter(|token| token.kind == TokenKind::Identifier && token.value == value)?
            .clone();
        self.position += 1;
        Some(token)
    }

    /// [`Cursor::consume`], failing with `message` when nothing matches.
    pub fn expect(&mut self, values: &[&str], message: &str) -> ParseResult<Token> {
        self.consume(values).ok_or_else(|| self.error(message))
    }

    /// [`Cursor::consume_kind`], failing with `message` when nothing matches.
    pub fn expect_kind(&mut self, kinds: &[TokenKind], message: &str) -> ParseResult<Token> {
        self.consume_kind(kinds).ok_or_else(|| self.error(message))
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0;
    }

    /// A syntax error located at the current position.
    pub fn error(&self, message: impl AsRef<str>) -> SyntaxError {
        SyntaxError::new(
            &self.tokens,
            self.position,
            self.current.as_ref(),
            message.as_ref(),
            &self.source,
        )
    }

    /// The innermost definition entered so far, used in error context.
    pub fn current(&self) -> Option<&NodeContext> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, context: NodeContext) {
        self.current = Some(context);
    }

    pub(crate) fn restore_current(&mut self, context: Option<NodeContext>) {
        self.current = context;
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.name()
    }
}
