//! Tokens and the fixed vocabularies of the IDL.
//!
//! A [`Token`] is immutable once the tokeniser produced it (autofixes and the
//! merger are the only code allowed to touch one afterwards). Whitespace and
//! comments never become tokens of their own: they are carried as `trivia` by
//! the token that follows them, and the trailing run ends up on the final
//! [`TokenKind::Eof`] token.

use serde::Serialize;
use std::fmt;

// ============================================================================
// VOCABULARIES
// ============================================================================

/// Type names that are also valid record keys.
pub const STRING_TYPES: &[&str] = &["ByteString", "DOMString", "USVString"];

/// Reserved words that may still be used as type names.
pub const TYPE_NAME_KEYWORDS: &[&str] = &[
    "ArrayBuffer",
    "SharedArrayBuffer",
    "DataView",
    "Int8Array",
    "Int16Array",
    "Int32Array",
    "Uint8Array",
    "Uint16Array",
    "Uint32Array",
    "Uint8ClampedArray",
    "BigInt64Array",
    "BigUint64Array",
    "Float16Array",
    "Float32Array",
    "Float64Array",
    "any",
    "object",
    "symbol",
];

/// Reserved words that may still be used as argument names.
pub const ARGUMENT_NAME_KEYWORDS: &[&str] = &[
    "async",
    "attribute",
    "callback",
    "const",
    "constructor",
    "deleter",
    "dictionary",
    "enum",
    "getter",
    "includes",
    "inherit",
    "interface",
    "iterable",
    "maplike",
    "namespace",
    "partial",
    "required",
    "setlike",
    "setter",
    "static",
    "stringifier",
    "typedef",
    "unrestricted",
];

const OTHER_KEYWORDS: &[&str] = &[
    "-Infinity",
    "FrozenArray",
    "Infinity",
    "NaN",
    "ObservableArray",
    "Promise",
    "async_iterable",
    "async_sequence",
    "bigint",
    "boolean",
    "byte",
    "double",
    "false",
    "float",
    "legacyiterable",
    "long",
    "mixin",
    "null",
    "octet",
    "optional",
    "or",
    "readonly",
    "record",
    "sequence",
    "short",
    "true",
    "undefined",
    "unsigned",
    "void",
];

/// Fixed punctuators, longest first where prefixes overlap.
pub const PUNCTUATIONS: &[&str] = &[
    "(", ")", ",", "...", ":", ";", "<", "=", ">", "?", "*", "[", "]", "{", "}",
];

/// Identifiers that must never appear in a definition.
pub const RESERVED_IDENTIFIERS: &[&str] = &["_constructor", "toString", "_toString"];

/// Returns true when an identifier-shaped word is a reserved word of the IDL.
pub fn is_keyword(word: &str) -> bool {
    ARGUMENT_NAME_KEYWORDS.contains(&word)
        || OTHER_KEYWORDS.contains(&word)
        || STRING_TYPES.contains(&word)
        || TYPE_NAME_KEYWORDS.contains(&word)
}

/// Strips exactly one leading underscore, the IDL escape for identifiers
/// that would otherwise clash with reserved words.
pub fn unescape(identifier: &str) -> &str {
    identifier.strip_prefix('_').unwrap_or(identifier)
}

// ============================================================================
// TOKEN
// ============================================================================

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Float,
    Integer,
    Identifier,
    String,
    /// Identifier-shaped reserved word (`interface`, `long`, `DOMString`, ...).
    Keyword,
    /// One of [`PUNCTUATIONS`].
    Punctuation,
    /// Any other single character. Never consumed by a production.
    Other,
    Eof,
}

impl TokenKind {
    /// Keywords and punctuators are the fixed-spelling terminals matched by value.
    pub fn is_inline(self) -> bool {
        matches!(self, TokenKind::Keyword | TokenKind::Punctuation)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Float => "float",
            TokenKind::Integer => "integer",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Keyword => "keyword",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Other => "other",
            TokenKind::Eof => "eof",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A significant token together with the trivia that precedes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw text, escapes included.
    pub value: String,
    /// Whitespace and comments between the previous token and this one.
    pub trivia: String,
    /// 1-based line on which `value` starts.
    pub line: usize,
    /// Position in the token stream.
    pub index: usize,
    /// Byte offset of `value` in the source text.
    #[serde(skip)]
    pub offset: usize,
}

impl Token {
    /// Builds a token that did not come from the tokeniser, used by autofixes.
    pub fn synthetic(kind: TokenKind, value: impl Into<String>, trivia: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            trivia: trivia.into(),
            line: 0,
            index: 0,
            offset: 0,
        }
    }

    /// The value with the identifier escape removed.
    pub fn unescaped(&self) -> &str {
        unescape(&self.value)
    }

    /// The token exactly as it appeared in the source, trivia first.
    pub fn source_text(&self) -> String {
        format!("{}{}", self.trivia, self.value)
    }

    pub fn is(&self, value: &str) -> bool {
        self.value == value
    }
}
