//! Converts source text into a trivia-carrying token stream.
//!
//! Scanning is a single forward pass. At every position the first matching
//! rule wins, in this order: whitespace and comments (accumulated as trivia),
//! numbers and identifiers, strings, punctuators, and finally any other single
//! character. The stream always ends with an [`TokenKind::Eof`] token holding
//! the trailing trivia, so concatenating `trivia + value` over the stream
//! reproduces the input byte for byte.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SourceInfo, SyntaxError};
use crate::token::{is_keyword, unescape, Token, TokenKind, PUNCTUATIONS, RESERVED_IDENTIFIERS};

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A-?(?:(?:[0-9]+\.[0-9]*|[0-9]*\.[0-9]+)(?:[Ee][-+]?[0-9]+)?|[0-9]+[Ee][-+]?[0-9]+)")
        .expect("float pattern is valid")
});
static INTEGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A-?(?:0(?:[Xx][0-9A-Fa-f]+|[0-7]*)|[1-9][0-9]*)").expect("integer pattern is valid")
});
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[_-]?[A-Za-z][0-9A-Z_a-z-]*").expect("identifier pattern is valid"));
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\A"[^"]*""#).expect("string pattern is valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[\t\n\r ]+").expect("whitespace pattern is valid"));
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A(?://.*|/\*[\s\S]*?\*/)").expect("comment pattern is valid"));
static OTHER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[^\t\n\r 0-9A-Za-z]").expect("other pattern is valid"));

/// Tokenises `source` without a source label.
pub fn tokenise(source: &str) -> Result<Vec<Token>, SyntaxError> {
    tokenise_with(source, &SourceInfo::new(None, source))
}

pub(crate) fn tokenise_with(source: &str, info: &SourceInfo) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut trivia = String::new();
    let mut line = 1;
    let mut position = 0;

    while position < source.len() {
        let rest = &source[position..];
        let Some(next) = rest.chars().next() else {
            break;
        };

        let trivia_rule = match next {
            '\t' | '\n' | '\r' | ' ' => Some(&*WHITESPACE),
            '/' => Some(&*COMMENT),
            _ => None,
        };
        if let Some(found) = trivia_rule.and_then(|rule| rule.find(rest)) {
            line += found.as_str().matches('\n').count();
            trivia.push_str(found.as_str());
            position += found.end();
            continue;
        }

        let mut matched = None;
        if next.is_ascii_alphanumeric() || matches!(next, '-' | '.' | '_') {
            matched = FLOAT
                .find(rest)
                .map(|m| (TokenKind::Float, m.end()))
                .or_else(|| INTEGER.find(rest).map(|m| (TokenKind::Integer, m.end())))
                .or_else(|| IDENTIFIER.find(rest).map(|m| (TokenKind::Identifier, m.end())));
        } else if next == '"' {
            matched = STRING.find(rest).map(|m| (TokenKind::String, m.end()));
        }
        if matched.is_none() {
            matched = PUNCTUATIONS
                .iter()
                .find(|punctuation| rest.starts_with(**punctuation))
                .map(|punctuation| (TokenKind::Punctuation, punctuation.len()));
        }
        if matched.is_none() {
            matched = OTHER.find(rest).map(|m| (TokenKind::Other, m.end()));
        }

        let Some((mut kind, length)) = matched.filter(|(_, length)| *length > 0) else {
            return Err(SyntaxError::new(&tokens, tokens.len(), None, "Token stream not progressing", info));
        };

        let value = &rest[..length];
        if kind == TokenKind::Identifier {
            if RESERVED_IDENTIFIERS.contains(&value) {
                let message = format!("{} is a reserved identifier and must not be used.", unescape(value));
                tokens.push(Token {
                    kind,
                    value: value.to_owned(),
                    trivia: std::mem::take(&mut trivia),
                    line,
                    index: tokens.len(),
                    offset: position,
                });
                return Err(SyntaxError::new(&tokens, tokens.len() - 1, None, &message, info));
            }
            if is_keyword(value) {
                kind = TokenKind::Keyword;
            }
        }

        tokens.push(Token {
            kind,
            value: value.to_owned(),
            trivia: std::mem::take(&mut trivia),
            line,
            index: tokens.len(),
            offset: position,
        });
        position += length;
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        value: String::new(),
        trivia,
        line,
        index: tokens.len(),
        offset: source.len(),
    });
    trace!("tokenised {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenise(source).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn trivia_attaches_to_the_following_token() {
        let tokens = tokenise("  // note\ninterface A {};\n").unwrap();
        assert_eq!(tokens[0].value, "interface");
        assert_eq!(tokens[0].trivia, "  // note\n");
        assert_eq!(tokens[0].line, 2);
        let eof = tokens.last().unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.trivia, "\n");
    }

    #[test]
    fn concatenation_reproduces_the_input() {
        let source = "/* a */ [Exposed=Window]\ninterface _B : C { attribute long x; };  ";
        let tokens = tokenise(source).unwrap();
        let text: String = tokens.iter().map(Token::source_text).collect();
        assert_eq!(text, source);
    }

    #[test]
    fn numbers_prefer_float_over_integer() {
        let tokens = tokenise("1 1.5 .5 1e3 0x1F 017 -2").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(
            kinds[..7],
            [
                (TokenKind::Integer, "1"),
                (TokenKind::Float, "1.5"),
                (TokenKind::Float, ".5"),
                (TokenKind::Float, "1e3"),
                (TokenKind::Integer, "0x1F"),
                (TokenKind::Integer, "017"),
                (TokenKind::Integer, "-2"),
            ]
        );
    }

    #[test]
    fn keywords_are_inline_tokens() {
        assert_eq!(
            kinds("interface Foo DOMString any -Infinity _interface"),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_characters_become_other_tokens() {
        let tokens = tokenise("a / b - c").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Other);
        assert_eq!(tokens[1].value, "/");
        assert_eq!(tokens[3].kind, TokenKind::Other);
        assert_eq!(tokens[3].value, "-");
    }

    #[test]
    fn ellipsis_is_a_single_punctuator() {
        let tokens = tokenise("long... a").unwrap();
        assert_eq!(tokens[1].value, "...");
        assert_eq!(tokens[1].kind, TokenKind::Punctuation);
    }

    #[test]
    fn reserved_identifiers_are_rejected() {
        let error = tokenise("interface A { attribute long toString; };").unwrap_err();
        assert!(error
            .bare_message()
            .contains("toString is a reserved identifier and must not be used."));
        let error = tokenise("interface _constructor {};").unwrap_err();
        assert!(error.bare_message().starts_with("constructor is a reserved identifier"));
    }

    #[test]
    fn empty_input_yields_only_eof() {
        let tokens = tokenise("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn lines_count_newlines_inside_comments() {
        let tokens = tokenise("/* one\ntwo\n*/ a\nb").unwrap();
        assert_eq!(tokens[0].line, 3);
        assert_eq!(tokens[1].line, 4);
    }
}
