use crate::ast::{
    ExtendedAttribute, ExtendedAttributeParameters, ExtendedAttributeTokens, ExtendedAttributes,
    ExtendedAttributesTokens, ParameterTokens, WrappedToken,
};
use crate::cursor::{Cursor, ParseResult};
use crate::token::TokenKind;

use super::helpers::{argument_list, list};

/// `[A, B=c, D(long e)]`. Absent brackets yield an empty list.
pub fn extended_attributes(cursor: &mut Cursor) -> ParseResult<ExtendedAttributes> {
    let Some(open) = cursor.consume(&["["]) else {
        return Ok(ExtendedAttributes::default());
    };
    let items = list(cursor, extended_attribute, "extended attribute", false)?;
    let before_close = cursor.checkpoint();
    let close = cursor.expect(&["]"], "Expected a closing token for the extended attribute list")?;
    if items.is_empty() {
        cursor.rewind(before_close);
        return Err(cursor.error("An extended attribute list must not be empty"));
    }
    if cursor.probe("[") {
        return Err(cursor.error("Illegal double extended attribute lists, consider merging them"));
    }
    Ok(ExtendedAttributes {
        tokens: ExtendedAttributesTokens {
            open: Some(open),
            close: Some(close),
        },
        items,
    })
}

pub fn extended_attribute(cursor: &mut Cursor) -> ParseResult<Option<ExtendedAttribute>> {
    let Some(name) = cursor.consume_kind(&[TokenKind::Identifier]) else {
        return Ok(None);
    };
    Ok(Some(ExtendedAttribute {
        tokens: ExtendedAttributeTokens {
            name,
            separator: None,
        },
        params: parameters(cursor)?,
        parent: None,
    }))
}

fn parameters(cursor: &mut Cursor) -> ParseResult<ExtendedAttributeParameters> {
    let mut params = ExtendedAttributeParameters {
        tokens: ParameterTokens {
            assign: cursor.consume(&["="]),
            ..ParameterTokens::default()
        },
        ..ExtendedAttributeParameters::default()
    };

    if params.tokens.assign.is_some() {
        params.tokens.asterisk = cursor.consume(&["*"]);
        if params.tokens.asterisk.is_some() {
            return Ok(params);
        }
        params.tokens.secondary_name = cursor.consume_kind(&[
            TokenKind::Identifier,
            TokenKind::Float,
            TokenKind::Integer,
            TokenKind::String,
        ]);
    }

    params.tokens.open = cursor.consume(&["("]);
    if params.tokens.open.is_some() {
        if params.rhs_is_list() {
            params.list = rhs_list(cursor)?;
        } else {
            params.arguments = argument_list(cursor)?;
        }
        params.tokens.close = Some(cursor.expect(&[")"], "Unexpected token in extended attribute argument list")?);
    } else if params.rhs_is_list() {
        return Err(cursor.error("No right hand side to extended attribute assignment"));
    }
    Ok(params)
}

/// Items of `[X=(a, b)]`, all of one kind.
fn rhs_list(cursor: &mut Cursor) -> ParseResult<Vec<WrappedToken>> {
    for kind in [
        TokenKind::Identifier,
        TokenKind::Float,
        TokenKind::Integer,
        TokenKind::String,
    ] {
        let items = list(
            cursor,
            |cursor| Ok(cursor.consume_kind(&[kind]).map(WrappedToken::new)),
            "extended attribute value list",
            false,
        )?;
        if !items.is_empty() {
            return Ok(items);
        }
    }
    Err(cursor.error("Expected identifiers, strings, decimals, or integers but none found"))
}
