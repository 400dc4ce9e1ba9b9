//! Type productions: named, primitive, generic and union types.

use crate::ast::{IdlType, TypeContext, TypeTokens};
use crate::cursor::{Cursor, ParseResult};
use crate::token::{TokenKind, STRING_TYPES, TYPE_NAME_KEYWORDS};

use super::helpers::{primitive_type, return_type, type_with_extended_attributes};

const GENERIC_TYPES: &[&str] = &[
    "FrozenArray",
    "ObservableArray",
    "Promise",
    "async_sequence",
    "sequence",
    "record",
];

/// A single type or a union type.
pub fn parse_type(cursor: &mut Cursor, context: Option<TypeContext>) -> ParseResult<Option<IdlType>> {
    if let Some(idl_type) = single_type(cursor, context)? {
        return Ok(Some(idl_type));
    }
    union_type(cursor, context)
}

fn generic_type(cursor: &mut Cursor, context: Option<TypeContext>) -> ParseResult<Option<IdlType>> {
    let Some(base) = cursor.consume(GENERIC_TYPES) else {
        return Ok(None);
    };
    let generic = base.value.clone();
    let open = cursor.expect(&["<"], &format!("No opening bracket after {generic}"))?;

    let mut subtypes = Vec::new();
    match generic.as_str() {
        "Promise" => {
            if cursor.probe("[") {
                return Err(cursor.error("Promise type cannot have extended attribute"));
            }
            let subtype = return_type(cursor, context.unwrap_or(TypeContext::ReturnType))?
                .ok_or_else(|| cursor.error("Missing Promise subtype"))?;
            subtypes.push(subtype);
        }
        "record" => {
            if cursor.probe("[") {
                return Err(cursor.error("Record key cannot have extended attribute"));
            }
            let key = cursor.consume(STRING_TYPES).ok_or_else(|| {
                cursor.error(format!("Record key must be one of: {}", STRING_TYPES.join(", ")))
            })?;
            let mut key_type = IdlType::new(TypeTokens {
                base: Some(key),
                ..TypeTokens::default()
            });
            key_type.context = context;
            key_type.tokens.separator = Some(cursor.expect(&[","], "Missing comma after record key type")?);
            let value_type = type_with_extended_attributes(cursor, context)?
                .ok_or_else(|| cursor.error("Error parsing generic type record"))?;
            subtypes.push(key_type);
            subtypes.push(value_type);
        }
        _ => {
            let subtype = type_with_extended_attributes(cursor, context)?
                .ok_or_else(|| cursor.error(format!("Missing {generic} subtype")))?;
            subtypes.push(subtype);
        }
    }

    let close = cursor.expect(&[">"], &format!("Missing closing bracket after {generic}"))?;
    let mut idl_type = IdlType::new(TypeTokens {
        base: Some(base),
        open: Some(open),
        close: Some(close),
        ..TypeTokens::default()
    });
    idl_type.subtypes = subtypes;
    Ok(Some(idl_type))
}

fn type_suffix(cursor: &mut Cursor, idl_type: &mut IdlType) -> ParseResult<()> {
    idl_type.tokens.nullable = cursor.consume(&["?"]);
    if idl_type.nullable() && cursor.probe("?") {
        return Err(cursor.error("Can't nullable more than once"));
    }
    Ok(())
}

fn single_type(cursor: &mut Cursor, context: Option<TypeContext>) -> ParseResult<Option<IdlType>> {
    let mut idl_type = match generic_type(cursor, context)? {
        Some(idl_type) => idl_type,
        None => match primitive_type(cursor)? {
            Some(idl_type) => idl_type,
            None => {
                let Some(base) = cursor
                    .consume_kind(&[TokenKind::Identifier])
                    .or_else(|| cursor.consume(STRING_TYPES))
                    .or_else(|| cursor.consume(TYPE_NAME_KEYWORDS))
                else {
                    return Ok(None);
                };
                if cursor.probe("<") {
                    return Err(cursor.error(format!("Unsupported generic type {}", base.value)));
                }
                IdlType::new(TypeTokens {
                    base: Some(base),
                    ..TypeTokens::default()
                })
            }
        },
    };

    if idl_type.generic() == "Promise" && cursor.probe("?") {
        return Err(cursor.error("Promise type cannot be nullable"));
    }
    idl_type.context = context;
    type_suffix(cursor, &mut idl_type)?;
    if idl_type.nullable() && idl_type.is_named("any") {
        return Err(cursor.error("Type `any` cannot be made nullable"));
    }
    Ok(Some(idl_type))
}

fn union_type(cursor: &mut Cursor, context: Option<TypeContext>) -> ParseResult<Option<IdlType>> {
    let Some(open) = cursor.consume(&["("]) else {
        return Ok(None);
    };

    let mut subtypes = Vec::new();
    loop {
        let mut subtype = type_with_extended_attributes(cursor, context)?
            .ok_or_else(|| cursor.error("No type after open parenthesis or 'or' in union type"))?;
        if subtype.is_named("any") {
            return Err(cursor.error("Type `any` cannot be included in a union type"));
        }
        if subtype.generic() == "Promise" {
            return Err(cursor.error("Type `Promise` cannot be included in a union type"));
        }
        subtype.tokens.separator = cursor.consume(&["or"]);
        let more = subtype.tokens.separator.is_some();
        subtypes.push(subtype);
        if !more {
            break;
        }
    }
    if subtypes.len() < 2 {
        return Err(cursor.error("At least two types are expected in a union type but found less"));
    }

    let close = cursor.expect(&[")"], "Unterminated union type")?;
    let mut idl_type = IdlType::new(TypeTokens {
        open: Some(open),
        close: Some(close),
        ..TypeTokens::default()
    });
    idl_type.subtypes = subtypes;
    idl_type.context = context;
    type_suffix(cursor, &mut idl_type)?;
    Ok(Some(idl_type))
}
