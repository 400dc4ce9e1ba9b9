//! Small productions shared by the definition and member grammars.

use crate::ast::{
    Argument, ArgumentTokens, DefaultValue, EnumValue, EnumValueTokens, ExtendedAttribute, IdlType,
    TypeContext, TypeTokens, WrappedToken,
};
use crate::cursor::{Cursor, ParseResult};
use crate::token::{Token, TokenKind, ARGUMENT_NAME_KEYWORDS};

use super::extended_attributes::extended_attributes;
use super::types::parse_type;

/// A list item that can carry a trailing comma.
pub trait Separated {
    fn set_separator(&mut self, separator: Option<Token>);
}

impl Separated for Argument {
    fn set_separator(&mut self, separator: Option<Token>) {
        self.tokens.separator = separator;
    }
}

impl Separated for WrappedToken {
    fn set_separator(&mut self, separator: Option<Token>) {
        self.tokens.separator = separator;
    }
}

impl Separated for EnumValue {
    fn set_separator(&mut self, separator: Option<Token>) {
        self.tokens.separator = separator;
    }
}

impl Separated for ExtendedAttribute {
    fn set_separator(&mut self, separator: Option<Token>) {
        self.tokens.separator = separator;
    }
}

/// Parses a comma separated list. An empty list is fine; a comma followed by
/// nothing is only accepted when `allow_dangler` is set.
pub fn list<T, F>(cursor: &mut Cursor, mut parser: F, list_name: &str, allow_dangler: bool) -> ParseResult<Vec<T>>
where
    T: Separated,
    F: FnMut(&mut Cursor) -> ParseResult<Option<T>>,
{
    let mut items = Vec::new();
    let Some(mut first) = parser(cursor)? else {
        return Ok(items);
    };
    let separator = cursor.consume(&[","]);
    let mut more = separator.is_some();
    first.set_separator(separator);
    items.push(first);

    while more {
        match parser(cursor)? {
            Some(mut item) => {
                let separator = cursor.consume(&[","]);
                more = separator.is_some();
                item.set_separator(separator);
                items.push(item);
            }
            None => {
                if !allow_dangler {
                    return Err(cursor.error(format!("Trailing comma in {list_name}")));
                }
                break;
            }
        }
    }
    Ok(items)
}

/// Number, boolean, `Infinity`, `-Infinity` or `NaN`.
pub fn const_value(cursor: &mut Cursor) -> Option<Token> {
    cursor
        .consume_kind(&[TokenKind::Float, TokenKind::Integer])
        .or_else(|| cursor.consume(&["true", "false", "Infinity", "-Infinity", "NaN"]))
}

/// Integer, floating point, `bigint`, `boolean`, `byte`, `octet` or
/// `undefined`.
pub fn primitive_type(cursor: &mut Cursor) -> ParseResult<Option<IdlType>> {
    let prefix = cursor.consume(&["unsigned"]);
    if let Some(base) = cursor.consume(&["short", "long"]) {
        let postfix = if base.is("long") {
            cursor.consume(&["long"])
        } else {
            None
        };
        return Ok(Some(IdlType::new(TypeTokens {
            prefix,
            base: Some(base),
            postfix,
            ..TypeTokens::default()
        })));
    }
    if prefix.is_some() {
        return Err(cursor.error("Failed to parse integer type"));
    }

    let prefix = cursor.consume(&["unrestricted"]);
    if let Some(base) = cursor.consume(&["float", "double"]) {
        return Ok(Some(IdlType::new(TypeTokens {
            prefix,
            base: Some(base),
            ..TypeTokens::default()
        })));
    }
    if prefix.is_some() {
        return Err(cursor.error("Failed to parse float type"));
    }

    Ok(cursor
        .consume(&["bigint", "boolean", "byte", "octet", "undefined"])
        .map(|base| {
            IdlType::new(TypeTokens {
                base: Some(base),
                ..TypeTokens::default()
            })
        }))
}

/// A type with optional leading extended attributes. Rewinds if no type
/// follows the attributes.
pub fn type_with_extended_attributes(cursor: &mut Cursor, context: Option<TypeContext>) -> ParseResult<Option<IdlType>> {
    let start = cursor.checkpoint();
    let ext_attrs = extended_attributes(cursor)?;
    match parse_type(cursor, context)? {
        Some(mut idl_type) => {
            idl_type.ext_attrs = ext_attrs;
            Ok(Some(idl_type))
        }
        None => {
            cursor.rewind(start);
            Ok(None)
        }
    }
}

/// A return type: any type, or the legacy `void`.
pub fn return_type(cursor: &mut Cursor, context: TypeContext) -> ParseResult<Option<IdlType>> {
    if let Some(idl_type) = parse_type(cursor, Some(context))? {
        return Ok(Some(idl_type));
    }
    Ok(cursor.consume(&["void"]).map(|base| {
        let mut idl_type = IdlType::new(TypeTokens {
            base: Some(base),
            ..TypeTokens::default()
        });
        idl_type.context = Some(context);
        idl_type
    }))
}

/// `: Parent`, returning the colon and the parent name.
pub fn inheritance(cursor: &mut Cursor) -> ParseResult<(Option<Token>, Option<Token>)> {
    let Some(colon) = cursor.consume(&[":"]) else {
        return Ok((None, None));
    };
    let parent = cursor.expect_kind(&[TokenKind::Identifier], "Inheritance lacks a type")?;
    Ok((Some(colon), Some(parent)))
}

/// `= value`, where value is a constant, a string, `null`, `[]` or `{}`.
pub fn default_value(cursor: &mut Cursor) -> ParseResult<Option<DefaultValue>> {
    let Some(assign) = cursor.consume(&["="]) else {
        return Ok(None);
    };
    let value = const_value(cursor)
        .or_else(|| cursor.consume_kind(&[TokenKind::String]))
        .or_else(|| cursor.consume(&["null", "[", "{"]))
        .ok_or_else(|| cursor.error("No value for default"))?;

    let mut expression = vec![value];
    if expression[0].kind == TokenKind::Punctuation {
        if expression[0].is("[") {
            expression.push(cursor.expect(&["]"], "Default sequence value must be empty")?);
        } else if expression[0].is("{") {
            expression.push(cursor.expect(&["}"], "Default dictionary value must be empty")?);
        }
    }
    Ok(Some(DefaultValue { assign, expression }))
}

/// `[ext] optional? Type ...? name (= default)?`
pub fn argument(cursor: &mut Cursor) -> ParseResult<Option<Argument>> {
    let start = cursor.checkpoint();
    let ext_attrs = extended_attributes(cursor)?;
    let optional = cursor.consume(&["optional"]);
    let Some(idl_type) = type_with_extended_attributes(cursor, Some(TypeContext::ArgumentType))? else {
        cursor.rewind(start);
        return Ok(None);
    };
    let variadic = if optional.is_none() {
        cursor.consume(&["..."])
    } else {
        None
    };
    let Some(name) = cursor
        .consume_kind(&[TokenKind::Identifier])
        .or_else(|| cursor.consume(ARGUMENT_NAME_KEYWORDS))
    else {
        cursor.rewind(start);
        return Ok(None);
    };
    let default = if optional.is_some() {
        default_value(cursor)?
    } else {
        None
    };
    Ok(Some(Argument {
        tokens: ArgumentTokens {
            optional,
            variadic,
            name,
            separator: None,
        },
        ext_attrs,
        idl_type,
        default,
        parent: None,
    }))
}

pub fn argument_list(cursor: &mut Cursor) -> ParseResult<Vec<Argument>> {
    list(cursor, argument, "arguments list", false)
}

pub fn enum_value(cursor: &mut Cursor) -> ParseResult<Option<EnumValue>> {
    Ok(cursor.consume_kind(&[TokenKind::String]).map(|value| EnumValue {
        tokens: EnumValueTokens {
            value,
            separator: None,
        },
        parent: None,
    }))
}
