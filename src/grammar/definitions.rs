//! Top-level productions.

use log::{debug, trace};

use crate::ast::{
    CallbackFunction, CallbackTokens, Container, ContainerKind, ContainerTokens, Definition, Enum,
    EnumTokens, Eof, Includes, IncludesTokens, NodeContext, NodeKind, TypeContext, Typedef,
    TypedefTokens,
};
use crate::cursor::{Cursor, ParseResult};
use crate::extensions::Dispatch;
use crate::token::{Token, TokenKind};

use super::extended_attributes::extended_attributes;
use super::helpers::{argument_list, enum_value, list, return_type, type_with_extended_attributes};

/// Definitions until the end of input.
pub(crate) fn definitions(cursor: &mut Cursor, dispatch: &Dispatch, concrete: bool) -> ParseResult<Vec<Definition>> {
    let mut parsed = Vec::new();
    loop {
        let ext_attrs = extended_attributes(cursor)?;
        match definition(cursor, dispatch)? {
            Some(mut definition) => {
                if !ext_attrs.is_empty() {
                    if let Some(slot) = definition.ext_attrs_mut() {
                        *slot = ext_attrs;
                    }
                }
                parsed.push(definition);
            }
            None => {
                if !ext_attrs.is_empty() {
                    return Err(cursor.error("Stray extended attributes"));
                }
                break;
            }
        }
    }

    let eof = cursor.consume_kind(&[TokenKind::Eof]);
    if !cursor.is_exhausted() {
        return Err(cursor.error("Unrecognised tokens"));
    }
    if concrete {
        if let Some(value) = eof {
            parsed.push(Definition::Eof(Eof { value }));
        }
    }
    Ok(parsed)
}

fn definition(cursor: &mut Cursor, dispatch: &Dispatch) -> ParseResult<Option<Definition>> {
    for production in &dispatch.before {
        if let Some(definition) = production(cursor)? {
            return Ok(Some(definition));
        }
    }

    if let Some(definition) = callback(cursor, dispatch)? {
        return Ok(Some(definition));
    }
    if let Some(container) = interface(cursor, dispatch, None)? {
        return Ok(Some(Definition::Container(container)));
    }
    if let Some(container) = partial(cursor, dispatch)? {
        return Ok(Some(Definition::Container(container)));
    }
    if let Some(container) = dictionary(cursor, dispatch, None)? {
        return Ok(Some(Definition::Container(container)));
    }
    if let Some(enumeration) = enumeration(cursor)? {
        return Ok(Some(Definition::Enum(enumeration)));
    }
    if let Some(typedef) = typedef(cursor)? {
        return Ok(Some(Definition::Typedef(typedef)));
    }
    if let Some(includes) = includes(cursor)? {
        return Ok(Some(Definition::Includes(includes)));
    }
    if let Some(container) = namespace(cursor, dispatch, None)? {
        return Ok(Some(Definition::Container(container)));
    }

    for production in &dispatch.after {
        if let Some(definition) = production(cursor)? {
            return Ok(Some(definition));
        }
    }
    Ok(None)
}

/// Keywords that open a container, in source order.
struct Head {
    callback: Option<Token>,
    partial: Option<Token>,
    base: Token,
    mixin: Option<Token>,
}

impl Head {
    fn new(base: Token, partial: Option<Token>) -> Self {
        Self {
            callback: None,
            partial,
            base,
            mixin: None,
        }
    }
}

/// Name, inheritance and the member body shared by every container.
fn container(cursor: &mut Cursor, dispatch: &Dispatch, kind: ContainerKind, head: Head) -> ParseResult<Container> {
    let name = cursor
        .consume_kind(&[TokenKind::Identifier])
        .ok_or_else(|| cursor.error(format!("Missing name in {kind}")))?;
    cursor.set_current(NodeContext::new(
        kind.node_kind(),
        Some(name.unescaped().to_owned()),
        head.partial.is_some(),
    ));

    let (colon, inheritance) = if kind.is_inheritable() && head.partial.is_none() {
        super::helpers::inheritance(cursor)?
    } else {
        (None, None)
    };
    let open = cursor.expect(&["{"], &format!("Bodyless {kind}"))?;

    let mut members = Vec::new();
    let close = loop {
        if let Some(close) = cursor.consume(&["}"]) {
            break close;
        }
        if cursor.probe_kind(TokenKind::Eof) {
            return Err(cursor.error(format!("Missing closing bracket after {kind} body")));
        }
        let ext_attrs = extended_attributes(cursor)?;
        let mut member = None;
        for parser in dispatch.members(kind) {
            if let Some(parsed) = parser.parse(cursor)? {
                member = Some(parsed);
                break;
            }
        }
        let Some(mut member) = member else {
            return Err(cursor.error("Unknown member"));
        };
        if !ext_attrs.is_empty() {
            *member.ext_attrs_mut() = ext_attrs;
        }
        members.push(member);
    };
    let termination = cursor.expect(&[";"], &format!("Missing semicolon after {kind}"))?;

    debug!("parsed {} {} with {} members", kind, name.unescaped(), members.len());
    Ok(Container {
        kind,
        tokens: ContainerTokens {
            callback: head.callback,
            partial: head.partial,
            base: head.base,
            mixin: head.mixin,
            name,
            colon,
            inheritance,
            open,
            close,
            termination,
        },
        ext_attrs: Default::default(),
        members,
        parent: None,
    })
}

/// `callback interface ...` or `callback Name = Type (...);`
fn callback(cursor: &mut Cursor, dispatch: &Dispatch) -> ParseResult<Option<Definition>> {
    let Some(callback) = cursor.consume(&["callback"]) else {
        return Ok(None);
    };
    trace!("callback at line {}", callback.line);
    if let Some(base) = cursor.consume(&["interface"]) {
        let mut head = Head::new(base, None);
        head.callback = Some(callback);
        let container = container(cursor, dispatch, ContainerKind::CallbackInterface, head)?;
        return Ok(Some(Definition::Container(container)));
    }
    Ok(Some(Definition::Callback(callback_function(cursor, callback)?)))
}

fn callback_function(cursor: &mut Cursor, base: Token) -> ParseResult<CallbackFunction> {
    let name = cursor.expect_kind(&[TokenKind::Identifier], "Callback lacks a name")?;
    cursor.set_current(NodeContext::new(
        NodeKind::Callback,
        Some(name.unescaped().to_owned()),
        false,
    ));
    let assign = cursor.expect(&["="], "Callback lacks an assignment")?;
    let idl_type = return_type(cursor, TypeContext::ReturnType)?
        .ok_or_else(|| cursor.error("Callback lacks a return type"))?;
    let open = cursor.expect(&["("], "Callback lacks parentheses for arguments")?;
    let arguments = argument_list(cursor)?;
    let close = cursor.expect(&[")"], "Unterminated callback")?;
    let termination = cursor.expect(&[";"], "Unterminated callback, expected `;`")?;
    Ok(CallbackFunction {
        tokens: CallbackTokens {
            base,
            name,
            assign,
            open,
            close,
            termination,
        },
        ext_attrs: Default::default(),
        idl_type,
        arguments,
        parent: None,
    })
}

/// `interface` or `interface mixin`.
fn interface(cursor: &mut Cursor, dispatch: &Dispatch, partial: Option<Token>) -> ParseResult<Option<Container>> {
    let Some(base) = cursor.consume(&["interface"]) else {
        return Ok(None);
    };
    let mut head = Head::new(base, partial);
    if let Some(mixin) = cursor.consume(&["mixin"]) {
        head.mixin = Some(mixin);
        return Ok(Some(container(cursor, dispatch, ContainerKind::Mixin, head)?));
    }
    Ok(Some(container(cursor, dispatch, ContainerKind::Interface, head)?))
}

fn partial(cursor: &mut Cursor, dispatch: &Dispatch) -> ParseResult<Option<Container>> {
    let Some(partial) = cursor.consume(&["partial"]) else {
        return Ok(None);
    };
    if let Some(container) = dictionary(cursor, dispatch, Some(partial.clone()))? {
        return Ok(Some(container));
    }
    if let Some(container) = interface(cursor, dispatch, Some(partial.clone()))? {
        return Ok(Some(container));
    }
    if let Some(container) = namespace(cursor, dispatch, Some(partial))? {
        return Ok(Some(container));
    }
    Err(cursor.error("Partial doesn't apply to anything"))
}

fn dictionary(cursor: &mut Cursor, dispatch: &Dispatch, partial: Option<Token>) -> ParseResult<Option<Container>> {
    let Some(base) = cursor.consume(&["dictionary"]) else {
        return Ok(None);
    };
    let head = Head::new(base, partial);
    Ok(Some(container(cursor, dispatch, ContainerKind::Dictionary, head)?))
}

fn namespace(cursor: &mut Cursor, dispatch: &Dispatch, partial: Option<Token>) -> ParseResult<Option<Container>> {
    let Some(base) = cursor.consume(&["namespace"]) else {
        return Ok(None);
    };
    let head = Head::new(base, partial);
    Ok(Some(container(cursor, dispatch, ContainerKind::Namespace, head)?))
}

/// `enum Name { "a", "b" };`. A trailing comma after the last value is
/// accepted.
pub fn enumeration(cursor: &mut Cursor) -> ParseResult<Option<Enum>> {
    let Some(base) = cursor.consume(&["enum"]) else {
        return Ok(None);
    };
    let name = cursor.expect_kind(&[TokenKind::Identifier], "No name for enum")?;
    cursor.set_current(NodeContext::new(NodeKind::Enum, Some(name.unescaped().to_owned()), false));
    let open = cursor.expect(&["{"], "Bodyless enum")?;
    let values = list(cursor, enum_value, "enumeration", true)?;
    if cursor.probe_kind(TokenKind::String) {
        return Err(cursor.error("No comma between enum values"));
    }
    let close = cursor.expect(&["}"], "Unexpected value in enum")?;
    if values.is_empty() {
        return Err(cursor.error("No value in enum"));
    }
    let termination = cursor.expect(&[";"], "No semicolon after enum")?;
    Ok(Some(Enum {
        tokens: EnumTokens {
            base,
            name,
            open,
            close,
            termination,
        },
        ext_attrs: Default::default(),
        values,
        parent: None,
    }))
}

/// `typedef Type Name;`
pub fn typedef(cursor: &mut Cursor) -> ParseResult<Option<Typedef>> {
    let Some(base) = cursor.consume(&["typedef"]) else {
        return Ok(None);
    };
    let idl_type = type_with_extended_attributes(cursor, Some(TypeContext::TypedefType))?
        .ok_or_else(|| cursor.error("Typedef lacks a type"))?;
    let name = cursor.expect_kind(&[TokenKind::Identifier], "Typedef lacks a name")?;
    cursor.set_current(NodeContext::new(
        NodeKind::Typedef,
        Some(name.unescaped().to_owned()),
        false,
    ));
    let termination = cursor.expect(&[";"], "Unterminated typedef, expected `;`")?;
    Ok(Some(Typedef {
        tokens: TypedefTokens {
            base,
            name,
            termination,
        },
        ext_attrs: Default::default(),
        idl_type,
        parent: None,
    }))
}

/// `Target includes Mixin;`. Rewinds when the identifier is not followed by
/// `includes`.
pub fn includes(cursor: &mut Cursor) -> ParseResult<Option<Includes>> {
    let start = cursor.checkpoint();
    let Some(target) = cursor.consume_kind(&[TokenKind::Identifier]) else {
        return Ok(None);
    };
    let Some(includes) = cursor.consume(&["includes"]) else {
        cursor.rewind(start);
        return Ok(None);
    };
    let mixin = cursor.expect_kind(&[TokenKind::Identifier], "Incomplete includes statement")?;
    let termination = cursor.expect(&[";"], "No terminating ; for includes statement")?;
    Ok(Some(Includes {
        tokens: IncludesTokens {
            target,
            includes,
            mixin,
            termination,
        },
        ext_attrs: Default::default(),
        parent: None,
    }))
}
