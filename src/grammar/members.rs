//! Member productions.

use log::trace;

use crate::ast::{
    Attribute, AttributeTokens, Constant, ConstantTokens, Constructor, ConstructorTokens,
    ExtendedAttributes, Field, FieldTokens, IdlType, IterableKind, IterableLike, IterableLikeTokens,
    Member, Operation, OperationTokens, TypeContext, TypeTokens,
};
use crate::cursor::{Cursor, ParseResult};
use crate::extensions::{AttributeRules, MemberParser};
use crate::token::{Token, TokenKind};

use super::definitions::typedef;
use super::helpers::{
    argument_list, const_value, default_value, primitive_type, return_type, type_with_extended_attributes,
};

impl MemberParser {
    /// Runs this entry of a member table.
    pub(crate) fn parse(&self, cursor: &mut Cursor) -> ParseResult<Option<Member>> {
        trace!("trying {} member at token {}", self.label(), cursor.position());
        match self {
            MemberParser::Constant => Ok(constant(cursor)?.map(Member::Constant)),
            MemberParser::Constructor => Ok(constructor(cursor)?.map(Member::Constructor)),
            MemberParser::Static => static_member(cursor),
            MemberParser::Stringifier => stringifier(cursor),
            MemberParser::IterableLike => Ok(iterable_like(cursor)?.map(Member::IterableLike)),
            MemberParser::Attribute(rules) => Ok(attribute(cursor, None, *rules)?.map(Member::Attribute)),
            MemberParser::Operation { regular } => Ok(operation(cursor, None, *regular)?.map(Member::Operation)),
            MemberParser::Field => Ok(field(cursor)?.map(Member::Field)),
            MemberParser::Typedef => {
                let enclosing = cursor.current().cloned();
                let parsed = typedef(cursor)?;
                cursor.restore_current(enclosing);
                Ok(parsed.map(Member::Typedef))
            }
            MemberParser::Extension(production) => production(cursor),
        }
    }
}

/// `inherit? readonly? attribute Type name;`
pub fn attribute(cursor: &mut Cursor, special: Option<Token>, rules: AttributeRules) -> ParseResult<Option<Attribute>> {
    let start = cursor.checkpoint();
    let mut special = special;
    if special.is_none() && !rules.no_inherit {
        special = cursor.consume(&["inherit"]);
    }
    if special.as_ref().map_or(false, |s| s.is("inherit")) && cursor.probe("readonly") {
        return Err(cursor.error("Inherited attributes cannot be read-only"));
    }
    let readonly = cursor.consume(&["readonly"]);
    if rules.readonly && readonly.is_none() && cursor.probe("attribute") {
        return Err(cursor.error("Attributes must be readonly in this context"));
    }
    let Some(base) = cursor.consume(&["attribute"]) else {
        cursor.rewind(start);
        return Ok(None);
    };

    let idl_type = type_with_extended_attributes(cursor, Some(TypeContext::AttributeType))?
        .ok_or_else(|| cursor.error("Attribute lacks a type"))?;
    let name = cursor
        .consume_kind(&[TokenKind::Identifier])
        .or_else(|| cursor.consume(&["async", "required"]))
        .ok_or_else(|| cursor.error("Attribute lacks a name"))?;
    let termination = cursor.expect(&[";"], "Unterminated attribute, expected `;`")?;

    Ok(Some(Attribute {
        tokens: AttributeTokens {
            special,
            readonly,
            base,
            name,
            termination,
        },
        ext_attrs: ExtendedAttributes::default(),
        idl_type,
        parent: None,
    }))
}

/// Regular and special operations. Without a special keyword the
/// production only commits once a return type has been read.
pub fn operation(cursor: &mut Cursor, special: Option<Token>, regular: bool) -> ParseResult<Option<Operation>> {
    if special.as_ref().map_or(false, |s| s.is("stringifier")) && cursor.probe(";") {
        let termination = cursor.expect(&[";"], "Unterminated stringifier")?;
        return Ok(Some(Operation {
            tokens: OperationTokens {
                special,
                name: None,
                open: None,
                close: None,
                termination,
            },
            ext_attrs: ExtendedAttributes::default(),
            idl_type: None,
            arguments: Vec::new(),
            parent: None,
        }));
    }

    let start = cursor.checkpoint();
    let mut special = special;
    if special.is_none() && !regular {
        special = cursor.consume(&["getter", "setter", "deleter"]);
    }
    let Some(idl_type) = return_type(cursor, TypeContext::ReturnType)? else {
        if special.is_some() {
            return Err(cursor.error("Missing return type"));
        }
        cursor.rewind(start);
        return Ok(None);
    };

    let name = cursor
        .consume_kind(&[TokenKind::Identifier])
        .or_else(|| cursor.consume(&["includes"]));
    let open = cursor.expect(&["("], "Invalid operation")?;
    let arguments = argument_list(cursor)?;
    let close = cursor.expect(&[")"], "Unterminated operation")?;
    let termination = cursor.expect(&[";"], "Unterminated operation, expected `;`")?;

    Ok(Some(Operation {
        tokens: OperationTokens {
            special,
            name,
            open: Some(open),
            close: Some(close),
            termination,
        },
        ext_attrs: ExtendedAttributes::default(),
        idl_type: Some(idl_type),
        arguments,
        parent: None,
    }))
}

/// `const Type name = value;`
pub fn constant(cursor: &mut Cursor) -> ParseResult<Option<Constant>> {
    let Some(base) = cursor.consume(&["const"]) else {
        return Ok(None);
    };
    let mut idl_type = match primitive_type(cursor)? {
        Some(idl_type) => idl_type,
        None => {
            let name = cursor.expect_kind(&[TokenKind::Identifier], "Const lacks a type")?;
            IdlType::new(TypeTokens {
                base: Some(name),
                ..TypeTokens::default()
            })
        }
    };
    if cursor.probe("?") {
        return Err(cursor.error("Unexpected nullable constant type"));
    }
    idl_type.context = Some(TypeContext::ConstType);

    let name = cursor.expect_kind(&[TokenKind::Identifier], "Const lacks a name")?;
    let assign = cursor.expect(&["="], "Const lacks value assignment")?;
    let value = const_value(cursor).ok_or_else(|| cursor.error("Const lacks a value"))?;
    let termination = cursor.expect(&[";"], "Unterminated const, expected `;`")?;

    Ok(Some(Constant {
        tokens: ConstantTokens {
            base,
            name,
            assign,
            value,
            termination,
        },
        ext_attrs: ExtendedAttributes::default(),
        idl_type,
        parent: None,
    }))
}

/// `constructor(arguments);`
pub fn constructor(cursor: &mut Cursor) -> ParseResult<Option<Constructor>> {
    let Some(base) = cursor.consume(&["constructor"]) else {
        return Ok(None);
    };
    let open = cursor.expect(&["("], "No argument list in constructor")?;
    let arguments = argument_list(cursor)?;
    let close = cursor.expect(&[")"], "Unterminated constructor")?;
    let termination = cursor.expect(&[";"], "No semicolon after constructor")?;
    Ok(Some(Constructor {
        tokens: ConstructorTokens {
            base,
            open,
            close,
            termination,
        },
        ext_attrs: ExtendedAttributes::default(),
        arguments,
        parent: None,
    }))
}

/// `static` followed by an attribute or a regular operation.
pub fn static_member(cursor: &mut Cursor) -> ParseResult<Option<Member>> {
    let Some(special) = cursor.consume(&["static"]) else {
        return Ok(None);
    };
    if let Some(attribute) = attribute(cursor, Some(special.clone()), AttributeRules::default())? {
        return Ok(Some(Member::Attribute(attribute)));
    }
    if let Some(operation) = operation(cursor, Some(special), false)? {
        return Ok(Some(Member::Operation(operation)));
    }
    Err(cursor.error("No body in static member"))
}

/// `stringifier;`, or `stringifier` followed by an attribute or operation.
pub fn stringifier(cursor: &mut Cursor) -> ParseResult<Option<Member>> {
    let Some(special) = cursor.consume(&["stringifier"]) else {
        return Ok(None);
    };
    if let Some(attribute) = attribute(cursor, Some(special.clone()), AttributeRules::default())? {
        return Ok(Some(Member::Attribute(attribute)));
    }
    if let Some(operation) = operation(cursor, Some(special), false)? {
        return Ok(Some(Member::Operation(operation)));
    }
    Err(cursor.error("Unterminated stringifier"))
}

/// `iterable<...>`, `async iterable<...>(...)`, `readonly? maplike<K, V>`,
/// `readonly? setlike<T>` and their legacy spellings.
pub fn iterable_like(cursor: &mut Cursor) -> ParseResult<Option<IterableLike>> {
    let start = cursor.checkpoint();
    let readonly = cursor.consume(&["readonly"]);
    let async_ = if readonly.is_none() {
        cursor.consume(&["async"])
    } else {
        None
    };
    let base = if readonly.is_some() {
        cursor.consume(&["maplike", "setlike"])
    } else if async_.is_some() {
        cursor.consume(&["iterable"])
    } else {
        cursor.consume(&["iterable", "async_iterable", "legacyiterable", "maplike", "setlike"])
    };
    let Some(base) = base else {
        cursor.rewind(start);
        return Ok(None);
    };
    let Some(kind) = IterableKind::from_keyword(&base.value) else {
        cursor.rewind(start);
        return Ok(None);
    };

    let type_name = base.value.clone();
    let is_async = async_.is_some() || kind == IterableKind::AsyncIterable;
    let second_required = kind == IterableKind::Maplike;
    let second_allowed = second_required || matches!(kind, IterableKind::Iterable | IterableKind::AsyncIterable);

    let open = cursor.expect(&["<"], &format!("Missing less-than sign `<` in {type_name} declaration"))?;
    let first = type_with_extended_attributes(cursor, None)?
        .ok_or_else(|| cursor.error(format!("Missing a type argument in {type_name} declaration")))?;
    let mut idl_types = vec![first];
    if second_allowed {
        let separator = cursor.consume(&[","]);
        if separator.is_some() {
            idl_types[0].tokens.separator = separator;
            let second = type_with_extended_attributes(cursor, None)?
                .ok_or_else(|| cursor.error(format!("Missing second type argument in {type_name} declaration")))?;
            idl_types.push(second);
        } else if second_required {
            return Err(cursor.error(format!("Missing second type argument in {type_name} declaration")));
        }
    }
    let close = cursor.expect(&[">"], &format!("Missing greater-than sign `>` in {type_name} declaration"))?;

    let mut args_open = None;
    let mut args_close = None;
    let mut arguments = Vec::new();
    if cursor.probe("(") {
        if !is_async {
            return Err(cursor.error("Arguments are only allowed for `async iterable`"));
        }
        args_open = cursor.consume(&["("]);
        arguments = argument_list(cursor)?;
        args_close = Some(cursor.expect(&[")"], "Unterminated async iterable argument list")?);
    }
    let termination = cursor.expect(&[";"], &format!("Missing semicolon after {type_name} declaration"))?;

    Ok(Some(IterableLike {
        kind,
        tokens: IterableLikeTokens {
            readonly,
            async_,
            base,
            open,
            close,
            args_open,
            args_close,
            termination,
        },
        ext_attrs: ExtendedAttributes::default(),
        idl_types,
        arguments,
        parent: None,
    }))
}

/// `required? Type name (= default)?;`
pub fn field(cursor: &mut Cursor) -> ParseResult<Option<Field>> {
    let required = cursor.consume(&["required"]);
    let Some(idl_type) = type_with_extended_attributes(cursor, Some(TypeContext::DictionaryType))? else {
        if required.is_some() {
            return Err(cursor.error("Dictionary member lacks a type"));
        }
        return Ok(None);
    };
    let name = cursor.expect_kind(&[TokenKind::Identifier], "Dictionary member lacks a name")?;
    let default = default_value(cursor)?;
    if required.is_some() && default.is_some() {
        return Err(cursor.error("Required member must not have a default"));
    }
    let termination = cursor.expect(&[";"], "Unterminated dictionary member, expected `;`")?;
    Ok(Some(Field {
        tokens: FieldTokens {
            required,
            name,
            termination,
        },
        ext_attrs: ExtendedAttributes::default(),
        idl_type,
        default,
        parent: None,
    }))
}
