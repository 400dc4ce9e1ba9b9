//! Mechanical repairs attached to validation diagnostics.
//!
//! A fix addresses its target by position (definition index, member index,
//! argument index) rather than by reference, so it can be carried out of a
//! validation run and applied to the same definitions mutably afterwards.
//! New fragments are produced by running the regular productions over a
//! short source snippet.

use log::debug;
use serde::Serialize;

use crate::ast::{
    Argument, Container, Definition, ExtendedAttributes, ExtendedAttributesTokens, IdlType, Member,
    Walk,
};
use crate::grammar::extended_attributes::extended_attribute;
use crate::grammar::helpers::default_value;
use crate::grammar::members::constructor;
use crate::grammar::parse_fragment;
use crate::token::{Token, TokenKind};

/// Where an extended attribute list lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtAttrTarget {
    pub definition: usize,
    pub member: Option<usize>,
}

/// An argument of a callback (`member: None`) or of an operation or
/// constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArgumentPath {
    pub definition: usize,
    pub member: Option<usize>,
    pub argument: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "fix", rename_all = "kebab-case")]
pub enum Autofix {
    /// Adds `[Exposed=Window]` to an interface or namespace.
    AddExposedWindow { definition: usize },
    /// Turns `[Constructor(...)]` into a `constructor(...);` member.
    ConstructorOperation { definition: usize, ext_attr: usize },
    /// Renames a legacy extended attribute.
    RenameExtendedAttribute {
        target: ExtAttrTarget,
        index: usize,
        name: String,
    },
    MakeArgumentOptional(ArgumentPath),
    /// Adds `= {}` to an optional dictionary argument.
    AddEmptyDictionaryDefault(ArgumentPath),
    /// Replaces a `void` return type with `undefined`.
    ReplaceVoid { definition: usize, member: Option<usize> },
}

impl Autofix {
    /// Applies the fix. Returns false when the target no longer exists or no
    /// longer needs fixing.
    pub fn apply(&self, definitions: &mut [Definition]) -> bool {
        let applied = match self {
            Autofix::AddExposedWindow { definition } => definitions
                .get_mut(*definition)
                .and_then(Definition::as_container_mut)
                .is_some_and(add_exposed_window),
            Autofix::ConstructorOperation { definition, ext_attr } => definitions
                .get_mut(*definition)
                .and_then(Definition::as_container_mut)
                .is_some_and(|container| constructor_operation(container, *ext_attr)),
            Autofix::RenameExtendedAttribute { target, index, name } => {
                ext_attrs_mut(definitions, *target).is_some_and(|list| rename(list, *index, name))
            }
            Autofix::MakeArgumentOptional(path) => {
                argument_mut(definitions, *path).is_some_and(make_optional)
            }
            Autofix::AddEmptyDictionaryDefault(path) => {
                argument_mut(definitions, *path).is_some_and(add_empty_default)
            }
            Autofix::ReplaceVoid { definition, member } => {
                return_type_mut(definitions, *definition, *member).is_some_and(replace_void)
            }
        };
        if applied {
            debug!("applied autofix {self:?}");
            if let Some(definition) = definitions.get_mut(self.definition()) {
                definition.relink();
            }
        }
        applied
    }

    fn definition(&self) -> usize {
        match self {
            Autofix::AddExposedWindow { definition }
            | Autofix::ConstructorOperation { definition, .. }
            | Autofix::ReplaceVoid { definition, .. } => *definition,
            Autofix::RenameExtendedAttribute { target, .. } => target.definition,
            Autofix::MakeArgumentOptional(path) | Autofix::AddEmptyDictionaryDefault(path) => path.definition,
        }
    }
}

// ============================================================================
// LOOKUPS
// ============================================================================

fn ext_attrs_mut(definitions: &mut [Definition], target: ExtAttrTarget) -> Option<&mut ExtendedAttributes> {
    let definition = definitions.get_mut(target.definition)?;
    match target.member {
        None => definition.ext_attrs_mut(),
        Some(member) => Some(
            definition
                .as_container_mut()?
                .members
                .get_mut(member)?
                .ext_attrs_mut(),
        ),
    }
}

fn argument_mut(definitions: &mut [Definition], path: ArgumentPath) -> Option<&mut Argument> {
    let definition = definitions.get_mut(path.definition)?;
    let arguments = match (definition, path.member) {
        (Definition::Callback(callback), None) => &mut callback.arguments,
        (Definition::Container(container), Some(member)) => match container.members.get_mut(member)? {
            Member::Operation(operation) => &mut operation.arguments,
            Member::Constructor(constructor) => &mut constructor.arguments,
            _ => return None,
        },
        _ => return None,
    };
    arguments.get_mut(path.argument)
}

fn return_type_mut(definitions: &mut [Definition], definition: usize, member: Option<usize>) -> Option<&mut IdlType> {
    match (definitions.get_mut(definition)?, member) {
        (Definition::Callback(callback), None) => Some(&mut callback.idl_type),
        (Definition::Container(container), Some(member)) => match container.members.get_mut(member)? {
            Member::Operation(operation) => operation.idl_type.as_mut(),
            _ => None,
        },
        _ => None,
    }
}

/// Whitespace after the last line break of `trivia`.
fn indentation(trivia: &str) -> &str {
    let last_line = trivia.rsplit('\n').next().unwrap_or_default();
    if trivia.contains('\n') && last_line.chars().all(char::is_whitespace) {
        last_line
    } else {
        ""
    }
}

fn member_indentation(container: &Container) -> String {
    let first = container
        .members
        .first()
        .and_then(|member| member.tokens().first().map(|token| indentation(&token.trivia).to_owned()));
    first.unwrap_or_else(|| format!("{}  ", indentation(&container.tokens.close.trivia)))
}

// ============================================================================
// FIXES
// ============================================================================

fn add_exposed_window(container: &mut Container) -> bool {
    if container.ext_attrs.contains("Exposed") {
        return false;
    }
    let Some(exposed) = parse_fragment("Exposed=Window", extended_attribute) else {
        return false;
    };
    if container.ext_attrs.tokens.open.is_some() {
        container.ext_attrs.prepend(exposed);
        return true;
    }

    let leading = container.leading_token_mut();
    let trivia = std::mem::take(&mut leading.trivia);
    leading.trivia = format!("\n{}", indentation(&trivia));
    container.ext_attrs = ExtendedAttributes {
        tokens: ExtendedAttributesTokens {
            open: Some(Token::synthetic(TokenKind::Punctuation, "[", trivia)),
            close: Some(Token::synthetic(TokenKind::Punctuation, "]", "")),
        },
        items: vec![exposed],
    };
    true
}

fn constructor_operation(container: &mut Container, ext_attr: usize) -> bool {
    if container
        .ext_attrs
        .items
        .get(ext_attr)
        .map_or(true, |item| item.name() != "Constructor")
    {
        return false;
    }

    let open_trivia = container
        .ext_attrs
        .tokens
        .open
        .as_ref()
        .map(|open| open.trivia.clone())
        .unwrap_or_default();
    let removed = container.ext_attrs.remove(ext_attr);
    if container.ext_attrs.is_empty() {
        container.leading_token_mut().trivia = open_trivia;
    }

    let arguments = removed.params.arguments.source_text();
    let Some(mut operation) = parse_fragment(&format!("constructor({});", arguments.trim()), constructor) else {
        return false;
    };
    let indent = member_indentation(container);
    operation.tokens.base.trivia = format!("\n{indent}");

    if container.members.is_empty() && !container.tokens.close.trivia.contains('\n') {
        container.tokens.close.trivia = format!("\n{}", indentation(&container.tokens.close.trivia));
    }
    let position = container
        .members
        .iter()
        .rposition(|member| matches!(member, Member::Constructor(_)))
        .map_or(0, |last| last + 1);
    container.members.insert(position, Member::Constructor(operation));
    true
}

fn rename(list: &mut ExtendedAttributes, index: usize, name: &str) -> bool {
    let Some(item) = list.items.get_mut(index) else {
        return false;
    };
    if item.tokens.name.value == name {
        return false;
    }
    item.tokens.name.value = name.to_owned();
    if name == "LegacyNullToEmptyString" {
        item.params = Default::default();
    }
    true
}

fn make_optional(argument: &mut Argument) -> bool {
    if argument.optional() {
        return false;
    }
    let Some(first) = argument.idl_type.first_token_mut() else {
        return false;
    };
    let trivia = std::mem::replace(&mut first.trivia, " ".to_owned());
    argument.tokens.optional = Some(Token::synthetic(TokenKind::Keyword, "optional", trivia));
    add_empty_default(argument);
    true
}

fn add_empty_default(argument: &mut Argument) -> bool {
    if argument.default.is_some() || !argument.optional() {
        return false;
    }
    argument.default = parse_fragment(" = {}", default_value);
    argument.default.is_some()
}

fn replace_void(idl_type: &mut IdlType) -> bool {
    match &mut idl_type.tokens.base {
        Some(base) if idl_type.subtypes.is_empty() && base.value == "void" => {
            base.value = "undefined".to_owned();
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_takes_the_last_line() {
        assert_eq!(indentation("\n\n  "), "  ");
        assert_eq!(indentation(" "), "");
        assert_eq!(indentation("\n// note\n\t"), "\t");
    }
}
