//! The validation rules, one function per node family.

use std::collections::HashSet;

use crate::ast::{
    Argument, Attribute, Container, ContainerKind, Definition, ExtendedAttributes, IdlType, Member,
    Node, Operation,
};

use super::autofix::{ArgumentPath, Autofix, ExtAttrTarget};
use super::index::DefinitionIndex;
use super::Checker;

const REQUIRE_EXPOSED_INTERFACE: &str = "Interfaces must have `[Exposed]` extended attribute. \
To fix, add, for example, `[Exposed=Window]`. Please also consider carefully if your interface \
should also be exposed in a Worker scope. Refer to the \
[WebIDL spec section on Exposed](https://heycam.github.io/webidl/#Exposed) for more information.";

const REQUIRE_EXPOSED_NAMESPACE: &str = "Namespaces must have [Exposed] extended attribute. \
To fix, add, for example, [Exposed=Window]. Please also consider carefully if your namespace \
should also be exposed in a Worker scope. Refer to the \
[WebIDL spec section on Exposed](https://heycam.github.io/webidl/#Exposed) for more information.";

const CONSTRUCTOR_MEMBER: &str = "Constructors should now be represented as a `constructor()` \
operation on the interface instead of `[Constructor]` extended attribute. Refer to the \
[WebIDL spec section on constructor operations](https://heycam.github.io/webidl/#idl-constructors) \
for more information.";

const NO_INTERFACE_OBJECT: &str = "`[LegacyNoInterfaceObject]` extended attribute is an \
undesirable feature that may be removed from Web IDL in the future. Refer to the \
[relevant upstream PR](https://github.com/whatwg/webidl/pull/609) for more information.";

const REPLACE_VOID: &str = "`void` is now replaced by `undefined`. Refer to the \
[relevant GitHub issue](https://github.com/whatwg/webidl/issues/60) for more information.";

/// Legacy extended attribute names and their current spelling.
const RENAMED_LEGACIES: &[(&str, &str)] = &[
    ("LenientSetter", "LegacyLenientSetter"),
    ("LenientThis", "LegacyLenientThis"),
    ("NamedConstructor", "LegacyFactoryFunction"),
    ("NoInterfaceObject", "LegacyNoInterfaceObject"),
    ("OverrideBuiltins", "LegacyOverrideBuiltIns"),
    ("TreatNonObjectAsNull", "LegacyTreatNonObjectAsNull"),
    ("TreatNullAs", "LegacyNullToEmptyString"),
    ("Unforgeable", "LegacyUnforgeable"),
];

pub(crate) fn renamed_legacy(name: &str) -> Option<&'static str> {
    RENAMED_LEGACIES
        .iter()
        .find(|(legacy, _)| *legacy == name)
        .map(|(_, renamed)| *renamed)
}

// ============================================================================
// DEFINITIONS
// ============================================================================

pub(crate) fn check_duplicated_names(checker: &mut Checker<'_>) {
    let duplicates = checker.index.duplicates().to_vec();
    for duplicate in duplicates {
        let (Some(name), Some(token)) = (Node::name(duplicate), duplicate.name_token()) else {
            continue;
        };
        let kind = checker
            .index
            .get(name)
            .map_or(duplicate.kind(), |first| first.kind());
        checker.error(
            token,
            &duplicate.context(),
            "no-duplicate",
            format!("The name \"{name}\" of type \"{kind}\" was already seen"),
            None,
        );
    }
}

pub(crate) fn check_definition<'a>(checker: &mut Checker<'a>, definition: &'a Definition, index: usize) {
    let target = Some(ExtAttrTarget {
        definition: index,
        member: None,
    });
    match definition {
        Definition::Container(container) => check_container(checker, container, index),
        Definition::Typedef(typedef) => {
            check_ext_attrs(checker, &typedef.ext_attrs, target);
            check_type(checker, &typedef.idl_type, None);
        }
        Definition::Callback(callback) => {
            check_ext_attrs(checker, &callback.ext_attrs, target);
            let fix = Autofix::ReplaceVoid {
                definition: index,
                member: None,
            };
            check_type(checker, &callback.idl_type, Some(fix));
            check_arguments(checker, &callback.arguments, Some((index, None)));
        }
        Definition::Enum(enumeration) => check_ext_attrs(checker, &enumeration.ext_attrs, target),
        Definition::Includes(includes) => check_ext_attrs(checker, &includes.ext_attrs, target),
        Definition::Custom(custom) => check_ext_attrs(checker, &custom.ext_attrs, target),
        Definition::Eof(_) => {}
    }
}

fn check_container<'a>(checker: &mut Checker<'a>, container: &'a Container, index: usize) {
    let context = container.context();
    check_ext_attrs(
        checker,
        &container.ext_attrs,
        Some(ExtAttrTarget {
            definition: index,
            member: None,
        }),
    );

    let exposed_required = match container.kind {
        ContainerKind::Interface => Some(REQUIRE_EXPOSED_INTERFACE),
        ContainerKind::Namespace => Some(REQUIRE_EXPOSED_NAMESPACE),
        _ => None,
    };
    if let Some(message) = exposed_required {
        if !container.partial() && !container.ext_attrs.contains("Exposed") {
            checker.error(
                &container.tokens.name,
                &context,
                "require-exposed",
                message,
                Some(Autofix::AddExposedWindow { definition: index }),
            );
        }
    }

    if container.kind == ContainerKind::Interface {
        for (position, item) in container.ext_attrs.iter().enumerate() {
            if item.name() == "Constructor" {
                checker.error(
                    &item.tokens.name,
                    &context,
                    "constructor-member",
                    CONSTRUCTOR_MEMBER,
                    Some(Autofix::ConstructorOperation {
                        definition: index,
                        ext_attr: position,
                    }),
                );
            }
        }

        if container.ext_attrs.contains("Global") {
            for item in container.ext_attrs.iter().filter(|item| item.name() == "LegacyFactoryFunction") {
                checker.error(
                    &item.tokens.name,
                    &context,
                    "no-constructible-global",
                    "Interfaces marked as `[Global]` cannot have factory functions.",
                    None,
                );
            }
            for member in &container.members {
                if let Member::Constructor(constructor) = member {
                    checker.error(
                        &constructor.tokens.base,
                        &context,
                        "no-constructible-global",
                        "Interfaces marked as `[Global]` cannot have constructors.",
                        None,
                    );
                }
            }
        }
    }

    for (position, member) in container.members.iter().enumerate() {
        check_member(checker, member, index, position);
    }

    if container.kind == ContainerKind::Interface && !container.partial() {
        check_interface_member_duplication(checker, container);
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

fn check_member<'a>(checker: &mut Checker<'a>, member: &'a Member, definition: usize, position: usize) {
    check_ext_attrs(
        checker,
        member.ext_attrs(),
        Some(ExtAttrTarget {
            definition,
            member: Some(position),
        }),
    );
    let owner = Some((definition, Some(position)));
    match member {
        Member::Attribute(attribute) => check_attribute(checker, attribute),
        Member::Operation(operation) => {
            if operation.name().is_empty() && matches!(operation.special(), "" | "static") {
                let token = operation
                    .tokens
                    .open
                    .as_ref()
                    .unwrap_or(&operation.tokens.termination);
                checker.error(
                    token,
                    &operation.context(),
                    "incomplete-op",
                    "Regular or static operations must have both a return type and an identifier.",
                    None,
                );
            }
            if let Some(idl_type) = &operation.idl_type {
                let fix = Autofix::ReplaceVoid {
                    definition,
                    member: Some(position),
                };
                check_type(checker, idl_type, Some(fix));
            }
            check_arguments(checker, &operation.arguments, owner);
        }
        Member::Constructor(constructor) => check_arguments(checker, &constructor.arguments, owner),
        Member::Constant(constant) => check_type(checker, &constant.idl_type, None),
        Member::IterableLike(iterable) => {
            for idl_type in &iterable.idl_types {
                check_type(checker, idl_type, None);
            }
            check_arguments(checker, &iterable.arguments, None);
        }
        Member::Field(field) => check_type(checker, &field.idl_type, None),
        Member::Typedef(typedef) => check_type(checker, &typedef.idl_type, None),
        Member::Custom(_) => {}
    }
}

fn check_attribute<'a>(checker: &mut Checker<'a>, attribute: &'a Attribute) {
    check_type(checker, &attribute.idl_type, None);
    let generic = attribute.idl_type.generic();
    if matches!(generic, "async_sequence" | "sequence" | "record") {
        checker.error(
            &attribute.tokens.name,
            &attribute.context(),
            "attr-invalid-type",
            format!("Attributes cannot accept {generic} types."),
            None,
        );
        return;
    }
    let found = idl_type_includes_dictionary(&attribute.idl_type, &checker.index, false, &mut HashSet::new());
    if let Some(found) = found {
        let token = found
            .reference
            .tokens
            .base
            .as_ref()
            .unwrap_or(&attribute.tokens.name);
        checker.error(
            token,
            &attribute.context(),
            "attr-invalid-type",
            "Attributes cannot accept dictionary types.",
            None,
        );
    }
}

/// Flags operations that partials or mixins add under a name the interface
/// already uses.
fn check_interface_member_duplication<'a>(checker: &mut Checker<'a>, interface: &'a Container) {
    fn operations(container: &Container) -> impl Iterator<Item = &Operation> {
        container.members.iter().filter_map(Member::as_operation)
    }

    let mut regular: HashSet<&str> = HashSet::new();
    let mut statics: HashSet<&str> = HashSet::new();
    for operation in operations(interface) {
        if operation.is_static() {
            statics.insert(operation.name());
        } else {
            regular.insert(operation.name());
        }
    }

    let extensions: Vec<&'a Container> = checker
        .index
        .partials(interface.name())
        .iter()
        .copied()
        .filter(|partial| partial.kind == ContainerKind::Interface)
        .chain(checker.index.mixins_of(interface.name()).iter().copied())
        .collect();

    for extension in extensions {
        let additions: Vec<&'a Operation> = operations(extension).collect();
        for operation in &additions {
            let seen = if operation.is_static() { &statics } else { &regular };
            let Some(token) = &operation.tokens.name else {
                continue;
            };
            if seen.contains(operation.name()) {
                checker.error(
                    token,
                    &extension.context(),
                    "no-cross-overload",
                    format!(
                        "The {}operation \"{}\" has already been defined for the base interface \"{}\" either in itself or in a mixin",
                        if operation.is_static() { "static " } else { "" },
                        operation.name(),
                        interface.name()
                    ),
                    None,
                );
            }
        }
        for operation in additions {
            if operation.is_static() {
                statics.insert(operation.name());
            } else {
                regular.insert(operation.name());
            }
        }
    }
}

// ============================================================================
// SHARED PIECES
// ============================================================================

fn check_ext_attrs<'a>(checker: &mut Checker<'a>, list: &'a ExtendedAttributes, target: Option<ExtAttrTarget>) {
    for (position, item) in list.iter().enumerate() {
        let name = item.name();
        if name == "LegacyNoInterfaceObject" {
            checker.warning(&item.tokens.name, &item.context(), "no-nointerfaceobject", NO_INTERFACE_OBJECT);
        } else if let Some(renamed) = renamed_legacy(name) {
            checker.error(
                &item.tokens.name,
                &item.context(),
                "renamed-legacy",
                format!(
                    "`[{name}]` extended attribute is a legacy feature that is now renamed to `[{renamed}]`. \
Refer to the [relevant upstream PR](https://github.com/whatwg/webidl/pull/870) for more information."
                ),
                target.map(|target| Autofix::RenameExtendedAttribute {
                    target,
                    index: position,
                    name: renamed.to_owned(),
                }),
            );
        }
        check_arguments(checker, item.arguments(), None);
    }
}

fn check_type<'a>(checker: &mut Checker<'a>, idl_type: &'a IdlType, void_fix: Option<Autofix>) {
    check_ext_attrs(checker, &idl_type.ext_attrs, None);

    if idl_type.is_named("void") {
        if let Some(base) = &idl_type.tokens.base {
            checker.error(base, &idl_type.context(), "replace-void", REPLACE_VOID, void_fix);
        }
    }

    if idl_type.nullable() {
        let union = if idl_type.is_union() {
            Some(idl_type)
        } else {
            idl_type
                .name()
                .and_then(|name| checker.index.get(&name))
                .and_then(|definition| match definition {
                    Definition::Typedef(typedef) if typedef.idl_type.is_union() => Some(&typedef.idl_type),
                    _ => None,
                })
        };
        let found = union.and_then(|union| {
            idl_type_includes_dictionary(union, &checker.index, false, &mut HashSet::new())
        });
        if let Some(found) = found {
            let reference = if idl_type.is_union() { found.reference } else { idl_type };
            if let Some(token) = reference.tokens.base.as_ref().or(idl_type.tokens.open.as_ref()) {
                checker.error(
                    token,
                    &idl_type.context(),
                    "no-nullable-union-dict",
                    "Nullable union cannot include a dictionary type.",
                    None,
                );
            }
        }
    }

    for subtype in &idl_type.subtypes {
        check_type(checker, subtype, None);
    }
}

/// `owner` is the definition and member index used to address arguments in
/// autofixes; `None` for argument lists that cannot be fixed in place.
fn check_arguments<'a>(checker: &mut Checker<'a>, arguments: &'a [Argument], owner: Option<(usize, Option<usize>)>) {
    for (position, argument) in arguments.iter().enumerate() {
        check_ext_attrs(checker, &argument.ext_attrs, None);
        check_type(checker, &argument.idl_type, None);

        let Some(found) = idl_type_includes_dictionary(&argument.idl_type, &checker.index, true, &mut HashSet::new())
        else {
            continue;
        };
        let path = owner.map(|(definition, member)| ArgumentPath {
            definition,
            member,
            argument: position,
        });
        let context = argument.context();
        if argument.idl_type.nullable() {
            checker.error(
                &argument.tokens.name,
                &context,
                "no-nullable-dict-arg",
                "Dictionary arguments cannot be nullable.",
                None,
            );
        } else if !argument.optional() {
            let last_required = arguments[position + 1..].iter().all(Argument::optional);
            if last_required && !dictionary_includes_required_field(found.dictionary, &checker.index, &mut HashSet::new()) {
                checker.error(
                    &argument.tokens.name,
                    &context,
                    "dict-arg-optional",
                    "Dictionary argument must be optional if it has no required fields",
                    path.map(Autofix::MakeArgumentOptional),
                );
            }
        } else if argument.default.is_none() {
            checker.error(
                &argument.tokens.name,
                &context,
                "dict-arg-default",
                "Optional dictionary arguments must have a default value of `{}`.",
                path.map(Autofix::AddEmptyDictionaryDefault),
            );
        }
    }
}

// ============================================================================
// DICTIONARY LOOKUPS
// ============================================================================

pub(crate) struct DictionaryReference<'a> {
    /// The type that names the dictionary, possibly through a typedef.
    pub reference: &'a IdlType,
    pub dictionary: &'a Container,
}

/// Finds a dictionary named by `idl_type`, directly, through typedefs, or as
/// a member of a union. `seen` guards against typedef cycles.
pub(crate) fn idl_type_includes_dictionary<'a>(
    idl_type: &'a IdlType,
    index: &DefinitionIndex<'a>,
    use_nullable_inner: bool,
    seen: &mut HashSet<&'a str>,
) -> Option<DictionaryReference<'a>> {
    if !idl_type.is_union() {
        let definition = index.get(&idl_type.name()?)?;
        return match definition {
            Definition::Typedef(typedef) => {
                if !seen.insert(typedef.name()) {
                    return None;
                }
                idl_type_includes_dictionary(&typedef.idl_type, index, false, seen).map(|found| {
                    DictionaryReference {
                        reference: idl_type,
                        dictionary: found.dictionary,
                    }
                })
            }
            Definition::Container(container)
                if container.kind == ContainerKind::Dictionary && (use_nullable_inner || !idl_type.nullable()) =>
            {
                Some(DictionaryReference {
                    reference: idl_type,
                    dictionary: container,
                })
            }
            _ => None,
        };
    }

    for subtype in &idl_type.subtypes {
        if let Some(found) = idl_type_includes_dictionary(subtype, index, false, seen) {
            if subtype.is_union() {
                return Some(found);
            }
            return Some(DictionaryReference {
                reference: subtype,
                dictionary: found.dictionary,
            });
        }
    }
    None
}

/// True if the dictionary or any ancestor declares a `required` member. An
/// unresolvable ancestor counts as having one.
pub(crate) fn dictionary_includes_required_field<'a>(
    dictionary: &'a Container,
    index: &DefinitionIndex<'a>,
    seen: &mut HashSet<&'a str>,
) -> bool {
    if !seen.insert(dictionary.name()) {
        return false;
    }
    if dictionary
        .members
        .iter()
        .filter_map(Member::as_field)
        .any(|field| field.required())
    {
        return true;
    }
    let Some(parent) = dictionary.inheritance() else {
        return false;
    };
    match index.get(parent) {
        Some(Definition::Container(parent)) if parent.kind == ContainerKind::Dictionary => {
            dictionary_includes_required_field(parent, index, seen)
        }
        _ => true,
    }
}
