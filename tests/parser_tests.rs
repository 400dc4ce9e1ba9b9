mod common;

use common::{container, only_member, parse_concrete, parse_err, parse_ok};
use webidl_cst::ast::{ConstValue, ContainerKind, IterableKind, Member, Node, NodeKind, Rhs};
use webidl_cst::{parse, Definition, ParseOptions, TokenKind};

// ---
// Definitions
// ---

#[test]
fn interface_with_one_attribute() {
    let definitions = parse_ok("interface A { attribute long x; };");
    assert_eq!(definitions.len(), 1);
    let interface = container(&definitions[0]);
    assert_eq!(interface.kind, ContainerKind::Interface);
    assert_eq!(interface.name(), "A");
    assert!(!interface.partial());

    let Member::Attribute(attribute) = only_member(&definitions) else {
        panic!("expected an attribute");
    };
    assert_eq!(attribute.name(), "x");
    assert_eq!(attribute.idl_type.name().as_deref(), Some("long"));
    assert!(!attribute.idl_type.is_union());
    assert_eq!(attribute.idl_type.generic(), "");
    assert!(!attribute.readonly());
}

#[test]
fn dictionary_fields_and_required_flag() {
    let definitions = parse_ok("dictionary D { long x; required long y; };");
    let dictionary = container(&definitions[0]);
    assert_eq!(dictionary.kind, ContainerKind::Dictionary);
    let fields: Vec<_> = dictionary.members.iter().filter_map(Member::as_field).collect();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name(), "x");
    assert!(!fields[0].required());
    assert_eq!(fields[1].name(), "y");
    assert!(fields[1].required());
}

#[test]
fn typedef_of_a_union() {
    let definitions = parse_ok("typedef (long or DOMString) T;");
    let Definition::Typedef(typedef) = &definitions[0] else {
        panic!("expected a typedef");
    };
    assert_eq!(typedef.name(), "T");
    assert!(typedef.idl_type.is_union());
    assert_eq!(typedef.idl_type.subtypes.len(), 2);
    assert_eq!(typedef.idl_type.subtypes[0].name().as_deref(), Some("long"));
    assert_eq!(typedef.idl_type.subtypes[1].name().as_deref(), Some("DOMString"));
}

#[test]
fn nullable_union_and_generics() {
    let definitions = parse_ok(
        "typedef (long or DOMString)? A;\n\
         typedef sequence<DOMString>? B;\n\
         typedef record<DOMString, long> C;\n\
         typedef unsigned long long D;",
    );
    let types: Vec<_> = definitions
        .iter()
        .map(|definition| match definition {
            Definition::Typedef(typedef) => &typedef.idl_type,
            other => panic!("expected a typedef, found {other:?}"),
        })
        .collect();

    assert!(types[0].is_union() && types[0].nullable());
    assert_eq!(types[1].generic(), "sequence");
    assert!(types[1].nullable());
    assert_eq!(types[1].subtypes[0].name().as_deref(), Some("DOMString"));
    assert_eq!(types[2].generic(), "record");
    assert_eq!(types[2].subtypes.len(), 2);
    assert_eq!(types[3].name().as_deref(), Some("unsigned long long"));
}

#[test]
fn callbacks_enums_includes_and_namespaces() {
    let definitions = parse_ok(
        "callback Cb = Promise<void> (DOMString s);\n\
         callback interface Listener { undefined handle(); };\n\
         enum E { \"a\", \"b\", };\n\
         A includes B;\n\
         namespace N { readonly attribute long x; undefined f(); };\n\
         interface mixin M { attribute long y; };",
    );
    assert_eq!(definitions.len(), 6);

    let Definition::Callback(callback) = &definitions[0] else {
        panic!("expected a callback function");
    };
    assert_eq!(callback.name(), "Cb");
    assert_eq!(callback.idl_type.generic(), "Promise");
    assert!(callback.idl_type.subtypes[0].is_named("void"));
    assert_eq!(callback.arguments.len(), 1);

    assert_eq!(container(&definitions[1]).kind, ContainerKind::CallbackInterface);

    let Definition::Enum(enumeration) = &definitions[2] else {
        panic!("expected an enum");
    };
    let values: Vec<_> = enumeration.values.iter().map(|value| value.value()).collect();
    assert_eq!(values, ["a", "b"]);

    let Definition::Includes(includes) = &definitions[3] else {
        panic!("expected an includes statement");
    };
    assert_eq!((includes.target(), includes.mixin()), ("A", "B"));

    assert_eq!(container(&definitions[4]).kind, ContainerKind::Namespace);
    assert_eq!(container(&definitions[4]).members.len(), 2);
    assert_eq!(container(&definitions[5]).kind, ContainerKind::Mixin);
    assert_eq!(definitions[5].kind(), NodeKind::InterfaceMixin);
}

#[test]
fn partials_and_inheritance() {
    let definitions = parse_ok("interface B : A {};\npartial dictionary D { long z; };");
    assert_eq!(container(&definitions[0]).inheritance(), Some("A"));
    let partial = container(&definitions[1]);
    assert!(partial.partial());
    assert!(definitions[1].is_partial());
    assert_eq!(partial.inheritance(), None);
}

#[test]
fn escaped_identifiers_are_unescaped_once() {
    let definitions = parse_ok("interface _interface { attribute long _attribute; };");
    let interface = container(&definitions[0]);
    assert_eq!(interface.name(), "interface");
    assert_eq!(interface.tokens.name.value, "_interface");
    let Member::Attribute(attribute) = &interface.members[0] else {
        panic!("expected an attribute");
    };
    assert_eq!(attribute.name(), "attribute");
}

// ---
// Members
// ---

#[test]
fn special_static_and_stringifier_operations() {
    let definitions = parse_ok(
        "interface A {\n\
           getter DOMString (unsigned long index);\n\
           static undefined create();\n\
           static attribute long count;\n\
           stringifier;\n\
           constructor(long a);\n\
         };",
    );
    let members = &container(&definitions[0]).members;
    assert_eq!(members.len(), 5);

    let getter = members[0].as_operation().unwrap();
    assert_eq!(getter.special(), "getter");
    assert_eq!(getter.name(), "");
    assert_eq!(getter.arguments[0].idl_type.name().as_deref(), Some("unsigned long"));

    let create = members[1].as_operation().unwrap();
    assert!(create.is_static());
    assert_eq!(create.name(), "create");

    let Member::Attribute(count) = &members[2] else {
        panic!("expected an attribute");
    };
    assert_eq!(count.special(), "static");

    let stringifier = members[3].as_operation().unwrap();
    assert_eq!(stringifier.special(), "stringifier");
    assert!(stringifier.idl_type.is_none());

    let Member::Constructor(constructor) = &members[4] else {
        panic!("expected a constructor");
    };
    assert_eq!(constructor.arguments[0].name(), "a");
}

#[test]
fn constants_and_default_values() {
    let definitions = parse_ok(
        "interface A {\n\
           const long X = 0x10;\n\
           const double Y = -Infinity;\n\
           const boolean Z = true;\n\
           undefined f(optional long a = 5, optional sequence<long> b = [], optional DOMString c = \"hi\");\n\
         };",
    );
    let members = &container(&definitions[0]).members;
    let values: Vec<_> = members[..3]
        .iter()
        .map(|member| match member {
            Member::Constant(constant) => constant.value(),
            other => panic!("expected a constant, found {other:?}"),
        })
        .collect();
    assert_eq!(
        values,
        [
            ConstValue::Number("0x10".into()),
            ConstValue::Infinity { negative: true },
            ConstValue::Boolean(true),
        ]
    );

    let operation = members[3].as_operation().unwrap();
    let defaults: Vec<_> = operation
        .arguments
        .iter()
        .map(|argument| argument.default.as_ref().unwrap().value())
        .collect();
    assert_eq!(
        defaults,
        [
            ConstValue::Number("5".into()),
            ConstValue::Sequence,
            ConstValue::String("hi".into()),
        ]
    );
    assert!(operation.arguments.iter().all(|argument| argument.optional()));
}

#[test]
fn iterable_like_declarations() {
    let definitions = parse_ok(
        "interface A {\n\
           iterable<long, DOMString>;\n\
           async iterable<DOMString>(long a);\n\
           readonly maplike<DOMString, long>;\n\
           setlike<long>;\n\
         };",
    );
    let iterables: Vec<_> = container(&definitions[0])
        .members
        .iter()
        .map(|member| match member {
            Member::IterableLike(iterable) => iterable,
            other => panic!("expected an iterable-like member, found {other:?}"),
        })
        .collect();

    assert_eq!(iterables[0].kind, IterableKind::Iterable);
    assert_eq!(iterables[0].idl_types.len(), 2);
    assert!(!iterables[0].is_async());

    assert!(iterables[1].is_async());
    assert_eq!(iterables[1].arguments.len(), 1);

    assert_eq!(iterables[2].kind, IterableKind::Maplike);
    assert!(iterables[2].readonly());
    assert_eq!(iterables[3].kind, IterableKind::Setlike);
    assert_eq!(iterables[3].idl_types.len(), 1);
}

#[test]
fn extended_attribute_shapes() {
    let definitions = parse_ok(
        "[Exposed=(Window,Worker), LegacyFactoryFunction=Image(DOMString src), SecureContext, Global=*]\n\
         interface A {};",
    );
    let ext_attrs = &container(&definitions[0]).ext_attrs;
    assert_eq!(ext_attrs.len(), 4);

    let exposed = ext_attrs.get("Exposed").unwrap();
    assert_eq!(
        exposed.rhs(),
        Some(Rhs::List(TokenKind::Identifier, vec!["Window".into(), "Worker".into()]))
    );
    assert_eq!(exposed.exposure(), Some(vec!["Window".to_string(), "Worker".to_string()]));

    let factory = ext_attrs.get("LegacyFactoryFunction").unwrap();
    assert_eq!(factory.rhs(), Some(Rhs::Single(TokenKind::Identifier, "Image".into())));
    assert_eq!(factory.arguments().len(), 1);

    assert_eq!(ext_attrs.get("SecureContext").unwrap().rhs(), None);
    assert_eq!(ext_attrs.get("Global").unwrap().rhs(), Some(Rhs::Wildcard));
}

#[test]
fn nested_typedefs_need_the_option() {
    let text = "interface A { typedef long L; attribute L x; };";
    let error = parse_err(text);
    assert_eq!(error.bare_message(), "Unknown member");

    let definitions = parse(text, &ParseOptions::new().allow_nested_typedefs(true)).unwrap();
    let members = &container(&definitions[0]).members;
    assert!(matches!(&members[0], Member::Typedef(typedef) if typedef.name() == "L"));
    assert!(matches!(&members[1], Member::Attribute(_)));
}

// ---
// Tree structure
// ---

#[test]
fn parent_links_describe_the_ancestry() {
    let definitions = parse_ok("interface A { undefined f(long x); };");
    let operation = only_member(&definitions).as_operation().unwrap();
    assert_eq!(operation.parent().unwrap().kind, NodeKind::Interface);
    assert_eq!(
        operation.arguments[0].context().describe(),
        "interface A -> operation f -> argument x"
    );
    let argument_type = &operation.arguments[0].idl_type;
    assert_eq!(argument_type.parent().unwrap().name.as_deref(), Some("x"));
    assert!(definitions[0].parent().is_none());
}

#[test]
fn concrete_mode_keeps_trailing_trivia() {
    let definitions = parse_concrete("interface A {};\n// end\n");
    assert_eq!(definitions.len(), 2);
    let Definition::Eof(eof) = &definitions[1] else {
        panic!("expected the end-of-input node");
    };
    assert_eq!(eof.value.trivia, "\n// end\n");
    assert_eq!(eof.value.kind, TokenKind::Eof);

    assert_eq!(parse_ok("interface A {};\n// end\n").len(), 1);
}

#[test]
fn empty_input_has_no_definitions() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("  // only a comment\n").is_empty());
}
