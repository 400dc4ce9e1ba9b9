mod common;

use common::{parse_concrete, parse_ok};
use webidl_cst::{autofix_all, validate, validate_with_source, write, Autofix, ValidationError};

fn rules(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(ValidationError::rule_name).collect()
}

/// Applies every available fix and returns the rewritten text.
fn fixed(text: &str) -> String {
    let mut definitions = parse_concrete(text);
    autofix_all(&mut definitions);
    write(&definitions)
}

// ---
// Exposure
// ---

#[test]
fn exposed_interface_is_clean() {
    let errors = validate(&parse_ok("[Exposed=Window] interface A {};"));
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn unexposed_interface_gets_one_fixable_diagnostic() {
    let errors = validate(&parse_ok("interface B {};"));
    assert_eq!(rules(&errors), ["require-exposed"]);
    let error = &errors[0];
    assert!(error.bare_message().contains("`[Exposed=Window]`"));
    assert_eq!(error.autofix(), Some(&Autofix::AddExposedWindow { definition: 0 }));
    assert!(!error.is_warning());
    assert!(error
        .message()
        .starts_with("Validation error at line 1, inside `interface B`:\n"));
}

#[test]
fn partials_and_dictionaries_need_no_exposure() {
    let errors = validate(&parse_ok("partial interface A {};\ndictionary D {};\ninterface mixin M {};"));
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn exposure_fix_adds_a_line_above_the_definition() {
    let text = "interface B {};\nnamespace N { readonly attribute long x; };\n";
    let mut definitions = parse_concrete(text);
    assert_eq!(autofix_all(&mut definitions), 2);
    assert_eq!(
        write(&definitions),
        "[Exposed=Window]\ninterface B {};\n[Exposed=Window]\nnamespace N { readonly attribute long x; };\n"
    );
    assert!(validate(&definitions).is_empty());
}

#[test]
fn exposure_fix_joins_an_existing_list() {
    assert_eq!(fixed("[SecureContext] interface B {};"), "[Exposed=Window, SecureContext] interface B {};");
}

// ---
// Legacy forms
// ---

#[test]
fn constructor_attribute_becomes_a_member() {
    let text = "[Exposed=Window, Constructor(long a)]\ninterface A {\n  attribute long x;\n};\n";
    let errors = validate(&parse_ok(text));
    assert_eq!(rules(&errors), ["constructor-member"]);
    assert_eq!(
        fixed(text),
        "[Exposed=Window]\ninterface A {\n  constructor(long a);\n  attribute long x;\n};\n"
    );
}

#[test]
fn legacy_names_are_renamed() {
    let text = "[Exposed=Window, NoInterfaceObject] interface A {\n  [TreatNullAs=EmptyString] attribute DOMString s;\n};";
    let errors = validate(&parse_ok(text));
    assert_eq!(rules(&errors), ["renamed-legacy", "renamed-legacy"]);
    assert!(errors[0]
        .bare_message()
        .starts_with("`[NoInterfaceObject]` extended attribute is a legacy feature that is now renamed to `[LegacyNoInterfaceObject]`."));

    let mut definitions = parse_concrete(text);
    assert_eq!(autofix_all(&mut definitions), 2);
    assert_eq!(
        write(&definitions),
        "[Exposed=Window, LegacyNoInterfaceObject] interface A {\n  [LegacyNullToEmptyString] attribute DOMString s;\n};"
    );

    let remaining = validate(&definitions);
    assert_eq!(rules(&remaining), ["no-nointerfaceobject"]);
    assert!(remaining[0].is_warning());
    assert!(remaining[0].autofix().is_none());
}

#[test]
fn void_is_replaced_by_undefined() {
    let text = "[Exposed=Window] interface A { void f(); };\ncallback C = void ();";
    let errors = validate(&parse_ok(text));
    assert_eq!(rules(&errors), ["replace-void", "replace-void"]);
    assert_eq!(
        fixed(text),
        "[Exposed=Window] interface A { undefined f(); };\ncallback C = undefined ();"
    );
}

// ---
// Dictionaries
// ---

const DICTIONARY_ARGUMENTS: &str = "dictionary D { long x; };\n\
dictionary R { required long x; };\n\
[Exposed=Window] interface A {\n\
  undefined f(D d);\n\
  undefined g(optional D e);\n\
  undefined h(D? n);\n\
  undefined i(R r);\n\
  undefined j(D d, long n);\n\
};";

#[test]
fn dictionary_argument_rules() {
    let errors = validate(&parse_ok(DICTIONARY_ARGUMENTS));
    assert_eq!(rules(&errors), ["dict-arg-optional", "dict-arg-default", "no-nullable-dict-arg"]);
    assert_eq!(
        errors[0].bare_message(),
        "Dictionary argument must be optional if it has no required fields"
    );
    assert!(errors[0].autofix().is_some());
    assert!(errors[1].autofix().is_some());
    assert!(errors[2].autofix().is_none());
}

#[test]
fn dictionary_argument_fixes() {
    let written = fixed(DICTIONARY_ARGUMENTS);
    assert!(written.contains("undefined f(optional D d = {});"), "{written}");
    assert!(written.contains("undefined g(optional D e = {});"), "{written}");
    assert!(written.contains("undefined h(D? n);"), "{written}");
    assert!(written.contains("undefined j(D d, long n);"), "{written}");
}

#[test]
fn required_fields_are_inherited() {
    let text = "dictionary Base { required long x; };\n\
                dictionary D : Base {};\n\
                [Exposed=Window] interface A { undefined f(D d); };";
    assert!(validate(&parse_ok(text)).is_empty());
}

#[test]
fn attributes_reject_sequences_and_dictionaries() {
    let text = "dictionary D {};\n\
                [Exposed=Window] interface A { attribute sequence<long> s; attribute D d; };";
    let errors = validate(&parse_ok(text));
    let messages: Vec<_> = errors.iter().map(ValidationError::bare_message).collect();
    assert_eq!(
        messages,
        [
            "Attributes cannot accept sequence types.",
            "Attributes cannot accept dictionary types."
        ]
    );
}

#[test]
fn nullable_unions_cannot_hold_dictionaries() {
    let text = "dictionary D {};\n\
                typedef (D or long) U;\n\
                dictionary E { (D or long)? a; U? b; (long or DOMString)? c; };";
    let errors = validate(&parse_ok(text));
    assert_eq!(rules(&errors), ["no-nullable-union-dict", "no-nullable-union-dict"]);
}

// ---
// Interfaces
// ---

#[test]
fn duplicate_names_are_reported() {
    let errors = validate(&parse_ok("[Exposed=Window] interface A {};\ndictionary A {};"));
    assert_eq!(rules(&errors), ["no-duplicate"]);
    assert_eq!(
        errors[0].bare_message(),
        "The name \"A\" of type \"interface\" was already seen"
    );
    assert_eq!(errors[0].line(), 2);
}

#[test]
fn operations_need_a_name() {
    let errors = validate(&parse_ok("[Exposed=Window] interface A { long (); getter long (long i); };"));
    assert_eq!(rules(&errors), ["incomplete-op"]);
}

#[test]
fn partials_and_mixins_cannot_overload() {
    let text = "[Exposed=Window] interface A { undefined f(); };\n\
                partial interface A { undefined f(long x); };\n\
                interface mixin M { undefined g(); };\n\
                partial interface A { undefined g(DOMString s); };\n\
                A includes M;";
    let errors = validate(&parse_ok(text));
    assert_eq!(rules(&errors), ["no-cross-overload", "no-cross-overload"]);
    assert!(errors[0].message().contains("inside `partial interface A`"));
    assert_eq!(
        errors[0].bare_message(),
        "The operation \"f\" has already been defined for the base interface \"A\" either in itself or in a mixin"
    );
}

#[test]
fn globals_cannot_be_constructed() {
    let text = "[Global=Window, Exposed=Window, LegacyFactoryFunction=Image]\n\
                interface W { constructor(); };";
    let errors = validate(&parse_ok(text));
    let messages: Vec<_> = errors.iter().map(ValidationError::bare_message).collect();
    assert_eq!(
        messages,
        [
            "Interfaces marked as `[Global]` cannot have factory functions.",
            "Interfaces marked as `[Global]` cannot have constructors."
        ]
    );
}

#[test]
fn source_name_labels_diagnostics() {
    let errors = validate_with_source(&parse_ok("interface B {};"), Some("b.webidl"));
    assert!(errors[0].message().contains(" in b.webidl, inside `interface B`"));
}

#[test]
fn autofix_all_is_idempotent() {
    let mut definitions = parse_concrete(DICTIONARY_ARGUMENTS);
    autofix_all(&mut definitions);
    let once = write(&definitions);
    assert_eq!(autofix_all(&mut definitions), 0);
    assert_eq!(write(&definitions), once);
}
