//! Property-based tests for the tokeniser and parser.
//!
//! Inputs are built from known-good definitions with random trivia between
//! their tokens, or from random soups of IDL words that mostly do not parse.

use proptest::prelude::*;
use webidl_cst::grammar::{definitions, extended_attributes, helpers, members};
use webidl_cst::token::is_keyword;
use webidl_cst::{parse, tokenise, write, AttributeRules, Cursor, Definition, ParseOptions, ParseResult};

/// Definitions written as space-separated tokens.
const SNIPPETS: &[&str] = &[
    "interface A { attribute long x ; } ;",
    "[ Exposed = ( Window , Worker ) ] interface B : A { constructor ( optional long a = 1 ) ; } ;",
    "partial interface A { readonly attribute DOMString? y ; } ;",
    "dictionary D { required long a ; sequence < long > b = [ ] ; } ;",
    "enum E { \"one\" , \"two\" , } ;",
    "typedef ( long or DOMString ) T ;",
    "callback C = undefined ( any ... args ) ;",
    "interface mixin M { const double X = -Infinity ; } ;",
    "A includes M ;",
    "namespace N { readonly attribute long n ; undefined f ( ) ; } ;",
    "interface I { iterable < long , DOMString > ; getter any ( DOMString name ) ; stringifier ; } ;",
    "interface P { Promise < undefined > go ( record < DOMString , any > r ) ; } ;",
];

const TRIVIA: &[&str] = &[" ", "  ", "\n", "\t", "\r\n", " /* c */ ", "/**/", " // c\n", "\n\n  "];

/// Words that appear in IDL, for inputs that are mostly malformed.
const VOCABULARY: &[&str] = &[
    "interface", "partial", "dictionary", "typedef", "includes", "attribute", "readonly",
    "optional", "required", "const", "long", "unsigned", "sequence", "record", "Promise", "or",
    "async", "iterable", "maplike", "setlike", "constructor", "inherit", "static", "stringifier",
    "getter", "Foo", "bar", "(", ")", "[", "]", "{", "}", "<", ">", ",", ";", "=", "?", "...", "*",
    "1", "\"s\"",
];

/// Runs a production and reports whether it matched.
type Production = fn(&mut Cursor) -> ParseResult<bool>;

/// Every public production that may decline, by name.
fn productions() -> Vec<(&'static str, Production)> {
    let mut table: Vec<(&'static str, Production)> = Vec::new();
    table.push(("includes", |c| Ok(definitions::includes(c)?.is_some())));
    table.push(("argument", |c| Ok(helpers::argument(c)?.is_some())));
    table.push(("type", |c| Ok(helpers::type_with_extended_attributes(c, None)?.is_some())));
    table.push(("extended attributes", |c| {
        Ok(!extended_attributes::extended_attributes(c)?.is_empty())
    }));
    table.push(("attribute", |c| {
        Ok(members::attribute(c, None, AttributeRules::default())?.is_some())
    }));
    table.push(("mixin attribute", |c| {
        let rules = AttributeRules {
            no_inherit: true,
            readonly: false,
        };
        Ok(members::attribute(c, None, rules)?.is_some())
    }));
    table.push(("operation", |c| Ok(members::operation(c, None, false)?.is_some())));
    table.push(("constant", |c| Ok(members::constant(c)?.is_some())));
    table.push(("constructor", |c| Ok(members::constructor(c)?.is_some())));
    table.push(("static member", |c| Ok(members::static_member(c)?.is_some())));
    table.push(("stringifier", |c| Ok(members::stringifier(c)?.is_some())));
    table.push(("iterable-like", |c| Ok(members::iterable_like(c)?.is_some())));
    table.push(("field", |c| Ok(members::field(c)?.is_some())));
    table
}

/// Runs `production` on a fresh cursor over `text`. Returns the cursor
/// position when the production declined.
fn position_after_decline(text: &str, production: Production) -> Option<usize> {
    let mut cursor = Cursor::new(text, None).ok()?;
    match production(&mut cursor) {
        Ok(false) => Some(cursor.position()),
        _ => None,
    }
}

fn production(name: &str) -> Production {
    productions()
        .into_iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, production)| production)
        .unwrap()
}

#[test]
fn productions_rewind_after_partial_matches() {
    let cases = [
        ("includes", "A implements B;"),
        ("argument", "long = 1"),
        ("type", "[Clamp] = 1"),
        ("extended attributes", "interface A {};"),
        ("attribute", "inherit long x;"),
        ("attribute", "readonly maplike<long, long>;"),
        ("mixin attribute", "readonly setlike<long>;"),
        ("operation", "attribute long x;"),
        ("constant", "constructor();"),
        ("constructor", "const long X = 1;"),
        ("static member", "stringifier;"),
        ("stringifier", "static attribute long x;"),
        ("iterable-like", "readonly attribute long x;"),
        ("field", "[Clamp] = 1;"),
    ];
    for (name, text) in cases {
        assert_eq!(position_after_decline(text, production(name)), Some(0), "{name} on {text:?}");
    }
}

fn layout() -> impl Strategy<Value = (Vec<&'static str>, Vec<&'static str>)> {
    (
        prop::collection::vec(prop::sample::select(SNIPPETS), 1..6),
        prop::collection::vec(prop::sample::select(TRIVIA), 1..64),
    )
}

/// Joins the tokens of `snippets` with trivia taken round-robin from `trivia`.
fn lay_out(snippets: &[&str], trivia: &[&str]) -> String {
    let mut text = String::new();
    let tokens = snippets.iter().flat_map(|snippet| snippet.split_whitespace());
    for (i, token) in tokens.enumerate() {
        text.push_str(trivia[i % trivia.len()]);
        text.push_str(token);
    }
    text.push_str(trivia[0]);
    text
}

fn soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 0..24).prop_map(|words| words.join(" "))
}

fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,10}".prop_filter("not a keyword", |name| {
        !is_keyword(name) && name != "toString" && name != "constructor"
    })
}

proptest! {
    #[test]
    fn concrete_round_trip_is_exact((snippets, trivia) in layout()) {
        let text = lay_out(&snippets, &trivia);
        let definitions = parse(&text, &ParseOptions::new().concrete(true))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        prop_assert_eq!(write(&definitions), text);
    }

    #[test]
    fn layout_does_not_change_the_tree_shape((snippets, trivia) in layout()) {
        let spaced = parse(&lay_out(&snippets, &[" "]), &ParseOptions::new()).unwrap();
        let laid_out = parse(&lay_out(&snippets, &trivia), &ParseOptions::new()).unwrap();
        let shape = |definitions: &[Definition]| -> Vec<String> {
            definitions.iter().map(|definition| format!("{:?}", webidl_cst::Node::context(definition))).collect()
        };
        prop_assert_eq!(shape(&spaced), shape(&laid_out));
    }

    #[test]
    fn tokens_concatenate_to_the_input(text in "\\PC{0,80}") {
        if let Ok(tokens) = tokenise(&text) {
            let joined: String = tokens.iter().map(|token| format!("{}{}", token.trivia, token.value)).collect();
            prop_assert_eq!(joined, text);
        }
    }

    #[test]
    fn parse_always_terminates(text in "\\PC{0,80}") {
        let _ = parse(&text, &ParseOptions::new());
    }

    #[test]
    fn parse_of_word_soup_terminates(text in soup()) {
        let _ = parse(&text, &ParseOptions::new().allow_nested_typedefs(true));
    }

    #[test]
    fn declined_productions_leave_the_cursor_alone(text in soup()) {
        for (name, production) in productions() {
            if let Some(position) = position_after_decline(&text, production) {
                prop_assert_eq!(position, 0, "{} moved the cursor", name);
            }
        }
    }

    #[test]
    fn escaping_strips_exactly_one_underscore(name in identifier()) {
        let plain = parse(&format!("interface {name} {{}};"), &ParseOptions::new()).unwrap();
        let escaped = parse(&format!("interface _{name} {{}};"), &ParseOptions::new()).unwrap();
        prop_assert_eq!(webidl_cst::Node::name(&plain[0]), Some(name.as_str()));
        prop_assert_eq!(webidl_cst::Node::name(&escaped[0]), Some(name.as_str()));
    }
}
