mod common;

use common::{parse_concrete, parse_ok};
use webidl_cst::ast::{NodeKind, Role};
use webidl_cst::{write, write_with, Templates, Token, Walk};

/// Every construct the grammar knows, with irregular layout and comments.
const KITCHEN_SINK: &str = r#"// Leading comment
/* block
   comment */
[Exposed=(Window,Worker),   SecureContext]
interface Node : EventTarget {
  const unsigned short ELEMENT_NODE = 1;
  const double   RATIO = -Infinity;
  constructor ( optional DOMString name = "x" ) ;
  static Node? create(long... values);
  stringifier;
  getter any (DOMString name);
  readonly   attribute   (DOMString or sequence<long>)? label;
  inherit attribute long depth;
  [NewObject] Promise<undefined> fetch(record<DOMString, any> init);
  iterable<DOMString, long>;
  async iterable<long>(optional Options options = {});
};

partial interface Node { attribute boolean extra ; } ;
interface mixin Mixin { readonly attribute long m; };
Node includes Mixin;

callback interface Listener { const long X = 0x1F; undefined handleEvent(Event e); };
callback Handler = undefined (any... args);

dictionary Options : Base {
  required long a;
  DOMString b = "default";
  sequence<long> c = [];
  [Clamp] unsigned long d;
};

enum Mode { "open" , "closed",
  "both", };

typedef [AllowShared] (ArrayBuffer or DataView) BufferSource;

namespace console {
  readonly attribute long count;
  undefined log(any... data);
};
  // trailing comment
"#;

#[test]
fn concrete_parse_writes_back_byte_for_byte() {
    let definitions = parse_concrete(KITCHEN_SINK);
    assert_eq!(write(&definitions), KITCHEN_SINK);
}

#[test]
fn abstract_parse_loses_only_the_trailing_trivia() {
    let definitions = parse_ok(KITCHEN_SINK);
    let expected = KITCHEN_SINK.trim_end_matches("\n  // trailing comment\n");
    assert_eq!(write(&definitions), expected);
}

#[test]
fn source_text_of_each_definition_concatenates_to_the_input() {
    let definitions = parse_concrete(KITCHEN_SINK);
    let joined: String = definitions.iter().map(|definition| definition.source_text()).collect();
    assert_eq!(joined, KITCHEN_SINK);
}

#[test]
fn comments_and_tabs_survive() {
    let text = "\t/** doc */\tinterface\tA\t{\r\n\t\tattribute long x; // x\r\n};\r\n";
    assert_eq!(write(&parse_concrete(text)), text);
}

/// Wraps references and whole interfaces, leaving layout alone.
struct Html;

impl Templates for Html {
    fn token(&self, token: &Token, role: Role) -> String {
        match role {
            Role::Reference if token.value.starts_with(char::is_uppercase) => {
                format!("<a>{}</a>", token.value)
            }
            _ => token.value.clone(),
        }
    }

    fn node(&self, content: String, kind: NodeKind, name: Option<&str>) -> String {
        match (kind, name) {
            (NodeKind::Interface, Some(name)) => format!("<div id={name}>{content}</div>"),
            _ => content,
        }
    }
}

#[test]
fn templates_wrap_references_and_nodes() {
    let definitions = parse_ok("interface A { attribute Foo x; attribute long y; };\nA includes M;");
    assert_eq!(
        write_with(&definitions, &Html),
        "<div id=A>interface A { attribute <a>Foo</a> x; attribute long y; };</div>\n<a>A</a> includes <a>M</a>;"
    );
}
