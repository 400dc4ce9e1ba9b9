//! Turns a tree back into text.
//!
//! The writer replays every token in source order. Each token is rendered
//! as its trivia followed by its value, and each node's rendered content is
//! handed to [`Templates::node`] once the node is complete, so callers can
//! wrap names, references or whole definitions (for syntax highlighting or
//! linking) without touching the layout.

use crate::ast::{Definition, NodeKind, Role, Visitor, Walk};
use crate::token::Token;

/// Rendering hooks. The defaults reproduce the source exactly.
pub trait Templates {
    fn trivia(&self, trivia: &str) -> String {
        trivia.to_owned()
    }

    fn token(&self, token: &Token, _role: Role) -> String {
        token.value.clone()
    }

    fn node(&self, content: String, _kind: NodeKind, _name: Option<&str>) -> String {
        content
    }
}

/// Templates that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Templates for Identity {}

/// Writes `definitions` back to text. For a tree parsed in concrete mode the
/// result equals the parsed input.
pub fn write(definitions: &[Definition]) -> String {
    write_with(definitions, &Identity)
}

pub fn write_with<T: Templates + ?Sized>(definitions: &[Definition], templates: &T) -> String {
    let mut writer = Writer {
        templates,
        stack: vec![String::new()],
    };
    for definition in definitions {
        definition.walk(&mut writer);
    }
    writer.stack.into_iter().collect()
}

struct Writer<'t, T: ?Sized> {
    templates: &'t T,
    /// Output of the nodes currently open, innermost last.
    stack: Vec<String>,
}

impl<T: Templates + ?Sized> Writer<'_, T> {
    fn top(&mut self) -> &mut String {
        if self.stack.is_empty() {
            self.stack.push(String::new());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl<'a, T: Templates + ?Sized> Visitor<'a> for Writer<'_, T> {
    fn token(&mut self, token: &'a Token, role: Role) {
        let rendered = self.templates.trivia(&token.trivia) + &self.templates.token(token, role);
        self.top().push_str(&rendered);
    }

    fn enter(&mut self, _kind: NodeKind, _name: Option<&str>) {
        self.stack.push(String::new());
    }

    fn leave(&mut self, kind: NodeKind, name: Option<&str>) {
        let content = self.stack.pop().unwrap_or_default();
        let rendered = self.templates.node(content, kind, name);
        self.top().push_str(&rendered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse;
    use crate::options::ParseOptions;

    struct Brackets;

    impl Templates for Brackets {
        fn token(&self, token: &Token, role: Role) -> String {
            match role {
                Role::Name => format!("<{}>", token.value),
                _ => token.value.clone(),
            }
        }
    }

    #[test]
    fn identity_reproduces_concrete_input() {
        let text = "// lead\n[Exposed=Window]\ninterface A {\n  attribute long x;\n};\n\n";
        let definitions = parse(text, &ParseOptions::new().concrete(true)).unwrap();
        assert_eq!(write(&definitions), text);
    }

    #[test]
    fn templates_see_token_roles() {
        let definitions = parse("interface A { attribute long x; };", &ParseOptions::new()).unwrap();
        assert_eq!(
            write_with(&definitions, &Brackets),
            "interface <A> { attribute long <x>; };"
        );
    }
}
