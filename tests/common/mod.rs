//! Shared helpers for the integration tests.

#![allow(dead_code)]

use webidl_cst::ast::{Container, Member};
use webidl_cst::{parse, Definition, ParseOptions, SyntaxError};

/// Parses `text` in abstract mode, panicking with the report on failure.
pub fn parse_ok(text: &str) -> Vec<Definition> {
    parse(text, &ParseOptions::new()).unwrap_or_else(|error| panic!("{error}"))
}

/// Parses `text` in concrete mode.
pub fn parse_concrete(text: &str) -> Vec<Definition> {
    parse(text, &ParseOptions::new().concrete(true)).unwrap_or_else(|error| panic!("{error}"))
}

pub fn parse_err(text: &str) -> SyntaxError {
    match parse(text, &ParseOptions::new()) {
        Ok(definitions) => panic!("expected a syntax error, parsed {} definitions", definitions.len()),
        Err(error) => error,
    }
}

pub fn container(definition: &Definition) -> &Container {
    match definition {
        Definition::Container(container) => container,
        other => panic!("expected a container, found {other:?}"),
    }
}

/// The only member of the first definition.
pub fn only_member(definitions: &[Definition]) -> &Member {
    let members = &container(&definitions[0]).members;
    assert_eq!(members.len(), 1, "expected exactly one member");
    &members[0]
}
