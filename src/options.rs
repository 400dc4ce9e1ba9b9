//! Per-call parser configuration.

use crate::extensions::Extensions;

/// Options for [`crate::parse`]. The default parses abstractly with no
/// source label and no extensions.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Label used in error messages.
    pub source_name: Option<String>,
    /// Append an end-of-input node carrying the trailing trivia.
    pub concrete: bool,
    /// Accept `typedef` inside non-dictionary containers.
    pub allow_nested_typedefs: bool,
    pub extensions: Extensions,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn concrete(mut self, concrete: bool) -> Self {
        self.concrete = concrete;
        self
    }

    pub fn allow_nested_typedefs(mut self, allow: bool) -> Self {
        self.allow_nested_typedefs = allow;
        self
    }

    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }
}
