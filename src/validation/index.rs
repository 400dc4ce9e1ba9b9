use std::collections::HashMap;

use crate::ast::{Container, ContainerKind, Definition, Node};

/// Name lookups over one document.
#[derive(Debug)]
pub struct DefinitionIndex<'a> {
    pub all: &'a [Definition],
    unique: HashMap<&'a str, &'a Definition>,
    partials: HashMap<&'a str, Vec<&'a Container>>,
    duplicates: Vec<&'a Definition>,
    mixins: HashMap<&'a str, Vec<&'a Container>>,
}

impl<'a> DefinitionIndex<'a> {
    pub fn new(all: &'a [Definition]) -> Self {
        let mut unique = HashMap::new();
        let mut partials: HashMap<&str, Vec<&Container>> = HashMap::new();
        let mut duplicates = Vec::new();

        for definition in all {
            if let Some(container) = definition.as_container().filter(|c| c.partial()) {
                partials.entry(container.name()).or_default().push(container);
                continue;
            }
            let Some(name) = Node::name(definition) else {
                continue;
            };
            if unique.contains_key(name) {
                duplicates.push(definition);
            } else {
                unique.insert(name, definition);
            }
        }

        let mut mixins: HashMap<&str, Vec<&Container>> = HashMap::new();
        for definition in all {
            let Definition::Includes(includes) = definition else {
                continue;
            };
            let mixin = unique
                .get(includes.mixin())
                .and_then(|d| d.container_of(ContainerKind::Mixin));
            if let Some(mixin) = mixin {
                mixins.entry(includes.target()).or_default().push(mixin);
            }
        }

        Self {
            all,
            unique,
            partials,
            duplicates,
            mixins,
        }
    }

    /// The first non-partial definition named `name`.
    pub fn get(&self, name: &str) -> Option<&'a Definition> {
        self.unique.get(name).copied()
    }

    pub fn partials(&self, name: &str) -> &[&'a Container] {
        self.partials.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Mixins included into `target` by `includes` statements.
    pub fn mixins_of(&self, target: &str) -> &[&'a Container] {
        self.mixins.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    /// Non-partial definitions whose name was already taken.
    pub fn duplicates(&self) -> &[&'a Definition] {
        &self.duplicates
    }
}
