//! Folds partial definitions and included mixins into their targets.

use log::{debug, warn};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::ast::{
    ContainerKind, Definition, ExtendedAttribute, ExtendedAttributes, ExtendedAttributesTokens, Member,
};
use crate::grammar::extended_attributes::extended_attribute;
use crate::grammar::parse_fragment;
use crate::token::{Token, TokenKind};

/// Copies the members of every partial into the primary definition of the
/// same kind and name, and the members of every included mixin into the
/// including interface. Consumed partials, `includes` statements and
/// included mixins are dropped; partials without a primary are kept.
///
/// A copied member ends up exposed where both its source and the target are
/// exposed. Members whose exposure set becomes empty are dropped.
pub fn merge(mut definitions: Vec<Definition>) -> Vec<Definition> {
    let mut primaries: HashMap<(ContainerKind, String), usize> = HashMap::new();
    for (index, definition) in definitions.iter().enumerate() {
        if let Some(container) = definition.as_container().filter(|c| !c.partial()) {
            primaries
                .entry((container.kind, container.name().to_owned()))
                .or_insert(index);
        }
    }

    let mut consumed = HashSet::new();
    for index in 0..definitions.len() {
        let Some(partial) = definitions[index].as_container().filter(|c| c.partial()) else {
            continue;
        };
        let Some(&target) = primaries.get(&(partial.kind, partial.name().to_owned())) else {
            continue;
        };
        let source = exposure(&partial.ext_attrs);
        let members = partial.members.clone();
        debug!("merging partial {} {}", partial.kind, partial.name());
        absorb(&mut definitions[target], members, source.as_deref());
        consumed.insert(index);
    }

    let mut included = HashSet::new();
    for index in 0..definitions.len() {
        let Definition::Includes(includes) = &definitions[index] else {
            continue;
        };
        let target = primaries.get(&(ContainerKind::Interface, includes.target().to_owned()));
        let mixin = primaries.get(&(ContainerKind::Mixin, includes.mixin().to_owned()));
        let (Some(&target), Some(&mixin)) = (target, mixin) else {
            continue;
        };
        debug!("merging mixin {} into {}", includes.mixin(), includes.target());
        let Some(source) = definitions[mixin].as_container() else {
            continue;
        };
        let members = source.members.clone();
        let exposed = exposure(&source.ext_attrs);
        absorb(&mut definitions[target], members, exposed.as_deref());
        consumed.insert(index);
        included.insert(mixin);
    }

    let mut merged: Vec<Definition> = definitions
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !consumed.contains(index) && !included.contains(index))
        .map(|(_, definition)| definition)
        .collect();
    for definition in &mut merged {
        definition.relink();
    }
    merged
}

fn absorb(target: &mut Definition, members: Vec<Member>, source: Option<&[String]>) {
    let Some(container) = target.as_container_mut() else {
        return;
    };
    let target_exposure = exposure(&container.ext_attrs);
    for mut member in members {
        if restrict_exposure(&mut member, source, target_exposure.as_deref()) {
            container.members.push(member);
        } else {
            warn!(
                "dropping {} from {}: it would not be exposed anywhere",
                crate::ast::Node::name(&member).unwrap_or("member"),
                container.name()
            );
        }
    }
}

fn exposure(list: &ExtendedAttributes) -> Option<Vec<String>> {
    list.get("Exposed").and_then(ExtendedAttribute::exposure)
}

/// Narrows the member's `[Exposed]` to what the target allows. Returns false
/// when nothing is left.
fn restrict_exposure(member: &mut Member, source: Option<&[String]>, target: Option<&[String]>) -> bool {
    let own = exposure(member.ext_attrs());
    let Some(source) = own.as_deref().or(source) else {
        return true;
    };
    let Some(target) = target else {
        if own.is_none() {
            set_exposed(member, source);
        }
        return true;
    };

    let merged = intersect(source, target);
    if merged.is_empty() {
        return false;
    }
    if as_set(&merged) == as_set(target) {
        clear_exposed(member);
    } else {
        set_exposed(member, &merged);
    }
    true
}

fn as_set(names: &[String]) -> BTreeSet<&str> {
    names.iter().map(String::as_str).collect()
}

fn intersect(left: &[String], right: &[String]) -> Vec<String> {
    let wildcard = |names: &[String]| names.iter().any(|name| name == "*");
    if wildcard(left) {
        return right.to_vec();
    }
    if wildcard(right) {
        return left.to_vec();
    }
    left.iter().filter(|name| right.contains(*name)).cloned().collect()
}

fn set_exposed(member: &mut Member, names: &[String]) {
    let text = match names {
        [single] => format!("Exposed={single}"),
        _ => format!("Exposed=({})", names.join(", ")),
    };
    let Some(mut item) = parse_fragment(&text, extended_attribute) else {
        return;
    };

    let list = member.ext_attrs_mut();
    if let Some(position) = list.position("Exposed") {
        let old = &mut list.items[position];
        item.tokens.separator = old.tokens.separator.take();
        item.tokens.name.trivia = std::mem::take(&mut old.tokens.name.trivia);
        list.items[position] = item;
        return;
    }
    if list.tokens.open.is_some() {
        list.prepend(item);
        return;
    }

    let trivia = member
        .leading_token_mut()
        .map(|token| std::mem::replace(&mut token.trivia, " ".to_owned()))
        .unwrap_or_default();
    *member.ext_attrs_mut() = ExtendedAttributes {
        tokens: ExtendedAttributesTokens {
            open: Some(Token::synthetic(TokenKind::Punctuation, "[", trivia)),
            close: Some(Token::synthetic(TokenKind::Punctuation, "]", "")),
        },
        items: vec![item],
    };
}

fn clear_exposed(member: &mut Member) {
    let list = member.ext_attrs_mut();
    let Some(position) = list.position("Exposed") else {
        return;
    };
    let open_trivia = list
        .tokens
        .open
        .as_ref()
        .map(|open| open.trivia.clone())
        .unwrap_or_default();
    list.remove(position);
    if list.is_empty() {
        if let Some(token) = member.leading_token_mut() {
            token.trivia = open_trivia;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn wildcard_intersects_to_the_other_side() {
        assert_eq!(intersect(&names(&["*"]), &names(&["Window"])), names(&["Window"]));
        assert_eq!(intersect(&names(&["Worker"]), &names(&["*"])), names(&["Worker"]));
    }

    #[test]
    fn intersection_keeps_left_order() {
        assert_eq!(
            intersect(&names(&["Worker", "Window"]), &names(&["Window", "Worker"])),
            names(&["Worker", "Window"])
        );
        assert!(intersect(&names(&["Worker"]), &names(&["Window"])).is_empty());
    }
}
