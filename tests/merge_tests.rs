mod common;

use common::{container, parse_ok};
use webidl_cst::ast::NodeKind;
use webidl_cst::{merge, write, Definition, Member, Node};

fn member_names(definition: &Definition) -> Vec<&str> {
    container(definition)
        .members
        .iter()
        .filter_map(|member| Node::name(member))
        .collect()
}

fn exposure_of(member: &Member) -> Option<Vec<String>> {
    member.ext_attrs().get("Exposed").and_then(|item| item.exposure())
}

#[test]
fn partial_members_join_the_primary() {
    let merged = merge(parse_ok("interface I {};\npartial interface I { attribute boolean extra; };"));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].kind(), NodeKind::Interface);
    assert!(!merged[0].is_partial());
    assert_eq!(member_names(&merged[0]), ["extra"]);
}

#[test]
fn copied_members_point_at_their_new_parent() {
    let merged = merge(parse_ok("interface I {};\npartial interface I { attribute boolean extra; };"));
    let member = &container(&merged[0]).members[0];
    let parent = member.parent().unwrap();
    assert_eq!(parent.name.as_deref(), Some("I"));
    assert!(!parent.partial);
}

#[test]
fn mixins_are_folded_in_and_dropped() {
    let text = "[Exposed=Window] interface A { attribute long a; };\n\
                interface mixin M { attribute long m; };\n\
                A includes M;";
    let merged = merge(parse_ok(text));
    assert_eq!(merged.len(), 1);
    assert_eq!(member_names(&merged[0]), ["a", "m"]);
    assert!(exposure_of(&container(&merged[0]).members[1]).is_none());
}

#[test]
fn unmatched_partials_and_includes_survive() {
    let text = "dictionary A {};\n\
                partial interface A { attribute long x; };\n\
                partial interface Z { attribute long z; };\n\
                A includes Missing;";
    let merged = merge(parse_ok(text));
    assert_eq!(merged.len(), 4);
    assert!(merged[1].is_partial());
    assert!(matches!(merged[3], Definition::Includes(_)));
}

#[test]
fn partial_dictionaries_merge_by_kind() {
    let merged = merge(parse_ok("dictionary D { long a; };\npartial dictionary D { long b; };"));
    assert_eq!(merged.len(), 1);
    assert_eq!(member_names(&merged[0]), ["a", "b"]);
}

// ---
// Exposure
// ---

#[test]
fn exposure_narrows_to_the_source() {
    let text = "[Exposed=(Window,Worker)] interface A {};\n\
                [Exposed=Window] partial interface A { attribute long w; };";
    let merged = merge(parse_ok(text));
    let member = &container(&merged[0]).members[0];
    assert_eq!(exposure_of(member), Some(vec!["Window".to_string()]));
    assert!(write(&merged).contains("{ [Exposed=Window] attribute long w;}"));
}

#[test]
fn exposure_matching_the_target_is_removed() {
    let text = "[Exposed=Window] interface A {};\n\
                partial interface A { [Exposed=Window] attribute long x; };";
    let merged = merge(parse_ok(text));
    let member = &container(&merged[0]).members[0];
    assert!(member.ext_attrs().is_empty());
    assert!(write(&merged).contains("{ attribute long x;}"));
}

#[test]
fn members_exposed_nowhere_are_dropped() {
    let text = "[Exposed=Window] interface A {};\n\
                partial interface A { [Exposed=Worker] attribute long gone; attribute long kept; };";
    let merged = merge(parse_ok(text));
    assert_eq!(member_names(&merged[0]), ["kept"]);
}

#[test]
fn unexposed_target_takes_the_source_exposure() {
    let text = "interface A {};\n[Exposed=Worker] partial interface A { attribute long w; };";
    let merged = merge(parse_ok(text));
    let member = &container(&merged[0]).members[0];
    assert_eq!(exposure_of(member), Some(vec!["Worker".to_string()]));
}

#[test]
fn wildcard_source_keeps_the_target_exposure() {
    let text = "[Exposed=Window] interface A {};\n[Exposed=*] partial interface A { attribute long w; };";
    let merged = merge(parse_ok(text));
    assert!(container(&merged[0]).members[0].ext_attrs().is_empty());
}
