//! The declaration-vs-style-rule disambiguation (spec.md §4.5) and nested
//! property groups.

#![cfg(test)]

#[macro_use]
mod macros;

use sass_parser_core::{parse_scss, Statement};

test!(simple_declaration, "a {\n  color: red;\n}\n");

#[test]
fn pseudo_class_selector_not_mistaken_for_declaration() {
    let sheet = parse_scss("a:hover {\n  color: red;\n}\n", None, None).unwrap();
    let Statement::StyleRule(rule) = &sheet.statements[0] else {
        panic!("expected a style rule, got {:?}", sheet.statements[0]);
    };
    assert_eq!(rule.selector.as_plain().unwrap(), "a:hover");
}

test!(
    pseudo_element_selector_not_mistaken_for_declaration,
    "a::before {\n  content: \"x\";\n}\n"
);

test!(
    custom_property_is_raw_text,
    "a {\n  --main-color: not a valid expression!!;\n}\n"
);

#[test]
fn custom_property_keeps_raw_value() {
    let sheet = parse_scss("a {\n  --x: 1 + 1;\n}\n", None, None).unwrap();
    let Statement::StyleRule(rule) = &sheet.statements[0] else {
        panic!("expected a style rule");
    };
    let Statement::Declaration(decl) = &rule.children[0] else {
        panic!("expected a declaration");
    };
    assert!(decl.value.is_none());
    assert!(decl.custom_property_value.is_some());
}

test!(
    nested_declaration_group,
    "a {\n  font: 12px/30px {\n    family: Arial;\n    weight: bold;\n  }\n}\n"
);

#[test]
fn nested_declaration_group_concatenates_dashed_name() {
    let sheet = parse_scss(
        "a {\n  font: {\n    family: Arial;\n  }\n}\n",
        None,
        None,
    )
    .unwrap();
    let Statement::StyleRule(rule) = &sheet.statements[0] else {
        panic!("expected a style rule");
    };
    let Statement::Declaration(outer) = &rule.children[0] else {
        panic!("expected a declaration");
    };
    let Statement::Declaration(inner) = &outer.children[0] else {
        panic!("expected a nested declaration");
    };
    assert_eq!(inner.name.as_plain().unwrap(), "font-family");
}

test!(two_consecutive_style_rules_need_no_separator, ".a {}\n.b {}\n");

test!(star_ie_hack_declaration, "a {\n  *zoom: 1;\n}\n");

test!(dot_ie_hack_declaration, "a {\n  .foo: bar;\n}\n");

test!(colon_ie_hack_declaration, "a {\n  :foo: bar;\n}\n");

test!(hash_ie_hack_declaration, "a {\n  #foo: bar;\n}\n");

test!(
    url_with_unquoted_relative_path,
    "a {\n  background: url(images/foo.png);\n}\n"
);

#[test]
fn hash_interpolation_is_not_mistaken_for_ie_hack() {
    let sheet = parse_scss("a {\n  #{$name}: bar;\n}\n", None, None)
        .unwrap_or_else(|e| panic!("expected interpolated property name to parse, got {}", e));
    let Statement::StyleRule(rule) = &sheet.statements[0] else {
        panic!("expected a style rule");
    };
    let Statement::Declaration(decl) = &rule.children[0] else {
        panic!("expected a declaration, got {:?}", rule.children[0]);
    };
    assert!(decl.value.is_some());
}
