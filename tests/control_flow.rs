//! `@if`/`@else if`/`@else`, `@each`, `@for`, `@while` (spec.md §4.5).

#![cfg(test)]

#[macro_use]
mod macros;

use sass_parser_core::{parse_scss, Statement};

test!(if_with_else, "a {\n  @if $x {\n    color: red;\n  } @else {\n    color: blue;\n  }\n}\n");

test!(
    if_else_if_chain,
    "a {\n  @if $x {\n    color: red;\n  } @else if $y {\n    color: green;\n  } @else {\n    color: blue;\n  }\n}\n"
);

test!(deprecated_compact_elseif, "a {\n  @if $x {\n    color: red;\n  } @elseif $y {\n    color: blue;\n  }\n}\n");

test!(each_single_variable, "@each $name in a, b, c {\n  .#{$name} { color: red; }\n}\n");

test!(each_destructured_variables, "@each $key, $value in $map {\n  .#{$key} { color: $value; }\n}\n");

test!(for_through, "@for $i from 1 through 3 {\n  .item-#{$i} { width: $i; }\n}\n");

test!(for_to, "@for $i from 1 to 3 {\n  .item-#{$i} { width: $i; }\n}\n");

test!(while_loop, "@while $i > 0 {\n  .item { width: $i; }\n}\n");

error!(
    content_rule_without_mixin_flag_even_inside_if,
    "a {\n  @if true {\n    @content;\n  }\n}\n",
    "@content is only allowed within mixin bodies."
);

#[test]
fn for_rule_records_inclusive_flag() {
    let sheet = parse_scss("@for $i from 1 through 3 {\n  a { width: $i; }\n}\n", None, None).unwrap();
    let Statement::ForRule(rule) = &sheet.statements[0] else {
        panic!("expected a for rule");
    };
    assert!(rule.inclusive);
    assert_eq!(rule.variable, "i");
}
