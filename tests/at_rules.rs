//! `@use`, `@forward`, `@import`, `@supports`, `@media`, `@keyframes`,
//! `@at-root` (spec.md §4.5, §4.7).

#![cfg(test)]

#[macro_use]
mod macros;

use sass_parser_core::{parse_scss, Statement};

#[test]
fn use_rule_derives_default_namespace() {
    let sheet = parse_scss("@use \"sass:math\";\n", None, None).unwrap();
    let Statement::UseRule(rule) = &sheet.statements[0] else {
        panic!("expected a use rule");
    };
    assert_eq!(rule.namespace.as_deref(), Some("math"));
}

#[test]
fn use_rule_strips_partial_prefix_and_directory() {
    let sheet = parse_scss("@use \"foo/_bar\";\n", None, None).unwrap();
    let Statement::UseRule(rule) = &sheet.statements[0] else {
        panic!("expected a use rule");
    };
    assert_eq!(rule.namespace.as_deref(), Some("bar"));
}

test!(use_rule_with_explicit_namespace, "@use \"sass:math\" as m;\n");
test!(use_rule_with_wildcard_namespace, "@use \"sass:math\" as *;\n");
test!(use_rule_with_configuration, "@use \"theme\" with ($primary: blue, $secondary: red);\n");

error!(
    use_rule_must_precede_other_statements,
    "a { color: red; }\n@use \"sass:math\";\n",
    "@use rules must be written before any other rules."
);

test!(forward_rule_basic, "@forward \"src/list\";\n");
test!(forward_rule_with_prefix, "@forward \"src/list\" as list-*;\n");
test!(forward_rule_show, "@forward \"src/list\" show list-slash;\n");
test!(forward_rule_hide, "@forward \"src/list\" hide list-slash;\n");

test!(static_import_of_css_url, "@import \"theme.css\";\n");
test!(dynamic_import, "@import \"theme\";\n");
test!(import_with_media_clause, "@import \"theme.css\" screen;\n");
test!(import_list, "@import \"a\", \"b\", \"c\";\n");

error!(
    dynamic_import_forbidden_in_mixin,
    "@mixin foo {\n  @import \"theme\";\n}\n",
    "Dynamic imports may not appear in control directives or mixins."
);

test!(media_rule, "@media screen and (min-width: 768px) {\n  a { color: red; }\n}\n");

test!(supports_simple_declaration, "@supports (display: grid) {\n  a { color: red; }\n}\n");
test!(
    supports_negation,
    "@supports not (display: grid) {\n  a { color: red; }\n}\n"
);
test!(
    supports_operation,
    "@supports (display: grid) and (gap: 1px) {\n  a { color: red; }\n}\n"
);
error!(
    supports_mixed_and_or_without_parens,
    "@supports (a: b) and (c: d) or (e: f) {\n  a { color: red; }\n}\n",
    "\"and\" and \"or\" may not be used together."
);

test!(
    keyframes_rule,
    "@keyframes spin {\n  from { transform: rotate(0deg); }\n  to { transform: rotate(360deg); }\n}\n"
);
test!(
    keyframes_percentage_selector,
    "@keyframes spin {\n  0% { opacity: 0; }\n  100% { opacity: 1; }\n}\n"
);

test!(at_root_without_query, "a {\n  @at-root {\n    b { color: red; }\n  }\n}\n");
test!(
    at_root_with_without_query,
    "a {\n  @at-root (without: media) {\n    b { color: red; }\n  }\n}\n"
);

test!(extend_rule, "a {\n  @extend .b;\n}\n");
test!(extend_optional, "a {\n  @extend .b !optional;\n}\n");
error!(
    extend_outside_style_rule,
    "@extend .b;\n",
    "@extend may only be used within style rules."
);

error!(
    function_reserved_name_calc,
    "@function calc($x) {\n  @return $x;\n}\n",
    "Invalid function name"
);
error!(
    function_reserved_name_url,
    "@function url($x) {\n  @return $x;\n}\n",
    "Invalid function name"
);
test!(
    function_non_reserved_name,
    "@function double($x) {\n  @return $x * 2;\n}\n"
);

// Deprecated, not rejected: a mixin named after a CSS function still parses.
test!(mixin_named_like_css_function, "@mixin rgba($x) {\n  color: red;\n}\n");
