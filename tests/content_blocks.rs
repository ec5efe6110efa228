//! `@content`/`@include { ... }` parsing, replacing the teacher's
//! evaluation-oriented `content-exists()` fixtures (this crate stops at the
//! AST and has no builtin-function evaluator to exercise).

#![cfg(test)]

#[macro_use]
mod macros;

use sass_parser_core::{parse_scss, Statement};

error!(
    content_outside_mixin,
    "a {\n  @content;\n}\n",
    "@content is only allowed within mixin bodies."
);

test!(
    mixin_with_content_rule,
    "@mixin foo {\n  color: red;\n  @content;\n}\n"
);

test!(
    include_no_braces_no_args,
    "@mixin foo {\n  color: red;\n}\n\na {\n  @include foo;\n}\n"
);

test!(
    include_empty_braces,
    "@mixin foo {\n  color: red;\n  @content;\n}\n\na {\n  @include foo {\n  }\n}\n"
);

#[test]
fn include_with_content_block_is_attached_to_the_include() {
    let sheet = parse_scss(
        "@mixin foo {\n  @content;\n}\n\na {\n  @include foo {\n    color: red;\n  }\n}\n",
        None,
        None,
    )
    .unwrap();
    let Statement::StyleRule(rule) = &sheet.statements[1] else {
        panic!("expected a style rule");
    };
    let Statement::IncludeRule(include) = &rule.children[0] else {
        panic!("expected an @include statement");
    };
    assert_eq!(include.name, "foo");
    let content = include.content.as_ref().expect("content block");
    assert_eq!(content.body.len(), 1);
}
