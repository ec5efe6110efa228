//! The three surface syntaxes (spec.md §4.6): SCSS, the indented
//! syntax, and plain CSS.

#![cfg(test)]

use sass_parser_core::{parse_css, parse_indented, parse_scss};

#[test]
fn indented_block_uses_indentation_not_braces() {
    let sheet = parse_indented("a\n  color: red\n  b\n    color: blue\n", None, None)
        .unwrap_or_else(|e| panic!("expected indented input to parse, got {}", e));
    assert_eq!(sheet.statements.len(), 1);
}

#[test]
fn indented_if_else() {
    parse_indented(
        "a\n  @if $x\n    color: red\n  @else\n    color: blue\n",
        None,
        None,
    )
    .unwrap_or_else(|e| panic!("expected indented if/else to parse, got {}", e));
}

#[test]
fn indented_silent_comment_is_dropped_from_output_but_still_parses() {
    parse_indented("// a comment\na\n  color: red\n", None, None)
        .unwrap_or_else(|e| panic!("expected indented comment to parse, got {}", e));
}

#[test]
fn indented_mixed_tabs_and_spaces_is_an_error() {
    let src = "a\n\tcolor: red\n    color: blue\n";
    match parse_indented(src, None, None) {
        Ok(sheet) => panic!("expected mixed indentation to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.to_lowercase().contains("indent") || e.message.to_lowercase().contains("tab"),
            "expected an indentation error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_accepts_ordinary_rules() {
    parse_css("a { color: red; }\n", None, None)
        .unwrap_or_else(|e| panic!("expected plain CSS to parse, got {}", e));
}

#[test]
fn plain_css_rejects_interpolation_in_declaration_values() {
    match parse_css("a {\n  color: #{$x};\n}\n", None, None) {
        Ok(sheet) => panic!("expected plain CSS with interpolation to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.contains("plain CSS"),
            "expected a plain-CSS restriction error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_rejects_variables() {
    match parse_css("a {\n  color: $x;\n}\n", None, None) {
        Ok(sheet) => panic!("expected a variable in plain CSS to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.contains("plain CSS"),
            "expected a plain-CSS restriction error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_rejects_variable_declarations() {
    match parse_css("$x: 1;\n", None, None) {
        Ok(sheet) => panic!("expected a variable declaration in plain CSS to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.contains("plain CSS"),
            "expected a plain-CSS restriction error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_rejects_parent_selector() {
    match parse_css("a {\n  & b {\n    color: red;\n  }\n}\n", None, None) {
        Ok(sheet) => panic!("expected \"&\" in plain CSS to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.contains("plain CSS"),
            "expected a plain-CSS restriction error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_rejects_sass_only_operators() {
    match parse_css("a {\n  color: 1 == 2;\n}\n", None, None) {
        Ok(sheet) => panic!("expected \"==\" in plain CSS to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.contains("plain CSS"),
            "expected a plain-CSS restriction error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_rejects_nesting_disallowed_at_rules() {
    match parse_css("@mixin foo {\n  color: red;\n}\n", None, None) {
        Ok(sheet) => panic!("expected @mixin in plain CSS to fail, got {:?}", sheet),
        Err(e) => assert!(
            e.message.contains("plain CSS"),
            "expected a plain-CSS restriction error, got {:?}",
            e.message
        ),
    }
}

#[test]
fn plain_css_allows_media_and_supports() {
    parse_css("@media screen {\n  a { color: red; }\n}\n", None, None)
        .unwrap_or_else(|e| panic!("expected @media in plain CSS to parse, got {}", e));
}

#[test]
fn scss_requires_braces_not_indentation() {
    parse_scss("a {\n  color: red;\n}\n", None, None)
        .unwrap_or_else(|e| panic!("expected braced SCSS to parse, got {}", e));
}
