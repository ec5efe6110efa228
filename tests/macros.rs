//! Declarative fixtures in the style of the teacher's `tests/content-exists.rs`
//! `test!`/`error!` macros, adapted to this crate's AST-only surface: instead
//! of comparing rendered CSS, `test!` asserts a parse succeeds and `error!`
//! asserts it fails with a message containing a given substring.

#![allow(unused_macros)]

macro_rules! test {
    ($name:ident, $input:expr) => {
        #[test]
        fn $name() {
            sass_parser_core::parse_scss($input, None, None)
                .unwrap_or_else(|e| panic!("expected {:?} to parse, got {}", $input, e));
        }
    };
}

macro_rules! error {
    ($name:ident, $input:expr, $message:expr) => {
        #[test]
        fn $name() {
            match sass_parser_core::parse_scss($input, None, None) {
                Ok(sheet) => panic!("expected {:?} to fail to parse, got {:?}", $input, sheet),
                Err(e) => assert!(
                    e.message.contains($message),
                    "expected error containing {:?}, got {:?}",
                    $message,
                    e.message
                ),
            }
        }
    };
}
