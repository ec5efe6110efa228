//! A hand-written recursive-descent parser for the Sass language: the
//! SCSS and indented surface syntaxes, plus a plain-CSS mode that forbids
//! every Sass-only extension. This crate only parses -- it has no
//! evaluator, no importer, and produces an immutable, span-annotated AST
//! rather than compiled CSS output.
//!
//! ```
//! use sass_parser_core::parse_scss;
//!
//! let stylesheet = parse_scss(".a { color: $c; }", None, None).unwrap();
//! assert_eq!(stylesheet.statements.len(), 1);
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
)]
#![deny(missing_debug_implementations)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
)]

pub mod ast;
pub mod error;
pub mod interpolation;
pub mod logger;
pub mod parse;

pub use crate::ast::{
    Argument, ArgumentDeclaration, ArgumentInvocation, BinaryOp, ConfiguredVariable,
    CssMediaQuery, Expression, ListSeparator, MediaQueryKind, Statement, Stylesheet,
    SupportsCondition, UnaryOp,
};
pub use crate::error::{SassError, SassResult};
pub use crate::interpolation::{Interpolation, InterpolationItem};
pub use crate::logger::{DeprecationKind, Logger, SilentLogger, StderrLogger};
pub use crate::parse::dialect::Dialect;
pub use crate::parse::{
    is_identifier, parse_argument_declaration, parse_at_root_query, parse_css,
    parse_expression, parse_identifier, parse_indented, parse_keyframe_selector,
    parse_media_query_list, parse_scss, parse_selector, parse_supports_condition,
};
