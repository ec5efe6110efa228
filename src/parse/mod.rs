//! The parser core (spec.md §2). `Parser` is the single struct that all
//! six components (C1-C6) add methods to; the dialect differences named in
//! spec.md §4.6 are modeled as an enum match rather than three subclasses
//! (see DESIGN.md -- "Open Questions" for why the enum variant of the two
//! options spec.md §9 allows was chosen here).

pub mod at_root;
pub mod chars;
pub mod dialect;
pub mod expression;
pub mod keyframe;
pub mod lexer;
pub mod media;
pub mod scanner;
pub mod selector;
pub mod stylesheet;
pub mod value_scan;

use std::sync::Arc;

use codemap::{CodeMap, File, Span};

use crate::error::SassResult;
use crate::logger::{Logger, StderrLogger};
use crate::parse::dialect::Dialect;
use crate::parse::scanner::Scanner;

/// Per-parse context flags (spec.md §4.5 "Context flags", §9 "Mutable
/// parser flags"). These are fields on the parser, saved and restored
/// around child blocks via [`with_flag`] rather than threaded through
/// function arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserFlags {
    pub in_style_rule: bool,
    pub in_mixin: bool,
    pub in_content_block: bool,
    pub in_control_directive: bool,
    pub in_unknown_at_rule: bool,
    /// Inside an `@keyframes` block, style-rule-shaped children use the
    /// keyframe-selector grammar (`from`/`to`/percentage) instead of the
    /// ordinary selector grammar (spec.md §4.7 "KeyframeSelectorParser").
    pub in_keyframes: bool,
    pub in_parentheses: bool,
    pub in_expression: bool,
    pub in_function: bool,
    pub is_use_allowed: bool,
}

impl ParserFlags {
    pub fn at_top_level() -> Self {
        ParserFlags {
            is_use_allowed: true,
            ..ParserFlags::default()
        }
    }
}

/// Saves and restores a single boolean flag around a speculative or nested
/// parse. Mirrors the "stack-allocated guard that captures the old value
/// on construction and restores on drop" design note (spec.md §9) without
/// requiring unsafe pointer capture: call sites run the body inline and
/// the macro restores unconditionally afterward, whether the body
/// succeeded or failed.
#[macro_export]
macro_rules! with_flag {
    ($self:expr, $field:ident, $value:expr, $body:expr) => {{
        let __saved = $self.flags.$field;
        $self.flags.$field = $value;
        let __result = $body;
        $self.flags.$field = __saved;
        __result
    }};
}

/// Names a user-defined `@function` may not take, since each already
/// denotes a builtin CSS function or operator keyword the expression
/// grammar special-cases (spec.md §3 invariant, "SPEC_FULL" supplement).
/// Checked by `@function` declaration parsing; plain CSS function calls to
/// these same names (`calc(...)`, `url(...)`, ...) are unaffected -- they
/// aren't declarations, so there's nothing to shadow.
pub const RESERVED_FUNCTION_NAMES: &[&str] =
    &["calc", "element", "expression", "url", "and", "or", "not", "clamp"];

/// Plain CSS function names a `@mixin` declaration may also take, which
/// makes a bare call to that name ambiguous between "invoke the mixin" and
/// "call the CSS function" once mixin-call-without-`@include` sugar is in
/// play. Declaring a mixin under one of these names is deprecated rather
/// than rejected outright, matching `DeprecationKind::CssFunctionMixin`.
pub const CSS_GLOBAL_FUNCTION_NAMES: &[&str] = &[
    "rgb",
    "rgba",
    "hsl",
    "hsla",
    "hwb",
    "lab",
    "lch",
    "url",
    "var",
    "calc",
    "min",
    "max",
    "clamp",
    "attr",
    "counter",
    "counters",
    "format",
    "local",
    "linear-gradient",
    "radial-gradient",
    "repeating-linear-gradient",
    "repeating-radial-gradient",
];

pub struct Parser<'a> {
    pub scanner: Scanner,
    pub logger: &'a dyn Logger,
    pub dialect: Dialect,
    pub url: Option<String>,
    pub flags: ParserFlags,
    /// Names seen with `!global` anywhere in the document; each gets a
    /// guarded null declaration appended at top level (spec.md §4.5,
    /// "parse()").
    pub global_names_seen: Vec<String>,
    /// The indentation column (in characters) of the statement currently
    /// being parsed, in the indented dialect. 0 at top level.
    pub current_indentation: usize,
    /// Whichever of `' '`/`'\t'` the document committed to first; mixing
    /// the two is an error (spec.md §4.6 "Indented-specific...").
    pub indent_char: Option<char>,
}

impl<'a> Parser<'a> {
    pub fn new(file: Arc<File>, dialect: Dialect, url: Option<String>, logger: &'a dyn Logger) -> Self {
        Parser {
            scanner: Scanner::new(file),
            logger,
            dialect,
            url,
            flags: ParserFlags::at_top_level(),
            global_names_seen: Vec::new(),
            current_indentation: 0,
            indent_char: None,
        }
    }

    pub fn indented(&self) -> bool {
        self.dialect == Dialect::Indented
    }

    pub fn plain_css(&self) -> bool {
        self.dialect == Dialect::PlainCss
    }

    pub fn whole_span(&self) -> Span {
        self.scanner.file().span
    }

    /// Parse errors raised while the current mode is plain CSS but the
    /// construct is Sass-only (spec.md §3 invariant, §4.6 "PlainCSS
    /// additionally forbids...").
    pub fn forbid_in_plain_css(&self, what: &str, span: Span) -> SassResult<()> {
        if self.plain_css() {
            Err(crate::error::SassError::new(
                format!("{} aren't allowed in plain CSS.", what),
                span,
            ))
        } else {
            Ok(())
        }
    }
}

fn make_file(codemap: &mut CodeMap, text: &str, url: Option<&str>) -> Arc<File> {
    codemap.add_file(url.unwrap_or("stdin").to_string(), text.to_string())
}

/// `parse_scss(text, url?, logger?) -> Stylesheet | error` (spec.md §6).
pub fn parse_scss(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::Stylesheet> {
    parse_with_dialect(text, url, logger, Dialect::Scss)
}

/// `parse_indented(text, url?, logger?) -> Stylesheet | error`.
pub fn parse_indented(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::Stylesheet> {
    parse_with_dialect(text, url, logger, Dialect::Indented)
}

/// `parse_css(text, url?, logger?) -> Stylesheet | error` (plain CSS mode).
pub fn parse_css(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::Stylesheet> {
    parse_with_dialect(text, url, logger, Dialect::PlainCss)
}

fn parse_with_dialect(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
    dialect: Dialect,
) -> SassResult<crate::ast::Stylesheet> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let file = make_file(&mut codemap, text, url);
    let mut parser = Parser::new(file, dialect, url.map(str::to_owned), logger);
    parser.parse_stylesheet()
}

/// `parse_expression(text, url?, logger?) -> Expression | error`.
pub fn parse_expression(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::Expression> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let file = make_file(&mut codemap, text, url);
    let mut parser = Parser::new(file, Dialect::Scss, url.map(str::to_owned), logger);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let expr = parser.parse_expression_full(None, false, false)?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(expr)
}

/// `parse_identifier(text) -> string | error`.
pub fn parse_identifier(text: &str) -> SassResult<String> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let mut codemap = CodeMap::new();
    let file = make_file(&mut codemap, text, None);
    let mut parser = Parser::new(file, Dialect::Scss, None, &DEFAULT_LOGGER);
    let name = lexer::identifier(&mut parser.scanner, false, false)?;
    parser.scanner.expect_done()?;
    Ok(name)
}

/// `is_identifier(text) -> bool`.
pub fn is_identifier(text: &str) -> bool {
    parse_identifier(text).is_ok()
}

fn standalone_parser<'a>(
    text: &str,
    url: Option<&str>,
    logger: &'a dyn Logger,
    codemap: &mut CodeMap,
) -> Parser<'a> {
    let file = make_file(codemap, text, url);
    Parser::new(file, Dialect::Scss, url.map(str::to_owned), logger)
}

/// `parse_selector(text, url?, logger?) -> Interpolation | error` (spec.md
/// §4.7, for embedders that already have a bare selector string, e.g. from
/// `&`-extension resolution done outside this crate).
pub fn parse_selector(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::interpolation::Interpolation> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let mut parser = standalone_parser(text, url, logger, &mut codemap);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let selector = parser.parse_selector_list()?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(selector)
}

/// `parse_keyframe_selector(text, url?, logger?) -> Interpolation | error`.
pub fn parse_keyframe_selector(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::interpolation::Interpolation> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let mut parser = standalone_parser(text, url, logger, &mut codemap);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let selector = parser.parse_keyframe_selector_list()?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(selector)
}

/// `parse_media_query_list(text, url?, logger?) -> Vec<CssMediaQuery> | error`.
pub fn parse_media_query_list(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<Vec<crate::ast::media::CssMediaQuery>> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let mut parser = standalone_parser(text, url, logger, &mut codemap);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let queries = parser.parse_media_query_list()?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(queries)
}

/// `parse_at_root_query(text, url?, logger?) -> AtRootQuery | error`.
pub fn parse_at_root_query(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::stmt::AtRootQuery> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let mut parser = standalone_parser(text, url, logger, &mut codemap);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let query = parser.parse_at_root_query()?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(query)
}

/// `parse_supports_condition(text, url?, logger?) -> SupportsCondition | error`.
pub fn parse_supports_condition(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::SupportsCondition> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let mut parser = standalone_parser(text, url, logger, &mut codemap);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let condition = parser.parse_supports_condition()?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(condition)
}

/// `parse_argument_declaration(text, url?, logger?) -> ArgumentDeclaration | error`.
pub fn parse_argument_declaration(
    text: &str,
    url: Option<&str>,
    logger: Option<&dyn Logger>,
) -> SassResult<crate::ast::ArgumentDeclaration> {
    static DEFAULT_LOGGER: StderrLogger = StderrLogger;
    let logger = logger.unwrap_or(&DEFAULT_LOGGER);
    let mut codemap = CodeMap::new();
    let mut parser = standalone_parser(text, url, logger, &mut codemap);
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    let declaration = parser.parse_argument_declaration()?;
    lexer::whitespace_with_comments(&mut parser.scanner)?;
    parser.scanner.expect_done()?;
    Ok(declaration)
}
