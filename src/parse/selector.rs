//! Selector grammar (spec.md §4.7 "Companion parsers"). Selectors are
//! stored in the AST as plain [`Interpolation`] text (selector *resolution*
//! -- specificity, combining `&`, and so on -- is an evaluation concern
//! out of scope for this crate) but this module still walks the full
//! combinator/compound-selector/pseudo-class grammar so that malformed
//! selectors are rejected at parse time with an accurate span, and so that
//! `#{...}` holes nested arbitrarily deep (inside `:not(...)`, attribute
//! values, and so on) are recognized as expressions rather than raw text.

use crate::error::SassResult;
use crate::interpolation::{Interpolation, InterpolationBuilder};
use crate::parse::chars::{is_digit, is_name_start, is_whitespace};
use crate::parse::lexer;
use crate::parse::Parser;

/// Pseudo-classes whose argument is itself a selector list, recursively
/// validated the same way as the top-level selector (spec.md §4.7).
const LOGICAL_PSEUDO_CLASSES: &[&str] = &[
    "not",
    "is",
    "matches",
    "where",
    "has",
    "host",
    "host-context",
    "current",
    "any",
];

impl<'a> Parser<'a> {
    /// A full selector list: `ComplexSelector (',' ComplexSelector)*`.
    pub fn parse_selector_list(&mut self) -> SassResult<Interpolation> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();
        self.parse_complex_selector(&mut builder)?;
        loop {
            self.copy_selector_whitespace(&mut builder);
            if self.scanner.peek(0) == Some(',') {
                self.scanner.read();
                builder.push_char(',');
                self.copy_selector_whitespace(&mut builder);
                self.parse_complex_selector(&mut builder)?;
            } else {
                break;
            }
        }
        Ok(builder.finish(self.scanner.span_from(start)))
    }

    fn copy_selector_whitespace(&mut self, builder: &mut InterpolationBuilder) {
        let mut any = false;
        while matches!(self.scanner.peek(0), Some(c) if is_whitespace(c)) {
            self.scanner.read();
            any = true;
        }
        if any {
            builder.push_char(' ');
        }
    }

    /// `CompoundSelector ((combinator | whitespace) CompoundSelector)*`.
    fn parse_complex_selector(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        self.parse_compound_selector(builder)?;
        loop {
            let save = self.scanner.state();
            let had_space = {
                let mut any = false;
                while matches!(self.scanner.peek(0), Some(c) if is_whitespace(c)) {
                    self.scanner.read();
                    any = true;
                }
                any
            };
            match self.scanner.peek(0) {
                Some(c @ ('>' | '+' | '~')) => {
                    if had_space {
                        builder.push_char(' ');
                    }
                    self.scanner.read();
                    builder.push_char(c);
                    let mut any = false;
                    while matches!(self.scanner.peek(0), Some(c) if is_whitespace(c)) {
                        self.scanner.read();
                        any = true;
                    }
                    if any {
                        builder.push_char(' ');
                    }
                    self.parse_compound_selector(builder)?;
                }
                Some(',') | None => {
                    self.scanner.restore(save);
                    break;
                }
                _ if self.looking_at_simple_selector_start() => {
                    if had_space {
                        builder.push_char(' ');
                    }
                    self.parse_compound_selector(builder)?;
                }
                _ => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(())
    }

    fn looking_at_simple_selector_start(&self) -> bool {
        match self.scanner.peek(0) {
            Some('&' | '*' | '.' | '#' | '%' | ':' | '[' | '|') => true,
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    /// `SimpleSelector+`: at least one of type/universal/class/id/
    /// placeholder/parent/pseudo/attribute selectors with no whitespace
    /// between them.
    fn parse_compound_selector(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        let mut count = 0;
        loop {
            match self.scanner.peek(0) {
                Some('&') => {
                    self.forbid_in_plain_css("The parent selector \"&\"", self.scanner.empty_span())?;
                    self.scanner.read();
                    builder.push_char('&');
                }
                Some('*') => {
                    self.scanner.read();
                    builder.push_char('*');
                }
                Some('.') => {
                    self.scanner.read();
                    builder.push_char('.');
                    self.parse_selector_identifier(builder)?;
                }
                Some('%') => {
                    self.scanner.read();
                    builder.push_char('%');
                    self.parse_selector_identifier(builder)?;
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some('#') => {
                    self.scanner.read();
                    builder.push_char('#');
                    self.parse_selector_identifier(builder)?;
                }
                Some(':') => self.parse_pseudo_selector(builder)?,
                Some('[') => self.parse_attribute_selector(builder)?,
                Some('|') => {
                    self.scanner.read();
                    builder.push_char('|');
                    self.parse_selector_identifier(builder)?;
                }
                Some(c) if is_name_start(c) || c == '\\' => {
                    self.parse_selector_identifier(builder)?;
                    if self.scanner.peek(0) == Some('|') && self.scanner.peek(1) != Some('|') {
                        self.scanner.read();
                        builder.push_char('|');
                        self.parse_selector_identifier(builder)?;
                    }
                }
                _ => break,
            }
            count += 1;
        }
        if count == 0 {
            return Err(self.scanner.error("Expected selector."));
        }
        Ok(())
    }

    fn parse_selector_identifier(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        let ident = self.interpolated_identifier()?;
        match ident.as_plain() {
            Some(plain) => builder.push_str(&plain),
            None => {
                for item in ident.contents {
                    match item {
                        crate::interpolation::InterpolationItem::Literal(text) => builder.push_str(&text),
                        crate::interpolation::InterpolationItem::Expr(expr) => builder.push_expr(*expr),
                    }
                }
            }
        }
        Ok(())
    }

    /// `:name`, `::name`, or `:name(args)`. Logical pseudo-classes recurse
    /// into a nested selector list; everything else captures a raw,
    /// interpolation-aware, paren-balanced argument blob (e.g. `An+B` for
    /// `:nth-child`, a language tag for `:lang`).
    fn parse_pseudo_selector(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        self.scanner.read();
        builder.push_char(':');
        if self.scanner.scan_char(':') {
            builder.push_char(':');
        }
        let name_start = self.scanner.state();
        self.parse_selector_identifier(builder)?;
        let name = self.scanner.text_from(name_start).to_ascii_lowercase();

        if self.scanner.peek(0) == Some('(') {
            self.scanner.read();
            builder.push_char('(');
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if LOGICAL_PSEUDO_CLASSES.contains(&name.as_str()) {
                self.parse_complex_selector(builder)?;
                loop {
                    self.copy_selector_whitespace(builder);
                    if self.scanner.peek(0) == Some(',') {
                        self.scanner.read();
                        builder.push_char(',');
                        self.copy_selector_whitespace(builder);
                        self.parse_complex_selector(builder)?;
                    } else {
                        break;
                    }
                }
            } else {
                self.parse_pseudo_argument_blob(builder)?;
            }
            lexer::whitespace_with_comments(&mut self.scanner)?;
            self.scanner.expect_char(')')?;
            builder.push_char(')');
        }
        Ok(())
    }

    /// Raw pseudo-class argument text: used for `:nth-child(2n+1)`,
    /// `:lang(en)`, and anything else that isn't a nested selector list.
    /// Balances inner parens and resolves `#{...}` holes.
    fn parse_pseudo_argument_blob(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        let mut depth = 0i32;
        loop {
            match self.scanner.peek(0) {
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some('(') => {
                    depth += 1;
                    self.scanner.read();
                    builder.push_char('(');
                }
                Some(')') if depth > 0 => {
                    depth -= 1;
                    self.scanner.read();
                    builder.push_char(')');
                }
                Some(')') => break,
                Some('\\') => {
                    builder.push_str(&lexer::escape(&mut self.scanner, false)?);
                }
                None => return Err(self.scanner.error("expected \")\".")),
                Some(c) => {
                    self.scanner.read();
                    builder.push_char(c);
                }
            }
        }
        Ok(())
    }

    /// `[` [namespace `|`] identifier [operator value] [`i`|`s`] `]`.
    fn parse_attribute_selector(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        self.scanner.expect_char('[')?;
        builder.push_char('[');
        lexer::whitespace_with_comments(&mut self.scanner)?;

        if self.scanner.peek(0) == Some('*') && self.scanner.peek(1) == Some('|') {
            self.scanner.read();
            self.scanner.read();
            builder.push_str("*|");
        } else if self.scanner.peek(0) == Some('|') {
            self.scanner.read();
            builder.push_char('|');
        }
        self.parse_selector_identifier(builder)?;
        if self.scanner.peek(0) == Some('|') && self.scanner.peek(1) != Some('=') {
            self.scanner.read();
            builder.push_char('|');
            self.parse_selector_identifier(builder)?;
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;

        if matches!(self.scanner.peek(0), Some('=' | '~' | '|' | '^' | '$' | '*')) {
            let mut op = String::new();
            if self.scanner.peek(0) != Some('=') {
                op.push(self.scanner.read().unwrap());
            }
            self.scanner.expect_char('=')?;
            op.push('=');
            builder.push_str(&op);
            lexer::whitespace_with_comments(&mut self.scanner)?;
            match self.scanner.peek(0) {
                Some('"') | Some('\'') => {
                    let text = self.quoted_selector_string()?;
                    builder.push_str(&text);
                }
                _ => self.parse_selector_identifier(builder)?,
            }
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if matches!(self.scanner.peek(0), Some('i' | 's' | 'I' | 'S')) {
                let flag = self.scanner.read().unwrap();
                builder.push_char(' ');
                builder.push_char(flag);
                lexer::whitespace_with_comments(&mut self.scanner)?;
            }
        }

        self.scanner.expect_char(']')?;
        builder.push_char(']');
        Ok(())
    }

    fn quoted_selector_string(&mut self) -> SassResult<String> {
        let quote = self.scanner.peek(0).unwrap();
        let mut text = String::new();
        text.push(quote);
        self.scanner.read();
        loop {
            match self.scanner.peek(0) {
                Some(c) if c == quote => {
                    text.push(c);
                    self.scanner.read();
                    return Ok(text);
                }
                Some('\n') | None => return Err(self.scanner.error("Expected string.")),
                Some('\\') => {
                    text.push_str(&lexer::escape(&mut self.scanner, false)?);
                }
                Some(c) => {
                    self.scanner.read();
                    text.push(c);
                }
            }
        }
    }

    /// `An+B` micro-grammar for `:nth-child`/`:nth-of-type` and their
    /// `-of-n` variants: `even`, `odd`, `<integer>`, or `<n-dimension>`
    /// optionally followed by whitespace-delimited `+`/`-` and an integer.
    /// Exposed separately from [`parse_pseudo_argument_blob`] for callers
    /// (e.g. a future evaluator) that want the parsed form rather than raw
    /// text.
    pub fn parse_an_plus_b(&mut self) -> SassResult<(i32, i32)> {
        if self.scanner.scan_identifier_str("even") {
            return Ok((2, 0));
        }
        if self.scanner.scan_identifier_str("odd") {
            return Ok((2, 1));
        }

        let start = self.scanner.state();
        let sign = if self.scanner.scan_char('-') {
            -1
        } else {
            self.scanner.scan_char('+');
            1
        };

        if matches!(self.scanner.peek(0), Some(c) if is_digit(c)) {
            let digits = lexer::natural_number(&mut self.scanner)?;
            let n: i32 = digits.parse().unwrap_or(0);
            if matches!(self.scanner.peek(0), Some('n' | 'N')) {
                self.scanner.read();
                return self.finish_an_plus_b(sign * n);
            }
            return Ok((0, sign * n));
        }

        if matches!(self.scanner.peek(0), Some('n' | 'N')) {
            self.scanner.read();
            return self.finish_an_plus_b(sign);
        }

        self.scanner.restore(start);
        Err(self.scanner.error("Expected \"An+B\"."))
    }

    fn finish_an_plus_b(&mut self, a: i32) -> SassResult<(i32, i32)> {
        let save = self.scanner.state();
        lexer::whitespace_with_comments(&mut self.scanner)?;
        match self.scanner.peek(0) {
            Some(sign @ ('+' | '-')) => {
                self.scanner.read();
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let digits = lexer::natural_number(&mut self.scanner)?;
                let b: i32 = digits.parse().unwrap_or(0);
                Ok((a, if sign == '-' { -b } else { b }))
            }
            _ => {
                self.scanner.restore(save);
                Ok((a, 0))
            }
        }
    }
}
