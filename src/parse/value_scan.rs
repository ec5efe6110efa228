//! Interpolation-aware identifier/value scanning (spec.md §4.3, C3).

use crate::error::SassResult;
use crate::interpolation::{Interpolation, InterpolationBuilder};
use crate::parse::chars::{is_digit, is_name_char, is_name_start, is_whitespace};
use crate::parse::lexer;
use crate::parse::Parser;

/// Flags for `interpolated_declaration_value` (spec.md §4.3).
#[derive(Debug, Clone, Copy)]
pub struct DeclarationValueFlags {
    pub allow_empty: bool,
    pub allow_semicolon: bool,
    pub allow_colon: bool,
    pub allow_open_brace: bool,
    pub silent_comments: bool,
}

impl Default for DeclarationValueFlags {
    fn default() -> Self {
        DeclarationValueFlags {
            allow_empty: false,
            allow_semicolon: false,
            allow_colon: true,
            allow_open_brace: true,
            silent_comments: true,
        }
    }
}

impl<'a> Parser<'a> {
    /// Like `identifier`, but each `#{...}` opens a Sass expression.
    pub fn interpolated_identifier(&mut self) -> SassResult<Interpolation> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();

        if self.scanner.scan_char('-') {
            builder.push_char('-');
            if self.scanner.scan_char('-') {
                builder.push_char('-');
            }
        }

        self.interpolated_identifier_body(&mut builder)?;

        if builder.is_empty() {
            return Err(self.scanner.error("Expected identifier."));
        }

        Ok(builder.finish(self.scanner.span_from(start)))
    }

    fn interpolated_identifier_body(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        loop {
            match self.scanner.peek(0) {
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some('\\') => {
                    builder.push_str(&lexer::escape(&mut self.scanner, false)?);
                }
                Some(c) if is_name_char(c) => {
                    self.scanner.read();
                    builder.push_char(c);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// `#{ expression }`. Fails in plain-CSS mode.
    pub fn single_interpolation(&mut self) -> SassResult<crate::ast::Expression> {
        let start = self.scanner.state();
        self.forbid_in_plain_css("Interpolation", self.scanner.empty_span())?;
        self.scanner.expect_char('#')?;
        self.scanner.expect_char('{')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let expr = self.parse_expression_full(None, false, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char('}').map_err(|_| {
            self.scanner
                .error_at("expected \"}\".", start)
        })?;
        Ok(expr)
    }

    /// Dialect-aware value tokenizer for places raw CSS and SassScript mix.
    pub fn interpolated_declaration_value(
        &mut self,
        flags: DeclarationValueFlags,
    ) -> SassResult<Interpolation> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();
        let mut brackets: Vec<char> = Vec::new();
        let mut wrote_newline = false;

        loop {
            match self.scanner.peek(0) {
                None => break,
                Some('\\') => {
                    wrote_newline = false;
                    builder.push_str(&lexer::escape(&mut self.scanner, false)?);
                }
                Some(c @ ('"' | '\'')) => {
                    wrote_newline = false;
                    let _ = c;
                    let text = self.interpolated_string_raw()?;
                    builder.push_str(&text);
                }
                Some('/') if self.scanner.peek(1) == Some('/') && flags.silent_comments => {
                    break;
                }
                Some('/') if self.scanner.peek(1) == Some('*') => {
                    wrote_newline = false;
                    let text = lexer::raw_loud_comment_text(&mut self.scanner)?;
                    builder.push_str(&text);
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    wrote_newline = false;
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some(c) if c == 'u' || c == 'U' => {
                    if let Some(url) = lexer::try_url(&mut self.scanner)? {
                        wrote_newline = false;
                        builder.push_str("url(");
                        builder.push_str(&url);
                        builder.push_char(')');
                    } else {
                        wrote_newline = false;
                        self.scanner.read();
                        builder.push_char(c);
                    }
                }
                Some(c @ ('(' | '[' | '{')) => {
                    wrote_newline = false;
                    self.scanner.read();
                    builder.push_char(c);
                    brackets.push(match c {
                        '(' => ')',
                        '[' => ']',
                        '{' => '}',
                        _ => unreachable!(),
                    });
                }
                Some(')') | Some(']') => {
                    let c = self.scanner.peek(0).unwrap();
                    match brackets.last() {
                        Some(expected) if *expected == c => {
                            brackets.pop();
                            wrote_newline = false;
                            self.scanner.read();
                            builder.push_char(c);
                        }
                        _ => break,
                    }
                }
                Some('}') => {
                    if brackets.last() == Some(&'}') {
                        brackets.pop();
                        wrote_newline = false;
                        self.scanner.read();
                        builder.push_char('}');
                    } else {
                        break;
                    }
                }
                Some('{') if !flags.allow_open_brace && brackets.is_empty() => break,
                Some(';') if brackets.is_empty() && !flags.allow_semicolon => break,
                Some(':') if brackets.is_empty() && !flags.allow_colon => break,
                Some(c) if is_whitespace(c) => {
                    let had_newline = self.consume_whitespace_run();
                    if had_newline {
                        if !wrote_newline {
                            builder.push_char('\n');
                        }
                        wrote_newline = true;
                    } else {
                        builder.push_char(' ');
                    }
                }
                Some(c) => {
                    wrote_newline = false;
                    self.scanner.read();
                    builder.push_char(c);
                }
            }
        }

        if !brackets.is_empty() {
            return Err(self.scanner.error("expected more input."));
        }

        if builder.is_empty() && !flags.allow_empty {
            return Err(self.scanner.error("Expected token."));
        }

        Ok(builder.finish(self.scanner.span_from(start)))
    }

    fn consume_whitespace_run(&mut self) -> bool {
        let mut had_newline = false;
        while let Some(c) = self.scanner.peek(0) {
            if c == '\n' {
                had_newline = true;
                self.scanner.read();
            } else if is_whitespace(c) {
                self.scanner.read();
            } else {
                break;
            }
        }
        had_newline
    }

    /// A quoted string that may itself contain `#{...}` holes, returned as
    /// plain concatenated text (used inside `interpolated_declaration_value`,
    /// which only needs the literal characters, not the interpolation
    /// structure).
    fn interpolated_string_raw(&mut self) -> SassResult<String> {
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
                    text.push('\\');
                    self.scanner.read();
                    if let Some(next) = self.scanner.read() {
                        text.push(next);
                    }
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let start = self.scanner.state();
                    let _ = self.single_interpolation()?;
                    text.push_str(&self.scanner.text_from(start));
                }
                Some(c) => {
                    text.push(c);
                    self.scanner.read();
                }
            }
        }
    }

    /// A re-parsable raw token tokenizer used for selectors and unknown
    /// at-rule payloads. Stops at `;`, `{`, `}`, `!`, or (in the indented
    /// dialect) a newline. Does not balance brackets or interpret
    /// backslashes; may preserve or omit comment text.
    pub fn almost_any_value(&mut self, omit_comments: bool) -> SassResult<Interpolation> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();

        loop {
            match self.scanner.peek(0) {
                None => break,
                Some('\\') => {
                    self.scanner.read();
                    builder.push_char('\\');
                    if let Some(c) = self.scanner.read() {
                        builder.push_char(c);
                    }
                }
                Some(c @ ('"' | '\'')) => {
                    let _ = c;
                    let text = self.interpolated_string_raw()?;
                    builder.push_str(&text);
                }
                Some('/') if self.scanner.peek(1) == Some('*') => {
                    let text = lexer::raw_loud_comment_text(&mut self.scanner)?;
                    if !omit_comments {
                        builder.push_str(&text);
                    }
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some(';') | Some('{') | Some('}') | Some('!') => break,
                Some('\n') if self.indented() => break,
                Some(c) => {
                    self.scanner.read();
                    builder.push_char(c);
                }
            }
        }

        Ok(builder.finish(self.scanner.span_from(start)))
    }

    /// `natural_number`/unit-aware identifier helper used when a caller
    /// only wants to peek whether a number follows, reused by the
    /// expression parser's single-expression dispatch (spec.md §4.4).
    pub fn looking_at_interpolated_identifier(&self) -> bool {
        if self.scanner.peek(0) == Some('#') && self.scanner.peek(1) == Some('{') {
            return true;
        }
        lexer::looking_at_identifier(&self.scanner)
    }

    pub fn looking_at_number_lookahead(&self) -> bool {
        lexer::looking_at_number(&self.scanner)
    }

    pub fn is_name_start_here(&self) -> bool {
        matches!(self.scanner.peek(0), Some(c) if is_name_start(c))
    }

    pub fn is_digit_here(&self) -> bool {
        matches!(self.scanner.peek(0), Some(c) if is_digit(c))
    }
}
