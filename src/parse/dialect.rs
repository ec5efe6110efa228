//! The three surface syntaxes (spec.md §4.6, C6): SCSS, the indented
//! syntax, and plain CSS. Modeled as an enum on [`Parser`] rather than
//! three subclasses -- see DESIGN.md "Open Questions" for why.

use crate::ast::stmt::{LoudComment, SilentComment};
use crate::error::SassResult;
use crate::interpolation::{Interpolation, InterpolationBuilder};
use crate::parse::lexer;
use crate::parse::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Scss,
    Indented,
    PlainCss,
}

/// At-rules plain CSS recognizes; anything else is a Sass extension and
/// plain-CSS mode has no generic at-rule fallback for it (spec.md §4.6
/// "PlainCSS additionally forbids...").
pub const PLAIN_CSS_ALLOWED_AT_RULES: &[&str] = &[
    "charset",
    "import",
    "media",
    "supports",
    "keyframes",
    "-webkit-keyframes",
    "-moz-keyframes",
    "-o-keyframes",
    "font-face",
    "page",
    "namespace",
    "document",
    "-moz-document",
    "viewport",
    "counter-style",
    "font-feature-values",
    "property",
    "layer",
    "container",
    "scope",
];

impl<'a> Parser<'a> {
    /// The raw (not-yet-grammar-parsed) selector text between a style
    /// rule's head and its block: stops at `{` in every dialect, and
    /// additionally at a bare newline in the indented dialect.
    pub fn style_rule_selector(&mut self) -> SassResult<Interpolation> {
        self.almost_any_value(false)
    }

    /// `;` (or a lookahead `}`/EOF) in SCSS/plain CSS; a bare newline (or
    /// EOF) in the indented dialect (spec.md §4.6).
    pub fn expect_statement_separator(&mut self) -> SassResult<()> {
        if self.indented() {
            return if self.at_end_of_statement() {
                Ok(())
            } else {
                Err(self.scanner.error("expected newline."))
            };
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        if self.scanner.is_done() || self.scanner.peek(0) == Some('}') {
            return Ok(());
        }
        self.scanner.expect_char(';')?;
        Ok(())
    }

    pub fn at_end_of_statement(&self) -> bool {
        matches!(self.scanner.peek(0), None | Some('\n') | Some(';') | Some('}'))
    }

    /// Whether the statement just parsed has a child block to descend
    /// into: an explicit `{` in SCSS/plain CSS, or (in the indented
    /// dialect) a following line indented deeper than the current one.
    pub fn looking_at_children(&mut self) -> bool {
        if !self.indented() {
            let save = self.scanner.state();
            let _ = lexer::whitespace_with_comments(&mut self.scanner);
            let found = self.scanner.peek(0) == Some('{');
            self.scanner.restore(save);
            return found;
        }

        match self.peek_next_line_indentation() {
            Some(indent) => indent > self.current_indentation,
            None => false,
        }
    }

    /// Looks past the rest of the current line (without consuming it),
    /// skipping blank lines, and returns the indentation column of the
    /// next non-blank line, or `None` at end of input.
    fn peek_next_line_indentation(&self) -> Option<usize> {
        let mut offset = 0usize;
        while matches!(self.scanner.peek(offset), Some(c) if c != '\n') {
            offset += 1;
        }
        self.scanner.peek(offset)?;
        offset += 1; // past the newline

        loop {
            let mut probe = offset;
            let mut count = 0usize;
            while matches!(self.scanner.peek(probe), Some(' ') | Some('\t')) {
                probe += 1;
                count += 1;
            }
            match self.scanner.peek(probe) {
                Some('\n') => {
                    offset = probe + 1;
                    continue;
                }
                None => return None,
                _ => return Some(count),
            }
        }
    }

    /// Parses the children of a block: `{ ... }` in SCSS/plain CSS, or an
    /// indentation-delimited run of lines in the indented dialect
    /// (spec.md §4.6). `child` returns `None` for a statement that
    /// produced nothing (e.g. a stray `;`), and is responsible for
    /// consuming its own trailing separator (a block-bodied statement
    /// needs none; `children()` itself has no way to tell the two apart).
    pub fn children<T>(
        &mut self,
        mut child: impl FnMut(&mut Self) -> SassResult<Option<T>>,
    ) -> SassResult<Vec<T>> {
        if self.indented() {
            self.indented_children(&mut child)
        } else {
            self.braced_children(&mut child)
        }
    }

    fn braced_children<T>(
        &mut self,
        child: &mut impl FnMut(&mut Self) -> SassResult<Option<T>>,
    ) -> SassResult<Vec<T>> {
        self.scanner.expect_char('{')?;
        let mut out = Vec::new();
        loop {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            match self.scanner.peek(0) {
                Some('}') => {
                    self.scanner.read();
                    break;
                }
                Some(';') => {
                    self.scanner.read();
                    continue;
                }
                None => return Err(self.scanner.error("expected \"}\".")),
                _ => {
                    if let Some(item) = child(self)? {
                        out.push(item);
                    }
                }
            }
        }
        Ok(out)
    }

    fn indented_children<T>(
        &mut self,
        child: &mut impl FnMut(&mut Self) -> SassResult<Option<T>>,
    ) -> SassResult<Vec<T>> {
        let parent_indentation = self.current_indentation;
        let mut out = Vec::new();
        let mut child_indentation: Option<usize> = None;

        loop {
            self.skip_to_next_nonblank_line();
            if self.scanner.is_done() {
                break;
            }

            let line_start = self.scanner.state();
            let indent = self.measure_indentation()?;

            match child_indentation {
                None => {
                    if indent <= parent_indentation {
                        self.scanner.restore(line_start);
                        break;
                    }
                    child_indentation = Some(indent);
                }
                Some(expected) => {
                    if indent < expected {
                        self.scanner.restore(line_start);
                        break;
                    }
                    if indent > expected {
                        return Err(self
                            .scanner
                            .error("Inconsistent indentation: expected a statement at this indentation."));
                    }
                }
            }

            let saved_indentation = self.current_indentation;
            self.current_indentation = child_indentation.unwrap();
            let result = child(self);
            self.current_indentation = saved_indentation;
            if let Some(item) = result? {
                out.push(item);
            }
        }

        Ok(out)
    }

    /// Advances past the current line's trailing newline and any further
    /// all-whitespace lines, leaving the scanner at the start of the next
    /// line with content (or at EOF).
    fn skip_to_next_nonblank_line(&mut self) {
        loop {
            match self.scanner.peek(0) {
                Some('\n') => {
                    self.scanner.read();
                }
                None => return,
                _ => return,
            }
            let mut probe = 0usize;
            while matches!(self.scanner.peek(probe), Some(' ') | Some('\t')) {
                probe += 1;
            }
            if matches!(self.scanner.peek(probe), Some('\n') | None) {
                for _ in 0..probe {
                    self.scanner.read();
                }
                if self.scanner.peek(0).is_none() {
                    return;
                }
                continue;
            }
            return;
        }
    }

    fn measure_indentation(&mut self) -> SassResult<usize> {
        let mut count = 0usize;
        loop {
            match self.scanner.peek(0) {
                Some(c @ (' ' | '\t')) => {
                    self.check_indent_char(c)?;
                    self.scanner.read();
                    count += 1;
                }
                _ => break,
            }
        }
        Ok(count)
    }

    fn check_indent_char(&mut self, c: char) -> SassResult<()> {
        match self.indent_char {
            None => {
                self.indent_char = Some(c);
                Ok(())
            }
            Some(existing) if existing == c => Ok(()),
            Some(_) => Err(self
                .scanner
                .error("Inconsistent indentation: mixing tabs and spaces.")),
        }
    }

    /// Looks for an `@else`/`@elseif` continuing the `@if` whose body was
    /// at `if_indentation`; in SCSS/plain CSS this just skips whitespace
    /// and comments between the closing `}` and the keyword, but in the
    /// indented dialect it must start a line at exactly the same
    /// indentation (spec.md §4.6, "REDESIGN FLAGS" -- `@elseif` note).
    /// Returns `None` if neither keyword was found, `Some(true)` for the
    /// compact (deprecated) `@elseif` spelling, `Some(false)` for `@else`.
    pub fn scan_else(&mut self, if_indentation: usize) -> Option<bool> {
        if !self.indented() {
            let save = self.scanner.state();
            let _ = lexer::whitespace_with_comments(&mut self.scanner);
            if self.scanner.scan_identifier_str("@elseif") {
                return Some(true);
            }
            if self.scanner.scan_identifier_str("@else") {
                return Some(false);
            }
            self.scanner.restore(save);
            return None;
        }

        let save = self.scanner.state();
        self.skip_to_next_nonblank_line();
        if self.scanner.is_done() {
            self.scanner.restore(save);
            return None;
        }
        let indent = match self.measure_indentation() {
            Ok(i) => i,
            Err(_) => {
                self.scanner.restore(save);
                return None;
            }
        };
        if indent == if_indentation {
            if self.scanner.scan_identifier_str("@elseif") {
                return Some(true);
            }
            if self.scanner.scan_identifier_str("@else") {
                return Some(false);
            }
        }
        self.scanner.restore(save);
        None
    }

    /// `// ...` -- in the indented dialect, immediately-following lines at
    /// the same indentation that also start with `//` are folded into one
    /// logical comment (spec.md §4.6).
    pub fn silent_comment(&mut self) -> SassResult<SilentComment> {
        let start = self.scanner.state();
        let mut text = lexer::raw_silent_comment_text(&mut self.scanner);

        if self.indented() {
            loop {
                let save = self.scanner.state();
                self.skip_to_next_nonblank_line();
                if self.scanner.is_done() {
                    self.scanner.restore(save);
                    break;
                }
                let indent = match self.measure_indentation() {
                    Ok(i) => i,
                    Err(_) => {
                        self.scanner.restore(save);
                        break;
                    }
                };
                if indent == self.current_indentation
                    && self.scanner.peek(0) == Some('/')
                    && self.scanner.peek(1) == Some('/')
                {
                    text.push('\n');
                    text.push_str(&lexer::raw_silent_comment_text(&mut self.scanner));
                } else {
                    self.scanner.restore(save);
                    break;
                }
            }
        }

        Ok(SilentComment {
            span: self.scanner.span_from(start),
            text,
        })
    }

    /// `/* ... */`, interpolation-aware.
    pub fn loud_comment(&mut self) -> SassResult<LoudComment> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();
        self.scanner.expect_char('/')?;
        self.scanner.expect_char('*')?;
        builder.push_str("/*");
        loop {
            match self.scanner.peek(0) {
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some('*') if self.scanner.peek(1) == Some('/') => {
                    self.scanner.read();
                    self.scanner.read();
                    builder.push_str("*/");
                    break;
                }
                Some(c) => {
                    self.scanner.read();
                    builder.push_char(c);
                }
                None => return Err(self.scanner.error("expected more input.")),
            }
        }
        let span = self.scanner.span_from(start);
        Ok(LoudComment {
            span,
            text: builder.finish(span),
        })
    }

    /// Plain CSS only recognizes a fixed at-rule vocabulary and has no
    /// generic `@unknown` fallback (spec.md §4.6).
    pub fn check_plain_css_at_rule(&self, name: &str, span: codemap::Span) -> SassResult<()> {
        if self.plain_css() && !PLAIN_CSS_ALLOWED_AT_RULES.contains(&name) {
            Err(crate::error::SassError::new(
                format!("This at-rule isn't allowed in plain CSS: @{}", name),
                span,
            ))
        } else {
            Ok(())
        }
    }
}
