//! `@media` query-list grammar (spec.md §4.7 "MediaQueryParser").

use crate::ast::media::{CssMediaQuery, MediaQueryKind};
use crate::error::SassResult;
use crate::parse::lexer;
use crate::parse::Parser;

impl<'a> Parser<'a> {
    /// `MediaQuery (',' MediaQuery)*`.
    pub fn parse_media_query_list(&mut self) -> SassResult<Vec<CssMediaQuery>> {
        let mut queries = vec![self.parse_media_query()?];
        loop {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                queries.push(self.parse_media_query()?);
            } else {
                break;
            }
        }
        Ok(queries)
    }

    /// `[not|only] <media-type> ('and' <in-parens>)*` or
    /// `<in-parens> (('and'|'or') <in-parens>)*` (spec.md §4.7).
    fn parse_media_query(&mut self) -> SassResult<CssMediaQuery> {
        let start = self.scanner.state();

        if self.scanner.peek(0) == Some('(') {
            let mut conditions = vec![self.parse_media_in_parens()?];
            let mut conjunction = true;
            let mut seen_or = false;
            loop {
                let save = self.scanner.state();
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.scan_identifier_str("and") {
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    conditions.push(self.parse_media_in_parens()?);
                } else if self.scanner.scan_identifier_str("or") {
                    conjunction = false;
                    seen_or = true;
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    conditions.push(self.parse_media_in_parens()?);
                } else {
                    self.scanner.restore(save);
                    break;
                }
            }
            let _ = seen_or;
            return Ok(CssMediaQuery {
                span: self.scanner.span_from(start),
                kind: MediaQueryKind::Condition {
                    conjunction,
                    conditions,
                },
            });
        }

        let modifier = if self.scanner.scan_identifier_str("not") {
            Some("not".to_string())
        } else if self.scanner.scan_identifier_str("only") {
            Some("only".to_string())
        } else {
            None
        };
        if modifier.is_some() {
            lexer::whitespace_with_comments(&mut self.scanner)?;
        }

        let media_type = self.parse_media_identifier()?;
        let mut conditions = Vec::new();
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_identifier_str("and") {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                conditions.push(self.parse_media_in_parens()?);
            } else {
                self.scanner.restore(save);
                break;
            }
        }

        Ok(CssMediaQuery {
            span: self.scanner.span_from(start),
            kind: MediaQueryKind::TypeAndConditions {
                modifier,
                media_type,
                conditions,
            },
        })
    }

    fn parse_media_identifier(&mut self) -> SassResult<String> {
        match self.interpolated_identifier()?.as_plain() {
            Some(plain) => Ok(plain),
            None => Err(self.scanner.error("Expected media type.")),
        }
    }

    /// `'(' <feature-or-nested-condition> ')'`, captured as raw text since
    /// feature evaluation is out of scope here; `#{...}` holes inside are
    /// still resolved to keep spans accurate, then re-flattened to text
    /// because `CssMediaQuery` stores conditions as plain strings.
    fn parse_media_in_parens(&mut self) -> SassResult<String> {
        self.scanner.expect_char('(')?;
        let mut text = String::from("(");
        let mut depth = 1i32;
        loop {
            match self.scanner.peek(0) {
                Some('(') => {
                    depth += 1;
                    self.scanner.read();
                    text.push('(');
                }
                Some(')') => {
                    depth -= 1;
                    self.scanner.read();
                    text.push(')');
                    if depth == 0 {
                        return Ok(text);
                    }
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let start = self.scanner.state();
                    let _ = self.single_interpolation()?;
                    text.push_str(&self.scanner.text_from(start));
                }
                None => return Err(self.scanner.error("expected \")\".")),
                Some(c) => {
                    self.scanner.read();
                    text.push(c);
                }
            }
        }
    }
}
