//! `@at-root`'s optional `(with: ...)` / `(without: ...)` query (spec.md
//! §4.7 "AtRootQueryParser").

use crate::ast::stmt::AtRootQuery;
use crate::error::SassResult;
use crate::parse::lexer;
use crate::parse::Parser;

impl<'a> Parser<'a> {
    /// `'(' ('with' | 'without') ':' <ident-list> ')'`.
    pub fn parse_at_root_query(&mut self) -> SassResult<AtRootQuery> {
        let start = self.scanner.state();
        self.scanner.expect_char('(')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;

        let without = if self.scanner.scan_identifier_str("with") {
            false
        } else if self.scanner.scan_identifier_str("without") {
            true
        } else {
            return Err(self.scanner.error("Expected \"with\" or \"without\"."));
        };

        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(':')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;

        let mut names = vec![lexer::identifier(&mut self.scanner, true, false)?];
        loop {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.is_done() || self.scanner.peek(0) == Some(')') {
                break;
            }
            names.push(lexer::identifier(&mut self.scanner, true, false)?);
        }

        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(')')?;

        Ok(AtRootQuery {
            span: self.scanner.span_from(start),
            without,
            names,
        })
    }
}
