//! `@keyframes` block-selector grammar (spec.md §4.7
//! "KeyframeSelectorParser"): `from` | `to` | `<percentage>`, comma-separated.
//! A keyframe block is otherwise structurally a style rule (selector +
//! declaration block), so it reuses [`crate::ast::stmt::StyleRule`] rather
//! than a dedicated node.

use crate::error::SassResult;
use crate::interpolation::{Interpolation, InterpolationBuilder};
use crate::parse::chars::is_digit;
use crate::parse::lexer;
use crate::parse::Parser;

impl<'a> Parser<'a> {
    pub fn parse_keyframe_selector_list(&mut self) -> SassResult<Interpolation> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();
        self.parse_one_keyframe_selector(&mut builder)?;
        loop {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                builder.push_char(',');
                lexer::whitespace_with_comments(&mut self.scanner)?;
                self.parse_one_keyframe_selector(&mut builder)?;
            } else {
                break;
            }
        }
        Ok(builder.finish(self.scanner.span_from(start)))
    }

    fn parse_one_keyframe_selector(&mut self, builder: &mut InterpolationBuilder) -> SassResult<()> {
        if self.scanner.peek(0) == Some('#') && self.scanner.peek(1) == Some('{') {
            let expr = self.single_interpolation()?;
            builder.push_expr(expr);
            return Ok(());
        }

        if self.scanner.scan_identifier_str("from") {
            builder.push_str("from");
            return Ok(());
        }
        if self.scanner.scan_identifier_str("to") {
            builder.push_str("to");
            return Ok(());
        }

        let start = self.scanner.state();
        if matches!(self.scanner.peek(0), Some(c) if is_digit(c)) {
            let mut text = lexer::natural_number(&mut self.scanner)?;
            if let Some(dec) = lexer::try_decimal(&mut self.scanner) {
                text.push_str(&dec);
            }
            self.scanner.expect_char('%')?;
            text.push('%');
            builder.push_str(&text);
            return Ok(());
        }

        self.scanner.restore(start);
        Err(self.scanner.error("Expected \"from\", \"to\", or a percentage."))
    }
}
