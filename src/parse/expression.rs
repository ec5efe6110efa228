//! SassScript expression parsing (spec.md §4.4, C4): operator-precedence
//! climbing with the slash-as-separator heuristic, calculations, colors,
//! maps, lists, function calls, unary operators, and unicode ranges.

use crate::ast::args::ArgumentInvocation;
use crate::ast::expr::*;
use crate::error::SassResult;
use crate::interpolation::{Interpolation, InterpolationBuilder};
use crate::logger::DeprecationKind;
use crate::parse::chars::{is_digit, is_hex_digit, is_name_char};
use crate::parse::lexer;
use crate::parse::scanner::ScannerState;
use crate::parse::Parser;

/// A caller-supplied lookahead predicate that stops expression parsing
/// early, used by `@for ... to ... through ...` (spec.md §4.4 "Entry
/// point").
pub type UntilPredicate = fn(&Parser) -> bool;

/// Matches `to`/`through` without consuming, so `@for` can parse its
/// bound expression without swallowing the keyword that ends it.
pub fn until_to_or_through(parser: &Parser) -> bool {
    peeks_keyword(parser, "to") || peeks_keyword(parser, "through")
}

fn peeks_keyword(parser: &Parser, word: &str) -> bool {
    for (i, c) in word.chars().enumerate() {
        match parser.scanner.peek(i) {
            Some(found) if found.eq_ignore_ascii_case(&c) => {}
            _ => return false,
        }
    }
    !matches!(parser.scanner.peek(word.chars().count()), Some(c) if is_name_char(c))
}

impl<'a> Parser<'a> {
    /// `expression(options)` (spec.md §4.4). `bracket_list` parses a
    /// `[...]`-delimited list instead of a bare comma list; `single_equals`
    /// allows Microsoft-style `=`; `until` lets the caller stop early.
    pub fn parse_expression_full(
        &mut self,
        until: Option<UntilPredicate>,
        bracket_list: bool,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();

        if bracket_list {
            self.scanner.expect_char('[')?;
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.peek(0) == Some(']') {
                self.scanner.read();
                return Ok(Expression::List(ListExpression {
                    span: self.scanner.span_from(start),
                    items: Vec::new(),
                    separator: ListSeparator::Undecided,
                    bracketed: true,
                }));
            }
        }

        let mut comma_items = Vec::new();
        loop {
            let item = self.parse_space_list(until, single_equals)?;
            comma_items.push(item);
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.at_until(until) {
                break;
            }
            if self.scanner.peek(0) == Some(',') {
                self.scanner.read();
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.at_until(until) || self.scanner.is_done() {
                    break;
                }
                if bracket_list && self.scanner.peek(0) == Some(']') {
                    break;
                }
                continue;
            }
            break;
        }

        if bracket_list {
            self.scanner.expect_char(']')?;
            let separator = if comma_items.len() > 1 {
                ListSeparator::Comma
            } else {
                ListSeparator::Undecided
            };
            return Ok(Expression::List(ListExpression {
                span: self.scanner.span_from(start),
                items: comma_items,
                separator,
                bracketed: true,
            }));
        }

        if comma_items.len() == 1 {
            Ok(comma_items.pop().unwrap())
        } else {
            Ok(Expression::List(ListExpression {
                span: self.scanner.span_from(start),
                items: comma_items,
                separator: ListSeparator::Comma,
                bracketed: false,
            }))
        }
    }

    fn at_until(&self, until: Option<UntilPredicate>) -> bool {
        until.map_or(false, |pred| pred(self))
    }

    /// Stops before `{` too, not just the closing brackets/separators --
    /// otherwise a value immediately followed by a nested-declaration
    /// block (`font: 12px { family: Arial; }`) or a style rule's own
    /// block would be swallowed as a malformed extra operand.
    fn can_start_operand(&self) -> bool {
        match self.scanner.peek(0) {
            None => false,
            Some(c) if matches!(c, ',' | ')' | ']' | '}' | ';' | '{') => false,
            _ => true,
        }
    }

    fn parse_space_list(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut items = vec![self.parse_single_equals_or(until, single_equals)?];

        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.at_until(until) || self.scanner.peek(0) == Some(',') || !self.can_start_operand()
            {
                self.scanner.restore(save);
                break;
            }
            items.push(self.parse_single_equals_or(until, single_equals)?);
        }

        if items.len() == 1 {
            Ok(items.pop().unwrap())
        } else {
            Ok(Expression::List(ListExpression {
                span: self.scanner.span_from(start),
                items,
                separator: ListSeparator::Space,
                bracketed: false,
            }))
        }
    }

    fn parse_single_equals_or(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let left = self.parse_or(until, single_equals)?;
        if single_equals {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.peek(0) == Some('=') && self.scanner.peek(1) != Some('=') {
                self.scanner.read();
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let right = self.parse_or(until, single_equals)?;
                return Ok(Expression::BinaryOp(BinaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: BinaryOp::SingleEq,
                    left: Box::new(left),
                    right: Box::new(right),
                    allows_slash: false,
                }));
            }
            self.scanner.restore(save);
        }
        Ok(left)
    }

    fn parse_or(&mut self, until: Option<UntilPredicate>, single_equals: bool) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_and(until, single_equals)?;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_identifier_str("or") {
                self.forbid_in_plain_css("\"or\" expressions", self.scanner.empty_span())?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let right = self.parse_and(until, single_equals)?;
                left = Expression::BinaryOp(BinaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: BinaryOp::Or,
                    left: Box::new(left),
                    right: Box::new(right),
                    allows_slash: false,
                });
            } else {
                self.scanner.restore(save);
                break;
            }
        }
        Ok(left)
    }

    fn parse_and(&mut self, until: Option<UntilPredicate>, single_equals: bool) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_equality(until, single_equals)?;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_identifier_str("and") {
                self.forbid_in_plain_css("\"and\" expressions", self.scanner.empty_span())?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let right = self.parse_equality(until, single_equals)?;
                left = Expression::BinaryOp(BinaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: BinaryOp::And,
                    left: Box::new(left),
                    right: Box::new(right),
                    allows_slash: false,
                });
            } else {
                self.scanner.restore(save);
                break;
            }
        }
        Ok(left)
    }

    fn parse_equality(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_relational(until, single_equals)?;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let op = if self.scanner.scan_str("==") {
                Some(BinaryOp::Eq)
            } else if self.scanner.scan_str("!=") {
                Some(BinaryOp::Neq)
            } else {
                None
            };
            match op {
                Some(op) => {
                    self.forbid_in_plain_css("\"==\"/\"!=\" expressions", self.scanner.empty_span())?;
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_relational(until, single_equals)?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                None => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(left)
    }

    fn parse_relational(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_additive(until, single_equals)?;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let op = if self.scanner.scan_str("<=") {
                Some(BinaryOp::Le)
            } else if self.scanner.scan_str(">=") {
                Some(BinaryOp::Ge)
            } else if self.scanner.peek(0) == Some('<') {
                self.scanner.read();
                Some(BinaryOp::Lt)
            } else if self.scanner.peek(0) == Some('>') {
                self.scanner.read();
                Some(BinaryOp::Gt)
            } else {
                None
            };
            match op {
                Some(op) => {
                    self.forbid_in_plain_css(
                        "\"<\"/\">\"/\"<=\"/\">=\" expressions",
                        self.scanner.empty_span(),
                    )?;
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_additive(until, single_equals)?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                None => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(left)
    }

    /// Handles the unary-minus / binary-minus ambiguity (spec.md §4.4,
    /// §8 scenario 6): whitespace before `-` with none after, followed by
    /// what looks like the start of an operand, means the `-` belongs to
    /// a *new* space-list item, not this binary chain.
    fn parse_additive(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_multiplicative(until, single_equals)?;
        loop {
            let before_ws = self.scanner.state();
            let had_space_before = lexer::whitespace_with_comments(&mut self.scanner)?;
            match self.scanner.peek(0) {
                Some('+') => {
                    self.scanner.read();
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_multiplicative(until, single_equals)?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Add,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                Some('-') => {
                    self.scanner.read();
                    let tight_operand_follows = matches!(self.scanner.peek(0), Some(c) if is_digit(c) || c == '.');
                    if had_space_before && tight_operand_follows {
                        self.logger.warn_for_deprecation(
                            DeprecationKind::StrictUnary,
                            "This operation is parsed as a space-separated list of a number and a \
                             unary minus, rather than subtraction. Add whitespace before and after \
                             \"-\" to resolve the ambiguity.",
                            self.scanner.span_from(before_ws),
                        );
                        self.scanner.restore(before_ws);
                        break;
                    }
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_multiplicative(until, single_equals)?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Sub,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                _ => {
                    self.scanner.restore(before_ws);
                    break;
                }
            }
        }
        Ok(left)
    }

    /// Handles the slash-as-separator heuristic (spec.md §4.4, §8 scenario
    /// 1): a bare `/` between two numeric operands outside parentheses is
    /// recorded as division with `allows_slash = true`.
    fn parse_multiplicative(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_unary(until, single_equals)?;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            match self.scanner.peek(0) {
                Some('*') => {
                    self.scanner.read();
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_unary(until, single_equals)?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Mul,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                Some('/') => {
                    self.scanner.read();
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_unary(until, single_equals)?;
                    let allows_slash = !self.flags.in_parentheses
                        && left.allows_slash_operand()
                        && right.allows_slash_operand();
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Div,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash,
                    });
                }
                Some('%') => {
                    self.forbid_in_plain_css("\"%\" expressions", self.scanner.empty_span())?;
                    self.scanner.read();
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_unary(until, single_equals)?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Rem,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                _ => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self, until: Option<UntilPredicate>, single_equals: bool) -> SassResult<Expression> {
        let start = self.scanner.state();
        match self.scanner.peek(0) {
            Some('+') => {
                self.scanner.read();
                let operand = self.parse_unary(until, single_equals)?;
                Ok(Expression::UnaryOp(UnaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: UnaryOp::Plus,
                    operand: Box::new(operand),
                }))
            }
            Some('-') => {
                self.scanner.read();
                let operand = self.parse_unary(until, single_equals)?;
                Ok(Expression::UnaryOp(UnaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: UnaryOp::Minus,
                    operand: Box::new(operand),
                }))
            }
            Some('/') => {
                self.scanner.read();
                let operand = self.parse_unary(until, single_equals)?;
                Ok(Expression::UnaryOp(UnaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: UnaryOp::Div,
                    operand: Box::new(operand),
                }))
            }
            _ if self.scanner.scan_identifier_str("not") => {
                self.forbid_in_plain_css("\"not\" expressions", self.scanner.empty_span())?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let operand = self.parse_unary(until, single_equals)?;
                Ok(Expression::UnaryOp(UnaryOperationExpression {
                    span: self.scanner.span_from(start),
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                }))
            }
            _ => self.parse_single_expression(until, single_equals),
        }
    }

    fn parse_single_expression(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        match self.scanner.peek(0) {
            Some('(') => self.parse_parenthesized(),
            Some('[') => self.parse_expression_full(until, true, single_equals),
            Some('$') => self.parse_variable_literal(),
            Some('&') => {
                let start = self.scanner.state();
                self.forbid_in_plain_css("The parent selector \"&\"", self.scanner.empty_span())?;
                self.scanner.read();
                Ok(Expression::Selector(SelectorExpression {
                    span: self.scanner.span_from(start),
                }))
            }
            Some('"') | Some('\'') => self.parse_quoted_string_expr(),
            Some('#') if self.scanner.peek(1) == Some('{') => self.single_interpolation(),
            Some('#') => self.parse_hash_expr(),
            Some(c) if is_digit(c) => self.parse_number(),
            Some('.') if matches!(self.scanner.peek(1), Some(c) if is_digit(c)) => self.parse_number(),
            Some('U') | Some('u') if self.looking_at_unicode_range() => self.parse_unicode_range(),
            Some('U') | Some('u') => self.parse_url_or_function(until, single_equals),
            _ if lexer::looking_at_identifier(&self.scanner) => {
                self.parse_identifier_like(until, single_equals)
            }
            _ => Err(self.scanner.error("Expected expression.")),
        }
    }

    /// Backtracking point 4 and the "maps vs. lists" rule (spec.md §4.4,
    /// §9): re-parses without the parenthesis context (undoing suppressed
    /// `allows_slash`) when the contents turn out to be a list rather than
    /// a genuine arithmetic grouping.
    fn parse_parenthesized(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        self.scanner.expect_char('(')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;

        if self.scanner.peek(0) == Some(')') {
            self.scanner.read();
            return Ok(Expression::List(ListExpression {
                span: self.scanner.span_from(start),
                items: Vec::new(),
                separator: ListSeparator::Undecided,
                bracketed: false,
            }));
        }

        if let Some(map) = self.try_parse_map(start)? {
            return Ok(map);
        }

        let after_open = self.scanner.state();
        let suppressed = self.parse_paren_body()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(')')?;

        if matches!(suppressed, Expression::List(_)) {
            self.scanner.restore(after_open);
            let unsuppressed = with_flag_off_in_parentheses(self, |p| p.parse_paren_body())?;
            lexer::whitespace_with_comments(&mut self.scanner)?;
            self.scanner.expect_char(')')?;
            Ok(unsuppressed)
        } else {
            let span = self.scanner.span_from(start);
            Ok(Expression::Parenthesized(ParenthesizedExpression {
                span,
                inner: Box::new(suppressed),
            }))
        }
    }

    fn parse_paren_body(&mut self) -> SassResult<Expression> {
        crate::with_flag!(self, in_parentheses, true, {
            let start = self.scanner.state();
            let mut items = vec![self.parse_space_list(None, false)?];
            loop {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.peek(0) == Some(',') {
                    self.scanner.read();
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    if self.scanner.peek(0) == Some(')') {
                        break;
                    }
                    items.push(self.parse_space_list(None, false)?);
                } else {
                    break;
                }
            }
            if items.len() == 1 {
                Ok(items.pop().unwrap())
            } else {
                Ok(Expression::List(ListExpression {
                    span: self.scanner.span_from(start),
                    items,
                    separator: ListSeparator::Comma,
                    bracketed: false,
                }))
            }
        })
    }

    /// `(a: b, c: d)` is a map; distinguished from a list by the first
    /// `:` seen at the top level of the parenthesized contents (spec.md
    /// §4.4 "Maps vs. lists").
    fn try_parse_map(&mut self, open_start: ScannerState) -> SassResult<Option<Expression>> {
        let save = self.scanner.state();
        let first_key = match self.parse_space_list(None, false) {
            Ok(expr) => expr,
            Err(_) => {
                self.scanner.restore(save);
                return Ok(None);
            }
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;
        if self.scanner.peek(0) != Some(':') {
            self.scanner.restore(save);
            return Ok(None);
        }
        self.scanner.read();
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let first_value = self.parse_space_list(None, false)?;

        let mut pairs = vec![(first_key, first_value)];
        loop {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.peek(0) == Some(')') {
                    break;
                }
                let key = self.parse_space_list(None, false)?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                self.scanner.expect_char(':')?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let value = self.parse_space_list(None, false)?;
                pairs.push((key, value));
            } else {
                break;
            }
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(')')?;
        Ok(Some(Expression::Map(MapExpression {
            span: self.scanner.span_from(open_start),
            pairs,
        })))
    }

    fn parse_variable_literal(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        self.forbid_in_plain_css("Sass variables", self.scanner.empty_span())?;
        self.scanner.expect_char('$')?;
        let name = lexer::identifier(&mut self.scanner, true, false)?;
        Ok(Expression::Variable(VariableExpression {
            span: self.scanner.span_from(start),
            namespace: None,
            name,
        }))
    }

    fn parse_quoted_string_expr(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        let quote = self.scanner.peek(0).unwrap();
        self.scanner.read();
        let mut builder = InterpolationBuilder::new();
        loop {
            match self.scanner.peek(0) {
                Some(c) if c == quote => {
                    self.scanner.read();
                    break;
                }
                Some('\n') | None => return Err(self.scanner.error("Expected string.")),
                Some('\\') => {
                    if self.scanner.peek(1) == Some('\n') {
                        self.scanner.read();
                        self.scanner.read();
                        builder.push_char('\n');
                    } else {
                        builder.push_char(lexer::escape_character(&mut self.scanner)?);
                    }
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                Some(c) => {
                    self.scanner.read();
                    builder.push_char(c);
                }
            }
        }
        let span = self.scanner.span_from(start);
        Ok(Expression::String(StringExpression {
            span,
            text: builder.finish(span),
            quoted: true,
        }))
    }

    fn parse_hash_expr(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        self.scanner.read(); // '#'

        let mut run_len = 0;
        while matches!(self.scanner.peek(run_len), Some(c) if is_hex_digit(c)) {
            run_len += 1;
        }
        let followed_by_name_char = matches!(self.scanner.peek(run_len), Some(c) if is_name_char(c));

        if matches!(run_len, 3 | 4 | 6 | 8) && !followed_by_name_char {
            let mut raw = String::from("#");
            for _ in 0..run_len {
                raw.push(self.scanner.read().unwrap());
            }
            return Ok(Expression::Color(ColorExpression {
                span: self.scanner.span_from(start),
                raw,
                digits: run_len as u8,
            }));
        }

        Err(self.scanner.error("Expected hex digit."))
    }

    fn looking_at_unicode_range(&self) -> bool {
        (self.scanner.peek(0) == Some('U') || self.scanner.peek(0) == Some('u'))
            && self.scanner.peek(1) == Some('+')
            && matches!(self.scanner.peek(2), Some(c) if is_hex_digit(c) || c == '?')
    }

    fn parse_unicode_range(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        self.scanner.read();
        self.scanner.read();
        let mut text = String::from("U+");

        let mut count = 0;
        while count < 6 {
            match self.scanner.peek(0) {
                Some(c) if is_hex_digit(c) || c == '?' => {
                    text.push(self.scanner.read().unwrap());
                    count += 1;
                }
                _ => break,
            }
        }

        if self.scanner.peek(0) == Some('-') && matches!(self.scanner.peek(1), Some(c) if is_hex_digit(c)) {
            text.push(self.scanner.read().unwrap());
            let mut count2 = 0;
            while count2 < 6 {
                match self.scanner.peek(0) {
                    Some(c) if is_hex_digit(c) => {
                        text.push(self.scanner.read().unwrap());
                        count2 += 1;
                    }
                    _ => break,
                }
            }
        }

        let span = self.scanner.span_from(start);
        Ok(Expression::String(StringExpression {
            span,
            text: Interpolation::plain(span, text),
            quoted: false,
        }))
    }

    pub fn parse_number(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut text = String::new();
        if self.scanner.peek(0) == Some('.') {
            text.push('0');
            text.push_str(&lexer::try_decimal(&mut self.scanner).ok_or_else(|| self.scanner.error("Expected number."))?);
        } else {
            text.push_str(&lexer::natural_number(&mut self.scanner)?);
            if let Some(dec) = lexer::try_decimal(&mut self.scanner) {
                text.push_str(&dec);
            }
        }
        if let Some(exp) = lexer::try_exponent(&mut self.scanner) {
            text.push_str(&exp);
        }
        let value: f64 = text
            .parse()
            .map_err(|_| self.scanner.error("Invalid number."))?;

        let unit = if self.scanner.peek(0) == Some('%') {
            self.scanner.read();
            Some("%".to_string())
        } else if lexer::looking_at_identifier(&self.scanner) {
            Some(lexer::identifier(&mut self.scanner, false, true)?)
        } else {
            None
        };

        Ok(Expression::Number(NumberExpression {
            span: self.scanner.span_from(start),
            value,
            unit,
        }))
    }

    /// `url(raw)` vs. `url(Expression…)` (spec.md §5 backtracking point 4):
    /// try the raw, unquoted `url(...)` token first since it accepts
    /// characters (bare paths with `.`/`/`) that the general function-call
    /// grammar can't; fall back to a normal function call (or another
    /// identifier entirely) when the contents need interpolation or
    /// expression parsing. In plain CSS, an interpolated `url(...)`'s
    /// contents fall through to `single_interpolation`, which already
    /// forbids interpolation there.
    fn parse_url_or_function(
        &mut self,
        until: Option<UntilPredicate>,
        single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        if let Some(raw) = lexer::try_url(&mut self.scanner)? {
            let span = self.scanner.span_from(start);
            return Ok(Expression::String(StringExpression {
                span,
                text: Interpolation::plain(span, format!("url({})", raw)),
                quoted: false,
            }));
        }
        self.parse_identifier_like(until, single_equals)
    }

    /// Function calls, `if(...)`, calculations, booleans, `null`, and bare
    /// (unquoted) strings all start with what looks like an identifier;
    /// this also handles the `namespace.$var` / `namespace.func(...)`
    /// forms (spec.md §4.4, §4.5 "is_use_allowed"/namespacing).
    fn parse_identifier_like(
        &mut self,
        _until: Option<UntilPredicate>,
        _single_equals: bool,
    ) -> SassResult<Expression> {
        let start = self.scanner.state();
        let ident = self.interpolated_identifier()?;

        let plain = match ident.as_plain() {
            Some(plain) => plain,
            None => {
                return if self.scanner.peek(0) == Some('(') {
                    let args = self.parse_argument_invocation(false)?;
                    Ok(Expression::InterpolatedFunction(InterpolatedFunctionExpression {
                        span: self.scanner.span_from(start),
                        name: ident,
                        arguments: args,
                    }))
                } else {
                    let span = self.scanner.span_from(start);
                    Ok(Expression::String(StringExpression {
                        span,
                        text: ident,
                        quoted: false,
                    }))
                };
            }
        };

        if self.scanner.peek(0) == Some('.') && !self.plain_css() {
            let dot_state = self.scanner.state();
            self.scanner.read();
            if self.scanner.peek(0) == Some('$') {
                self.scanner.read();
                let name = lexer::identifier(&mut self.scanner, true, false)?;
                return Ok(Expression::Variable(VariableExpression {
                    span: self.scanner.span_from(start),
                    namespace: Some(plain),
                    name,
                }));
            } else if lexer::looking_at_identifier(&self.scanner) {
                let fname = self.interpolated_identifier()?;
                if self.scanner.peek(0) == Some('(') {
                    let allow_empty_trailing = fname.as_plain().as_deref() == Some("var");
                    let args = self.parse_argument_invocation(allow_empty_trailing)?;
                    return match fname.as_plain() {
                        Some(fname_plain) => Ok(Expression::Function(FunctionExpression {
                            span: self.scanner.span_from(start),
                            namespace: Some(plain),
                            name: fname_plain,
                            arguments: args,
                        })),
                        None => Ok(Expression::InterpolatedFunction(InterpolatedFunctionExpression {
                            span: self.scanner.span_from(start),
                            name: fname,
                            arguments: args,
                        })),
                    };
                }
                return Err(self.scanner.error("expected \"(\"."));
            } else {
                self.scanner.restore(dot_state);
            }
        }

        match plain.as_str() {
            "true" => {
                return Ok(Expression::Boolean(BooleanExpression {
                    span: self.scanner.span_from(start),
                    value: true,
                }))
            }
            "false" => {
                return Ok(Expression::Boolean(BooleanExpression {
                    span: self.scanner.span_from(start),
                    value: false,
                }))
            }
            "null" => {
                return Ok(Expression::Null(NullExpression {
                    span: self.scanner.span_from(start),
                }))
            }
            "if" if self.scanner.peek(0) == Some('(') => {
                let args = self.parse_argument_invocation(false)?;
                return Ok(Expression::If(IfExpression {
                    span: self.scanner.span_from(start),
                    arguments: args,
                }));
            }
            "calc" | "min" | "max" | "clamp" if self.scanner.peek(0) == Some('(') => {
                return self.parse_calculation(plain, start);
            }
            _ => {}
        }

        if self.scanner.peek(0) == Some('(') {
            let allow_empty_trailing = plain == "var";
            let args = self.parse_argument_invocation(allow_empty_trailing)?;
            return Ok(Expression::Function(FunctionExpression {
                span: self.scanner.span_from(start),
                namespace: None,
                name: plain,
                arguments: args,
            }));
        }

        let span = self.scanner.span_from(start);
        Ok(Expression::String(StringExpression {
            span,
            text: Interpolation::plain(span, plain),
            quoted: false,
        }))
    }

    /// Stricter sub-grammar requiring whitespace around `+`/`-` and
    /// disallowing bare Sass-only syntax; falls back to a normal function
    /// call for `min`/`max` when it fails to parse (spec.md §4.4
    /// "Calculations", §5 backtracking point 2).
    fn parse_calculation(&mut self, name: String, start: ScannerState) -> SassResult<Expression> {
        let save = self.scanner.state();
        match self.try_parse_calculation_args() {
            Ok(arguments) => Ok(Expression::Calculation(CalculationExpression {
                span: self.scanner.span_from(start),
                name,
                arguments,
            })),
            Err(e) => {
                if name == "min" || name == "max" {
                    self.scanner.restore(save);
                    let args = self.parse_argument_invocation(false)?;
                    Ok(Expression::Function(FunctionExpression {
                        span: self.scanner.span_from(start),
                        namespace: None,
                        name,
                        arguments: args,
                    }))
                } else {
                    Err(e)
                }
            }
        }
    }

    fn try_parse_calculation_args(&mut self) -> SassResult<Vec<Expression>> {
        self.scanner.expect_char('(')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let mut args = Vec::new();
        if self.scanner.peek(0) == Some(')') {
            self.scanner.read();
            return Ok(args);
        }
        loop {
            args.push(self.parse_calc_sum()?);
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                continue;
            }
            break;
        }
        self.scanner.expect_char(')')?;
        Ok(args)
    }

    fn parse_calc_sum(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_calc_product()?;
        loop {
            let save = self.scanner.state();
            let had_space_before = lexer::whitespace_without_comments(&mut self.scanner);
            match self.scanner.peek(0) {
                Some(op @ ('+' | '-')) => {
                    if !had_space_before {
                        self.scanner.restore(save);
                        break;
                    }
                    self.scanner.read();
                    let had_space_after = lexer::whitespace_without_comments(&mut self.scanner);
                    if !had_space_after {
                        return Err(self.scanner.error("Expected whitespace before operator."));
                    }
                    let right = self.parse_calc_product()?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: if op == '+' { BinaryOp::Add } else { BinaryOp::Sub },
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                _ => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(left)
    }

    fn parse_calc_product(&mut self) -> SassResult<Expression> {
        let start = self.scanner.state();
        let mut left = self.parse_calc_value()?;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_without_comments(&mut self.scanner);
            match self.scanner.peek(0) {
                Some('*') => {
                    self.scanner.read();
                    lexer::whitespace_without_comments(&mut self.scanner);
                    let right = self.parse_calc_value()?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Mul,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                Some('/') => {
                    self.scanner.read();
                    lexer::whitespace_without_comments(&mut self.scanner);
                    let right = self.parse_calc_value()?;
                    left = Expression::BinaryOp(BinaryOperationExpression {
                        span: self.scanner.span_from(start),
                        op: BinaryOp::Div,
                        left: Box::new(left),
                        right: Box::new(right),
                        allows_slash: false,
                    });
                }
                _ => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(left)
    }

    fn parse_calc_value(&mut self) -> SassResult<Expression> {
        if self.scanner.peek(0) == Some('(') {
            let start = self.scanner.state();
            self.scanner.read();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let inner = self.parse_calc_sum()?;
            lexer::whitespace_with_comments(&mut self.scanner)?;
            self.scanner.expect_char(')')?;
            Ok(Expression::Parenthesized(ParenthesizedExpression {
                span: self.scanner.span_from(start),
                inner: Box::new(inner),
            }))
        } else {
            self.parse_single_expression(None, false)
        }
    }

    /// Positional, then named (`$name: value`), then `expr...` rest, then
    /// `expr...` keyword-rest (spec.md §4.5 "Argument invocations").
    /// `allow_empty_trailing` grants `var()`'s special second-argument
    /// emptiness allowance.
    pub fn parse_argument_invocation(&mut self, allow_empty_trailing: bool) -> SassResult<ArgumentInvocation> {
        let start = self.scanner.state();
        self.scanner.expect_char('(')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let mut inv = ArgumentInvocation::empty(self.scanner.empty_span());
        let mut seen_named = false;

        if self.scanner.peek(0) != Some(')') {
            loop {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.peek(0) == Some('$') && self.is_named_argument_ahead() {
                    let name = self.parse_argument_name()?;
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    self.scanner.expect_char(':')?;
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let value = self.parse_single_equals_or(None, false)?;
                    inv.named.push((name, value));
                    seen_named = true;
                } else {
                    let value = self.parse_single_equals_or(None, false)?;
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    if self.scanner.scan_str("...") {
                        if inv.rest.is_none() {
                            inv.rest = Some(value);
                        } else {
                            inv.keyword_rest = Some(value);
                        }
                    } else {
                        if seen_named {
                            return Err(self
                                .scanner
                                .error("Positional arguments must come before keyword arguments."));
                        }
                        inv.positional.push(value);
                    }
                }
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.scan_char(',') {
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    if self.scanner.peek(0) == Some(')') {
                        if !allow_empty_trailing {
                            return Err(self.scanner.error("Expected expression."));
                        }
                        break;
                    }
                    continue;
                }
                break;
            }
        }
        self.scanner.expect_char(')')?;
        inv.span = self.scanner.span_from(start);
        Ok(inv)
    }

    fn is_named_argument_ahead(&mut self) -> bool {
        let save = self.scanner.state();
        self.scanner.read();
        let ok = lexer::identifier(&mut self.scanner, true, false).is_ok() && {
            let _ = lexer::whitespace_with_comments(&mut self.scanner);
            self.scanner.peek(0) == Some(':')
        };
        self.scanner.restore(save);
        ok
    }

    fn parse_argument_name(&mut self) -> SassResult<String> {
        self.scanner.expect_char('$')?;
        lexer::identifier(&mut self.scanner, true, false)
    }
}

/// Runs `body` with `in_parentheses` forced off, restoring the previous
/// value afterward -- used by the paren re-parse trick above.
fn with_flag_off_in_parentheses<T>(
    parser: &mut Parser,
    body: impl FnOnce(&mut Parser) -> SassResult<T>,
) -> SassResult<T> {
    let saved = parser.flags.in_parentheses;
    parser.flags.in_parentheses = false;
    let result = body(parser);
    parser.flags.in_parentheses = saved;
    result
}
