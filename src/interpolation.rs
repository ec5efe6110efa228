//! `Interpolation`, the "literal text or expression hole" sequence shared
//! by identifiers, strings, URLs, selectors, and media queries (spec.md
//! §3, §4.3, §9 "Interpolation buffer").

use codemap::Span;

use crate::ast::expr::Expression;

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationItem {
    Literal(String),
    Expr(Box<Expression>),
}

/// An interpolated run of text. `as_plain()` is `Some` exactly when every
/// item is literal text (spec.md §3 invariant).
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub span: Span,
    pub contents: Vec<InterpolationItem>,
}

impl Interpolation {
    pub fn new(span: Span, contents: Vec<InterpolationItem>) -> Self {
        Interpolation { span, contents }
    }

    pub fn plain(span: Span, text: impl Into<String>) -> Self {
        Interpolation {
            span,
            contents: vec![InterpolationItem::Literal(text.into())],
        }
    }

    /// `Some(text)` iff every item is literal (spec.md §3 invariant).
    pub fn as_plain(&self) -> Option<String> {
        let mut out = String::new();
        for item in &self.contents {
            match item {
                InterpolationItem::Literal(text) => out.push_str(text),
                InterpolationItem::Expr(_) => return None,
            }
        }
        Some(out)
    }

    pub fn is_plain(&self) -> bool {
        self.contents
            .iter()
            .all(|item| matches!(item, InterpolationItem::Literal(_)))
    }
}

/// Accumulates literal text and `Expression` holes; yields an
/// `Interpolation` once the caller knows the whole span. Standard
/// "string-builder of two element types" pattern (spec.md §9).
#[derive(Debug, Default)]
pub struct InterpolationBuilder {
    buffer: String,
    contents: Vec<InterpolationItem>,
}

impl InterpolationBuilder {
    pub fn new() -> Self {
        InterpolationBuilder::default()
    }

    pub fn push_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn push_expr(&mut self, expr: Expression) {
        self.flush_literal();
        self.contents.push(InterpolationItem::Expr(Box::new(expr)));
    }

    fn flush_literal(&mut self) {
        if !self.buffer.is_empty() {
            self.contents
                .push(InterpolationItem::Literal(std::mem::take(&mut self.buffer)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.contents.is_empty()
    }

    pub fn finish(mut self, span: Span) -> Interpolation {
        self.flush_literal();
        Interpolation::new(span, self.contents)
    }
}
