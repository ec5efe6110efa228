//! `@supports` condition grammar (spec.md §3 "Support fragments").

use codemap::Span;

use crate::ast::expr::Expression;
use crate::interpolation::Interpolation;

#[derive(Debug, Clone, PartialEq)]
pub enum SupportsCondition {
    Negation {
        span: Span,
        condition: Box<SupportsCondition>,
    },
    Operation {
        span: Span,
        left: Box<SupportsCondition>,
        /// `"and"` or `"or"`, kept as text because it may itself carry
        /// interpolation-normalized casing.
        operator: String,
        right: Box<SupportsCondition>,
    },
    Interpolation {
        span: Span,
        value: Interpolation,
    },
    Declaration {
        span: Span,
        name: Expression,
        value: Expression,
    },
    Function {
        span: Span,
        name: Interpolation,
        arguments: Interpolation,
    },
    /// A parenthesized condition that didn't parse as a declaration or a
    /// nested condition -- the `InterpolatedAnyValue` fallback (spec.md §5
    /// backtracking point 3).
    Anything {
        span: Span,
        contents: Interpolation,
    },
}

impl SupportsCondition {
    pub fn span(&self) -> Span {
        match self {
            SupportsCondition::Negation { span, .. }
            | SupportsCondition::Operation { span, .. }
            | SupportsCondition::Interpolation { span, .. }
            | SupportsCondition::Declaration { span, .. }
            | SupportsCondition::Function { span, .. }
            | SupportsCondition::Anything { span, .. } => *span,
        }
    }
}
