//! `CssMediaQuery` (spec.md §3, §4.7 `MediaQueryParser`).

use codemap::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaQueryKind {
    /// `<in-parens> (and|or <in-parens>)*`, no leading type.
    Condition {
        conjunction: bool,
        conditions: Vec<String>,
    },
    /// `[not|only] <type> (and <in-parens>)*`.
    TypeAndConditions {
        modifier: Option<String>,
        media_type: String,
        conditions: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CssMediaQuery {
    pub span: Span,
    pub kind: MediaQueryKind,
}
