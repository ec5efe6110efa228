//! Statement nodes (spec.md §3 "Statements").
//!
//! All nodes are write-once: the parser constructs them and they are never
//! mutated afterwards (spec.md §3 "Lifecycle").

use codemap::Span;

use crate::ast::args::{ArgumentDeclaration, ArgumentInvocation, ConfiguredVariable};
use crate::ast::expr::Expression;
use crate::ast::media::CssMediaQuery;
use crate::ast::supports::SupportsCondition;
use crate::interpolation::Interpolation;

#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub span: Span,
    pub statements: Vec<Statement>,
    /// Set by `parse_css`; forbids every Sass-only node anywhere in the
    /// tree (spec.md §3 invariant, enforced while parsing, not after).
    pub plain_css: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub span: Span,
    pub selector: Interpolation,
    pub children: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub span: Span,
    pub name: Interpolation,
    pub value: Option<Expression>,
    /// Present for custom properties (`--foo: ...`) whose value is a raw
    /// interpolated declaration value rather than a parsed expression
    /// (spec.md §4.5 step 6, §8 scenario 3).
    pub custom_property_value: Option<Interpolation>,
    pub children: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableFlag {
    Default,
    Global,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub span: Span,
    pub namespace: Option<String>,
    pub name: String,
    pub value: Expression,
    pub is_default: bool,
    pub is_global: bool,
}

/// A generic at-rule for names not in the recognized Sass set (spec.md
/// §4.5 "At-rule dispatch", §6 "generic `@unknown` at-rules").
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub span: Span,
    pub name: Interpolation,
    pub value: Option<Interpolation>,
    pub children: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtRootQuery {
    pub span: Span,
    pub without: bool,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtRootRule {
    pub span: Span,
    pub query: Option<AtRootQuery>,
    pub children: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    pub span: Span,
    pub queries: Vec<CssMediaQuery>,
    pub children: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupportsRule {
    pub span: Span,
    pub condition: SupportsCondition,
    pub children: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfRule {
    pub span: Span,
    pub clauses: Vec<IfClause>,
    pub else_body: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EachRule {
    pub span: Span,
    pub variables: Vec<String>,
    pub list: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForRule {
    pub span: Span,
    pub variable: String,
    pub from: Expression,
    pub to: Expression,
    /// `true` for `through` (inclusive), `false` for `to` (exclusive).
    pub inclusive: bool,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileRule {
    pub span: Span,
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRule {
    pub span: Span,
    pub name: String,
    pub arguments: ArgumentDeclaration,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MixinRule {
    pub span: Span,
    pub name: String,
    pub arguments: ArgumentDeclaration,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    pub span: Span,
    pub arguments: ArgumentDeclaration,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncludeRule {
    pub span: Span,
    pub namespace: Option<String>,
    pub name: String,
    pub arguments: ArgumentInvocation,
    pub content: Option<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentRule {
    pub span: Span,
    pub arguments: ArgumentInvocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticImport {
    pub span: Span,
    pub url: Interpolation,
    pub media: Option<Vec<CssMediaQuery>>,
    pub supports: Option<SupportsCondition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicImport {
    pub span: Span,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Import {
    Static(StaticImport),
    Dynamic(DynamicImport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportRule {
    pub span: Span,
    pub imports: Vec<Import>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UseRule {
    pub span: Span,
    pub url: String,
    /// `None` means `as *`; `Some(name)` an explicit or derived namespace.
    pub namespace: Option<String>,
    pub configuration: Vec<ConfiguredVariable>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForwardMemberFilter {
    Show(Vec<String>),
    Hide(Vec<String>),
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRule {
    pub span: Span,
    pub url: String,
    pub prefix: Option<String>,
    pub filter: ForwardMemberFilter,
    pub configuration: Vec<ConfiguredVariable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRule {
    pub span: Span,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugRule {
    pub span: Span,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarnRule {
    pub span: Span,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRule {
    pub span: Span,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendRule {
    pub span: Span,
    pub selector: Interpolation,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SilentComment {
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoudComment {
    pub span: Span,
    pub text: Interpolation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    StyleRule(StyleRule),
    Declaration(Declaration),
    VariableDeclaration(VariableDeclaration),
    AtRule(AtRule),
    AtRootRule(AtRootRule),
    MediaRule(MediaRule),
    SupportsRule(SupportsRule),
    IfRule(IfRule),
    EachRule(EachRule),
    ForRule(ForRule),
    WhileRule(WhileRule),
    FunctionRule(FunctionRule),
    MixinRule(MixinRule),
    ContentBlock(ContentBlock),
    IncludeRule(IncludeRule),
    ContentRule(ContentRule),
    ImportRule(ImportRule),
    UseRule(UseRule),
    ForwardRule(ForwardRule),
    ReturnRule(ReturnRule),
    DebugRule(DebugRule),
    WarnRule(WarnRule),
    ErrorRule(ErrorRule),
    ExtendRule(ExtendRule),
    SilentComment(SilentComment),
    LoudComment(LoudComment),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::StyleRule(s) => s.span,
            Statement::Declaration(s) => s.span,
            Statement::VariableDeclaration(s) => s.span,
            Statement::AtRule(s) => s.span,
            Statement::AtRootRule(s) => s.span,
            Statement::MediaRule(s) => s.span,
            Statement::SupportsRule(s) => s.span,
            Statement::IfRule(s) => s.span,
            Statement::EachRule(s) => s.span,
            Statement::ForRule(s) => s.span,
            Statement::WhileRule(s) => s.span,
            Statement::FunctionRule(s) => s.span,
            Statement::MixinRule(s) => s.span,
            Statement::ContentBlock(s) => s.span,
            Statement::IncludeRule(s) => s.span,
            Statement::ContentRule(s) => s.span,
            Statement::ImportRule(s) => s.span,
            Statement::UseRule(s) => s.span,
            Statement::ForwardRule(s) => s.span,
            Statement::ReturnRule(s) => s.span,
            Statement::DebugRule(s) => s.span,
            Statement::WarnRule(s) => s.span,
            Statement::ErrorRule(s) => s.span,
            Statement::ExtendRule(s) => s.span,
            Statement::SilentComment(s) => s.span,
            Statement::LoudComment(s) => s.span,
        }
    }

    /// Used to enforce the "`@use`/`@forward` only before other code"
    /// invariant (spec.md §3, §7).
    pub fn is_use_or_forward(&self) -> bool {
        matches!(self, Statement::UseRule(_) | Statement::ForwardRule(_))
    }

    pub fn is_charset(&self) -> bool {
        matches!(self, Statement::AtRule(rule) if rule.name.as_plain().as_deref() == Some("charset"))
    }
}
