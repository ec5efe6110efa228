//! Logger contract (spec.md §6). Callers can observe warnings and
//! deprecation notices without the parser taking on a framework
//! dependency -- this is the same externalized-collaborator shape as the
//! teacher's own `debug`/`warn`/`error` methods on `StyleSheetParser`
//! (`examples/MidasLamb-grass/src/lib.rs`), generalized into a trait so an
//! embedder can swap in their own sink.

use codemap::Span;

/// Fixed enumeration of deprecation kinds a caller needs to recognize by
/// name; semantics (whether to upgrade to an error, how to render) are
/// entirely up to the implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeprecationKind {
    ElseIf,
    Import,
    MozDocument,
    StrictUnary,
    DuplicateVarFlags,
    CssFunctionMixin,
}

impl DeprecationKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DeprecationKind::ElseIf => "elseif",
            DeprecationKind::Import => "import",
            DeprecationKind::MozDocument => "moz_document",
            DeprecationKind::StrictUnary => "strict_unary",
            DeprecationKind::DuplicateVarFlags => "duplicate_var_flags",
            DeprecationKind::CssFunctionMixin => "css_function_mixin",
        }
    }
}

pub trait Logger {
    fn warn(&self, message: &str, span: Span);
    fn warn_for_deprecation(&self, kind: DeprecationKind, message: &str, span: Span);
}

/// Default logger: writes to stderr in the same plain `Warning: ...`
/// register the teacher used in `StyleSheetParser::warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogger;

impl Logger for StderrLogger {
    fn warn(&self, message: &str, span: Span) {
        eprintln!("Warning: {}\n{:?}", message, span);
    }

    fn warn_for_deprecation(&self, kind: DeprecationKind, message: &str, span: Span) {
        eprintln!(
            "DEPRECATION WARNING [{}]: {}\n{:?}",
            kind.as_str(),
            message,
            span
        );
    }
}

/// A logger that discards everything. Useful for tests and for callers
/// who only want the AST and will derive their own diagnostics.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLogger;

impl Logger for SilentLogger {
    fn warn(&self, _message: &str, _span: Span) {}
    fn warn_for_deprecation(&self, _kind: DeprecationKind, _message: &str, _span: Span) {}
}
