//! The statement grammar (spec.md §4.5, C5): `parse_stylesheet()`'s
//! top-level loop, the at-rule dispatch table, and the declaration-vs-
//! style-rule disambiguation that every CSS-like parser has to solve.

use crate::ast::args::{Argument, ArgumentDeclaration, ArgumentInvocation, ConfiguredVariable};
use crate::ast::expr::{Expression, NullExpression, StringExpression};
use crate::ast::media::CssMediaQuery;
use crate::ast::stmt::*;
use crate::ast::supports::SupportsCondition;
use crate::error::SassResult;
use crate::interpolation::{Interpolation, InterpolationBuilder, InterpolationItem};
use crate::logger::DeprecationKind;
use crate::parse::chars::is_name_start;
use crate::parse::lexer;
use crate::parse::scanner::ScannerState;
use crate::parse::value_scan::DeclarationValueFlags;
use crate::parse::Parser;

impl<'a> Parser<'a> {
    /// Entry point for all three dialects. Strips a leading BOM, then
    /// reads top-level statements until EOF; each statement parser is
    /// responsible for its own trailing separator (spec.md §4.5).
    pub fn parse_stylesheet(&mut self) -> SassResult<Stylesheet> {
        self.scanner.scan_char('\u{feff}');
        let whole_start = self.scanner.state();
        lexer::whitespace_with_comments(&mut self.scanner)?;

        let mut statements = Vec::new();
        while !self.scanner.is_done() {
            if let Some(stmt) = self.parse_statement()? {
                let keeps_use_allowed = matches!(
                    stmt,
                    Statement::SilentComment(_) | Statement::LoudComment(_)
                ) || stmt.is_use_or_forward()
                    || stmt.is_charset();
                if !keeps_use_allowed {
                    self.flags.is_use_allowed = false;
                }
                statements.push(stmt);
            }
            lexer::whitespace_with_comments(&mut self.scanner)?;
        }

        self.append_global_variable_stubs(&mut statements);

        Ok(Stylesheet {
            span: self.scanner.span_from(whole_start),
            statements,
            plain_css: self.plain_css(),
        })
    }

    /// Appends a guarded `null` declaration for every name seen with
    /// `!global` that never got an actual top-level declaration, so later
    /// evaluation always has a slot to write into (spec.md §4.5 "parse()",
    /// §9 "global_names_seen").
    fn append_global_variable_stubs(&mut self, statements: &mut Vec<Statement>) {
        let span = self.whole_span();
        for name in self.global_names_seen.clone() {
            let already_declared = statements.iter().any(|s| {
                matches!(s, Statement::VariableDeclaration(v) if v.namespace.is_none() && v.name == name)
            });
            if already_declared {
                continue;
            }
            statements.push(Statement::VariableDeclaration(VariableDeclaration {
                span,
                namespace: None,
                name,
                value: Expression::Null(NullExpression { span }),
                is_default: true,
                is_global: true,
            }));
        }
    }

    /// Used at top level and for every kind of nested block alike; the
    /// three surface syntaxes differ only in how [`Parser::children`]
    /// finds the block's extent, not in what counts as a statement here.
    fn parse_statement(&mut self) -> SassResult<Option<Statement>> {
        match self.scanner.peek(0) {
            None => Ok(None),
            Some('/') if self.scanner.peek(1) == Some('/') => {
                Ok(Some(Statement::SilentComment(self.silent_comment()?)))
            }
            Some('/') if self.scanner.peek(1) == Some('*') => {
                Ok(Some(Statement::LoudComment(self.loud_comment()?)))
            }
            Some('@') => self.parse_at_rule(),
            Some('$') => {
                self.forbid_in_plain_css("Sass variables", self.scanner.empty_span())?;
                Ok(Some(self.parse_variable_declaration()?))
            }
            _ => Ok(Some(self.parse_declaration_or_style_rule()?)),
        }
    }

    /// Every nested body forbids `@use`/`@forward` regardless of dialect
    /// (spec.md §3, "only before other code" is a top-level-only allowance).
    fn parse_block_statements(&mut self) -> SassResult<Vec<Statement>> {
        crate::with_flag!(self, is_use_allowed, false, {
            self.children(|p| p.parse_statement())
        })
    }

    // ---- Declaration vs. style rule -----------------------------------

    fn parse_declaration_or_style_rule(&mut self) -> SassResult<Statement> {
        let start = self.scanner.state();
        if let Some(decl) = self.try_parse_declaration(start)? {
            return Ok(Statement::Declaration(decl));
        }
        self.scanner.restore(start);
        self.parse_style_rule(start)
    }

    /// Speculatively parses the current position as a declaration,
    /// restoring and returning `None` on anything that looks more like a
    /// selector (spec.md §4.5's disambiguation, steps 1-9): the `*prop:`,
    /// `.prop:`, `:prop:`, `#prop:` hacks are recognized before the name
    /// itself; custom properties are identified by a literal `--` prefix
    /// and read as raw text; ordinary properties require a name, then a
    /// single (not double) `:`, then either a nested block or a value that
    /// parses cleanly and, if it could equally well have been the start of
    /// a selector, is not itself immediately followed by a children block.
    fn try_parse_declaration(&mut self, start: ScannerState) -> SassResult<Option<Declaration>> {
        if self.scanner.peek(0) == Some('-') && self.scanner.peek(1) == Some('-') {
            let name = self.interpolated_identifier()?;
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if !self.scanner.scan_char(':') {
                self.scanner.restore(start);
                return Ok(None);
            }
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let raw = self.interpolated_declaration_value(DeclarationValueFlags {
                allow_empty: true,
                ..Default::default()
            })?;
            self.expect_statement_separator()?;
            return Ok(Some(Declaration {
                span: self.scanner.span_from(start),
                name,
                value: None,
                custom_property_value: Some(raw),
                children: Vec::new(),
            }));
        }

        // Step 1: `*prop: v`, `.prop: v`, `:prop: v`, `#prop: v` (the bare
        // `#` must not be interpolation's `#{`).
        let hack_prefix = match self.scanner.peek(0) {
            Some(c @ ('*' | '.' | ':')) => Some(c),
            Some('#') if self.scanner.peek(1) != Some('{') => Some('#'),
            _ => None,
        };
        if hack_prefix.is_some() {
            self.scanner.read();
        }

        let name = match self.interpolated_identifier() {
            Ok(n) => n,
            Err(_) => {
                self.scanner.restore(start);
                return Ok(None);
            }
        };
        let name = match hack_prefix {
            Some(c) => {
                let mut builder = InterpolationBuilder::new();
                builder.push_char(c);
                for item in name.contents {
                    match item {
                        InterpolationItem::Literal(s) => builder.push_str(&s),
                        InterpolationItem::Expr(e) => builder.push_expr(*e),
                    }
                }
                builder.finish(self.scanner.span_from(start))
            }
            None => name,
        };

        if self.scanner.peek(0) != Some(':') || self.scanner.peek(1) == Some(':') {
            self.scanner.restore(start);
            return Ok(None);
        }
        self.scanner.read();

        let before_value_whitespace = self.scanner.state();
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let had_whitespace_after_colon = self.scanner.state() != before_value_whitespace;

        if self.scanner.peek(0) == Some('{') {
            let children = self.parse_nested_declaration_children(&name)?;
            return Ok(Some(Declaration {
                span: self.scanner.span_from(start),
                name,
                value: None,
                custom_property_value: None,
                children,
            }));
        }

        // Step 9: a name directly (no whitespace) followed by what looks
        // like another identifier -- e.g. `hover` in `a:hover` -- could be
        // either a value or the rest of a compound selector. Remember that
        // ambiguity so that, if it turns out to be followed by a children
        // block, we force a fallback to selector parsing instead of
        // treating it as a nested declaration group.
        let could_be_selector = !had_whitespace_after_colon && self.looking_at_interpolated_identifier();

        let value = match self.parse_expression_full(None, false, false) {
            Ok(v) => v,
            Err(_) => {
                self.scanner.restore(start);
                return Ok(None);
            }
        };

        if self.looking_at_children() && could_be_selector {
            self.scanner.restore(start);
            return Ok(None);
        }

        let children = if self.looking_at_children() {
            self.parse_nested_declaration_children(&name)?
        } else {
            self.expect_statement_separator()?;
            Vec::new()
        };

        Ok(Some(Declaration {
            span: self.scanner.span_from(start),
            name,
            value: Some(value),
            custom_property_value: None,
            children,
        }))
    }

    fn parse_nested_declaration_children(&mut self, parent_name: &Interpolation) -> SassResult<Vec<Statement>> {
        crate::with_flag!(self, is_use_allowed, false, {
            self.children(|p| p.parse_nested_declaration_child(parent_name))
        })
    }

    fn parse_nested_declaration_child(&mut self, parent_name: &Interpolation) -> SassResult<Option<Statement>> {
        match self.scanner.peek(0) {
            None => Ok(None),
            Some('/') if self.scanner.peek(1) == Some('/') => {
                Ok(Some(Statement::SilentComment(self.silent_comment()?)))
            }
            Some('/') if self.scanner.peek(1) == Some('*') => {
                Ok(Some(Statement::LoudComment(self.loud_comment()?)))
            }
            _ => {
                let start = self.scanner.state();
                let suffix = self.interpolated_identifier()?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                self.scanner.expect_char(':')?;
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let full_name = concat_dashed(parent_name, &suffix, self.scanner.span_from(start));

                if self.scanner.peek(0) == Some('{') {
                    let children = self.parse_nested_declaration_children(&full_name)?;
                    return Ok(Some(Statement::Declaration(Declaration {
                        span: self.scanner.span_from(start),
                        name: full_name,
                        value: None,
                        custom_property_value: None,
                        children,
                    })));
                }

                let value = self.parse_expression_full(None, false, false)?;
                let children = if self.looking_at_children() {
                    self.parse_nested_declaration_children(&full_name)?
                } else {
                    self.expect_statement_separator()?;
                    Vec::new()
                };

                Ok(Some(Statement::Declaration(Declaration {
                    span: self.scanner.span_from(start),
                    name: full_name,
                    value: Some(value),
                    custom_property_value: None,
                    children,
                })))
            }
        }
    }

    fn parse_style_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        let selector = if self.flags.in_keyframes {
            self.parse_keyframe_selector_list()?
        } else {
            self.parse_selector_list()?
        };
        let children = crate::with_flag!(self, in_style_rule, true, {
            crate::with_flag!(self, in_keyframes, false, { self.parse_block_statements()? })
        });
        Ok(Statement::StyleRule(StyleRule {
            span: self.scanner.span_from(start),
            selector,
            children,
        }))
    }

    // ---- Variable declarations -----------------------------------------

    fn parse_variable_declaration(&mut self) -> SassResult<Statement> {
        let start = self.scanner.state();
        self.scanner.expect_char('$')?;
        let name = lexer::identifier(&mut self.scanner, true, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(':')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.parse_expression_full(None, false, false)?;

        let mut is_default = false;
        let mut is_global = false;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if !self.scanner.scan_char('!') {
                self.scanner.restore(save);
                break;
            }
            let flag_span = self.scanner.span_from(save);
            if self.scanner.scan_identifier_str("default") {
                if is_default {
                    self.logger.warn_for_deprecation(
                        DeprecationKind::DuplicateVarFlags,
                        "!default should only be written once for each variable.\nThis will be an error in future Dart Sass versions.",
                        flag_span,
                    );
                }
                is_default = true;
                continue;
            }
            if self.scanner.scan_identifier_str("global") {
                if is_global {
                    self.logger.warn_for_deprecation(
                        DeprecationKind::DuplicateVarFlags,
                        "!global should only be written once for each variable.\nThis will be an error in future Dart Sass versions.",
                        flag_span,
                    );
                }
                is_global = true;
                continue;
            }
            return Err(self.scanner.error("Expected \"default\" or \"global\"."));
        }

        self.expect_statement_separator()?;

        if is_global {
            self.global_names_seen.push(name.clone());
        }

        Ok(Statement::VariableDeclaration(VariableDeclaration {
            span: self.scanner.span_from(start),
            namespace: None,
            name,
            value,
            is_default,
            is_global,
        }))
    }

    fn parse_variable_name(&mut self) -> SassResult<String> {
        self.scanner.expect_char('$')?;
        lexer::identifier(&mut self.scanner, true, false)
    }

    // ---- At-rule dispatch ------------------------------------------------

    fn parse_at_rule(&mut self) -> SassResult<Option<Statement>> {
        let start = self.scanner.state();
        self.scanner.expect_char('@')?;
        let name = self.interpolated_identifier()?;
        let name_span = name.span;

        if let Some(plain) = name.as_plain() {
            self.check_plain_css_at_rule(&plain, name_span)?;
            let lower = plain.to_ascii_lowercase();
            match lower.as_str() {
                "charset" => return self.parse_charset_rule(start, name).map(Some),
                "at-root" => return self.parse_at_root_rule(start).map(Some),
                "content" => return self.parse_content_rule(start).map(Some),
                "debug" => return self.parse_debug_rule(start).map(Some),
                "each" => return self.parse_each_rule(start).map(Some),
                "else" => return Err(self.scanner.error("This at-rule is not allowed here.")),
                "error" => return self.parse_error_rule(start).map(Some),
                "extend" => return self.parse_extend_rule(start).map(Some),
                "for" => return self.parse_for_rule(start).map(Some),
                "forward" => {
                    if !self.flags.is_use_allowed {
                        return Err(self
                            .scanner
                            .error("@forward rules must be written before any other rules."));
                    }
                    return self.parse_forward_rule(start).map(Some);
                }
                "function" => return self.parse_function_rule(start).map(Some),
                "if" => return self.parse_if_rule(start).map(Some),
                "import" => return self.parse_import_rule(start).map(Some),
                "include" => return self.parse_include_rule(start).map(Some),
                "media" => return self.parse_media_rule(start).map(Some),
                "mixin" => return self.parse_mixin_rule(start).map(Some),
                "return" => return self.parse_return_rule(start).map(Some),
                "supports" => return self.parse_supports_rule(start).map(Some),
                "use" => {
                    if !self.flags.is_use_allowed {
                        return Err(self
                            .scanner
                            .error("@use rules must be written before any other rules."));
                    }
                    return self.parse_use_rule(start).map(Some);
                }
                "warn" => return self.parse_warn_rule(start).map(Some),
                "while" => return self.parse_while_rule(start).map(Some),
                "document" | "-moz-document" => {
                    return self.parse_moz_document_rule(start, name).map(Some)
                }
                _ if lower.ends_with("keyframes") => {
                    return self.parse_keyframes_rule(start, name).map(Some)
                }
                _ => {}
            }
        }

        self.parse_unknown_at_rule(start, name).map(Some)
    }

    fn parse_unknown_at_rule(&mut self, start: ScannerState, name: Interpolation) -> SassResult<Statement> {
        let saved = self.flags.in_unknown_at_rule;
        self.flags.in_unknown_at_rule = true;

        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = if self.at_end_of_statement() || self.scanner.peek(0) == Some('{') {
            None
        } else {
            Some(self.interpolated_declaration_value(DeclarationValueFlags {
                allow_empty: true,
                ..Default::default()
            })?)
        };

        let children = if self.looking_at_children() {
            Some(self.parse_block_statements()?)
        } else {
            self.expect_statement_separator()?;
            None
        };

        self.flags.in_unknown_at_rule = saved;
        Ok(Statement::AtRule(AtRule {
            span: self.scanner.span_from(start),
            name,
            value,
            children,
        }))
    }

    fn parse_charset_rule(&mut self, start: ScannerState, name: Interpolation) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value_start = self.scanner.state();
        let text = lexer::string(&mut self.scanner)?;
        let value_span = self.scanner.span_from(value_start);
        self.expect_statement_separator()?;
        Ok(Statement::AtRule(AtRule {
            span: self.scanner.span_from(start),
            name,
            value: Some(Interpolation::plain(value_span, text)),
            children: None,
        }))
    }

    fn parse_keyframes_rule(&mut self, start: ScannerState, name: Interpolation) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let keyframes_name = self.interpolated_identifier()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let children = crate::with_flag!(self, in_keyframes, true, { self.parse_block_statements()? });
        Ok(Statement::AtRule(AtRule {
            span: self.scanner.span_from(start),
            name,
            value: Some(keyframes_name),
            children: Some(children),
        }))
    }

    fn parse_moz_document_rule(&mut self, start: ScannerState, name: Interpolation) -> SassResult<Statement> {
        self.logger.warn_for_deprecation(
            DeprecationKind::MozDocument,
            "@-moz-document is deprecated and support will be removed in a future release.",
            name.span,
        );
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.interpolated_declaration_value(DeclarationValueFlags {
            allow_empty: true,
            ..Default::default()
        })?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let children = self.parse_block_statements()?;
        Ok(Statement::AtRule(AtRule {
            span: self.scanner.span_from(start),
            name,
            value: Some(value),
            children: Some(children),
        }))
    }

    fn parse_at_root_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let query = if self.scanner.peek(0) == Some('(') {
            Some(self.parse_at_root_query()?)
        } else {
            None
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let children = self.parse_block_statements()?;
        Ok(Statement::AtRootRule(AtRootRule {
            span: self.scanner.span_from(start),
            query,
            children,
        }))
    }

    fn parse_content_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        if !self.flags.in_mixin {
            return Err(self.scanner.error("@content is only allowed within mixin bodies."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let arguments = if self.scanner.peek(0) == Some('(') {
            self.parse_argument_invocation(false)?
        } else {
            ArgumentInvocation::empty(self.scanner.empty_span())
        };
        self.expect_statement_separator()?;
        Ok(Statement::ContentRule(ContentRule {
            span: self.scanner.span_from(start),
            arguments,
        }))
    }

    fn parse_debug_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.parse_expression_full(None, false, false)?;
        self.expect_statement_separator()?;
        Ok(Statement::DebugRule(DebugRule {
            span: self.scanner.span_from(start),
            value,
        }))
    }

    fn parse_warn_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.parse_expression_full(None, false, false)?;
        self.expect_statement_separator()?;
        Ok(Statement::WarnRule(WarnRule {
            span: self.scanner.span_from(start),
            value,
        }))
    }

    fn parse_error_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.parse_expression_full(None, false, false)?;
        self.expect_statement_separator()?;
        Ok(Statement::ErrorRule(ErrorRule {
            span: self.scanner.span_from(start),
            value,
        }))
    }

    fn parse_extend_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        if !(self.flags.in_style_rule || self.flags.in_mixin || self.flags.in_content_block) {
            return Err(self
                .scanner
                .error("@extend may only be used within style rules."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let selector = self.parse_selector_list()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let optional = if self.scanner.scan_char('!') {
            if !self.scanner.scan_identifier_str("optional") {
                return Err(self.scanner.error("Expected \"optional\"."));
            }
            true
        } else {
            false
        };
        self.expect_statement_separator()?;
        Ok(Statement::ExtendRule(ExtendRule {
            span: self.scanner.span_from(start),
            selector,
            optional,
        }))
    }

    fn parse_each_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let mut variables = vec![self.parse_variable_name()?];
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                variables.push(self.parse_variable_name()?);
            } else {
                self.scanner.restore(save);
                break;
            }
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        if !self.scanner.scan_identifier_str("in") {
            return Err(self.scanner.error("Expected \"in\"."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let list = self.parse_expression_full(None, false, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let body = crate::with_flag!(self, in_control_directive, true, { self.parse_block_statements()? });
        Ok(Statement::EachRule(EachRule {
            span: self.scanner.span_from(start),
            variables,
            list,
            body,
        }))
    }

    fn parse_for_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let variable = self.parse_variable_name()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        if !self.scanner.scan_identifier_str("from") {
            return Err(self.scanner.error("Expected \"from\"."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let from = self.parse_expression_full(Some(super::expression::until_to_or_through), false, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let inclusive = if self.scanner.scan_identifier_str("through") {
            true
        } else if self.scanner.scan_identifier_str("to") {
            false
        } else {
            return Err(self.scanner.error("Expected \"to\" or \"through\"."));
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let to = self.parse_expression_full(None, false, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let body = crate::with_flag!(self, in_control_directive, true, { self.parse_block_statements()? });
        Ok(Statement::ForRule(ForRule {
            span: self.scanner.span_from(start),
            variable,
            from,
            to,
            inclusive,
            body,
        }))
    }

    fn parse_while_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let condition = self.parse_expression_full(None, false, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let body = crate::with_flag!(self, in_control_directive, true, { self.parse_block_statements()? });
        Ok(Statement::WhileRule(WhileRule {
            span: self.scanner.span_from(start),
            condition,
            body,
        }))
    }

    fn parse_if_clause(&mut self) -> SassResult<IfClause> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let condition = self.parse_expression_full(None, false, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let body = crate::with_flag!(self, in_control_directive, true, { self.parse_block_statements()? });
        Ok(IfClause { condition, body })
    }

    fn parse_if_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        let if_indentation = self.current_indentation;
        let mut clauses = vec![self.parse_if_clause()?];
        let mut else_body = None;

        loop {
            match self.scan_else(if_indentation) {
                Some(true) => {
                    self.logger.warn_for_deprecation(
                        DeprecationKind::ElseIf,
                        "@elseif is deprecated and will not be supported in future Sass versions.\nUse \"@else if\" instead.",
                        self.scanner.empty_span(),
                    );
                    clauses.push(self.parse_if_clause()?);
                }
                Some(false) => {
                    let save = self.scanner.state();
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    if self.scanner.scan_identifier_str("if") {
                        clauses.push(self.parse_if_clause()?);
                    } else {
                        self.scanner.restore(save);
                        lexer::whitespace_with_comments(&mut self.scanner)?;
                        let body = crate::with_flag!(self, in_control_directive, true, {
                            self.parse_block_statements()?
                        });
                        else_body = Some(body);
                        break;
                    }
                }
                None => break,
            }
        }

        Ok(Statement::IfRule(IfRule {
            span: self.scanner.span_from(start),
            clauses,
            else_body,
        }))
    }

    pub fn parse_argument_declaration(&mut self) -> SassResult<ArgumentDeclaration> {
        let start = self.scanner.state();
        self.scanner.expect_char('(')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;

        let mut arguments = Vec::new();
        let mut rest = None;
        if self.scanner.peek(0) != Some(')') {
            loop {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                let arg_start = self.scanner.state();
                self.scanner.expect_char('$')?;
                let name = lexer::identifier(&mut self.scanner, true, false)?;
                lexer::whitespace_with_comments(&mut self.scanner)?;

                if self.scanner.scan_str("...") {
                    rest = Some(name);
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    break;
                }

                let default = if self.scanner.scan_char(':') {
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    Some(self.parse_expression_full(None, false, false)?)
                } else {
                    None
                };
                arguments.push(Argument {
                    name,
                    default,
                    span: self.scanner.span_from(arg_start),
                });

                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.scan_char(',') {
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    if self.scanner.peek(0) == Some(')') {
                        break;
                    }
                } else {
                    break;
                }
            }
        }

        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(')')?;
        Ok(ArgumentDeclaration {
            span: self.scanner.span_from(start),
            arguments,
            rest,
        })
    }

    fn parse_function_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        if self.flags.in_mixin || self.flags.in_control_directive {
            return Err(self
                .scanner
                .error("Functions may not be declared in control directives or mixins."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let name_start = self.scanner.state();
        let name = lexer::identifier(&mut self.scanner, true, false)?;
        if crate::parse::RESERVED_FUNCTION_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
            return Err(self
                .scanner
                .error_at(format!("Invalid function name \"{}\".", name), name_start));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let arguments = self.parse_argument_declaration()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let body = crate::with_flag!(self, in_function, true, { self.parse_block_statements()? });
        Ok(Statement::FunctionRule(FunctionRule {
            span: self.scanner.span_from(start),
            name,
            arguments,
            body,
        }))
    }

    fn parse_mixin_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        if self.flags.in_mixin || self.flags.in_function || self.flags.in_control_directive {
            return Err(self
                .scanner
                .error("Mixins may not be declared in control directives, functions, or other mixins."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let name_start = self.scanner.state();
        let name = lexer::identifier(&mut self.scanner, true, false)?;
        if crate::parse::CSS_GLOBAL_FUNCTION_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
            self.logger.warn_for_deprecation(
                DeprecationKind::CssFunctionMixin,
                &format!(
                    "Naming a mixin \"{}\" is deprecated, since it collides with a CSS function of the same name.",
                    name
                ),
                self.scanner.span_from(name_start),
            );
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let arguments = if self.scanner.peek(0) == Some('(') {
            self.parse_argument_declaration()?
        } else {
            ArgumentDeclaration::empty(self.scanner.empty_span())
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let body = crate::with_flag!(self, in_mixin, true, { self.parse_block_statements()? });
        Ok(Statement::MixinRule(MixinRule {
            span: self.scanner.span_from(start),
            name,
            arguments,
            body,
        }))
    }

    fn parse_namespaced_identifier(&mut self) -> SassResult<(Option<String>, String)> {
        let first = lexer::identifier(&mut self.scanner, true, false)?;
        if self.scanner.peek(0) == Some('.') && matches!(self.scanner.peek(1), Some(c) if is_name_start(c)) {
            self.scanner.read();
            let name = lexer::identifier(&mut self.scanner, true, false)?;
            Ok((Some(first), name))
        } else {
            Ok((None, first))
        }
    }

    fn parse_include_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let (namespace, name) = self.parse_namespaced_identifier()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let arguments = if self.scanner.peek(0) == Some('(') {
            self.parse_argument_invocation(false)?
        } else {
            ArgumentInvocation::empty(self.scanner.empty_span())
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;

        let content = if self.looking_at_children() {
            let content_start = self.scanner.state();
            let content_args = if self.scanner.scan_identifier_str("using") {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                self.parse_argument_declaration()?
            } else {
                ArgumentDeclaration::empty(self.scanner.empty_span())
            };
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let body = crate::with_flag!(self, in_content_block, true, { self.parse_block_statements()? });
            Some(ContentBlock {
                span: self.scanner.span_from(content_start),
                arguments: content_args,
                body,
            })
        } else {
            self.expect_statement_separator()?;
            None
        };

        Ok(Statement::IncludeRule(IncludeRule {
            span: self.scanner.span_from(start),
            namespace,
            name,
            arguments,
            content,
        }))
    }

    fn parse_media_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let queries = self.parse_media_query_list()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let children = self.parse_block_statements()?;
        Ok(Statement::MediaRule(MediaRule {
            span: self.scanner.span_from(start),
            queries,
            children,
        }))
    }

    fn parse_return_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        if !self.flags.in_function {
            return Err(self.scanner.error("@return is only allowed within function bodies."));
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.parse_expression_full(None, false, false)?;
        self.expect_statement_separator()?;
        Ok(Statement::ReturnRule(ReturnRule {
            span: self.scanner.span_from(start),
            value,
        }))
    }

    // ---- @supports ---------------------------------------------------

    fn parse_supports_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let condition = self.parse_supports_condition()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let children = self.parse_block_statements()?;
        Ok(Statement::SupportsRule(SupportsRule {
            span: self.scanner.span_from(start),
            condition,
            children,
        }))
    }

    pub fn parse_supports_condition(&mut self) -> SassResult<SupportsCondition> {
        let start = self.scanner.state();
        if self.scanner.scan_identifier_str("not") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let condition = self.parse_supports_condition_in_parens()?;
            return Ok(SupportsCondition::Negation {
                span: self.scanner.span_from(start),
                condition: Box::new(condition),
            });
        }

        let mut left = self.parse_supports_condition_in_parens()?;
        let mut operator: Option<String> = None;
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let op = if self.scanner.scan_identifier_str("and") {
                Some("and")
            } else if self.scanner.scan_identifier_str("or") {
                Some("or")
            } else {
                None
            };
            match op {
                Some(op) => {
                    if let Some(existing) = &operator {
                        if existing != op {
                            return Err(self.scanner.error(
                                "\"and\" and \"or\" may not be used together. Use parentheses to disambiguate.",
                            ));
                        }
                    } else {
                        operator = Some(op.to_string());
                    }
                    lexer::whitespace_with_comments(&mut self.scanner)?;
                    let right = self.parse_supports_condition_in_parens()?;
                    left = SupportsCondition::Operation {
                        span: self.scanner.span_from(start),
                        left: Box::new(left),
                        operator: op.to_string(),
                        right: Box::new(right),
                    };
                }
                None => {
                    self.scanner.restore(save);
                    break;
                }
            }
        }
        Ok(left)
    }

    /// Also used directly by `@import "..." supports(...)`, whose caller
    /// has already consumed the `supports` keyword and leaves the `(`
    /// for this method to read.
    pub fn parse_supports_condition_in_parens(&mut self) -> SassResult<SupportsCondition> {
        let start = self.scanner.state();

        if self.scanner.peek(0) == Some('#') && self.scanner.peek(1) == Some('{') {
            let expr = self.single_interpolation()?;
            let mut builder = InterpolationBuilder::new();
            builder.push_expr(expr);
            let span = self.scanner.span_from(start);
            return Ok(SupportsCondition::Interpolation {
                span,
                value: builder.finish(span),
            });
        }

        if self.scanner.scan_char('(') {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let decl_start = self.scanner.state();
            if let Some(decl) = self.try_parse_supports_declaration(decl_start)? {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                self.scanner.expect_char(')')?;
                return Ok(decl);
            }
            self.scanner.restore(decl_start);

            let nested_start = self.scanner.state();
            if let Ok(inner) = self.parse_supports_condition() {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.scan_char(')') {
                    return Ok(inner);
                }
            }
            self.scanner.restore(nested_start);

            let contents = self.parse_balanced_parens_as_interpolation()?;
            return Ok(SupportsCondition::Anything {
                span: self.scanner.span_from(start),
                contents,
            });
        }

        let name = self.interpolated_identifier()?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char('(')?;
        let arguments = self.parse_balanced_parens_as_interpolation()?;
        Ok(SupportsCondition::Function {
            span: self.scanner.span_from(start),
            name,
            arguments,
        })
    }

    fn try_parse_supports_declaration(&mut self, start: ScannerState) -> SassResult<Option<SupportsCondition>> {
        let name_interp = match self.interpolated_identifier() {
            Ok(n) => n,
            Err(_) => {
                self.scanner.restore(start);
                return Ok(None);
            }
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;
        if !self.scanner.scan_char(':') {
            self.scanner.restore(start);
            return Ok(None);
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = match self.parse_expression_full(None, false, false) {
            Ok(v) => v,
            Err(_) => {
                self.scanner.restore(start);
                return Ok(None);
            }
        };
        let name_span = name_interp.span;
        let name = Expression::String(StringExpression {
            span: name_span,
            text: name_interp,
            quoted: false,
        });
        Ok(Some(SupportsCondition::Declaration {
            span: self.scanner.span_from(start),
            name,
            value,
        }))
    }

    /// Consumes up to and including the matching close paren; must be
    /// called with the opening `(` already read.
    fn parse_balanced_parens_as_interpolation(&mut self) -> SassResult<Interpolation> {
        let start = self.scanner.state();
        let mut builder = InterpolationBuilder::new();
        let mut depth = 1i32;
        loop {
            match self.scanner.peek(0) {
                Some('(') => {
                    depth += 1;
                    self.scanner.read();
                    builder.push_char('(');
                }
                Some(')') => {
                    depth -= 1;
                    self.scanner.read();
                    if depth == 0 {
                        break;
                    }
                    builder.push_char(')');
                }
                Some('#') if self.scanner.peek(1) == Some('{') => {
                    let expr = self.single_interpolation()?;
                    builder.push_expr(expr);
                }
                None => return Err(self.scanner.error("expected \")\".")),
                Some(c) => {
                    self.scanner.read();
                    builder.push_char(c);
                }
            }
        }
        Ok(builder.finish(self.scanner.span_from(start)))
    }

    // ---- @import ----------------------------------------------------

    fn parse_import_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let mut imports = vec![self.parse_single_import()?];
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                imports.push(self.parse_single_import()?);
            } else {
                self.scanner.restore(save);
                break;
            }
        }
        self.expect_statement_separator()?;

        if self.flags.in_control_directive || self.flags.in_mixin || self.flags.in_function {
            if imports.iter().any(|i| matches!(i, Import::Dynamic(_))) {
                return Err(self
                    .scanner
                    .error("Dynamic imports may not appear in control directives or mixins."));
            }
        }

        Ok(Statement::ImportRule(ImportRule {
            span: self.scanner.span_from(start),
            imports,
        }))
    }

    fn parse_single_import(&mut self) -> SassResult<Import> {
        let start = self.scanner.state();

        if matches!(self.scanner.peek(0), Some('"') | Some('\'')) {
            let raw_start = self.scanner.state();
            let text = lexer::string(&mut self.scanner)?;
            let raw_span = self.scanner.span_from(raw_start);
            let looks_like_css = text.ends_with(".css")
                || text.starts_with("http://")
                || text.starts_with("https://")
                || text.starts_with("//");

            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let has_clause = !self.at_end_of_statement() && self.scanner.peek(0) != Some(',');

            if !looks_like_css && !has_clause {
                self.scanner.restore(save);
                return Ok(Import::Dynamic(DynamicImport {
                    span: self.scanner.span_from(start),
                    url: text,
                }));
            }

            let (media, supports) = self.parse_import_clauses()?;
            return Ok(Import::Static(StaticImport {
                span: self.scanner.span_from(start),
                url: Interpolation::plain(raw_span, text),
                media,
                supports,
            }));
        }

        let raw_start = self.scanner.state();
        let url = lexer::try_url(&mut self.scanner)?
            .ok_or_else(|| self.scanner.error("Expected string or \"url(...)\"."))?;
        let raw_span = self.scanner.span_from(raw_start);
        let (media, supports) = self.parse_import_clauses()?;
        Ok(Import::Static(StaticImport {
            span: self.scanner.span_from(start),
            url: Interpolation::plain(raw_span, url),
            media,
            supports,
        }))
    }

    fn parse_import_clauses(&mut self) -> SassResult<(Option<Vec<CssMediaQuery>>, Option<SupportsCondition>)> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let supports = if self.scanner.scan_identifier_str("supports") {
            Some(self.parse_supports_condition_in_parens()?)
        } else {
            None
        };
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let media = if !self.at_end_of_statement() && self.scanner.peek(0) != Some(',') {
            Some(self.parse_media_query_list()?)
        } else {
            None
        };
        Ok((media, supports))
    }

    // ---- @use / @forward ---------------------------------------------

    fn parse_configured_variables(&mut self) -> SassResult<Vec<ConfiguredVariable>> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        if self.scanner.scan_char(')') {
            return Ok(Vec::new());
        }
        let mut out = vec![self.parse_one_configured_variable()?];
        loop {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                if self.scanner.peek(0) == Some(')') {
                    break;
                }
                out.push(self.parse_one_configured_variable()?);
            } else {
                break;
            }
        }
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(')')?;
        Ok(out)
    }

    fn parse_one_configured_variable(&mut self) -> SassResult<ConfiguredVariable> {
        let start = self.scanner.state();
        self.scanner.expect_char('$')?;
        let name = lexer::identifier(&mut self.scanner, true, false)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        self.scanner.expect_char(':')?;
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let value = self.parse_expression_full(None, false, false)?;

        let save = self.scanner.state();
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let guarded = if self.scanner.scan_char('!') {
            if !self.scanner.scan_identifier_str("default") {
                return Err(self.scanner.error("Expected \"default\"."));
            }
            true
        } else {
            self.scanner.restore(save);
            false
        };

        Ok(ConfiguredVariable {
            span: self.scanner.span_from(start),
            name,
            value,
            guarded,
        })
    }

    fn parse_use_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let url = lexer::string(&mut self.scanner)?;
        let mut namespace = Some(default_namespace_from_url(&url));

        lexer::whitespace_with_comments(&mut self.scanner)?;
        if self.scanner.scan_identifier_str("as") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char('*') {
                namespace = None;
            } else {
                namespace = Some(lexer::identifier(&mut self.scanner, true, false)?);
            }
            lexer::whitespace_with_comments(&mut self.scanner)?;
        }

        let configuration = if self.scanner.scan_identifier_str("with") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            self.scanner.expect_char('(')?;
            self.parse_configured_variables()?
        } else {
            Vec::new()
        };

        self.expect_statement_separator()?;
        Ok(Statement::UseRule(UseRule {
            span: self.scanner.span_from(start),
            url,
            namespace,
            configuration,
        }))
    }

    fn parse_identifier_list(&mut self) -> SassResult<Vec<String>> {
        let mut names = vec![lexer::identifier(&mut self.scanner, true, false)?];
        loop {
            let save = self.scanner.state();
            lexer::whitespace_with_comments(&mut self.scanner)?;
            if self.scanner.scan_char(',') {
                lexer::whitespace_with_comments(&mut self.scanner)?;
                names.push(lexer::identifier(&mut self.scanner, true, false)?);
            } else {
                self.scanner.restore(save);
                break;
            }
        }
        Ok(names)
    }

    fn parse_forward_rule(&mut self, start: ScannerState) -> SassResult<Statement> {
        lexer::whitespace_with_comments(&mut self.scanner)?;
        let url = lexer::string(&mut self.scanner)?;
        lexer::whitespace_with_comments(&mut self.scanner)?;

        let mut prefix = None;
        if self.scanner.scan_identifier_str("as") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            let name = lexer::identifier(&mut self.scanner, true, false)?;
            self.scanner.expect_char('*')?;
            prefix = Some(name);
            lexer::whitespace_with_comments(&mut self.scanner)?;
        }

        let filter = if self.scanner.scan_identifier_str("show") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            ForwardMemberFilter::Show(self.parse_identifier_list()?)
        } else if self.scanner.scan_identifier_str("hide") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            ForwardMemberFilter::Hide(self.parse_identifier_list()?)
        } else {
            ForwardMemberFilter::None
        };

        lexer::whitespace_with_comments(&mut self.scanner)?;
        let configuration = if self.scanner.scan_identifier_str("with") {
            lexer::whitespace_with_comments(&mut self.scanner)?;
            self.scanner.expect_char('(')?;
            self.parse_configured_variables()?
        } else {
            Vec::new()
        };

        self.expect_statement_separator()?;
        Ok(Statement::ForwardRule(ForwardRule {
            span: self.scanner.span_from(start),
            url,
            prefix,
            filter,
            configuration,
        }))
    }
}

/// `a/b/_name.scss` -> `name`: strips the directory, the partial-file `_`
/// prefix, and the extension (spec.md §4.5 "@use default namespace").
fn default_namespace_from_url(url: &str) -> String {
    let base = url.rsplit('/').next().unwrap_or(url);
    let base = base.strip_prefix('_').unwrap_or(base);
    base.split('.').next().unwrap_or(base).to_string()
}

fn concat_dashed(parent: &Interpolation, suffix: &Interpolation, span: codemap::Span) -> Interpolation {
    let mut contents = parent.contents.clone();
    contents.push(crate::interpolation::InterpolationItem::Literal("-".to_string()));
    contents.extend(suffix.contents.clone());
    Interpolation::new(span, contents)
}
