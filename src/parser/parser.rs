//! Recursive descent parser for Java source
//!
//! The parser never fails as a whole. Productions return [`PResult`] and unwind with `?` to the
//! nearest recovery point (top level, class body, block, switch body, fragment entry), which
//! reports the error to the listener, skips to a synchronization token and leaves an error
//! marker node in the tree.

use std::sync::Arc;

use super::error::{ErrorRecovery, PResult, ParseError};
use super::lexer::{Lexer, LexicalToken, Token};
use crate::ast::*;
use crate::config::DEFAULT_MAX_ERRORS;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticListener, Severity};
use crate::source::SourceFile;

/// Flags controlling one parser instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    pub allow_error_recovery: bool,
    pub keep_doc_comments: bool,
    pub report_deprecation: bool,
    pub max_errors: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_error_recovery: true,
            keep_doc_comments: true,
            report_deprecation: true,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

/// Modifiers, annotations and doc comment collected in front of a declaration
#[derive(Debug, Default)]
pub(super) struct Modifiers {
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub doc: Option<String>,
    pub start: Location,
}

impl Modifiers {
    fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.annotations.is_empty()
    }
}

/// One item at the top level of a compilation unit
enum TopLevelItem {
    Package(PackageDecl),
    Import(ImportDecl),
    Module(ModuleDecl),
    Form(TopLevel),
}

/// Parser for Java source
pub struct Parser<'a> {
    pub(super) tokens: Vec<LexicalToken>,
    pub(super) current: usize,
    pub(super) source: &'a SourceFile,
    source_name: Arc<str>,
    listener: &'a mut dyn DiagnosticListener,
    options: ParserOptions,
    recovery: ErrorRecovery,
    eof: Location,
    /// Set while parsing `case` labels, where `x -> ...` is not a lambda
    pub(super) no_lambda: bool,
}

impl<'a> Parser<'a> {
    /// Tokenize `source`; lexical errors are reported to `listener` right away
    pub fn new(source: &'a SourceFile, options: ParserOptions, listener: &'a mut dyn DiagnosticListener) -> Self {
        let (tokens, lex_errors) = Lexer::new(source)
            .keep_doc_comments(options.keep_doc_comments)
            .tokenize();
        let mut parser = Self {
            tokens,
            current: 0,
            source,
            source_name: source.shared_name(),
            listener,
            options,
            recovery: ErrorRecovery::new(options.allow_error_recovery, options.max_errors),
            eof: source.location_at(source.content().len()),
            no_lambda: false,
        };
        for error in lex_errors {
            let (code, message) = error.error.describe(&error.text);
            parser.report(ParseError::new(code, message, error.span));
        }
        parser
    }

    /// Number of errors reported so far, lexical ones included
    pub fn error_count(&self) -> usize {
        self.recovery.error_count
    }

    /// Parse a whole compilation unit
    pub fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut package_decl: Option<PackageDecl> = None;
        let mut imports = Vec::new();
        let mut module_decl: Option<ModuleDecl> = None;
        let mut type_decls = Vec::new();

        while !self.is_at_end() {
            if !self.recovery.should_continue() {
                type_decls.push(TopLevel::Erroneous(self.absorb_rest()));
                break;
            }

            let before = self.current;
            let item = match self.parse_top_level_item() {
                Ok(item) => item,
                Err(e) => {
                    self.report(e);
                    let span = self.synchronize_toplevel(before);
                    type_decls.push(TopLevel::Erroneous(ErroneousNode { span }));
                    continue;
                }
            };

            let nothing_before = package_decl.is_none() && imports.is_empty() && type_decls.is_empty();
            match item {
                TopLevelItem::Package(package) if nothing_before && module_decl.is_none() => {
                    package_decl = Some(package);
                }
                TopLevelItem::Import(import) if type_decls.is_empty() && module_decl.is_none() => {
                    imports.push(import);
                }
                TopLevelItem::Module(module) if module_decl.is_none() && type_decls.is_empty() => {
                    module_decl = Some(module);
                }
                TopLevelItem::Form(form) => type_decls.push(form),
                TopLevelItem::Package(PackageDecl { span, .. })
                | TopLevelItem::Import(ImportDecl { span, .. })
                | TopLevelItem::Module(ModuleDecl { span, .. }) => {
                    self.report(ParseError::expected_type_decl(Span::point(span.start)));
                    type_decls.push(TopLevel::Erroneous(ErroneousNode { span }));
                }
            }
        }

        CompilationUnit {
            package_decl,
            imports,
            module_decl,
            type_decls,
            span: Span::new(self.source.location_at(0), self.eof),
            source_file: None,
        }
    }

    /// Parse the whole input as one expression
    pub fn parse_expression(&mut self) -> Expr {
        let expr = match self.parse_expr() {
            Ok(expr) => expr,
            Err(e) => {
                self.report(e);
                Expr::Erroneous(self.absorb_rest())
            }
        };
        self.finish_fragment();
        expr
    }

    /// Parse the whole input as one type, represented in the expression family
    pub fn parse_type_use(&mut self) -> Expr {
        let expr = match self.parse_type_ref() {
            Ok(type_ref) => Expr::Type(type_ref),
            Err(e) => {
                self.report(e);
                Expr::Erroneous(self.absorb_rest())
            }
        };
        self.finish_fragment();
        expr
    }

    fn finish_fragment(&mut self) {
        if self.is_at_end() {
            return;
        }
        if self.recovery.should_continue() {
            let span = self.current_span();
            self.report(ParseError::new(DiagnosticCode::TrailingInput, "unexpected trailing input", span));
        }
        self.absorb_rest();
    }

    // Diagnostics

    pub(super) fn report(&mut self, error: ParseError) {
        if !self.recovery.add_error(error.span.start.offset) {
            return;
        }
        let span = error.span;
        log::trace!("syntax error at {}: {}", span, error.message);
        self.listener.report(error.into_diagnostic(Arc::clone(&self.source_name)));

        if self.recovery.hit_limit() {
            self.listener.report(Diagnostic::new(
                Severity::Note,
                DiagnosticCode::TooManyErrors,
                "too many errors; parsing stopped",
                span,
                Arc::clone(&self.source_name),
            ));
        }
    }

    fn warn(&mut self, code: DiagnosticCode, message: &str, span: Span) {
        if self.recovery.should_continue() {
            self.listener
                .report(Diagnostic::warning(code, message, span, Arc::clone(&self.source_name)));
        }
    }

    /// Error for a missing token: javac points just past the previous token
    pub(super) fn expected_error(&self, what: &str) -> ParseError {
        if self.is_at_end() {
            return ParseError::premature_eof(Span::point(self.eof));
        }
        let position = match self.current.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(prev) => Span::point(prev.span.end),
            None => self.current_span(),
        };
        ParseError::expected(what, position)
    }

    /// Error at the current token, or end of file
    pub(super) fn error_here(&self, make: fn(Span) -> ParseError) -> ParseError {
        if self.is_at_end() {
            ParseError::premature_eof(Span::point(self.eof))
        } else {
            make(self.current_span())
        }
    }

    /// Report a missing token and carry on as if it were there
    pub(super) fn expect_soft(&mut self, token_type: &Token, what: &str) {
        if !self.match_token(token_type) {
            let error = self.expected_error(what);
            self.report(error);
        }
    }

    fn close_brace(&mut self) {
        self.expect_soft(&Token::RBrace, "'}'");
    }

    // Helper methods

    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    pub(super) fn peek(&self) -> Option<&LexicalToken> {
        self.tokens.get(self.current)
    }

    pub(super) fn peek_token_type(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx).map(|t| t.token_type())
    }

    /// Token type `n` positions after the current one
    pub(super) fn nth(&self, n: usize) -> Option<&Token> {
        self.peek_token_type(self.current + n)
    }

    pub(super) fn check(&self, token_type: &Token) -> bool {
        self.peek().map_or(false, |t| t.token_type() == token_type)
    }

    pub(super) fn check_word(&self, word: &str) -> bool {
        self.peek().map_or(false, |t| t.is_word(word))
    }

    pub(super) fn word_at(&self, idx: usize, word: &str) -> bool {
        self.tokens.get(idx).map_or(false, |t| t.is_word(word))
    }

    pub(super) fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Consume the current token and return its text
    pub(super) fn take_lexeme(&mut self) -> String {
        let lexeme = self.peek().map(|t| t.lexeme.clone()).unwrap_or_default();
        self.advance();
        lexeme
    }

    pub(super) fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn consume(&mut self, token_type: &Token, what: &str) -> PResult<()> {
        if self.match_token(token_type) {
            Ok(())
        } else {
            Err(self.expected_error(what))
        }
    }

    pub(super) fn current_span(&self) -> Span {
        match self.peek() {
            Some(token) => token.span,
            None => Span::point(self.eof),
        }
    }

    pub(super) fn start(&self) -> Location {
        self.current_span().start
    }

    /// Span from `start` to the end of the last consumed token
    pub(super) fn span_from(&self, start: Location) -> Span {
        let end = self
            .current
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(start, |t| t.span.end);
        Span::new(start, end.max(start))
    }

    pub(super) fn parse_identifier(&mut self) -> PResult<String> {
        if self.check(&Token::Identifier) {
            Ok(self.take_lexeme())
        } else {
            Err(self.expected_error("<identifier>"))
        }
    }

    pub(super) fn parse_qualified_name(&mut self) -> PResult<String> {
        let mut name = self.parse_identifier()?;
        while self.check(&Token::Dot) && self.nth(1) == Some(&Token::Identifier) {
            self.advance();
            name.push('.');
            name.push_str(&self.take_lexeme());
        }
        Ok(name)
    }

    // Recovery

    /// Consume one token, or a whole bracketed group when standing on an opener
    pub(super) fn skip_balanced(&mut self) {
        let (open, close) = match self.peek_token_type(self.current) {
            Some(Token::LBrace) => (Token::LBrace, Token::RBrace),
            Some(Token::LParen) => (Token::LParen, Token::RParen),
            Some(Token::LBracket) => (Token::LBracket, Token::RBracket),
            _ => {
                self.advance();
                return;
            }
        };
        let mut depth = 0usize;
        while let Some(token) = self.peek_token_type(self.current).cloned() {
            if token == open {
                depth += 1;
            } else if token == close {
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    return;
                }
            }
            self.advance();
        }
    }

    /// Span of everything skipped since `before`
    fn skipped_span(&self, before: usize) -> Span {
        let start = self
            .tokens
            .get(before)
            .map_or(self.eof, |t| t.span.start);
        self.span_from(start)
    }

    /// Swallow all remaining input into one error marker
    pub(super) fn absorb_rest(&mut self) -> ErroneousNode {
        let before = self.current;
        self.current = self.tokens.len();
        ErroneousNode { span: self.skipped_span(before) }
    }

    fn synchronize_toplevel(&mut self, before: usize) -> Span {
        if self.current == before {
            self.skip_balanced();
        }
        while let Some(token) = self.peek_token_type(self.current).cloned() {
            match token {
                Token::Semicolon => {
                    self.advance();
                    break;
                }
                Token::LBrace => {
                    self.skip_balanced();
                    break;
                }
                Token::Package | Token::Import | Token::Class | Token::Interface | Token::Enum | Token::At => break,
                t if t.is_modifier() => break,
                _ => self.advance(),
            }
        }
        log::trace!("top-level recovery resumed at token {}", self.current);
        self.skipped_span(before)
    }

    fn synchronize_in_class_body(&mut self, before: usize) -> Span {
        if self.current == before {
            self.skip_balanced();
        }
        while let Some(token) = self.peek_token_type(self.current).cloned() {
            match token {
                Token::Semicolon => {
                    self.advance();
                    break;
                }
                Token::RBrace => break,
                Token::LBrace => {
                    self.skip_balanced();
                    break;
                }
                Token::Class | Token::Interface | Token::Enum | Token::At | Token::Void => break,
                t if t.is_modifier() => break,
                _ => self.advance(),
            }
        }
        self.skipped_span(before)
    }

    fn synchronize_in_block(&mut self, before: usize, in_switch: bool) -> Span {
        if self.current == before {
            self.skip_balanced();
        }
        while let Some(token) = self.peek_token_type(self.current).cloned() {
            match token {
                Token::Semicolon => {
                    self.advance();
                    break;
                }
                Token::RBrace => break,
                Token::Case | Token::Default if in_switch => break,
                Token::LBrace => self.skip_balanced(),
                Token::If | Token::While | Token::Do | Token::For | Token::Try | Token::Switch
                | Token::Return | Token::Throw | Token::Break | Token::Continue => break,
                _ => self.advance(),
            }
        }
        self.skipped_span(before)
    }

    // Compilation unit

    fn parse_top_level_item(&mut self) -> PResult<TopLevelItem> {
        if self.check(&Token::Semicolon) {
            let span = self.current_span();
            self.advance();
            return Ok(TopLevelItem::Form(TopLevel::Empty(span)));
        }
        if self.check(&Token::Import) {
            return Ok(TopLevelItem::Import(self.parse_import_decl()?));
        }

        let mods = self.parse_modifiers()?;
        if self.check(&Token::Package) && mods.modifiers.is_empty() {
            return Ok(TopLevelItem::Package(self.parse_package_decl(mods)?));
        }
        if mods.modifiers.is_empty() && self.is_module_start() {
            return Ok(TopLevelItem::Module(self.parse_module_decl(mods)?));
        }
        if self.is_type_decl_start() {
            let decl = self.parse_type_decl(mods)?;
            return Ok(TopLevelItem::Form(TopLevel::Type(decl)));
        }
        Err(self.error_here(ParseError::expected_type_decl))
    }

    fn parse_package_decl(&mut self, mods: Modifiers) -> PResult<PackageDecl> {
        let start = if mods.is_empty() { self.start() } else { mods.start };
        self.consume(&Token::Package, "'package'")?;
        let name = self.parse_qualified_name()?;
        self.expect_soft(&Token::Semicolon, "';'");
        Ok(PackageDecl {
            annotations: mods.annotations,
            name,
            span: self.span_from(start),
        })
    }

    fn parse_import_decl(&mut self) -> PResult<ImportDecl> {
        let start = self.start();
        self.consume(&Token::Import, "'import'")?;
        let is_static = self.match_token(&Token::Static);
        let mut name = self.parse_identifier()?;
        let mut is_wildcard = false;
        while self.match_token(&Token::Dot) {
            if self.match_token(&Token::Star) {
                is_wildcard = true;
                break;
            }
            name.push('.');
            name.push_str(&self.parse_identifier()?);
        }
        self.expect_soft(&Token::Semicolon, "';'");
        Ok(ImportDecl {
            name,
            is_static,
            is_wildcard,
            span: self.span_from(start),
        })
    }

    fn is_module_start(&self) -> bool {
        let i = if self.check_word("open") { self.current + 1 } else { self.current };
        self.word_at(i, "module") && self.peek_token_type(i + 1) == Some(&Token::Identifier)
    }

    fn parse_module_decl(&mut self, mods: Modifiers) -> PResult<ModuleDecl> {
        let start = if mods.is_empty() { self.start() } else { mods.start };
        let is_open = self.check_word("open");
        if is_open {
            self.advance();
        }
        self.advance(); // module
        let name = self.parse_qualified_name()?;
        self.consume(&Token::LBrace, "'{'")?;

        let mut directives = Vec::new();
        while !self.check(&Token::RBrace) && !self.is_at_end() {
            directives.push(self.parse_module_directive()?);
        }
        self.close_brace();

        Ok(ModuleDecl {
            annotations: mods.annotations,
            is_open,
            name,
            directives,
            span: self.span_from(start),
        })
    }

    fn parse_module_directive(&mut self) -> PResult<ModuleDirective> {
        let start = self.start();
        let keyword = match self.peek() {
            Some(t) if t.token == Token::Identifier => t.lexeme.clone(),
            _ => return Err(self.expected_error("'requires', 'exports', 'opens', 'uses', or 'provides'")),
        };

        let directive = match keyword.as_str() {
            "requires" => {
                self.advance();
                let mut is_transitive = false;
                let mut is_static = false;
                loop {
                    // `requires transitive;` names a module called transitive
                    if self.check_word("transitive") && self.nth(1) != Some(&Token::Semicolon)
                        && self.nth(1) != Some(&Token::Dot)
                    {
                        self.advance();
                        is_transitive = true;
                    } else if self.match_token(&Token::Static) {
                        is_static = true;
                    } else {
                        break;
                    }
                }
                let module = self.parse_qualified_name()?;
                self.expect_soft(&Token::Semicolon, "';'");
                ModuleDirective::Requires { is_transitive, is_static, module, span: self.span_from(start) }
            }
            "exports" | "opens" => {
                self.advance();
                let package = self.parse_qualified_name()?;
                let mut to = Vec::new();
                if self.check_word("to") {
                    self.advance();
                    to = self.parse_name_list()?;
                }
                self.expect_soft(&Token::Semicolon, "';'");
                let span = self.span_from(start);
                if keyword == "exports" {
                    ModuleDirective::Exports { package, to, span }
                } else {
                    ModuleDirective::Opens { package, to, span }
                }
            }
            "uses" => {
                self.advance();
                let service = self.parse_qualified_name()?;
                self.expect_soft(&Token::Semicolon, "';'");
                ModuleDirective::Uses { service, span: self.span_from(start) }
            }
            "provides" => {
                self.advance();
                let service = self.parse_qualified_name()?;
                if !self.check_word("with") {
                    return Err(self.expected_error("'with'"));
                }
                self.advance();
                let with = self.parse_name_list()?;
                self.expect_soft(&Token::Semicolon, "';'");
                ModuleDirective::Provides { service, with, span: self.span_from(start) }
            }
            _ => return Err(self.expected_error("'requires', 'exports', 'opens', 'uses', or 'provides'")),
        };
        Ok(directive)
    }

    fn parse_name_list(&mut self) -> PResult<Vec<String>> {
        let mut names = vec![self.parse_qualified_name()?];
        while self.match_token(&Token::Comma) {
            names.push(self.parse_qualified_name()?);
        }
        Ok(names)
    }

    // Declarations

    pub(super) fn parse_modifiers(&mut self) -> PResult<Modifiers> {
        let mut mods = Modifiers {
            start: self.start(),
            doc: self.peek().and_then(|t| t.doc.clone()),
            ..Modifiers::default()
        };

        loop {
            let Some(token) = self.peek_token_type(self.current).cloned() else { break };
            let modifier = match token {
                Token::At if self.nth(1) != Some(&Token::Interface) => {
                    let annotation = self.parse_annotation()?;
                    mods.annotations.push(annotation);
                    continue;
                }
                Token::Public => Modifier::Public,
                Token::Protected => Modifier::Protected,
                Token::Private => Modifier::Private,
                Token::Abstract => Modifier::Abstract,
                Token::Static => Modifier::Static,
                Token::Final => Modifier::Final,
                Token::Native => Modifier::Native,
                Token::Synchronized => Modifier::Synchronized,
                Token::Transient => Modifier::Transient,
                Token::Volatile => Modifier::Volatile,
                Token::Strictfp => Modifier::Strictfp,
                Token::Default => Modifier::Default,
                Token::Identifier if self.is_sealed_modifier(self.current) => Modifier::Sealed,
                Token::Identifier if self.is_non_sealed_modifier() => {
                    self.current += 3;
                    mods.modifiers.push(Modifier::NonSealed);
                    continue;
                }
                _ => break,
            };
            self.advance();
            mods.modifiers.push(modifier);
        }
        Ok(mods)
    }

    fn is_sealed_modifier(&self, idx: usize) -> bool {
        if !self.word_at(idx, "sealed") {
            return false;
        }
        match self.peek_token_type(idx + 1) {
            Some(Token::Class | Token::Interface | Token::At) => true,
            Some(t) if t.is_modifier() => true,
            Some(Token::Identifier) => {
                self.word_at(idx + 1, "sealed") || self.word_at(idx + 1, "record") || self.word_at(idx + 1, "non")
            }
            _ => false,
        }
    }

    /// `non-sealed` arrives as three adjacent tokens
    fn is_non_sealed_modifier(&self) -> bool {
        let (Some(non), Some(dash), Some(sealed)) = (
            self.tokens.get(self.current),
            self.tokens.get(self.current + 1),
            self.tokens.get(self.current + 2),
        ) else {
            return false;
        };
        non.is_word("non")
            && dash.token == Token::Minus
            && sealed.is_word("sealed")
            && non.span.end.offset == dash.span.start.offset
            && dash.span.end.offset == sealed.span.start.offset
    }

    pub(super) fn is_record_start(&self) -> bool {
        self.check_word("record")
            && self.nth(1) == Some(&Token::Identifier)
            && matches!(self.nth(2), Some(Token::LParen | Token::Lt))
    }

    pub(super) fn is_type_decl_start(&self) -> bool {
        match self.peek_token_type(self.current) {
            Some(Token::Class | Token::Interface | Token::Enum) => true,
            Some(Token::At) => self.nth(1) == Some(&Token::Interface),
            Some(Token::Identifier) => self.is_record_start(),
            _ => false,
        }
    }

    fn check_deprecation(&mut self, mods: &Modifiers, span: Span) {
        if !self.options.report_deprecation {
            return;
        }
        let documented = mods.doc.as_deref().map_or(false, |doc| doc.contains("@deprecated"));
        if documented && !mods.annotations.iter().any(Annotation::is_deprecated) {
            self.warn(
                DiagnosticCode::MissingDeprecatedAnnotation,
                "deprecated item is not annotated with @Deprecated",
                span,
            );
        }
    }

    pub(super) fn parse_type_decl(&mut self, mods: Modifiers) -> PResult<TypeDecl> {
        match self.peek_token_type(self.current) {
            Some(Token::Class) => Ok(TypeDecl::Class(self.parse_class_decl(mods)?)),
            Some(Token::Interface) => Ok(TypeDecl::Interface(self.parse_interface_decl(mods)?)),
            Some(Token::Enum) => Ok(TypeDecl::Enum(self.parse_enum_decl(mods)?)),
            Some(Token::At) => Ok(TypeDecl::Annotation(self.parse_annotation_decl(mods)?)),
            Some(Token::Identifier) if self.is_record_start() => Ok(TypeDecl::Record(self.parse_record_decl(mods)?)),
            _ => Err(self.error_here(ParseError::expected_type_decl)),
        }
    }

    /// Name of the declaration being opened, checked for deprecation markup
    fn parse_decl_name(&mut self, mods: &Modifiers) -> PResult<String> {
        let span = self.current_span();
        let name = self.parse_identifier()?;
        self.check_deprecation(mods, span);
        Ok(name)
    }

    fn parse_class_decl(&mut self, mods: Modifiers) -> PResult<ClassDecl> {
        self.consume(&Token::Class, "'class'")?;
        let name = self.parse_decl_name(&mods)?;
        let type_params = if self.check(&Token::Lt) { self.parse_type_params()? } else { Vec::new() };
        let extends = if self.match_token(&Token::Extends) { Some(self.parse_type_ref()?) } else { None };
        let implements = if self.match_token(&Token::Implements) { self.parse_type_list()? } else { Vec::new() };
        let permits = self.parse_permits()?;
        let body = self.parse_class_body(&name)?;

        Ok(ClassDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            name,
            type_params,
            extends,
            implements,
            permits,
            body,
        })
    }

    fn parse_interface_decl(&mut self, mods: Modifiers) -> PResult<InterfaceDecl> {
        self.consume(&Token::Interface, "'interface'")?;
        let name = self.parse_decl_name(&mods)?;
        let type_params = if self.check(&Token::Lt) { self.parse_type_params()? } else { Vec::new() };
        let extends = if self.match_token(&Token::Extends) { self.parse_type_list()? } else { Vec::new() };
        let permits = self.parse_permits()?;
        let body = self.parse_class_body(&name)?;

        Ok(InterfaceDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            name,
            type_params,
            extends,
            permits,
            body,
        })
    }

    fn parse_permits(&mut self) -> PResult<Vec<TypeRef>> {
        if self.check_word("permits") {
            self.advance();
            self.parse_type_list()
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_enum_decl(&mut self, mods: Modifiers) -> PResult<EnumDecl> {
        self.consume(&Token::Enum, "'enum'")?;
        let name = self.parse_decl_name(&mods)?;
        let implements = if self.match_token(&Token::Implements) { self.parse_type_list()? } else { Vec::new() };
        self.consume(&Token::LBrace, "'{'")?;

        let mut constants = Vec::new();
        while !self.check(&Token::Semicolon) && !self.check(&Token::RBrace) && !self.is_at_end() {
            constants.push(self.parse_enum_constant()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }

        let body = if self.match_token(&Token::Semicolon) {
            self.parse_class_members(&name)
        } else {
            Vec::new()
        };
        self.close_brace();

        Ok(EnumDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            name,
            implements,
            constants,
            body,
        })
    }

    fn parse_enum_constant(&mut self) -> PResult<EnumConstant> {
        let start = self.start();
        let mut annotations = Vec::new();
        while self.check(&Token::At) {
            annotations.push(self.parse_annotation()?);
        }
        let name = self.parse_identifier()?;
        let arguments = if self.check(&Token::LParen) { Some(self.parse_arguments()?) } else { None };
        let body = if self.check(&Token::LBrace) { Some(self.parse_class_body("")?) } else { None };
        Ok(EnumConstant {
            annotations,
            name,
            arguments,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_record_decl(&mut self, mods: Modifiers) -> PResult<RecordDecl> {
        self.advance(); // record
        let name = self.parse_decl_name(&mods)?;
        let type_params = if self.check(&Token::Lt) { self.parse_type_params()? } else { Vec::new() };
        let components = self.parse_formal_parameters()?;
        let implements = if self.match_token(&Token::Implements) { self.parse_type_list()? } else { Vec::new() };
        let body = self.parse_class_body(&name)?;

        Ok(RecordDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            name,
            type_params,
            components,
            implements,
            body,
        })
    }

    fn parse_annotation_decl(&mut self, mods: Modifiers) -> PResult<AnnotationDecl> {
        self.consume(&Token::At, "'@'")?;
        self.consume(&Token::Interface, "'interface'")?;
        let name = self.parse_decl_name(&mods)?;
        let body = self.parse_class_body(&name)?;

        Ok(AnnotationDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            name,
            body,
        })
    }

    pub(super) fn parse_class_body(&mut self, class_name: &str) -> PResult<Vec<ClassMember>> {
        self.consume(&Token::LBrace, "'{'")?;
        let members = self.parse_class_members(class_name);
        self.close_brace();
        Ok(members)
    }

    fn parse_class_members(&mut self, class_name: &str) -> Vec<ClassMember> {
        let mut members = Vec::new();
        while !self.check(&Token::RBrace) && !self.is_at_end() && self.recovery.should_continue() {
            if self.match_token(&Token::Semicolon) {
                continue;
            }
            let before = self.current;
            match self.parse_class_member(class_name) {
                Ok(member) => members.push(member),
                Err(e) => {
                    self.report(e);
                    let span = self.synchronize_in_class_body(before);
                    members.push(ClassMember::Erroneous(ErroneousNode { span }));
                }
            }
        }
        members
    }

    fn parse_class_member(&mut self, class_name: &str) -> PResult<ClassMember> {
        let mods = self.parse_modifiers()?;

        if self.check(&Token::LBrace) {
            let body = self.parse_block()?;
            return Ok(ClassMember::Initializer(InitializerBlock {
                is_static: mods.has(Modifier::Static),
                body,
                span: self.span_from(mods.start),
            }));
        }
        if self.is_type_decl_start() {
            return Ok(ClassMember::TypeDecl(self.parse_type_decl(mods)?));
        }

        let type_params = if self.check(&Token::Lt) { self.parse_type_params()? } else { Vec::new() };

        if self.check(&Token::Identifier) && self.nth(1) == Some(&Token::LParen) {
            return Ok(ClassMember::Constructor(self.parse_constructor_decl(mods, type_params, class_name)?));
        }
        if self.check(&Token::Identifier)
            && self.nth(1) == Some(&Token::LBrace)
            && self.peek().map_or(false, |t| t.lexeme == class_name)
        {
            return Ok(ClassMember::Constructor(self.parse_compact_constructor(mods)?));
        }

        let return_type = if self.match_token(&Token::Void) { None } else { Some(self.parse_type_ref()?) };

        let name_span = self.current_span();
        let name = if self.check(&Token::Identifier) {
            self.take_lexeme()
        } else if self.check(&Token::LParen) {
            // `void () {}`: report and keep the method
            let error = self.expected_error("<identifier>");
            self.report(error);
            "<error>".to_string()
        } else {
            return Err(self.expected_error("<identifier>"));
        };
        self.check_deprecation(&mods, name_span);

        if self.check(&Token::LParen) {
            return Ok(ClassMember::Method(self.parse_method_rest(mods, type_params, return_type, name)?));
        }

        match return_type {
            Some(type_ref) => Ok(ClassMember::Field(self.parse_field_rest(mods, type_ref, name, name_span)?)),
            None => Err(self.expected_error("'('")),
        }
    }

    fn parse_constructor_decl(&mut self, mods: Modifiers, type_params: Vec<TypeParam>, class_name: &str) -> PResult<ConstructorDecl> {
        let name_span = self.current_span();
        let name = self.take_lexeme();
        if name != class_name {
            self.report(ParseError::new(
                DiagnosticCode::InvalidMethDecl,
                "invalid method declaration; return type required",
                name_span,
            ));
        }
        self.check_deprecation(&mods, name_span);
        let parameters = self.parse_formal_parameters()?;
        let throws = if self.match_token(&Token::Throws) { self.parse_type_list()? } else { Vec::new() };
        let body = self.parse_block()?;

        Ok(ConstructorDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            type_params,
            name,
            parameters,
            throws,
            body,
            compact: false,
        })
    }

    fn parse_compact_constructor(&mut self, mods: Modifiers) -> PResult<ConstructorDecl> {
        let name = self.take_lexeme();
        let body = self.parse_block()?;
        Ok(ConstructorDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            type_params: Vec::new(),
            name,
            parameters: Vec::new(),
            throws: Vec::new(),
            body,
            compact: true,
        })
    }

    fn parse_method_rest(
        &mut self,
        mods: Modifiers,
        type_params: Vec<TypeParam>,
        mut return_type: Option<TypeRef>,
        name: String,
    ) -> PResult<MethodDecl> {
        let parameters = self.parse_formal_parameters()?;
        // Legacy `int m()[]` form
        let extra_dims = self.parse_dims();
        if let Some(ref mut t) = return_type {
            t.array_dims += extra_dims;
        }
        let throws = if self.match_token(&Token::Throws) { self.parse_type_list()? } else { Vec::new() };
        let default_value = if self.match_token(&Token::Default) { Some(self.parse_element_value()?) } else { None };
        let body = if self.check(&Token::LBrace) {
            Some(self.parse_block()?)
        } else {
            self.expect_soft(&Token::Semicolon, "';'");
            None
        };

        Ok(MethodDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            type_params,
            return_type,
            name,
            parameters,
            throws,
            body,
            default_value,
        })
    }

    fn parse_field_rest(&mut self, mods: Modifiers, type_ref: TypeRef, name: String, name_span: Span) -> PResult<FieldDecl> {
        let variables = self.parse_declarators_after(name, name_span.start)?;
        self.expect_soft(&Token::Semicolon, "';'");
        Ok(FieldDecl {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            doc: mods.doc,
            type_ref,
            variables,
        })
    }

    /// Declarators of a field or local variable whose first name was already consumed
    fn parse_declarators_after(&mut self, name: String, start: Location) -> PResult<Vec<VariableDeclarator>> {
        let mut variables = vec![self.parse_declarator_rest(name, start)?];
        while self.match_token(&Token::Comma) {
            let start = self.start();
            let name = self.parse_identifier()?;
            variables.push(self.parse_declarator_rest(name, start)?);
        }
        Ok(variables)
    }

    fn parse_declarator_rest(&mut self, name: String, start: Location) -> PResult<VariableDeclarator> {
        let array_dims = self.parse_dims();
        let initializer = if self.match_token(&Token::Assign) {
            Some(self.parse_variable_initializer()?)
        } else {
            None
        };
        Ok(VariableDeclarator {
            name,
            array_dims,
            initializer,
            span: self.span_from(start),
        })
    }

    fn parse_variable_initializer(&mut self) -> PResult<Expr> {
        if self.check(&Token::LBrace) {
            Ok(Expr::ArrayInitializer(self.parse_array_initializer()?))
        } else {
            self.parse_expr()
        }
    }

    pub(super) fn parse_formal_parameters(&mut self) -> PResult<Vec<Parameter>> {
        self.consume(&Token::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                params.push(self.parse_formal_parameter()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::RParen, "')'")?;
        Ok(params)
    }

    fn parse_formal_parameter(&mut self) -> PResult<Parameter> {
        let mods = self.parse_modifiers()?;
        let mut type_ref = self.parse_type_ref()?;
        while self.check(&Token::At) {
            // annotations on the varargs ellipsis
            self.parse_annotation()?;
        }
        let varargs = self.match_token(&Token::Ellipsis);
        let name = if self.match_token(&Token::This) {
            "this".to_string()
        } else {
            self.parse_identifier()?
        };
        type_ref.array_dims += self.parse_dims();
        Ok(Parameter {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            type_ref,
            name,
            varargs,
        })
    }

    // Statements

    pub(super) fn parse_block(&mut self) -> PResult<Block> {
        let start = self.start();
        self.consume(&Token::LBrace, "'{'")?;
        let statements = self.parse_block_statements(false);
        self.close_brace();
        Ok(Block {
            statements,
            span: self.span_from(start),
        })
    }

    fn at_statements_end(&self, in_switch: bool) -> bool {
        match self.peek_token_type(self.current) {
            None | Some(Token::RBrace) => true,
            Some(Token::Case | Token::Default) => in_switch,
            _ => false,
        }
    }

    fn parse_block_statements(&mut self, in_switch: bool) -> Vec<Stmt> {
        let mut statements = Vec::new();
        while !self.at_statements_end(in_switch) && self.recovery.should_continue() {
            let before = self.current;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.report(e);
                    let span = self.synchronize_in_block(before, in_switch);
                    statements.push(Stmt::Erroneous(ErroneousNode { span }));
                }
            }
        }
        statements
    }

    pub(super) fn parse_statement(&mut self) -> PResult<Stmt> {
        let start = self.start();
        let Some(token) = self.peek_token_type(self.current).cloned() else {
            return Err(ParseError::premature_eof(Span::point(self.eof)));
        };

        match token {
            Token::LBrace => return Ok(Stmt::Block(self.parse_block()?)),
            Token::Semicolon => {
                self.advance();
                return Ok(Stmt::Empty(self.span_from(start)));
            }
            Token::If => return self.parse_if_stmt(),
            Token::While => return self.parse_while_stmt(),
            Token::Do => return self.parse_do_while_stmt(),
            Token::For => return self.parse_for_stmt(),
            Token::Try => return self.parse_try_stmt(),
            Token::Switch => {
                self.advance();
                let (selector, cases) = self.parse_switch_rest(false)?;
                return Ok(Stmt::Switch(SwitchStmt { selector, cases, span: self.span_from(start) }));
            }
            Token::Synchronized if self.nth(1) == Some(&Token::LParen) => {
                self.advance();
                self.consume(&Token::LParen, "'('")?;
                let lock = self.parse_expr()?;
                self.consume(&Token::RParen, "')'")?;
                let body = self.parse_block()?;
                return Ok(Stmt::Synchronized(SynchronizedStmt { lock, body, span: self.span_from(start) }));
            }
            Token::Return => {
                self.advance();
                let value = if self.check(&Token::Semicolon) { None } else { Some(self.parse_expr()?) };
                self.expect_soft(&Token::Semicolon, "';'");
                return Ok(Stmt::Return(ReturnStmt { value, span: self.span_from(start) }));
            }
            Token::Break | Token::Continue => {
                let is_break = token == Token::Break;
                self.advance();
                let label = if self.check(&Token::Identifier) { Some(self.take_lexeme()) } else { None };
                self.expect_soft(&Token::Semicolon, "';'");
                let span = self.span_from(start);
                return Ok(if is_break {
                    Stmt::Break(BreakStmt { label, span })
                } else {
                    Stmt::Continue(ContinueStmt { label, span })
                });
            }
            Token::Throw => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect_soft(&Token::Semicolon, "';'");
                return Ok(Stmt::Throw(ThrowStmt { expr, span: self.span_from(start) }));
            }
            Token::Assert => {
                self.advance();
                let condition = self.parse_expr()?;
                let message = if self.match_token(&Token::Colon) { Some(self.parse_expr()?) } else { None };
                self.expect_soft(&Token::Semicolon, "';'");
                return Ok(Stmt::Assert(AssertStmt { condition, message, span: self.span_from(start) }));
            }
            Token::Identifier if self.is_yield_statement() => {
                self.advance();
                let value = self.parse_expr()?;
                self.expect_soft(&Token::Semicolon, "';'");
                return Ok(Stmt::Yield(YieldStmt { value, span: self.span_from(start) }));
            }
            Token::Identifier if self.nth(1) == Some(&Token::Colon) => {
                let label = self.take_lexeme();
                self.advance();
                let statement = Box::new(self.parse_statement()?);
                return Ok(Stmt::Labeled(LabeledStmt { label, statement, span: self.span_from(start) }));
            }
            Token::Final | Token::Abstract | Token::Strictfp | Token::Static | Token::At
            | Token::Class | Token::Interface | Token::Enum => {
                return self.parse_local_declaration();
            }
            Token::Identifier if self.is_record_start() || self.is_sealed_modifier(self.current) => {
                return self.parse_local_declaration();
            }
            _ => {}
        }

        if self.is_local_var_decl() {
            let mods = self.parse_modifiers()?;
            let type_ref = self.parse_type_ref()?;
            let decl = self.parse_var_decl_rest(mods, type_ref)?;
            self.expect_soft(&Token::Semicolon, "';'");
            return Ok(Stmt::Declaration(VarDeclStmt { span: self.span_from(start), ..decl }));
        }

        let expr = self.parse_expr()?;
        self.check_statement_expression(&expr);
        self.expect_soft(&Token::Semicolon, "';'");
        Ok(Stmt::Expression(ExprStmt { expr, span: self.span_from(start) }))
    }

    /// Local class / record / interface / enum, or a local variable with modifiers
    fn parse_local_declaration(&mut self) -> PResult<Stmt> {
        let mods = self.parse_modifiers()?;
        if self.is_type_decl_start() {
            return Ok(Stmt::TypeDecl(self.parse_type_decl(mods)?));
        }
        let start = mods.start;
        let type_ref = self.parse_type_ref()?;
        let decl = self.parse_var_decl_rest(mods, type_ref)?;
        self.expect_soft(&Token::Semicolon, "';'");
        Ok(Stmt::Declaration(VarDeclStmt { span: self.span_from(start), ..decl }))
    }

    /// Declarators after the type of a local variable; no terminating `;`
    fn parse_var_decl_rest(&mut self, mods: Modifiers, type_ref: TypeRef) -> PResult<VarDeclStmt> {
        let start = self.start();
        let name = self.parse_identifier()?;
        let variables = self.parse_declarators_after(name, start)?;
        Ok(VarDeclStmt {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            annotations: mods.annotations,
            type_ref,
            variables,
        })
    }

    fn is_yield_statement(&self) -> bool {
        if !self.check_word("yield") {
            return false;
        }
        !matches!(
            self.nth(1),
            None | Some(
                Token::Assign | Token::AddAssign | Token::SubAssign | Token::MulAssign | Token::DivAssign
                    | Token::ModAssign | Token::AndAssign | Token::OrAssign | Token::XorAssign
                    | Token::LShiftAssign | Token::RShiftAssign | Token::URShiftAssign
                    | Token::Dot | Token::LBracket | Token::Colon | Token::Semicolon | Token::Arrow
                    | Token::Inc | Token::Dec | Token::DoubleColon
            )
        )
    }

    /// Only assignments, increments, calls and instance creation may stand alone
    fn check_statement_expression(&mut self, expr: &Expr) {
        let allowed = match expr {
            Expr::Assignment(_) | Expr::MethodCall(_) | Expr::New(_) | Expr::Erroneous(_) => true,
            Expr::Unary(u) => matches!(
                u.operator,
                UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
            ),
            _ => false,
        };
        if !allowed {
            self.report(ParseError::not_a_statement(expr.span()));
        }
    }

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        let start = self.start();
        self.advance();
        let condition = self.parse_par_expr()?;
        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(&Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt { condition, then_branch, else_branch, span: self.span_from(start) }))
    }

    fn parse_while_stmt(&mut self) -> PResult<Stmt> {
        let start = self.start();
        self.advance();
        let condition = self.parse_par_expr()?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::While(WhileStmt { condition, body, span: self.span_from(start) }))
    }

    fn parse_do_while_stmt(&mut self) -> PResult<Stmt> {
        let start = self.start();
        self.advance();
        let body = Box::new(self.parse_statement()?);
        self.consume(&Token::While, "'while'")?;
        let condition = self.parse_par_expr()?;
        self.expect_soft(&Token::Semicolon, "';'");
        Ok(Stmt::DoWhile(DoWhileStmt { body, condition, span: self.span_from(start) }))
    }

    fn parse_par_expr(&mut self) -> PResult<Expr> {
        self.consume(&Token::LParen, "'('")?;
        let expr = self.parse_expr()?;
        self.consume(&Token::RParen, "')'")?;
        Ok(expr)
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        let start = self.start();
        self.advance();
        self.consume(&Token::LParen, "'('")?;

        if self.is_for_each() {
            let mods = self.parse_modifiers()?;
            let type_ref = self.parse_type_ref()?;
            let name = self.parse_identifier()?;
            let variable = Parameter {
                span: self.span_from(mods.start),
                modifiers: mods.modifiers,
                annotations: mods.annotations,
                type_ref,
                name,
                varargs: false,
            };
            self.consume(&Token::Colon, "':'")?;
            let iterable = self.parse_expr()?;
            self.consume(&Token::RParen, "')'")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(Stmt::ForEach(ForEachStmt { variable, iterable, body, span: self.span_from(start) }));
        }

        let mut init = Vec::new();
        if !self.check(&Token::Semicolon) {
            if self.is_local_var_decl() || self.check(&Token::Final) || self.check(&Token::At) {
                let mods = self.parse_modifiers()?;
                let type_ref = self.parse_type_ref()?;
                init.push(Stmt::Declaration(self.parse_var_decl_rest(mods, type_ref)?));
            } else {
                for expr_stmt in self.parse_expression_list()? {
                    init.push(Stmt::Expression(expr_stmt));
                }
            }
        }
        self.consume(&Token::Semicolon, "';'")?;
        let condition = if self.check(&Token::Semicolon) { None } else { Some(self.parse_expr()?) };
        self.consume(&Token::Semicolon, "';'")?;
        let update = if self.check(&Token::RParen) { Vec::new() } else { self.parse_expression_list()? };
        self.consume(&Token::RParen, "')'")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For(ForStmt { init, condition, update, body, span: self.span_from(start) }))
    }

    fn parse_expression_list(&mut self) -> PResult<Vec<ExprStmt>> {
        let mut list = Vec::new();
        loop {
            let start = self.start();
            let expr = self.parse_expr()?;
            self.check_statement_expression(&expr);
            list.push(ExprStmt { expr, span: self.span_from(start) });
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        Ok(list)
    }

    fn parse_try_stmt(&mut self) -> PResult<Stmt> {
        let start = self.start();
        self.advance();

        let mut resources = Vec::new();
        if self.match_token(&Token::LParen) {
            while !self.check(&Token::RParen) && !self.is_at_end() {
                resources.push(self.parse_resource()?);
                if !self.match_token(&Token::Semicolon) {
                    break;
                }
            }
            self.consume(&Token::RParen, "')'")?;
        }

        let try_block = self.parse_block()?;

        let mut catch_clauses = Vec::new();
        while self.check(&Token::Catch) {
            let catch_start = self.start();
            self.advance();
            self.consume(&Token::LParen, "'('")?;
            let mods = self.parse_modifiers()?;
            let type_ref = self.parse_type_ref()?;
            let mut alt_types = Vec::new();
            while self.match_token(&Token::Pipe) {
                alt_types.push(self.parse_type_ref()?);
            }
            let name = self.parse_identifier()?;
            let parameter = Parameter {
                span: self.span_from(mods.start),
                modifiers: mods.modifiers,
                annotations: mods.annotations,
                type_ref,
                name,
                varargs: false,
            };
            self.consume(&Token::RParen, "')'")?;
            let block = self.parse_block()?;
            catch_clauses.push(CatchClause { parameter, alt_types, block, span: self.span_from(catch_start) });
        }

        let finally_block = if self.match_token(&Token::Finally) { Some(self.parse_block()?) } else { None };

        if resources.is_empty() && catch_clauses.is_empty() && finally_block.is_none() {
            self.report(ParseError::new(
                DiagnosticCode::Syntax,
                "'try' without 'catch', 'finally' or resource declarations",
                Span::point(start),
            ));
        }

        Ok(Stmt::Try(TryStmt { resources, try_block, catch_clauses, finally_block, span: self.span_from(start) }))
    }

    fn parse_resource(&mut self) -> PResult<TryResource> {
        let start = self.start();
        if self.is_local_var_decl() || self.check(&Token::Final) || self.check(&Token::At) {
            let mods = self.parse_modifiers()?;
            let type_ref = self.parse_type_ref()?;
            let name = self.parse_identifier()?;
            self.consume(&Token::Assign, "'='")?;
            let initializer = self.parse_expr()?;
            return Ok(TryResource::Var {
                modifiers: mods.modifiers,
                type_ref,
                name,
                initializer,
                span: self.span_from(start),
            });
        }
        let expr = self.parse_expr()?;
        Ok(TryResource::Expr { expr, span: self.span_from(start) })
    }

    /// Selector and body of a switch statement or expression; `switch` already consumed
    pub(super) fn parse_switch_rest(&mut self, is_expression: bool) -> PResult<(Expr, Vec<SwitchCase>)> {
        let selector = self.parse_par_expr()?;
        self.consume(&Token::LBrace, "'{'")?;

        let mut cases = Vec::new();
        while !self.check(&Token::RBrace) && !self.is_at_end() && self.recovery.should_continue() {
            let before = self.current;
            match self.parse_switch_case(is_expression) {
                Ok(case) => cases.push(case),
                Err(e) => {
                    self.report(e);
                    let span = self.synchronize_in_block(before, true);
                    cases.push(SwitchCase {
                        labels: Vec::new(),
                        arrow: false,
                        statements: vec![Stmt::Erroneous(ErroneousNode { span })],
                        span,
                    });
                }
            }
        }
        self.close_brace();
        Ok((selector, cases))
    }

    fn parse_switch_case(&mut self, is_expression: bool) -> PResult<SwitchCase> {
        let start = self.start();
        let labels = if self.match_token(&Token::Default) {
            Vec::new()
        } else if self.match_token(&Token::Case) {
            let saved = std::mem::replace(&mut self.no_lambda, true);
            let labels = self.parse_case_labels();
            self.no_lambda = saved;
            labels?
        } else {
            return Err(self.expected_error("'case', 'default', or '}'"));
        };

        if self.match_token(&Token::Arrow) {
            let body_start = self.start();
            let body = match self.peek_token_type(self.current) {
                Some(Token::LBrace) => Stmt::Block(self.parse_block()?),
                Some(Token::Throw) => self.parse_statement()?,
                _ => {
                    let expr = self.parse_expr()?;
                    if !is_expression {
                        self.check_statement_expression(&expr);
                    }
                    self.expect_soft(&Token::Semicolon, "';'");
                    Stmt::Expression(ExprStmt { expr, span: self.span_from(body_start) })
                }
            };
            return Ok(SwitchCase { labels, arrow: true, statements: vec![body], span: self.span_from(start) });
        }

        self.consume(&Token::Colon, "':' or '->'")?;
        let statements = self.parse_block_statements(true);
        Ok(SwitchCase { labels, arrow: false, statements, span: self.span_from(start) })
    }

    fn parse_case_labels(&mut self) -> PResult<Vec<Expr>> {
        let mut labels = vec![self.parse_conditional()?];
        while self.match_token(&Token::Comma) {
            labels.push(self.parse_conditional()?);
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_unit(text: &str) -> (CompilationUnit, Vec<Diagnostic>) {
        let source = SourceFile::new("Test.java", text);
        let mut diagnostics = Vec::new();
        let unit = Parser::new(&source, ParserOptions::default(), &mut diagnostics).parse_compilation_unit();
        (unit, diagnostics)
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_parse_simple_class() {
        let (unit, diagnostics) = parse_unit(
            r#"
package com.example;

public class HelloWorld {
    public static void main(String[] args) {
        System.out.println("Hello, World!");
    }
}
"#,
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(unit.package_decl.as_ref().map(|p| p.name.as_str()), Some("com.example"));
        assert_eq!(unit.types().count(), 1);
        let class = unit.types().next().map(|t| t.name().to_string());
        assert_eq!(class.as_deref(), Some("HelloWorld"));
    }

    #[test]
    fn test_parse_with_imports() {
        let (unit, diagnostics) = parse_unit(
            r#"
import java.util.List;
import static java.util.Collections.*;

class TestClass {
    private List<String> items = new ArrayList<>();
}
"#,
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(unit.imports.len(), 2);
        assert!(unit.imports[1].is_static && unit.imports[1].is_wildcard);
    }

    #[test]
    fn missing_method_name_is_reported_and_method_kept() {
        let (unit, diagnostics) = parse_unit("class SyntaxError { void () {} }");
        assert_eq!(messages(&diagnostics), ["<identifier> expected"]);
        assert_eq!(diagnostics[0].column(), 25);
        let members = unit.types().next().map(|t| t.members().len());
        assert_eq!(members, Some(1));
    }

    #[test]
    fn missing_semicolon_points_after_previous_token() {
        let (_, diagnostics) = parse_unit("class A {\n  int x = 1\n}");
        assert_eq!(messages(&diagnostics), ["';' expected"]);
        assert_eq!((diagnostics[0].line(), diagnostics[0].column()), (2, 12));
    }

    #[test]
    fn unterminated_class_reaches_end_of_file() {
        let (unit, diagnostics) = parse_unit("class A { void m() {");
        assert_eq!(messages(&diagnostics), ["reached end of file while parsing"]);
        assert_eq!(unit.types().count(), 1);
    }

    #[test]
    fn top_level_garbage_becomes_error_marker() {
        let (unit, diagnostics) = parse_unit("int x = 1; class A {}");
        assert_eq!(messages(&diagnostics), ["class, interface, enum, or record expected"]);
        assert!(matches!(unit.type_decls[0], TopLevel::Erroneous(_)));
        assert!(matches!(unit.type_decls[1], TopLevel::Type(_)));
    }

    #[test]
    fn bad_member_recovers_to_next_member() {
        let (unit, diagnostics) = parse_unit("class A { int = 3; void ok() {} }");
        assert_eq!(diagnostics.len(), 1);
        let kinds: Vec<_> = unit.types().next().map(|t| t.members().iter().map(|m| m.kind()).collect()).unwrap_or_default();
        assert_eq!(kinds, ["erroneous tree", "method"]);
    }

    #[test]
    fn not_a_statement() {
        let (_, diagnostics) = parse_unit("class A { void m() { 1 + 2; x++; } }");
        assert_eq!(messages(&diagnostics), ["not a statement"]);
    }

    #[test]
    fn without_recovery_rest_is_absorbed() {
        let source = SourceFile::from_string("class A { int = 1; int = 2; } class B {}");
        let mut diagnostics = Vec::new();
        let options = ParserOptions { allow_error_recovery: false, ..ParserOptions::default() };
        let unit = Parser::new(&source, options, &mut diagnostics).parse_compilation_unit();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(unit.types().count(), 1);
        assert!(matches!(unit.type_decls.last(), Some(TopLevel::Erroneous(_))));
    }

    #[test]
    fn error_limit_adds_note() {
        let source = SourceFile::from_string("class A { int = 1; int = 2; int = 3; }");
        let mut diagnostics = Vec::new();
        let options = ParserOptions { max_errors: 2, ..ParserOptions::default() };
        Parser::new(&source, options, &mut diagnostics).parse_compilation_unit();
        let severities: Vec<_> = diagnostics.iter().map(|d| d.severity).collect();
        assert_eq!(severities, [Severity::Error, Severity::Error, Severity::Note]);
    }

    #[test]
    fn deprecated_doc_without_annotation_warns() {
        let (_, diagnostics) = parse_unit("/** @deprecated use B */\nclass A {}\n/** @deprecated */ @Deprecated class B {}");
        assert_eq!(messages(&diagnostics), ["deprecated item is not annotated with @Deprecated"]);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn doc_comments_attach_to_declarations() {
        let (unit, _) = parse_unit("/** The A. */ public class A { /** Field. */ int x; }");
        let decl = unit.types().next();
        assert_eq!(decl.and_then(|d| d.doc()), Some("The A."));
        match decl.map(|d| &d.members()[0]) {
            Some(ClassMember::Field(f)) => assert_eq!(f.doc.as_deref(), Some("Field.")),
            other => panic!("expected field, got {:?}", other),
        }
    }

    #[test]
    fn module_declaration() {
        let (unit, diagnostics) = parse_unit(
            "open module com.example.app {\n  requires transitive java.sql;\n  exports com.example.api to a, b;\n  provides S with I;\n}",
        );
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let module = unit.module_decl.expect("module");
        assert!(module.is_open);
        assert_eq!(module.directives.len(), 3);
    }
}
