//! Expressions, types and annotations
//!
//! Ambiguous shapes (casts, lambdas, generic method references, local variable declarations)
//! are decided by scanning ahead over the token buffer. Nothing is parsed speculatively, so the
//! only in-place token edit is splitting `>>` while closing type arguments.

use super::error::{PResult, ParseError};
use super::lexer::Token;
use super::literal::{self, LiteralError};
use super::parser::Parser;
use crate::ast::*;
use crate::diagnostics::DiagnosticCode;

const INSTANCEOF_PRECEDENCE: u8 = 7;

fn binary_op(token: &Token) -> Option<(BinaryOp, u8)> {
    let op = match token {
        Token::PipePipe => (BinaryOp::Or, 1),
        Token::AndAnd => (BinaryOp::And, 2),
        Token::Pipe => (BinaryOp::BitOr, 3),
        Token::Caret => (BinaryOp::Xor, 4),
        Token::Amp => (BinaryOp::BitAnd, 5),
        Token::Eq => (BinaryOp::Eq, 6),
        Token::Ne => (BinaryOp::Ne, 6),
        Token::Lt => (BinaryOp::Lt, 7),
        Token::Gt => (BinaryOp::Gt, 7),
        Token::Le => (BinaryOp::Le, 7),
        Token::Ge => (BinaryOp::Ge, 7),
        Token::LShift => (BinaryOp::LShift, 8),
        Token::RShift => (BinaryOp::RShift, 8),
        Token::URShift => (BinaryOp::URShift, 8),
        Token::Plus => (BinaryOp::Add, 9),
        Token::Minus => (BinaryOp::Sub, 9),
        Token::Star => (BinaryOp::Mul, 10),
        Token::Slash => (BinaryOp::Div, 10),
        Token::Percent => (BinaryOp::Mod, 10),
        _ => return None,
    };
    Some(op)
}

fn assignment_op(token: &Token) -> Option<AssignmentOp> {
    let op = match token {
        Token::Assign => AssignmentOp::Assign,
        Token::AddAssign => AssignmentOp::AddAssign,
        Token::SubAssign => AssignmentOp::SubAssign,
        Token::MulAssign => AssignmentOp::MulAssign,
        Token::DivAssign => AssignmentOp::DivAssign,
        Token::ModAssign => AssignmentOp::ModAssign,
        Token::AndAssign => AssignmentOp::AndAssign,
        Token::OrAssign => AssignmentOp::OrAssign,
        Token::XorAssign => AssignmentOp::XorAssign,
        Token::LShiftAssign => AssignmentOp::LShiftAssign,
        Token::RShiftAssign => AssignmentOp::RShiftAssign,
        Token::URShiftAssign => AssignmentOp::URShiftAssign,
        _ => return None,
    };
    Some(op)
}

impl<'a> Parser<'a> {
    // Expressions

    pub(super) fn parse_expr(&mut self) -> PResult<Expr> {
        if self.is_lambda_start() {
            return self.parse_lambda();
        }
        let start = self.start();
        let target = self.parse_conditional()?;
        let Some(operator) = self.peek_token_type(self.current).and_then(assignment_op) else {
            return Ok(target);
        };
        self.advance();
        let value = self.parse_expr()?;
        Ok(Expr::Assignment(AssignmentExpr {
            target: Box::new(target),
            operator,
            value: Box::new(value),
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_conditional(&mut self) -> PResult<Expr> {
        let start = self.start();
        let condition = self.parse_binary(1)?;
        if !self.match_token(&Token::Question) {
            return Ok(condition);
        }
        let then_expr = self.parse_expr()?;
        self.consume(&Token::Colon, "':'")?;
        let else_expr = if self.is_lambda_start() { self.parse_lambda()? } else { self.parse_conditional()? };
        Ok(Expr::Conditional(ConditionalExpr {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            span: self.span_from(start),
        }))
    }

    fn parse_binary(&mut self, min_precedence: u8) -> PResult<Expr> {
        let start = self.start();
        let mut left = self.parse_unary()?;

        loop {
            if self.check(&Token::InstanceOf) {
                if INSTANCEOF_PRECEDENCE < min_precedence {
                    break;
                }
                self.advance();
                self.match_token(&Token::Final);
                let target_type = self.parse_type_ref()?;
                let binding = if self.check(&Token::Identifier) { Some(self.take_lexeme()) } else { None };
                left = Expr::InstanceOf(InstanceOfExpr {
                    expr: Box::new(left),
                    target_type,
                    binding,
                    span: self.span_from(start),
                });
                continue;
            }

            let Some((operator, precedence)) = self.peek_token_type(self.current).and_then(binary_op) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_binary(precedence + 1)?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span: self.span_from(start),
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let start = self.start();
        let operator = match self.peek_token_type(self.current) {
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Minus) => UnaryOp::Minus,
            Some(Token::Inc) => UnaryOp::PreInc,
            Some(Token::Dec) => UnaryOp::PreDec,
            Some(Token::Bang) => UnaryOp::Not,
            Some(Token::Tilde) => UnaryOp::BitNot,
            Some(Token::LParen) if self.is_cast() => return self.parse_cast(),
            _ => return self.parse_postfix(),
        };
        self.advance();

        // -2147483648 is only in range once the sign is part of the literal
        if operator == UnaryOp::Minus
            && matches!(self.peek_token_type(self.current), Some(Token::IntegerLiteral | Token::FloatingLiteral))
        {
            let literal = self.parse_literal(Some(start))?;
            return self.parse_selectors(literal, start);
        }

        let operand = self.parse_unary()?;
        Ok(Expr::Unary(UnaryExpr {
            operator,
            operand: Box::new(operand),
            span: self.span_from(start),
        }))
    }

    fn parse_cast(&mut self) -> PResult<Expr> {
        let start = self.start();
        self.consume(&Token::LParen, "'('")?;
        let target_type = self.parse_type_ref()?;
        let mut extra_bounds = Vec::new();
        while self.match_token(&Token::Amp) {
            extra_bounds.push(self.parse_type_ref()?);
        }
        self.consume(&Token::RParen, "')'")?;
        let expr = if self.is_lambda_start() { self.parse_lambda()? } else { self.parse_unary()? };
        Ok(Expr::Cast(CastExpr {
            target_type,
            extra_bounds,
            expr: Box::new(expr),
            span: self.span_from(start),
        }))
    }

    fn parse_postfix(&mut self) -> PResult<Expr> {
        let start = self.start();
        let primary = self.parse_primary()?;
        let mut expr = self.parse_selectors(primary, start)?;
        loop {
            let operator = match self.peek_token_type(self.current) {
                Some(Token::Inc) => UnaryOp::PostInc,
                Some(Token::Dec) => UnaryOp::PostDec,
                _ => break,
            };
            self.advance();
            expr = Expr::Unary(UnaryExpr {
                operator,
                operand: Box::new(expr),
                span: self.span_from(start),
            });
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        let start = self.start();
        let Some(token) = self.peek_token_type(self.current).cloned() else {
            return Err(self.error_here(ParseError::illegal_start_of_expr));
        };

        match token {
            t if t.is_literal() => self.parse_literal(None),
            Token::This | Token::Super => {
                let name = self.take_lexeme();
                if self.check(&Token::LParen) {
                    // explicit constructor invocation
                    let arguments = self.parse_arguments()?;
                    return Ok(Expr::MethodCall(MethodCallExpr {
                        target: None,
                        type_args: Vec::new(),
                        name,
                        arguments,
                        span: self.span_from(start),
                    }));
                }
                Ok(Expr::Identifier(IdentifierExpr { name, span: self.span_from(start) }))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(&Token::RParen, "')'")?;
                Ok(Expr::Parenthesized(ParenExpr {
                    expr: Box::new(expr),
                    span: self.span_from(start),
                }))
            }
            Token::New => self.parse_new(None, start),
            Token::Switch => {
                self.advance();
                let (selector, cases) = self.parse_switch_rest(true)?;
                Ok(Expr::Switch(SwitchExpr {
                    selector: Box::new(selector),
                    cases,
                    span: self.span_from(start),
                }))
            }
            t if t.is_primitive_type() => {
                // int.class, int[]::new
                let type_ref = self.parse_type_ref()?;
                if self.is_class_literal_suffix(self.current) || self.check(&Token::DoubleColon) {
                    Ok(Expr::Type(type_ref))
                } else {
                    Err(self.expected_error("'.class'"))
                }
            }
            Token::Identifier => {
                if self.is_type_qualifier() {
                    return Ok(Expr::Type(self.parse_type_ref()?));
                }
                let name = self.take_lexeme();
                if self.check(&Token::LParen) {
                    let arguments = self.parse_arguments()?;
                    return Ok(Expr::MethodCall(MethodCallExpr {
                        target: None,
                        type_args: Vec::new(),
                        name,
                        arguments,
                        span: self.span_from(start),
                    }));
                }
                Ok(Expr::Identifier(IdentifierExpr { name, span: self.span_from(start) }))
            }
            _ => Err(self.error_here(ParseError::illegal_start_of_expr)),
        }
    }

    fn is_class_literal_suffix(&self, i: usize) -> bool {
        self.peek_token_type(i) == Some(&Token::Dot) && self.peek_token_type(i + 1) == Some(&Token::Class)
    }

    /// `List<String>::new`, `String[]::new` and `String[].class` start with a type, not a name
    fn is_type_qualifier(&self) -> bool {
        let Some(after) = self.scan_type(self.current) else {
            return false;
        };
        let generic_or_array = self.tokens[self.current..after]
            .iter()
            .any(|t| matches!(t.token, Token::Lt | Token::LBracket));
        generic_or_array && (self.peek_token_type(after) == Some(&Token::DoubleColon) || self.is_class_literal_suffix(after))
    }

    fn parse_literal(&mut self, negated_from: Option<Location>) -> PResult<Expr> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error_here(ParseError::illegal_start_of_expr));
        };
        self.advance();
        let negated = negated_from.is_some();
        let start = negated_from.unwrap_or(token.span.start);

        let value = match token.token {
            Token::IntegerLiteral => literal::integer(&token.lexeme, negated),
            Token::FloatingLiteral => literal::floating(&token.lexeme, negated),
            Token::StringLiteral => literal::string(&token.lexeme).map(Literal::String),
            Token::TextBlock => literal::text_block(&token.lexeme).map(Literal::TextBlock),
            Token::CharLiteral => literal::character(&token.lexeme).map(Literal::Char),
            Token::True => Ok(Literal::Boolean(true)),
            Token::False => Ok(Literal::Boolean(false)),
            Token::Null => Ok(Literal::Null),
            _ => return Err(ParseError::illegal_start_of_expr(token.span)),
        };

        let span = self.span_from(start);
        match value {
            Ok(value) => Ok(Expr::Literal(LiteralExpr { value, span })),
            Err(error) => {
                self.report_literal_error(&error, token.span);
                Ok(Expr::Erroneous(ErroneousNode { span }))
            }
        }
    }

    fn report_literal_error(&mut self, error: &LiteralError, literal_span: Span) {
        let (code, message) = error.describe();
        let span = match error {
            LiteralError::IllegalEscape(offset) | LiteralError::IllegalUnderscore(offset) => {
                Span::point(self.source.location_at(literal_span.start.offset + offset))
            }
            _ => literal_span,
        };
        self.report(ParseError::new(code, message, span));
    }

    fn parse_selectors(&mut self, mut expr: Expr, start: Location) -> PResult<Expr> {
        loop {
            match self.peek_token_type(self.current).cloned() {
                Some(Token::Dot) => {
                    self.advance();
                    expr = self.parse_member_selector(expr, start)?;
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.consume(&Token::RBracket, "']'")?;
                    expr = Expr::ArrayAccess(ArrayAccessExpr {
                        array: Box::new(expr),
                        index: Box::new(index),
                        span: self.span_from(start),
                    });
                }
                Some(Token::DoubleColon) => {
                    self.advance();
                    let type_args = if self.check(&Token::Lt) { self.parse_type_args()? } else { Vec::new() };
                    let name = if self.match_token(&Token::New) { "new".to_string() } else { self.parse_identifier()? };
                    expr = Expr::MethodRef(MethodRefExpr {
                        target: Box::new(expr),
                        type_args,
                        name,
                        span: self.span_from(start),
                    });
                }
                _ => return Ok(expr),
            }
        }
    }

    /// Whatever follows a `.` after a primary
    fn parse_member_selector(&mut self, target: Expr, start: Location) -> PResult<Expr> {
        let field = |parser: &Self, target: Expr, name: &str| {
            Expr::FieldAccess(FieldAccessExpr {
                target: Box::new(target),
                name: name.to_string(),
                span: parser.span_from(start),
            })
        };

        match self.peek_token_type(self.current).cloned() {
            Some(Token::Class) => {
                self.advance();
                Ok(field(self, target, "class"))
            }
            Some(Token::This) => {
                self.advance();
                Ok(field(self, target, "this"))
            }
            Some(Token::Super) => {
                self.advance();
                if self.check(&Token::LParen) {
                    let arguments = self.parse_arguments()?;
                    return Ok(Expr::MethodCall(MethodCallExpr {
                        target: Some(Box::new(target)),
                        type_args: Vec::new(),
                        name: "super".to_string(),
                        arguments,
                        span: self.span_from(start),
                    }));
                }
                Ok(field(self, target, "super"))
            }
            Some(Token::New) => self.parse_new(Some(target), start),
            _ => {
                let type_args = if self.check(&Token::Lt) { self.parse_type_args()? } else { Vec::new() };
                let name = self.parse_identifier()?;
                if !type_args.is_empty() || self.check(&Token::LParen) {
                    let arguments = self.parse_arguments()?;
                    return Ok(Expr::MethodCall(MethodCallExpr {
                        target: Some(Box::new(target)),
                        type_args,
                        name,
                        arguments,
                        span: self.span_from(start),
                    }));
                }
                Ok(field(self, target, &name))
            }
        }
    }

    fn parse_new(&mut self, outer: Option<Expr>, start: Location) -> PResult<Expr> {
        self.consume(&Token::New, "'new'")?;
        if self.check(&Token::Lt) {
            // constructor type arguments are accepted and dropped
            self.parse_type_args()?;
        }
        let target_type = self.parse_type_ref()?;
        if self.check(&Token::LBracket) || target_type.is_array() {
            return self.parse_new_array(target_type, start);
        }

        let arguments = self.parse_arguments()?;
        let anonymous_body = if self.check(&Token::LBrace) { Some(self.parse_class_body("")?) } else { None };
        Ok(Expr::New(NewExpr {
            outer: outer.map(Box::new),
            target_type,
            arguments,
            anonymous_body,
            span: self.span_from(start),
        }))
    }

    fn parse_new_array(&mut self, mut element_type: TypeRef, start: Location) -> PResult<Expr> {
        let mut extra_dims = std::mem::take(&mut element_type.array_dims);
        let mut dimensions = Vec::new();
        if extra_dims == 0 {
            while self.check(&Token::LBracket) && self.nth(1) != Some(&Token::RBracket) {
                self.advance();
                dimensions.push(self.parse_expr()?);
                self.consume(&Token::RBracket, "']'")?;
            }
            extra_dims = self.parse_dims();
        }

        let initializer = if self.check(&Token::LBrace) { Some(self.parse_array_initializer()?) } else { None };
        if dimensions.is_empty() && initializer.is_none() {
            return Err(ParseError::new(DiagnosticCode::Syntax, "array dimension missing", self.current_span()));
        }

        Ok(Expr::NewArray(NewArrayExpr {
            element_type,
            dimensions,
            extra_dims,
            initializer,
            span: self.span_from(start),
        }))
    }

    pub(super) fn parse_arguments(&mut self) -> PResult<Vec<Expr>> {
        self.consume(&Token::LParen, "'('")?;
        let mut arguments = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                arguments.push(self.parse_expr()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::RParen, "')'")?;
        Ok(arguments)
    }

    pub(super) fn parse_array_initializer(&mut self) -> PResult<ArrayInitExpr> {
        let start = self.start();
        self.consume(&Token::LBrace, "'{'")?;
        let mut elements = Vec::new();
        while !self.check(&Token::RBrace) && !self.is_at_end() {
            let element = if self.check(&Token::LBrace) {
                Expr::ArrayInitializer(self.parse_array_initializer()?)
            } else {
                self.parse_expr()?
            };
            elements.push(element);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.consume(&Token::RBrace, "'}'")?;
        Ok(ArrayInitExpr { elements, span: self.span_from(start) })
    }

    // Lambdas

    pub(super) fn is_lambda_start(&self) -> bool {
        if self.no_lambda {
            return false;
        }
        match self.peek_token_type(self.current) {
            Some(Token::Identifier) => self.nth(1) == Some(&Token::Arrow),
            Some(Token::LParen) => self
                .matching_paren(self.current)
                .map_or(false, |close| self.peek_token_type(close + 1) == Some(&Token::Arrow)),
            _ => false,
        }
    }

    fn parse_lambda(&mut self) -> PResult<Expr> {
        let start = self.start();
        let mut params = Vec::new();
        if self.check(&Token::Identifier) {
            let span = self.current_span();
            let name = self.take_lexeme();
            params.push(LambdaParam { modifiers: Vec::new(), type_ref: None, name, span });
        } else {
            self.consume(&Token::LParen, "'('")?;
            if !self.check(&Token::RParen) {
                loop {
                    params.push(self.parse_lambda_param()?);
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                }
            }
            self.consume(&Token::RParen, "')'")?;
        }
        self.consume(&Token::Arrow, "'->'")?;

        let body = if self.check(&Token::LBrace) {
            LambdaBody::Block(self.parse_block()?)
        } else {
            LambdaBody::Expr(Box::new(self.parse_expr()?))
        };
        Ok(Expr::Lambda(LambdaExpr { params, body, span: self.span_from(start) }))
    }

    fn parse_lambda_param(&mut self) -> PResult<LambdaParam> {
        let mods = self.parse_modifiers()?;
        let implicit = self.check(&Token::Identifier) && matches!(self.nth(1), Some(Token::Comma | Token::RParen));
        let type_ref = if implicit {
            None
        } else {
            let mut type_ref = self.parse_type_ref()?;
            if self.match_token(&Token::Ellipsis) {
                type_ref.array_dims += 1;
            }
            Some(type_ref)
        };
        let name = self.parse_identifier()?;
        Ok(LambdaParam {
            span: self.span_from(mods.start),
            modifiers: mods.modifiers,
            type_ref,
            name,
        })
    }

    // Annotations

    pub(super) fn parse_annotation(&mut self) -> PResult<Annotation> {
        let start = self.start();
        self.consume(&Token::At, "'@'")?;
        let name = self.parse_qualified_name()?;
        let mut arguments = Vec::new();

        if self.match_token(&Token::LParen) {
            if self.check(&Token::Identifier) && self.nth(1) == Some(&Token::Assign) {
                loop {
                    let key = self.parse_identifier()?;
                    self.consume(&Token::Assign, "'='")?;
                    arguments.push(AnnotationArg::Named(key, self.parse_element_value()?));
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                }
            } else if !self.check(&Token::RParen) {
                arguments.push(AnnotationArg::Value(self.parse_element_value()?));
            }
            self.consume(&Token::RParen, "')'")?;
        }

        Ok(Annotation { name, arguments, span: self.span_from(start) })
    }

    pub(super) fn parse_element_value(&mut self) -> PResult<Expr> {
        match self.peek_token_type(self.current) {
            Some(Token::At) => Ok(Expr::Annotation(Box::new(self.parse_annotation()?))),
            Some(Token::LBrace) => {
                let start = self.start();
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&Token::RBrace) && !self.is_at_end() {
                    elements.push(self.parse_element_value()?);
                    if !self.match_token(&Token::Comma) {
                        break;
                    }
                }
                self.consume(&Token::RBrace, "'}'")?;
                Ok(Expr::ArrayInitializer(ArrayInitExpr { elements, span: self.span_from(start) }))
            }
            _ => self.parse_conditional(),
        }
    }

    fn parse_type_annotations(&mut self) -> PResult<Vec<Annotation>> {
        let mut annotations = Vec::new();
        while self.check(&Token::At) && self.nth(1) != Some(&Token::Interface) {
            annotations.push(self.parse_annotation()?);
        }
        Ok(annotations)
    }

    // Types

    pub(super) fn parse_type_ref(&mut self) -> PResult<TypeRef> {
        let start = self.start();
        let annotations = self.parse_type_annotations()?;
        let mut type_ref = match self.peek_token_type(self.current).cloned() {
            Some(t) if t.is_primitive_type() => TypeRef::simple(self.take_lexeme(), Span::point(start)),
            Some(Token::Identifier) => self.parse_class_type(start)?,
            _ => return Err(self.error_here(ParseError::illegal_start_of_type)),
        };
        type_ref.annotations = annotations;
        type_ref.array_dims = self.parse_dims();
        type_ref.span = self.span_from(start);
        Ok(type_ref)
    }

    /// `a.b.C<T>.D<U>`: segments without arguments fold into the dotted name
    fn parse_class_type(&mut self, start: Location) -> PResult<TypeRef> {
        let mut type_ref = TypeRef::simple(self.take_lexeme(), Span::point(start));
        loop {
            if self.check(&Token::Lt) {
                type_ref.type_args = self.parse_type_args()?;
                type_ref.diamond = type_ref.type_args.is_empty();
            }
            if !(self.check(&Token::Dot) && matches!(self.nth(1), Some(Token::Identifier | Token::At))) {
                break;
            }
            self.advance();
            while self.check(&Token::At) {
                self.parse_annotation()?;
            }
            let segment = self.parse_identifier()?;
            if type_ref.type_args.is_empty() {
                type_ref.name.push('.');
                type_ref.name.push_str(&segment);
            } else {
                type_ref.span = self.span_from(start);
                let span = type_ref.span;
                let outer = std::mem::replace(&mut type_ref, TypeRef::simple(segment, span));
                type_ref.outer = Some(Box::new(outer));
            }
        }
        Ok(type_ref)
    }

    pub(super) fn parse_dims(&mut self) -> usize {
        let mut dims = 0;
        while self.check(&Token::LBracket) && self.nth(1) == Some(&Token::RBracket) {
            self.advance();
            self.advance();
            dims += 1;
        }
        dims
    }

    pub(super) fn parse_type_args(&mut self) -> PResult<Vec<TypeArg>> {
        self.consume(&Token::Lt, "'<'")?;
        let mut args = Vec::new();
        if self.is_type_args_close() {
            // diamond
            self.expect_gt()?;
            return Ok(args);
        }

        loop {
            let start = self.start();
            let mut annotations = self.parse_type_annotations()?;
            if self.match_token(&Token::Question) {
                let bound = if self.match_token(&Token::Extends) {
                    Some((BoundKind::Extends, self.parse_type_ref()?))
                } else if self.match_token(&Token::Super) {
                    Some((BoundKind::Super, self.parse_type_ref()?))
                } else {
                    None
                };
                args.push(TypeArg::Wildcard(WildcardType { annotations, bound, span: self.span_from(start) }));
            } else {
                let mut type_ref = self.parse_type_ref()?;
                annotations.append(&mut type_ref.annotations);
                type_ref.annotations = annotations;
                type_ref.span = self.span_from(start);
                args.push(TypeArg::Type(type_ref));
            }
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect_gt()?;
        Ok(args)
    }

    fn is_type_args_close(&self) -> bool {
        matches!(
            self.peek_token_type(self.current),
            Some(Token::Gt | Token::RShift | Token::URShift | Token::Ge | Token::RShiftAssign | Token::URShiftAssign)
        )
    }

    /// Close a type argument list, splitting `>>`, `>>>`, `>=` and friends in place
    pub(super) fn expect_gt(&mut self) -> PResult<()> {
        let (rest, lexeme) = match self.peek_token_type(self.current) {
            Some(Token::Gt) => {
                self.advance();
                return Ok(());
            }
            Some(Token::RShift) => (Token::Gt, ">"),
            Some(Token::URShift) => (Token::RShift, ">>"),
            Some(Token::Ge) => (Token::Assign, "="),
            Some(Token::RShiftAssign) => (Token::Ge, ">="),
            Some(Token::URShiftAssign) => (Token::RShiftAssign, ">>="),
            _ => return Err(self.expected_error("'>'")),
        };
        if let Some(token) = self.tokens.get_mut(self.current) {
            let start = token.span.start;
            token.token = rest;
            token.lexeme = lexeme.to_string();
            token.span.start = Location::new(start.line, start.column + 1, start.offset + 1);
            token.doc = None;
        }
        Ok(())
    }

    pub(super) fn parse_type_params(&mut self) -> PResult<Vec<TypeParam>> {
        self.consume(&Token::Lt, "'<'")?;
        let mut params = Vec::new();
        loop {
            let start = self.start();
            let annotations = self.parse_type_annotations()?;
            let name = self.parse_identifier()?;
            let mut bounds = Vec::new();
            if self.match_token(&Token::Extends) {
                bounds.push(self.parse_type_ref()?);
                while self.match_token(&Token::Amp) {
                    bounds.push(self.parse_type_ref()?);
                }
            }
            params.push(TypeParam { annotations, name, bounds, span: self.span_from(start) });
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        self.expect_gt()?;
        Ok(params)
    }

    pub(super) fn parse_type_list(&mut self) -> PResult<Vec<TypeRef>> {
        let mut types = vec![self.parse_type_ref()?];
        while self.match_token(&Token::Comma) {
            types.push(self.parse_type_ref()?);
        }
        Ok(types)
    }

    // Lookahead

    /// Index just past a type starting at token `i`; nothing is consumed
    pub(super) fn scan_type(&self, i: usize) -> Option<usize> {
        let mut i = self.skip_annotations(i)?;
        match self.peek_token_type(i)? {
            t if t.is_primitive_type() && *t != Token::Void => i += 1,
            Token::Identifier => {
                i += 1;
                loop {
                    if self.peek_token_type(i) == Some(&Token::Lt) {
                        i = self.scan_type_args(i)?;
                    }
                    if self.peek_token_type(i) == Some(&Token::Dot) && self.peek_token_type(i + 1) == Some(&Token::Identifier) {
                        i += 2;
                    } else {
                        break;
                    }
                }
            }
            _ => return None,
        }
        while self.peek_token_type(i) == Some(&Token::LBracket) && self.peek_token_type(i + 1) == Some(&Token::RBracket) {
            i += 2;
        }
        Some(i)
    }

    /// Matching close of the `<` at `i`; `>>` counts twice and `>>>` three times
    fn scan_type_args(&self, mut i: usize) -> Option<usize> {
        let mut depth: i32 = 0;
        loop {
            match self.peek_token_type(i)? {
                Token::Lt => depth += 1,
                Token::Gt => depth -= 1,
                Token::RShift => depth -= 2,
                Token::URShift => depth -= 3,
                Token::Identifier | Token::Dot | Token::Comma | Token::Question | Token::Extends
                | Token::Super | Token::Amp | Token::LBracket | Token::RBracket | Token::At => {}
                t if t.is_primitive_type() => {}
                _ => return None,
            }
            i += 1;
            if depth <= 0 {
                return (depth == 0).then_some(i);
            }
        }
    }

    fn skip_annotations(&self, mut i: usize) -> Option<usize> {
        while self.peek_token_type(i) == Some(&Token::At) && self.peek_token_type(i + 1) != Some(&Token::Interface) {
            i += 1;
            if self.peek_token_type(i) != Some(&Token::Identifier) {
                return None;
            }
            i += 1;
            while self.peek_token_type(i) == Some(&Token::Dot) && self.peek_token_type(i + 1) == Some(&Token::Identifier) {
                i += 2;
            }
            if self.peek_token_type(i) == Some(&Token::LParen) {
                i = self.matching_paren(i)? + 1;
            }
        }
        Some(i)
    }

    pub(super) fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            match token.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Index of the variable name when a local declaration starts here
    fn scan_local_var(&self) -> Option<usize> {
        let mut i = self.current;
        loop {
            i = self.skip_annotations(i)?;
            if self.peek_token_type(i) == Some(&Token::Final) {
                i += 1;
            } else {
                break;
            }
        }
        let name = self.scan_type(i)?;
        (self.peek_token_type(name) == Some(&Token::Identifier)).then_some(name)
    }

    pub(super) fn is_local_var_decl(&self) -> bool {
        self.scan_local_var().is_some()
    }

    pub(super) fn is_for_each(&self) -> bool {
        self.scan_local_var()
            .map_or(false, |name| self.peek_token_type(name + 1) == Some(&Token::Colon))
    }

    /// `(` opening a cast rather than a parenthesized expression or lambda
    fn is_cast(&self) -> bool {
        let Some(close) = self.matching_paren(self.current) else {
            return false;
        };
        if self.peek_token_type(close + 1) == Some(&Token::Arrow) {
            return false;
        }
        let Some(mut after) = self.scan_type(self.current + 1) else {
            return false;
        };
        while self.peek_token_type(after) == Some(&Token::Amp) {
            match self.scan_type(after + 1) {
                Some(next) => after = next,
                None => return false,
            }
        }
        if after != close {
            return false;
        }

        let first = self
            .skip_annotations(self.current + 1)
            .and_then(|i| self.peek_token_type(i));
        if first.map_or(false, Token::is_primitive_type) {
            return true;
        }
        match self.peek_token_type(close + 1) {
            Some(t) => {
                t.is_literal()
                    || t.is_primitive_type()
                    || matches!(
                        t,
                        Token::Identifier | Token::LParen | Token::Bang | Token::Tilde | Token::This
                            | Token::Super | Token::New | Token::Switch
                    )
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use crate::parser::ParserOptions;
    use crate::source::SourceFile;

    fn expr(text: &str) -> (Expr, Vec<Diagnostic>) {
        let source = SourceFile::from_string(text);
        let mut diagnostics = Vec::new();
        let expr = Parser::new(&source, ParserOptions::default(), &mut diagnostics).parse_expression();
        (expr, diagnostics)
    }

    fn printed(text: &str) -> String {
        let (expr, diagnostics) = expr(text);
        assert!(diagnostics.is_empty(), "{}: {:?}", text, diagnostics);
        expr.to_string()
    }

    #[test]
    fn precedence_and_associativity() {
        match expr("a + b * c - d").0 {
            Expr::Binary(BinaryExpr { operator: BinaryOp::Sub, left, .. }) => {
                assert!(matches!(*left, Expr::Binary(BinaryExpr { operator: BinaryOp::Add, .. })));
            }
            other => panic!("unexpected tree {:?}", other),
        }
        match expr("a = b = c").0 {
            Expr::Assignment(a) => assert!(matches!(*a.value, Expr::Assignment(_))),
            other => panic!("unexpected tree {:?}", other),
        }
    }

    #[test]
    fn class_literal_is_member_select() {
        match expr("java.lang.String.class").0 {
            Expr::FieldAccess(f) => assert!(f.is_class_literal()),
            other => panic!("unexpected tree {:?}", other),
        }
        assert!(matches!(expr("int[].class").0, Expr::FieldAccess(_)));
    }

    #[test]
    fn casts_lambdas_and_parens() {
        assert!(matches!(expr("(String) o").0, Expr::Cast(_)));
        assert!(matches!(expr("(int) -x").0, Expr::Cast(_)));
        assert!(matches!(expr("(a) + b").0, Expr::Binary(_)));
        assert!(matches!(expr("(a, b) -> a + b").0, Expr::Lambda(_)));
        assert!(matches!(expr("x -> x * 2").0, Expr::Lambda(_)));
        assert!(matches!(expr("(Runnable & Serializable) () -> {}").0, Expr::Cast(_)));
    }

    #[test]
    fn generic_method_reference() {
        match expr("List<String>::new").0 {
            Expr::MethodRef(r) => {
                assert_eq!(r.name, "new");
                assert!(matches!(*r.target, Expr::Type(_)));
            }
            other => panic!("unexpected tree {:?}", other),
        }
        assert!(matches!(expr("String::valueOf").0, Expr::MethodRef(_)));
    }

    #[test]
    fn relational_is_not_generic() {
        assert!(matches!(expr("i < n && j > m").0, Expr::Binary(_)));
    }

    #[test]
    fn negative_literals_fold() {
        let (e, diagnostics) = expr("-2147483648");
        assert!(diagnostics.is_empty());
        assert!(matches!(e, Expr::Literal(LiteralExpr { value: Literal::Int(-2147483648), .. })));

        let (_, diagnostics) = expr("2147483648");
        assert_eq!(diagnostics[0].message, "integer number too large");
    }

    #[test]
    fn nested_generics_split_shift() {
        assert_eq!(printed("new HashMap<String, List<Integer>>()"), "new HashMap<String, List<Integer>>()");
        assert_eq!(printed("(Map<K, Map<K, List<V>>>) m"), "(Map<K, Map<K, List<V>>>) m");
    }

    #[test]
    fn creation_and_arrays() {
        assert_eq!(printed("new int[3][]"), "new int[3][]");
        assert_eq!(printed("new String[] {\"a\", \"b\"}"), "new String[] {\"a\", \"b\"}");
        assert!(matches!(expr("outer.new Inner()").0, Expr::New(NewExpr { outer: Some(_), .. })));
        let (_, diagnostics) = expr("new int[]");
        assert_eq!(diagnostics[0].message, "array dimension missing");
    }

    #[test]
    fn switch_expression_with_yield() {
        let (e, diagnostics) = expr("switch (k) { case 1, 2 -> \"low\"; default -> { yield \"high\"; } }");
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        match e {
            Expr::Switch(s) => {
                assert_eq!(s.cases.len(), 2);
                assert_eq!(s.cases[0].labels.len(), 2);
                assert!(s.cases[1].is_default());
            }
            other => panic!("unexpected tree {:?}", other),
        }
    }

    #[test]
    fn trailing_input_is_reported() {
        let (e, diagnostics) = expr("a b");
        assert!(matches!(e, Expr::Identifier(_)));
        assert_eq!(diagnostics[0].message, "unexpected trailing input");
    }

    #[test]
    fn illegal_start() {
        let (e, diagnostics) = expr(")");
        assert!(e.is_erroneous());
        assert_eq!(diagnostics[0].message, "illegal start of expression");
    }
}
