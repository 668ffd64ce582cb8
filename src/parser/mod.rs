use std::rc::Rc;

use crate::ast::operator::{
    AdditiveOperator, CaseOperator, MultiplicativeOperator, RelationalOperator, UnaryOperator,
};
use crate::ast::{
    Block, CaseDefaultStatement, CaseIdentifier, CaseIdentifierKind, CaseStatement, Expr,
    Parameter, Program, Stmt,
};
use crate::diagnostics::Diagnostics;
use crate::evaluator::value::{DataType, Value};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::CommentFilter;
use crate::reader::Reader;

/// Recursive-descent parser with one token of lookahead. Every diagnostic
/// raised here is non-fatal: parsing always continues afterwards, filling
/// in a placeholder node where a production could not complete, so that a
/// single malformed statement doesn't prevent the rest of the file from
/// being checked.
pub struct Parser {
    lexer: CommentFilter,
    token: Token,
    diagnostics: Diagnostics,
}

impl Parser {
    pub fn new(mut lexer: CommentFilter) -> Self {
        let mut diagnostics = Diagnostics::new();
        let token = lexer.next_token(&mut diagnostics);
        Self {
            lexer,
            token,
            diagnostics,
        }
    }

    pub fn parse(mut self) -> (Program, Reader, Diagnostics) {
        let mut statements = Vec::new();
        while let Some(statement) = self.parse_statement() {
            statements.push(statement);
        }
        (Program { statements }, self.lexer.into_reader(), self.diagnostics)
    }

    fn advance(&mut self) {
        self.token = self.lexer.next_token(&mut self.diagnostics);
    }

    fn consume_if(&mut self, kind: TokenKind) -> bool {
        if self.token.kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        self.parse_var_definition()
            .or_else(|| self.parse_conditional_statement())
            .or_else(|| self.parse_loop_statement())
            .or_else(|| self.parse_match_statement())
            .or_else(|| self.parse_assignment_or_function_call())
            .or_else(|| self.parse_function_definition())
            .or_else(|| self.parse_return_statement())
            .or_else(|| self.parse_break_statement())
            .or_else(|| self.parse_continue_statement())
    }

    /// `assignment = "let", ["mut"], identifier, assign_operator, expression, ";"`
    fn parse_var_definition(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::Let) {
            return None;
        }
        let mutable = self.consume_if(TokenKind::Mut);

        let position = self.token.position;
        if self.token.kind != TokenKind::Identifier {
            self.diagnostics.variable_name_expected(self.token.position);
        }
        let name = self.token.ident_name().unwrap_or_default().to_string();
        self.advance();

        if !self.consume_if(TokenKind::Assign) {
            self.diagnostics.assignment_operator_expected(self.token.position);
        }

        let expr = self.parse_expression();
        if expr.is_none() {
            self.diagnostics.expression_expected(self.token.position);
        }

        if !self.consume_if(TokenKind::Semicolon) {
            self.diagnostics.semicolon_expected(self.token.position);
        }

        Some(Stmt::VarDefinition {
            name,
            expr: expr.unwrap_or(Expr::Literal {
                value: Value::Null,
                position,
            }),
            position,
            mutable,
        })
    }

    /// `conditional_statement = "if", expression, code_block, ["else", code_block]`
    fn parse_conditional_statement(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::If) {
            return None;
        }

        let position = self.token.position;
        let condition = self.parse_expression();
        if condition.is_none() {
            self.diagnostics.expression_expected(self.token.position);
        }

        let if_block = self.parse_block();
        if if_block.is_none() {
            self.diagnostics.code_block_expected(self.token.position);
        }
        let condition = condition.unwrap_or(Expr::Literal {
            value: Value::Bool(false),
            position,
        });
        let if_block = if_block.unwrap_or(Block { statements: Vec::new() });

        if !self.consume_if(TokenKind::Else) {
            return Some(Stmt::Conditional {
                condition,
                if_block,
                else_block: None,
            });
        }

        let else_block = self.parse_block();
        if else_block.is_none() {
            self.diagnostics.code_block_expected(self.token.position);
        }
        Some(Stmt::Conditional {
            condition,
            if_block,
            else_block,
        })
    }

    /// `loop_statement = "while", expression, code_block`
    fn parse_loop_statement(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::While) {
            return None;
        }

        let position = self.token.position;
        let condition = self.parse_expression();
        if condition.is_none() {
            self.diagnostics.expression_expected(self.token.position);
        }
        let body = self.parse_block();
        if body.is_none() {
            self.diagnostics.code_block_expected(self.token.position);
        }

        Some(Stmt::Loop {
            condition: condition.unwrap_or(Expr::Literal {
                value: Value::Bool(false),
                position,
            }),
            body: body.unwrap_or(Block { statements: Vec::new() }),
        })
    }

    /// `match_statement = "match", match_arguments, ":", {case_statement}, default_statement`
    fn parse_match_statement(&mut self) -> Option<Stmt> {
        let position = self.token.position;
        if !self.consume_if(TokenKind::Match) {
            return None;
        }

        let args = self.parse_arguments();
        if args.is_empty() {
            self.diagnostics.expression_expected(self.token.position);
        }

        if !self.consume_if(TokenKind::Colon) {
            self.diagnostics.colon_expected(self.token.position);
        }

        let cases = self.parse_case_stmts();

        let default = self.parse_default_stmt();
        if default.is_none() {
            self.diagnostics.default_statement_expected(self.token.position);
        }

        Some(Stmt::Match {
            args,
            cases,
            default,
            position,
        })
    }

    /// `case_statement = "case", identifier, ":", case_parameters, code_block`
    fn parse_case_stmts(&mut self) -> Vec<CaseStatement> {
        let mut statements = Vec::new();
        while self.consume_if(TokenKind::Case) {
            let identifier = self.parse_case_identifier();
            if identifier.is_none() {
                self.diagnostics.expression_expected(self.token.position);
            }

            if !self.consume_if(TokenKind::Colon) {
                self.diagnostics.colon_expected(self.token.position);
            }

            let params = self.parse_parameters();
            let body = self.parse_block().unwrap_or(Block { statements: Vec::new() });

            if let Some(identifier) = identifier {
                statements.push(CaseStatement {
                    identifier,
                    params,
                    body,
                });
            }
        }
        statements
    }

    /// `case_identifier = literal | data_type | case_operator`
    fn parse_case_identifier(&mut self) -> Option<CaseIdentifier> {
        let position = self.token.position;
        if self.token.kind.is_case_operator() {
            let operator = CaseOperator::from_token_kind(&self.token.kind)?;
            self.advance();
            return Some(CaseIdentifier {
                kind: CaseIdentifierKind::Operator(operator),
                position,
            });
        }
        if self.token.kind.is_data_type() {
            let data_type = match self.token.kind {
                TokenKind::NumType => DataType::Num,
                TokenKind::StrType => DataType::Str,
                TokenKind::BoolType => DataType::Bool,
                _ => unreachable!("is_data_type guarantees one of the three data-type kinds"),
            };
            self.advance();
            return Some(CaseIdentifier {
                kind: CaseIdentifierKind::LiteralType(data_type),
                position,
            });
        }
        if let Some(Expr::Literal { value, .. }) = self.parse_literal() {
            return Some(CaseIdentifier {
                kind: CaseIdentifierKind::Literal(value),
                position,
            });
        }
        None
    }

    /// `default_statement = "default", ":", case_parameters, code_block`
    fn parse_default_stmt(&mut self) -> Option<CaseDefaultStatement> {
        if !self.consume_if(TokenKind::Default) {
            return None;
        }

        if !self.consume_if(TokenKind::Colon) {
            self.diagnostics.colon_expected(self.token.position);
        }

        let params = self.parse_parameters();
        let body = self.parse_block().unwrap_or(Block { statements: Vec::new() });
        Some(CaseDefaultStatement { params, body })
    }

    /// `function_definition = "fn", identifier, "(", [function_parameters], ")", code_block`
    fn parse_function_definition(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::Fn) {
            return None;
        }

        if self.token.kind != TokenKind::Identifier {
            self.diagnostics.identifier_expected(self.token.position);
        }
        let name = self.token.ident_name().unwrap_or_default().to_string();
        self.advance();

        if !self.consume_if(TokenKind::LeftBracket) {
            self.diagnostics.left_bracket_expected(self.token.position);
        }

        let params = self.parse_parameters();

        if !self.consume_if(TokenKind::RightBracket) {
            self.diagnostics.right_bracket_expected(self.token.position);
        }

        let body = self.parse_block().unwrap_or(Block { statements: Vec::new() });
        Some(Stmt::FunctionDefinition {
            name,
            params,
            body: Rc::new(body),
        })
    }

    fn parse_assignment_or_function_call(&mut self) -> Option<Stmt> {
        let expr = self.parse_identifier_or_assignment_or_function_call()?;
        if let Expr::Identifier { position, .. } = expr {
            // A bare identifier is neither an assignment nor a call, so it
            // has no observable effect; record that and still consume the
            // statement's semicolon instead of abandoning the rest of the
            // file.
            self.diagnostics.no_effect(position);
        }
        if !self.consume_if(TokenKind::Semicolon) {
            self.diagnostics.semicolon_expected(self.token.position);
        }
        Some(Stmt::Expression(expr))
    }

    /// `function_parameters = function_parameter, {",", function_parameter}`
    fn parse_parameters(&mut self) -> Vec<Parameter> {
        let mut parameters = Vec::new();
        let Some(first) = self.parse_parameter() else {
            return parameters;
        };
        parameters.push(first);

        while self.consume_if(TokenKind::Comma) {
            match self.parse_parameter() {
                Some(param) => parameters.push(param),
                None => return parameters,
            }
        }
        parameters
    }

    /// `function_parameter = ["mut"], identifier`
    fn parse_parameter(&mut self) -> Option<Parameter> {
        let mutable = self.consume_if(TokenKind::Mut);
        if self.token.kind != TokenKind::Identifier {
            return None;
        }
        let name = self.token.ident_name().unwrap_or_default().to_string();
        self.advance();
        Some(Parameter { name, mutable })
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::Return) {
            return None;
        }
        let expr = self.parse_expression();
        if !self.consume_if(TokenKind::Semicolon) {
            self.diagnostics.semicolon_expected(self.token.position);
        }
        Some(Stmt::Return { expr })
    }

    fn parse_continue_statement(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::Continue) {
            return None;
        }
        if !self.consume_if(TokenKind::Semicolon) {
            self.diagnostics.semicolon_expected(self.token.position);
        }
        Some(Stmt::Continue)
    }

    fn parse_break_statement(&mut self) -> Option<Stmt> {
        if !self.consume_if(TokenKind::Break) {
            return None;
        }
        if !self.consume_if(TokenKind::Semicolon) {
            self.diagnostics.semicolon_expected(self.token.position);
        }
        Some(Stmt::Break)
    }

    /// `expression = or_expression`
    fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_or_expression()
    }

    /// `or_expression = and_expression, {"or", and_expression}`
    fn parse_or_expression(&mut self) -> Option<Expr> {
        let mut left = self.parse_and_expression()?;
        let mut position = self.token.position;
        while self.consume_if(TokenKind::Or) {
            let right = self.parse_and_expression();
            if right.is_none() {
                self.diagnostics.expression_expected(self.token.position);
            }
            left = Expr::Or {
                left: Box::new(left),
                right: right.map(Box::new),
                position,
            };
            position = self.token.position;
        }
        Some(left)
    }

    /// `and_expression = relational_expression, {"and", relational_expression}`
    fn parse_and_expression(&mut self) -> Option<Expr> {
        let mut left = self.parse_relational_expression()?;
        let mut position = self.token.position;
        while self.consume_if(TokenKind::And) {
            let right = self.parse_relational_expression();
            if right.is_none() {
                self.diagnostics.expression_expected(self.token.position);
            }
            left = Expr::And {
                left: Box::new(left),
                right: right.map(Box::new),
                position,
            };
            position = self.token.position;
        }
        Some(left)
    }

    /// `relational_expression = additive_expression, {relational_operator, additive_expression}`
    fn parse_relational_expression(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive_expression()?;
        let mut position = self.token.position;
        while let Some(operator) = RelationalOperator::from_token_kind(&self.token.kind) {
            self.advance();
            let right = self.parse_additive_expression();
            if right.is_none() {
                self.diagnostics.expression_expected(self.token.position);
            }
            left = Expr::Relational {
                operator,
                left: Box::new(left),
                right: Box::new(right.unwrap_or(Expr::Literal {
                    value: Value::Null,
                    position,
                })),
                position,
            };
            position = self.token.position;
        }
        Some(left)
    }

    /// `additive_expression = multiplicative_expression, {additive_operator, multiplicative_expression}`
    fn parse_additive_expression(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative_expression()?;
        let mut position = self.token.position;
        while let Some(operator) = AdditiveOperator::from_token_kind(&self.token.kind) {
            self.advance();
            let right = self.parse_multiplicative_expression();
            if right.is_none() {
                self.diagnostics.expression_expected(self.token.position);
            }
            left = Expr::Additive {
                operator,
                left: Box::new(left),
                right: Box::new(right.unwrap_or(Expr::Literal {
                    value: Value::Null,
                    position,
                })),
                position,
            };
            position = self.token.position;
        }
        Some(left)
    }

    /// `multiplicative_expression = unary_expression, {multiplicative_operator, unary_expression}`
    fn parse_multiplicative_expression(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary_expression()?;
        let mut position = self.token.position;
        while let Some(operator) = MultiplicativeOperator::from_token_kind(&self.token.kind) {
            self.advance();
            let right = self.parse_unary_expression();
            if right.is_none() {
                self.diagnostics.expression_expected(self.token.position);
            }
            left = Expr::Multiplicative {
                operator,
                left: Box::new(left),
                right: Box::new(right.unwrap_or(Expr::Literal {
                    value: Value::Null,
                    position,
                })),
                position,
            };
            position = self.token.position;
        }
        Some(left)
    }

    /// `unary_expression = [unary_operator] factor`
    fn parse_unary_expression(&mut self) -> Option<Expr> {
        let is_unary = self.token.kind.is_unary_operator();
        let unary_kind = self.token.kind;
        let position = self.token.position;
        if is_unary {
            self.advance();
        }
        let factor = self.parse_factor();
        if !is_unary {
            return factor;
        }
        let operator = UnaryOperator::from_token_kind(&unary_kind)
            .expect("is_unary_operator guarantees a matching UnaryOperator");
        Some(Expr::Negated {
            operator,
            factor: Box::new(factor.unwrap_or(Expr::Literal {
                value: Value::Null,
                position,
            })),
            position,
        })
    }

    /// `factor = literal | identifier | function_call | "(", expression, ")"`
    fn parse_factor(&mut self) -> Option<Expr> {
        self.parse_literal()
            .or_else(|| self.parse_identifier_or_assignment_or_function_call())
            .or_else(|| self.parse_parenthesis())
    }

    /// `literal = number | string | bool | "null"`
    fn parse_literal(&mut self) -> Option<Expr> {
        let position = self.token.position;
        if self.token.kind == TokenKind::Num {
            let value = self.token.num_value().unwrap_or(0.0);
            self.advance();
            return Some(Expr::Literal {
                value: Value::Num(value),
                position,
            });
        }
        if self.token.kind == TokenKind::Str {
            let value = self.token.str_value().unwrap_or_default().to_string();
            self.advance();
            return Some(Expr::Literal {
                value: Value::Str(value),
                position,
            });
        }
        if self.consume_if(TokenKind::True) {
            return Some(Expr::Literal {
                value: Value::Bool(true),
                position,
            });
        }
        if self.consume_if(TokenKind::False) {
            return Some(Expr::Literal {
                value: Value::Bool(false),
                position,
            });
        }
        if self.consume_if(TokenKind::Null) {
            return Some(Expr::Literal {
                value: Value::Null,
                position,
            });
        }
        None
    }

    fn parse_identifier_or_assignment_or_function_call(&mut self) -> Option<Expr> {
        let position = self.token.position;
        if self.token.kind != TokenKind::Identifier {
            return None;
        }
        let name = self.token.ident_name().unwrap_or_default().to_string();
        self.advance();

        if self.consume_if(TokenKind::Assign) {
            let expr = self.parse_expression();
            return Some(Expr::Assignment {
                name,
                expr: Box::new(expr.unwrap_or(Expr::Literal {
                    value: Value::Null,
                    position,
                })),
                position,
            });
        }

        let call_position = self.token.position;
        if self.consume_if(TokenKind::LeftBracket) {
            let args = self.parse_arguments();
            let mut rparen_position = self.token.position;
            if !self.consume_if(TokenKind::RightBracket) {
                self.diagnostics.right_bracket_expected(self.token.position);
                rparen_position = call_position;
            }
            return Some(Expr::Call {
                name,
                args,
                position: call_position,
                rparen_position,
            });
        }

        Some(Expr::Identifier { name, position })
    }

    /// `argument_list = expression, {",", expression}`
    fn parse_arguments(&mut self) -> Vec<Expr> {
        let mut arguments = Vec::new();
        if let Some(expr) = self.parse_expression() {
            arguments.push(expr);
        }
        while self.consume_if(TokenKind::Comma) {
            match self.parse_expression() {
                Some(expr) => arguments.push(expr),
                None => return arguments,
            }
        }
        arguments
    }

    fn parse_parenthesis(&mut self) -> Option<Expr> {
        if !self.consume_if(TokenKind::LeftBracket) {
            return None;
        }
        let expr = self.parse_expression()?;
        if !self.consume_if(TokenKind::RightBracket) {
            return None;
        }
        Some(expr)
    }

    fn parse_block(&mut self) -> Option<Block> {
        if !self.consume_if(TokenKind::LeftCurlyBracket) {
            return None;
        }

        let mut statements = Vec::new();
        while let Some(statement) = self.parse_statement() {
            statements.push(statement);
        }

        if !self.consume_if(TokenKind::RightCurlyBracket) {
            self.diagnostics.right_curly_bracket_expected(self.token.position);
            return None;
        }
        Some(Block { statements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FIXTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn parse_source(source: &str) -> (Program, Diagnostics) {
        let id = FIXTURE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "why-lang-parser-test-{}-{id}",
            std::process::id()
        ));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(source.as_bytes()))
            .expect("fixture file should be writable");
        let reader = Reader::open(&path).expect("reader should open fixture file");
        let filter = CommentFilter::new(Lexer::new(reader));
        let (program, _reader, diagnostics) = Parser::new(filter).parse();
        (program, diagnostics)
    }

    #[test]
    fn parses_var_definition() {
        let (program, diagnostics) = parse_source("let mut a = 1 + 2;");
        assert!(diagnostics.is_empty());
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Stmt::VarDefinition { mutable: true, .. }));
    }

    #[test]
    fn parses_if_else() {
        let (program, diagnostics) = parse_source("if a { b = 1; } else { b = 2; }");
        assert!(diagnostics.is_empty());
        assert!(matches!(
            program.statements[0],
            Stmt::Conditional { else_block: Some(_), .. }
        ));
    }

    #[test]
    fn parses_function_call_statement() {
        let (program, diagnostics) = parse_source("print(\"hi\");");
        assert!(diagnostics.is_empty());
        match &program.statements[0] {
            Stmt::Expression(Expr::Call { name, args, .. }) => {
                assert_eq!(name, "print");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected a call statement, got {other:?}"),
        }
    }

    #[test]
    fn bare_identifier_statement_is_diagnosed_as_no_effect_but_recovers() {
        let (program, diagnostics) = parse_source("a; let b = 1;");
        assert_eq!(diagnostics.errors().len(), 1);
        assert!(matches!(
            diagnostics.errors()[0].kind,
            crate::diagnostics::ErrorKind::NoEffect
        ));
        assert_eq!(program.statements.len(), 2);
        assert!(matches!(program.statements[0], Stmt::Expression(Expr::Identifier { .. })));
        assert!(matches!(program.statements[1], Stmt::VarDefinition { .. }));
    }

    #[test]
    fn missing_semicolon_is_diagnosed_but_parsing_continues() {
        let (program, diagnostics) = parse_source("let a = 1 let b = 2;");
        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn trailing_comma_in_call_arguments_truncates_gracefully() {
        let (program, _diagnostics) = parse_source("print(1, 2,);");
        match &program.statements[0] {
            Stmt::Expression(Expr::Call { args, .. }) => assert_eq!(args.len(), 2),
            other => panic!("expected a call statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_match_with_case_and_default() {
        let (program, diagnostics) = parse_source(
            "match a: case 1: { print(\"one\"); } default: { print(\"other\"); }",
        );
        assert!(diagnostics.is_empty());
        match &program.statements[0] {
            Stmt::Match { cases, default, .. } => {
                assert_eq!(cases.len(), 1);
                assert!(default.is_some());
            }
            other => panic!("expected a match statement, got {other:?}"),
        }
    }
}
