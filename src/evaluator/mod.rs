pub mod scope;
pub mod value;

use std::cmp::Ordering;
use std::io::{BufRead, Write};
use std::rc::Rc;

use crate::ast::operator::{
    AdditiveOperator, CaseOperator, MultiplicativeOperator, RelationalOperator, UnaryOperator,
};
use crate::ast::{Block, CaseDefaultStatement, CaseIdentifier, CaseIdentifierKind, CaseStatement, Expr, Parameter, Program, Stmt};
use crate::diagnostics::FatalError;
use crate::position::Position;
use scope::{Binding, Builtin, Function, GlobalScope, Var};
use value::{DataType, Value};

/// Recursion depth beyond which a user call is treated as a runaway
/// recursion rather than legitimate deep recursion.
const MAX_RECURSION_DEPTH: usize = 900;

/// Walks the AST and executes it. Holds its transient state -- `last_value`
/// and the three control-flow flags -- directly as fields rather than
/// bubbling a result enum through every call (see DESIGN.md). Fatal errors
/// still propagate the idiomatic way, via `Result`/`?`.
pub struct Evaluator<R, W> {
    scope: GlobalScope,
    last_value: Value,
    return_flag: bool,
    break_flag: bool,
    continue_flag: bool,
    recursion_depth: usize,
    stdin: R,
    stdout: W,
}

impl<R: BufRead, W: Write> Evaluator<R, W> {
    pub fn new(stdin: R, stdout: W) -> Self {
        let mut scope = GlobalScope::new();
        for builtin in Builtin::ALL {
            scope.update(Binding::Builtin(builtin));
        }
        Self {
            scope,
            last_value: Value::Null,
            return_flag: false,
            break_flag: false,
            continue_flag: false,
            recursion_depth: 0,
            stdin,
            stdout,
        }
    }

    pub fn run(&mut self, program: &Program) -> Result<(), FatalError> {
        log::debug!("starting evaluation of {} top-level statements", program.statements.len());
        self.run_statements(&program.statements)
    }

    fn run_statements(&mut self, statements: &[Stmt]) -> Result<(), FatalError> {
        for statement in statements {
            if self.return_flag || self.break_flag || self.continue_flag {
                break;
            }
            self.run_statement(statement)?;
        }
        Ok(())
    }

    fn run_block(&mut self, block: &Block) -> Result<(), FatalError> {
        self.run_statements(&block.statements)
    }

    fn run_statement(&mut self, statement: &Stmt) -> Result<(), FatalError> {
        match statement {
            Stmt::VarDefinition {
                name,
                expr,
                position,
                mutable,
            } => {
                let value = self.eval_expr(expr)?;
                if self.scope.look_up(name).is_some() {
                    return Err(FatalError::already_defined(*position, name));
                }
                self.scope.update(Binding::Var(Var::new(name.clone(), value, *mutable)));
                Ok(())
            }
            Stmt::Expression(expr) => {
                self.eval_expr(expr)?;
                Ok(())
            }
            Stmt::Block(block) => self.run_block(block),
            Stmt::Conditional {
                condition,
                if_block,
                else_block,
            } => {
                let truthy = self.eval_condition(condition)?;
                if truthy {
                    self.run_block(if_block)
                } else if let Some(else_block) = else_block {
                    self.run_block(else_block)
                } else {
                    Ok(())
                }
            }
            Stmt::Loop { condition, body } => {
                self.break_flag = false;
                while self.eval_condition(condition)? {
                    self.continue_flag = false;
                    self.run_block(body)?;
                    if self.break_flag {
                        self.break_flag = false;
                        break;
                    }
                    if self.return_flag {
                        break;
                    }
                }
                Ok(())
            }
            Stmt::Match {
                args,
                cases,
                default,
                position,
            } => self.run_match(args, cases, default.as_ref(), *position),
            Stmt::FunctionDefinition { name, params, body } => {
                self.scope.update(Binding::Function(Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: Rc::clone(body),
                }));
                Ok(())
            }
            Stmt::Return { expr } => {
                self.last_value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Null,
                };
                self.return_flag = true;
                Ok(())
            }
            Stmt::Break => {
                self.break_flag = true;
                Ok(())
            }
            Stmt::Continue => {
                self.continue_flag = true;
                Ok(())
            }
        }
    }

    fn eval_condition(&mut self, condition: &Expr) -> Result<bool, FatalError> {
        let position = condition.position();
        let value = self.eval_expr(condition)?;
        self.expect_bool(value, position)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, FatalError> {
        let value = match expr {
            Expr::Literal { value, .. } => value.clone(),
            Expr::Identifier { name, position } => self.eval_identifier(name, *position)?,
            Expr::Or { left, right, position } => self.eval_or(left, right.as_deref(), *position)?,
            Expr::And { left, right, position } => self.eval_and(left, right.as_deref(), *position)?,
            Expr::Relational {
                operator,
                left,
                right,
                position,
            } => self.eval_relational(*operator, left, right, *position)?,
            Expr::Additive {
                operator,
                left,
                right,
                position,
            } => self.eval_additive(*operator, left, right, *position)?,
            Expr::Multiplicative {
                operator,
                left,
                right,
                position,
            } => self.eval_multiplicative(*operator, left, right, *position)?,
            Expr::Negated { operator, factor, position } => self.eval_negated(*operator, factor, *position)?,
            Expr::Assignment { name, expr, position } => self.eval_assignment(name, expr, *position)?,
            Expr::Call {
                name,
                args,
                position,
                rparen_position,
            } => self.eval_call(name, args, *position, *rparen_position)?,
        };
        self.last_value = value.clone();
        Ok(value)
    }

    fn eval_identifier(&self, name: &str, position: Position) -> Result<Value, FatalError> {
        match self.scope.look_up(name) {
            Some(Binding::Var(var)) => Ok(var.value.clone()),
            Some(Binding::Function(_)) | Some(Binding::Builtin(_)) => Ok(Value::Null),
            None => Err(FatalError::not_defined(position, name)),
        }
    }

    fn eval_or(&mut self, left: &Expr, right: Option<&Expr>, position: Position) -> Result<Value, FatalError> {
        let left_value = self.eval_expr(left)?;
        let left_bool = self.expect_bool(left_value, position)?;
        if left_bool {
            return Ok(Value::Bool(true));
        }
        match right {
            Some(right) => {
                let right_value = self.eval_expr(right)?;
                let right_bool = self.expect_bool(right_value, position)?;
                Ok(Value::Bool(right_bool))
            }
            None => Ok(Value::Bool(false)),
        }
    }

    fn eval_and(&mut self, left: &Expr, right: Option<&Expr>, position: Position) -> Result<Value, FatalError> {
        let left_value = self.eval_expr(left)?;
        let left_bool = self.expect_bool(left_value, position)?;
        if !left_bool {
            return Ok(Value::Bool(false));
        }
        match right {
            Some(right) => {
                let right_value = self.eval_expr(right)?;
                let right_bool = self.expect_bool(right_value, position)?;
                Ok(Value::Bool(right_bool))
            }
            None => Ok(Value::Bool(true)),
        }
    }

    fn eval_relational(
        &mut self,
        operator: RelationalOperator,
        left: &Expr,
        right: &Expr,
        position: Position,
    ) -> Result<Value, FatalError> {
        let left_value = self.eval_expr(left)?;
        let right_value = self.eval_expr(right)?;
        if left_value.data_type() != right_value.data_type() {
            return Err(FatalError::operation_bad_types(position));
        }
        let result = match operator {
            RelationalOperator::Eq => left_value == right_value,
            RelationalOperator::NotEq => left_value != right_value,
            _ => {
                let ordering = left_value
                    .partial_cmp_same_type(&right_value)
                    .ok_or_else(|| FatalError::operation_bad_types(position))?;
                match operator {
                    RelationalOperator::Less => ordering == Ordering::Less,
                    RelationalOperator::LessOrEq => ordering != Ordering::Greater,
                    RelationalOperator::Greater => ordering == Ordering::Greater,
                    RelationalOperator::GreaterOrEq => ordering != Ordering::Less,
                    RelationalOperator::Eq | RelationalOperator::NotEq => unreachable!("handled above"),
                }
            }
        };
        Ok(Value::Bool(result))
    }

    fn eval_additive(
        &mut self,
        operator: AdditiveOperator,
        left: &Expr,
        right: &Expr,
        position: Position,
    ) -> Result<Value, FatalError> {
        let left_value = self.eval_expr(left)?;
        let right_value = self.eval_expr(right)?;
        let (Value::Num(a), Value::Num(b)) = (&left_value, &right_value) else {
            return Err(FatalError::operation_bad_types(position));
        };
        Ok(Value::Num(match operator {
            AdditiveOperator::Addition => a + b,
            AdditiveOperator::Subtraction => a - b,
        }))
    }

    fn eval_multiplicative(
        &mut self,
        operator: MultiplicativeOperator,
        left: &Expr,
        right: &Expr,
        position: Position,
    ) -> Result<Value, FatalError> {
        let left_value = self.eval_expr(left)?;
        let right_value = self.eval_expr(right)?;
        let (Value::Num(a), Value::Num(b)) = (&left_value, &right_value) else {
            return Err(FatalError::operation_bad_types(position));
        };
        match operator {
            MultiplicativeOperator::Multiplication => Ok(Value::Num(a * b)),
            MultiplicativeOperator::Division => {
                if *b == 0.0 {
                    return Err(FatalError::zero_division(position));
                }
                Ok(Value::Num(a / b))
            }
            MultiplicativeOperator::Modulo => {
                if *b == 0.0 {
                    return Err(FatalError::zero_division(position));
                }
                Ok(Value::Num(a % b))
            }
        }
    }

    fn eval_negated(&mut self, operator: UnaryOperator, factor: &Expr, position: Position) -> Result<Value, FatalError> {
        let value = self.eval_expr(factor)?;
        match (operator, value) {
            (UnaryOperator::Negation, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOperator::Minus, Value::Num(n)) => Ok(Value::Num(-n)),
            (UnaryOperator::Negation, other) => Err(FatalError::unexpected_type(position, DataType::Bool, other.data_type())),
            (UnaryOperator::Minus, other) => Err(FatalError::unexpected_type(position, DataType::Num, other.data_type())),
        }
    }

    fn eval_assignment(&mut self, name: &str, expr: &Expr, position: Position) -> Result<Value, FatalError> {
        let value = self.eval_expr(expr)?;
        match self.scope.look_up(name) {
            Some(Binding::Var(var)) if !var.mutable => return Err(FatalError::assign_mut(position, name)),
            Some(Binding::Var(_)) => {}
            Some(Binding::Function(_)) | Some(Binding::Builtin(_)) | None => {
                return Err(FatalError::not_defined(position, name));
            }
        }
        self.scope.update(Binding::Var(Var::new(name, value.clone(), true)));
        Ok(value)
    }

    fn eval_call(&mut self, name: &str, args: &[Expr], position: Position, rparen_position: Position) -> Result<Value, FatalError> {
        let binding = self
            .scope
            .look_up(name)
            .cloned()
            .ok_or_else(|| FatalError::not_defined(position, name))?;

        let params: Vec<Parameter> = match &binding {
            Binding::Function(function) => function.params.clone(),
            Binding::Builtin(builtin) => builtin.params(),
            Binding::Var(_) => return Err(FatalError::not_callable(position, name)),
        };

        if args.len() < params.len() {
            return Err(FatalError::missing_parameter(position, &params[args.len()].name));
        }
        if args.len() > params.len() {
            return Err(FatalError::unexpected_argument(rparen_position));
        }

        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval_expr(arg)?);
        }

        let call_args: Vec<Var> = params
            .into_iter()
            .zip(evaluated)
            .map(|(param, value)| Var::new(param.name, value, param.mutable))
            .collect();

        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.recursion_depth -= 1;
            return Err(FatalError::max_recursion_depth(position));
        }

        log::trace!("calling {name} with {} argument(s), depth {}", call_args.len(), self.recursion_depth);
        self.scope.call(binding.clone(), call_args);
        self.last_value = Value::Null;

        let run_result = match &binding {
            Binding::Builtin(builtin) => self.run_builtin(*builtin, position),
            Binding::Function(function) => {
                let body = Rc::clone(&function.body);
                self.run_block(&body)
            }
            Binding::Var(_) => unreachable!("callability already checked above"),
        };

        self.scope.fn_return();
        self.return_flag = false;
        self.recursion_depth -= 1;

        run_result?;
        Ok(self.last_value.clone())
    }

    fn run_builtin(&mut self, builtin: Builtin, position: Position) -> Result<(), FatalError> {
        log::trace!("dispatching builtin {}", builtin.name());
        match builtin {
            Builtin::Print => match self.param_value("arg") {
                Value::Str(s) => {
                    write!(self.stdout, "{s}").expect("stdout should be writable");
                    self.last_value = Value::Null;
                    Ok(())
                }
                other => Err(FatalError::unexpected_type(position, DataType::Str, other.data_type())),
            },
            Builtin::ToStr => {
                let value = self.param_value("arg");
                self.last_value = Value::Str(value.to_display_string());
                Ok(())
            }
            Builtin::Input => {
                let mut line = String::new();
                self.stdin.read_line(&mut line).expect("stdin should be readable");
                let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
                self.last_value = Value::Str(trimmed);
                Ok(())
            }
        }
    }

    fn param_value(&self, name: &str) -> Value {
        match self.scope.look_up(name) {
            Some(Binding::Var(var)) => var.value.clone(),
            _ => unreachable!("a builtin's frame always pre-populates its declared parameters"),
        }
    }

    fn run_match(
        &mut self,
        args: &[Expr],
        cases: &[CaseStatement],
        default: Option<&CaseDefaultStatement>,
        position: Position,
    ) -> Result<(), FatalError> {
        if args.is_empty() {
            return Err(FatalError::missing_parameter(position, "match argument"));
        }

        let mut match_args = Vec::with_capacity(args.len());
        for arg in args {
            match_args.push(self.eval_expr(arg)?);
        }

        for case in cases {
            if self.case_matches(&case.identifier, &match_args)? {
                return self.run_case_body(&case.params, &match_args, &case.body, case.identifier.position);
            }
        }

        if let Some(default) = default {
            return self.run_case_body(&default.params, &match_args, &default.body, position);
        }

        Ok(())
    }

    fn case_matches(&self, identifier: &CaseIdentifier, match_args: &[Value]) -> Result<bool, FatalError> {
        match &identifier.kind {
            CaseIdentifierKind::Operator(op) if op.is_parity() => {
                let Value::Num(n) = &match_args[0] else {
                    return Err(FatalError::unexpected_type(identifier.position, DataType::Num, match_args[0].data_type()));
                };
                let is_even = (*n as i64) % 2 == 0;
                Ok(match op {
                    CaseOperator::IsEven => is_even,
                    CaseOperator::IsOdd => !is_even,
                    _ => unreachable!("is_parity guarantees IsEven/IsOdd"),
                })
            }
            CaseIdentifierKind::Operator(op) if op.is_quadrant() => {
                if match_args.len() < 2 {
                    return Err(FatalError::missing_parameter(identifier.position, "y"));
                }
                let Value::Num(x) = &match_args[0] else {
                    return Err(FatalError::unexpected_type(identifier.position, DataType::Num, match_args[0].data_type()));
                };
                let Value::Num(y) = &match_args[1] else {
                    return Err(FatalError::unexpected_type(identifier.position, DataType::Num, match_args[1].data_type()));
                };
                Ok(match op {
                    CaseOperator::IsQuarterO => *x > 0.0 && *y > 0.0,
                    CaseOperator::IsQuarterTw => *x < 0.0 && *y > 0.0,
                    CaseOperator::IsQuarterTh => *x < 0.0 && *y < 0.0,
                    CaseOperator::IsQuarterF => *x > 0.0 && *y < 0.0,
                    _ => unreachable!("is_quadrant guarantees one of the four quadrant operators"),
                })
            }
            CaseIdentifierKind::Operator(_) => unreachable!("is_parity/is_quadrant cover every CaseOperator"),
            CaseIdentifierKind::LiteralType(data_type) => Ok(match_args[0].data_type() == *data_type),
            CaseIdentifierKind::Literal(literal) => {
                if match_args[0].data_type() != literal.data_type() {
                    return Ok(false);
                }
                Ok(match_args[0] == *literal)
            }
        }
    }

    fn run_case_body(&mut self, params: &[Parameter], match_args: &[Value], body: &Block, position: Position) -> Result<(), FatalError> {
        if params.len() > match_args.len() {
            return Err(FatalError::unexpected_argument(position));
        }
        // Extra match arguments beyond the case's declared parameters are
        // tolerated, not an error: zip below simply stops at params.len().
        // Case parameters bind into the currently visible scope: `match` is
        // not a call, it does not push its own frame.
        for (param, value) in params.iter().zip(match_args.iter().cloned()) {
            self.scope.update(Binding::Var(Var::new(param.name.clone(), value, param.mutable)));
        }
        self.run_block(body)
    }

    fn expect_bool(&self, value: Value, position: Position) -> Result<bool, FatalError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(FatalError::unexpected_type(position, DataType::Bool, other.data_type())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{CommentFilter, Lexer};
    use crate::parser::Parser;
    use crate::reader::Reader;
    use std::io::{Cursor, Write as _};
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    static FIXTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn run(source: &str) -> (Evaluator<Cursor<Vec<u8>>, Vec<u8>>, Result<(), FatalError>) {
        run_with_stdin(source, "")
    }

    fn run_with_stdin(source: &str, stdin: &str) -> (Evaluator<Cursor<Vec<u8>>, Vec<u8>>, Result<(), FatalError>) {
        let id = FIXTURE_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
        let path = std::env::temp_dir().join(format!("why-lang-evaluator-test-{}-{id}", std::process::id()));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(source.as_bytes()))
            .expect("fixture file should be writable");
        let reader = Reader::open(&path).expect("reader should open fixture file");
        let lexer = CommentFilter::new(Lexer::new(reader));
        let (program, _reader, diagnostics) = Parser::new(lexer).parse();
        assert!(diagnostics.is_empty(), "fixture should parse cleanly: {:?}", diagnostics.errors());

        let mut evaluator = Evaluator::new(Cursor::new(stdin.as_bytes().to_vec()), Vec::new());
        let result = evaluator.run(&program);
        (evaluator, result)
    }

    fn stdout_of(evaluator: &Evaluator<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(evaluator.stdout.clone()).expect("stdout should be valid utf8")
    }

    fn global_num(evaluator: &Evaluator<Cursor<Vec<u8>>, Vec<u8>>, name: &str) -> f64 {
        match evaluator.scope.look_up(name) {
            Some(Binding::Var(var)) => match var.value {
                Value::Num(n) => n,
                ref other => panic!("expected {name} to be num, got {other:?}"),
            },
            other => panic!("expected {name} to be a variable, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_scenario() {
        let (evaluator, result) = run("let a = 1; let mut b = 2; let c = b - a; let d = a / b;");
        result.expect("program should run without a fatal error");
        assert_eq!(global_num(&evaluator, "a"), 1.0);
        assert_eq!(global_num(&evaluator, "b"), 2.0);
        assert_eq!(global_num(&evaluator, "c"), 1.0);
        assert_eq!(global_num(&evaluator, "d"), 0.5);
    }

    #[test]
    fn while_loop_counts_up() {
        let (evaluator, result) = run("let mut a = 1; while a < 5 { a = a + 1; }");
        result.expect("program should run without a fatal error");
        assert_eq!(global_num(&evaluator, "a"), 5.0);
    }

    #[test]
    fn recursive_factorial_prints_without_trailing_newline() {
        let source = "fn f(n) { if n < 2 { return 1; } return n * f(n - 1); } print(to_str(f(5)));";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(stdout_of(&evaluator), "120");
    }

    #[test]
    fn match_literal_case_wins_over_default() {
        let source = "let mut a = 2; match a: case 2: (x) { a = a + 1; } default: (x) { a = a + 2; }";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(global_num(&evaluator, "a"), 3.0);
    }

    #[test]
    fn match_quadrant_predicate_wins() {
        let source = "let mut a = 1; match a, 1: case isQuarterO: (x,y) { a = 10; } default: (x) { a = 20; }";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(global_num(&evaluator, "a"), 10.0);
    }

    #[test]
    fn zero_division_is_fatal_at_the_operator_position() {
        let (_evaluator, result) = run("let a = 1 / 0;");
        let err = result.expect_err("division by zero should be fatal");
        assert!(matches!(err.kind, crate::diagnostics::ErrorKind::ZeroDivision));
    }

    #[test]
    fn print_embeds_escaped_newline_literally() {
        let (evaluator, result) = run(r#"print('hello\nworld');"#);
        result.expect("program should run without a fatal error");
        assert_eq!(stdout_of(&evaluator), "hello\nworld");
    }

    #[test]
    fn or_short_circuits_and_never_calls_the_right_side() {
        let source = "fn boom() { print(\"called\"); return true; } let a = true or boom();";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(stdout_of(&evaluator), "");
    }

    #[test]
    fn and_short_circuits_and_never_calls_the_right_side() {
        let source = "fn boom() { print(\"called\"); return true; } let a = false and boom();";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(stdout_of(&evaluator), "");
    }

    #[test]
    fn let_inside_a_function_does_not_leak_to_the_caller() {
        let source = "fn f() { let secret = 1; } f(); print(to_str(secret));";
        let (_evaluator, result) = run(source);
        let err = result.expect_err("secret should not be visible at the call site");
        assert!(matches!(err.kind, crate::diagnostics::ErrorKind::NotDefined));
    }

    #[test]
    fn immutable_binding_rejects_assignment() {
        let (_evaluator, result) = run("let a = 1; a = 2;");
        let err = result.expect_err("assigning to an immutable binding should be fatal");
        assert!(matches!(err.kind, crate::diagnostics::ErrorKind::AssignMut));
    }

    #[test]
    fn mutable_binding_accepts_assignment_and_type_change() {
        let (evaluator, result) = run(r#"let mut a = 1; a = "x";"#);
        result.expect("program should run without a fatal error");
        match evaluator.scope.look_up("a") {
            Some(Binding::Var(var)) => assert_eq!(var.value, Value::Str("x".to_string())),
            other => panic!("expected a to be a variable, got {other:?}"),
        }
    }

    #[test]
    fn recursion_past_the_limit_is_fatal() {
        // f(901) nests 902 active calls deep, past the 900 limit.
        let source = "fn f(n) { if n < 1 { return 0; } return f(n - 1); } f(901);";
        let (_evaluator, result) = run(source);
        let err = result.expect_err("902 nested calls should exceed the limit");
        assert!(matches!(err.kind, crate::diagnostics::ErrorKind::MaxRecursionDepth));
    }

    #[test]
    fn recursion_at_the_limit_succeeds() {
        // f(899) nests 900 active calls deep (f(899)..f(0)), exactly the limit.
        let source = "fn f(n) { if n < 1 { return 0; } return f(n - 1); } let a = f(899);";
        let (evaluator, result) = run(source);
        result.expect("900 nested calls should be within the limit");
        assert_eq!(global_num(&evaluator, "a"), 0.0);
    }

    #[test]
    fn else_block_runs_only_when_condition_was_falsy() {
        let source = "let mut a = 0; if false { a = 1; } else { a = 2; }";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(global_num(&evaluator, "a"), 2.0);

        let source = "let mut a = 0; if true { a = 1; } else { a = 2; }";
        let (evaluator, result) = run(source);
        result.expect("program should run without a fatal error");
        assert_eq!(global_num(&evaluator, "a"), 1.0);
    }

    #[test]
    fn input_builtin_reads_one_line_without_its_terminator() {
        let (evaluator, result) = run_with_stdin("print(input());", "hello\nworld\n");
        result.expect("program should run without a fatal error");
        assert_eq!(stdout_of(&evaluator), "hello");
    }

    #[test]
    fn to_str_drops_trailing_zero_for_integral_values() {
        let (evaluator, result) = run("print(to_str(120));");
        result.expect("program should run without a fatal error");
        assert_eq!(stdout_of(&evaluator), "120");
    }

    #[test]
    fn already_defined_name_is_fatal() {
        let (_evaluator, result) = run("let a = 1; let a = 2;");
        let err = result.expect_err("redefining a visible name should be fatal");
        assert!(matches!(err.kind, crate::diagnostics::ErrorKind::AlreadyDefined));
    }

    #[test]
    fn case_with_more_params_than_match_args_is_unexpected_argument() {
        let source = "match 1: case 1: (x, y) { } default: (x) { }";
        let (_evaluator, result) = run(source);
        let err = result.expect_err("a case declaring more params than match args should be fatal");
        assert!(matches!(err.kind, crate::diagnostics::ErrorKind::UnexpectedArgument));
    }

    #[test]
    fn case_with_fewer_params_than_match_args_tolerates_the_extras() {
        let source = "let mut a = 0; match 1, 2: case 1: (x) { a = x; } default: (x, y) { }";
        let (evaluator, result) = run(source);
        result.expect("extra match arguments beyond a case's params should be tolerated");
        assert_eq!(global_num(&evaluator, "a"), 1.0);
    }
}
