use std::fmt::Write as _;

use crate::ast::operator::{
    AdditiveOperator, CaseOperator, MultiplicativeOperator, RelationalOperator, UnaryOperator,
};
use crate::ast::{
    Block, CaseDefaultStatement, CaseIdentifier, CaseIdentifierKind, CaseStatement, Expr,
    Parameter, Program, Stmt,
};
use crate::evaluator::value::Value;

/// Renders a parsed program back into Why source. Exists to check parser
/// idempotence (parse -> print -> parse should yield the same tree, modulo
/// position metadata) and as a debugging aid for `--dump-parsed`-style use.
pub fn print_program(program: &Program) -> String {
    let mut out = String::new();
    for stmt in &program.statements {
        print_stmt(&mut out, stmt, 0);
    }
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

fn print_block(out: &mut String, block: &Block, depth: usize) {
    out.push_str("{\n");
    for stmt in &block.statements {
        print_stmt(out, stmt, depth + 1);
    }
    indent(out, depth);
    out.push('}');
}

fn print_params(out: &mut String, params: &[Parameter]) {
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if param.mutable {
            out.push_str("mut ");
        }
        out.push_str(&param.name);
    }
    out.push(')');
}

fn print_stmt(out: &mut String, stmt: &Stmt, depth: usize) {
    indent(out, depth);
    match stmt {
        Stmt::VarDefinition { name, expr, mutable, .. } => {
            out.push_str("let ");
            if *mutable {
                out.push_str("mut ");
            }
            write!(out, "{name} = ").unwrap();
            print_expr(out, expr);
            out.push_str(";\n");
        }
        Stmt::Expression(expr) => {
            print_expr(out, expr);
            out.push_str(";\n");
        }
        Stmt::Block(block) => {
            print_block(out, block, depth);
            out.push('\n');
        }
        Stmt::Conditional {
            condition,
            if_block,
            else_block,
        } => {
            out.push_str("if ");
            print_expr(out, condition);
            out.push(' ');
            print_block(out, if_block, depth);
            if let Some(else_block) = else_block {
                out.push_str(" else ");
                print_block(out, else_block, depth);
            }
            out.push('\n');
        }
        Stmt::Loop { condition, body } => {
            out.push_str("while ");
            print_expr(out, condition);
            out.push(' ');
            print_block(out, body, depth);
            out.push('\n');
        }
        Stmt::Match { args, cases, default, .. } => {
            out.push_str("match ");
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_expr(out, arg);
            }
            out.push_str(":\n");
            for case in cases {
                print_case(out, case, depth);
            }
            if let Some(default) = default {
                print_default(out, default, depth);
            }
        }
        Stmt::FunctionDefinition { name, params, body } => {
            write!(out, "fn {name}").unwrap();
            print_params(out, params);
            out.push(' ');
            print_block(out, body, depth);
            out.push('\n');
        }
        Stmt::Return { expr } => {
            out.push_str("return");
            if let Some(expr) = expr {
                out.push(' ');
                print_expr(out, expr);
            }
            out.push_str(";\n");
        }
        Stmt::Break => out.push_str("break;\n"),
        Stmt::Continue => out.push_str("continue;\n"),
    }
}

fn print_case(out: &mut String, case: &CaseStatement, depth: usize) {
    indent(out, depth + 1);
    out.push_str("case ");
    print_case_identifier(out, &case.identifier);
    out.push_str(": ");
    print_params(out, &case.params);
    out.push(' ');
    print_block(out, &case.body, depth + 1);
    out.push('\n');
}

fn print_default(out: &mut String, default: &CaseDefaultStatement, depth: usize) {
    indent(out, depth + 1);
    out.push_str("default: ");
    print_params(out, &default.params);
    out.push(' ');
    print_block(out, &default.body, depth + 1);
    out.push('\n');
}

fn print_case_identifier(out: &mut String, identifier: &CaseIdentifier) {
    match &identifier.kind {
        CaseIdentifierKind::Operator(op) => out.push_str(case_operator_name(*op)),
        CaseIdentifierKind::LiteralType(data_type) => write!(out, "{data_type}").unwrap(),
        CaseIdentifierKind::Literal(value) => print_value_literal(out, value),
    }
}

fn case_operator_name(op: CaseOperator) -> &'static str {
    match op {
        CaseOperator::IsEven => "isEven",
        CaseOperator::IsOdd => "isOdd",
        CaseOperator::IsQuarterO => "isQuarterO",
        CaseOperator::IsQuarterTw => "isQuarterTw",
        CaseOperator::IsQuarterTh => "isQuarterTh",
        CaseOperator::IsQuarterF => "isQuarterF",
    }
}

fn print_value_literal(out: &mut String, value: &Value) {
    match value {
        Value::Num(n) => write!(out, "{n}").unwrap(),
        Value::Str(s) => write!(out, "\"{}\"", escape_string(s)).unwrap(),
        Value::Bool(b) => write!(out, "{b}").unwrap(),
        Value::Null => out.push_str("null"),
    }
}

fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn print_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Literal { value, .. } => print_value_literal(out, value),
        Expr::Identifier { name, .. } => out.push_str(name),
        Expr::Or { left, right, .. } => print_binary(out, left, right.as_deref(), "or"),
        Expr::And { left, right, .. } => print_binary(out, left, right.as_deref(), "and"),
        Expr::Relational { operator, left, right, .. } => {
            print_binary(out, left, Some(right.as_ref()), relational_symbol(*operator));
        }
        Expr::Additive { operator, left, right, .. } => {
            print_binary(out, left, Some(right.as_ref()), additive_symbol(*operator));
        }
        Expr::Multiplicative { operator, left, right, .. } => {
            print_binary(out, left, Some(right.as_ref()), multiplicative_symbol(*operator));
        }
        Expr::Negated { operator, factor, .. } => {
            out.push_str(unary_symbol(*operator));
            print_expr(out, factor);
        }
        Expr::Assignment { name, expr, .. } => {
            write!(out, "{name} = ").unwrap();
            print_expr(out, expr);
        }
        Expr::Call { name, args, .. } => {
            write!(out, "{name}(").unwrap();
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                print_expr(out, arg);
            }
            out.push(')');
        }
    }
}

fn print_binary(out: &mut String, left: &Expr, right: Option<&Expr>, symbol: &str) {
    out.push('(');
    print_expr(out, left);
    if let Some(right) = right {
        write!(out, " {symbol} ").unwrap();
        print_expr(out, right);
    }
    out.push(')');
}

fn relational_symbol(op: RelationalOperator) -> &'static str {
    match op {
        RelationalOperator::Less => "<",
        RelationalOperator::LessOrEq => "<=",
        RelationalOperator::Eq => "==",
        RelationalOperator::NotEq => "!=",
        RelationalOperator::Greater => ">",
        RelationalOperator::GreaterOrEq => ">=",
    }
}

fn additive_symbol(op: AdditiveOperator) -> &'static str {
    match op {
        AdditiveOperator::Addition => "+",
        AdditiveOperator::Subtraction => "-",
    }
}

fn multiplicative_symbol(op: MultiplicativeOperator) -> &'static str {
    match op {
        MultiplicativeOperator::Multiplication => "*",
        MultiplicativeOperator::Division => "/",
        MultiplicativeOperator::Modulo => "%",
    }
}

fn unary_symbol(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Negation => "not ",
        UnaryOperator::Minus => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{CommentFilter, Lexer};
    use crate::parser::Parser;
    use crate::position::Position;
    use crate::reader::Reader;
    use std::io::Write as _;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static FIXTURE_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn parse(source: &str) -> Program {
        let id = FIXTURE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("why-lang-printer-test-{}-{id}", std::process::id()));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(source.as_bytes()))
            .expect("fixture file should be writable");
        let reader = Reader::open(&path).expect("reader should open fixture file");
        let lexer = CommentFilter::new(Lexer::new(reader));
        let (program, _reader, diagnostics) = Parser::new(lexer).parse();
        assert!(diagnostics.is_empty(), "fixture should parse cleanly: {:?}", diagnostics.errors());
        program
    }

    fn zero_expr_positions(expr: &mut Expr) {
        let zero = Position::new(0, 0, 0);
        match expr {
            Expr::Literal { position, .. } | Expr::Identifier { position, .. } => *position = zero,
            Expr::Or { left, right, position } | Expr::And { left, right, position } => {
                *position = zero;
                zero_expr_positions(left);
                if let Some(right) = right {
                    zero_expr_positions(right);
                }
            }
            Expr::Relational { left, right, position, .. }
            | Expr::Additive { left, right, position, .. }
            | Expr::Multiplicative { left, right, position, .. } => {
                *position = zero;
                zero_expr_positions(left);
                zero_expr_positions(right);
            }
            Expr::Negated { factor, position, .. } => {
                *position = zero;
                zero_expr_positions(factor);
            }
            Expr::Assignment { expr, position, .. } => {
                *position = zero;
                zero_expr_positions(expr);
            }
            Expr::Call { args, position, rparen_position, .. } => {
                *position = zero;
                *rparen_position = zero;
                for arg in args {
                    zero_expr_positions(arg);
                }
            }
        }
    }

    fn zero_block_positions(block: &mut Block) {
        for stmt in &mut block.statements {
            zero_stmt_positions(stmt);
        }
    }

    fn zero_stmt_positions(stmt: &mut Stmt) {
        let zero = Position::new(0, 0, 0);
        match stmt {
            Stmt::VarDefinition { expr, position, .. } => {
                *position = zero;
                zero_expr_positions(expr);
            }
            Stmt::Expression(expr) => zero_expr_positions(expr),
            Stmt::Block(block) => zero_block_positions(block),
            Stmt::Conditional {
                condition,
                if_block,
                else_block,
            } => {
                zero_expr_positions(condition);
                zero_block_positions(if_block);
                if let Some(else_block) = else_block {
                    zero_block_positions(else_block);
                }
            }
            Stmt::Loop { condition, body } => {
                zero_expr_positions(condition);
                zero_block_positions(body);
            }
            Stmt::Match {
                args,
                cases,
                default,
                position,
            } => {
                *position = zero;
                for arg in args {
                    zero_expr_positions(arg);
                }
                for case in cases {
                    case.identifier.position = zero;
                    zero_block_positions(&mut case.body);
                }
                if let Some(default) = default {
                    zero_block_positions(&mut default.body);
                }
            }
            Stmt::FunctionDefinition { body, .. } => {
                zero_block_positions(std::rc::Rc::make_mut(body));
            }
            Stmt::Return { expr } => {
                if let Some(expr) = expr {
                    zero_expr_positions(expr);
                }
            }
            Stmt::Break | Stmt::Continue => {}
        }
    }

    fn zero_program_positions(program: &mut Program) {
        for stmt in &mut program.statements {
            zero_stmt_positions(stmt);
        }
    }

    fn assert_round_trips(source: &str) {
        let mut first = parse(source);
        let printed = print_program(&first);
        let mut second = parse(&printed);
        zero_program_positions(&mut first);
        zero_program_positions(&mut second);
        assert_eq!(first, second, "re-parsing the printed program produced a different tree:\n{printed}");
    }

    #[test]
    fn round_trips_arithmetic_and_assignment() {
        assert_round_trips("let mut a = 1; let b = a + 2 * 3 - 4 / 2; a = b;");
    }

    #[test]
    fn round_trips_conditionals_and_loops() {
        assert_round_trips("if 1 < 2 { print(\"y\"); } else { print(\"n\"); } while true { break; }");
    }

    #[test]
    fn round_trips_functions_and_calls() {
        assert_round_trips("fn add(a, mut b) { return a + b; } let c = add(1, 2);");
    }

    #[test]
    fn round_trips_match_with_every_case_identifier_kind() {
        assert_round_trips(
            "match 1, 2: case isEven: (x) { print(\"e\"); } case num: (x) { print(\"n\"); } case 3: (x) { print(\"three\"); } default: (x) { print(\"d\"); }",
        );
    }

    #[test]
    fn round_trips_negation_and_short_circuit() {
        assert_round_trips("let a = not true; let b = -1; let c = a or b; let d = a and b;");
    }
}
