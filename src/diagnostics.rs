use std::fmt;

use crate::evaluator::value::DataType;
use crate::position::Position;
use crate::reader::Reader;

/// The complete taxonomy of things that can go wrong, spanning both the
/// non-fatal (lex/parse) and fatal (evaluator) regimes. Keeping one enum
/// for both regimes, rather than splitting it, keeps `Diagnostic` and
/// `FatalError` structurally identical and lets a single formatter serve
/// both (see `format`, below).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEndOfText,
    NumOverflowError,
    LeadingZero,
    VariableNameExpected,
    AssignmentOperatorExpected,
    SemicolonExpected,
    ExpressionExpected,
    CodeBlockExpected,
    ColonExpected,
    IdentifierExpected,
    LeftBracketExpected,
    RightBracketExpected,
    RightCurlyBracketExpected,
    DefaultStatementExpected,
    NoEffect,
    OperationBadTypes,
    ZeroDivision,
    NotDefined,
    NotCallable,
    MissingParameter,
    UnexpectedArgument,
    AssignMut,
    UnexpectedType,
    AlreadyDefined,
    MaxRecursionDepth,
}

/// A non-fatal lex/parse diagnostic. Accumulated in a list; recording one
/// never stops the lexer or parser from continuing.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Position,
}

/// A fatal evaluator error. Unlike `Diagnostic`, raising one unwinds the
/// current evaluation immediately via `Result`/`?`.
#[derive(Debug, Clone)]
pub struct FatalError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Position,
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FatalError {}

impl FatalError {
    pub fn operation_bad_types(position: Position) -> Self {
        Self {
            kind: ErrorKind::OperationBadTypes,
            message: "not supported between types".to_string(),
            position,
        }
    }

    pub fn zero_division(position: Position) -> Self {
        Self {
            kind: ErrorKind::ZeroDivision,
            message: "attempt to divide by zero".to_string(),
            position,
        }
    }

    pub fn not_defined(position: Position, name: &str) -> Self {
        Self {
            kind: ErrorKind::NotDefined,
            message: format!("{name} is not defined"),
            position,
        }
    }

    pub fn not_callable(position: Position, name: &str) -> Self {
        Self {
            kind: ErrorKind::NotCallable,
            message: format!("{name} is not callable"),
            position,
        }
    }

    pub fn missing_parameter(position: Position, name: &str) -> Self {
        Self {
            kind: ErrorKind::MissingParameter,
            message: format!("missing parameter {name}"),
            position,
        }
    }

    pub fn unexpected_argument(position: Position) -> Self {
        Self {
            kind: ErrorKind::UnexpectedArgument,
            message: "unexpected argument".to_string(),
            position,
        }
    }

    pub fn assign_mut(position: Position, name: &str) -> Self {
        Self {
            kind: ErrorKind::AssignMut,
            message: format!("attempt to assign to immutable variable {name}"),
            position,
        }
    }

    pub fn unexpected_type(position: Position, expected: DataType, found: DataType) -> Self {
        Self {
            kind: ErrorKind::UnexpectedType,
            message: format!("unexpected type: expected {expected} but found {found}"),
            position,
        }
    }

    pub fn already_defined(position: Position, name: &str) -> Self {
        Self {
            kind: ErrorKind::AlreadyDefined,
            message: format!("attempt to redefine variable {name}"),
            position,
        }
    }

    pub fn max_recursion_depth(position: Position) -> Self {
        Self {
            kind: ErrorKind::MaxRecursionDepth,
            message: "reached maximum recursion depth".to_string(),
            position,
        }
    }
}

/// Accumulates non-fatal lex/parse diagnostics. Shared by the lexer and
/// the parser so both stages report into the same ordered list.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, kind: ErrorKind, message: impl Into<String>, position: Position) {
        log::debug!("recorded diagnostic {kind:?} at {position}");
        self.errors.push(Diagnostic {
            kind,
            message: message.into(),
            position,
        });
    }

    pub fn unexpected_end_of_text(&mut self, position: Position) {
        self.push(
            ErrorKind::UnexpectedEndOfText,
            "SyntaxError: unexpected EOF while parsing",
            position,
        );
    }

    pub fn num_overflow_error(&mut self, position: Position) {
        self.push(
            ErrorKind::NumOverflowError,
            "NumberOverFlowError: provided value cannot be handled",
            position,
        );
    }

    pub fn leading_zero(&mut self, position: Position) {
        self.push(
            ErrorKind::LeadingZero,
            "SyntaxError: leading zeros in decimal integer literals are not permitted",
            position,
        );
    }

    pub fn variable_name_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::VariableNameExpected,
            "Error: Variable name expected",
            position,
        );
    }

    pub fn assignment_operator_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::AssignmentOperatorExpected,
            "Error: Assignment operator expected",
            position,
        );
    }

    pub fn semicolon_expected(&mut self, position: Position) {
        self.push(ErrorKind::SemicolonExpected, "Error: \";\" expected", position);
    }

    pub fn expression_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::ExpressionExpected,
            "Error: Expression expected",
            position,
        );
    }

    pub fn code_block_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::CodeBlockExpected,
            "Error: Code block expected",
            position,
        );
    }

    pub fn colon_expected(&mut self, position: Position) {
        self.push(ErrorKind::ColonExpected, "Error: \":\" expected", position);
    }

    pub fn identifier_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::IdentifierExpected,
            "Error: Identifier expected",
            position,
        );
    }

    pub fn left_bracket_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::LeftBracketExpected,
            "Error: \"(\" expected",
            position,
        );
    }

    pub fn right_bracket_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::RightBracketExpected,
            "Error: \")\" expected",
            position,
        );
    }

    pub fn right_curly_bracket_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::RightCurlyBracketExpected,
            "Error: \"{\" expected",
            position,
        );
    }

    pub fn default_statement_expected(&mut self, position: Position) {
        self.push(
            ErrorKind::DefaultStatementExpected,
            "default statement expected",
            position,
        );
    }

    pub fn no_effect(&mut self, position: Position) {
        self.push(ErrorKind::NoEffect, "statement seems to have no effect", position);
    }
}

/// Renders a diagnostic or fatal error as the four-line caret format:
///
/// ```text
/// <message>
///    |
///  <row> | <line-contents>
///    |<spaces-to-column>^^^
/// ```
pub struct DiagnosticFormatter<'a> {
    reader: &'a Reader,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(reader: &'a Reader) -> Self {
        Self { reader }
    }

    pub fn format(&self, message: &str, position: Position) -> String {
        let (line, offset) = self.reader.get_line_n_offset(position);
        let gutter = position.row.to_string().len() + 2;
        format!(
            "{message}\n{pad}|\n {row} | {line}\n{pad}{spaces}^^^\n",
            pad = " ".repeat(gutter),
            row = position.row,
            spaces = " ".repeat(offset),
        )
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        self.format(&diagnostic.message, diagnostic.position)
    }

    pub fn format_fatal(&self, error: &FatalError) -> String {
        self.format(&error.message, error.position)
    }
}
