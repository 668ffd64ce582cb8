pub mod expr;
pub mod operator;
pub mod stmt;

pub use expr::Expr;
pub use stmt::{
    Block, CaseDefaultStatement, CaseIdentifier, CaseIdentifierKind, CaseStatement, Parameter,
    Program, Stmt,
};
