use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Num,
    Str,
    Identifier,
    True,
    False,
    Null,

    And,
    Or,
    Not,
    If,
    Else,
    While,
    Fn,
    Return,
    Break,
    Continue,
    Let,
    Mut,
    Match,
    Case,
    Default,

    NumType,
    StrType,
    BoolType,

    IsEven,
    IsOdd,
    IsQuarterO,
    IsQuarterTw,
    IsQuarterTh,
    IsQuarterF,

    Assign,
    Eq,
    NotEq,
    Less,
    LessOrEq,
    Greater,
    GreaterOrEq,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    LeftBracket,
    RightBracket,
    LeftCurlyBracket,
    RightCurlyBracket,
    Colon,
    Semicolon,
    Comma,

    OneLineComment,
    MultilineComment,

    Eof,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::OneLineComment | TokenKind::MultilineComment)
    }

    pub fn is_relational_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Less
                | TokenKind::LessOrEq
                | TokenKind::Greater
                | TokenKind::GreaterOrEq
                | TokenKind::Eq
                | TokenKind::NotEq
        )
    }

    pub fn is_additive_operator(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    pub fn is_multiplicative_operator(self) -> bool {
        matches!(self, TokenKind::Star | TokenKind::Slash | TokenKind::Percent)
    }

    pub fn is_unary_operator(self) -> bool {
        matches!(self, TokenKind::Not | TokenKind::Minus)
    }

    pub fn is_case_operator(self) -> bool {
        matches!(
            self,
            TokenKind::IsEven
                | TokenKind::IsOdd
                | TokenKind::IsQuarterO
                | TokenKind::IsQuarterTw
                | TokenKind::IsQuarterTh
                | TokenKind::IsQuarterF
        )
    }

    pub fn is_data_type(self) -> bool {
        matches!(self, TokenKind::NumType | TokenKind::StrType | TokenKind::BoolType)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Num(f64),
    Str(String),
    Ident(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
    pub value: Option<TokenValue>,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self {
            kind,
            position,
            value: None,
        }
    }

    pub fn with_value(kind: TokenKind, position: Position, value: TokenValue) -> Self {
        Self {
            kind,
            position,
            value: Some(value),
        }
    }

    pub fn ident_name(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Ident(name)) => Some(name),
            _ => None,
        }
    }

    pub fn num_value(&self) -> Option<f64> {
        match &self.value {
            Some(TokenValue::Num(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn str_value(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}
