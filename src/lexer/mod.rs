pub mod token;

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::diagnostics::Diagnostics;
use crate::position::Position;
use crate::reader::Reader;
use token::{Token, TokenKind, TokenValue};

const MAX_DIGIT_SEQUENCE_LEN: usize = 39;

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    HashMap::from([
        ("and", And),
        ("or", Or),
        ("not", Not),
        ("if", If),
        ("else", Else),
        ("while", While),
        ("fn", Fn),
        ("return", Return),
        ("break", Break),
        ("continue", Continue),
        ("let", Let),
        ("mut", Mut),
        ("match", Match),
        ("case", Case),
        ("default", Default),
        ("true", True),
        ("false", False),
        ("null", Null),
        ("is", Eq),
        ("isEven", IsEven),
        ("isOdd", IsOdd),
        ("isQuarterO", IsQuarterO),
        ("isQuarterTw", IsQuarterTw),
        ("isQuarterTh", IsQuarterTh),
        ("isQuarterF", IsQuarterF),
        ("num", NumType),
        ("str", StrType),
        ("bool", BoolType),
    ])
});

fn escape_for(c: char) -> Option<char> {
    match c {
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        _ => None,
    }
}

/// A single-pass, one-character-lookahead scanner. `next_token` is the
/// only public operation; everything else is the chain of private
/// `build_*` recognizers it tries in order, mirroring the structure (if
/// not the exact line-for-line shape) of a straightforward hand-written
/// scanner for this grammar.
pub struct Lexer {
    reader: Reader,
    current: Option<char>,
    /// Position of `current` itself. `Reader::position` always reports
    /// where the *next* unread byte sits, so the start of `current` has
    /// to be captured right before the `get_char` call that produced it,
    /// not read off afterwards.
    current_position: Position,
}

impl Lexer {
    pub fn new(mut reader: Reader) -> Self {
        let current_position = reader.position();
        let current = reader.get_char();
        Self {
            reader,
            current,
            current_position,
        }
    }

    pub fn into_reader(self) -> Reader {
        self.reader
    }

    fn advance(&mut self) -> Option<char> {
        self.current_position = self.reader.position();
        self.current = self.reader.get_char();
        self.current
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current, Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        self.skip_whitespace();
        if let Some(token) = self.build_eof() {
            return token;
        }
        if let Some(token) = self.build_div_or_comment(diagnostics) {
            return token;
        }
        if let Some(token) = self.build_num(diagnostics) {
            return token;
        }
        if let Some(token) = self.build_str(diagnostics) {
            return token;
        }
        if let Some(token) = self.build_operator() {
            return token;
        }
        if let Some(token) = self.build_keyword_or_identifier() {
            return token;
        }
        log::trace!(
            "no lexical form recognized at {}; treating as end of input",
            self.current_position
        );
        Token::new(TokenKind::Eof, self.current_position)
    }

    fn build_eof(&self) -> Option<Token> {
        if self.current.is_none() {
            Some(Token::new(TokenKind::Eof, self.current_position))
        } else {
            None
        }
    }

    fn build_div_or_comment(&mut self, diagnostics: &mut Diagnostics) -> Option<Token> {
        if self.current != Some('/') {
            return None;
        }
        let position = self.current_position;
        self.advance();
        match self.current {
            Some('/') => {
                let mut comment = String::new();
                loop {
                    self.advance();
                    match self.current {
                        None | Some('\n') => break,
                        Some(c) => comment.push(c),
                    }
                }
                Some(Token::with_value(
                    TokenKind::OneLineComment,
                    position,
                    TokenValue::Comment(comment),
                ))
            }
            Some('*') => {
                let mut comment = String::new();
                loop {
                    self.advance();
                    if self.current.is_none() {
                        diagnostics.unexpected_end_of_text(position);
                        return None;
                    }
                    if self.current == Some('*') && self.reader.read_char() == Some('/') {
                        break;
                    }
                    comment.push(self.current.unwrap());
                }
                self.advance();
                self.advance();
                Some(Token::with_value(
                    TokenKind::MultilineComment,
                    position,
                    TokenValue::Comment(comment),
                ))
            }
            _ => Some(Token::new(TokenKind::Slash, position)),
        }
    }

    fn build_num(&mut self, diagnostics: &mut Diagnostics) -> Option<Token> {
        let current = self.current?;
        if !current.is_ascii_digit() {
            return None;
        }
        let position = self.current_position;
        let mut value = self.build_base(diagnostics)?;
        if self.current == Some('.') {
            self.advance();
            if matches!(self.current, Some(c) if c.is_ascii_digit()) {
                if let Some(fraction) = self.build_fraction(diagnostics) {
                    value += fraction;
                }
            }
        }
        Some(Token::with_value(TokenKind::Num, position, TokenValue::Num(value)))
    }

    fn build_base(&mut self, diagnostics: &mut Diagnostics) -> Option<f64> {
        if self.current == Some('0') {
            self.advance();
            if matches!(self.current, Some(c) if c.is_ascii_digit()) {
                diagnostics.leading_zero(self.current_position);
                return None;
            }
            return Some(0.0);
        }
        let (value, _length) = self.build_digit_sequence(diagnostics)?;
        Some(value)
    }

    fn build_fraction(&mut self, diagnostics: &mut Diagnostics) -> Option<f64> {
        let (value, radix) = self.build_digit_sequence(diagnostics)?;
        Some(value / 10f64.powi(radix as i32))
    }

    /// Accumulates in `f64`, not an integer type: the spec allows digit
    /// sequences up to 39 characters, far beyond what any integer type
    /// narrower than a bignum could hold, and the value is carried as
    /// `f64` from here on anyway. `length` is tracked solely to raise
    /// `NUM_OVERFLOW_ERROR` past the 39-digit limit.
    fn build_digit_sequence(&mut self, diagnostics: &mut Diagnostics) -> Option<(f64, u32)> {
        let mut length: u32 = 0;
        let mut value: f64 = 0.0;
        while let Some(c) = self.current {
            if !c.is_ascii_digit() {
                break;
            }
            value = value * 10.0 + c.to_digit(10).unwrap() as f64;
            length += 1;
            if length as usize > MAX_DIGIT_SEQUENCE_LEN {
                diagnostics.num_overflow_error(self.current_position);
                while matches!(self.current, Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
                return None;
            }
            self.advance();
        }
        Some((value, length))
    }

    fn build_str(&mut self, diagnostics: &mut Diagnostics) -> Option<Token> {
        self.build_str_quote('"', diagnostics)
            .or_else(|| self.build_str_quote('\'', diagnostics))
    }

    fn build_str_quote(&mut self, quote: char, diagnostics: &mut Diagnostics) -> Option<Token> {
        if self.current != Some(quote) {
            return None;
        }
        let position = self.current_position;
        let string = self.build_string_quote(quote, diagnostics)?;
        Some(Token::with_value(TokenKind::Str, position, TokenValue::Str(string)))
    }

    fn build_string_quote(&mut self, quote: char, diagnostics: &mut Diagnostics) -> Option<String> {
        let mut string = String::new();
        loop {
            self.advance();
            match self.current {
                None => {
                    diagnostics.unexpected_end_of_text(self.current_position);
                    return None;
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.reader.read_char() {
                    None => {
                        diagnostics.unexpected_end_of_text(self.current_position);
                        return None;
                    }
                    Some(next) => {
                        if let Some(escaped) = escape_for(next) {
                            string.push(escaped);
                            self.advance();
                        } else {
                            string.push('\\');
                        }
                    }
                },
                Some(c) => string.push(c),
            }
        }
        self.advance();
        Some(string)
    }

    fn build_operator(&mut self) -> Option<Token> {
        let current = self.current?;
        let position = self.current_position;
        if matches!(current, '=' | '!' | '<' | '>') {
            if let Some(next) = self.reader.read_char() {
                let two_char = match (current, next) {
                    ('=', '=') => Some(TokenKind::Eq),
                    ('!', '=') => Some(TokenKind::NotEq),
                    ('<', '=') => Some(TokenKind::LessOrEq),
                    ('>', '=') => Some(TokenKind::GreaterOrEq),
                    _ => None,
                };
                if let Some(kind) = two_char {
                    self.advance();
                    self.advance();
                    return Some(Token::new(kind, position));
                }
            }
            let kind = match current {
                '=' => TokenKind::Assign,
                '!' => TokenKind::Not,
                '<' => TokenKind::Less,
                '>' => TokenKind::Greater,
                _ => unreachable!(),
            };
            self.advance();
            return Some(Token::new(kind, position));
        }
        let kind = match current {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '{' => TokenKind::LeftCurlyBracket,
            '}' => TokenKind::RightCurlyBracket,
            '(' => TokenKind::LeftBracket,
            ')' => TokenKind::RightBracket,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => return None,
        };
        self.advance();
        Some(Token::new(kind, position))
    }

    fn build_keyword_or_identifier(&mut self) -> Option<Token> {
        let c = self.current?;
        if !(c.is_ascii_alphabetic() || c == '_') {
            return None;
        }
        let position = self.current_position;
        let mut buffer = String::new();
        buffer.push(c);
        loop {
            match self.advance() {
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => buffer.push(ch),
                _ => break,
            }
        }
        if let Some(&kind) = KEYWORDS.get(buffer.as_str()) {
            return Some(Token::new(kind, position));
        }
        Some(Token::with_value(
            TokenKind::Identifier,
            position,
            TokenValue::Ident(buffer),
        ))
    }
}

/// Decorator over `Lexer` that silently drops comment tokens, so the
/// parser never has to know comments exist.
pub struct CommentFilter {
    lexer: Lexer,
}

impl CommentFilter {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer }
    }

    pub fn into_reader(self) -> Reader {
        self.lexer.into_reader()
    }

    pub fn next_token(&mut self, diagnostics: &mut Diagnostics) -> Token {
        loop {
            let token = self.lexer.next_token(diagnostics);
            if !token.kind.is_comment() {
                return token;
            }
        }
    }
}
