//! Lexer (tokenizer) for combination expressions.

use std::fmt;
use std::iter::{Enumerate, Peekable};
use std::str::Chars;

use crate::error::{FilterError, FilterResult};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A filter key (`[A-Za-z0-9_]+`).
    Identifier,
    /// The AND operator (`&`).
    And,
    /// The OR operator (`|`).
    Or,
    /// The NOT operator (`!`).
    Not,
    /// Opening parenthesis `(`.
    OpenParen,
    /// Closing parenthesis `)`.
    CloseParen,
}

/// A token with its text and position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 0-based character index where the token starts.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "IDENT({})", self.text),
            TokenKind::And => f.write_str("AND"),
            TokenKind::Or => f.write_str("OR"),
            TokenKind::Not => f.write_str("NOT"),
            TokenKind::OpenParen => f.write_str("LPAREN"),
            TokenKind::CloseParen => f.write_str("RPAREN"),
        }
    }
}

/// Lexer for tokenizing combination expressions.
///
/// A single left-to-right scan. Whitespace separates tokens, `& | ! ( )` are
/// one-character tokens, and runs of ASCII letters, digits and `_` form
/// identifiers. Anything else is an `InvalidCharacter` error.
pub struct Lexer<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().enumerate().peekable(),
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self
            .chars
            .next_if(|(_, c)| c.is_ascii_whitespace())
            .is_some()
        {}
    }

    /// Reads the rest of an identifier whose first character was already consumed.
    fn read_identifier(&mut self, first: char) -> String {
        let mut ident = String::from(first);
        while let Some((_, c)) = self.chars.next_if(|(_, c)| is_identifier_char(*c)) {
            ident.push(c);
        }
        ident
    }

    /// Returns the next token, or None at end of input.
    pub fn next_token(&mut self) -> Option<FilterResult<Token>> {
        self.skip_whitespace();

        let (position, c) = self.chars.next()?;
        let token = match c {
            '&' => Token::new(TokenKind::And, "&", position),
            '|' => Token::new(TokenKind::Or, "|", position),
            '!' => Token::new(TokenKind::Not, "!", position),
            '(' => Token::new(TokenKind::OpenParen, "(", position),
            ')' => Token::new(TokenKind::CloseParen, ")", position),
            _ if is_identifier_char(c) => {
                let ident = self.read_identifier(c);
                Token::new(TokenKind::Identifier, ident, position)
            }
            _ => {
                return Some(Err(FilterError::InvalidCharacter {
                    character: c,
                    position,
                }))
            }
        };
        Some(Ok(token))
    }

    /// Collects all tokens, stopping at the first invalid character.
    pub fn tokenize(self) -> FilterResult<Vec<Token>> {
        self.collect()
    }
}

impl Iterator for Lexer<'_> {
    type Item = FilterResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenizes `input`.
///
/// # Errors
///
/// Returns `FilterError::EmptyExpression` for empty or all-whitespace input
/// and `FilterError::InvalidCharacter` for characters outside the grammar.
pub fn tokenize(input: &str) -> FilterResult<Vec<Token>> {
    if input.trim().is_empty() {
        return Err(FilterError::EmptyExpression);
    }
    Lexer::new(input).tokenize()
}
