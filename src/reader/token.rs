//! Tokens produced by the lexer, and the source positions they carry.

use std::fmt;

/// A location in the input stream.
///
/// All fields count from 0; the `Display` form is 1-indexed, for humans.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Characters consumed before this one.
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// The position following a character `ch` read at this position.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Position {
                index: self.index + 1,
                line: self.line + 1,
                column: 0,
            }
        } else {
            Position {
                index: self.index + 1,
                line: self.line,
                column: self.column + 1,
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // In useful output, lines and columns are 1-indexed
        write!(f, "line {} column {}", self.line + 1, self.column + 1)
    }
}

/// What sort of text a token holds.
///
/// `FloatingPoint` and `String` are part of the token vocabulary,
/// but the lexer does not produce them yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Integer,
    FloatingPoint,
    String,
    Identifier,
    Operator,
    Keyword,
    Newline,
    StatementTerminator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Integer => "integer",
            TokenKind::FloatingPoint => "floating-point",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Operator => "operator",
            TokenKind::Keyword => "keyword",
            TokenKind::Newline => "newline",
            TokenKind::StatementTerminator => "statement terminator",
        };
        f.write_str(name)
    }
}

/// A token along with its starting position in the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Position of the first character of the token.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.kind, self.text, self.position)
    }
}
