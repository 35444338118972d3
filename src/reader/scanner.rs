//! A backtracking cursor over a character stream.
//!
//! The scanner reads lazily from any character iterator.
//! Every character it hands out goes onto the _backlog_, tagged with the position
//! it was read at, until the lexer either commits the backlog as a token ([`Scanner::emit`])
//! or throws it away ([`Scanner::discard`]).
//! Anything still on the backlog can be pushed back onto the input, one character at a time,
//! and the cursor restored exactly.

use super::token::{Position, Token, TokenKind};

pub struct Scanner<I>
where
    I: Iterator<Item = char>,
{
    input: I,
    // Characters that were read and then backed over, in reverse order.
    pushback: Vec<char>,
    backlog: Vec<(char, Position)>,
    position: Position,
}

impl<I> Scanner<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(input: I) -> Self {
        Scanner {
            input,
            pushback: Vec::new(),
            backlog: Vec::new(),
            position: Position::default(),
        }
    }

    /// Position of the next character to be read.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Consume the next character; None at the end of input.
    pub fn next(&mut self) -> Option<char> {
        let ch = self.pushback.pop().or_else(|| self.input.next())?;
        self.backlog.push((ch, self.position));
        self.position = self.position.advance(ch);
        Some(ch)
    }

    /// Undo the most recent `next`.
    ///
    /// Panics if nothing is pending on the backlog.
    pub fn back(&mut self) {
        let Some((ch, position)) = self.backlog.pop() else {
            panic!("scanner backed up with an empty backlog at {}", self.position);
        };
        self.position = position;
        self.pushback.push(ch);
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        let ch = self.next()?;
        self.back();
        Some(ch)
    }

    /// Consume characters as long as they match.
    /// Returns the first character that did not match (left unconsumed), or None at the end of input.
    pub fn next_while(&mut self, predicate: impl Fn(char) -> bool) -> Option<char> {
        while let Some(ch) = self.next() {
            if !predicate(ch) {
                self.back();
                return Some(ch);
            }
        }
        None
    }

    /// Undo every pending `next`.
    pub fn back_all(&mut self) {
        while !self.backlog.is_empty() {
            self.back();
        }
    }

    /// Text of the pending backlog.
    pub fn buffer(&self) -> String {
        self.backlog.iter().map(|(ch, _)| ch).collect()
    }

    /// Number of characters pending on the backlog.
    pub fn count(&self) -> usize {
        self.backlog.len()
    }

    /// Position of the first pending character;
    /// the current position if nothing is pending.
    pub fn start(&self) -> Position {
        self.backlog
            .first()
            .map(|(_, position)| *position)
            .unwrap_or(self.position)
    }

    /// Commit the backlog as a token, positioned at its first character.
    pub fn emit(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, self.buffer(), self.start());
        self.backlog.clear();
        tracing::trace!("emit {token}");
        token
    }

    /// Drop the backlog without producing a token.
    pub fn discard(&mut self) {
        self.backlog.clear();
    }
}
