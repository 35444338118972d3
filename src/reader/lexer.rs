//! Module for extracting tokens from a character stream.
//!
//! The lexer is a finite-state machine over a [`Scanner`].
//! Each state consumes some characters, possibly emits tokens,
//! and names the state to run next; [`Lexer::next`] runs states until a token is ready.
//!
//! Whitespace separates tokens and is otherwise dropped,
//! except that each newline is emitted as a `Newline` token for diagnostics.

use std::collections::VecDeque;

use super::scanner::Scanner;
use super::token::{Token, TokenKind};
use super::{ReadErr, ReadResult};

/// Characters that can make up an operator.
const OPERATOR_SYMBOLS: &[char] = &['+', '-', '*', '/', ',', '=', '.', ';'];

/// Complete operator texts. Any other run of operator symbols is an error.
const OPERATORS: &[&str] = &["+", "-", "*", "/", ",", "=", "."];

const STATEMENT_TERMINATOR: &str = ";";

/// Words that cannot be used as identifiers.
const RESERVED: &[&str] = &["as"];

fn is_operator_symbol(ch: char) -> bool {
    OPERATOR_SYMBOLS.contains(&ch)
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    /// Skip whitespace, then continue as directed.
    Whitespace(Resume),
    /// Pick a state based on the next character.
    Expression,
    Number,
    IdentifierOrKeyword,
    /// After an identifier: is this a member access?
    DotLookahead,
    /// An identifier is required here; keywords are rejected.
    Identifier,
    Operator,
    Keyword,
}

/// States that can follow a run of whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Expression,
    DotLookahead,
    Identifier,
}

impl From<Resume> for State {
    fn from(value: Resume) -> Self {
        match value {
            Resume::Expression => State::Expression,
            Resume::DotLookahead => State::DotLookahead,
            Resume::Identifier => State::Identifier,
        }
    }
}

enum Step {
    Next(State),
    /// Clean end of input.
    Done,
}

/// Tokenizer over a character iterator.
///
/// Yields tokens as soon as they are complete.
/// After the first error, or the end of input, the iterator is finished.
pub struct Lexer<I>
where
    I: Iterator<Item = char>,
{
    scanner: Scanner<I>,
    // None once the machine has stopped.
    state: Option<State>,
    pending: VecDeque<Token>,
    failure: Option<ReadErr>,
}

impl<I> Lexer<I>
where
    I: Iterator<Item = char>,
{
    pub fn new(input: I) -> Self {
        Lexer {
            scanner: Scanner::new(input),
            state: Some(State::Start),
            pending: VecDeque::new(),
            failure: None,
        }
    }

    fn emit(&mut self, kind: TokenKind) {
        let token = self.scanner.emit(kind);
        self.pending.push_back(token);
    }

    fn step(&mut self, state: State) -> ReadResult<Step> {
        match state {
            State::Start => Ok(Step::Next(State::Whitespace(Resume::Expression))),
            State::Whitespace(resume) => self.whitespace(resume),
            State::Expression => self.expression(),
            State::Number => self.number(),
            State::IdentifierOrKeyword => self.identifier_or_keyword(),
            State::DotLookahead => self.dot_lookahead(),
            State::Identifier => self.identifier(),
            State::Operator => self.operator(),
            State::Keyword => self.keyword(),
        }
    }

    fn whitespace(&mut self, resume: Resume) -> ReadResult<Step> {
        while let Some(ch) = self.scanner.next() {
            match ch {
                '\n' => self.emit(TokenKind::Newline),
                ' ' | '\t' | '\r' => self.scanner.discard(),
                _ => {
                    self.scanner.back();
                    break;
                }
            }
        }
        Ok(Step::Next(resume.into()))
    }

    fn expression(&mut self) -> ReadResult<Step> {
        let next = match self.scanner.peek() {
            None => return Ok(Step::Done),
            Some(ch) if ch.is_alphabetic() => State::IdentifierOrKeyword,
            Some(ch) if ch.is_ascii_digit() => State::Number,
            Some(ch) if is_operator_symbol(ch) => State::Operator,
            Some(ch) => {
                return Err(ReadErr::UnexpectedCharacter {
                    ch,
                    position: self.scanner.position(),
                })
            }
        };
        Ok(Step::Next(next))
    }

    fn number(&mut self) -> ReadResult<Step> {
        if self.scanner.next_while(|ch| ch.is_ascii_digit()) == Some('.') {
            let position = self.scanner.start();
            self.scanner.next();
            return Err(ReadErr::UnsupportedFloat {
                text: self.scanner.buffer(),
                position,
            });
        }
        self.emit(TokenKind::Integer);
        Ok(Step::Next(State::Whitespace(Resume::Expression)))
    }

    fn identifier_or_keyword(&mut self) -> ReadResult<Step> {
        self.scanner.next_while(is_identifier_char);
        if is_reserved(&self.scanner.buffer()) {
            // Let the keyword state read it again from the start.
            self.scanner.back_all();
            return Ok(Step::Next(State::Keyword));
        }
        self.emit(TokenKind::Identifier);
        Ok(Step::Next(State::Whitespace(Resume::DotLookahead)))
    }

    fn dot_lookahead(&mut self) -> ReadResult<Step> {
        if self.scanner.peek() != Some('.') {
            return Ok(Step::Next(State::Expression));
        }
        self.scanner.next();
        self.emit(TokenKind::Operator);
        Ok(Step::Next(State::Whitespace(Resume::Identifier)))
    }

    fn identifier(&mut self) -> ReadResult<Step> {
        let position = self.scanner.position();
        match self.scanner.peek() {
            Some(ch) if ch.is_alphabetic() => (),
            _ => return Err(ReadErr::ExpectedIdentifier { position }),
        }
        self.scanner.next_while(is_identifier_char);
        let word = self.scanner.buffer();
        if is_reserved(&word) {
            return Err(ReadErr::ReservedWord { word, position });
        }
        self.emit(TokenKind::Identifier);
        Ok(Step::Next(State::Whitespace(Resume::DotLookahead)))
    }

    fn operator(&mut self) -> ReadResult<Step> {
        self.scanner.next_while(is_operator_symbol);
        let text = self.scanner.buffer();
        if text == STATEMENT_TERMINATOR {
            self.emit(TokenKind::StatementTerminator);
            Ok(Step::Next(State::Start))
        } else if OPERATORS.contains(&text.as_str()) {
            self.emit(TokenKind::Operator);
            Ok(Step::Next(State::Whitespace(Resume::Expression)))
        } else {
            Err(ReadErr::ExpectedOperator {
                text,
                position: self.scanner.start(),
            })
        }
    }

    fn keyword(&mut self) -> ReadResult<Step> {
        self.scanner.next_while(is_identifier_char);
        match self.scanner.buffer().as_str() {
            "as" => {
                self.emit(TokenKind::Keyword);
                Ok(Step::Next(State::Whitespace(Resume::Identifier)))
            }
            // Reserved, but without a keyword form.
            word => Err(ReadErr::ReservedWord {
                word: word.to_owned(),
                position: self.scanner.start(),
            }),
        }
    }
}

impl<I> Iterator for Lexer<I>
where
    I: Iterator<Item = char>,
{
    type Item = ReadResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Tokens emitted before a failure are still good.
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if let Some(err) = self.failure.take() {
                return Some(Err(err));
            }
            let state = self.state?;
            match self.step(state) {
                Ok(Step::Next(next)) => {
                    tracing::trace!("lexer: {state:?} -> {next:?}");
                    self.state = Some(next);
                }
                Ok(Step::Done) => {
                    tracing::trace!("lexer: end of input");
                    self.state = None;
                }
                Err(err) => {
                    tracing::warn!("lexer stopped: {err}");
                    self.state = None;
                    self.failure = Some(err);
                }
            }
        }
    }
}
