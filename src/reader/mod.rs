//! Support for reading statements from character input.
//!
//! Reading happens in two stages:
//! the [`Lexer`] turns characters into [`Token`]s,
//! and the [`ShuntingYard`] turns tokens into one [`SyntaxTree`] per statement.
//! Both stages are iterators, so they can be chained in-thread (as [`read`] does)
//! or run on separate workers connected by queues (see [`crate::pipeline`]).

use std::io::ErrorKind;

use crate::syntax::SyntaxTree;

mod lexer;
mod parse;
mod scanner;
mod token;

pub use lexer::Lexer;
pub use parse::ShuntingYard;
pub use scanner::Scanner;
pub use token::{Position, Token, TokenKind};

/// Split the input into its constituent tokens.
pub fn tokenize(input: &str) -> ReadResult<Vec<Token>> {
    Lexer::new(input.chars()).collect()
}

/// Parse the input as a sequence of statements.
pub fn read(input: &str) -> ReadResult<Vec<SyntaxTree>> {
    ShuntingYard::new(Lexer::new(input.chars())).collect()
}

/// Error type if a read does not complete.
///
/// All errors are fatal to the stage that detects them:
/// there is no resynchronization after a bad character or a malformed statement.
#[derive(Debug, thiserror::Error)]
pub enum ReadErr {
    #[error("unexpected character {ch:?} at {position}")]
    UnexpectedCharacter { ch: char, position: Position },

    #[error("expected operator, found {text:?} at {position}")]
    ExpectedOperator { text: String, position: Position },

    #[error("expected identifier at {position}")]
    ExpectedIdentifier { position: Position },

    #[error("reserved word {word:?} used where an identifier is expected, at {position}")]
    ReservedWord { word: String, position: Position },

    #[error("floating-point literals are not supported: {text:?} at {position}")]
    UnsupportedFloat { text: String, position: Position },

    #[error("malformed literal: {token}: {reason}")]
    MalformedLiteral { token: Token, reason: String },

    #[error("unknown operator: {token}")]
    UnknownOperator { token: Token },

    #[error("unknown keyword: {token}")]
    UnknownKeyword { token: Token },

    #[error("unexpected token: {token}")]
    UnexpectedToken { token: Token },

    #[error("not enough arguments for {tree} at {}", .tree.position())]
    NotEnoughArguments { tree: SyntaxTree },

    #[error("could not read input at {position}: {reason}")]
    Input { reason: String, position: Position },

    #[error("{stage} worker failed: {reason}")]
    Worker { stage: &'static str, reason: String },
}

/// The main result type for this module:
/// a T (token, tree, etc), or an error.
pub type ReadResult<T> = Result<T, ReadErr>;

impl From<ReadErr> for std::io::Error {
    fn from(value: ReadErr) -> Self {
        match value {
            ReadErr::Worker { .. } => std::io::Error::new(ErrorKind::Other, value.to_string()),
            _ => std::io::Error::new(ErrorKind::InvalidInput, value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_report_position() {
        match read("a = 3 $") {
            Err(e @ ReadErr::UnexpectedCharacter { ch: '$', .. }) => {
                let message = e.to_string();
                assert!(
                    message.contains("line 1 column 7"),
                    "missing position from error string: {message:?}"
                );
            }
            v => panic!("unexpected read result: {v:?}"),
        }
    }

    #[test]
    fn error_converts_to_io_error() {
        let err: std::io::Error = ReadErr::ExpectedIdentifier {
            position: Position::default(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn read_several_statements() -> ReadResult<()> {
        let got: Vec<String> = read("a = 1;\nb = a * 2;")?
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(got, ["Assignment(a, 1)", "Assignment(b, Product(a, 2))"]);
        Ok(())
    }
}
