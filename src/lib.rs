//! Front end for a small expression language.
//!
//! Characters are tokenized by a backtracking, state-machine [`reader::Lexer`],
//! and statements are built into [`syntax::SyntaxTree`]s by a shunting-yard parser.
//! [`pipeline`] runs the two stages concurrently.

pub mod pipeline;
pub mod reader;
pub mod syntax;

pub use reader::{read, tokenize, ReadErr, ReadResult};
pub use syntax::SyntaxTree;
