//! Shunting-yard parser: from a token stream to one syntax tree per statement.
//!
//! Each statement is reduced with two stacks:
//! `output` holds finished subtrees, and `operators` holds operators waiting for their operands.
//! When an operator arrives, anything on the operator stack that binds at least as tightly
//! (strictly more tightly, for right-associative operators) takes its operands off `output`
//! and goes back onto `output` as a finished subtree.
//! At the end of a statement the operator stack is drained the same way.
//!
//! Operators take as many operands as their arity says,
//! so nothing here is specific to binary operators.

use super::token::{Token, TokenKind};
use super::ReadResult;
use crate::syntax::{Node, Operator, SyntaxTree};

/// Parser over a stream of tokens (or token errors).
///
/// Yields completed statement trees.
/// An error from upstream, or a parse error, is yielded once and ends the stream.
pub struct ShuntingYard<I>
where
    I: Iterator<Item = ReadResult<Token>>,
{
    tokens: I,
    // Results of the last statement, to be yielded from the top.
    completed: Vec<SyntaxTree>,
    exhausted: bool,
}

impl<I> ShuntingYard<I>
where
    I: Iterator<Item = ReadResult<Token>>,
{
    pub fn new(tokens: I) -> Self {
        ShuntingYard {
            tokens,
            completed: Vec::new(),
            exhausted: false,
        }
    }

    /// Pop `top` operators while they reduce before `incoming` (all of them if None),
    /// moving each onto `output` with its operands.
    fn reduce(
        operators: &mut Vec<(Operator, SyntaxTree)>,
        output: &mut Vec<SyntaxTree>,
        incoming: Option<Operator>,
    ) -> ReadResult<()> {
        while let Some((top, _)) = operators.last() {
            if let Some(incoming) = incoming {
                if !top.reduces_before(incoming) {
                    break;
                }
            }
            let Some((_, mut tree)) = operators.pop() else {
                break;
            };
            tree.grab_children(output)?;
            tracing::trace!("reduced {tree}");
            output.push(tree);
        }
        Ok(())
    }

    /// Read and reduce one statement.
    /// Leaves its trees in `completed`.
    fn statement(&mut self) -> ReadResult<()> {
        let mut output: Vec<SyntaxTree> = Vec::new();
        let mut operators: Vec<(Operator, SyntaxTree)> = Vec::new();

        loop {
            let Some(token) = self.tokens.next() else {
                self.exhausted = true;
                break;
            };
            let token = token?;
            match token.kind() {
                TokenKind::StatementTerminator => break,
                TokenKind::Newline => continue,
                _ => (),
            }
            let tree = SyntaxTree::from_token(&token)?;
            match tree.node() {
                Node::Operator(op) => {
                    let op = *op;
                    Self::reduce(&mut operators, &mut output, Some(op))?;
                    operators.push((op, tree));
                }
                _ => output.push(tree),
            }
        }
        Self::reduce(&mut operators, &mut output, None)?;

        tracing::debug!("statement produced {} tree(s)", output.len());
        self.completed = output;
        Ok(())
    }
}

impl<I> Iterator for ShuntingYard<I>
where
    I: Iterator<Item = ReadResult<Token>>,
{
    type Item = ReadResult<SyntaxTree>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Trees come off in stack order: the last one built comes first.
            if let Some(tree) = self.completed.pop() {
                return Some(Ok(tree));
            }
            if self.exhausted {
                return None;
            }
            if let Err(err) = self.statement() {
                tracing::warn!("parser stopped: {err}");
                self.exhausted = true;
                return Some(Err(err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{read, Lexer, ReadErr};

    fn read_strings(input: &str) -> ReadResult<Vec<String>> {
        Ok(read(input)?.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn precedence() -> ReadResult<()> {
        assert_eq!(read_strings("3+4*8;")?, ["Sum(3, Product(4, 8))"]);
        assert_eq!(read_strings("3*4+8;")?, ["Sum(Product(3, 4), 8)"]);
        Ok(())
    }

    #[test]
    fn left_associative() -> ReadResult<()> {
        assert_eq!(
            read_strings("8-4-2;")?,
            ["Difference(Difference(8, 4), 2)"]
        );
        assert_eq!(read_strings("8/4*2;")?, ["Product(Quotient(8, 4), 2)"]);
        Ok(())
    }

    #[test]
    fn right_associative() -> ReadResult<()> {
        assert_eq!(
            read_strings("a=b=3;")?,
            ["Assignment(a, Assignment(b, 3))"]
        );
        Ok(())
    }

    #[test]
    fn member_access_binds_tightest() -> ReadResult<()> {
        assert_eq!(
            read_strings("x = a.b * 2;")?,
            ["Assignment(x, Product(Dot(a, b), 2))"]
        );
        Ok(())
    }

    #[test]
    fn separate_statements() -> ReadResult<()> {
        let trees = read("a=1;b=2;")?;
        assert_eq!(trees.len(), 2);
        for tree in &trees {
            assert_eq!(tree.node(), &Node::Operator(Operator::Assignment));
            assert!(tree.is_complete());
        }
        assert_eq!(trees[0].to_string(), "Assignment(a, 1)");
        assert_eq!(trees[1].to_string(), "Assignment(b, 2)");
        Ok(())
    }

    #[test]
    fn final_statement_needs_no_terminator() -> ReadResult<()> {
        assert_eq!(
            read_strings("a = 1;\nb + 2")?,
            ["Assignment(a, 1)", "Sum(b, 2)"]
        );
        Ok(())
    }

    #[test]
    fn empty_statements_produce_nothing() -> ReadResult<()> {
        assert!(read("; ;\n;")?.is_empty());
        assert!(read("")?.is_empty());
        Ok(())
    }

    #[test]
    fn loose_operands_come_out_last_first() -> ReadResult<()> {
        assert_eq!(read_strings("1 2+3 x;")?, ["Sum(3, x)", "2", "1"]);
        Ok(())
    }

    #[test]
    fn not_enough_arguments() {
        match read("+3;") {
            Err(ReadErr::NotEnoughArguments { tree }) => {
                assert_eq!(tree.node(), &Node::Operator(Operator::Sum));
                assert_eq!(tree.position().column, 0);
            }
            v => panic!("unexpected read result: {v:?}"),
        }
    }

    #[test]
    fn earlier_statements_survive_errors() {
        let tokens = Lexer::new("a = 1; b = ;".chars());
        let results: Vec<_> = ShuntingYard::new(tokens).collect();
        assert_eq!(results.len(), 2);
        match &results[0] {
            Ok(tree) => assert_eq!(tree.to_string(), "Assignment(a, 1)"),
            v => panic!("unexpected first result: {v:?}"),
        }
        assert!(matches!(
            results[1],
            Err(ReadErr::NotEnoughArguments { .. })
        ));
    }

    #[test]
    fn lexer_errors_pass_through() {
        match read("a = 1;\nb = 2.5;") {
            Err(ReadErr::UnsupportedFloat { position, .. }) => assert_eq!(position.line, 1),
            v => panic!("unexpected read result: {v:?}"),
        }
    }

    #[test]
    fn comma_has_no_node() {
        assert!(matches!(
            read("a, b;"),
            Err(ReadErr::UnknownOperator { .. })
        ));
    }
}
