//! Syntax trees built by the parser.

use std::fmt;

use crate::reader::{Position, ReadErr, ReadResult, Token};

mod node;

pub use node::*;

/// A node and its children.
///
/// A complete tree has exactly `node.arity()` children:
/// leaves have none, and operators have all their operands.
///
/// Trees can be as deep as the input is long (`a=a=a=...`),
/// so every walk over one uses an explicit stack rather than recursion.
pub struct SyntaxTree {
    node: Node,
    position: Position,
    children: Vec<SyntaxTree>,
}

impl SyntaxTree {
    /// A tree with no children (yet), located at `position`.
    pub fn new(node: Node, position: Position) -> Self {
        SyntaxTree {
            node,
            position,
            children: Vec::new(),
        }
    }

    pub fn from_token(token: &Token) -> ReadResult<Self> {
        Ok(SyntaxTree::new(Node::from_token(token)?, token.position()))
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Position of the token this node was built from.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn children(&self) -> &[SyntaxTree] {
        &self.children
    }

    pub fn is_complete(&self) -> bool {
        let mut pending = vec![self];
        while let Some(tree) = pending.pop() {
            if tree.children.len() != tree.node.arity() {
                return false;
            }
            pending.extend(&tree.children);
        }
        true
    }

    /// Take this node's operands off the top of `output`.
    ///
    /// The operands keep their order on the stack, which is their order in the source.
    /// If there are not enough, `output` is left alone.
    pub fn grab_children(&mut self, output: &mut Vec<SyntaxTree>) -> ReadResult<()> {
        let arity = self.node.arity();
        if output.len() < arity {
            return Err(ReadErr::NotEnoughArguments {
                tree: SyntaxTree::new(self.node.clone(), self.position),
            });
        }
        self.children = output.split_off(output.len() - arity);
        Ok(())
    }
}

impl Drop for SyntaxTree {
    fn drop(&mut self) {
        // Detach descendants before they drop, so no drop recurses.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut tree) = pending.pop() {
            pending.append(&mut tree.children);
        }
    }
}

impl PartialEq for SyntaxTree {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.node != b.node
                || a.position != b.position
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

enum Piece<'a> {
    Tree(&'a SyntaxTree),
    Text(&'static str),
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![Piece::Tree(self)];
        while let Some(piece) = pending.pop() {
            let tree = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Tree(tree) => tree,
            };
            write!(f, "{}", tree.node)?;
            if tree.children.is_empty() {
                continue;
            }
            f.write_str("(")?;
            pending.push(Piece::Text(")"));
            for (i, child) in tree.children.iter().enumerate().rev() {
                pending.push(Piece::Tree(child));
                if i > 0 {
                    pending.push(Piece::Text(", "));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxTree({self} at {})", self.position)
    }
}
