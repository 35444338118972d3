//! Node types of the syntax tree, and the mapping from tokens to nodes.

use std::fmt;

use crate::reader::{ReadErr, ReadResult, Token, TokenKind};

/// The payload of a syntax tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Value(Value),
    /// An identifier. Not resolved against anything at parse time.
    Reference(String),
    Operator(Operator),
    Keyword(Keyword),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    FloatingPoint(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Sum,
    Difference,
    Product,
    Quotient,
    Remainder,
    Dot,
    Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Precedence tiers, lowest first: a higher tier binds more tightly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Assignment,
    SummationDifference,
    ProductQuotientRemainder,
    Dot,
}

/// Static properties of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub symbol: &'static str,
    pub associativity: Associativity,
    pub precedence: Precedence,
    pub arity: usize,
}

const fn binary(
    symbol: &'static str,
    associativity: Associativity,
    precedence: Precedence,
) -> OperatorInfo {
    OperatorInfo {
        symbol,
        associativity,
        precedence,
        arity: 2,
    }
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Sum,
        Operator::Difference,
        Operator::Product,
        Operator::Quotient,
        Operator::Remainder,
        Operator::Dot,
        Operator::Assignment,
    ];

    pub fn info(self) -> OperatorInfo {
        use Associativity::*;
        use Precedence::*;
        match self {
            Operator::Sum => binary("+", Left, SummationDifference),
            Operator::Difference => binary("-", Left, SummationDifference),
            Operator::Product => binary("*", Left, ProductQuotientRemainder),
            Operator::Quotient => binary("/", Left, ProductQuotientRemainder),
            Operator::Remainder => binary("%", Left, ProductQuotientRemainder),
            Operator::Dot => binary(".", Left, Dot),
            Operator::Assignment => binary("=", Right, Assignment),
        }
    }

    /// Look up an operator by its source text.
    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL
            .into_iter()
            .find(|op| op.info().symbol == symbol)
    }

    pub fn associativity(self) -> Associativity {
        self.info().associativity
    }

    pub fn precedence(self) -> Precedence {
        self.info().precedence
    }

    pub fn arity(self) -> usize {
        self.info().arity
    }

    /// Whether `self`, already on the operator stack,
    /// must be reduced before `incoming` is pushed.
    pub fn reduces_before(self, incoming: Operator) -> bool {
        match incoming.associativity() {
            Associativity::Left => incoming.precedence() <= self.precedence(),
            Associativity::Right => incoming.precedence() < self.precedence(),
        }
    }
}

impl Node {
    /// Build the node for a token.
    pub fn from_token(token: &Token) -> ReadResult<Node> {
        let text = token.text();
        let malformed = |reason: String| ReadErr::MalformedLiteral {
            token: token.clone(),
            reason,
        };
        match token.kind() {
            TokenKind::Integer => text
                .parse()
                .map(|v| Node::Value(Value::Integer(v)))
                .map_err(|e| malformed(format!("{e}"))),
            TokenKind::FloatingPoint => text
                .parse()
                .map(|v| Node::Value(Value::FloatingPoint(v)))
                .map_err(|e| malformed(format!("{e}"))),
            TokenKind::Identifier => Ok(Node::Reference(text.to_owned())),
            TokenKind::Operator => Operator::from_symbol(text)
                .map(Node::Operator)
                .ok_or_else(|| ReadErr::UnknownOperator {
                    token: token.clone(),
                }),
            TokenKind::Keyword => match text {
                "var" => Ok(Node::Keyword(Keyword::Var)),
                _ => Err(ReadErr::UnknownKeyword {
                    token: token.clone(),
                }),
            },
            TokenKind::String | TokenKind::Newline | TokenKind::StatementTerminator => {
                Err(ReadErr::UnexpectedToken {
                    token: token.clone(),
                })
            }
        }
    }

    /// Number of children a complete tree with this node has.
    pub fn arity(&self) -> usize {
        match self {
            Node::Operator(op) => op.arity(),
            Node::Value(_) | Node::Reference(_) | Node::Keyword(_) => 0,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(Value::Integer(v)) => write!(f, "{v}"),
            Node::Value(Value::FloatingPoint(v)) => write!(f, "{v:?}"),
            Node::Reference(name) => f.write_str(name),
            Node::Operator(op) => write!(f, "{op:?}"),
            Node::Keyword(Keyword::Var) => f.write_str("var"),
        }
    }
}
