//! Defines the Abstract Syntax Tree (AST) for collection queries.
use banded_types::Value;

/// The top-level representation of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value, like a string, number, or boolean.
    Literal(Value),
    /// A path starting at a named binding.
    Selection(Selection),
    /// A call to a registered function.
    FunctionCall { name: String, args: Vec<Expression> },
}

/// Represents a segment in a selection path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// An attribute lookup (e.g., `.orders`).
    Key(String),
    /// A list index (e.g., `[0]`).
    Index(usize),
}

/// A path rooted at a binding, e.g. `$parent.customer.orders[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub binding: String,
    pub path: Vec<PathSegment>,
}
