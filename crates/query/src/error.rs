use banded_types::AttributeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Query parse error in '{expression}': {message}")]
    Parse { expression: String, message: String },

    #[error("Expression template '{template}' must contain exactly one '{{object}}' placeholder, found {count}")]
    Placeholder { template: String, count: usize },

    #[error("Unknown binding '${0}'")]
    UnknownBinding(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error(transparent)]
    Attribute(#[from] AttributeError),

    #[error("Index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot index into a {0} value")]
    NotIndexable(&'static str),

    #[error("Function '{function}' error: {message}")]
    Function { function: String, message: String },
}
