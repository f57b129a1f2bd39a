//! The evaluation environment subreports derive their collections with.

use banded_query::{FunctionRegistry, QueryError, evaluate_template};
use banded_types::Value;
use std::fmt;

/// Evaluates an expression template against a parent object.
///
/// Implementations must expose nothing but the parent binding to the
/// expression.
pub trait ExpressionEvaluator: fmt::Debug + Send + Sync {
    fn evaluate(&self, template: &str, parent: &Value) -> Result<Value, QueryError>;
}

/// The default evaluator, backed by the query language and a registry of
/// named pure functions.
#[derive(Debug, Clone, Default)]
pub struct QueryEvaluator {
    functions: FunctionRegistry,
}

impl QueryEvaluator {
    pub fn new(functions: FunctionRegistry) -> Self {
        Self { functions }
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}

impl ExpressionEvaluator for QueryEvaluator {
    fn evaluate(&self, template: &str, parent: &Value) -> Result<Value, QueryError> {
        evaluate_template(template, parent, &self.functions)
    }
}
