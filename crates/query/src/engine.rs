//! The evaluation engine for executing a parsed query AST.
use super::ast::{Expression, PathSegment, Selection};
use super::functions::FunctionRegistry;
use crate::error::QueryError;
use banded_types::{Value, resolve_value};

/// Everything visible while evaluating an expression: exactly one named
/// binding and the registered functions.
#[derive(Clone)]
pub struct EvaluationContext<'a> {
    pub binding_name: &'a str,
    pub binding: &'a Value,
    pub functions: &'a FunctionRegistry,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(binding_name: &'a str, binding: &'a Value, functions: &'a FunctionRegistry) -> Self {
        Self {
            binding_name,
            binding,
            functions,
        }
    }
}

/// Evaluates a compiled expression to a [`Value`].
pub fn evaluate(expr: &Expression, e_ctx: &EvaluationContext) -> Result<Value, QueryError> {
    match expr {
        Expression::Literal(val) => Ok(val.clone()),
        Expression::Selection(sel) => select(sel, e_ctx),
        Expression::FunctionCall { name, args } => {
            let function = e_ctx
                .functions
                .get(name)
                .ok_or_else(|| QueryError::UnknownFunction(name.clone()))?;
            let evaluated_args = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            function(&evaluated_args)
        }
    }
}

/// Follows a selection path from the binding. Unlike a lenient lookup, a
/// missing attribute or index is an error, never `null`.
pub fn select(sel: &Selection, e_ctx: &EvaluationContext) -> Result<Value, QueryError> {
    if sel.binding != e_ctx.binding_name {
        return Err(QueryError::UnknownBinding(sel.binding.clone()));
    }

    let mut current = e_ctx.binding.clone();
    for segment in &sel.path {
        current = match segment {
            PathSegment::Key(key) => resolve_value(&current, key)?,
            PathSegment::Index(i) => match &current {
                Value::List(items) => items.get(*i).cloned().ok_or(QueryError::IndexOutOfBounds {
                    index: *i,
                    len: items.len(),
                })?,
                other => return Err(QueryError::NotIndexable(other.type_name())),
            },
        };
    }
    Ok(current)
}
