//! Expression templates: query text with a single `{object}` placeholder
//! standing for the parent object.
use crate::engine::{EvaluationContext, evaluate};
use crate::error::QueryError;
use crate::functions::FunctionRegistry;
use crate::parser::parse_expression;
use banded_types::Value;

pub const PLACEHOLDER: &str = "{object}";

/// The name the placeholder is rewritten to. It is the only binding visible
/// during evaluation.
pub const PARENT_BINDING: &str = "parent";

/// Substitutes the placeholder with a reference to `binding`. Placeholders
/// inside `'...'` string literals are left alone.
pub fn bind_template(template: &str, binding: &str) -> Result<String, QueryError> {
    // Even segments lie outside quotes.
    let segments: Vec<&str> = template.split('\'').collect();
    let count: usize = segments
        .iter()
        .step_by(2)
        .map(|segment| segment.matches(PLACEHOLDER).count())
        .sum();
    if count != 1 {
        return Err(QueryError::Placeholder {
            template: template.to_string(),
            count,
        });
    }
    let reference = format!("${}", binding);
    let bound: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            if i % 2 == 0 {
                segment.replace(PLACEHOLDER, &reference)
            } else {
                segment.to_string()
            }
        })
        .collect();
    Ok(bound.join("'"))
}

/// Binds `parent` into `template` and evaluates it.
pub fn evaluate_template(
    template: &str,
    parent: &Value,
    functions: &FunctionRegistry,
) -> Result<Value, QueryError> {
    let source = bind_template(template, PARENT_BINDING)?;
    let expr = parse_expression(&source)?;
    evaluate(&expr, &EvaluationContext::new(PARENT_BINDING, parent, functions))
}
