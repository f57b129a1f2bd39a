//! A small, closed query language for deriving a child collection from a
//! parent object.
//!
//! Subreports describe where their rows come from with an expression template
//! such as `sort_by({object}.orders, 'date')`. The template is bound to the
//! parent object and evaluated here. The language can only walk attributes of
//! that one binding and call registered pure functions, so templates stay
//! declarative and never execute arbitrary code.

pub mod ast;
pub mod engine;
pub mod error;
pub mod functions;
mod parser;
pub mod template;

// --- Public API ---
pub use ast::{Expression, PathSegment, Selection};
pub use engine::{EvaluationContext, evaluate, select};
pub use error::QueryError;
pub use functions::{FunctionRegistry, QueryFunction, compare_values};
pub use parser::parse_expression;
pub use template::{PARENT_BINDING, PLACEHOLDER, bind_template, evaluate_template};

#[cfg(test)]
mod tests {
    use super::*;
    use banded_types::{AttributeError, Value};
    use serde_json::json;

    fn customer() -> Value {
        Value::from(json!({
            "id": "c1",
            "orders": [
                { "id": "o1", "status": "open" },
                { "id": "o2", "status": "shipped" }
            ]
        }))
    }

    #[test]
    fn test_evaluate_simple_path() {
        let funcs = FunctionRegistry::default();
        let result = evaluate_template("{object}.orders", &customer(), &funcs).unwrap();
        assert_eq!(result.as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_evaluate_path_with_index() {
        let funcs = FunctionRegistry::default();
        let result = evaluate_template("{object}.orders[1].status", &customer(), &funcs).unwrap();
        assert_eq!(result, Value::from("shipped"));
    }

    #[test]
    fn test_evaluate_function_over_binding() {
        let funcs = FunctionRegistry::default();
        let result =
            evaluate_template("filter({object}.orders, 'status', 'open')", &customer(), &funcs)
                .unwrap();
        assert_eq!(result.as_list().unwrap().len(), 1);
    }

    #[test]
    fn test_custom_function_registration() {
        let mut funcs = FunctionRegistry::new();
        funcs.register("first_order", |args: &[Value]| {
            Ok(args
                .first()
                .and_then(Value::as_list)
                .and_then(|items| items.first().cloned())
                .unwrap_or_default())
        });
        let result = evaluate_template("first_order({object}.orders)", &customer(), &funcs).unwrap();
        assert_eq!(result.as_object().unwrap().identity(), "o1");
    }

    #[test]
    fn test_missing_attribute_is_an_error() {
        let funcs = FunctionRegistry::default();
        let err = evaluate_template("{object}.invoices", &customer(), &funcs).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Attribute(AttributeError::NotFound { ref attribute, .. }) if attribute == "invoices"
        ));
    }

    #[test]
    fn test_index_errors() {
        let funcs = FunctionRegistry::default();
        let err = evaluate_template("{object}.orders[5]", &customer(), &funcs).unwrap_err();
        assert_eq!(err, QueryError::IndexOutOfBounds { index: 5, len: 2 });
        let err = evaluate_template("{object}.id[0]", &customer(), &funcs).unwrap_err();
        assert_eq!(err, QueryError::NotIndexable("string"));
    }

    #[test]
    fn test_only_the_parent_binding_is_visible() {
        let funcs = FunctionRegistry::default();
        let expr = parse_expression("$other.orders").unwrap();
        let parent = customer();
        let ctx = EvaluationContext::new(PARENT_BINDING, &parent, &funcs);
        assert_eq!(
            evaluate(&expr, &ctx).unwrap_err(),
            QueryError::UnknownBinding("other".into())
        );
    }

    #[test]
    fn test_placeholder_must_appear_exactly_once() {
        assert!(matches!(
            bind_template("$parent.orders", PARENT_BINDING),
            Err(QueryError::Placeholder { count: 0, .. })
        ));
        assert!(matches!(
            bind_template("filter({object}.a, 'x', {object}.b)", PARENT_BINDING),
            Err(QueryError::Placeholder { count: 2, .. })
        ));
        assert_eq!(
            bind_template("{object}.orders", PARENT_BINDING).unwrap(),
            "$parent.orders"
        );
    }

    #[test]
    fn test_placeholder_inside_string_literal_is_text() {
        assert_eq!(
            bind_template("filter({object}.items, 'tag', '{object}')", PARENT_BINDING).unwrap(),
            "filter($parent.items, 'tag', '{object}')"
        );
        assert!(matches!(
            bind_template("filter($parent.items, 'tag', '{object}')", PARENT_BINDING),
            Err(QueryError::Placeholder { count: 0, .. })
        ));

        let funcs = FunctionRegistry::default();
        let parent = Value::from(json!({
            "items": [{ "tag": "{object}" }, { "tag": "other" }]
        }));
        let result =
            evaluate_template("filter({object}.items, 'tag', '{object}')", &parent, &funcs)
                .unwrap();
        assert_eq!(result.as_list().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_function() {
        let funcs = FunctionRegistry::default();
        let err = evaluate_template("explode({object}.orders)", &customer(), &funcs).unwrap_err();
        assert_eq!(err, QueryError::UnknownFunction("explode".into()));
    }
}
