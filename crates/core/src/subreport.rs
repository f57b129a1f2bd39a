//! Subreports: report fragments whose objects are derived from a parent.
//!
//! A subreport holds an expression template such as `{object}.orders` instead
//! of a collection. Once a parent object is bound, the first read evaluates
//! the template against it and caches the result. Changing the parent, the
//! expression or the evaluator drops the cache, so a stale collection is
//! never observed.
//!
//! The cache is a single-threaded cell: a subreport instance belongs to the
//! one traversal that bound its parent. The composer binds a fresh clone per
//! parent object via [`SubReport::bound_to`].

use crate::band::{Band, DetailBand};
use crate::entity::Entity;
use crate::error::ReportError;
use crate::evaluator::{ExpressionEvaluator, QueryEvaluator};
use crate::group::Group;
use banded_types::{Object, Value};
use once_cell::unsync::OnceCell;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SubReport {
    query_expression: Option<String>,
    parent_object: Option<Object>,
    resolved: OnceCell<Vec<Object>>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    pub header: Option<Band>,
    pub detail: Option<DetailBand>,
    pub footer: Option<Band>,
    pub groups: Vec<Group>,
    pub emit_when_empty: bool,
}

impl Default for SubReport {
    fn default() -> Self {
        Self {
            query_expression: None,
            parent_object: None,
            resolved: OnceCell::new(),
            evaluator: Arc::new(QueryEvaluator::default()),
            header: None,
            detail: None,
            footer: None,
            groups: Vec::new(),
            emit_when_empty: false,
        }
    }
}

impl SubReport {
    pub fn new(query_expression: impl Into<String>) -> Self {
        Self {
            query_expression: Some(query_expression.into()),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, band: Band) -> Self {
        self.header = Some(band);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<DetailBand>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_footer(mut self, band: Band) -> Self {
        self.footer = Some(band);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_emit_when_empty(mut self, emit: bool) -> Self {
        self.emit_when_empty = emit;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.set_evaluator(evaluator);
        self
    }

    pub fn query_expression(&self) -> Option<&str> {
        self.query_expression.as_deref()
    }

    pub fn set_query_expression(&mut self, expression: Option<String>) {
        self.invalidate();
        self.query_expression = expression;
    }

    pub fn parent_object(&self) -> Option<&Object> {
        self.parent_object.as_ref()
    }

    pub fn set_parent_object(&mut self, parent: Option<Object>) {
        self.invalidate();
        self.parent_object = parent;
    }

    pub fn set_evaluator(&mut self, evaluator: Arc<dyn ExpressionEvaluator>) {
        self.invalidate();
        self.evaluator = evaluator;
    }

    /// A copy of this template bound to `parent`, with an empty cache.
    pub fn bound_to(&self, parent: Object) -> SubReport {
        let mut bound = self.clone();
        bound.set_parent_object(Some(parent));
        bound
    }

    /// True if the derived collection is currently cached.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    fn invalidate(&mut self) {
        self.resolved = OnceCell::new();
    }

    /// The derived collection, evaluated on first read.
    ///
    /// `Ok(None)` means there is nothing to derive from because the parent or
    /// the expression is unset. A failed evaluation is an error, never an
    /// empty collection.
    pub fn resolved_collection(&self) -> Result<Option<&[Object]>, ReportError> {
        let (Some(expression), Some(parent)) = (&self.query_expression, &self.parent_object)
        else {
            return Ok(None);
        };

        self.resolved
            .get_or_try_init(|| self.derive(expression, parent))
            .map(|objects| Some(objects.as_slice()))
    }

    fn derive(&self, expression: &str, parent: &Object) -> Result<Vec<Object>, ReportError> {
        log::debug!(
            "Resolving subreport '{}' for parent {}",
            expression,
            parent.identity()
        );
        let result = self
            .evaluator
            .evaluate(expression, &Value::Object(parent.clone()))
            .map_err(|e| ReportError::subreport(expression, parent, e))?;

        match result {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(obj) => Ok(obj),
                    other => Err(ReportError::subreport(
                        expression,
                        parent,
                        format!("item {} is a {} value, not an object", i, other.type_name()),
                    )),
                })
                .collect(),
            other => Err(ReportError::subreport(
                expression,
                parent,
                format!("expression produced a {} value, not a sequence", other.type_name()),
            )),
        }
    }
}

impl Entity for SubReport {
    fn groups(&self) -> &[Group] {
        &self.groups
    }

    fn emit_when_empty(&self) -> bool {
        self.emit_when_empty
    }

    fn object_list(&self) -> Result<Vec<Object>, ReportError> {
        Ok(self
            .resolved_collection()?
            .map(<[Object]>::to_vec)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banded_query::{FunctionRegistry, QueryError};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn object(json: serde_json::Value) -> Object {
        Value::from(json).as_object().cloned().unwrap()
    }

    fn customer(id: &str, orders: &[&str]) -> Object {
        let orders: Vec<_> = orders.iter().map(|o| json!({ "id": o })).collect();
        object(json!({ "id": id, "orders": orders }))
    }

    fn ids(objects: &[Object]) -> Vec<String> {
        objects.iter().map(|o| o.identity()).collect()
    }

    /// Counts evaluations so tests can observe the cache.
    #[derive(Debug, Default)]
    struct CountingEvaluator {
        inner: QueryEvaluator,
        calls: AtomicUsize,
    }

    impl ExpressionEvaluator for CountingEvaluator {
        fn evaluate(&self, template: &str, parent: &Value) -> Result<Value, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.evaluate(template, parent)
        }
    }

    #[test]
    fn test_unset_inputs_yield_no_collection() {
        let sub = SubReport::new("{object}.orders");
        assert!(sub.resolved_collection().unwrap().is_none());
        assert!(sub.object_list().unwrap().is_empty());

        let mut no_expr = SubReport::default();
        no_expr.set_parent_object(Some(customer("c1", &["o1"])));
        assert!(no_expr.resolved_collection().unwrap().is_none());
    }

    #[test]
    fn test_resolution_is_cached() {
        let counter = Arc::new(CountingEvaluator::default());
        let sub = SubReport::new("{object}.orders")
            .with_evaluator(counter.clone())
            .bound_to(customer("c1", &["o1", "o2"]));

        assert_eq!(ids(&sub.object_list().unwrap()), vec!["o1", "o2"]);
        assert_eq!(ids(&sub.object_list().unwrap()), vec!["o1", "o2"]);
        assert!(sub.is_resolved());
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_new_parent_invalidates_cache() {
        let mut sub = SubReport::new("{object}.orders");
        sub.set_parent_object(Some(customer("c1", &["o1"])));
        assert_eq!(ids(&sub.object_list().unwrap()), vec!["o1"]);

        sub.set_parent_object(Some(customer("c2", &["o7", "o8"])));
        assert!(!sub.is_resolved());
        assert_eq!(ids(&sub.object_list().unwrap()), vec!["o7", "o8"]);
    }

    #[test]
    fn test_new_expression_invalidates_cache() {
        let mut sub = SubReport::new("{object}.orders").bound_to(customer("c1", &["o1", "o2"]));
        assert_eq!(sub.object_list().unwrap().len(), 2);

        sub.set_query_expression(Some("take({object}.orders, 1)".into()));
        assert_eq!(ids(&sub.object_list().unwrap()), vec!["o1"]);
    }

    #[test]
    fn test_bound_copies_do_not_share_cache() {
        let template = SubReport::new("{object}.orders");
        let a = template.bound_to(customer("c1", &["o1"]));
        let b = template.bound_to(customer("c2", &["o2"]));
        assert_eq!(ids(&a.object_list().unwrap()), vec!["o1"]);
        assert_eq!(ids(&b.object_list().unwrap()), vec!["o2"]);
        assert!(!template.is_resolved());
    }

    #[test]
    fn test_failed_expression_is_not_an_empty_collection() {
        let sub = SubReport::new("{object}.invoices").bound_to(customer("c1", &[]));
        let err = sub.object_list().unwrap_err();
        match err {
            ReportError::SubReportResolution { expression, parent, reason } => {
                assert_eq!(expression, "{object}.invoices");
                assert_eq!(parent, "c1");
                assert!(reason.contains("invoices"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!sub.is_resolved());
    }

    #[test]
    fn test_empty_result_of_valid_expression() {
        let sub = SubReport::new("{object}.orders").bound_to(customer("c1", &[]));
        assert_eq!(sub.resolved_collection().unwrap().map(<[Object]>::len), Some(0));
        assert!(sub.is_suppressed().unwrap());
        assert!(!sub.clone().with_emit_when_empty(true).is_suppressed().unwrap());
    }

    #[test]
    fn test_non_sequence_results_are_rejected() {
        let scalar = SubReport::new("{object}.id").bound_to(customer("c1", &[]));
        assert!(matches!(
            scalar.object_list(),
            Err(ReportError::SubReportResolution { .. })
        ));

        let parent = object(json!({ "id": "p", "tags": ["a", "b"] }));
        let scalars = SubReport::new("{object}.tags").bound_to(parent);
        let err = scalars.object_list().unwrap_err();
        assert!(err.to_string().contains("item 0 is a string value"));
    }

    #[test]
    fn test_registered_function_derivation() {
        let mut functions = FunctionRegistry::default();
        functions.register("open_orders", |args: &[Value]| {
            let all = args.first().and_then(Value::as_list).unwrap_or_default();
            Ok(Value::List(
                all.iter()
                    .filter(|o| banded_types::resolve_value(o, "open") == Ok(Value::Bool(true)))
                    .cloned()
                    .collect(),
            ))
        });
        let parent = object(json!({
            "id": "c1",
            "orders": [{ "id": "o1", "open": true }, { "id": "o2", "open": false }]
        }));
        let sub = SubReport::new("open_orders({object}.orders)")
            .with_evaluator(Arc::new(QueryEvaluator::new(functions)))
            .bound_to(parent);
        assert_eq!(ids(&sub.object_list().unwrap()), vec!["o1"]);
    }
}
