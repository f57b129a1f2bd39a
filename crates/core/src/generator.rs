//! The contract between a report and whatever turns it into output.
//!
//! A report never renders itself. [`Report::delegate_to`] hands it to a
//! statically chosen [`Generator`]; [`Report::generate_as`] looks a backend up
//! by format name in a [`GeneratorRegistry`] for callers that pick the format
//! at run time.

use crate::bind::BoundReport;
use crate::compose::{ComposedReport, compose};
use crate::error::ReportError;
use crate::report::Report;
use std::collections::HashMap;
use std::sync::Arc;

/// A generator constructed for one report and consumed by one run.
pub trait Generator<'r>: Sized {
    /// Generator-specific arguments, such as an output sink.
    type Args;
    type Output;

    fn new(report: &'r Report, args: Self::Args) -> Result<Self, ReportError>;

    fn execute(self) -> Result<Self::Output, ReportError>;
}

/// Produces the composed band instances without rendering anything.
#[derive(Debug)]
pub struct CompositionGenerator<'r> {
    report: &'r Report,
}

impl<'r> Generator<'r> for CompositionGenerator<'r> {
    type Args = ();
    type Output = ComposedReport;

    fn new(report: &'r Report, _args: ()) -> Result<Self, ReportError> {
        Ok(Self { report })
    }

    fn execute(self) -> Result<ComposedReport, ReportError> {
        compose(self.report)
    }
}

/// Produces the composed and bound report, ready for a rendering backend.
#[derive(Debug)]
pub struct BindingGenerator<'r> {
    report: &'r Report,
}

impl<'r> Generator<'r> for BindingGenerator<'r> {
    type Args = ();
    type Output = BoundReport;

    fn new(report: &'r Report, _args: ()) -> Result<Self, ReportError> {
        Ok(Self { report })
    }

    fn execute(self) -> Result<BoundReport, ReportError> {
        compose(self.report)?.bind(self.report)
    }
}

/// An output backend selectable by name.
pub trait OutputGenerator: Send + Sync {
    fn generate(&self, report: &Report) -> Result<Vec<u8>, ReportError>;
}

#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn OutputGenerator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `generator` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: &str, generator: impl OutputGenerator + 'static) {
        self.generators
            .insert(name.to_lowercase(), Arc::new(generator));
    }

    pub fn with(mut self, name: &str, generator: impl OutputGenerator + 'static) -> Self {
        self.register(name, generator);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn OutputGenerator>, ReportError> {
        self.generators
            .get(&name.to_lowercase())
            .ok_or_else(|| ReportError::MissingGeneratorCapability(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(&name.to_lowercase())
    }

    /// Registered format names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::Band;
    use crate::compose::BandKind;
    use crate::element::Element;
    use banded_types::JsonRecord;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn report() -> Report {
        Report::builder()
            .detail(Band::default().with_element(Element::object_value("name")))
            .queryset(
                JsonRecord::objects_from_json(json!([{ "name": "a" }, { "name": "b" }])).unwrap(),
            )
            .build()
            .unwrap()
    }

    struct Flagging(Arc<AtomicBool>);

    impl OutputGenerator for Flagging {
        fn generate(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
            self.0.store(true, Ordering::SeqCst);
            Ok(report.title.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_delegation_returns_generator_output() {
        let report = report();
        let composed = report.delegate_to::<CompositionGenerator>(()).unwrap();
        assert_eq!(composed.of_kind(BandKind::Detail).count(), 2);

        let bound = report.delegate_to::<BindingGenerator>(()).unwrap();
        assert_eq!(bound.bands[1].elements[0].text(), Some("b"));
    }

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let called = Arc::new(AtomicBool::new(false));
        let registry = GeneratorRegistry::new().with("Custom", Flagging(called.clone()));
        assert!(registry.contains("custom"));
        assert_eq!(registry.names(), vec!["custom"]);

        let mut report = report();
        report.title = "T".into();
        assert_eq!(report.generate_as(&registry, "CUSTOM").unwrap(), b"T".to_vec());
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_missing_capability_never_runs_a_generator() {
        let called = Arc::new(AtomicBool::new(false));
        let registry = GeneratorRegistry::new().with("text", Flagging(called.clone()));
        let err = report().generate_as(&registry, "pdf").unwrap_err();
        assert!(matches!(err, ReportError::MissingGeneratorCapability(_)));
        assert!(!called.load(Ordering::SeqCst));
    }
}
