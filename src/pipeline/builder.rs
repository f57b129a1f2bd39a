use super::ReportPipeline;
use crate::backend::default_registry;
use banded_core::{
    DateFormatter, FunctionRegistry, GeneratorRegistry, OutputGenerator, QueryEvaluator, Report,
    ReportDefinition, ReportError, Value,
};
use banded_query::QueryError;
use std::path::Path;
use std::sync::Arc;

enum Source {
    Definition(ReportDefinition),
    Report(Report),
}

/// A builder for creating a [`ReportPipeline`].
pub struct PipelineBuilder {
    source: Option<Source>,
    functions: FunctionRegistry,
    registry: GeneratorRegistry,
    date_formatter: Option<DateFormatter>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            source: None,
            functions: FunctionRegistry::default(),
            registry: default_registry(),
            date_formatter: None,
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder with the built-in backends and query functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the report definition from a JSON file.
    pub fn with_definition_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ReportError> {
        self.source = Some(Source::Definition(ReportDefinition::from_file(path)?));
        Ok(self)
    }

    pub fn with_definition_source(mut self, json: &str) -> Result<Self, ReportError> {
        self.source = Some(Source::Definition(ReportDefinition::from_json(json)?));
        Ok(self)
    }

    /// Uses a report assembled in code. Its subreport evaluators are kept as they are.
    pub fn with_report(mut self, report: Report) -> Self {
        self.source = Some(Source::Report(report));
        self
    }

    /// Makes `func` callable from subreport expressions of loaded definitions.
    pub fn with_function(
        mut self,
        name: &str,
        func: impl Fn(&[Value]) -> Result<Value, QueryError> + Send + Sync + 'static,
    ) -> Self {
        self.functions.register(name, func);
        self
    }

    pub fn with_generator(mut self, name: &str, generator: impl OutputGenerator + 'static) -> Self {
        self.registry.register(name, generator);
        self
    }

    pub fn with_date_formatter(mut self, formatter: DateFormatter) -> Self {
        self.date_formatter = Some(formatter);
        self
    }

    pub fn build(self) -> Result<ReportPipeline, ReportError> {
        let source = self.source.ok_or_else(|| {
            ReportError::InvalidDefinition(
                "No report has been configured. Use `with_definition_file` or `with_report`."
                    .to_string(),
            )
        })?;

        let mut report = match source {
            Source::Definition(definition) => {
                definition.into_report_with(Arc::new(QueryEvaluator::new(self.functions)))?
            }
            Source::Report(report) => report,
        };
        if let Some(formatter) = self.date_formatter {
            report.set_date_formatter(Some(formatter));
        }

        log::info!(
            "Built pipeline for report '{}' with formats: {}",
            report.title,
            self.registry.names().join(", ")
        );
        Ok(ReportPipeline::new(report, self.registry))
    }
}
