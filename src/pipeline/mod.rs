//! Loading a report, feeding it data and producing output by format name.

mod builder;

pub use builder::PipelineBuilder;

use banded_core::{GeneratorRegistry, JsonRecord, Report, ReportError};
use std::path::Path;

/// A configured report plus the backends it can be generated with.
#[derive(Debug)]
pub struct ReportPipeline {
    report: Report,
    registry: GeneratorRegistry,
}

impl ReportPipeline {
    fn new(report: Report, registry: GeneratorRegistry) -> Self {
        Self { report, registry }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn formats(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Generates `format` output for a JSON array of objects.
    ///
    /// The format is checked before the data is looked at.
    pub fn generate(
        &mut self,
        format: &str,
        data: serde_json::Value,
    ) -> Result<Vec<u8>, ReportError> {
        self.registry.get(format)?;
        let objects = JsonRecord::objects_from_json(data).map_err(ReportError::InvalidData)?;
        log::debug!("Generating {} output for {} objects", format, objects.len());
        self.report.set_queryset(Some(objects));
        self.report.generate_as(&self.registry, format)
    }

    pub fn generate_to_file<P: AsRef<Path>>(
        &mut self,
        format: &str,
        data: serde_json::Value,
        path: P,
    ) -> Result<(), ReportError> {
        let bytes = self.generate(format, data)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
