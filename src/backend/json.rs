//! Dumps the bound report as JSON, for inspection or for renderers written
//! outside Rust.

use banded_core::{BindingGenerator, OutputGenerator, Report, ReportError};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGenerator {
    pub pretty: bool,
}

impl JsonGenerator {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl OutputGenerator for JsonGenerator {
    fn generate(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        let bound = report.delegate_to::<BindingGenerator>(())?;
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&bound)?
        } else {
            serde_json::to_vec(&bound)?
        };
        Ok(bytes)
    }
}
