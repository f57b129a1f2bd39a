#![allow(dead_code)]

pub mod fixtures;

use banded::{BindingGenerator, BoundBand, BoundReport, JsonRecord, Object, Report, ReportError};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Converts a JSON array into bindable objects.
pub fn objects(data: Value) -> Vec<Object> {
    JsonRecord::objects_from_json(data).expect("fixture data must be an array of objects")
}

/// Composes and binds `report`.
pub fn bind(report: &Report) -> Result<BoundReport, ReportError> {
    report.delegate_to::<BindingGenerator>(())
}

/// The non-empty element texts of a bound band.
pub fn texts(band: &BoundBand) -> Vec<String> {
    band.elements
        .iter()
        .filter_map(|e| e.text())
        .map(str::to_string)
        .collect()
}
