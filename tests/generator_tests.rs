mod common;

use banded::{
    OutputGenerator, PipelineBuilder, Report, ReportError, TextGenerator, TextReport,
    default_registry, strftime_formatter,
};
use common::fixtures::*;
use common::{TestResult, init_logger};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_text_output_from_definition() -> TestResult {
    init_logger();

    let mut pipeline = PipelineBuilder::new()
        .with_definition_source(&invoice_definition().to_string())?
        .with_date_formatter(strftime_formatter())
        .build()?;
    let text = String::from_utf8(pipeline.generate("text", invoice_data())?)?;

    let expected = "\
Invoices
========
Invoices
acme
INV-1 05.01.2024
- bolt
- widget
INV-2 11.02.2024
zeta
INV-3 20.03.2024
- gear
3
";
    assert_eq!(text, expected);
    Ok(())
}

#[test]
fn test_json_output_is_valid_json() -> TestResult {
    init_logger();

    let mut pipeline = PipelineBuilder::new()
        .with_definition_source(&invoice_definition().to_string())?
        .with_date_formatter(strftime_formatter())
        .build()?;
    let bytes = pipeline.generate("json", invoice_data())?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)?;

    assert_eq!(value["title"], "Invoices");
    let kinds: Vec<_> = value["bands"]
        .as_array()
        .ok_or("bands is not an array")?
        .iter()
        .filter_map(|b| b["kind"].as_str())
        .collect();
    assert_eq!(kinds.first(), Some(&"begin"));
    assert_eq!(kinds.last(), Some(&"summary"));
    assert_eq!(kinds.iter().filter(|k| **k == "groupHeader").count(), 2);
    Ok(())
}

#[test]
fn test_unknown_format_fails_before_any_work() -> TestResult {
    init_logger();

    struct Counting(Arc<AtomicUsize>);
    impl OutputGenerator for Counting {
        fn generate(&self, _report: &Report) -> Result<Vec<u8>, ReportError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut pipeline = PipelineBuilder::new()
        .with_report(Report::builder().detail(order_detail()).build()?)
        .with_generator("counting", Counting(calls.clone()))
        .build()?;

    // Invalid data is never looked at when the format is missing.
    let err = pipeline.generate("pdf", serde_json::json!("not an array")).unwrap_err();
    assert!(matches!(err, ReportError::MissingGeneratorCapability(ref f) if f == "pdf"));

    pipeline.generate("counting", serde_json::json!([]))?;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(pipeline.formats().contains(&"text"));
    Ok(())
}

#[test]
fn test_date_pattern_without_formatter_fails() -> TestResult {
    init_logger();

    let mut pipeline = PipelineBuilder::new()
        .with_definition_source(&invoice_definition().to_string())?
        .build()?;
    let err = pipeline.generate("text", invoice_data()).unwrap_err();
    assert!(matches!(err, ReportError::DateFormatterNotConfigured));
    Ok(())
}

#[test]
fn test_non_array_data_is_rejected() -> TestResult {
    init_logger();

    let mut pipeline = PipelineBuilder::new()
        .with_definition_source("{}")?
        .build()?;
    let err = pipeline
        .generate("text", serde_json::json!({ "rows": [] }))
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidData(_)));
    Ok(())
}

#[test]
fn test_static_delegation_and_registry_agree() -> TestResult {
    init_logger();

    let report = Report::builder()
        .title("Orders")
        .detail(order_detail())
        .group(region_group())
        .queryset(orders())
        .build()?;

    let direct = report.delegate_to::<TextReport>(TextGenerator::new())?;
    let via_registry = report.generate_as(&default_registry(), "text")?;
    assert_eq!(direct.into_bytes(), via_registry);
    Ok(())
}

#[test]
fn test_output_written_to_file() -> TestResult {
    init_logger();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.txt");
    let mut pipeline = PipelineBuilder::new()
        .with_definition_source(&invoice_definition().to_string())?
        .with_date_formatter(strftime_formatter())
        .build()?;
    pipeline.generate_to_file("text", invoice_data(), &path)?;
    assert!(std::fs::read_to_string(&path)?.starts_with("Invoices\n"));
    Ok(())
}
