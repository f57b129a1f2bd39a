//! # banded
//!
//! Banded reports: templates of horizontal bands bound to ordered object
//! collections, partitioned into groups and nested subreports, and handed to
//! a pluggable output backend.
//!
//! ```ignore
//! use banded::{PipelineBuilder, strftime_formatter};
//!
//! let mut pipeline = PipelineBuilder::new()
//!     .with_definition_file("invoice.json")?
//!     .with_date_formatter(strftime_formatter())
//!     .build()?;
//! let text = pipeline.generate("text", serde_json::from_str(&data)?)?;
//! ```

pub mod backend;
pub mod pipeline;

pub use backend::{JsonGenerator, TextGenerator, TextReport, default_registry};
pub use pipeline::{PipelineBuilder, ReportPipeline};

pub use banded_core::*;
