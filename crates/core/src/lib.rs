//! # banded-core
//!
//! The band/group/subreport composition model.
//!
//! A [`Report`] is a template: a fixed set of band slots, a list of
//! [`Group`]s partitioning its objects, and [`SubReport`]s deriving nested
//! collections from each parent object. This crate turns such a template and
//! an object collection into an ordered sequence of band instances
//! ([`compose`]), resolves their element content ([`ComposedReport::bind`]),
//! and defines the contract output backends implement ([`Generator`],
//! [`OutputGenerator`]).
//!
//! Rendering itself lives outside this crate. So does pagination.
//!
//! ## Modules
//! - **band / element**: band templates, table bands, element descriptors
//! - **group**: adjacent-value partitioning of object sequences
//! - **report / subreport**: the entities and their object-list resolution
//! - **compose / bind**: the walk producing bound band instances
//! - **generator**: delegation and the format registry
//! - **definition**: JSON report definitions
//! - **date**: the injectable date formatting collaborator

pub use banded_query as query;
pub use banded_types as types;

pub mod band;
pub mod bind;
pub mod compose;
pub mod date;
pub mod definition;
pub mod element;
pub mod entity;
pub mod error;
pub mod evaluator;
pub mod generator;
pub mod group;
pub mod report;
pub mod subreport;

pub use band::{Band, Borders, DetailBand, Side, Stroke, TableBand, TableRow};
pub use bind::{BindContext, BoundBand, BoundContent, BoundElement, BoundReport};
pub use compose::{BandInstance, BandKind, ComposedReport, GroupMark, Scope, compose};
pub use date::{DateFormatter, strftime_formatter};
pub use definition::{DetailMode, ReportDefinition, SubReportDefinition};
pub use element::{Element, ElementKind, Style, SystemField, TextAlign};
pub use entity::Entity;
pub use error::ReportError;
pub use evaluator::{ExpressionEvaluator, QueryEvaluator};
pub use generator::{
    BindingGenerator, CompositionGenerator, Generator, GeneratorRegistry, OutputGenerator,
};
pub use group::{Group, GroupStep, partition, validate_groups};
pub use report::{Report, ReportBuilder};
pub use subreport::SubReport;

pub use banded_query::FunctionRegistry;
pub use banded_types::{
    CM, Color, INCH, JsonRecord, MM, Margins, Object, PT, PageSize, Record, Value, landscape,
};
