//! The top-level report: page setup, band slots, groups and subreports.

use crate::band::{Band, DetailBand, TableBand};
use crate::date::{DateFormatter, format_date};
use crate::entity::Entity;
use crate::error::ReportError;
use crate::generator::{Generator, GeneratorRegistry};
use crate::group::{Group, validate_groups};
use crate::subreport::SubReport;
use banded_types::{Color, Margins, Object, PageSize};
use chrono::NaiveDateTime;
use std::fmt;

/// A report template.
///
/// Every band slot holds at most one band. Configuration is fixed once the
/// report is built; only the object collection is expected to change between
/// generation runs (see [`Report::set_queryset`]).
#[derive(Clone)]
pub struct Report {
    pub title: String,
    pub author: String,
    pub page_size: PageSize,
    pub margins: Margins,

    pub begin: Option<Band>,
    pub summary: Option<Band>,
    pub page_header: Option<Band>,
    pub page_footer: Option<Band>,
    pub detail: Option<DetailBand>,

    pub groups: Vec<Group>,
    pub subreports: Vec<SubReport>,

    pub emit_when_empty: bool,
    /// Reject data whose outer group boundaries are not refined by inner groups.
    pub strict_group_nesting: bool,

    pub default_font_color: Color,
    pub default_stroke_color: Color,
    pub default_fill_color: Color,

    queryset: Option<Vec<Object>>,
    date_formatter: Option<DateFormatter>,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            page_size: PageSize::A4,
            margins: Margins::default(),
            begin: None,
            summary: None,
            page_header: None,
            page_footer: None,
            detail: None,
            groups: Vec::new(),
            subreports: Vec::new(),
            emit_when_empty: false,
            strict_group_nesting: false,
            default_font_color: Color::BLACK,
            default_stroke_color: Color::BLACK,
            default_fill_color: Color::BLACK,
            queryset: None,
            date_formatter: None,
        }
    }
}

impl fmt::Debug for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Report")
            .field("title", &self.title)
            .field("author", &self.author)
            .field("page_size", &self.page_size)
            .field("margins", &self.margins)
            .field("detail", &self.detail.is_some())
            .field("groups", &self.groups.len())
            .field("subreports", &self.subreports.len())
            .field("objects", &self.queryset.as_ref().map(Vec::len))
            .field("date_formatter", &self.date_formatter.is_some())
            .finish()
    }
}

impl Report {
    pub fn builder() -> ReportBuilder {
        ReportBuilder::new()
    }

    pub fn queryset(&self) -> Option<&[Object]> {
        self.queryset.as_deref()
    }

    /// Supplies the objects for the next generation run.
    pub fn set_queryset(&mut self, objects: Option<Vec<Object>>) {
        self.queryset = objects;
    }

    pub fn with_queryset(mut self, objects: Vec<Object>) -> Self {
        self.queryset = Some(objects);
        self
    }

    /// The objects to render; empty when no collection was supplied.
    pub fn objects(&self) -> Vec<Object> {
        self.queryset.clone().unwrap_or_default()
    }

    pub fn date_formatter(&self) -> Option<&DateFormatter> {
        self.date_formatter.as_ref()
    }

    pub fn set_date_formatter(&mut self, formatter: Option<DateFormatter>) {
        self.date_formatter = formatter;
    }

    /// Formats `date` with the injected collaborator.
    pub fn format_date(&self, date: &NaiveDateTime, pattern: &str) -> Result<String, ReportError> {
        format_date(self.date_formatter.as_ref(), date, pattern)
    }

    /// The area inside the margins, as `(width, height)`.
    pub fn printable_area(&self) -> (f32, f32) {
        (
            self.page_size.width - self.margins.left - self.margins.right,
            self.page_size.height - self.margins.top - self.margins.bottom,
        )
    }

    /// Checks the template for configurations that cannot be rendered sensibly.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.page_size.width <= 0.0 || self.page_size.height <= 0.0 {
            return Err(ReportError::InvalidDefinition(format!(
                "page size must be positive, got {} x {}",
                self.page_size.width, self.page_size.height
            )));
        }
        let (width, height) = self.printable_area();
        if width <= 0.0 || height <= 0.0 {
            return Err(ReportError::InvalidDefinition(
                "margins leave no printable area".to_string(),
            ));
        }
        validate_groups(&self.groups)?;
        for sub in &self.subreports {
            validate_groups(&sub.groups)?;
        }
        Ok(())
    }

    /// Hands the report to a generator and returns whatever it produces.
    ///
    /// The report does no format-specific work; `G` decides what the output is.
    pub fn delegate_to<'r, G: Generator<'r>>(
        &'r self,
        args: G::Args,
    ) -> Result<G::Output, ReportError> {
        log::info!(
            "Delegating report '{}' to {}",
            self.title,
            std::any::type_name::<G>()
        );
        G::new(self, args)?.execute()
    }

    /// Generates the report with the backend registered under `format`.
    ///
    /// An unknown format fails before any band is visited.
    pub fn generate_as(
        &self,
        registry: &GeneratorRegistry,
        format: &str,
    ) -> Result<Vec<u8>, ReportError> {
        let generator = registry.get(format)?;
        log::info!("Generating report '{}' as {}", self.title, format);
        generator.generate(self)
    }
}

impl Entity for Report {
    fn groups(&self) -> &[Group] {
        &self.groups
    }

    fn emit_when_empty(&self) -> bool {
        self.emit_when_empty
    }

    fn object_list(&self) -> Result<Vec<Object>, ReportError> {
        Ok(self.objects())
    }
}

/// A builder for creating a [`Report`].
#[derive(Default)]
pub struct ReportBuilder {
    report: Report,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.report.title = title.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.report.author = author.into();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.report.page_size = size;
        self
    }

    pub fn margins(mut self, margins: Margins) -> Self {
        self.report.margins = margins;
        self
    }

    pub fn begin(mut self, band: Band) -> Self {
        self.report.begin = Some(band);
        self
    }

    pub fn summary(mut self, band: Band) -> Self {
        self.report.summary = Some(band);
        self
    }

    pub fn page_header(mut self, band: Band) -> Self {
        self.report.page_header = Some(band);
        self
    }

    pub fn page_footer(mut self, band: Band) -> Self {
        self.report.page_footer = Some(band);
        self
    }

    /// A detail band repeated once per object.
    pub fn detail(mut self, band: Band) -> Self {
        self.report.detail = Some(DetailBand::Repeated(band));
        self
    }

    /// A detail band that accumulates objects as rows.
    pub fn table_detail(mut self, table: TableBand) -> Self {
        self.report.detail = Some(DetailBand::Table(table));
        self
    }

    pub fn detail_band(mut self, detail: DetailBand) -> Self {
        self.report.detail = Some(detail);
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.report.groups.push(group);
        self
    }

    pub fn subreport(mut self, subreport: SubReport) -> Self {
        self.report.subreports.push(subreport);
        self
    }

    pub fn emit_when_empty(mut self, emit: bool) -> Self {
        self.report.emit_when_empty = emit;
        self
    }

    pub fn strict_group_nesting(mut self, strict: bool) -> Self {
        self.report.strict_group_nesting = strict;
        self
    }

    pub fn default_colors(mut self, font: Color, stroke: Color, fill: Color) -> Self {
        self.report.default_font_color = font;
        self.report.default_stroke_color = stroke;
        self.report.default_fill_color = fill;
        self
    }

    pub fn date_formatter(mut self, formatter: DateFormatter) -> Self {
        self.report.date_formatter = Some(formatter);
        self
    }

    pub fn queryset(mut self, objects: Vec<Object>) -> Self {
        self.report.queryset = Some(objects);
        self
    }

    /// Consumes the builder, validating the assembled template.
    pub fn build(self) -> Result<Report, ReportError> {
        self.report.validate()?;
        Ok(self.report)
    }
}
