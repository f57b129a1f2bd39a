//! Declarative report definitions loaded from JSON.
//!
//! Every recognised option is a field here; anything else is rejected when
//! the definition is parsed.

use crate::band::{Band, DetailBand, TableBand};
use crate::error::ReportError;
use crate::evaluator::{ExpressionEvaluator, QueryEvaluator};
use crate::group::Group;
use crate::report::Report;
use crate::subreport::SubReport;
use banded_types::{Color, Margins, PageSize};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetailMode {
    /// One detail band per object.
    #[default]
    Repeat,
    /// One detail band per group segment, objects appended as rows.
    Table,
}

impl DetailMode {
    fn detail(self, band: Band) -> DetailBand {
        match self {
            DetailMode::Repeat => DetailBand::Repeated(band),
            DetailMode::Table => DetailBand::Table(TableBand::new(band)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SubReportDefinition {
    pub query_expression: Option<String>,
    pub header: Option<Band>,
    pub detail: Option<Band>,
    pub detail_mode: DetailMode,
    pub footer: Option<Band>,
    pub groups: Vec<Group>,
    pub emit_when_empty: bool,
}

impl SubReportDefinition {
    fn into_subreport(self, evaluator: Arc<dyn ExpressionEvaluator>) -> SubReport {
        let mut sub = SubReport::default()
            .with_evaluator(evaluator)
            .with_emit_when_empty(self.emit_when_empty);
        sub.set_query_expression(self.query_expression);
        sub.header = self.header;
        sub.footer = self.footer;
        sub.detail = self.detail.map(|band| self.detail_mode.detail(band));
        sub.groups = self.groups;
        sub
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ReportDefinition {
    pub title: String,
    pub author: String,
    pub page_size: Option<PageSize>,
    /// Swap the page's width and height.
    pub landscape: bool,
    pub margins: Option<Margins>,
    pub begin: Option<Band>,
    pub summary: Option<Band>,
    pub page_header: Option<Band>,
    pub page_footer: Option<Band>,
    pub detail: Option<Band>,
    pub detail_mode: DetailMode,
    pub groups: Vec<Group>,
    pub subreports: Vec<SubReportDefinition>,
    pub emit_when_empty: bool,
    pub strict_group_nesting: bool,
    pub default_font_color: Option<Color>,
    pub default_stroke_color: Option<Color>,
    pub default_fill_color: Option<Color>,
}

impl ReportDefinition {
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        serde_json::from_str(json).map_err(|e| ReportError::InvalidDefinition(e.to_string()))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ReportError> {
        serde_json::from_value(value).map_err(|e| ReportError::InvalidDefinition(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let path = path.as_ref();
        log::debug!("Loading report definition from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Builds the report, deriving subreport collections with the default
    /// query evaluator.
    pub fn into_report(self) -> Result<Report, ReportError> {
        self.into_report_with(Arc::new(QueryEvaluator::default()))
    }

    /// Builds the report with `evaluator` installed on every subreport.
    pub fn into_report_with(
        self,
        evaluator: Arc<dyn ExpressionEvaluator>,
    ) -> Result<Report, ReportError> {
        let mut page_size = self.page_size.unwrap_or(PageSize::A4);
        if self.landscape {
            page_size = page_size.landscape();
        }

        let mut builder = Report::builder()
            .title(self.title)
            .author(self.author)
            .page_size(page_size)
            .margins(self.margins.unwrap_or_default())
            .emit_when_empty(self.emit_when_empty)
            .strict_group_nesting(self.strict_group_nesting)
            .default_colors(
                self.default_font_color.unwrap_or(Color::BLACK),
                self.default_stroke_color.unwrap_or(Color::BLACK),
                self.default_fill_color.unwrap_or(Color::BLACK),
            );

        for (slot, band) in [
            (Slot::Begin, self.begin),
            (Slot::Summary, self.summary),
            (Slot::PageHeader, self.page_header),
            (Slot::PageFooter, self.page_footer),
        ] {
            if let Some(band) = band {
                builder = slot.fill(builder, band);
            }
        }
        if let Some(band) = self.detail {
            builder = builder.detail_band(self.detail_mode.detail(band));
        }
        for group in self.groups {
            builder = builder.group(group);
        }
        for sub in self.subreports {
            builder = builder.subreport(sub.into_subreport(evaluator.clone()));
        }
        builder.build()
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Begin,
    Summary,
    PageHeader,
    PageFooter,
}

impl Slot {
    fn fill(self, builder: crate::report::ReportBuilder, band: Band) -> crate::report::ReportBuilder {
        match self {
            Slot::Begin => builder.begin(band),
            Slot::Summary => builder.summary(band),
            Slot::PageHeader => builder.page_header(band),
            Slot::PageFooter => builder.page_footer(band),
        }
    }
}
