//! Resolves the text content of composed band instances.
//!
//! Binding is the step between composition and a rendering backend: every
//! element of every instance is turned into a [`BoundElement`] whose content
//! no longer depends on the object it was bound to.

use crate::band::{Band, Borders, TableRow};
use crate::compose::{BandInstance, BandKind, ComposedReport, Scope};
use crate::date::{DateFormatter, format_date};
use crate::element::{Element, ElementKind, Style, SystemField};
use crate::error::ReportError;
use crate::report::Report;
use banded_types::{Margins, Object, PageSize, Value, resolve_path};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoundContent {
    Text { text: String },
    Line,
    Rect { fill: bool },
    Image { uri: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundElement {
    pub left: f32,
    pub top: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub style: Style,
    pub content: BoundContent,
}

impl BoundElement {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            BoundContent::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundBand {
    pub kind: BandKind,
    pub scope: Scope,
    pub height: f32,
    pub visible: bool,
    pub force_new_page: bool,
    #[serde(skip_serializing_if = "Borders::is_empty")]
    pub borders: Borders,
    /// Identity of the bound object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub elements: Vec<BoundElement>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<Vec<BoundElement>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BoundBand>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundReport {
    pub title: String,
    pub author: String,
    pub page_size: PageSize,
    pub margins: Margins,
    pub page_header: Option<BoundBand>,
    pub page_footer: Option<BoundBand>,
    pub bands: Vec<BoundBand>,
}

/// Everything binding needs from the report, detached from it so it can be
/// shared across worker threads.
#[derive(Clone)]
pub struct BindContext {
    title: String,
    author: String,
    date_formatter: Option<DateFormatter>,
    now: NaiveDateTime,
}

impl BindContext {
    pub fn new(report: &Report) -> Self {
        Self {
            title: report.title.clone(),
            author: report.author.clone(),
            date_formatter: report.date_formatter().cloned(),
            now: chrono::Local::now().naive_local(),
        }
    }

    /// Pins the value of [`SystemField::Now`].
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn bind_report(&self, composed: &ComposedReport) -> Result<BoundReport, ReportError> {
        let page_band = |band: &Option<Band>, kind| {
            band.as_ref()
                .map(|b| self.bind_band(kind, Scope::Report, b, None, None, composed.object_count))
                .transpose()
        };

        Ok(BoundReport {
            title: composed.title.clone(),
            author: composed.author.clone(),
            page_size: composed.page_size,
            margins: composed.margins.clone(),
            page_header: page_band(&composed.page_header, BandKind::PageHeader)?,
            page_footer: page_band(&composed.page_footer, BandKind::PageFooter)?,
            bands: self.bind_instances(&composed.bands)?,
        })
    }

    #[cfg(feature = "parallel")]
    fn bind_instances(&self, instances: &[BandInstance]) -> Result<Vec<BoundBand>, ReportError> {
        use rayon::prelude::*;
        log::debug!("Binding {} band instances in parallel", instances.len());
        instances
            .par_iter()
            .map(|instance| self.bind_instance(instance))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn bind_instances(&self, instances: &[BandInstance]) -> Result<Vec<BoundBand>, ReportError> {
        instances
            .iter()
            .map(|instance| self.bind_instance(instance))
            .collect()
    }

    pub fn bind_instance(&self, instance: &BandInstance) -> Result<BoundBand, ReportError> {
        if instance.is_table() {
            // The elements describe one row; rows carry the objects.
            let shell = Band {
                elements: Vec::new(),
                ..instance.band.clone()
            };
            let mut bound =
                self.bind_band(instance.kind, instance.scope, &shell, None, None, instance.count)?;
            bound.rows = instance
                .rows
                .iter()
                .map(|row| self.bind_row(&instance.band, row, instance.count))
                .collect::<Result<_, _>>()?;
            return Ok(bound);
        }
        self.bind_band(
            instance.kind,
            instance.scope,
            &instance.band,
            instance.object.as_ref(),
            instance.index,
            instance.count,
        )
    }

    fn bind_row(
        &self,
        band: &Band,
        row: &TableRow,
        count: usize,
    ) -> Result<Vec<BoundElement>, ReportError> {
        band.elements
            .iter()
            .map(|e| self.bind_element(e, Some(&row.object), Some(row.index), count))
            .collect()
    }

    fn bind_band(
        &self,
        kind: BandKind,
        scope: Scope,
        band: &Band,
        object: Option<&Object>,
        index: Option<usize>,
        count: usize,
    ) -> Result<BoundBand, ReportError> {
        let elements = band
            .elements
            .iter()
            .map(|e| self.bind_element(e, object, index, count))
            .collect::<Result<_, _>>()?;
        let children = band
            .child_bands
            .iter()
            .map(|child| self.bind_band(kind, scope, child, object, index, count))
            .collect::<Result<_, _>>()?;

        Ok(BoundBand {
            kind,
            scope,
            height: band.height,
            visible: band.visible,
            force_new_page: band.force_new_page,
            borders: band.borders.clone(),
            object: object.map(|o| o.identity()),
            index,
            elements,
            rows: Vec::new(),
            children,
        })
    }

    pub fn bind_element(
        &self,
        element: &Element,
        object: Option<&Object>,
        index: Option<usize>,
        count: usize,
    ) -> Result<BoundElement, ReportError> {
        let content = match &element.kind {
            ElementKind::Label { text } => BoundContent::Text { text: text.clone() },
            ElementKind::ObjectValue {
                attribute_name,
                format,
            } => {
                let object =
                    object.ok_or_else(|| ReportError::UnboundObjectValue(attribute_name.clone()))?;
                let value = resolve_path(object.as_ref(), attribute_name)?;
                BoundContent::Text {
                    text: self.render_value(&value, format.as_deref())?,
                }
            }
            ElementKind::SystemField { field, format } => BoundContent::Text {
                text: self.system_field(*field, format.as_deref(), index, count)?,
            },
            ElementKind::Line => BoundContent::Line,
            ElementKind::Rect { fill } => BoundContent::Rect { fill: *fill },
            ElementKind::Image { uri } => BoundContent::Image { uri: uri.clone() },
        };

        Ok(BoundElement {
            left: element.left,
            top: element.top,
            width: element.width,
            height: element.height,
            style: element.style.clone(),
            content,
        })
    }

    fn system_field(
        &self,
        field: SystemField,
        format: Option<&str>,
        index: Option<usize>,
        count: usize,
    ) -> Result<String, ReportError> {
        Ok(match field {
            SystemField::ReportTitle => self.title.clone(),
            SystemField::ReportAuthor => self.author.clone(),
            SystemField::ObjectIndex => index.map(|i| (i + 1).to_string()).unwrap_or_default(),
            SystemField::ObjectCount => count.to_string(),
            SystemField::Now => self.render_value(&Value::Date(self.now), format)?,
        })
    }

    /// Text for `value`; dates with a pattern go through the date formatter.
    fn render_value(&self, value: &Value, format: Option<&str>) -> Result<String, ReportError> {
        match (format, as_date(value)) {
            (Some(pattern), Some(date)) => {
                format_date(self.date_formatter.as_ref(), &date, pattern)
            }
            _ => Ok(value.to_string()),
        }
    }
}

/// Dates arrive either as native values or, from JSON data, as ISO strings.
fn as_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Str(s) => s
            .parse::<NaiveDateTime>()
            .ok()
            .or_else(|| {
                s.parse::<NaiveDate>()
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            }),
        _ => None,
    }
}

impl ComposedReport {
    /// Resolves every element of this composition against `report`'s settings.
    pub fn bind(&self, report: &Report) -> Result<BoundReport, ReportError> {
        BindContext::new(report).bind_report(self)
    }
}
