//! Walks a report and produces the ordered sequence of band instances a
//! generator renders.
//!
//! Emission order for a report is: begin band, then for every object the
//! group headers opening at it, its detail instance, its subreport blocks and
//! the group footers closing after it, then the summary band. Page header and
//! footer are carried along unrepeated; placing them per page is the job of a
//! paginating backend.

use crate::band::{Band, DetailBand, TableBand, TableRow};
use crate::entity::Entity;
use crate::error::ReportError;
use crate::group::{Group, GroupStep, partition};
use crate::report::Report;
use crate::subreport::SubReport;
use banded_types::{Margins, Object, PageSize, Value};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BandKind {
    PageHeader,
    PageFooter,
    Begin,
    Detail,
    GroupHeader,
    GroupFooter,
    SubReportHeader,
    SubReportFooter,
    Summary,
}

/// Which entity an instance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    Report,
    /// Index into the report's subreport list.
    SubReport(usize),
}

/// The group boundary a header or footer instance marks.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMark {
    pub level: usize,
    pub attribute: String,
    pub value: Value,
}

/// One emitted copy of a band template.
#[derive(Debug, Clone)]
pub struct BandInstance {
    pub kind: BandKind,
    pub scope: Scope,
    pub band: Band,
    /// The object bound to this instance, if any.
    pub object: Option<Object>,
    /// Position of `object` in the collection being iterated.
    pub index: Option<usize>,
    /// Size of the collection being iterated.
    pub count: usize,
    pub group: Option<GroupMark>,
    /// Rows of a table detail instance; empty for every other band.
    pub rows: Vec<TableRow>,
}

impl BandInstance {
    fn new(kind: BandKind, scope: Scope, band: &Band, count: usize) -> Self {
        Self {
            kind,
            scope,
            band: band.clone_band(),
            object: None,
            index: None,
            count,
            group: None,
            rows: Vec::new(),
        }
    }

    fn bound(mut self, object: &Object, index: usize) -> Self {
        self.object = Some(object.clone());
        self.index = Some(index);
        self
    }

    pub fn is_table(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// The output of [`compose`]: page setup plus band instances in order.
#[derive(Debug, Clone)]
pub struct ComposedReport {
    pub title: String,
    pub author: String,
    pub page_size: PageSize,
    pub margins: Margins,
    pub page_header: Option<Band>,
    pub page_footer: Option<Band>,
    pub bands: Vec<BandInstance>,
    /// Number of top-level objects the report iterated.
    pub object_count: usize,
}

impl ComposedReport {
    fn empty(report: &Report) -> Self {
        Self {
            title: report.title.clone(),
            author: report.author.clone(),
            page_size: report.page_size,
            margins: report.margins.clone(),
            page_header: None,
            page_footer: None,
            bands: Vec::new(),
            object_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn of_kind(&self, kind: BandKind) -> impl Iterator<Item = &BandInstance> {
        self.bands.iter().filter(move |b| b.kind == kind)
    }
}

/// Composes `report` against its current object collection.
pub fn compose(report: &Report) -> Result<ComposedReport, ReportError> {
    report.validate()?;
    let mut composed = ComposedReport::empty(report);

    if report.is_suppressed()? {
        log::info!(
            "Report '{}' has no objects and does not emit when empty",
            report.title
        );
        return Ok(composed);
    }

    let objects = report.object_list()?;
    composed.object_count = objects.len();
    composed.page_header = report.page_header.clone();
    composed.page_footer = report.page_footer.clone();

    let mut composer = Composer {
        strict: report.strict_group_nesting,
        out: Vec::new(),
    };

    if let Some(begin) = &report.begin {
        composer.push(BandInstance::new(BandKind::Begin, Scope::Report, begin, objects.len()));
    }
    composer.walk(
        Scope::Report,
        &objects,
        &report.groups,
        report.detail.as_ref(),
        &report.subreports,
    )?;
    if let Some(summary) = &report.summary {
        composer.push(BandInstance::new(BandKind::Summary, Scope::Report, summary, objects.len()));
    }

    composed.bands = composer.out;
    log::info!(
        "Composed report '{}': {} objects, {} band instances",
        report.title,
        composed.object_count,
        composed.bands.len()
    );
    Ok(composed)
}

struct Composer {
    strict: bool,
    out: Vec<BandInstance>,
}

/// A table instance collecting rows for the current group segment.
struct OpenTable {
    table: TableBand,
    scope: Scope,
    count: usize,
}

impl Composer {
    fn push(&mut self, instance: BandInstance) {
        self.out.push(instance);
    }

    fn walk(
        &mut self,
        scope: Scope,
        objects: &[Object],
        groups: &[Group],
        detail: Option<&DetailBand>,
        subreports: &[SubReport],
    ) -> Result<(), ReportError> {
        let count = objects.len();
        let mut table: Option<OpenTable> = None;

        for step in partition(objects, groups, self.strict)? {
            match step {
                GroupStep::Open { level, value, index } => {
                    self.flush(&mut table);
                    let group = &groups[level];
                    if let Some(header) = &group.header {
                        let mut instance = BandInstance::new(BandKind::GroupHeader, scope, header, count)
                            .bound(&objects[index], index);
                        instance.group = Some(GroupMark {
                            level,
                            attribute: group.attribute_name.clone(),
                            value,
                        });
                        self.push(instance);
                    }
                }
                GroupStep::Item(index) => {
                    let object = &objects[index];
                    match detail {
                        Some(DetailBand::Repeated(band)) => {
                            self.push(
                                BandInstance::new(BandKind::Detail, scope, band, count)
                                    .bound(object, index),
                            );
                        }
                        Some(DetailBand::Table(template)) => {
                            table
                                .get_or_insert_with(|| OpenTable {
                                    table: template.instantiate(),
                                    scope,
                                    count,
                                })
                                .table
                                .append_row(index, object.clone());
                        }
                        None => {}
                    }
                    for (position, template) in subreports.iter().enumerate() {
                        let block = self.subreport_block(position, template, object, index)?;
                        if !block.is_empty() {
                            self.flush(&mut table);
                            self.out.extend(block);
                        }
                    }
                }
                GroupStep::Close { level, value, index } => {
                    self.flush(&mut table);
                    let group = &groups[level];
                    if let Some(footer) = &group.footer {
                        let mut instance = BandInstance::new(BandKind::GroupFooter, scope, footer, count)
                            .bound(&objects[index], index);
                        instance.group = Some(GroupMark {
                            level,
                            attribute: group.attribute_name.clone(),
                            value,
                        });
                        self.push(instance);
                    }
                }
            }
        }
        self.flush(&mut table);
        Ok(())
    }

    fn flush(&mut self, table: &mut Option<OpenTable>) {
        let Some(open) = table.take() else {
            return;
        };
        let (band, rows) = open.table.into_parts();
        let mut instance = BandInstance::new(BandKind::Detail, open.scope, &band, open.count);
        instance.rows = rows;
        self.push(instance);
    }

    /// Composes one subreport for one parent object into its own buffer.
    fn subreport_block(
        &self,
        position: usize,
        template: &SubReport,
        parent: &Object,
        parent_index: usize,
    ) -> Result<Vec<BandInstance>, ReportError> {
        let sub = template.bound_to(parent.clone());
        if sub.is_suppressed()? {
            log::debug!(
                "Subreport {} suppressed for parent {}",
                position,
                parent.identity()
            );
            return Ok(Vec::new());
        }

        let objects = sub.object_list()?;
        let scope = Scope::SubReport(position);
        let mut nested = Composer {
            strict: self.strict,
            out: Vec::new(),
        };

        if let Some(header) = &sub.header {
            nested.push(
                BandInstance::new(BandKind::SubReportHeader, scope, header, objects.len())
                    .bound(parent, parent_index),
            );
        }
        nested.walk(scope, &objects, sub.groups(), sub.detail.as_ref(), &[])?;
        if let Some(footer) = &sub.footer {
            nested.push(
                BandInstance::new(BandKind::SubReportFooter, scope, footer, objects.len())
                    .bound(parent, parent_index),
            );
        }
        Ok(nested.out)
    }
}
