//! A plain-text backend.
//!
//! Each visible band becomes one line of its element texts, ordered top to
//! bottom and left to right. Table bands print one line per row. Bands that
//! force a new page are preceded by a form feed.

use banded_core::{
    BindingGenerator, BoundBand, BoundContent, BoundElement, BoundReport, Generator,
    OutputGenerator, Report, ReportError,
};
use itertools::Itertools;
use std::fmt::Write;

const FORM_FEED: char = '\u{c}';

#[derive(Debug, Clone)]
pub struct TextGenerator {
    /// Separator between the texts of one line.
    pub separator: String,
    /// Spaces of indentation per child band level.
    pub indent: usize,
}

impl Default for TextGenerator {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            indent: 2,
        }
    }
}

impl TextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, report: &BoundReport) -> String {
        let mut out = String::new();
        if !report.title.is_empty() {
            let _ = writeln!(out, "{}", report.title);
            let _ = writeln!(out, "{}", "=".repeat(report.title.chars().count()));
        }
        if let Some(header) = &report.page_header {
            self.write_band(&mut out, header, 0);
        }
        for band in &report.bands {
            if band.force_new_page && !out.is_empty() {
                out.push(FORM_FEED);
            }
            self.write_band(&mut out, band, 0);
        }
        if let Some(footer) = &report.page_footer {
            self.write_band(&mut out, footer, 0);
        }
        out
    }

    fn write_band(&self, out: &mut String, band: &BoundBand, depth: usize) {
        if !band.visible {
            return;
        }
        let pad = " ".repeat(depth * self.indent);
        if band.rows.is_empty() {
            let line = self.line(&band.elements);
            if !line.is_empty() {
                let _ = writeln!(out, "{}{}", pad, line);
            }
        } else {
            for row in &band.rows {
                let _ = writeln!(out, "{}{}", pad, self.line(row));
            }
        }
        for child in &band.children {
            self.write_band(out, child, depth + 1);
        }
    }

    fn line(&self, elements: &[BoundElement]) -> String {
        elements
            .iter()
            .sorted_by(|a, b| a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left)))
            .filter_map(|e| match &e.content {
                BoundContent::Text { text } => Some(text.as_str()),
                BoundContent::Image { uri } => Some(uri.as_str()),
                BoundContent::Line | BoundContent::Rect { .. } => None,
            })
            .filter(|text| !text.is_empty())
            .join(&self.separator)
    }
}

impl OutputGenerator for TextGenerator {
    fn generate(&self, report: &Report) -> Result<Vec<u8>, ReportError> {
        let bound = report.delegate_to::<BindingGenerator>(())?;
        Ok(self.render(&bound).into_bytes())
    }
}

/// Renders straight into a `String`, for callers that delegate statically.
pub struct TextReport<'r> {
    report: &'r Report,
    generator: TextGenerator,
}

impl<'r> Generator<'r> for TextReport<'r> {
    type Args = TextGenerator;
    type Output = String;

    fn new(report: &'r Report, generator: TextGenerator) -> Result<Self, ReportError> {
        Ok(Self { report, generator })
    }

    fn execute(self) -> Result<String, ReportError> {
        let bound = BindingGenerator::new(self.report, ())?.execute()?;
        Ok(self.generator.render(&bound))
    }
}
