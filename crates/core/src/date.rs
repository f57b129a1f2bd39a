//! The date formatting collaborator.
//!
//! Reports never format dates on their own. A formatter has to be injected,
//! and [`crate::Report::format_date`] fails with
//! [`crate::ReportError::DateFormatterNotConfigured`] when none is present.

use crate::error::ReportError;
use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};
use std::sync::Arc;

/// `(date, pattern) -> text`
pub type DateFormatter = Arc<dyn Fn(&NaiveDateTime, &str) -> String + Send + Sync>;

/// Formats `date` with `formatter`, failing when there is none.
pub fn format_date(
    formatter: Option<&DateFormatter>,
    date: &NaiveDateTime,
    pattern: &str,
) -> Result<String, ReportError> {
    formatter
        .map(|f| f(date, pattern))
        .ok_or(ReportError::DateFormatterNotConfigured)
}

/// A formatter interpreting patterns as `strftime` strings (`%Y-%m-%d`).
///
/// Patterns chrono cannot parse are returned verbatim instead of panicking
/// inside `Display`.
pub fn strftime_formatter() -> DateFormatter {
    Arc::new(|date: &NaiveDateTime, pattern: &str| {
        let items = StrftimeItems::new(pattern);
        if items.clone().any(|item| matches!(item, Item::Error)) {
            log::warn!("Invalid date pattern '{}', emitting it verbatim", pattern);
            return pattern.to_string();
        }
        date.format_with_items(items).to_string()
    })
}
