//! Defines the error type for all report composition operations.

use banded_types::{AttributeError, Object};
use std::fmt;
use thiserror::Error;

/// The main error enum for everything between a report definition and a
/// generator's output.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Attribute '{attribute}' not found on {object}")]
    AttributeNotFound { attribute: String, object: String },

    #[error("Cannot read attribute '{attribute}' from a {type_name} value")]
    NotAnObject {
        attribute: String,
        type_name: &'static str,
    },

    #[error("Element bound to attribute '{0}' has no object to read from")]
    UnboundObjectValue(String),

    #[error("Failed to resolve subreport '{expression}' for parent {parent}: {reason}")]
    SubReportResolution {
        expression: String,
        parent: String,
        reason: String,
    },

    #[error("No date formatter configured; install one with `date_formatter` on the report")]
    DateFormatterNotConfigured,

    #[error("No generator capable of producing '{0}'")]
    MissingGeneratorCapability(String),

    #[error("Invalid report definition: {0}")]
    InvalidDefinition(String),

    #[error("Invalid report data: {0}")]
    InvalidData(String),

    #[error(
        "Group '{outer}' changed at object {index} while nested group '{inner}' kept its value"
    )]
    InconsistentGroupNesting {
        outer: String,
        inner: String,
        index: usize,
    },

    #[error("Output generation failed: {0}")]
    Output(String),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AttributeError> for ReportError {
    fn from(e: AttributeError) -> Self {
        match e {
            AttributeError::NotFound { attribute, object } => {
                ReportError::AttributeNotFound { attribute, object }
            }
            AttributeError::NotAnObject {
                attribute,
                type_name,
            } => ReportError::NotAnObject {
                attribute,
                type_name,
            },
        }
    }
}

impl ReportError {
    pub(crate) fn subreport(expression: &str, parent: &Object, reason: impl fmt::Display) -> Self {
        ReportError::SubReportResolution {
            expression: expression.to_string(),
            parent: parent.identity(),
            reason: reason.to_string(),
        }
    }
}
