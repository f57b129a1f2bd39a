//! Uniform attribute resolution.
//!
//! This is the only place that knows the difference between stored fields
//! and accessors; everything else reads values through [`resolve`].

use crate::record::Record;
use crate::value::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    #[error("Attribute '{attribute}' not found on {object}")]
    NotFound { attribute: String, object: String },

    #[error("Cannot read attribute '{attribute}' from a {type_name} value")]
    NotAnObject {
        attribute: String,
        type_name: &'static str,
    },
}

/// Reads `attribute` off `object`, invoking it if it is a zero-argument accessor.
pub fn resolve(object: &dyn Record, attribute: &str) -> Result<Value, AttributeError> {
    object
        .member(attribute)
        .map(|member| member.into_value())
        .ok_or_else(|| AttributeError::NotFound {
            attribute: attribute.to_string(),
            object: object.identity(),
        })
}

/// Like [`resolve`], for a value that must hold an object.
pub fn resolve_value(value: &Value, attribute: &str) -> Result<Value, AttributeError> {
    match value {
        Value::Object(obj) => resolve(obj.as_ref(), attribute),
        other => Err(AttributeError::NotAnObject {
            attribute: attribute.to_string(),
            type_name: other.type_name(),
        }),
    }
}

/// Follows a dotted path (`customer.address.city`) starting at `object`.
pub fn resolve_path(object: &dyn Record, path: &str) -> Result<Value, AttributeError> {
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    segments.try_fold(resolve(object, first)?, |current, segment| {
        resolve_value(&current, segment)
    })
}
