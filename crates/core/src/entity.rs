//! What reports and subreports have in common: a collection of objects to
//! iterate, groups partitioning it, and a policy for empty collections.

use crate::error::ReportError;
use crate::group::Group;
use banded_types::Object;

pub trait Entity {
    fn groups(&self) -> &[Group];

    /// Whether the entity is rendered at all when its object list is empty.
    fn emit_when_empty(&self) -> bool;

    /// The objects to render, in iteration order. An absent collection is an
    /// empty list, never an error.
    fn object_list(&self) -> Result<Vec<Object>, ReportError>;

    /// True when the entity has nothing to iterate and must not be rendered.
    fn is_suppressed(&self) -> Result<bool, ReportError> {
        Ok(!self.emit_when_empty() && self.object_list()?.is_empty())
    }
}
