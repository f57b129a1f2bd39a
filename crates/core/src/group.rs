//! Groups partition an ordered object sequence by adjacent changes of one
//! attribute's value.
//!
//! Grouping never sorts. `[A, A, B, A]` yields three groups, the second `A`
//! opening a new group because it is not adjacent to the first.

use crate::band::Band;
use crate::error::ReportError;
use banded_types::{Object, Value, resolve};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Group {
    pub attribute_name: String,
    /// Emitted when a group opens.
    pub header: Option<Band>,
    /// Emitted when a group closes.
    pub footer: Option<Band>,
}

impl Group {
    pub fn new(attribute_name: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            header: None,
            footer: None,
        }
    }

    pub fn with_header(mut self, band: Band) -> Self {
        self.header = Some(band);
        self
    }

    pub fn with_footer(mut self, band: Band) -> Self {
        self.footer = Some(band);
        self
    }
}

/// One step of a partitioned walk over an object sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupStep {
    /// Group `level` opens with `value` at object `index`.
    Open { level: usize, value: Value, index: usize },
    /// The object at `index` is processed.
    Item(usize),
    /// Group `level` closes; `index` is the last object inside it.
    Close { level: usize, value: Value, index: usize },
}

/// Rejects group lists whose nesting cannot be well-formed.
pub fn validate_groups(groups: &[Group]) -> Result<(), ReportError> {
    for (i, group) in groups.iter().enumerate() {
        if group.attribute_name.is_empty() {
            return Err(ReportError::InvalidDefinition(format!(
                "group {} has an empty attribute name",
                i
            )));
        }
        if groups[..i]
            .iter()
            .any(|outer| outer.attribute_name == group.attribute_name)
        {
            return Err(ReportError::InvalidDefinition(format!(
                "attribute '{}' is grouped on more than once",
                group.attribute_name
            )));
        }
    }
    Ok(())
}

/// Plans the walk over `objects` for nested `groups` (outermost first).
///
/// A boundary at one level forces boundaries at every inner level. With
/// `strict` set, an outer boundary where an inner value does not change is
/// rejected instead, since it means the data is not ordered for that nesting.
pub fn partition(
    objects: &[Object],
    groups: &[Group],
    strict: bool,
) -> Result<Vec<GroupStep>, ReportError> {
    let keys = objects
        .iter()
        .map(|obj| {
            groups
                .iter()
                .map(|g| resolve(obj.as_ref(), &g.attribute_name))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut steps = Vec::with_capacity(objects.len() + 2 * groups.len());
    let Some(last) = keys.len().checked_sub(1) else {
        return Ok(steps);
    };

    for (index, key) in keys.iter().enumerate() {
        let first_changed = if index == 0 {
            Some(0)
        } else {
            let previous = &keys[index - 1];
            (0..groups.len()).find(|&level| key[level] != previous[level])
        };

        if let Some(changed) = first_changed {
            if index > 0 {
                if strict {
                    check_nesting(groups, &keys[index - 1], key, changed, index)?;
                }
                close_levels(&mut steps, &keys[index - 1], changed, index - 1);
            }
            for (level, value) in key.iter().enumerate().skip(changed) {
                steps.push(GroupStep::Open {
                    level,
                    value: value.clone(),
                    index,
                });
            }
        }
        steps.push(GroupStep::Item(index));
    }

    close_levels(&mut steps, &keys[last], 0, last);
    Ok(steps)
}

fn close_levels(steps: &mut Vec<GroupStep>, key: &[Value], from_level: usize, index: usize) {
    for level in (from_level..key.len()).rev() {
        steps.push(GroupStep::Close {
            level,
            value: key[level].clone(),
            index,
        });
    }
}

fn check_nesting(
    groups: &[Group],
    previous: &[Value],
    current: &[Value],
    changed: usize,
    index: usize,
) -> Result<(), ReportError> {
    match (changed + 1..groups.len()).find(|&inner| previous[inner] == current[inner]) {
        Some(inner) => Err(ReportError::InconsistentGroupNesting {
            outer: groups[changed].attribute_name.clone(),
            inner: groups[inner].attribute_name.clone(),
            index,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn objects(rows: serde_json::Value) -> Vec<Object> {
        banded_types::JsonRecord::objects_from_json(rows).unwrap()
    }

    fn open(level: usize, value: &str, index: usize) -> GroupStep {
        GroupStep::Open { level, value: Value::from(value), index }
    }

    fn close(level: usize, value: &str, index: usize) -> GroupStep {
        GroupStep::Close { level, value: Value::from(value), index }
    }

    #[test]
    fn test_adjacent_value_changes_only() {
        let objs = objects(json!([
            { "category": "A" }, { "category": "A" }, { "category": "B" },
            { "category": "B" }, { "category": "B" }, { "category": "A" }
        ]));
        let steps = partition(&objs, &[Group::new("category")], false).unwrap();
        let boundaries: Vec<_> = steps
            .into_iter()
            .filter(|s| !matches!(s, GroupStep::Item(_)))
            .collect();
        assert_eq!(
            boundaries,
            vec![
                open(0, "A", 0),
                close(0, "A", 1),
                open(0, "B", 2),
                close(0, "B", 4),
                open(0, "A", 5),
                close(0, "A", 5),
            ]
        );
    }

    #[test]
    fn test_items_interleave_with_boundaries() {
        let objs = objects(json!([{ "k": "x" }, { "k": "y" }]));
        let steps = partition(&objs, &[Group::new("k")], false).unwrap();
        assert_eq!(
            steps,
            vec![
                open(0, "x", 0),
                GroupStep::Item(0),
                close(0, "x", 0),
                open(0, "y", 1),
                GroupStep::Item(1),
                close(0, "y", 1),
            ]
        );
    }

    #[test]
    fn test_empty_sequence_emits_nothing() {
        let steps = partition(&[], &[Group::new("k")], true).unwrap();
        assert!(steps.is_empty());
    }

    #[test]
    fn test_no_groups_yields_items_only() {
        let objs = objects(json!([{ "k": 1 }, { "k": 2 }]));
        let steps = partition(&objs, &[], false).unwrap();
        assert_eq!(steps, vec![GroupStep::Item(0), GroupStep::Item(1)]);
    }

    #[test]
    fn test_outer_boundary_forces_inner_boundary() {
        // The inner value "x" is the same on both sides of the outer change.
        let objs = objects(json!([
            { "region": "north", "city": "x" },
            { "region": "south", "city": "x" }
        ]));
        let groups = [Group::new("region"), Group::new("city")];
        let steps = partition(&objs, &groups, false).unwrap();
        assert_eq!(
            steps,
            vec![
                open(0, "north", 0),
                open(1, "x", 0),
                GroupStep::Item(0),
                close(1, "x", 0),
                close(0, "north", 0),
                open(0, "south", 1),
                open(1, "x", 1),
                GroupStep::Item(1),
                close(1, "x", 1),
                close(0, "south", 1),
            ]
        );
    }

    #[test]
    fn test_inner_changes_do_not_close_outer() {
        let objs = objects(json!([
            { "region": "north", "city": "a" },
            { "region": "north", "city": "b" }
        ]));
        let groups = [Group::new("region"), Group::new("city")];
        let steps = partition(&objs, &groups, true).unwrap();
        assert_eq!(
            steps,
            vec![
                open(0, "north", 0),
                open(1, "a", 0),
                GroupStep::Item(0),
                close(1, "a", 0),
                open(1, "b", 1),
                GroupStep::Item(1),
                close(1, "b", 1),
                close(0, "north", 1),
            ]
        );
    }

    #[test]
    fn test_strict_nesting_rejects_unrefined_data() {
        let objs = objects(json!([
            { "region": "north", "city": "x" },
            { "region": "south", "city": "x" }
        ]));
        let groups = [Group::new("region"), Group::new("city")];
        let err = partition(&objs, &groups, true).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InconsistentGroupNesting { ref outer, ref inner, index: 1 }
                if outer == "region" && inner == "city"
        ));
    }

    #[test]
    fn test_missing_group_attribute_is_an_error() {
        let objs = objects(json!([{ "k": 1 }]));
        let err = partition(&objs, &[Group::new("missing")], false).unwrap_err();
        assert!(matches!(err, ReportError::AttributeNotFound { .. }));
    }

    #[test]
    fn test_validate_rejects_duplicate_attributes() {
        assert!(validate_groups(&[Group::new("a"), Group::new("b")]).is_ok());
        assert!(validate_groups(&[Group::new("a"), Group::new("a")]).is_err());
        assert!(validate_groups(&[Group::new("")]).is_err());
    }
}
