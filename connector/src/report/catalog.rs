//! Exportable report columns and the projection of caller-selected ids onto them.

use crate::fields::{choice, Choice};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportableField {
    pub id: u16,
    pub name: &'static str,
}

const fn field(id: u16, name: &'static str) -> ExportableField {
    ExportableField { id, name }
}

/// Local mirror of the backend's export columns. Id 27 is not exportable.
pub const FIELD_CATALOG: [ExportableField; 33] = [
    field(2, "Date"),
    field(3, "Start Time"),
    field(4, "End Time"),
    field(5, "Abs. Duration"),
    field(6, "Rel. Duration"),
    field(7, "Abs. Salary"),
    field(8, "Rel. Salary"),
    field(9, "Description"),
    field(10, "Location"),
    field(11, "Feeling"),
    field(12, "Billable"),
    field(13, "Paid"),
    field(14, "Type"),
    field(15, "Origin"),
    field(16, "Destination"),
    field(17, "Distance"),
    field(18, "Phone"),
    field(19, "Project"),
    field(20, "Client"),
    field(21, "Pauses"),
    field(22, "Expenses"),
    field(23, "Expenses (paid)"),
    field(24, "Expenses (unpaid)"),
    field(25, "Expense Description"),
    field(26, "Notes"),
    field(28, "Tags"),
    field(29, "Rate"),
    field(30, "Factor"),
    field(31, "Extra/h"),
    field(32, "Rate (enabled)"),
    field(33, "Task ID"),
    field(34, "Project ID"),
    field(35, "Username"),
];

pub fn all() -> &'static [ExportableField] {
    &FIELD_CATALOG
}

/// Catalog as platform choices, ids rendered as strings.
pub fn choices() -> Vec<Choice> {
    all()
        .iter()
        .map(|f| choice(&f.id.to_string(), f.name))
        .collect()
}

/// A catalog entry placed at the index it was requested at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedField {
    pub id: u16,
    pub name: String,
    pub position: usize,
}

/// Resolve requested column ids against `catalog` in request order.
///
/// Ids that match nothing are skipped. A column requested twice appears once,
/// at the position of its first request. No request yields no columns.
pub fn project(catalog: &[ExportableField], requested: Option<&[String]>) -> Vec<ProjectedField> {
    let Some(requested) = requested else {
        return Vec::new();
    };

    let mut projected: Vec<ProjectedField> = Vec::with_capacity(requested.len());
    for (position, raw_id) in requested.iter().enumerate() {
        let raw_id = raw_id.trim();
        let Some(entry) = catalog.iter().find(|f| f.id.to_string() == raw_id) else {
            continue;
        };
        if projected.iter().any(|p| p.id == entry.id) {
            continue;
        }
        projected.push(ProjectedField {
            id: entry.id,
            name: entry.name.to_string(),
            position,
        });
    }
    projected
}
