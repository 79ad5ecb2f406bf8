//! The "Send Report" create: date range resolution, column projection and
//! the single export call.

pub mod builder;
pub mod catalog;
pub mod fields;
pub mod range;

use crate::fields::FieldDescriptor;
use serde::Serialize;
use serde_json::Value;

pub use builder::{
    send_report, BillingFilter, ExportFormat, ExportRequestBody, ReportKind, ReportParameters,
    ReportRequestBuilder, TaskTypeFilter,
};
pub use catalog::{project, ExportableField, ProjectedField, FIELD_CATALOG};
pub use fields::{metadata, visible_fields, ReportMetadata};
pub use range::{CustomBounds, DateInterval, DateRangeResolver, DateRangeSelector};

pub const KEY: &str = "report";
pub const NOUN: &str = "Report";

/// Static description of the report create for the platform manifest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManifest {
    pub key: &'static str,
    pub noun: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub input_fields: Vec<FieldDescriptor>,
    pub output_fields: Vec<FieldDescriptor>,
    pub sample: Value,
}

pub fn describe() -> CreateManifest {
    CreateManifest {
        key: KEY,
        noun: NOUN,
        label: "Send Report",
        description: "Sends a new Report.",
        input_fields: visible_fields(&Default::default()),
        output_fields: fields::output_fields(),
        sample: fields::sample(),
    }
}
