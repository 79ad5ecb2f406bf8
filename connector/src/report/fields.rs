use crate::fields::{Choice, FieldDescriptor, FieldType};
use crate::inputs::InputData;
use crate::report::builder::{
    billing_filter_choices, date_range_choices, format_choices, report_kind_choices,
    task_type_choices,
};
use crate::report::catalog;
use crate::report::range::DateRangeSelector;
use serde::Serialize;
use serde_json::{json, Value};

fn leading_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("email")
            .kind(FieldType::String)
            .required(),
        FieldDescriptor::new("report")
            .label("Report")
            .help("Type of Report")
            .kind(FieldType::Integer)
            .required()
            .choices(report_kind_choices()),
        FieldDescriptor::new("projectIds")
            .label("Projects")
            .help("Includes Tasks of these Projects")
            .dynamic("project.id.title")
            .list(),
        FieldDescriptor::new("dateRange")
            .label("Date Range")
            .help("Date range of Report")
            .kind(FieldType::Integer)
            .required()
            .alters_dynamic_fields()
            .choices(date_range_choices()),
    ]
}

fn custom_range_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("start")
            .label("Start Date")
            .help("Start date of this Report")
            .kind(FieldType::Datetime)
            .required(),
        FieldDescriptor::new("end")
            .label("End Date")
            .help("End date of this Report")
            .kind(FieldType::Datetime)
            .required(),
    ]
}

fn trailing_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("type")
            .label("Type")
            .help("Type of Tasks")
            .kind(FieldType::String)
            .default_value("all")
            .choices(task_type_choices()),
        FieldDescriptor::new("filter")
            .label("Filter")
            .help("Filter tasks")
            .kind(FieldType::String)
            .default_value("all")
            .choices(billing_filter_choices()),
        FieldDescriptor::new("exportedFields")
            .label("Exported Fields")
            .required()
            .list()
            .choices(catalog::choices()),
        FieldDescriptor::new("summarize")
            .label("Summarize data columns")
            .help("Adds a summary row")
            .kind(FieldType::Boolean),
        FieldDescriptor::new("format")
            .label("Format")
            .help("File format")
            .kind(FieldType::String)
            .choices(format_choices()),
        FieldDescriptor::new("filename")
            .label("Filename")
            .help("Name of the file")
            .kind(FieldType::String),
    ]
}

/// Report form for the current partial input.
///
/// `start` and `end` appear right after `dateRange`, and only when the
/// custom range is selected. Pure: the platform calls this again whenever
/// `dateRange` changes.
pub fn visible_fields(inputs: &InputData) -> Vec<FieldDescriptor> {
    let custom = inputs
        .str("dateRange")
        .and_then(|raw| raw.parse::<DateRangeSelector>().ok())
        == Some(DateRangeSelector::Custom);

    let mut fields = leading_fields();
    if custom {
        fields.extend(custom_range_fields());
    }
    fields.extend(trailing_fields());
    fields
}

pub fn sample() -> Value {
    json!({
        "email": "support@timesheet.io",
        "report": 0,
        "projectIds": ["6e57207d8d4348de85210a83b6f6c4ab"],
        "start": "2022-11-01",
        "end": "2022-11-30",
        "type": "all",
        "filter": "all",
        "exportedFields": ["2", "3", "4", "5", "6"],
        "summarize": true,
        "format": "xlsx",
        "filename": "timesheet"
    })
}

pub fn output_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("email").label("Email"),
        FieldDescriptor::new("report")
            .label("Report")
            .kind(FieldType::Integer),
        FieldDescriptor::new("projectIds")
            .label("Project Ids")
            .list(),
        FieldDescriptor::new("start").label("Start Date"),
        FieldDescriptor::new("end").label("End Date"),
        FieldDescriptor::new("type").label("Type"),
        FieldDescriptor::new("filter").label("Filter"),
        FieldDescriptor::new("exportedFields")
            .label("Exported Fields")
            .list(),
        FieldDescriptor::new("summarize")
            .label("Summarize")
            .kind(FieldType::Boolean),
        FieldDescriptor::new("format").label("Format"),
        FieldDescriptor::new("filename").label("Filename"),
    ]
}

/// Static choice lists for the platform UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub exported_fields: Vec<Choice>,
    pub reports: Vec<Choice>,
    pub date_ranges: Vec<Choice>,
    pub types: Vec<Choice>,
    pub filters: Vec<Choice>,
    pub formats: Vec<Choice>,
}

pub fn metadata() -> ReportMetadata {
    ReportMetadata {
        exported_fields: catalog::choices(),
        reports: report_kind_choices(),
        date_ranges: date_range_choices(),
        types: task_type_choices(),
        filters: billing_filter_choices(),
        formats: format_choices(),
    }
}
