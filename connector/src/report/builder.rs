use crate::client::TimesheetClient;
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::fields::{choice, Choice};
use crate::inputs::InputData;
use crate::report::catalog::{self, ProjectedField};
use crate::report::range::{CustomBounds, DateRangeResolver, DateRangeSelector};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

pub const EXPORT_PATH: &str = "/v1/export/send";

/// Report layout produced by the backend. Sent as its integer code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    DataReport,
    TeamSummary,
}

impl ReportKind {
    pub const ALL: [ReportKind; 2] = [Self::DataReport, Self::TeamSummary];

    pub fn code(self) -> u8 {
        match self {
            Self::DataReport => 0,
            Self::TeamSummary => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DataReport => "Data Report",
            Self::TeamSummary => "Team Summary",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskTypeFilter {
    #[default]
    All,
    Task,
    Mileage,
    Call,
}

impl TaskTypeFilter {
    pub const ALL: [TaskTypeFilter; 4] = [Self::All, Self::Task, Self::Mileage, Self::Call];

    pub fn value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Task => "task",
            Self::Mileage => "mileage",
            Self::Call => "call",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Task => "Tasks",
            Self::Mileage => "Mileage",
            Self::Call => "Call",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BillingFilter {
    #[default]
    All,
    Billable,
    NotBillable,
    Paid,
    Unpaid,
    Billed,
    Outstanding,
}

impl BillingFilter {
    pub const ALL: [BillingFilter; 7] = [
        Self::All,
        Self::Billable,
        Self::NotBillable,
        Self::Paid,
        Self::Unpaid,
        Self::Billed,
        Self::Outstanding,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Billable => "billable",
            Self::NotBillable => "notBillable",
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::Billed => "billed",
            Self::Outstanding => "outstanding",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Billable => "Billable",
            Self::NotBillable => "Not billable",
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
            Self::Billed => "Billed",
            Self::Outstanding => "Outstanding",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [Self::Xlsx, Self::Csv];

    pub fn value(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Xlsx => "Excel (.xlsx)",
            Self::Csv => "CSV (.csv)",
        }
    }
}

/// Choice lists shown by the platform for each enumerated report input.
pub fn report_kind_choices() -> Vec<Choice> {
    ReportKind::ALL
        .iter()
        .map(|k| choice(&k.code().to_string(), k.label()))
        .collect()
}

pub fn date_range_choices() -> Vec<Choice> {
    DateRangeSelector::ALL
        .iter()
        .map(|s| choice(&s.code().to_string(), s.label()))
        .collect()
}

pub fn task_type_choices() -> Vec<Choice> {
    TaskTypeFilter::ALL
        .iter()
        .map(|t| choice(t.value(), t.label()))
        .collect()
}

pub fn billing_filter_choices() -> Vec<Choice> {
    BillingFilter::ALL
        .iter()
        .map(|f| choice(f.value(), f.label()))
        .collect()
}

pub fn format_choices() -> Vec<Choice> {
    ExportFormat::ALL
        .iter()
        .map(|f| choice(f.value(), f.label()))
        .collect()
}

fn parse_choice<T: Copy>(
    inputs: &InputData,
    key: &str,
    options: &[T],
    value: impl Fn(T) -> String,
) -> Result<Option<T>> {
    let Some(raw) = inputs.str(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    options
        .iter()
        .copied()
        .find(|option| value(*option) == raw)
        .map(Some)
        .ok_or_else(|| ConnectorError::invalid_input(format!("'{}' is not a valid {}", raw, key)))
}

/// Everything needed for one export call.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportParameters {
    pub email: String,
    pub kind: ReportKind,
    pub project_ids: Option<Vec<String>>,
    pub task_type: TaskTypeFilter,
    pub filter: BillingFilter,
    pub date_range: DateRangeSelector,
    pub custom_start: Option<String>,
    pub custom_end: Option<String>,
    pub exported_fields: Option<Vec<String>>,
    pub summarize: Option<bool>,
    pub format: Option<ExportFormat>,
    pub filename: Option<String>,
}

impl ReportParameters {
    pub fn new(email: impl Into<String>, kind: ReportKind, date_range: DateRangeSelector) -> Self {
        Self {
            email: email.into(),
            kind,
            project_ids: None,
            task_type: TaskTypeFilter::default(),
            filter: BillingFilter::default(),
            date_range,
            custom_start: None,
            custom_end: None,
            exported_fields: None,
            summarize: None,
            format: None,
            filename: None,
        }
    }

    /// Parse the platform's flat input map.
    ///
    /// Fails on a missing `email`, `report` or `dateRange`, and on any
    /// enumerated value outside its choices. Nothing is sent on failure.
    pub fn from_inputs(inputs: &InputData) -> Result<Self> {
        let email = inputs.required_str("email")?;

        let kind = parse_choice(inputs, "report", &ReportKind::ALL, |k| k.code().to_string())?
            .ok_or_else(|| ConnectorError::invalid_input("'report' is required"))?;

        let date_range = inputs
            .required_str("dateRange")?
            .parse::<DateRangeSelector>()?;

        Ok(Self {
            email,
            kind,
            project_ids: inputs.list("projectIds"),
            task_type: parse_choice(inputs, "type", &TaskTypeFilter::ALL, |t| {
                t.value().to_string()
            })?
            .unwrap_or_default(),
            filter: parse_choice(inputs, "filter", &BillingFilter::ALL, |f| {
                f.value().to_string()
            })?
            .unwrap_or_default(),
            date_range,
            custom_start: inputs.str("start"),
            custom_end: inputs.str("end"),
            exported_fields: inputs.list("exportedFields"),
            summarize: inputs.bool("summarize"),
            format: parse_choice(inputs, "format", &ExportFormat::ALL, |f| f.value().to_string())?,
            filename: inputs.str("filename"),
        })
    }
}

/// Body of `POST /v1/export/send`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequestBody {
    pub email: String,
    pub report: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_ids: Option<Vec<String>>,

    #[serde(rename = "type")]
    pub task_type: TaskTypeFilter,

    pub filter: BillingFilter,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarize: Option<bool>,

    pub start: NaiveDate,
    pub end: NaiveDate,
    pub exported_fields: Vec<ProjectedField>,
}

/// Turns report parameters into the export request.
#[derive(Clone, Copy, Debug)]
pub struct ReportRequestBuilder {
    resolver: DateRangeResolver,
}

impl ReportRequestBuilder {
    pub fn new(resolver: DateRangeResolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self::new(DateRangeResolver::new(
            config.timezone,
            config.week_start.weekday(),
        ))
    }

    pub fn build(&self, params: &ReportParameters, now: DateTime<Utc>) -> Result<ExportRequestBody> {
        let interval = self.resolver.resolve(
            params.date_range,
            now,
            CustomBounds {
                start: params.custom_start.as_deref(),
                end: params.custom_end.as_deref(),
            },
        )?;
        let exported_fields = catalog::project(catalog::all(), params.exported_fields.as_deref());

        Ok(ExportRequestBody {
            email: params.email.clone(),
            report: params.kind.code(),
            filename: params.filename.clone(),
            format: params.format,
            project_ids: params.project_ids.clone(),
            task_type: params.task_type,
            filter: params.filter,
            summarize: params.summarize,
            start: interval.start,
            end: interval.end,
            exported_fields,
        })
    }
}

/// Build and send one report export. Exactly one backend call, no retry.
pub async fn send_report(
    client: &TimesheetClient,
    params: &ReportParameters,
    now: DateTime<Utc>,
) -> Result<Value> {
    let body = ReportRequestBuilder::from_config(client.config()).build(params, now)?;

    info!(
        report = body.report,
        start = %body.start,
        end = %body.end,
        columns = body.exported_fields.len(),
        "Sending report export"
    );

    client.post(EXPORT_PATH, &body).await
}
