//! Timesheet Connector - Timesheet API integration for a host automation platform.
//!
//! This crate holds everything the platform needs to talk to the Timesheet
//! backend: OAuth, the five entity resources with their webhook lifecycle,
//! and the "Send Report" create.
//!
//! # Architecture
//!
//! ```text
//!       Host automation platform
//!          ↓ flat input map / webhook deliveries
//! ┌─────────────────────────────────────────┐
//! │       Resources (team, project, ...)     │
//! │  - list / search / create                │
//! │  - webhook subscribe, inbound            │
//! ├─────────────────────────────────────────┤
//! │       Report                             │
//! │  - resolve date range                    │
//! │  - project exported columns              │
//! │  - one POST /v1/export/send              │
//! └─────────────────────────────────────────┘
//!          ↓ Bearer token
//!   TimesheetClient  ←  Authenticator (OAuth)
//!          ↓
//!   Timesheet REST API
//! ```
//!
//! # Core Types
//!
//! - [`Resource`] - Trait implemented by every entity
//! - [`TimesheetClient`] - Authenticated HTTP client
//! - [`Authenticator`] - OAuth code exchange, refresh and token test
//! - [`ReportRequestBuilder`] - Report parameters to export request
//! - [`ConnectorError`] - Error taxonomy shared by all operations
//!
//! # Sending a Report
//!
//! ```no_run
//! use timesheet_connector::report::{send_report, ReportParameters};
//! use timesheet_connector::{ConnectorConfig, InputData, TimesheetClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> timesheet_connector::Result<()> {
//! let config = Arc::new(ConnectorConfig::new("client_id", "client_secret"));
//! let client = TimesheetClient::new(config, Some("access_token".to_string()))?;
//!
//! let inputs = InputData::new()
//!     .with("email", "support@timesheet.io")
//!     .with("report", "0")
//!     .with("dateRange", "3")
//!     .with("exportedFields", serde_json::json!(["2", "3", "4"]));
//!
//! let params = ReportParameters::from_inputs(&inputs)?;
//! let export = send_report(&client, &params, chrono::Utc::now()).await?;
//! println!("{}", export);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod datetime;
pub mod error;
pub mod fields;
pub mod inputs;
pub mod oauth;
pub mod report;
pub mod resource;
pub mod resources;

pub use client::{Profile, TimesheetClient};
pub use config::{ConnectorConfig, WeekStart};
pub use error::{ConnectorError, Result};
pub use fields::{Choice, FieldDescriptor, FieldType};
pub use inputs::InputData;
pub use oauth::{connection_label, Authenticator, Credentials, RefreshedToken};
pub use report::{
    DateInterval, DateRangeResolver, DateRangeSelector, ReportParameters, ReportRequestBuilder,
};
pub use resource::{Resource, UnsubscribeOutcome};
