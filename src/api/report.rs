use super::{AppError, AppState};
use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use timesheet_connector::report::{self, send_report, ReportMetadata, ReportParameters};
use timesheet_connector::{FieldDescriptor, InputData};
use tracing::info;

/// Create report API router
pub fn create_report_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/creates/report", post(perform))
        .route("/api/creates/report/fields", post(fields))
        .route("/api/creates/report/metadata", get(metadata))
        .with_state(state)
}

/// POST /api/creates/report
///
/// Validates the inputs, then sends exactly one export request. Invalid
/// inputs are rejected before anything reaches the Timesheet API.
async fn perform(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(inputs): Json<InputData>,
) -> Result<Json<Value>, AppError> {
    let params = ReportParameters::from_inputs(&inputs)?;
    let client = state.client(&headers)?;

    let export = send_report(&client, &params, Utc::now()).await?;
    info!(report = params.kind.code(), "Report export requested");
    Ok(Json(export))
}

/// POST /api/creates/report/fields
async fn fields(Json(inputs): Json<InputData>) -> Json<Vec<FieldDescriptor>> {
    Json(report::visible_fields(&inputs))
}

/// GET /api/creates/report/metadata
async fn metadata() -> Json<ReportMetadata> {
    Json(report::metadata())
}
