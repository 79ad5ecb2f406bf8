//! Resource endpoints: dropdown lists, searches, creates and the webhook
//! trigger lifecycle for each Timesheet entity.

use super::{AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use timesheet_connector::resources::get_resource;
use timesheet_connector::{FieldDescriptor, InputData, Resource, UnsubscribeOutcome};
use tracing::{debug, info};

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    search: String,
    #[serde(default)]
    page: u32,
}

/// Webhook subscribe request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    target_url: String,
}

/// Webhook unsubscribe request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeRequest {
    /// What the subscribe call returned, as stored by the platform
    #[serde(default)]
    subscribe_data: Option<Value>,
}

/// Create resource API router
pub fn create_resource_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/resources/:key/items", get(list_items).post(create_item))
        .route("/api/resources/:key/items/:id", get(get_item))
        .route("/api/resources/:key/latest", get(latest_items))
        .route("/api/resources/:key/search", post(search_items))
        .route("/api/resources/:key/fields", post(create_fields))
        .route("/api/resources/:key/hooks", post(subscribe))
        .route("/api/resources/:key/hooks/unsubscribe", post(unsubscribe))
        .route("/api/resources/:key/hooks/inbound", post(inbound))
        .with_state(state)
}

/// Split `page` from the remaining query parameters, which act as list filters.
fn page_and_filters(mut query: HashMap<String, String>) -> Result<(u32, InputData), AppError> {
    let page = match query.remove("page") {
        Some(raw) if !raw.is_empty() => raw.parse::<u32>().map_err(|_| {
            AppError::BadRequest(format!("Invalid 'page' parameter: {}", raw))
        })?,
        _ => 0,
    };
    let filters = query
        .into_iter()
        .fold(InputData::new(), |inputs, (key, value)| inputs.with(&key, value));
    Ok((page, filters))
}

/// GET /api/resources/:key/items/:id
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path((key, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let resource = get_resource(&key)?;
    let client = state.client(&headers)?;
    Ok(Json(resource.get(&client, &id).await?))
}

/// GET /api/resources/:key/items?page=0
async fn list_items(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, AppError> {
    let resource = get_resource(&key)?;
    let (page, filters) = page_and_filters(query)?;
    let client = state.client(&headers)?;

    let items = resource.list(&client, page, &filters).await?;
    debug!(resource = %key, page = page, count = items.len(), "Listed");
    Ok(Json(items))
}

/// GET /api/resources/:key/latest?page=0
async fn latest_items(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, AppError> {
    let resource = get_resource(&key)?;
    let (page, filters) = page_and_filters(query)?;
    let client = state.client(&headers)?;
    Ok(Json(resource.latest(&client, page, &filters).await?))
}

/// POST /api/resources/:key/search
async fn search_items(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<Value>>, AppError> {
    let resource = get_resource(&key)?;
    let client = state.client(&headers)?;
    Ok(Json(
        resource
            .search(&client, &request.search, request.page)
            .await?,
    ))
}

/// POST /api/resources/:key/items
async fn create_item(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(inputs): Json<InputData>,
) -> Result<Json<Value>, AppError> {
    let resource = get_resource(&key)?;
    let client = state.client(&headers)?;
    Ok(Json(resource.create(&client, &inputs).await?))
}

/// POST /api/resources/:key/fields
///
/// Create form for the current partial input.
async fn create_fields(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(inputs): Json<InputData>,
) -> Result<Json<Vec<FieldDescriptor>>, AppError> {
    let resource = get_resource(&key)?;
    if !resource.has_team() {
        return Ok(Json(resource.visible_create_fields(&inputs, None)));
    }
    let client = state.client(&headers)?;
    Ok(Json(resource.create_fields(&client, &inputs).await?))
}

/// POST /api/resources/:key/hooks
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<Value>, AppError> {
    let resource = get_resource(&key)?;
    let client = state.client(&headers)?;
    let subscription = resource.subscribe(&client, &request.target_url).await?;
    info!(resource = %key, "Trigger enabled");
    Ok(Json(subscription))
}

/// POST /api/resources/:key/hooks/unsubscribe
async fn unsubscribe(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UnsubscribeRequest>,
) -> Result<Json<UnsubscribeOutcome>, AppError> {
    let resource = get_resource(&key)?;
    let client = state.client(&headers)?;
    Ok(Json(
        resource
            .unsubscribe(&client, request.subscribe_data.as_ref())
            .await?,
    ))
}

/// POST /api/resources/:key/hooks/inbound
///
/// Unwraps a webhook delivery. No backend call, so no token is needed.
async fn inbound(
    Path(key): Path<String>,
    Json(cleaned_request): Json<Value>,
) -> Result<Json<Vec<Value>>, AppError> {
    let resource = get_resource(&key)?;
    Ok(Json(resource.inbound(&cleaned_request)?))
}
