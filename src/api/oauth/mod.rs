//! OAuth 2.0 endpoints driven by the host platform.
//!
//! Implements the authorization code flow:
//! 1. Platform sends the user to GET /api/auth/authorize → Redirect to Timesheet
//! 2. User authorizes on Timesheet, which redirects back to the platform
//! 3. Platform POSTs the code to /api/auth/token and stores the token pair
//! 4. Platform calls /api/auth/refresh whenever a call fails with 401
//! 5. GET /api/auth/test validates a token and yields the connection label

use super::{AppError, AppState};
use crate::auth::extract_bearer_token;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{Json, Redirect},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use timesheet_connector::{connection_label, Credentials, Profile, RefreshedToken};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Authorize query parameters
#[derive(Debug, Deserialize)]
pub struct AuthorizeQuery {
    redirect_uri: Option<String>,
    state: Option<String>,
}

/// Code exchange request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    code: String,
    redirect_uri: String,
}

/// Refresh request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    refresh_token: String,
}

/// Auth test response: the profile plus the label the platform shows
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTestResponse {
    #[serde(flatten)]
    profile: Profile,
    connection_label: String,
}

/// Create OAuth API router
pub fn create_oauth_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/authorize", get(authorize))
        .route("/api/auth/token", post(exchange_token))
        .route("/api/auth/refresh", post(refresh_token))
        .route("/api/auth/test", get(test_auth))
        .with_state(state)
}

/// GET /api/auth/authorize
///
/// Redirects to the Timesheet authorization page. A `state` value is
/// generated when the platform does not supply one.
async fn authorize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Redirect, AppError> {
    let redirect_uri = query
        .redirect_uri
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'redirect_uri' parameter".to_string()))?;
    let csrf_state = query
        .state
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    debug!(redirect_uri = %redirect_uri, "Redirecting to Timesheet authorization");

    Ok(Redirect::temporary(
        &state.authenticator.authorize_url(&csrf_state, &redirect_uri),
    ))
}

/// POST /api/auth/token
///
/// Exchanges the authorization code for an access/refresh token pair.
async fn exchange_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<Credentials>, AppError> {
    if request.code.is_empty() {
        return Err(AppError::BadRequest("Missing 'code'".to_string()));
    }

    let credentials = state
        .authenticator
        .exchange_code(&request.code, &request.redirect_uri)
        .await
        .map_err(|e| {
            warn!(error = %e, "Token exchange failed");
            AppError::from(e)
        })?;

    info!(
        has_refresh_token = credentials.refresh_token.is_some(),
        "OAuth code exchanged"
    );
    Ok(Json(credentials))
}

/// POST /api/auth/refresh
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshedToken>, AppError> {
    let refreshed = state.authenticator.refresh(&request.refresh_token).await?;
    info!("Access token refreshed");
    Ok(Json(refreshed))
}

/// GET /api/auth/test
///
/// Validates the bearer token by fetching the user's profile.
async fn test_auth(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AuthTestResponse>, AppError> {
    let token = extract_bearer_token(&headers)?;
    let profile = state.authenticator.test(Some(token)).await?;
    let connection_label = connection_label(&profile);

    debug!("Access token verified");
    Ok(Json(AuthTestResponse {
        profile,
        connection_label,
    }))
}
