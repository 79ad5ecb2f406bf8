//! Platform-facing HTTP API.
//!
//! The host automation platform calls these endpoints with the user's access
//! token in the Authorization header; each handler forwards the call to the
//! Timesheet API through the connector crate.

pub mod app;
pub mod error;
pub mod oauth;
pub mod report;
pub mod resources;

pub use app::create_app_router;
pub use error::{AppError, ErrorResponse};
pub use oauth::create_oauth_router;
pub use report::create_report_router;
pub use resources::create_resource_router;

use crate::auth::extract_bearer_token;
use axum::{http::HeaderMap, Router};
use std::sync::Arc;
use timesheet_connector::{Authenticator, ConnectorConfig, ConnectorError, TimesheetClient};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state, immutable after startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConnectorConfig>,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(config: ConnectorConfig) -> Result<Self, ConnectorError> {
        let config = Arc::new(config);
        let authenticator = Authenticator::new(Arc::clone(&config))?;
        Ok(Self {
            config,
            authenticator,
        })
    }

    /// Timesheet client acting with the caller's bearer token
    pub fn client(&self, headers: &HeaderMap) -> Result<TimesheetClient, AppError> {
        let token = extract_bearer_token(headers)?;
        Ok(TimesheetClient::new(Arc::clone(&self.config), Some(token))?)
    }
}

/// Create the complete API router
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(create_app_router(Arc::clone(&state)))
        .merge(create_oauth_router(Arc::clone(&state)))
        .merge(create_resource_router(Arc::clone(&state)))
        .merge(create_report_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
