use super::AppState;
use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use timesheet_connector::report::{self, CreateManifest};
use timesheet_connector::resources::{describe, get_all_resources, ResourceManifest};

/// How the platform authenticates users against this app
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationManifest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub authorize_url: &'static str,
    pub token_url: &'static str,
    pub refresh_url: &'static str,
    pub test_url: &'static str,
    /// Profile field shown as the connection name
    pub connection_label: &'static str,
}

/// Everything the platform needs to render triggers, searches and creates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub name: &'static str,
    pub version: &'static str,
    pub authentication: AuthenticationManifest,
    pub resources: Vec<ResourceManifest>,
    pub creates: Vec<CreateManifest>,
}

pub fn manifest() -> AppManifest {
    AppManifest {
        name: "Timesheet",
        version: env!("CARGO_PKG_VERSION"),
        authentication: AuthenticationManifest {
            kind: "oauth2",
            authorize_url: "/api/auth/authorize",
            token_url: "/api/auth/token",
            refresh_url: "/api/auth/refresh",
            test_url: "/api/auth/test",
            connection_label: "email",
        },
        resources: get_all_resources()
            .iter()
            .map(|r| describe(r.as_ref()))
            .collect(),
        creates: vec![report::describe()],
    }
}

/// Create the app manifest router
pub fn create_app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/app", get(get_manifest))
        .with_state(state)
}

/// GET /api/app
async fn get_manifest() -> Json<AppManifest> {
    Json(manifest())
}
