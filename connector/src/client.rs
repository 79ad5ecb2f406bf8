use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

pub const PROFILE_PATH: &str = "/v1/profiles/me";

/// The authenticated account, as returned by `GET /v1/profiles/me`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    #[serde(default)]
    pub email: Option<String>,

    /// Whether the account has the teams feature switched on
    #[serde(rename = "activatedTeams", default)]
    pub activated_teams: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// HTTP client for the Timesheet REST API.
///
/// Adds `Authorization: Bearer <token>` to every request when a token is
/// present. Responses are returned as raw JSON: the connector passes backend
/// records through to the platform without owning their schema.
#[derive(Clone)]
pub struct TimesheetClient {
    access_token: Option<String>,
    http_client: Client,
    config: Arc<ConnectorConfig>,
}

impl TimesheetClient {
    pub fn new(config: Arc<ConnectorConfig>, access_token: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("timesheet-connector/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            access_token,
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// `GET {path}` with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.config.url(path);
        debug!(url = %url, "GET");
        let request = self.http_client.get(&url).query(query);
        self.send(request).await
    }

    /// `POST {path}` with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.config.url(path);
        debug!(url = %url, "POST");
        let request = self.http_client.post(&url).json(body);
        self.send(request).await
    }

    /// `DELETE {path}`.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        let url = self.config.url(path);
        debug!(url = %url, "DELETE");
        let request = self.http_client.delete(&url);
        self.send(request).await
    }

    /// Fetch the authenticated account.
    pub async fn fetch_profile(&self) -> Result<Profile> {
        let value = self.get(PROFILE_PATH, &[]).await?;
        serde_json::from_value(value)
            .map_err(|e| ConnectorError::Decode(format!("profile: {}", e)))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        read_json(response).await
    }
}

/// Map the status to the error taxonomy and decode the body.
///
/// - 401 → `Auth` (token expired or invalid)
/// - other non-2xx → `Upstream` with the raw body
/// - empty 2xx body → `null`
pub(crate) async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(ConnectorError::Auth(if body.is_empty() {
            "token expired or invalid".to_string()
        } else {
            body
        }));
    }
    if !status.is_success() {
        return Err(ConnectorError::Upstream {
            status: status.as_u16(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| ConnectorError::Decode(e.to_string()))
}

/// Extract the `items` array from a paged list or search response.
pub fn items(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(ConnectorError::Decode(format!(
                "expected 'items' to be an array, got {}",
                other
            ))),
        },
        other => Err(ConnectorError::Decode(format!(
            "expected a paged object, got {}",
            other
        ))),
    }
}
