use crate::client::{items, Profile, TimesheetClient};
use crate::error::{ConnectorError, Result};
use crate::fields::{team_field, FieldDescriptor};
use crate::inputs::InputData;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const WEBHOOKS_PATH: &str = "/v1/webhooks";

/// `sort`/`order` query pair for list calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub sort: &'static str,
    pub order: &'static str,
}

/// Newest first; used for the webhook sample list.
pub const LATEST: SortOrder = SortOrder {
    sort: "created",
    order: "desc",
};

pub const ALPHABETICAL: SortOrder = SortOrder {
    sort: "alpha",
    order: "asc",
};

/// Result of a webhook unsubscribe.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UnsubscribeOutcome {
    /// The webhook was deleted; carries the backend response
    Unsubscribed { response: Value },
    /// No webhook id was recorded at subscribe time, nothing was sent
    Skipped,
}

/// A Timesheet entity exposed to the platform.
///
/// Implementors only describe the entity: its API path, list ordering,
/// create body and field metadata. The lifecycle operations (get, list,
/// search, create, webhook subscribe/unsubscribe/inbound) are provided
/// methods shared by every resource.
///
/// # Lifecycle
/// 1. Platform calls `subscribe()` when a zap using the trigger is turned on
/// 2. Backend POSTs created entities to the platform, which hands each
///    delivery to `inbound()`
/// 3. `latest()` feeds the platform sample records while the zap is edited
/// 4. `unsubscribe()` runs when the zap is turned off
///
/// # Example
/// ```no_run
/// use timesheet_connector::resources::get_resource;
/// use timesheet_connector::{ConnectorConfig, Resource, TimesheetClient};
/// use std::sync::Arc;
///
/// # async fn run() -> timesheet_connector::Result<()> {
/// let config = Arc::new(ConnectorConfig::new("client_id", "client_secret"));
/// let client = TimesheetClient::new(config, Some("access_token".to_string()))?;
/// let teams = get_resource("team")?;
/// let first_page = teams.list(&client, 0, &Default::default()).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Resource: Send + Sync {
    /// Platform key, lowercase (e.g. "project"). Also prefixes the webhook event.
    fn key(&self) -> &'static str;

    /// Display noun (e.g. "Project").
    fn noun(&self) -> &'static str;

    /// Collection path (e.g. "/v1/projects").
    fn path(&self) -> &'static str;

    /// Ordering of the platform's list (dropdown) call.
    fn list_order(&self) -> SortOrder {
        ALPHABETICAL
    }

    /// Extra query parameters for list calls.
    fn list_filters(&self, _inputs: &InputData) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Whether creates can be assigned to a team.
    fn has_team(&self) -> bool {
        false
    }

    /// Key under which webhook deliveries carry the entity.
    fn inbound_envelope(&self) -> &'static str {
        "item"
    }

    /// Static create inputs.
    fn input_fields(&self) -> Vec<FieldDescriptor>;

    /// Create inputs that depend on other inputs.
    fn dynamic_fields(&self, _inputs: &InputData) -> Vec<FieldDescriptor> {
        Vec::new()
    }

    /// Request body for `POST {path}`.
    fn create_body(&self, inputs: &InputData) -> Result<Value>;

    fn sample(&self) -> Value;

    fn output_fields(&self) -> Vec<FieldDescriptor>;

    fn webhook_event(&self) -> String {
        format!("{}.create", self.key())
    }

    /// Full create form for the current inputs.
    ///
    /// The team selector leads the form when the resource supports teams and
    /// the profile has them activated.
    fn visible_create_fields(
        &self,
        inputs: &InputData,
        profile: Option<&Profile>,
    ) -> Vec<FieldDescriptor> {
        let mut fields = Vec::new();
        if self.has_team() && profile.is_some_and(|p| p.activated_teams) {
            fields.push(team_field(self.noun()));
        }
        fields.extend(self.input_fields());
        fields.extend(self.dynamic_fields(inputs));
        fields
    }

    async fn get(&self, client: &TimesheetClient, id: &str) -> Result<Value> {
        if id.is_empty() {
            return Err(ConnectorError::invalid_input("'id' is required"));
        }
        debug!(resource = self.key(), id = %id, "Fetching by id");
        client
            .get(&format!("{}/{}", self.path(), urlencoding::encode(id)), &[])
            .await
    }

    async fn list(
        &self,
        client: &TimesheetClient,
        page: u32,
        inputs: &InputData,
    ) -> Result<Vec<Value>> {
        self.list_sorted(client, page, inputs, self.list_order()).await
    }

    /// Newest records first, for webhook samples.
    async fn latest(
        &self,
        client: &TimesheetClient,
        page: u32,
        inputs: &InputData,
    ) -> Result<Vec<Value>> {
        self.list_sorted(client, page, inputs, LATEST).await
    }

    async fn list_sorted(
        &self,
        client: &TimesheetClient,
        page: u32,
        inputs: &InputData,
        order: SortOrder,
    ) -> Result<Vec<Value>> {
        let mut query = vec![
            ("limit", client.page_size().to_string()),
            ("page", backend_page(page)?.to_string()),
        ];
        query.extend(self.list_filters(inputs));
        query.push(("sort", order.sort.to_string()));
        query.push(("order", order.order.to_string()));

        debug!(resource = self.key(), page = page, sort = order.sort, "Listing");
        items(client.get(self.path(), &query).await?)
    }

    async fn search(&self, client: &TimesheetClient, text: &str, page: u32) -> Result<Vec<Value>> {
        let body = json!({
            "search": text,
            "limit": client.page_size(),
            "page": backend_page(page)?,
        });
        debug!(resource = self.key(), "Searching");
        items(
            client
                .post(&format!("{}/search", self.path()), &body)
                .await?,
        )
    }

    async fn create(&self, client: &TimesheetClient, inputs: &InputData) -> Result<Value> {
        let body = self.create_body(inputs)?;
        let created = client.post(self.path(), &body).await?;
        info!(resource = self.key(), "Created");
        Ok(created)
    }

    /// Create form, fetching the profile only when a team selector may be needed.
    async fn create_fields(
        &self,
        client: &TimesheetClient,
        inputs: &InputData,
    ) -> Result<Vec<FieldDescriptor>> {
        let profile = if self.has_team() {
            Some(client.fetch_profile().await?)
        } else {
            None
        };
        Ok(self.visible_create_fields(inputs, profile.as_ref()))
    }

    /// Register the platform's target URL for `{key}.create` events.
    async fn subscribe(&self, client: &TimesheetClient, target_url: &str) -> Result<Value> {
        if target_url.is_empty() {
            return Err(ConnectorError::invalid_input("'targetUrl' is required"));
        }
        let body = json!({
            "target": target_url,
            "event": self.webhook_event(),
        });
        let subscription = client.post(WEBHOOKS_PATH, &body).await?;
        info!(resource = self.key(), event = %self.webhook_event(), "Webhook subscribed");
        Ok(subscription)
    }

    /// Delete the webhook recorded in `subscribe_data`.
    async fn unsubscribe(
        &self,
        client: &TimesheetClient,
        subscribe_data: Option<&Value>,
    ) -> Result<UnsubscribeOutcome> {
        let Some(id) = subscribe_data.and_then(webhook_id) else {
            info!(resource = self.key(), "No webhook ID found, skipping webhook deletion");
            return Ok(UnsubscribeOutcome::Skipped);
        };
        let response = client
            .delete(&format!("{}/{}", WEBHOOKS_PATH, urlencoding::encode(&id)))
            .await?;
        info!(resource = self.key(), webhook_id = %id, "Webhook unsubscribed");
        Ok(UnsubscribeOutcome::Unsubscribed { response })
    }

    /// Unwrap a webhook delivery into the records it carries.
    fn inbound(&self, cleaned_request: &Value) -> Result<Vec<Value>> {
        match cleaned_request.get(self.inbound_envelope()) {
            Some(item) if !item.is_null() => Ok(vec![item.clone()]),
            _ => Err(ConnectorError::InvalidWebhook(
                "Webhook data is invalid or missing".to_string(),
            )),
        }
    }
}

/// Platform pages are zero-based, the Timesheet API's are one-based.
fn backend_page(page: u32) -> Result<u32> {
    page.checked_add(1)
        .ok_or_else(|| ConnectorError::invalid_input("'page' is out of range"))
}

fn webhook_id(subscribe_data: &Value) -> Option<String> {
    match subscribe_data.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_id() {
        assert_eq!(webhook_id(&json!({"id": "w1"})).as_deref(), Some("w1"));
        assert_eq!(webhook_id(&json!({"id": 42})).as_deref(), Some("42"));
        assert_eq!(webhook_id(&json!({"id": ""})), None);
        assert_eq!(webhook_id(&json!({})), None);
    }

    #[test]
    fn test_backend_page() {
        assert_eq!(backend_page(0).unwrap(), 1);
        assert_eq!(backend_page(4).unwrap(), 5);
        assert!(matches!(
            backend_page(u32::MAX),
            Err(ConnectorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unsubscribe_outcome_serialization() {
        assert_eq!(
            serde_json::to_value(UnsubscribeOutcome::Skipped).unwrap(),
            json!({"status": "skipped"})
        );
        assert_eq!(
            serde_json::to_value(UnsubscribeOutcome::Unsubscribed {
                response: json!({"id": "w1"})
            })
            .unwrap(),
            json!({"status": "unsubscribed", "response": {"id": "w1"}})
        );
    }
}
