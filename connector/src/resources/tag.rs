use crate::error::Result;
use crate::fields::{FieldDescriptor, FieldType};
use crate::inputs::InputData;
use crate::resource::Resource;
use crate::resources::Body;
use serde_json::{json, Value};

/// Tags attached to tasks.
pub struct TagResource;

impl Resource for TagResource {
    fn key(&self) -> &'static str {
        "tag"
    }

    fn noun(&self) -> &'static str {
        "Tag"
    }

    fn path(&self) -> &'static str {
        "/v1/tags"
    }

    fn list_filters(&self, inputs: &InputData) -> Vec<(&'static str, String)> {
        inputs
            .str("projectId")
            .map(|id| vec![("projectId", id)])
            .unwrap_or_default()
    }

    fn has_team(&self) -> bool {
        true
    }

    fn input_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("name")
                .label("Name")
                .help("Name of this Tag")
                .kind(FieldType::String)
                .required(),
            FieldDescriptor::new("color")
                .label("Color")
                .help("Color of this Tag")
                .kind(FieldType::Integer),
        ]
    }

    fn create_body(&self, inputs: &InputData) -> Result<Value> {
        Ok(Body::new()
            .set("name", inputs.required_str("name")?)
            .set_opt("color", inputs.integer("color")?)
            .set_opt("teamId", inputs.str("teamId"))
            .build())
    }

    fn sample(&self) -> Value {
        json!({
            "id": "6p57207o8d4348de85211a83b6f6c4eb",
            "name": "Test Tag",
            "color": -12323
        })
    }

    fn output_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id").label("ID"),
            FieldDescriptor::new("name").label("Name"),
            FieldDescriptor::new("color")
                .label("Color")
                .kind(FieldType::Integer),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TimesheetClient;
    use crate::config::ConnectorConfig;
    use crate::resource::UnsubscribeOutcome;
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    fn client_for(server: &Server) -> TimesheetClient {
        let config = ConnectorConfig::new("id", "secret").with_base_url(server.url());
        TimesheetClient::new(Arc::new(config), Some("test_token".to_string())).unwrap()
    }

    #[test]
    fn test_create_body() {
        let inputs = InputData::new().with("name", "urgent").with("color", "-12323");
        let body = TagResource.create_body(&inputs).unwrap();
        assert_eq!(body, json!({"name": "urgent", "color": -12323}));
    }

    #[tokio::test]
    async fn test_list_filtered_by_project() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/tags")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("projectId".into(), "p1".into()),
                Matcher::UrlEncoded("sort".into(), "alpha".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"items": [{"id": "tag_1", "name": "urgent"}]}"#)
            .create_async()
            .await;

        let inputs = InputData::new().with("projectId", "p1");
        let tags = TagResource.list(&client_for(&server), 0, &inputs).await.unwrap();

        mock.assert_async().await;
        assert_eq!(tags[0]["name"], "urgent");
    }

    #[tokio::test]
    async fn test_subscribe() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/webhooks")
            .match_body(Matcher::Json(json!({
                "target": "http://example.com/webhook",
                "event": "tag.create"
            })))
            .with_status(201)
            .with_body(r#"{"id": "webhook_1"}"#)
            .create_async()
            .await;

        let subscription = TagResource
            .subscribe(&client_for(&server), "http://example.com/webhook")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(subscription["id"], "webhook_1");
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/v1/webhooks/webhook_1")
            .with_status(200)
            .with_body(r#"{"deleted": true}"#)
            .create_async()
            .await;

        let outcome = TagResource
            .unsubscribe(&client_for(&server), Some(&json!({"id": "webhook_1"})))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            outcome,
            UnsubscribeOutcome::Unsubscribed {
                response: json!({"deleted": true})
            }
        );
    }

    #[test]
    fn test_inbound() {
        let delivery = json!({"item": {"id": "tag_1", "name": "urgent", "color": 5}});
        assert_eq!(TagResource.inbound(&delivery).unwrap().len(), 1);
        assert!(TagResource.inbound(&json!({})).is_err());
    }
}
