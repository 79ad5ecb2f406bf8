use crate::error::Result;
use crate::fields::{FieldDescriptor, FieldType};
use crate::inputs::InputData;
use crate::resource::Resource;
use crate::resources::Body;
use serde_json::{json, Value};

/// Teams the account belongs to.
pub struct TeamResource;

impl Resource for TeamResource {
    fn key(&self) -> &'static str {
        "team"
    }

    fn noun(&self) -> &'static str {
        "Team"
    }

    fn path(&self) -> &'static str {
        "/v1/teams"
    }

    fn input_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("name")
                .label("Name")
                .help("Name of this Team")
                .kind(FieldType::String)
                .required(),
            FieldDescriptor::new("description")
                .label("Description")
                .help("Description of this Team")
                .kind(FieldType::Text),
        ]
    }

    fn create_body(&self, inputs: &InputData) -> Result<Value> {
        Ok(Body::new()
            .set("name", inputs.required_str("name")?)
            .set_opt("description", inputs.str("description"))
            .build())
    }

    fn sample(&self) -> Value {
        json!({
            "id": "2i57207d2d4348de85210a13b6f6g4ab",
            "name": "Test Team",
            "description": "Lorem ipsum dolor sit amet, consectetuer adipiscing elit."
        })
    }

    fn output_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id").label("ID"),
            FieldDescriptor::new("name").label("Name"),
            FieldDescriptor::new("description").label("Description"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TimesheetClient;
    use crate::config::ConnectorConfig;
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    fn client_for(server: &Server) -> TimesheetClient {
        let config = ConnectorConfig::new("id", "secret").with_base_url(server.url());
        TimesheetClient::new(Arc::new(config), Some("test_token".to_string())).unwrap()
    }

    #[test]
    fn test_create_body() {
        let inputs = InputData::new().with("name", "Core").with("description", "Core team");
        let body = TeamResource.create_body(&inputs).unwrap();
        assert_eq!(body, json!({"name": "Core", "description": "Core team"}));
    }

    #[test]
    fn test_create_body_omits_absent_description() {
        let body = TeamResource
            .create_body(&InputData::new().with("name", "Core"))
            .unwrap();
        assert_eq!(body, json!({"name": "Core"}));
    }

    #[test]
    fn test_create_requires_name() {
        assert!(TeamResource.create_body(&InputData::new()).is_err());
    }

    #[test]
    fn test_create_fields_have_no_team_selector() {
        let fields = TeamResource.visible_create_fields(&InputData::new(), None);
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "description"]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/teams")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("sort".into(), "alpha".into()),
                Matcher::UrlEncoded("order".into(), "asc".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"items": [{"id": "t1", "name": "Alpha"}, {"id": "t2", "name": "Beta"}]}"#)
            .create_async()
            .await;

        let teams = TeamResource
            .list(&client_for(&server), 0, &InputData::new())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0]["name"], "Alpha");
    }

    #[tokio::test]
    async fn test_search() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/teams/search")
            .match_body(Matcher::Json(json!({"search": "core", "limit": 20, "page": 3})))
            .with_status(200)
            .with_body(r#"{"items": [{"id": "t1", "name": "Core"}]}"#)
            .create_async()
            .await;

        let found = TeamResource
            .search(&client_for(&server), "core", 2)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_failure_surfaces_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/webhooks")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let err = TeamResource
            .subscribe(&client_for(&server), "http://example.com/webhook")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
