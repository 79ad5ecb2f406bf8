use crate::error::Result;
use crate::fields::{FieldDescriptor, FieldType};
use crate::inputs::InputData;
use crate::resource::Resource;
use crate::resources::Body;
use serde_json::{json, Value};

/// Projects (clients/employers that tasks are booked on).
pub struct ProjectResource;

impl Resource for ProjectResource {
    fn key(&self) -> &'static str {
        "project"
    }

    fn noun(&self) -> &'static str {
        "Project"
    }

    fn path(&self) -> &'static str {
        "/v1/projects"
    }

    fn list_filters(&self, _inputs: &InputData) -> Vec<(&'static str, String)> {
        vec![("status", "all".to_string())]
    }

    fn has_team(&self) -> bool {
        true
    }

    // Project deliveries wrap the record in `payload`, the other entities in `item`.
    fn inbound_envelope(&self) -> &'static str {
        "payload"
    }

    fn input_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("title")
                .label("Title")
                .help("Title of this Project")
                .kind(FieldType::String)
                .required(),
            FieldDescriptor::new("employer")
                .label("Employer")
                .help("Employer of this Project")
                .kind(FieldType::String)
                .required(),
            FieldDescriptor::new("description")
                .label("Description")
                .help("Description of this Project")
                .kind(FieldType::Text),
            FieldDescriptor::new("office")
                .label("Office")
                .help("Office of this Project")
                .kind(FieldType::String),
            FieldDescriptor::new("salary")
                .label("Salary")
                .help("Salary of this Project in cents")
                .kind(FieldType::Integer),
            FieldDescriptor::new("color")
                .label("Color")
                .help("Color of this Project (e.g. #ff0000)")
                .kind(FieldType::String),
        ]
    }

    fn create_body(&self, inputs: &InputData) -> Result<Value> {
        Ok(Body::new()
            .set("title", inputs.required_str("title")?)
            .set("employer", inputs.required_str("employer")?)
            .set_opt("description", inputs.str("description"))
            .set_opt("office", inputs.str("office"))
            .set_opt("salary", inputs.integer("salary")?)
            .set_opt("color", inputs.str("color"))
            .set_opt("teamId", inputs.str("teamId"))
            .build())
    }

    fn sample(&self) -> Value {
        json!({
            "id": "6e57207d8d4348de85210a83b6f6c4ab",
            "title": "Test Project",
            "employer": "Test Company",
            "status": "open",
            "description": "Lorem ipsum dolor sit amet, consectetuer adipiscing elit.",
            "office": "Munich",
            "salary": 100000,
            "color": "#ff0000",
            "created": "1970-01-01T00:00:00+00:00",
            "updated": "1970-01-01T00:00:00+00:00"
        })
    }

    fn output_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id").label("ID"),
            FieldDescriptor::new("title").label("Title"),
            FieldDescriptor::new("employer").label("Employer"),
            FieldDescriptor::new("status").label("Status"),
            FieldDescriptor::new("description").label("Description"),
            FieldDescriptor::new("office").label("Office"),
            FieldDescriptor::new("salary")
                .label("Salary")
                .kind(FieldType::Integer),
            FieldDescriptor::new("color").label("Color"),
            FieldDescriptor::new("created")
                .label("Created")
                .kind(FieldType::Datetime),
            FieldDescriptor::new("updated")
                .label("Updated")
                .kind(FieldType::Datetime),
        ]
    }
}
