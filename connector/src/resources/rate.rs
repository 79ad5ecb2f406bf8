use crate::error::Result;
use crate::fields::{FieldDescriptor, FieldType};
use crate::inputs::InputData;
use crate::resource::Resource;
use crate::resources::Body;
use serde_json::{json, Value};

/// Rates adjust a project's default salary by a factor and an hourly extra.
pub struct RateResource;

impl Resource for RateResource {
    fn key(&self) -> &'static str {
        "rate"
    }

    fn noun(&self) -> &'static str {
        "Rate"
    }

    fn path(&self) -> &'static str {
        "/v1/rates"
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
            FieldDescriptor::new("title")
                .label("Title")
                .help("Title of this Rate")
                .kind(FieldType::String)
                .required(),
            FieldDescriptor::new("factor")
                .label("Factor")
                .help("Factor multiplies projects default rate")
                .kind(FieldType::Number),
            FieldDescriptor::new("extra")
                .label("Extra/h")
                .help("Extra is added to the projects default rate")
                .kind(FieldType::Number),
        ]
    }

    fn create_body(&self, inputs: &InputData) -> Result<Value> {
        Ok(Body::new()
            .set("title", inputs.required_str("title")?)
            .set_opt("factor", inputs.number("factor")?)
            .set_opt("extra", inputs.number("extra")?)
            .set_opt("teamId", inputs.str("teamId"))
            .build())
    }

    fn sample(&self) -> Value {
        json!({
            "id": "6t57207o8d4848de85210a83b6f6c4bb",
            "title": "Test Rate",
            "factor": 1.0,
            "extra": 100.0
        })
    }

    fn output_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id").label("ID"),
            FieldDescriptor::new("title").label("Title"),
            FieldDescriptor::new("factor")
                .label("Factor")
                .kind(FieldType::Number),
            FieldDescriptor::new("extra")
                .label("Extra/h")
                .kind(FieldType::Number),
        ]
    }
}
