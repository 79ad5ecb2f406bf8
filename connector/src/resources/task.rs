use crate::datetime::normalize_timestamp;
use crate::error::Result;
use crate::fields::{FieldDescriptor, FieldType};
use crate::inputs::InputData;
use crate::resource::{Resource, SortOrder};
use crate::resources::Body;
use serde_json::{json, Value};

/// Time entries booked on a project.
pub struct TaskResource;

impl Resource for TaskResource {
    fn key(&self) -> &'static str {
        "task"
    }

    fn noun(&self) -> &'static str {
        "Task"
    }

    fn path(&self) -> &'static str {
        "/v1/tasks"
    }

    // Chronological; the backend applies its default direction for an empty order.
    fn list_order(&self) -> SortOrder {
        SortOrder {
            sort: "dateTime",
            order: "",
        }
    }

    fn input_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("projectId")
                .label("Project")
                .help("Project of this Task")
                .kind(FieldType::String)
                .required()
                .dynamic("project.id.title")
                .alters_dynamic_fields(),
            FieldDescriptor::new("startDateTime")
                .label("Start Date")
                .help("Start date of this Task")
                .kind(FieldType::Datetime)
                .required(),
            FieldDescriptor::new("endDateTime")
                .label("End Date")
                .help("End date of this Task")
                .kind(FieldType::Datetime)
                .required(),
            FieldDescriptor::new("description")
                .label("Description")
                .help("Description of this Task")
                .kind(FieldType::Text),
            FieldDescriptor::new("location")
                .label("Location")
                .help("Location of work")
                .kind(FieldType::String),
            FieldDescriptor::new("billable")
                .label("Billable")
                .help("Is the Task billable?")
                .kind(FieldType::Boolean)
                .default_value("yes")
                .alters_dynamic_fields(),
        ]
    }

    /// `billed`/`paid` only make sense for billable tasks; rates and tags
    /// are chosen per project.
    fn dynamic_fields(&self, inputs: &InputData) -> Vec<FieldDescriptor> {
        let mut fields = Vec::new();

        if inputs.bool("billable") == Some(true) {
            fields.push(
                FieldDescriptor::new("billed")
                    .label("Billed")
                    .help("Was the Task billed?")
                    .kind(FieldType::Boolean)
                    .default_value("no"),
            );
            fields.push(
                FieldDescriptor::new("paid")
                    .label("Paid")
                    .help("Was the Task paid?")
                    .kind(FieldType::Boolean)
                    .default_value("no")
                    .alters_dynamic_fields(),
            );
        }

        if inputs.contains("projectId") {
            fields.push(
                FieldDescriptor::new("rateId")
                    .label("Rate")
                    .help("Rate of this Task")
                    .kind(FieldType::String)
                    .dynamic("rate.id.title"),
            );
            fields.push(
                FieldDescriptor::new("tags")
                    .label("Tags")
                    .help("Tags of this Task")
                    .kind(FieldType::String)
                    .dynamic("tag.id.name")
                    .list(),
            );
        }

        fields
    }

    fn create_body(&self, inputs: &InputData) -> Result<Value> {
        let billable = inputs.bool("billable");
        let only_if_billable = |key: &str| match billable {
            Some(true) => inputs.bool(key),
            Some(false) => Some(false),
            None => None,
        };

        Ok(Body::new()
            .set("projectId", inputs.required_str("projectId")?)
            .set(
                "startDateTime",
                normalize_timestamp(&inputs.required_str("startDateTime")?)?,
            )
            .set(
                "endDateTime",
                normalize_timestamp(&inputs.required_str("endDateTime")?)?,
            )
            .set_opt("description", inputs.str("description"))
            .set_opt("billable", billable)
            .set_opt("billed", only_if_billable("billed"))
            .set_opt("paid", only_if_billable("paid"))
            .set_opt("tags", inputs.list("tags"))
            .set_opt("location", inputs.str("location"))
            .set_opt("rateId", inputs.str("rateId"))
            .build())
    }

    fn sample(&self) -> Value {
        json!({
            "id": "6w57407o8d4348dg85111a83b6f6c4eb",
            "projectId": "6e57207d8d4348de85210a83b6f6c4ab",
            "startDateTime": "2022-11-14T16:00:00+00:00",
            "endDateTime": "2022-11-14T17:00:00+00:00",
            "description": "Lorem ipsum dolor sit amet, consectetuer adipiscing elit.",
            "location": "711-2880 Nulla St. Mankato Mississippi 96522"
        })
    }

    fn output_fields(&self) -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("id").label("ID"),
            FieldDescriptor::new("projectId").label("Project"),
            FieldDescriptor::new("startDateTime").label("Start Date"),
            FieldDescriptor::new("endDateTime").label("End Date"),
            FieldDescriptor::new("description").label("Description"),
            FieldDescriptor::new("location").label("Location"),
        ]
    }
}
