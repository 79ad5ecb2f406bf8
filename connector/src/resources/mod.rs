//! Resource registry - the five Timesheet entities exposed to the platform.

pub mod project;
pub mod rate;
pub mod tag;
pub mod task;
pub mod team;

use crate::error::{ConnectorError, Result};
use crate::fields::FieldDescriptor;
use crate::resource::Resource;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use project::ProjectResource;
pub use rate::RateResource;
pub use tag::TagResource;
pub use task::TaskResource;
pub use team::TeamResource;

/// Returns all available resources, in platform display order.
pub fn get_all_resources() -> Vec<Arc<dyn Resource>> {
    vec![
        Arc::new(TeamResource),
        Arc::new(ProjectResource),
        Arc::new(TaskResource),
        Arc::new(TagResource),
        Arc::new(RateResource),
    ]
}

/// Look up a resource by its platform key.
pub fn get_resource(key: &str) -> Result<Arc<dyn Resource>> {
    get_all_resources()
        .into_iter()
        .find(|r| r.key() == key)
        .ok_or_else(|| ConnectorError::UnknownResource(key.to_string()))
}

/// Static description of a resource for the platform manifest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceManifest {
    pub key: &'static str,
    pub noun: &'static str,
    pub webhook_event: String,
    pub input_fields: Vec<FieldDescriptor>,
    pub output_fields: Vec<FieldDescriptor>,
    pub sample: Value,
}

pub fn describe(resource: &dyn Resource) -> ResourceManifest {
    ResourceManifest {
        key: resource.key(),
        noun: resource.noun(),
        webhook_event: resource.webhook_event(),
        input_fields: resource.input_fields(),
        output_fields: resource.output_fields(),
        sample: resource.sample(),
    }
}

/// JSON object builder that leaves absent optionals out of the body.
#[derive(Default)]
pub(crate) struct Body(Map<String, Value>);

impl Body {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn set_opt<T: Into<Value>>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    pub(crate) fn build(self) -> Value {
        Value::Object(self.0)
    }
}
