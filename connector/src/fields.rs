use serde::{Deserialize, Serialize};

/// Platform field types.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Text,
    Integer,
    Number,
    Boolean,
    Datetime,
}

/// One entry of a static choice list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub value: String,
    pub sample: String,
    pub label: String,
}

pub fn choice(value: &str, label: &str) -> Choice {
    Choice {
        value: value.to_string(),
        sample: value.to_string(),
        label: label.to_string(),
    }
}

/// Input or output field declared to the platform UI.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub list: bool,

    /// Source of dynamic choices, `resource.valueKey.labelKey`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<String>,

    /// Changing this field makes the platform recompute dynamic fields
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub alters_dynamic_fields: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl FieldDescriptor {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            label: None,
            help_text: None,
            field_type: None,
            required: false,
            default: None,
            list: false,
            dynamic: None,
            alters_dynamic_fields: false,
            choices: Vec::new(),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn help(mut self, help_text: &str) -> Self {
        self.help_text = Some(help_text.to_string());
        self
    }

    pub fn kind(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, default: &str) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    pub fn dynamic(mut self, source: &str) -> Self {
        self.dynamic = Some(source.to_string());
        self
    }

    pub fn alters_dynamic_fields(mut self) -> Self {
        self.alters_dynamic_fields = true;
        self
    }

    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = choices;
        self
    }
}

/// Required team selector, shown on creates when the account has teams.
pub fn team_field(noun: &str) -> FieldDescriptor {
    FieldDescriptor::new("teamId")
        .label("Team")
        .help(&format!("Team of this {}", noun))
        .kind(FieldType::String)
        .required()
        .dynamic("team.id.name")
}
