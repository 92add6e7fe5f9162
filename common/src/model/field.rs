use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of input types a project's observation form can declare.
///
/// The declared type decides which typed column of `observation_data` a submitted
/// value lands in. Values serialize in lowercase (`"number"`, `"multiselect"`, ...),
/// matching the `field_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Radio,
    Time,
    Number,
    Date,
    Checkbox,
    Multiselect,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Radio,
        FieldType::Time,
        FieldType::Number,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Multiselect,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Radio => "radio",
            FieldType::Time => "time",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Checkbox => "checkbox",
            FieldType::Multiselect => "multiselect",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the supported field types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldType(pub String);

impl fmt::Display for UnknownFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFieldType {}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_string()))
    }
}

/// One input of a project's observation form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub field_id: i64,
    /// Owning project. Never changes after creation.
    pub project_id: i64,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    /// Type-specific options, e.g. the choice list of a radio or multiselect field.
    pub field_options: Option<serde_json::Value>,
    pub field_required: bool,
}
