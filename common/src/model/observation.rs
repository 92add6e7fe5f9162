use crate::model::field::FieldType;
use serde::{Deserialize, Serialize};

/// One submitted response to a project's observation form, with its stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub observation_id: i64,
    pub project_id: i64,
    /// Free text, unauthenticated.
    pub student_name: Option<String>,
    /// Ordered by `field_id` ascending.
    pub data: Vec<ObservationDatum>,
}

/// A single field's value inside an observation, joined with the field metadata.
///
/// `field_value` mirrors the submitted value as text. Of the typed columns, only
/// the one matching the field's declared type can be non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationDatum {
    pub data_id: i64,
    pub field_id: i64,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    pub field_value: String,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    /// ISO `YYYY-MM-DD`.
    pub value_date: Option<String>,
    pub value_boolean: Option<bool>,
}
