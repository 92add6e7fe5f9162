//! Request payloads accepted by the observatory HTTP API.
//!
//! Unrecognized keys are ignored everywhere. Partial-update payloads use
//! `Option<Option<T>>` for attributes that may be cleared, so "key absent" and
//! "key present with `null`" stay distinguishable.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Marks a key as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/projects`. The owner comes from the caller's identity.
#[derive(Debug, Default, Deserialize)]
pub struct NewProject {
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub project_instructions: Option<String>,
}

impl NewProject {
    pub fn is_empty(&self) -> bool {
        self.project_title.is_none()
            && self.project_description.is_none()
            && self.project_instructions.is_none()
    }
}

/// Body of `PUT /api/projects/{project_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, deserialize_with = "present")]
    pub project_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub project_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub project_instructions: Option<Option<String>>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.project_title.is_none()
            && self.project_description.is_none()
            && self.project_instructions.is_none()
    }
}

/// Body of `POST /api/projects/{project_id}/fields`.
///
/// `field_type` stays a string here so an unsupported type is reported as a
/// validation failure rather than a JSON parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct NewField {
    pub field_name: Option<String>,
    pub field_type: Option<String>,
    pub field_label: Option<String>,
    pub field_options: Option<Value>,
    pub is_required: Option<bool>,
    pub field_required: Option<bool>,
}

impl NewField {
    /// `is_required` and `field_required` are synonyms; `is_required` wins when
    /// both are sent.
    pub fn required(&self) -> Option<bool> {
        self.is_required.or(self.field_required)
    }
}

/// Body of `PUT /api/projects/{project_id}/fields/{field_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct FieldPatch {
    pub field_name: Option<String>,
    pub field_label: Option<String>,
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub field_options: Option<Option<Value>>,
    pub is_required: Option<bool>,
    pub field_required: Option<bool>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        self.field_name.is_none()
            && self.field_label.is_none()
            && self.field_type.is_none()
            && self.field_options.is_none()
            && self.required().is_none()
    }

    /// Same precedence as [`NewField::required`].
    pub fn required(&self) -> Option<bool> {
        self.is_required.or(self.field_required)
    }
}

/// Body of `POST /api/projects/{project_id}/observations`.
///
/// `field_data` maps field ids (as strings) to raw submitted values.
#[derive(Debug, Default, Deserialize)]
pub struct ObservationSubmission {
    pub student_name: Option<String>,
    #[serde(default)]
    pub field_data: Map<String, Value>,
}

/// Body of `PUT /api/projects/{project_id}/observations/{observation_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct ObservationPatch {
    #[serde(default, deserialize_with = "present")]
    pub student_name: Option<Option<String>>,
    pub field_data: Option<Map<String, Value>>,
}

impl ObservationPatch {
    pub fn is_empty(&self) -> bool {
        self.student_name.is_none() && self.field_data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_flag_accepts_both_keys() {
        let a: NewField = serde_json::from_str(r#"{"is_required": true}"#).unwrap();
        let b: NewField = serde_json::from_str(r#"{"field_required": true}"#).unwrap();
        assert_eq!(a.required(), Some(true));
        assert_eq!(b.required(), Some(true));
    }

    #[test]
    fn both_required_keys_together_prefer_is_required() {
        let req: NewField =
            serde_json::from_str(r#"{"is_required": false, "field_required": true}"#).unwrap();
        assert_eq!(req.required(), Some(false));

        let patch: FieldPatch =
            serde_json::from_str(r#"{"field_required": true, "is_required": true}"#).unwrap();
        assert_eq!(patch.required(), Some(true));
        assert!(!patch.is_empty());

        let only_alias: FieldPatch = serde_json::from_str(r#"{"field_required": false}"#).unwrap();
        assert_eq!(only_alias.required(), Some(false));
    }

    #[test]
    fn field_patch_ignores_unknown_keys() {
        let patch: FieldPatch = serde_json::from_str(r#"{"colour": "red"}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn explicit_null_is_distinct_from_absent() {
        let cleared: ObservationPatch =
            serde_json::from_str(r#"{"student_name": null}"#).unwrap();
        assert_eq!(cleared.student_name, Some(None));

        let absent: ObservationPatch = serde_json::from_str(r#"{"field_data": {}}"#).unwrap();
        assert_eq!(absent.student_name, None);
        assert!(!absent.is_empty());
    }
}
