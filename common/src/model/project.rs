use serde::{Deserialize, Serialize};

/// A teacher's observation project.
///
/// `project_code` is the 8 character `[A-Z0-9]` code students use to reach the
/// form anonymously. It is assigned once at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: i64,
    pub teacher_id: i64,
    pub project_code: String,
    pub project_title: Option<String>,
    pub project_description: Option<String>,
    pub project_instructions: Option<String>,
}

/// What a student sees after entering a project code: the project and its form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectForm {
    pub project: Project,
    pub fields: Vec<crate::model::field::FieldDefinition>,
}
