use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::created;
use crate::services::{require_owner, with_connection};
use crate::storage::fields;
use actix_web::{web, HttpResponse};
use common::requests::NewField;

/// Handler for `POST /api/projects/{project_id}/fields`.
///
/// # Returns
/// - `201 Created` with the stored `FieldDefinition`.
/// - `400` for a missing name/type or an unsupported type, `401`/`403` for a
///   caller who does not own the project, `404` for an unknown project.
pub async fn process(
    project_id: web::Path<i64>,
    teacher: CurrentTeacher,
    payload: web::Json<NewField>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    let req = payload.into_inner();

    let field = with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        fields::add(conn, project_id, &req)
    })
    .await?;

    Ok(created("Field created successfully!", field))
}
