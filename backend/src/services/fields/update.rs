use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok_with_message;
use crate::services::{require_owner, with_connection};
use crate::storage::fields;
use actix_web::{web, HttpResponse};
use common::requests::FieldPatch;

/// Handler for `PUT /api/projects/{project_id}/fields/{field_id}`.
///
/// Data already stored under the field keeps its old coercion even if the type
/// changes.
pub async fn process(
    path: web::Path<(i64, i64)>,
    teacher: CurrentTeacher,
    payload: web::Json<FieldPatch>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, field_id) = path.into_inner();
    let patch = payload.into_inner();

    let field = with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        fields::update(conn, project_id, field_id, &patch)
    })
    .await?;

    Ok(ok_with_message(
        format!("Field ID:{} updated successfully.", field_id),
        field,
    ))
}
