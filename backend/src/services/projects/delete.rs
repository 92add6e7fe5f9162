use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::message;
use crate::services::{require_owner, with_connection};
use crate::storage::projects;
use actix_web::{web, HttpResponse};

/// Handler for `DELETE /api/projects/{project_id}`.
///
/// Removes observation data, observations, fields and finally the project, all
/// in one transaction.
pub async fn process(
    project_id: web::Path<i64>,
    teacher: CurrentTeacher,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        projects::delete_cascade(conn, project_id)
    })
    .await?;
    Ok(message(format!("Project ID:{} deleted successfully.", project_id)))
}
