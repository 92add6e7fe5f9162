use crate::auth::{CurrentTeacher, OwnershipGuard};
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok;
use crate::services::with_connection;
use crate::storage::projects;
use actix_web::{web, HttpResponse};

/// Only the teacher themselves may list their projects.
pub async fn process(
    teacher_id: web::Path<i64>,
    teacher: CurrentTeacher,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let teacher_id = teacher_id.into_inner();
    OwnershipGuard::require(teacher.id(), teacher_id)?;

    let list = with_connection(db, move |conn| projects::list_by_teacher(conn, teacher_id)).await?;
    Ok(ok(list))
}
