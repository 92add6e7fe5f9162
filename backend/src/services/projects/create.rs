use crate::auth::{CurrentTeacher, OwnershipGuard};
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::created;
use crate::services::with_connection;
use crate::storage::projects::{self, ProjectCodeAllocator};
use actix_web::{web, HttpResponse};
use common::requests::NewProject;

/// Handler for `POST /api/projects`.
///
/// The owner is always the authenticated caller; a `teacher_id` in the body is
/// ignored.
pub async fn process(
    teacher: CurrentTeacher,
    payload: web::Json<NewProject>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let teacher_id = OwnershipGuard::require_authenticated(teacher.id())?;
    let req = payload.into_inner();
    if req.is_empty() {
        return Err(ApiError::validation("No data provided."));
    }

    let project = with_connection(db, move |conn| {
        projects::create(conn, &mut ProjectCodeAllocator::new(), teacher_id, &req)
    })
    .await?;

    Ok(created("Project created successfully!", project))
}
