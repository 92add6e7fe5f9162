use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok_with_message;
use crate::services::{require_owner, with_connection};
use crate::storage::projects;
use actix_web::{web, HttpResponse};
use common::requests::ProjectPatch;

pub async fn process(
    project_id: web::Path<i64>,
    teacher: CurrentTeacher,
    payload: web::Json<ProjectPatch>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    let patch = payload.into_inner();

    let project = with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        projects::update(conn, project_id, &patch)
    })
    .await?;

    Ok(ok_with_message(
        format!("Project ID:{} updated successfully.", project_id),
        project,
    ))
}
