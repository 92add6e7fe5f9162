use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::message;
use crate::services::{require_owner, with_connection};
use crate::storage::observations;
use actix_web::{web, HttpResponse};

pub async fn process(
    path: web::Path<(i64, i64)>,
    teacher: CurrentTeacher,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, observation_id) = path.into_inner();
    with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        observations::delete(conn, project_id, observation_id)
    })
    .await?;
    Ok(message(format!(
        "Observation ID:{} deleted successfully.",
        observation_id
    )))
}
