use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok_with_message;
use crate::services::{require_owner, with_connection};
use crate::storage::observations;
use actix_web::{web, HttpResponse};
use common::requests::ObservationPatch;

/// Handler for `PUT /api/projects/{project_id}/observations/{observation_id}`.
///
/// Each `field_data` entry replaces the stored value for that field, or adds one
/// when the observation had none.
pub async fn process(
    path: web::Path<(i64, i64)>,
    teacher: CurrentTeacher,
    payload: web::Json<ObservationPatch>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, observation_id) = path.into_inner();
    let patch = payload.into_inner();

    let observation = with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        observations::update(conn, project_id, observation_id, &patch)
    })
    .await?;

    Ok(ok_with_message(
        format!("Observation ID:{} updated successfully.", observation_id),
        observation,
    ))
}
