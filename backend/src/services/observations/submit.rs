use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::created;
use crate::services::with_connection;
use crate::storage::observations;
use actix_web::{web, HttpResponse};
use common::requests::ObservationSubmission;

/// Handler for `POST /api/projects/{project_id}/observations`.
///
/// No identity is required. The response echoes the stored observation,
/// including only the `field_data` entries that were accepted.
pub async fn process(
    project_id: web::Path<i64>,
    payload: web::Json<ObservationSubmission>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    let submission = payload.into_inner();

    let observation = with_connection(db, move |conn| {
        observations::submit(conn, project_id, &submission)
    })
    .await?;

    Ok(created("Observation submitted successfully!", observation))
}
