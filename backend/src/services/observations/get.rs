use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok;
use crate::services::with_connection;
use crate::storage::observations;
use actix_web::{web, HttpResponse};

pub async fn process(
    path: web::Path<(i64, i64)>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, observation_id) = path.into_inner();
    let observation = with_connection(db, move |conn| {
        observations::get(conn, project_id, observation_id)
    })
    .await?;
    Ok(ok(observation))
}
