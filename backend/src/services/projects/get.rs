use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok;
use crate::services::with_connection;
use crate::storage::projects;
use actix_web::{web, HttpResponse};

pub async fn process(
    project_id: web::Path<i64>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    let project = with_connection(db, move |conn| projects::get(conn, project_id)).await?;
    Ok(ok(project))
}
