use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok;
use crate::services::with_connection;
use crate::storage::observations;
use actix_web::{web, HttpResponse};

pub async fn process(
    project_id: web::Path<i64>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    let list = with_connection(db, move |conn| observations::list_by_project(conn, project_id))
        .await?;
    Ok(ok(list))
}
