use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::message;
use crate::services::{require_owner, with_connection};
use crate::storage::fields;
use actix_web::{web, HttpResponse};

pub async fn process(
    path: web::Path<(i64, i64)>,
    teacher: CurrentTeacher,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let (project_id, field_id) = path.into_inner();
    with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        fields::remove(conn, project_id, field_id)
    })
    .await?;
    Ok(message(format!("Field ID:{} deleted successfully.", field_id)))
}
