use crate::auth::CurrentTeacher;
use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok;
use crate::services::{require_owner, with_connection};
use crate::storage::fields;
use actix_web::{web, HttpResponse};

pub async fn process(
    project_id: web::Path<i64>,
    teacher: CurrentTeacher,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let project_id = project_id.into_inner();
    let list = with_connection(db, move |conn| {
        require_owner(conn, teacher, project_id)?;
        fields::list(conn, project_id)
    })
    .await?;
    Ok(ok(list))
}
