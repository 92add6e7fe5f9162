use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::ok;
use crate::services::with_connection;
use crate::storage::{fields, projects};
use actix_web::{web, HttpResponse};
use common::model::project::ProjectForm;

/// Handler for `GET /api/projects/code/{project_code}`: the student entry point.
pub async fn process(
    project_code: web::Path<String>,
    db: web::Data<Database>,
) -> Result<HttpResponse, ApiError> {
    let code = project_code.into_inner();
    let form = with_connection(db, move |conn| {
        let project = projects::get_by_code(conn, &code)?;
        let fields = fields::list(conn, project.project_id)?;
        Ok(ProjectForm { project, fields })
    })
    .await?;
    Ok(ok(form))
}
