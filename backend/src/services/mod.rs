//! # HTTP Services
//!
//! One sub-module per resource. Each exposes `configure_routes()` returning the
//! Actix `Scope` for its path, and keeps one handler per file with a `process`
//! function.
//!
//! - `fields`: `/api/projects/{project_id}/fields` (owner only).
//! - `observations`: `/api/projects/{project_id}/observations` (anonymous submit
//!   and read, owner-only update and delete).
//! - `projects`: `/api/projects` (project CRUD and the code lookup).
//! - `users`: `/api/users/{teacher_id}/projects`.
//! - `status`: `/api/status`.
//!
//! Scopes nested under a project id are registered before `/api/projects` so the
//! broader scope does not shadow them.

pub mod fields;
pub mod observations;
pub mod projects;
pub mod response;
pub mod status;
pub mod users;

use crate::auth::{CurrentTeacher, OwnershipGuard};
use crate::db::Database;
use crate::error::ApiError;
use crate::storage::projects as project_store;
use actix_web::web;
use common::model::project::Project;
use rusqlite::Connection;

/// Registers every service scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(fields::configure_routes())
        .service(observations::configure_routes())
        .service(users::configure_routes())
        .service(status::configure_routes())
        .service(projects::configure_routes());
}

/// Opens a connection and runs `f` on the blocking thread pool.
pub(crate) async fn with_connection<F, T>(db: web::Data<Database>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Connection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || {
        let mut conn = db.connect()?;
        f(&mut conn)
    })
    .await?
}

/// Loads the project (404 if absent) and checks the caller owns it (401/403).
pub(crate) fn require_owner(
    conn: &Connection,
    teacher: CurrentTeacher,
    project_id: i64,
) -> Result<Project, ApiError> {
    let project = project_store::get(conn, project_id)?;
    OwnershipGuard::require(teacher.id(), project.teacher_id)?;
    Ok(project)
}
