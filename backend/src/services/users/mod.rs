mod list_projects;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/users";

/// `GET /api/users/{teacher_id}/projects`: a teacher's own projects, newest first.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{teacher_id}/projects", get().to(list_projects::process))
}
