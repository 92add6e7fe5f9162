//! # Project Service Module
//!
//! Plain project management plus the anonymous code lookup students use to open
//! a project's form.
//!
//! ## Registered Routes
//!
//! *   **`POST /api/projects`** (`create::process`): creates a project owned by the
//!     calling teacher and assigns its access code.
//! *   **`GET /api/projects/code/{project_code}`** (`by_code::process`): the project
//!     and its fields, no identity required.
//! *   **`GET /api/projects/{project_id}`** (`get::process`).
//! *   **`PUT /api/projects/{project_id}`** (`update::process`): owner only.
//! *   **`DELETE /api/projects/{project_id}`** (`delete::process`): owner only;
//!     removes the project's fields, observations and stored values with it.

mod by_code;
mod create;
mod delete;
mod get;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/projects";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("/code/{project_code}", get().to(by_code::process))
        .route("/{project_id}", get().to(get::process))
        .route("/{project_id}", put().to(update::process))
        .route("/{project_id}", delete().to(delete::process))
}
