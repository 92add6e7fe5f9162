//! # Field Service Module
//!
//! Endpoints for editing a project's observation form. Every route is restricted
//! to the teacher who owns the project.
//!
//! ## Registered Routes
//!
//! *   **`POST /api/projects/{project_id}/fields`** (`create::process`): adds a field.
//!     Body `{field_name, field_type, field_label?, field_options?, is_required?}`.
//!     `201` with the stored field, `400` when name or type is missing or invalid.
//! *   **`GET /api/projects/{project_id}/fields`** (`list::process`): the form's
//!     fields ascending by id.
//! *   **`PUT /api/projects/{project_id}/fields/{field_id}`** (`update::process`):
//!     partial update; unknown keys are ignored, an empty update is a `400`.
//! *   **`DELETE /api/projects/{project_id}/fields/{field_id}`** (`delete::process`).
//!
//! A field id that exists under a different project answers `400`.

mod create;
mod delete;
mod list;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/projects/{project_id}/fields";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(list::process))
        .route("/{field_id}", put().to(update::process))
        .route("/{field_id}", delete().to(delete::process))
}
