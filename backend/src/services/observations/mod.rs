//! # Observation Service Module
//!
//! Endpoints for a project's collected observations.
//!
//! Submitting and reading are anonymous: students only know the project, not an
//! account. Changing or deleting an observation is reserved for the project owner.
//!
//! ## Registered Routes
//!
//! *   **`POST /api/projects/{project_id}/observations`** (`submit::process`):
//!     body `{student_name?, field_data: {"<field_id>": value, ...}}`. Values are
//!     coerced by each field's declared type; unknown field ids are skipped.
//!     `201` with the stored observation.
//! *   **`GET /api/projects/{project_id}/observations`** (`list::process`): newest first.
//! *   **`GET /api/projects/{project_id}/observations/{observation_id}`** (`get::process`).
//! *   **`PUT /api/projects/{project_id}/observations/{observation_id}`**
//!     (`update::process`): name overwrite and per-field upsert.
//! *   **`DELETE /api/projects/{project_id}/observations/{observation_id}`**
//!     (`delete::process`).

mod delete;
mod get;
mod list;
mod submit;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/projects/{project_id}/observations";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(submit::process))
        .route("", get().to(list::process))
        .route("/{observation_id}", get().to(get::process))
        .route("/{observation_id}", put().to(update::process))
        .route("/{observation_id}", delete().to(delete::process))
}
