//! `GET /api/status`: reports whether the database answers.

use crate::db::Database;
use crate::error::ApiError;
use crate::services::response::message;
use crate::services::with_connection;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};

const API_PATH: &str = "/api/status";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(process))
}

async fn process(db: web::Data<Database>) -> Result<HttpResponse, ApiError> {
    with_connection(db, |conn| {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    })
    .await?;
    Ok(message("Connected to database successfully!"))
}
