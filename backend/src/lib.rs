//! Observation form service.
//!
//! Teachers define a per-project form of typed fields; anyone with the project
//! code can submit observations against it. Submitted values are coerced into
//! type-specific columns according to each field's declared type.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod storage;

use crate::auth::{resolve_identity, AuthIdentityProvider, HeaderIdentityProvider};
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::ApiError;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, Error};
use std::sync::Arc;

/// Everything a worker needs to build the application.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub identity: Arc<dyn AuthIdentityProvider>,
    pub json_limit_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            db: Database::new(config.database_path.clone()),
            identity: Arc::new(HeaderIdentityProvider::new(config.identity_header.clone())),
            json_limit_bytes: config.json_limit_bytes,
        }
    }
}

/// Builds the Actix application: access log, identity resolution, shared data
/// and every service scope.
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(state.json_limit_bytes)
        .error_handler(|err, _req| {
            ApiError::validation(format!("Invalid JSON body: {}", err)).into()
        });

    App::new()
        .wrap(from_fn(resolve_identity))
        .wrap(Logger::default())
        .app_data(json_config)
        .app_data(web::Data::new(state.db))
        .app_data(web::Data::from(state.identity))
        .configure(services::configure)
}
