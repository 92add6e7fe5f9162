use env_logger::Env;
use log::info;
use observatory_backend::config::AppConfig;
use observatory_backend::{build_app, AppState};
use actix_web::HttpServer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env();
    let state = AppState::from_config(&config);
    state
        .db
        .initialize()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let (host, port) = config.bind_addr();
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || build_app(state.clone()))
        .bind((host, port))?
        .run()
        .await
}
