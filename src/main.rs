use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod app;
mod db;
mod decision;
mod model;
mod service;

use app::AppState;
use model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();

    let state = AppState::new(&config).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to initialize application");
        std::process::exit(1);
    });

    let config_data = web::Data::new(config);
    let db_pool_data = web::Data::from(state.db_pool);
    let cache_data = web::Data::new(state.cache);
    let repository_data = web::Data::new(state.repository);
    let screening_data = web::Data::from(state.screening_service);
    let dual_data = web::Data::from(state.dual_service);

    tracing::info!("Starting abstract-triage server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(db_pool_data.clone())
            .app_data(cache_data.clone())
            .app_data(repository_data.clone())
            .app_data(screening_data.clone())
            .app_data(dual_data.clone())
            .configure(api::screening::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
