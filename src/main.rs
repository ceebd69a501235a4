use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use facturation::config::Config;
use facturation::modules::clients::controllers as client_controllers;
use facturation::modules::clients::repositories::{ClientRepository, SqliteClientRepository};
use facturation::modules::clients::services::ClientService;
use facturation::modules::invoices::controllers as invoice_controllers;
use facturation::modules::invoices::repositories::{InvoiceRepository, SqliteInvoiceRepository};
use facturation::modules::invoices::services::InvoiceService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "facturation=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting facturation service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool and apply migrations
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    sqlx::migrate!()
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready at {}", config.database.url);

    // Wire repositories and services
    let client_repo: Arc<dyn ClientRepository> =
        Arc::new(SqliteClientRepository::new(db_pool.clone()));
    let invoice_repo: Arc<dyn InvoiceRepository> =
        Arc::new(SqliteInvoiceRepository::new(db_pool.clone()));

    let client_service = Arc::new(ClientService::new(client_repo.clone()));
    let invoice_service = Arc::new(InvoiceService::new(invoice_repo, client_repo));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(client_service.clone()))
            .app_data(web::Data::new(invoice_service.clone()))
            .configure(client_controllers::configure)
            .configure(invoice_controllers::configure)
            .route("/health", web::get().to(health_check))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "facturation"
    }))
}
