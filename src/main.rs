use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use typedesk::config::Config;
use typedesk::modules::catalog::controllers::catalog_controller;
use typedesk::modules::catalog::repositories::{CatalogRepository, MySqlCatalogRepository};
use typedesk::modules::documents::controllers::document_controller;
use typedesk::modules::documents::repositories::{DocumentRepository, MySqlDocumentRepository};
use typedesk::modules::documents::services::DocumentService;
use typedesk::modules::wallet::controllers::wallet_controller;
use typedesk::modules::wallet::repositories::{MySqlWalletRepository, WalletRepository};
use typedesk::modules::wallet::services::WalletLedger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typedesk=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Typedesk Document Generation Service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Wire repositories and services
    let catalog_repo: Arc<dyn CatalogRepository> =
        Arc::new(MySqlCatalogRepository::new(db_pool.clone()));
    let document_repo: Arc<dyn DocumentRepository> =
        Arc::new(MySqlDocumentRepository::new(db_pool.clone()));
    let wallet_repo: Arc<dyn WalletRepository> =
        Arc::new(MySqlWalletRepository::new(db_pool.clone()));

    let ledger = Arc::new(WalletLedger::new(wallet_repo));
    let document_service = Arc::new(DocumentService::new(
        document_repo,
        catalog_repo.clone(),
        ledger.clone(),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(catalog_repo.clone()))
            .app_data(web::Data::new(ledger.clone()))
            .app_data(web::Data::new(document_service.clone()))
            .service(
                web::scope("/api")
                    .configure(catalog_controller::configure)
                    .configure(wallet_controller::configure)
                    .configure(document_controller::configure),
            )
            .route("/health", web::get().to(health_check))
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "typedesk"
    }))
}
