mod config;
mod database;
mod error;
mod handlers;
mod models;
mod services;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use dotenvy::dotenv;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::Config;
use database::{open_database, Database};
use services::{ai::AiClient, schemes::SchemeFeed, seeding};

#[derive(Clone, FromRef)]
struct AppState {
    db: Database,
    ai: AiClient,
    schemes: SchemeFeed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = Config::from_env()?;

    let db = open_database(&config.db_file);

    if config.seed_demo_user {
        seeding::seed_demo_user(&db, Utc::now().date_naive(), &mut rand::thread_rng())?;
    }

    let state = AppState {
        db,
        ai: AiClient::new(&config.ai_service_url, config.ai_timeout)?,
        schemes: SchemeFeed::new(&config.schemes_url, config.schemes_timeout)?,
    };

    let app = create_router(state);

    let addr = config.bind_addr();
    log::info!("udyam server starting on http://{}", addr);
    log::info!("AI service expected at {}", config.ai_service_url);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Auth
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        // Dashboard
        .route("/api/dashboard/summary/:user_id", get(handlers::dashboard::summary))
        .route("/api/dashboard/sales-chart/:user_id", get(handlers::dashboard::sales_chart))
        // Inventory
        .route("/api/inventory/restock", post(handlers::inventory::restock))
        .route("/api/inventory/add", post(handlers::inventory::add_product))
        .route("/api/inventory/market/alerts", get(handlers::inventory::market_alerts))
        .route("/api/inventory/suppliers/list", get(handlers::inventory::suppliers))
        .route("/api/inventory/:user_id", get(handlers::inventory::list_products))
        // Finance
        .route("/api/finance/add", post(handlers::finance::add_transaction))
        .route("/api/finance/:user_id", get(handlers::finance::list_transactions))
        // Marketing
        .route("/api/marketing/community", get(handlers::marketing::community))
        .route("/api/marketing/publish", post(handlers::marketing::publish))
        // Schemes
        .route("/api/schemes", get(handlers::schemes::list_schemes))
        // AI collaborator
        .route("/api/ai/pricing/optimize", post(handlers::ai::optimize_price))
        .route("/api/ai/vision/analyze", post(handlers::ai::analyze_shelf))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)), // 10MB
        )
        .with_state(state)
}
