//! Employee Directory Backend
//!
//! A REST backend holding a small employee directory, persisted in SQLite and
//! seeded once from a static JSON resource.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod seed;
mod store;
mod view;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::EmployeeStorage;
use seed::SeedLoader;
use store::EmployeeStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EmployeeStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Employee Directory Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Seed URL: {}", config.seed_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Load the canonical list; corrupt storage aborts startup
    let pool = db::init_database(&config.db_path).await?;
    let storage = EmployeeStorage::new(pool, config.storage_key.clone());
    let seed = SeedLoader::new(config.seed_url.clone())?;
    let store = Arc::new(EmployeeStore::load(storage, seed).await?);

    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Seed once the listener is up, so the default URL can point at this server
    let seed_task = config.fetch_on_start.then(|| spawn_seed(store));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = seed_task {
        task.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Run the one-shot remote seed in the background.
///
/// The returned handle is the only place the fetch can be cancelled.
fn spawn_seed(store: Arc<EmployeeStore>) -> JoinHandle<()> {
    tokio::spawn(async move {
        store.fetch_remote().await;
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Store state
        .route("/state", get(api::get_state))
        // Employees
        .route("/employees", get(api::list_employees))
        .route("/employees", post(api::create_employee))
        .route("/employees/{id}", get(api::get_employee))
        .route("/employees/{id}", put(api::update_employee))
        // View state
        .route("/filters", put(api::set_filters))
        .route("/sort", post(api::sort_employees))
        // Remote seed
        .route("/fetch", post(api::fetch_employees));

    let static_routes = Router::new()
        .route("/assets/employees.json", get(api::seed_resource))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(static_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
