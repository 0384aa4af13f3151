//! Palco Server - Sound & Lighting Equipment Tracking
//!
//! REST API server for equipment custody and event production.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palco_server::{
    api,
    api::rate_limit::{rate_limit_middleware, RateLimiter},
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("palco_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Palco Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool.clone());
    let services = Services::new(repository, config.auth.clone(), &config.cache);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        pool,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Rate limiting: one window for the API at large, a stricter one for
    // login attempts
    let api_limiter = RateLimiter::new(
        state.config.rate_limit.api_max_requests,
        state.config.rate_limit.api_window_secs,
        "Muitas requisições deste IP, tente novamente mais tarde",
    );
    let login_limiter = RateLimiter::new(
        state.config.rate_limit.login_max_requests,
        state.config.rate_limit.login_window_secs,
        "Muitas tentativas de login, tente novamente mais tarde",
    );

    // Login is nested under the stricter limiter before the general one
    let auth_routes = Router::new()
        .route("/auth/login", post(api::auth::login))
        .layer(middleware::from_fn(move |req, next| {
            rate_limit_middleware(login_limiter.clone(), req, next)
        }));

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .merge(auth_routes)
        .route("/auth/register", post(api::auth::register))
        .route("/auth/me", get(api::auth::me))
        // Equipment registry
        .route("/equipamentos", get(api::equipment::list_equipment))
        .route("/equipamentos", post(api::equipment::create_equipment))
        .route("/equipamentos/categorias", get(api::equipment::list_categories))
        .route(
            "/equipamentos/tombamento/:tombamento",
            get(api::equipment::get_by_tombamento),
        )
        .route("/equipamentos/:id", get(api::equipment::get_equipment))
        .route("/equipamentos/:id", put(api::equipment::update_equipment))
        .route(
            "/equipamentos/:id/problemas",
            post(api::equipment::report_problem),
        )
        .route(
            "/equipamentos/:id/problemas/:problema_id/resolver",
            put(api::equipment::resolve_problem),
        )
        // Events
        .route("/eventos", get(api::events::list_events))
        .route("/eventos", post(api::events::create_event))
        .route("/eventos/templates", get(api::events::list_templates))
        .route("/eventos/:id", get(api::events::get_event))
        .route("/eventos/:id/equipamentos", post(api::events::add_equipments))
        .route(
            "/eventos/:id/validar-checklist",
            get(api::events::validate_checklist),
        )
        .route("/eventos/:id/status", put(api::events::update_status))
        // Transfers
        .route("/transferencias", get(api::transfers::list_transfers))
        .route("/transferencias", post(api::transfers::create_transfer))
        .route("/transferencias/rapida", post(api::transfers::quick_transfer))
        .route(
            "/transferencias/entre-eventos",
            post(api::transfers::cross_event_transfer),
        )
        .route("/transferencias/:id", get(api::transfers::get_transfer))
        .route(
            "/transferencias/:id/aprovar",
            post(api::transfers::approve_transfer),
        )
        .route(
            "/transferencias/:id/cancelar",
            post(api::transfers::cancel_transfer),
        )
        .layer(middleware::from_fn(move |req, next| {
            rate_limit_middleware(api_limiter.clone(), req, next)
        }))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
