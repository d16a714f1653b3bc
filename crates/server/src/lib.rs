use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod seed;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Database,
    pub config: config::Config,
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .nest("/projects", routes::projects::router())
        .nest("/explore", routes::explore::router())
        .nest("/users", routes::users::router());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn health_check() -> &'static str {
    "OK"
}
