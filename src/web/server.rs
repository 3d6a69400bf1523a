use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::catalog::Catalog;
use crate::config::Config;

use super::api::interference as interference_handlers;
use super::api::orbit as orbit_handlers;
use super::api_doc::ApiDoc;

/// Shared read-only state. The catalog is loaded once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(interference_handlers::health))
        .route("/api/compute_ci", post(interference_handlers::compute_ci))
        .route(
            "/api/check_threshold",
            post(interference_handlers::check_threshold),
        )
        .route("/api/ngso", post(interference_handlers::ngso))
        .route(
            "/api/orbit/{satellite_id}",
            get(orbit_handlers::position),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: Config, catalog: Catalog) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let state = AppState {
        config: Arc::new(config),
        catalog: Arc::new(catalog),
    };
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}
