use crate::docs::ApiDoc;
use crate::state::AppState;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn configure_routes(state: AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Unmatched GETs look in uploads first, then results.
    let static_files = ServeDir::new(&state.storage.uploads_dir)
        .fallback(ServeDir::new(&state.storage.results_dir));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes())
        .merge(crate::modules::transcode::router(state.clone()))
        .merge(crate::modules::metrics::router())
        .fallback_service(static_files)
        .layer(cors)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", axum::routing::get(|| async { "ok" }))
}
