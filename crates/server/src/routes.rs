use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::shop::{image::LocalImageStore, repo::SeaOrmShopRepository, ShopService};

pub mod shops;

/// Uploads above this size are rejected before reaching the handlers.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub type AppShopService = ShopService<SeaOrmShopRepository, LocalImageStore>;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub shops: Arc<AppShopService>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(crate::openapi::ApiDoc::openapi())
}

/// Build the full application router: health, shop admin API, stored images and API docs
pub fn build_router(state: ServerState, image_dir: &str, cors: CorsLayer) -> Router {
    let shop_admin = Router::new()
        .route("/shopadmin/shop-init-info", get(shops::init_info))
        .route("/shopadmin/shops", get(shops::list).post(shops::register))
        .route("/shopadmin/shops/:id", get(shops::get).put(shops::modify))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(shop_admin)
        .nest_service("/images", ServeDir::new(image_dir))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
