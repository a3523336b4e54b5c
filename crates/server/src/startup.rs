use std::{env, net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::{AppConfig, StorageConfig};
use service::shop::{
    image::{LocalImageStore, ShopImagePaths},
    repo::SeaOrmShopRepository,
    ShopService,
};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `CONFIG_PATH` (default `config.toml`) when present, otherwise defaults plus env overrides
fn load_config() -> Result<AppConfig, StartupError> {
    let path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
    } else {
        info!(%path, "config file not found; using environment");
        Ok(AppConfig::from_env())
    }
}

/// Wire the shop service to the database and the local image store
pub fn build_state(db: DatabaseConnection, storage: &StorageConfig) -> ServerState {
    let repo = Arc::new(SeaOrmShopRepository::new(db.clone()));
    let images = Arc::new(LocalImageStore::from_config(storage));
    let shops = ShopService::new(repo, images)
        .with_paths(Arc::new(ShopImagePaths::new(storage.shop_image_prefix.clone())));
    ServerState { db, shops: Arc::new(shops) }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = load_config()?;

    common::env::ensure_image_root(&cfg.storage.image_base_dir)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");

    let state = build_state(db, &cfg.storage);
    let app: Router = routes::build_router(state, &cfg.storage.image_base_dir, build_cors());

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, image_dir = %cfg.storage.image_base_dir, "starting shop server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shop server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl_c; shutdown only on process exit");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, draining connections");
}
