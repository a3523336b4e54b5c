//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the image root exists and is a directory; create it when missing.
pub async fn ensure_image_root(image_base_dir: &str) -> anyhow::Result<()> {
    match tokio::fs::metadata(image_base_dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("{image_base_dir} exists but is not a directory")),
        Err(_) => {
            warn!(%image_base_dir, "image directory not found; creating it");
            tokio::fs::create_dir_all(image_base_dir)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {image_base_dir}: {e}"))?;
            info!(%image_base_dir, "image directory created");
            Ok(())
        }
    }
}

/// True when a relative address cannot escape the directory it gets joined onto.
pub fn is_contained(candidate: &str) -> bool {
    let p = Path::new(candidate);
    !p.is_absolute() && p.components().all(|c| matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir))
}
