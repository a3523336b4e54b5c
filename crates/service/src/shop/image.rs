//! Shop image storage.
//!
//! `PathResolver` decides the folder a shop's images go to; `ImageStore`
//! writes and removes the files. Addresses handed back to callers are always
//! relative to the store's base directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use super::domain::ImageUpload;
use super::errors::ShopOperationError;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `image` under `dest_dir` and return its storage address.
    async fn store_thumbnail(&self, image: &ImageUpload, dest_dir: &str) -> Result<String, ShopOperationError>;
    /// Remove a stored file or folder; a missing address is not an error.
    async fn delete(&self, address: &str) -> Result<(), ShopOperationError>;
}

pub trait PathResolver: Send + Sync {
    /// Destination folder for a shop's images, ending in `/`.
    fn shop_image_dir(&self, shop_id: i64) -> String;
}

/// `<prefix>/<shop_id>/`
#[derive(Clone, Debug)]
pub struct ShopImagePaths {
    prefix: String,
}

impl ShopImagePaths {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into().trim_end_matches('/').to_string() }
    }
}

impl Default for ShopImagePaths {
    fn default() -> Self { Self::new("upload/item/shop") }
}

impl PathResolver for ShopImagePaths {
    fn shop_image_dir(&self, shop_id: i64) -> String {
        format!("{}/{}/", self.prefix, shop_id)
    }
}

/// Filesystem-backed image store rooted at `base_dir`.
#[derive(Clone, Debug)]
pub struct LocalImageStore {
    base_dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl LocalImageStore {
    pub fn new(base_dir: impl Into<PathBuf>, allowed_extensions: &[String]) -> Self {
        Self {
            base_dir: base_dir.into(),
            allowed_extensions: allowed_extensions.iter().map(|e| e.to_ascii_lowercase()).collect(),
        }
    }

    pub fn from_config(cfg: &configs::StorageConfig) -> Self {
        Self::new(&cfg.image_base_dir, &cfg.allowed_extensions)
    }

    fn extension_of(&self, file_name: &str) -> Result<String, ShopOperationError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .ok_or_else(|| ShopOperationError::Image(format!("file name `{file_name}` has no extension")))?;
        if !self.allowed_extensions.contains(&ext) {
            return Err(ShopOperationError::Image(format!("extension `{ext}` is not allowed")));
        }
        Ok(ext)
    }

    fn resolve(&self, address: &str) -> Result<PathBuf, ShopOperationError> {
        if !common::env::is_contained(address) {
            return Err(ShopOperationError::Image(format!("address `{address}` escapes the image root")));
        }
        Ok(self.base_dir.join(address))
    }
}

/// Timestamp plus a random suffix, e.g. `20240601134502a1b2c3d4`.
fn random_file_stem() -> String {
    let rand = Uuid::new_v4().simple().to_string();
    format!("{}{}", Utc::now().format("%Y%m%d%H%M%S"), &rand[..8])
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store_thumbnail(&self, image: &ImageUpload, dest_dir: &str) -> Result<String, ShopOperationError> {
        if image.bytes.is_empty() {
            return Err(ShopOperationError::Image("image is empty".into()));
        }
        let ext = self.extension_of(&image.file_name)?;
        let address = format!("{}{}.{}", dest_dir, random_file_stem(), ext);
        let full = self.resolve(&address)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ShopOperationError::Image(format!("cannot create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&full, &image.bytes)
            .await
            .map_err(|e| ShopOperationError::Image(format!("cannot write {}: {e}", full.display())))?;
        info!(%address, bytes = image.bytes.len(), "shop_image_stored");
        Ok(address)
    }

    async fn delete(&self, address: &str) -> Result<(), ShopOperationError> {
        let full = self.resolve(address)?;
        let meta = match tokio::fs::metadata(&full).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(%address, "shop_image_already_gone");
                return Ok(());
            }
            Err(e) => return Err(ShopOperationError::Image(e.to_string())),
        };
        let res = if meta.is_dir() {
            tokio::fs::remove_dir_all(&full).await
        } else {
            tokio::fs::remove_file(&full).await
        };
        res.map_err(|e| ShopOperationError::Image(format!("cannot delete {}: {e}", full.display())))?;
        info!(%address, "shop_image_deleted");
        Ok(())
    }
}

/// Recording image store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ImageCall {
        Store { dest_dir: String, file_name: String },
        Delete(String),
    }

    #[derive(Default)]
    pub struct MockImageStore {
        calls: Mutex<Vec<ImageCall>>,
        address: Mutex<Option<String>>,
        fail_store: Mutex<bool>,
        fail_delete: Mutex<bool>,
    }

    impl MockImageStore {
        /// Address returned by every store; defaults to `<dest_dir><file_name>`.
        pub fn returning(address: &str) -> Self {
            let s = Self::default();
            *s.address.lock().unwrap() = Some(address.to_string());
            s
        }

        pub fn fail_store(&self) { *self.fail_store.lock().unwrap() = true; }

        pub fn fail_delete(&self) { *self.fail_delete.lock().unwrap() = true; }

        pub fn calls(&self) -> Vec<ImageCall> { self.calls.lock().unwrap().clone() }
    }

    #[async_trait]
    impl ImageStore for MockImageStore {
        async fn store_thumbnail(&self, image: &ImageUpload, dest_dir: &str) -> Result<String, ShopOperationError> {
            self.calls.lock().unwrap().push(ImageCall::Store { dest_dir: dest_dir.to_string(), file_name: image.file_name.clone() });
            if *self.fail_store.lock().unwrap() {
                return Err(ShopOperationError::Image("disk full".into()));
            }
            let fixed = self.address.lock().unwrap().clone();
            Ok(fixed.unwrap_or_else(|| format!("{dest_dir}{}", image.file_name)))
        }

        async fn delete(&self, address: &str) -> Result<(), ShopOperationError> {
            self.calls.lock().unwrap().push(ImageCall::Delete(address.to_string()));
            if *self.fail_delete.lock().unwrap() {
                return Err(ShopOperationError::Image("permission denied".into()));
            }
            Ok(())
        }
    }
}
