use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use common::pagination::{PageCalculator, Pager};
use models::shop_state::ShopState;

use super::domain::{ImageUpload, Shop, ShopFilter};
use super::errors::ShopOperationError;
use super::execution::ShopExecution;
use super::image::{ImageStore, PathResolver, ShopImagePaths};
use super::repository::{ShopRepository, ShopTransaction};

/// Shop lifecycle business service independent of web framework.
///
/// Create and modify run in one explicit transaction: the body's writes are
/// committed when it returns `Ok` and rolled back otherwise.
pub struct ShopService<R: ShopRepository, I: ImageStore> {
    repo: Arc<R>,
    images: Arc<I>,
    paths: Arc<dyn PathResolver>,
    pager: Arc<dyn Pager>,
}

impl<R: ShopRepository, I: ImageStore> ShopService<R, I> {
    pub fn new(repo: Arc<R>, images: Arc<I>) -> Self {
        Self { repo, images, paths: Arc::new(ShopImagePaths::default()), pager: Arc::new(PageCalculator) }
    }

    pub fn with_paths(mut self, paths: Arc<dyn PathResolver>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_pager(mut self, pager: Arc<dyn Pager>) -> Self {
        self.pager = pager;
        self
    }

    /// Register a new shop, pending review.
    ///
    /// Every anomaly after the draft is accepted is an error and leaves no row
    /// behind.
    ///
    /// # Examples
    /// ```
    /// use service::shop::{ShopService, domain::Shop, image::mock::MockImageStore, repository::mock::MockShopRepository};
    /// use models::shop_state::ShopState;
    /// use std::sync::Arc;
    /// let svc = ShopService::new(Arc::new(MockShopRepository::default()), Arc::new(MockImageStore::default()));
    /// let draft = Shop { owner_id: Some(1), area_id: Some(2), shop_category_id: Some(3), shop_name: Some("Tea House".into()), ..Default::default() };
    /// let out = tokio_test::block_on(svc.add_shop(Some(draft), None)).unwrap();
    /// assert_eq!(out.state(), ShopState::Check);
    /// assert!(out.shop().unwrap().shop_id.is_some());
    /// ```
    #[instrument(skip(self, shop, image), fields(has_image = image.is_some()))]
    pub async fn add_shop(&self, shop: Option<Shop>, image: Option<ImageUpload>) -> Result<ShopExecution, ShopOperationError> {
        let Some(mut shop) = shop else {
            return Ok(ShopExecution::failure(ShopState::NullShop));
        };
        validate_draft(&shop)?;

        let now = Utc::now();
        shop.shop_id = None;
        shop.shop_img = None;
        shop.enable_status = Some(ShopState::Check);
        shop.create_time = Some(now);
        shop.last_edit_time = Some(now);

        let txn = self.repo.begin().await?;
        let written = self.insert_with_image(txn.as_ref(), &mut shop, image.as_ref()).await;
        match written {
            Ok(()) => txn.commit().await?,
            Err(e) => {
                error!(code = e.code(), error = %e, "shop_create_failed");
                rollback_quietly(txn).await;
                return Err(e);
            }
        }

        info!(shop_id = ?shop.shop_id, img = ?shop.shop_img, "shop_created");
        Ok(ShopExecution::with_shop(ShopState::Check, shop))
    }

    async fn insert_with_image(&self, txn: &dyn ShopTransaction, shop: &mut Shop, image: Option<&ImageUpload>) -> Result<(), ShopOperationError> {
        let rows = txn.insert_shop(shop).await?;
        if rows == 0 {
            return Err(ShopOperationError::InsertFailed);
        }
        let Some(image) = image else { return Ok(()) };

        let shop_id = shop.shop_id.ok_or(ShopOperationError::InsertFailed)?;
        let dest = self.paths.shop_image_dir(shop_id);
        let address = self.images.store_thumbnail(image, &dest).await?;
        shop.shop_img = Some(address.clone());

        let patch = Shop { shop_id: Some(shop_id), shop_img: Some(address), ..Default::default() };
        if txn.update_shop(&patch).await? == 0 {
            return Err(ShopOperationError::ImageAddressUpdateFailed);
        }
        Ok(())
    }

    /// Apply the fields present on `shop` to the stored record, replacing its
    /// image when a new one is supplied.
    ///
    /// A write that touches no row is reported as `INNER_ERROR`; any other
    /// failure is returned as an error.
    #[instrument(skip(self, shop, image), fields(shop_id = ?shop.as_ref().and_then(|s| s.shop_id), has_image = image.is_some()))]
    pub async fn modify_shop(&self, shop: Option<Shop>, image: Option<ImageUpload>) -> Result<ShopExecution, ShopOperationError> {
        let Some(mut shop) = shop else {
            return Ok(ShopExecution::failure(ShopState::NullShop));
        };
        let Some(shop_id) = shop.shop_id else {
            return Ok(ShopExecution::failure(ShopState::NullShop));
        };
        validate_changes(&shop)?;
        // only the image store assigns addresses
        shop.shop_img = None;
        let image = image.filter(|i| !i.file_name.trim().is_empty());

        let txn = self.repo.begin().await?;
        let written = self.update_with_image(txn.as_ref(), shop_id, &mut shop, image.as_ref()).await;
        let rows = match written {
            Ok(rows) => rows,
            Err(e) => {
                error!(code = e.code(), error = %e, "shop_modify_failed");
                rollback_quietly(txn).await;
                return Err(e);
            }
        };
        if rows == 0 {
            warn!(shop_id, "shop_modify_no_rows");
            rollback_quietly(txn).await;
            return Ok(ShopExecution::failure(ShopState::InnerError));
        }

        let current = txn.query_by_shop_id(shop_id).await;
        let refetched = match current {
            Ok(Some(s)) => s,
            Ok(None) => {
                rollback_quietly(txn).await;
                return Err(ShopOperationError::NotFound(shop_id));
            }
            Err(e) => {
                rollback_quietly(txn).await;
                return Err(e);
            }
        };
        txn.commit().await?;

        info!(shop_id, rows, "shop_modified");
        Ok(ShopExecution::with_shop(ShopState::Success, refetched))
    }

    async fn update_with_image(&self, txn: &dyn ShopTransaction, shop_id: i64, shop: &mut Shop, image: Option<&ImageUpload>) -> Result<u64, ShopOperationError> {
        if let Some(image) = image {
            let current = txn
                .query_by_shop_id(shop_id)
                .await?
                .ok_or(ShopOperationError::NotFound(shop_id))?;
            if let Some(old) = current.shop_img.as_deref() {
                if let Err(e) = self.images.delete(old).await {
                    warn!(shop_id, old, error = %e, "shop_old_image_delete_failed");
                }
            }
            let dest = self.paths.shop_image_dir(shop_id);
            shop.shop_img = Some(self.images.store_thumbnail(image, &dest).await?);
        }
        shop.last_edit_time = Some(Utc::now());
        txn.update_shop(shop).await
    }

    /// Point lookup, no translation of the result.
    pub async fn get_shop_by_id(&self, shop_id: i64) -> Result<Option<Shop>, ShopOperationError> {
        self.repo.query_by_shop_id(shop_id).await
    }

    /// One page of shops matching `filter`, plus the total number of matches.
    ///
    /// An empty page is a success; a failing list or count query yields
    /// `INNER_ERROR` without payload.
    #[instrument(skip(self, filter))]
    pub async fn get_shop_list(&self, filter: &ShopFilter, page_index: u32, page_size: u32) -> ShopExecution {
        let row_offset = self.pager.row_offset(page_index, page_size);
        let list = self.repo.query_shop_list(filter, row_offset, page_size as u64).await;
        let count = self.repo.query_shop_count(filter).await;
        match (list, count) {
            (Ok(list), Ok(count)) => ShopExecution::with_list(list, count),
            (Err(e), _) | (_, Err(e)) => {
                error!(code = e.code(), error = %e, "shop_list_failed");
                ShopExecution::failure(ShopState::InnerError)
            }
        }
    }
}

async fn rollback_quietly(txn: Box<dyn ShopTransaction>) {
    if let Err(e) = txn.rollback().await {
        warn!(error = %e, "shop_rollback_failed");
    }
}

fn validate_draft(shop: &Shop) -> Result<(), ShopOperationError> {
    let name = shop.shop_name.as_deref().unwrap_or_default();
    models::shop::validate_shop_name(name)?;
    if shop.area_id.is_none() {
        return Err(ShopOperationError::Validation("area_id required".into()));
    }
    if shop.shop_category_id.is_none() {
        return Err(ShopOperationError::Validation("shop_category_id required".into()));
    }
    if shop.owner_id.is_none() {
        return Err(ShopOperationError::Validation("owner_id required".into()));
    }
    validate_changes(shop)
}

fn validate_changes(shop: &Shop) -> Result<(), ShopOperationError> {
    if let Some(name) = shop.shop_name.as_deref() {
        models::shop::validate_shop_name(name)?;
    }
    if let Some(phone) = shop.phone.as_deref() {
        models::shop::validate_phone(phone)?;
    }
    Ok(())
}
