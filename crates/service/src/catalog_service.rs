use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Deserialize;

use models::{area, shop_category};
use crate::errors::ServiceError;

/// Which shop categories to return.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopCategoryFilter {
    /// Children of this category only.
    pub parent_id: Option<i64>,
    /// Only categories that have a parent (shops attach to these).
    #[serde(default)]
    pub sub_categories_only: bool,
}

/// All areas, highest priority first.
pub async fn list_areas(db: &DatabaseConnection) -> Result<Vec<area::Model>, ServiceError> {
    Ok(area::list_all(db).await?)
}

/// Shop categories matching `filter`, highest priority first.
pub async fn list_shop_categories(db: &DatabaseConnection, filter: ShopCategoryFilter) -> Result<Vec<shop_category::Model>, ServiceError> {
    let mut q = shop_category::Entity::find();
    if let Some(parent) = filter.parent_id {
        q = q.filter(shop_category::Column::ParentId.eq(parent));
    } else if filter.sub_categories_only {
        q = q.filter(shop_category::Column::ParentId.is_not_null());
    }
    let rows = q
        .order_by_desc(shop_category::Column::Priority)
        .order_by_asc(shop_category::Column::ShopCategoryId)
        .all(db)
        .await?;
    Ok(rows)
}
