use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use models::shop_state::ShopState;

/// Business view of a shop listing.
///
/// Every field is optional: a draft has no id or status yet, and a modify
/// request only carries the fields it wants to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub shop_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub area_id: Option<i32>,
    pub shop_category_id: Option<i64>,
    pub shop_name: Option<String>,
    pub shop_desc: Option<String>,
    pub shop_addr: Option<String>,
    pub phone: Option<String>,
    pub shop_img: Option<String>,
    pub enable_status: Option<ShopState>,
    pub advice: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub last_edit_time: Option<DateTime<Utc>>,
}

impl From<models::shop::Model> for Shop {
    fn from(m: models::shop::Model) -> Self {
        Shop {
            shop_id: Some(m.shop_id),
            owner_id: Some(m.owner_id),
            area_id: Some(m.area_id),
            shop_category_id: Some(m.shop_category_id),
            shop_name: Some(m.shop_name),
            shop_desc: m.shop_desc,
            shop_addr: m.shop_addr,
            phone: m.phone,
            shop_img: m.shop_img,
            enable_status: Some(m.enable_status),
            advice: m.advice,
            create_time: Some(m.create_time.with_timezone(&Utc)),
            last_edit_time: Some(m.last_edit_time.with_timezone(&Utc)),
        }
    }
}

/// Listing conditions; unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopFilter {
    pub owner_id: Option<i64>,
    pub area_id: Option<i32>,
    pub shop_category_id: Option<i64>,
    /// Match shops whose category is a child of this category.
    pub parent_category_id: Option<i64>,
    pub enable_status: Option<ShopState>,
    /// Partial, case-sensitive match on the shop name.
    pub shop_name: Option<String>,
}

/// Raw image bytes plus the client-side file name (used for the extension).
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self { file_name: file_name.into(), bytes: bytes.into() }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
