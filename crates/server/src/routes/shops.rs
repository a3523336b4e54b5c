use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use common::pagination::PageRequest;
use models::shop_state::ShopState;
use service::catalog_service::{self, ShopCategoryFilter};
use service::shop::{
    domain::{ImageUpload, Shop, ShopFilter},
    execution::ShopExecution,
};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub page_index: Option<u32>,
    pub page_size: Option<u32>,
    pub shop_category_id: Option<i64>,
    pub parent_category_id: Option<i64>,
    pub area_id: Option<i32>,
    pub owner_id: Option<i64>,
    /// Numeric state code, e.g. 0 (under review) or 1.
    pub enable_status: Option<i32>,
    pub shop_name: Option<String>,
}

impl ListQuery {
    fn page(&self) -> PageRequest {
        let d = PageRequest::default();
        PageRequest {
            page_index: self.page_index.unwrap_or(d.page_index),
            page_size: self.page_size.unwrap_or(d.page_size),
        }
        .normalize()
    }

    fn filter(&self) -> Result<ShopFilter, JsonApiError> {
        let enable_status = match self.enable_status {
            Some(code) => Some(
                ShopState::from_code(code)
                    .ok_or_else(|| JsonApiError::bad_request(format!("unknown enableStatus {code}")))?,
            ),
            None => None,
        };
        Ok(ShopFilter {
            owner_id: self.owner_id,
            area_id: self.area_id,
            shop_category_id: self.shop_category_id,
            parent_category_id: self.parent_category_id,
            enable_status,
            shop_name: self.shop_name.clone().filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Execution envelope plus `success`, and `errMsg` when the outcome is not `ok`.
fn envelope(exec: &ShopExecution, ok: ShopState) -> Result<Json<Value>, JsonApiError> {
    let mut body = serde_json::to_value(exec)
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Serialization Failed", Some(e.to_string())))?;
    let success = exec.state() == ok;
    body["success"] = Value::Bool(success);
    if !success {
        body["errMsg"] = Value::String(exec.state_info().to_string());
    }
    Ok(Json(body))
}

/// `shopStr` carries the shop as JSON, `shopImg` the optional image file.
async fn read_shop_form(mut multipart: Multipart) -> Result<(Option<Shop>, Option<ImageUpload>), JsonApiError> {
    let mut shop = None;
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "shopStr" => {
                let text = field.text().await.map_err(|e| JsonApiError::bad_request(e.to_string()))?;
                let parsed: Shop = serde_json::from_str(&text)
                    .map_err(|e| JsonApiError::bad_request(format!("invalid shopStr: {e}")))?;
                shop = Some(parsed);
            }
            "shopImg" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.to_string()))?;
                if !bytes.is_empty() {
                    image = Some(ImageUpload::new(file_name, bytes.to_vec()));
                }
            }
            other => warn!(field = other, "ignored multipart field"),
        }
    }
    Ok((shop, image))
}

#[utoipa::path(
    get, path = "/shopadmin/shop-init-info", tag = "shop",
    responses(
        (status = 200, description = "Areas and shop categories for the registration form"),
        (status = 500, description = "Query Failed")
    )
)]
pub async fn init_info(State(state): State<ServerState>) -> Result<Json<Value>, JsonApiError> {
    let areas = catalog_service::list_areas(&state.db).await?;
    let categories = catalog_service::list_shop_categories(
        &state.db,
        ShopCategoryFilter { parent_id: None, sub_categories_only: true },
    )
    .await?;
    Ok(Json(json!({"success": true, "areaList": areas, "shopCategoryList": categories})))
}

#[utoipa::path(
    post, path = "/shopadmin/shops", tag = "shop",
    request_body(content = crate::openapi::ShopFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Registered (state CHECK) or NULL_SHOP envelope"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Registration Failed")
    )
)]
pub async fn register(State(state): State<ServerState>, multipart: Multipart) -> Result<Json<Value>, JsonApiError> {
    let (shop, image) = read_shop_form(multipart).await?;
    let exec = state.shops.add_shop(shop, image).await?;
    info!(state = %exec.state(), shop_id = ?exec.shop().and_then(|s| s.shop_id), "shop_register_request");
    envelope(&exec, ShopState::Check)
}

#[utoipa::path(
    put, path = "/shopadmin/shops/{id}", tag = "shop",
    params(("id" = i64, Path, description = "Shop id")),
    request_body(content = crate::openapi::ShopFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "SUCCESS, NULL_SHOP or INNER_ERROR envelope"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Modify Failed")
    )
)]
pub async fn modify(State(state): State<ServerState>, Path(id): Path<i64>, multipart: Multipart) -> Result<Json<Value>, JsonApiError> {
    let (shop, image) = read_shop_form(multipart).await?;
    let shop = shop.map(|s| Shop { shop_id: Some(id), ..s });
    let exec = state.shops.modify_shop(shop, image).await?;
    info!(shop_id = id, state = %exec.state(), "shop_modify_request");
    envelope(&exec, ShopState::Success)
}

#[utoipa::path(
    get, path = "/shopadmin/shops/{id}", tag = "shop",
    params(("id" = i64, Path, description = "Shop id")),
    responses(
        (status = 200, description = "Found"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<Value>, JsonApiError> {
    match state.shops.get_shop_by_id(id).await? {
        Some(shop) => Ok(Json(json!({"success": true, "shop": shop}))),
        None => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("shop {id} not found")))),
    }
}

#[utoipa::path(
    get, path = "/shopadmin/shops", tag = "shop",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of shops with total count, or INNER_ERROR envelope"),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Value>, JsonApiError> {
    let filter = q.filter()?;
    let page = q.page();
    let exec = state.shops.get_shop_list(&filter, page.page_index, page.page_size).await;
    envelope(&exec, ShopState::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_and_clamps_paging() {
        let q = ListQuery { page_index: Some(0), page_size: Some(1000), ..Default::default() };
        let p = q.page();
        assert_eq!((p.page_index, p.page_size), (1, PageRequest::MAX_PAGE_SIZE));
        let p = ListQuery::default().page();
        assert_eq!((p.page_index, p.page_size), (1, 20));
    }

    #[test]
    fn list_query_maps_status_codes() {
        let q = ListQuery { enable_status: Some(1), shop_name: Some("  ".into()), ..Default::default() };
        let f = q.filter().unwrap();
        assert_eq!(f.enable_status, Some(ShopState::Success));
        assert_eq!(f.shop_name, None);

        let bad = ListQuery { enable_status: Some(7), ..Default::default() };
        assert_eq!(bad.filter().unwrap_err().status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn envelope_flags_soft_failures() {
        let Json(ok) = envelope(&ShopExecution::with_list(vec![], 0), ShopState::Success).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["count"], 0);
        assert!(ok.get("errMsg").is_none());

        let Json(soft) = envelope(&ShopExecution::failure(ShopState::InnerError), ShopState::Success).unwrap();
        assert_eq!(soft["success"], false);
        assert_eq!(soft["state"], "INNER_ERROR");
        assert_eq!(soft["stateCode"], -1001);
        assert_eq!(soft["errMsg"], ShopState::InnerError.description());
    }
}
