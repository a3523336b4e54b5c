use serde::Serialize;

use models::shop_state::ShopState;

use super::domain::Shop;

/// Outcome envelope returned by every shop lifecycle operation.
///
/// Constructors keep the payload consistent with the state: single-entity
/// results carry a shop or nothing, listings carry list and count together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopExecution {
    state: ShopState,
    state_code: i32,
    state_info: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    shop: Option<Shop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shop_list: Option<Vec<Shop>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<u64>,
}

impl ShopExecution {
    /// Envelope without payload, used for `NULL_SHOP` and `INNER_ERROR`.
    pub fn failure(state: ShopState) -> Self {
        Self { state, state_code: state.code(), state_info: state.description(), shop: None, shop_list: None, count: None }
    }

    pub fn with_shop(state: ShopState, shop: Shop) -> Self {
        Self { shop: Some(shop), ..Self::failure(state) }
    }

    pub fn with_list(shop_list: Vec<Shop>, count: u64) -> Self {
        Self { shop_list: Some(shop_list), count: Some(count), ..Self::failure(ShopState::Success) }
    }

    pub fn state(&self) -> ShopState { self.state }

    pub fn state_code(&self) -> i32 { self.state_code }

    pub fn state_info(&self) -> &'static str { self.state_info }

    pub fn shop(&self) -> Option<&Shop> { self.shop.as_ref() }

    pub fn into_shop(self) -> Option<Shop> { self.shop }

    pub fn shop_list(&self) -> Option<&[Shop]> { self.shop_list.as_deref() }

    pub fn count(&self) -> Option<u64> { self.count }
}
