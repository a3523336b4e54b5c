//! Shop lifecycle state.
//!
//! The numeric codes are persisted in `shop.enable_status` and returned to
//! callers in every operation envelope, so they must never be renumbered.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopState {
    Check = 0,
    Offline = -1,
    Success = 1,
    Pass = 2,
    Delete = -2,
    InnerError = -1001,
    NullShop = -1003,
}

impl ShopState {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn description(self) -> &'static str {
        match self {
            ShopState::Check => "under review",
            ShopState::Offline => "illegal shop, taken offline",
            ShopState::Success => "operation succeeded",
            ShopState::Pass => "review passed",
            ShopState::Delete => "shop removed by an administrator",
            ShopState::InnerError => "internal system error",
            ShopState::NullShop => "shop information is empty",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ShopState::Check),
            -1 => Some(ShopState::Offline),
            1 => Some(ShopState::Success),
            2 => Some(ShopState::Pass),
            -2 => Some(ShopState::Delete),
            -1001 => Some(ShopState::InnerError),
            -1003 => Some(ShopState::NullShop),
            _ => None,
        }
    }
}

impl fmt::Display for ShopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}
