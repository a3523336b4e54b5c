//! Service layer for the shop back office.
//! - `shop`: shop lifecycle (register, modify, lookup, listing) behind repository
//!   and image-store traits.
//! - `catalog_service`: read-only area and category lists for the registration form.

pub mod errors;
pub mod shop;
pub mod catalog_service;
#[cfg(test)]
pub mod test_support;
