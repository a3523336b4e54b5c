//! Shared building blocks for the shop platform crates: logging setup,
//! startup environment checks, paging arithmetic and small HTTP payload types.

pub mod types;
pub mod utils;
pub mod pagination;
pub mod env;
