//! Shop module: three-layer architecture (domain, repository, service).
//!
//! Registration, modification and listing of shops live here; the sea-orm
//! repository and the local image store are the production collaborators.

pub mod domain;
pub mod errors;
pub mod execution;
pub mod repository;
pub mod repo;
pub mod image;
pub mod service;

pub use service::ShopService;
