use thiserror::Error;

/// Failures that abort a shop lifecycle operation.
///
/// Soft outcomes (empty input, zero-row modify) are reported through
/// `ShopExecution` instead.
#[derive(Debug, Error)]
pub enum ShopOperationError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("shop creation failed: insert affected no rows")]
    InsertFailed,
    #[error("shop creation failed: image address update affected no rows")]
    ImageAddressUpdateFailed,
    #[error("shop {0} not found")]
    NotFound(i64),
    #[error("image store error: {0}")]
    Image(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl ShopOperationError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ShopOperationError::Validation(_) => 2001,
            ShopOperationError::InsertFailed => 2101,
            ShopOperationError::ImageAddressUpdateFailed => 2102,
            ShopOperationError::NotFound(_) => 2103,
            ShopOperationError::Image(_) => 2201,
            ShopOperationError::Repository(_) => 2300,
        }
    }
}

impl From<models::errors::ModelError> for ShopOperationError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => ShopOperationError::Validation(msg),
            models::errors::ModelError::Db(msg) => ShopOperationError::Repository(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ShopOperationError {
    fn from(e: sea_orm::DbErr) -> Self { ShopOperationError::Repository(e.to_string()) }
}
