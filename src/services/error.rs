//! Service catalog error types

use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised by the catalog, request form and order book
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Request form input is missing or out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown offering, plan or order
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
