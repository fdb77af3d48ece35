//! Membership store error types

use fleetcar_core::FleetError;
use thiserror::Error;

/// Backend-level failures. Domain outcomes (not found, duplicate, ...) are
/// reported as [`FleetError`] directly.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),
}

impl From<StoreError> for FleetError {
    fn from(err: StoreError) -> Self {
        FleetError::store(err)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
