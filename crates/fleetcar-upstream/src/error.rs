//! Upstream client error types

use fleetcar_core::FleetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl From<UpstreamError> for FleetError {
    fn from(err: UpstreamError) -> Self {
        FleetError::upstream(err)
    }
}

pub type Result<T> = std::result::Result<T, UpstreamError>;
