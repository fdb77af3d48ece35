//! Error taxonomy shared by the store, the upstream clients and the orchestrator.

use crate::model::{FleetId, Vin};
use thiserror::Error;

/// Opaque backend / transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("no such fleet: {0}")]
    FleetNotFound(FleetId),

    #[error("no such car: {0}")]
    CarNotFound(Vin),

    #[error("car {vin} not in fleet {fleet_id}")]
    CarNotInFleet { fleet_id: FleetId, vin: Vin },

    #[error("car {vin} already in fleet {fleet_id}")]
    CarAlreadyInFleet { fleet_id: FleetId, vin: Vin },

    #[error("fleet already exists: {0}")]
    FleetAlreadyExists(FleetId),

    #[error("unexpected response from domain service: {0}")]
    DomainAssertion(String),

    #[error("unexpected response from rental management service: {0}")]
    RentalManagementAssertion(String),

    #[error("invalid vin: {0}")]
    InvalidVin(String),

    #[error("invalid fleet id: {0}")]
    InvalidFleetId(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,

    #[error("membership store error: {0}")]
    Store(#[source] BoxError),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] BoxError),
}

/// [`FleetError`] の分類。境界でのステータス決定に使う
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FleetNotFound,
    CarNotFound,
    CarNotInFleet,
    CarAlreadyInFleet,
    FleetAlreadyExists,
    DomainAssertion,
    RentalManagementAssertion,
    InvalidInput,
    Cancelled,
    DeadlineExceeded,
    Backend,
}

impl FleetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FleetError::FleetNotFound(_) => ErrorKind::FleetNotFound,
            FleetError::CarNotFound(_) => ErrorKind::CarNotFound,
            FleetError::CarNotInFleet { .. } => ErrorKind::CarNotInFleet,
            FleetError::CarAlreadyInFleet { .. } => ErrorKind::CarAlreadyInFleet,
            FleetError::FleetAlreadyExists(_) => ErrorKind::FleetAlreadyExists,
            FleetError::DomainAssertion(_) => ErrorKind::DomainAssertion,
            FleetError::RentalManagementAssertion(_) => ErrorKind::RentalManagementAssertion,
            FleetError::InvalidVin(_) | FleetError::InvalidFleetId(_) => ErrorKind::InvalidInput,
            FleetError::Cancelled => ErrorKind::Cancelled,
            FleetError::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            FleetError::Store(_) | FleetError::Upstream(_) => ErrorKind::Backend,
        }
    }

    /// Wraps a backend failure of the membership store.
    pub fn store(err: impl Into<BoxError>) -> Self {
        FleetError::Store(err.into())
    }

    /// Wraps a transport failure of an upstream service.
    pub fn upstream(err: impl Into<BoxError>) -> Self {
        FleetError::Upstream(err.into())
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_messages_carry_identifiers() {
        let err = FleetError::CarNotInFleet {
            fleet_id: FleetId::from("xk48jpgz"),
            vin: Vin::from("WVWAA71K08W201030"),
        };
        assert_eq!(
            err.to_string(),
            "car WVWAA71K08W201030 not in fleet xk48jpgz"
        );
        assert_eq!(
            FleetError::FleetNotFound(FleetId::from("jJd9jb8I")).to_string(),
            "no such fleet: jJd9jb8I"
        );
    }

    #[test]
    fn test_backend_errors_keep_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = FleetError::store(io);

        assert_eq!(err.kind(), ErrorKind::Backend);
        let source = err.source().expect("source is kept");
        assert_eq!(source.to_string(), "reset by peer");
    }

    #[test]
    fn test_kind_groups_validation_errors() {
        assert_eq!(
            FleetError::InvalidVin("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            FleetError::InvalidFleetId("x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            FleetError::upstream("connection refused").kind(),
            ErrorKind::Backend
        );
    }
}
