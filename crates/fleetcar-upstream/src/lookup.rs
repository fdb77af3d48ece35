//! Lookup traits consumed by the orchestrator.

use async_trait::async_trait;
use fleetcar_core::{Car, Rental, RequestContext, Result, Vin};

/// Car-data service outcome for one VIN.
#[derive(Debug, Clone, PartialEq)]
pub enum CarResponse {
    Found(Car),
    NotFound,
    UnexpectedStatus(u16),
}

/// Rental-status service outcome for one VIN.
#[derive(Debug, Clone, PartialEq)]
pub enum RentalResponse {
    Found(Rental),
    /// 予定されているレンタルなし (エラーではない)
    NoContent,
    UnexpectedStatus(u16),
}

#[async_trait]
pub trait CarLookup: Send + Sync {
    /// `GET {car_server}/cars/{vin}`
    async fn get_car(&self, ctx: &RequestContext, vin: &Vin) -> Result<CarResponse>;
}

#[async_trait]
pub trait RentalLookup: Send + Sync {
    /// `GET {rental_server}/cars/{vin}/rentalStatus`
    async fn get_next_rental(&self, ctx: &RequestContext, vin: &Vin) -> Result<RentalResponse>;
}
