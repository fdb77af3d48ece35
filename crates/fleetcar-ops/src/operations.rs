//! Orchestrator
//!
//! 1 リクエスト = 1 呼び出しのステートレスな調整役。共有状態は持たず、
//! 複数リクエスト間の整合性はストアのアトミック操作に任せます。
//! 呼び出しはすべて逐次 (一覧はストア → VIN ごとに車両サービス)。

use crate::service::FleetService;
use async_trait::async_trait;
use fleetcar_core::{Car, CarBase, FleetError, FleetId, RequestContext, Result, Vin};
use fleetcar_store::MembershipStore;
use fleetcar_upstream::{CarLookup, CarResponse, RentalLookup, RentalResponse};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct FleetOperations {
    store: Arc<dyn MembershipStore>,
    cars: Arc<dyn CarLookup>,
    rentals: Arc<dyn RentalLookup>,
}

impl FleetOperations {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        cars: Arc<dyn CarLookup>,
        rentals: Arc<dyn RentalLookup>,
    ) -> Self {
        Self {
            store,
            cars,
            rentals,
        }
    }

    /// Resolves a VIN that the store says is a member of `fleet_id`.
    async fn resolve_member(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<Car> {
        ctx.ensure_active()?;
        match self.cars.get_car(ctx, vin).await? {
            CarResponse::Found(car) => Ok(car),
            CarResponse::NotFound => {
                warn!(fleet_id = %fleet_id, vin = %vin, "Fleet member unknown to car service");
                Err(FleetError::DomainAssertion(format!(
                    "car {vin} from fleet {fleet_id} not in domain"
                )))
            }
            CarResponse::UnexpectedStatus(code) => {
                warn!(vin = %vin, code, "Car service returned unexpected status");
                Err(FleetError::DomainAssertion(format!(
                    "unknown error (domain code {code})"
                )))
            }
        }
    }
}

#[async_trait]
impl FleetService for FleetOperations {
    async fn list_cars_in_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
    ) -> Result<Vec<CarBase>> {
        ctx.ensure_active()?;
        let vins = self.store.get_cars_for_fleet(ctx, fleet_id).await?;
        debug!(fleet_id = %fleet_id, count = vins.len(), "Resolving fleet members");

        let mut cars = Vec::with_capacity(vins.len());
        for vin in &vins {
            let car = self.resolve_member(ctx, fleet_id, vin).await?;
            cars.push(car.into_base());
        }
        Ok(cars)
    }

    async fn get_single_car(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<Car> {
        ctx.ensure_active()?;
        // 他フリートの車両情報を漏らさないため、先にメンバーシップを確認する
        if !self.store.is_car_in_fleet(ctx, fleet_id, vin).await? {
            return Err(FleetError::CarNotInFleet {
                fleet_id: fleet_id.clone(),
                vin: vin.clone(),
            });
        }

        let car = self.resolve_member(ctx, fleet_id, vin).await?;

        ctx.ensure_active()?;
        let rental = match self.rentals.get_next_rental(ctx, vin).await? {
            RentalResponse::Found(rental) => Some(rental),
            RentalResponse::NoContent => None,
            RentalResponse::UnexpectedStatus(code) => {
                warn!(vin = %vin, code, "Rental service returned unexpected status");
                return Err(FleetError::RentalManagementAssertion(format!(
                    "unknown error (rental management code {code})"
                )));
            }
        };

        Ok(car.with_rental(rental))
    }

    async fn add_car_to_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<CarBase> {
        ctx.ensure_active()?;
        // 車両サービスで存在を確認してからストアに書き込む
        let car = match self.cars.get_car(ctx, vin).await? {
            CarResponse::Found(car) => car,
            CarResponse::NotFound => return Err(FleetError::CarNotFound(vin.clone())),
            CarResponse::UnexpectedStatus(code) => {
                warn!(vin = %vin, code, "Car service returned unexpected status");
                return Err(FleetError::DomainAssertion(format!(
                    "unknown error (domain code {code})"
                )));
            }
        };

        ctx.ensure_active()?;
        self.store.add_car_to_fleet(ctx, fleet_id, vin).await?;
        info!(fleet_id = %fleet_id, vin = %vin, "Car assigned to fleet");

        Ok(car.into_base())
    }

    async fn remove_car_from_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()> {
        ctx.ensure_active()?;
        self.store.remove_car_from_fleet(ctx, fleet_id, vin).await?;
        info!(fleet_id = %fleet_id, vin = %vin, "Car unassigned from fleet");
        Ok(())
    }
}
