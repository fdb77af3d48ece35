//! Inbound operations trait

use async_trait::async_trait;
use fleetcar_core::{Car, CarBase, FleetId, RequestContext, Result, Vin};

/// HTTP 層から呼ばれるフリート操作
#[async_trait]
pub trait FleetService: Send + Sync {
    /// Fails fast: any car that cannot be resolved aborts the whole listing.
    async fn list_cars_in_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
    ) -> Result<Vec<CarBase>>;

    /// Only cars assigned to `fleet_id` are returned, with their rental if any.
    async fn get_single_car(&self, ctx: &RequestContext, fleet_id: &FleetId, vin: &Vin)
    -> Result<Car>;

    async fn add_car_to_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<CarBase>;

    async fn remove_car_from_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()>;
}
