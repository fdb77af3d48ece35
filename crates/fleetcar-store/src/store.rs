//! MembershipStore trait
//!
//! `FleetID → VIN 集合` の唯一の所有者。プロセス内ロックではなく
//! バックエンドのアトミック操作で整合性を保証します。

use async_trait::async_trait;
use fleetcar_core::{FleetId, RequestContext, Result, Vin};

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// 空の VIN 集合でフリートを作成。既に存在すれば `FleetAlreadyExists`
    async fn add_fleet(&self, ctx: &RequestContext, fleet_id: &FleetId) -> Result<()>;

    /// `FleetNotFound` / `CarAlreadyInFleet` を返しうる
    async fn add_car_to_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()>;

    /// `FleetNotFound` / `CarNotInFleet` を返しうる
    async fn remove_car_from_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()>;

    /// 登録順の VIN 一覧
    async fn get_cars_for_fleet(&self, ctx: &RequestContext, fleet_id: &FleetId)
    -> Result<Vec<Vin>>;

    async fn is_car_in_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<bool>;
}
