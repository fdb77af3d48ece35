//! In-memory membership store for tests.

use crate::store::MembershipStore;
use async_trait::async_trait;
use fleetcar_core::{FleetError, FleetId, RequestContext, Result, Vin};
use std::collections::HashMap;
use std::sync::Mutex;

/// `MembershipStore` のテスト用実装
///
/// 全操作は 1 つの Mutex で直列化されます。`fail_with` を設定すると
/// 以降の呼び出しはすべてバックエンドエラーになります。
#[derive(Debug, Default)]
pub struct InMemoryMembershipStore {
    fleets: Mutex<HashMap<FleetId, Vec<Vin>>>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fleet(self, fleet_id: &str, vins: &[&str]) -> Self {
        self.fleets.lock().unwrap().insert(
            FleetId::from(fleet_id),
            vins.iter().map(|v| Vin::from(*v)).collect(),
        );
        self
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// 呼び出された操作名の履歴
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn members(&self, fleet_id: &str) -> Option<Vec<Vin>> {
        self.fleets
            .lock()
            .unwrap()
            .get(&FleetId::from(fleet_id))
            .cloned()
    }

    fn enter(&self, ctx: &RequestContext, op: &str) -> Result<()> {
        self.calls.lock().unwrap().push(op.to_string());
        ctx.ensure_active()?;
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(FleetError::store(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn add_fleet(&self, ctx: &RequestContext, fleet_id: &FleetId) -> Result<()> {
        self.enter(ctx, "add_fleet")?;
        let mut fleets = self.fleets.lock().unwrap();
        if fleets.contains_key(fleet_id) {
            return Err(FleetError::FleetAlreadyExists(fleet_id.clone()));
        }
        fleets.insert(fleet_id.clone(), Vec::new());
        Ok(())
    }

    async fn add_car_to_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()> {
        self.enter(ctx, "add_car_to_fleet")?;
        let mut fleets = self.fleets.lock().unwrap();
        let vins = fleets
            .get_mut(fleet_id)
            .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))?;
        if vins.contains(vin) {
            return Err(FleetError::CarAlreadyInFleet {
                fleet_id: fleet_id.clone(),
                vin: vin.clone(),
            });
        }
        vins.push(vin.clone());
        Ok(())
    }

    async fn remove_car_from_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()> {
        self.enter(ctx, "remove_car_from_fleet")?;
        let mut fleets = self.fleets.lock().unwrap();
        let vins = fleets
            .get_mut(fleet_id)
            .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))?;
        let Some(index) = vins.iter().position(|v| v == vin) else {
            return Err(FleetError::CarNotInFleet {
                fleet_id: fleet_id.clone(),
                vin: vin.clone(),
            });
        };
        vins.remove(index);
        Ok(())
    }

    async fn get_cars_for_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
    ) -> Result<Vec<Vin>> {
        self.enter(ctx, "get_cars_for_fleet")?;
        self.fleets
            .lock()
            .unwrap()
            .get(fleet_id)
            .cloned()
            .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))
    }

    async fn is_car_in_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<bool> {
        self.enter(ctx, "is_car_in_fleet")?;
        self.fleets
            .lock()
            .unwrap()
            .get(fleet_id)
            .map(|vins| vins.contains(vin))
            .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))
    }
}
