//! Scripted lookups for tests.
//!
//! 未登録の VIN は車両なら `NotFound`、レンタルなら `NoContent` を返します。

use crate::lookup::{CarLookup, CarResponse, RentalLookup, RentalResponse};
use async_trait::async_trait;
use fleetcar_core::{Car, FleetError, Rental, RequestContext, Result, Vin};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ScriptedCarLookup {
    responses: Mutex<HashMap<Vin, CarResponse>>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<Vin>>,
}

impl ScriptedCarLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_car(self, car: Car) -> Self {
        self.respond(car.vin.clone(), CarResponse::Found(car));
        self
    }

    pub fn with_status(self, vin: &str, status: u16) -> Self {
        self.respond(Vin::from(vin), CarResponse::UnexpectedStatus(status));
        self
    }

    pub fn respond(&self, vin: Vin, response: CarResponse) {
        self.responses.lock().unwrap().insert(vin, response);
    }

    /// 以降の呼び出しを転送エラーにする
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Vin> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CarLookup for ScriptedCarLookup {
    async fn get_car(&self, ctx: &RequestContext, vin: &Vin) -> Result<CarResponse> {
        self.calls.lock().unwrap().push(vin.clone());
        ctx.ensure_active()?;
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(FleetError::upstream(message.clone()));
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(vin)
            .cloned()
            .unwrap_or(CarResponse::NotFound))
    }
}

#[derive(Debug, Default)]
pub struct ScriptedRentalLookup {
    responses: Mutex<HashMap<Vin, RentalResponse>>,
    failure: Mutex<Option<String>>,
    calls: Mutex<Vec<Vin>>,
}

impl ScriptedRentalLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rental(self, vin: &str, rental: Rental) -> Self {
        self.respond(Vin::from(vin), RentalResponse::Found(rental));
        self
    }

    pub fn with_status(self, vin: &str, status: u16) -> Self {
        self.respond(Vin::from(vin), RentalResponse::UnexpectedStatus(status));
        self
    }

    pub fn respond(&self, vin: Vin, response: RentalResponse) {
        self.responses.lock().unwrap().insert(vin, response);
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Vin> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RentalLookup for ScriptedRentalLookup {
    async fn get_next_rental(&self, ctx: &RequestContext, vin: &Vin) -> Result<RentalResponse> {
        self.calls.lock().unwrap().push(vin.clone());
        ctx.ensure_active()?;
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(FleetError::upstream(message.clone()));
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(vin)
            .cloned()
            .unwrap_or(RentalResponse::NoContent))
    }
}
