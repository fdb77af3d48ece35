//! Car-data service client

use crate::error::Result;
use crate::http::{build_client, normalize_base_url};
use crate::lookup::{CarLookup, CarResponse};
use async_trait::async_trait;
use fleetcar_core::{Car, RequestContext, Vin};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// 車両データサービス (`FM_CAR_SERVER`) のクライアント
#[derive(Debug, Clone)]
pub struct DomainCarClient {
    client: reqwest::Client,
    base_url: String,
}

impl DomainCarClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn car_url(&self, vin: &Vin) -> String {
        format!("{}/cars/{}", self.base_url, vin)
    }

    async fn fetch_car(&self, vin: &Vin) -> Result<CarResponse> {
        let url = self.car_url(vin);
        debug!(%url, "GET car");

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let car: Car = response.json().await?;
                Ok(CarResponse::Found(car))
            }
            StatusCode::NOT_FOUND => Ok(CarResponse::NotFound),
            status => {
                warn!(%url, status = status.as_u16(), "Unexpected status from car service");
                Ok(CarResponse::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl CarLookup for DomainCarClient {
    async fn get_car(&self, ctx: &RequestContext, vin: &Vin) -> fleetcar_core::Result<CarResponse> {
        ctx.run(self.fetch_car(vin)).await
    }
}
