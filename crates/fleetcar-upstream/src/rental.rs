//! Rental-status service client

use crate::error::Result;
use crate::http::{build_client, normalize_base_url};
use crate::lookup::{RentalLookup, RentalResponse};
use async_trait::async_trait;
use fleetcar_core::{Rental, RequestContext, Vin};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// レンタル管理サービス (`FM_RENTAL_MANAGEMENT_SERVER`) のクライアント
#[derive(Debug, Clone)]
pub struct RentalManagementClient {
    client: reqwest::Client,
    base_url: String,
}

impl RentalManagementClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rental_status_url(&self, vin: &Vin) -> String {
        format!("{}/cars/{}/rentalStatus", self.base_url, vin)
    }

    async fn fetch_next_rental(&self, vin: &Vin) -> Result<RentalResponse> {
        let url = self.rental_status_url(vin);
        debug!(%url, "GET rental status");

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let rental: Rental = response.json().await?;
                Ok(RentalResponse::Found(rental))
            }
            StatusCode::NO_CONTENT => Ok(RentalResponse::NoContent),
            status => {
                warn!(%url, status = status.as_u16(), "Unexpected status from rental service");
                Ok(RentalResponse::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl RentalLookup for RentalManagementClient {
    async fn get_next_rental(
        &self,
        ctx: &RequestContext,
        vin: &Vin,
    ) -> fleetcar_core::Result<RentalResponse> {
        ctx.run(self.fetch_next_rental(vin)).await
    }
}
