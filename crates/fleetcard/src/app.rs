//! 起動処理: ストア接続、初期フリートの作成、クライアントとルーターの組み立て

use crate::api;
use anyhow::Context;
use axum::Router;
use fleetcar_config::{AppConfig, StoreConfig};
use fleetcar_core::{BOOTSTRAP_FLEET_ID, FleetError, FleetId, RequestContext};
use fleetcar_ops::FleetOperations;
use fleetcar_store::{ConnectOptions, MembershipStore, SurrealMembershipStore};
use fleetcar_upstream::{DomainCarClient, RentalManagementClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub fn connect_options(store: &StoreConfig) -> ConnectOptions {
    ConnectOptions {
        endpoint: store.endpoint.clone(),
        namespace: store.namespace.clone(),
        database: store.database.clone(),
        username: store.username.clone(),
        password: store.password.clone(),
        collection_prefix: store.collection_prefix.clone(),
    }
}

/// Ensures the bootstrap fleet exists. An existing fleet is not an error.
pub async fn bootstrap_fleet(store: &dyn MembershipStore) -> fleetcar_core::Result<()> {
    let fleet_id = FleetId::from(BOOTSTRAP_FLEET_ID);
    match store.add_fleet(&RequestContext::new(), &fleet_id).await {
        Ok(()) => {
            info!(fleet_id = %fleet_id, "Bootstrap fleet created");
            Ok(())
        }
        Err(FleetError::FleetAlreadyExists(_)) => {
            debug!(fleet_id = %fleet_id, "Bootstrap fleet already exists");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StartupOptions {
    /// 起動時にフリートを全削除する (ローカル開発用)
    pub reset_store: bool,
}

/// Connects the store, bootstraps the fleet and builds the API router.
pub async fn build(config: &AppConfig, options: StartupOptions) -> anyhow::Result<Router> {
    let store = SurrealMembershipStore::connect(&connect_options(&config.store))
        .await
        .context("メンバーシップストアに接続できません")?;

    if options.reset_store {
        warn!(table = store.table(), "Resetting fleet store");
        store
            .drop_fleets()
            .await
            .context("フリートの削除に失敗しました")?;
    }

    bootstrap_fleet(&store)
        .await
        .context("初期フリートを作成できません")?;

    let timeout = config.upstream.request_timeout;
    let cars = DomainCarClient::new(&config.upstream.car_server, timeout)
        .context("FM_CAR_SERVER が不正です")?;
    let rentals = RentalManagementClient::new(&config.upstream.rental_management_server, timeout)
        .context("FM_RENTAL_MANAGEMENT_SERVER が不正です")?;

    if !config.server.allow_origins.is_empty() {
        // CORS は前段のプロキシで処理する
        debug!(origins = ?config.server.allow_origins, "Allowed origins configured");
    }

    let operations = FleetOperations::new(Arc::new(store), Arc::new(cars), Arc::new(rentals));
    Ok(api::router(
        Arc::new(operations),
        config.upstream.request_deadline,
    ))
}
