//! SurrealDB-backed membership store
//!
//! 1 フリート = 1 レコード (`<prefix>fleet:<fleet_id>`)。`vins` 配列が集合を表します。

use crate::error::StoreError;
use crate::store::MembershipStore;
use async_trait::async_trait;
use fleetcar_core::{FleetError, FleetId, RequestContext, Result, Vin};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::{debug, info, warn};

const FLEET_TABLE: &str = "fleet";

// 同一レコードへの同時書き込みは楽観的トランザクションの競合で失敗するため、
// 同じ 1 文を再実行する。競合のたびに少なくとも 1 つはコミットされる。
const MAX_CONFLICT_ATTEMPTS: u32 = 64;
const INITIAL_CONFLICT_BACKOFF: Duration = Duration::from_millis(1);
const MAX_CONFLICT_BACKOFF: Duration = Duration::from_millis(50);

// UPDATE は存在しないレコードを作らないので、空の結果 = フリートなし。
// RETURN BEFORE で「変更前に含まれていたか」を同じ文で判定する。
const ADD_FLEET: &str =
    "CREATE type::thing($table, $fleet_id) CONTENT { fleet_id: $fleet_id, vins: [] } RETURN NONE;";
const ADD_CAR: &str =
    "UPDATE type::thing($table, $fleet_id) SET vins = array::union(vins, [$vin]) RETURN BEFORE;";
const REMOVE_CAR: &str = "UPDATE type::thing($table, $fleet_id) SET vins -= $vin RETURN BEFORE;";
const GET_CARS: &str = "SELECT vins FROM type::thing($table, $fleet_id);";
const IS_CAR_IN_FLEET: &str = "SELECT VALUE vins CONTAINS $vin FROM type::thing($table, $fleet_id);";
const DROP_FLEETS: &str = "DELETE type::table($table);";

/// Connection settings for [`SurrealMembershipStore::connect`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// `mem://`, `ws://host:8000`, `http://host:8000` など
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// テーブル名の接頭辞 (`FM_COLLECTION_PREFIX`)
    pub collection_prefix: String,
}

impl ConnectOptions {
    pub fn in_memory() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "fleetcar".to_string(),
            database: "fleet_management".to_string(),
            username: None,
            password: None,
            collection_prefix: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FleetRecord {
    #[serde(default)]
    vins: Vec<Vin>,
}

#[derive(Clone)]
pub struct SurrealMembershipStore {
    db: Surreal<Any>,
    table: String,
}

impl SurrealMembershipStore {
    /// Connects, signs in when credentials are given and selects ns/db.
    pub async fn connect(options: &ConnectOptions) -> std::result::Result<Self, StoreError> {
        if options.endpoint.is_empty() {
            return Err(StoreError::InvalidConfig(
                "store endpoint is empty".to_string(),
            ));
        }

        let credentials = match (&options.username, &options.password) {
            (Some(username), Some(password)) => Some((username.as_str(), password.as_str())),
            (None, None) => None,
            _ => {
                return Err(StoreError::InvalidConfig(
                    "store user and password must be set together".to_string(),
                ));
            }
        };

        debug!(endpoint = %options.endpoint, "Connecting to SurrealDB");
        let db = any::connect(options.endpoint.as_str()).await?;

        if let Some((username, password)) = credentials {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns(options.namespace.as_str())
            .use_db(options.database.as_str())
            .await?;

        info!(
            endpoint = %options.endpoint,
            namespace = %options.namespace,
            database = %options.database,
            "Connected to membership store"
        );

        Ok(Self::from_client(db, &options.collection_prefix))
    }

    /// 既存の接続から作成 (ns/db は選択済みであること)
    pub fn from_client(db: Surreal<Any>, collection_prefix: &str) -> Self {
        Self {
            db,
            table: format!("{collection_prefix}{FLEET_TABLE}"),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Deletes every fleet record. Used by tests and local setups.
    pub async fn drop_fleets(&self) -> std::result::Result<(), StoreError> {
        info!(table = %self.table, "Dropping fleet table contents");
        self.db
            .query(DROP_FLEETS)
            .bind(("table", self.table.clone()))
            .await?
            .check()?;
        Ok(())
    }

    /// `RETURN BEFORE` 付きの UPDATE を実行し、変更前のレコードを返す
    async fn update_membership(
        &self,
        statement: &'static str,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<FleetRecord> {
        let before = retry_on_conflict(statement, move || {
            self.execute_update(statement, fleet_id, vin)
        })
        .await
        .map_err(StoreError::from)?;

        before
            .into_iter()
            .next()
            .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))
    }

    async fn execute_update(
        &self,
        statement: &'static str,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> surrealdb::Result<Vec<FleetRecord>> {
        let mut response = self
            .db
            .query(statement)
            .bind(("table", self.table.clone()))
            .bind(("fleet_id", fleet_id.to_string()))
            .bind(("vin", vin.to_string()))
            .await?;
        response.take(0)
    }

    async fn execute_create(&self, fleet_id: &FleetId) -> surrealdb::Result<()> {
        let mut response = self
            .db
            .query(ADD_FLEET)
            .bind(("table", self.table.clone()))
            .bind(("fleet_id", fleet_id.to_string()))
            .await?;
        response.take::<Vec<FleetRecord>>(0)?;
        Ok(())
    }
}

fn is_retryable_conflict(err: &surrealdb::Error) -> bool {
    let message = err.to_string();
    message.contains("read or write conflict") || message.contains("can be retried")
}

/// Re-issues `attempt` while the engine reports a retryable transaction conflict.
async fn retry_on_conflict<T, F, Fut>(statement: &str, mut attempt: F) -> surrealdb::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = surrealdb::Result<T>>,
{
    let mut attempts = 1;
    let mut backoff = INITIAL_CONFLICT_BACKOFF;
    loop {
        match attempt().await {
            Err(e) if is_retryable_conflict(&e) => {
                if attempts >= MAX_CONFLICT_ATTEMPTS {
                    warn!(statement, attempts, error = %e, "Giving up after transaction conflicts");
                    return Err(e);
                }
                debug!(statement, attempts, "Transaction conflict, retrying");
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_CONFLICT_BACKOFF);
                attempts += 1;
            }
            result => return result,
        }
    }
}

fn is_duplicate_record(err: &surrealdb::Error) -> bool {
    err.to_string().contains("already exists")
}

fn create_error(err: surrealdb::Error, fleet_id: &FleetId) -> FleetError {
    if is_duplicate_record(&err) {
        FleetError::FleetAlreadyExists(fleet_id.clone())
    } else {
        StoreError::from(err).into()
    }
}

#[async_trait]
impl MembershipStore for SurrealMembershipStore {
    async fn add_fleet(&self, ctx: &RequestContext, fleet_id: &FleetId) -> Result<()> {
        ctx.run(async {
            retry_on_conflict(ADD_FLEET, move || self.execute_create(fleet_id))
                .await
                .map_err(|e| create_error(e, fleet_id))?;

            info!(fleet_id = %fleet_id, "Fleet created");
            Ok::<_, FleetError>(())
        })
        .await
    }

    async fn add_car_to_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()> {
        ctx.run(async {
            let before = self.update_membership(ADD_CAR, fleet_id, vin).await?;
            if before.vins.contains(vin) {
                debug!(fleet_id = %fleet_id, vin = %vin, "Car already in fleet");
                return Err(FleetError::CarAlreadyInFleet {
                    fleet_id: fleet_id.clone(),
                    vin: vin.clone(),
                });
            }

            info!(fleet_id = %fleet_id, vin = %vin, "Car added to fleet");
            Ok(())
        })
        .await
    }

    async fn remove_car_from_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<()> {
        ctx.run(async {
            let before = self.update_membership(REMOVE_CAR, fleet_id, vin).await?;
            if !before.vins.contains(vin) {
                return Err(FleetError::CarNotInFleet {
                    fleet_id: fleet_id.clone(),
                    vin: vin.clone(),
                });
            }

            info!(fleet_id = %fleet_id, vin = %vin, "Car removed from fleet");
            Ok(())
        })
        .await
    }

    async fn get_cars_for_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
    ) -> Result<Vec<Vin>> {
        ctx.run(async {
            let mut response = self
                .db
                .query(GET_CARS)
                .bind(("table", self.table.clone()))
                .bind(("fleet_id", fleet_id.to_string()))
                .await
                .map_err(StoreError::from)?;

            let records: Vec<FleetRecord> = response.take(0).map_err(StoreError::from)?;
            let record = records
                .into_iter()
                .next()
                .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))?;

            debug!(fleet_id = %fleet_id, count = record.vins.len(), "Loaded fleet members");
            Ok::<_, FleetError>(record.vins)
        })
        .await
    }

    async fn is_car_in_fleet(
        &self,
        ctx: &RequestContext,
        fleet_id: &FleetId,
        vin: &Vin,
    ) -> Result<bool> {
        ctx.run(async {
            let mut response = self
                .db
                .query(IS_CAR_IN_FLEET)
                .bind(("table", self.table.clone()))
                .bind(("fleet_id", fleet_id.to_string()))
                .bind(("vin", vin.to_string()))
                .await
                .map_err(StoreError::from)?;

            let found: Vec<bool> = response.take(0).map_err(StoreError::from)?;
            found
                .into_iter()
                .next()
                .ok_or_else(|| FleetError::FleetNotFound(fleet_id.clone()))
        })
        .await
    }
}
