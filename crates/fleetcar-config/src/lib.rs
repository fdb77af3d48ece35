//! fleetcar の設定
//!
//! 以下の順で値を重ねて [`AppConfig`] を組み立てます (後のものが優先):
//! 1. 組み込みの既定値
//! 2. 設定ファイル (`--config` / `FM_CONFIG_PATH`、なければ `~/.config/fleetcar/fleetcar.toml`)
//! 3. `FM_` で始まる環境変数
//!
//! `FM_LOCAL_SETUP=true` の場合、未設定の必須項目をローカル開発用の値で埋めます。
//! 組み立て後の `AppConfig` は不変で、リクエスト処理中に環境を読むことはありません。

pub mod error;

pub use error::*;

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const ENV_PREFIX: &str = "FM";

const DEFAULT_EXPOSE_PORT: u16 = 80;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_NAMESPACE: &str = "fleetcar";
const DEFAULT_DATABASE: &str = "fleet_management";

// FM_LOCAL_SETUP=true のときだけ使う値
const LOCAL_STORE_ENDPOINT: &str = "mem://";
const LOCAL_CAR_SERVER: &str = "http://localhost:3000";
const LOCAL_RENTAL_SERVER: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub upstream: UpstreamConfig,
    pub local_setup: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub expose_port: u16,
    pub allow_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub collection_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamConfig {
    pub car_server: String,
    pub rental_management_server: String,
    /// 上流呼び出し 1 回あたりのタイムアウト
    pub request_timeout: Duration,
    /// 1 操作全体の期限 (未設定なら無制限)
    pub request_deadline: Option<Duration>,
}

/// ファイル・環境変数から読んだ未解釈の値
#[derive(Debug, Default, Deserialize)]
pub struct RawSettings {
    pub store_endpoint: Option<String>,
    pub store_namespace: Option<String>,
    pub store_database: Option<String>,
    pub store_user: Option<String>,
    pub store_password: Option<String>,
    pub collection_prefix: Option<String>,
    pub expose_port: Option<String>,
    pub car_server: Option<String>,
    pub rental_management_server: Option<String>,
    pub request_timeout: Option<String>,
    pub request_deadline: Option<String>,
    pub allow_origins: Option<String>,
    pub local_setup: Option<String>,
}

/// `~/.config/fleetcar/fleetcar.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fleetcar").join("fleetcar.toml"))
}

impl AppConfig {
    /// Loads defaults, then the config file, then `FM_*` environment variables.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.display().to_string()));
                }
                debug!(path = %path.display(), "Using config file");
                builder = builder.add_source(File::from(path));
            }
            None => {
                if let Some(default_path) = default_config_file() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        let raw: RawSettings = builder.build()?.try_deserialize()?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawSettings) -> Result<Self> {
        let local_setup = parse_bool("local_setup", non_empty(raw.local_setup))?;
        if local_setup {
            info!("Using local setup mode");
        }

        let local = |value: &str| local_setup.then(|| value.to_string());

        let endpoint = non_empty(raw.store_endpoint)
            .or_else(|| local(LOCAL_STORE_ENDPOINT))
            .ok_or(ConfigError::Missing {
                key: "store_endpoint",
                env: "FM_STORE_ENDPOINT",
            })?;
        let car_server = non_empty(raw.car_server)
            .or_else(|| local(LOCAL_CAR_SERVER))
            .ok_or(ConfigError::Missing {
                key: "car_server",
                env: "FM_CAR_SERVER",
            })?;
        let rental_management_server = non_empty(raw.rental_management_server)
            .or_else(|| local(LOCAL_RENTAL_SERVER))
            .ok_or(ConfigError::Missing {
                key: "rental_management_server",
                env: "FM_RENTAL_MANAGEMENT_SERVER",
            })?;

        let expose_port = match non_empty(raw.expose_port) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "expose_port",
                    value: value.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_EXPOSE_PORT,
        };

        let request_timeout = match non_empty(raw.request_timeout) {
            Some(value) => parse_duration_value("request_timeout", value)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        if request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout",
                value: "0".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }
        let request_deadline = non_empty(raw.request_deadline)
            .map(|value| parse_duration_value("request_deadline", value))
            .transpose()?;

        let allow_origins = non_empty(raw.allow_origins)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                expose_port,
                allow_origins,
            },
            store: StoreConfig {
                endpoint,
                namespace: non_empty(raw.store_namespace)
                    .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
                database: non_empty(raw.store_database)
                    .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                username: non_empty(raw.store_user),
                password: non_empty(raw.store_password),
                collection_prefix: raw.collection_prefix.unwrap_or_default(),
            },
            upstream: UpstreamConfig {
                car_server,
                rental_management_server,
                request_timeout,
                request_deadline,
            },
            local_setup,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bool(key: &'static str, value: Option<String>) -> Result<bool> {
    match value.as_deref().map(str::trim) {
        None | Some("false") => Ok(false),
        Some("true") => Ok(true),
        Some(other) => Err(ConfigError::InvalidValue {
            key,
            value: other.to_string(),
            reason: "expected 'true' or 'false'".to_string(),
        }),
    }
}

/// `5s`、`500ms`、`1m 30s` 形式 (humantime)
fn parse_duration_value(key: &'static str, value: String) -> Result<Duration> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidValue {
        key,
        reason: e.to_string(),
        value,
    })
}
