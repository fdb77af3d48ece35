//! fleetcar core
//!
//! フリートと車両の割り当てで共有される型を定義します。
//!
//! - [`model`]: 車両・レンタル・識別子のデータモデル
//! - [`error`]: レイヤー横断のエラー分類 [`FleetError`]
//! - [`validation`]: 境界での VIN / フリートID 検証
//! - [`context`]: キャンセルと期限を運ぶ [`RequestContext`]

pub mod context;
pub mod error;
pub mod model;
pub mod validation;

pub use context::RequestContext;
pub use error::{BoxError, ErrorKind, FleetError, Result};
pub use model::*;

/// 起動時に必ず存在するフリート
pub const BOOTSTRAP_FLEET_ID: &str = "xk48jpgz";
