//! fleetcar orchestration
//!
//! メンバーシップストアと 2 つの上流サービスを組み合わせて、
//! フリート操作 (一覧・取得・追加・削除) を提供します。

pub mod operations;
pub mod service;

pub use operations::FleetOperations;
pub use service::FleetService;
