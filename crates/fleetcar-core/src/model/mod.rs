//! モデル定義
//!
//! 識別子 (VIN / フリートID)、車両、レンタルのデータモデル。
//! JSON は camelCase で入出力します。

mod car;
mod ids;
mod rental;

pub use car::*;
pub use ids::*;
pub use rental::*;
