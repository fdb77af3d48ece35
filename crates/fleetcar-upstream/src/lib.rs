//! fleetcar upstream clients
//!
//! 車両データサービスとレンタル管理サービスへの読み取り専用クライアント。
//! HTTP の結果を `Found` / `NotFound` / `NoContent` / `UnexpectedStatus` に分類し、
//! リトライは行いません。

pub mod car;
pub mod error;
mod http;
pub mod lookup;
pub mod rental;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use car::DomainCarClient;
pub use error::{Result, UpstreamError};
pub use lookup::{CarLookup, CarResponse, RentalLookup, RentalResponse};
pub use rental::RentalManagementClient;
