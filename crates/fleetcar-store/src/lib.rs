//! fleetcar membership store
//!
//! フリートごとの VIN 集合を保持する永続層。
//! 追加・削除はそれぞれ 1 つのアトミックな SurrealQL 文で実行されます。

pub mod error;
pub mod store;
pub mod surreal;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use error::{Result, StoreError};
pub use store::MembershipStore;
pub use surreal::{ConnectOptions, SurrealMembershipStore};
