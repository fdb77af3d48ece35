//! Per-request cancellation and deadline.
//!
//! Every store and upstream call runs through [`RequestContext::run`], which
//! races the call against the token and the optional deadline. When either
//! fires the in-flight future is dropped.

use crate::error::{FleetError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 期限付きのコンテキストを作成
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Derives a context that is cancelled together with `self` but can also
    /// be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// ドロップ時にキャンセルするガード。ハンドラの future と寿命を揃える
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails fast when the caller is gone or the deadline has passed.
    pub fn ensure_active(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(FleetError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(FleetError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Runs `operation` unless the context fires first.
    pub async fn run<F, T, E>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        FleetError: From<E>,
    {
        self.ensure_active()?;

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(FleetError::Cancelled),
            () = sleep_until(self.deadline) => Err(FleetError::DeadlineExceeded),
            result = operation => result.map_err(FleetError::from),
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
