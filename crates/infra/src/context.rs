//! # ストレージ呼び出しコンテキスト
//!
//! リポジトリの各操作に渡す呼び出し単位の情報。現在は期限（deadline）のみを持つ。
//!
//! 期限なし（[`StoreContext::background`]）が既定で、設定された場合のみ
//! [`StoreContext::run`] が `tokio::time::timeout_at` で操作を打ち切る。

use std::{future::Future, time::Duration};

use tokio::time::Instant;

use crate::error::InfraError;

/// ストレージ呼び出しコンテキスト
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreContext {
    deadline: Option<Instant>,
}

impl StoreContext {
    /// 期限なしのコンテキスト
    pub fn background() -> Self {
        Self::default()
    }

    /// 現在時刻から `timeout` 後を期限とするコンテキスト
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// 設定値から生成する（`None` なら期限なし）
    pub fn from_timeout(timeout: Option<Duration>) -> Self {
        timeout.map_or_else(Self::background, Self::with_timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 期限を適用して操作を実行する
    ///
    /// 期限を超過した場合は [`InfraError::timeout`] を返す。
    /// 打ち切られた操作がストレージ側で完了しているかは保証しない。
    pub async fn run<T, F>(&self, operation: &'static str, future: F) -> Result<T, InfraError>
    where
        F: Future<Output = Result<T, InfraError>>,
    {
        match self.deadline {
            None => future.await,
            Some(deadline) => tokio::time::timeout_at(deadline, future)
                .await
                .map_err(|_| InfraError::timeout(operation))?,
        }
    }
}
