//! # ヘルスチェック共通型

use serde::{Deserialize, Serialize};

/// Liveness レスポンス
///
/// `status` は稼働状態、`version` は Cargo.toml のバージョン。
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status:  String,
    pub version: String,
}

impl HealthResponse {
    /// 稼働中を表すレスポンスを作成する
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status:  "healthy".to_string(),
            version: version.into(),
        }
    }
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// Readiness レスポンス
///
/// 依存先はデータベースのみのため、個別チェック結果はフラットに持つ。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status:   ReadinessStatus,
    pub database: ReadinessStatus,
}

impl ReadinessResponse {
    /// データベースの疎通結果からレスポンスを組み立てる
    pub fn from_database(reachable: bool) -> Self {
        let status = if reachable {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        };
        Self {
            status,
            database: status,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}
