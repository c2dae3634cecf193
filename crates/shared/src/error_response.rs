//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービス側の責務
//! - 認可・永続化の失敗は detail を固定文言にし、失敗箇所を漏らさない

use serde::{Deserialize, Serialize};

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://portfolio.example.com/errors";

/// 403 の固定 detail
///
/// トークン不正・ID 不正・アカウント不在・ID 不一致のいずれでも同じ文言を返す。
pub const PERMISSION_DENIED_DETAIL: &str = "権限がありません";

/// 409 の固定 detail
pub const STATE_CONFLICT_DETAIL: &str = "アカウントの状態を更新できませんでした";

/// エラーレスポンス（RFC 9457 Problem Details）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

impl ErrorResponse {
    /// 汎用コンストラクタ
    ///
    /// `error_type_suffix` はベース URI に付加される（例: `"bad-request"`）。
    pub fn new(
        error_type_suffix: &str,
        title: impl Into<String>,
        status: u16,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
            title: title.into(),
            status,
            detail: detail.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new("bad-request", "Bad Request", 400, detail)
    }

    /// 403 Forbidden（detail 固定）
    pub fn permission_denied() -> Self {
        Self::new("forbidden", "Forbidden", 403, PERMISSION_DENIED_DETAIL)
    }

    /// 409 Conflict（detail 固定）
    pub fn state_conflict() -> Self {
        Self::new("conflict", "Conflict", 409, STATE_CONFLICT_DETAIL)
    }

    /// 500 Internal Server Error（detail 固定）
    pub fn internal_error() -> Self {
        Self::new(
            "internal-error",
            "Internal Server Error",
            500,
            "内部エラーが発生しました",
        )
    }
}
