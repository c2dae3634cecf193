//! # Account Service エラー定義
//!
//! Account Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | エラー | ステータス | detail |
//! |--------|-----------|--------|
//! | `BadRequest` / `NotFound` | 400 | エラー内容 |
//! | `Storage` / `TokenIssuance` | 400 | 固定文言 |
//! | `PermissionDenied` | 403 | 固定文言 |
//! | `Conflict` | 409 | 固定文言 |
//! | `Internal` | 500 | 固定文言 |
//!
//! 固定文言のエラーは原因をログにのみ出力する。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portfolio_domain::DomainError;
use portfolio_infra::{InfraError, TokenError};
use portfolio_shared::ErrorResponse;
use thiserror::Error;

/// ストレージ障害・トークン発行失敗時の 400 の固定 detail
const STORAGE_FAILURE_DETAIL: &str = "リクエストを処理できませんでした";

/// Account Service で発生するエラー
#[derive(Debug, Error)]
pub enum AccountError {
    /// 不正なリクエスト（本文のデコード失敗、入力値の検証失敗、不正な ID）
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// アカウントが見つからない（認可の外側でのみ発生）
    #[error("アカウントが見つかりません: {0}")]
    NotFound(String),

    /// 認可の失敗（理由はログ用）
    #[error("権限がありません: {0}")]
    PermissionDenied(String),

    /// 削除・復元時のストレージ障害
    #[error("アカウントの状態を更新できませんでした: {0}")]
    Conflict(#[source] InfraError),

    /// 作成・取得時のストレージ障害
    #[error("ストレージエラー: {0}")]
    Storage(#[source] InfraError),

    /// 作成時のトークン発行の失敗（署名鍵の未設定など）
    #[error("トークンを発行できませんでした: {0}")]
    TokenIssuance(#[source] TokenError),

    /// 内部エラー（パスワードのハッシュ化の失敗）
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<DomainError> for AccountError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::BadRequest(msg),
            err @ DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let body = match &self {
            AccountError::BadRequest(msg) | AccountError::NotFound(msg) => {
                ErrorResponse::bad_request(msg.clone())
            }
            AccountError::PermissionDenied(reason) => {
                tracing::debug!(reason = %reason, "認可に失敗しました");
                ErrorResponse::permission_denied()
            }
            AccountError::Conflict(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "database",
                    "アカウントの状態更新に失敗: {}\n{}",
                    e,
                    e.span_trace()
                );
                ErrorResponse::state_conflict()
            }
            AccountError::Storage(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "database",
                    "ストレージエラー: {}\n{}",
                    e,
                    e.span_trace()
                );
                ErrorResponse::bad_request(STORAGE_FAILURE_DETAIL)
            }
            AccountError::TokenIssuance(e) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "token",
                    "トークン発行エラー: {}",
                    e
                );
                ErrorResponse::bad_request(STORAGE_FAILURE_DETAIL)
            }
            AccountError::Internal(msg) => {
                tracing::error!(
                    error.category = "infrastructure",
                    error.kind = "internal",
                    "内部エラー: {}",
                    msg
                );
                ErrorResponse::internal_error()
            }
        };

        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use portfolio_shared::error_response::{PERMISSION_DENIED_DETAIL, STATE_CONFLICT_DETAIL};
    use rstest::rstest;

    use super::*;

    async fn into_parts(err: AccountError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case::bad_request(AccountError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST)]
    #[case::not_found(AccountError::NotFound("x".to_string()), StatusCode::BAD_REQUEST)]
    #[case::storage(
        AccountError::Storage(InfraError::unexpected("x")),
        StatusCode::BAD_REQUEST
    )]
    #[case::token_issuance(
        AccountError::TokenIssuance(TokenError::Configuration("x".to_string())),
        StatusCode::BAD_REQUEST
    )]
    #[case::permission_denied(
        AccountError::PermissionDenied("x".to_string()),
        StatusCode::FORBIDDEN
    )]
    #[case::conflict(AccountError::Conflict(InfraError::unexpected("x")), StatusCode::CONFLICT)]
    #[case::internal(
        AccountError::Internal("x".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[tokio::test]
    async fn test_エラー種別ごとのステータスコード(
        #[case] err: AccountError,
        #[case] expected: StatusCode,
    ) {
        let (status, body) = into_parts(err).await;

        assert_eq!(status, expected);
        assert_eq!(body.status, expected.as_u16());
    }

    #[tokio::test]
    async fn test_permission_deniedは理由をレスポンスに含めない() {
        let (_, body) =
            into_parts(AccountError::PermissionDenied("トークンがありません".to_string())).await;

        assert_eq!(body.detail, PERMISSION_DENIED_DETAIL);
    }

    #[tokio::test]
    async fn test_conflictはストレージエラーの内容を含めない() {
        let (_, body) =
            into_parts(AccountError::Conflict(InfraError::unexpected("connection reset"))).await;

        assert_eq!(body.detail, STATE_CONFLICT_DETAIL);
        assert!(!body.detail.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_トークン発行の失敗は設定内容を含めない() {
        let (_, body) = into_parts(AccountError::TokenIssuance(TokenError::Configuration(
            "署名鍵が設定されていません".to_string(),
        )))
        .await;

        assert_eq!(body.detail, STORAGE_FAILURE_DETAIL);
        assert!(!body.detail.contains("署名鍵"));
    }

    #[test]
    fn test_ドメインエラーの変換() {
        assert!(matches!(
            AccountError::from(DomainError::Validation("x".to_string())),
            AccountError::BadRequest(_)
        ));
        assert!(matches!(
            AccountError::from(DomainError::NotFound {
                entity_type: "Account",
                id:          "1".to_string(),
            }),
            AccountError::NotFound(_)
        ));
    }
}
