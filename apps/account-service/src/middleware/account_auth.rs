//! # アカウント認可ミドルウェア
//!
//! `x-jwt-token` ヘッダーのトークンが、パスの `{id}` のアカウントに
//! 束縛されていることを検証する。
//!
//! 検証の順序:
//!
//! 1. ヘッダーからトークンを取得し、署名と有効期限を検証
//! 2. パスの ID を整数としてパース
//! 3. ストレージからアカウントを取得（削除済みも対象）
//! 4. クレームの `accountId` とアカウント ID を比較
//!
//! いずれの失敗も同じ 403 を返し、理由はログにのみ出力する。
//! 検証に成功した場合はリクエストをそのまま後続に渡す。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/account/{id}", get(get_account).delete(delete_account))
//!     .route_layer(from_fn_with_state(auth_state, require_account_token))
//! ```

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use portfolio_domain::account::AccountId;
use portfolio_infra::{
    InfraError,
    StoreContext,
    TokenError,
    TokenService,
    repository::AccountRepository,
};
use thiserror::Error;

use crate::error::AccountError;

/// トークンを運ぶヘッダー名
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// 認可ミドルウェアの状態
#[derive(Clone)]
pub struct AccountAuthState {
    pub account_repository: Arc<dyn AccountRepository>,
    pub token_service:      Arc<dyn TokenService>,
    pub store_timeout:      Option<Duration>,
}

/// 認可を拒否した理由（ログ専用）
#[derive(Debug, Error)]
enum Denial {
    #[error("トークンがありません")]
    MissingToken,

    #[error("トークンを検証できません: {0}")]
    Token(#[from] TokenError),

    #[error("パスの ID が整数ではありません: {0:?}")]
    InvalidId(String),

    #[error("アカウントが存在しません: {0}")]
    AccountNotFound(AccountId),

    #[error("アカウントの取得に失敗しました: {0}")]
    Storage(#[from] InfraError),

    #[error("トークンのアカウント ID が一致しません: token={token}, path={path}")]
    Mismatch { token: String, path: AccountId },
}

/// アカウント認可ミドルウェア
///
/// `route_layer` で `/account/{id}` に適用する。
pub async fn require_account_token(
    State(state): State<AccountAuthState>,
    Path(raw_id): Path<String>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match authorize(&state, request.headers(), &raw_id).await {
        Ok(account_id) => {
            tracing::debug!(account_id = %account_id, "認可に成功しました");
            next.run(request).await
        }
        Err(denial) => AccountError::PermissionDenied(denial.to_string()).into_response(),
    }
}

async fn authorize(
    state: &AccountAuthState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<AccountId, Denial> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(Denial::MissingToken)?;
    let claims = state.token_service.validate(token)?;

    let id = raw_id
        .parse::<AccountId>()
        .map_err(|_| Denial::InvalidId(raw_id.to_string()))?;

    let ctx = StoreContext::from_timeout(state.store_timeout);
    let account = state
        .account_repository
        .find_by_id(&ctx, id)
        .await?
        .ok_or(Denial::AccountNotFound(id))?;

    if !claims.is_bound_to(account.id()) {
        return Err(Denial::Mismatch {
            token: claims.account_id,
            path:  account.id(),
        });
    }

    Ok(account.id())
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::{Method, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use portfolio_domain::{
        account::{FirstName, LastName, NewAccount},
        password::PasswordHash,
    };
    use portfolio_infra::{JwtTokenService, TokenConfig, mock::MockAccountRepository};
    use portfolio_shared::error_response::PERMISSION_DENIED_DETAIL;
    use rstest::rstest;
    use tower::ServiceExt as _;

    use super::*;

    const SECRET: &str = "test-secret";

    /// テスト用のダミーハンドラ
    async fn dummy_handler() -> impl IntoResponse {
        StatusCode::OK
    }

    struct Fixture {
        repo:   MockAccountRepository,
        tokens: Arc<JwtTokenService>,
        app:    Router,
    }

    async fn setup() -> Fixture {
        let repo = MockAccountRepository::new();
        let tokens = Arc::new(JwtTokenService::new(TokenConfig::new(
            Some(SECRET.to_string()),
            Duration::from_secs(60),
        )));
        for (first, last) in [("Ada", "Lovelace"), ("Alan", "Turing")] {
            repo.insert(
                &StoreContext::background(),
                &NewAccount {
                    first_name:    FirstName::new(first).unwrap(),
                    last_name:     LastName::new(last).unwrap(),
                    password_hash: PasswordHash::new("$argon2id$dummy"),
                },
            )
            .await
            .unwrap();
        }

        let state = AccountAuthState {
            account_repository: Arc::new(repo.clone()),
            token_service:      tokens.clone(),
            store_timeout:      None,
        };
        let app = Router::new()
            .route("/account/{id}", get(dummy_handler).delete(dummy_handler))
            .route_layer(from_fn_with_state(state, require_account_token));

        Fixture { repo, tokens, app }
    }

    fn token_for(fixture: &Fixture, id: i64) -> String {
        fixture.tokens.issue(AccountId::new(id).unwrap()).unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn assert_denied(response: Response) {
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["detail"], PERMISSION_DENIED_DETAIL);
    }

    #[tokio::test]
    async fn test_自分のトークンなら後続に進む() {
        let fixture = setup().await;
        let token = token_for(&fixture, 1);

        let response = send(fixture.app, Method::GET, "/account/1", Some(&token)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_削除済みアカウントでも自分のトークンなら後続に進む() {
        let fixture = setup().await;
        let id = AccountId::new(1).unwrap();
        fixture
            .repo
            .soft_delete(&StoreContext::background(), id)
            .await
            .unwrap();
        let token = token_for(&fixture, 1);

        let response = send(fixture.app, Method::GET, "/account/1", Some(&token)).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_他人のアカウントへのアクセスは403() {
        let fixture = setup().await;
        let token = token_for(&fixture, 1);

        let response = send(fixture.app, Method::DELETE, "/account/2", Some(&token)).await;

        assert_denied(response).await;
    }

    #[tokio::test]
    async fn test_トークンなしは403() {
        let fixture = setup().await;

        let response = send(fixture.app, Method::GET, "/account/1", None).await;

        assert_denied(response).await;
    }

    #[rstest]
    #[case::garbage("garbage")]
    #[case::empty("")]
    #[tokio::test]
    async fn test_不正なトークンは403(#[case] token: &str) {
        let fixture = setup().await;

        let response = send(fixture.app, Method::GET, "/account/1", Some(token)).await;

        assert_denied(response).await;
    }

    #[tokio::test]
    async fn test_別の鍵で署名されたトークンは403() {
        let fixture = setup().await;
        let other = JwtTokenService::new(TokenConfig::new(
            Some("other-secret".to_string()),
            Duration::from_secs(60),
        ));
        let token = other.issue(AccountId::new(1).unwrap()).unwrap();

        let response = send(fixture.app, Method::GET, "/account/1", Some(&token)).await;

        assert_denied(response).await;
    }

    #[rstest]
    #[case::not_integer("/account/abc")]
    #[case::zero("/account/0")]
    #[case::negative("/account/-1")]
    #[tokio::test]
    async fn test_整数でないidは403(#[case] uri: &str) {
        let fixture = setup().await;
        let token = token_for(&fixture, 1);

        let response = send(fixture.app, Method::GET, uri, Some(&token)).await;

        assert_denied(response).await;
    }

    #[tokio::test]
    async fn test_存在しないアカウントは403() {
        let fixture = setup().await;
        let token = token_for(&fixture, 99);

        let response = send(fixture.app, Method::GET, "/account/99", Some(&token)).await;

        assert_denied(response).await;
    }

    #[tokio::test]
    async fn test_ストレージ障害は403() {
        let fixture = setup().await;
        let token = token_for(&fixture, 1);
        fixture.repo.set_fail_reads(true);

        let response = send(fixture.app, Method::GET, "/account/1", Some(&token)).await;

        assert_denied(response).await;
    }
}
