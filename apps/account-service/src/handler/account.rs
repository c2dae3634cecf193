//! # アカウントハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /account` - アカウントを作成し、トークンを発行する
//! - `GET /account` - 有効なアカウントの一覧
//! - `GET /account/{id}` - アカウントを取得（要トークン）
//! - `DELETE /account/{id}` - アカウントを論理削除（要トークン）
//! - `POST /account/{id}` - 論理削除したアカウントを復元（要トークン）
//!
//! トークンの検証は [`crate::middleware::require_account_token`] が行う。
//! ハンドラ自身は ID のパースと入出力の変換のみを担う。

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use portfolio_domain::{
    account::{Account, AccountId, FirstName, LastName},
    password::PlainPassword,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AccountError,
    usecase::{AccountUseCaseImpl, CreateAccountInput, CreatedAccount},
};

/// アカウント API の共有状態
pub struct AccountState {
    pub usecase: AccountUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// アカウント作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name:  String,
    pub password:   String,
}

/// アカウントレスポンス
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id:         i64,
    pub first_name: String,
    pub last_name:  String,
    pub created_at: DateTime<Utc>,
    pub deleted:    bool,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id:         account.id().as_i64(),
            first_name: account.first_name().as_str().to_string(),
            last_name:  account.last_name().as_str().to_string(),
            created_at: account.created_at(),
            deleted:    account.is_deleted(),
        }
    }
}

/// アカウント作成レスポンス（アカウント + トークン）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedAccountResponse {
    #[serde(flatten)]
    pub account: AccountResponse,
    pub token:   String,
}

impl From<CreatedAccount> for CreatedAccountResponse {
    fn from(created: CreatedAccount) -> Self {
        Self {
            account: AccountResponse::from(&created.account),
            token:   created.token,
        }
    }
}

/// 論理削除レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: i64,
}

/// 復元レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct RestoredResponse {
    pub restored: i64,
}

fn parse_account_id(raw: &str) -> Result<AccountId, AccountError> {
    raw.parse::<AccountId>().map_err(AccountError::from)
}

// --- ハンドラ ---

/// POST /account
///
/// 本文は `Content-Type` によらず JSON としてデコードする。
/// デコードに失敗した場合、入力値が不正な場合は 400。
pub async fn create_account(
    State(state): State<Arc<AccountState>>,
    body: Bytes,
) -> Result<Json<CreatedAccountResponse>, AccountError> {
    let req: CreateAccountRequest = serde_json::from_slice(&body)
        .map_err(|e| AccountError::BadRequest(format!("リクエスト本文を解釈できません: {e}")))?;

    let input = CreateAccountInput {
        first_name: FirstName::new(req.first_name)?,
        last_name:  LastName::new(req.last_name)?,
        password:   PlainPassword::new(req.password)?,
    };

    let created = state.usecase.create_account(input).await?;
    Ok(Json(CreatedAccountResponse::from(created)))
}

/// GET /account
pub async fn list_accounts(
    State(state): State<Arc<AccountState>>,
) -> Result<Json<Vec<AccountResponse>>, AccountError> {
    let accounts = state.usecase.list_accounts().await?;
    Ok(Json(accounts.iter().map(AccountResponse::from).collect()))
}

/// GET /account/{id}
///
/// ID が整数でない場合、アカウントが存在しない場合は 400。
pub async fn get_account(
    State(state): State<Arc<AccountState>>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AccountError> {
    let id = parse_account_id(&id)?;
    let account = state.usecase.get_account(id).await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// DELETE /account/{id}
///
/// ストレージ障害時は 409。
pub async fn delete_account(
    State(state): State<Arc<AccountState>>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AccountError> {
    let id = parse_account_id(&id)?;
    state.usecase.delete_account(id).await?;
    Ok(Json(DeletedResponse {
        deleted: id.as_i64(),
    }))
}

/// POST /account/{id}
///
/// ストレージ障害時は 409。
pub async fn restore_account(
    State(state): State<Arc<AccountState>>,
    Path(id): Path<String>,
) -> Result<Json<RestoredResponse>, AccountError> {
    let id = parse_account_id(&id)?;
    state.usecase.restore_account(id).await?;
    Ok(Json(RestoredResponse {
        restored: id.as_i64(),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        body::Body,
        http::{Method, Request, StatusCode},
        routing::{get, post},
    };
    use portfolio_infra::{
        Argon2PasswordHasher,
        JwtTokenService,
        TokenConfig,
        mock::MockAccountRepository,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tower::ServiceExt as _;

    use super::*;

    /// 認可ミドルウェアを通さないルーター
    fn unguarded_router(repo: MockAccountRepository) -> Router {
        let usecase = AccountUseCaseImpl::new(
            Arc::new(repo),
            Arc::new(JwtTokenService::new(TokenConfig::new(
                Some("test-secret".to_string()),
                Duration::from_secs(60),
            ))),
            Arc::new(Argon2PasswordHasher::lightweight()),
            None,
        );
        Router::new()
            .route("/account", post(create_account).get(list_accounts))
            .route(
                "/account/{id}",
                get(get_account)
                    .delete(delete_account)
                    .post(restore_account),
            )
            .with_state(Arc::new(AccountState { usecase }))
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_作成レスポンスはアカウントとトークンを含む() {
        let app = unguarded_router(MockAccountRepository::new());

        let (status, json) = send(
            app,
            Method::POST,
            "/account",
            Some(r#"{"firstName":"Ada","lastName":"Lovelace","password":"password123"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], 1);
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["deleted"], false);
        assert!(json["createdAt"].is_string());
        assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn test_content_typeがなくても本文をデコードする() {
        let app = unguarded_router(MockAccountRepository::new());
        let request = Request::post("/account")
            .body(Body::from(
                r#"{"firstName":"Ada","lastName":"Lovelace","password":"x"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[case::empty_body("")]
    #[case::not_json("not json")]
    #[case::missing_field(r#"{"firstName":"Ada","lastName":"Lovelace"}"#)]
    #[case::empty_name(r#"{"firstName":"  ","lastName":"Lovelace","password":"p"}"#)]
    #[case::empty_password(r#"{"firstName":"Ada","lastName":"Lovelace","password":""}"#)]
    #[tokio::test]
    async fn test_不正な作成リクエストは400(#[case] body: &str) {
        let app = unguarded_router(MockAccountRepository::new());

        let (status, json) = send(app, Method::POST, "/account", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_認可なしの経路では不正なidは400() {
        let app = unguarded_router(MockAccountRepository::new());

        let (status, _) = send(app, Method::GET, "/account/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_存在しないアカウントの取得は400() {
        let app = unguarded_router(MockAccountRepository::new());

        let (status, _) = send(app, Method::GET, "/account/99", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_削除と復元のレスポンス形状() {
        let repo = MockAccountRepository::new();
        let app = unguarded_router(repo);
        send(
            app.clone(),
            Method::POST,
            "/account",
            Some(r#"{"firstName":"Ada","lastName":"Lovelace","password":"p"}"#),
        )
        .await;

        let (status, json) = send(app.clone(), Method::DELETE, "/account/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "deleted": 1 }));

        let (status, json) = send(app, Method::POST, "/account/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "restored": 1 }));
    }

    #[tokio::test]
    async fn test_削除時のストレージ障害は409() {
        let repo = MockAccountRepository::new();
        repo.set_fail_writes(true);
        let app = unguarded_router(repo);

        let (status, json) = send(app.clone(), Method::DELETE, "/account/1", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["status"], 409);

        let (status, _) = send(app, Method::POST, "/account/1", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_一覧取得時のストレージ障害は400() {
        let repo = MockAccountRepository::new();
        repo.set_fail_reads(true);
        let app = unguarded_router(repo);

        let (status, _) = send(app, Method::GET, "/account", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
