//! # Account Service アプリケーション構築
//!
//! DI（リポジトリ・トークン・ハッシュ化・State）の組み立てとルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use portfolio_infra::{PasswordHasher, TokenService, repository::AccountRepository};
use portfolio_shared::observability::{MakeRequestUuidV7, make_request_span};
use sqlx::PgPool;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    handler::{
        AccountState,
        ReadinessState,
        create_account,
        delete_account,
        get_account,
        health_check,
        list_accounts,
        readiness_check,
        restore_account,
    },
    middleware::{AccountAuthState, require_account_token},
    usecase::AccountUseCaseImpl,
};

/// ルーター構築に必要な依存コンポーネント
pub struct AppDependencies {
    pub account_repository: Arc<dyn AccountRepository>,
    pub token_service:      Arc<dyn TokenService>,
    pub password_hasher:    Arc<dyn PasswordHasher>,
    pub store_timeout:      Option<Duration>,
    /// Readiness Check 用の接続プール
    pub pool:               PgPool,
}

/// ルーターを構築する
///
/// `/account/{id}` の 3 メソッドのみ認可ミドルウェアの内側に置く。
pub fn build_router(deps: AppDependencies) -> Router {
    let auth_state = AccountAuthState {
        account_repository: deps.account_repository.clone(),
        token_service:      deps.token_service.clone(),
        store_timeout:      deps.store_timeout,
    };
    let account_state = Arc::new(AccountState {
        usecase: AccountUseCaseImpl::new(
            deps.account_repository,
            deps.token_service,
            deps.password_hasher,
            deps.store_timeout,
        ),
    });
    let readiness_state = Arc::new(ReadinessState { pool: deps.pool });

    let guarded = Router::new()
        .route(
            "/account/{id}",
            get(get_account)
                .delete(delete_account)
                .post(restore_account),
        )
        .route_layer(from_fn_with_state(auth_state, require_account_token));

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .route("/account", post(create_account).get(list_accounts))
        .merge(guarded)
        .with_state(account_state)
        // レイヤー順序: 下に書いたものが外側
        // 1. SetRequestIdLayer（最外）: UUID v7 を採番（クライアント提供値があればそれを使用）
        // 2. TraceLayer: request_id を含むリクエストスパン
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに x-request-id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
