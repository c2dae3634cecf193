//! # Account Service サーバー
//!
//! アカウントの作成・取得・一覧・論理削除・復元を提供する HTTP サービス。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `ACCOUNT_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `ACCOUNT_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `JWT_SECRET` | No | トークン署名鍵（未設定ではアカウント作成が 500 になる） |
//! | `JWT_TTL_SECS` | No | トークンの有効期間（デフォルト: 15000 秒） |
//! | `STORE_TIMEOUT_MS` | No | ストレージ呼び出しの期限（未設定で期限なし） |
//! | `LOG_FORMAT` | No | `json` / `pretty`（デフォルト: `pretty`） |
//!
//! ## 起動方法
//!
//! ```bash
//! ACCOUNT_PORT=8080 DATABASE_URL=postgres://... JWT_SECRET=... cargo run -p portfolio-account-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use portfolio_account_service::{
    app_builder::{AppDependencies, build_router},
    config::AccountConfig,
};
use portfolio_infra::{
    Argon2PasswordHasher,
    JwtTokenService,
    db,
    repository::PostgresAccountRepository,
};
use portfolio_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let tracing_config = TracingConfig::from_env("account-service");
    init_tracing(&tracing_config);

    let config = AccountConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        service = %tracing_config.service_name,
        "Account Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );
    if config.token.secret.is_none() {
        tracing::warn!("JWT_SECRET が未設定です。アカウント作成はトークン発行に失敗します");
    }

    let pool = db::create_pool(&config.database_url)
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::ensure_schema(&pool)
        .await
        .context("account テーブルの作成に失敗しました")?;

    let app = build_router(AppDependencies {
        account_repository: Arc::new(PostgresAccountRepository::new(pool.clone())),
        token_service:      Arc::new(JwtTokenService::new(config.token.clone())),
        password_hasher:    Arc::new(Argon2PasswordHasher::new()),
        store_timeout:      config.store_timeout,
        pool,
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Account Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Ctrl+C で停止する
///
/// シグナルを待機できない場合は停止しない。
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルの待機に失敗しました");
        std::future::pending::<()>().await;
    }
    tracing::info!("Account Service サーバーを停止します");
}
