//! # ヘルスチェックハンドラ
//!
//! ```text
//! GET /health        → 200 {"status":"healthy","version":"0.1.0"}
//! GET /health/ready  → 200 / 503 {"status":"ready","database":"ready"}
//! ```

use std::{sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use portfolio_infra::db;
use portfolio_shared::{HealthResponse, ReadinessResponse};
use sqlx::PgPool;

/// データベース疎通確認のタイムアウト
const DATABASE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Readiness Check の共有状態
pub struct ReadinessState {
    pub pool: PgPool,
}

/// Liveness Check エンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check エンドポイント
///
/// データベースに到達できれば 200、できなければ 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let reachable = check_database(&state.pool).await;
    let response = ReadinessResponse::from_database(reachable);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

async fn check_database(pool: &PgPool) -> bool {
    match tokio::time::timeout(DATABASE_CHECK_TIMEOUT, db::ping(pool)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: データベースに到達できません");
            false
        }
        Err(_) => {
            tracing::warn!("readiness check: データベースの応答がタイムアウトしました");
            false
        }
    }
}
