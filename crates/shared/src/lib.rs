//! # Portfolio 共有ユーティリティ
//!
//! サービス横断で使う、ビジネスロジックを含まないユーティリティを提供する。
//!
//! - [`error_response`] - エラーレスポンスの共通形式
//! - [`health`] - ヘルスチェックのレスポンス型
//! - [`observability`] - トレーシング初期化とリクエスト ID

pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::ErrorResponse;
pub use health::{HealthResponse, ReadinessResponse, ReadinessStatus};
