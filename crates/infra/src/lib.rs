//! # Portfolio インフラ層
//!
//! 外部システムとの接続と、署名・ハッシュなどの暗号処理を担当する。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プールとテーブル初期化（[`db`]）
//! - **ストレージ**: アカウント永続化の抽象と PostgreSQL 実装（[`repository`]）
//! - **呼び出しコンテキスト**: ストレージ呼び出しの期限（[`context`]）
//! - **トークン**: アカウント ID を束縛する署名付きトークン（[`token`]）
//! - **パスワード**: Argon2id によるハッシュ化（[`password`]）
//!
//! ## 依存関係
//!
//! ```text
//! account-service → infra → domain
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use portfolio_infra::{db, repository::PostgresAccountRepository};
//!
//! let pool = db::create_pool("postgres://localhost/portfolio").await?;
//! db::ensure_schema(&pool).await?;
//! let repository = PostgresAccountRepository::new(pool);
//! ```

pub mod context;
pub mod db;
pub mod error;
pub mod password;
pub mod repository;
pub mod token;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use context::StoreContext;
pub use error::{InfraError, InfraErrorKind};
pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use token::{AccountClaims, JwtTokenService, TokenConfig, TokenError, TokenService};
