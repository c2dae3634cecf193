//! # Portfolio ドメイン層
//!
//! アカウント管理の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: ストレージが採番する ID を持つ [`account::Account`]
//! - **値オブジェクト**: 生成時に検証される名前・パスワード
//! - **状態遷移**: 論理削除と復元は冪等な遷移としてエンティティに集約する
//!
//! ## 依存関係の方向
//!
//! ```text
//! account-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、トークン署名）には一切依存しない。
//!
//! ## 使用例
//!
//! ```rust
//! use portfolio_domain::{DomainError, account::AccountId};
//!
//! let id: AccountId = "42".parse()?;
//! assert_eq!(id.as_i64(), 42);
//!
//! // 整数でない ID はバリデーションエラー
//! assert!(matches!(
//!     "abc".parse::<AccountId>(),
//!     Err(DomainError::Validation(_))
//! ));
//! # Ok::<(), DomainError>(())
//! ```

#[macro_use]
mod macros;

pub mod account;
pub mod error;
pub mod password;

pub use error::DomainError;
