//! # リポジトリ実装
//!
//! アカウントの永続化操作を定義するトレイトと、その PostgreSQL 実装を提供する。
//! ユースケース層はトレイト経由で利用し、テストではインメモリ実装に差し替える。

pub mod account_repository;

pub use account_repository::{AccountRepository, PostgresAccountRepository};
