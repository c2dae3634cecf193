//! # ユースケース層
//!
//! Account Service のビジネスロジックを実装する。
//!
//! - **依存性注入**: リポジトリ・トークン・ハッシュ化を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは入出力の変換のみ行い、ロジックはユースケースに集約

pub mod account;

pub use account::{AccountUseCaseImpl, CreateAccountInput, CreatedAccount};
