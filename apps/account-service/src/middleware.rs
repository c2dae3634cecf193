//! # ミドルウェア
//!
//! Account Service 用のミドルウェアを提供する。

mod account_auth;

pub use account_auth::{AccountAuthState, TOKEN_HEADER, require_account_token};
