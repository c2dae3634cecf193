//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//! 各ハンドラはサブモジュールに配置し、ここで re-export する。

pub mod account;
pub mod health;

pub use account::{
    AccountState,
    create_account,
    delete_account,
    get_account,
    list_accounts,
    restore_account,
};
pub use health::{ReadinessState, health_check, readiness_check};
