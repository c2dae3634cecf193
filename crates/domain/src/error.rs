//! # ドメイン層エラー定義
//!
//! 入力値の検証失敗やエンティティ不在を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 400 Bad Request（認可ミドルウェア経由では 403） | アカウントが存在しない |
//!
//! `NotFound` を 404 にしないのは、ID の存在有無をクライアントに区別させないため。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - ID が正の整数でない
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Account" など）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },
}
