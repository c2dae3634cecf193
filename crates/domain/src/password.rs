//! # パスワード
//!
//! パスワード関連の値オブジェクトを定義する。
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | アカウント作成時の入力値 |
//! | [`PasswordHash`] | パスワードハッシュ | 永続化用のハッシュ値 |
//!
//! 平文はストレージに渡らない。ハッシュ化はインフラ層の `PasswordHasher` が担う。

use crate::DomainError;

/// 平文パスワードの最大長（バイト数ではなく文字数）
const MAX_PASSWORD_LENGTH: usize = 128;

/// 平文パスワード（アカウント作成時の入力値）
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
    }
}

impl PlainPassword {
    /// パスワードを作成する
    ///
    /// 前後の空白はパスワードの一部として扱い、trim しない。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation("passwordは必須です".to_string()));
        }

        if value.chars().count() > MAX_PASSWORD_LENGTH {
            return Err(DomainError::Validation(format!(
                "passwordは {MAX_PASSWORD_LENGTH} 文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワードハッシュ（永続化用）
///
/// PHC 文字列形式（`$argon2id$v=19$...`）のハッシュをラップする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// ハッシュ文字列からインスタンスを作成する
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
