//! # アカウント
//!
//! アカウントエンティティとそれに関連する値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 備考 |
//! |---|------------|------|
//! | [`Account`] | アカウント | 唯一の永続化エンティティ |
//! | [`AccountId`] | アカウント ID | ストレージが採番する正の整数 |
//! | [`NewAccount`] | 新規アカウント | ストレージへの作成入力 |
//!
//! ## 状態遷移
//!
//! ```text
//!        作成
//!         │
//!         ▼
//!     [Active] ──論理削除──▶ [Deleted]
//!         ▲                     │
//!         └────────復元──────────┘
//! ```
//!
//! どちらの遷移も冪等で、物理削除に至る遷移は存在しない。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use portfolio_domain::account::{Account, AccountId, FirstName, LastName};
//!
//! let account = Account::from_db(
//!     AccountId::new(1)?,
//!     FirstName::new("Ada")?,
//!     LastName::new("Lovelace")?,
//!     chrono::Utc::now(),
//!     false,
//! );
//!
//! let deleted = account.soft_deleted();
//! assert!(deleted.is_deleted());
//!
//! // 削除済みを再度削除しても状態は変わらない
//! assert_eq!(deleted.clone().soft_deleted(), deleted);
//! # Ok(())
//! # }
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DomainError, password::PasswordHash};

/// アカウント ID
///
/// ストレージが作成時に採番し、以後変更・再利用されない。
/// 0 以下の値は存在し得ないため、生成時に拒否する。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    /// 整数値からアカウント ID を作成する
    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < 1 {
            return Err(DomainError::Validation(format!(
                "アカウント ID は正の整数である必要があります: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// 内部の整数値を取得する
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl FromStr for AccountId {
    type Err = DomainError;

    /// パスパラメータ等の文字列から ID をパースする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<i64>()
            .map_err(|_| DomainError::Validation(format!("不正なアカウント ID です: {s}")))?;
        Self::new(value)
    }
}

define_validated_pii_string! {
    /// 名（firstName）
    pub struct FirstName {
        label: "firstName",
        max_length: 50,
    }
}

define_validated_pii_string! {
    /// 姓（lastName）
    pub struct LastName {
        label: "lastName",
        max_length: 50,
    }
}

/// 新規アカウント（ストレージへの作成入力）
///
/// `id` と `created_at` はストレージが割り当てるため含まない。
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name:    FirstName,
    pub last_name:     LastName,
    pub password_hash: PasswordHash,
}

/// アカウントエンティティ
///
/// # 不変条件
///
/// - `id` と `created_at` はストレージが作成時に設定し、以後変更されない
/// - ライフサイクルを表すのは `deleted` のみ
///
/// パスワードハッシュは書き込み専用で、読み出し時には復元しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id:         AccountId,
    first_name: FirstName,
    last_name:  LastName,
    created_at: DateTime<Utc>,
    deleted:    bool,
}

impl Account {
    /// 既存のデータからアカウントを復元する（ストレージから取得時）
    pub fn from_db(
        id: AccountId,
        first_name: FirstName,
        last_name: LastName,
        created_at: DateTime<Utc>,
        deleted: bool,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            created_at,
            deleted,
        }
    }

    // Getter メソッド

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn first_name(&self) -> &FirstName {
        &self.first_name
    }

    pub fn last_name(&self) -> &LastName {
        &self.last_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    // 状態遷移

    /// 論理削除した新しいインスタンスを返す
    ///
    /// 削除済みの場合もそのまま削除済みを返す（冪等）。
    pub fn soft_deleted(self) -> Self {
        Self {
            deleted: true,
            ..self
        }
    }

    /// 復元した新しいインスタンスを返す
    ///
    /// 有効な場合もそのまま有効を返す（冪等）。
    pub fn restored(self) -> Self {
        Self {
            deleted: false,
            ..self
        }
    }
}
