//! # AccountRepository
//!
//! アカウントの永続化を担当するリポジトリ。
//!
//! - 削除は `deleted` フラグの更新のみ（物理削除はしない）
//! - `find_by_id` は削除済みも返す。一覧は有効なアカウントのみ
//! - 存在しない ID への削除・復元は何も更新せず成功する
//! - 全操作は [`StoreContext`] の期限に従う

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portfolio_domain::account::{Account, AccountId, FirstName, LastName, NewAccount};
use sqlx::PgPool;

use crate::{context::StoreContext, error::InfraError};

/// アカウントリポジトリトレイト
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// アカウントを作成し、ストレージが割り当てた `id` / `created_at` を含めて返す
    ///
    /// 作成直後の行を読み戻せなかった場合もエラーになる。
    async fn insert(&self, ctx: &StoreContext, account: &NewAccount)
    -> Result<Account, InfraError>;

    /// ID でアカウントを検索する
    ///
    /// 削除済みのアカウントも返す。
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(account))`: 見つかった場合
    /// - `Ok(None)`: 見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_id(
        &self,
        ctx: &StoreContext,
        id: AccountId,
    ) -> Result<Option<Account>, InfraError>;

    /// 有効な（削除されていない）アカウントを ID 順に取得する
    async fn find_all_active(&self, ctx: &StoreContext) -> Result<Vec<Account>, InfraError>;

    /// `deleted = true` に更新する
    async fn soft_delete(&self, ctx: &StoreContext, id: AccountId) -> Result<(), InfraError>;

    /// `deleted = false` に更新する
    async fn restore(&self, ctx: &StoreContext, id: AccountId) -> Result<(), InfraError>;

    /// アカウントを更新する
    ///
    /// 更新可能な属性がないため、何も変更せずに成功する。
    async fn update(&self, ctx: &StoreContext, account: &Account) -> Result<(), InfraError>;
}

/// `account` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id:         i64,
    first_name: String,
    last_name:  String,
    created_at: DateTime<Utc>,
    deleted:    bool,
}

impl TryFrom<AccountRow> for Account {
    type Error = InfraError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account::from_db(
            AccountId::new(row.id).map_err(|e| InfraError::unexpected(e.to_string()))?,
            FirstName::new(row.first_name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            LastName::new(row.last_name).map_err(|e| InfraError::unexpected(e.to_string()))?,
            row.created_at,
            row.deleted,
        ))
    }
}

/// PostgreSQL 実装の AccountRepository
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_deleted(&self, id: AccountId, deleted: bool) -> Result<(), InfraError> {
        let result = sqlx::query("UPDATE account SET deleted = $1 WHERE id = $2")
            .bind(deleted)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(account_id = %id, deleted, "更新対象のアカウントが存在しません");
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(
        &self,
        ctx: &StoreContext,
        account: &NewAccount,
    ) -> Result<Account, InfraError> {
        ctx.run("account.insert", async {
            let row = sqlx::query_as::<_, AccountRow>(
                r#"
                INSERT INTO account (first_name, last_name, password_hash)
                VALUES ($1, $2, $3)
                RETURNING id, first_name, last_name, created_at, deleted
                "#,
            )
            .bind(account.first_name.as_str())
            .bind(account.last_name.as_str())
            .bind(account.password_hash.as_str())
            .fetch_optional(&self.pool)
            .await?;

            let Some(row) = row else {
                return Err(InfraError::unexpected(
                    "作成したアカウントを読み戻せませんでした",
                ));
            };

            Account::try_from(row)
        })
        .await
    }

    async fn find_by_id(
        &self,
        ctx: &StoreContext,
        id: AccountId,
    ) -> Result<Option<Account>, InfraError> {
        ctx.run("account.find_by_id", async {
            let row = sqlx::query_as::<_, AccountRow>(
                r#"
                SELECT id, first_name, last_name, created_at, deleted
                FROM account
                WHERE id = $1
                "#,
            )
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

            row.map(Account::try_from).transpose()
        })
        .await
    }

    async fn find_all_active(&self, ctx: &StoreContext) -> Result<Vec<Account>, InfraError> {
        ctx.run("account.find_all_active", async {
            let rows = sqlx::query_as::<_, AccountRow>(
                r#"
                SELECT id, first_name, last_name, created_at, deleted
                FROM account
                WHERE deleted = false
                ORDER BY id
                "#,
            )
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter().map(Account::try_from).collect()
        })
        .await
    }

    async fn soft_delete(&self, ctx: &StoreContext, id: AccountId) -> Result<(), InfraError> {
        ctx.run("account.soft_delete", self.set_deleted(id, true))
            .await
    }

    async fn restore(&self, ctx: &StoreContext, id: AccountId) -> Result<(), InfraError> {
        ctx.run("account.restore", self.set_deleted(id, false))
            .await
    }

    async fn update(&self, _ctx: &StoreContext, account: &Account) -> Result<(), InfraError> {
        tracing::debug!(account_id = %account.id(), "更新可能な属性がないため何もしません");
        Ok(())
    }
}
