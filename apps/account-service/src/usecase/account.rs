//! アカウント管理ユースケース

use std::{sync::Arc, time::Duration};

use portfolio_domain::{
    DomainError,
    account::{Account, AccountId, FirstName, LastName, NewAccount},
    password::PlainPassword,
};
use portfolio_infra::{
    PasswordHasher,
    StoreContext,
    TokenService,
    repository::AccountRepository,
};

use crate::error::AccountError;

/// アカウント作成の入力
pub struct CreateAccountInput {
    pub first_name: FirstName,
    pub last_name:  LastName,
    pub password:   PlainPassword,
}

/// アカウント作成の結果
///
/// 作成したアカウントと、そのアカウントに束縛されたトークン。
#[derive(Debug)]
pub struct CreatedAccount {
    pub account: Account,
    pub token:   String,
}

/// アカウント管理ユースケース
pub struct AccountUseCaseImpl {
    account_repository: Arc<dyn AccountRepository>,
    token_service:      Arc<dyn TokenService>,
    password_hasher:    Arc<dyn PasswordHasher>,
    store_timeout:      Option<Duration>,
}

impl AccountUseCaseImpl {
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        token_service: Arc<dyn TokenService>,
        password_hasher: Arc<dyn PasswordHasher>,
        store_timeout: Option<Duration>,
    ) -> Self {
        Self {
            account_repository,
            token_service,
            password_hasher,
            store_timeout,
        }
    }

    fn store_context(&self) -> StoreContext {
        StoreContext::from_timeout(self.store_timeout)
    }

    /// アカウントを作成する
    ///
    /// 1. トークンを発行できる設定か確認（発行できないアカウントを残さない）
    /// 2. パスワードをハッシュ化（平文はストレージに渡さない）
    /// 3. ストレージに作成し、採番された ID を受け取る
    /// 4. その ID を束縛したトークンを発行
    #[tracing::instrument(skip_all)]
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<CreatedAccount, AccountError> {
        self.token_service
            .ensure_configured()
            .map_err(AccountError::TokenIssuance)?;

        let password_hash = self
            .password_hasher
            .hash(&input.password)
            .map_err(|e| AccountError::Internal(e.to_string()))?;

        let new_account = NewAccount {
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
        };

        let account = self
            .account_repository
            .insert(&self.store_context(), &new_account)
            .await
            .map_err(AccountError::Storage)?;

        let token = self
            .token_service
            .issue(account.id())
            .map_err(AccountError::TokenIssuance)?;

        tracing::info!(account_id = %account.id(), "アカウントを作成しました");
        Ok(CreatedAccount { account, token })
    }

    /// ID でアカウントを取得する
    ///
    /// 削除済みのアカウントも返す。
    #[tracing::instrument(skip_all, fields(account_id = %id))]
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AccountError> {
        self.account_repository
            .find_by_id(&self.store_context(), id)
            .await
            .map_err(AccountError::Storage)?
            .ok_or_else(|| {
                DomainError::NotFound {
                    entity_type: "Account",
                    id:          id.to_string(),
                }
                .into()
            })
    }

    /// 有効なアカウントの一覧を取得する
    #[tracing::instrument(skip_all)]
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        self.account_repository
            .find_all_active(&self.store_context())
            .await
            .map_err(AccountError::Storage)
    }

    /// アカウントを論理削除する
    ///
    /// 削除済みのアカウントに対しても成功する。
    #[tracing::instrument(skip_all, fields(account_id = %id))]
    pub async fn delete_account(&self, id: AccountId) -> Result<(), AccountError> {
        self.account_repository
            .soft_delete(&self.store_context(), id)
            .await
            .map_err(AccountError::Conflict)?;

        tracing::info!(account_id = %id, "アカウントを削除しました");
        Ok(())
    }

    /// 論理削除したアカウントを復元する
    ///
    /// 有効なアカウントに対しても成功する。
    #[tracing::instrument(skip_all, fields(account_id = %id))]
    pub async fn restore_account(&self, id: AccountId) -> Result<(), AccountError> {
        self.account_repository
            .restore(&self.store_context(), id)
            .await
            .map_err(AccountError::Conflict)?;

        tracing::info!(account_id = %id, "アカウントを復元しました");
        Ok(())
    }
}
