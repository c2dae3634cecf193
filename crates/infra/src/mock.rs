//! # テスト用インメモリリポジトリ
//!
//! ユースケース・ハンドラのテストで使用する [`AccountRepository`] 実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! portfolio-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! ID は 1 から採番し、一覧は ID 順に返す。

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use portfolio_domain::{
    account::{Account, AccountId, NewAccount},
    password::PasswordHash,
};

use crate::{context::StoreContext, error::InfraError, repository::AccountRepository};

#[derive(Default)]
struct MockState {
    accounts:    BTreeMap<AccountId, (Account, PasswordHash)>,
    last_id:     i64,
    fail_writes: bool,
    fail_reads:  bool,
}

/// インメモリの AccountRepository
#[derive(Clone, Default)]
pub struct MockAccountRepository {
    state: Arc<Mutex<MockState>>,
}

impl MockAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書き込み（作成・削除・復元）を失敗させるかを切り替える
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// 読み取り（ID 検索・一覧）を失敗させるかを切り替える
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    /// 保存されたパスワードハッシュを取得する
    pub fn password_hash_of(&self, id: AccountId) -> Option<PasswordHash> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(&id)
            .map(|(_, hash)| hash.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>, InfraError> {
        self.state
            .lock()
            .map_err(|e| InfraError::unexpected(format!("ロック取得に失敗: {e}")))
    }

    fn lock_for_write(&self) -> Result<MutexGuard<'_, MockState>, InfraError> {
        let state = self.lock()?;
        if state.fail_writes {
            return Err(InfraError::unexpected("書き込みに失敗しました（モック）"));
        }
        Ok(state)
    }

    fn lock_for_read(&self) -> Result<MutexGuard<'_, MockState>, InfraError> {
        let state = self.lock()?;
        if state.fail_reads {
            return Err(InfraError::unexpected("読み取りに失敗しました（モック）"));
        }
        Ok(state)
    }

    fn update_with(
        &self,
        id: AccountId,
        transition: fn(Account) -> Account,
    ) -> Result<(), InfraError> {
        let mut state = self.lock_for_write()?;
        if let Some((account, _)) = state.accounts.get_mut(&id) {
            *account = transition(account.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn insert(
        &self,
        _ctx: &StoreContext,
        account: &NewAccount,
    ) -> Result<Account, InfraError> {
        let mut state = self.lock_for_write()?;
        state.last_id += 1;
        let id = AccountId::new(state.last_id).map_err(|e| InfraError::unexpected(e.to_string()))?;

        let created = Account::from_db(
            id,
            account.first_name.clone(),
            account.last_name.clone(),
            Utc::now(),
            false,
        );
        state
            .accounts
            .insert(id, (created.clone(), account.password_hash.clone()));
        Ok(created)
    }

    async fn find_by_id(
        &self,
        _ctx: &StoreContext,
        id: AccountId,
    ) -> Result<Option<Account>, InfraError> {
        let state = self.lock_for_read()?;
        Ok(state.accounts.get(&id).map(|(account, _)| account.clone()))
    }

    async fn find_all_active(&self, _ctx: &StoreContext) -> Result<Vec<Account>, InfraError> {
        let state = self.lock_for_read()?;
        Ok(state
            .accounts
            .values()
            .map(|(account, _)| account)
            .filter(|account| !account.is_deleted())
            .cloned()
            .collect())
    }

    async fn soft_delete(&self, _ctx: &StoreContext, id: AccountId) -> Result<(), InfraError> {
        self.update_with(id, Account::soft_deleted)
    }

    async fn restore(&self, _ctx: &StoreContext, id: AccountId) -> Result<(), InfraError> {
        self.update_with(id, Account::restored)
    }

    async fn update(&self, _ctx: &StoreContext, _account: &Account) -> Result<(), InfraError> {
        Ok(())
    }
}
