//! # Account Service 設定
//!
//! 環境変数から Account Service サーバーの設定を読み込む。

use std::{env, time::Duration};

use anyhow::{Context as _, bail};
use portfolio_infra::{TokenConfig, token::DEFAULT_TOKEN_TTL_SECS};

/// Account Service サーバーの設定
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// バインドアドレス
    pub host:          String,
    /// ポート番号
    pub port:          u16,
    /// データベース接続 URL
    pub database_url:  String,
    /// トークン設定
    pub token:         TokenConfig,
    /// ストレージ呼び出しの期限（未設定なら期限なし）
    pub store_timeout: Option<Duration>,
}

impl AccountConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("ACCOUNT_PORT")
            .context("ACCOUNT_PORT が設定されていません")?
            .parse()
            .context("ACCOUNT_PORT は有効なポート番号である必要があります")?;

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL が設定されていません")?;

        let ttl_secs = match lookup("JWT_TTL_SECS") {
            Some(value) => value
                .parse::<u64>()
                .context("JWT_TTL_SECS は秒数（正の整数）である必要があります")?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };
        if ttl_secs == 0 {
            bail!("JWT_TTL_SECS は 1 以上である必要があります");
        }

        let store_timeout = lookup("STORE_TIMEOUT_MS")
            .map(|value| value.parse::<u64>())
            .transpose()
            .context("STORE_TIMEOUT_MS はミリ秒（正の整数）である必要があります")?
            .map(Duration::from_millis);

        Ok(Self {
            host: lookup("ACCOUNT_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url,
            token: TokenConfig::new(
                lookup("JWT_SECRET").filter(|secret| !secret.is_empty()),
                Duration::from_secs(ttl_secs),
            ),
            store_timeout,
        })
    }
}
