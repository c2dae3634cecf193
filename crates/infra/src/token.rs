//! # アカウントトークン
//!
//! アカウント ID を束縛した HMAC 署名付き JWT の発行と検証を行う。
//!
//! - 発行: HS256、クレームは `accountId`（文字列）/ `iat` / `exp`
//! - 検証: HS256 / HS384 / HS512 のみ受け付ける。それ以外のアルゴリズム、
//!   署名不一致、形式不正はすべて [`TokenError::Invalid`]
//! - 有効期限は `exp` で判定し、超過は [`TokenError::Expired`]
//!
//! 署名鍵は [`TokenConfig`] で注入する。鍵が未設定の場合、発行は
//! [`TokenError::Configuration`]、検証は [`TokenError::Invalid`] になる。

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use portfolio_domain::account::AccountId;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// トークンの既定の有効期間（秒）
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 15_000;

/// 受け付ける署名アルゴリズム（HMAC 系のみ）
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// トークン関連のエラー
#[derive(Debug, Error)]
pub enum TokenError {
    /// 署名鍵が未設定など、発行側の設定不備
    #[error("トークン設定エラー: {0}")]
    Configuration(String),

    /// 署名不一致・形式不正・許可されていないアルゴリズム
    #[error("不正なトークンです: {0}")]
    Invalid(String),

    /// 有効期限切れ
    #[error("トークンの有効期限が切れています")]
    Expired,
}

/// トークン設定
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC 署名鍵（未設定または空文字列なら発行不可）
    pub secret: Option<String>,
    /// 有効期間
    pub ttl:    Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenConfig {
    pub fn new(secret: Option<String>, ttl: Duration) -> Self {
        Self { secret, ttl }
    }
}

/// トークンのクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClaims {
    /// 束縛されたアカウント ID（10 進文字列）
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// 発行時刻（Unix 秒、省略時は 0）
    #[serde(default)]
    pub iat:        i64,
    /// 有効期限（Unix 秒）
    pub exp:        i64,
}

impl AccountClaims {
    /// クレームのアカウント ID が `id` の 10 進表記と一致するか
    ///
    /// 比較は定数時間で行う。
    pub fn is_bound_to(&self, id: AccountId) -> bool {
        let expected = id.to_string();
        self.account_id
            .as_bytes()
            .ct_eq(expected.as_bytes())
            .into()
    }
}

/// トークンの発行・検証を担当するトレイト
pub trait TokenService: Send + Sync {
    /// トークンを発行できる設定か確認する
    ///
    /// 発行に失敗しうる操作の前に呼び、副作用を残さないようにする。
    fn ensure_configured(&self) -> Result<(), TokenError>;

    /// アカウント ID を束縛したトークンを発行する
    fn issue(&self, account_id: AccountId) -> Result<String, TokenError>;

    /// トークンを検証し、クレームを返す
    fn validate(&self, token: &str) -> Result<AccountClaims, TokenError>;
}

/// jsonwebtoken による TokenService 実装
pub struct JwtTokenService {
    keys: Option<(EncodingKey, DecodingKey)>,
    ttl:  Duration,
}

impl JwtTokenService {
    pub fn new(config: TokenConfig) -> Self {
        let keys = config
            .secret
            .filter(|secret| !secret.is_empty())
            .map(|secret| {
                (
                    EncodingKey::from_secret(secret.as_bytes()),
                    DecodingKey::from_secret(secret.as_bytes()),
                )
            });
        Self {
            keys,
            ttl: config.ttl,
        }
    }

    fn encoding_key(&self) -> Result<&EncodingKey, TokenError> {
        self.keys
            .as_ref()
            .map(|(encoding_key, _)| encoding_key)
            .ok_or_else(|| TokenError::Configuration("署名鍵が設定されていません".to_string()))
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 0;
        validation
    }
}

impl TokenService for JwtTokenService {
    fn ensure_configured(&self) -> Result<(), TokenError> {
        self.encoding_key().map(|_| ())
    }

    fn issue(&self, account_id: AccountId) -> Result<String, TokenError> {
        let encoding_key = self.encoding_key()?;

        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = AccountClaims {
            account_id: account_id.to_string(),
            iat:        now,
            exp:        now.saturating_add(ttl),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
            .map_err(|e| TokenError::Configuration(format!("トークンの署名に失敗: {e}")))
    }

    fn validate(&self, token: &str) -> Result<AccountClaims, TokenError> {
        let Some((_, decoding_key)) = &self.keys else {
            return Err(TokenError::Invalid(
                "署名鍵が設定されていないため検証できません".to_string(),
            ));
        };

        jsonwebtoken::decode::<AccountClaims>(token, decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
