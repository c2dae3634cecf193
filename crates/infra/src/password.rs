//! # パスワードハッシュ化
//!
//! Argon2id による平文パスワードのハッシュ化を提供する。
//! ハッシュは PHC 文字列形式で、ソルトは呼び出しごとにランダム生成する。

use argon2::{
    Algorithm,
    Argon2,
    Params,
    PasswordHasher as _,
    Version,
    password_hash::SaltString,
};
use portfolio_domain::password::{PasswordHash, PlainPassword};

use crate::InfraError;

/// パスワードのハッシュ化を担当するトレイト
pub trait PasswordHasher: Send + Sync {
    /// 平文パスワードをハッシュ化する
    ///
    /// # Errors
    ///
    /// - ソルトのエンコードまたはハッシュ計算に失敗した場合
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError>;
}

/// Argon2id によるパスワードハッシュ化の実装
///
/// パラメータは argon2 クレートの既定値（m=19456 KiB, t=2, p=1）。
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }

    /// 最小コストのパラメータで作成する（テスト用）
    #[cfg(any(test, feature = "test-utils"))]
    pub fn lightweight() -> Self {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
            .unwrap_or(Params::DEFAULT);
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, InfraError> {
        let salt_bytes: [u8; 16] = rand::random();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| InfraError::unexpected(format!("ソルトの生成に失敗: {e}")))?;

        let hash = self
            .argon2
            .hash_password(password.as_str().as_bytes(), &salt)
            .map_err(|e| InfraError::unexpected(format!("パスワードのハッシュ化に失敗: {e}")))?;

        Ok(PasswordHash::new(hash.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use argon2::{PasswordVerifier as _, password_hash::PasswordHash as Argon2PasswordHash};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn sut() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new()
    }

    #[rstest]
    fn test_ハッシュはargon2idのphc形式になる(sut: Argon2PasswordHasher) {
        let password = PlainPassword::new("password123").unwrap();

        let hash = sut.hash(&password).unwrap();

        assert!(hash.as_str().starts_with("$argon2id$v=19$"));
        assert!(!hash.as_str().contains("password123"));
    }

    #[rstest]
    fn test_ハッシュから元のパスワードを検証できる(sut: Argon2PasswordHasher) {
        let password = PlainPassword::new("password123").unwrap();
        let hash = sut.hash(&password).unwrap();

        let parsed = Argon2PasswordHash::new(hash.as_str()).unwrap();

        assert!(
            Argon2::default()
                .verify_password(b"password123", &parsed)
                .is_ok()
        );
        assert!(
            Argon2::default()
                .verify_password(b"wrongpassword", &parsed)
                .is_err()
        );
    }

    #[rstest]
    fn test_同じパスワードでもソルトが異なればハッシュも異なる(
        sut: Argon2PasswordHasher,
    ) {
        let password = PlainPassword::new("password123").unwrap();

        let first = sut.hash(&password).unwrap();
        let second = sut.hash(&password).unwrap();

        assert_ne!(first, second);
    }
}
