//! 비밀번호 해시 검증
//!
//! 인증 코어는 해시 알고리즘 내부를 알지 못하고 `verify(plaintext, hash) -> bool`만 호출합니다.

use crate::config::PasswordConfig;
use crate::errors::errors::{AppResult, ErrorContext};

/// 런타임 해싱이 실패했을 때 쓰는 cost 10 bcrypt 해시
const FALLBACK_PLACEHOLDER_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

pub trait PasswordVerifier: Send + Sync {
    fn verify(&self, plaintext: &str, hash: &str) -> bool;

    /// 사용자가 없거나 비밀번호가 없는 계정에서도 같은 비용의 검증을 수행하기 위한 해시
    fn placeholder_hash(&self) -> &str;
}

/// bcrypt 구현
pub struct BcryptPasswordVerifier {
    cost: u32,
    placeholder_hash: String,
}

impl BcryptPasswordVerifier {
    pub fn new(config: PasswordConfig) -> Self {
        let placeholder_hash = bcrypt::hash(uuid::Uuid::new_v4().to_string(), config.bcrypt_cost)
            .unwrap_or_else(|e| {
                log::warn!("[AUTH] placeholder 해시 생성 실패, 기본값 사용: {}", e);
                FALLBACK_PLACEHOLDER_HASH.to_string()
            });

        Self {
            cost: config.bcrypt_cost,
            placeholder_hash,
        }
    }

    /// 비밀번호를 해싱합니다. 로컬 계정 생성과 테스트 데이터 준비에 사용합니다.
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        bcrypt::hash(plaintext, self.cost).context("비밀번호 해싱 실패")
    }
}

impl PasswordVerifier for BcryptPasswordVerifier {
    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or_else(|e| {
            log::warn!("[AUTH] 비밀번호 해시 검증 오류: {}", e);
            false
        })
    }

    fn placeholder_hash(&self) -> &str {
        &self.placeholder_hash
    }
}
