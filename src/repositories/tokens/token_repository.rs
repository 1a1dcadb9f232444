//! # 리프레시 토큰 저장소
//!
//! 사용자당 하나의 리프레시 토큰만 보관하는 TTL 저장소입니다.
//! 새 토큰을 저장하면 이전 토큰은 즉시 무효가 됩니다 (단일 세션 / 회전).
//!
//! ## 키 형식
//!
//! ```text
//! {prefix}refresh_token:{userId}  →  토큰 문자열 (TTL = 리프레시 토큰 유효기간)
//! ```
//!
//! ## 에러 처리
//!
//! Redis 연결 실패는 `AppError::StoreUnavailable`로 전파되며,
//! "유효하지 않은 토큰"(`Ok(false)`)과 섞이지 않습니다.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::caching::redis::RedisClient;
use crate::config::RedisKeyConfig;
use crate::errors::errors::AppError;

/// 리프레시 토큰 저장소 계약
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// 토큰을 저장합니다. 기존 값은 무조건 덮어씁니다.
    async fn save(&self, user_id: &str, token: &str) -> Result<(), AppError>;

    /// 저장된 값이 있고 `token`과 정확히 같을 때만 `true`
    async fn validate(&self, user_id: &str, token: &str) -> Result<bool, AppError>;

    /// 저장된 토큰을 삭제합니다. 없으면 아무 일도 하지 않습니다.
    async fn delete(&self, user_id: &str) -> Result<(), AppError>;

    /// 저장된 값이 `old`일 때만 `new`로 원자적으로 교체합니다.
    ///
    /// 같은 리프레시 토큰으로 동시에 들어온 갱신 요청 중 하나만 `true`를 받습니다.
    async fn rotate(&self, user_id: &str, old: &str, new: &str) -> Result<bool, AppError>;
}

fn store_unavailable(e: redis::RedisError) -> AppError {
    log::error!("[AUTH] 리프레시 토큰 저장소 접근 실패: {}", e);
    AppError::StoreUnavailable(e.to_string())
}

/// Redis 기반 리프레시 토큰 저장소
pub struct RedisRefreshTokenStore {
    redis: Arc<RedisClient>,
    keys: RedisKeyConfig,
    ttl_secs: u64,
}

impl RedisRefreshTokenStore {
    pub fn new(redis: Arc<RedisClient>, keys: RedisKeyConfig, ttl_secs: u64) -> Self {
        Self { redis, keys, ttl_secs }
    }
}

#[async_trait]
impl RefreshTokenStore for RedisRefreshTokenStore {
    async fn save(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        let key = self.keys.refresh_token_key(user_id);
        self.redis
            .set_ex(&key, token, self.ttl_secs)
            .await
            .map_err(store_unavailable)?;

        log::debug!("[AUTH] 리프레시 토큰 저장 - user_id: {}, ttl: {}초", user_id, self.ttl_secs);
        Ok(())
    }

    async fn validate(&self, user_id: &str, token: &str) -> Result<bool, AppError> {
        let key = self.keys.refresh_token_key(user_id);
        let stored = self.redis.get_string(&key).await.map_err(store_unavailable)?;
        Ok(stored.as_deref() == Some(token))
    }

    async fn delete(&self, user_id: &str) -> Result<(), AppError> {
        let key = self.keys.refresh_token_key(user_id);
        self.redis.del(&key).await.map_err(store_unavailable)
    }

    async fn rotate(&self, user_id: &str, old: &str, new: &str) -> Result<bool, AppError> {
        let key = self.keys.refresh_token_key(user_id);
        self.redis
            .compare_and_set_ex(&key, old, new, self.ttl_secs)
            .await
            .map_err(store_unavailable)
    }
}

/// 프로세스 내부 리프레시 토큰 저장소
///
/// Redis 없이 로컬 개발과 테스트에 사용합니다. 만료된 항목은 조회 시점에 제거됩니다.
pub struct InMemoryRefreshTokenStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    keys: RedisKeyConfig,
    ttl: Duration,
}

impl InMemoryRefreshTokenStore {
    pub fn new(keys: RedisKeyConfig, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            keys,
            ttl,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (String, Instant)>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::StoreUnavailable("in-memory token store poisoned".to_string()))
    }

    /// 만료되지 않은 값을 꺼냅니다. 만료된 값은 함께 제거합니다.
    fn live_value(
        entries: &mut HashMap<String, (String, Instant)>,
        key: &str,
    ) -> Option<String> {
        match entries.get(key) {
            Some((_, expires_at)) if Instant::now() >= *expires_at => {
                entries.remove(key);
                None
            }
            Some((value, _)) => Some(value.clone()),
            None => None,
        }
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn save(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        let key = self.keys.refresh_token_key(user_id);
        self.lock()?
            .insert(key, (token.to_string(), Instant::now() + self.ttl));
        Ok(())
    }

    async fn validate(&self, user_id: &str, token: &str) -> Result<bool, AppError> {
        let key = self.keys.refresh_token_key(user_id);
        let mut entries = self.lock()?;
        Ok(Self::live_value(&mut entries, &key).as_deref() == Some(token))
    }

    async fn delete(&self, user_id: &str) -> Result<(), AppError> {
        let key = self.keys.refresh_token_key(user_id);
        self.lock()?.remove(&key);
        Ok(())
    }

    async fn rotate(&self, user_id: &str, old: &str, new: &str) -> Result<bool, AppError> {
        let key = self.keys.refresh_token_key(user_id);
        let mut entries = self.lock()?;
        if Self::live_value(&mut entries, &key).as_deref() != Some(old) {
            return Ok(false);
        }
        entries.insert(key, (new.to_string(), Instant::now() + self.ttl));
        Ok(true)
    }
}
