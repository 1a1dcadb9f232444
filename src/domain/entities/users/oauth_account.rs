//! OAuth 계정 연결 엔티티
//!
//! 사용자와 외부 프로바이더 계정을 잇는 연결 행입니다.
//! `(user_id, provider)`와 `(provider, provider_id)`는 각각 시스템 전체에서 유일합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::config::OAuthProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub provider: OAuthProvider,
    /// 프로바이더가 부여한 사용자 ID
    pub provider_id: String,
    /// 연결 시점의 이메일 스냅샷
    pub email: String,
    pub created_at: DateTime,
}

impl OAuthAccount {
    pub fn new(user_id: ObjectId, provider: OAuthProvider, provider_id: String, email: String) -> Self {
        Self {
            id: None,
            user_id,
            provider,
            provider_id,
            email,
            created_at: DateTime::now(),
        }
    }
}
