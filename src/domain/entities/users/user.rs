//! 사용자 엔티티
//!
//! 로컬 가입(이메일/비밀번호)과 OAuth 최초 로그인 모두 이 엔티티를 생성합니다.
//! 인증 코어는 사용자를 물리적으로 삭제하지 않으며, 탈퇴는 `deleted_at`으로 표시합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::errors::errors::AppError;

/// 사용자 역할
///
/// 토큰의 `role` 클레임에는 `USER`/`ADMIN`이 그대로 들어가고,
/// 요청 주체에는 `ROLE_` 접두사가 붙은 권한 문자열 하나가 파생됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    /// 요청 주체에 설치되는 단일 권한 문자열
    pub fn authority(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(AppError::Unauthorized(format!("알 수 없는 역할입니다: {}", other))),
        }
    }
}

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 표시 이름 (unique)
    pub nickname: String,
    /// 해시된 비밀번호 (OAuth 전용 계정은 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub role: Role,
    /// 이메일 인증 여부 (OAuth 사용자는 가입 시점에 true)
    pub email_verified: bool,
    pub last_login_at: Option<DateTime>,
    /// 탈퇴 시각 (soft delete)
    pub deleted_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    fn base(email: String, nickname: String, password_hash: Option<String>, role: Role) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            email,
            nickname,
            password_hash,
            profile_image_url: None,
            role,
            email_verified: false,
            last_login_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 새 로컬 사용자 생성 (이메일/패스워드). 이메일 인증이 필요한 상태로 시작됩니다.
    pub fn new_local(email: String, nickname: String, password_hash: String) -> Self {
        Self::base(email, nickname, Some(password_hash), Role::User)
    }

    /// 새 OAuth 사용자 생성
    ///
    /// 외부 프로바이더가 확인한 이메일이므로 인증 완료 상태로 시작하며 비밀번호는 없습니다.
    pub fn new_oauth(email: String, nickname: String, profile_image_url: Option<String>) -> Self {
        let mut user = Self::base(email, nickname, None, Role::User);
        user.email_verified = true;
        user.profile_image_url = profile_image_url;
        user
    }

    pub fn new_admin(email: String, nickname: String, password_hash: String) -> Self {
        let mut user = Self::base(email, nickname, Some(password_hash), Role::Admin);
        user.email_verified = true;
        user
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 비밀번호 없이 OAuth로만 로그인할 수 있는 계정인지 확인
    pub fn is_oauth_user(&self) -> bool {
        self.password_hash.is_none()
    }

    pub fn mark_logged_in(&mut self) {
        let now = DateTime::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_oauth_user_is_verified_without_password() {
        let user = User::new_oauth("a@b.com".to_string(), "A".to_string(), Some("u".to_string()));

        assert!(user.email_verified);
        assert!(user.is_oauth_user());
        assert_eq!(user.role, Role::User);
        assert_eq!(user.profile_image_url.as_deref(), Some("u"));
    }

    #[test]
    fn test_new_local_user_requires_verification() {
        let user = User::new_local("a@b.com".to_string(), "A".to_string(), "hash".to_string());

        assert!(!user.email_verified);
        assert!(!user.is_oauth_user());
        assert!(!user.is_deleted());
    }

    #[test]
    fn test_role_serialization_and_authority() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(Role::parse("USER").unwrap(), Role::User);
        assert!(Role::parse("ROOT").is_err());
        assert_eq!(Role::Admin.authority(), "ROLE_ADMIN");
    }

    #[test]
    fn test_mark_logged_in_sets_timestamp() {
        let mut user = User::new_admin("root@b.com".to_string(), "root".to_string(), "hash".to_string());
        assert!(user.last_login_at.is_none());

        user.mark_logged_in();

        assert!(user.last_login_at.is_some());
        assert!(user.is_admin());
    }
}
