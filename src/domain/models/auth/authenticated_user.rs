//! 요청 주체(Principal) 추출자
//!
//! 인증 필터가 요청 extensions에 설치한 [`AuthenticatedUser`]를 핸들러로 꺼내옵니다.
//! 필터는 요청을 거절하지 않으며, 401/403 결정은 이 추출자들이 내립니다.
//!
//! | 추출자 | 주체 없음 | 역할 부족 |
//! |--------|-----------|-----------|
//! | [`AuthenticatedUser`] | 401 | - |
//! | [`AdminUser`] | 401 | 403 |
//! | [`OptionalUser`] | 통과 (`None`) | - |
use std::future::{ready, Ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::Role;
use crate::errors::errors::AppError;

/// JWT 토큰에서 추출된 요청 주체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID
    pub user_id: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    /// 역할에서 파생된 단일 권한 (`ROLE_USER` / `ROLE_ADMIN`)
    pub fn authority(&self) -> &'static str {
        self.role.authority()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::Unauthorized("인증되지 않은 요청입니다".to_string()))),
        }
    }
}

/// 관리자 권한이 필요한 핸들러용 추출자
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthenticatedUser>() {
            Some(user) if user.is_admin() => Ok(AdminUser(user.clone())),
            Some(_) => Err(AppError::Forbidden("관리자 권한이 필요합니다".to_string())),
            None => Err(AppError::Unauthorized("인증되지 않은 요청입니다".to_string())),
        };
        ready(result)
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}
