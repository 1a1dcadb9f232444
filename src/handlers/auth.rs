//! Authentication HTTP Handlers
//!
//! 자체 JWT 세션 엔드포인트입니다. 모든 경로는 `/api/v1/auth` 아래에 마운트됩니다.
//!
//! | 메서드 | 경로 | 인증 | 설명 |
//! |--------|------|------|------|
//! | POST | `/login` | - | 이메일/비밀번호 로그인 |
//! | POST | `/refresh` | - | 리프레시 토큰 회전 |
//! | POST | `/logout` | 필요 | 리프레시 토큰 폐기 |
//! | GET | `/me` | 필요 | 현재 요청 주체 |
use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::domain::dto::{ApiResponse, LoginRequest, PrincipalResponse, TokenRefreshRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::auth::AuthSessionService;

/// 로컬 로그인 핸들러
///
/// # Endpoint
/// `POST /api/v1/auth/login`
#[post("/login")]
pub async fn login(
    sessions: web::Data<AuthSessionService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let pair = sessions.login(&payload.email, &payload.password).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(pair)))
}

/// 토큰 갱신 엔드포인트
///
/// 사용된 리프레시 토큰은 즉시 폐기되고 새 토큰 쌍이 발급됩니다.
///
/// # Endpoint
/// `POST /api/v1/auth/refresh`
#[post("/refresh")]
pub async fn refresh(
    sessions: web::Data<AuthSessionService>,
    payload: web::Json<TokenRefreshRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let pair = sessions.refresh(&payload.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(pair)))
}

/// # Endpoint
/// `POST /api/v1/auth/logout`
#[post("/logout")]
pub async fn logout(
    sessions: web::Data<AuthSessionService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    sessions.logout(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("로그아웃되었습니다")))
}

/// 현재 인증된 요청 주체 조회
///
/// 토큰에 담긴 주체만 돌려주며 저장소를 조회하지 않습니다.
///
/// # Endpoint
/// `GET /api/v1/auth/me`
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(PrincipalResponse::from(user))))
}
