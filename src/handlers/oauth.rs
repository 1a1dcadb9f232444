//! OAuth 2.0 소셜 로그인 핸들러
//!
//! - `GET /api/v1/auth/oauth2/authorization/{provider}` - 프로바이더 동의 화면으로 302
//! - `GET /api/v1/auth/oauth2/redirect/{provider}` - 콜백 처리 후 프론트엔드로 302
use actix_web::{get, http::header, web, HttpResponse};

use crate::domain::dto::OAuthCallbackQuery;
use crate::errors::errors::AppError;
use crate::services::auth::OAuthLoginService;

#[get("/oauth2/authorization/{provider}")]
pub async fn authorization(
    oauth: web::Data<OAuthLoginService>,
    provider: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let location = oauth.authorization_url(&provider)?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}

/// 프로바이더 콜백 처리
///
/// 성공하면 토큰을 쿼리 파라미터로 붙인 프론트엔드 URL로 리다이렉트합니다.
#[get("/oauth2/redirect/{provider}")]
pub async fn redirect(
    oauth: web::Data<OAuthLoginService>,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let location = oauth.complete(&provider, query.into_inner()).await?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish())
}
