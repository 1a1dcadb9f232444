//! OAuth 로그인 성공 처리
//!
//! 연결된 사용자에게 토큰 쌍을 발급하고, 프론트엔드 URL에
//! `access_token`, `refresh_token`, `expiresIn` 쿼리 파라미터를 붙인 리다이렉트 주소를 만듭니다.
//! 토큰이 URL에 노출되므로 로그에는 기본 URL만 남깁니다.

use std::sync::Arc;

use reqwest::Url;

use crate::domain::entities::users::User;
use crate::domain::models::token::TokenPair;
use crate::errors::errors::AppError;
use crate::services::auth::auth_session_service::AuthSessionService;

pub struct OAuthCompletionHandler {
    sessions: Arc<AuthSessionService>,
    frontend_redirect_url: String,
}

impl OAuthCompletionHandler {
    pub fn new(sessions: Arc<AuthSessionService>, frontend_redirect_url: impl Into<String>) -> Self {
        Self {
            sessions,
            frontend_redirect_url: frontend_redirect_url.into(),
        }
    }

    /// 토큰을 발급/저장하고 프론트엔드 리다이렉트 주소를 돌려줍니다.
    pub async fn on_authentication_success(&self, user: &User) -> Result<String, AppError> {
        let pair = self.sessions.issue_token_pair(user).await?;
        let target = build_redirect_url(&self.frontend_redirect_url, &pair)?;

        log::info!(
            "[OAuth2] 토큰 발급 완료, 리다이렉트: userId={}, url={}",
            user.id_string().unwrap_or_default(),
            self.frontend_redirect_url
        );
        Ok(target)
    }
}

/// `{base}?access_token=...&refresh_token=...&expiresIn=...`
pub fn build_redirect_url(base: &str, pair: &TokenPair) -> Result<String, AppError> {
    let expires_in = pair.expires_in.to_string();
    let url = Url::parse_with_params(
        base,
        &[
            ("access_token", pair.access_token.as_str()),
            ("refresh_token", pair.refresh_token.as_str()),
            ("expiresIn", expires_in.as_str()),
        ],
    )
    .map_err(|e| AppError::ConfigurationError(format!("잘못된 OAuth2 리다이렉트 URL: {}", e)))?;

    Ok(url.into())
}
