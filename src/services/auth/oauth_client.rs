//! # OAuth 프로바이더 클라이언트
//!
//! Authorization code를 프로바이더 액세스 토큰으로 교환하고,
//! 그 토큰으로 원본 사용자 속성 JSON을 가져옵니다.
//! 속성 해석은 하지 않으며 [`crate::domain::models::oauth`]의 정규화기가 담당합니다.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::config::{OAuthConfig, OAuthProvider};
use crate::errors::errors::AppError;

#[async_trait]
pub trait OAuthClient: Send + Sync {
    /// code 교환 후 사용자 속성 원본을 돌려줍니다.
    async fn fetch_user_attributes(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<Value, AppError>;
}

#[derive(Debug, Deserialize)]
struct ProviderTokenResponse {
    access_token: String,
}

/// `reqwest` 기반 구현
pub struct ReqwestOAuthClient {
    http: reqwest::Client,
    config: Arc<OAuthConfig>,
}

impl ReqwestOAuthClient {
    pub fn new(config: Arc<OAuthConfig>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn exchange_code_for_token(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<ProviderTokenResponse, AppError> {
        let registration = self.config.registration(provider)?;

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", registration.client_id.as_str()),
            ("client_secret", registration.client_secret.as_str()),
            ("redirect_uri", registration.redirect_uri.as_str()),
        ];
        if provider == OAuthProvider::Naver {
            params.push(("state", state));
        }

        let response = self
            .http
            .post(provider.token_uri())
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("[OAuth2] {} 토큰 교환 실패: status={}, body={}", provider, status, error_text);
            return Err(AppError::Unauthorized(format!("{} 인증 코드가 유효하지 않습니다", provider)));
        }

        response
            .json::<ProviderTokenResponse>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider, e)))
    }

    async fn get_user_attributes(&self, provider: OAuthProvider, access_token: &str) -> Result<Value, AppError> {
        let response = self
            .http
            .get(provider.user_info_uri())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 요청 실패: {}", provider, e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 사용자 정보 조회 실패: {}",
                provider, error_text
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("{} 사용자 정보 파싱 실패: {}", provider, e)))
    }
}

#[async_trait]
impl OAuthClient for ReqwestOAuthClient {
    async fn fetch_user_attributes(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<Value, AppError> {
        let token = self.exchange_code_for_token(provider, code, state).await?;
        self.get_user_attributes(provider, &token.access_token).await
    }
}
