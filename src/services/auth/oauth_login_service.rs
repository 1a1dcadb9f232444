//! # OAuth 로그인 흐름
//!
//! ```text
//! GET /oauth2/authorization/{provider}
//!   └─ 302 → 프로바이더 동의 화면 (client_id, redirect_uri, scope, state)
//!
//! GET /oauth2/redirect/{provider}?code=...&state=...
//!   ├─ state 검증 (서명, 만료, 프로바이더 일치)
//!   ├─ OAuthClient: code 교환 → 사용자 속성 원본
//!   ├─ 정규화 → IdentityLinkingService::link_or_create
//!   └─ OAuthCompletionHandler → 302 프론트엔드 (토큰 쿼리 파라미터)
//! ```
//!
//! `state`는 `OAUTH_STATE_SECRET`으로 서명한 짧은 JWT이며 서버에 저장하지 않습니다.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{OAuthConfig, OAuthProvider};
use crate::domain::dto::auth::OAuthCallbackQuery;
use crate::domain::models::oauth::normalize_for;
use crate::errors::errors::{AppError, ErrorContext};
use crate::services::auth::identity_linking_service::IdentityLinkingService;
use crate::services::auth::oauth_client::OAuthClient;
use crate::services::auth::oauth_completion::OAuthCompletionHandler;

#[derive(Debug, Serialize, Deserialize)]
struct OAuthStateClaims {
    provider: OAuthProvider,
    nonce: String,
    iat: i64,
    exp: i64,
}

pub struct OAuthLoginService {
    config: Arc<OAuthConfig>,
    client: Arc<dyn OAuthClient>,
    linking: Arc<IdentityLinkingService>,
    completion: Arc<OAuthCompletionHandler>,
}

impl OAuthLoginService {
    pub fn new(
        config: Arc<OAuthConfig>,
        client: Arc<dyn OAuthClient>,
        linking: Arc<IdentityLinkingService>,
        completion: Arc<OAuthCompletionHandler>,
    ) -> Self {
        Self {
            config,
            client,
            linking,
            completion,
        }
    }

    /// 프로바이더 동의 화면 URL을 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 지원하지 않거나 등록되지 않은 프로바이더
    pub fn authorization_url(&self, registration_id: &str) -> Result<String, AppError> {
        let provider = OAuthProvider::from_registration_id(registration_id)?;
        let registration = self.config.registration(provider)?;
        let state = self.issue_state(provider)?;

        let params = [
            ("client_id", registration.client_id.as_str()),
            ("redirect_uri", registration.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", registration.scopes.as_str()),
            ("state", state.as_str()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        Ok(format!("{}?{}", provider.authorization_uri(), query_string))
    }

    /// 프로바이더 콜백을 처리하고 프론트엔드 리다이렉트 주소를 돌려줍니다.
    pub async fn complete(&self, registration_id: &str, query: OAuthCallbackQuery) -> Result<String, AppError> {
        let provider = OAuthProvider::from_registration_id(registration_id)?;

        if let Some(error) = query.error {
            log::info!(
                "[OAuth2] {} 인증 거부: error={}, description={}",
                provider,
                error,
                query.error_description.unwrap_or_default()
            );
            return Err(AppError::Unauthorized(format!("{} 인증이 취소되었습니다", provider)));
        }

        let code = query
            .code
            .ok_or_else(|| AppError::ValidationError("Authorization code가 필요합니다".to_string()))?;
        let state = query
            .state
            .ok_or_else(|| AppError::Unauthorized("유효하지 않은 OAuth state".to_string()))?;
        self.verify_state(&state, provider)?;

        let attributes = self.client.fetch_user_attributes(provider, &code, &state).await?;
        let identity = normalize_for(provider, &attributes)?;
        log::info!("[OAuth2] 로그인 시도: provider={}", provider);

        let user = self.linking.link_or_create(&identity).await?;
        self.completion.on_authentication_success(&user).await
    }

    fn issue_state(&self, provider: OAuthProvider) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = OAuthStateClaims {
            provider,
            nonce: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.config.state_ttl_secs)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.state_secret()),
        )
        .context("OAuth state 생성 실패")
    }

    fn verify_state(&self, state: &str, provider: OAuthProvider) -> Result<(), AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<OAuthStateClaims>(
            state,
            &DecodingKey::from_secret(self.config.state_secret()),
            &validation,
        )
        .map_err(|e| {
            log::warn!("[OAuth2] state 검증 실패: {:?}", e.kind());
            AppError::Unauthorized("유효하지 않은 OAuth state".to_string())
        })?
        .claims;

        if claims.provider != provider {
            log::warn!("[OAuth2] state 프로바이더 불일치: expected={}, actual={}", provider, claims.provider);
            return Err(AppError::Unauthorized("유효하지 않은 OAuth state".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use crate::config::{AccountConfig, JwtConfig, OAuthClientRegistration, PasswordConfig, RedisKeyConfig};
    use crate::repositories::tokens::InMemoryRefreshTokenStore;
    use crate::repositories::users::{InMemoryOAuthAccountRepository, InMemoryUserRepository};
    use crate::services::auth::auth_session_service::AuthSessionService;
    use crate::services::auth::token_service::TokenCodec;
    use crate::services::users::password::BcryptPasswordVerifier;

    struct StubClient(Value);

    #[async_trait]
    impl OAuthClient for StubClient {
        async fn fetch_user_attributes(&self, _: OAuthProvider, _: &str, _: &str) -> Result<Value, AppError> {
            Ok(self.0.clone())
        }
    }

    fn oauth_config() -> OAuthConfig {
        let registration = |name: &str| OAuthClientRegistration {
            client_id: format!("{}-client", name),
            client_secret: "secret".to_string(),
            redirect_uri: format!("http://localhost:8080/api/v1/auth/oauth2/redirect/{}", name),
            scopes: "email profile".to_string(),
        };
        OAuthConfig::new("http://localhost:3000/oauth2/callback", "state-secret", 600)
            .with_registration(OAuthProvider::Google, registration("google"))
            .with_registration(OAuthProvider::Kakao, registration("kakao"))
    }

    fn service(attributes: Value) -> (OAuthLoginService, Arc<TokenCodec>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let accounts = Arc::new(InMemoryOAuthAccountRepository::new());
        let store = Arc::new(InMemoryRefreshTokenStore::new(
            RedisKeyConfig::default(),
            StdDuration::from_secs(1_209_600),
        ));
        let codec = Arc::new(TokenCodec::new(
            &JwtConfig::new("oauth-test-secret-oauth-test", 3600, 1_209_600).unwrap(),
        ));
        let sessions = Arc::new(AuthSessionService::new(
            users.clone(),
            store,
            codec.clone(),
            Arc::new(BcryptPasswordVerifier::new(PasswordConfig { bcrypt_cost: 4 })),
        ));
        let config = Arc::new(oauth_config());
        let linking = Arc::new(IdentityLinkingService::new(users, accounts, AccountConfig::default()));
        let completion = Arc::new(OAuthCompletionHandler::new(
            sessions,
            config.frontend_redirect_url.clone(),
        ));

        let service = OAuthLoginService::new(config, Arc::new(StubClient(attributes)), linking, completion);
        (service, codec)
    }

    fn state_from(url: &str) -> String {
        reqwest::Url::parse(url)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    fn google_attributes() -> Value {
        json!({ "sub": "1", "email": "a@b.com", "name": "A", "picture": "u" })
    }

    #[test]
    fn test_authorization_url_targets_provider_consent_screen() {
        let (service, _) = service(google_attributes());

        let url = service.authorization_url("google").unwrap();

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=google-client"));
        assert!(url.contains("response_type=code"));
        assert!(!state_from(&url).is_empty());
    }

    #[test]
    fn test_authorization_url_rejects_unknown_or_unregistered_provider() {
        let (service, _) = service(google_attributes());

        assert!(matches!(
            service.authorization_url("twitter"),
            Err(AppError::ConfigurationError(_))
        ));
        assert!(matches!(
            service.authorization_url("naver"),
            Err(AppError::ConfigurationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_complete_redirects_with_valid_tokens() {
        let (service, codec) = service(google_attributes());
        let state = state_from(&service.authorization_url("google").unwrap());

        let target = service
            .complete(
                "google",
                OAuthCallbackQuery {
                    code: Some("code".to_string()),
                    state: Some(state),
                    error: None,
                    error_description: None,
                },
            )
            .await
            .unwrap();

        let url = reqwest::Url::parse(&target).unwrap();
        assert_eq!(url.path(), "/oauth2/callback");
        let access_token = url
            .query_pairs()
            .find(|(k, _)| k == "access_token")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert!(codec.validate_token(&access_token));
    }

    #[actix_web::test]
    async fn test_complete_rejects_state_for_other_provider() {
        let (service, _) = service(google_attributes());
        let kakao_state = state_from(&service.authorization_url("kakao").unwrap());

        let result = service
            .complete(
                "google",
                OAuthCallbackQuery {
                    code: Some("code".to_string()),
                    state: Some(kakao_state),
                    error: None,
                    error_description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn test_complete_rejects_forged_state_and_provider_error() {
        let (service, _) = service(google_attributes());

        let forged = service
            .complete(
                "google",
                OAuthCallbackQuery {
                    code: Some("code".to_string()),
                    state: Some("forged".to_string()),
                    error: None,
                    error_description: None,
                },
            )
            .await;
        let denied = service
            .complete(
                "google",
                OAuthCallbackQuery {
                    code: None,
                    state: None,
                    error: Some("access_denied".to_string()),
                    error_description: None,
                },
            )
            .await;

        assert!(matches!(forged, Err(AppError::Unauthorized(_))));
        assert!(matches!(denied, Err(AppError::Unauthorized(_))));
    }
}
