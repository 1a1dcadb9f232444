//! # Authentication Configuration Module
//!
//! JWT 토큰, 리프레시 토큰 저장소 키, OAuth 프로바이더 등록 정보 등
//! 인증 관련 설정을 관리하는 모듈입니다.
//!
//! 원본 Spring 애플리케이션의 `jwt.*`, `redis.key-prefix.*`, `app.oauth2.*`
//! 프로퍼티가 이 모듈의 구조체로 대응됩니다.
//!
//! | Spring 프로퍼티 | 이 모듈 |
//! |-----------------|---------|
//! | `jwt.secret`, `jwt.access-token-validity` | [`JwtConfig`] |
//! | `redis.key-prefix.refresh-token` | [`RedisKeyConfig`] |
//! | `app.oauth2.redirect-url` | [`OAuthConfig::frontend_redirect_url`] |
//! | `spring.security.oauth2.client.registration.*` | [`OAuthClientRegistration`] |
//!
//! ## 필수 환경 변수 설정
//!
//! ### JWT 토큰 설정
//! ```bash
//! export JWT_SECRET="at-least-32-bytes-of-random-secret-material"
//! export JWT_ACCESS_TOKEN_VALIDITY_SECONDS="3600"
//! export JWT_REFRESH_TOKEN_VALIDITY_SECONDS="1209600"
//! ```
//!
//! ### OAuth 설정
//! ```bash
//! export OAUTH2_REDIRECT_URL="https://community.example.com/oauth2/callback"
//! export OAUTH_STATE_SECRET="your-oauth-state-secret"
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export GOOGLE_REDIRECT_URI="https://api.example.com/api/v1/auth/oauth2/redirect/google"
//! ```
//!
//! 설정값은 시작 시 한 번 읽혀 소유된 값으로 서비스에 주입됩니다.
//! 요청 처리 중에는 환경 변수를 다시 읽지 않습니다.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::data_config::Environment;
use crate::errors::errors::AppError;

const DEV_JWT_SECRET: &str = "community-auth-development-secret-do-not-use-in-prod";
const DEV_OAUTH_STATE_SECRET: &str = "community-auth-development-oauth-state-secret";

/// 환경 변수를 읽어 파싱합니다. 없거나 파싱에 실패하면 기본값을 사용합니다.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{} 파싱 실패, 기본값 사용", key);
            default
        }),
        Err(_) => default,
    }
}

/// 개발/테스트 환경에서만 기본값을 허용하는 비밀값 로더
fn secret_from_env(key: &str, dev_default: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => match Environment::current() {
            Environment::Development | Environment::Test => {
                log::warn!("{} not set, using development default (not secure for production!)", key);
                Ok(dev_default.to_string())
            }
            env => Err(AppError::ConfigurationError(format!(
                "{} must be set in {:?} environment",
                key, env
            ))),
        },
    }
}

/// JWT 토큰 서명 및 유효기간 설정
///
/// 프로세스 전역에서 하나의 대칭키(HS256)를 사용합니다.
/// 리프레시 토큰 유효기간은 항상 액세스 토큰 유효기간보다 깁니다.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    access_token_validity_secs: i64,
    refresh_token_validity_secs: i64,
}

impl JwtConfig {
    /// 설정값을 검증하여 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 빈 비밀키, 0 이하의 유효기간,
    ///   액세스 토큰보다 짧거나 같은 리프레시 토큰 유효기간
    pub fn new(
        secret: impl Into<String>,
        access_token_validity_secs: i64,
        refresh_token_validity_secs: i64,
    ) -> Result<Self, AppError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AppError::ConfigurationError("JWT secret must not be empty".to_string()));
        }
        if access_token_validity_secs <= 0 {
            return Err(AppError::ConfigurationError(
                "access token validity must be positive".to_string(),
            ));
        }
        if refresh_token_validity_secs <= access_token_validity_secs {
            return Err(AppError::ConfigurationError(
                "refresh token validity must exceed access token validity".to_string(),
            ));
        }

        Ok(Self {
            secret,
            access_token_validity_secs,
            refresh_token_validity_secs,
        })
    }

    /// 환경 변수에서 JWT 설정을 읽습니다.
    ///
    /// * `JWT_SECRET` - 서명 키 (운영 환경에서는 필수)
    /// * `JWT_ACCESS_TOKEN_VALIDITY_SECONDS` - 기본값 3600 (1시간)
    /// * `JWT_REFRESH_TOKEN_VALIDITY_SECONDS` - 기본값 1209600 (14일)
    pub fn from_env() -> Result<Self, AppError> {
        let secret = secret_from_env("JWT_SECRET", DEV_JWT_SECRET)?;
        let access = env_or("JWT_ACCESS_TOKEN_VALIDITY_SECONDS", 3600_i64);
        let refresh = env_or("JWT_REFRESH_TOKEN_VALIDITY_SECONDS", 1_209_600_i64);
        Self::new(secret, access, refresh)
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn access_token_validity_secs(&self) -> i64 {
        self.access_token_validity_secs
    }

    pub fn refresh_token_validity_secs(&self) -> i64 {
        self.refresh_token_validity_secs
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_validity_secs", &self.access_token_validity_secs)
            .field("refresh_token_validity_secs", &self.refresh_token_validity_secs)
            .finish()
    }
}

/// Redis 키 프리픽스 설정
///
/// 리프레시 토큰은 `{prefix}refresh_token:{userId}` 키에 저장됩니다.
#[derive(Debug, Clone, Default)]
pub struct RedisKeyConfig {
    pub prefix: String,
}

impl RedisKeyConfig {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn from_env() -> Self {
        Self::new(env::var("REDIS_KEY_PREFIX").unwrap_or_default())
    }

    /// 사용자별 리프레시 토큰 키
    pub fn refresh_token_key(&self, user_id: &str) -> String {
        format!("{}refresh_token:{}", self.prefix, user_id)
    }
}

/// 계정 생성 관련 설정
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// 닉네임 중복 시 시도할 최대 후보 수 (`base`, `base1`, ... 포함)
    pub nickname_max_probes: u32,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self { nickname_max_probes: 100 }
    }
}

impl AccountConfig {
    pub fn from_env() -> Self {
        Self {
            nickname_max_probes: env_or("NICKNAME_MAX_PROBES", 100_u32).max(1),
        }
    }
}

/// 지원하는 외부 OAuth 프로바이더
///
/// 닫힌 집합입니다. 프로바이더 이름 문자열은 OAuth 등록 ID(`google`, `kakao`, `naver`)와
/// 동일하며, 알 수 없는 이름은 기본값으로 대체되지 않고 설정 오류로 처리됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Kakao,
    Naver,
}

impl OAuthProvider {
    pub const ALL: [OAuthProvider; 3] = [OAuthProvider::Google, OAuthProvider::Kakao, OAuthProvider::Naver];

    /// 등록 ID로부터 프로바이더를 찾습니다 (대소문자 무관).
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 지원하지 않는 프로바이더 이름
    ///
    /// # 예제
    ///
    /// ```rust,ignore
    /// let provider = OAuthProvider::from_registration_id("Kakao")?;
    /// assert_eq!(provider, OAuthProvider::Kakao);
    /// assert!(OAuthProvider::from_registration_id("twitter").is_err());
    /// ```
    pub fn from_registration_id(s: &str) -> Result<Self, AppError> {
        match s.to_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "kakao" => Ok(OAuthProvider::Kakao),
            "naver" => Ok(OAuthProvider::Naver),
            _ => Err(AppError::ConfigurationError(format!(
                "지원하지 않는 OAuth Provider입니다: {}",
                s
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Kakao => "kakao",
            OAuthProvider::Naver => "naver",
        }
    }

    fn env_prefix(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "GOOGLE",
            OAuthProvider::Kakao => "KAKAO",
            OAuthProvider::Naver => "NAVER",
        }
    }

    /// 동의 화면(authorization endpoint) URI
    pub fn authorization_uri(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://accounts.google.com/o/oauth2/v2/auth",
            OAuthProvider::Kakao => "https://kauth.kakao.com/oauth/authorize",
            OAuthProvider::Naver => "https://nid.naver.com/oauth2.0/authorize",
        }
    }

    /// Authorization code 교환 endpoint
    pub fn token_uri(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://oauth2.googleapis.com/token",
            OAuthProvider::Kakao => "https://kauth.kakao.com/oauth/token",
            OAuthProvider::Naver => "https://nid.naver.com/oauth2.0/token",
        }
    }

    /// 사용자 속성 조회 endpoint
    pub fn user_info_uri(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "https://openidconnect.googleapis.com/v1/userinfo",
            OAuthProvider::Kakao => "https://kapi.kakao.com/v2/user/me",
            OAuthProvider::Naver => "https://openapi.naver.com/v1/nid/me",
        }
    }

    pub fn default_scopes(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "openid email profile",
            OAuthProvider::Kakao => "profile_nickname profile_image account_email",
            OAuthProvider::Naver => "name email profile_image",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 프로바이더별 OAuth 클라이언트 등록 정보
#[derive(Clone)]
pub struct OAuthClientRegistration {
    pub client_id: String,
    pub client_secret: String,
    /// 프로바이더가 authorization code를 돌려줄 백엔드 콜백 URI
    pub redirect_uri: String,
    pub scopes: String,
}

impl fmt::Debug for OAuthClientRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClientRegistration")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// OAuth 로그인 흐름 설정
#[derive(Clone)]
pub struct OAuthConfig {
    /// 로그인 성공 후 토큰을 쿼리 파라미터로 붙여 리다이렉트할 프론트엔드 URL
    pub frontend_redirect_url: String,
    state_secret: String,
    /// `state` 파라미터 유효기간 (초)
    pub state_ttl_secs: i64,
    registrations: HashMap<OAuthProvider, OAuthClientRegistration>,
}

impl OAuthConfig {
    pub fn new(
        frontend_redirect_url: impl Into<String>,
        state_secret: impl Into<String>,
        state_ttl_secs: i64,
    ) -> Self {
        Self {
            frontend_redirect_url: frontend_redirect_url.into(),
            state_secret: state_secret.into(),
            state_ttl_secs,
            registrations: HashMap::new(),
        }
    }

    pub fn with_registration(mut self, provider: OAuthProvider, registration: OAuthClientRegistration) -> Self {
        self.registrations.insert(provider, registration);
        self
    }

    /// 환경 변수에서 OAuth 설정을 읽습니다.
    ///
    /// `{GOOGLE|KAKAO|NAVER}_CLIENT_ID`가 설정된 프로바이더만 등록됩니다.
    pub fn from_env() -> Result<Self, AppError> {
        let frontend_redirect_url = env::var("OAUTH2_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/oauth2/callback".to_string());
        let state_secret = secret_from_env("OAUTH_STATE_SECRET", DEV_OAUTH_STATE_SECRET)?;
        let state_ttl_secs = env_or("OAUTH_STATE_TTL_SECONDS", 600_i64);

        let mut config = Self::new(frontend_redirect_url, state_secret, state_ttl_secs);

        for provider in OAuthProvider::ALL {
            let prefix = provider.env_prefix();
            let Ok(client_id) = env::var(format!("{}_CLIENT_ID", prefix)) else {
                log::info!("[OAuth2] {} 클라이언트 미등록 (CLIENT_ID 없음)", provider);
                continue;
            };
            let client_secret = env::var(format!("{}_CLIENT_SECRET", prefix)).map_err(|_| {
                AppError::ConfigurationError(format!("{}_CLIENT_SECRET must be set", prefix))
            })?;
            let redirect_uri = env::var(format!("{}_REDIRECT_URI", prefix)).map_err(|_| {
                AppError::ConfigurationError(format!("{}_REDIRECT_URI must be set", prefix))
            })?;
            let scopes = env::var(format!("{}_SCOPES", prefix))
                .unwrap_or_else(|_| provider.default_scopes().to_string());

            config = config.with_registration(
                provider,
                OAuthClientRegistration {
                    client_id,
                    client_secret,
                    redirect_uri,
                    scopes,
                },
            );
        }

        Ok(config)
    }

    pub fn state_secret(&self) -> &[u8] {
        self.state_secret.as_bytes()
    }

    /// 프로바이더 등록 정보를 조회합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConfigurationError` - 해당 프로바이더의 클라이언트가 등록되지 않음
    pub fn registration(&self, provider: OAuthProvider) -> Result<&OAuthClientRegistration, AppError> {
        self.registrations.get(&provider).ok_or_else(|| {
            AppError::ConfigurationError(format!("OAuth client for {} is not registered", provider))
        })
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("frontend_redirect_url", &self.frontend_redirect_url)
            .field("state_secret", &"<redacted>")
            .field("state_ttl_secs", &self.state_ttl_secs)
            .field("registrations", &self.registrations)
            .finish()
    }
}
