//! # JWT 토큰 코덱
//!
//! 액세스 토큰과 리프레시 토큰의 서명, 검증, 파싱을 담당합니다.
//! 프로세스 전역의 HS256 대칭키 하나를 사용합니다.
//!
//! ## 토큰 구성
//!
//! | 토큰 | 클레임 | 유효기간 |
//! |------|--------|----------|
//! | 액세스 | `sub`, `email`, `role`, `iat`, `exp` | `JWT_ACCESS_TOKEN_VALIDITY_SECONDS` |
//! | 리프레시 | `sub`, `jti`, `iat`, `exp` | `JWT_REFRESH_TOKEN_VALIDITY_SECONDS` |
//!
//! ## 검증 규칙
//!
//! [`TokenCodec::validate_token`]은 에러를 던지지 않고 `bool`만 돌려줍니다.
//! 구조 오류, 서명 불일치, 만료, 다른 키로 서명된 토큰은 모두 같은 `false`입니다.
//! 만료 판정에는 여유 시간(leeway)을 두지 않습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::domain::entities::users::Role;
use crate::domain::models::token::{AccessClaims, RefreshClaims, TokenClaims};
use crate::errors::errors::{AppError, ErrorContext};

const BEARER_PREFIX: &str = "Bearer ";

/// JWT 토큰 코덱
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_validity_secs: i64,
    refresh_token_validity_secs: i64,
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validation,
            access_token_validity_secs: config.access_token_validity_secs(),
            refresh_token_validity_secs: config.refresh_token_validity_secs(),
        }
    }

    /// 액세스 토큰 유효기간 (초). 토큰 응답의 `expiresIn`
    pub fn access_token_validity_secs(&self) -> i64 {
        self.access_token_validity_secs
    }

    pub fn refresh_token_validity_secs(&self) -> i64 {
        self.refresh_token_validity_secs
    }

    /// 액세스 토큰을 생성합니다.
    ///
    /// # 예제
    ///
    /// ```rust,ignore
    /// let token = codec.create_access_token("665f...", "a@b.com", Role::User)?;
    /// assert!(codec.validate_token(&token));
    /// ```
    pub fn create_access_token(&self, user_id: &str, email: &str, role: Role) -> Result<String, AppError> {
        self.create_access_token_at(user_id, email, role, Utc::now())
    }

    /// 지정한 시각에 발급된 것으로 액세스 토큰을 생성합니다.
    pub fn create_access_token_at(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let expires_at = issued_at + Duration::seconds(self.access_token_validity_secs);
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).context("JWT 토큰 생성 실패")
    }

    /// 리프레시 토큰을 생성합니다. 주체와 고유 ID(`jti`)만 담습니다.
    pub fn create_refresh_token(&self, user_id: &str) -> Result<String, AppError> {
        self.create_refresh_token_at(user_id, Utc::now())
    }

    pub fn create_refresh_token_at(&self, user_id: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = issued_at + Duration::seconds(self.refresh_token_validity_secs);
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).context("리프레시 토큰 생성 실패")
    }

    /// 서명과 만료 시간을 검증합니다. 어떤 실패도 `false`로 접힙니다.
    pub fn validate_token(&self, token: &str) -> bool {
        self.get_claims(token).is_some()
    }

    /// 검증된 토큰의 클레임을 돌려줍니다. 검증에 실패하면 `None`
    pub fn get_claims(&self, token: &str) -> Option<TokenClaims> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                log::debug!("[AUTH] 토큰 검증 실패: {:?}", e.kind());
                None
            }
        }
    }

    /// 토큰의 주체(사용자 ID)를 꺼냅니다.
    ///
    /// 호출 전에 [`TokenCodec::validate_token`]으로 검증해야 합니다.
    /// 검증되지 않는 토큰이 들어오면 `AppError::Unauthorized`를 돌려줍니다.
    pub fn get_user_id_from_token(&self, token: &str) -> Result<String, AppError> {
        self.get_claims(token)
            .map(|claims| claims.sub)
            .ok_or_else(|| AppError::Unauthorized("유효하지 않은 토큰입니다".to_string()))
    }

    /// `Authorization` 헤더 값에서 Bearer 토큰을 꺼냅니다.
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        auth_header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec_with(secret: &str) -> TokenCodec {
        TokenCodec::new(&JwtConfig::new(secret, 3600, 1_209_600).unwrap())
    }

    fn codec() -> TokenCodec {
        codec_with("test-secret-test-secret-test-secret")
    }

    #[test]
    fn test_access_token_roundtrip_recovers_user_id_and_role() {
        let codec = codec();
        let token = codec.create_access_token("user-1", "a@b.com", Role::Admin).unwrap();

        assert!(codec.validate_token(&token));
        assert_eq!(codec.get_user_id_from_token(&token).unwrap(), "user-1");

        let claims = codec.get_claims(&token).unwrap();
        assert_eq!(claims.role.as_deref(), Some("ADMIN"));
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_flipped_signature_byte_is_invalid() {
        let codec = codec();
        let token = codec.create_access_token("user-1", "a@b.com", Role::User).unwrap();

        let (head, signature) = token.rsplit_once('.').unwrap();
        let mut sig: Vec<char> = signature.chars().collect();
        sig[5] = if sig[5] == 'a' { 'b' } else { 'a' };
        let tampered = format!("{}.{}", head, sig.into_iter().collect::<String>());

        assert!(!codec.validate_token(&tampered));
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let codec = codec();
        let issued_at = Utc::now() - Duration::seconds(2 * 3600);
        let token = codec
            .create_access_token_at("user-1", "a@b.com", Role::User, issued_at)
            .unwrap();

        assert!(!codec.validate_token(&token));
        assert!(codec.get_user_id_from_token(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_key_is_invalid() {
        let token = codec_with("another-secret-another-secret")
            .create_access_token("user-1", "a@b.com", Role::User)
            .unwrap();

        assert!(!codec().validate_token(&token));
    }

    #[test]
    fn test_garbage_string_is_invalid() {
        let codec = codec();
        assert!(!codec.validate_token("not-a-token"));
        assert!(!codec.validate_token(""));
        assert!(!codec.validate_token("a.b.c"));
    }

    #[test]
    fn test_refresh_tokens_are_unique_and_carry_no_role() {
        let codec = codec();
        let first = codec.create_refresh_token("user-1").unwrap();
        let second = codec.create_refresh_token("user-1").unwrap();

        assert_ne!(first, second);
        assert!(codec.validate_token(&first));

        let claims = codec.get_claims(&first).unwrap();
        assert!(claims.role.is_none());
        assert!(claims.jti.is_some());
        assert_eq!(claims.exp - claims.iat, 1_209_600);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(TokenCodec::extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(TokenCodec::extract_bearer_token("Basic abc"), None);
        assert_eq!(TokenCodec::extract_bearer_token("Bearer "), None);
    }
}
