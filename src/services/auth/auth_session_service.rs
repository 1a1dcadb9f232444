//! # 인증 세션 서비스
//!
//! 로그인, 토큰 갱신, 로그아웃을 조율하고 토큰 쌍을 발급합니다.
//!
//! ## 리프레시 토큰 회전
//!
//! 갱신 요청마다 새 리프레시 토큰을 발급하고 저장소 값을 교체합니다.
//! 교체는 "저장된 값이 제시된 토큰과 같을 때만" 일어나는 원자적 연산이므로,
//! 같은 토큰으로 동시에 들어온 두 요청 중 하나만 성공합니다.
//! 이미 교체된 토큰은 서명과 만료가 유효해도 거부됩니다.

use std::sync::Arc;

use crate::domain::entities::users::User;
use crate::domain::models::token::TokenPair;
use crate::errors::errors::AppError;
use crate::repositories::tokens::RefreshTokenStore;
use crate::repositories::users::UserRepository;
use crate::services::auth::token_service::TokenCodec;
use crate::services::users::password::PasswordVerifier;

const INVALID_CREDENTIALS: &str = "이메일 또는 비밀번호가 올바르지 않습니다";
const INVALID_REFRESH_TOKEN: &str = "유효하지 않은 리프레시 토큰입니다";

pub struct AuthSessionService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    codec: Arc<TokenCodec>,
    passwords: Arc<dyn PasswordVerifier>,
}

impl AuthSessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        codec: Arc<TokenCodec>,
        passwords: Arc<dyn PasswordVerifier>,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            codec,
            passwords,
        }
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 없는 사용자, 비밀번호 불일치, 비밀번호가 없는 OAuth 전용 계정은
    /// 모두 같은 `Unauthorized`로 실패합니다. 세 경우 모두 해시 검증을 한 번 수행합니다.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let user = self.users.find_by_email(email).await?;

        let stored_hash = user.as_ref().and_then(|user| user.password_hash.as_deref());
        let has_password = stored_hash.is_some();
        let verified = self
            .passwords
            .verify(password, stored_hash.unwrap_or_else(|| self.passwords.placeholder_hash()));

        let user = match user {
            Some(user) if verified && has_password => user,
            _ => {
                log::info!("[AUTH] 로그인 실패");
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장된 사용자에 ID가 없습니다".to_string()))?;
        self.users.update_last_login(&user_id).await?;

        let pair = self.issue_token_pair(&user).await?;
        log::info!("[AUTH] 로그인 성공: userId={}", user_id.to_hex());
        Ok(pair)
    }

    /// 리프레시 토큰으로 새 토큰 쌍을 발급하고 저장된 토큰을 교체합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` - 서명/만료 검증 실패, 액세스 토큰을 제시함,
    ///   사용자 없음, 이미 교체되었거나 로그아웃된 토큰
    /// * `AppError::StoreUnavailable` - 저장소 접근 실패
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self
            .codec
            .get_claims(refresh_token)
            .filter(|claims| claims.role.is_none())
            .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH_TOKEN.to_string()))?;
        let user_id = claims.sub;

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH_TOKEN.to_string()))?;

        let pair = self.create_token_pair(&user_id, &user)?;

        let rotated = self
            .refresh_tokens
            .rotate(&user_id, refresh_token, &pair.refresh_token)
            .await?;
        if !rotated {
            log::warn!("[AUTH] 교체되었거나 폐기된 리프레시 토큰 사용: userId={}", user_id);
            return Err(AppError::Unauthorized(INVALID_REFRESH_TOKEN.to_string()));
        }

        log::info!("[AUTH] 토큰 갱신: userId={}", user_id);
        Ok(pair)
    }

    /// 저장된 리프레시 토큰을 삭제합니다. 여러 번 호출해도 안전합니다.
    pub async fn logout(&self, user_id: &str) -> Result<(), AppError> {
        self.refresh_tokens.delete(user_id).await?;
        log::info!("[AUTH] 로그아웃: userId={}", user_id);
        Ok(())
    }

    /// 토큰 쌍을 발급하고 리프레시 토큰을 저장합니다 (이전 토큰은 덮어씀).
    pub async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("저장된 사용자에 ID가 없습니다".to_string()))?;

        let pair = self.create_token_pair(&user_id, user)?;
        self.refresh_tokens.save(&user_id, &pair.refresh_token).await?;
        Ok(pair)
    }

    fn create_token_pair(&self, user_id: &str, user: &User) -> Result<TokenPair, AppError> {
        Ok(TokenPair {
            access_token: self.codec.create_access_token(user_id, &user.email, user.role)?,
            refresh_token: self.codec.create_refresh_token(user_id)?,
            expires_in: self.codec.access_token_validity_secs(),
        })
    }
}
