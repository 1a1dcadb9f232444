//! # 계정 연결 서비스
//!
//! OAuth 로그인으로 들어온 정규화 신원을 로컬 사용자에 연결합니다.
//!
//! 1. 이메일로 사용자를 찾고, 없으면 고유 닉네임을 붙여 새로 만듭니다.
//! 2. `(user, provider)` 연결 행이 없으면 만듭니다.
//! 3. 마지막 로그인 시각을 갱신합니다.
//!
//! 같은 신원으로 몇 번을 호출해도 사용자와 연결 행은 하나씩만 남습니다.
//! 동시 호출의 중복 방지는 저장소의 유일성 제약에 맡기고,
//! 제약 위반(`ConflictError`)이 나면 다시 조회해서 이미 만들어진 행을 사용합니다.

use std::sync::Arc;

use crate::config::AccountConfig;
use crate::domain::entities::users::{OAuthAccount, User};
use crate::domain::models::oauth::CanonicalIdentity;
use crate::errors::errors::AppError;
use crate::repositories::users::{OAuthAccountRepository, UserRepository};

/// 사용자 생성이 유일성 충돌로 실패했을 때 다시 시도하는 횟수
const CREATE_ATTEMPTS: u32 = 3;

pub struct IdentityLinkingService {
    users: Arc<dyn UserRepository>,
    accounts: Arc<dyn OAuthAccountRepository>,
    config: AccountConfig,
}

impl IdentityLinkingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        accounts: Arc<dyn OAuthAccountRepository>,
        config: AccountConfig,
    ) -> Self {
        Self { users, accounts, config }
    }

    /// 정규화 신원에 해당하는 사용자를 찾거나 만들고, 프로바이더 계정을 연결합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::Unauthorized` - 이메일이 탈퇴한 계정의 것임
    /// * `AppError::NicknameUnavailable` - 닉네임 후보를 모두 소진함
    /// * `AppError::ConflictError` - 이 프로바이더 계정이 다른 사용자에게 이미 연결됨
    pub async fn link_or_create(&self, identity: &CanonicalIdentity) -> Result<User, AppError> {
        let mut user = self.find_or_create_user(identity).await?;
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장된 사용자에 ID가 없습니다".to_string()))?;

        self.ensure_linked(&user, identity).await?;

        self.users.update_last_login(&user_id).await?;
        user.mark_logged_in();

        log::info!(
            "[OAuth2] 로그인 처리 완료: userId={}, provider={}",
            user_id.to_hex(),
            identity.provider
        );
        Ok(user)
    }

    async fn find_or_create_user(&self, identity: &CanonicalIdentity) -> Result<User, AppError> {
        for attempt in 1..=CREATE_ATTEMPTS {
            if let Some(user) = self.users.find_by_email(&identity.email).await? {
                return Ok(user);
            }
            if self.users.exists_by_email(&identity.email).await? {
                log::warn!("[OAuth2] 탈퇴한 계정의 이메일로 로그인 시도: provider={}", identity.provider);
                return Err(AppError::Unauthorized("탈퇴한 계정입니다".to_string()));
            }

            let nickname = self.generate_unique_nickname(&identity.nickname).await?;
            let candidate = User::new_oauth(
                identity.email.clone(),
                nickname,
                identity.profile_image_url.clone(),
            );

            match self.users.create(candidate).await {
                Ok(user) => {
                    log::info!(
                        "[OAuth2] 신규 사용자 생성: userId={}, nickname={}",
                        user.id_string().unwrap_or_default(),
                        user.nickname
                    );
                    return Ok(user);
                }
                Err(AppError::ConflictError(reason)) => {
                    log::warn!(
                        "[OAuth2] 사용자 생성 충돌, 재조회 ({}/{}): {}",
                        attempt,
                        CREATE_ATTEMPTS,
                        reason
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::ConflictError(
            "사용자 생성 중 충돌이 반복되었습니다".to_string(),
        ))
    }

    async fn ensure_linked(&self, user: &User, identity: &CanonicalIdentity) -> Result<(), AppError> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::InternalError("저장된 사용자에 ID가 없습니다".to_string()))?;

        if self
            .accounts
            .exists_by_user_and_provider(&user_id, identity.provider)
            .await?
        {
            return Ok(());
        }

        let account = OAuthAccount::new(
            user_id,
            identity.provider,
            identity.provider_id.clone(),
            identity.email.clone(),
        );

        match self.accounts.create(account).await {
            Ok(_) => {
                log::info!(
                    "[OAuth2] OAuth 계정 연결: userId={}, provider={}",
                    user_id.to_hex(),
                    identity.provider
                );
                Ok(())
            }
            Err(AppError::ConflictError(_)) => {
                // 동시 요청이 같은 연결을 먼저 만든 경우
                if self
                    .accounts
                    .exists_by_user_and_provider(&user_id, identity.provider)
                    .await?
                {
                    return Ok(());
                }
                let owner = self
                    .accounts
                    .find_by_provider_and_provider_id(identity.provider, &identity.provider_id)
                    .await?;
                if let Some(owner) = owner {
                    log::warn!(
                        "[OAuth2] 프로바이더 계정 연결 충돌: provider={}, ownerUserId={}, requestUserId={}",
                        identity.provider,
                        owner.user_id.to_hex(),
                        user_id.to_hex()
                    );
                }
                Err(AppError::ConflictError(format!(
                    "이 {} 계정은 다른 사용자에게 연결되어 있습니다",
                    identity.provider
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// `base`, `base1`, `base2`, ... 순서로 사용 중이지 않은 첫 닉네임을 찾습니다.
    ///
    /// 최대 `nickname_max_probes`개의 후보만 확인합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NicknameUnavailable` - 모든 후보가 사용 중
    pub async fn generate_unique_nickname(&self, base: &str) -> Result<String, AppError> {
        for probe in 0..self.config.nickname_max_probes {
            let candidate = if probe == 0 {
                base.to_string()
            } else {
                format!("{}{}", base, probe)
            };

            if !self.users.exists_by_nickname(&candidate).await? {
                return Ok(candidate);
            }
        }

        log::warn!(
            "[OAuth2] 닉네임 후보 {}개 모두 사용 중: base={}",
            self.config.nickname_max_probes,
            base
        );
        Err(AppError::NicknameUnavailable(format!(
            "'{}'로 시작하는 사용 가능한 닉네임이 없습니다",
            base
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OAuthProvider;
    use crate::repositories::users::{InMemoryOAuthAccountRepository, InMemoryUserRepository};
    use mongodb::bson::oid::ObjectId;

    fn identity(email: &str, nickname: &str) -> CanonicalIdentity {
        CanonicalIdentity {
            provider: OAuthProvider::Google,
            provider_id: "google-1".to_string(),
            email: email.to_string(),
            nickname: nickname.to_string(),
            profile_image_url: Some("u".to_string()),
        }
    }

    fn service(
        max_probes: u32,
    ) -> (
        IdentityLinkingService,
        Arc<InMemoryUserRepository>,
        Arc<InMemoryOAuthAccountRepository>,
    ) {
        let users = Arc::new(InMemoryUserRepository::new());
        let accounts = Arc::new(InMemoryOAuthAccountRepository::new());
        let service = IdentityLinkingService::new(
            users.clone(),
            accounts.clone(),
            AccountConfig { nickname_max_probes: max_probes },
        );
        (service, users, accounts)
    }

    async fn seed_nickname(users: &InMemoryUserRepository, nickname: &str) {
        users
            .create(User::new_oauth(format!("{}@seed.com", nickname), nickname.to_string(), None))
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn test_generate_unique_nickname_skips_taken_values() {
        let (service, users, _) = service(100);
        seed_nickname(&users, "Tom").await;
        seed_nickname(&users, "Tom1").await;

        assert_eq!(service.generate_unique_nickname("Tom").await.unwrap(), "Tom2");
        assert_eq!(service.generate_unique_nickname("Jerry").await.unwrap(), "Jerry");
    }

    #[actix_web::test]
    async fn test_generate_unique_nickname_is_bounded() {
        let (service, users, _) = service(2);
        seed_nickname(&users, "Tom").await;
        seed_nickname(&users, "Tom1").await;

        let result = service.generate_unique_nickname("Tom").await;
        assert!(matches!(result, Err(AppError::NicknameUnavailable(_))));
    }

    #[actix_web::test]
    async fn test_link_or_create_creates_verified_user_and_link() {
        let (service, users, accounts) = service(100);

        let user = service.link_or_create(&identity("a@b.com", "A")).await.unwrap();

        assert!(user.email_verified);
        assert!(user.password_hash.is_none());
        assert!(user.last_login_at.is_some());
        assert_eq!(user.nickname, "A");
        assert_eq!(users.count(), 1);
        assert_eq!(accounts.count(), 1);
    }

    #[actix_web::test]
    async fn test_link_or_create_is_idempotent() {
        let (service, users, accounts) = service(100);

        let first = service.link_or_create(&identity("a@b.com", "A")).await.unwrap();
        let second = service.link_or_create(&identity("a@b.com", "A")).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(users.count(), 1);
        assert_eq!(accounts.count(), 1);
    }

    #[actix_web::test]
    async fn test_existing_local_user_gets_linked_by_email() {
        let (service, users, accounts) = service(100);
        let local = users
            .create(User::new_local("a@b.com".to_string(), "local".to_string(), "hash".to_string()))
            .await
            .unwrap();

        let linked = service.link_or_create(&identity("a@b.com", "A")).await.unwrap();

        assert_eq!(linked.id, local.id);
        assert_eq!(linked.nickname, "local");
        assert!(accounts
            .exists_by_user_and_provider(&local.id.unwrap(), OAuthProvider::Google)
            .await
            .unwrap());
    }

    #[actix_web::test]
    async fn test_provider_account_bound_to_other_user_is_conflict() {
        let (service, _, accounts) = service(100);
        let owner = ObjectId::new();
        accounts
            .create(OAuthAccount::new(
                owner,
                OAuthProvider::Google,
                "google-1".to_string(),
                "other@b.com".to_string(),
            ))
            .await
            .unwrap();

        let result = service.link_or_create(&identity("a@b.com", "A")).await;
        assert!(matches!(result, Err(AppError::ConflictError(_))));

        let link = accounts
            .find_by_provider_and_provider_id(OAuthProvider::Google, "google-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(link.user_id, owner);
        assert_eq!(accounts.count(), 1);
    }

    #[actix_web::test]
    async fn test_withdrawn_email_is_rejected_without_creating_user() {
        let (service, users, accounts) = service(100);
        let mut withdrawn = User::new_oauth("gone@b.com".to_string(), "Gone".to_string(), None);
        withdrawn.deleted_at = Some(mongodb::bson::DateTime::now());
        users.create(withdrawn).await.unwrap();

        let result = service.link_or_create(&identity("gone@b.com", "Back")).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
        assert_eq!(users.count(), 1);
        assert_eq!(accounts.count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_link_or_create_yields_single_rows() {
        let (service, users, accounts) = service(100);
        let service = Arc::new(service);

        let calls = (0..8).map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.link_or_create(&identity("new@b.com", "New")).await })
        });
        let results = futures_util::future::join_all(calls).await;

        let ids: Vec<_> = results
            .into_iter()
            .map(|joined| joined.unwrap().unwrap().id)
            .collect();
        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(users.count(), 1);
        assert_eq!(accounts.count(), 1);
    }
}
