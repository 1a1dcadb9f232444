//! # AppContext - 구성 요소 조립
//!
//! 서비스는 저장소 트레이트 객체(`Arc<dyn ...>`)만 알고, 어떤 백엔드를 쓸지는 여기서 정합니다.
//!
//! ```text
//! AppContext
//!  ├─ UserRepository        (MongoDB | 메모리)
//!  ├─ TokenCodec            (JwtConfig)
//!  ├─ AuthSessionService    (UserRepository, RefreshTokenStore, TokenCodec, PasswordVerifier)
//!  └─ OAuthLoginService     (OAuthConfig, OAuthClient,
//!                            IdentityLinkingService, OAuthCompletionHandler)
//! ```
//!
//! | 생성자 | 사용자/연결 계정 | 리프레시 토큰 |
//! |--------|------------------|---------------|
//! | [`AppContext::connect`] | MongoDB | Redis |
//! | [`AppContext::in_memory`] | 메모리 | 메모리 |
//!
//! ```rust,ignore
//! let context = AppContext::connect(AppSettings::from_env()?).await?;
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .wrap(context.authentication_filter())
//!         .configure(|cfg| context.register(cfg))
//!         .configure(configure_all_routes)
//! })
//! ```

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;

use crate::caching::redis::RedisClient;
use crate::config::{
    AccountConfig, DataStoreConfig, JwtConfig, OAuthConfig, OAuthProvider, PasswordConfig, RedisKeyConfig,
};
use crate::db::Database;
use crate::errors::errors::AppError;
use crate::middlewares::AuthenticationFilter;
use crate::repositories::tokens::{InMemoryRefreshTokenStore, RedisRefreshTokenStore, RefreshTokenStore};
use crate::repositories::users::{
    InMemoryOAuthAccountRepository, InMemoryUserRepository, MongoOAuthAccountRepository, MongoUserRepository,
    OAuthAccountRepository, UserRepository,
};
use crate::services::auth::{
    AuthSessionService, IdentityLinkingService, OAuthClient, OAuthCompletionHandler, OAuthLoginService,
    ReqwestOAuthClient, TokenCodec,
};
use crate::services::users::{BcryptPasswordVerifier, PasswordVerifier};
use crate::utils::display_terminal::{print_boxed_title, print_context_summary, print_step, print_sub_task};

/// 인증 코어가 필요로 하는 설정 묶음
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub jwt: JwtConfig,
    pub redis_keys: RedisKeyConfig,
    pub account: AccountConfig,
    pub password: PasswordConfig,
    pub oauth: OAuthConfig,
    pub data_store: DataStoreConfig,
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            jwt: JwtConfig::from_env()?,
            redis_keys: RedisKeyConfig::from_env(),
            account: AccountConfig::from_env(),
            password: PasswordConfig::from_env(),
            oauth: OAuthConfig::from_env()?,
            data_store: DataStoreConfig::from_env(),
        })
    }
}

/// 조립된 애플리케이션 구성 요소
#[derive(Clone)]
pub struct AppContext {
    /// 세션 서비스와 OAuth 연결 서비스가 함께 쓰는 사용자 저장소
    pub users: Arc<dyn UserRepository>,
    pub codec: Arc<TokenCodec>,
    pub sessions: Arc<AuthSessionService>,
    pub oauth: Arc<OAuthLoginService>,
}

struct Backends {
    users: Arc<dyn UserRepository>,
    accounts: Arc<dyn OAuthAccountRepository>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl AppContext {
    /// MongoDB와 Redis에 연결하고 운영용 구성 요소를 조립합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::DatabaseError` - MongoDB 연결 또는 인덱스 생성 실패
    /// * `AppError::StoreUnavailable` - Redis 연결 실패
    pub async fn connect(settings: AppSettings) -> Result<Self, AppError> {
        print_boxed_title("COMMUNITY AUTH");

        print_step(1, "데이터 스토어 연결");
        let database = Arc::new(
            Database::new(&settings.data_store.mongodb_uri, &settings.data_store.database_name)
                .await
                .map_err(|e| AppError::DatabaseError(format!("MongoDB 연결 실패: {}", e)))?,
        );
        database
            .ensure_indexes()
            .await
            .map_err(|e| AppError::DatabaseError(format!("인덱스 생성 실패: {}", e)))?;
        print_sub_task("MongoDB", database.database_name());

        let redis = Arc::new(
            RedisClient::new(&settings.data_store.redis_url)
                .await
                .map_err(|e| AppError::StoreUnavailable(format!("Redis 연결 실패: {}", e)))?,
        );
        print_sub_task("Redis", "connected");

        let refresh_ttl = ttl_secs(settings.jwt.refresh_token_validity_secs());
        let backends = Backends {
            users: Arc::new(MongoUserRepository::new(database.clone())),
            accounts: Arc::new(MongoOAuthAccountRepository::new(database)),
            refresh_tokens: Arc::new(RedisRefreshTokenStore::new(
                redis,
                settings.redis_keys.clone(),
                refresh_ttl,
            )),
        };

        let client: Arc<dyn OAuthClient> = Arc::new(ReqwestOAuthClient::new(Arc::new(settings.oauth.clone())));
        let context = Self::assemble(settings.clone(), backends, client);
        print_context_summary("MongoDB + Redis", &registered_providers(&settings.oauth));

        Ok(context)
    }

    /// 메모리 백엔드로 조립합니다. 테스트와 외부 저장소 없는 로컬 실행용입니다.
    pub fn in_memory(settings: AppSettings, client: Arc<dyn OAuthClient>) -> Self {
        let refresh_ttl = ttl_secs(settings.jwt.refresh_token_validity_secs());
        let backends = Backends {
            users: Arc::new(InMemoryUserRepository::new()),
            accounts: Arc::new(InMemoryOAuthAccountRepository::new()),
            refresh_tokens: Arc::new(InMemoryRefreshTokenStore::new(
                settings.redis_keys.clone(),
                Duration::from_secs(refresh_ttl),
            )),
        };

        Self::assemble(settings, backends, client)
    }

    fn assemble(settings: AppSettings, backends: Backends, client: Arc<dyn OAuthClient>) -> Self {
        print_step(2, "서비스 조립");

        let codec = Arc::new(TokenCodec::new(&settings.jwt));
        let passwords: Arc<dyn PasswordVerifier> = Arc::new(BcryptPasswordVerifier::new(settings.password));

        let sessions = Arc::new(AuthSessionService::new(
            backends.users.clone(),
            backends.refresh_tokens,
            codec.clone(),
            passwords,
        ));
        print_sub_task("AuthSessionService", "ready");

        let linking = Arc::new(IdentityLinkingService::new(
            backends.users.clone(),
            backends.accounts,
            settings.account,
        ));
        let completion = Arc::new(OAuthCompletionHandler::new(
            sessions.clone(),
            settings.oauth.frontend_redirect_url.clone(),
        ));
        let oauth = Arc::new(OAuthLoginService::new(
            Arc::new(settings.oauth),
            client,
            linking,
            completion,
        ));
        print_sub_task("OAuthLoginService", "ready");

        Self {
            users: backends.users,
            codec,
            sessions,
            oauth,
        }
    }

    /// 핸들러가 추출할 서비스들을 `web::Data`로 등록합니다.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.sessions.clone()))
            .app_data(web::Data::from(self.oauth.clone()));
    }

    pub fn authentication_filter(&self) -> AuthenticationFilter {
        AuthenticationFilter::new(self.codec.clone())
    }
}

fn ttl_secs(validity_secs: i64) -> u64 {
    u64::try_from(validity_secs).unwrap_or(0)
}

fn registered_providers(config: &OAuthConfig) -> Vec<String> {
    OAuthProvider::ALL
        .iter()
        .filter(|provider| config.registration(**provider).is_ok())
        .map(|provider| provider.to_string())
        .collect()
}
