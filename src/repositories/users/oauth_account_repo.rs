//! OAuth 계정 연결 리포지토리

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Collection;

use crate::config::OAuthProvider;
use crate::db::{Database, OAUTH_ACCOUNTS_COLLECTION};
use crate::domain::entities::users::OAuthAccount;
use crate::errors::errors::AppError;
use crate::repositories::map_write_error;

#[async_trait]
pub trait OAuthAccountRepository: Send + Sync {
    async fn exists_by_user_and_provider(
        &self,
        user_id: &ObjectId,
        provider: OAuthProvider,
    ) -> Result<bool, AppError>;

    async fn find_by_provider_and_provider_id(
        &self,
        provider: OAuthProvider,
        provider_id: &str,
    ) -> Result<Option<OAuthAccount>, AppError>;

    /// 연결 행을 저장합니다. `(user, provider)` 또는 `(provider, provider_id)`가
    /// 이미 있으면 `AppError::ConflictError`
    async fn create(&self, account: OAuthAccount) -> Result<OAuthAccount, AppError>;
}

/// MongoDB `oauth_accounts` 컬렉션 구현
pub struct MongoOAuthAccountRepository {
    db: Arc<Database>,
}

impl MongoOAuthAccountRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<OAuthAccount> {
        self.db
            .get_database()
            .collection::<OAuthAccount>(OAUTH_ACCOUNTS_COLLECTION)
    }
}

#[async_trait]
impl OAuthAccountRepository for MongoOAuthAccountRepository {
    async fn exists_by_user_and_provider(
        &self,
        user_id: &ObjectId,
        provider: OAuthProvider,
    ) -> Result<bool, AppError> {
        let count = self
            .collection()
            .count_documents(doc! { "user_id": *user_id, "provider": provider.as_str() })
            .limit(1)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    async fn find_by_provider_and_provider_id(
        &self,
        provider: OAuthProvider,
        provider_id: &str,
    ) -> Result<Option<OAuthAccount>, AppError> {
        self.collection()
            .find_one(doc! { "provider": provider.as_str(), "provider_id": provider_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn create(&self, mut account: OAuthAccount) -> Result<OAuthAccount, AppError> {
        let result = self
            .collection()
            .insert_one(&account)
            .await
            .map_err(|e| map_write_error(e, "OAuth 계정"))?;

        account.id = result.inserted_id.as_object_id();
        Ok(account)
    }
}

/// 프로세스 내부 OAuth 계정 저장소
#[derive(Default)]
pub struct InMemoryOAuthAccountRepository {
    accounts: Mutex<Vec<OAuthAccount>>,
}

impl InMemoryOAuthAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> Result<std::sync::MutexGuard<'_, Vec<OAuthAccount>>, AppError> {
        self.accounts
            .lock()
            .map_err(|_| AppError::InternalError("in-memory oauth account store poisoned".to_string()))
    }

    pub fn count(&self) -> usize {
        self.accounts().map(|accounts| accounts.len()).unwrap_or(0)
    }
}

#[async_trait]
impl OAuthAccountRepository for InMemoryOAuthAccountRepository {
    async fn exists_by_user_and_provider(
        &self,
        user_id: &ObjectId,
        provider: OAuthProvider,
    ) -> Result<bool, AppError> {
        Ok(self
            .accounts()?
            .iter()
            .any(|a| a.user_id == *user_id && a.provider == provider))
    }

    async fn find_by_provider_and_provider_id(
        &self,
        provider: OAuthProvider,
        provider_id: &str,
    ) -> Result<Option<OAuthAccount>, AppError> {
        Ok(self
            .accounts()?
            .iter()
            .find(|a| a.provider == provider && a.provider_id == provider_id)
            .cloned())
    }

    async fn create(&self, mut account: OAuthAccount) -> Result<OAuthAccount, AppError> {
        let mut accounts = self.accounts()?;
        let duplicate = accounts.iter().any(|a| {
            (a.user_id == account.user_id && a.provider == account.provider)
                || (a.provider == account.provider && a.provider_id == account.provider_id)
        });
        if duplicate {
            return Err(AppError::ConflictError("이미 연결된 OAuth 계정입니다".to_string()));
        }

        account.id = Some(ObjectId::new());
        accounts.push(account.clone());
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_create_rejects_duplicate_links() {
        let repo = InMemoryOAuthAccountRepository::new();
        let user_id = ObjectId::new();
        repo.create(OAuthAccount::new(user_id, OAuthProvider::Google, "1".to_string(), "a@b.com".to_string()))
            .await
            .unwrap();

        let same_user_provider = repo
            .create(OAuthAccount::new(user_id, OAuthProvider::Google, "2".to_string(), "a@b.com".to_string()))
            .await;
        let same_provider_id = repo
            .create(OAuthAccount::new(ObjectId::new(), OAuthProvider::Google, "1".to_string(), "x@y.com".to_string()))
            .await;

        assert!(matches!(same_user_provider, Err(AppError::ConflictError(_))));
        assert!(matches!(same_provider_id, Err(AppError::ConflictError(_))));
        assert!(repo.exists_by_user_and_provider(&user_id, OAuthProvider::Google).await.unwrap());
        assert!(!repo.exists_by_user_and_provider(&user_id, OAuthProvider::Kakao).await.unwrap());
    }
}
