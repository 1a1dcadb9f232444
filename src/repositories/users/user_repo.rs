//! # 사용자 리포지토리
//!
//! 인증 코어가 소비하는 사용자 조회/생성 기능입니다.
//! 탈퇴(soft delete)한 사용자는 이메일/ID 조회에서 보이지 않지만,
//! 이메일과 닉네임의 유일성 검사에는 계속 포함됩니다.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Collection;

use crate::db::{Database, USERS_COLLECTION};
use crate::domain::entities::users::User;
use crate::errors::errors::AppError;
use crate::repositories::map_write_error;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AppError>;

    /// 탈퇴(soft delete)한 사용자까지 포함해 이메일 점유 여부를 확인합니다.
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    /// 사용자를 저장하고 ID가 채워진 엔티티를 돌려줍니다.
    ///
    /// 이메일 또는 닉네임이 이미 있으면 `AppError::ConflictError`
    async fn create(&self, user: User) -> Result<User, AppError>;

    async fn update_last_login(&self, id: &ObjectId) -> Result<(), AppError>;
}

/// MongoDB `users` 컬렉션 구현
pub struct MongoUserRepository {
    db: Arc<Database>,
}

impl MongoUserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection::<User>(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.collection()
            .find_one(doc! { "email": email, "deleted_at": null })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        self.collection()
            .find_one(doc! { "_id": object_id, "deleted_at": null })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AppError> {
        let count = self
            .collection()
            .count_documents(doc! { "nickname": nickname })
            .limit(1)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let count = self
            .collection()
            .count_documents(doc! { "email": email })
            .limit(1)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(count > 0)
    }

    async fn create(&self, mut user: User) -> Result<User, AppError> {
        let result = self
            .collection()
            .insert_one(&user)
            .await
            .map_err(|e| map_write_error(e, "사용자"))?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn update_last_login(&self, id: &ObjectId) -> Result<(), AppError> {
        let now = DateTime::now();
        self.collection()
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": { "last_login_at": now, "updated_at": now } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

/// 프로세스 내부 사용자 저장소
///
/// MongoDB 유일성 인덱스와 같은 제약(이메일, 닉네임)을 락 안에서 검사합니다.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, AppError> {
        self.users
            .lock()
            .map_err(|_| AppError::InternalError("in-memory user store poisoned".to_string()))
    }

    pub fn count(&self) -> usize {
        self.users().map(|users| users.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users()?
            .iter()
            .find(|u| u.email == email && !u.is_deleted())
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users()?
            .iter()
            .find(|u| u.id_string().as_deref() == Some(id) && !u.is_deleted())
            .cloned())
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AppError> {
        Ok(self.users()?.iter().any(|u| u.nickname == nickname))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.users()?.iter().any(|u| u.email == email))
    }

    async fn create(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }
        if users.iter().any(|u| u.nickname == user.nickname) {
            return Err(AppError::ConflictError("이미 사용 중인 닉네임입니다".to_string()));
        }

        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn update_last_login(&self, id: &ObjectId) -> Result<(), AppError> {
        if let Some(user) = self.users()?.iter_mut().find(|u| u.id.as_ref() == Some(id)) {
            user.mark_logged_in();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_create_enforces_unique_email_and_nickname() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new_oauth("a@b.com".to_string(), "A".to_string(), None))
            .await
            .unwrap();

        let same_email = repo
            .create(User::new_oauth("a@b.com".to_string(), "B".to_string(), None))
            .await;
        let same_nickname = repo
            .create(User::new_oauth("c@d.com".to_string(), "A".to_string(), None))
            .await;

        assert!(matches!(same_email, Err(AppError::ConflictError(_))));
        assert!(matches!(same_nickname, Err(AppError::ConflictError(_))));
        assert_eq!(repo.count(), 1);
    }

    #[actix_web::test]
    async fn test_soft_deleted_user_is_invisible_but_keeps_nickname() {
        let repo = InMemoryUserRepository::new();
        let mut user = User::new_oauth("gone@b.com".to_string(), "Gone".to_string(), None);
        user.deleted_at = Some(DateTime::now());
        let created = repo.create(user).await.unwrap();
        let id = created.id_string().unwrap();

        assert!(repo.find_by_email("gone@b.com").await.unwrap().is_none());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert!(repo.exists_by_nickname("Gone").await.unwrap());
        assert!(repo.exists_by_email("gone@b.com").await.unwrap());
        assert!(!repo.exists_by_email("other@b.com").await.unwrap());
    }

    #[actix_web::test]
    async fn test_update_last_login() {
        let repo = InMemoryUserRepository::new();
        let created = repo
            .create(User::new_oauth("a@b.com".to_string(), "A".to_string(), None))
            .await
            .unwrap();

        repo.update_last_login(created.id.as_ref().unwrap()).await.unwrap();

        let found = repo.find_by_email("a@b.com").await.unwrap().unwrap();
        assert!(found.last_login_at.is_some());
    }
}
