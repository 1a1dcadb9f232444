//! # Repository Layer
//!
//! 인증 코어가 소비하는 영속성 협력자입니다.
//! 각 저장소는 trait으로 정의되고, MongoDB/Redis 구현과 프로세스 내부 구현을 가집니다.
//!
//! - [`users`] - 사용자, OAuth 계정 연결 (MongoDB)
//! - [`tokens`] - 리프레시 토큰 (Redis)

pub mod tokens;
pub mod users;

use mongodb::error::{ErrorKind, WriteFailure};

use crate::errors::errors::AppError;

const DUPLICATE_KEY: i32 = 11000;

/// 쓰기 에러를 변환합니다. 유일성 인덱스 위반은 `ConflictError`가 됩니다.
pub(crate) fn map_write_error(e: mongodb::error::Error, entity: &str) -> AppError {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY => {
            AppError::ConflictError(format!("이미 존재하는 {}입니다", entity))
        }
        _ => AppError::DatabaseError(e.to_string()),
    }
}
