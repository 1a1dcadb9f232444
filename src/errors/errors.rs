//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 인증 코어를 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! ## 인증 에러 분류
//!
//! | 변형 | HTTP | 의미 |
//! |------|------|------|
//! | `Unauthorized` | 401 | 잘못된 자격 증명, 무효/만료/교체된 토큰 |
//! | `Forbidden` | 403 | 역할 부족 (하위 인가 계층에서 결정) |
//! | `ConfigurationError` | 500 | 알 수 없는 OAuth 프로바이더 등 배포/프로그래머 오류 |
//! | `StoreUnavailable` | 503 | 리프레시 토큰 저장소(Redis) 연결 실패 |
//!
//! `StoreUnavailable`은 "유효하지 않은 토큰"과 절대 섞이지 않습니다.
//! 저장소 장애를 401로 돌려주면 클라이언트가 정상 세션을 버리게 됩니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::errors::AppError;
//!
//! fn require_principal(valid: bool) -> Result<(), AppError> {
//!     if !valid {
//!         return Err(AppError::Unauthorized("인증이 필요합니다".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use actix_web::http::StatusCode;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 인증 코어에서 발생할 수 있는 모든 종류의 에러를 포괄하는 열거형입니다.
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 인증 실패 (401 Unauthorized)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 부족 (403 Forbidden)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 설정/프로그래머 오류 (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 리프레시 토큰 저장소 접근 불가 (503 Service Unavailable)
    #[error("Token store unavailable: {0}")]
    StoreUnavailable(String),

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 닉네임 후보를 모두 소진함 (409 Conflict)
    #[error("Nickname unavailable: {0}")]
    NicknameUnavailable(String),

    /// 외부 서비스 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문의 `error` 필드에 들어가는 기계 판독용 코드
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::ConfigurationError(_) => "configuration_error",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::DatabaseError(_) => "database_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::NicknameUnavailable(_) => "nickname_unavailable",
            AppError::ExternalServiceError(_) => "external_service_error",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// 클라이언트에게 노출해도 되는 메시지
    ///
    /// 서버 측 장애의 상세 원인은 로그에만 남기고 응답에는 포함하지 않습니다.
    fn public_message(&self) -> String {
        match self {
            AppError::ConfigurationError(_)
            | AppError::DatabaseError(_)
            | AppError::InternalError(_) => "서버 내부 오류가 발생했습니다".to_string(),
            AppError::StoreUnavailable(_) => {
                "토큰 저장소를 일시적으로 사용할 수 없습니다".to_string()
            }
            AppError::ExternalServiceError(_) => {
                "외부 인증 서비스와 통신하지 못했습니다".to_string()
            }
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::NicknameUnavailable(msg) => msg.clone(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) | AppError::NicknameUnavailable(_) => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigurationError(_)
            | AppError::DatabaseError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("[ERROR] {}", self);
        }

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": self.public_message(),
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_unauthorized_error_response() {
        let error = AppError::Unauthorized("Invalid token".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_error_response() {
        let error = AppError::Forbidden("Insufficient permissions".to_string());
        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_store_unavailable_is_not_unauthorized() {
        let error = AppError::StoreUnavailable("connection refused".to_string());

        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.kind(), "store_unavailable");
    }

    #[test]
    fn test_configuration_error_hides_details() {
        let error = AppError::ConfigurationError("unsupported provider: twitter".to_string());

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!error.public_message().contains("twitter"));
    }

    #[test]
    fn test_nickname_unavailable_is_conflict() {
        let error = AppError::NicknameUnavailable("Tom".to_string());
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        match app_result {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            _ => panic!("Expected InternalError"),
        }
    }
}
