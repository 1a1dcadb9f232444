//! 인증 요청 관련 DTO
//!
//! 로그인, 토큰 갱신, OAuth 콜백 요청 정보를 매핑합니다.
use serde::Deserialize;
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 로컬 로그인 요청
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 토큰 갱신 요청 (`{"refreshToken": "..."}`)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

/// OAuth 콜백 쿼리 파라미터
///
/// 사용자가 동의를 거부하면 프로바이더는 `code` 없이 `error`만 돌려줍니다.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "a@b.com".to_string(),
            password: "pw".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = LoginRequest {
            email: "a@b.com".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_refresh_request_reads_camel_case() {
        let request: TokenRefreshRequest = serde_json::from_str(r#"{"refreshToken":"abc"}"#).unwrap();
        assert_eq!(request.refresh_token, "abc");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_callback_query_treats_blank_code_as_missing() {
        let query: OAuthCallbackQuery = serde_json::from_str(r#"{"code":"","state":"s"}"#).unwrap();
        assert!(query.code.is_none());
        assert_eq!(query.state.as_deref(), Some("s"));
        assert!(query.error.is_none());
    }
}
