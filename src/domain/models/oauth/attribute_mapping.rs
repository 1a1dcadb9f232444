//! # 프로바이더 속성 정규화
//!
//! 각 OAuth 프로바이더가 돌려주는 사용자 속성 JSON을 [`CanonicalIdentity`]로 변환합니다.
//!
//! ## 프로바이더별 속성 구조
//!
//! | 프로바이더 | ID | 이메일 | 닉네임 | 프로필 이미지 |
//! |------------|----|--------|--------|---------------|
//! | Google | `sub` | `email` | `name` | `picture` |
//! | Kakao | `id` (숫자) | `kakao_account.email` | `kakao_account.profile.nickname` | `kakao_account.profile.profile_image_url` |
//! | Naver | `response.id` | `response.email` | `response.name` | `response.profile_image` |
//!
//! 프로바이더마다 순수 함수 묶음([`AttributeMapping`]) 하나를 두고,
//! [`OAuthProvider`]를 키로 하는 조회 테이블에서 꺼내 씁니다.
//!
//! ```rust,ignore
//! let identity = normalize("kakao", &attributes)?;
//! assert_eq!(identity.provider, OAuthProvider::Kakao);
//! ```

use serde_json::Value;

use crate::config::OAuthProvider;
use crate::domain::models::oauth::canonical_identity::CanonicalIdentity;
use crate::errors::errors::AppError;
use crate::utils::string_utils::clean_optional_string;

type Extractor = fn(&Value) -> Option<String>;

/// 프로바이더 하나의 속성 추출 함수 묶음
#[derive(Clone, Copy)]
pub struct AttributeMapping {
    pub provider_id: Extractor,
    pub email: Extractor,
    pub nickname: Extractor,
    pub profile_image: Extractor,
}

/// 중첩 경로의 값을 문자열로 읽습니다. 숫자 ID는 문자열로 변환합니다.
fn string_at(attributes: &Value, path: &[&str]) -> Option<String> {
    let value = path.iter().try_fold(attributes, |node, key| node.get(key))?;
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    clean_optional_string(Some(raw))
}

static GOOGLE_MAPPING: AttributeMapping = AttributeMapping {
    provider_id: |a| string_at(a, &["sub"]),
    email: |a| string_at(a, &["email"]),
    nickname: |a| string_at(a, &["name"]),
    profile_image: |a| string_at(a, &["picture"]),
};

static KAKAO_MAPPING: AttributeMapping = AttributeMapping {
    provider_id: |a| string_at(a, &["id"]),
    email: |a| string_at(a, &["kakao_account", "email"]),
    nickname: |a| string_at(a, &["kakao_account", "profile", "nickname"]),
    profile_image: |a| string_at(a, &["kakao_account", "profile", "profile_image_url"]),
};

static NAVER_MAPPING: AttributeMapping = AttributeMapping {
    provider_id: |a| string_at(a, &["response", "id"]),
    email: |a| string_at(a, &["response", "email"]),
    nickname: |a| string_at(a, &["response", "name"]),
    profile_image: |a| string_at(a, &["response", "profile_image"]),
};

/// 프로바이더의 속성 추출 함수 묶음을 조회합니다.
pub fn mapping_for(provider: OAuthProvider) -> &'static AttributeMapping {
    match provider {
        OAuthProvider::Google => &GOOGLE_MAPPING,
        OAuthProvider::Kakao => &KAKAO_MAPPING,
        OAuthProvider::Naver => &NAVER_MAPPING,
    }
}

/// 이메일의 `@` 앞부분. 닉네임을 제공하지 않는 프로바이더 계정에 사용합니다.
fn email_local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// 등록 ID와 원본 속성으로 정규화된 신원을 만듭니다.
///
/// # Errors
///
/// * `AppError::ConfigurationError` - 지원하지 않는 프로바이더 이름
/// * `AppError::Unauthorized` - 프로바이더 ID 또는 이메일이 없음 (이메일 제공 동의 거부 등)
pub fn normalize(registration_id: &str, attributes: &Value) -> Result<CanonicalIdentity, AppError> {
    let provider = OAuthProvider::from_registration_id(registration_id)?;
    normalize_for(provider, attributes)
}

pub fn normalize_for(provider: OAuthProvider, attributes: &Value) -> Result<CanonicalIdentity, AppError> {
    let mapping = mapping_for(provider);

    let provider_id = (mapping.provider_id)(attributes).ok_or_else(|| {
        AppError::Unauthorized(format!("{} 사용자 ID를 확인할 수 없습니다", provider))
    })?;
    let email = (mapping.email)(attributes).ok_or_else(|| {
        AppError::Unauthorized(format!("{} 계정의 이메일 제공 동의가 필요합니다", provider))
    })?;
    let nickname = (mapping.nickname)(attributes).unwrap_or_else(|| email_local_part(&email));

    Ok(CanonicalIdentity {
        provider,
        provider_id,
        email,
        nickname,
        profile_image_url: (mapping.profile_image)(attributes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_google_flat_attributes() {
        let attributes = json!({ "sub": "1", "email": "a@b.com", "name": "A", "picture": "u" });

        let identity = normalize("google", &attributes).unwrap();

        assert_eq!(identity.provider, OAuthProvider::Google);
        assert_eq!(identity.provider_id, "1");
        assert_eq!(identity.email, "a@b.com");
        assert_eq!(identity.nickname, "A");
        assert_eq!(identity.profile_image_url.as_deref(), Some("u"));
    }

    #[test]
    fn test_kakao_nested_attributes_match_google_fields() {
        let google = normalize(
            "google",
            &json!({ "sub": "1", "email": "a@b.com", "name": "A", "picture": "u" }),
        )
        .unwrap();
        let kakao = normalize(
            "kakao",
            &json!({
                "id": 1,
                "kakao_account": {
                    "email": "a@b.com",
                    "profile": { "nickname": "A", "profile_image_url": "u" }
                }
            }),
        )
        .unwrap();

        assert_eq!(kakao.provider, OAuthProvider::Kakao);
        assert_eq!(kakao.provider_id, google.provider_id);
        assert_eq!(kakao.email, google.email);
        assert_eq!(kakao.nickname, google.nickname);
        assert_eq!(kakao.profile_image_url, google.profile_image_url);
    }

    #[test]
    fn test_naver_response_wrapper() {
        let attributes = json!({
            "resultcode": "00",
            "response": { "id": "n-77", "email": "c@d.com", "name": "C", "profile_image": "p" }
        });

        let identity = normalize("naver", &attributes).unwrap();

        assert_eq!(identity.provider_id, "n-77");
        assert_eq!(identity.email, "c@d.com");
        assert_eq!(identity.nickname, "C");
        assert_eq!(identity.profile_image_url.as_deref(), Some("p"));
    }

    #[test]
    fn test_unsupported_provider_is_configuration_error() {
        let result = normalize("twitter", &json!({ "id": "1" }));
        assert!(matches!(result, Err(AppError::ConfigurationError(_))));
    }

    #[test]
    fn test_missing_email_is_unauthorized() {
        let result = normalize("kakao", &json!({ "id": 5, "kakao_account": { "profile": { "nickname": "K" } } }));
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_missing_nickname_falls_back_to_email_local_part() {
        let identity = normalize("google", &json!({ "sub": "9", "email": "tom@example.com" })).unwrap();

        assert_eq!(identity.nickname, "tom");
        assert!(identity.profile_image_url.is_none());
    }
}
