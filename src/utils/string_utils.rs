//! # 문자열 유틸리티
//!
//! 외부 입력(프로바이더 속성, 쿼리 파라미터)에서 빈 값을 걸러내는 함수들입니다.

use serde::Deserialize;

/// 선택적 문자열 필드 정리
///
/// 앞뒤 공백을 제거하고, 남는 내용이 없으면 `None`을 반환합니다.
///
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// serde용 선택적 문자열 역직렬화 함수
///
/// `?code=&state=abc` 처럼 값이 비어 있는 파라미터를 `None`으로 읽습니다.
///
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Query {
///     #[serde(default, deserialize_with = "deserialize_optional_string")]
///     code: Option<String>,
/// }
/// ```
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("\t\n".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_deserialize_optional_string_drops_blank_values() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            value: Option<String>,
        }

        let blank: Probe = serde_json::from_str(r#"{"value": "   "}"#).unwrap();
        let missing: Probe = serde_json::from_str("{}").unwrap();
        let present: Probe = serde_json::from_str(r#"{"value": " abc "}"#).unwrap();

        assert!(blank.value.is_none());
        assert!(missing.value.is_none());
        assert_eq!(present.value.as_deref(), Some("abc"));
    }
}
