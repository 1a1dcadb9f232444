//! JWT 인증 토큰 클레임 및 토큰 쌍
//!
//! RFC 7519 표준 클레임을 기반으로 액세스 토큰과 리프레시 토큰의 페이로드를 정의합니다.
use serde::{Deserialize, Serialize};

/// 액세스 토큰 클레임
///
/// 요청 한 번의 인증에 필요한 최소 정보만 담습니다.
/// 유효성은 서명과 만료 시간만으로 결정되며 저장소를 조회하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// 토큰의 주체 (사용자 ID)
    pub sub: String,
    pub email: String,
    /// `USER` 또는 `ADMIN`
    pub role: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 리프레시 토큰 클레임
///
/// `jti`는 같은 초에 발급된 두 리프레시 토큰도 서로 다른 문자열이 되도록 합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// 검증된 토큰에서 읽어낸 공통 클레임
///
/// 리프레시 토큰에는 `role`이 없으므로, 필터는 `role`이 있는 토큰만 요청 주체로 인정합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// 클라이언트에게 전달되는 토큰 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// 액세스 토큰 유효기간 (초)
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_serializes_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 3600,
        };

        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["expiresIn"], 3600);
    }
}
