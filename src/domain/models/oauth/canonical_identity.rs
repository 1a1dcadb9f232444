use serde::{Deserialize, Serialize};

use crate::config::OAuthProvider;

/// 프로바이더와 무관하게 정규화된 외부 로그인 신원
///
/// 계정 연결 과정에서만 사용되며 그대로 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalIdentity {
    pub provider: OAuthProvider,
    pub provider_id: String,
    pub email: String,
    pub nickname: String,
    pub profile_image_url: Option<String>,
}
