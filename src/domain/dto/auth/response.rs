use serde::Serialize;

use crate::domain::models::auth::AuthenticatedUser;

/// `GET /api/v1/auth/me` 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub user_id: String,
    pub role: String,
    pub authority: String,
}

impl From<AuthenticatedUser> for PrincipalResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            authority: user.authority().to_string(),
            role: user.role.as_str().to_string(),
            user_id: user.user_id,
        }
    }
}
