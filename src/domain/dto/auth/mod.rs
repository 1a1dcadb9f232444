pub mod request;
pub mod response;

pub use request::{LoginRequest, OAuthCallbackQuery, TokenRefreshRequest};
pub use response::PrincipalResponse;
