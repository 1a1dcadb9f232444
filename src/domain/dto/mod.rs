//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 요청/응답 구조체를 정의합니다.
//! Spring의 `@RequestBody`/`@ResponseBody`에 해당하며, 입력값 검증은 `validator` crate로 수행합니다.
//!
//! ```text
//! dto/
//! ├── auth/
//! │   ├── request.rs   # LoginRequest, TokenRefreshRequest, OAuthCallbackQuery
//! │   └── response.rs  # PrincipalResponse
//! └── common.rs        # ApiResponse<T>
//! ```

pub mod auth;
pub mod common;

pub use auth::*;
pub use common::ApiResponse;
