//! 미들웨어 모듈
//!
//! # 제공 미들웨어
//!
//! ### 인증 필터 ([`AuthenticationFilter`])
//! - `Authorization: Bearer <token>` 헤더에서 액세스 토큰 추출
//! - 서명과 만료를 검증하고 역할 클레임이 있는 토큰만 주체로 인정
//! - 요청 extensions에 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser) 저장
//! - 요청을 직접 거절하지 않음 (401/403은 추출자가 결정)
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! App::new()
//!     .wrap(AuthenticationFilter::new(codec.clone()))
//!     .configure(configure_all_routes)
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthenticationFilter;
