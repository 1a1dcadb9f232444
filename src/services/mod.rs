//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 서비스는 저장소 트레이트(`Arc<dyn ...>`)에만 의존하며,
//! 구체 구현은 [`crate::core::registry`]에서 조립됩니다.
//!
//! - [`auth`] - JWT 세션, OAuth 로그인, 계정 연결
//! - [`users`] - 비밀번호 해시

pub mod auth;
pub mod users;
