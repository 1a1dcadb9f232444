//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다.
//! 핸들러는 `web::Data`로 주입된 서비스를 호출하고 결과를 응답으로 바꾸는 일만 합니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   AuthenticationFilter - 요청 주체 설치
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) + 추출자(401/403 결정)
//! ├─────────────────────────────────────────────┤
//!   Services - 세션, OAuth, 계정 연결
//! ├─────────────────────────────────────────────┤
//!   Repositories - MongoDB / Redis
//! └─────────────────────────────────────────────┘
//! ```
//!
//! - **`auth`**: 로그인, 토큰 갱신, 로그아웃, 현재 주체 조회
//! - **`oauth`**: 소셜 로그인 시작과 콜백

pub mod auth;
pub mod oauth;
