//! 커뮤니티 인증 서비스
//!
//! 서명된 베어러 토큰 기반의 상태 없는 요청 인증, 여러 외부 프로바이더를 통한
//! 소셜 로그인, 서버 측에서 회전하는 리프레시 토큰을 제공합니다.
//!
//! # Features
//!
//! - **JWT 인증**: HS256 액세스/리프레시 토큰, 요청마다 저장소 조회 없이 검증
//! - **토큰 회전**: 사용자당 하나의 리프레시 토큰, 원자적 교체로 재사용 차단
//! - **OAuth 2.0**: Google, Kakao, Naver 속성 정규화와 계정 연결
//! - **MongoDB**: 사용자와 연결 계정 저장
//! - **Redis**: 리프레시 토큰 저장
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ AuthenticationFilter │ ← 요청 주체 설치 (거절하지 않음)
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │ Handlers + 추출자    │ ← 401/403 결정
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │ Services             │ ← 세션, OAuth, 계정 연결
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │ Repositories         │ ← MongoDB / Redis / 메모리
//! └──────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use community_auth::core::{AppContext, AppSettings};
//!
//! let context = AppContext::connect(AppSettings::from_env()?).await?;
//! let pair = context.sessions.login("user@example.com", "password123").await?;
//! let rotated = context.sessions.refresh(&pair.refresh_token).await?;
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
