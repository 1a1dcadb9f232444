//! 인증 및 세션 서비스 모듈
//!
//! 자체 JWT 세션(로그인, 토큰 회전, 로그아웃)과 OAuth 2.0 소셜 로그인을 담당합니다.
//!
//! # 구성
//!
//! - [`token_service`] - HS256 JWT 발급과 검증 ([`TokenCodec`])
//! - [`auth_session_service`] - 이메일/비밀번호 로그인, 리프레시 토큰 회전
//! - [`identity_linking_service`] - 외부 신원을 로컬 사용자에 연결하거나 새로 생성
//! - [`oauth_client`] - 프로바이더 토큰 교환과 사용자 정보 조회
//! - [`oauth_completion`] - 소셜 로그인 성공 후 프론트엔드 리다이렉트
//! - [`oauth_login_service`] - 동의 화면 URL과 콜백 처리
//!
//! # Examples
//!
//! ```rust,ignore
//! let pair = sessions.login("user@example.com", "password").await?;
//! let rotated = sessions.refresh(&pair.refresh_token).await?;
//! ```

pub mod auth_session_service;
pub mod identity_linking_service;
pub mod oauth_client;
pub mod oauth_completion;
pub mod oauth_login_service;
pub mod token_service;

pub use auth_session_service::*;
pub use identity_linking_service::*;
pub use oauth_client::*;
pub use oauth_completion::*;
pub use oauth_login_service::*;
pub use token_service::*;
