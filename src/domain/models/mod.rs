//! 인증 흐름에서 사용하는 비영속 모델
//!
//! - [`auth`] - 요청 주체와 추출자
//! - [`oauth`] - 프로바이더 속성 정규화
//! - [`token`] - JWT 클레임과 토큰 쌍

pub mod auth;
pub mod oauth;
pub mod token;
