//! # Domain Layer Module
//!
//! 인증 코어의 도메인 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB에 저장되는 User, OAuthAccount
//! ├── dto       - HTTP 요청/응답 계약
//! └── models    - 토큰 클레임, 요청 주체, 프로바이더 속성 정규화
//! ```

pub mod dto;
pub mod entities;
pub mod models;
