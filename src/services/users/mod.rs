//! 사용자 자격 증명 서비스 모듈
//!
//! bcrypt 비밀번호 해시 생성과 검증을 제공합니다.

pub mod password;

pub use password::*;
