//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 정리 유틸리티
//! - [`display_terminal`] - 기동 로그 포맷팅 함수들

pub mod display_terminal;
pub mod string_utils;
