//! 에러 모듈
//!
//! 애플리케이션 전역 에러 타입([`errors::AppError`])을 제공합니다.

pub mod errors;

pub use errors::*;
