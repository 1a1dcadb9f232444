//! 애플리케이션 조립 계층
//!
//! 설정을 읽어 저장소 백엔드를 고르고 서비스 그래프를 만듭니다.

pub mod registry;

pub use registry::{AppContext, AppSettings};
