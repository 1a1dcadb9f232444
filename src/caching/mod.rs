//! 캐싱 계층 모듈
//!
//! Redis 접속과 리프레시 토큰 저장에 필요한 문자열 명령을 제공합니다.
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
