//! # Configuration Module
//!
//! 인증 코어의 설정값을 관리하는 모듈입니다.
//! Spring의 `@ConfigurationProperties`처럼 환경 변수를 시작 시 한 번 읽어
//! 소유된 구조체로 만들고, 이후에는 서비스 생성자에 주입합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 요청 제한, MongoDB/Redis 접속 정보
//! - [`auth_config`] - JWT, 리프레시 토큰 키, OAuth 프로바이더, 계정 생성 설정
//!
//! ## 보안 원칙
//!
//! - 비밀값(`JWT_SECRET`, `OAUTH_STATE_SECRET`, 클라이언트 시크릿)은 환경 변수로만 제공
//! - 개발용 기본값은 `Development`/`Test` 환경에서만 허용
//! - 비밀값을 가진 구조체의 `Debug` 출력은 값을 가립니다
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{JwtConfig, ServerConfig};
//!
//! let jwt = JwtConfig::from_env()?;
//! let server = ServerConfig::from_env();
//! println!("Server will bind to {}", server.bind_address());
//! ```
//!
//! ## 선택적 환경 변수
//!
//! ```bash
//! export ENVIRONMENT="production"  # development, test, staging, production
//! export BCRYPT_COST="12"          # 4-15 범위
//! export REDIS_KEY_PREFIX="community:"
//! export NICKNAME_MAX_PROBES="100"
//! ```

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
