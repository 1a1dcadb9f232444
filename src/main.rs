//! 커뮤니티 인증 서비스 메인 애플리케이션
//!
//! 설정을 읽고 MongoDB, Redis에 연결한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use community_auth::config::{Environment, RateLimitConfig, ServerConfig};
use community_auth::core::{AppContext, AppSettings};
use community_auth::routes::configure_all_routes;
use community_auth::services::auth::ReqwestOAuthClient;
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};

/// 미들웨어와 라우트를 붙인 `App`을 만듭니다
///
/// Rate Limiting은 내부 서비스 future가 `Unpin`이어야 하므로 가장 먼저 감쌉니다.
macro_rules! build_app {
    ($context:expr, $governor_conf:expr, $allowed_origins:expr) => {{
        let context = $context;
        App::new()
            .wrap(Governor::new($governor_conf))
            .wrap(context.authentication_filter())
            .wrap(configure_cors($allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(|cfg| context.register(cfg))
            .configure(configure_all_routes)
    }};
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 커뮤니티 인증 서비스 시작중...");

    let settings = AppSettings::from_env().map_err(|e| {
        error!("설정 로드 실패: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    let context = match std::env::var("AUTH_BACKEND").as_deref() {
        Ok("memory") if Environment::current() != Environment::Production => {
            warn!("⚠️ 메모리 백엔드로 실행합니다. 재시작하면 모든 계정과 세션이 사라집니다");
            let client = Arc::new(ReqwestOAuthClient::new(Arc::new(settings.oauth.clone())));
            AppContext::in_memory(settings, client)
        }
        _ => AppContext::connect(settings).await.map_err(|e| {
            error!("데이터 스토어 연결 실패: {}", e);
            std::io::Error::other(e.to_string())
        })?,
    };

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(context).await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어는 바깥쪽부터 경로 정규화, 요청 로그, CORS, 인증 필터, Rate Limiting 순입니다.
async fn start_http_server(context: AppContext) -> std::io::Result<()> {
    let server_config = ServerConfig::from_env();
    let bind_address = server_config.bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 Auth API: http://{}/api/v1/auth", bind_address);

    let rate_limit_config = RateLimitConfig::from_env();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    let allowed_origins = server_config.allowed_origins.clone();

    HttpServer::new(move || build_app!(&context, &governor_conf, &allowed_origins))
    .bind(bind_address)?
    .workers(server_config.workers)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * `PROFILE=dev` - .env.dev 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_default();

    match profile.as_str() {
        "prod" => {
            if let Err(e) = dotenv::from_filename(".env.prod") {
                eprintln!(".env.prod 파일 로드 실패: {}", e);
            }
        }
        "dev" => {
            if let Err(e) = dotenv::from_filename(".env.dev") {
                eprintln!(".env.dev 파일 로드 실패: {}", e);
            }
        }
        _ => {
            dotenv().ok();
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// RUST_LOG=debug cargo run
/// RUST_LOG=community_auth::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

/// 허용 Origin 목록으로 CORS 미들웨어를 구성합니다
///
/// 기본값은 `http://localhost:3000`, `http://127.0.0.1:3000` 이며
/// `CORS_ALLOWED_ORIGINS`(쉼표 구분)로 바꿀 수 있습니다.
fn configure_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .supports_credentials()
        .max_age(3600)
}
