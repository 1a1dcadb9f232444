//! 라우트 구성
//!
//! ```text
//! GET  /health
//! /api/v1/auth
//!   POST /login
//!   POST /refresh
//!   POST /logout                          (주체 필요)
//!   GET  /me                              (주체 필요)
//!   GET  /oauth2/authorization/{provider}
//!   GET  /oauth2/redirect/{provider}
//! ```

use actix_web::{get, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::errors::AppError;
use crate::handlers;

/// 모든 라우트를 설정합니다
///
/// ```rust,ignore
/// let app = App::new()
///     .configure(|cfg| context.register(cfg))
///     .configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_auth_routes(cfg);

    cfg.default_service(web::route().to(not_found));
}

/// 인증 관련 라우트를 설정합니다
///
/// 모든 경로는 인증 필터를 거치며, 주체가 필요한 핸들러는 추출자로 401을 돌려줍니다.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"password123"}'
///
/// curl -i http://localhost:8080/api/v1/auth/oauth2/authorization/kakao
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::login)
            .service(handlers::auth::refresh)
            .service(handlers::auth::logout)
            .service(handlers::auth::me)
            .service(handlers::oauth::authorization)
            .service(handlers::oauth::redirect),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "community_auth",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// 매칭되는 라우트가 없을 때 공통 에러 본문으로 404를 돌려줍니다
async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound(format!("{} {}", req.method(), req.path())))
}
