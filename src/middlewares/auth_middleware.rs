//! JWT 인증 필터
//!
//! ActixWeb 요청 파이프라인에서 액세스 토큰을 검증하고 요청 주체를 설치합니다.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::middlewares::auth_inner::AuthenticationFilterService;
use crate::services::auth::TokenCodec;

/// JWT 인증 필터
pub struct AuthenticationFilter {
    codec: Arc<TokenCodec>,
}

impl AuthenticationFilter {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthenticationFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthenticationFilterService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationFilterService {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    use crate::config::JwtConfig;
    use crate::domain::entities::users::Role;
    use crate::domain::models::auth::{AdminUser, AuthenticatedUser, OptionalUser};

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(
            &JwtConfig::new("filter-test-secret-filter-test", 3600, 1_209_600).unwrap(),
        ))
    }

    async fn whoami(user: AuthenticatedUser) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", user.user_id, user.authority()))
    }

    async fn admin_only(_admin: AdminUser) -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    async fn anyone(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().body(if user.0.is_some() { "user" } else { "anonymous" })
    }

    macro_rules! app {
        ($codec:expr) => {
            test::init_service(
                App::new()
                    .wrap(AuthenticationFilter::new($codec))
                    .route("/whoami", web::get().to(whoami))
                    .route("/admin", web::get().to(admin_only))
                    .route("/anyone", web::get().to(anyone)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_access_token_installs_principal() {
        let codec = codec();
        let token = codec.create_access_token("42", "a@b.com", Role::User).unwrap();
        let app = app!(codec.clone());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "42:ROLE_USER");
    }

    #[actix_web::test]
    async fn test_refresh_token_does_not_authenticate() {
        let codec = codec();
        let refresh = codec.create_refresh_token("42").unwrap();
        let app = app!(codec.clone());

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", refresh)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_invalid_token_passes_through_as_anonymous() {
        let app = app!(codec());

        let req = test::TestRequest::get()
            .uri("/anyone")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;

        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_user_role_is_forbidden_on_admin_route() {
        let codec = codec();
        let user_token = codec.create_access_token("7", "u@b.com", Role::User).unwrap();
        let admin_token = codec.create_access_token("1", "admin@b.com", Role::Admin).unwrap();
        let app = app!(codec.clone());

        let forbidden = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin")
                .insert_header(("Authorization", format!("Bearer {}", user_token)))
                .to_request(),
        )
        .await;
        let allowed = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin")
                .insert_header(("Authorization", format!("Bearer {}", admin_token)))
                .to_request(),
        )
        .await;
        let anonymous = test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;

        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }
}
