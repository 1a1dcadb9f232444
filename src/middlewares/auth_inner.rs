//! AuthenticationFilter 인증 로직의 핵심적인 기능
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::domain::entities::users::Role;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::auth::TokenCodec;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthenticationFilterService<S> {
    pub service: Rc<S>,
    pub codec: Arc<TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationFilterService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if let Some(user) = principal_from_request(&req, &self.codec) {
            log::debug!("[AUTH] 인증 성공: 사용자 ID {}", user.user_id);
            req.extensions_mut().insert(user);
        }

        Box::pin(async move { service.call(req).await })
    }
}

/// 요청 헤더의 액세스 토큰에서 주체를 만듭니다.
///
/// 헤더가 없거나, 서명/만료 검증에 실패하거나, 역할 클레임이 없는
/// (리프레시) 토큰이면 `None`입니다.
fn principal_from_request(req: &ServiceRequest, codec: &TokenCodec) -> Option<AuthenticatedUser> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = TokenCodec::extract_bearer_token(header)?;
    let claims = codec.get_claims(token)?;

    let role = match claims.role.as_deref().map(Role::parse) {
        Some(Ok(role)) => role,
        Some(Err(_)) => {
            log::warn!("[AUTH] 알 수 없는 역할 클레임: 사용자 ID {}", claims.sub);
            return None;
        }
        None => return None,
    };

    Some(AuthenticatedUser::new(claims.sub, role))
}
