use crate::auth::jwt::verify_token;
use crate::auth::revocation::TokenRevocations;
use crate::config::Config;
use crate::store::leave_store::LeaveStore;
use actix_web::{
    FromRequest, HttpRequest,
    dev::Payload,
    error::{ErrorInternalServerError, ErrorUnauthorized},
    web::Data,
};
use futures::future::LocalBoxFuture;
use tracing::info;

/// A logged-in approver. Taking this as a handler argument makes the route admin-only.
///
/// The token's email must still be on the approver list, so removing an approver cuts off their
/// open sessions as well.
pub struct AdminUser {
    pub email: String,
    pub jti: String,
}

fn extract(req: &HttpRequest) -> actix_web::Result<AdminUser> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| ErrorUnauthorized("Missing token"))?;

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| ErrorInternalServerError("Config missing"))?;

    let claims =
        verify_token(token, &config.jwt_secret).map_err(|_| ErrorUnauthorized("Invalid token"))?;

    if let Some(revocations) = req.app_data::<Data<TokenRevocations>>() {
        if revocations.is_revoked(&claims.jti) {
            return Err(ErrorUnauthorized("Token revoked"));
        }
    }

    Ok(AdminUser {
        email: claims.sub,
        jti: claims.jti,
    })
}

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let admin = extract(req);
        let store = req.app_data::<Data<LeaveStore>>().cloned();

        Box::pin(async move {
            let admin = admin?;
            let store = store.ok_or_else(|| ErrorInternalServerError("Store missing"))?;

            if !store.settings().await.is_approver(&admin.email) {
                info!(email = %admin.email, "Token holder is no longer an approver");
                return Err(ErrorUnauthorized("Not an approver"));
            }

            Ok(admin)
        })
    }
}
