use crate::{
    auth::{auth::AdminUser, jwt::generate_access_token, revocation::TokenRevocations},
    config::Config,
    models::{LoginReqDto, LoginResponse},
    store::leave_store::LeaveStore,
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::{debug, error, info, instrument};

/// Approver login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(store, config, user),
    fields(email = %user.email)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    store: web::Data<LeaveStore>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Login request received");

    // 1️⃣ Basic validation
    let email = user.email.trim();
    if email.is_empty() || user.password.is_empty() {
        info!("Validation failed: empty email or password");
        return HttpResponse::BadRequest().json(json!({
            "message": "Email and password are required"
        }));
    }

    // 2️⃣ Approver list and password, checked separately but answered the same
    let settings = store.settings().await;

    if !settings.is_approver(email) {
        info!("Invalid credentials: email is not a registered approver");
        return HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" }));
    }

    debug!("Verifying password");
    if user.password != settings.admin_password {
        info!("Invalid credentials: wrong password");
        return HttpResponse::Unauthorized().json(json!({ "message": "Invalid credentials" }));
    }

    // 3️⃣ Issue token
    let (access_token, _) =
        match generate_access_token(email, &config.jwt_secret, config.access_token_ttl) {
            Ok(t) => t,
            Err(e) => {
                error!(error = %e, "Failed to sign access token");
                return HttpResponse::InternalServerError().finish();
            }
        };

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: config.access_token_ttl,
    })
}

/// Approver logout, revokes the presented token
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
pub async fn logout(
    admin: AdminUser,
    revocations: web::Data<TokenRevocations>,
) -> impl Responder {
    revocations.revoke(&admin.jti);
    info!(email = %admin.email, "Logged out");

    HttpResponse::NoContent().finish()
}
