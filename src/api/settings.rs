use crate::auth::auth::AdminUser;
use crate::error::ApiError;
use crate::model::settings::Settings;
use crate::store::cache::CachedStore;
use crate::store::leave_store::LeaveStore;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettings {
    #[schema(example = json!(["approver@cuti.local", "lead@cuti.local"]))]
    pub approver_emails: Vec<String>,
    #[schema(example = "TVTOTO098")]
    pub admin_password: String,
    #[schema(example = "60")]
    pub max_advance_days: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddApprover {
    #[schema(example = "lead@cuti.local")]
    pub email: String,
}

fn clean_emails(emails: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for email in emails.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        if !cleaned.iter().any(|c| c == email) {
            cleaned.push(email.to_string());
        }
    }
    cleaned
}

#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses(
        (status = 200, description = "Current settings", body = Settings),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Settings"
)]
pub async fn get_settings(
    _admin: AdminUser,
    store: web::Data<LeaveStore>,
) -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(store.settings().await))
}

#[utoipa::path(
    put,
    path = "/api/v1/settings",
    request_body = SaveSettings,
    responses(
        (status = 200, description = "Settings saved", body = Settings),
        (status = 400, description = "No approvers, blank password or non-numeric day count"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Settings"
)]
pub async fn save_settings(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    payload: web::Json<SaveSettings>,
) -> Result<impl Responder, ApiError> {
    let approvers = clean_emails(&payload.approver_emails);
    if approvers.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one approver email is required".to_string(),
        ));
    }

    if payload.admin_password.trim().is_empty() {
        return Err(ApiError::BadRequest("Admin password is required".to_string()));
    }

    let max_advance_days = payload.max_advance_days.trim();
    if max_advance_days.parse::<u32>().is_err() {
        return Err(ApiError::BadRequest(
            "maxAdvanceDays must be a whole number".to_string(),
        ));
    }

    let mut settings = Settings::new("", &payload.admin_password);
    settings.set_approvers(&approvers);
    settings.max_advance_days = max_advance_days.to_string();

    store.save_settings(&settings).await?;
    info!(by = %admin.email, approvers = approvers.len(), "Settings saved");

    Ok(HttpResponse::Ok().json(settings))
}

#[utoipa::path(
    post,
    path = "/api/v1/settings/approvers",
    request_body = AddApprover,
    responses(
        (status = 200, description = "Approver added", body = Settings),
        (status = 400, description = "Blank email"),
        (status = 409, description = "Already an approver"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Settings"
)]
pub async fn add_approver(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    payload: web::Json<AddApprover>,
) -> Result<impl Responder, ApiError> {
    let email = payload.email.trim().to_string();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    let settings = store
        .update_settings(|settings| {
            let mut approvers = settings.approvers();
            if approvers.contains(&email) {
                return Err(ApiError::Conflict("Email already registered".to_string()));
            }
            approvers.push(email.clone());
            settings.set_approvers(&approvers);
            Ok(())
        })
        .await?;

    info!(by = %admin.email, added = %email, "Approver added");
    Ok(HttpResponse::Ok().json(settings))
}

#[utoipa::path(
    delete,
    path = "/api/v1/settings/approvers/{email}",
    params(
        ("email" = String, Path, description = "Approver email to remove")
    ),
    responses(
        (status = 200, description = "Approver removed", body = Settings),
        (status = 400, description = "Cannot remove the last approver"),
        (status = 404, description = "Not an approver"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Settings"
)]
pub async fn remove_approver(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let email = path.into_inner().trim().to_string();

    let settings = store
        .update_settings(|settings| {
            let mut approvers = settings.approvers();
            if !approvers.contains(&email) {
                return Err(ApiError::NotFound("Approver not found".to_string()));
            }
            if approvers.len() == 1 {
                return Err(ApiError::BadRequest(
                    "Cannot remove the last approver".to_string(),
                ));
            }
            approvers.retain(|e| e != &email);
            settings.set_approvers(&approvers);
            Ok(())
        })
        .await?;

    info!(by = %admin.email, removed = %email, "Approver removed");
    Ok(HttpResponse::Ok().json(settings))
}

/// Drop cached store entries so the next reads come from the backend
#[utoipa::path(
    post,
    path = "/api/v1/settings/reload",
    responses(
        (status = 204, description = "Cache cleared"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Settings"
)]
pub async fn reload_store(admin: AdminUser, cache: web::Data<CachedStore>) -> impl Responder {
    cache.reload();
    info!(by = %admin.email, "Store cache cleared");
    HttpResponse::NoContent().finish()
}
