use crate::auth::auth::AdminUser;
use crate::error::ApiError;
use crate::model::division::Division;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::services::quota::{all_slots, slot_info};
use crate::services::validation::{LeaveForm, validate_submission};
use crate::store::leave_store::LeaveStore;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 50)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = "PENDING")]
    /// Filter by status (PENDING, APPROVED, REJECTED)
    pub status: Option<String>,
    #[schema(example = "CS")]
    /// Filter by division (KAPTEN, CS, KASIR, CS_LINE)
    pub division: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u32>,
    #[schema(example = 50)]
    /// Pagination per page number
    pub per_page: Option<u32>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct QuotaQuery {
    #[schema(example = "KASIR")]
    /// Only this division
    pub division: Option<String>,
}

fn parse_filter<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => T::from_str(&v.to_uppercase())
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {}: {}", name, v))),
        None => Ok(None),
    }
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = LeaveForm,
        description = "Leave request form",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Form or policy check failed", body = crate::services::validation::ValidationError)
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    store: web::Data<LeaveStore>,
    payload: web::Json<LeaveForm>,
) -> Result<impl Responder, ApiError> {
    let today = Local::now().date_naive();
    let requests = store.requests().await;

    let new = validate_submission(&payload, &requests, today).map_err(|e| {
        info!(field = e.field, "Leave submission rejected: {}", e.message);
        e
    })?;

    let request = store.save_request(new).await?;
    Ok(HttpResponse::Created().json(request))
}

/* =========================
Approve leave (approver)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    decide(admin, store, path.into_inner(), LeaveStatus::Approved).await
}

/* =========================
Reject leave (approver)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 400, description = "Leave request not found or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    decide(admin, store, path.into_inner(), LeaveStatus::Rejected).await
}

async fn decide(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    leave_id: String,
    status: LeaveStatus,
) -> Result<HttpResponse, ApiError> {
    match store.decide(&leave_id, status).await? {
        Some(request) => {
            info!(leave_id = %leave_id, status = %status, by = %admin.email, "Leave request decided");
            Ok(HttpResponse::Ok().json(request))
        }
        None => Err(ApiError::BadRequest(
            "Leave request not found or already processed".to_string(),
        )),
    }
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    _admin: AdminUser,
    store: web::Data<LeaveStore>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let leave_id = path.into_inner();

    match store.find(&leave_id).await {
        Some(request) => Ok(HttpResponse::Ok().json(request)),
        None => Err(ApiError::NotFound("Leave request not found".to_string())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 204, description = "Leave request deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    admin: AdminUser,
    store: web::Data<LeaveStore>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let leave_id = path.into_inner();

    if !store.delete_request(&leave_id).await? {
        return Err(ApiError::NotFound("Leave request not found".to_string()));
    }

    info!(leave_id = %leave_id, by = %admin.email, "Leave request removed");
    Ok(HttpResponse::NoContent().finish())
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list, newest first", body = LeaveListResponse),
        (status = 400, description = "Unknown status or division")
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    store: web::Data<LeaveStore>,
    query: web::Query<LeaveFilter>,
) -> Result<impl Responder, ApiError> {
    let status: Option<LeaveStatus> = parse_filter("status", query.status.as_deref())?;
    let division: Option<Division> = parse_filter("division", query.division.as_deref())?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(50).clamp(1, 200);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page as usize - 1) * per_page as usize;

    let filtered: Vec<LeaveRequest> = store
        .requests()
        .await
        .into_iter()
        .filter(|r| status.is_none_or(|s| r.status == s))
        .filter(|r| division.is_none_or(|d| r.division == d))
        .collect();
    let total = filtered.len();

    let response = LeaveListResponse {
        data: filtered
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect(),
        page,
        per_page,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Monthly slot usage for the current month
#[utoipa::path(
    get,
    path = "/api/v1/leave/quota",
    params(QuotaQuery),
    responses(
        (status = 200, description = "Slot info per division", body = [crate::services::quota::SlotInfo]),
        (status = 400, description = "Unknown division")
    ),
    tag = "Leave"
)]
pub async fn leave_quota(
    store: web::Data<LeaveStore>,
    query: web::Query<QuotaQuery>,
) -> Result<impl Responder, ApiError> {
    let division: Option<Division> = parse_filter("division", query.division.as_deref())?;
    let today = Local::now().date_naive();
    let requests = store.requests().await;

    let slots = match division {
        Some(d) => vec![slot_info(&requests, d, today)],
        None => all_slots(&requests, today),
    };

    Ok(HttpResponse::Ok().json(slots))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{self, bearer};
    use actix_web::{http::StatusCode, test};
    use chrono::{Datelike, Local, NaiveDate};
    use serde_json::{Value, json};

    /// A valid form starting on the last day of the current month.
    fn form(nama: &str, division: &str) -> Value {
        let today = Local::now().date_naive();
        let (y, m) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        let last = NaiveDate::from_ymd_opt(y, m, 1).unwrap().pred_opt().unwrap();

        json!({
            "nama": nama,
            "division": division,
            "situs": "TYVOTO",
            "perihal": "Pengajuan Cuti Ambil Paspor",
            "noPaspor": "",
            "startDate": last.to_string(),
            "endDate": last.to_string(),
            "keterangan": "CUTI INDONESIA",
            "accLdr": "BUFON"
        })
    }

    #[actix_web::test]
    async fn test_submit_then_list() {
        let state = test_support::state();
        let app = test::init_service(test_support::app(&state)).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/leave")
            .set_json(form("ANDI", "KASIR"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["status"], "PENDING");
        assert_eq!(created["division"], "KASIR");
        assert!(created.get("noPaspor").is_none() || created["noPaspor"].is_null());

        let req = test::TestRequest::post()
            .uri("/api/v1/leave")
            .set_json(form("BUDI", "CS"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );

        let req = test::TestRequest::get().uri("/api/v1/leave").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][0]["nama"], "BUDI");

        let req = test::TestRequest::get()
            .uri("/api/v1/leave?division=kasir&status=PENDING")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["nama"], "ANDI");

        let req = test::TestRequest::get()
            .uri("/api/v1/leave?status=DONE")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn test_submit_reports_first_invalid_field() {
        let state = test_support::state();
        let app = test::init_service(test_support::app(&state)).await;

        let mut payload = form("ANDI", "CS");
        payload["endDate"] = json!("2000-01-01");

        let req = test::TestRequest::post()
            .uri("/api/v1/leave")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["field"], "endDate");
        assert_eq!(body["message"], "Tanggal selesai harus setelah tanggal mulai");
    }

    #[actix_web::test]
    async fn test_approve_reject_require_admin_and_pending() {
        let state = test_support::state();
        let app = test::init_service(test_support::app(&state)).await;
        let token = test_support::token();

        let req = test::TestRequest::post()
            .uri("/api/v1/leave")
            .set_json(form("ANDI", "KAPTEN"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/leave/{}/approve", id))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/leave/{}/approve", id))
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "APPROVED");

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/leave/{}/reject", id))
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Leave request not found or already processed");

        // KAPTEN has one slot and it is now taken
        let req = test::TestRequest::post()
            .uri("/api/v1/leave")
            .set_json(form("BUDI", "KAPTEN"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["field"], "division");

        let req = test::TestRequest::get()
            .uri("/api/v1/leave/quota?division=KAPTEN")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["used"], 1);
        assert_eq!(body[0]["isFull"], true);
    }

    #[actix_web::test]
    async fn test_get_and_delete() {
        let state = test_support::state();
        let app = test::init_service(test_support::app(&state)).await;
        let token = test_support::token();

        let req = test::TestRequest::post()
            .uri("/api/v1/leave")
            .set_json(form("ANDI", "CS_LINE"))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/leave/{}", id))
            .insert_header(bearer(&token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["nama"], "ANDI");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/leave/{}", id))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NO_CONTENT
        );

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/leave/{}", id))
            .insert_header(bearer(&token))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_quota_lists_every_division() {
        let state = test_support::state();
        let app = test::init_service(test_support::app(&state)).await;

        let req = test::TestRequest::get().uri("/api/v1/leave/quota").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let totals: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["total"].as_u64().unwrap())
            .collect();
        assert_eq!(totals, vec![1, 2, 3, 1]);
    }
}
