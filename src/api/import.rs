use crate::error::ApiError;
use crate::parser::{ParsedLeaveData, parse_leave_text};
use crate::services::validation::LeaveForm;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ImportRequest {
    /// Leave template pasted from chat
    #[schema(example = "Situs : TYVOTO\nPerihal : Pengajuan Cuti Ambil Paspor\nNo Paspor : C0629TTR")]
    pub text: String,
}

#[derive(Serialize, ToSchema)]
pub struct ImportResponse {
    pub parsed: ParsedLeaveData,
    /// Form state to review before submitting
    pub form: LeaveForm,
}

/// Paste import: extract fields from a leave template
#[utoipa::path(
    post,
    path = "/api/v1/leave/parse",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Template recognised", body = ImportResponse),
        (status = 400, description = "Blank text", body = Object, example = json!({
            "message": "Teks Kosong"
        })),
        (status = 422, description = "Neither situs nor perihal found", body = Object, example = json!({
            "message": "Format Tidak Dikenali"
        }))
    ),
    tag = "Leave"
)]
pub async fn parse_leave(payload: web::Json<ImportRequest>) -> Result<impl Responder, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Teks Kosong".to_string()));
    }

    let today = Local::now().date_naive();
    let parsed = parse_leave_text(&payload.text, today);
    debug!(?parsed, "Pasted text parsed");

    if !parsed.is_recognised() {
        info!("Pasted text did not look like a leave template");
        return Err(ApiError::Unprocessable("Format Tidak Dikenali".to_string()));
    }

    let form = LeaveForm::prefill(&parsed, today);
    Ok(HttpResponse::Ok().json(ImportResponse { parsed, form }))
}
