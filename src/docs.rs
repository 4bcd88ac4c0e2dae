use crate::api::import::{ImportRequest, ImportResponse};
use crate::api::leave_request::{LeaveFilter, LeaveListResponse, QuotaQuery};
use crate::api::settings::{AddApprover, SaveSettings};
use crate::model::division::Division;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::settings::Settings;
use crate::models::{LoginReqDto, LoginResponse};
use crate::parser::ParsedLeaveData;
use crate::services::quota::SlotInfo;
use crate::services::validation::{LeaveForm, ValidationError};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cuti Dashboard API",
        version = "1.0.0",
        description = r#"
## Leave Request (Cuti) Dashboard

Staff file leave requests, either by filling the form or by pasting the leave template they
already share in chat. Approvers review, approve or reject them within per-division monthly slots.

### 🔹 Key Features
- **Paste import**
  - Extract situs, perihal, passport number, dates and remarks from a pasted template
- **Submission**
  - Form checks, two-month advance limit and monthly slot check
- **Review**
  - Approve, reject or delete requests; per-division slot usage for the current month
- **Settings**
  - Approver emails and the shared approver password

### 🔐 Security
Review and settings endpoints need a **JWT Bearer** token from `/auth/login`.

### 📦 Response Format
- JSON, camelCase field names
- Errors as `{"message": ...}`, plus `field` for form errors
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::leave_quota,
        crate::api::import::parse_leave,

        crate::api::settings::get_settings,
        crate::api::settings::save_settings,
        crate::api::settings::add_approver,
        crate::api::settings::remove_approver,
        crate::api::settings::reload_store
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            Division,
            LeaveStatus,
            LeaveRequest,
            LeaveForm,
            ValidationError,
            LeaveFilter,
            LeaveListResponse,
            QuotaQuery,
            SlotInfo,
            ParsedLeaveData,
            ImportRequest,
            ImportResponse,
            Settings,
            SaveSettings,
            AddApprover
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Approver login and logout"),
        (name = "Leave", description = "Leave request submission and review"),
        (name = "Settings", description = "Dashboard settings"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
