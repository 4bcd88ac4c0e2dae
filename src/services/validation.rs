use chrono::{Months, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::division::Division;
use crate::model::leave_request::{LeaveRequest, NewLeaveRequest};
use crate::parser::ParsedLeaveData;
use crate::parser::date_range::resolve_date_range;
use crate::services::quota::{same_month, slot_info};

/// How far ahead of the leave a request may be filed.
pub const MAX_ADVANCE_MONTHS: u32 = 2;

/// Submission form as entered (or prefilled from pasted text).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaveForm {
    #[schema(example = "ANDI")]
    pub nama: String,
    pub division: Option<Division>,
    #[schema(example = "TYVOTO")]
    pub situs: String,
    #[schema(example = "Pengajuan Cuti Ambil Paspor")]
    pub perihal: String,
    #[schema(example = "C0629TTR")]
    pub no_paspor: String,
    #[schema(value_type = Option<String>, format = "date", example = "2025-12-02")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date", example = "2025-12-16")]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "CUTI INDONESIA")]
    pub keterangan: String,
    #[schema(example = "BUFON")]
    pub acc_ldr: String,
}

impl LeaveForm {
    /// Form state after importing pasted text. Dates come from the tolerant range resolver, not
    /// from the dates staged on `parsed`.
    pub fn prefill(parsed: &ParsedLeaveData, today: NaiveDate) -> Self {
        let mut form = LeaveForm {
            division: Some(parsed.division.unwrap_or(Division::Cs)),
            ..Default::default()
        };

        let copy = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.clone();
            }
        };
        copy(&mut form.nama, &parsed.nama);
        copy(&mut form.situs, &parsed.situs);
        copy(&mut form.perihal, &parsed.perihal);
        copy(&mut form.no_paspor, &parsed.no_paspor);
        copy(&mut form.keterangan, &parsed.keterangan);
        copy(&mut form.acc_ldr, &parsed.acc_ldr);

        if let Some(range) = parsed.tanggal_pengajuan.as_deref() {
            match resolve_date_range(range, today) {
                Ok((start, end)) => {
                    form.start_date = Some(start);
                    form.end_date = Some(end);
                }
                Err(e) => tracing::debug!(error = %e, range, "Date range left for manual entry"),
            }
        }

        form
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, ToSchema)]
#[display(fmt = "{}: {}", field, message)]
pub struct ValidationError {
    #[schema(value_type = String, example = "endDate")]
    pub field: &'static str,
    #[schema(example = "Tanggal selesai harus setelah tanggal mulai")]
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl std::error::Error for ValidationError {}

fn require_len(
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.chars().count() < min {
        return Err(ValidationError::new(field, message));
    }
    Ok(value.to_string())
}

/// Check a submission against the form schema and the filing policy.
///
/// Quota only applies to leave starting in the current month; later months are never blocked here.
pub fn validate_submission(
    form: &LeaveForm,
    requests: &[LeaveRequest],
    today: NaiveDate,
) -> Result<NewLeaveRequest, ValidationError> {
    let nama = require_len("nama", &form.nama, 2, "Nama minimal 2 karakter")?;
    let division = form
        .division
        .ok_or_else(|| ValidationError::new("division", "Divisi wajib dipilih"))?;
    let situs = require_len("situs", &form.situs, 2, "Situs minimal 2 karakter")?;
    let perihal = require_len("perihal", &form.perihal, 5, "Perihal minimal 5 karakter")?;
    let start_date = form
        .start_date
        .ok_or_else(|| ValidationError::new("startDate", "Tanggal mulai wajib diisi"))?;
    let end_date = form
        .end_date
        .ok_or_else(|| ValidationError::new("endDate", "Tanggal selesai wajib diisi"))?;
    let keterangan =
        require_len("keterangan", &form.keterangan, 5, "Keterangan minimal 5 karakter")?;
    let acc_ldr = require_len("accLdr", &form.acc_ldr, 2, "Nama ACC LDR minimal 2 karakter")?;

    if end_date < start_date {
        return Err(ValidationError::new(
            "endDate",
            "Tanggal selesai harus setelah tanggal mulai",
        ));
    }

    let latest_start = today
        .checked_add_months(Months::new(MAX_ADVANCE_MONTHS))
        .unwrap_or(NaiveDate::MAX);
    if start_date > latest_start {
        return Err(ValidationError::new(
            "startDate",
            "Pengajuan maksimal 2 bulan sebelum cuti",
        ));
    }

    if same_month(start_date, today) && slot_info(requests, division, today).is_full {
        return Err(ValidationError::new(
            "division",
            "Slot cuti untuk divisi ini bulan ini sudah penuh",
        ));
    }

    let no_paspor = Some(form.no_paspor.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string);

    Ok(NewLeaveRequest {
        nama,
        division,
        situs,
        perihal,
        no_paspor,
        start_date,
        end_date,
        keterangan,
        acc_ldr,
    })
}
