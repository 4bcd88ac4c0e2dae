use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::division::Division;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "3f0c2b0e9d6a4c1f8e2b7a5d4c3b2a10",
    "nama": "ANDI",
    "division": "CS",
    "situs": "TYVOTO",
    "perihal": "Pengajuan Cuti Ambil Paspor",
    "noPaspor": "C0629TTR",
    "startDate": "2025-12-02",
    "endDate": "2025-12-16",
    "keterangan": "CUTI INDONESIA",
    "accLdr": "BUFON",
    "status": "PENDING",
    "createdAt": "2025-11-20T08:00:00Z"
}))]
pub struct LeaveRequest {
    pub id: String,
    /// requester name
    pub nama: String,
    pub division: Division,
    /// site
    pub situs: String,
    /// subject
    pub perihal: String,
    #[serde(default)]
    pub no_paspor: Option<String>,
    #[schema(value_type = String, format = "date")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = "date")]
    pub end_date: NaiveDate,
    /// remarks
    pub keterangan: String,
    /// approving leader
    pub acc_ldr: String,
    pub status: LeaveStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// A validated submission, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub nama: String,
    pub division: Division,
    pub situs: String,
    pub perihal: String,
    pub no_paspor: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub keterangan: String,
    pub acc_ldr: String,
}

impl NewLeaveRequest {
    pub fn into_request(self, id: String, created_at: DateTime<Utc>) -> LeaveRequest {
        LeaveRequest {
            id,
            nama: self.nama,
            division: self.division,
            situs: self.situs,
            perihal: self.perihal,
            no_paspor: self.no_paspor,
            start_date: self.start_date,
            end_date: self.end_date,
            keterangan: self.keterangan,
            acc_ldr: self.acc_ldr,
            status: LeaveStatus::Pending,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persisted_field_names() {
        let json = serde_json::json!({
            "id": "abc123xyz",
            "nama": "ANDI",
            "division": "CS_LINE",
            "situs": "TYVOTO",
            "perihal": "Pengajuan Cuti",
            "noPaspor": null,
            "startDate": "2025-12-02",
            "endDate": "2025-12-16",
            "keterangan": "CUTI LOKAL",
            "accLdr": "BUFON",
            "status": "APPROVED",
            "createdAt": "2025-11-20T08:00:00Z"
        });

        let req: LeaveRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.division, Division::CsLine);
        assert_eq!(req.status, LeaveStatus::Approved);
        assert_eq!(req.no_paspor, None);
        assert_eq!(req.start_date, NaiveDate::from_ymd_opt(2025, 12, 2).unwrap());

        let back = serde_json::to_value(&req).unwrap();
        assert_eq!(back["accLdr"], "BUFON");
        assert_eq!(back["status"], "APPROVED");
    }
}
