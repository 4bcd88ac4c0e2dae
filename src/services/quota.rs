use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::model::division::Division;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotInfo {
    pub division: Division,
    pub label: String,
    pub used: u32,
    pub total: u32,
    pub available: u32,
    pub is_full: bool,
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Monthly slot usage of `division`: approved requests starting in `today`'s month.
pub fn slot_info(requests: &[LeaveRequest], division: Division, today: NaiveDate) -> SlotInfo {
    let used = requests
        .iter()
        .filter(|r| r.status == LeaveStatus::Approved && r.division == division)
        .filter(|r| same_month(r.start_date, today))
        .count() as u32;

    let total = division.monthly_limit();
    let available = total.saturating_sub(used);

    SlotInfo {
        division,
        label: division.label().to_string(),
        used,
        total,
        available,
        is_full: available == 0,
    }
}

pub fn all_slots(requests: &[LeaveRequest], today: NaiveDate) -> Vec<SlotInfo> {
    Division::iter()
        .map(|division| slot_info(requests, division, today))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    pub(crate) fn request(
        id: &str,
        division: Division,
        status: LeaveStatus,
        start: NaiveDate,
    ) -> LeaveRequest {
        LeaveRequest {
            id: id.to_string(),
            nama: "ANDI".to_string(),
            division,
            situs: "TYVOTO".to_string(),
            perihal: "Pengajuan Cuti".to_string(),
            no_paspor: None,
            start_date: start,
            end_date: start,
            keterangan: "CUTI KERJA".to_string(),
            acc_ldr: "BUFON".to_string(),
            status,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_division() {
        let today = date(2025, 6, 15);
        let requests = vec![
            request("1", Division::Cs, LeaveStatus::Approved, date(2025, 6, 1)),
            request("2", Division::Cs, LeaveStatus::Approved, date(2025, 6, 30)),
            request("3", Division::Cs, LeaveStatus::Approved, date(2025, 7, 1)),
        ];

        let info = slot_info(&requests, Division::Cs, today);
        assert_eq!(info.used, 2);
        assert_eq!(info.total, 2);
        assert_eq!(info.available, 0);
        assert!(info.is_full);
    }

    #[test]
    fn test_only_approved_same_division_same_month_count() {
        let today = date(2025, 6, 15);
        let requests = vec![
            request("1", Division::Kasir, LeaveStatus::Approved, date(2025, 6, 2)),
            request("2", Division::Kasir, LeaveStatus::Pending, date(2025, 6, 3)),
            request("3", Division::Kasir, LeaveStatus::Rejected, date(2025, 6, 4)),
            request("4", Division::Cs, LeaveStatus::Approved, date(2025, 6, 5)),
            request("5", Division::Kasir, LeaveStatus::Approved, date(2024, 6, 5)),
        ];

        let info = slot_info(&requests, Division::Kasir, today);
        assert_eq!(info.used, 1);
        assert_eq!(info.available, 2);
        assert!(!info.is_full);
    }

    #[test]
    fn test_over_limit_never_negative() {
        let today = date(2025, 6, 15);
        let requests = vec![
            request("1", Division::Kapten, LeaveStatus::Approved, date(2025, 6, 1)),
            request("2", Division::Kapten, LeaveStatus::Approved, date(2025, 6, 2)),
        ];
        let info = slot_info(&requests, Division::Kapten, today);
        assert_eq!(info.used, 2);
        assert_eq!(info.available, 0);
        assert!(info.is_full);
    }

    #[test]
    fn test_all_slots_in_declaration_order() {
        let slots = all_slots(&[], date(2025, 6, 15));
        let labels: Vec<&str> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["KAPTEN", "CS", "KASIR", "CS LINE"]);
        assert!(slots.iter().all(|s| s.used == 0 && s.available == s.total));
    }
}
