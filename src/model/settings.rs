use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_MAX_ADVANCE_DAYS: &str = "60";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "approverEmails": "approver@cuti.local, lead@cuti.local",
    "adminPassword": "secret",
    "maxAdvanceDays": "60"
}))]
pub struct Settings {
    /// comma separated
    pub approver_emails: String,
    pub admin_password: String,
    #[serde(default = "default_max_advance_days")]
    pub max_advance_days: String,
}

fn default_max_advance_days() -> String {
    DEFAULT_MAX_ADVANCE_DAYS.to_string()
}

impl Settings {
    pub fn new(approver_email: &str, admin_password: &str) -> Self {
        Self {
            approver_emails: approver_email.to_string(),
            admin_password: admin_password.to_string(),
            max_advance_days: default_max_advance_days(),
        }
    }

    pub fn approvers(&self) -> Vec<String> {
        self.approver_emails
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn set_approvers(&mut self, emails: &[String]) {
        self.approver_emails = emails.join(", ");
    }

    pub fn is_approver(&self, email: &str) -> bool {
        self.approvers().iter().any(|e| e == email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approver_list_is_trimmed() {
        let settings = Settings {
            approver_emails: "a@x.id,b@x.id , ,c@x.id".to_string(),
            admin_password: "pw".to_string(),
            max_advance_days: "60".to_string(),
        };
        assert_eq!(settings.approvers(), vec!["a@x.id", "b@x.id", "c@x.id"]);
        assert!(settings.is_approver("b@x.id"));
        assert!(!settings.is_approver("d@x.id"));
    }

    #[test]
    fn test_set_approvers_joins() {
        let mut settings = Settings::new("a@x.id", "pw");
        settings.set_approvers(&["a@x.id".to_string(), "b@x.id".to_string()]);
        assert_eq!(settings.approver_emails, "a@x.id, b@x.id");
    }

    #[test]
    fn test_missing_max_advance_days_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"approverEmails":"a@x.id","adminPassword":"pw"}"#).unwrap();
        assert_eq!(settings.max_advance_days, "60");
    }
}
