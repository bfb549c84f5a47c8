use crate::models::collection::Collection;
use crate::models::record::{date, derived, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Days a public authority has to respond to an RTI application.
pub const RTI_RESPONSE_DAYS: i64 = 30;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum RtiStatus {
    #[default]
    Received,
    #[serde(rename = "Under Process")]
    #[strum(serialize = "Under Process")]
    UnderProcess,
    #[serde(rename = "Information Provided")]
    #[strum(serialize = "Information Provided")]
    InformationProvided,
    Rejected,
}

impl RtiStatus {
    pub fn is_open(self) -> bool {
        matches!(self, RtiStatus::Received | RtiStatus::UnderProcess)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtiApplication {
    pub id: String,
    pub applicant_name: String,
    pub subject: String,
    pub department: String,
    pub received_date: NaiveDate,
    #[serde(default)]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub fee_paid: bool,
    pub status: RtiStatus,
    #[serde(default)]
    pub reply_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtiApplicationDraft {
    pub applicant_name: String,
    pub subject: String,
    pub department: String,
    pub received_date: NaiveDate,
    #[serde(default)]
    pub fee_paid: bool,
    #[serde(default)]
    pub status: RtiStatus,
    #[serde(default)]
    pub reply_date: Option<NaiveDate>,
}

impl RtiApplication {
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.status.is_open() && self.due_date < as_of
    }
}

impl Record for RtiApplication {
    type Draft = RtiApplicationDraft;
    type Status = RtiStatus;

    const COLLECTION: Collection = Collection::Rti;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Applicant",
        "Subject",
        "Department",
        "Received",
        "Due",
        "Fee Paid",
        "Status",
        "Reply Date",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> RtiStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.applicant_name.as_str(),
            self.subject.as_str(),
            self.department.as_str(),
        ]
    }

    fn from_draft(id: String, draft: RtiApplicationDraft) -> Self {
        RtiApplication {
            id,
            applicant_name: draft.applicant_name,
            subject: draft.subject,
            department: draft.department,
            received_date: draft.received_date,
            due_date: draft.received_date,
            fee_paid: draft.fee_paid,
            status: draft.status,
            reply_date: draft.reply_date,
        }
    }

    fn derive_fields(&mut self) -> Result<(), StoreError> {
        self.due_date = derived(
            "due_date",
            self.received_date.checked_add_signed(Duration::days(RTI_RESPONSE_DAYS)),
        )?;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("applicant_name", &self.applicant_name)?;
        require_text("subject", &self.subject)?;
        require_text("department", &self.department)?;
        if let Some(reply) = self.reply_date {
            if reply < self.received_date {
                return Err(StoreError::Validation(
                    "reply date cannot be before the received date".to_string(),
                ));
            }
        }
        if self.status == RtiStatus::InformationProvided && self.reply_date.is_none() {
            return Err(StoreError::Validation(
                "reply_date is required once information is provided".to_string(),
            ));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.applicant_name.clone(),
            self.subject.clone(),
            self.department.clone(),
            cells.date(self.received_date),
            cells.date(self.due_date),
            if self.fee_paid { "Yes" } else { "No" }.to_string(),
            self.status.to_string(),
            cells.opt_date(self.reply_date),
        ]
    }

    fn sample_drafts() -> Vec<RtiApplicationDraft> {
        vec![
            RtiApplicationDraft {
                applicant_name: "Anil Kulkarni".to_string(),
                subject: "Copies of Ring Road flyover work orders".to_string(),
                department: "Public Works".to_string(),
                received_date: date(2024, 5, 2),
                fee_paid: true,
                status: RtiStatus::UnderProcess,
                reply_date: None,
            },
            RtiApplicationDraft {
                applicant_name: "Farida Khan".to_string(),
                subject: "Water tanker supply records, Ward 3".to_string(),
                department: "Water Supply".to_string(),
                received_date: date(2024, 4, 8),
                fee_paid: true,
                status: RtiStatus::InformationProvided,
                reply_date: Some(date(2024, 5, 3)),
            },
            RtiApplicationDraft {
                applicant_name: "Citizens' Forum Ward 7".to_string(),
                subject: "Health centre construction delay reasons".to_string(),
                department: "Health".to_string(),
                received_date: date(2024, 5, 27),
                fee_paid: false,
                status: RtiStatus::Received,
                reply_date: None,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::build_record;

    #[test]
    fn due_date_is_thirty_days_after_receipt() {
        let record = build_record::<RtiApplication>(
            "RTI-2024-001".to_string(),
            RtiApplication::sample_drafts()[0].clone(),
        )
        .unwrap();
        assert_eq!(record.due_date, date(2024, 6, 1));
        assert!(record.is_overdue(date(2024, 6, 2)));
        assert!(!record.is_overdue(date(2024, 6, 1)));
    }

    #[test]
    fn disposed_application_is_never_overdue() {
        let record = build_record::<RtiApplication>(
            "RTI-2024-002".to_string(),
            RtiApplication::sample_drafts()[1].clone(),
        )
        .unwrap();
        assert!(!record.is_overdue(date(2025, 1, 1)));
    }
}
