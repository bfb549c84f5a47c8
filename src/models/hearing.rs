use crate::models::collection::Collection;
use crate::models::record::{date, opt_text, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum HearingStatus {
    #[default]
    Scheduled,
    Completed,
    Adjourned,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hearing {
    pub id: String,
    pub case_number: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub party_name: String,
    pub subject: String,
    pub hearing_date: NaiveDate,
    pub venue: String,
    pub officer: String,
    pub status: HearingStatus,
    #[serde(default)]
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingDraft {
    pub case_number: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub party_name: String,
    pub subject: String,
    pub hearing_date: NaiveDate,
    pub venue: String,
    pub officer: String,
    #[serde(default)]
    pub status: HearingStatus,
    #[serde(default)]
    pub outcome: Option<String>,
}

impl Hearing {
    pub fn is_upcoming(&self, as_of: NaiveDate) -> bool {
        self.status == HearingStatus::Scheduled && self.hearing_date >= as_of
    }
}

impl Record for Hearing {
    type Draft = HearingDraft;
    type Status = HearingStatus;

    const COLLECTION: Collection = Collection::Hearings;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Case No",
        "Project ID",
        "Party",
        "Subject",
        "Hearing Date",
        "Venue",
        "Officer",
        "Status",
        "Outcome",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> HearingStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.case_number.as_str(),
            self.party_name.as_str(),
            self.subject.as_str(),
            self.officer.as_str(),
        ]
    }

    fn from_draft(id: String, draft: HearingDraft) -> Self {
        Hearing {
            id,
            case_number: draft.case_number,
            project_id: draft.project_id,
            party_name: draft.party_name,
            subject: draft.subject,
            hearing_date: draft.hearing_date,
            venue: draft.venue,
            officer: draft.officer,
            status: draft.status,
            outcome: draft.outcome,
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("case_number", &self.case_number)?;
        require_text("party_name", &self.party_name)?;
        require_text("subject", &self.subject)?;
        require_text("venue", &self.venue)?;
        require_text("officer", &self.officer)?;
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.case_number.clone(),
            opt_text(&self.project_id),
            self.party_name.clone(),
            self.subject.clone(),
            cells.date(self.hearing_date),
            self.venue.clone(),
            self.officer.clone(),
            self.status.to_string(),
            opt_text(&self.outcome),
        ]
    }

    fn sample_drafts() -> Vec<HearingDraft> {
        vec![
            HearingDraft {
                case_number: "LAQ/OBJ/14/2024".to_string(),
                project_id: Some("PRJ-2024-001".to_string()),
                party_name: "Sunita Kale".to_string(),
                subject: "Objection to award amount".to_string(),
                hearing_date: date(2024, 6, 12),
                venue: "Collectorate Hall 2".to_string(),
                officer: "Dy. Collector (LA)".to_string(),
                status: HearingStatus::Scheduled,
                outcome: None,
            },
            HearingDraft {
                case_number: "LAQ/OBJ/09/2024".to_string(),
                project_id: Some("PRJ-2024-001".to_string()),
                party_name: "Ramesh Patil".to_string(),
                subject: "Boundary dispute, Survey 112/2A".to_string(),
                hearing_date: date(2024, 3, 18),
                venue: "Collectorate Hall 2".to_string(),
                officer: "Dy. Collector (LA)".to_string(),
                status: HearingStatus::Completed,
                outcome: Some("Boundary re-measured; objection disposed".to_string()),
            },
            HearingDraft {
                case_number: "ENC/221/2024".to_string(),
                project_id: None,
                party_name: "Kiran Traders".to_string(),
                subject: "Footpath encroachment notice".to_string(),
                hearing_date: date(2024, 5, 29),
                venue: "Ward Office 12".to_string(),
                officer: "Asst. Commissioner".to_string(),
                status: HearingStatus::Adjourned,
                outcome: None,
            },
        ]
    }
}
