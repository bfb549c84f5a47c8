use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{date, opt_text, require_non_negative, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum DprStatus {
    #[default]
    Draft,
    Submitted,
    #[serde(rename = "Under Review")]
    #[strum(serialize = "Under Review")]
    UnderReview,
    Approved,
    #[serde(rename = "Revision Required")]
    #[strum(serialize = "Revision Required")]
    RevisionRequired,
}

/// Detailed Project Report and its design review state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dpr {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub consultant: String,
    pub estimated_cost: Amount,
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    #[serde(default = "first_revision")]
    pub revision: u32,
    pub status: DprStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DprDraft {
    pub project_id: String,
    pub title: String,
    pub consultant: String,
    pub estimated_cost: Amount,
    #[serde(default)]
    pub submission_date: Option<NaiveDate>,
    #[serde(default = "first_revision")]
    pub revision: u32,
    #[serde(default)]
    pub status: DprStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

fn first_revision() -> u32 {
    1
}

impl Record for Dpr {
    type Draft = DprDraft;
    type Status = DprStatus;

    const COLLECTION: Collection = Collection::Dpr;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Project ID",
        "Title",
        "Consultant",
        "Estimated Cost",
        "Submitted On",
        "Revision",
        "Status",
        "Remarks",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> DprStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.project_id.as_str(),
            self.title.as_str(),
            self.consultant.as_str(),
        ]
    }

    fn from_draft(id: String, draft: DprDraft) -> Self {
        Dpr {
            id,
            project_id: draft.project_id,
            title: draft.title,
            consultant: draft.consultant,
            estimated_cost: draft.estimated_cost,
            submission_date: draft.submission_date,
            revision: draft.revision,
            status: draft.status,
            remarks: draft.remarks,
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("project_id", &self.project_id)?;
        require_text("title", &self.title)?;
        require_text("consultant", &self.consultant)?;
        require_non_negative("estimated_cost", self.estimated_cost)?;
        if self.status != DprStatus::Draft && self.submission_date.is_none() {
            return Err(StoreError::Validation(format!(
                "submission_date is required once a DPR is {}",
                self.status
            )));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.project_id.clone(),
            self.title.clone(),
            self.consultant.clone(),
            cells.amount(self.estimated_cost),
            cells.opt_date(self.submission_date),
            self.revision.to_string(),
            self.status.to_string(),
            opt_text(&self.remarks),
        ]
    }

    fn sample_drafts() -> Vec<DprDraft> {
        vec![
            DprDraft {
                project_id: "PRJ-2024-001".to_string(),
                title: "Ring Road Flyover DPR".to_string(),
                consultant: "InfraPlan Consultants".to_string(),
                estimated_cost: Amount::from_rupees(1_450_000_000),
                submission_date: Some(date(2023, 11, 6)),
                revision: 2,
                status: DprStatus::Approved,
                remarks: None,
            },
            DprDraft {
                project_id: "PRJ-2024-002".to_string(),
                title: "Zone 3 Water Main Augmentation".to_string(),
                consultant: "HydroTech Engineering".to_string(),
                estimated_cost: Amount::from_rupees(620_000_000),
                submission_date: Some(date(2024, 2, 20)),
                revision: 1,
                status: DprStatus::UnderReview,
                remarks: Some("Hydraulic model requested".to_string()),
            },
            DprDraft {
                project_id: "PRJ-2024-004".to_string(),
                title: "Solid Waste Transfer Station".to_string(),
                consultant: "GreenCity Advisors".to_string(),
                estimated_cost: Amount::from_rupees(310_000_000),
                submission_date: None,
                revision: 1,
                status: DprStatus::Draft,
                remarks: None,
            },
        ]
    }
}
