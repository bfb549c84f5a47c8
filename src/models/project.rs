use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{date, require_non_negative, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Ongoing,
    Completed,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
}

/// Project master entry. Other registers refer to it by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub department: String,
    pub ward: String,
    pub sanctioned_cost: Amount,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub department: String,
    pub ward: String,
    pub sanctioned_cost: Amount,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub status: ProjectStatus,
}

impl Record for Project {
    type Draft = ProjectDraft;
    type Status = ProjectStatus;

    const COLLECTION: Collection = Collection::Projects;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Name",
        "Department",
        "Ward",
        "Sanctioned Cost",
        "Start Date",
        "Target Date",
        "Status",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.name.as_str(),
            self.department.as_str(),
            self.ward.as_str(),
        ]
    }

    fn from_draft(id: String, draft: ProjectDraft) -> Self {
        Project {
            id,
            name: draft.name,
            department: draft.department,
            ward: draft.ward,
            sanctioned_cost: draft.sanctioned_cost,
            start_date: draft.start_date,
            target_date: draft.target_date,
            status: draft.status,
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("name", &self.name)?;
        require_text("department", &self.department)?;
        require_text("ward", &self.ward)?;
        require_non_negative("sanctioned_cost", self.sanctioned_cost)?;
        if self.target_date < self.start_date {
            return Err(StoreError::Validation(
                "target date cannot be before the start date".to_string(),
            ));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.department.clone(),
            self.ward.clone(),
            cells.amount(self.sanctioned_cost),
            cells.date(self.start_date),
            cells.date(self.target_date),
            self.status.to_string(),
        ]
    }

    fn sample_drafts() -> Vec<ProjectDraft> {
        vec![
            ProjectDraft {
                name: "Ring Road Flyover".to_string(),
                department: "Public Works".to_string(),
                ward: "Ward 12".to_string(),
                sanctioned_cost: Amount::from_rupees(1_450_000_000),
                start_date: date(2024, 1, 15),
                target_date: date(2026, 3, 31),
                status: ProjectStatus::Ongoing,
            },
            ProjectDraft {
                name: "Zone 3 Water Main".to_string(),
                department: "Water Supply".to_string(),
                ward: "Ward 3".to_string(),
                sanctioned_cost: Amount::from_rupees(620_000_000),
                start_date: date(2024, 3, 1),
                target_date: date(2025, 9, 30),
                status: ProjectStatus::Ongoing,
            },
            ProjectDraft {
                name: "Ward 7 Health Centre".to_string(),
                department: "Health".to_string(),
                ward: "Ward 7".to_string(),
                sanctioned_cost: Amount::from_rupees(95_000_000),
                start_date: date(2024, 2, 1),
                target_date: date(2025, 1, 31),
                status: ProjectStatus::OnHold,
            },
        ]
    }
}
