use crate::models::collection::Collection;
use crate::models::money::{percentage, Amount};
use crate::models::record::{derived, require_non_negative, require_text, CellFormat, Record};
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum BudgetStatus {
    #[default]
    Active,
    Inactive,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub department: String,
    pub head: String,
    pub fiscal_year: String,
    pub allocated: Amount,
    pub utilized: Amount,
    #[serde(default)]
    pub available: Amount, // allocated - utilized
    pub status: BudgetStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDraft {
    pub department: String,
    pub head: String,
    pub fiscal_year: String,
    pub allocated: Amount,
    #[serde(default)]
    pub utilized: Amount,
    #[serde(default)]
    pub status: BudgetStatus,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl Budget {
    pub fn utilization_percent(&self) -> u32 {
        percentage(self.utilized, self.allocated)
    }
}

impl Record for Budget {
    type Draft = BudgetDraft;
    type Status = BudgetStatus;

    const COLLECTION: Collection = Collection::Budgets;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Department",
        "Budget Head",
        "Fiscal Year",
        "Allocated",
        "Utilized",
        "Available",
        "Utilization %",
        "Status",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> BudgetStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.department.as_str(), self.head.as_str()]
    }

    fn from_draft(id: String, draft: BudgetDraft) -> Self {
        Budget {
            id,
            department: draft.department,
            head: draft.head,
            fiscal_year: draft.fiscal_year,
            allocated: draft.allocated,
            utilized: draft.utilized,
            available: Amount::ZERO,
            status: draft.status,
            remarks: draft.remarks,
        }
    }

    fn derive_fields(&mut self) -> Result<(), StoreError> {
        self.available = derived("available", self.allocated.checked_sub(self.utilized))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("department", &self.department)?;
        require_text("head", &self.head)?;
        require_text("fiscal_year", &self.fiscal_year)?;
        require_non_negative("allocated", self.allocated)?;
        require_non_negative("utilized", self.utilized)?;
        if self.utilized > self.allocated {
            return Err(StoreError::Validation(format!(
                "utilized amount {} exceeds allocation {}",
                self.utilized, self.allocated
            )));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.department.clone(),
            self.head.clone(),
            self.fiscal_year.clone(),
            cells.amount(self.allocated),
            cells.amount(self.utilized),
            cells.amount(self.available),
            self.utilization_percent().to_string(),
            self.status.to_string(),
        ]
    }

    fn sample_drafts() -> Vec<BudgetDraft> {
        vec![
            BudgetDraft {
                department: "Public Works".to_string(),
                head: "Road Maintenance".to_string(),
                fiscal_year: "2024-25".to_string(),
                allocated: Amount::from_rupees(350_000_000),
                utilized: Amount::from_rupees(210_000_000),
                status: BudgetStatus::Active,
                remarks: None,
            },
            BudgetDraft {
                department: "Water Supply".to_string(),
                head: "Pipeline Replacement".to_string(),
                fiscal_year: "2024-25".to_string(),
                allocated: Amount::from_rupees(280_000_000),
                utilized: Amount::from_rupees(175_000_000),
                status: BudgetStatus::Active,
                remarks: Some("Phase II tender awarded".to_string()),
            },
            BudgetDraft {
                department: "Health".to_string(),
                head: "Primary Health Centres".to_string(),
                fiscal_year: "2024-25".to_string(),
                allocated: Amount::from_rupees(250_000_000),
                utilized: Amount::from_rupees(146_000_000),
                status: BudgetStatus::Inactive,
                remarks: None,
            },
        ]
    }
}
