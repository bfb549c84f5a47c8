use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{
    date, derived, require_non_negative, require_quantity, require_text, CellFormat, Record,
};
use crate::models::status::{classify_payment, PaymentStatus};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Land-acquisition compensation payable to one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compensation {
    pub id: String,
    pub project_id: String,
    pub owner_name: String,
    pub survey_number: String,
    pub village: String,
    pub land_area_sqm: f64,
    pub market_value: Amount,
    pub solatium: Amount,
    pub interest: Amount,
    #[serde(default)]
    pub total_compensation: Amount,
    #[serde(default)]
    pub paid_amount: Amount,
    #[serde(default)]
    pub pending_amount: Amount,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub award_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationDraft {
    pub project_id: String,
    pub owner_name: String,
    pub survey_number: String,
    pub village: String,
    pub land_area_sqm: f64,
    pub market_value: Amount,
    pub solatium: Amount,
    pub interest: Amount,
    #[serde(default)]
    pub paid_amount: Amount,
    #[serde(default)]
    pub award_date: Option<NaiveDate>,
}

impl Record for Compensation {
    type Draft = CompensationDraft;
    type Status = PaymentStatus;

    const COLLECTION: Collection = Collection::Compensation;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Project ID",
        "Owner",
        "Survey No",
        "Village",
        "Area (sq m)",
        "Market Value",
        "Solatium",
        "Interest",
        "Total Compensation",
        "Paid",
        "Pending",
        "Status",
        "Award Date",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.project_id.as_str(),
            self.owner_name.as_str(),
            self.survey_number.as_str(),
        ]
    }

    fn from_draft(id: String, draft: CompensationDraft) -> Self {
        Compensation {
            id,
            project_id: draft.project_id,
            owner_name: draft.owner_name,
            survey_number: draft.survey_number,
            village: draft.village,
            land_area_sqm: draft.land_area_sqm,
            market_value: draft.market_value,
            solatium: draft.solatium,
            interest: draft.interest,
            total_compensation: Amount::ZERO,
            paid_amount: draft.paid_amount,
            pending_amount: Amount::ZERO,
            status: PaymentStatus::default(),
            award_date: draft.award_date,
        }
    }

    fn derive_fields(&mut self) -> Result<(), StoreError> {
        let total = self
            .market_value
            .checked_add(self.solatium)
            .and_then(|sum| sum.checked_add(self.interest));
        self.total_compensation = derived("total_compensation", total)?;
        self.pending_amount = derived(
            "pending_amount",
            self.total_compensation.checked_sub(self.paid_amount),
        )?;
        self.status = classify_payment(self.total_compensation, self.paid_amount);
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("project_id", &self.project_id)?;
        require_text("owner_name", &self.owner_name)?;
        require_text("survey_number", &self.survey_number)?;
        require_text("village", &self.village)?;
        require_quantity("land_area_sqm", self.land_area_sqm)?;
        require_non_negative("market_value", self.market_value)?;
        require_non_negative("solatium", self.solatium)?;
        require_non_negative("interest", self.interest)?;
        require_non_negative("paid_amount", self.paid_amount)?;
        if self.paid_amount > self.total_compensation {
            return Err(StoreError::Validation(format!(
                "paid amount {} exceeds total compensation {}",
                self.paid_amount, self.total_compensation
            )));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.project_id.clone(),
            self.owner_name.clone(),
            self.survey_number.clone(),
            self.village.clone(),
            format!("{:.2}", self.land_area_sqm),
            cells.amount(self.market_value),
            cells.amount(self.solatium),
            cells.amount(self.interest),
            cells.amount(self.total_compensation),
            cells.amount(self.paid_amount),
            cells.amount(self.pending_amount),
            self.status.to_string(),
            cells.opt_date(self.award_date),
        ]
    }

    fn sample_drafts() -> Vec<CompensationDraft> {
        vec![
            CompensationDraft {
                project_id: "PRJ-2024-001".to_string(),
                owner_name: "Ramesh Patil".to_string(),
                survey_number: "112/2A".to_string(),
                village: "Wakad".to_string(),
                land_area_sqm: 850.0,
                market_value: Amount::from_rupees(6_000_000),
                solatium: Amount::from_rupees(1_800_000),
                interest: Amount::from_rupees(450_000),
                paid_amount: Amount::from_rupees(8_250_000),
                award_date: Some(date(2024, 2, 14)),
            },
            CompensationDraft {
                project_id: "PRJ-2024-001".to_string(),
                owner_name: "Sunita Kale".to_string(),
                survey_number: "114/1".to_string(),
                village: "Wakad".to_string(),
                land_area_sqm: 420.0,
                market_value: Amount::from_rupees(3_000_000),
                solatium: Amount::from_rupees(900_000),
                interest: Amount::from_rupees(200_000),
                paid_amount: Amount::from_rupees(2_000_000),
                award_date: Some(date(2024, 3, 1)),
            },
            CompensationDraft {
                project_id: "PRJ-2024-002".to_string(),
                owner_name: "Iqbal Shaikh".to_string(),
                survey_number: "57/3B".to_string(),
                village: "Punawale".to_string(),
                land_area_sqm: 610.0,
                market_value: Amount::from_rupees(4_200_000),
                solatium: Amount::from_rupees(1_260_000),
                interest: Amount::from_rupees(310_000),
                paid_amount: Amount::ZERO,
                award_date: None,
            },
        ]
    }
}
