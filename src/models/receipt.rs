use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{date, opt_text, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum ReceiptStatus {
    Cleared,
    #[default]
    Pending,
    Bounced,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum PaymentMode {
    #[default]
    Cash,
    Cheque,
    Online,
    #[serde(rename = "Demand Draft")]
    #[strum(serialize = "Demand Draft")]
    DemandDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub payer: String,
    pub description: String,
    pub revenue_head: String,
    pub amount: Amount,
    pub receipt_date: NaiveDate,
    pub mode: PaymentMode,
    #[serde(default)]
    pub reference_number: Option<String>,
    pub status: ReceiptStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDraft {
    pub payer: String,
    pub description: String,
    pub revenue_head: String,
    pub amount: Amount,
    pub receipt_date: NaiveDate,
    #[serde(default)]
    pub mode: PaymentMode,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub status: ReceiptStatus,
}

impl Record for Receipt {
    type Draft = ReceiptDraft;
    type Status = ReceiptStatus;

    const COLLECTION: Collection = Collection::Receipts;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Payer",
        "Description",
        "Revenue Head",
        "Amount",
        "Date",
        "Mode",
        "Reference",
        "Status",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ReceiptStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.payer.as_str(),
            self.description.as_str(),
            self.revenue_head.as_str(),
        ]
    }

    fn from_draft(id: String, draft: ReceiptDraft) -> Self {
        Receipt {
            id,
            payer: draft.payer,
            description: draft.description,
            revenue_head: draft.revenue_head,
            amount: draft.amount,
            receipt_date: draft.receipt_date,
            mode: draft.mode,
            reference_number: draft.reference_number,
            status: draft.status,
        }
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("payer", &self.payer)?;
        require_text("description", &self.description)?;
        require_text("revenue_head", &self.revenue_head)?;
        if self.amount <= Amount::ZERO {
            return Err(StoreError::Validation("amount must be greater than zero".to_string()));
        }
        if matches!(self.mode, PaymentMode::Cheque | PaymentMode::DemandDraft)
            && self.reference_number.as_deref().map_or(true, |r| r.trim().is_empty())
        {
            return Err(StoreError::Validation(format!(
                "reference_number is required for {} receipts",
                self.mode
            )));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.payer.clone(),
            self.description.clone(),
            self.revenue_head.clone(),
            cells.amount(self.amount),
            cells.date(self.receipt_date),
            self.mode.to_string(),
            opt_text(&self.reference_number),
            self.status.to_string(),
        ]
    }

    fn sample_drafts() -> Vec<ReceiptDraft> {
        vec![
            ReceiptDraft {
                payer: "Sunrise Apartments CHS".to_string(),
                description: "Property tax 2024-25".to_string(),
                revenue_head: "Property Tax".to_string(),
                amount: Amount::from_rupees(184_500),
                receipt_date: date(2024, 4, 18),
                mode: PaymentMode::Online,
                reference_number: Some("UTR4411982".to_string()),
                status: ReceiptStatus::Cleared,
            },
            ReceiptDraft {
                payer: "Kiran Traders".to_string(),
                description: "Trade licence renewal".to_string(),
                revenue_head: "Licence Fees".to_string(),
                amount: Amount::from_rupees(12_000),
                receipt_date: date(2024, 5, 6),
                mode: PaymentMode::Cheque,
                reference_number: Some("004512".to_string()),
                status: ReceiptStatus::Pending,
            },
            ReceiptDraft {
                payer: "R. Deshmukh".to_string(),
                description: "Water connection charges".to_string(),
                revenue_head: "Water Charges".to_string(),
                amount: Amount::from_rupees(6_500),
                receipt_date: date(2024, 5, 21),
                mode: PaymentMode::Cash,
                reference_number: None,
                status: ReceiptStatus::Cleared,
            },
        ]
    }
}
