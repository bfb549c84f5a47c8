use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{date, derived, require_non_negative, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum PayableStatus {
    Paid,
    Approved,
    #[default]
    #[serde(rename = "Pending Approval")]
    #[strum(serialize = "Pending Approval")]
    PendingApproval,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payable {
    pub id: String,
    pub vendor: String,
    pub description: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Amount,
    pub paid_amount: Amount,
    #[serde(default)]
    pub pending_amount: Amount, // total - paid
    pub status: PayableStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayableDraft {
    pub vendor: String,
    pub description: String,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Amount,
    #[serde(default)]
    pub paid_amount: Amount,
    #[serde(default)]
    pub status: PayableStatus,
}

impl Payable {
    pub fn is_overdue(&self, as_of: NaiveDate) -> bool {
        self.status != PayableStatus::Paid && self.due_date < as_of
    }
}

impl Record for Payable {
    type Draft = PayableDraft;
    type Status = PayableStatus;

    const COLLECTION: Collection = Collection::Payables;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Vendor",
        "Description",
        "Invoice No",
        "Invoice Date",
        "Due Date",
        "Total",
        "Paid",
        "Pending",
        "Status",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> PayableStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.vendor.as_str(),
            self.description.as_str(),
            self.invoice_number.as_str(),
        ]
    }

    fn from_draft(id: String, draft: PayableDraft) -> Self {
        Payable {
            id,
            vendor: draft.vendor,
            description: draft.description,
            invoice_number: draft.invoice_number,
            invoice_date: draft.invoice_date,
            due_date: draft.due_date,
            total_amount: draft.total_amount,
            paid_amount: draft.paid_amount,
            pending_amount: Amount::ZERO,
            status: draft.status,
        }
    }

    fn derive_fields(&mut self) -> Result<(), StoreError> {
        self.pending_amount = derived("pending_amount", self.total_amount.checked_sub(self.paid_amount))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("vendor", &self.vendor)?;
        require_text("description", &self.description)?;
        require_text("invoice_number", &self.invoice_number)?;
        require_non_negative("total_amount", self.total_amount)?;
        require_non_negative("paid_amount", self.paid_amount)?;
        if self.paid_amount > self.total_amount {
            return Err(StoreError::Validation(format!(
                "paid amount {} exceeds invoice total {}",
                self.paid_amount, self.total_amount
            )));
        }
        if self.due_date < self.invoice_date {
            return Err(StoreError::Validation(
                "due date cannot be before the invoice date".to_string(),
            ));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.vendor.clone(),
            self.description.clone(),
            self.invoice_number.clone(),
            cells.date(self.invoice_date),
            cells.date(self.due_date),
            cells.amount(self.total_amount),
            cells.amount(self.paid_amount),
            cells.amount(self.pending_amount),
            self.status.to_string(),
        ]
    }

    fn sample_drafts() -> Vec<PayableDraft> {
        vec![
            PayableDraft {
                vendor: "ABC Builders Ltd.".to_string(),
                description: "Road resurfacing, Ward 12".to_string(),
                invoice_number: "INV-8841".to_string(),
                invoice_date: date(2024, 4, 10),
                due_date: date(2024, 5, 10),
                total_amount: Amount::from_rupees(4_500_000),
                paid_amount: Amount::from_rupees(4_500_000),
                status: PayableStatus::Paid,
            },
            PayableDraft {
                vendor: "Shree Pipes & Fittings".to_string(),
                description: "DI pipes for water main".to_string(),
                invoice_number: "SPF/24/113".to_string(),
                invoice_date: date(2024, 5, 2),
                due_date: date(2024, 6, 1),
                total_amount: Amount::from_rupees(2_750_000),
                paid_amount: Amount::from_rupees(1_000_000),
                status: PayableStatus::Approved,
            },
            PayableDraft {
                vendor: "Metro Electricals".to_string(),
                description: "Street light LED retrofit".to_string(),
                invoice_number: "ME-2024-077".to_string(),
                invoice_date: date(2024, 5, 20),
                due_date: date(2024, 6, 19),
                total_amount: Amount::from_rupees(1_280_000),
                paid_amount: Amount::ZERO,
                status: PayableStatus::PendingApproval,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{apply_patch, build_record};
    use serde_json::json;

    #[test]
    fn pending_is_total_minus_paid() {
        let payable =
            build_record::<Payable>("PAY-2024-002".to_string(), Payable::sample_drafts()[1].clone())
                .expect("valid sample");
        assert_eq!(payable.pending_amount, Amount::from_rupees(1_750_000));
        assert_eq!(payable.total_amount, payable.paid_amount + payable.pending_amount);
    }

    #[test]
    fn overpayment_is_rejected() {
        let payable =
            build_record::<Payable>("PAY-2024-003".to_string(), Payable::sample_drafts()[2].clone())
                .expect("valid sample");
        let result = apply_patch(&payable, &json!({ "paid_amount": 200_000_000i64 }));
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[test]
    fn status_label_has_spaces() {
        let payable =
            build_record::<Payable>("PAY-2024-003".to_string(), Payable::sample_drafts()[2].clone())
                .expect("valid sample");
        assert_eq!(payable.status_label(), "Pending Approval");
        let json = serde_json::to_value(&payable).expect("serialize");
        assert_eq!(json["status"], json!("Pending Approval"));
    }

    #[test]
    fn overdue_excludes_paid_bills() {
        let drafts = Payable::sample_drafts();
        let paid = build_record::<Payable>("PAY-2024-001".to_string(), drafts[0].clone()).unwrap();
        let open = build_record::<Payable>("PAY-2024-003".to_string(), drafts[2].clone()).unwrap();
        let as_of = date(2024, 7, 1);
        assert!(!paid.is_overdue(as_of));
        assert!(open.is_overdue(as_of));
        assert!(!open.is_overdue(date(2024, 6, 19)));
    }
}
