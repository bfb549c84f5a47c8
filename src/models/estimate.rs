use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{
    date, derived, require_non_negative, require_percent, require_quantity, require_text, CellFormat, Record,
};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum EstimateStatus {
    #[default]
    Draft,
    Submitted,
    Sanctioned,
}

/// One Bill of Quantities line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoqItem {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub quantity: f64,
    pub rate: Amount,
    #[serde(default)]
    pub amount: Amount,
}

impl BoqItem {
    pub fn new(code: &str, description: &str, unit: &str, quantity: f64, rate: Amount) -> Self {
        BoqItem {
            code: code.to_string(),
            description: description.to_string(),
            unit: unit.to_string(),
            quantity,
            rate,
            amount: rate.scale(quantity),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub prepared_by: String,
    pub estimate_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<BoqItem>,
    #[serde(default)]
    pub contingency_percent: f64,
    #[serde(default)]
    pub subtotal: Amount,
    #[serde(default)]
    pub contingency: Amount,
    #[serde(default)]
    pub total: Amount,
    pub status: EstimateStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateDraft {
    pub project_id: String,
    pub title: String,
    pub prepared_by: String,
    pub estimate_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<BoqItem>,
    #[serde(default)]
    pub contingency_percent: f64,
    #[serde(default)]
    pub status: EstimateStatus,
}

impl Record for Estimate {
    type Draft = EstimateDraft;
    type Status = EstimateStatus;

    const COLLECTION: Collection = Collection::Estimates;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Project ID",
        "Title",
        "Prepared By",
        "Estimate Date",
        "BOQ Items",
        "Subtotal",
        "Contingency %",
        "Contingency",
        "Total",
        "Status",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> EstimateStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.project_id.as_str(),
            self.title.as_str(),
            self.prepared_by.as_str(),
        ]
    }

    fn from_draft(id: String, draft: EstimateDraft) -> Self {
        Estimate {
            id,
            project_id: draft.project_id,
            title: draft.title,
            prepared_by: draft.prepared_by,
            estimate_date: draft.estimate_date,
            items: draft.items,
            contingency_percent: draft.contingency_percent,
            subtotal: Amount::ZERO,
            contingency: Amount::ZERO,
            total: Amount::ZERO,
            status: draft.status,
        }
    }

    fn derive_fields(&mut self) -> Result<(), StoreError> {
        for item in &mut self.items {
            item.amount = derived("item amount", item.rate.checked_scale(item.quantity))?;
        }
        let subtotal = self
            .items
            .iter()
            .try_fold(Amount::ZERO, |acc, item| acc.checked_add(item.amount));
        self.subtotal = derived("subtotal", subtotal)?;
        self.contingency = derived(
            "contingency",
            self.subtotal.checked_scale(self.contingency_percent / 100.0),
        )?;
        self.total = derived("total", self.subtotal.checked_add(self.contingency))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("project_id", &self.project_id)?;
        require_text("title", &self.title)?;
        require_text("prepared_by", &self.prepared_by)?;
        require_percent("contingency_percent", self.contingency_percent)?;
        for item in &self.items {
            require_text("item description", &item.description)?;
            require_text("item unit", &item.unit)?;
            require_quantity("item quantity", item.quantity)?;
            require_non_negative("item rate", item.rate)?;
        }
        if self.status == EstimateStatus::Sanctioned && self.items.is_empty() {
            return Err(StoreError::Validation(
                "an estimate without BOQ items cannot be sanctioned".to_string(),
            ));
        }
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.project_id.clone(),
            self.title.clone(),
            self.prepared_by.clone(),
            cells.date(self.estimate_date),
            self.items.len().to_string(),
            cells.amount(self.subtotal),
            format!("{:.2}", self.contingency_percent),
            cells.amount(self.contingency),
            cells.amount(self.total),
            self.status.to_string(),
        ]
    }

    fn sample_drafts() -> Vec<EstimateDraft> {
        vec![
            EstimateDraft {
                project_id: "PRJ-2024-001".to_string(),
                title: "Flyover approach road, Package A".to_string(),
                prepared_by: "EE, Roads Division".to_string(),
                estimate_date: date(2024, 1, 5),
                items: vec![
                    BoqItem::new("1.1", "Earthwork in excavation", "cum", 4_200.0, Amount::from_rupees(310)),
                    BoqItem::new("2.4", "PCC M15 bedding", "cum", 380.0, Amount::from_rupees(5_450)),
                    BoqItem::new("5.2", "Bituminous concrete 40 mm", "sqm", 9_600.0, Amount::from_rupees(720)),
                ],
                contingency_percent: 3.0,
                status: EstimateStatus::Sanctioned,
            },
            EstimateDraft {
                project_id: "PRJ-2024-002".to_string(),
                title: "DI K9 pipeline 600 mm".to_string(),
                prepared_by: "EE, Water Works".to_string(),
                estimate_date: date(2024, 2, 12),
                items: vec![
                    BoqItem::new("W-1", "Supply of DI K9 pipes 600 mm", "m", 2_800.0, Amount::from_rupees(14_200)),
                    BoqItem::new("W-2", "Laying and jointing", "m", 2_800.0, Amount::from_rupees(1_150)),
                ],
                contingency_percent: 5.0,
                status: EstimateStatus::Submitted,
            },
            EstimateDraft {
                project_id: "PRJ-2024-003".to_string(),
                title: "Health centre civil works".to_string(),
                prepared_by: "AE, Buildings".to_string(),
                estimate_date: date(2024, 5, 15),
                items: vec![BoqItem::new(
                    "B-3",
                    "RCC M25 framed structure",
                    "cum",
                    640.0,
                    Amount::from_rupees(9_800),
                )],
                contingency_percent: 0.0,
                status: EstimateStatus::Draft,
            },
        ]
    }
}
