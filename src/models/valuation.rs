use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::models::record::{date, derived, require_non_negative, require_quantity, require_text, CellFormat, Record};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr, Default,
)]
pub enum ValuationStatus {
    #[default]
    Draft,
    Verified,
    Approved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Valuation {
    pub id: String,
    pub project_id: String,
    pub owner_name: String,
    pub survey_number: String,
    pub land_area_sqm: f64,
    pub rate_per_sqm: Amount,
    #[serde(default)]
    pub land_value: Amount, // area * rate
    pub structure_value: Amount,
    #[serde(default)]
    pub total_value: Amount,
    pub valuer: String,
    pub valuation_date: NaiveDate,
    pub status: ValuationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationDraft {
    pub project_id: String,
    pub owner_name: String,
    pub survey_number: String,
    pub land_area_sqm: f64,
    pub rate_per_sqm: Amount,
    #[serde(default)]
    pub structure_value: Amount,
    pub valuer: String,
    pub valuation_date: NaiveDate,
    #[serde(default)]
    pub status: ValuationStatus,
}

impl Record for Valuation {
    type Draft = ValuationDraft;
    type Status = ValuationStatus;

    const COLLECTION: Collection = Collection::Valuations;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Project ID",
        "Owner",
        "Survey No",
        "Area (sq m)",
        "Rate / sq m",
        "Land Value",
        "Structure Value",
        "Total Value",
        "Valuer",
        "Valuation Date",
        "Status",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ValuationStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.project_id.as_str(),
            self.owner_name.as_str(),
            self.survey_number.as_str(),
            self.valuer.as_str(),
        ]
    }

    fn from_draft(id: String, draft: ValuationDraft) -> Self {
        Valuation {
            id,
            project_id: draft.project_id,
            owner_name: draft.owner_name,
            survey_number: draft.survey_number,
            land_area_sqm: draft.land_area_sqm,
            rate_per_sqm: draft.rate_per_sqm,
            land_value: Amount::ZERO,
            structure_value: draft.structure_value,
            total_value: Amount::ZERO,
            valuer: draft.valuer,
            valuation_date: draft.valuation_date,
            status: draft.status,
        }
    }

    fn derive_fields(&mut self) -> Result<(), StoreError> {
        self.land_value = derived("land_value", self.rate_per_sqm.checked_scale(self.land_area_sqm))?;
        self.total_value = derived("total_value", self.land_value.checked_add(self.structure_value))?;
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("project_id", &self.project_id)?;
        require_text("owner_name", &self.owner_name)?;
        require_text("survey_number", &self.survey_number)?;
        require_text("valuer", &self.valuer)?;
        require_quantity("land_area_sqm", self.land_area_sqm)?;
        require_non_negative("rate_per_sqm", self.rate_per_sqm)?;
        require_non_negative("structure_value", self.structure_value)?;
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.project_id.clone(),
            self.owner_name.clone(),
            self.survey_number.clone(),
            format!("{:.2}", self.land_area_sqm),
            cells.amount(self.rate_per_sqm),
            cells.amount(self.land_value),
            cells.amount(self.structure_value),
            cells.amount(self.total_value),
            self.valuer.clone(),
            cells.date(self.valuation_date),
            self.status.to_string(),
        ]
    }

    fn sample_drafts() -> Vec<ValuationDraft> {
        vec![
            ValuationDraft {
                project_id: "PRJ-2024-001".to_string(),
                owner_name: "Ramesh Patil".to_string(),
                survey_number: "112/2A".to_string(),
                land_area_sqm: 850.0,
                rate_per_sqm: Amount::from_rupees(6_500),
                structure_value: Amount::from_rupees(475_000),
                valuer: "K. S. Rao & Associates".to_string(),
                valuation_date: date(2024, 1, 22),
                status: ValuationStatus::Approved,
            },
            ValuationDraft {
                project_id: "PRJ-2024-001".to_string(),
                owner_name: "Sunita Kale".to_string(),
                survey_number: "114/1".to_string(),
                land_area_sqm: 420.0,
                rate_per_sqm: Amount::from_rupees(6_500),
                structure_value: Amount::ZERO,
                valuer: "K. S. Rao & Associates".to_string(),
                valuation_date: date(2024, 1, 25),
                status: ValuationStatus::Verified,
            },
            ValuationDraft {
                project_id: "PRJ-2024-002".to_string(),
                owner_name: "Iqbal Shaikh".to_string(),
                survey_number: "57/3B".to_string(),
                land_area_sqm: 610.5,
                rate_per_sqm: Amount::from_rupees(5_800),
                structure_value: Amount::from_rupees(220_000),
                valuer: "Govt. Approved Valuer Cell".to_string(),
                valuation_date: date(2024, 4, 3),
                status: ValuationStatus::Draft,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::build_record;

    #[test]
    fn land_value_is_area_times_rate() {
        let record =
            build_record::<Valuation>("VAL-2024-003".to_string(), Valuation::sample_drafts()[2].clone())
                .unwrap();
        assert_eq!(record.land_value, Amount::from_rupees(3_540_900));
        assert_eq!(record.total_value, Amount::from_rupees(3_760_900));
    }

    #[test]
    fn land_value_out_of_range_is_rejected() {
        let mut draft = Valuation::sample_drafts()[0].clone();
        draft.rate_per_sqm = Amount::from_paise(i64::MAX / 2);
        draft.land_area_sqm = 4.0;
        let result = build_record::<Valuation>("VAL-2024-004".to_string(), draft);
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }
}
