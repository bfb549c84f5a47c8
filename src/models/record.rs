use crate::models::collection::Collection;
use crate::models::money::Amount;
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;
use strum::IntoEnumIterator;

/// A row in one of the administration registers.
///
/// Records are created from a `Draft` (the fields a user fills in), carry
/// derived fields that are recomputed by [`Record::derive_fields`], and are
/// checked by [`Record::validate`] before any change is committed.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Draft: Clone + Debug + Serialize + DeserializeOwned + Send;
    type Status: Copy + PartialEq + IntoEnumIterator + Into<&'static str>;

    const COLLECTION: Collection;
    const CSV_COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    /// Text fields the free-text search looks at.
    fn search_fields(&self) -> Vec<&str>;

    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// Recomputes derived fields. Fails when a derived value is out of range.
    fn derive_fields(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError>;

    /// One row in `CSV_COLUMNS` order, money and dates rendered by `cells`.
    fn row(&self, cells: &dyn CellFormat) -> Vec<String>;

    /// Export row: plain decimal amounts and ISO dates.
    fn csv_row(&self) -> Vec<String> {
        self.row(&PlainCells)
    }

    /// Drafts a fresh workspace is seeded with.
    fn sample_drafts() -> Vec<Self::Draft>;

    fn status_label(&self) -> &'static str {
        self.status().into()
    }
}

/// How money and date cells of a [`Record::row`] are written out.
pub trait CellFormat {
    fn amount(&self, amount: Amount) -> String;

    fn date(&self, date: NaiveDate) -> String;

    fn opt_date(&self, date: Option<NaiveDate>) -> String {
        date.map(|d| self.date(d)).unwrap_or_default()
    }
}

/// `5500000.00` and `2024-04-10`.
pub struct PlainCells;

impl CellFormat for PlainCells {
    fn amount(&self, amount: Amount) -> String {
        amount.to_plain_string()
    }

    fn date(&self, date: NaiveDate) -> String {
        date.to_string()
    }
}

/// `<PREFIX>-<YEAR>-<seq>` with the sequence padded to three digits.
pub fn format_record_id(collection: Collection, year: i32, seq: u32) -> String {
    format!("{}-{year}-{seq:03}", collection.id_prefix())
}

/// Builds a record from a draft: assigns the id, derives, then validates.
pub fn build_record<R: Record>(id: String, draft: R::Draft) -> Result<R, StoreError> {
    let mut record = R::from_draft(id, draft);
    record.derive_fields()?;
    record.validate()?;
    Ok(record)
}

/// Merges a JSON patch into a record. Objects merge key by key, anything else
/// replaces the current value. The id is never changed by a patch and derived
/// fields are recomputed afterwards.
pub fn apply_patch<R: Record>(record: &R, patch: &Value) -> Result<R, StoreError> {
    if !patch.is_object() {
        return Err(StoreError::Validation("patch must be a JSON object".to_string()));
    }

    let mut merged = serde_json::to_value(record)?;
    merge_json(&mut merged, patch);
    if let Some(obj) = merged.as_object_mut() {
        obj.insert("id".to_string(), Value::String(record.id().to_string()));
    }

    let mut updated: R = serde_json::from_value(merged)
        .map_err(|e| StoreError::Validation(format!("invalid patch: {e}")))?;
    updated.derive_fields()?;
    updated.validate()?;
    Ok(updated)
}

pub fn merge_json(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_json(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

pub fn require_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn require_percent(field: &str, value: f64) -> Result<(), StoreError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(StoreError::Validation(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

pub fn require_non_negative(field: &str, value: Amount) -> Result<(), StoreError> {
    if value.is_negative() {
        return Err(StoreError::Validation(format!("{field} cannot be negative")));
    }
    Ok(())
}

/// Unwraps a checked computation of a derived field.
pub fn derived<T>(field: &str, value: Option<T>) -> Result<T, StoreError> {
    value.ok_or_else(|| StoreError::Validation(format!("{field} is out of range")))
}

pub fn require_quantity(field: &str, value: f64) -> Result<(), StoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::Validation(format!(
            "{field} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

pub fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
