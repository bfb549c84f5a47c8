use crate::analysis::filter::{project, RecordQuery};
use crate::models::record::{apply_patch, build_record, format_record_id};
use crate::models::Record;
use crate::store::{RecordRepository, StoreError};
use log::debug;
use serde_json::Value;

/// In-memory, ordered record table.
///
/// Ids come from a counter that only moves forward, so a deleted id is never
/// handed out again. `version` increases on every successful mutation.
#[derive(Debug, Clone)]
pub struct RecordTable<R: Record> {
    records: Vec<R>,
    next_seq: u32,
    id_year: i32,
    version: u64,
}

impl<R: Record> RecordTable<R> {
    pub fn new(id_year: i32) -> Self {
        RecordTable {
            records: Vec::new(),
            next_seq: 1,
            id_year,
            version: 0,
        }
    }

    /// A table holding the collection's sample records.
    pub fn seeded(id_year: i32) -> Result<Self, StoreError> {
        let mut table = Self::new(id_year);
        for draft in R::sample_drafts() {
            table.create(draft)?;
        }
        Ok(table)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn filtered<'a>(&'a self, query: &RecordQuery) -> impl Iterator<Item = &'a R> + 'a {
        project(&self.records, query)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

impl<R: Record> RecordRepository<R> for RecordTable<R> {
    fn list(&self, query: &RecordQuery) -> Result<Vec<R>, StoreError> {
        Ok(self.filtered(query).cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self.records.iter().find(|r| r.id() == id).cloned())
    }

    fn create(&mut self, draft: R::Draft) -> Result<R, StoreError> {
        let id = format_record_id(R::COLLECTION, self.id_year, self.next_seq);
        let record = build_record::<R>(id, draft)?;

        self.next_seq += 1;
        self.records.push(record.clone());
        self.version += 1;
        debug!("created {} {}", R::COLLECTION, record.id());
        Ok(record)
    }

    fn update(&mut self, id: &str, patch: &Value) -> Result<R, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))?;

        let updated = apply_patch(&self.records[index], patch)?;
        self.records[index] = updated.clone();
        self.version += 1;
        debug!("updated {} {id}", R::COLLECTION);
        Ok(updated)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))?;

        self.records.remove(index);
        self.version += 1;
        debug!("deleted {} {id}", R::COLLECTION);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::budget::{Budget, BudgetDraft, BudgetStatus};
    use crate::models::Amount;
    use serde_json::json;

    fn draft(head: &str) -> BudgetDraft {
        BudgetDraft {
            department: "Parks".to_string(),
            head: head.to_string(),
            fiscal_year: "2024-25".to_string(),
            allocated: Amount::from_rupees(1_000_000),
            utilized: Amount::ZERO,
            status: BudgetStatus::Active,
            remarks: None,
        }
    }

    #[test]
    fn seeded_table_numbers_samples_in_order() {
        let table = RecordTable::<Budget>::seeded(2024).unwrap();
        let ids: Vec<&str> = table.records().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["BUD-2024-001", "BUD-2024-002", "BUD-2024-003"]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut table = RecordTable::<Budget>::seeded(2024).unwrap();
        table.delete("BUD-2024-003").unwrap();
        let created = table.create(draft("Garden upkeep")).unwrap();
        assert_eq!(created.id, "BUD-2024-004");
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut table = RecordTable::<Budget>::seeded(2024).unwrap();
        let before = table.version();
        table
            .update("BUD-2024-002", &json!({ "status": "Closed" }))
            .unwrap();
        assert_eq!(table.records()[1].status, BudgetStatus::Closed);
        assert_eq!(table.records()[1].id, "BUD-2024-002");
        assert_eq!(table.version(), before + 1);
    }

    #[test]
    fn invalid_draft_leaves_table_untouched() {
        let mut table = RecordTable::<Budget>::new(2024);
        let result = table.create(draft("   "));
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(table.is_empty());
        assert_eq!(table.version(), 0);

        let created = table.create(draft("Playground equipment")).unwrap();
        assert_eq!(created.id, "BUD-2024-001");
    }

    #[test]
    fn missing_ids_report_not_found() {
        let mut table = RecordTable::<Budget>::seeded(2024).unwrap();
        assert!(matches!(
            table.delete("BUD-2024-999"),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            table.update("BUD-2024-999", &json!({})),
            Err(StoreError::NotFound { .. })
        ));
        assert!(table.get("BUD-2024-999").unwrap().is_none());
    }
}
