pub mod error;
pub mod sqlite;
pub mod table;

use crate::analysis::filter::RecordQuery;
use crate::models::Record;
use serde_json::Value;

pub use error::StoreError;
pub use sqlite::SqliteTable;
pub use table::RecordTable;

/// CRUD access to one record collection.
pub trait RecordRepository<R: Record> {
    /// Records matching `query`, in insertion order.
    fn list(&self, query: &RecordQuery) -> Result<Vec<R>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<R>, StoreError>;

    /// Assigns the next id, derives and validates, then appends.
    fn create(&mut self, draft: R::Draft) -> Result<R, StoreError>;

    /// Merges `patch` into the stored record and replaces it in place.
    fn update(&mut self, id: &str, patch: &Value) -> Result<R, StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}
