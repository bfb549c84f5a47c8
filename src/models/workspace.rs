use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMeta {
    pub path: String,
    pub name: String,
    pub workspace_id: String,
    pub record_counts: BTreeMap<String, usize>,
    pub seeded_collections: Vec<String>,
    pub opened_at: i64,
}
