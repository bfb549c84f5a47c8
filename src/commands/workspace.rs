use crate::commands::db::with_record_type;
use crate::commands::settings::load_effective_settings;
use crate::models::workspace::WorkspaceMeta;
use crate::models::Collection;
use crate::store::sqlite::{count_records, get_db_connection, read_meta, seed_collection, write_meta};
use log::info;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;
use strum::IntoEnumIterator;

/// Opens (or initializes) a workspace directory: migrates the database and
/// settings, assigns a workspace id on first open, and seeds sample records
/// into collections that have never been seeded.
pub async fn open_workspace(path: String) -> Result<WorkspaceMeta, String> {
    let workspace_path = Path::new(&path);

    if !workspace_path.is_dir() {
        return Err("PATH_NOT_FOUND: Directory does not exist".to_string());
    }

    let settings = load_effective_settings(&path)
        .map_err(|e| format!("INIT_FAILED: Could not initialize settings: {e}"))?;

    let conn = get_db_connection(&path)
        .map_err(|e| format!("INIT_FAILED: Could not initialize database: {e}"))?;

    let workspace_id = ensure_workspace_id(&conn).map_err(|e| format!("DB error: {e}"))?;

    let mut seeded_collections = Vec::new();
    if settings.seed_sample_data {
        for collection in Collection::iter() {
            let seeded = with_record_type!(collection, R => seed_collection::<R>(&conn, settings.id_year))
                .map_err(|e| format!("INIT_FAILED: Could not seed {collection}: {e}"))?;
            if seeded {
                seeded_collections.push(collection.to_string());
            }
        }
    }

    let mut record_counts = BTreeMap::new();
    for collection in Collection::iter() {
        let count = count_records(&conn, collection).map_err(|e| format!("DB error: {e}"))?;
        record_counts.insert(collection.to_string(), count);
    }

    let opened_at = chrono::Utc::now().timestamp();
    write_meta(&conn, "last_opened_at", &opened_at.to_string()).map_err(|e| format!("DB error: {e}"))?;

    let name = workspace_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "workspace".to_string());

    info!(
        "opened workspace {name} ({} records, {} collections seeded)",
        record_counts.values().sum::<usize>(),
        seeded_collections.len()
    );

    Ok(WorkspaceMeta {
        path: path.clone(),
        name,
        workspace_id,
        record_counts,
        seeded_collections,
        opened_at,
    })
}

fn ensure_workspace_id(conn: &Connection) -> rusqlite::Result<String> {
    if let Some(existing) = read_meta(conn, "workspace_id")? {
        return Ok(existing);
    }

    let id = uuid::Uuid::new_v4().to_string();
    write_meta(conn, "workspace_id", &id)?;
    Ok(id)
}
