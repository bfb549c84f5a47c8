use crate::analysis::filter::{project, RecordQuery};
use crate::models::record::{apply_patch, build_record, format_record_id};
use crate::models::{Collection, Record};
use crate::store::{RecordRepository, StoreError};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

const DB_SCHEMA_VERSION: i64 = 2;

pub const WORKSPACE_DIR: &str = ".munidesk";

pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;",
    )?;

    let mut version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version < 1 {
        apply_migration_1(conn)?;
        version = 1;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version < 2 {
        apply_migration_2(conn)?;
        version = 2;
        conn.pragma_update(None, "user_version", version)?;
    }

    if version > DB_SCHEMA_VERSION {
        // Written by a newer build; tables are additive so keep going.
        conn.pragma_update(None, "user_version", version)?;
    }

    Ok(())
}

fn apply_migration_1(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS records (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            status TEXT NOT NULL,
            payload_json TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (collection, id)
        );

        CREATE TABLE IF NOT EXISTS id_sequences (
            collection TEXT PRIMARY KEY,
            next_seq INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS workspace_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
}

fn apply_migration_2(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_records_collection_status ON records(collection, status);
        CREATE INDEX IF NOT EXISTS idx_records_updated_at ON records(updated_at);
        ",
    )
}

pub fn workspace_dir(workspace_path: &str) -> PathBuf {
    Path::new(workspace_path).join(WORKSPACE_DIR)
}

pub fn get_db_connection(workspace_path: &str) -> Result<Connection, StoreError> {
    let dir = workspace_dir(workspace_path);
    std::fs::create_dir_all(&dir)?;
    let conn = Connection::open(dir.join("state.db"))?;
    initialize_schema(&conn)?;
    Ok(conn)
}

pub fn read_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM workspace_meta WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn write_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO workspace_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn count_records(conn: &Connection, collection: Collection) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM records WHERE collection = ?1",
        params![collection.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Inserts the collection's sample records the first time a workspace sees it.
/// Returns `true` when samples were written.
pub fn seed_collection<R: Record>(conn: &Connection, id_year: i32) -> Result<bool, StoreError> {
    let marker = format!("seeded:{}", R::COLLECTION);
    if read_meta(conn, &marker)?.is_some() {
        return Ok(false);
    }

    let mut table = SqliteTable::<R>::new(conn, id_year);
    let mut written = 0usize;
    if count_records(conn, R::COLLECTION)? == 0 {
        for draft in R::sample_drafts() {
            table.create(draft)?;
            written += 1;
        }
    }

    write_meta(conn, &marker, &chrono::Utc::now().timestamp().to_string())?;
    if written > 0 {
        info!("seeded {written} sample {} records", R::COLLECTION);
    }
    Ok(written > 0)
}

/// A record collection stored in the workspace database.
///
/// Each record is kept as a JSON payload keyed by `(collection, id)`; rowid
/// order is insertion order and survives in-place updates.
pub struct SqliteTable<'c, R: Record> {
    conn: &'c Connection,
    id_year: i32,
    _record: PhantomData<R>,
}

impl<'c, R: Record> SqliteTable<'c, R> {
    pub fn new(conn: &'c Connection, id_year: i32) -> Self {
        SqliteTable {
            conn,
            id_year,
            _record: PhantomData,
        }
    }

    /// Every stored record, in insertion order.
    pub fn load_all(&self) -> Result<Vec<R>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT payload_json FROM records WHERE collection = ?1 ORDER BY rowid ASC",
        )?;

        let payloads = stmt
            .query_map(params![R::COLLECTION.to_string()], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        payloads
            .iter()
            .map(|raw| serde_json::from_str::<R>(raw).map_err(StoreError::from))
            .collect()
    }

    fn next_seq(&self) -> rusqlite::Result<u32> {
        let seq: Option<i64> = self
            .conn
            .query_row(
                "SELECT next_seq FROM id_sequences WHERE collection = ?1",
                params![R::COLLECTION.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(seq.unwrap_or(1) as u32)
    }
}

impl<'c, R: Record> RecordRepository<R> for SqliteTable<'c, R> {
    fn list(&self, query: &RecordQuery) -> Result<Vec<R>, StoreError> {
        let all = self.load_all()?;
        Ok(project(&all, query).cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<R>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT payload_json FROM records WHERE collection = ?1 AND id = ?2",
                params![R::COLLECTION.to_string(), id],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|raw| serde_json::from_str::<R>(&raw).map_err(StoreError::from))
            .transpose()
    }

    fn create(&mut self, draft: R::Draft) -> Result<R, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let seq = self.next_seq()?;
        let record = build_record::<R>(format_record_id(R::COLLECTION, self.id_year, seq), draft)?;
        let payload = serde_json::to_string(&record)?;
        let now = chrono::Utc::now().timestamp();

        tx.execute(
            "INSERT INTO records (collection, id, status, payload_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![R::COLLECTION.to_string(), record.id(), record.status_label(), payload, now],
        )?;
        tx.execute(
            "INSERT INTO id_sequences (collection, next_seq) VALUES (?1, ?2)
             ON CONFLICT(collection) DO UPDATE SET next_seq = excluded.next_seq",
            params![R::COLLECTION.to_string(), seq as i64 + 1],
        )?;
        tx.commit()?;

        debug!("created {} {}", R::COLLECTION, record.id());
        Ok(record)
    }

    fn update(&mut self, id: &str, patch: &Value) -> Result<R, StoreError> {
        let current = self
            .get(id)?
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))?;
        let updated = apply_patch(&current, patch)?;
        let payload = serde_json::to_string(&updated)?;

        self.conn.execute(
            "UPDATE records SET status = ?3, payload_json = ?4, updated_at = ?5
             WHERE collection = ?1 AND id = ?2",
            params![
                R::COLLECTION.to_string(),
                id,
                updated.status_label(),
                payload,
                chrono::Utc::now().timestamp()
            ],
        )?;

        debug!("updated {} {id}", R::COLLECTION);
        Ok(updated)
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2",
            params![R::COLLECTION.to_string(), id],
        )?;
        if removed == 0 {
            return Err(StoreError::not_found(R::COLLECTION, id));
        }

        debug!("deleted {} {id}", R::COLLECTION);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::compensation::Compensation;
    use crate::models::status::PaymentStatus;
    use serde_json::json;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        initialize_schema(&conn).expect("schema init");
        conn
    }

    #[test]
    fn schema_initializes_with_expected_version() {
        let conn = open();
        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("schema version");
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn stored_records_round_trip_in_insertion_order() {
        let conn = open();
        assert!(seed_collection::<Compensation>(&conn, 2024).expect("seed"));

        let table = SqliteTable::<Compensation>::new(&conn, 2024);
        let all = table.load_all().expect("load");
        let ids: Vec<&str> = all.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CMP-2024-001", "CMP-2024-002", "CMP-2024-003"]);
        assert_eq!(all[0].status, PaymentStatus::Paid);
    }

    #[test]
    fn seeding_happens_once_even_after_records_are_removed() {
        let conn = open();
        seed_collection::<Compensation>(&conn, 2024).expect("seed");
        let mut table = SqliteTable::<Compensation>::new(&conn, 2024);
        for id in ["CMP-2024-001", "CMP-2024-002", "CMP-2024-003"] {
            table.delete(id).expect("delete");
        }

        assert!(!seed_collection::<Compensation>(&conn, 2024).expect("reseed"));
        assert_eq!(count_records(&conn, Collection::Compensation).unwrap(), 0);
    }

    #[test]
    fn sequence_is_persisted_across_deletes() {
        let conn = open();
        seed_collection::<Compensation>(&conn, 2024).expect("seed");
        let mut table = SqliteTable::<Compensation>::new(&conn, 2024);
        table.delete("CMP-2024-003").expect("delete");

        let draft = Compensation::sample_drafts()[2].clone();
        let created = table.create(draft).expect("create");
        assert_eq!(created.id, "CMP-2024-004");
    }

    #[test]
    fn update_keeps_position_and_status_column() {
        let conn = open();
        seed_collection::<Compensation>(&conn, 2024).expect("seed");
        let mut table = SqliteTable::<Compensation>::new(&conn, 2024);

        let updated = table
            .update("CMP-2024-001", &json!({ "owner_name": "Ramesh B. Patil" }))
            .expect("update");
        assert_eq!(updated.owner_name, "Ramesh B. Patil");

        let all = table.load_all().expect("load");
        assert_eq!(all[0].id, "CMP-2024-001");

        let status: String = conn
            .query_row(
                "SELECT status FROM records WHERE collection = 'compensation' AND id = 'CMP-2024-003'",
                [],
                |row| row.get(0),
            )
            .expect("status column");
        assert_eq!(status, "Pending");
    }
}
