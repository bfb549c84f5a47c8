use crate::analysis::aggregate::Summarize;
use crate::analysis::export::{write_export, ExportOutcome};
use crate::analysis::filter::{project, RecordQuery};
use crate::commands::settings::{load_effective_settings, EffectiveSettings};
use crate::models::Collection;
use crate::models::Record;
use crate::store::sqlite::get_db_connection;
use crate::store::{RecordRepository, SqliteTable, StoreError};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;

/// Runs `$body` with `$R` bound to the record type stored in `$collection`.
macro_rules! with_record_type {
    ($collection:expr, $R:ident => $body:expr) => {{
        use $crate::models::{
            budget::Budget, compensation::Compensation, dpr::Dpr, estimate::Estimate, hearing::Hearing,
            payable::Payable, project::Project, receipt::Receipt, rti::RtiApplication,
            site_progress::SiteProgress, valuation::Valuation, Collection,
        };
        match $collection {
            Collection::Budgets => {
                type $R = Budget;
                $body
            }
            Collection::Payables => {
                type $R = Payable;
                $body
            }
            Collection::Receipts => {
                type $R = Receipt;
                $body
            }
            Collection::SiteProgress => {
                type $R = SiteProgress;
                $body
            }
            Collection::Compensation => {
                type $R = Compensation;
                $body
            }
            Collection::Valuations => {
                type $R = Valuation;
                $body
            }
            Collection::Hearings => {
                type $R = Hearing;
                $body
            }
            Collection::Dpr => {
                type $R = Dpr;
                $body
            }
            Collection::Projects => {
                type $R = Project;
                $body
            }
            Collection::Estimates => {
                type $R = Estimate;
                $body
            }
            Collection::Rti => {
                type $R = RtiApplication;
                $body
            }
        }
    }};
}

pub(crate) use with_record_type;

/// Column names plus rows rendered for display, in export column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    pub collection: Collection,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn parse_collection(raw: &str) -> Result<Collection, StoreError> {
    Collection::from_str(raw.trim()).map_err(|_| StoreError::UnknownCollection(raw.to_string()))
}

pub(crate) fn command_error(error: StoreError) -> String {
    format!("{}: {error}", error.code())
}

fn open(workspace_path: &str) -> Result<(Connection, EffectiveSettings), String> {
    let settings = load_effective_settings(workspace_path)?;
    let conn = get_db_connection(workspace_path).map_err(|e| format!("DB error: {e}"))?;
    Ok((conn, settings))
}

pub async fn record_crud(
    workspace_path: String,
    collection: String,
    operation: String,
    item: Option<Value>,
    id: Option<String>,
) -> Result<Value, String> {
    let collection = parse_collection(&collection).map_err(command_error)?;
    let (conn, settings) = open(&workspace_path)?;

    with_record_type!(collection, R => {
        let mut table = SqliteTable::<R>::new(&conn, settings.id_year);
        crud(&mut table, &operation, item, id).map_err(command_error)
    })
}

/// Dispatches one CRUD operation against any repository.
pub fn crud<R: Record>(
    table: &mut impl RecordRepository<R>,
    operation: &str,
    item: Option<Value>,
    id: Option<String>,
) -> Result<Value, StoreError> {
    let required_id = |id: Option<String>| id.ok_or_else(|| StoreError::Validation(format!("ID required for {operation}")));
    let required_item =
        |item: Option<Value>| item.ok_or_else(|| StoreError::Validation(format!("Item required for {operation}")));

    match operation {
        "create" => {
            let draft: R::Draft = serde_json::from_value(required_item(item)?)
                .map_err(|e| StoreError::Validation(format!("invalid {} draft: {e}", R::COLLECTION)))?;
            let record = table.create(draft)?;
            Ok(json!({"status": "created", "id": record.id(), "record": record}))
        }
        "read" => {
            let id = required_id(id)?;
            Ok(serde_json::to_value(table.get(&id)?)?)
        }
        "list" => Ok(serde_json::to_value(table.list(&RecordQuery::default())?)?),
        "update" => {
            let id = required_id(id)?;
            let patch = required_item(item)?;
            let record = table.update(&id, &patch)?;
            Ok(json!({"status": "updated", "id": id, "record": record}))
        }
        "delete" => {
            let id = required_id(id)?;
            table.delete(&id)?;
            Ok(json!({"status": "deleted", "id": id}))
        }
        other => Err(StoreError::Validation(format!("Unknown operation: {other}"))),
    }
}

pub async fn query_records(
    workspace_path: String,
    collection: String,
    search: Option<String>,
    status: Option<String>,
) -> Result<Value, String> {
    let collection = parse_collection(&collection).map_err(command_error)?;
    let (conn, settings) = open(&workspace_path)?;
    let query = RecordQuery::from_options(search.as_deref(), status.as_deref());

    with_record_type!(collection, R => {
        let table = SqliteTable::<R>::new(&conn, settings.id_year);
        table
            .list(&query)
            .and_then(|records| Ok(serde_json::to_value(records)?))
            .map_err(command_error)
    })
}

pub async fn query_rows(
    workspace_path: String,
    collection: String,
    search: Option<String>,
    status: Option<String>,
) -> Result<TableView, String> {
    let collection = parse_collection(&collection).map_err(command_error)?;
    let (conn, settings) = open(&workspace_path)?;
    let query = RecordQuery::from_options(search.as_deref(), status.as_deref());

    with_record_type!(collection, R => {
        let table = SqliteTable::<R>::new(&conn, settings.id_year);
        let records = table.list(&query).map_err(command_error)?;
        Ok(TableView {
            collection,
            columns: R::CSV_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: records.iter().map(|record| record.row(&settings)).collect(),
        })
    })
}

/// Aggregates over every record in the collection. `as_of` defaults to today.
pub async fn summarize_collection(
    workspace_path: String,
    collection: String,
    as_of: Option<NaiveDate>,
) -> Result<Value, String> {
    let collection = parse_collection(&collection).map_err(command_error)?;
    let (conn, settings) = open(&workspace_path)?;
    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());

    with_record_type!(collection, R => summarize::<R>(&conn, settings.id_year, as_of).map_err(command_error))
}

fn summarize<R: Summarize>(conn: &Connection, id_year: i32, as_of: NaiveDate) -> Result<Value, StoreError> {
    let records = SqliteTable::<R>::new(conn, id_year).load_all()?;
    Ok(serde_json::to_value(R::summarize(&records, as_of))?)
}

/// Writes the filtered collection to `<workspace>/<exportDirectory>/`.
/// Exported cells stay plain whatever the display settings are.
pub async fn export_collection(
    workspace_path: String,
    collection: String,
    search: Option<String>,
    status: Option<String>,
    date: Option<NaiveDate>,
) -> Result<ExportOutcome, String> {
    let collection = parse_collection(&collection).map_err(command_error)?;
    let (conn, settings) = open(&workspace_path)?;
    let query = RecordQuery::from_options(search.as_deref(), status.as_deref());
    let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let dir = settings.export_path(&workspace_path);

    with_record_type!(collection, R => {
        let records = SqliteTable::<R>::new(&conn, settings.id_year)
            .load_all()
            .map_err(command_error)?;
        write_export(&dir, date, project(&records, &query)).map_err(command_error)
    })
}
