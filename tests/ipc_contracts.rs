use munidesk_lib::commands::db::{export_collection, query_records, query_rows, record_crud, summarize_collection};
use munidesk_lib::commands::settings::{get_settings, save_settings};
use munidesk_lib::commands::workspace::open_workspace;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

/// A fresh workspace with ids pinned to 2024, opened once so samples are seeded.
async fn create_seeded_workspace() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace_path = temp_dir.path().to_string_lossy().to_string();

    save_settings(workspace_path.clone(), json!({ "idYear": 2024 }))
        .await
        .expect("pin id year");
    open_workspace(workspace_path.clone())
        .await
        .expect("open workspace");

    (temp_dir, workspace_path)
}

fn rupees(amount: i64) -> Value {
    json!(amount * 100)
}

#[tokio::test]
async fn open_workspace_seeds_every_collection_once() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace_path = temp_dir.path().to_string_lossy().to_string();

    let first = open_workspace(workspace_path.clone())
        .await
        .expect("open workspace");
    assert_eq!(first.path, workspace_path);
    assert_eq!(first.seeded_collections.len(), 11);
    assert_eq!(first.record_counts.len(), 11);
    assert!(first.record_counts.values().all(|count| *count == 3));
    assert!(temp_dir.path().join(".munidesk").join("state.db").exists());
    assert!(temp_dir.path().join(".munidesk").join("settings.json").exists());

    let second = open_workspace(workspace_path.clone())
        .await
        .expect("reopen workspace");
    assert!(second.seeded_collections.is_empty());
    assert_eq!(second.workspace_id, first.workspace_id);
    assert_eq!(second.record_counts, first.record_counts);
}

#[tokio::test]
async fn open_workspace_rejects_missing_directory() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let missing = temp_dir.path().join("nope").to_string_lossy().to_string();

    let err = open_workspace(missing).await.expect_err("missing dir");
    assert!(err.starts_with("PATH_NOT_FOUND"));
}

#[tokio::test]
async fn seeding_can_be_disabled_in_settings() {
    let temp_dir = tempfile::tempdir().expect("create temp dir");
    let workspace_path = temp_dir.path().to_string_lossy().to_string();
    save_settings(workspace_path.clone(), json!({ "seedSampleData": false }))
        .await
        .expect("save settings");

    let meta = open_workspace(workspace_path).await.expect("open workspace");
    assert!(meta.seeded_collections.is_empty());
    assert!(meta.record_counts.values().all(|count| *count == 0));
}

#[tokio::test]
async fn compensation_crud_derives_totals_and_status() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;

    let created = record_crud(
        workspace_path.clone(),
        "compensation".to_string(),
        "create".to_string(),
        Some(json!({
            "project_id": "PRJ-2024-002",
            "owner_name": "Meena Jadhav",
            "survey_number": "61/1",
            "village": "Punawale",
            "land_area_sqm": 500.0,
            "market_value": rupees(4_000_000),
            "solatium": rupees(1_200_000),
            "interest": rupees(300_000),
            "paid_amount": 0
        })),
        None,
    )
    .await
    .expect("create compensation");
    assert_eq!(created["status"], json!("created"));
    assert_eq!(created["id"], json!("CMP-2024-004"));
    assert_eq!(created["record"]["total_compensation"], rupees(5_500_000));
    assert_eq!(created["record"]["pending_amount"], rupees(5_500_000));
    assert_eq!(created["record"]["status"], json!("Pending"));

    let updated = record_crud(
        workspace_path.clone(),
        "compensation".to_string(),
        "update".to_string(),
        Some(json!({ "paid_amount": rupees(1_000_000) })),
        Some("CMP-2024-004".to_string()),
    )
    .await
    .expect("update compensation");
    assert_eq!(updated["record"]["pending_amount"], rupees(4_500_000));
    assert_eq!(updated["record"]["status"], json!("Partial"));

    let read = record_crud(
        workspace_path.clone(),
        "compensation".to_string(),
        "read".to_string(),
        None,
        Some("CMP-2024-004".to_string()),
    )
    .await
    .expect("read compensation");
    assert_eq!(read["owner_name"], json!("Meena Jadhav"));
    assert_eq!(read["status"], json!("Partial"));

    let deleted = record_crud(
        workspace_path.clone(),
        "compensation".to_string(),
        "delete".to_string(),
        None,
        Some("CMP-2024-004".to_string()),
    )
    .await
    .expect("delete compensation");
    assert_eq!(deleted["status"], json!("deleted"));

    let listed = record_crud(
        workspace_path.clone(),
        "compensation".to_string(),
        "list".to_string(),
        None,
        None,
    )
    .await
    .expect("list compensation");
    let ids: Vec<&str> = listed
        .as_array()
        .expect("list array")
        .iter()
        .filter_map(|entry| entry["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["CMP-2024-001", "CMP-2024-002", "CMP-2024-003"]);
}

#[tokio::test]
async fn deleted_ids_are_never_reissued() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;

    record_crud(
        workspace_path.clone(),
        "projects".to_string(),
        "delete".to_string(),
        None,
        Some("PRJ-2024-003".to_string()),
    )
    .await
    .expect("delete project");

    let created = record_crud(
        workspace_path.clone(),
        "projects".to_string(),
        "create".to_string(),
        Some(json!({
            "name": "Ward 5 Storm Drain",
            "department": "Drainage",
            "ward": "Ward 5",
            "sanctioned_cost": rupees(18_000_000),
            "start_date": "2024-07-01",
            "target_date": "2025-03-31",
            "status": "Planning"
        })),
        None,
    )
    .await
    .expect("create project");
    assert_eq!(created["id"], json!("PRJ-2024-004"));
}

#[tokio::test]
async fn invalid_changes_are_rejected_without_side_effects() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;

    let err = record_crud(
        workspace_path.clone(),
        "payables".to_string(),
        "update".to_string(),
        Some(json!({ "paid_amount": rupees(9_000_000) })),
        Some("PAY-2024-002".to_string()),
    )
    .await
    .expect_err("overpayment");
    assert!(err.starts_with("VALIDATION"), "{err}");

    let read = record_crud(
        workspace_path.clone(),
        "payables".to_string(),
        "read".to_string(),
        None,
        Some("PAY-2024-002".to_string()),
    )
    .await
    .expect("read payable");
    assert_eq!(read["paid_amount"], rupees(1_000_000));

    let missing = record_crud(
        workspace_path.clone(),
        "payables".to_string(),
        "delete".to_string(),
        None,
        Some("PAY-2024-999".to_string()),
    )
    .await
    .expect_err("missing id");
    assert!(missing.starts_with("NOT_FOUND"), "{missing}");

    let unknown = record_crud(workspace_path, "ledgers".to_string(), "list".to_string(), None, None)
        .await
        .expect_err("unknown collection");
    assert!(unknown.starts_with("UNKNOWN_COLLECTION"), "{unknown}");
}

#[tokio::test]
async fn query_commands_filter_by_search_and_status() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;

    let builders = query_records(
        workspace_path.clone(),
        "payables".to_string(),
        Some("builders".to_string()),
        Some("all".to_string()),
    )
    .await
    .expect("search payables");
    let builders = builders.as_array().expect("array");
    assert_eq!(builders.len(), 1);
    assert_eq!(builders[0]["vendor"], json!("ABC Builders Ltd."));

    let critical = query_rows(
        workspace_path.clone(),
        "site-progress".to_string(),
        None,
        Some("Critical".to_string()),
    )
    .await
    .expect("filter site progress");
    assert_eq!(critical.rows.len(), 1);
    assert_eq!(critical.rows[0].len(), critical.columns.len());

    let everything = query_rows(workspace_path, "rti".to_string(), None, None)
        .await
        .expect("list rti");
    assert_eq!(everything.rows.len(), 3);
}

#[tokio::test]
async fn listed_rows_follow_display_settings_while_exports_stay_plain() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;

    let default_view = query_rows(
        workspace_path.clone(),
        "payables".to_string(),
        Some("builders".to_string()),
        None,
    )
    .await
    .expect("list payables");
    assert_eq!(default_view.rows[0][4], "2024-04-10");
    assert_eq!(default_view.rows[0][6], "₹45,00,000.00");

    save_settings(
        workspace_path.clone(),
        json!({ "dateFormat": "dd mon yyyy", "currencySymbol": "Rs." }),
    )
    .await
    .expect("save display settings");

    let view = query_rows(
        workspace_path.clone(),
        "payables".to_string(),
        Some("builders".to_string()),
        None,
    )
    .await
    .expect("list payables");
    let row = &view.rows[0];
    assert_eq!(row[4], "10 Apr 2024");
    assert_eq!(row[5], "10 May 2024");
    assert_eq!(row[6], "Rs.45,00,000.00");
    assert_eq!(row[8], "Rs.0.00");
    assert_eq!(row[9], "Paid");

    let outcome = export_collection(
        workspace_path,
        "payables".to_string(),
        Some("builders".to_string()),
        None,
        NaiveDate::from_ymd_opt(2024, 6, 1),
    )
    .await
    .expect("export payables");
    let content = fs::read_to_string(&outcome.path).expect("read export");
    assert!(content.contains("2024-04-10,2024-05-10,4500000.00,4500000.00,0.00,Paid"), "{content}");
}

#[tokio::test]
async fn summaries_reduce_over_stored_records() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 10);

    let budgets = summarize_collection(workspace_path.clone(), "budgets".to_string(), as_of)
        .await
        .expect("budget summary");
    assert_eq!(budgets["overall_utilization"], json!(60));
    assert_eq!(budgets["total_allocated"], rupees(880_000_000));

    let rti = summarize_collection(workspace_path, "rti".to_string(), as_of)
        .await
        .expect("rti summary");
    assert_eq!(rti["overdue_count"], json!(1));
    assert_eq!(rti["status_counts"].as_array().expect("counts").len(), 4);
}

#[tokio::test]
async fn export_writes_dated_csv_into_configured_directory() {
    let (tmp, workspace_path) = create_seeded_workspace().await;
    save_settings(workspace_path.clone(), json!({ "exportDirectory": "reports" }))
        .await
        .expect("save export dir");

    let outcome = export_collection(
        workspace_path.clone(),
        "payables".to_string(),
        None,
        None,
        NaiveDate::from_ymd_opt(2024, 6, 1),
    )
    .await
    .expect("export payables");

    assert_eq!(outcome.row_count, 3);
    assert_eq!(
        outcome.path,
        tmp.path().join("reports").join("payables_2024-06-01.csv")
    );

    let content = fs::read_to_string(&outcome.path).expect("read export");
    assert_eq!(content.lines().count(), 4);
    assert!(content.contains("\"Road resurfacing, Ward 12\""));
}

#[tokio::test]
async fn settings_commands_round_trip_and_merge_partial_updates() {
    let (_tmp, workspace_path) = create_seeded_workspace().await;

    let initial = get_settings(workspace_path.clone())
        .await
        .expect("load settings");
    assert_eq!(initial["idYear"], json!(2024));
    assert_eq!(initial["schema_version"], json!(1));

    let saved = save_settings(
        workspace_path.clone(),
        json!({
            "dateFormat": "dd-mm-yyyy",
            "confirmDeletes": false,
            "idYear": 3000
        }),
    )
    .await
    .expect("save settings");

    assert_eq!(saved["dateFormat"], json!("dd-mm-yyyy"));
    assert_eq!(saved["confirmDeletes"], json!(false));
    assert_eq!(saved["idYear"], json!(2100));
    assert_eq!(saved["currencySymbol"], initial["currencySymbol"]);

    let reloaded = get_settings(workspace_path).await.expect("reload settings");
    assert_eq!(reloaded, saved);
}
