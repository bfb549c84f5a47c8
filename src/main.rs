use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use log::error;
use munidesk_lib::commands::classify::{classify_payment_status, classify_site_progress};
use munidesk_lib::commands::db::{
    export_collection, query_rows, record_crud, summarize_collection, TableView,
};
use munidesk_lib::commands::settings::{get_settings, load_effective_settings, save_settings};
use munidesk_lib::commands::workspace::open_workspace;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "munidesk", version)]
#[command(about = "Municipal administration registers: budgets, bills, land acquisition, projects and RTI")]
struct Cli {
    /// Workspace directory holding `.munidesk/`
    #[arg(short, long, env = "MUNIDESK_WORKSPACE", default_value = ".", value_name = "DIR")]
    workspace: PathBuf,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or migrate the workspace and seed sample records
    Init,
    /// List records, optionally filtered
    List {
        collection: String,
        #[arg(short, long)]
        search: Option<String>,
        /// Exact status label, or `all`
        #[arg(long)]
        status: Option<String>,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one record
    Show { collection: String, id: String },
    /// Create a record from a JSON draft
    Add {
        collection: String,
        #[arg(value_name = "JSON")]
        draft: String,
    },
    /// Merge a JSON patch into a record
    Edit {
        collection: String,
        id: String,
        #[arg(value_name = "JSON")]
        patch: String,
    },
    /// Delete a record
    Delete {
        collection: String,
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Print aggregate figures for a collection
    Summary {
        collection: String,
        /// Reference date for overdue and upcoming counts (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Write the filtered collection to CSV
    Export {
        collection: String,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Date used in the file name (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Run a status classifier without touching the workspace
    #[command(subcommand)]
    Classify(ClassifyCommand),
    /// Show settings, or merge a JSON patch into them
    Settings {
        #[arg(value_name = "JSON")]
        patch: Option<String>,
    },
}

#[derive(Subcommand)]
enum ClassifyCommand {
    /// Site progress from planned and actual completion percentages
    Progress {
        #[arg(long)]
        planned: f64,
        #[arg(long)]
        actual: f64,
    },
    /// Payment completion from total and paid amounts (formatted strings accepted)
    Payment {
        #[arg(long)]
        total: String,
        #[arg(long)]
        paid: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(message) = run(cli).await {
        error!("{message}");
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let workspace = cli.workspace.to_string_lossy().to_string();

    match cli.command {
        Command::Init => {
            let meta = open_workspace(workspace).await?;
            print_json(&serde_json::to_value(meta).map_err(|e| e.to_string())?)
        }
        Command::List {
            collection,
            search,
            status,
            json,
        } => {
            let view = query_rows(workspace, collection, search, status).await?;
            if json {
                print_json(&serde_json::to_value(&view).map_err(|e| e.to_string())?)
            } else {
                print_table(&view);
                Ok(())
            }
        }
        Command::Show { collection, id } => {
            let record = record_crud(workspace, collection.clone(), "read".to_string(), None, Some(id.clone())).await?;
            if record.is_null() {
                return Err(format!("NOT_FOUND: {collection} record {id} not found"));
            }
            print_json(&record)
        }
        Command::Add { collection, draft } => {
            let draft = parse_json_arg(&draft)?;
            let created = record_crud(workspace, collection, "create".to_string(), Some(draft), None).await?;
            print_json(&created)
        }
        Command::Edit { collection, id, patch } => {
            let patch = parse_json_arg(&patch)?;
            let updated = record_crud(workspace, collection, "update".to_string(), Some(patch), Some(id)).await?;
            print_json(&updated)
        }
        Command::Delete { collection, id, yes } => {
            let settings = load_effective_settings(&workspace)?;
            if settings.confirm_deletes && !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete {collection} record {id}?"))
                    .default(false)
                    .interact()
                    .map_err(|e| format!("Confirmation failed: {e}"))?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let deleted = record_crud(workspace, collection, "delete".to_string(), None, Some(id)).await?;
            print_json(&deleted)
        }
        Command::Summary { collection, as_of } => {
            let summary = summarize_collection(workspace, collection, as_of).await?;
            print_json(&summary)
        }
        Command::Export {
            collection,
            search,
            status,
            date,
        } => {
            let outcome = export_collection(workspace, collection, search, status, date).await?;
            println!("Wrote {} rows to {}", outcome.row_count, outcome.path.display());
            Ok(())
        }
        Command::Classify(ClassifyCommand::Progress { planned, actual }) => {
            print_json(&classify_site_progress(planned, actual).await?)
        }
        Command::Classify(ClassifyCommand::Payment { total, paid }) => {
            print_json(&classify_payment_status(total, paid).await?)
        }
        Command::Settings { patch } => {
            let settings = match patch {
                Some(raw) => save_settings(workspace, parse_json_arg(&raw)?).await?,
                None => get_settings(workspace).await?,
            };
            print_json(&settings)
        }
    }
}

fn parse_json_arg(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("VALIDATION: argument is not valid JSON: {e}"))
}

fn print_json(value: &Value) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

fn print_table(view: &TableView) {
    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            view.rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", render(&view.columns));
    for row in &view.rows {
        println!("{}", render(row));
    }
    println!("\n{} {} record(s)", view.rows.len(), view.collection);
}
