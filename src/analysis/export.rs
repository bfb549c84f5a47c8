use crate::models::Record;
use crate::store::StoreError;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub row_count: usize,
    pub bytes: usize,
}

/// Header row plus one row per record, RFC 4180 quoting, `\n` line endings.
pub fn to_csv<'a, R: Record>(records: impl IntoIterator<Item = &'a R>) -> Result<String, StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(R::CSV_COLUMNS)?;
    for record in records {
        writer.write_record(record.csv_row())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Validation(format!("export is not UTF-8: {e}")))
}

/// `budgets_2024-06-01.csv`, `site_progress_2024-06-01.csv`, ...
pub fn export_file_name<R: Record>(date: NaiveDate) -> String {
    format!("{}_{}.csv", R::COLLECTION.export_stem(), date.format("%Y-%m-%d"))
}

/// Writes the records into `dir`, creating it when missing.
pub fn write_export<'a, R: Record>(
    dir: &Path,
    date: NaiveDate,
    records: impl IntoIterator<Item = &'a R>,
) -> Result<ExportOutcome, StoreError> {
    let records: Vec<&R> = records.into_iter().collect();
    let content = to_csv(records.iter().copied())?;

    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name::<R>(date));
    fs::write(&path, &content)?;

    info!(
        "exported {} {} records to {}",
        records.len(),
        R::COLLECTION,
        path.display()
    );

    Ok(ExportOutcome {
        path,
        row_count: records.len(),
        bytes: content.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::filter::{project, RecordQuery};
    use crate::models::budget::Budget;
    use crate::models::compensation::Compensation;
    use crate::models::dpr::Dpr;
    use crate::models::estimate::Estimate;
    use crate::models::hearing::Hearing;
    use crate::models::payable::Payable;
    use crate::models::project::Project;
    use crate::models::receipt::Receipt;
    use crate::models::record::date;
    use crate::models::rti::RtiApplication;
    use crate::models::site_progress::SiteProgress;
    use crate::models::valuation::Valuation;
    use crate::store::{RecordRepository, RecordTable};
    use serde_json::json;

    /// Reads `csv` back and checks it matches `records` cell for cell.
    fn assert_reads_back<R: Record>(csv: &str, records: &[R]) {
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), R::CSV_COLUMNS, "{:?}", R::COLLECTION);

        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = records.iter().map(R::csv_row).collect();
        assert_eq!(rows, expected, "{:?}", R::COLLECTION);
        assert!(rows.iter().all(|row| row.len() == headers.len()));
    }

    fn assert_seeded_export_reads_back<R: Record>() {
        let table = RecordTable::<R>::seeded(2024).unwrap();
        let csv = to_csv(table.records()).unwrap();
        assert_reads_back(&csv, table.records());
    }

    #[test]
    fn budget_export_has_header_and_one_line_per_record() {
        let table = RecordTable::<Budget>::seeded(2024).unwrap();
        let csv = to_csv(table.records()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), table.len() + 1);
        let columns = lines[0].split(',').count();
        assert_eq!(columns, Budget::CSV_COLUMNS.len());
        for line in &lines[1..] {
            assert_eq!(line.split(',').count(), columns);
        }
    }

    #[test]
    fn embedded_commas_are_quoted() {
        let table = RecordTable::<Payable>::seeded(2024).unwrap();
        let csv = to_csv(table.records()).unwrap();
        assert!(csv.contains("\"Road resurfacing, Ward 12\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().len();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == headers));
    }

    #[test]
    fn every_collection_reads_back_with_equal_field_counts() {
        assert_seeded_export_reads_back::<Budget>();
        assert_seeded_export_reads_back::<Payable>();
        assert_seeded_export_reads_back::<Receipt>();
        assert_seeded_export_reads_back::<SiteProgress>();
        assert_seeded_export_reads_back::<Compensation>();
        assert_seeded_export_reads_back::<Valuation>();
        assert_seeded_export_reads_back::<Hearing>();
        assert_seeded_export_reads_back::<Dpr>();
        assert_seeded_export_reads_back::<Project>();
        assert_seeded_export_reads_back::<Estimate>();
        assert_seeded_export_reads_back::<RtiApplication>();
    }

    #[test]
    fn quotes_and_line_breaks_in_text_survive_export() {
        let mut table = RecordTable::<RtiApplication>::seeded(2024).unwrap();
        let subject = "Tanker logs, \"Ward 4\"\nJanuary to March";
        table
            .update("RTI-2024-001", &json!({ "subject": subject }))
            .expect("patch subject");

        let csv = to_csv(table.records()).unwrap();
        assert_reads_back(&csv, table.records());
        assert_eq!(table.records()[0].subject, subject);
    }

    #[test]
    fn empty_export_is_header_only() {
        let csv = to_csv::<Budget>(std::iter::empty()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn file_name_uses_underscored_collection() {
        assert_eq!(
            export_file_name::<SiteProgress>(date(2024, 6, 1)),
            "site_progress_2024-06-01.csv"
        );
    }

    #[test]
    fn writes_filtered_rows_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let table = RecordTable::<SiteProgress>::seeded(2024).unwrap();
        let query = RecordQuery::new("", "Critical");

        let outcome = write_export(
            &dir.path().join("exports"),
            date(2024, 6, 1),
            project(table.records(), &query),
        )
        .expect("export");

        assert_eq!(outcome.row_count, 1);
        let written = std::fs::read_to_string(&outcome.path).expect("read export");
        assert_eq!(written.lines().count(), 2);
        assert_eq!(written.len(), outcome.bytes);
    }
}
