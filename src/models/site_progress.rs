use crate::models::collection::Collection;
use crate::models::record::{date, opt_text, require_percent, require_text, CellFormat, Record};
use crate::models::status::{classify_progress, progress_variance, ProgressStatus};
use crate::store::StoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProgress {
    pub id: String,
    pub project_id: String,
    pub site_name: String,
    pub contractor: String,
    pub planned_progress: f64,
    pub actual_progress: f64,
    #[serde(default)]
    pub variance: f64,
    #[serde(default)]
    pub status: ProgressStatus,
    pub last_inspection: NaiveDate,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProgressDraft {
    pub project_id: String,
    pub site_name: String,
    pub contractor: String,
    pub planned_progress: f64,
    pub actual_progress: f64,
    pub last_inspection: NaiveDate,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl Record for SiteProgress {
    type Draft = SiteProgressDraft;
    type Status = ProgressStatus;

    const COLLECTION: Collection = Collection::SiteProgress;
    const CSV_COLUMNS: &'static [&'static str] = &[
        "ID",
        "Project ID",
        "Site",
        "Contractor",
        "Planned %",
        "Actual %",
        "Variance",
        "Status",
        "Last Inspection",
        "Remarks",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ProgressStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id.as_str(),
            self.project_id.as_str(),
            self.site_name.as_str(),
            self.contractor.as_str(),
        ]
    }

    fn from_draft(id: String, draft: SiteProgressDraft) -> Self {
        SiteProgress {
            id,
            project_id: draft.project_id,
            site_name: draft.site_name,
            contractor: draft.contractor,
            planned_progress: draft.planned_progress,
            actual_progress: draft.actual_progress,
            variance: 0.0,
            status: ProgressStatus::default(),
            last_inspection: draft.last_inspection,
            remarks: draft.remarks,
        }
    }

    // Status is never user-selected here; it always follows the variance.
    fn derive_fields(&mut self) -> Result<(), StoreError> {
        self.variance = progress_variance(self.planned_progress, self.actual_progress);
        self.status = classify_progress(self.planned_progress, self.actual_progress);
        Ok(())
    }

    fn validate(&self) -> Result<(), StoreError> {
        require_text("project_id", &self.project_id)?;
        require_text("site_name", &self.site_name)?;
        require_text("contractor", &self.contractor)?;
        require_percent("planned_progress", self.planned_progress)?;
        require_percent("actual_progress", self.actual_progress)?;
        Ok(())
    }

    fn row(&self, cells: &dyn CellFormat) -> Vec<String> {
        vec![
            self.id.clone(),
            self.project_id.clone(),
            self.site_name.clone(),
            self.contractor.clone(),
            format!("{:.1}", self.planned_progress),
            format!("{:.1}", self.actual_progress),
            format!("{:+.1}", self.variance),
            self.status.to_string(),
            cells.date(self.last_inspection),
            opt_text(&self.remarks),
        ]
    }

    fn sample_drafts() -> Vec<SiteProgressDraft> {
        vec![
            SiteProgressDraft {
                project_id: "PRJ-2024-001".to_string(),
                site_name: "Ring Road Flyover, Pier 4-9".to_string(),
                contractor: "ABC Builders Ltd.".to_string(),
                planned_progress: 65.0,
                actual_progress: 62.0,
                last_inspection: date(2024, 5, 28),
                remarks: Some("Girder casting delayed by monsoon prep".to_string()),
            },
            SiteProgressDraft {
                project_id: "PRJ-2024-002".to_string(),
                site_name: "Zone 3 Water Main".to_string(),
                contractor: "Shree Pipes & Fittings".to_string(),
                planned_progress: 40.0,
                actual_progress: 47.0,
                last_inspection: date(2024, 5, 30),
                remarks: None,
            },
            SiteProgressDraft {
                project_id: "PRJ-2024-003".to_string(),
                site_name: "Ward 7 Health Centre".to_string(),
                contractor: "Urban Infra Co.".to_string(),
                planned_progress: 55.0,
                actual_progress: 38.0,
                last_inspection: date(2024, 6, 2),
                remarks: Some("Labour shortage".to_string()),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{apply_patch, build_record};
    use serde_json::json;

    #[test]
    fn samples_cover_three_statuses() {
        let statuses: Vec<ProgressStatus> = SiteProgress::sample_drafts()
            .into_iter()
            .enumerate()
            .map(|(i, d)| build_record::<SiteProgress>(format!("SPR-2024-{:03}", i + 1), d).unwrap().status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                ProgressStatus::BehindSchedule,
                ProgressStatus::AheadOfSchedule,
                ProgressStatus::Critical
            ]
        );
    }

    #[test]
    fn patch_reclassifies_and_ignores_status_override() {
        let record =
            build_record::<SiteProgress>("SPR-2024-001".to_string(), SiteProgress::sample_drafts()[0].clone())
                .unwrap();
        let patched = apply_patch(&record, &json!({ "actual_progress": 70.0, "status": "Critical" }))
            .expect("patch applies");
        assert_eq!(patched.variance, 5.0);
        assert_eq!(patched.status, ProgressStatus::AheadOfSchedule);
    }

    #[test]
    fn progress_above_hundred_is_rejected() {
        let mut draft = SiteProgress::sample_drafts()[0].clone();
        draft.actual_progress = 120.0;
        assert!(build_record::<SiteProgress>("SPR-2024-001".to_string(), draft).is_err());
    }
}
