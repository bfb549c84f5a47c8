use crate::models::budget::Budget;
use crate::models::compensation::Compensation;
use crate::models::dpr::{Dpr, DprStatus};
use crate::models::estimate::{Estimate, EstimateStatus};
use crate::models::hearing::Hearing;
use crate::models::money::{percentage, Amount};
use crate::models::payable::Payable;
use crate::models::project::Project;
use crate::models::receipt::{PaymentMode, Receipt, ReceiptStatus};
use crate::models::rti::RtiApplication;
use crate::models::site_progress::SiteProgress;
use crate::models::valuation::Valuation;
use crate::models::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Summary figures for a record collection, reduced over the full sequence.
pub trait Summarize: Record {
    type Summary: Serialize;

    /// `as_of` is the reference date for overdue / upcoming counts.
    fn summarize(records: &[Self], as_of: NaiveDate) -> Self::Summary;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// One entry per status, in declaration order, including zero counts.
pub fn status_counts<R: Record>(records: &[R]) -> Vec<StatusCount> {
    R::Status::iter()
        .map(|status| {
            let label: &'static str = status.into();
            StatusCount {
                status: label.to_string(),
                count: records.iter().filter(|r| r.status() == status).count(),
            }
        })
        .collect()
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64 * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub record_count: usize,
    pub total_allocated: Amount,
    pub total_utilized: Amount,
    pub total_available: Amount,
    pub overall_utilization: u32,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Budget {
    type Summary = BudgetSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> BudgetSummary {
        let total_allocated: Amount = records.iter().map(|b| b.allocated).sum();
        let total_utilized: Amount = records.iter().map(|b| b.utilized).sum();

        BudgetSummary {
            record_count: records.len(),
            total_allocated,
            total_utilized,
            total_available: records.iter().map(|b| b.available).sum(),
            overall_utilization: percentage(total_utilized, total_allocated),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayableSummary {
    pub record_count: usize,
    pub total_amount: Amount,
    pub total_paid: Amount,
    pub total_pending: Amount,
    pub overdue_count: usize,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Payable {
    type Summary = PayableSummary;

    fn summarize(records: &[Self], as_of: NaiveDate) -> PayableSummary {
        PayableSummary {
            record_count: records.len(),
            total_amount: records.iter().map(|p| p.total_amount).sum(),
            total_paid: records.iter().map(|p| p.paid_amount).sum(),
            total_pending: records.iter().map(|p| p.pending_amount).sum(),
            overdue_count: records.iter().filter(|p| p.is_overdue(as_of)).count(),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeTotal {
    pub mode: String,
    pub count: usize,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSummary {
    pub record_count: usize,
    pub total_collected: Amount,
    pub total_pending: Amount,
    pub total_bounced: Amount,
    pub by_mode: Vec<ModeTotal>,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Receipt {
    type Summary = ReceiptSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> ReceiptSummary {
        let sum_for = |status: ReceiptStatus| -> Amount {
            records
                .iter()
                .filter(|r| r.status == status)
                .map(|r| r.amount)
                .sum()
        };

        let by_mode = PaymentMode::iter()
            .map(|mode| {
                let matching = records.iter().filter(|r| r.mode == mode);
                ModeTotal {
                    mode: mode.to_string(),
                    count: matching.clone().count(),
                    amount: matching.map(|r| r.amount).sum(),
                }
            })
            .collect();

        ReceiptSummary {
            record_count: records.len(),
            total_collected: sum_for(ReceiptStatus::Cleared),
            total_pending: sum_for(ReceiptStatus::Pending),
            total_bounced: sum_for(ReceiptStatus::Bounced),
            by_mode,
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProgressSummary {
    pub record_count: usize,
    pub average_planned: f64,
    pub average_actual: f64,
    pub average_variance: f64,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for SiteProgress {
    type Summary = SiteProgressSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> SiteProgressSummary {
        SiteProgressSummary {
            record_count: records.len(),
            average_planned: average(records.iter().map(|s| s.planned_progress)),
            average_actual: average(records.iter().map(|s| s.actual_progress)),
            average_variance: average(records.iter().map(|s| s.variance)),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompensationSummary {
    pub record_count: usize,
    pub total_compensation: Amount,
    pub total_paid: Amount,
    pub total_pending: Amount,
    pub disbursement_percent: u32,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Compensation {
    type Summary = CompensationSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> CompensationSummary {
        let total_compensation: Amount = records.iter().map(|c| c.total_compensation).sum();
        let total_paid: Amount = records.iter().map(|c| c.paid_amount).sum();

        CompensationSummary {
            record_count: records.len(),
            total_compensation,
            total_paid,
            total_pending: records.iter().map(|c| c.pending_amount).sum(),
            disbursement_percent: percentage(total_paid, total_compensation),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSummary {
    pub record_count: usize,
    pub total_land_value: Amount,
    pub total_structure_value: Amount,
    pub total_value: Amount,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Valuation {
    type Summary = ValuationSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> ValuationSummary {
        ValuationSummary {
            record_count: records.len(),
            total_land_value: records.iter().map(|v| v.land_value).sum(),
            total_structure_value: records.iter().map(|v| v.structure_value).sum(),
            total_value: records.iter().map(|v| v.total_value).sum(),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingSummary {
    pub record_count: usize,
    pub upcoming_count: usize,
    pub next_hearing: Option<NaiveDate>,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Hearing {
    type Summary = HearingSummary;

    fn summarize(records: &[Self], as_of: NaiveDate) -> HearingSummary {
        let upcoming: Vec<&Hearing> = records.iter().filter(|h| h.is_upcoming(as_of)).collect();

        HearingSummary {
            record_count: records.len(),
            upcoming_count: upcoming.len(),
            next_hearing: upcoming.iter().map(|h| h.hearing_date).min(),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DprSummary {
    pub record_count: usize,
    pub total_estimated_cost: Amount,
    pub approved_cost: Amount,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Dpr {
    type Summary = DprSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> DprSummary {
        DprSummary {
            record_count: records.len(),
            total_estimated_cost: records.iter().map(|d| d.estimated_cost).sum(),
            approved_cost: records
                .iter()
                .filter(|d| d.status == DprStatus::Approved)
                .map(|d| d.estimated_cost)
                .sum(),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub record_count: usize,
    pub total_sanctioned_cost: Amount,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Project {
    type Summary = ProjectSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> ProjectSummary {
        ProjectSummary {
            record_count: records.len(),
            total_sanctioned_cost: records.iter().map(|p| p.sanctioned_cost).sum(),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub record_count: usize,
    pub line_item_count: usize,
    pub total_estimated: Amount,
    pub sanctioned_total: Amount,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for Estimate {
    type Summary = EstimateSummary;

    fn summarize(records: &[Self], _as_of: NaiveDate) -> EstimateSummary {
        EstimateSummary {
            record_count: records.len(),
            line_item_count: records.iter().map(|e| e.items.len()).sum(),
            total_estimated: records.iter().map(|e| e.total).sum(),
            sanctioned_total: records
                .iter()
                .filter(|e| e.status == EstimateStatus::Sanctioned)
                .map(|e| e.total)
                .sum(),
            status_counts: status_counts(records),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtiSummary {
    pub record_count: usize,
    pub open_count: usize,
    pub overdue_count: usize,
    pub fee_pending_count: usize,
    pub status_counts: Vec<StatusCount>,
}

impl Summarize for RtiApplication {
    type Summary = RtiSummary;

    fn summarize(records: &[Self], as_of: NaiveDate) -> RtiSummary {
        RtiSummary {
            record_count: records.len(),
            open_count: records.iter().filter(|r| r.status.is_open()).count(),
            overdue_count: records.iter().filter(|r| r.is_overdue(as_of)).count(),
            fee_pending_count: records.iter().filter(|r| !r.fee_paid).count(),
            status_counts: status_counts(records),
        }
    }
}
