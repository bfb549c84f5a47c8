use crate::models::status::{classify_payment_formatted, classify_progress, progress_variance};
use crate::models::Amount;
use serde_json::{json, Value};

/// Progress status for a planned/actual percentage pair, with the variance used.
pub async fn classify_site_progress(planned: f64, actual: f64) -> Result<Value, String> {
    if !(0.0..=100.0).contains(&planned) || !(0.0..=100.0).contains(&actual) {
        return Err("VALIDATION: progress must be between 0 and 100".to_string());
    }

    Ok(json!({
        "variance": progress_variance(planned, actual),
        "status": classify_progress(planned, actual),
    }))
}

/// Payment status for a total/paid pair. Amounts may be plain rupee figures
/// or display strings such as `"₹55,00,000"`.
pub async fn classify_payment_status(total: String, paid: String) -> Result<Value, String> {
    let total_amount = Amount::parse_formatted(&total);
    let paid_amount = Amount::parse_formatted(&paid);

    Ok(json!({
        "total": total_amount,
        "paid": paid_amount,
        "pending": total_amount - paid_amount,
        "status": classify_payment_formatted(&total, &paid),
    }))
}
