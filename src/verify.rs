//! Forecast Endpoint Verification Module
//!
//! Checks every saved field against the forecast API to determine which
//! fields currently return usable forecasts.
//!
//! Use this after deploying a new predictor or API version.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::groupings::{disease_names, group_by_disease};
use crate::ingest::field_api::FieldApi;
use crate::logging::{self, DataSource};
use crate::model::{ApiError, Field};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub field_results: Vec<FieldVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldVerification {
    pub field_name: String,
    pub lat: f64,
    pub lon: f64,
    pub status: VerificationStatus,
    pub api_responsive: bool,
    pub entry_count: usize,
    pub diseases: Vec<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    PartialSuccess,
    Failed,
}

// ============================================================================
// Field Verification
// ============================================================================

/// Fetches one field's forecast and records what came back.
///
/// An empty forecast counts as partial success: the endpoint answered but
/// there is nothing to show.
pub fn verify_field_forecast<A: FieldApi + ?Sized>(api: &A, field: &Field) -> FieldVerification {
    let mut result = FieldVerification {
        field_name: field.name.clone(),
        lat: field.location.lat,
        lon: field.location.lon,
        status: VerificationStatus::Failed,
        api_responsive: false,
        entry_count: 0,
        diseases: Vec::new(),
        error_message: None,
    };

    match api.fetch_forecast(&field.name) {
        Ok(entries) => {
            result.api_responsive = true;
            result.entry_count = entries.len();
            result.diseases = disease_names(&group_by_disease(&entries))
                .into_iter()
                .map(String::from)
                .collect();

            result.status = if result.entry_count > 0 {
                VerificationStatus::Success
            } else {
                VerificationStatus::PartialSuccess
            };
        }
        Err(e) => {
            logging::log_api_failure(DataSource::Forecast, Some(field.name.as_str()), "Verification", &e);
            result.error_message = Some(e.to_string());
        }
    }

    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

/// Verifies every field the API lists. Fails only if the field list
/// itself cannot be loaded.
pub fn run_full_verification<A: FieldApi + ?Sized>(api: &A) -> Result<VerificationReport, ApiError> {
    let fields = api.list_fields()?;

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        field_results: Vec::with_capacity(fields.len()),
        summary: VerificationSummary {
            total: fields.len(),
            ..VerificationSummary::default()
        },
    };

    for field in &fields {
        let result = verify_field_forecast(api, field);
        match result.status {
            VerificationStatus::Success | VerificationStatus::PartialSuccess => report.summary.working += 1,
            VerificationStatus::Failed => report.summary.failed += 1,
        }
        report.field_results.push(result);
    }

    logging::log_verification_summary(report.summary.total, report.summary.working, report.summary.failed);
    Ok(report)
}

/// Share of fields whose forecast endpoint answered, in percent.
pub fn success_rate(summary: &VerificationSummary) -> f64 {
    if summary.total > 0 {
        (summary.working as f64 / summary.total as f64) * 100.0
    } else {
        0.0
    }
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n══════════════════════════════════════════════════════════");
    println!("📊 FORECAST VERIFICATION SUMMARY");
    println!("══════════════════════════════════════════════════════════");
    println!();

    for result in &report.field_results {
        match result.status {
            VerificationStatus::Success => println!(
                "  ✓ {} ({} entries, {} diseases)",
                result.field_name,
                result.entry_count,
                result.diseases.len()
            ),
            VerificationStatus::PartialSuccess => println!("  ⚠ {} (responsive but no entries)", result.field_name),
            VerificationStatus::Failed => println!(
                "  ✗ {} FAILED: {}",
                result.field_name,
                result.error_message.as_deref().unwrap_or("Unknown")
            ),
        }
    }

    println!();
    println!(
        "Fields:    {}/{} working  ({} failed)",
        report.summary.working, report.summary.total, report.summary.failed
    );
    println!(
        "Overall Success Rate: {:.1}% ({}/{})",
        success_rate(&report.summary),
        report.summary.working,
        report.summary.total
    );
    println!("══════════════════════════════════════════════════════════");
}
