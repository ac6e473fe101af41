//! Result export to CSV, JSON and Parquet.
//!
//! Window tables carry one row per center and window (`#Run` for
//! replications, `#Batch` for batch means) with the seven metrics as
//! columns.

use std::path::Path;

use thiserror::Error;

use crate::metrics::{CenterSummary, ExperimentResult};
use crate::verification::VerificationResult;
use crate::welch::WelchPlot;

#[path = "export/csv.rs"]
mod csv;
#[path = "export/json.rs"]
mod json;
#[path = "export/parquet.rs"]
mod parquet;
#[path = "export/writer_utils.rs"]
mod writer_utils;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no results to export")]
    Empty,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Parquet error: {0}")]
    Parquet(#[from] ::parquet::errors::ParquetError),
}

/// Export every center's windows to CSV.
///
/// # Errors
///
/// Returns an error if the result has no windows or writing fails.
pub fn export_windows_csv(result: &ExperimentResult, path: impl AsRef<Path>) -> Result<(), ExportError> {
    writer_utils::ensure_has_windows(result)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_windows_impl(result, file)
}

/// Export verification rows (one per center and metric) to CSV.
pub fn export_verification_csv(
    results: &[VerificationResult],
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    writer_utils::ensure_not_empty(results)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_verification_impl(results, file)
}

/// Export Welch plots (one row per center and checkpoint) to CSV.
pub fn export_welch_csv(plots: &[WelchPlot], path: impl AsRef<Path>) -> Result<(), ExportError> {
    writer_utils::ensure_not_empty(plots)?;
    let file = writer_utils::create_output_file(path)?;
    csv::export_welch_impl(plots, file)
}

/// Export center summaries as a pretty-printed JSON array.
pub fn export_summaries_json(summaries: &[CenterSummary], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = writer_utils::create_output_file(path)?;
    json::export_to_json_impl(summaries, file)
}

/// Export every center's windows to Parquet.
///
/// # Errors
///
/// Returns an error if the result has no windows or Parquet writing fails.
pub fn export_windows_parquet(result: &ExperimentResult, path: impl AsRef<Path>) -> Result<(), ExportError> {
    writer_utils::ensure_has_windows(result)?;
    let file = writer_utils::create_output_file(path)?;
    parquet::export_windows_impl(result, file)
}
