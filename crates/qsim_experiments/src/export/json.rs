use crate::metrics::CenterSummary;

use super::ExportError;

pub(crate) fn export_to_json_impl(summaries: &[CenterSummary], file: std::fs::File) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(file, summaries)?;
    Ok(())
}
