use std::fs::File;
use std::path::Path;

use crate::metrics::ExperimentResult;

use super::ExportError;

pub(crate) fn ensure_not_empty<T>(items: &[T]) -> Result<(), ExportError> {
    if items.is_empty() {
        return Err(ExportError::Empty);
    }

    Ok(())
}

pub(crate) fn ensure_has_windows(result: &ExperimentResult) -> Result<(), ExportError> {
    if result.centers.iter().all(|c| c.windows.is_empty()) {
        return Err(ExportError::Empty);
    }

    Ok(())
}

/// Creates `path`, and its parent directories if needed.
pub(crate) fn create_output_file(path: impl AsRef<Path>) -> Result<File, ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
