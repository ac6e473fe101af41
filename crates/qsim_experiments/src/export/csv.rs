use qsim_core::statistics::MetricIndex;

use crate::metrics::ExperimentResult;
use crate::verification::VerificationResult;
use crate::welch::WelchPlot;

use super::ExportError;

pub(crate) fn export_windows_impl(result: &ExperimentResult, file: std::fs::File) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(file);

    let mut header = vec!["Center", result.kind.window_label()];
    header.extend(MetricIndex::ALL.iter().map(|m| m.label()));
    wtr.write_record(&header)?;

    for center in &result.centers {
        for window in 0..center.windows.len() {
            let Some(sample) = center.windows.sample(window) else {
                continue;
            };
            let mut row = vec![center.name.clone(), (window + 1).to_string()];
            row.extend(sample.values().iter().map(f64::to_string));
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_verification_impl(
    results: &[VerificationResult],
    file: std::fs::File,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["Center", "Metric", "Simulated", "AbsDiff", "HalfWidth", "Status"])?;

    for result in results {
        for metric in MetricIndex::ALL {
            wtr.write_record([
                result.name.clone(),
                metric.label().to_string(),
                result.means.get(metric).to_string(),
                result.comparison.diff(metric).to_string(),
                result
                    .intervals
                    .half_width(metric)
                    .map(|w| w.to_string())
                    .unwrap_or_default(),
                result.status(metric).label().to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_welch_impl(plots: &[WelchPlot], file: std::fs::File) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(file);
    wtr.write_record(["Center", "Checkpoint", "E[Ts]"])?;

    for plot in plots {
        for (i, point) in plot.points.iter().enumerate() {
            wtr.write_record([plot.name.clone(), (i + 1).to_string(), point.to_string()])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
