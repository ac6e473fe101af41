use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use qsim_core::statistics::MetricIndex;

use crate::metrics::ExperimentResult;

use super::ExportError;

pub(crate) fn export_windows_impl(result: &ExperimentResult, file: std::fs::File) -> Result<(), ExportError> {
    let batch = build_record_batch(result)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(result: &ExperimentResult) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    RecordBatch::try_new(schema, build_arrays(result))
}

fn parquet_schema() -> Schema {
    let mut fields = vec![
        Field::new("center", DataType::Utf8, false),
        Field::new("window", DataType::UInt64, false),
    ];
    fields.extend(
        MetricIndex::ALL
            .iter()
            .map(|metric| Field::new(metric.name(), DataType::Float64, false)),
    );
    Schema::new(fields)
}

fn build_arrays(result: &ExperimentResult) -> Vec<ArrayRef> {
    let mut centers = Vec::new();
    let mut windows = Vec::new();
    let mut metrics: Vec<Vec<f64>> = vec![Vec::new(); MetricIndex::ALL.len()];

    for center in &result.centers {
        for window in 0..center.windows.len() {
            let Some(sample) = center.windows.sample(window) else {
                continue;
            };
            centers.push(center.name.clone());
            windows.push(window as u64 + 1);
            for metric in MetricIndex::ALL {
                metrics[metric.index()].push(sample.get(metric));
            }
        }
    }

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(centers)),
        Arc::new(UInt64Array::from(windows)),
    ];
    arrays.extend(
        metrics
            .into_iter()
            .map(|values| Arc::new(Float64Array::from(values)) as ArrayRef),
    );
    arrays
}
