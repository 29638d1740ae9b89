//! Offline scoring of a JSON records file with the same pipeline the HTTP
//! service runs.
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use salecast_model::inference::{parse_payload, records_from_payload};
use salecast_model::{Artifact, PredictionBatch, PASSTHROUGH_FIELDS};

/// Load the artifact, score `input_path` and write the predictions.
///
/// Writes CSV (or TSV for a `.tsv` output) to `output_path`, or CSV to
/// stdout when no output is given.
pub fn run_batch(artifact_path: &Path, input_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let artifact = Artifact::load(artifact_path)?;

    let body = fs::read(input_path)
        .with_context(|| format!("Failed to read input file: {:?}", input_path))?;
    let records = records_from_payload(parse_payload(&body)?)?;
    log::info!("Loaded {} records from {:?}", records.len(), input_path);

    let start_time = std::time::Instant::now();
    let batch = artifact.predict(records)?;
    log::info!(
        "Scored {} records in {:?}",
        batch.n_samples,
        start_time.elapsed()
    );

    match output_path {
        Some(path) => {
            write_predictions(&batch, path)?;
            log::info!("Predictions saved to: {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            write_records(&batch, b',', stdout.lock())?;
        }
    }
    Ok(())
}

/// Write a batch to a CSV or TSV file based on file extension.
pub fn write_predictions<P: AsRef<Path>>(batch: &PredictionBatch, output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("csv");
    let delimiter = match extension {
        "tsv" => b'\t',
        _ => b',',
    };

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    write_records(batch, delimiter, io::BufWriter::new(file))
}

fn write_records<W: Write>(batch: &PredictionBatch, delimiter: u8, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    let mut header = vec!["prediction"];
    header.extend(PASSTHROUGH_FIELDS);
    writer.write_record(&header)?;

    for record in &batch.results {
        writer.write_record(&[
            record.prediction.to_string(),
            cell_text(record.product_id.as_ref()),
            cell_text(record.name.as_ref()),
            cell_text(record.season.as_ref()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Strings are written bare, other JSON values as their JSON text.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
