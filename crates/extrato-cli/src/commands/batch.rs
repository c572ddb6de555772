use extrato_core::error::ExtractError;
use extrato_core::extraction::pdftotext::PdftotextExtractor;
use extrato_core::layout::schema::LayoutSignature;
use extrato_core::model::{Cell, Extraction, MasterRecord, RecordSet};
use extrato_core::schema::consolidate;
use extrato_core::sink::{JsonSink, RowSink};
use extrato_core::ExtractOptions;
use indexmap::IndexMap;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{file_label, load_signatures, options};

const CONSOLIDATED_LABEL: &str = "_consolidado";
const SUMMARY_LABEL: &str = "_summary";

struct Outcome {
    path: PathBuf,
    /// Unique per-file output name.
    label: String,
    result: Result<Extraction, ExtractError>,
    written: Option<Result<PathBuf, ExtractError>>,
}

pub fn run(
    pdf_files: &[PathBuf],
    signatures: Option<&Path>,
    out_dir: &Path,
    window: Option<usize>,
) -> Result<(), ExtractError> {
    let signatures = load_signatures(signatures)?;
    let options = options(window);
    let extractor = PdftotextExtractor::new();

    let results: Vec<Result<Extraction, ExtractError>> = pdf_files
        .par_iter()
        .map(|path| extract_file(path, &extractor, &signatures, &options))
        .collect();

    let mut outcomes: Vec<Outcome> = pdf_files
        .iter()
        .zip(output_labels(pdf_files))
        .zip(results)
        .map(|((path, label), result)| Outcome {
            path: path.clone(),
            label,
            result,
            written: None,
        })
        .collect();

    let sink = JsonSink::new(out_dir);
    let successes = write_outcomes(&sink, &mut outcomes);

    let consolidated = consolidate(&successes);
    let consolidated_path = sink.write(&consolidated, CONSOLIDATED_LABEL)?;
    sink.write(&summary(&outcomes), SUMMARY_LABEL)?;

    let failed = outcomes.len() - successes.len();
    eprintln!(
        "{} file(s): {} extracted, {} failed; {} record(s) consolidated in {}",
        outcomes.len(),
        successes.len(),
        failed,
        consolidated.len(),
        consolidated_path.display()
    );
    for outcome in &outcomes {
        if let Err(ref e) = outcome.result {
            eprintln!("  {}: {e}", outcome.path.display());
        }
        if let Some(Err(ref e)) = outcome.written {
            eprintln!("  {}: {e}", outcome.path.display());
        }
    }

    Ok(())
}

fn extract_file(
    path: &Path,
    extractor: &PdftotextExtractor,
    signatures: &[LayoutSignature],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let pdf_bytes = std::fs::read(path)?;
    extrato_core::extract_pdf(&pdf_bytes, &file_label(path), extractor, signatures, options)
}

/// Write every successful extraction under its label and return the record
/// sets to consolidate. A failed write is kept on the outcome; its records
/// are still consolidated.
fn write_outcomes(sink: &dyn RowSink, outcomes: &mut [Outcome]) -> Vec<RecordSet> {
    let mut successes = Vec::new();

    for outcome in outcomes.iter_mut() {
        match &outcome.result {
            Ok(extraction) => {
                let written = sink.write(&extraction.records, &outcome.label);
                if let Err(ref e) = written {
                    tracing::error!(file = %outcome.path.display(), error = %e, "write failed");
                }
                outcome.written = Some(written);
                successes.push(extraction.records.clone());
            }
            Err(e) if e.is_document_error() => {
                tracing::warn!(file = %outcome.path.display(), error = %e, "document skipped");
            }
            Err(e) => {
                tracing::error!(file = %outcome.path.display(), error = %e, "extraction failed");
            }
        }
    }

    successes
}

/// Per-file output names: the file stem, suffixed with "-2", "-3", ... when
/// an earlier file or a batch-level output already took it.
fn output_labels(paths: &[PathBuf]) -> Vec<String> {
    let mut taken: HashSet<String> = [CONSOLIDATED_LABEL, SUMMARY_LABEL]
        .iter()
        .map(|s| s.to_string())
        .collect();

    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_label(path));

            let mut label = stem.clone();
            let mut n = 2;
            while taken.contains(&label) {
                label = format!("{stem}-{n}");
                n += 1;
            }
            taken.insert(label.clone());
            label
        })
        .collect()
}

/// One row per input file: its layout, row count and output file, or the
/// error.
fn summary(outcomes: &[Outcome]) -> RecordSet {
    let columns = ["arquivo", "layout", "linhas", "saida", "erro"];

    let records = outcomes
        .iter()
        .map(|outcome| {
            let (layout, rows, extract_error) = match &outcome.result {
                Ok(extraction) => (
                    Some(Cell::Text(extraction.layout.clone())),
                    Some(Cell::Amount(Decimal::from(extraction.records.len()))),
                    None,
                ),
                Err(e) => (None, None, Some(e.to_string())),
            };
            let (output, write_error) = match &outcome.written {
                Some(Ok(path)) => (Some(path.display().to_string()), None),
                Some(Err(e)) => (None, Some(e.to_string())),
                None => (None, None),
            };

            let mut values = IndexMap::new();
            values.insert(
                columns[0].to_string(),
                Some(Cell::Text(file_label(&outcome.path))),
            );
            values.insert(columns[1].to_string(), layout);
            values.insert(columns[2].to_string(), rows);
            values.insert(columns[3].to_string(), output.map(Cell::Text));
            values.insert(
                columns[4].to_string(),
                extract_error.or(write_error).map(Cell::Text),
            );
            MasterRecord::new(values)
        })
        .collect();

    RecordSet {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        records,
    }
}
