use extrato_core::error::ExtractError;
use extrato_core::extraction::pdftotext::PdftotextExtractor;
use extrato_core::sink::{JsonSink, RowSink};
use std::path::{Path, PathBuf};

use super::{file_label, load_signatures, options};
use crate::output;

pub fn run(
    pdf_file: &Path,
    signatures: Option<&Path>,
    output_format: &str,
    output_file: Option<PathBuf>,
    window: Option<usize>,
) -> Result<(), ExtractError> {
    let signatures = load_signatures(signatures)?;
    let pdf_bytes = std::fs::read(pdf_file)?;
    let extractor = PdftotextExtractor::new();
    let extraction = extrato_core::extract_pdf(
        &pdf_bytes,
        &file_label(pdf_file),
        &extractor,
        &signatures,
        &options(window),
    )?;

    match output_file {
        Some(path) => {
            // Files always get JSON
            let (sink, label) = file_sink(&path);
            let path = sink.write(&extraction.records, &label)?;
            eprintln!(
                "{}: {} record(s), written to {}",
                extraction.layout,
                extraction.records.len(),
                path.display()
            );
        }
        None => match output_format {
            "json" => output::json::print(&extraction.records)?,
            _ => output::table::print(&extraction),
        },
    }

    Ok(())
}

/// A sink writing to `path`, with its extension replaced by `.json`.
fn file_sink(path: &Path) -> (JsonSink, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extrato".to_string());
    (JsonSink::new(dir), label)
}
