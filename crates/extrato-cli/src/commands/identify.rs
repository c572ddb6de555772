use extrato_core::error::ExtractError;
use extrato_core::extraction::pdftotext::PdftotextExtractor;
use extrato_core::extraction::PdfExtractor;
use std::path::Path;

use super::{file_label, load_signatures};

pub fn run(pdf_file: &Path, signatures: Option<&Path>) -> Result<(), ExtractError> {
    let signatures = load_signatures(signatures)?;
    let pdf_bytes = std::fs::read(pdf_file)?;
    let pages = PdftotextExtractor::new().extract_pages(&pdf_bytes)?;

    let layout = extrato_core::identify_pages(&pages, &file_label(pdf_file), &signatures)?;
    println!("{layout}");
    Ok(())
}
