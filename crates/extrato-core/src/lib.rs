pub mod error;
pub mod extraction;
pub mod extractors;
pub mod layout;
pub mod model;
pub mod parsing;
pub mod schema;
pub mod sink;

use error::ExtractError;
use extraction::{first_page_text, PageContent, PdfExtractor};
use layout::schema::LayoutSignature;
use layout::{Family, LayoutKind};
use model::Extraction;
use parsing::codes::DEFAULT_CODE_WINDOW;

/// Tunables for one extraction call.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Lines scanned either side of a data line that carries no ISRC.
    pub code_window: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            code_window: DEFAULT_CODE_WINDOW,
        }
    }
}

/// Main API entry point: identify a PDF statement's layout and extract its
/// records in the master schema.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    source_filename: &str,
    extractor: &dyn PdfExtractor,
    signatures: &[LayoutSignature],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    tracing::debug!(
        file = source_filename,
        backend = extractor.backend_name(),
        pages = pages.len(),
        "text layer extracted"
    );
    extract_pages(&pages, source_filename, signatures, options)
}

/// Identify and extract from already extracted pages.
pub fn extract_pages(
    pages: &[PageContent],
    source_filename: &str,
    signatures: &[LayoutSignature],
    options: &ExtractOptions,
) -> Result<Extraction, ExtractError> {
    let first_page = first_page_text(pages);
    let layout = identify_text(&first_page, source_filename, signatures)?;

    let kind = LayoutKind::from_name(&layout).ok_or_else(|| ExtractError::ExtractorMissing {
        layout: layout.clone(),
    })?;

    let context = parsing::header::parse_context(&first_page);
    let rows = extractors::extract_rows(
        kind,
        pages,
        &context,
        source_filename,
        options.code_window,
    );

    // Only the statement family records the document type at projection.
    let documento_origem = match kind.family() {
        Family::Statement => Some(kind.name()),
        Family::Authorial | Family::Connected => None,
    };
    let records = schema::project(
        &rows,
        kind.name(),
        context.titular.as_deref(),
        documento_origem,
    );

    if records.is_empty() {
        tracing::warn!(file = source_filename, layout = %kind, "no rows extracted");
    } else {
        tracing::info!(
            file = source_filename,
            layout = %kind,
            records = records.len(),
            "extraction finished"
        );
    }

    Ok(Extraction {
        layout,
        source_filename: source_filename.to_string(),
        context,
        records,
    })
}

/// Identify the layout of already extracted pages.
pub fn identify_pages(
    pages: &[PageContent],
    source_filename: &str,
    signatures: &[LayoutSignature],
) -> Result<String, ExtractError> {
    identify_text(&first_page_text(pages), source_filename, signatures)
}

fn identify_text(
    first_page: &str,
    source_filename: &str,
    signatures: &[LayoutSignature],
) -> Result<String, ExtractError> {
    let not_identified = || ExtractError::LayoutNotIdentified {
        file: source_filename.to_string(),
    };

    if first_page.trim().is_empty() {
        tracing::warn!(file = source_filename, "first page has no text");
        return Err(not_identified());
    }

    match layout::identify(signatures, first_page) {
        Some(name) => {
            tracing::info!(file = source_filename, layout = name, "layout identified");
            Ok(name.to_string())
        }
        None => {
            tracing::warn!(file = source_filename, "layout not identified");
            Err(not_identified())
        }
    }
}
