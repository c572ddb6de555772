pub mod pdftotext;

use crate::error::ExtractError;

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page
    /// in reading order.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, ExtractError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// The first page's lines joined with newlines. Empty when there are no
/// pages.
pub fn first_page_text(pages: &[PageContent]) -> String {
    pages
        .first()
        .map(|p| p.lines.join("\n"))
        .unwrap_or_default()
}
