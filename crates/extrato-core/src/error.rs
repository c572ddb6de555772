use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("layout not identified for '{file}'. The file may be corrupt or in an unsupported format")]
    LayoutNotIdentified { file: String },

    #[error("no extractor registered for layout '{layout}'")]
    ExtractorMissing { layout: String },

    #[error("failed to load layout signatures from {path}: {reason}")]
    SignatureLoad { path: PathBuf, reason: String },

    #[error("invalid layout signatures: {0}")]
    SignatureInvalid(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    /// True for errors that reject one document without implicating the
    /// configuration or the environment.
    pub fn is_document_error(&self) -> bool {
        matches!(self, ExtractError::LayoutNotIdentified { .. })
    }
}
