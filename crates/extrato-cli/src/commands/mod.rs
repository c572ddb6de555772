pub mod batch;
pub mod extract;
pub mod identify;
pub mod layouts;

use extrato_core::error::ExtractError;
use extrato_core::layout::builtin;
use extrato_core::layout::schema::LayoutSignature;
use extrato_core::ExtractOptions;
use std::path::Path;

/// The signature set to match against: a custom file if given, otherwise
/// the built-in one.
pub fn load_signatures(path: Option<&Path>) -> Result<Vec<LayoutSignature>, ExtractError> {
    let set = match path {
        Some(path) => extrato_core::layout::load_signatures(path)?,
        None => builtin::builtin_signatures()?,
    };
    tracing::debug!(set = %set.name, signatures = set.signatures.len(), "signatures loaded");
    Ok(set.signatures)
}

pub fn options(window: Option<usize>) -> ExtractOptions {
    let mut options = ExtractOptions::default();
    if let Some(window) = window {
        options.code_window = window;
    }
    options
}

/// File name used as `arquivo_origem` and as the per-file output label.
pub fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
