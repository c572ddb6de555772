pub mod builtin;
pub mod schema;

use crate::error::ExtractError;
use schema::{LayoutSignature, SignatureSet};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Layouts with a registered extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    DemonstrativoTitular,
    ServicosDigitais,
    AntecipacaoPrescritos,
    DistribuicaoPrescritiveis,
    AnaliticoAutoral,
    AnaliticoConexo,
}

/// Grammar family shared by one or more layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Standard statements: works, data lines with amounts, ISRC lines.
    Statement,
    /// Authorial analytical report: works and their rights holders.
    Authorial,
    /// Connected-rights analytical report: recordings and participants.
    Connected,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        LayoutKind::DemonstrativoTitular,
        LayoutKind::ServicosDigitais,
        LayoutKind::AntecipacaoPrescritos,
        LayoutKind::DistribuicaoPrescritiveis,
        LayoutKind::AnaliticoAutoral,
        LayoutKind::AnaliticoConexo,
    ];

    /// Signature name, also written as `tipo_extracao` on every row.
    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::DemonstrativoTitular => "DEMONSTRATIVO_TITULAR",
            LayoutKind::ServicosDigitais => "DEMONSTRATIVO_SERVICOS_DIGITAIS",
            LayoutKind::AntecipacaoPrescritos => "DEMONSTRATIVO_ANTECIPACAO_PRESCRITOS",
            LayoutKind::DistribuicaoPrescritiveis => "DISTRIBUICAO_PRESCRITIVEIS",
            LayoutKind::AnaliticoAutoral => "RELATORIO_ANALITICO_AUTORAL",
            LayoutKind::AnaliticoConexo => "RELATORIO_ANALITICO_CONEXO",
        }
    }

    pub fn from_name(name: &str) -> Option<LayoutKind> {
        LayoutKind::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn family(self) -> Family {
        match self {
            LayoutKind::DemonstrativoTitular
            | LayoutKind::ServicosDigitais
            | LayoutKind::AntecipacaoPrescritos
            | LayoutKind::DistribuicaoPrescritiveis => Family::Statement,
            LayoutKind::AnaliticoAutoral => Family::Authorial,
            LayoutKind::AnaliticoConexo => Family::Connected,
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identify the layout of a document from its first page's text.
///
/// Signatures are tried by descending priority, ties in declaration order;
/// the first one whose keywords all occur wins. Returns `None` when nothing
/// matches.
pub fn identify<'a>(signatures: &'a [LayoutSignature], first_page_text: &str) -> Option<&'a str> {
    let text_upper = first_page_text.to_uppercase();

    let mut ordered: Vec<&LayoutSignature> = signatures.iter().collect();
    ordered.sort_by_key(|sig| Reverse(sig.priority));

    ordered
        .into_iter()
        .find(|sig| sig.matches_upper(&text_upper))
        .map(|sig| sig.name.as_str())
}

/// Load a signature set from a JSON file.
pub fn load_signatures(path: &Path) -> Result<SignatureSet, ExtractError> {
    let content = std::fs::read_to_string(path).map_err(|e| ExtractError::SignatureLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_signatures(&content, path)
}

/// Parse a signature set from a JSON string.
pub fn parse_signatures(json: &str, source: &Path) -> Result<SignatureSet, ExtractError> {
    let set: SignatureSet =
        serde_json::from_str(json).map_err(|e| ExtractError::SignatureLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_signatures(&set)?;
    Ok(set)
}

/// Parse a signature set from a JSON string (no file path context).
pub fn parse_signatures_str(json: &str) -> Result<SignatureSet, ExtractError> {
    let set: SignatureSet = serde_json::from_str(json).map_err(ExtractError::Json)?;
    validate_signatures(&set)?;
    Ok(set)
}

/// Validate that a signature set is well-formed.
///
/// Names without a registered extractor are allowed here; they surface as
/// `ExtractorMissing` when a document actually matches them.
pub fn validate_signatures(set: &SignatureSet) -> Result<(), ExtractError> {
    if set.signatures.is_empty() {
        return Err(ExtractError::SignatureInvalid(
            "signatures must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for sig in &set.signatures {
        if sig.name.trim().is_empty() {
            return Err(ExtractError::SignatureInvalid(
                "signature name must not be empty".into(),
            ));
        }

        if !seen.insert(sig.name.as_str()) {
            return Err(ExtractError::SignatureInvalid(format!(
                "duplicate signature '{}'",
                sig.name
            )));
        }

        if sig.keywords.is_empty() {
            return Err(ExtractError::SignatureInvalid(format!(
                "signature '{}' has no keywords",
                sig.name
            )));
        }

        if sig.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ExtractError::SignatureInvalid(format!(
                "signature '{}' has a blank keyword",
                sig.name
            )));
        }
    }

    Ok(())
}
