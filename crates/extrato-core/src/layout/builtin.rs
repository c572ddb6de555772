use crate::error::ExtractError;
use crate::layout::schema::SignatureSet;

const SIGNATURES_JSON: &str = include_str!("../../../../layouts/signatures.json");

/// Load the built-in signature set shipped with the crate.
pub fn builtin_signatures() -> Result<SignatureSet, ExtractError> {
    let set: SignatureSet = serde_json::from_str(SIGNATURES_JSON)?;
    Ok(set)
}
