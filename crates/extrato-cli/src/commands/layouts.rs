use extrato_core::error::ExtractError;
use extrato_core::layout::LayoutKind;
use std::cmp::Reverse;
use std::path::Path;

use super::load_signatures;

pub fn list(signatures: Option<&Path>) -> Result<(), ExtractError> {
    let mut signatures = load_signatures(signatures)?;
    signatures.sort_by_key(|sig| Reverse(sig.priority));

    println!("Layout signatures, in match order:\n");
    for sig in &signatures {
        let family = match LayoutKind::from_name(&sig.name) {
            Some(kind) => format!("{:?}", kind.family()).to_lowercase(),
            None => "no extractor".to_string(),
        };
        println!("  {:<40} priority {:<4} [{}]", sig.name, sig.priority, family);
        println!("    {}", sig.keywords.join(" + "));
        println!();
    }
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), ExtractError> {
    let set = extrato_core::layout::load_signatures(file)?;

    println!("Signature set '{}' (v{}) is valid.", set.name, set.version);
    println!("  Signatures: {}", set.signatures.len());

    // Warnings, not errors
    let mut warnings = Vec::new();
    for sig in &set.signatures {
        if LayoutKind::from_name(&sig.name).is_none() {
            warnings.push(format!(
                "signature '{}' has no extractor; matching documents will fail",
                sig.name
            ));
        }
    }
    for (i, a) in set.signatures.iter().enumerate() {
        for b in &set.signatures[i + 1..] {
            if a.priority == b.priority && a.keywords == b.keywords {
                warnings.push(format!(
                    "signatures '{}' and '{}' have the same keywords and priority; '{}' always wins",
                    a.name, b.name, a.name
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {w}");
        }
    }

    Ok(())
}
