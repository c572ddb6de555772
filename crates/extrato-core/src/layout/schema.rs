use serde::{Deserialize, Serialize};

/// A named set of layout signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureSet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Declaration order breaks priority ties.
    pub signatures: Vec<LayoutSignature>,
}

/// Keywords that identify one document family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSignature {
    pub name: String,
    /// Every keyword must appear (case-insensitive) in the first page.
    pub keywords: Vec<String>,
    /// Higher priorities are tested first.
    #[serde(default)]
    pub priority: i32,
}

impl LayoutSignature {
    pub fn new(name: &str, keywords: &[&str], priority: i32) -> Self {
        LayoutSignature {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            priority,
        }
    }

    /// Whether every keyword occurs in already upper-cased text.
    pub fn matches_upper(&self, text_upper: &str) -> bool {
        self.keywords
            .iter()
            .all(|kw| text_upper.contains(&kw.to_uppercase()))
    }
}
