use crate::error::ExtractError;
use crate::model::RecordSet;
use std::path::{Path, PathBuf};

/// Destination for projected records.
pub trait RowSink {
    /// Persist `records` under `label` and return where they went.
    fn write(&self, records: &RecordSet, label: &str) -> Result<PathBuf, ExtractError>;
}

/// Writes each record set as a pretty JSON array to `<dir>/<label>.json`.
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonSink { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RowSink for JsonSink {
    fn write(&self, records: &RecordSet, label: &str) -> Result<PathBuf, ExtractError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ExtractError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(format!("{label}.json"));
        let json = serde_json::to_string_pretty(&records.records)?;
        std::fs::write(&path, json).map_err(|source| ExtractError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!(path = %path.display(), records = records.len(), "records written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, MasterRecord};
    use crate::schema::empty_record_set;
    use indexmap::IndexMap;
    use rust_decimal_macros::dec;

    #[test]
    fn test_json_sink_writes_ordered_records() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(dir.path().join("out"));

        let mut columns = IndexMap::new();
        columns.insert("titular".to_string(), Some(Cell::Text("MARIA".into())));
        columns.insert("rendimento".to_string(), Some(Cell::Amount(dec!(1234.56))));
        columns.insert("periodo".to_string(), None);
        let set = RecordSet {
            columns: columns.keys().cloned().collect(),
            records: vec![MasterRecord::new(columns)],
        };

        let path = sink.write(&set, "extrato").unwrap();
        assert_eq!(path, dir.path().join("out").join("extrato.json"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.find("titular").unwrap() < written.find("rendimento").unwrap());

        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed[0]["titular"], "MARIA");
        assert_eq!(parsed[0]["rendimento"], 1234.56);
        assert!(parsed[0]["periodo"].is_null());
    }

    #[test]
    fn test_json_sink_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonSink::new(dir.path());
        let path = sink.write(&empty_record_set(), "vazio").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
    }
}
