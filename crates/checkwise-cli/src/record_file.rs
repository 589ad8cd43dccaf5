//! Record files: a JSON object mapping parameter key to a number in the
//! canonical unit, `null`, or `{"value": .., "unit": ..}`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use checkwise_session::Session;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EntryValue {
    Canonical(f64),
    WithUnit {
        value: f64,
        #[serde(default)]
        unit: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RecordFile {
    pub entries: BTreeMap<String, Option<EntryValue>>,
}

impl RecordFile {
    pub fn parse(json: &str) -> eyre::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read record at {}: {e}", path.display()))?;
        Self::parse(&contents)
    }

    /// Write every entry into the session. Fails on the first key the
    /// session's registry does not know; earlier entries stay applied.
    pub fn apply(&self, session: &Session) -> eyre::Result<()> {
        for (key, entry) in &self.entries {
            match entry {
                None => session.clear_value(key)?,
                Some(EntryValue::Canonical(value))
                | Some(EntryValue::WithUnit { value, unit: None }) => {
                    session.set_canonical(key, *value)?
                }
                Some(EntryValue::WithUnit {
                    value,
                    unit: Some(unit),
                }) => session.set_value(key, *value, unit)?,
            }
        }
        tracing::debug!(entries = self.entries.len(), "record file applied");
        Ok(())
    }
}
