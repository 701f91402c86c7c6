use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{ScoreKey, ScoreRecord, ScoreStore};

/// Process-local store; records vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<ScoreKey, ScoreRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in key order
    pub fn records(&self) -> Vec<(ScoreKey, ScoreRecord)> {
        match self.records.lock() {
            Ok(records) => records
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreStore for MemoryStore {
    fn write(&self, key: &ScoreKey, record: &ScoreRecord) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;

        if records.contains_key(key) {
            anyhow::bail!("score already recorded at {}", key);
        }
        records.insert(key.clone(), record.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
