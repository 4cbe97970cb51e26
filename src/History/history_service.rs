//! # Calculation history
//!
//! Records of calculated formulae persisted in a JSON file. Every change is written to the
//! file immediately. Record ids grow monotonically and are never reused, even after deletion.
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::Formula::evaluator::{calculate_molar_mass, round_mass};
use crate::Formula::formula_error::FormulaError;
use crate::Formula::mass_table::AtomicMassTable;
use crate::PubChem::pubchem_api::CompoundProperties;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Formula with ID {0} not found")]
    NotFound(u64),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error("Failed to access history file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed history data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: u64,
    pub formula: String,
    /// rounded to 4 decimal digits
    pub molar_mass: f64,
    /// seconds since the unix epoch
    pub timestamp: u64,
    pub user: Option<String>,
    #[serde(flatten)]
    pub properties: CompoundProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryData {
    next_id: u64,
    records: Vec<HistoryRecord>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[derive(Debug)]
pub struct HistoryStore {
    data: HistoryData,
    /// None: the history lives in memory only
    path: Option<PathBuf>,
}

impl HistoryStore {
    pub fn in_memory() -> Self {
        HistoryStore {
            data: HistoryData {
                next_id: 1,
                records: Vec::new(),
            },
            path: None,
        }
    }

    /// opens the history file, a missing file means empty history
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| HistoryError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let mut data: HistoryData = serde_json::from_str(&content)?;
            let max_id = data.records.iter().map(|r| r.id).max().unwrap_or(0);
            data.next_id = data.next_id.max(max_id + 1);
            info!(
                "Loaded {} history records from '{}'",
                data.records.len(),
                path.display()
            );
            data
        } else {
            HistoryData {
                next_id: 1,
                records: Vec::new(),
            }
        };
        Ok(HistoryStore {
            data,
            path: Some(path),
        })
    }

    fn persist(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(path, content).map_err(|source| HistoryError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.data.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.records.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&HistoryRecord> {
        self.data.records.iter().find(|r| r.id == id)
    }

    /// Saving is not critical for the caller: a failure is logged and None is returned.
    pub fn save(
        &mut self,
        formula: &str,
        molar_mass: f64,
        properties: &CompoundProperties,
        user: Option<&str>,
    ) -> Option<u64> {
        let id = self.data.next_id;
        self.data.records.push(HistoryRecord {
            id,
            formula: formula.to_string(),
            molar_mass: round_mass(molar_mass),
            timestamp: now_secs(),
            user: user.map(str::to_string),
            properties: properties.clone(),
        });
        self.data.next_id += 1;
        match self.persist() {
            Ok(()) => Some(id),
            Err(e) => {
                error!("History error (non-critical): {}", e);
                self.data.records.pop();
                self.data.next_id -= 1;
                None
            }
        }
    }

    /// newest records first
    pub fn list(&self, limit: usize) -> Vec<HistoryRecord> {
        let mut records = self.data.records.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        records
    }

    /// Replaces the formula of a record; the molar mass is recalculated and the timestamp
    /// refreshed. An invalid formula leaves the record untouched.
    pub fn update(
        &mut self,
        id: u64,
        new_formula: &str,
        table: &AtomicMassTable,
    ) -> Result<HistoryRecord, HistoryError> {
        let index = self
            .data
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(HistoryError::NotFound(id))?;
        let molar_mass = calculate_molar_mass(new_formula, table)?;

        let previous = self.data.records[index].clone();
        let record = &mut self.data.records[index];
        record.formula = new_formula.to_string();
        record.molar_mass = round_mass(molar_mass);
        record.timestamp = now_secs();
        let updated = record.clone();
        if let Err(e) = self.persist() {
            self.data.records[index] = previous;
            return Err(e);
        }
        Ok(updated)
    }

    pub fn delete(&mut self, id: u64) -> Result<String, HistoryError> {
        let index = self
            .data
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(HistoryError::NotFound(id))?;
        let removed = self.data.records.remove(index);
        if let Err(e) = self.persist() {
            self.data.records.insert(index, removed);
            return Err(e);
        }
        Ok(format!("Formula with ID {} deleted successfully", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Formula::formula_error::FormatError;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    fn properties() -> CompoundProperties {
        CompoundProperties {
            iupac_name: Some("oxidane".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_and_list() {
        let mut store = HistoryStore::in_memory();
        let first = store.save("H2O", 18.01528, &properties(), Some("127.0.0.1"));
        let second = store.save("NaCl", 58.44, &CompoundProperties::default(), None);
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));

        let records = store.list(10);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].formula, "NaCl");
        assert_eq!(records[1].formula, "H2O");
        assert_relative_eq!(records[1].molar_mass, 18.0153);
        assert_eq!(records[1].user.as_deref(), Some("127.0.0.1"));
        assert_eq!(records[1].properties.iupac_name.as_deref(), Some("oxidane"));

        assert_eq!(store.list(1).len(), 1);
        assert!(store.list(0).is_empty());
    }

    #[test]
    fn test_update() {
        let table = AtomicMassTable::builtin();
        let mut store = HistoryStore::in_memory();
        let id = store.save("H2O", 18.015, &properties(), None).unwrap();

        let updated = store.update(id, "C6H12O6", &table).unwrap();
        assert_eq!(updated.formula, "C6H12O6");
        assert_relative_eq!(updated.molar_mass, 180.156, epsilon = 1e-3);
        assert_eq!(store.get(id), Some(&updated));

        let err = store.update(id, "H2(O", &table).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::Formula(FormulaError::Format(
                FormatError::UnbalancedParentheses { .. }
            ))
        ));
        assert_eq!(store.get(id).unwrap().formula, "C6H12O6");

        assert!(matches!(
            store.update(42, "H2O", &table),
            Err(HistoryError::NotFound(42))
        ));
    }

    #[test]
    fn test_delete() {
        let mut store = HistoryStore::in_memory();
        let id = store.save("H2O", 18.015, &properties(), None).unwrap();
        assert_eq!(
            store.delete(id).unwrap(),
            "Formula with ID 1 deleted successfully"
        );
        assert!(store.is_empty());
        assert!(matches!(store.delete(id), Err(HistoryError::NotFound(1))));
        // ids are not reused
        assert_eq!(store.save("O2", 31.998, &properties(), None), Some(2));
    }

    #[test]
    fn test_persistence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        {
            let mut store = HistoryStore::open(&path).unwrap();
            assert!(store.is_empty());
            store.save("H2O", 18.015, &properties(), None);
            store.save("NaCl", 58.44, &properties(), None);
            store.delete(2).unwrap();
        }
        let mut store = HistoryStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().formula, "H2O");
        assert_eq!(store.save("CO2", 44.009, &properties(), None), Some(3));
    }

    #[test]
    fn test_failed_save_is_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("history.json");
        let mut store = HistoryStore::open(&path).unwrap();
        assert_eq!(store.save("H2O", 18.015, &properties(), None), None);
        assert!(store.is_empty());
        // the id was not consumed
        assert_eq!(store.data.next_id, 1);
    }
}
