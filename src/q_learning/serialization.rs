//! Persisted form of a Q-table.
//!
//! The on-disk shape is a flat record of parallel key and value lists, so it
//! stays readable by hand and order-independent:
//!
//! ```json
//! {
//!   "version": 1,
//!   "inputCount": 4,
//!   "actionCount": 6,
//!   "keys": ["2_1_1_5"],
//!   "values": [{ "array": [0.0, 0.0, 0.05, 0.0, 0.0, 0.0] }]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, q_learning::q_table::QTable, types::SituationKey};

/// One row of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRow {
    pub array: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQTable {
    #[serde(default = "SavedQTable::default_version")]
    pub version: u32,
    /// Number of sensor scalars the table was trained with
    pub input_count: usize,
    pub action_count: usize,
    pub keys: Vec<String>,
    pub values: Vec<SavedRow>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    fn default_version() -> u32 {
        Self::VERSION
    }

    /// Snapshot `table`. Keys are sorted so repeated saves are stable.
    pub fn from_table(table: &QTable, input_count: usize) -> Self {
        let mut rows: Vec<_> = table.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));

        let (keys, values): (Vec<String>, Vec<SavedRow>) = rows
            .into_iter()
            .map(|(key, row)| {
                (
                    key.as_str().to_string(),
                    SavedRow {
                        array: row.to_vec(),
                    },
                )
            })
            .unzip();

        Self {
            version: Self::VERSION,
            input_count,
            action_count: table.action_count(),
            keys,
            values,
        }
    }

    /// Rebuild a table, checking the record is structurally sound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSave`] on an unknown version, an action
    /// count other than `expected_actions`, mismatched list lengths,
    /// duplicate keys or rows of the wrong width.
    pub fn into_table(self, expected_actions: usize) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(Error::MalformedSave {
                reason: format!(
                    "unsupported save format version {} (expected {})",
                    self.version,
                    Self::VERSION
                ),
            });
        }
        if self.action_count != expected_actions {
            return Err(Error::MalformedSave {
                reason: format!(
                    "saved table has {} actions, registry has {expected_actions}",
                    self.action_count
                ),
            });
        }
        if self.keys.len() != self.values.len() {
            return Err(Error::MalformedSave {
                reason: format!(
                    "{} keys but {} value rows",
                    self.keys.len(),
                    self.values.len()
                ),
            });
        }

        let mut seen = HashSet::with_capacity(self.keys.len());
        let mut table = QTable::new(self.action_count);
        for (key, row) in self.keys.into_iter().zip(self.values) {
            if !seen.insert(key.clone()) {
                return Err(Error::MalformedSave {
                    reason: format!("duplicate key {key}"),
                });
            }
            table.insert_row(SituationKey::new(key), row.array)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QTable {
        let mut table = QTable::new(3);
        table
            .insert_row(SituationKey::from("1_1_1_5"), vec![0.5, -1.0, 0.0])
            .unwrap();
        table
            .insert_row(SituationKey::from("0_0_1_2"), vec![0.0, 0.0, 3.25])
            .unwrap();
        table
    }

    #[test]
    fn test_roundtrip_through_json() {
        let table = sample();
        let saved = SavedQTable::from_table(&table, 4);
        assert_eq!(saved.keys, vec!["0_0_1_2", "1_1_1_5"]);

        let json = serde_json::to_string_pretty(&saved).unwrap();
        assert!(json.contains("\"inputCount\": 4"));
        assert!(json.contains("\"actionCount\": 3"));

        let loaded: SavedQTable = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.into_table(3).unwrap(), table);
    }

    #[test]
    fn test_missing_version_is_accepted() {
        let json = r#"{"inputCount":4,"actionCount":2,"keys":["a"],"values":[{"array":[1.0,2.0]}]}"#;
        let saved: SavedQTable = serde_json::from_str(json).unwrap();
        let table = saved.into_table(2).unwrap();
        assert_eq!(table.row(&SituationKey::from("a")).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_structural_mismatches_are_rejected() {
        let mut saved = SavedQTable::from_table(&sample(), 4);
        saved.values.pop();
        assert!(matches!(
            saved.into_table(3),
            Err(Error::MalformedSave { .. })
        ));

        let saved = SavedQTable::from_table(&sample(), 4);
        assert!(matches!(
            saved.into_table(6),
            Err(Error::MalformedSave { .. })
        ));

        let mut saved = SavedQTable::from_table(&sample(), 4);
        saved.values[0].array.push(9.0);
        assert!(matches!(
            saved.into_table(3),
            Err(Error::MalformedSave { .. })
        ));

        let mut saved = SavedQTable::from_table(&sample(), 4);
        saved.keys[1] = saved.keys[0].clone();
        assert!(matches!(
            saved.into_table(3),
            Err(Error::MalformedSave { .. })
        ));
    }
}
