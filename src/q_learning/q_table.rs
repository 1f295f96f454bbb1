//! Sparse value table keyed by situation

use std::collections::HashMap;

use crate::{Error, Result, types::SituationKey};

/// Q-table mapping situation keys to one value per registered action
///
/// Rows are created lazily, all zeros, the first time a key is seen. The
/// key space is unbounded; its size is governed by sensor bucketing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    /// situation key -> value per action index
    rows: HashMap<SituationKey, Vec<f64>>,
    action_count: usize,
}

impl QTable {
    /// Create an empty table for `action_count` actions
    pub fn new(action_count: usize) -> Self {
        Self {
            rows: HashMap::new(),
            action_count,
        }
    }

    pub fn action_count(&self) -> usize {
        self.action_count
    }

    /// Return the row for `key`, inserting a zero row if absent
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if the table has no action slots.
    pub fn ensure_row(&mut self, key: &SituationKey) -> Result<&mut [f64]> {
        if self.action_count == 0 {
            return Err(Error::EmptyActionSet);
        }
        let count = self.action_count;
        Ok(self
            .rows
            .entry(key.clone())
            .or_insert_with(|| vec![0.0; count]))
    }

    /// Get the row for `key` without creating it
    pub fn row(&self, key: &SituationKey) -> Option<&[f64]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    /// Index of the largest value, ties broken by lowest index
    pub fn argmax(row: &[f64]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, &value) in row.iter().enumerate() {
            match best {
                Some((_, top)) if value <= top => {}
                _ if value.is_nan() => {}
                _ => best = Some((index, value)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Greedy action for an already seen key
    pub fn greedy_action(&self, key: &SituationKey) -> Option<usize> {
        self.row(key).and_then(Self::argmax)
    }

    /// Single-step update of the current best slot
    ///
    /// Q(s,a*) ← Q(s,a*) + α[r - Q(s,a*)] where a* = argmax Q(s,·)
    ///
    /// The slot is chosen when the reward arrives, so it is not necessarily
    /// the action executed this turn. Returns the updated index.
    pub fn update_greedy(
        &mut self,
        key: &SituationKey,
        reward: f64,
        learning_rate: f64,
    ) -> Result<usize> {
        let row = self.ensure_row(key)?;
        let best = Self::argmax(row).unwrap_or(0);
        row[best] += learning_rate * (reward - row[best]);
        Ok(best)
    }

    /// Insert a whole row, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedSave`] if the row length is wrong.
    pub fn insert_row(&mut self, key: SituationKey, values: Vec<f64>) -> Result<()> {
        if values.len() != self.action_count {
            return Err(Error::MalformedSave {
                reason: format!(
                    "row {key} has {} values, expected {}",
                    values.len(),
                    self.action_count
                ),
            });
        }
        self.rows.insert(key, values);
        Ok(())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SituationKey, &[f64])> {
        self.rows.iter().map(|(key, row)| (key, row.as_slice()))
    }

    /// Drop every row
    pub fn reset(&mut self) {
        self.rows.clear();
    }
}
