//! Insertion-ordered single-row feature record

use crate::error::ScoringError;

/// An ordered mapping from column name to numeric value, representing one
/// row of model input.
///
/// Access is keyed by name, so the order in which readings are inserted
/// never changes the outcome of a projection; iteration and projection
/// preserve a caller-supplied column order instead. The record is built
/// fresh per request and discarded after scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Insert a column, replacing the value if the column already exists.
    pub fn insert(&mut self, name: &str, value: f64) {
        match self.position(name) {
            Some(idx) => self.values[idx] = value,
            None => {
                self.names.push(name.to_string());
                self.values.push(value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.position(name).map(|idx| self.values[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Project the record onto `columns`, preserving that list's order.
    ///
    /// A column absent from the record is a configuration mismatch: the
    /// projection list references a feature the record was never given.
    pub fn project(&self, columns: &[String]) -> Result<Vec<f64>, ScoringError> {
        columns
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| ScoringError::ConfigurationMismatch {
                        feature: name.clone(),
                    })
            })
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
