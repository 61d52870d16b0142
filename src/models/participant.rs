//! Participant entity model
//!
//! A participant owns every biomarker record taken from one study subject,
//! keyed by biomarker name. The live records are the single source of
//! truth; the nested-mapping form handed to the query engine and the
//! Arrow table handed to exports are both derived from them on demand.

use arrow::record_batch::RecordBatch;
use log::debug;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::{Result, StudyError};
use crate::models::biomarker::Biomarker;
use crate::query::{self, PathExpr};
use crate::utils::arrow::records_to_batch;

/// All measurements for one study subject, keyed by biomarker name.
#[derive(Debug, Clone, Default)]
pub struct Participant {
    /// Unique name within a study
    pub name: String,
    /// Biomarker name → records in measurement (insertion) order
    biomarkers: FxHashMap<String, Vec<Biomarker>>,
    /// Biomarker names in first-seen order, for deterministic export
    biomarker_order: Vec<String>,
}

impl Participant {
    /// Create a participant with no measurements
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            biomarkers: FxHashMap::default(),
            biomarker_order: Vec::new(),
        }
    }

    /// Add one measurement, enforcing ownership and uniqueness.
    ///
    /// Both checks run before any mutation, so a failed add leaves the
    /// participant exactly as it was. Returns `&mut Self` for chaining.
    ///
    /// # Errors
    /// * [`StudyError::IdentityMismatch`] when the record names a different
    ///   participant.
    /// * [`StudyError::DuplicateEntry`] when a field-wise identical record
    ///   already exists under the same biomarker name.
    pub fn add_measurement(&mut self, marker: Biomarker) -> Result<&mut Self> {
        if marker.participant != self.name {
            return Err(StudyError::IdentityMismatch {
                record: marker.participant,
                participant: self.name.clone(),
            });
        }

        if let Some(existing) = self.biomarkers.get(&marker.name) {
            if existing.contains(&marker) {
                return Err(StudyError::DuplicateEntry {
                    participant: self.name.clone(),
                    biomarker: marker.name,
                });
            }
        } else {
            self.biomarker_order.push(marker.name.clone());
        }

        self.biomarkers
            .entry(marker.name.clone())
            .or_default()
            .push(marker);

        Ok(self)
    }

    /// Records for one biomarker name, in measurement order
    #[must_use]
    pub fn records(&self, name: &str) -> &[Biomarker] {
        self.biomarkers.get(name).map_or(&[], Vec::as_slice)
    }

    /// Biomarker names in first-seen order
    #[must_use]
    pub fn biomarker_names(&self) -> &[String] {
        &self.biomarker_order
    }

    /// Total number of measurements across all biomarker names
    #[must_use]
    pub fn measurement_count(&self) -> usize {
        self.biomarkers.values().map(Vec::len).sum()
    }

    /// The nested mapping handed to the query engine:
    /// biomarker name → sequence of serialized records.
    pub fn tree(&self) -> Result<Value> {
        let mut map = serde_json::Map::new();
        for name in &self.biomarker_order {
            let records = serde_json::to_value(&self.biomarkers[name])?;
            map.insert(name.clone(), records);
        }
        Ok(Value::Object(map))
    }

    /// Evaluate a path query over this participant's records.
    ///
    /// Evaluation errors from the query engine propagate unmodified.
    pub fn query(&self, expr: &PathExpr) -> Result<Vec<Value>> {
        let tree = self.tree()?;
        let matched = query::execute(&tree, expr)?;
        debug!(
            "participant '{}': query matched {} node(s)",
            self.name,
            matched.len()
        );
        Ok(matched)
    }

    /// Evaluate a path query and deserialize whole-record matches back
    /// into live [`Biomarker`] values.
    ///
    /// # Errors
    /// Fails when a matched node is not record-shaped, in addition to the
    /// failure modes of [`Participant::query`].
    pub fn query_records(&self, expr: &PathExpr) -> Result<Vec<Biomarker>> {
        self.query(expr)?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StudyError::from))
            .collect()
    }

    /// Export every measurement as one Arrow record batch.
    ///
    /// Biomarker names appear in first-seen order; within one name the
    /// original measurement order is preserved. One row per measurement,
    /// one column per record field.
    pub fn as_record_batch(&self) -> Result<RecordBatch> {
        let rows: Vec<&Biomarker> = self
            .biomarker_order
            .iter()
            .flat_map(|name| self.biomarkers[name].iter())
            .collect();
        records_to_batch(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_mismatch_leaves_store_unchanged() {
        let mut participant = Participant::new("P1");
        participant
            .add_measurement(Biomarker::measurement("P1", "weight", 70.0))
            .unwrap();

        let result = participant.add_measurement(Biomarker::measurement("P2", "weight", 71.0));

        assert!(matches!(result, Err(StudyError::IdentityMismatch { .. })));
        assert_eq!(participant.measurement_count(), 1);
    }

    #[test]
    fn exact_duplicate_is_rejected() {
        let mut participant = Participant::new("P1");
        participant
            .add_measurement(Biomarker::measurement("P1", "weight", 70.0))
            .unwrap();

        let result = participant.add_measurement(Biomarker::measurement("P1", "weight", 70.0));

        assert!(matches!(result, Err(StudyError::DuplicateEntry { .. })));
        assert_eq!(participant.measurement_count(), 1);
    }

    #[test]
    fn same_name_different_value_accumulates() {
        let mut participant = Participant::new("P1");
        participant
            .add_measurement(Biomarker::measurement("P1", "weight", 70.0))
            .unwrap()
            .add_measurement(Biomarker::measurement("P1", "weight", 71.0))
            .unwrap();

        assert_eq!(participant.records("weight").len(), 2);
        assert_eq!(participant.biomarker_names(), ["weight"]);
    }
}
