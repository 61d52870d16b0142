//! Study registry
//!
//! A study owns the participants of one cohort and composes their record
//! trees into a cohort-wide query and export surface. Participant names
//! are unique per study; re-registering an existing name is a logged
//! no-op, deliberately unlike the fail-fast duplicate handling for
//! biomarker records.

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::Result;
use crate::models::participant::Participant;
use crate::query::{self, PathExpr};
use crate::utils::arrow::{biomarker_schema, values_to_batch};

/// A cohort of participants under one study name.
#[derive(Debug, Clone, Default)]
pub struct Study {
    /// Study name
    pub name: String,
    /// Participant name → participant
    participants: FxHashMap<String, Participant>,
    /// Participant names in registration order
    participant_order: Vec<String>,
}

impl Study {
    /// Create an empty study
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            participants: FxHashMap::default(),
            participant_order: Vec::new(),
        }
    }

    /// Register a participant, taking ownership of it.
    ///
    /// A name that is already registered is skipped with a warning; the
    /// existing participant is kept and this never fails.
    pub fn add_participant(&mut self, participant: Participant) -> &mut Self {
        if self.participants.contains_key(&participant.name) {
            warn!(
                "participant '{}' already registered in study '{}', skipping",
                participant.name, self.name
            );
            return self;
        }

        self.participant_order.push(participant.name.clone());
        self.participants
            .insert(participant.name.clone(), participant);
        self
    }

    /// Register several participants in order.
    ///
    /// Always fully applied: duplicates are skipped, never fatal.
    pub fn add_participants(&mut self, participants: Vec<Participant>) -> &mut Self {
        for participant in participants {
            self.add_participant(participant);
        }
        self
    }

    /// Look up a registered participant by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.get(name)
    }

    /// Number of registered participants
    #[must_use]
    pub fn len(&self) -> usize {
        self.participant_order.len()
    }

    /// Whether the study has no participants
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participant_order.is_empty()
    }

    /// Participant names in registration order
    #[must_use]
    pub fn participant_names(&self) -> &[String] {
        &self.participant_order
    }

    /// The cohort tree handed to the query engine:
    /// participant name → singleton sequence of that participant's tree.
    pub fn tree(&self) -> Result<Value> {
        let mut map = serde_json::Map::new();
        for name in &self.participant_order {
            let participant_tree = self.participants[name].tree()?;
            map.insert(name.clone(), Value::Array(vec![participant_tree]));
        }
        Ok(Value::Object(map))
    }

    /// Evaluate a path query over the cohort tree.
    ///
    /// Evaluation errors from the query engine propagate unmodified.
    pub fn query(&self, expr: &PathExpr) -> Result<Vec<Value>> {
        let tree = self.tree()?;
        let matched = query::execute(&tree, expr)?;
        debug!(
            "study '{}': query matched {} node(s)",
            self.name,
            matched.len()
        );
        Ok(matched)
    }

    /// Evaluate a path query over a caller-supplied tree instead of the
    /// cohort tree.
    pub fn query_with_root(&self, root: &Value, expr: &PathExpr) -> Result<Vec<Value>> {
        Ok(query::execute(root, expr)?)
    }

    /// Evaluate a path query and wrap the raw results into an Arrow
    /// record batch.
    ///
    /// First-level conversion only: record-shaped results become rows with
    /// one column per field, scalar results become a single `value`
    /// column. The schema is traced from the results themselves.
    pub fn query_table(&self, expr: &PathExpr) -> Result<RecordBatch> {
        let matched = self.query(expr)?;
        values_to_batch(&matched)
    }

    /// Export the whole cohort as one Arrow record batch.
    ///
    /// Each participant's batch is concatenated in registration order, so
    /// the row count is the sum of the per-participant row counts.
    pub fn as_record_batch(&self) -> Result<RecordBatch> {
        let schema = biomarker_schema();
        if self.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }

        let batches = self
            .participant_order
            .iter()
            .map(|name| self.participants[name].as_record_batch())
            .collect::<Result<Vec<_>>>()?;

        Ok(concat_batches(&schema, batches.iter())?)
    }
}
