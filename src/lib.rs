//! An in-memory data model for longitudinal clinical-study measurements:
//! timestamped biomarker records attached to participants, participants
//! grouped into a study, with path queries across the cohort and
//! derivation of summary statistics.

pub mod error;
pub mod models;
pub mod query;
pub mod stats;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use error::{Result, StudyError};
pub use models::{Biomarker, BiomarkerPatch, Participant, Study};
pub use stats::StudyStats;

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Query capabilities
pub use query::{Literal, PathExpr, Predicate, QueryError, Step};
