//! Error handling for the study model.

use crate::query::QueryError;

/// Errors that can occur while building or querying a study.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// A biomarker was added to a participant it does not belong to
    #[error("biomarker belongs to participant '{record}', not '{participant}'")]
    IdentityMismatch {
        /// Participant named on the record
        record: String,
        /// Participant the record was added to
        participant: String,
    },

    /// A field-wise identical biomarker already exists under the same name
    #[error("biomarker '{biomarker}' already recorded for participant '{participant}'")]
    DuplicateEntry {
        /// Owning participant
        participant: String,
        /// Biomarker name
        biomarker: String,
    },

    /// A reference date was supplied without an observation time
    #[error("cannot derive {reference} baseline for '{biomarker}': no observation time")]
    MissingBaselineInput {
        /// Biomarker name
        biomarker: String,
        /// Which reference date triggered the computation
        reference: &'static str,
    },

    /// Path-query evaluation failed; surfaced without translation
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Arrow error during tabular export
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// Record serialization failed while building a table
    #[error("Export error: {0}")]
    Export(#[from] serde_arrow::Error),

    /// Record serialization to the query tree failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for study operations
pub type Result<T> = std::result::Result<T, StudyError>;
