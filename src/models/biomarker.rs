//! Biomarker entity model
//!
//! One biomarker is a single timestamped measurement of a named clinical
//! variable for one participant. When a reference date (targeted or
//! enrolled) is supplied, the signed day-offset between the observation
//! time and that date is derived once at construction and never
//! recomputed afterwards.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudyError};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// A single measurement of a named clinical variable.
///
/// Full-field equality is the duplicate predicate used by
/// [`Participant::add_measurement`](crate::Participant::add_measurement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biomarker {
    /// Name of the participant this measurement belongs to
    pub participant: String,
    /// Biomarker type identifier, e.g. "HbA1c"
    pub name: String,
    /// Measured value
    pub value: f64,
    /// Observation timestamp
    pub time: Option<NaiveDateTime>,
    /// Free-text description
    pub description: Option<String>,
    /// Study-arm label
    pub arm: Option<String>,
    /// Targeted reference date
    pub targeted_date: Option<NaiveDateTime>,
    /// Enrollment reference date
    pub enrolled_date: Option<NaiveDateTime>,
    /// Signed days from `targeted_date` to `time`, derived at construction
    pub baseline_targeted_days: Option<f64>,
    /// Signed days from `enrolled_date` to `time`, derived at construction
    pub baseline_enrolled_days: Option<f64>,
}

/// A patch to one of the mutable biomarker fields.
///
/// The enumeration is the full set of fields a caller may overwrite after
/// construction; applying a patch never recomputes the derived baseline
/// offsets.
#[derive(Debug, Clone, PartialEq)]
pub enum BiomarkerPatch {
    /// Overwrite the measured value
    Value(f64),
    /// Overwrite the observation timestamp
    Time(NaiveDateTime),
    /// Overwrite the description
    Description(String),
    /// Overwrite the study-arm label
    Arm(String),
    /// Overwrite the targeted reference date
    TargetedDate(NaiveDateTime),
    /// Overwrite the enrollment reference date
    EnrolledDate(NaiveDateTime),
}

impl Biomarker {
    /// Create a new biomarker record, deriving the baseline offsets.
    ///
    /// # Errors
    /// Returns [`StudyError::MissingBaselineInput`] when `targeted_date`
    /// or `enrolled_date` is supplied without an observation `time`; no
    /// record is produced in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        participant: impl Into<String>,
        name: impl Into<String>,
        value: f64,
        time: Option<NaiveDateTime>,
        description: Option<String>,
        arm: Option<String>,
        targeted_date: Option<NaiveDateTime>,
        enrolled_date: Option<NaiveDateTime>,
    ) -> Result<Self> {
        let name = name.into();

        let baseline_targeted_days = targeted_date
            .map(|reference| baseline_days(time, reference, &name, "targeted_date"))
            .transpose()?;
        let baseline_enrolled_days = enrolled_date
            .map(|reference| baseline_days(time, reference, &name, "enrolled_date"))
            .transpose()?;

        Ok(Self {
            participant: participant.into(),
            name,
            value,
            time,
            description,
            arm,
            targeted_date,
            enrolled_date,
            baseline_targeted_days,
            baseline_enrolled_days,
        })
    }

    /// Create a record with only the required fields.
    ///
    /// Never fails: without a reference date there is no baseline
    /// derivation to go wrong.
    #[must_use]
    pub fn measurement(participant: impl Into<String>, name: impl Into<String>, value: f64) -> Self {
        Self {
            participant: participant.into(),
            name: name.into(),
            value,
            time: None,
            description: None,
            arm: None,
            targeted_date: None,
            enrolled_date: None,
            baseline_targeted_days: None,
            baseline_enrolled_days: None,
        }
    }

    /// Apply a field patch, returning the record for chaining.
    ///
    /// Patching `time` or a reference date does not recompute the derived
    /// baseline offsets; those reflect the values seen at construction.
    pub fn apply(&mut self, patch: BiomarkerPatch) -> &mut Self {
        match patch {
            BiomarkerPatch::Value(value) => self.value = value,
            BiomarkerPatch::Time(time) => self.time = Some(time),
            BiomarkerPatch::Description(description) => self.description = Some(description),
            BiomarkerPatch::Arm(arm) => self.arm = Some(arm),
            BiomarkerPatch::TargetedDate(date) => self.targeted_date = Some(date),
            BiomarkerPatch::EnrolledDate(date) => self.enrolled_date = Some(date),
        }
        self
    }
}

/// Signed day-count from `reference` to `time`, at fractional-day precision.
fn baseline_days(
    time: Option<NaiveDateTime>,
    reference: NaiveDateTime,
    biomarker: &str,
    which: &'static str,
) -> Result<f64> {
    let time = time.ok_or_else(|| StudyError::MissingBaselineInput {
        biomarker: biomarker.to_string(),
        reference: which,
    })?;

    let delta = time.signed_duration_since(reference);
    Ok(delta.num_milliseconds() as f64 / MILLIS_PER_DAY)
}
