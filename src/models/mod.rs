//! Domain models for the study data model
//!
//! Three entities form the core: [`Biomarker`] (one measurement),
//! [`Participant`] (all measurements for one subject), and [`Study`]
//! (a cohort of participants).

pub mod biomarker;
pub mod participant;
pub mod study;

pub use biomarker::{Biomarker, BiomarkerPatch};
pub use participant::Participant;
pub use study::Study;
