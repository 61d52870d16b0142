//! Utility functions for the study model.

pub mod arrow;
