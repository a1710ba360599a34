//! Keyword-based tender classification.
//!
//! - [`keywords`] — built-in per-unit keyword tables and keyword-spec splitting.
//! - [`classifier`] — scoring of each business unit and deterministic
//!   winner resolution.

pub mod classifier;
pub mod keywords;
