//! Core domain types for the Airway breathing trainer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Phase specifications (set counts and breath lengths)
//! - Exercise programs (two sequential phases)
//! - Breath states driven by the exercise engine

use serde::{Deserialize, Serialize};

/// Allowed range for the set count of a phase
pub const SETS_RANGE: std::ops::RangeInclusive<u32> = 1..=99;

/// Allowed range (seconds) for inhale and exhale lengths
pub const BREATH_SECS_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

// ============================================================================
// Program Types
// ============================================================================

/// One exercise phase: a number of breath cycles with fixed inhale/exhale lengths.
///
/// Field names on the wire match the stored program format
/// (`sets`, `inhaleDuration`, `exhaleDuration`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSpec {
    pub sets: u32,
    /// Inhale length in seconds
    pub inhale_duration: u32,
    /// Exhale length in seconds
    pub exhale_duration: u32,
}

impl PhaseSpec {
    /// Collect bounds violations for this phase into `errors`
    fn collect_errors(&self, label: &str, errors: &mut Vec<String>) {
        if !SETS_RANGE.contains(&self.sets) {
            errors.push(format!(
                "{}: sets {} outside {}..={}",
                label,
                self.sets,
                SETS_RANGE.start(),
                SETS_RANGE.end()
            ));
        }
        if !BREATH_SECS_RANGE.contains(&self.inhale_duration) {
            errors.push(format!(
                "{}: inhale duration {}s outside {}..={}s",
                label,
                self.inhale_duration,
                BREATH_SECS_RANGE.start(),
                BREATH_SECS_RANGE.end()
            ));
        }
        if !BREATH_SECS_RANGE.contains(&self.exhale_duration) {
            errors.push(format!(
                "{}: exhale duration {}s outside {}..={}s",
                label,
                self.exhale_duration,
                BREATH_SECS_RANGE.start(),
                BREATH_SECS_RANGE.end()
            ));
        }
    }
}

/// A stored breathing program: two sequential phases.
///
/// `id` is opaque and unique once assigned; programs created by the user are
/// saved without an id and receive one from the repository.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseProgram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub phase1: PhaseSpec,
    pub phase2: PhaseSpec,
}

impl ExerciseProgram {
    /// Validate the program for persistence
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("program name is empty".to_string());
        }

        self.phase1.collect_errors("phase1", &mut errors);
        self.phase2.collect_errors("phase2", &mut errors);

        errors
    }

    /// Validate the program, folding violations into a single `Error::Validation`
    pub fn validate(&self) -> crate::Result<()> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(crate::Error::Validation(errors.join("; ")))
        }
    }
}

// ============================================================================
// Breath State
// ============================================================================

/// The breath step the engine is currently driving
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreathState {
    Inhale,
    Hold,
    Exhale,
}

impl std::fmt::Display for BreathState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BreathState::Inhale => "inhale",
            BreathState::Hold => "hold",
            BreathState::Exhale => "exhale",
        };
        f.write_str(s)
    }
}
