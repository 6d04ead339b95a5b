#![forbid(unsafe_code)]

//! Core domain model and timing engine for the Airway breathing trainer.
//!
//! This crate provides:
//! - Domain types (breathing programs, phase specs, breath states)
//! - The breathing exercise engine (state machine + countdown scheduling)
//! - Program storage (validated, seeded CRUD over a JSON document)
//! - Speech narration (best-effort system text-to-speech)

pub mod types;
pub mod error;
pub mod clock;
pub mod engine;
pub mod repository;
pub mod narrator;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{BreathingEngine, ExerciseListener, HOLD_DURATION_SECS, TICK_INTERVAL_MS};
pub use repository::ProgramRepository;
pub use narrator::{Narrator, NullNarrator, SpeechNarrator};
pub use config::Config;
