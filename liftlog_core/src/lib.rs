#![forbid(unsafe_code)]

//! Core domain model and business logic for the Liftlog system.
//!
//! This crate provides:
//! - Domain types (exercises, patterns, plans, sessions, stats)
//! - Exercise and movement-pattern catalog
//! - Split generation and preference resolution
//! - Session building and the date-keyed progress ledger
//! - Leveling, personal bests, streaks and achievements
//! - Persistence (document store, JSON files, CSV export)

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod split;
pub mod preferences;
pub mod session;
pub mod ledger;
pub mod stats;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use catalog::{get_default_catalog, predefined_plans, Catalog, MuscleGroup};
pub use config::Config;
pub use store::{Direction, DocumentStore, JsonFileStore, MemoryStore};
pub use split::{DayKind, Split, SplitGenerator};
pub use preferences::{resolve, unique_patterns};
pub use session::{SessionBuilder, SessionDraft};
pub use ledger::{best_set, PlanContext, ProgressLedger};
pub use stats::{Achievement, SessionOutcome};
pub use tracker::{SessionProvider, StaticSession, Tracker};
