//! Questlog - Gamified Daily Habit Tracker
//!
//! A single-user habit tracker that maps completed daily tasks onto an
//! experience/level/rank progression, tracks streaks, and awards
//! achievements. This crate owns the progression engine and the persistence
//! of its state; the CLI binary is a thin presentation layer on top.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`clock`] - Calendar-day keys
//! - [`progression`] - Level, experience and rank math
//! - [`registry`] - The mutable task catalog
//! - [`ledger`] - Per-day completion record, streaks and aggregates
//! - [`achievements`] - Achievement definitions and evaluation
//! - [`persistence`] - Atomic snapshot storage and import/export
//! - [`config`] - Optional user configuration
//! - [`motivation`] - Flavor text, separated from domain logic
//! - [`error`] - Custom error types and handling
//!
//! # Example
//!
//! ```rust
//! use questlog::{ledger, registry, Difficulty, ProgressState};
//!
//! let mut state = ProgressState::new();
//! let id = registry::add_task(&mut state, "Morning Run", Difficulty::Rare, 50, None)?;
//!
//! let today = questlog::clock::today();
//! let result = ledger::record_completion(&mut state, id, today, false);
//! assert_eq!(result.awarded, 75);
//! # Ok::<(), questlog::QuestlogError>(())
//! ```

pub mod achievements;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod motivation;
pub mod persistence;
pub mod progression;
pub mod registry;
pub mod state;

// Re-export commonly used types
pub use error::{QuestlogError, Result};

// Re-export state types
pub use state::{season_info, Category, ProgressState, SeasonInfo, Task, TaskId, STATE_VERSION};

// Re-export progression types
pub use progression::{
    apply_experience, claim_daily_bonus, required_experience_for_level, Difficulty, Rank,
    RankTier, RANK_TIERS,
};

// Re-export ledger types
pub use ledger::{CompletionResult, STREAK_LOOKBACK_DAYS};

// Re-export achievement types
pub use achievements::{check_achievements, AchievementDef, AchievementId, ACHIEVEMENTS};

// Re-export persistence and config types
pub use config::TrackerConfig;
pub use persistence::StateStore;
