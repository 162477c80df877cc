//! The root progression state record.
//!
//! [`ProgressState`] is the single aggregate the whole tracker revolves
//! around. It is mutated only through the engine entry points in
//! [`progression`](crate::progression), [`registry`](crate::registry),
//! [`ledger`](crate::ledger) and [`achievements`](crate::achievements),
//! and persisted as one snapshot by [`persistence`](crate::persistence).
//!
//! # Forward Compatibility
//!
//! Every field carries a serde default so snapshots written by older
//! versions keep loading; derived fields (`rank`, `experience_needed`)
//! are recomputed after deserialization via [`ProgressState::normalize`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementId;
use crate::error::QuestlogError;
use crate::progression::{required_experience_for_level, Difficulty, Rank};

/// Current schema version for persisted snapshots.
/// Increment when making breaking changes to the serialization format.
pub const STATE_VERSION: u32 = 1;

/// Unique task identifier, assigned sequentially by the registry.
pub type TaskId = u32;

/// Task category, used for grouping and statistics only.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fitness,
    Learning,
    Wellness,
    Productivity,
    Mindfulness,
    Creativity,
    Social,
    Health,
}

impl Category {
    /// Returns all categories in display order.
    #[must_use]
    pub fn all() -> [Category; 8] {
        [
            Self::Fitness,
            Self::Learning,
            Self::Wellness,
            Self::Productivity,
            Self::Mindfulness,
            Self::Creativity,
            Self::Social,
            Self::Health,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fitness => "fitness",
            Self::Learning => "learning",
            Self::Wellness => "wellness",
            Self::Productivity => "productivity",
            Self::Mindfulness => "mindfulness",
            Self::Creativity => "creativity",
            Self::Social => "social",
            Self::Health => "health",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Category {
    type Err = QuestlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fitness" => Ok(Self::Fitness),
            "learning" => Ok(Self::Learning),
            "wellness" => Ok(Self::Wellness),
            "productivity" => Ok(Self::Productivity),
            "mindfulness" => Ok(Self::Mindfulness),
            "creativity" => Ok(Self::Creativity),
            "social" => Ok(Self::Social),
            "health" => Ok(Self::Health),
            other => Err(QuestlogError::validation(
                "category",
                format!("unknown category '{other}'"),
            )),
        }
    }
}

/// A daily task definition.
///
/// Tasks are immutable once created, except through delete-and-recreate.
/// Deleting a task does not touch completion history; ledger entries keep
/// referring to the old id as valid history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id, `max existing + 1` at creation time.
    pub id: TaskId,
    /// Non-empty display name.
    pub name: String,
    /// Difficulty tier driving the experience multiplier.
    pub difficulty: Difficulty,
    /// Base experience in `[5, 200]`, before the difficulty multiplier.
    pub base_experience: u32,
    /// Optional category for grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// Display metadata for a season.
#[derive(Debug, Clone, Copy)]
pub struct SeasonInfo {
    pub name: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

/// The four season themes, cycled by season number.
pub static SEASONS: &[SeasonInfo] = &[
    SeasonInfo {
        name: "The Awakening",
        start: "Jan 1",
        end: "Mar 31",
    },
    SeasonInfo {
        name: "Rise of Power",
        start: "Apr 1",
        end: "Jun 30",
    },
    SeasonInfo {
        name: "Dark Shadow",
        start: "Jul 1",
        end: "Sep 30",
    },
    SeasonInfo {
        name: "Eternal Destiny",
        start: "Oct 1",
        end: "Dec 31",
    },
];

/// Returns the display metadata for a season number (1-based, cycling).
#[must_use]
pub fn season_info(season: u32) -> &'static SeasonInfo {
    let index = season.saturating_sub(1) as usize % SEASONS.len();
    &SEASONS[index]
}

fn default_version() -> u32 {
    STATE_VERSION
}

fn default_one() -> u32 {
    1
}

fn default_experience_needed() -> u32 {
    required_experience_for_level(1)
}

/// Root progression aggregate, one instance per user.
///
/// # Invariants
///
/// - `0 <= experience < experience_needed` after every mutation.
/// - `rank == Rank::for_points(rank_points)` after every mutation.
/// - `achievements` only grows; ids are never removed outside [`reset`].
/// - Completion history is never pruned: a day entry emptied by undo stays
///   present (and still terminates streaks), and ids of deleted tasks remain
///   valid historical references.
///
/// [`reset`]: ProgressState::reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Snapshot schema version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Current season number, 1-based.
    #[serde(default = "default_one")]
    pub season: u32,
    /// Current level, 1-based.
    #[serde(default = "default_one")]
    pub level: u32,
    /// Experience accumulated toward the next level, always below
    /// `experience_needed`.
    #[serde(default)]
    pub experience: u32,
    /// Threshold for the next level-up, derived from `level`.
    #[serde(default = "default_experience_needed")]
    pub experience_needed: u32,
    /// Accumulated rank points.
    #[serde(default)]
    pub rank_points: u32,
    /// Rank tier, derived from `rank_points`.
    #[serde(default)]
    pub rank: Rank,
    /// Task catalog in insertion order.
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Completion ledger: day -> completed task ids, duplicates allowed.
    #[serde(default)]
    pub completions: BTreeMap<NaiveDate, Vec<TaskId>>,
    /// Unlocked achievement ids.
    #[serde(default)]
    pub achievements: BTreeSet<AchievementId>,
    /// Lifetime completion count.
    #[serde(default)]
    pub total_tasks_completed: u64,
    /// Lifetime experience earned, before level-up consumption.
    #[serde(default)]
    pub total_experience_earned: u64,
    /// Longest streak ever observed.
    #[serde(default)]
    pub best_streak: u32,
    /// When the last level-up happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_level_up: Option<DateTime<Utc>>,
    /// Day the daily bonus was last claimed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_bonus_day: Option<NaiveDate>,
}

impl ProgressState {
    /// Creates a fresh all-default state: season 1, level 1, no tasks,
    /// empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            season: 1,
            level: 1,
            experience: 0,
            experience_needed: required_experience_for_level(1),
            rank_points: 0,
            rank: Rank::Bronze,
            tasks: Vec::new(),
            completions: BTreeMap::new(),
            achievements: BTreeSet::new(),
            total_tasks_completed: 0,
            total_experience_earned: 0,
            best_streak: 0,
            last_level_up: None,
            last_bonus_day: None,
        }
    }

    /// Recomputes derived fields after deserialization.
    ///
    /// Snapshots from older versions may miss `rank` or carry a stale
    /// `experience_needed`; both are pure functions of persisted fields.
    pub fn normalize(&mut self) {
        self.rank = Rank::for_points(self.rank_points);
        self.experience_needed = required_experience_for_level(self.level);
    }

    /// Returns true if a snapshot with this version can be loaded.
    #[must_use]
    pub fn is_version_supported(&self) -> bool {
        self.version <= STATE_VERSION
    }

    /// Clears everything back to the all-default state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Starts a new season.
    ///
    /// Keeps the task catalog and the lifetime counters
    /// (`total_tasks_completed`, `total_experience_earned`, `best_streak`);
    /// clears the per-season progression: level, experience, rank points,
    /// completion ledger and achievements.
    pub fn start_season(&mut self, season: u32) {
        self.season = season.max(1);
        self.level = 1;
        self.experience = 0;
        self.experience_needed = required_experience_for_level(1);
        self.rank_points = 0;
        self.rank = Rank::for_points(0);
        self.completions.clear();
        self.achievements.clear();
        self.last_level_up = None;
        self.last_bonus_day = None;
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger;
    use crate::registry;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_state_defaults() {
        let state = ProgressState::new();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.season, 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.experience, 0);
        assert_eq!(state.experience_needed, 100);
        assert_eq!(state.rank, Rank::Bronze);
        assert!(state.tasks.is_empty());
        assert!(state.completions.is_empty());
        assert!(state.achievements.is_empty());
    }

    #[test]
    fn test_missing_fields_default_on_load() {
        // A minimal snapshot from a hypothetical older version.
        let json = r#"{"level": 3, "rank_points": 120}"#;
        let mut state: ProgressState = serde_json::from_str(json).unwrap();
        state.normalize();

        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.season, 1);
        assert_eq!(state.level, 3);
        assert_eq!(state.experience_needed, 200);
        assert_eq!(state.rank, Rank::Silver);
        assert!(state.tasks.is_empty());
        assert!(state.last_level_up.is_none());
    }

    #[test]
    fn test_normalize_restores_rank_invariant() {
        let mut state = ProgressState::new();
        state.rank_points = 5000;
        state.level = 4;
        state.normalize();
        assert_eq!(state.rank, Rank::Legend);
        assert_eq!(state.experience_needed, 250);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut state = ProgressState::new();
        registry::add_task(&mut state, "Read", Difficulty::Common, 10, None).unwrap();
        ledger::record_completion(&mut state, 1, day("2026-08-08"), false);
        state.start_season(2);

        state.reset();
        assert_eq!(state, ProgressState::new());
    }

    #[test]
    fn test_start_season_keeps_tasks_and_lifetime_counters() {
        let mut state = ProgressState::new();
        registry::add_task(&mut state, "Meditate", Difficulty::Common, 15, None).unwrap();
        ledger::record_completion(&mut state, 1, day("2026-08-08"), false);
        assert_eq!(state.total_tasks_completed, 1);

        state.start_season(3);
        assert_eq!(state.season, 3);
        assert_eq!(state.level, 1);
        assert_eq!(state.experience, 0);
        assert_eq!(state.experience_needed, 100);
        assert_eq!(state.rank_points, 0);
        assert_eq!(state.rank, Rank::Bronze);
        assert!(state.completions.is_empty());
        assert!(state.achievements.is_empty());
        // Catalog and lifetime counters survive.
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.total_tasks_completed, 1);
        assert_eq!(state.total_experience_earned, 15);
    }

    #[test]
    fn test_season_info_cycles() {
        assert_eq!(season_info(1).name, "The Awakening");
        assert_eq!(season_info(4).name, "Eternal Destiny");
        assert_eq!(season_info(5).name, "The Awakening");
        // season 0 is out of contract but must not panic
        assert_eq!(season_info(0).name, "The Awakening");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("fitness".parse::<Category>().unwrap(), Category::Fitness);
        assert_eq!("HEALTH".parse::<Category>().unwrap(), Category::Health);
        assert!("cooking".parse::<Category>().is_err());
    }

    #[test]
    fn test_state_serialization_round_trip() {
        let mut state = ProgressState::new();
        registry::add_task(
            &mut state,
            "Morning Run",
            Difficulty::Rare,
            50,
            Some(Category::Fitness),
        )
        .unwrap();
        ledger::record_completion(&mut state, 1, day("2026-08-07"), false);
        ledger::record_completion(&mut state, 1, day("2026-08-08"), false);

        let json = serde_json::to_string_pretty(&state).unwrap();
        let restored: ProgressState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
