//! Achievement definitions and evaluation.
//!
//! Achievements are one-time unlockable flags tied to counter thresholds.
//! Triggers use exact equality against the counter, not `>=`: a counter that
//! jumps over a threshold (say a bulk import moving the total from 3 to 8)
//! silently skips that achievement. Do not "fix" this to `>=`; unlock
//! timing depends on it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ledger;
use crate::progression::Rank;
use crate::state::ProgressState;

/// Unique identifier for each achievement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstTask,
    FiveTasks,
    TenTasks,
    FiftyTasks,
    HundredTasks,
    WeekStreak,
    MonthStreak,
    LevelTen,
    RankGold,
    RankLegend,
}

impl AchievementId {
    /// Stable string id, as persisted in snapshots.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstTask => "first_task",
            Self::FiveTasks => "five_tasks",
            Self::TenTasks => "ten_tasks",
            Self::FiftyTasks => "fifty_tasks",
            Self::HundredTasks => "hundred_tasks",
            Self::WeekStreak => "week_streak",
            Self::MonthStreak => "month_streak",
            Self::LevelTen => "level_ten",
            Self::RankGold => "rank_gold",
            Self::RankLegend => "rank_legend",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display metadata for an achievement.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
}

/// All achievements with their display metadata.
pub static ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: AchievementId::FirstTask,
        name: "First Step",
        description: "Complete your first task",
    },
    AchievementDef {
        id: AchievementId::FiveTasks,
        name: "Getting Started",
        description: "Complete 5 tasks",
    },
    AchievementDef {
        id: AchievementId::TenTasks,
        name: "Growing Stronger",
        description: "Complete 10 tasks",
    },
    AchievementDef {
        id: AchievementId::FiftyTasks,
        name: "Warrior",
        description: "Complete 50 tasks",
    },
    AchievementDef {
        id: AchievementId::HundredTasks,
        name: "Unstoppable",
        description: "Complete 100 tasks",
    },
    AchievementDef {
        id: AchievementId::WeekStreak,
        name: "On Fire",
        description: "Achieve a 7-day streak",
    },
    AchievementDef {
        id: AchievementId::MonthStreak,
        name: "Relentless",
        description: "Achieve a 30-day streak",
    },
    AchievementDef {
        id: AchievementId::LevelTen,
        name: "Rising Star",
        description: "Reach level 10",
    },
    AchievementDef {
        id: AchievementId::RankGold,
        name: "Golden Champion",
        description: "Reach Gold rank",
    },
    AchievementDef {
        id: AchievementId::RankLegend,
        name: "Living Legend",
        description: "Reach Legend rank",
    },
];

/// Returns the display metadata for an achievement id.
#[must_use]
pub fn definition(id: AchievementId) -> &'static AchievementDef {
    ACHIEVEMENTS
        .iter()
        .find(|def| def.id == id)
        .expect("every AchievementId has a table entry")
}

/// Checks all achievement conditions and unlocks the ones that hit.
///
/// Conditions are evaluated against the current counters with exact
/// equality; every id is added to `state.achievements` at most once ever.
/// Several achievements can unlock in a single call. Returns only the ids
/// newly unlocked by this invocation, empty when none.
pub fn check_achievements(state: &mut ProgressState, today: NaiveDate) -> Vec<AchievementId> {
    let total = state.total_tasks_completed;
    let streak = ledger::streak(state, today);

    let candidates = [
        (AchievementId::FirstTask, total == 1),
        (AchievementId::FiveTasks, total == 5),
        (AchievementId::TenTasks, total == 10),
        (AchievementId::FiftyTasks, total == 50),
        (AchievementId::HundredTasks, total == 100),
        (AchievementId::WeekStreak, streak == 7),
        (AchievementId::MonthStreak, streak == 30),
        (AchievementId::LevelTen, state.level == 10),
        (AchievementId::RankGold, state.rank == Rank::Gold),
        (AchievementId::RankLegend, state.rank == Rank::Legend),
    ];

    let mut unlocked = Vec::new();
    for (id, hit) in candidates {
        if hit && state.achievements.insert(id) {
            debug!(%id, "achievement unlocked");
            unlocked.push(id);
        }
    }
    unlocked
}
