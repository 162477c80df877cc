//! Level, experience and rank math.
//!
//! All progression arithmetic lives here: the level curve, the rank tier
//! table, the experience-application loop and the daily bonus. Everything
//! is deterministic; callers pass the calendar day in.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QuestlogError;
use crate::ledger;
use crate::state::ProgressState;

/// Rank points granted per level-up, on top of completion points.
pub const LEVEL_UP_RANK_POINTS: u32 = 10;

/// Flat rank points granted per task completion.
pub const COMPLETION_RANK_POINTS: u32 = 5;

/// Base experience of the once-a-day bonus.
pub const DAILY_BONUS_BASE: u32 = 10;

/// Cap on the streak-scaled part of the daily bonus.
pub const MAX_STREAK_BONUS: u32 = 20;

/// Experience required to clear the given level.
///
/// Level 1 needs 100, and each level adds 50. Monotonic in `level`.
#[must_use]
pub fn required_experience_for_level(level: u32) -> u32 {
    100 + level.saturating_sub(1) * 50
}

/// Task difficulty tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Difficulty {
    /// Experience multiplier applied to a task's base experience.
    #[must_use]
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Common => 1.0,
            Self::Rare => 1.5,
            Self::Epic => 2.5,
            Self::Legendary => 5.0,
        }
    }

    /// Returns all difficulties in ascending order.
    #[must_use]
    pub fn all() -> [Difficulty; 4] {
        [Self::Common, Self::Rare, Self::Epic, Self::Legendary]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Difficulty {
    type Err = QuestlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            other => Err(QuestlogError::validation(
                "difficulty",
                format!("unknown difficulty '{other}'"),
            )),
        }
    }
}

/// Rank tier, derived from rank points.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Legend,
}

/// One entry of the rank threshold table.
#[derive(Debug, Clone, Copy)]
pub struct RankTier {
    pub rank: Rank,
    pub min_points: u32,
}

/// Rank thresholds in ascending order. Lower bounds are inclusive.
pub static RANK_TIERS: &[RankTier] = &[
    RankTier {
        rank: Rank::Bronze,
        min_points: 0,
    },
    RankTier {
        rank: Rank::Silver,
        min_points: 100,
    },
    RankTier {
        rank: Rank::Gold,
        min_points: 250,
    },
    RankTier {
        rank: Rank::Platinum,
        min_points: 500,
    },
    RankTier {
        rank: Rank::Diamond,
        min_points: 1000,
    },
    RankTier {
        rank: Rank::Master,
        min_points: 2000,
    },
    RankTier {
        rank: Rank::Grandmaster,
        min_points: 3500,
    },
    RankTier {
        rank: Rank::Legend,
        min_points: 5000,
    },
];

impl Rank {
    /// Returns the highest tier whose threshold is at or below `points`.
    #[must_use]
    pub fn for_points(points: u32) -> Rank {
        RANK_TIERS
            .iter()
            .rev()
            .find(|tier| points >= tier.min_points)
            .map(|tier| tier.rank)
            .unwrap_or(Rank::Bronze)
    }

    /// Points still missing until the next tier, `None` at the top.
    #[must_use]
    pub fn points_to_next(points: u32) -> Option<u32> {
        RANK_TIERS
            .iter()
            .find(|tier| tier.min_points > points)
            .map(|tier| tier.min_points - points)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Diamond => "DIAMOND",
            Self::Master => "MASTER",
            Self::Grandmaster => "GRANDMASTER",
            Self::Legend => "LEGEND",
        };
        write!(f, "{name}")
    }
}

/// Adds experience and handles level-ups.
///
/// Normalizes until `experience < experience_needed`, so one large award can
/// cross several thresholds in a single call. Each level-up grants
/// [`LEVEL_UP_RANK_POINTS`] and stamps `last_level_up`; the rank tier is
/// recomputed once after the loop. `amount = 0` is a no-op.
///
/// Returns whether at least one level-up occurred.
pub fn apply_experience(state: &mut ProgressState, amount: u32) -> bool {
    state.experience += amount;
    state.total_experience_earned += u64::from(amount);
    let mut leveled_up = false;

    while state.experience >= state.experience_needed {
        state.experience -= state.experience_needed;
        state.level += 1;
        state.rank_points += LEVEL_UP_RANK_POINTS;
        state.experience_needed = required_experience_for_level(state.level);
        state.last_level_up = Some(Utc::now());
        leveled_up = true;
        debug!(level = state.level, "level up");
    }

    state.rank = Rank::for_points(state.rank_points);
    leveled_up
}

/// Streak-scaled part of the daily bonus: 2 per streak day, capped.
#[must_use]
pub fn streak_bonus(streak_days: u32) -> u32 {
    (streak_days * 2).min(MAX_STREAK_BONUS)
}

/// Claims the once-a-day bonus.
///
/// Awards `DAILY_BONUS_BASE + streak_bonus(streak)` experience through
/// [`apply_experience`] and stamps `last_bonus_day`. A repeat claim on the
/// same day is a silent no-op returning 0.
pub fn claim_daily_bonus(state: &mut ProgressState, today: NaiveDate) -> u32 {
    if state.last_bonus_day == Some(today) {
        debug!(%today, "daily bonus already claimed");
        return 0;
    }

    let streak = ledger::streak(state, today);
    let bonus = DAILY_BONUS_BASE + streak_bonus(streak);
    state.last_bonus_day = Some(today);
    apply_experience(state, bonus);
    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_required_experience_curve() {
        assert_eq!(required_experience_for_level(1), 100);
        assert_eq!(required_experience_for_level(2), 150);
        assert_eq!(required_experience_for_level(3), 200);
        assert_eq!(required_experience_for_level(10), 550);
    }

    #[test]
    fn test_curve_is_monotonic() {
        let mut previous = 0;
        for level in 1..=50 {
            let needed = required_experience_for_level(level);
            assert!(needed > previous);
            previous = needed;
        }
    }

    #[test]
    fn test_rank_for_points_boundaries() {
        assert_eq!(Rank::for_points(0), Rank::Bronze);
        assert_eq!(Rank::for_points(99), Rank::Bronze);
        assert_eq!(Rank::for_points(100), Rank::Silver);
        assert_eq!(Rank::for_points(249), Rank::Silver);
        assert_eq!(Rank::for_points(250), Rank::Gold);
        assert_eq!(Rank::for_points(4999), Rank::Grandmaster);
        assert_eq!(Rank::for_points(5000), Rank::Legend);
        assert_eq!(Rank::for_points(1_000_000), Rank::Legend);
    }

    #[test]
    fn test_rank_is_monotonic_in_points() {
        let mut previous = Rank::Bronze;
        for points in 0..6000 {
            let rank = Rank::for_points(points);
            assert!(rank >= previous, "rank regressed at {points}");
            previous = rank;
        }
    }

    #[test]
    fn test_points_to_next() {
        assert_eq!(Rank::points_to_next(0), Some(100));
        assert_eq!(Rank::points_to_next(99), Some(1));
        assert_eq!(Rank::points_to_next(100), Some(150));
        assert_eq!(Rank::points_to_next(5000), None);
    }

    #[test]
    fn test_apply_exact_threshold_levels_once() {
        let mut state = ProgressState::new();
        let leveled = apply_experience(&mut state, 100);

        assert!(leveled);
        assert_eq!(state.level, 2);
        assert_eq!(state.experience, 0);
        assert_eq!(state.experience_needed, 150);
        assert_eq!(state.rank_points, 10);
        assert!(state.last_level_up.is_some());
    }

    #[test]
    fn test_apply_triple_award_simulates_loop() {
        // 300 from level 1: consumes 100 (-> level 2, need 150), then 150
        // (-> level 3, need 200), leaving 50.
        let mut state = ProgressState::new();
        apply_experience(&mut state, 300);

        assert_eq!(state.level, 3);
        assert_eq!(state.experience, 50);
        assert_eq!(state.experience_needed, 200);
        assert_eq!(state.rank_points, 20);
    }

    #[test]
    fn test_apply_large_award_crosses_many_thresholds() {
        // 1000 from level 1: 100, 150, 200, 250, 300 are consumed in turn,
        // landing exactly on level 6 with nothing left over.
        let mut state = ProgressState::new();
        let leveled = apply_experience(&mut state, 1000);

        assert!(leveled);
        assert_eq!(state.level, 6);
        assert_eq!(state.experience, 0);
        assert_eq!(state.experience_needed, 350);
        assert_eq!(state.rank_points, 50);
        assert_eq!(state.total_experience_earned, 1000);
    }

    #[test]
    fn test_apply_zero_is_noop() {
        let mut state = ProgressState::new();
        let leveled = apply_experience(&mut state, 0);

        assert!(!leveled);
        assert_eq!(state, ProgressState::new());
    }

    #[test]
    fn test_experience_invariant_holds_after_any_award() {
        let mut state = ProgressState::new();
        for amount in [0, 1, 99, 100, 101, 333, 1000, 12345] {
            apply_experience(&mut state, amount);
            assert!(state.experience < state.experience_needed);
        }
    }

    #[test]
    fn test_level_up_can_change_rank() {
        let mut state = ProgressState::new();
        state.rank_points = 95;
        state.rank = Rank::for_points(95);

        apply_experience(&mut state, 100);
        assert_eq!(state.rank_points, 105);
        assert_eq!(state.rank, Rank::Silver);
    }

    #[test]
    fn test_streak_bonus_caps() {
        assert_eq!(streak_bonus(0), 0);
        assert_eq!(streak_bonus(3), 6);
        assert_eq!(streak_bonus(10), 20);
        assert_eq!(streak_bonus(365), 20);
    }

    #[test]
    fn test_daily_bonus_once_per_day() {
        let mut state = ProgressState::new();
        let today = day("2026-08-08");

        assert_eq!(claim_daily_bonus(&mut state, today), 10);
        assert_eq!(state.last_bonus_day, Some(today));
        assert_eq!(state.experience, 10);

        // Second claim the same day is a no-op.
        assert_eq!(claim_daily_bonus(&mut state, today), 0);
        assert_eq!(state.experience, 10);

        // The next day it can be claimed again.
        assert_eq!(claim_daily_bonus(&mut state, day("2026-08-09")), 10);
    }

    #[test]
    fn test_daily_bonus_scales_with_streak() {
        let mut state = ProgressState::new();
        registry::add_task(&mut state, "Read", Difficulty::Common, 10, None).unwrap();
        ledger::record_completion(&mut state, 1, day("2026-08-07"), false);
        ledger::record_completion(&mut state, 1, day("2026-08-08"), false);

        let before = state.experience;
        // Streak of 2 ending today: 10 base + 4.
        assert_eq!(claim_daily_bonus(&mut state, day("2026-08-08")), 14);
        assert_eq!(state.experience, before + 14);
    }

    #[test]
    fn test_difficulty_parsing_and_display() {
        assert_eq!("rare".parse::<Difficulty>().unwrap(), Difficulty::Rare);
        assert_eq!("EPIC".parse::<Difficulty>().unwrap(), Difficulty::Epic);
        assert!("mythic".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Legendary.to_string(), "legendary");
    }

    #[test]
    fn test_rank_serialization_matches_display() {
        let json = serde_json::to_string(&Rank::Grandmaster).unwrap();
        assert_eq!(json, r#""GRANDMASTER""#);
        let restored: Rank = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, Rank::Grandmaster);
    }
}
