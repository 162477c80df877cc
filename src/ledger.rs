//! The per-day completion ledger.
//!
//! Records which task ids were completed on which calendar day and derives
//! streaks and aggregate counts from that history. Day entries are
//! append-only: undo removes a single occurrence but never the day itself,
//! and deleting a task never prunes its past completions.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::progression::{self, COMPLETION_RANK_POINTS};
use crate::registry;
use crate::state::{Category, ProgressState, TaskId};

/// How far back the streak walk scans.
pub const STREAK_LOOKBACK_DAYS: u64 = 100;

/// Outcome of recording a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionResult {
    /// Experience awarded, 0 when the operation was a no-op.
    pub awarded: u32,
    /// Whether the award caused at least one level-up.
    pub leveled_up: bool,
}

impl CompletionResult {
    const NONE: CompletionResult = CompletionResult {
        awarded: 0,
        leveled_up: false,
    };
}

/// Records a completion of `task_id` for `today`.
///
/// An unknown task id is a silent no-op returning an empty result. Otherwise
/// the id is appended to the day entry, [`COMPLETION_RANK_POINTS`] flat rank
/// points are granted on top of the experience-driven ones, the lifetime
/// counter is bumped, and the effective experience goes through
/// [`progression::apply_experience`].
///
/// By default the day entry is **not** deduplicated: completing the same
/// task twice on one day appends twice and awards twice. Passing
/// `dedupe = true` (an opt-in config flag) turns a same-day repeat into a
/// no-op instead; the default behavior is the contract.
pub fn record_completion(
    state: &mut ProgressState,
    task_id: TaskId,
    today: NaiveDate,
    dedupe: bool,
) -> CompletionResult {
    let Some(task) = registry::find_task(state, task_id) else {
        debug!(task_id, "completion for unknown task ignored");
        return CompletionResult::NONE;
    };
    let awarded = registry::effective_experience(task);

    if dedupe
        && state
            .completions
            .get(&today)
            .is_some_and(|done| done.contains(&task_id))
    {
        debug!(task_id, %today, "duplicate completion suppressed");
        return CompletionResult::NONE;
    }

    state.completions.entry(today).or_default().push(task_id);
    state.rank_points += COMPLETION_RANK_POINTS;
    state.total_tasks_completed += 1;
    let leveled_up = progression::apply_experience(state, awarded);

    CompletionResult {
        awarded,
        leveled_up,
    }
}

/// Removes one occurrence of `task_id` from today's completions.
///
/// Only the "done today" set is affected: experience, rank points and the
/// lifetime counters already granted stay granted. If duplicates exist a
/// single occurrence is removed. The day entry itself is kept even when it
/// becomes empty, and an empty day still terminates streaks.
///
/// Returns whether an occurrence was removed.
pub fn undo_completion(state: &mut ProgressState, task_id: TaskId, today: NaiveDate) -> bool {
    let Some(done) = state.completions.get_mut(&today) else {
        return false;
    };
    let Some(position) = done.iter().position(|id| *id == task_id) else {
        return false;
    };
    done.remove(position);
    true
}

/// Task ids completed on the given day, empty for unknown days.
#[must_use]
pub fn completions_for(state: &ProgressState, day: NaiveDate) -> &[TaskId] {
    state
        .completions
        .get(&day)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Current completion streak ending at `today`.
///
/// Walks backward one day at a time, counting consecutive days with a
/// non-empty completion set, and stops at the first day that is absent or
/// present-but-empty. The scan is capped at [`STREAK_LOOKBACK_DAYS`].
///
/// As a side effect, `best_streak` is raised to the computed value whenever
/// it exceeds the stored high-water mark.
pub fn streak(state: &mut ProgressState, today: NaiveDate) -> u32 {
    let mut streak = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        match state.completions.get(&day) {
            Some(done) if !done.is_empty() => streak += 1,
            _ => break,
        }
    }

    state.best_streak = state.best_streak.max(streak);
    streak
}

/// Lifetime completion count per task id, orphaned ids included.
#[must_use]
pub fn completion_counts(state: &ProgressState) -> BTreeMap<TaskId, u64> {
    let mut counts = BTreeMap::new();
    for done in state.completions.values() {
        for id in done {
            *counts.entry(*id).or_insert(0) += 1;
        }
    }
    counts
}

/// Lifetime completion count per category.
///
/// Only ids still present in the catalog contribute (an orphaned id has no
/// category to attribute); uncategorized tasks are grouped under `None`.
#[must_use]
pub fn category_counts(state: &ProgressState) -> BTreeMap<Option<Category>, u64> {
    let mut counts = BTreeMap::new();
    for done in state.completions.values() {
        for id in done {
            if let Some(task) = registry::find_task(state, *id) {
                *counts.entry(task.category).or_insert(0) += 1;
            }
        }
    }
    counts
}

/// Completion counts for the last `days` days ending at `today`, oldest
/// first. Days without ledger entries report zero.
#[must_use]
pub fn recent_activity(
    state: &ProgressState,
    today: NaiveDate,
    days: u64,
) -> Vec<(NaiveDate, usize)> {
    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|day| (day, completions_for(state, day).len()))
        .collect()
}

/// Number of days present in the ledger, emptied days included.
#[must_use]
pub fn active_days(state: &ProgressState) -> usize {
    state.completions.len()
}
