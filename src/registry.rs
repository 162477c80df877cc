//! The mutable task catalog.
//!
//! Owns creation, lookup and deletion of task definitions, plus the
//! effective-experience computation that turns a task's base experience
//! and difficulty into the amount actually awarded.

use tracing::debug;

use crate::error::{QuestlogError, Result};
use crate::state::{Category, ProgressState, Task, TaskId};
use crate::progression::Difficulty;

/// Lower bound for a task's base experience.
pub const MIN_BASE_EXPERIENCE: u32 = 5;

/// Upper bound for a task's base experience.
pub const MAX_BASE_EXPERIENCE: u32 = 200;

/// Adds a task to the catalog and returns its id.
///
/// Ids are assigned as `max existing id + 1` (1 for an empty catalog), so
/// deleting a task can make its id reusable later. New tasks are appended;
/// display order is insertion order and is never changed implicitly.
///
/// # Errors
///
/// Returns a validation error when `name` is empty after trimming or
/// `base_experience` is outside `[MIN_BASE_EXPERIENCE, MAX_BASE_EXPERIENCE]`.
pub fn add_task(
    state: &mut ProgressState,
    name: impl Into<String>,
    difficulty: Difficulty,
    base_experience: u32,
    category: Option<Category>,
) -> Result<TaskId> {
    let name = name.into().trim().to_string();
    if name.is_empty() {
        return Err(QuestlogError::validation("name", "must not be empty"));
    }
    if !(MIN_BASE_EXPERIENCE..=MAX_BASE_EXPERIENCE).contains(&base_experience) {
        return Err(QuestlogError::validation(
            "base_experience",
            format!("must be between {MIN_BASE_EXPERIENCE} and {MAX_BASE_EXPERIENCE}"),
        ));
    }

    let id = state.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    state.tasks.push(Task {
        id,
        name,
        difficulty,
        base_experience,
        category,
    });
    debug!(id, "task added");
    Ok(id)
}

/// Deletes the task with the given id.
///
/// A missing id is a silent no-op. Completion history is left untouched;
/// ledger entries referencing the deleted id remain valid history.
///
/// Returns whether a task was removed.
pub fn delete_task(state: &mut ProgressState, id: TaskId) -> bool {
    let before = state.tasks.len();
    state.tasks.retain(|t| t.id != id);
    state.tasks.len() != before
}

/// Looks up a task by id.
#[must_use]
pub fn find_task(state: &ProgressState, id: TaskId) -> Option<&Task> {
    state.tasks.iter().find(|t| t.id == id)
}

/// Experience actually awarded for completing a task.
///
/// The difficulty multiplier is applied to the base experience and the
/// product truncated toward zero. Every award site uses this function, so
/// the truncation is consistent across the engine.
#[must_use]
pub fn effective_experience(task: &Task) -> u32 {
    (f64::from(task.base_experience) * task.difficulty.multiplier()) as u32
}
