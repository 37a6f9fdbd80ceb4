//! Activity Record Normalizer.
//!
//! Converts raw payloads from the two external trackers (code host, project
//! tracker) into canonical [`ActivityRecord`]s. Pure transforms: a record
//! whose category cannot be determined from its explicit status fields is
//! dropped silently (debug trace only) rather than guessed.

mod code_host;
pub mod sample;
mod tracker;

pub use code_host::{CodeHostEntry, CodeHostKind, normalize_code_host};
pub use tracker::{TrackerIssue, normalize_tracker};

use rhythms_core::Category;

/// Explicit status markers shared by both sources.
const COMPLETED_STATES: &[&str] = &["merged", "closed", "done", "completed"];
const BLOCKED_STATES: &[&str] = &["blocked", "on hold", "on-hold", "stalled"];
const IN_PROGRESS_STATES: &[&str] = &[
    "open",
    "in progress",
    "in review",
    "started",
    "todo",
    "draft",
];

/// Map an explicit status string to a category. `None` means the status is
/// not one we can categorize and the record must be dropped.
pub(crate) fn state_category(state: &str) -> Option<Category> {
    let state = state.trim().to_lowercase();
    if COMPLETED_STATES.contains(&state.as_str()) {
        Some(Category::Completed)
    } else if BLOCKED_STATES.contains(&state.as_str()) {
        Some(Category::Blocked)
    } else if IN_PROGRESS_STATES.contains(&state.as_str()) {
        Some(Category::InProgress)
    } else {
        None
    }
}
