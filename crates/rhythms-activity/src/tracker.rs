use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rhythms_core::{ActivityRecord, Category, RecordSource};

use crate::state_category;

/// One raw assigned-issue entry from the project tracker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackerIssue {
    /// Human-facing issue key, e.g. `ENG-142`.
    pub identifier: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl TrackerIssue {
    fn category(&self) -> Option<Category> {
        // A completion timestamp outranks whatever the state column says.
        if self.completed_at.is_some() {
            return Some(Category::Completed);
        }
        self.state.as_deref().and_then(state_category)
    }
}

/// Normalize raw tracker issues, dropping anything uncategorizable.
pub fn normalize_tracker(issues: &[TrackerIssue]) -> Vec<ActivityRecord> {
    issues
        .iter()
        .filter_map(|issue| {
            let Some(category) = issue.category() else {
                debug!(
                    identifier = %issue.identifier,
                    state = issue.state.as_deref().unwrap_or("<none>"),
                    "dropping tracker issue with undeterminable category"
                );
                return None;
            };
            let mut record = ActivityRecord::new(
                format!("{} ({})", issue.title, issue.identifier),
                issue.url.clone(),
                RecordSource::Tracker,
                category,
            );
            record.timestamp = issue.completed_at.or(issue.updated_at);
            Some(record)
        })
        .collect()
}
