use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rhythms_core::{ActivityRecord, Category, RecordSource};

use crate::state_category;

/// Kind of code-hosting activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeHostKind {
    Commit,
    PullRequest,
    Review,
    Issue,
}

/// One raw activity entry from the code-hosting platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodeHostEntry {
    pub repo: String,
    pub kind: CodeHostKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    /// PR/issue title, commit subject, or review summary.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl CodeHostEntry {
    /// Bullet title: `<title> (repo#number)` for numbered items.
    fn display_title(&self) -> String {
        match self.number {
            Some(number) => format!("{} ({}#{})", self.title, self.repo, number),
            None => self.title.clone(),
        }
    }

    fn category(&self) -> Option<Category> {
        match self.kind {
            // Commits and submitted reviews are landed work.
            CodeHostKind::Commit | CodeHostKind::Review => Some(Category::Completed),
            CodeHostKind::PullRequest | CodeHostKind::Issue => {
                self.state.as_deref().and_then(state_category)
            }
        }
    }
}

/// Normalize raw code-host entries, dropping anything uncategorizable.
pub fn normalize_code_host(entries: &[CodeHostEntry]) -> Vec<ActivityRecord> {
    entries
        .iter()
        .filter_map(|entry| {
            let Some(category) = entry.category() else {
                debug!(
                    repo = %entry.repo,
                    title = %entry.title,
                    state = entry.state.as_deref().unwrap_or("<none>"),
                    "dropping code-host entry with undeterminable category"
                );
                return None;
            };
            let mut record = ActivityRecord::new(
                entry.display_title(),
                entry.url.clone(),
                RecordSource::CodeHost,
                category,
            );
            record.timestamp = entry.occurred_at;
            Some(record)
        })
        .collect()
}
