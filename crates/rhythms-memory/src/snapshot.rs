use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use rhythms_core::{Draft, Section};

/// Whether a snapshot item was satisfied by the time it was recorded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Resolved,
    Unresolved,
    #[default]
    Unknown,
}

/// One bullet of a finalized draft with its resolution status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub section: Section,
    pub bullet: String,
    #[serde(default)]
    pub status: ItemStatus,
}

/// A previous cycle's finalized draft. Created once when a cycle finalizes,
/// consumed read-only by the carry-over resolver, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub id: Ulid,
    pub date: NaiveDate,
    pub finalized_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted: bool,
    pub items: Vec<SnapshotItem>,
}

impl MemorySnapshot {
    /// Snapshot a finalized draft. Accomplishments are recorded resolved;
    /// blockers and plans start unresolved (they are, by definition, still
    /// open at finalization time).
    pub fn from_draft(date: NaiveDate, draft: &Draft) -> Self {
        let mut items = Vec::with_capacity(draft.bullet_count());
        for section in Section::ALL {
            let status = match section {
                Section::Accomplishments => ItemStatus::Resolved,
                Section::Blockers | Section::Plans => ItemStatus::Unresolved,
            };
            for bullet in draft.section(section) {
                items.push(SnapshotItem {
                    section,
                    bullet: bullet.clone(),
                    status,
                });
            }
        }
        Self {
            id: Ulid::new(),
            date,
            finalized_at: Utc::now(),
            submitted: false,
            items,
        }
    }

    pub fn items_in(&self, section: Section) -> impl Iterator<Item = &SnapshotItem> {
        self.items.iter().filter(move |item| item.section == section)
    }

    /// Reconstruct the draft this snapshot was taken from.
    pub fn draft(&self) -> Draft {
        let mut draft = Draft::default();
        for item in &self.items {
            draft.push_unique(item.section, item.bullet.clone());
        }
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_draft() -> Draft {
        let mut draft = Draft::default();
        draft.push_unique(
            Section::Accomplishments,
            "- [Fix login bug](https://x/pull/2)".into(),
        );
        draft.push_unique(Section::Blockers, "- API Endpoint Unavailable".into());
        draft.push_unique(Section::Plans, "- Migrate billing webhooks".into());
        draft
    }

    #[test]
    fn test_from_draft_statuses() {
        let snapshot = MemorySnapshot::from_draft(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            &make_draft(),
        );
        assert_eq!(snapshot.items.len(), 3);
        assert_eq!(
            snapshot.items_in(Section::Accomplishments).next().unwrap().status,
            ItemStatus::Resolved
        );
        assert_eq!(
            snapshot.items_in(Section::Blockers).next().unwrap().status,
            ItemStatus::Unresolved
        );
        assert_eq!(
            snapshot.items_in(Section::Plans).next().unwrap().status,
            ItemStatus::Unresolved
        );
    }

    #[test]
    fn test_draft_roundtrip() {
        let original = make_draft();
        let snapshot =
            MemorySnapshot::from_draft(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(), &original);
        assert_eq!(snapshot.draft(), original);
    }

    #[test]
    fn test_status_defaults_to_unknown_on_deserialize() {
        let item: SnapshotItem =
            serde_json::from_str(r#"{"section":"blockers","bullet":"- waiting"}"#).unwrap();
        assert_eq!(item.status, ItemStatus::Unknown);
    }

    #[test]
    fn test_snapshot_serde_roundtrip() {
        let snapshot = MemorySnapshot::from_draft(
            NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(),
            &make_draft(),
        );
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: MemorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, snapshot.id);
        assert_eq!(parsed.date, snapshot.date);
        assert_eq!(parsed.items.len(), snapshot.items.len());
    }
}
