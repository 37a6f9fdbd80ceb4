//! Memory Carry-Over Resolver.
//!
//! Re-derives, for each still-open blocker and plan in yesterday's snapshot,
//! whether today's fresh records already satisfy it. Unmatched items are
//! carried into today's synthesis input as needs-verification candidates;
//! matched items are treated as resolved and dropped. The resolver never
//! promotes a carried item into Accomplishments on its own.

use rhythms_core::{
    ActivityRecord, Category, RecordSource, Section, bullet_parts, normalize_for_match,
};

use crate::snapshot::{ItemStatus, MemorySnapshot};

/// Carry unresolved blockers and plans forward as verification candidates.
pub fn carry_over(snapshot: &MemorySnapshot, fresh: &[ActivityRecord]) -> Vec<ActivityRecord> {
    let mut carried = Vec::new();

    for (section, category) in [
        (Section::Blockers, Category::Blocked),
        (Section::Plans, Category::InProgress),
    ] {
        for item in snapshot.items_in(section) {
            if item.status == ItemStatus::Resolved {
                continue;
            }

            let (title, url) = bullet_parts(&item.bullet);
            if satisfied_by_fresh(&title, url.as_deref(), fresh) {
                continue;
            }

            let mut record = ActivityRecord::new(
                title,
                url.unwrap_or_default(),
                RecordSource::Memory,
                category,
            );
            record.needs_verification = true;
            carried.push(record);
        }
    }

    carried
}

/// A carried item is satisfied when a fresh record shares its url or its
/// normalized title.
fn satisfied_by_fresh(title: &str, url: Option<&str>, fresh: &[ActivityRecord]) -> bool {
    let title_norm = normalize_for_match(title);
    fresh.iter().any(|record| {
        if let Some(url) = url
            && !record.url.is_empty()
            && record.url == url
        {
            return true;
        }
        normalize_for_match(&record.title) == title_norm
    })
}
